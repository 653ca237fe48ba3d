//! Flow entry to controller wire document.
//!
//! The model serializes with underscore attribute names. The controller
//! schema wants hyphens, except for `table_id` and `cookie_mask`, which
//! keep their underscore. Keys are rewritten one at a time through
//! [`wire_key`]; values are never touched.

use serde_json::{Map, Value};
use std::borrow::Cow;
use tracing::debug;

use crate::error::FlowResult;
use crate::flow::FlowEntry;

/// Top-level container of a flow in the controller's inventory schema.
pub const FLOW_CONTAINER: &str = "flow-node-inventory:flow";

/// Keys that keep their underscore separator on the wire.
pub const UNDERSCORE_KEYS: [&str; 2] = ["table_id", "cookie_mask"];

/// Maps one model attribute name to its wire key.
pub fn wire_key(key: &str) -> Cow<'_, str> {
    if UNDERSCORE_KEYS.contains(&key) || !key.contains('_') {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(key.replace('_', "-"))
    }
}

/// Rewrites every object key of the tree through [`wire_key`].
pub fn hyphenate_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, child)| (wire_key(&key).into_owned(), hyphenate_keys(child)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(hyphenate_keys).collect()),
        other => other,
    }
}

/// Removes null values and containers left empty by that removal.
///
/// Returns `None` when the value itself disappears. An object that is
/// already empty on input is an action presence marker (`"drop-action": {}`)
/// and is kept; an empty list never is.
pub fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => Some(Value::Object(map)),
        Value::Object(map) => {
            let pruned: Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, child)| prune(child).map(|child| (key, child)))
                .collect();
            (!pruned.is_empty()).then_some(Value::Object(pruned))
        }
        Value::Array(items) => {
            let pruned: Vec<Value> = items.into_iter().filter_map(prune).collect();
            (!pruned.is_empty()).then_some(Value::Array(pruned))
        }
        scalar => Some(scalar),
    }
}

/// Encodes a flow entry into the wire document sent to the controller.
pub fn encode(flow: &FlowEntry) -> FlowResult<Value> {
    let tree = serde_json::to_value(flow)?;
    let body = prune(hyphenate_keys(tree)).unwrap_or_else(|| Value::Object(Map::new()));

    debug!(
        flow_id = flow.id(),
        table_id = flow.table_id(),
        "encoded flow entry"
    );

    let mut doc = Map::new();
    doc.insert(FLOW_CONTAINER.to_string(), body);
    Ok(Value::Object(doc))
}

/// Encodes a flow entry as pretty-printed JSON text.
pub fn encode_to_string(flow: &FlowEntry) -> FlowResult<String> {
    Ok(serde_json::to_string_pretty(&encode(flow)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{Action, ActionKind, Match};
    use ofdev_types::EtherType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn body(doc: &Value) -> &Value {
        &doc[FLOW_CONTAINER]
    }

    #[test]
    fn test_wire_key_mapping() {
        assert_eq!(wire_key("table_id"), "table_id");
        assert_eq!(wire_key("cookie_mask"), "cookie_mask");
        assert_eq!(wire_key("hard_timeout"), "hard-timeout");
        assert_eq!(wire_key("output_node_connector"), "output-node-connector");
        assert_eq!(wire_key("ipv4_destination"), "ipv4-destination");
        assert_eq!(wire_key("installHw"), "installHw");
        assert_eq!(wire_key("priority"), "priority");
    }

    #[test]
    fn test_wire_key_exceptions_are_whole_keys() {
        // Keys that merely contain an exception token still get hyphens.
        assert_eq!(wire_key("table_id_extra"), "table-id-extra");
        assert_eq!(wire_key("my_cookie_mask"), "my-cookie-mask");
        // Already hyphenated keys are stable.
        assert_eq!(wire_key("ethernet-match"), "ethernet-match");
        assert_eq!(wire_key(&wire_key("vlan_id_present")), "vlan-id-present");
    }

    #[test]
    fn test_hyphenate_keys_leaves_values_alone() {
        let tree = json!({
            "in_port": "openflow:1:LOCAL_port",
            "list_key": [{"inner_key": "a_b"}]
        });
        assert_eq!(
            hyphenate_keys(tree),
            json!({
                "in-port": "openflow:1:LOCAL_port",
                "list-key": [{"inner-key": "a_b"}]
            })
        );
    }

    #[test]
    fn test_prune_nested() {
        let tree = json!({
            "a": null,
            "b": {"c": null, "d": {"e": null}},
            "f": [null, {"g": null}],
            "h": 0,
            "i": false,
            "j": ""
        });
        assert_eq!(prune(tree), Some(json!({"h": 0, "i": false, "j": ""})));
    }

    #[test]
    fn test_prune_all_null_disappears() {
        assert_eq!(prune(json!({"a": null, "b": {"c": null}})), None);
        assert_eq!(prune(json!([])), None);
        assert_eq!(prune(Value::Null), None);
    }

    #[test]
    fn test_prune_keeps_presence_markers() {
        let tree = json!({"action": [{"order": 0, "drop-action": {}}]});
        assert_eq!(prune(tree.clone()), Some(tree));
    }

    #[test]
    fn test_encode_drop_scenario() {
        let mut flow = FlowEntry::new("11").with_priority(1000);
        flow.match_mut()
            .set_eth_type(EtherType::IPV4.into())
            .set_ipv4_dst("10.11.12.13/24");
        flow.add_action(Action::drop(0));

        let doc = encode(&flow).unwrap();
        assert_eq!(
            doc,
            json!({
                "flow-node-inventory:flow": {
                    "id": "11",
                    "table_id": 0,
                    "priority": 1000,
                    "match": {
                        "ethernet-match": {"ethernet-type": {"type": 2048}},
                        "ipv4-destination": "10.11.12.13/24"
                    },
                    "instructions": {
                        "instruction": [{
                            "order": 0,
                            "apply-actions": {
                                "action": [{"order": 0, "drop-action": {}}]
                            }
                        }]
                    }
                }
            })
        );
    }

    #[test]
    fn test_encode_keeps_underscore_exceptions() {
        let mut flow = FlowEntry::new("3").with_table_id(2);
        flow.set_cookie(0x10);
        flow.set_cookie_mask(0xff);
        flow.set_hard_timeout(60);
        flow.set_install_hw(true);

        let doc = encode(&flow).unwrap();
        let flow_obj = body(&doc).as_object().unwrap();
        assert_eq!(flow_obj["table_id"], json!(2));
        assert_eq!(flow_obj["cookie_mask"], json!(255));
        assert_eq!(flow_obj["cookie"], json!(16));
        assert_eq!(flow_obj["hard-timeout"], json!(60));
        assert_eq!(flow_obj["installHw"], json!(true));
        assert!(!flow_obj.contains_key("hard_timeout"));
    }

    #[test]
    fn test_encode_output_action() {
        let flow = FlowEntry::new("1")
            .with_action(Action::output_to_controller(0, 60))
            .with_action(Action::output(1, "5", None));

        let doc = encode(&flow).unwrap();
        let actions = &body(&doc)["instructions"]["instruction"][0]["apply-actions"]["action"];
        assert_eq!(
            actions,
            &json!([
                {
                    "order": 0,
                    "output-action": {"output-node-connector": "CONTROLLER", "max-length": 60}
                },
                {"order": 1, "output-action": {"output-node-connector": "5"}}
            ])
        );
    }

    #[test]
    fn test_every_action_kind_uses_its_wire_key() {
        let mut fields = Match::new();
        fields.set_vlan_id(10);

        let actions = vec![
            Action::output(0, "1", Some(128)),
            Action::controller(0, Some(64)),
            Action::drop(0),
            Action::group(0, 7).with_group_name("g7"),
            Action::set_queue(0, 2).with_queue_name("q2"),
            Action::push_vlan(0, 0x8100),
            Action::pop_vlan(0),
            Action::push_mpls(0, 0x8847),
            Action::pop_mpls(0, 0x0800),
            Action::push_pbb(0, 0x88e7),
            Action::pop_pbb(0),
            Action::set_mpls_ttl(0, 64),
            Action::dec_mpls_ttl(0),
            Action::set_nw_ttl(0, 32),
            Action::dec_nw_ttl(0),
            Action::copy_ttl_out(0),
            Action::copy_ttl_in(0),
            Action::set_field(0, fields),
            Action::set_dl_src(0, "00:00:00:00:00:01"),
            Action::set_dl_dst(0, "00:00:00:00:00:02"),
            Action::flood(0),
            Action::flood_all(0),
            Action::hw_path(0),
            Action::sw_path(0),
            Action::loopback(0),
        ];
        assert_eq!(actions.len(), 25);

        for action in actions {
            let key = action.kind().wire_key();
            let doc = encode(&FlowEntry::new("1").with_action(action.clone())).unwrap();
            let encoded = &body(&doc)["instructions"]["instruction"][0]["apply-actions"]["action"][0];
            let obj = encoded.as_object().unwrap();
            assert_eq!(obj.len(), 2, "unexpected keys for {}", key);
            assert!(obj.contains_key(key), "missing {} in {}", key, encoded);
            if matches!(action.kind(), ActionKind::Controller { .. }) {
                assert_eq!(obj[key], json!({"max-length": 64}));
            }
        }
    }

    #[test]
    fn test_encode_empty_action_list() {
        let flow = FlowEntry::new("9").with_match(Match::new());
        let mut with_empty = flow.clone();
        with_empty.set_instructions(Default::default());

        let doc = encode(&flow).unwrap();
        assert_eq!(doc, json!({"flow-node-inventory:flow": {"id": "9", "table_id": 0}}));

        let doc = encode(&with_empty).unwrap();
        assert_eq!(
            body(&doc)["instructions"],
            json!({"instruction": [{"order": 0}]})
        );
    }

    #[test]
    fn test_encode_empty_set_field_keeps_kind() {
        let flow = FlowEntry::new("1").with_action(Action::set_field(0, Match::new()));
        let doc = encode(&flow).unwrap();
        assert_eq!(
            body(&doc)["instructions"]["instruction"][0]["apply-actions"]["action"],
            json!([{"order": 0, "set-field": {}}])
        );

        let mut rewrite = Match::new();
        rewrite.set_eth_src("00:00:00:00:00:01");
        let flow = FlowEntry::new("1").with_action(Action::set_field(0, rewrite));
        let doc = encode(&flow).unwrap();
        assert_eq!(
            body(&doc)["instructions"]["instruction"][0]["apply-actions"]["action"],
            json!([{"order": 0, "set-field": {
                "ethernet-match": {"ethernet-source": {"address": "00:00:00:00:00:01"}}
            }}])
        );
    }

    #[test]
    fn test_encode_to_string() {
        let text = encode_to_string(&FlowEntry::new("4").with_priority(5)).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!({"flow-node-inventory:flow": {"id": "4", "table_id": 0, "priority": 5}})
        );
    }
}
