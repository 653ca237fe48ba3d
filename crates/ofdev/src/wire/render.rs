//! Controller wire document to display line.
//!
//! Produces a single line in the spirit of `ovs-ofctl dump-flows`:
//!
//! ```text
//! cookie=0x1f, duration=12.5s, table=0, n_packets=3, n_bytes=180, priority=1000,in_port=1,dl_type=0x800 actions=output:2
//! ```
//!
//! Fields whose sub-tree is missing or has an unexpected shape are left out
//! of the line. Only forward-to-port actions are named in `actions=`.

use ofdev_types::{EtherType, PortRef};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use super::encode::FLOW_CONTAINER;

/// Statistics container of a flow in the controller's operational tree.
pub const STATISTICS_CONTAINER: &str = "opendaylight-flow-statistics:flow-statistics";

const DROP: &str = "drop";

/// A rendered flow, split the way the line is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowLine {
    stats: Vec<String>,
    predicate: Vec<String>,
    actions: String,
}

impl FlowLine {
    /// Returns every token in line order, `actions=...` last.
    pub fn tokens(&self) -> Vec<String> {
        self.stats
            .iter()
            .chain(self.predicate.iter())
            .cloned()
            .chain(std::iter::once(format!("actions={}", self.actions)))
            .collect()
    }

    /// Returns the value of the `actions=` token.
    pub fn actions(&self) -> &str {
        &self.actions
    }

    /// Returns the value of the token named `key`.
    pub fn token(&self, key: &str) -> Option<&str> {
        if key == "actions" {
            return Some(&self.actions);
        }
        self.stats
            .iter()
            .chain(self.predicate.iter())
            .find_map(|token| {
                token
                    .split_once('=')
                    .filter(|(name, _)| *name == key)
                    .map(|(_, value)| value)
            })
    }
}

impl fmt::Display for FlowLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: Vec<String> = [self.stats.join(", "), self.predicate.join(",")]
            .into_iter()
            .filter(|group| !group.is_empty())
            .collect();
        if head.is_empty() {
            write!(f, "actions={}", self.actions)
        } else {
            write!(f, "{} actions={}", head.join(", "), self.actions)
        }
    }
}

/// Returns the flow objects of a wire document.
///
/// Accepts the wrapped document (one flow or a list under
/// `flow-node-inventory:flow`), a bare list of flows, or a bare flow.
pub fn flows(doc: &Value) -> Vec<&Value> {
    let inner = doc
        .get(FLOW_CONTAINER)
        .or_else(|| doc.get("flow"))
        .unwrap_or(doc);
    match inner {
        Value::Array(items) => items.iter().filter(|item| item.is_object()).collect(),
        Value::Object(_) => vec![inner],
        _ => {
            debug!("wire document holds no flow object");
            Vec::new()
        }
    }
}

/// Renders the first flow of a wire document.
pub fn render(doc: &Value) -> Option<FlowLine> {
    flows(doc).into_iter().next().map(render_flow)
}

/// Renders every flow of a wire document.
pub fn render_all(doc: &Value) -> Vec<FlowLine> {
    flows(doc).into_iter().map(render_flow).collect()
}

/// Renders one flow object.
pub fn render_flow(flow: &Value) -> FlowLine {
    let mut stats = Vec::new();

    if let Some(cookie) = flow.get("cookie").and_then(as_u64) {
        stats.push(format!("cookie={:#x}", cookie));
    }
    if let Some(duration) = statistic(flow, "duration").and_then(duration_secs) {
        stats.push(format!("duration={}s", duration));
    }
    push_scalar(&mut stats, "table", flow.get("table_id"));
    push_scalar(&mut stats, "n_packets", statistic(flow, "packet-count"));
    push_scalar(&mut stats, "n_bytes", statistic(flow, "byte-count"));
    for (key, wire) in [("idle_timeout", "idle-timeout"), ("hard_timeout", "hard-timeout")] {
        if let Some(seconds) = flow.get(wire).and_then(as_u64).filter(|s| *s != 0) {
            stats.push(format!("{}={}", key, seconds));
        }
    }

    let mut predicate = Vec::new();
    push_scalar(&mut predicate, "priority", flow.get("priority"));
    if let Some(m) = flow.get("match") {
        match_tokens(m, &mut predicate);
    }

    let actions = match flow.get("instructions") {
        None | Some(Value::Null) => DROP.to_string(),
        Some(instructions) => output_actions(instructions),
    };

    FlowLine {
        stats,
        predicate,
        actions,
    }
}

fn match_tokens(m: &Value, tokens: &mut Vec<String>) {
    if let Some(port) = m.get("in-port").and_then(scalar) {
        let label = port
            .parse::<PortRef>()
            .map(|port| port.label())
            .unwrap_or(port);
        tokens.push(format!("in_port={}", label));
    }

    let vlan = m.get("vlan-match");
    push_scalar(
        tokens,
        "dl_vlan",
        vlan.and_then(|v| v.pointer("/vlan-id/vlan-id")),
    );
    push_scalar(tokens, "dl_vlan_pcp", vlan.and_then(|v| v.get("vlan-pcp")));

    let ethernet = m.get("ethernet-match");
    match ethernet
        .and_then(|e| e.pointer("/ethernet-type/type"))
        .and_then(as_u64)
        .map(u16::try_from)
    {
        Some(Ok(ether_type)) => tokens.push(format!("dl_type={}", EtherType::from(ether_type))),
        Some(Err(_)) => debug!("ethernet type out of range, omitted"),
        None => {}
    }
    for (key, wire) in [
        ("dl_src", "/ethernet-source/address"),
        ("dl_dst", "/ethernet-destination/address"),
    ] {
        if let Some(address) = ethernet.and_then(|e| e.pointer(wire)).and_then(Value::as_str) {
            tokens.push(format!("{}={}", key, address.to_lowercase()));
        }
    }

    push_scalar(
        tokens,
        "nw_proto",
        m.pointer("/ip-match/ip-protocol"),
    );
    push_scalar(tokens, "nw_src", m.get("ipv4-source"));
    push_scalar(tokens, "nw_dst", m.get("ipv4-destination"));

    let first_of = |keys: [&str; 3]| keys.into_iter().find_map(|key| m.get(key));
    push_scalar(
        tokens,
        "tp_src",
        first_of(["tcp-source-port", "udp-source-port", "sctp-source-port"]),
    );
    push_scalar(
        tokens,
        "tp_dst",
        first_of([
            "tcp-destination-port",
            "udp-destination-port",
            "sctp-destination-port",
        ]),
    );
}

/// Renders every output action under every instruction, in `order`.
fn output_actions(instructions: &Value) -> String {
    let mut outputs: Vec<(Option<u64>, String)> = Vec::new();

    for instruction in list(instructions.get("instruction")) {
        let actions = instruction.pointer("/apply-actions/action");
        for action in list(actions) {
            let Some(output) = action.get("output-action") else {
                continue;
            };
            let Some(port) = output.get("output-node-connector").and_then(scalar) else {
                debug!("output action without a port, omitted");
                continue;
            };
            let rendered = match port.parse::<PortRef>() {
                Ok(port) if port.is_controller() => {
                    match output.get("max-length").and_then(scalar) {
                        Some(max_len) => format!("{}:{}", port, max_len),
                        None => port.to_string(),
                    }
                }
                _ => format!("output:{}", port),
            };
            outputs.push((action.get("order").and_then(as_u64), rendered));
        }
    }

    outputs.sort_by_key(|(order, _)| (order.is_none(), *order));
    outputs
        .into_iter()
        .map(|(_, rendered)| rendered)
        .collect::<Vec<_>>()
        .join(",")
}

/// Reads a counter from the flow or from its statistics container.
fn statistic<'a>(flow: &'a Value, key: &str) -> Option<&'a Value> {
    flow.get(key)
        .or_else(|| flow.get(STATISTICS_CONTAINER).and_then(|s| s.get(key)))
}

/// Decimal seconds with trailing zeros trimmed, keeping at least one
/// fractional digit: `12.5`, `3.0`, `0.00000005`.
fn duration_secs(duration: &Value) -> Option<String> {
    const NANOS_PER_SEC: u128 = 1_000_000_000;

    let second = duration.get("second").and_then(as_u64);
    let nanosecond = duration.get("nanosecond").and_then(as_u64);
    if second.is_none() && nanosecond.is_none() {
        return None;
    }
    let total =
        u128::from(second.unwrap_or(0)) * NANOS_PER_SEC + u128::from(nanosecond.unwrap_or(0));
    let fraction = format!("{:09}", total % NANOS_PER_SEC);
    let fraction = match fraction.trim_end_matches('0') {
        "" => "0",
        digits => digits,
    };
    Some(format!("{}.{}", total / NANOS_PER_SEC, fraction))
}

/// Treats a lone object the same as a one-element list.
fn list(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        Some(item @ Value::Object(_)) => std::slice::from_ref(item),
        _ => &[],
    }
}

fn push_scalar(tokens: &mut Vec<String>, key: &str, value: Option<&Value>) {
    if let Some(value) = value.and_then(scalar) {
        tokens.push(format!("{}={}", key, value));
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn wrap(flow: Value) -> Value {
        json!({ FLOW_CONTAINER: flow })
    }

    fn apply(actions: Value) -> Value {
        json!({"instruction": [{"order": 0, "apply-actions": {"action": actions}}]})
    }

    #[test]
    fn test_render_full_line() {
        let doc = wrap(json!({
            "id": "1",
            "cookie": 31,
            "duration": {"second": 12, "nanosecond": 500000000},
            "table_id": 0,
            "packet-count": 3,
            "byte-count": 180,
            "priority": 1000,
            "match": {
                "in-port": "openflow:1:1",
                "ethernet-match": {"ethernet-type": {"type": 2048}}
            },
            "instructions": apply(json!([
                {"order": 0, "output-action": {"output-node-connector": "2"}}
            ]))
        }));

        let line = render(&doc).unwrap();
        assert_eq!(
            line.to_string(),
            "cookie=0x1f, duration=12.5s, table=0, n_packets=3, n_bytes=180, \
             priority=1000,in_port=1,dl_type=0x800 actions=output:2"
        );
    }

    #[test]
    fn test_duration_formatting() {
        let line = render_flow(&json!({"duration": {"second": 12, "nanosecond": 500000000}}));
        assert_eq!(line.token("duration"), Some("12.5s"));

        let line = render_flow(&json!({"duration": {"second": 3, "nanosecond": 0}}));
        assert_eq!(line.token("duration"), Some("3.0s"));

        let line = render_flow(&json!({"duration": {"second": 7}}));
        assert_eq!(line.token("duration"), Some("7.0s"));

        let line = render_flow(&json!({"duration": {"second": 0, "nanosecond": 50}}));
        assert_eq!(line.token("duration"), Some("0.00000005s"));

        let line = render_flow(&json!({"duration": {"nanosecond": 1}}));
        assert_eq!(line.token("duration"), Some("0.000000001s"));

        let line = render_flow(&json!({"duration": {"second": 1, "nanosecond": 1500000000}}));
        assert_eq!(line.token("duration"), Some("2.5s"));

        let line = render_flow(&json!({"duration": {"second": 86400, "nanosecond": 999999999}}));
        assert_eq!(line.token("duration"), Some("86400.999999999s"));

        let line = render_flow(&json!({"duration": {}}));
        assert_eq!(line.token("duration"), None);
    }

    #[test]
    fn test_statistics_container() {
        let line = render_flow(&json!({
            "table_id": 2,
            STATISTICS_CONTAINER: {
                "duration": {"second": 1, "nanosecond": 250000000},
                "packet-count": "10",
                "byte-count": "640"
            }
        }));
        assert_eq!(line.token("duration"), Some("1.25s"));
        assert_eq!(line.token("n_packets"), Some("10"));
        assert_eq!(line.token("n_bytes"), Some("640"));
        assert_eq!(line.token("table"), Some("2"));
    }

    #[test]
    fn test_timeouts_only_when_nonzero() {
        let line = render_flow(&json!({"idle-timeout": 0, "hard-timeout": 30}));
        assert_eq!(line.token("idle_timeout"), None);
        assert_eq!(line.token("hard_timeout"), Some("30"));

        let line = render_flow(&json!({"table_id": 0}));
        assert_eq!(line.token("idle_timeout"), None);
        assert_eq!(line.token("hard_timeout"), None);
    }

    #[test]
    fn test_match_tokens() {
        let line = render_flow(&json!({
            "priority": 10,
            "match": {
                "in-port": "openflow:5:3",
                "vlan-match": {"vlan-id": {"vlan-id": 100, "vlan-id-present": true}, "vlan-pcp": 3},
                "ethernet-match": {
                    "ethernet-type": {"type": 34525},
                    "ethernet-source": {"address": "AA:BB:CC:00:11:22"},
                    "ethernet-destination": {"address": "00:0A:0B:0C:0D:0E"}
                },
                "ip-match": {"ip-protocol": 6},
                "ipv4-source": "10.0.0.1/32",
                "ipv4-destination": "10.0.0.2/32",
                "tcp-source-port": 8080,
                "tcp-destination-port": 443
            }
        }));

        assert_eq!(
            line.tokens(),
            vec![
                "priority=10",
                "in_port=3",
                "dl_vlan=100",
                "dl_vlan_pcp=3",
                "dl_type=0x86dd",
                "dl_src=aa:bb:cc:00:11:22",
                "dl_dst=00:0a:0b:0c:0d:0e",
                "nw_proto=6",
                "nw_src=10.0.0.1/32",
                "nw_dst=10.0.0.2/32",
                "tp_src=8080",
                "tp_dst=443",
                "actions=drop",
            ]
        );
    }

    #[test]
    fn test_udp_ports_and_bare_in_port() {
        let line = render_flow(&json!({
            "match": {"in-port": "7", "udp-source-port": 53, "udp-destination-port": 5353}
        }));
        assert_eq!(line.token("in_port"), Some("7"));
        assert_eq!(line.token("tp_src"), Some("53"));
        assert_eq!(line.token("tp_dst"), Some("5353"));
    }

    #[test]
    fn test_controller_and_numeric_ports() {
        let line = render_flow(&json!({
            "instructions": apply(json!([
                {"order": 0, "output-action": {"output-node-connector": "CONTROLLER", "max-length": 60}}
            ]))
        }));
        assert_eq!(line.actions(), "CONTROLLER:60");

        let line = render_flow(&json!({
            "instructions": apply(json!([
                {"order": 0, "output-action": {"output-node-connector": "5"}}
            ]))
        }));
        assert_eq!(line.actions(), "output:5");

        let line = render_flow(&json!({
            "instructions": apply(json!([
                {"order": 0, "output-action": {"output-node-connector": "CONTROLLER"}}
            ]))
        }));
        assert_eq!(line.actions(), "CONTROLLER");
    }

    #[test]
    fn test_actions_sorted_by_order() {
        let line = render_flow(&json!({
            "instructions": apply(json!([
                {"output-action": {"output-node-connector": "9"}},
                {"order": 2, "output-action": {"output-node-connector": "2"}},
                {"order": 0, "push-vlan-action": {"ethernet-type": 33024}},
                {"order": 1, "output-action": {"output-node-connector": "1"}}
            ]))
        }));
        assert_eq!(line.actions(), "output:1,output:2,output:9");
    }

    #[test]
    fn test_drop_only_when_instructions_absent() {
        let line = render_flow(&json!({"match": {"ipv4-destination": "10.0.0.0/8"}}));
        assert_eq!(line.actions(), "drop");

        let line = render_flow(&json!({"instructions": null}));
        assert_eq!(line.actions(), "drop");

        // Instructions present without any output action: empty value, not drop.
        let line = render_flow(&json!({"instructions": apply(json!([{"order": 0, "drop-action": {}}]))}));
        assert_eq!(line.actions(), "");
        assert_eq!(line.to_string(), "actions=");
    }

    #[test]
    fn test_list_responses() {
        let doc = json!({
            FLOW_CONTAINER: [
                {"id": "1", "priority": 1},
                {"id": "2", "priority": 2, "instructions": apply(json!([
                    {"order": 0, "output-action": {"output-node-connector": "3"}}
                ]))}
            ]
        });

        let lines = render_all(&doc);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "priority=1 actions=drop");
        assert_eq!(lines[1].to_string(), "priority=2 actions=output:3");
        assert_eq!(render(&doc), Some(lines[0].clone()));
    }

    #[test]
    fn test_flows_shapes() {
        assert_eq!(flows(&json!({"flow": [{"id": "1"}]})).len(), 1);
        assert_eq!(flows(&json!([{"id": "1"}, {"id": "2"}])).len(), 2);
        assert_eq!(flows(&json!({"id": "1"})).len(), 1);
        assert!(flows(&json!("nope")).is_empty());
        assert!(render(&json!({ FLOW_CONTAINER: [] })).is_none());
    }

    #[test]
    fn test_mistyped_fields_omitted() {
        let line = render_flow(&json!({
            "cookie": "not-a-number",
            "priority": {"nested": true},
            "match": {"ethernet-match": {"ethernet-type": {"type": 70000}}},
            "instructions": apply(json!({"order": 0, "output-action": {}}))
        }));
        assert_eq!(line.token("cookie"), None);
        assert_eq!(line.token("priority"), None);
        assert_eq!(line.token("dl_type"), None);
        assert_eq!(line.actions(), "");
    }
}
