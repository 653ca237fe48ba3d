//! Flow actions.
//!
//! An [`Action`] pairs a caller-assigned `order` with one [`ActionKind`].
//! The `order` value is the only apply-order signal: position in the action
//! list means nothing, and nothing here renumbers or deduplicates orders.

use ofdev_types::{PortRef, ReservedPort};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::matching::Match;

/// The closed set of action kinds the controller schema understands.
///
/// Variants without payload encode as an empty object, which the controller
/// treats as a presence marker (`"drop-action": {}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Forward to a port (`output-node-connector`), optionally truncating
    /// packets sent to the controller to `max-length` bytes.
    #[serde(rename = "output_action")]
    Output {
        output_node_connector: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u16>,
    },
    #[serde(rename = "controller_action")]
    Controller {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u16>,
    },
    #[serde(rename = "drop_action")]
    Drop {},
    #[serde(rename = "group_action")]
    Group {
        group_id: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group: Option<String>,
    },
    #[serde(rename = "set_queue_action")]
    SetQueue {
        queue_id: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        queue: Option<String>,
    },
    #[serde(rename = "push_vlan_action")]
    PushVlan { ethernet_type: u16 },
    #[serde(rename = "pop_vlan_action")]
    PopVlan {},
    #[serde(rename = "push_mpls_action")]
    PushMpls { ethernet_type: u16 },
    /// Pop the outermost MPLS label; `ethernet_type` is the payload type
    /// after the pop.
    #[serde(rename = "pop_mpls_action")]
    PopMpls { ethernet_type: u16 },
    #[serde(rename = "push_pbb_action")]
    PushPbb { ethernet_type: u16 },
    #[serde(rename = "pop_pbb_action")]
    PopPbb {},
    #[serde(rename = "set_mpls_ttl_action")]
    SetMplsTtl { mpls_ttl: u8 },
    #[serde(rename = "dec_mpls_ttl")]
    DecMplsTtl {},
    #[serde(rename = "set_nw_ttl_action")]
    SetNwTtl { nw_ttl: u8 },
    #[serde(rename = "dec_nw_ttl")]
    DecNwTtl {},
    #[serde(rename = "copy_ttl_out")]
    CopyTtlOut {},
    #[serde(rename = "copy_ttl_in")]
    CopyTtlIn {},
    /// Rewrite header fields; the populated match fields are the new values.
    #[serde(rename = "set_field", serialize_with = "set_field_values")]
    SetField(Match),
    #[serde(rename = "set_dl_src_action")]
    SetDlSrc { address: String },
    #[serde(rename = "set_dl_dst_action")]
    SetDlDst { address: String },
    #[serde(rename = "flood_action")]
    Flood {},
    #[serde(rename = "flood_all_action")]
    FloodAll {},
    /// Legacy marker: process in the hardware path.
    #[serde(rename = "hw_path_action")]
    HwPath {},
    /// Legacy marker: process in the software path.
    #[serde(rename = "sw_path_action")]
    SwPath {},
    #[serde(rename = "loopback_action")]
    Loopback {},
}

impl ActionKind {
    /// Returns the key this kind is encoded under in the wire document.
    pub fn wire_key(&self) -> &'static str {
        match self {
            Self::Output { .. } => "output-action",
            Self::Controller { .. } => "controller-action",
            Self::Drop {} => "drop-action",
            Self::Group { .. } => "group-action",
            Self::SetQueue { .. } => "set-queue-action",
            Self::PushVlan { .. } => "push-vlan-action",
            Self::PopVlan {} => "pop-vlan-action",
            Self::PushMpls { .. } => "push-mpls-action",
            Self::PopMpls { .. } => "pop-mpls-action",
            Self::PushPbb { .. } => "push-pbb-action",
            Self::PopPbb {} => "pop-pbb-action",
            Self::SetMplsTtl { .. } => "set-mpls-ttl-action",
            Self::DecMplsTtl {} => "dec-mpls-ttl",
            Self::SetNwTtl { .. } => "set-nw-ttl-action",
            Self::DecNwTtl {} => "dec-nw-ttl",
            Self::CopyTtlOut {} => "copy-ttl-out",
            Self::CopyTtlIn {} => "copy-ttl-in",
            Self::SetField(_) => "set-field",
            Self::SetDlSrc { .. } => "set-dl-src-action",
            Self::SetDlDst { .. } => "set-dl-dst-action",
            Self::Flood {} => "flood-action",
            Self::FloodAll {} => "flood-all-action",
            Self::HwPath {} => "hw-path-action",
            Self::SwPath {} => "sw-path-action",
            Self::Loopback {} => "loopback-action",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

/// One step of an apply-actions instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    order: u32,
    #[serde(flatten)]
    kind: ActionKind,
}

impl Action {
    /// Creates an action of the given kind.
    pub fn new(order: u32, kind: ActionKind) -> Self {
        Self { order, kind }
    }

    /// Forward to `port`; `max_len` limits the bytes sent when the port is
    /// the controller.
    pub fn output(order: u32, port: impl Into<String>, max_len: Option<u16>) -> Self {
        Self::new(
            order,
            ActionKind::Output {
                output_node_connector: port.into(),
                max_length: max_len,
            },
        )
    }

    /// Forward to the reserved controller port.
    pub fn output_to_controller(order: u32, max_len: u16) -> Self {
        Self::output(order, ReservedPort::Controller.as_str(), Some(max_len))
    }

    pub fn controller(order: u32, max_len: Option<u16>) -> Self {
        Self::new(order, ActionKind::Controller { max_length: max_len })
    }

    pub fn drop(order: u32) -> Self {
        Self::new(order, ActionKind::Drop {})
    }

    pub fn group(order: u32, group_id: u32) -> Self {
        Self::new(
            order,
            ActionKind::Group {
                group_id,
                group: None,
            },
        )
    }

    pub fn set_queue(order: u32, queue_id: u32) -> Self {
        Self::new(
            order,
            ActionKind::SetQueue {
                queue_id,
                queue: None,
            },
        )
    }

    pub fn push_vlan(order: u32, ethernet_type: u16) -> Self {
        Self::new(order, ActionKind::PushVlan { ethernet_type })
    }

    pub fn pop_vlan(order: u32) -> Self {
        Self::new(order, ActionKind::PopVlan {})
    }

    pub fn push_mpls(order: u32, ethernet_type: u16) -> Self {
        Self::new(order, ActionKind::PushMpls { ethernet_type })
    }

    pub fn pop_mpls(order: u32, ethernet_type: u16) -> Self {
        Self::new(order, ActionKind::PopMpls { ethernet_type })
    }

    pub fn push_pbb(order: u32, ethernet_type: u16) -> Self {
        Self::new(order, ActionKind::PushPbb { ethernet_type })
    }

    pub fn pop_pbb(order: u32) -> Self {
        Self::new(order, ActionKind::PopPbb {})
    }

    pub fn set_mpls_ttl(order: u32, mpls_ttl: u8) -> Self {
        Self::new(order, ActionKind::SetMplsTtl { mpls_ttl })
    }

    pub fn dec_mpls_ttl(order: u32) -> Self {
        Self::new(order, ActionKind::DecMplsTtl {})
    }

    pub fn set_nw_ttl(order: u32, nw_ttl: u8) -> Self {
        Self::new(order, ActionKind::SetNwTtl { nw_ttl })
    }

    pub fn dec_nw_ttl(order: u32) -> Self {
        Self::new(order, ActionKind::DecNwTtl {})
    }

    pub fn copy_ttl_out(order: u32) -> Self {
        Self::new(order, ActionKind::CopyTtlOut {})
    }

    pub fn copy_ttl_in(order: u32) -> Self {
        Self::new(order, ActionKind::CopyTtlIn {})
    }

    /// Rewrite the header fields populated in `fields`.
    pub fn set_field(order: u32, fields: Match) -> Self {
        Self::new(order, ActionKind::SetField(fields))
    }

    /// Rewrite the VLAN id.
    pub fn set_vlan_id(order: u32, vlan_id: u16) -> Self {
        let mut fields = Match::new();
        fields.set_vlan_id(vlan_id);
        Self::set_field(order, fields)
    }

    /// Rewrite the outermost MPLS label.
    pub fn set_mpls_label(order: u32, label: u32) -> Self {
        let mut fields = Match::new();
        fields.set_mpls_label(label);
        Self::set_field(order, fields)
    }

    pub fn set_dl_src(order: u32, address: impl Into<String>) -> Self {
        Self::new(
            order,
            ActionKind::SetDlSrc {
                address: address.into(),
            },
        )
    }

    pub fn set_dl_dst(order: u32, address: impl Into<String>) -> Self {
        Self::new(
            order,
            ActionKind::SetDlDst {
                address: address.into(),
            },
        )
    }

    pub fn flood(order: u32) -> Self {
        Self::new(order, ActionKind::Flood {})
    }

    pub fn flood_all(order: u32) -> Self {
        Self::new(order, ActionKind::FloodAll {})
    }

    pub fn hw_path(order: u32) -> Self {
        Self::new(order, ActionKind::HwPath {})
    }

    pub fn sw_path(order: u32) -> Self {
        Self::new(order, ActionKind::SwPath {})
    }

    pub fn loopback(order: u32) -> Self {
        Self::new(order, ActionKind::Loopback {})
    }

    /// Names the group of a group action; ignored for other kinds.
    pub fn with_group_name(mut self, name: impl Into<String>) -> Self {
        if let ActionKind::Group { group, .. } = &mut self.kind {
            *group = Some(name.into());
        }
        self
    }

    /// Names the queue of a set-queue action; ignored for other kinds.
    pub fn with_queue_name(mut self, name: impl Into<String>) -> Self {
        if let ActionKind::SetQueue { queue, .. } = &mut self.kind {
            *queue = Some(name.into());
        }
        self
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Returns true for forward-to-port actions.
    pub fn is_output(&self) -> bool {
        matches!(self.kind, ActionKind::Output { .. })
    }

    /// Returns the output port of a forward-to-port action.
    pub fn port(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Output {
                output_node_connector,
                ..
            } => Some(output_node_connector),
            _ => None,
        }
    }

    /// Returns the output port parsed as a [`PortRef`].
    pub fn port_ref(&self) -> Option<PortRef> {
        self.port().and_then(|port| port.parse().ok())
    }

    /// Returns the `max-length` of an output or controller action.
    pub fn max_len(&self) -> Option<u16> {
        match &self.kind {
            ActionKind::Output { max_length, .. } | ActionKind::Controller { max_length } => {
                *max_length
            }
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.order)
    }
}

/// An empty rewrite serializes as `{}` so the action keeps its kind on the wire.
fn set_field_values<S>(fields: &Match, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if fields.is_empty() {
        serializer.serialize_map(Some(0))?.end()
    } else {
        fields.serialize(serializer)
    }
}
