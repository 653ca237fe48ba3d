//! Port references as they appear in flow entries.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OpenFlow reserved ports.
///
/// The controller accepts these names verbatim wherever a port is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservedPort {
    /// Send the packet back out of its ingress port.
    #[serde(rename = "INPORT")]
    InPort,
    /// Submit the packet to the first flow table.
    Table,
    /// Process with the switch's traditional forwarding path.
    Normal,
    /// Flood along the spanning tree, excluding the ingress port.
    Flood,
    /// All standard ports except the ingress port.
    All,
    /// Encapsulate and send to the controller.
    Controller,
    /// The switch's local networking stack.
    Local,
    /// Wildcard used in commands when no port is specified.
    Any,
}

impl ReservedPort {
    /// Returns the wire name of the reserved port.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReservedPort::InPort => "INPORT",
            ReservedPort::Table => "TABLE",
            ReservedPort::Normal => "NORMAL",
            ReservedPort::Flood => "FLOOD",
            ReservedPort::All => "ALL",
            ReservedPort::Controller => "CONTROLLER",
            ReservedPort::Local => "LOCAL",
            ReservedPort::Any => "ANY",
        }
    }
}

impl fmt::Display for ReservedPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservedPort {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INPORT" | "IN_PORT" => Ok(ReservedPort::InPort),
            "TABLE" => Ok(ReservedPort::Table),
            "NORMAL" => Ok(ReservedPort::Normal),
            "FLOOD" => Ok(ReservedPort::Flood),
            "ALL" => Ok(ReservedPort::All),
            "CONTROLLER" => Ok(ReservedPort::Controller),
            "LOCAL" => Ok(ReservedPort::Local),
            "ANY" => Ok(ReservedPort::Any),
            _ => Err(ParseError::InvalidReservedPort(s.to_string())),
        }
    }
}

/// A port as written in a flow entry.
///
/// The controller identifies switch ports as node connectors
/// (`"<node>:<port>"`, e.g. `"openflow:1:2"`), but also accepts bare port
/// numbers and reserved port names.
///
/// # Examples
///
/// ```
/// use ofdev_types::{PortRef, ReservedPort};
///
/// let port: PortRef = "openflow:1:2".parse().unwrap();
/// assert_eq!(port.label(), "2");
///
/// let ctrl: PortRef = "CONTROLLER".parse().unwrap();
/// assert_eq!(ctrl, PortRef::Reserved(ReservedPort::Controller));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PortRef {
    /// One of the OpenFlow reserved ports.
    Reserved(ReservedPort),
    /// A bare port number.
    Number(u32),
    /// A port qualified by the switch (node) that owns it.
    Connector { node: String, port: String },
    /// Any other port name, passed through untouched.
    Named(String),
}

impl PortRef {
    /// Creates a node connector reference (`"<node>:<port>"`).
    pub fn connector(node: impl Into<String>, port: impl fmt::Display) -> Self {
        PortRef::Connector {
            node: node.into(),
            port: port.to_string(),
        }
    }

    /// Returns the port with the owning switch's prefix removed.
    pub fn label(&self) -> String {
        match self {
            PortRef::Reserved(reserved) => reserved.to_string(),
            PortRef::Number(number) => number.to_string(),
            PortRef::Connector { port, .. } => port.clone(),
            PortRef::Named(name) => name.clone(),
        }
    }

    /// Returns the owning switch, if the reference carries one.
    pub fn node(&self) -> Option<&str> {
        match self {
            PortRef::Connector { node, .. } => Some(node),
            _ => None,
        }
    }

    /// Returns true for the reserved controller port.
    pub fn is_controller(&self) -> bool {
        matches!(self, PortRef::Reserved(ReservedPort::Controller))
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortRef::Reserved(reserved) => write!(f, "{}", reserved),
            PortRef::Number(number) => write!(f, "{}", number),
            PortRef::Connector { node, port } => write!(f, "{}:{}", node, port),
            PortRef::Named(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for PortRef {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::InvalidPort(s.to_string()));
        }

        if let Ok(reserved) = s.parse::<ReservedPort>() {
            return Ok(PortRef::Reserved(reserved));
        }

        if let Ok(number) = s.parse::<u32>() {
            return Ok(PortRef::Number(number));
        }

        match s.rsplit_once(':') {
            Some((node, port)) if !node.is_empty() && !port.is_empty() => {
                Ok(PortRef::connector(node, port))
            }
            Some(_) => Err(ParseError::InvalidPort(s.to_string())),
            None => Ok(PortRef::Named(s.to_string())),
        }
    }
}

impl TryFrom<String> for PortRef {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PortRef> for String {
    fn from(port: PortRef) -> String {
        port.to_string()
    }
}

impl From<ReservedPort> for PortRef {
    fn from(reserved: ReservedPort) -> Self {
        PortRef::Reserved(reserved)
    }
}

impl From<u32> for PortRef {
    fn from(number: u32) -> Self {
        PortRef::Number(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_connector() {
        let port: PortRef = "openflow:1:2".parse().unwrap();
        assert_eq!(port, PortRef::connector("openflow:1", 2));
        assert_eq!(port.node(), Some("openflow:1"));
        assert_eq!(port.label(), "2");
        assert_eq!(port.to_string(), "openflow:1:2");
    }

    #[test]
    fn test_parse_number() {
        let port: PortRef = "5".parse().unwrap();
        assert_eq!(port, PortRef::Number(5));
        assert_eq!(port.label(), "5");
        assert_eq!(port.node(), None);
    }

    #[test]
    fn test_parse_reserved() {
        assert!("CONTROLLER".parse::<PortRef>().unwrap().is_controller());
        assert!("controller".parse::<PortRef>().unwrap().is_controller());
        assert_eq!(
            "IN_PORT".parse::<PortRef>().unwrap(),
            PortRef::Reserved(ReservedPort::InPort)
        );
        assert_eq!(ReservedPort::InPort.to_string(), "INPORT");
    }

    #[test]
    fn test_parse_named() {
        let port: PortRef = "eth0".parse().unwrap();
        assert_eq!(port, PortRef::Named("eth0".to_string()));
        assert_eq!(port.label(), "eth0");
    }

    #[test]
    fn test_invalid_port() {
        assert!("".parse::<PortRef>().is_err());
        assert!("openflow:".parse::<PortRef>().is_err());
        assert!(":2".parse::<PortRef>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let port = PortRef::connector("openflow:7", 3);
        let json = serde_json::to_string(&port).unwrap();
        assert_eq!(json, "\"openflow:7:3\"");

        let back: PortRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, port);
    }
}
