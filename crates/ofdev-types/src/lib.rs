//! OpenFlow vocabulary types shared by the flow model and its codecs.
//!
//! This crate provides small, type-safe representations of the values that
//! show up again and again in flow entries:
//!
//! - [`PortRef`]: a port as written in `in-port` / `output-node-connector`
//! - [`ReservedPort`]: the OpenFlow reserved port names (`CONTROLLER`, `FLOOD`, ...)
//! - [`EtherType`]: Ethernet frame type values
//! - [`IpProtocol`]: IP protocol numbers

mod ethertype;
mod port;

pub use ethertype::{EtherType, IpProtocol};
pub use port::{PortRef, ReservedPort};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid port reference: {0:?}")]
    InvalidPort(String),

    #[error("invalid reserved port name: {0}")]
    InvalidReservedPort(String),

    #[error("invalid EtherType: {0}")]
    InvalidEtherType(String),
}
