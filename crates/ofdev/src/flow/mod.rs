//! In-memory flow model.
//!
//! - [`FlowEntry`]: one flow-table rule (identity, priority, match, instructions)
//! - [`Match`]: per-protocol-layer match criteria
//! - [`InstructionSet`]: the apply-actions instruction
//! - [`Action`] / [`ActionKind`]: one ordered action of the pipeline

mod action;
mod entry;
mod instruction;
mod matching;

pub use action::{Action, ActionKind};
pub use entry::FlowEntry;
pub use instruction::{ApplyActions, Instruction, InstructionSet};
pub use matching::{
    EthernetMatch, EthernetType, Icmpv4Match, Icmpv6Match, IpMatch, Ipv6ExtHeader, Ipv6Label,
    MaskedAddress, Match, MetadataMatch, PbbMatch, ProtocolMatchFields, TunnelMatch, VlanIdMatch,
    VlanMatch,
};
