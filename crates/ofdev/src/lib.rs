//! OpenFlow flow-entry model and controller codec.
//!
//! Flows are built in memory through the [`flow`] types, encoded into the
//! controller's REST wire document with [`wire::encode`], and documents read
//! back from the controller are turned into `dump-flows` style lines with
//! [`wire::render`].
//!
//! ```no_run
//! use ofdev::flow::{Action, FlowEntry};
//!
//! let mut flow = FlowEntry::new("11").with_priority(1000);
//! flow.match_mut().set_eth_type(0x0800).set_ipv4_dst("10.11.12.13/24");
//! flow.add_action(Action::output(0, "2", None));
//!
//! let doc = ofdev::wire::encode(&flow)?;
//! if let Some(line) = ofdev::wire::render(&doc) {
//!     println!("{}", line);
//! }
//! # Ok::<(), ofdev::FlowError>(())
//! ```
//!
//! Nothing here validates protocol legality; the controller rejects what it
//! does not accept.

pub mod error;
pub mod flow;
pub mod flowfile;
pub mod status;
pub mod wire;

pub use error::{FlowError, FlowResult};
pub use flow::{Action, ActionKind, FlowEntry, InstructionSet, Match};
pub use status::{OperResult, OperStatus, StatusExt};
pub use wire::FlowLine;
