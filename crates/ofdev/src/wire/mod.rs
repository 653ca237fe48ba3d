//! Controller wire format.
//!
//! [`encode`] turns a [`FlowEntry`](crate::flow::FlowEntry) into the JSON
//! document the controller's REST interface accepts; [`render`] turns a
//! document read back from the controller into a display line.

mod encode;
mod render;

pub use encode::{
    encode, encode_to_string, hyphenate_keys, prune, wire_key, FLOW_CONTAINER, UNDERSCORE_KEYS,
};
pub use render::{flows, render, render_all, render_flow, FlowLine, STATISTICS_CONTAINER};
