//! Flow entry: the aggregate root of the flow model.
//!
//! A flow entry represents a single rule in a switch flow table:
//! - Identity (table id, flow id)
//! - Precedence (priority, higher matches first)
//! - Lifecycle hints (idle/hard timeout, 0 = never)
//! - Opaque correlation data (cookie, cookie mask)
//! - An optional match and an optional instruction set
//!
//! A flow entry without instructions drops every matching packet.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::action::Action;
use super::instruction::InstructionSet;
use super::matching::Match;
use crate::error::FlowResult;
use crate::wire;

/// Flow entry structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEntry {
    #[serde(deserialize_with = "id_from_text_or_number")]
    id: String,
    #[serde(default)]
    table_id: u8,
    priority: Option<u16>,
    cookie: Option<u64>,
    cookie_mask: Option<u64>,
    idle_timeout: Option<u16>,
    hard_timeout: Option<u16>,
    flags: Option<String>,
    flow_name: Option<String>,
    strict: Option<bool>,
    barrier: Option<bool>,
    #[serde(rename = "installHw")]
    install_hw: Option<bool>,
    out_port: Option<u64>,
    out_group: Option<u32>,
    buffer_id: Option<u32>,
    #[serde(rename = "match")]
    flow_match: Option<Match>,
    instructions: Option<InstructionSet>,
}

impl FlowEntry {
    /// Creates a flow entry in table 0 with nothing else set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            table_id: 0,
            priority: None,
            cookie: None,
            cookie_mask: None,
            idle_timeout: None,
            hard_timeout: None,
            flags: None,
            flow_name: None,
            strict: None,
            barrier: None,
            install_hw: None,
            out_port: None,
            out_group: None,
            buffer_id: None,
            flow_match: None,
            instructions: None,
        }
    }

    /// Sets the table id.
    pub fn with_table_id(mut self, table_id: u8) -> Self {
        self.table_id = table_id;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the match.
    pub fn with_match(mut self, flow_match: Match) -> Self {
        self.flow_match = Some(flow_match);
        self
    }

    /// Adds an action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.add_action(action);
        self
    }

    pub fn set_table_id(&mut self, table_id: u8) {
        self.table_id = table_id;
    }

    pub fn set_priority(&mut self, priority: u16) {
        self.priority = Some(priority);
    }

    pub fn set_cookie(&mut self, cookie: u64) {
        self.cookie = Some(cookie);
    }

    pub fn set_cookie_mask(&mut self, mask: u64) {
        self.cookie_mask = Some(mask);
    }

    pub fn set_idle_timeout(&mut self, seconds: u16) {
        self.idle_timeout = Some(seconds);
    }

    pub fn set_hard_timeout(&mut self, seconds: u16) {
        self.hard_timeout = Some(seconds);
    }

    pub fn set_flags(&mut self, flags: impl Into<String>) {
        self.flags = Some(flags.into());
    }

    pub fn set_flow_name(&mut self, name: impl Into<String>) {
        self.flow_name = Some(name.into());
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = Some(strict);
    }

    pub fn set_barrier(&mut self, barrier: bool) {
        self.barrier = Some(barrier);
    }

    pub fn set_install_hw(&mut self, install_hw: bool) {
        self.install_hw = Some(install_hw);
    }

    pub fn set_out_port(&mut self, port: u64) {
        self.out_port = Some(port);
    }

    pub fn set_out_group(&mut self, group: u32) {
        self.out_group = Some(group);
    }

    pub fn set_buffer_id(&mut self, buffer_id: u32) {
        self.buffer_id = Some(buffer_id);
    }

    /// Replaces the match.
    pub fn set_match(&mut self, flow_match: Match) {
        self.flow_match = Some(flow_match);
    }

    /// Returns the match for in-place edits, creating it on first use.
    pub fn match_mut(&mut self) -> &mut Match {
        self.flow_match.get_or_insert_with(Match::default)
    }

    /// Replaces the instruction set.
    pub fn set_instructions(&mut self, instructions: InstructionSet) {
        self.instructions = Some(instructions);
    }

    /// Adds an action, creating the instruction set on first use.
    pub fn add_action(&mut self, action: Action) {
        self.instructions
            .get_or_insert_with(InstructionSet::default)
            .push(action);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn table_id(&self) -> u8 {
        self.table_id
    }

    pub fn priority(&self) -> Option<u16> {
        self.priority
    }

    pub fn cookie(&self) -> Option<u64> {
        self.cookie
    }

    pub fn cookie_mask(&self) -> Option<u64> {
        self.cookie_mask
    }

    pub fn idle_timeout(&self) -> Option<u16> {
        self.idle_timeout
    }

    pub fn hard_timeout(&self) -> Option<u16> {
        self.hard_timeout
    }

    pub fn flags(&self) -> Option<&str> {
        self.flags.as_deref()
    }

    pub fn flow_name(&self) -> Option<&str> {
        self.flow_name.as_deref()
    }

    pub fn get_match(&self) -> Option<&Match> {
        self.flow_match.as_ref()
    }

    pub fn instructions(&self) -> Option<&InstructionSet> {
        self.instructions.as_ref()
    }

    /// Returns true if the entry has no instructions, i.e. drops every
    /// matching packet.
    pub fn is_drop(&self) -> bool {
        self.instructions.is_none()
    }

    /// Encodes the entry into the controller's wire document.
    pub fn to_wire(&self) -> FlowResult<serde_json::Value> {
        wire::encode(self)
    }
}

impl fmt::Display for FlowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FlowEntry({}, table={}, priority={}, actions={})",
            self.id,
            self.table_id,
            self.priority
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.instructions.as_ref().map_or(0, InstructionSet::len)
        )
    }
}

/// Flow ids are strings on the wire; description files may write them as integers.
fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Unsigned(id) => id.to_string(),
        RawId::Signed(id) => id.to_string(),
    })
}
