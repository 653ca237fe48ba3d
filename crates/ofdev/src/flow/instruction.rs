//! Instruction set of a flow entry.
//!
//! Only the apply-actions instruction is modeled. An [`InstructionSet`]
//! always holds exactly one instruction, so there is no way to build a
//! multi-instruction pipeline (goto-table, write-actions, meters).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::action::Action;

/// The `apply-actions` container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyActions {
    #[serde(default)]
    action: Vec<Action>,
}

/// A single apply-actions instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    order: u32,
    apply_actions: ApplyActions,
}

/// Ordered list of actions applied immediately when the flow matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionSet {
    #[serde(with = "single_instruction")]
    instruction: Instruction,
}

impl InstructionSet {
    /// Creates an instruction set with an empty action list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action. Its `order` field, not its position, decides when
    /// it is applied.
    pub fn push(&mut self, action: Action) {
        self.instruction.apply_actions.action.push(action);
    }

    /// Appends an action, builder style.
    pub fn with_action(mut self, action: Action) -> Self {
        self.push(action);
        self
    }

    /// Returns the actions in insertion order.
    pub fn actions(&self) -> &[Action] {
        &self.instruction.apply_actions.action
    }

    /// Returns the actions in apply order (ascending `order`, ties kept in
    /// insertion order).
    pub fn sorted_actions(&self) -> Vec<&Action> {
        let mut actions: Vec<&Action> = self.actions().iter().collect();
        actions.sort_by_key(|action| action.order());
        actions
    }

    pub fn len(&self) -> usize {
        self.actions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions().is_empty()
    }
}

impl FromIterator<Action> for InstructionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = InstructionSet::new();
        for action in iter {
            set.push(action);
        }
        set
    }
}

/// The schema carries instructions as a list; this model allows exactly one.
mod single_instruction {
    use super::*;
    use serde::de::Error;

    pub fn serialize<S: Serializer>(
        instruction: &Instruction,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        std::slice::from_ref(instruction).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Instruction, D::Error> {
        let mut instructions = Vec::<Instruction>::deserialize(deserializer)?;
        match instructions.len() {
            1 => Ok(instructions.remove(0)),
            n => Err(D::Error::invalid_length(
                n,
                &"exactly one apply-actions instruction",
            )),
        }
    }
}
