use forge_core::errors::{ForgeError, Result};
use forge_core::handles::{ActionKey, NodeHandle};
use slotmap::{SecondaryMap, SlotMap};

use crate::action::Action;

/// Every action created during a pass, plus the active action of each
/// animated node.
#[derive(Debug, Default)]
pub struct AnimationLibrary {
    actions: SlotMap<ActionKey, Action>,
    active: SecondaryMap<NodeHandle, ActionKey>,
}

impl AnimationLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty action and makes it `target`'s active action.
    ///
    /// Existing actions are never reused. A name already in the library
    /// gets a numeric suffix.
    pub fn create_action(&mut self, name: &str, target: NodeHandle) -> ActionKey {
        let name = self.unique_name(name);
        let key = self.actions.insert(Action::new(name, target));
        if let Some(previous) = self.active.insert(target, key) {
            log::debug!(
                "Action `{}` replaces {previous:?} as the active action of {target:?}",
                self.actions[key].name
            );
        }
        key
    }

    #[must_use]
    pub fn get(&self, key: ActionKey) -> Option<&Action> {
        self.actions.get(key)
    }

    pub fn get_mut(&mut self, key: ActionKey) -> Option<&mut Action> {
        self.actions.get_mut(key)
    }

    pub fn require_mut(&mut self, key: ActionKey) -> Result<&mut Action> {
        self.actions
            .get_mut(key)
            .ok_or_else(|| ForgeError::InvalidParameter(format!("unknown action {key:?}")))
    }

    #[must_use]
    pub fn active_action(&self, target: NodeHandle) -> Option<ActionKey> {
        self.active.get(target).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKey, &Action)> {
        self.actions.iter()
    }

    /// Actions whose target is `target`, oldest first.
    pub fn actions_for(&self, target: NodeHandle) -> impl Iterator<Item = (ActionKey, &Action)> {
        self.actions.iter().filter(move |(_, a)| a.target == target)
    }

    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.actions.values().map(Action::keyframe_count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |name: &str| self.actions.values().any(|a| a.name == name);
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{base}.{i:03}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}
