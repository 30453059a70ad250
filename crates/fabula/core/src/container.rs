//! Container flags and the open/close gate.
//!
//! A container is structurally just an entity: the specialization lives
//! entirely in four descriptive properties plus two gated transitions.
//! Most containers in practice never set `is_openable`, but the gate is kept
//! for interface compatibility with the generic node type.

use crate::property::PropertyValue;
use crate::scene::{EntityId, Scene};

/// Property key marking an entity as a container.
pub const IS_CONTAINER: &str = "is_container";
/// Property key gating the open/close transitions.
pub const IS_OPENABLE: &str = "is_openable";
/// Property key holding the current open/closed state.
pub const IS_OPEN: &str = "is_open";
/// Property key for the containment preposition used in descriptions.
pub const CONTAINER_PREFIX: &str = "container_prefix";

/// Failure results of the two gated transitions. Failures never mutate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("it is not something that opens")]
    NotOpenable,
    #[error("it is already open")]
    AlreadyOpen,
    #[error("it is already closed")]
    AlreadyClosed,
}

/// Descriptive flags applied when an entity becomes a container.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerSpec {
    pub openable: bool,
    pub open: bool,
    pub prefix: String,
}

impl ContainerSpec {
    pub fn new() -> Self {
        Self {
            openable: false,
            open: true,
            prefix: "in".to_owned(),
        }
    }

    pub fn openable(mut self) -> Self {
        self.openable = true;
        self
    }

    pub fn closed(mut self) -> Self {
        self.open = false;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl Default for ContainerSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Marks a live entity as a container with the given flags.
    pub fn make_container(&mut self, id: EntityId, spec: ContainerSpec) {
        if !self.contains(id) {
            return;
        }
        self.set_property(id, IS_CONTAINER, true);
        self.set_property(id, IS_OPENABLE, spec.openable);
        self.set_property(id, IS_OPEN, spec.open);
        self.set_property(id, CONTAINER_PREFIX, spec.prefix);
    }

    /// Spawns a detached container entity.
    pub fn spawn_container(&mut self, name: impl Into<String>, spec: ContainerSpec) -> EntityId {
        let id = self.spawn(name);
        self.make_container(id, spec);
        id
    }

    pub fn is_container(&self, id: EntityId) -> bool {
        self.bool_property(id, IS_CONTAINER).unwrap_or(false)
    }

    pub fn is_openable(&self, id: EntityId) -> bool {
        self.bool_property(id, IS_OPENABLE).unwrap_or(false)
    }

    /// Containers default to open; anything else reads as closed.
    pub fn is_open(&self, id: EntityId) -> bool {
        self.bool_property(id, IS_OPEN).unwrap_or(false)
    }

    /// Containment preposition, `"in"` when unset.
    pub fn container_prefix(&self, id: EntityId) -> &str {
        self.property(id, CONTAINER_PREFIX)
            .and_then(PropertyValue::as_text)
            .unwrap_or("in")
    }

    /// Opens a container: fails without mutating unless it is openable and
    /// currently closed.
    pub fn open(&mut self, id: EntityId) -> Result<(), ContainerError> {
        if !self.is_openable(id) {
            return Err(ContainerError::NotOpenable);
        }
        if self.is_open(id) {
            return Err(ContainerError::AlreadyOpen);
        }
        self.set_property(id, IS_OPEN, true);
        Ok(())
    }

    /// Closes a container: symmetric to [`Scene::open`].
    pub fn close(&mut self, id: EntityId) -> Result<(), ContainerError> {
        if !self.is_openable(id) {
            return Err(ContainerError::NotOpenable);
        }
        if !self.is_open(id) {
            return Err(ContainerError::AlreadyClosed);
        }
        self.set_property(id, IS_OPEN, false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_descriptive_flags() {
        let mut scene = Scene::new();
        let dish = scene.spawn_container("dish", ContainerSpec::new());

        assert!(scene.is_container(dish));
        assert!(!scene.is_openable(dish));
        assert!(scene.is_open(dish));
        assert_eq!(scene.container_prefix(dish), "in");
    }

    #[test]
    fn non_openable_containers_reject_both_transitions() {
        let mut scene = Scene::new();
        let dish = scene.spawn_container("dish", ContainerSpec::new());

        assert_eq!(scene.open(dish), Err(ContainerError::NotOpenable));
        assert_eq!(scene.close(dish), Err(ContainerError::NotOpenable));
        assert!(scene.is_open(dish));
    }

    #[test]
    fn open_close_walk_the_two_state_machine() {
        let mut scene = Scene::new();
        let vial = scene.spawn_container("vial", ContainerSpec::new().openable().closed());

        assert_eq!(scene.close(vial), Err(ContainerError::AlreadyClosed));
        assert_eq!(scene.open(vial), Ok(()));
        assert!(scene.is_open(vial));
        assert_eq!(scene.open(vial), Err(ContainerError::AlreadyOpen));
        assert_eq!(scene.close(vial), Ok(()));
        assert!(!scene.is_open(vial));
    }

    #[test]
    fn plain_entities_are_not_containers() {
        let mut scene = Scene::new();
        let cell = scene.spawn("cell");

        assert!(!scene.is_container(cell));
        assert_eq!(scene.open(cell), Err(ContainerError::NotOpenable));
        assert_eq!(scene.container_prefix(cell), "in");
    }
}
