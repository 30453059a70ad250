//! Arena-backed entity ownership tree.
//!
//! The [`Scene`] owns every entity for the lifetime of a simulation and is
//! the only mutation surface: verbs and tick hooks reparent, despawn, and
//! rewrite property bags exclusively through it. Parent links are plain ids
//! rather than owning references, so the tree carries no reference cycles.
//!
//! Entity ids are allocated sequentially and never reused; a despawned id
//! simply resolves to nothing from then on.

use std::collections::BTreeMap;
use std::fmt;

use crate::behavior::{Behavior, Inert};
use crate::property::PropertyValue;

/// Unique identifier for any entity tracked in a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Storage for one live entity.
struct Node {
    name: String,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    properties: BTreeMap<String, PropertyValue>,
    behavior: Box<dyn Behavior>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// The ownership tree: every entity of one simulation, flat-stored by id.
///
/// # Invariants
///
/// - A non-root entity appears in exactly one parent's child list, and that
///   parent is the one its back-reference names.
/// - Child lists preserve insertion order; pre-order traversal follows it.
/// - No cycle detection is performed. Callers must not reparent an entity
///   underneath its own subtree (documented limitation).
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `id` names a live entity.
    pub fn contains(&self, id: EntityId) -> bool {
        self.node(id).is_some()
    }

    // ===== creation =====

    /// Spawns a detached entity with the default do-nothing behavior.
    pub fn spawn(&mut self, name: impl Into<String>) -> EntityId {
        self.spawn_with(name, Box::new(Inert))
    }

    /// Spawns a detached entity with an explicit behavior.
    pub fn spawn_with(&mut self, name: impl Into<String>, behavior: Box<dyn Behavior>) -> EntityId {
        let id = EntityId(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            properties: BTreeMap::new(),
            behavior,
        }));
        id
    }

    /// Spawns an entity directly under `parent`.
    pub fn spawn_child(&mut self, parent: EntityId, name: impl Into<String>) -> EntityId {
        let id = self.spawn(name);
        self.add_child(parent, id);
        id
    }

    /// Replaces the behavior hook of a live entity.
    pub fn set_behavior(&mut self, id: EntityId, behavior: Box<dyn Behavior>) {
        if let Some(node) = self.node_mut(id) {
            node.behavior = behavior;
        }
    }

    // ===== structure =====

    /// Entity name. Names are not required to be unique within a tree.
    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.node(id).map(|node| node.name.as_str())
    }

    /// Parent back-reference, `None` for roots and dead ids.
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Immediate children in insertion order; empty for leaves and dead ids.
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Moves `child` under `parent`, detaching it from any previous parent
    /// first. An entity is never a child of two parents at once.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        if let Some(previous) = self.parent(child) {
            self.remove_child(previous, child);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Removes `child` from `parent`'s child list and clears its
    /// back-reference. Idempotent: a no-op when `child` is not present.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) {
        let removed = match self.node_mut(parent) {
            Some(node) => {
                let before = node.children.len();
                node.children.retain(|&existing| existing != child);
                node.children.len() != before
            }
            None => false,
        };
        if removed {
            if let Some(node) = self.node_mut(child) {
                node.parent = None;
            }
        }
    }

    /// Detaches `id` from its parent; a no-op for roots.
    pub fn detach(&mut self, id: EntityId) {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
    }

    /// Detaches `id` and frees its entire subtree.
    pub fn despawn(&mut self, id: EntityId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(slot) = self.nodes.get_mut(next.0 as usize) {
                if let Some(node) = slot.take() {
                    stack.extend(node.children);
                }
            }
        }
    }

    /// Pre-order flattening of the subtree under `id`, excluding `id` itself:
    /// each child's full subtree before the next sibling. The returned list is
    /// materialized, so mutation during iteration never shifts the order.
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Every immediate child of `id` named `name` (not recursive). Zero, one,
    /// and many matches are all legal outcomes.
    pub fn children_by_name(&self, id: EntityId, name: &str) -> Vec<EntityId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.name(child) == Some(name))
            .collect()
    }

    // ===== property bag =====

    /// Pure property lookup; `None` when the key or the entity is absent.
    pub fn property(&self, id: EntityId, key: &str) -> Option<&PropertyValue> {
        self.node(id).and_then(|node| node.properties.get(key))
    }

    /// Writes one property. A no-op for dead ids.
    pub fn set_property(
        &mut self,
        id: EntityId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) {
        if let Some(node) = self.node_mut(id) {
            node.properties.insert(key.into(), value.into());
        }
    }

    /// Iterates the property bag in key order.
    pub fn properties(&self, id: EntityId) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.properties.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn bool_property(&self, id: EntityId, key: &str) -> Option<bool> {
        self.property(id, key).and_then(PropertyValue::as_bool)
    }

    pub fn int_property(&self, id: EntityId, key: &str) -> Option<i64> {
        self.property(id, key).and_then(PropertyValue::as_int)
    }

    pub fn float_property(&self, id: EntityId, key: &str) -> Option<f64> {
        self.property(id, key).and_then(PropertyValue::as_float)
    }

    pub fn text_property(&self, id: EntityId, key: &str) -> Option<&str> {
        self.property(id, key).and_then(PropertyValue::as_text)
    }

    pub fn entity_property(&self, id: EntityId, key: &str) -> Option<EntityId> {
        self.property(id, key).and_then(PropertyValue::as_entity)
    }

    // ===== hooks =====

    /// Renders `id` through its `describe` hook; empty for dead ids.
    pub fn render(&self, id: EntityId) -> String {
        match self.node(id) {
            Some(node) => node.behavior.describe(id, self),
            None => String::new(),
        }
    }

    /// Broadcasts one tick over the subtree under `root` in pre-order.
    ///
    /// The traversal list is snapshotted before iteration: entities spawned by
    /// a hook mid-broadcast do not participate in the broadcast that spawned
    /// them, and entities despawned mid-broadcast are skipped when their turn
    /// comes.
    pub fn broadcast_tick(&mut self, root: EntityId) {
        for id in self.descendants(root) {
            let Some(mut behavior) = self.take_behavior(id) else {
                continue;
            };
            behavior.tick(id, self);
            self.restore_behavior(id, behavior);
        }
    }

    // While a hook runs, its slot temporarily holds the inert behavior so the
    // hook can re-enter the scene (spawn, reparent, render) without aliasing
    // itself.
    fn take_behavior(&mut self, id: EntityId) -> Option<Box<dyn Behavior>> {
        self.node_mut(id)
            .map(|node| std::mem::replace(&mut node.behavior, Box::new(Inert)))
    }

    fn restore_behavior(&mut self, id: EntityId, behavior: Box<dyn Behavior>) {
        // The hook may have despawned its own entity; the behavior is dropped
        // with it in that case.
        if let Some(node) = self.node_mut(id) {
            node.behavior = behavior;
        }
    }

    fn node(&self, id: EntityId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    fn node_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(|slot| slot.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_child_enforces_single_parent() {
        let mut scene = Scene::new();
        let first = scene.spawn("first");
        let second = scene.spawn("second");
        let child = scene.spawn("child");

        scene.add_child(first, child);
        assert_eq!(scene.parent(child), Some(first));

        scene.add_child(second, child);
        assert_eq!(scene.parent(child), Some(second));
        assert!(scene.children(first).is_empty());
        assert_eq!(scene.children(second), &[child]);
    }

    #[test]
    fn remove_child_is_idempotent() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let child = scene.spawn_child(root, "child");
        let stranger = scene.spawn("stranger");

        scene.remove_child(root, stranger);
        assert_eq!(scene.children(root), &[child]);

        scene.remove_child(root, child);
        scene.remove_child(root, child);
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.parent(child), None);
    }

    #[test]
    fn detach_is_a_noop_for_roots() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        scene.detach(root);
        assert!(scene.contains(root));
        assert_eq!(scene.parent(root), None);
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let a = scene.spawn_child(root, "a");
        let b = scene.spawn_child(root, "b");
        let c = scene.spawn_child(a, "c");

        assert_eq!(scene.descendants(root), vec![a, c, b]);
        assert_eq!(scene.descendants(a), vec![c]);
        assert!(scene.descendants(b).is_empty());
    }

    #[test]
    fn children_by_name_matches_immediate_children_only() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let twin_one = scene.spawn_child(root, "twin");
        let twin_two = scene.spawn_child(root, "twin");
        let nested = scene.spawn_child(twin_one, "twin");

        let found = scene.children_by_name(root, "twin");
        assert_eq!(found, vec![twin_one, twin_two]);
        assert!(!found.contains(&nested));
        assert!(scene.children_by_name(root, "missing").is_empty());
    }

    #[test]
    fn despawn_frees_the_whole_subtree() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let branch = scene.spawn_child(root, "branch");
        let leaf = scene.spawn_child(branch, "leaf");

        scene.despawn(branch);
        assert!(!scene.contains(branch));
        assert!(!scene.contains(leaf));
        assert!(scene.contains(root));
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn dead_ids_resolve_to_nothing() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let gone = scene.spawn_child(root, "gone");
        scene.despawn(gone);

        assert_eq!(scene.name(gone), None);
        assert_eq!(scene.property(gone, "p"), None);
        scene.set_property(gone, "p", 1i64);
        assert_eq!(scene.property(gone, "p"), None);
        assert_eq!(scene.render(gone), "");
    }

    #[test]
    fn property_bag_round_trips_all_shapes() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let other = scene.spawn("other");

        scene.set_property(root, "alive", true);
        scene.set_property(root, "count", 3i64);
        scene.set_property(root, "dose", 0.5);
        scene.set_property(root, "label", "sample");
        scene.set_property(root, "target", other);

        assert_eq!(scene.bool_property(root, "alive"), Some(true));
        assert_eq!(scene.int_property(root, "count"), Some(3));
        assert_eq!(scene.float_property(root, "dose"), Some(0.5));
        assert_eq!(scene.text_property(root, "label"), Some("sample"));
        assert_eq!(scene.entity_property(root, "target"), Some(other));
        assert_eq!(scene.property(root, "absent"), None);
    }

    #[test]
    fn default_render_is_the_name() {
        let mut scene = Scene::new();
        let root = scene.spawn("dish");
        assert_eq!(scene.render(root), "dish");
        assert_eq!(scene.render(root), "dish");
    }
}
