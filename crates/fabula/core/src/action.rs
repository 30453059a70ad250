//! Verb handlers and the literal-string action table.
//!
//! Scenarios register an exact-match command string per legal action; the
//! driver dispatches to the registered [`Verb`]. The verb vocabulary is
//! closed per scenario: the core ships only the two universal built-ins,
//! render-only "look" and broadcast-only "tick".

use std::collections::HashMap;
use std::fmt;

use crate::scene::{EntityId, Scene};

/// One dispatchable verb handler.
///
/// Handlers receive the whole scene plus the root and mutate entity state
/// directly; a handler that wants a tree-wide tick calls
/// [`Scene::broadcast_tick`] itself (broadcasting is never a `step` rule).
pub trait Verb {
    fn invoke(&self, scene: &mut Scene, root: EntityId);
}

/// Adapter turning a plain closure into a [`Verb`].
pub struct FnVerb<F>(F);

impl<F> FnVerb<F>
where
    F: Fn(&mut Scene, EntityId),
{
    pub fn new(handler: F) -> Self {
        Self(handler)
    }
}

impl<F> Verb for FnVerb<F>
where
    F: Fn(&mut Scene, EntityId),
{
    fn invoke(&self, scene: &mut Scene, root: EntityId) {
        (self.0)(scene, root)
    }
}

/// Render-only verb: mutates nothing, the driver re-renders afterwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct Look;

impl Verb for Look {
    fn invoke(&self, _scene: &mut Scene, _root: EntityId) {}
}

/// Broadcast-only verb: one tick across the whole tree, no other side effect.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tick;

impl Verb for Tick {
    fn invoke(&self, scene: &mut Scene, root: EntityId) {
        scene.broadcast_tick(root);
    }
}

/// Names for the built-in verbs, convertible to and from their literal
/// command strings.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VerbKind {
    Look,
    Tick,
}

impl VerbKind {
    /// Instantiates the built-in handler for this kind.
    pub fn verb(self) -> Box<dyn Verb> {
        match self {
            Self::Look => Box::new(Look),
            Self::Tick => Box::new(Tick),
        }
    }
}

/// Mapping from exact literal command strings to verb handlers.
#[derive(Default)]
pub struct ActionTable {
    entries: HashMap<String, Box<dyn Verb>>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `verb` under `command`, replacing any previous handler.
    pub fn insert(&mut self, command: impl Into<String>, verb: impl Verb + 'static) {
        self.insert_boxed(command, Box::new(verb));
    }

    /// Registers an already-boxed handler.
    pub fn insert_boxed(&mut self, command: impl Into<String>, verb: Box<dyn Verb>) {
        self.entries.insert(command.into(), verb);
    }

    /// Registers a closure as a verb handler.
    pub fn insert_fn(
        &mut self,
        command: impl Into<String>,
        handler: impl Fn(&mut Scene, EntityId) + 'static,
    ) {
        self.insert(command, FnVerb::new(handler));
    }

    /// Builder-style [`ActionTable::insert_fn`].
    pub fn with_fn(
        mut self,
        command: impl Into<String>,
        handler: impl Fn(&mut Scene, EntityId) + 'static,
    ) -> Self {
        self.insert_fn(command, handler);
        self
    }

    /// Builder-style [`ActionTable::insert`].
    pub fn with(mut self, command: impl Into<String>, verb: impl Verb + 'static) -> Self {
        self.insert(command, verb);
        self
    }

    /// Registers a built-in verb under its canonical command string.
    pub fn with_builtin(mut self, kind: VerbKind) -> Self {
        self.insert_boxed(kind.to_string(), kind.verb());
        self
    }

    pub fn get(&self, command: &str) -> Option<&dyn Verb> {
        self.entries.get(command).map(|verb| verb.as_ref())
    }

    pub fn contains(&self, command: &str) -> bool {
        self.entries.contains_key(command)
    }

    /// Currently legal command strings, sorted for stable menus.
    pub fn commands(&self) -> Vec<&str> {
        let mut commands: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        commands.sort_unstable();
        commands
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ActionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTable")
            .field("commands", &self.commands())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_use_their_canonical_strings() {
        let table = ActionTable::new()
            .with_builtin(VerbKind::Look)
            .with_builtin(VerbKind::Tick);

        assert!(table.contains("look"));
        assert!(table.contains("tick"));
        assert!(!table.contains("frobnicate"));
        assert_eq!(table.commands(), vec!["look", "tick"]);
    }

    #[test]
    fn closures_are_verbs() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let table = ActionTable::new().with_fn("poke", |scene, root| {
            scene.set_property(root, "poked", true);
        });

        table.get("poke").unwrap().invoke(&mut scene, root);
        assert_eq!(scene.bool_property(root, "poked"), Some(true));
    }

    #[test]
    fn look_mutates_nothing() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        scene.set_property(root, "p", 0i64);

        Look.invoke(&mut scene, root);
        assert_eq!(scene.int_property(root, "p"), Some(0));
        assert_eq!(scene.len(), 1);
    }
}
