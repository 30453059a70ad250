//! Scenario spec types: what a scenario file declares.
//!
//! Entities are referenced by declaration index throughout (parents, effect
//! targets, entity-valued properties); declaration 0 is always the root.
//! Parents must point at earlier declarations, which rules out ownership
//! cycles before the tree is ever built.

use std::collections::BTreeMap;

use fabula_core::TickPolicy;

/// A complete scenario: the entity tree plus its legal-action menu.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioSpec {
    pub name: String,

    /// When the driver broadcasts ticks; scenarios disagree, so each one
    /// declares its own policy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_policy: TickPolicy,

    /// Entity declarations; index 0 is the root.
    pub entities: Vec<EntitySpec>,

    /// Literal command string to verb, the whole menu of legal actions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub actions: BTreeMap<String, VerbSpec>,
}

/// One entity declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySpec {
    pub name: String,

    /// Declaration index of the parent. Ignored for the root; defaults to
    /// the root for everything else. Must point at an earlier declaration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<usize>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub properties: BTreeMap<String, ValueSpec>,

    /// Present when the entity is a container.
    #[cfg_attr(feature = "serde", serde(default))]
    pub container: Option<ContainerBlock>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub behavior: BehaviorSpec,
}

impl EntitySpec {
    /// A bare named entity with all defaults.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            properties: BTreeMap::new(),
            container: None,
            behavior: BehaviorSpec::Inert,
        }
    }

    pub fn under(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: ValueSpec) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_container(mut self, container: ContainerBlock) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorSpec) -> Self {
        self.behavior = behavior;
        self
    }
}

/// Property values as written in scenario files. `Ref` points at an entity
/// declaration index and resolves to an entity reference at build time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueSpec {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Ref(usize),
}

/// Container flags for an entity declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerBlock {
    #[cfg_attr(feature = "serde", serde(default))]
    pub openable: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_open"))]
    pub open: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_prefix"))]
    pub prefix: String,
}

impl Default for ContainerBlock {
    fn default() -> Self {
        Self {
            openable: false,
            open: true,
            prefix: "in".to_owned(),
        }
    }
}

#[cfg(feature = "serde")]
fn default_open() -> bool {
    true
}

#[cfg(feature = "serde")]
fn default_prefix() -> String {
    "in".to_owned()
}

/// Reusable tick/describe behaviors a declaration can attach.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorSpec {
    /// No-op tick, name-only description.
    #[default]
    Inert,
    /// Adds `step` to the integer property `key` on every tick.
    Accumulator { key: String, step: i64 },
    /// Spawns a child named `child_name` every `every` ticks, counting ticks
    /// in the integer property `counter_key`.
    Spawner {
        child_name: String,
        every: u64,
        counter_key: String,
    },
    /// Composite description: header line, then each child's rendering
    /// indented underneath.
    Report {
        #[cfg_attr(feature = "serde", serde(default))]
        header: Option<String>,
    },
}

/// A verb as declared in a scenario's action menu.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerbSpec {
    /// Render only; mutates nothing.
    Look,
    /// Broadcast one tick across the whole tree.
    Tick,
    /// Apply a literal effect list in order.
    Script(Vec<EffectSpec>),
}

/// Declarative mutations a scripted verb applies. Targets are entity
/// declaration indices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSpec {
    /// Overwrite one property on the target.
    Set {
        target: usize,
        key: String,
        value: ValueSpec,
    },
    /// Add `amount` to an integer property, treating absent as zero.
    Add {
        target: usize,
        key: String,
        amount: i64,
    },
    /// Reparent the target under `dest`.
    MoveTo { target: usize, dest: usize },
    /// Gated container transitions; failures are logged and ignored.
    Open { target: usize },
    Close { target: usize },
    /// Detach the target and free its subtree.
    Despawn { target: usize },
    /// Broadcast one tick, same as the built-in tick verb.
    Broadcast,
}
