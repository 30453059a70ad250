//! Deterministic entity-tree object model and simulation driver.
//!
//! `fabula-core` defines the canonical ownership-tree abstraction (scene,
//! entities, property bags, container flags) and the turn-based driver that
//! dispatches literal action strings over it. All tree mutation flows through
//! [`scene::Scene`], and supporting crates depend on the types re-exported
//! here.
pub mod action;
pub mod behavior;
pub mod config;
pub mod container;
pub mod engine;
pub mod property;
pub mod scene;

pub use action::{ActionTable, FnVerb, Look, Tick, Verb, VerbKind};
pub use behavior::{Behavior, Inert};
pub use config::{SimConfig, TickPolicy};
pub use container::{ContainerError, ContainerSpec};
pub use engine::{ActionGenerator, Simulation, UNKNOWN_ACTION};
pub use property::PropertyValue;
pub use scene::{EntityId, Scene};
