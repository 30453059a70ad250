//! Data-driven scenario definitions and loaders.
//!
//! This crate houses everything a scenario script declares around the core
//! object model:
//! - Scenario specs (entity declarations, action menus) with RON loaders
//! - Driver configuration (TOML)
//! - A small library of reusable tick/describe behaviors
//! - A declarative effect vocabulary for scripted verbs
//!
//! Specs are plain data; [`factory::ScenarioFactory`] instantiates them into
//! a live [`fabula_core::Simulation`].

pub mod behaviors;
pub mod effects;
pub mod factory;
pub mod scenario;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use behaviors::{Accumulator, Report, Spawner};
pub use effects::{Effect, ScriptedVerb};
pub use factory::{ScenarioError, ScenarioFactory};
pub use scenario::{BehaviorSpec, ContainerBlock, EffectSpec, EntitySpec, ScenarioSpec, ValueSpec, VerbSpec};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ScenarioLoader};
