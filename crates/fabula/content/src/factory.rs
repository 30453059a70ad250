//! Instantiates scenario specs into live simulations.

use fabula_core::{
    ActionTable, Behavior, ContainerSpec, EntityId, Inert, PropertyValue, Scene, SimConfig,
    Simulation, VerbKind,
};

use crate::behaviors::{Accumulator, Report, Spawner};
use crate::effects::{Effect, ScriptedVerb};
use crate::scenario::{BehaviorSpec, EffectSpec, EntitySpec, ScenarioSpec, ValueSpec, VerbSpec};

/// Structural problems in a scenario spec, caught before anything is built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error("scenario declares no entities")]
    Empty,

    #[error("entity {index} ({name:?}) references parent {parent}, which is not an earlier declaration")]
    BadParent {
        index: usize,
        name: String,
        parent: usize,
    },

    #[error("the root entity (declaration 0) must not declare a parent")]
    RootWithParent,

    #[error("property {key:?} on entity {index} references undeclared entity {reference}")]
    BadPropertyRef {
        index: usize,
        key: String,
        reference: usize,
    },

    #[error("action {command:?} references undeclared entity {target}")]
    BadTarget { command: String, target: usize },
}

/// Builds scenes, action tables, and drivers from scenario specs.
pub struct ScenarioFactory;

impl ScenarioFactory {
    /// Instantiates a complete driver from a spec.
    pub fn build(spec: &ScenarioSpec) -> Result<Simulation, ScenarioError> {
        let (scene, ids) = Self::build_scene(spec)?;
        let root = ids[0];
        let actions = Self::build_actions(spec, &ids)?;

        tracing::info!(
            scenario = %spec.name,
            entities = ids.len(),
            actions = actions.len(),
            tick_policy = %spec.tick_policy,
            "scenario instantiated"
        );

        let config = SimConfig::new().with_tick_policy(spec.tick_policy);
        Ok(Simulation::new(scene, root, actions).with_config(config))
    }

    /// Builds just the entity tree, returning the scene and the id assigned
    /// to each declaration (index-aligned with `spec.entities`).
    pub fn build_scene(spec: &ScenarioSpec) -> Result<(Scene, Vec<EntityId>), ScenarioError> {
        if spec.entities.is_empty() {
            return Err(ScenarioError::Empty);
        }
        if spec.entities[0].parent.is_some() {
            return Err(ScenarioError::RootWithParent);
        }

        let mut scene = Scene::new();
        let mut ids = Vec::with_capacity(spec.entities.len());

        for (index, entity) in spec.entities.iter().enumerate() {
            let id = scene.spawn(entity.name.clone());
            if index > 0 {
                // Parents point at earlier declarations only, so cycles
                // cannot be declared.
                let parent = entity.parent.unwrap_or(0);
                if parent >= index {
                    return Err(ScenarioError::BadParent {
                        index,
                        name: entity.name.clone(),
                        parent,
                    });
                }
                scene.add_child(ids[parent], id);
            }
            ids.push(id);
        }

        for (index, entity) in spec.entities.iter().enumerate() {
            Self::apply_declaration(&mut scene, entity, index, &ids)?;
        }

        Ok((scene, ids))
    }

    fn apply_declaration(
        scene: &mut Scene,
        entity: &EntitySpec,
        index: usize,
        ids: &[EntityId],
    ) -> Result<(), ScenarioError> {
        let id = ids[index];
        for (key, value) in &entity.properties {
            let resolved = match value {
                ValueSpec::Bool(v) => PropertyValue::Bool(*v),
                ValueSpec::Int(v) => PropertyValue::Int(*v),
                ValueSpec::Float(v) => PropertyValue::Float(*v),
                ValueSpec::Text(v) => PropertyValue::Text(v.clone()),
                ValueSpec::Ref(reference) => {
                    let target =
                        ids.get(*reference)
                            .copied()
                            .ok_or_else(|| ScenarioError::BadPropertyRef {
                                index,
                                key: key.clone(),
                                reference: *reference,
                            })?;
                    PropertyValue::Entity(target)
                }
            };
            scene.set_property(id, key.clone(), resolved);
        }

        if let Some(container) = &entity.container {
            let mut container_spec = ContainerSpec::new().prefix(container.prefix.clone());
            if container.openable {
                container_spec = container_spec.openable();
            }
            if !container.open {
                container_spec = container_spec.closed();
            }
            scene.make_container(id, container_spec);
        }

        scene.set_behavior(id, Self::instantiate_behavior(&entity.behavior));
        Ok(())
    }

    fn instantiate_behavior(behavior: &BehaviorSpec) -> Box<dyn Behavior> {
        match behavior {
            BehaviorSpec::Inert => Box::new(Inert),
            BehaviorSpec::Accumulator { key, step } => Box::new(Accumulator::new(key.clone(), *step)),
            BehaviorSpec::Spawner {
                child_name,
                every,
                counter_key,
            } => Box::new(Spawner::new(child_name.clone(), *every, counter_key.clone())),
            BehaviorSpec::Report { header } => match header {
                Some(header) => Box::new(Report::with_header(header.clone())),
                None => Box::new(Report::new()),
            },
        }
    }

    /// Builds the action table for a spec against already-assigned ids.
    pub fn build_actions(
        spec: &ScenarioSpec,
        ids: &[EntityId],
    ) -> Result<ActionTable, ScenarioError> {
        let mut table = ActionTable::new();
        for (command, verb) in &spec.actions {
            match verb {
                VerbSpec::Look => table.insert_boxed(command.clone(), VerbKind::Look.verb()),
                VerbSpec::Tick => table.insert_boxed(command.clone(), VerbKind::Tick.verb()),
                VerbSpec::Script(effects) => {
                    let mut resolved = Vec::with_capacity(effects.len());
                    for effect in effects {
                        resolved.push(Self::resolve_effect(command, effect, ids)?);
                    }
                    table.insert(command.clone(), ScriptedVerb::new(resolved));
                }
            }
        }
        Ok(table)
    }

    fn resolve_effect(
        command: &str,
        effect: &EffectSpec,
        ids: &[EntityId],
    ) -> Result<Effect, ScenarioError> {
        let resolve = |target: usize| {
            ids.get(target)
                .copied()
                .ok_or_else(|| ScenarioError::BadTarget {
                    command: command.to_owned(),
                    target,
                })
        };
        Ok(match effect {
            EffectSpec::Set { target, key, value } => {
                let target = resolve(*target)?;
                let value = match value {
                    ValueSpec::Bool(v) => PropertyValue::Bool(*v),
                    ValueSpec::Int(v) => PropertyValue::Int(*v),
                    ValueSpec::Float(v) => PropertyValue::Float(*v),
                    ValueSpec::Text(v) => PropertyValue::Text(v.clone()),
                    ValueSpec::Ref(reference) => PropertyValue::Entity(resolve(*reference)?),
                };
                Effect::Set {
                    target,
                    key: key.clone(),
                    value,
                }
            }
            EffectSpec::Add {
                target,
                key,
                amount,
            } => Effect::Add {
                target: resolve(*target)?,
                key: key.clone(),
                amount: *amount,
            },
            EffectSpec::MoveTo { target, dest } => Effect::MoveTo {
                target: resolve(*target)?,
                dest: resolve(*dest)?,
            },
            EffectSpec::Open { target } => Effect::Open {
                target: resolve(*target)?,
            },
            EffectSpec::Close { target } => Effect::Close {
                target: resolve(*target)?,
            },
            EffectSpec::Despawn { target } => Effect::Despawn {
                target: resolve(*target)?,
            },
            EffectSpec::Broadcast => Effect::Broadcast,
        })
    }
}
