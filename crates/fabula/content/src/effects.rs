//! Resolved effects and the scripted verb that applies them.
//!
//! [`crate::scenario::EffectSpec`] is what scenario files write;
//! [`Effect`] is the same vocabulary with declaration indices resolved to
//! live entity ids, applied in order by [`ScriptedVerb`].

use fabula_core::{EntityId, PropertyValue, Scene, Verb};

/// One resolved, atomic mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Set {
        target: EntityId,
        key: String,
        value: PropertyValue,
    },
    Add {
        target: EntityId,
        key: String,
        amount: i64,
    },
    MoveTo {
        target: EntityId,
        dest: EntityId,
    },
    Open {
        target: EntityId,
    },
    Close {
        target: EntityId,
    },
    Despawn {
        target: EntityId,
    },
    Broadcast,
}

impl Effect {
    /// Applies this effect to the scene.
    ///
    /// Container gate refusals are a normal outcome of scripted verbs, not
    /// driver errors; they are logged and otherwise ignored.
    pub fn apply(&self, scene: &mut Scene, root: EntityId) {
        match self {
            Self::Set { target, key, value } => {
                scene.set_property(*target, key.clone(), value.clone());
            }
            Self::Add {
                target,
                key,
                amount,
            } => {
                let next = scene.int_property(*target, key).unwrap_or(0) + amount;
                scene.set_property(*target, key.clone(), next);
            }
            Self::MoveTo { target, dest } => {
                scene.add_child(*dest, *target);
            }
            Self::Open { target } => {
                if let Err(refusal) = scene.open(*target) {
                    tracing::debug!(%target, %refusal, "open effect refused");
                }
            }
            Self::Close { target } => {
                if let Err(refusal) = scene.close(*target) {
                    tracing::debug!(%target, %refusal, "close effect refused");
                }
            }
            Self::Despawn { target } => {
                scene.despawn(*target);
            }
            Self::Broadcast => {
                scene.broadcast_tick(root);
            }
        }
    }
}

/// A verb handler that applies a literal effect list in order.
#[derive(Clone, Debug, Default)]
pub struct ScriptedVerb {
    effects: Vec<Effect>,
}

impl ScriptedVerb {
    pub fn new(effects: Vec<Effect>) -> Self {
        Self { effects }
    }
}

impl Verb for ScriptedVerb {
    fn invoke(&self, scene: &mut Scene, root: EntityId) {
        for effect in &self.effects {
            effect.apply(scene, root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_core::ContainerSpec;

    #[test]
    fn scripted_verb_applies_effects_in_order() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let cell = scene.spawn_child(root, "cell");

        let verb = ScriptedVerb::new(vec![
            Effect::Set {
                target: cell,
                key: "p".to_owned(),
                value: PropertyValue::Int(10),
            },
            Effect::Add {
                target: cell,
                key: "p".to_owned(),
                amount: -3,
            },
        ]);
        verb.invoke(&mut scene, root);

        assert_eq!(scene.int_property(cell, "p"), Some(7));
    }

    #[test]
    fn add_treats_absent_as_zero() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        Effect::Add {
            target: root,
            key: "p".to_owned(),
            amount: 5,
        }
        .apply(&mut scene, root);
        assert_eq!(scene.int_property(root, "p"), Some(5));
    }

    #[test]
    fn move_to_reparents() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let dish = scene.spawn_child(root, "dish");
        let cell = scene.spawn_child(root, "cell");

        Effect::MoveTo {
            target: cell,
            dest: dish,
        }
        .apply(&mut scene, root);

        assert_eq!(scene.parent(cell), Some(dish));
        assert_eq!(scene.children(root), &[dish]);
    }

    #[test]
    fn refused_open_leaves_state_alone() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let dish = scene.spawn_child(root, "dish");
        scene.make_container(dish, ContainerSpec::new());

        Effect::Open { target: dish }.apply(&mut scene, root);
        assert!(scene.is_open(dish));

        Effect::Close { target: dish }.apply(&mut scene, root);
        assert!(scene.is_open(dish));
    }
}
