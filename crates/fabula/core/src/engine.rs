//! The simulation driver: one tree, one action table, one observation.
//!
//! [`Simulation`] is the authoritative reducer for a scenario run. Every
//! state change flows through [`Simulation::step`]: dispatch the verb,
//! apply the configured tick policy, optionally regenerate the legal-action
//! menu, re-render the observation.

use crate::action::ActionTable;
use crate::config::{SimConfig, TickPolicy};
use crate::scene::{EntityId, Scene};

/// Fixed observation returned for any unrecognized action string.
///
/// This is the only error surface at this layer: unknown actions mutate
/// nothing and are never escalated.
pub const UNKNOWN_ACTION: &str = "I don't understand that.";

/// Scenario-supplied enumerator of the currently legal actions.
///
/// Re-invoked after mutating steps when
/// [`SimConfig::regenerate_actions`] is set, since legality can depend on
/// current tree state.
pub type ActionGenerator = Box<dyn Fn(&Scene, EntityId) -> ActionTable>;

/// Turn-based driver over a single entity tree.
pub struct Simulation {
    scene: Scene,
    root: EntityId,
    actions: ActionTable,
    generator: Option<ActionGenerator>,
    observation: String,
    config: SimConfig,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("root", &self.root)
            .field("observation", &self.observation)
            .field("actions", &self.actions)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a driver over a prebuilt scene with a literal action table.
    ///
    /// The initial observation is rendered immediately.
    pub fn new(scene: Scene, root: EntityId, actions: ActionTable) -> Self {
        let observation = scene.render(root);
        Self {
            scene,
            root,
            actions,
            generator: None,
            observation,
            config: SimConfig::default(),
        }
    }

    /// Creates a driver whose action table comes from a generator.
    pub fn from_generator(
        scene: Scene,
        root: EntityId,
        generator: impl Fn(&Scene, EntityId) -> ActionTable + 'static,
    ) -> Self {
        let actions = generator(&scene, root);
        let mut sim = Self::new(scene, root, actions);
        sim.generator = Some(Box::new(generator));
        sim
    }

    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for scenario setup between steps.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn config(&self) -> SimConfig {
        self.config
    }

    /// The most recently rendered observation, available from construction.
    pub fn observation(&self) -> &str {
        &self.observation
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// Re-runs the action generator against the current tree, if one is
    /// installed.
    pub fn refresh_actions(&mut self) {
        if let Some(generator) = &self.generator {
            self.actions = generator(&self.scene, self.root);
        }
    }

    /// Dispatches one action string and returns the fresh observation.
    ///
    /// Unknown strings take the total recovery path: the sentinel
    /// observation comes back and no entity state changes.
    pub fn step(&mut self, action: &str) -> &str {
        let recognized = match self.actions.get(action) {
            Some(verb) => {
                verb.invoke(&mut self.scene, self.root);
                true
            }
            None => false,
        };

        if !recognized {
            self.observation = UNKNOWN_ACTION.to_owned();
            return &self.observation;
        }

        if self.config.tick_policy == TickPolicy::EveryStep {
            self.scene.broadcast_tick(self.root);
        }
        if self.config.regenerate_actions {
            self.refresh_actions();
        }

        self.observation = self.scene.render(self.root);
        &self.observation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::VerbKind;
    use crate::behavior::Behavior;

    struct Counter;

    impl Behavior for Counter {
        fn tick(&mut self, id: EntityId, scene: &mut Scene) {
            let next = scene.int_property(id, "p").unwrap_or(0) + 1;
            scene.set_property(id, "p", next);
        }
    }

    fn two_child_fixture() -> (Scene, EntityId, EntityId, EntityId) {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let x = scene.spawn_child(root, "x");
        let y = scene.spawn_child(root, "y");
        scene.set_property(x, "p", 0i64);
        scene.set_property(y, "p", 0i64);
        scene.set_behavior(x, Box::new(Counter));
        (scene, root, x, y)
    }

    #[test]
    fn initial_observation_is_rendered_at_construction() {
        let (scene, root, _, _) = two_child_fixture();
        let sim = Simulation::new(scene, root, ActionTable::new());
        assert_eq!(sim.observation(), "root");
    }

    #[test]
    fn tick_verb_reaches_only_overriding_entities() {
        let (scene, root, x, y) = two_child_fixture();
        let actions = ActionTable::new().with_builtin(VerbKind::Tick);
        let mut sim = Simulation::new(scene, root, actions);

        sim.step("tick");
        assert_eq!(sim.scene().int_property(x, "p"), Some(1));
        assert_eq!(sim.scene().int_property(y, "p"), Some(0));
    }

    #[test]
    fn unknown_action_returns_sentinel_and_mutates_nothing() {
        let (scene, root, x, y) = two_child_fixture();
        let actions = ActionTable::new().with_builtin(VerbKind::Tick);
        let mut sim = Simulation::new(scene, root, actions);

        assert_eq!(sim.step("frobnicate"), UNKNOWN_ACTION);
        assert_eq!(sim.scene().int_property(x, "p"), Some(0));
        assert_eq!(sim.scene().int_property(y, "p"), Some(0));
        assert_eq!(sim.scene().len(), 3);
        assert_eq!(sim.observation(), UNKNOWN_ACTION);

        // A later recognized step recovers the normal observation.
        assert_eq!(sim.step("tick"), "root");
    }

    #[test]
    fn look_is_pure() {
        let (scene, root, x, y) = two_child_fixture();
        let actions = ActionTable::new()
            .with_builtin(VerbKind::Look)
            .with_builtin(VerbKind::Tick);
        let mut sim = Simulation::new(scene, root, actions);

        let observation = sim.step("look").to_owned();
        assert_eq!(observation, "root");
        assert_eq!(sim.scene().int_property(x, "p"), Some(0));
        assert_eq!(sim.scene().int_property(y, "p"), Some(0));
    }

    #[test]
    fn every_step_policy_broadcasts_on_domain_verbs() {
        let (scene, root, x, _) = two_child_fixture();
        let actions = ActionTable::new().with_fn("wait", |_, _| {});
        let mut sim = Simulation::new(scene, root, actions)
            .with_config(SimConfig::new().with_tick_policy(TickPolicy::EveryStep));

        sim.step("wait");
        sim.step("wait");
        assert_eq!(sim.scene().int_property(x, "p"), Some(2));

        // Unknown strings stay outside the tick policy.
        sim.step("frobnicate");
        assert_eq!(sim.scene().int_property(x, "p"), Some(2));
    }

    #[test]
    fn generator_repopulates_the_menu_after_mutating_steps() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let vial = scene.spawn_child(root, "vial");
        scene.make_container(vial, crate::container::ContainerSpec::new().openable().closed());

        let generator = move |scene: &Scene, _root: EntityId| {
            let mut table = ActionTable::new().with_builtin(VerbKind::Look);
            if scene.is_open(vial) {
                table.insert_fn("close vial", move |scene, _| {
                    let _ = scene.close(vial);
                });
            } else {
                table.insert_fn("open vial", move |scene, _| {
                    let _ = scene.open(vial);
                });
            }
            table
        };

        let mut sim = Simulation::from_generator(scene, root, generator)
            .with_config(SimConfig::new().with_regenerate_actions(true));

        assert!(sim.actions().contains("open vial"));
        sim.step("open vial");
        assert!(sim.scene().is_open(vial));
        assert!(sim.actions().contains("close vial"));
        assert!(!sim.actions().contains("open vial"));

        sim.step("close vial");
        assert!(!sim.scene().is_open(vial));
        assert!(sim.actions().contains("open vial"));
    }
}
