//! Reusable tick/describe behaviors shared by scenarios.
//!
//! These cover the overrides the scenario scripts actually write: a counter
//! advanced each tick, a parent that spawns offspring on a schedule, and a
//! composite description that lists children.

use fabula_core::{Behavior, EntityId, Scene};

/// Adds a fixed step to one integer property on every tick.
#[derive(Clone, Debug)]
pub struct Accumulator {
    key: String,
    step: i64,
}

impl Accumulator {
    pub fn new(key: impl Into<String>, step: i64) -> Self {
        Self {
            key: key.into(),
            step,
        }
    }
}

impl Behavior for Accumulator {
    fn tick(&mut self, id: EntityId, scene: &mut Scene) {
        let next = scene.int_property(id, &self.key).unwrap_or(0) + self.step;
        scene.set_property(id, self.key.clone(), next);
    }
}

/// Spawns one offspring child every `every` ticks.
///
/// The elapsed-tick counter lives in the property bag under `counter_key`,
/// so scenario verdict code can read it back. Offspring spawned during a
/// broadcast never participate in that same broadcast.
#[derive(Clone, Debug)]
pub struct Spawner {
    child_name: String,
    every: u64,
    counter_key: String,
}

impl Spawner {
    pub fn new(child_name: impl Into<String>, every: u64, counter_key: impl Into<String>) -> Self {
        Self {
            child_name: child_name.into(),
            every: every.max(1),
            counter_key: counter_key.into(),
        }
    }
}

impl Behavior for Spawner {
    fn tick(&mut self, id: EntityId, scene: &mut Scene) {
        let elapsed = scene.int_property(id, &self.counter_key).unwrap_or(0) + 1;
        scene.set_property(id, self.counter_key.clone(), elapsed);
        if elapsed % self.every as i64 == 0 {
            scene.spawn_child(id, self.child_name.clone());
        }
    }
}

/// Composite description: a header line, then each child's rendering
/// indented underneath.
///
/// Containers render their containment prefix before each child and hide
/// their contents entirely while closed.
#[derive(Clone, Debug, Default)]
pub struct Report {
    header: Option<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
        }
    }
}

impl Behavior for Report {
    fn describe(&self, id: EntityId, scene: &Scene) -> String {
        let mut out = match &self.header {
            Some(header) => header.clone(),
            None => scene.name(id).unwrap_or_default().to_owned(),
        };
        if scene.is_container(id) && !scene.is_open(id) {
            out.push_str(" (closed)");
            return out;
        }
        let marker = if scene.is_container(id) {
            format!("{}:", scene.container_prefix(id))
        } else {
            "-".to_owned()
        };
        for &child in scene.children(id) {
            let rendered = scene.render(child);
            for (index, line) in rendered.lines().enumerate() {
                out.push('\n');
                if index == 0 {
                    out.push_str("  ");
                    out.push_str(&marker);
                    out.push(' ');
                } else {
                    out.push_str("    ");
                }
                out.push_str(line);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_core::ContainerSpec;

    #[test]
    fn accumulator_steps_its_property() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let cell = scene.spawn_child(root, "cell");
        scene.set_behavior(cell, Box::new(Accumulator::new("p", 2)));

        scene.broadcast_tick(root);
        scene.broadcast_tick(root);
        assert_eq!(scene.int_property(cell, "p"), Some(4));
    }

    #[test]
    fn spawner_spawns_on_schedule() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let culture = scene.spawn_child(root, "culture");
        scene.set_behavior(culture, Box::new(Spawner::new("cell", 2, "age")));

        scene.broadcast_tick(root);
        assert!(scene.children_by_name(culture, "cell").is_empty());

        scene.broadcast_tick(root);
        assert_eq!(scene.children_by_name(culture, "cell").len(), 1);
        assert_eq!(scene.int_property(culture, "age"), Some(2));

        scene.broadcast_tick(root);
        scene.broadcast_tick(root);
        assert_eq!(scene.children_by_name(culture, "cell").len(), 2);
    }

    #[test]
    fn report_lists_children_indented() {
        let mut scene = Scene::new();
        let root = scene.spawn("lab");
        scene.set_behavior(root, Box::new(Report::new()));
        let dish = scene.spawn_child(root, "dish");
        scene.make_container(dish, ContainerSpec::new());
        scene.set_behavior(dish, Box::new(Report::new()));
        scene.spawn_child(dish, "cell");
        scene.spawn_child(root, "notebook");

        let text = scene.render(root);
        assert_eq!(text, "lab\n  - dish\n    in: cell\n  - notebook");
    }

    #[test]
    fn closed_containers_hide_their_contents() {
        let mut scene = Scene::new();
        let box_id = scene.spawn_container("crate", ContainerSpec::new().openable().closed());
        scene.set_behavior(box_id, Box::new(Report::new()));
        scene.spawn_child(box_id, "secret");

        assert_eq!(scene.render(box_id), "crate (closed)");

        scene.open(box_id).unwrap();
        assert_eq!(scene.render(box_id), "crate\n  in: secret");
    }

    #[test]
    fn report_header_overrides_the_name() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        scene.set_behavior(root, Box::new(Report::with_header("The claim bench")));
        assert_eq!(scene.render(root), "The claim bench");
    }
}
