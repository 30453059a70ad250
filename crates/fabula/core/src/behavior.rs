//! Per-entity extension hooks.
//!
//! Concrete scenario entity types are expressed as [`Behavior`]
//! implementations attached to plain scene nodes, not as subtypes of the
//! node itself. The two hooks mirror the collaborator contract: `tick`
//! advances one entity's own state by a discrete step, `describe` renders it.

use crate::scene::{EntityId, Scene};

/// Overridable hooks for one entity.
///
/// `tick` never recurses into children; broadcasting across a whole tree is
/// the driver's job ([`Scene::broadcast_tick`]). `describe` enforces no
/// canonical format: composite implementations typically render a header
/// followed by each child's rendering with their own separator convention.
pub trait Behavior {
    /// Advances this entity's own state by one discrete step.
    ///
    /// The hook receives the whole scene and may mutate it, including
    /// spawning new entities; newcomers never join the broadcast that is
    /// already in progress.
    fn tick(&mut self, _id: EntityId, _scene: &mut Scene) {}

    /// Renders this entity's human-readable state. Defaults to the bare name.
    fn describe(&self, id: EntityId, scene: &Scene) -> String {
        scene.name(id).unwrap_or_default().to_owned()
    }
}

/// The default behavior: no-op tick, name-only description.
#[derive(Clone, Copy, Debug, Default)]
pub struct Inert;

impl Behavior for Inert {}
