// Scene content built once the resources are in

pub mod animation_holder;
pub mod environment;
pub mod floor;
pub mod fox;

pub use animation_holder::{AnimationHolder, AnimationSnapshot, CROSS_FADE_SECONDS};
pub use environment::Environment;
pub use floor::Floor;
pub use fox::Fox;

use crate::debug::DebugObserver;
use crate::engine::scene::Scene;
use crate::error::ViewerError;
use crate::resources::Resources;
use crate::settings::Settings;

pub struct World {
    pub floor: Floor,
    pub fox: Fox,
    pub environment: Environment,
}

impl World {
    /// Builds floor, fox and environment in that order, so the environment
    /// intensity reaches the fox meshes.
    pub fn new(
        scene: &mut Scene,
        resources: &Resources,
        settings: &Settings,
        debug: Option<&mut dyn DebugObserver>,
    ) -> Result<Self, ViewerError> {
        let floor = Floor::new(scene, settings.environment.floor_radius);
        let fox = Fox::new(scene, resources, &settings.fox, debug)?;
        let environment = Environment::new(scene, &settings.environment);

        Ok(Self {
            floor,
            fox,
            environment,
        })
    }

    pub fn update(&mut self, delta: f32) {
        self.fox.update(delta);
    }

    /// Plays `name` on the object registered under debug folder `folder`.
    pub fn play(&mut self, folder: &str, name: &str) -> Result<(), ViewerError> {
        match folder {
            fox::DEBUG_FOLDER => self.fox.play(name),
            _ => Err(ViewerError::new("folder-not-found").with_arg("folder", folder)),
        }
    }

    pub fn snapshot(&self, folder: &str) -> Result<AnimationSnapshot, ViewerError> {
        match folder {
            fox::DEBUG_FOLDER => Ok(self.fox.snapshot()),
            _ => Err(ViewerError::new("folder-not-found").with_arg("folder", folder)),
        }
    }

    pub fn dispose(&mut self) {
        self.fox.dispose();
    }
}
