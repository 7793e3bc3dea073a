use super::animation_holder::{AnimationHolder, AnimationSnapshot};
use crate::debug::DebugObserver;
use crate::engine::scene::{NodeId, NodeKind, Scene, SceneNode};
use crate::error::ViewerError;
use crate::resources::{FOX_MODEL, Resources};
use crate::settings::FoxSettings;

/// Debug panel folder the fox reports into.
pub const DEBUG_FOLDER: &str = "fox";

/// The animated fox: its scene nodes and its animation state.
pub struct Fox {
    root: NodeId,
    animation: AnimationHolder,
    bounds: Option<([f32; 3], [f32; 3])>,
}

impl Fox {
    /// Adds the fox model to `scene` and starts its initial animation.
    /// Clips are renamed by index using the configured aliases.
    pub fn new(
        scene: &mut Scene,
        resources: &Resources,
        settings: &FoxSettings,
        debug: Option<&mut dyn DebugObserver>,
    ) -> Result<Self, ViewerError> {
        let asset = resources.item(FOX_MODEL)?;

        let root = scene.add(SceneNode::group(DEBUG_FOLDER).with_scale(settings.scale));
        for mesh in &asset.meshes {
            scene.add(SceneNode::mesh(&mesh.name, mesh.bounds_min, mesh.bounds_max).with_parent(root));
        }
        scene.traverse_mut(root, |node| {
            if matches!(node.kind, NodeKind::Mesh { .. }) {
                node.cast_shadow = true;
            }
        });

        let clips: Vec<_> = asset
            .clips
            .iter()
            .enumerate()
            .map(|(idx, clip)| match settings.clip_aliases.get(idx) {
                Some(alias) => clip.renamed(alias.as_str()),
                None => clip.clone(),
            })
            .collect();
        let animation = AnimationHolder::new(&clips, &settings.initial_animation)?;

        log::info!(
            "Fox ready: {} meshes, animations {:?}",
            asset.meshes.len(),
            animation.names()
        );

        if let Some(debug) = debug {
            debug.actions_available(DEBUG_FOLDER, animation.names());
            debug.current_changed(DEBUG_FOLDER, animation.current_name());
        }

        Ok(Self {
            root,
            animation,
            bounds: asset.bounds(),
        })
    }

    pub fn play(&mut self, name: &str) -> Result<(), ViewerError> {
        self.animation.play(name)
    }

    pub fn update(&mut self, delta: f32) {
        self.animation.update(delta);
    }

    pub fn animation(&self) -> &AnimationHolder {
        &self.animation
    }

    pub fn snapshot(&self) -> AnimationSnapshot {
        self.animation.snapshot()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Model bounds scaled into world space.
    pub fn world_bounds(&self, scene: &Scene) -> Option<([f32; 3], [f32; 3])> {
        let scale = scene.world_scale(self.root);
        self.bounds
            .map(|(min, max)| (min.map(|v| v * scale), max.map(|v| v * scale)))
    }

    pub fn dispose(&mut self) {
        self.animation.stop_all();
    }
}
