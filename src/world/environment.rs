use crate::engine::scene::{DirectionalLight, Scene};
use crate::settings::EnvironmentSettings;

/// Sun light plus the environment-map intensity applied to every mesh.
pub struct Environment {
    environment_intensity: f32,
}

impl Environment {
    pub fn new(scene: &mut Scene, settings: &EnvironmentSettings) -> Self {
        scene.set_sun(DirectionalLight {
            position: settings.sun_position,
            color: [1.0, 1.0, 1.0],
            intensity: settings.sun_intensity,
            cast_shadow: true,
            shadow_map_size: settings.shadow_map_size,
            shadow_camera_far: settings.shadow_camera_far,
            shadow_normal_bias: settings.shadow_normal_bias,
        });

        let environment = Self {
            environment_intensity: settings.environment_intensity,
        };
        environment.update_materials(scene);
        environment
    }

    /// Applies the environment intensity to every mesh in the scene.
    pub fn update_materials(&self, scene: &mut Scene) {
        let mut updated = 0;
        for node in scene.nodes_mut().iter_mut().filter(|n| n.is_mesh()) {
            node.env_map_intensity = self.environment_intensity;
            updated += 1;
        }
        log::debug!("Environment intensity applied to {} meshes", updated);
    }
}
