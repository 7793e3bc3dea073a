use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFY_APP_NAME: &str = "foxview-rs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerSettings {
    pub debug: bool,
    pub model_path: PathBuf,
    pub clear_color: [f32; 3],
    pub max_pixel_ratio: f64,
    /// Upper bound for a single frame delta, in seconds.
    pub max_frame_delta: f64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            debug: false,
            model_path: PathBuf::from("assets/models/Fox/glTF/Fox.gltf"),
            clear_color: [0.07, 0.07, 0.09],
            max_pixel_ratio: 2.0,
            max_frame_delta: 0.1,
        }
    }
}

impl ViewerSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "viewer").unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoxSettings {
    pub scale: f32,
    pub initial_animation: String,
    /// Names given to the model's clips, by clip index.
    pub clip_aliases: Vec<String>,
}

impl Default for FoxSettings {
    fn default() -> Self {
        Self {
            scale: 0.02,
            initial_animation: "idle".to_string(),
            clip_aliases: vec![
                "idle".to_string(),
                "walking".to_string(),
                "running".to_string(),
            ],
        }
    }
}

impl FoxSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "fox").unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub show_grid: bool,
    pub show_bounding_box: bool,
    pub show_sun: bool,
    pub field_of_view: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_bounding_box: true,
            show_sun: true,
            field_of_view: 35.0,
            near_plane: 0.1,
            far_plane: 100.0,
        }
    }
}

impl DisplaySettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "display").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "display", self);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentSettings {
    pub sun_intensity: f32,
    pub sun_position: [f32; 3],
    pub shadow_map_size: u32,
    pub shadow_camera_far: f32,
    pub shadow_normal_bias: f32,
    pub environment_intensity: f32,
    pub floor_radius: f32,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            sun_intensity: 4.0,
            sun_position: [3.5, 2.0, -1.25],
            shadow_map_size: 1024,
            shadow_camera_far: 15.0,
            shadow_normal_bias: 0.05,
            environment_intensity: 0.4,
            floor_radius: 5.0,
        }
    }
}

impl EnvironmentSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "environment").unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    pub show_fox_panel: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_fox_panel: true,
        }
    }
}

impl UiSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "ui").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "ui", self);
    }
}

// Aggregate struct for convenience
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub viewer: ViewerSettings,
    pub fox: FoxSettings,
    pub display: DisplaySettings,
    pub environment: EnvironmentSettings,
    pub ui: UiSettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            viewer: ViewerSettings::load(),
            fox: FoxSettings::load(),
            display: DisplaySettings::load(),
            environment: EnvironmentSettings::load(),
            ui: UiSettings::load(),
        }
    }
}
