use serde::{Deserialize, Serialize};

/// A named animation clip. Only the timing is needed here: sampling the
/// keyframes is left to whoever skins the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
        }
    }

    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: self.duration,
        }
    }
}
