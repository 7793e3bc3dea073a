use crate::animation::AnimationClip;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshInfo {
    pub name: String,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
}

/// A loaded, rigged character: its meshes and animation clips.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterAsset {
    pub name: String,
    pub meshes: Vec<MeshInfo>,
    pub clips: Vec<AnimationClip>,
}

impl CharacterAsset {
    /// Union of all mesh bounds, in model space.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut overall_min = [f32::INFINITY; 3];
        let mut overall_max = [f32::NEG_INFINITY; 3];
        let mut has_valid_bbox = false;

        for mesh in &self.meshes {
            let (min, max) = (mesh.bounds_min, mesh.bounds_max);
            if min[0] > max[0] || min[1] > max[1] || min[2] > max[2] {
                continue;
            }
            for i in 0..3 {
                overall_min[i] = overall_min[i].min(min[i]);
                overall_max[i] = overall_max[i].max(max[i]);
            }
            has_valid_bbox = true;
        }

        has_valid_bbox.then_some((overall_min, overall_max))
    }
}
