//! glTF character loader.
//!
//! Extracts what the viewer needs from a rigged model: per-mesh bounds and
//! one clip per animation, its duration taken from the latest keyframe.

use super::asset::{CharacterAsset, MeshInfo};
use crate::animation::AnimationClip;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum GltfLoadError {
    #[error("failed to load glTF file: {0}")]
    Import(#[from] gltf::Error),

    #[error("model has no meshes: {0}")]
    NoMeshes(String),

    #[error("animation {0} has no readable keyframe times")]
    MissingKeyframes(String),
}

pub fn load_character(path: impl AsRef<Path>) -> Result<CharacterAsset, GltfLoadError> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path)?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string();

    let mut meshes = Vec::new();
    for (idx, mesh) in document.meshes().enumerate() {
        let mut bounds_min = [f32::INFINITY; 3];
        let mut bounds_max = [f32::NEG_INFINITY; 3];
        for primitive in mesh.primitives() {
            let bbox = primitive.bounding_box();
            for i in 0..3 {
                bounds_min[i] = bounds_min[i].min(bbox.min[i]);
                bounds_max[i] = bounds_max[i].max(bbox.max[i]);
            }
        }
        meshes.push(MeshInfo {
            name: mesh
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("mesh_{idx}")),
            bounds_min,
            bounds_max,
        });
    }

    if meshes.is_empty() {
        return Err(GltfLoadError::NoMeshes(path.display().to_string()));
    }

    let mut clips = Vec::new();
    for (idx, animation) in document.animations().enumerate() {
        let clip_name = animation
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("animation_{idx}"));

        let mut duration: Option<f32> = None;
        for channel in animation.channels() {
            let reader = channel.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
            if let Some(inputs) = reader.read_inputs() {
                let last = inputs.fold(0.0f32, f32::max);
                duration = Some(duration.map_or(last, |d| d.max(last)));
            }
        }

        let duration = duration.ok_or_else(|| GltfLoadError::MissingKeyframes(clip_name.clone()))?;
        clips.push(AnimationClip::new(clip_name, duration));
    }

    log::info!(
        "Loaded {}: {} meshes, {} clips",
        name,
        meshes.len(),
        clips.len()
    );

    Ok(CharacterAsset {
        name,
        meshes,
        clips,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/fox-lite.gltf");

    #[test]
    fn loads_meshes_and_clip_durations() {
        let asset = load_character(FIXTURE).expect("fixture loads");
        assert_eq!(asset.name, "fox-lite");
        assert_eq!(asset.meshes.len(), 1);
        assert_eq!(asset.meshes[0].name, "fox");
        assert_eq!(asset.meshes[0].bounds_max, [1.0, 1.0, 0.0]);

        let names: Vec<_> = asset.clips.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Survey", "Walk", "Run"]);
        assert!((asset.clips[0].duration - 3.0).abs() < 1e-6);
        assert!((asset.clips[2].duration - 0.75).abs() < 1e-6);
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let err = load_character("test-data/does-not-exist.gltf").unwrap_err();
        assert!(matches!(err, GltfLoadError::Import(_)));
    }
}
