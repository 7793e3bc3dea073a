use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resource name the fox model is registered under.
pub const FOX_MODEL: &str = "foxModel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    GltfModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub kind: SourceKind,
    pub path: PathBuf,
}

impl Source {
    pub fn gltf(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::GltfModel,
            path: path.into(),
        }
    }
}

/// The sources the viewer loads at startup.
pub fn default_sources(model_path: impl Into<PathBuf>) -> Vec<Source> {
    vec![Source::gltf(FOX_MODEL, model_path)]
}
