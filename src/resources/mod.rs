// Named asset loading
//
// Sources load on the tokio blocking pool; results come back through a
// channel that the engine drains once per frame.

pub mod asset;
pub mod gltf_loader;
pub mod source;

pub use asset::{CharacterAsset, MeshInfo};
pub use gltf_loader::{GltfLoadError, load_character};
pub use source::{FOX_MODEL, Source, SourceKind, default_sources};

use crate::error::ViewerError;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

#[derive(Debug)]
pub enum LoadResult {
    Loaded {
        name: String,
        asset: CharacterAsset,
    },
    Failed {
        name: String,
        error: ViewerError,
    },
}

pub struct Resources {
    sources: Vec<Source>,
    items: HashMap<String, Arc<CharacterAsset>>,
    failures: HashMap<String, ViewerError>,
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
    loading: bool,
}

impl Resources {
    pub fn new(sources: Vec<Source>) -> Self {
        let (sender, receiver) = channel();
        Self {
            sources,
            items: HashMap::new(),
            failures: HashMap::new(),
            sender,
            receiver,
            loading: false,
        }
    }

    /// Spawns one background load per source that is not loaded yet.
    pub fn start_loading(&mut self, runtime: &tokio::runtime::Handle) {
        if self.loading {
            return;
        }
        self.loading = true;

        for source in &self.sources {
            if self.items.contains_key(&source.name) {
                continue;
            }

            let sender = self.sender.clone();
            let source = source.clone();
            log::info!("Loading {} from {}", source.name, source.path.display());

            runtime.spawn_blocking(move || {
                let result = match source.kind {
                    SourceKind::GltfModel => load_character(&source.path),
                };
                let message = match result {
                    Ok(asset) => LoadResult::Loaded {
                        name: source.name,
                        asset,
                    },
                    Err(e) => LoadResult::Failed {
                        name: source.name,
                        error: ViewerError::from(e),
                    },
                };
                let _ = sender.send(message);
            });
        }
    }

    /// Drains finished loads. Returns the names loaded by this call.
    pub fn poll(&mut self) -> Vec<String> {
        let mut loaded = Vec::new();
        while let Ok(result) = self.receiver.try_recv() {
            match result {
                LoadResult::Loaded { name, asset } => {
                    log::info!("Resource ready: {}", name);
                    self.failures.remove(&name);
                    self.items.insert(name.clone(), Arc::new(asset));
                    loaded.push(name);
                }
                LoadResult::Failed { name, error } => {
                    log::error!("Failed to load resource '{}': {}", name, error);
                    self.failures.insert(name, error);
                }
            }
        }
        loaded
    }

    /// Registers an already-loaded asset under `name`.
    pub fn insert(&mut self, name: impl Into<String>, asset: CharacterAsset) {
        self.items.insert(name.into(), Arc::new(asset));
    }

    pub fn item(&self, name: &str) -> Result<Arc<CharacterAsset>, ViewerError> {
        self.items
            .get(name)
            .cloned()
            .ok_or_else(|| ViewerError::resource_not_found(name))
    }

    pub fn is_ready(&self) -> bool {
        self.sources
            .iter()
            .all(|source| self.items.contains_key(&source.name))
    }

    pub fn loaded_count(&self) -> usize {
        self.sources
            .iter()
            .filter(|source| self.items.contains_key(&source.name))
            .count()
    }

    pub fn failures(&self) -> &HashMap<String, ViewerError> {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/fox-lite.gltf");

    async fn poll_until(resources: &mut Resources, done: impl Fn(&Resources) -> bool) {
        for _ in 0..200 {
            resources.poll();
            if done(resources) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("resources did not settle");
    }

    #[test]
    fn missing_item_is_not_found() {
        let resources = Resources::new(default_sources("nowhere.gltf"));
        let err = resources.item(FOX_MODEL).unwrap_err();
        assert!(err.is("resource-not-found"));
        assert!(!resources.is_ready());
    }

    #[test]
    fn inserted_items_make_resources_ready() {
        let mut resources = Resources::new(default_sources("nowhere.gltf"));
        resources.insert(FOX_MODEL, CharacterAsset::default());
        assert!(resources.is_ready());
        assert_eq!(resources.loaded_count(), 1);
        assert!(resources.item(FOX_MODEL).is_ok());
    }

    #[tokio::test]
    async fn background_load_delivers_asset() {
        let mut resources = Resources::new(default_sources(FIXTURE));
        resources.start_loading(&tokio::runtime::Handle::current());
        poll_until(&mut resources, |r| r.is_ready()).await;

        let fox = resources.item(FOX_MODEL).unwrap();
        assert_eq!(fox.clips.len(), 3);
    }

    #[tokio::test]
    async fn background_failure_is_recorded() {
        let mut resources = Resources::new(default_sources("test-data/missing.gltf"));
        resources.start_loading(&tokio::runtime::Handle::current());
        poll_until(&mut resources, |r| !r.failures().is_empty()).await;

        let err = &resources.failures()[FOX_MODEL];
        assert!(err.is("gltf-error"));
        assert!(!resources.is_ready());
    }
}
