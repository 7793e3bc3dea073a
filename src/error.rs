use std::{collections::BTreeMap, fmt, io, sync::Arc};

/// Keyed viewer error. `key` is a stable identifier callers can match on,
/// `args` carries the details rendered by `Display`.
#[derive(Debug, Clone)]
pub struct ViewerError {
    pub key: &'static str,
    pub args: BTreeMap<&'static str, String>,
    pub causes: Vec<ViewerCause>,
}

#[derive(Debug, Clone)]
pub enum ViewerCause {
    Viewer(Box<ViewerError>),
    Std(Arc<dyn std::error::Error + Send + Sync>),
}

impl ViewerError {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            args: BTreeMap::new(),
            causes: Vec::new(),
        }
    }

    pub fn with_arg(mut self, k: &'static str, v: impl ToString) -> Self {
        self.args.insert(k, v.to_string());
        self
    }

    pub fn push_viewer(mut self, cause: ViewerError) -> Self {
        self.causes.push(ViewerCause::Viewer(Box::new(cause)));
        self
    }

    pub fn push_std(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.causes.push(ViewerCause::Std(Arc::new(cause)));
        self
    }

    pub fn is(&self, key: &str) -> bool {
        self.key == key
    }

    pub fn missing_canvas() -> Self {
        ViewerError::new("missing-canvas")
    }

    pub fn animation_not_found(name: &str) -> Self {
        ViewerError::new("animation-not-found").with_arg("name", name)
    }

    pub fn resource_not_found(name: &str) -> Self {
        ViewerError::new("resource-not-found").with_arg("name", name)
    }

    pub fn resource_load(name: &str, cause: ViewerError) -> Self {
        ViewerError::new("resource-load")
            .with_arg("name", name)
            .push_viewer(cause)
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.key)?;
        let mut first = true;
        for (k, v) in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{k}={v}")?;
        }
        write!(f, ")")
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes.iter().find_map(|c| match c {
            ViewerCause::Viewer(e) => Some(e.as_ref() as &dyn std::error::Error),
            ViewerCause::Std(e) => Some(e.as_ref()),
        })
    }
}

impl From<io::Error> for ViewerError {
    fn from(err: io::Error) -> Self {
        ViewerError::new("io-error").push_std(err)
    }
}

impl From<crate::resources::GltfLoadError> for ViewerError {
    fn from(err: crate::resources::GltfLoadError) -> Self {
        ViewerError::new("gltf-error")
            .with_arg("msg", err.to_string())
            .push_std(err)
    }
}

impl From<wgpu::CreateSurfaceError> for ViewerError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        ViewerError::new("surface-create").push_std(err)
    }
}

impl From<wgpu::RequestAdapterError> for ViewerError {
    fn from(err: wgpu::RequestAdapterError) -> Self {
        ViewerError::new("adapter-unavailable").push_std(err)
    }
}

impl From<wgpu::RequestDeviceError> for ViewerError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        ViewerError::new("device-request").push_std(err)
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(err: winit::error::EventLoopError) -> Self {
        ViewerError::new("event-loop").push_std(err)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(err: winit::error::OsError) -> Self {
        ViewerError::new("window-create").push_std(err)
    }
}
