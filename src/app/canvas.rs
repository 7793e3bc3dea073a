use crate::engine::RenderBackend;
use crate::error::ViewerError;
use crate::renderer::WgpuRenderer;
use crate::services::Viewport;
use crate::viewer::Canvas;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use winit::window::Window;

/// A winit window as the viewer's drawing surface.
pub struct WindowCanvas {
    window: Arc<Window>,
    egui_state: Rc<RefCell<egui_winit::State>>,
    max_pixel_ratio: f64,
}

impl WindowCanvas {
    pub fn new(
        window: Arc<Window>,
        egui_state: Rc<RefCell<egui_winit::State>>,
        max_pixel_ratio: f64,
    ) -> Self {
        Self {
            window,
            egui_state,
            max_pixel_ratio,
        }
    }
}

impl Canvas for WindowCanvas {
    fn viewport(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::new(
            size.width,
            size.height,
            self.window.scale_factor().min(self.max_pixel_ratio),
        )
    }

    fn create_backend(&self) -> Result<Box<dyn RenderBackend>, ViewerError> {
        let renderer = pollster::block_on(WgpuRenderer::new(
            Arc::clone(&self.window),
            Rc::clone(&self.egui_state),
        ))?;
        Ok(Box::new(renderer))
    }
}
