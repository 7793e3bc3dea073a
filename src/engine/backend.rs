use crate::error::ViewerError;
use crate::renderer::line_vertex::LineVertex;
use crate::services::Viewport;
use nalgebra_glm as glm;

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub view_proj: glm::Mat4,
    pub clear_color: [f32; 3],
    pub lines: Vec<LineVertex>,
}

/// Drawing surface the engine renders into.
pub trait RenderBackend {
    fn resize(&mut self, viewport: Viewport);

    /// UI context and the input gathered since the previous frame.
    /// `None` when the backend has no UI layer.
    fn take_ui_input(&mut self) -> Option<(egui::Context, egui::RawInput)>;

    fn render(&mut self, frame: &Frame, ui: Option<egui::FullOutput>) -> Result<(), ViewerError>;

    /// Releases GPU resources. Further renders are no-ops.
    fn dispose(&mut self);
}
