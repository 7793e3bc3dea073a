pub mod camera;
pub mod line_vertex;
pub mod lines;
pub mod render;
pub mod renderer;

pub use renderer::WgpuRenderer;
