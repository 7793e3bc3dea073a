use winit::event_loop::{ControlFlow, EventLoop};

mod animation;
mod app;
mod debug;
mod engine;
mod error;
mod renderer;
mod resources;
mod services;
mod settings;
mod ui;
mod viewer;
mod world;

use app::CliArgs;
use app::handler::AppHandler;
use error::ViewerError;
use settings::Settings;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = CliArgs::parse(std::env::args().skip(1));
    let mut settings = Settings::load();
    cli.apply(&mut settings);
    log::info!(
        "Starting foxview-rs with {} (debug: {})",
        settings.viewer.model_path.display(),
        settings.viewer.debug
    );

    let event_loop = EventLoop::new().map_err(ViewerError::from)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = AppHandler::new(tokio::runtime::Runtime::new()?, settings);
    event_loop.run_app(&mut handler).map_err(ViewerError::from)?;

    Ok(())
}
