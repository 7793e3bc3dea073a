use crate::app::canvas::WindowCanvas;
use crate::error::ViewerError;
use crate::resources::{Resources, default_sources};
use crate::services::{PointerButton, Services};
use crate::settings::Settings;
use crate::viewer::Viewer;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Turns winit events into service events for the viewer.
pub struct AppHandler {
    runtime: Runtime,
    settings: Settings,
    services: Rc<Services>,
    viewer: Viewer,
    window: Option<Arc<Window>>,
    egui_state: Option<Rc<RefCell<egui_winit::State>>>,
}

impl AppHandler {
    pub fn new(runtime: Runtime, settings: Settings) -> Self {
        let services = Services::new(&settings);
        let viewer = Viewer::new(Rc::clone(&services), settings.clone());
        Self {
            runtime,
            settings,
            services,
            viewer,
            window: None,
            egui_state: None,
        }
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title("Fox Viewer")
            .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let egui_ctx = egui::Context::default();
        let egui_state = Rc::new(RefCell::new(egui_winit::State::new(
            egui_ctx,
            egui::viewport::ViewportId::ROOT,
            &*window,
            None,
            None,
            None,
        )));

        let canvas = WindowCanvas::new(
            Arc::clone(&window),
            Rc::clone(&egui_state),
            self.settings.viewer.max_pixel_ratio,
        );

        let mut resources = Resources::new(default_sources(&self.settings.viewer.model_path));
        resources.start_loading(self.runtime.handle());
        self.viewer.init(Some(&canvas), resources)?;

        let size = window.inner_size();
        self.services
            .sizes
            .resize(size.width, size.height, window.scale_factor());

        self.window = Some(window);
        self.egui_state = Some(egui_state);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.viewer.destroy();
        event_loop.exit();
    }
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.open_window(event_loop) {
            log::error!("Failed to start viewer: {}", e);
            self.shutdown(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(egui_state)) = (self.window.clone(), self.egui_state.clone())
        else {
            return;
        };

        let egui_response = egui_state.borrow_mut().on_window_event(&window, &event);
        let viewport = self.services.sizes.viewport();

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput { event, .. } => {
                if egui_response.consumed || event.state != ElementState::Pressed {
                    return;
                }
                match event.logical_key.as_ref() {
                    Key::Named(NamedKey::Escape) => self.shutdown(event_loop),
                    Key::Character("r") | Key::Character("R") => self.viewer.reset_camera(),
                    _ => {}
                }
            }
            WindowEvent::Resized(size) => {
                self.services
                    .sizes
                    .resize(size.width, size.height, window.scale_factor());
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = window.inner_size();
                self.services
                    .sizes
                    .resize(size.width, size.height, scale_factor);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.services.pointer.move_to(position.x, position.y, viewport);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                match state {
                    ElementState::Pressed => self.services.pointer.press(button, viewport),
                    ElementState::Released => self.services.pointer.release(button, viewport),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.services.pointer.wheel(scroll_delta, viewport);
            }
            WindowEvent::RedrawRequested => {
                self.services.time.tick(Instant::now());
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.viewer.destroy();
    }
}
