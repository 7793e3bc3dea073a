// Viewer lifecycle: subscribe services on init, unsubscribe and dispose on destroy

use crate::engine::{Engine, RenderBackend};
use crate::error::ViewerError;
use crate::resources::Resources;
use crate::services::{Services, Subscription, Viewport};
use crate::settings::Settings;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// Surface the engine renders into.
pub trait Canvas {
    fn viewport(&self) -> Viewport;

    fn create_backend(&self) -> Result<Box<dyn RenderBackend>, ViewerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Uninitialized,
    Running,
    Destroyed,
}

/// Owns one engine for its lifetime and the subscriptions feeding it.
pub struct Viewer {
    services: Rc<Services>,
    settings: Settings,
    engine: Option<Rc<RefCell<Engine>>>,
    subscriptions: Vec<Subscription>,
    state: ViewerState,
}

impl Viewer {
    pub fn new(services: Rc<Services>, settings: Settings) -> Self {
        Self {
            services,
            settings,
            engine: None,
            subscriptions: Vec::new(),
            state: ViewerState::Uninitialized,
        }
    }

    /// Creates the engine on `canvas`, subscribes it to the time, resize and
    /// pointer services and starts the clock.
    pub fn init(
        &mut self,
        canvas: Option<&dyn Canvas>,
        resources: Resources,
    ) -> Result<(), ViewerError> {
        match self.state {
            ViewerState::Running => return Err(ViewerError::new("already-initialized")),
            ViewerState::Destroyed => return Err(ViewerError::new("viewer-destroyed")),
            ViewerState::Uninitialized => {}
        }
        let canvas = canvas.ok_or_else(ViewerError::missing_canvas)?;

        let engine = Rc::new(RefCell::new(Engine::new(
            canvas,
            self.settings.clone(),
            resources,
        )?));

        let target = Rc::clone(&engine);
        self.subscriptions.push(self.services.time.on_tick(move |tick| {
            with_engine(&target, "tick", |engine| engine.update(tick));
        }));

        let target = Rc::clone(&engine);
        self.subscriptions.push(self.services.sizes.on_resize(move |viewport| {
            with_engine(&target, "resize", |engine| {
                engine.resize(*viewport);
                Ok(())
            });
        }));

        let target = Rc::clone(&engine);
        self.subscriptions.push(self.services.pointer.on_pointer(move |event| {
            with_engine(&target, "pointer", |engine| {
                engine.pointer(event);
                Ok(())
            });
        }));

        self.services.time.start(Instant::now());
        self.engine = Some(engine);
        self.state = ViewerState::Running;
        log::info!("Viewer initialized");
        Ok(())
    }

    /// Unsubscribes, stops the clock and disposes the engine. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.subscriptions.clear();
        self.services.time.stop();

        if let Some(engine) = self.engine.take() {
            engine.borrow_mut().dispose();
            log::info!("Viewer destroyed");
        }
        self.state = ViewerState::Destroyed;
    }

    pub fn reset_camera(&self) {
        if let Some(engine) = &self.engine {
            with_engine(engine, "camera reset", |engine| {
                engine.reset_camera();
                Ok(())
            });
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn engine(&self) -> Option<&Rc<RefCell<Engine>>> {
        self.engine.as_ref()
    }

    pub fn services(&self) -> &Rc<Services> {
        &self.services
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn with_engine(
    engine: &RefCell<Engine>,
    what: &str,
    f: impl FnOnce(&mut Engine) -> Result<(), ViewerError>,
) {
    let Ok(mut engine) = engine.try_borrow_mut() else {
        log::warn!("Engine busy, dropping {} event", what);
        return;
    };
    if let Err(e) = f(&mut engine) {
        log::error!("Engine {} failed: {}", what, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationClip;
    use crate::engine::backend::testing::FakeCanvas;
    use crate::resources::{CharacterAsset, FOX_MODEL, MeshInfo, default_sources};
    use crate::services::PointerButton;
    use std::time::Duration;

    fn resources() -> Resources {
        let mut resources = Resources::new(default_sources("unused.gltf"));
        resources.insert(
            FOX_MODEL,
            CharacterAsset {
                name: "Fox".into(),
                meshes: vec![MeshInfo {
                    name: "fox".into(),
                    bounds_min: [0.0; 3],
                    bounds_max: [1.0; 3],
                }],
                clips: vec![
                    AnimationClip::new("Survey", 3.0),
                    AnimationClip::new("Walk", 1.0),
                    AnimationClip::new("Run", 0.75),
                ],
            },
        );
        resources
    }

    fn viewer() -> Viewer {
        let settings = Settings::default();
        Viewer::new(Services::new(&settings), settings)
    }

    #[test]
    fn init_without_canvas_fails_and_builds_nothing() {
        let mut viewer = viewer();
        let err = viewer.init(None, resources()).unwrap_err();

        assert!(err.is("missing-canvas"));
        assert!(viewer.engine().is_none());
        assert_eq!(viewer.state(), ViewerState::Uninitialized);
        assert!(!viewer.services().time.is_running());
    }

    #[test]
    fn ticks_reach_the_engine() {
        let canvas = FakeCanvas::new();
        let mut viewer = viewer();
        viewer.init(Some(&canvas), resources()).unwrap();
        assert_eq!(viewer.state(), ViewerState::Running);

        let services = Rc::clone(viewer.services());
        services.time.tick(Instant::now() + Duration::from_millis(16));

        assert_eq!(canvas.log.borrow().frames.len(), 1);
        let engine = viewer.engine().unwrap().borrow();
        assert_eq!(engine.world().unwrap().fox.animation().current_name(), "idle");
    }

    #[test]
    fn resize_and_pointer_are_forwarded() {
        let canvas = FakeCanvas::new();
        let mut viewer = viewer();
        viewer.init(Some(&canvas), resources()).unwrap();
        let services = Rc::clone(viewer.services());

        services.sizes.resize(1200, 600, 1.0);
        assert_eq!(canvas.log.borrow().resizes.last().map(|v| v.width), Some(1200));

        let yaw = viewer.engine().unwrap().borrow().camera().state().yaw;
        let viewport = services.sizes.viewport();
        services.pointer.move_to(100.0, 100.0, viewport);
        services.pointer.press(PointerButton::Primary, viewport);
        services.pointer.move_to(180.0, 100.0, viewport);
        assert_ne!(viewer.engine().unwrap().borrow().camera().state().yaw, yaw);
    }

    #[test]
    fn backend_gets_the_clamped_pixel_ratio() {
        let canvas = FakeCanvas::new();
        let mut viewer = viewer();
        viewer.init(Some(&canvas), resources()).unwrap();

        viewer.services().sizes.resize(1200, 600, 3.0);

        let log = canvas.log.borrow();
        let last = log.resizes.last().copied().unwrap();
        assert_eq!(last.pixel_ratio, 2.0);
    }

    #[test]
    fn reset_camera_reaches_the_engine() {
        let canvas = FakeCanvas::new();
        let mut viewer = viewer();
        viewer.init(Some(&canvas), resources()).unwrap();
        let services = Rc::clone(viewer.services());
        let yaw = viewer.engine().unwrap().borrow().camera().state().yaw;

        let viewport = services.sizes.viewport();
        services.pointer.move_to(100.0, 100.0, viewport);
        services.pointer.press(PointerButton::Primary, viewport);
        services.pointer.move_to(180.0, 100.0, viewport);
        viewer.reset_camera();

        assert_eq!(viewer.engine().unwrap().borrow().camera().state().yaw, yaw);
    }

    #[test]
    fn play_walking_through_the_engine() {
        let canvas = FakeCanvas::new();
        let mut viewer = viewer();
        viewer.init(Some(&canvas), resources()).unwrap();
        viewer.services().time.tick(Instant::now() + Duration::from_millis(16));

        let engine = viewer.engine().unwrap();
        engine.borrow_mut().play_animation("walking").unwrap();
        let engine = engine.borrow();
        let holder = engine.world().unwrap().fox.animation();
        assert_eq!(holder.current(), holder.action("walking").unwrap());
    }

    #[test]
    fn init_twice_is_rejected() {
        let canvas = FakeCanvas::new();
        let mut viewer = viewer();
        viewer.init(Some(&canvas), resources()).unwrap();

        let err = viewer.init(Some(&canvas), resources()).unwrap_err();
        assert!(err.is("already-initialized"));
    }

    #[test]
    fn destroy_is_idempotent() {
        let canvas = FakeCanvas::new();
        let mut viewer = viewer();
        viewer.init(Some(&canvas), resources()).unwrap();
        let services = Rc::clone(viewer.services());

        viewer.destroy();
        viewer.destroy();

        assert_eq!(viewer.state(), ViewerState::Destroyed);
        assert!(viewer.engine().is_none());
        assert!(!services.time.is_running());
        assert_eq!(canvas.log.borrow().disposals, 1);

        services.sizes.resize(640, 480, 1.0);
        assert!(services.time.tick(Instant::now()).is_none());
        assert!(canvas.log.borrow().frames.is_empty());

        let err = viewer.init(Some(&canvas), resources()).unwrap_err();
        assert!(err.is("viewer-destroyed"));
    }

    #[test]
    fn destroy_before_init_is_a_no_op() {
        let mut viewer = viewer();
        viewer.destroy();
        assert!(viewer.engine().is_none());
    }
}
