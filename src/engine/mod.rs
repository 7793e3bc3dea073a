// Per-frame engine: camera, scene, world, resources and the render backend

pub mod backend;
pub mod scene;

pub use backend::{Frame, RenderBackend};
pub use scene::Scene;

use crate::debug::{DebugCommand, DebugObserver};
use crate::error::ViewerError;
use crate::renderer::camera::{CameraController, CameraState};
use crate::renderer::line_vertex::LineVertex;
use crate::renderer::lines;
use crate::resources::Resources;
use crate::services::{PointerEvent, Tick, Viewport};
use crate::settings::Settings;
use crate::ui::DebugPanel;
use crate::viewer::Canvas;
use crate::world::World;

const CAMERA_POSITION: [f32; 3] = [6.0, 4.0, 8.0];
const GRID_STEP: f32 = 0.5;
const GRID_COLOR: [f32; 3] = [0.25, 0.25, 0.28];
const GRID_MAJOR_COLOR: [f32; 3] = [0.4, 0.4, 0.45];
const FLOOR_COLOR: [f32; 3] = [0.55, 0.5, 0.4];
const BOUNDS_COLOR: [f32; 3] = [0.2, 0.8, 0.3];
const SUN_COLOR: [f32; 3] = [1.0, 0.85, 0.3];

pub struct Engine {
    settings: Settings,
    viewport: Viewport,
    camera: CameraController,
    scene: Scene,
    resources: Resources,
    world: Option<World>,
    world_error: Option<ViewerError>,
    load_reported: bool,
    backend: Box<dyn RenderBackend>,
    debug: Option<DebugPanel>,
    ui_wants_pointer: bool,
    frames: u64,
    disposed: bool,
}

impl Engine {
    pub fn new(
        canvas: &dyn Canvas,
        settings: Settings,
        resources: Resources,
    ) -> Result<Self, ViewerError> {
        let viewport = canvas.viewport();
        let mut backend = canvas.create_backend()?;
        backend.resize(viewport);

        let display = &settings.display;
        let mut camera = CameraController::new(
            CameraState::looking_at_origin(CAMERA_POSITION).with_projection(
                display.field_of_view,
                display.near_plane,
                display.far_plane,
            ),
        );
        camera.set_aspect(viewport.aspect());

        let debug = settings.viewer.debug.then(DebugPanel::new);
        log::info!(
            "Engine created at {}x{} (debug panel: {})",
            viewport.width,
            viewport.height,
            debug.is_some()
        );

        Ok(Self {
            settings,
            viewport,
            camera,
            scene: Scene::new(),
            resources,
            world: None,
            world_error: None,
            load_reported: false,
            backend,
            debug,
            ui_wants_pointer: false,
            frames: 0,
            disposed: false,
        })
    }

    /// Advances one frame and renders it.
    pub fn update(&mut self, tick: &Tick) -> Result<(), ViewerError> {
        if self.disposed {
            return Ok(());
        }

        self.load_resources();
        self.apply_debug_commands();

        if let Some(world) = &mut self.world {
            world.update(tick.delta as f32);
        }

        let ui = self.run_ui();
        let frame = self.compose_frame();
        self.backend.render(&frame, ui)?;
        self.frames += 1;
        Ok(())
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if self.disposed {
            return;
        }
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        self.backend.resize(viewport);
    }

    /// Forwards pointer input to the camera unless the debug panel has it.
    /// Returns true if the camera moved.
    pub fn pointer(&mut self, event: &PointerEvent) -> bool {
        if self.disposed || self.ui_wants_pointer {
            return false;
        }
        self.camera.on_pointer(event)
    }

    /// Puts the camera back where it started.
    pub fn reset_camera(&mut self) {
        if self.disposed {
            return;
        }
        self.camera.reset();
    }

    pub fn play_animation(&mut self, name: &str) -> Result<(), ViewerError> {
        let world = self
            .world
            .as_mut()
            .ok_or_else(|| ViewerError::resource_not_found(crate::resources::FOX_MODEL))?;
        world.fox.play(name)?;
        if let Some(debug) = &mut self.debug {
            debug.current_changed(crate::world::fox::DEBUG_FOLDER, name);
        }
        Ok(())
    }

    /// Stops animations, drops the world and releases the backend. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Some(mut world) = self.world.take() {
            world.dispose();
        }
        self.scene.clear();
        self.backend.dispose();
        self.debug = None;
        log::info!("Engine disposed after {} frames", self.frames);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn debug_panel(&self) -> Option<&DebugPanel> {
        self.debug.as_ref()
    }

    pub fn debug_panel_mut(&mut self) -> Option<&mut DebugPanel> {
        self.debug.as_mut()
    }

    /// First failed resource load, if any.
    pub fn load_error(&self) -> Option<ViewerError> {
        self.resources
            .failures()
            .iter()
            .next()
            .map(|(name, cause)| ViewerError::resource_load(name, cause.clone()))
    }

    fn load_resources(&mut self) {
        self.resources.poll();

        if !self.load_reported
            && let Some(err) = self.load_error()
        {
            log::error!("{}", err);
            self.load_reported = true;
        }

        if self.world.is_some() || self.world_error.is_some() || !self.resources.is_ready() {
            return;
        }

        let debug = self.debug.as_mut().map(|d| d as &mut dyn DebugObserver);
        match World::new(&mut self.scene, &self.resources, &self.settings, debug) {
            Ok(world) => {
                log::info!("World ready with {} scene nodes", self.scene.nodes().len());
                self.world = Some(world);
            }
            Err(e) => {
                log::error!("Failed to build world: {}", e);
                self.scene.clear();
                self.world_error = Some(e);
            }
        }
    }

    fn apply_debug_commands(&mut self) {
        let Some(debug) = &mut self.debug else {
            return;
        };

        for command in debug.take_commands() {
            match command {
                DebugCommand::ResetCamera => self.camera.reset(),
                DebugCommand::Play { folder, name } => {
                    let result = match &mut self.world {
                        Some(world) => world.play(&folder, &name),
                        None => Err(ViewerError::resource_not_found(crate::resources::FOX_MODEL)),
                    };
                    match result {
                        Ok(()) => debug.current_changed(&folder, &name),
                        Err(e) => log::warn!("Debug play failed: {}", e),
                    }
                }
                DebugCommand::CopySnapshot { folder } => {
                    let json = self
                        .world
                        .as_ref()
                        .ok_or_else(|| ViewerError::resource_not_found(crate::resources::FOX_MODEL))
                        .and_then(|world| world.snapshot(&folder))
                        .and_then(|snapshot| {
                            serde_json::to_string_pretty(&snapshot).map_err(|e| {
                                ViewerError::new("snapshot-serialize").push_std(e)
                            })
                        });
                    match json {
                        Ok(json) => debug.copy_to_clipboard(json),
                        Err(e) => log::warn!("Snapshot copy failed: {}", e),
                    }
                }
            }
        }
    }

    fn run_ui(&mut self) -> Option<egui::FullOutput> {
        let panel = self.debug.as_mut()?;
        let (ctx, raw_input) = self.backend.take_ui_input()?;

        let settings = &mut self.settings;
        let output = ctx.run(raw_input, |ctx| {
            panel.show(ctx, &mut settings.ui, &mut settings.display)
        });
        self.ui_wants_pointer = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
        Some(output)
    }

    fn compose_frame(&self) -> Frame {
        let display = &self.settings.display;
        let mut line_vertices: Vec<LineVertex> = Vec::new();

        let radius = self
            .world
            .as_ref()
            .map(|w| w.floor.radius())
            .unwrap_or(self.settings.environment.floor_radius);

        if display.show_grid {
            line_vertices.extend(lines::floor_grid(radius, GRID_STEP, 2, GRID_COLOR, GRID_MAJOR_COLOR));
        }

        if let Some(world) = &self.world {
            line_vertices.extend(lines::floor_circle(radius, 64, FLOOR_COLOR));

            if display.show_bounding_box
                && let Some((min, max)) = world.fox.world_bounds(&self.scene)
            {
                line_vertices.extend(lines::bounding_box(min, max, BOUNDS_COLOR));
            }
        }

        if display.show_sun
            && let Some(sun) = self.scene.sun()
        {
            line_vertices.extend(lines::light_ray(sun.position, SUN_COLOR));
        }

        Frame {
            view_proj: self.camera.state().view_proj(),
            clear_color: self.settings.viewer.clear_color,
            lines: line_vertices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::backend::testing::FakeCanvas;
    use super::*;
    use crate::animation::AnimationClip;
    use crate::resources::{CharacterAsset, FOX_MODEL, MeshInfo, default_sources};
    use crate::services::{PointerButton, PointerKind};

    fn loaded_resources() -> Resources {
        let mut resources = Resources::new(default_sources("unused.gltf"));
        resources.insert(
            FOX_MODEL,
            CharacterAsset {
                name: "Fox".into(),
                meshes: vec![MeshInfo {
                    name: "fox".into(),
                    bounds_min: [-10.0, 0.0, -50.0],
                    bounds_max: [10.0, 80.0, 50.0],
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

    fn tick(delta: f64) -> Tick {
        Tick {
            elapsed: delta,
            delta,
        }
    }

    #[test]
    fn first_update_builds_world_and_renders() {
        let canvas = FakeCanvas::new();
        let mut engine = Engine::new(&canvas, Settings::default(), loaded_resources()).unwrap();

        engine.update(&tick(0.016)).unwrap();

        let world = engine.world().expect("world built");
        assert_eq!(world.fox.animation().current_name(), "idle");
        assert_eq!(engine.frames(), 1);

        let log = canvas.log.borrow();
        assert_eq!(log.frames.len(), 1);
        assert!(!log.frames[0].lines.is_empty());
        assert_eq!(log.ui_frames, 0);
    }

    #[test]
    fn world_waits_for_resources() {
        let canvas = FakeCanvas::new();
        let resources = Resources::new(default_sources("unused.gltf"));
        let mut engine = Engine::new(&canvas, Settings::default(), resources).unwrap();

        engine.update(&tick(0.016)).unwrap();

        assert!(engine.world().is_none());
        assert!(engine.play_animation("walking").unwrap_err().is("resource-not-found"));
        assert_eq!(canvas.log.borrow().frames.len(), 1);
    }

    #[test]
    fn play_animation_switches_current() {
        let canvas = FakeCanvas::new();
        let mut engine = Engine::new(&canvas, Settings::default(), loaded_resources()).unwrap();
        engine.update(&tick(0.016)).unwrap();

        engine.play_animation("walking").unwrap();
        let holder = engine.world().unwrap().fox.animation();
        assert_eq!(holder.current(), holder.action("walking").unwrap());

        let err = engine.play_animation("swimming").unwrap_err();
        assert!(err.is("animation-not-found"));
    }

    #[test]
    fn resize_reaches_camera_and_backend() {
        let canvas = FakeCanvas::new();
        let mut engine = Engine::new(&canvas, Settings::default(), loaded_resources()).unwrap();

        engine.resize(Viewport::new(1000, 500, 1.0));

        assert_eq!(engine.camera().state().aspect, 2.0);
        let log = canvas.log.borrow();
        assert_eq!(log.resizes.last().map(|v| v.width), Some(1000));
    }

    #[test]
    fn pointer_drag_rotates_camera() {
        let canvas = FakeCanvas::new();
        let mut engine = Engine::new(&canvas, Settings::default(), loaded_resources()).unwrap();
        let yaw = engine.camera().state().yaw;

        let event = |x: f64, kind| PointerEvent {
            x,
            y: 300.0,
            ndc: [0.0, 0.0],
            kind,
        };
        engine.pointer(&event(400.0, PointerKind::Down(PointerButton::Primary)));
        assert!(engine.pointer(&event(450.0, PointerKind::Move)));

        assert_ne!(engine.camera().state().yaw, yaw);
    }

    #[test]
    fn reset_camera_after_drag_restores_the_start_view() {
        let mut canvas = FakeCanvas::new();
        canvas.with_ui = true;
        let mut settings = Settings::default();
        settings.viewer.debug = true;
        let mut engine = Engine::new(&canvas, settings, loaded_resources()).unwrap();
        engine.update(&tick(0.016)).unwrap();
        let start = engine.camera().state().clone();

        let event = |x: f64, kind| PointerEvent {
            x,
            y: 300.0,
            ndc: [0.0, 0.0],
            kind,
        };
        engine.pointer(&event(400.0, PointerKind::Down(PointerButton::Primary)));
        engine.pointer(&event(520.0, PointerKind::Move));
        engine.pointer(&event(520.0, PointerKind::Up(PointerButton::Primary)));
        assert_ne!(engine.camera().state().yaw, start.yaw);

        engine.debug_panel_mut().unwrap().request_camera_reset();
        engine.update(&tick(0.016)).unwrap();

        let state = engine.camera().state();
        assert_eq!(state.yaw, start.yaw);
        assert_eq!(state.pitch, start.pitch);
        assert_eq!(state.distance, start.distance);
        assert_eq!(state.target, start.target);
    }

    #[test]
    fn reset_camera_without_debug_panel() {
        let canvas = FakeCanvas::new();
        let mut engine = Engine::new(&canvas, Settings::default(), loaded_resources()).unwrap();
        let yaw = engine.camera().state().yaw;

        let event = |x: f64, kind| PointerEvent {
            x,
            y: 300.0,
            ndc: [0.0, 0.0],
            kind,
        };
        engine.pointer(&event(400.0, PointerKind::Down(PointerButton::Primary)));
        engine.pointer(&event(450.0, PointerKind::Move));
        engine.reset_camera();

        assert_eq!(engine.camera().state().yaw, yaw);
    }

    #[test]
    fn dispose_is_idempotent_and_stops_rendering() {
        let canvas = FakeCanvas::new();
        let mut engine = Engine::new(&canvas, Settings::default(), loaded_resources()).unwrap();
        engine.update(&tick(0.016)).unwrap();

        engine.dispose();
        engine.dispose();
        engine.update(&tick(0.016)).unwrap();

        assert!(engine.is_disposed());
        assert!(engine.world().is_none());
        let log = canvas.log.borrow();
        assert_eq!(log.disposals, 1);
        assert_eq!(log.frames.len(), 1);
    }

    #[test]
    fn debug_commands_apply_on_next_update() {
        let mut canvas = FakeCanvas::new();
        canvas.with_ui = true;
        let mut settings = Settings::default();
        settings.viewer.debug = true;
        let mut engine = Engine::new(&canvas, settings, loaded_resources()).unwrap();
        engine.update(&tick(0.016)).unwrap();

        let panel = engine.debug_panel().unwrap();
        assert_eq!(panel.actions("fox"), ["idle", "walking", "running"]);
        assert_eq!(panel.current("fox"), Some("idle"));

        engine.debug_panel_mut().unwrap().request_play("fox", "running");
        engine.update(&tick(0.016)).unwrap();

        assert_eq!(engine.world().unwrap().fox.animation().current_name(), "running");
        assert_eq!(engine.debug_panel().unwrap().current("fox"), Some("running"));
        assert_eq!(canvas.log.borrow().ui_frames, 2);
    }

    #[test]
    fn unusable_model_leaves_scene_empty() {
        let canvas = FakeCanvas::new();
        let mut resources = Resources::new(default_sources("unused.gltf"));
        resources.insert(FOX_MODEL, CharacterAsset::default());
        let mut engine = Engine::new(&canvas, Settings::default(), resources).unwrap();

        engine.update(&tick(0.016)).unwrap();
        engine.update(&tick(0.016)).unwrap();

        assert!(engine.world().is_none());
        assert!(engine.scene().nodes().is_empty());
        assert_eq!(canvas.log.borrow().frames.len(), 2);
    }
}
