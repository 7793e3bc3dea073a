use super::CameraState;
use crate::services::{PointerButton, PointerEvent, PointerKind};
use nalgebra_glm as glm;

const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 50.0;

/// Handles camera input and transformations
pub struct CameraController {
    state: CameraState,
    primary_pressed: bool,
    middle_pressed: bool,
    secondary_pressed: bool,
    last_pointer_pos: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new(state: CameraState) -> Self {
        Self {
            state,
            primary_pressed: false,
            middle_pressed: false,
            secondary_pressed: false,
            last_pointer_pos: None,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.state.aspect = aspect;
    }

    /// Feeds one pointer event. Returns true if the camera moved.
    pub fn on_pointer(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down(button) => {
                self.on_button(button, true);
                self.last_pointer_pos = Some((event.x, event.y));
                false
            }
            PointerKind::Up(button) => {
                self.on_button(button, false);
                false
            }
            PointerKind::Move => self.on_pointer_move((event.x, event.y)),
            PointerKind::Wheel { delta_y } => {
                self.simple_zoom(delta_y);
                true
            }
        }
    }

    fn on_button(&mut self, button: PointerButton, pressed: bool) {
        match button {
            PointerButton::Primary => self.primary_pressed = pressed,
            PointerButton::Middle => self.middle_pressed = pressed,
            PointerButton::Secondary => self.secondary_pressed = pressed,
        }
        if !pressed {
            self.last_pointer_pos = None;
        }
    }

    fn on_pointer_move(&mut self, position: (f64, f64)) -> bool {
        let should_pan = self.middle_pressed || self.secondary_pressed;
        let should_rotate = self.primary_pressed;

        if !should_pan && !should_rotate {
            self.last_pointer_pos = None;
            return false;
        }

        let mut handled = false;
        if let Some(last_pos) = self.last_pointer_pos {
            let delta_x = (position.0 - last_pos.0) as f32;
            let delta_y = (position.1 - last_pos.1) as f32;
            if should_rotate {
                self.rotate(delta_x, delta_y);
            } else {
                self.pan(delta_x, delta_y);
            }
            handled = true;
        }
        self.last_pointer_pos = Some(position);
        handled
    }

    /// Rotate camera around target
    fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.state.yaw -= delta_x * 0.01;
        self.state.pitch += delta_y * 0.01;
        self.state.pitch = self.state.pitch.clamp(-1.5, 1.5);
    }

    /// Pan camera (move target)
    fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let forward = glm::normalize(&(glm::vec3(
            self.state.target[0],
            self.state.target[1],
            self.state.target[2],
        ) - self.state.eye()));
        let right = glm::normalize(&glm::cross(&forward, &glm::vec3(0.0, 1.0, 0.0)));
        let up = glm::cross(&right, &forward);

        // Pan speed based on distance
        let pan_speed = self.state.distance * 0.002;

        for i in 0..3 {
            self.state.target[i] += (-right[i] * delta_x + up[i] * delta_y) * pan_speed;
        }
    }

    /// Change distance only; positive delta zooms in.
    pub fn simple_zoom(&mut self, delta: f32) {
        let zoom_factor = 1.0 - delta * 0.1;
        self.state.distance = (self.state.distance * zoom_factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Reset camera to defaults
    pub fn reset(&mut self) {
        self.state.reset();
        self.last_pointer_pos = None;
    }
}
