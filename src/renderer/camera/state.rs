use nalgebra_glm as glm;

/// Orbit camera around `target`, Y-up.
#[derive(Debug, Clone)]
pub struct CameraState {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub default_yaw: f32,
    pub default_pitch: f32,
    pub default_distance: f32,
    pub default_target: [f32; 3],
}

impl CameraState {
    pub fn new(yaw: f32, pitch: f32, distance: f32, target: [f32; 3]) -> Self {
        Self {
            yaw,
            pitch,
            distance,
            target,
            fov_degrees: 35.0,
            near: 0.1,
            far: 100.0,
            aspect: 1.0,
            default_yaw: yaw,
            default_pitch: pitch,
            default_distance: distance,
            default_target: target,
        }
    }

    /// Orbit state that places the eye at `position`, looking at the origin.
    pub fn looking_at_origin(position: [f32; 3]) -> Self {
        let [x, y, z] = position;
        let distance = (x * x + y * y + z * z).sqrt();
        let pitch = if distance > 0.0 { (y / distance).asin() } else { 0.0 };
        let yaw = x.atan2(z);
        Self::new(yaw, pitch, distance, [0.0, 0.0, 0.0])
    }

    pub fn with_projection(mut self, fov_degrees: f32, near: f32, far: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self.near = near;
        self.far = far;
        self
    }

    pub fn reset(&mut self) {
        self.yaw = self.default_yaw;
        self.pitch = self.default_pitch;
        self.distance = self.default_distance;
        self.target = self.default_target;
    }

    pub fn get_orientation(&self) -> (f32, f32) {
        (self.yaw, self.pitch)
    }

    pub fn eye(&self) -> glm::Vec3 {
        glm::vec3(
            self.target[0] + self.distance * self.pitch.cos() * self.yaw.sin(),
            self.target[1] + self.distance * self.pitch.sin(),
            self.target[2] + self.distance * self.pitch.cos() * self.yaw.cos(),
        )
    }

    pub fn view_proj(&self) -> glm::Mat4 {
        let proj = glm::perspective_rh_zo(self.aspect, self.fov_degrees.to_radians(), self.near, self.far);
        let center = glm::vec3(self.target[0], self.target[1], self.target[2]);
        let up = glm::vec3(0.0, 1.0, 0.0);
        let view = glm::look_at(&self.eye(), &center, &up);
        proj * view
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::looking_at_origin([6.0, 4.0, 8.0])
    }
}
