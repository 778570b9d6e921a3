use glam::{Mat4, Vec2, Vec3};

use crate::api::config::CameraConfig;

/// Directions the free-fly camera can move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-fly perspective camera driven by yaw/pitch angles.
///
/// All inputs are absorbed: pitch and zoom are clamped, never rejected.
/// The forward/right/up basis is recomputed whenever the angles change.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    world_up: Vec3,
    /// Degrees. -90 looks down -Z.
    yaw: f32,
    /// Degrees, within `[-pitch_limit, pitch_limit]`.
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    /// Vertical field of view in degrees.
    zoom: f32,
    speed: f32,
    sensitivity: f32,
    min_zoom: f32,
    max_zoom: f32,
    pitch_limit: f32,
}

impl FlyCamera {
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: Vec3::from_array(config.position),
            world_up: Vec3::from_array(config.world_up).normalize_or(Vec3::Y),
            yaw: config.yaw,
            pitch: 0.0,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            zoom: config.zoom.clamp(config.min_zoom, config.max_zoom),
            speed: config.speed,
            sensitivity: config.sensitivity,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            pitch_limit: config.pitch_limit,
        };
        camera.pitch = config.pitch.clamp(-camera.pitch_limit, camera.pitch_limit);
        camera.update_vectors();
        camera
    }

    /// Rotate by a pointer delta (x right, y up).
    pub fn apply_look(&mut self, delta: Vec2) {
        self.yaw += delta.x * self.sensitivity;
        self.pitch = (self.pitch + delta.y * self.sensitivity)
            .clamp(-self.pitch_limit, self.pitch_limit);
        self.update_vectors();
    }

    /// Narrow the field of view by the scroll amount (scroll up zooms in).
    pub fn apply_zoom(&mut self, scroll: f32) {
        self.zoom = (self.zoom - scroll).clamp(self.min_zoom, self.max_zoom);
    }

    /// Translate along the camera basis for `dt` seconds.
    pub fn apply_movement(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Right-handed look-at from the eye towards `position + front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// OpenGL-convention perspective projection using the current zoom.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect, near, far)
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_looks_down_negative_z() {
        let cam = FlyCamera::default();
        assert!(approx(cam.front(), Vec3::NEG_Z));
        assert!(approx(cam.right(), Vec3::X));
        assert!(approx(cam.up(), Vec3::Y));
    }

    #[test]
    fn look_scales_by_sensitivity() {
        let mut cam = FlyCamera::default();
        cam.apply_look(Vec2::new(100.0, 50.0));
        assert!((cam.yaw() - (-80.0)).abs() < 1e-4);
        assert!((cam.pitch() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = FlyCamera::default();
        for _ in 0..50 {
            cam.apply_look(Vec2::new(0.0, 1000.0));
            assert!(cam.pitch() <= 89.0 && cam.pitch() >= -89.0);
        }
        assert_eq!(cam.pitch(), 89.0);
        cam.apply_look(Vec2::new(0.0, -1.0e6));
        assert_eq!(cam.pitch(), -89.0);
        // Basis stays well-formed at the limit.
        assert!(cam.right().is_finite() && (cam.right().length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = FlyCamera::default();
        cam.apply_zoom(10.0);
        assert_eq!(cam.zoom(), 35.0);
        cam.apply_zoom(1000.0);
        assert_eq!(cam.zoom(), 1.0);
        cam.apply_zoom(-1000.0);
        assert_eq!(cam.zoom(), 45.0);
    }

    #[test]
    fn movement_follows_basis() {
        let mut cam = FlyCamera::default();
        cam.apply_movement(CameraMovement::Forward, 1.0);
        assert!(approx(cam.position, Vec3::new(0.0, 0.0, 0.5)));
        cam.apply_movement(CameraMovement::Right, 2.0);
        assert!(approx(cam.position, Vec3::new(5.0, 0.0, 0.5)));
        cam.apply_movement(CameraMovement::Left, 2.0);
        cam.apply_movement(CameraMovement::Backward, 1.0);
        assert!(approx(cam.position, Vec3::new(0.0, 0.0, 3.0)));
    }

    #[test]
    fn zero_dt_does_not_move() {
        let mut cam = FlyCamera::default();
        cam.apply_movement(CameraMovement::Forward, 0.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let mut cam = FlyCamera::default();
        cam.apply_look(Vec2::new(123.0, -45.0));
        let eye = cam.view_matrix().transform_point3(cam.position);
        assert!(eye.length() < 1e-4);
        // A point straight ahead lands on the view -Z axis.
        let ahead = cam.view_matrix().transform_point3(cam.position + cam.front() * 2.0);
        assert!(approx(ahead, Vec3::new(0.0, 0.0, -2.0)));
    }
}
