//! Look-at camera driven by yaw/pitch angles.
//!
//! The camera stores its position plus yaw (rotation around Y) and pitch
//! (rotation around X). Its viewing direction is derived from those angles
//! each frame by rotating the +Z unit vector, and the view matrix is built
//! by aiming at `position + direction`.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// Keep pitch strictly inside (-PI/2, PI/2) so the look-at basis never
/// degenerates when the view direction aligns with the up vector.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.001;

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    direction: Vec3,
    forward_velocity: Vec3,
    yaw: f32,
    pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Creates a camera at the given position, looking along +Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            direction: Vec3::FORWARD,
            forward_velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Computes the point the camera is aimed at.
    ///
    /// The viewing direction is the +Z unit vector rotated by pitch around X
    /// and then by yaw around Y; the target is one unit along it.
    pub fn lookat_target(&mut self) -> Vec3 {
        self.direction = Vec3::FORWARD.rotate_x(self.pitch).rotate_y(self.yaw);
        self.position + self.direction
    }

    /// Builds the view matrix for the current position and orientation.
    pub fn view_matrix(&mut self) -> Mat4 {
        let target = self.lookat_target();
        Mat4::look_at(self.position, target, Vec3::UP)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Moves the camera by a world-space delta.
    pub fn update_position(&mut self, delta: Vec3) {
        self.position = self.position + delta;
    }

    /// Returns the current viewing direction (derived from yaw/pitch).
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn forward_velocity(&self) -> Vec3 {
        self.forward_velocity
    }

    pub fn set_forward_velocity(&mut self, velocity: Vec3) {
        self.forward_velocity = velocity;
    }

    /// Rotates the camera horizontally. Positive values look right.
    pub fn rotate_yaw(&mut self, delta: f32) {
        self.yaw += delta;
    }

    /// Rotates the camera vertically, clamped away from straight up/down.
    pub fn rotate_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn camera_starts_looking_forward() {
        let mut camera = Camera::new(Vec3::ZERO);
        let target = camera.lookat_target();
        assert_relative_eq!(target.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(target.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(target.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn yaw_quarter_turn_faces_positive_x() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate_yaw(std::f32::consts::FRAC_PI_2);
        let target = camera.lookat_target();
        assert_relative_eq!(target.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(target.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn pitch_is_clamped_short_of_vertical() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate_pitch(std::f32::consts::PI);
        assert!(camera.pitch() < std::f32::consts::FRAC_PI_2);
        camera.rotate_pitch(-std::f32::consts::TAU);
        assert!(camera.pitch() > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn view_matrix_moves_camera_to_origin() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, -5.0));
        let view = camera.view_matrix();
        let eye = view * crate::math::vec4::Vec4::point(0.0, 0.0, -5.0);
        assert_relative_eq!(eye.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn update_position_accumulates_velocity() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.set_forward_velocity(Vec3::new(0.0, 0.0, 0.5));
        let velocity = camera.forward_velocity();
        camera.update_position(velocity);
        camera.update_position(velocity);
        assert_relative_eq!(camera.position().z, 1.0, epsilon = 1e-6);
    }
}
