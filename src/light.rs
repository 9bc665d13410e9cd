//! Lighting types for the renderer.

use crate::colors;
use crate::math::vec3::Vec3;

/// A directional light that illuminates the scene uniformly from a direction.
///
/// Directional lights are ideal for simulating distant light sources like the
/// sun, where all rays are effectively parallel.
pub struct DirectionalLight {
    /// The normalized direction the light is pointing (not where it comes from).
    pub direction: Vec3,
}

impl DirectionalLight {
    /// Create a new directional light pointing in the given direction.
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec3) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
        }
    }

    /// Lambert factor for a face normal.
    ///
    /// Returns a raw, unclamped alignment in `[-1, 1]`: positive when the
    /// surface faces the light, negative when it faces away. Clamping happens
    /// when the factor is applied to a color.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        -normal.dot(self.direction)
    }

    /// Shade a packed color by the Lambert factor of `normal`.
    pub fn shade(&self, color: u32, normal: Vec3) -> u32 {
        colors::modulate(color, self.intensity(normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn surface_facing_the_light_gets_full_intensity() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, 1.0));
        let normal = Vec3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(light.intensity(normal), 1.0, epsilon = 1e-6);
        assert_eq!(light.shade(0xFFAABBCC, normal), 0xFFAABBCC);
    }

    #[test]
    fn surface_facing_away_is_zeroed_but_keeps_alpha() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0));
        let normal = Vec3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(light.intensity(normal), -1.0, epsilon = 1e-6);
        assert_eq!(light.shade(0xFFAABBCC, normal), 0xFF000000);
    }

    #[test]
    fn angled_surface_gets_partial_intensity() {
        let light = DirectionalLight::new(Vec3::new(0.0, -1.0, 0.0));
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert_relative_eq!(light.intensity(normal), 0.7071, epsilon = 1e-3);
    }
}
