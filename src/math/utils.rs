//! Small geometric helpers shared by the rasterizers.

use super::vec2::Vec2;

/// Edge function of point `p` relative to the directed edge `a -> b`.
///
/// This is the 2D cross product `(b - a) x (p - a)`:
/// positive when `p` lies to the left of the edge, negative to the right,
/// zero on the edge. Summed over the three edges of a triangle it equals
/// twice the triangle's signed area.
#[inline]
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Signed area (times two) of the triangle `(a, b, c)`.
#[inline]
pub fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    edge_function(a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn edge_function_sign_tracks_side() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(edge_function(a, b, Vec2::new(5.0, 5.0)) > 0.0);
        assert!(edge_function(a, b, Vec2::new(5.0, -5.0)) < 0.0);
        assert_relative_eq!(edge_function(a, b, Vec2::new(5.0, 0.0)), 0.0);
    }

    #[test]
    fn triangle_area_matches_half_base_times_height() {
        let area = triangle_area(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 3.0),
        );
        assert_relative_eq!(area, 12.0, epsilon = 1e-6);
    }

    #[test]
    fn barycentric_weights_sum_to_one_inside() {
        let a = Vec2::new(10.0, 10.0);
        let b = Vec2::new(90.0, 10.0);
        let c = Vec2::new(50.0, 90.0);
        let inv_area = 1.0 / triangle_area(a, b, c);

        for p in [Vec2::new(50.0, 50.0), Vec2::new(30.0, 20.0), Vec2::new(60.0, 40.0)] {
            let alpha = edge_function(b, c, p) * inv_area;
            let beta = edge_function(c, a, p) * inv_area;
            let gamma = 1.0 - alpha - beta;
            assert_relative_eq!(alpha + beta + gamma, 1.0, epsilon = 1e-5);
            assert!(alpha >= -1e-5 && beta >= -1e-5 && gamma >= -1e-5);
        }
    }
}
