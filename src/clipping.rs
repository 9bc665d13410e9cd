//! View-space frustum clipping.
//!
//! Polygons are clipped against the six frustum planes with the
//! Sutherland-Hodgman algorithm before projection, then fanned back into
//! triangles for the rasterizer. Running in camera space keeps the plane
//! equations trivial: every side plane passes through the origin.

use crate::math::vec3::Vec3;
use crate::texture::Tex2;

/// A triangle clipped against six planes gains at most one vertex per cut,
/// so a clipped polygon never exceeds this size (nor does its fan exceed
/// `MAX_POLYGON_VERTICES - 2` triangles).
pub const MAX_POLYGON_VERTICES: usize = 10;

type Point = Vec3;
type Normal = Vec3;

/// A clipping plane as `(point on plane, inward-facing normal)`.
pub type Plane = (Point, Normal);

/// A polygon vertex carrying the attributes interpolated during clipping.
#[derive(Clone, Copy)]
pub struct ClipVertex {
    pub position: Vec3,
    pub texcoord: Tex2,
}

impl ClipVertex {
    pub fn new(position: Vec3, texcoord: Tex2) -> Self {
        Self { position, texcoord }
    }

    /// Interpolate position and UV toward `other` by the same factor.
    /// Used when a polygon edge crosses a clipping plane.
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            texcoord: self.texcoord.lerp(other.texcoord, t),
        }
    }

    /// Signed distance from this vertex to a plane.
    /// Positive = inside (same side as the normal), negative = outside.
    fn signed_distance(&self, plane: Plane) -> f32 {
        let (plane_point, plane_normal) = plane;
        (self.position - plane_point).dot(plane_normal)
    }
}

/// A polygon being carved down by successive plane clips.
pub struct ClipPolygon {
    pub vertices: Vec<ClipVertex>,
}

impl ClipPolygon {
    /// Create a polygon from a triangle's positions and UVs.
    pub fn from_triangle(positions: [Vec3; 3], texcoords: [Tex2; 3]) -> Self {
        let mut vertices = Vec::with_capacity(MAX_POLYGON_VERTICES);
        for i in 0..3 {
            vertices.push(ClipVertex::new(positions[i], texcoords[i]));
        }
        Self { vertices }
    }

    /// Returns true if the polygon has been completely clipped away.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Clip this polygon against a single plane (Sutherland-Hodgman).
    ///
    /// Walks the polygon's edges; whenever an edge crosses the plane the
    /// intersection vertex is emitted, and every end vertex on the inside is
    /// kept. A polygon fully inside the plane is returned unchanged.
    pub fn clip_against_plane(&self, plane: Plane) -> Self {
        let mut output = Vec::with_capacity(MAX_POLYGON_VERTICES);

        for i in 0..self.vertices.len() {
            let current = &self.vertices[i];
            let next = &self.vertices[(i + 1) % self.vertices.len()];

            let d_current = current.signed_distance(plane);
            let d_next = next.signed_distance(plane);

            // The edge straddles the plane: emit the intersection point.
            if d_current * d_next < 0.0 {
                let t = d_current / (d_current - d_next);
                output.push(current.lerp(next, t));
            }

            if d_next >= 0.0 {
                output.push(*next);
            }
        }

        Self { vertices: output }
    }

    /// Split this convex polygon into a triangle fan `(V0, Vi, Vi+1)`.
    pub fn triangulate(&self) -> impl Iterator<Item = (&ClipVertex, &ClipVertex, &ClipVertex)> {
        (1..self.vertices.len().saturating_sub(1))
            .map(move |i| (&self.vertices[0], &self.vertices[i], &self.vertices[i + 1]))
    }
}

/// The six view-space frustum planes, in clipping order.
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    /// Build the frustum planes from the camera's field of view.
    ///
    /// The four side planes pass through the origin and lean inward by half
    /// the FOV on their axis; the near and far planes sit on the Z axis.
    pub fn new(fov_x: f32, fov_y: f32, z_near: f32, z_far: f32) -> Self {
        let half_fov_x = fov_x / 2.0;
        let half_fov_y = fov_y / 2.0;

        let left = (
            Vec3::ZERO,
            Vec3::new(half_fov_x.cos(), 0.0, half_fov_x.sin()),
        );
        let right = (
            Vec3::ZERO,
            Vec3::new(-half_fov_x.cos(), 0.0, half_fov_x.sin()),
        );
        let top = (
            Vec3::ZERO,
            Vec3::new(0.0, -half_fov_y.cos(), half_fov_y.sin()),
        );
        let bottom = (
            Vec3::ZERO,
            Vec3::new(0.0, half_fov_y.cos(), half_fov_y.sin()),
        );
        let near = (Vec3::new(0.0, 0.0, z_near), Vec3::new(0.0, 0.0, 1.0));
        let far = (Vec3::new(0.0, 0.0, z_far), Vec3::new(0.0, 0.0, -1.0));

        Self {
            planes: [left, right, top, bottom, near, far],
        }
    }

    /// Clip a polygon against all six planes in turn.
    /// The result may be empty if the polygon lies fully outside.
    pub fn clip_polygon(&self, polygon: ClipPolygon) -> ClipPolygon {
        let mut result = polygon;

        for plane in &self.planes {
            if result.is_empty() {
                break;
            }
            result = result.clip_against_plane(*plane);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_3;

    fn frustum() -> Frustum {
        Frustum::new(FRAC_PI_3, FRAC_PI_3, 1.0, 50.0)
    }

    fn triangle(positions: [Vec3; 3]) -> ClipPolygon {
        ClipPolygon::from_triangle(positions, [Tex2::ZERO; 3])
    }

    #[test]
    fn fully_visible_triangle_is_unchanged() {
        let positions = [
            Vec3::new(-0.5, -0.5, 5.0),
            Vec3::new(0.5, -0.5, 5.0),
            Vec3::new(0.0, 0.5, 5.0),
        ];
        let clipped = frustum().clip_polygon(triangle(positions));

        // Each pass over a plane rotates the start vertex but must neither
        // add, drop, nor move vertices when everything is inside.
        assert_eq!(clipped.vertices.len(), 3);
        for original in positions {
            assert!(clipped.vertices.iter().any(|v| {
                (v.position.x - original.x).abs() < 1e-6
                    && (v.position.y - original.y).abs() < 1e-6
                    && (v.position.z - original.z).abs() < 1e-6
            }));
        }
    }

    #[test]
    fn fully_outside_triangle_is_discarded() {
        let clipped = frustum().clip_polygon(triangle([
            Vec3::new(-0.5, -0.5, -5.0),
            Vec3::new(0.5, -0.5, -5.0),
            Vec3::new(0.0, 0.5, -5.0),
        ]));
        assert!(clipped.is_empty());
    }

    #[test]
    fn near_plane_cut_yields_a_quad() {
        // One vertex in front of the near plane, two behind it.
        let clipped = frustum().clip_polygon(triangle([
            Vec3::new(0.0, 0.2, 0.5),
            Vec3::new(-0.5, -0.2, 5.0),
            Vec3::new(0.5, -0.2, 5.0),
        ]));

        assert_eq!(clipped.vertices.len(), 4);
        for vertex in &clipped.vertices {
            assert!(vertex.position.z >= 1.0 - 1e-6);
        }
        assert_eq!(clipped.triangulate().count(), 2);
    }

    #[test]
    fn clip_interpolates_texcoords_by_edge_fraction() {
        // Edge from z=0 to z=2 against the near plane at z=1: t = 0.5.
        let polygon = ClipPolygon::from_triangle(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 2.0),
                Vec3::new(1.0, 0.0, 2.0),
            ],
            [
                Tex2::new(0.0, 0.0),
                Tex2::new(0.0, 1.0),
                Tex2::new(1.0, 0.0),
            ],
        );
        let plane = (Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0));
        let clipped = polygon.clip_against_plane(plane);

        assert_eq!(clipped.vertices.len(), 4);
        let crossing: Vec<&ClipVertex> = clipped
            .vertices
            .iter()
            .filter(|v| (v.position.z - 1.0).abs() < 1e-6)
            .collect();
        assert_eq!(crossing.len(), 2);
        for vertex in crossing {
            let uv_sum = vertex.texcoord.u + vertex.texcoord.v;
            assert_relative_eq!(uv_sum, 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn triangle_fan_count_tracks_vertex_count() {
        let positions = [
            Vec3::new(-0.5, -0.5, 5.0),
            Vec3::new(0.5, -0.5, 5.0),
            Vec3::new(0.0, 0.5, 5.0),
        ];
        let polygon = triangle(positions);
        assert_eq!(polygon.triangulate().count(), 1);
    }
}
