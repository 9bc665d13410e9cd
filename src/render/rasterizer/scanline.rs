//! Scanline triangle rasterization.
//!
//! Classic flat-top/flat-bottom decomposition: vertices are sorted by Y,
//! the triangle is treated as an upper half with a flat bottom edge and a
//! lower half with a flat top edge, and each half is filled one horizontal
//! span at a time by walking the edge inverse slopes.
//!
//! Attribute interpolation happens per pixel from barycentric weights
//! rather than along the spans, so sorting only has to keep the vertex
//! attributes (UVs and w) aligned with the positions.

use super::shader::{FlatShader, PixelShader, TextureShader};
use super::{fill_pixel, flip_v, Rasterizer, Triangle};
use crate::math::utils::triangle_area;
use crate::math::vec2::Vec2;
use crate::math::vec4::Vec4;
use crate::render::framebuffer::FrameBuffer;
use crate::texture::{Tex2, Texture};

pub struct ScanlineRasterizer;

impl ScanlineRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Sort the three vertices by ascending Y, swapping texture coordinates
    /// in lockstep. Three compare-and-swaps suffice.
    fn sort_by_y(points: &mut [Vec4; 3], texcoords: &mut [Tex2; 3]) {
        if points[1].y < points[0].y {
            points.swap(0, 1);
            texcoords.swap(0, 1);
        }
        if points[2].y < points[1].y {
            points.swap(1, 2);
            texcoords.swap(1, 2);
        }
        if points[1].y < points[0].y {
            points.swap(0, 1);
            texcoords.swap(0, 1);
        }
    }

    /// Fill both halves of a y-sorted triangle.
    fn rasterize<S: PixelShader>(points: [Vec4; 3], buffer: &mut FrameBuffer, shader: &S) {
        let (x0, y0) = (points[0].x as i32, points[0].y as i32);
        let (x1, y1) = (points[1].x as i32, points[1].y as i32);
        let (x2, y2) = (points[2].x as i32, points[2].y as i32);

        if points.iter().any(|p| p.w == 0.0) {
            return;
        }
        let inv_w = [1.0 / points[0].w, 1.0 / points[1].w, 1.0 / points[2].w];

        let a = Vec2::new(x0 as f32, y0 as f32);
        let b = Vec2::new(x1 as f32, y1 as f32);
        let c = Vec2::new(x2 as f32, y2 as f32);

        let area = triangle_area(a, b, c);
        if area == 0.0 {
            return;
        }
        let inv_area = 1.0 / area;

        // Upper half: flat bottom edge at y1.
        if y1 != y0 {
            let inv_slope_1 = (x1 - x0) as f32 / (y1 - y0).abs() as f32;
            let inv_slope_2 = (x2 - x0) as f32 / (y2 - y0).abs() as f32;

            for y in y0..=y1 {
                let x_start = (x1 as f32 + (y - y1) as f32 * inv_slope_1) as i32;
                let x_end = (x0 as f32 + (y - y0) as f32 * inv_slope_2) as i32;
                let (left, right) = if x_end < x_start {
                    (x_end, x_start)
                } else {
                    (x_start, x_end)
                };
                for x in left..=right {
                    fill_pixel(x, y, a, b, c, inv_area, inv_w, buffer, shader);
                }
            }
        }

        // Lower half: flat top edge at y1.
        if y2 != y1 {
            let inv_slope_1 = (x2 - x1) as f32 / (y2 - y1).abs() as f32;
            let inv_slope_2 = (x2 - x0) as f32 / (y2 - y0).abs() as f32;

            for y in y1..=y2 {
                let x_start = (x1 as f32 + (y - y1) as f32 * inv_slope_1) as i32;
                let x_end = (x0 as f32 + (y - y0) as f32 * inv_slope_2) as i32;
                let (left, right) = if x_end < x_start {
                    (x_end, x_start)
                } else {
                    (x_start, x_end)
                };
                for x in left..=right {
                    fill_pixel(x, y, a, b, c, inv_area, inv_w, buffer, shader);
                }
            }
        }
    }
}

impl Default for ScanlineRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for ScanlineRasterizer {
    fn fill_triangle(
        &self,
        triangle: &Triangle,
        buffer: &mut FrameBuffer,
        texture: Option<&Texture>,
    ) {
        let mut points = triangle.points;
        let mut texcoords = triangle.texcoords;
        Self::sort_by_y(&mut points, &mut texcoords);

        match texture {
            Some(tex) => {
                if points.iter().any(|p| p.w == 0.0) {
                    return;
                }
                let inv_w = [1.0 / points[0].w, 1.0 / points[1].w, 1.0 / points[2].w];
                let shader = TextureShader::new(tex, flip_v(texcoords), inv_w);
                Self::rasterize(points, buffer, &shader);
            }
            None => {
                let shader = FlatShader::new(triangle.color);
                Self::rasterize(points, buffer, &shader);
            }
        }
    }
}
