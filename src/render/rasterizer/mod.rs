//! Triangle rasterization algorithms.
//!
//! Two interchangeable implementations sit behind the [`Rasterizer`] trait:
//!
//! - [`ScanlineRasterizer`]: flat-bottom/flat-top decomposition, walking
//!   horizontal spans. The default.
//! - [`EdgeFunctionRasterizer`]: bounding-box iteration with per-pixel edge
//!   tests, kept around for comparison and benchmarking.
//!
//! Both share the same per-pixel fill: barycentric weights with a small
//! negative tolerance, interpolated `1/w`, a strict-less depth test on
//! `1 - 1/w`, and a pixel shader for the color.

mod edgefunction;
mod scanline;
pub mod shader;

pub use edgefunction::EdgeFunctionRasterizer;
pub use scanline::ScanlineRasterizer;

use super::framebuffer::FrameBuffer;
use crate::math::utils::edge_function;
use crate::math::vec2::Vec2;
use crate::math::vec4::Vec4;
use crate::texture::{Tex2, Texture, TextureId};
use shader::PixelShader;

/// A triangle ready for rasterization.
///
/// `points` hold screen-space x/y, NDC z, and the original clip-space w of
/// each vertex; `color` is the face color with lighting already applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub points: [Vec4; 3],
    pub texcoords: [Tex2; 3],
    pub color: u32,
    pub texture: Option<TextureId>,
}

impl Triangle {
    pub fn new(
        points: [Vec4; 3],
        texcoords: [Tex2; 3],
        color: u32,
        texture: Option<TextureId>,
    ) -> Self {
        Self {
            points,
            texcoords,
            color,
            texture,
        }
    }
}

/// Trait for triangle fill algorithms.
///
/// When `texture` is present the triangle is textured with
/// perspective-correct UVs; otherwise it is filled with its flat color.
pub trait Rasterizer {
    fn fill_triangle(
        &self,
        triangle: &Triangle,
        buffer: &mut FrameBuffer,
        texture: Option<&Texture>,
    );
}

/// Available rasterization algorithms, switchable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterizerType {
    #[default]
    Scanline,
    EdgeFunction,
}

impl std::fmt::Display for RasterizerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterizerType::Scanline => write!(f, "Scanline"),
            RasterizerType::EdgeFunction => write!(f, "EdgeFunction"),
        }
    }
}

/// Internal dispatcher that holds both rasterizer implementations.
pub struct RasterizerDispatcher {
    scanline: ScanlineRasterizer,
    edge_function: EdgeFunctionRasterizer,
    active: RasterizerType,
}

impl RasterizerDispatcher {
    pub fn new(rasterizer_type: RasterizerType) -> Self {
        Self {
            scanline: ScanlineRasterizer::new(),
            edge_function: EdgeFunctionRasterizer::new(),
            active: rasterizer_type,
        }
    }

    pub fn set_type(&mut self, rasterizer_type: RasterizerType) {
        self.active = rasterizer_type;
    }

    pub fn active_type(&self) -> RasterizerType {
        self.active
    }
}

impl Rasterizer for RasterizerDispatcher {
    #[inline]
    fn fill_triangle(
        &self,
        triangle: &Triangle,
        buffer: &mut FrameBuffer,
        texture: Option<&Texture>,
    ) {
        match self.active {
            RasterizerType::Scanline => self.scanline.fill_triangle(triangle, buffer, texture),
            RasterizerType::EdgeFunction => {
                self.edge_function.fill_triangle(triangle, buffer, texture)
            }
        }
    }
}

/// Flip V on a vertex's texture coordinates: source UVs are Y-up, texture
/// rows are stored top-down.
#[inline]
pub(crate) fn flip_v(texcoords: [Tex2; 3]) -> [Tex2; 3] {
    [
        Tex2::new(texcoords[0].u, 1.0 - texcoords[0].v),
        Tex2::new(texcoords[1].u, 1.0 - texcoords[1].v),
        Tex2::new(texcoords[2].u, 1.0 - texcoords[2].v),
    ]
}

/// Shade one pixel of a triangle, if it is covered.
///
/// `a`, `b`, `c` are the integer-snapped screen vertices and `inv_w` their
/// `1/w` values. Barycentric weights are taken from the signed-area form;
/// anything more negative than the shader's tolerance is outside. Depth is
/// `1 - 1/w` with a strict-less test against the stored value.
#[inline]
pub(crate) fn fill_pixel<S: PixelShader>(
    x: i32,
    y: i32,
    a: Vec2,
    b: Vec2,
    c: Vec2,
    inv_area: f32,
    inv_w: [f32; 3],
    buffer: &mut FrameBuffer,
    shader: &S,
) {
    let p = Vec2::new(x as f32, y as f32);

    let alpha = edge_function(b, c, p) * inv_area;
    let beta = edge_function(c, a, p) * inv_area;
    let gamma = 1.0 - alpha - beta;

    if alpha < -S::EPSILON || beta < -S::EPSILON || gamma < -S::EPSILON {
        return;
    }

    let recip_w = alpha * inv_w[0] + beta * inv_w[1] + gamma * inv_w[2];
    let depth = 1.0 - recip_w;

    // Depth test before shading; occluded pixels skip the texture fetch.
    if depth < buffer.depth_at(x, y) {
        let color = shader.shade([alpha, beta, gamma], recip_w);
        buffer.set_pixel_with_depth(x, y, depth, color);
    }
}
