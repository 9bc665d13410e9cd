//! Pixel shaders for triangle rasterization.
//!
//! The rasterizers handle coverage: scanline traversal or bounding-box
//! iteration, barycentric weights, and the depth test. The shader decides
//! the color of each covered pixel, mirroring how GPUs split the
//! fixed-function rasterizer from the fragment stage.

use crate::texture::{Tex2, Texture};

/// Per-pixel color computation.
///
/// `lambda` holds the barycentric weights `[a, b, c]` of the pixel and
/// `recip_w` the interpolated `1/w` at the same spot, which texture shaders
/// need to undo the perspective distortion of their attributes.
pub trait PixelShader {
    /// Tolerance for coverage: weights below `-EPSILON` reject the pixel.
    const EPSILON: f32;

    fn shade(&self, lambda: [f32; 3], recip_w: f32) -> u32;
}

/// Flat shader - one constant, already light-modulated color per triangle.
pub struct FlatShader {
    color: u32,
}

impl FlatShader {
    pub fn new(color: u32) -> Self {
        Self { color }
    }
}

impl PixelShader for FlatShader {
    const EPSILON: f32 = 1e-5;

    #[inline]
    fn shade(&self, _lambda: [f32; 3], _recip_w: f32) -> u32 {
        self.color
    }
}

/// Texture shader with perspective-correct UV interpolation.
///
/// Stores `u/w` and `v/w` per vertex; both interpolate linearly in screen
/// space, and dividing by the interpolated `1/w` recovers the true UV pair
/// at the pixel.
pub struct TextureShader<'a> {
    texture: &'a Texture,
    uv_over_w: [Tex2; 3],
}

impl<'a> TextureShader<'a> {
    /// `texcoords` must already be in texture row order (V flipped);
    /// `inv_w` is `1/w` of the matching vertices.
    pub fn new(texture: &'a Texture, texcoords: [Tex2; 3], inv_w: [f32; 3]) -> Self {
        let uv_over_w = [
            Tex2::new(texcoords[0].u * inv_w[0], texcoords[0].v * inv_w[0]),
            Tex2::new(texcoords[1].u * inv_w[1], texcoords[1].v * inv_w[1]),
            Tex2::new(texcoords[2].u * inv_w[2], texcoords[2].v * inv_w[2]),
        ];
        Self { texture, uv_over_w }
    }
}

impl PixelShader for TextureShader<'_> {
    const EPSILON: f32 = 1e-6;

    #[inline]
    fn shade(&self, lambda: [f32; 3], recip_w: f32) -> u32 {
        let u_over_w = lambda[0] * self.uv_over_w[0].u
            + lambda[1] * self.uv_over_w[1].u
            + lambda[2] * self.uv_over_w[2].u;
        let v_over_w = lambda[0] * self.uv_over_w[0].v
            + lambda[1] * self.uv_over_w[1].v
            + lambda[2] * self.uv_over_w[2].v;

        self.texture.sample(u_over_w / recip_w, v_over_w / recip_w)
    }
}
