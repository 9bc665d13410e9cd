use std::path::Path;

/// Texture coordinates in OBJ convention: `v` grows upward at input.
/// The rasterizer flips `v` to the texture's row order before sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tex2 {
    pub u: f32,
    pub v: f32,
}

impl Tex2 {
    pub const ZERO: Self = Self { u: 0.0, v: 0.0 };

    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }

    /// Linearly interpolate between two coordinate pairs.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            u: self.u + (other.u - self.u) * t,
            v: self.v + (other.v - self.v) * t,
        }
    }
}

/// Handle into the engine's texture table.
///
/// Meshes and render triangles refer to textures by index so the immutable
/// bitmaps can be shared by any number of readers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureId(pub(crate) usize);

/// An immutable 2D bitmap for texture mapping, stored as packed ARGB.
pub struct Texture {
    data: Vec<u32>,
    width: u32,
    height: u32,
}

#[derive(Debug)]
pub enum TextureError {
    Image(image::ImageError),
    Empty,
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::Image(e) => write!(f, "failed to decode texture: {}", e),
            TextureError::Empty => write!(f, "texture has zero width or height"),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Image(e) => Some(e),
            TextureError::Empty => None,
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::Image(e)
    }
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }

        // Convert RGBA bytes to packed ARGB
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a texture from raw ARGB pixels.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height` or either dimension is zero.
    pub fn from_pixels(data: Vec<u32>, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "texture must not be empty");
        assert_eq!(data.len(), (width * height) as usize);
        Self {
            data,
            width,
            height,
        }
    }

    /// Sample the texel covering the UV pair, wrapping outside `[0, 1)`.
    ///
    /// Callers are expected to pass `v` already in the texture's row order
    /// (top row first); the rasterizer performs the flip.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let x = (u * self.width as f32).abs() as u32 % self.width;
        let y = (v * self.height as f32).abs() as u32 % self.height;
        self.data[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Texture {
        // Row 0: red, green. Row 1: blue, white.
        Texture::from_pixels(
            vec![0xFFFF0000, 0xFF00FF00, 0xFF0000FF, 0xFFFFFFFF],
            2,
            2,
        )
    }

    #[test]
    fn sample_picks_the_covering_texel() {
        let tex = two_by_two();
        assert_eq!(tex.sample(0.0, 0.0), 0xFFFF0000);
        assert_eq!(tex.sample(0.75, 0.0), 0xFF00FF00);
        assert_eq!(tex.sample(0.0, 0.75), 0xFF0000FF);
        assert_eq!(tex.sample(0.75, 0.75), 0xFFFFFFFF);
    }

    #[test]
    fn sample_wraps_out_of_range_coordinates() {
        let tex = two_by_two();
        assert_eq!(tex.sample(1.0, 0.0), tex.sample(0.0, 0.0));
        assert_eq!(tex.sample(2.75, 0.0), tex.sample(0.75, 0.0));
    }

    #[test]
    fn lerp_interpolates_both_components() {
        let a = Tex2::new(0.0, 1.0);
        let b = Tex2::new(1.0, 0.0);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid, Tex2::new(0.5, 0.5));
    }
}
