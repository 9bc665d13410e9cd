//! Low-level rendering primitives.
//!
//! Provides the [`Renderer`] struct which owns the color and depth buffers
//! and implements the basic drawing operations: pixels, DDA lines,
//! rectangles, the background grid, and triangle wireframes.

use super::framebuffer::FrameBuffer;
use super::rasterizer::Triangle;
use crate::colors;

pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![colors::BACKGROUND; size],
            depth_buffer: vec![1.0; size],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = (width * height) as usize;
        self.color_buffer = vec![colors::BACKGROUND; size];
        self.depth_buffer = vec![1.0; size];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Reset every depth to the far clear value `1.0`.
    #[inline]
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(1.0);
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let index = (y as u32 * self.width + x as u32) as usize;
            self.color_buffer[index] = color;
        }
    }

    /// Read back a color value; None outside the buffer.
    pub fn pixel_at(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.color_buffer[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }

    /// Read back a depth value; out-of-range reads see the far clear value.
    pub fn depth_at(&self, x: i32, y: i32) -> f32 {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.depth_buffer[(y as u32 * self.width + x as u32) as usize]
        } else {
            1.0
        }
    }

    /// Dot the background at every `spacing`-th row/column intersection.
    /// The first row and column stay clear so the grid does not hug the
    /// window border.
    pub fn draw_grid(&mut self, spacing: i32, color: u32) {
        let mut y = spacing;
        while y < self.height as i32 {
            let mut x = spacing;
            while x < self.width as i32 {
                self.set_pixel(x, y, color);
                x += spacing;
            }
            y += spacing;
        }
    }

    #[inline]
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        for dy in 0..height {
            for dx in 0..width {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Draws a line with the DDA algorithm, both endpoints included.
    ///
    /// Steps along the longer axis one pixel at a time, accumulating the
    /// fractional increment on the other axis and rounding at every step.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let delta_x = x1 - x0;
        let delta_y = y1 - y0;

        let side_length = delta_x.abs().max(delta_y.abs());
        if side_length == 0 {
            self.set_pixel(x0, y0, color);
            return;
        }

        let x_increment = delta_x as f32 / side_length as f32;
        let y_increment = delta_y as f32 / side_length as f32;

        let mut current_x = x0 as f32;
        let mut current_y = y0 as f32;
        for _ in 0..=side_length {
            self.set_pixel(current_x.round() as i32, current_y.round() as i32, color);
            current_x += x_increment;
            current_y += y_increment;
        }
    }

    /// Outline a screen-space triangle. Wireframes are drawn on top of the
    /// frame and do not participate in depth testing.
    pub fn draw_triangle_wireframe(&mut self, triangle: &Triangle, color: u32) {
        let [p0, p1, p2] = triangle.points;

        self.draw_line(p0.x as i32, p0.y as i32, p1.x as i32, p1.y as i32, color);
        self.draw_line(p1.x as i32, p1.y as i32, p2.x as i32, p2.y as i32, color);
        self.draw_line(p2.x as i32, p2.y as i32, p0.x as i32, p0.y as i32, color);
    }

    pub fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_fills_every_pixel() {
        let mut renderer = Renderer::new(4, 4);
        renderer.clear(0xFF123456);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(renderer.pixel_at(x, y), Some(0xFF123456));
            }
        }
    }

    #[test]
    fn clear_depth_resets_to_far() {
        let mut renderer = Renderer::new(2, 2);
        renderer.as_framebuffer().set_pixel_with_depth(0, 0, 0.1, 1);
        renderer.clear_depth();
        assert_eq!(renderer.depth_at(0, 0), 1.0);
    }

    #[test]
    fn line_endpoints_are_inclusive() {
        let mut renderer = Renderer::new(20, 20);
        renderer.draw_line(2, 3, 10, 7, 0xFFFFFFFF);
        assert_eq!(renderer.pixel_at(2, 3), Some(0xFFFFFFFF));
        assert_eq!(renderer.pixel_at(10, 7), Some(0xFFFFFFFF));
    }

    #[test]
    fn single_point_line_is_drawn() {
        let mut renderer = Renderer::new(4, 4);
        renderer.draw_line(1, 1, 1, 1, 0xFFFFFFFF);
        assert_eq!(renderer.pixel_at(1, 1), Some(0xFFFFFFFF));
    }

    #[test]
    fn vertical_line_covers_every_row() {
        let mut renderer = Renderer::new(8, 8);
        renderer.draw_line(3, 1, 3, 6, 0xFFFFFFFF);
        for y in 1..=6 {
            assert_eq!(renderer.pixel_at(3, y), Some(0xFFFFFFFF));
        }
    }

    #[test]
    fn grid_skips_first_row_and_column() {
        let mut renderer = Renderer::new(30, 30);
        renderer.draw_grid(10, colors::GRID);
        assert_eq!(renderer.pixel_at(0, 0), Some(colors::BACKGROUND));
        assert_eq!(renderer.pixel_at(10, 0), Some(colors::BACKGROUND));
        assert_eq!(renderer.pixel_at(0, 10), Some(colors::BACKGROUND));
        assert_eq!(renderer.pixel_at(10, 10), Some(colors::GRID));
        assert_eq!(renderer.pixel_at(20, 10), Some(colors::GRID));
    }

    #[test]
    fn rect_is_clipped_at_the_border() {
        let mut renderer = Renderer::new(4, 4);
        renderer.draw_rect(2, 2, 5, 5, 0xFFFFFFFF);
        assert_eq!(renderer.pixel_at(3, 3), Some(0xFFFFFFFF));
        assert_eq!(renderer.pixel_at(1, 1), Some(colors::BACKGROUND));
    }
}
