//! Rendering internals: buffers, drawing primitives, and rasterizers.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;

pub use framebuffer::FrameBuffer;
pub use rasterizer::{Rasterizer, RasterizerDispatcher, RasterizerType, Triangle};
pub use renderer::Renderer;
