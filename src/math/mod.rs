//! Vector and matrix primitives used throughout the pipeline.

pub mod mat4;
pub mod utils;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
