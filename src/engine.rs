//! Core rendering engine.
//!
//! The [`Engine`] struct is the main entry point for the renderer. It owns
//! the scene (meshes, textures, camera, light) and drives the per-frame
//! pipeline: transform, cull, clip, project, shade, rasterize.

use crate::camera::Camera;
use crate::clipping::{ClipPolygon, Frustum};
use crate::colors;
use crate::light::DirectionalLight;
use crate::mesh::{LoadError, Mesh};
use crate::math::{Mat4, Vec3, Vec4};
use crate::projection::Projection;
use crate::render::{Rasterizer, RasterizerDispatcher, Renderer, Triangle};
use crate::texture::{Texture, TextureError, TextureId};

pub use crate::render::RasterizerType;

/// Cap on triangles drawn per frame; anything beyond is dropped silently.
pub const MAX_TRIANGLES: usize = 10_000;

const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_3;
const DEFAULT_Z_NEAR: f32 = 1.0;
const DEFAULT_Z_FAR: f32 = 50.0;

/// What gets drawn for each triangle of the render list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Wireframe only (key: 2)
    Wireframe,
    /// Wireframe + vertex markers (key: 1)
    WireframeVertices,
    /// Filled with the flat-shaded face color (key: 3)
    Filled,
    /// Filled + wireframe (key: 4)
    FilledWireframe,
    /// Textured (key: 5)
    #[default]
    Textured,
    /// Textured + wireframe (key: 6)
    TexturedWireframe,
}

/// Which faces are discarded before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    /// Draw everything (key: x)
    None,
    /// Skip faces pointing away from the camera (key: c)
    #[default]
    Backface,
}

pub struct Engine {
    renderer: Renderer,
    rasterizer: RasterizerDispatcher,
    triangles_to_render: Vec<Triangle>,
    meshes: Vec<Mesh>,
    textures: Vec<Texture>,
    camera: Camera,
    projection: Projection,
    projection_matrix: Mat4,
    frustum: Frustum,
    light: DirectionalLight,
    render_mode: RenderMode,
    cull_mode: CullMode,
    pub draw_grid: bool,
}

impl Engine {
    pub fn new(width: u32, height: u32) -> Self {
        let aspect_ratio = width as f32 / height as f32;
        let projection = Projection::new(DEFAULT_FOV_Y, aspect_ratio, DEFAULT_Z_NEAR, DEFAULT_Z_FAR);

        Self {
            renderer: Renderer::new(width, height),
            rasterizer: RasterizerDispatcher::new(RasterizerType::default()),
            triangles_to_render: Vec::new(),
            meshes: Vec::new(),
            textures: Vec::new(),
            camera: Camera::new(Vec3::new(0.0, 0.0, -5.0)),
            projection_matrix: projection.matrix(),
            frustum: projection.frustum(),
            projection,
            light: DirectionalLight::new(Vec3::new(0.0, 0.0, 1.0)),
            render_mode: RenderMode::default(),
            cull_mode: CullMode::default(),
            draw_grid: true,
        }
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    pub fn set_rasterizer(&mut self, rasterizer_type: RasterizerType) {
        self.rasterizer.set_type(rasterizer_type);
    }

    pub fn rasterizer(&self) -> RasterizerType {
        self.rasterizer.active_type()
    }

    /// Load an OBJ file and append it to the scene.
    pub fn load_mesh(&mut self, file_path: &str) -> Result<&mut Mesh, LoadError> {
        let mesh = Mesh::from_obj(file_path)?;
        self.meshes.push(mesh);
        Ok(self.meshes.last_mut().unwrap())
    }

    /// Decode a texture file into the shared texture table.
    pub fn load_texture(&mut self, file_path: &str) -> Result<TextureId, TextureError> {
        let texture = Texture::from_file(file_path)?;
        Ok(self.add_texture(texture))
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> &mut Mesh {
        self.meshes.push(mesh);
        self.meshes.last_mut().unwrap()
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_light_direction(&mut self, direction: Vec3) {
        self.light = DirectionalLight::new(direction);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        self.projection.set_aspect_ratio(width as f32 / height as f32);
        self.projection_matrix = self.projection.matrix();
        self.frustum = self.projection.frustum();
    }

    pub fn width(&self) -> u32 {
        self.renderer.width()
    }

    pub fn height(&self) -> u32 {
        self.renderer.height()
    }

    /// Returns the rendered frame as bytes (ARGB8888).
    pub fn frame_buffer(&self) -> &[u8] {
        self.renderer.as_bytes()
    }

    /// Number of triangles queued by the last [`Engine::update`].
    pub fn triangle_count(&self) -> usize {
        self.triangles_to_render.len()
    }

    /// Read back a pixel of the last rendered frame.
    pub fn pixel_at(&self, x: i32, y: i32) -> Option<u32> {
        self.renderer.pixel_at(x, y)
    }

    /// Read back a depth value of the last rendered frame.
    pub fn depth_at(&self, x: i32, y: i32) -> f32 {
        self.renderer.depth_at(x, y)
    }

    /// Transform, cull, clip, project and shade every face, rebuilding the
    /// render list for this frame.
    pub fn update(&mut self) {
        let half_width = self.renderer.width() as f32 / 2.0;
        let half_height = self.renderer.height() as f32 / 2.0;
        let view_matrix = self.camera.view_matrix();
        let cull_backfaces = self.cull_mode == CullMode::Backface;

        let mut triangles = Vec::new();

        for mesh in &self.meshes {
            let rotation = mesh.rotation();
            let scale = mesh.scale();
            let translation = mesh.translation();

            // Model space -> world space, scale first and translation last.
            let world_matrix = Mat4::translation(translation.x, translation.y, translation.z)
                * Mat4::rotation_x(rotation.x)
                * Mat4::rotation_y(rotation.y)
                * Mat4::rotation_z(rotation.z)
                * Mat4::scaling(scale.x, scale.y, scale.z);

            let world_view = view_matrix * world_matrix;

            let vertices = mesh.vertices();
            for face in mesh.faces() {
                let (Some(&a), Some(&b), Some(&c)) = (
                    vertices.get(face.a as usize),
                    vertices.get(face.b as usize),
                    vertices.get(face.c as usize),
                ) else {
                    continue;
                };

                // Model space -> camera space in one step.
                let view_positions = [
                    (world_view * Vec4::from(a)).to_vec3(),
                    (world_view * Vec4::from(b)).to_vec3(),
                    (world_view * Vec4::from(c)).to_vec3(),
                ];

                let edge_ab = (view_positions[1] - view_positions[0]).normalize();
                let edge_ac = (view_positions[2] - view_positions[0]).normalize();
                let face_normal = edge_ab.cross(edge_ac).normalize();

                // The camera sits at the origin of camera space.
                if cull_backfaces {
                    let camera_ray = Vec3::ZERO - view_positions[0];
                    if face_normal.dot(camera_ray) < 0.0 {
                        continue;
                    }
                }

                let polygon =
                    ClipPolygon::from_triangle(view_positions, [face.a_uv, face.b_uv, face.c_uv]);
                let clipped = self.frustum.clip_polygon(polygon);
                if clipped.is_empty() {
                    continue;
                }

                let shaded_color = self.light.shade(face.color, face_normal);

                for (v0, v1, v2) in clipped.triangulate() {
                    let mut points = [Vec4::ZERO; 3];
                    for (point, vertex) in points.iter_mut().zip([v0, v1, v2]) {
                        let clip = self.projection_matrix * Vec4::from(vertex.position);

                        // Perspective divide; w stays for the rasterizer's
                        // perspective-correct interpolation. A w of zero is
                        // left undivided and rejected downstream.
                        let (mut x, mut y, mut z) = (clip.x, clip.y, clip.z);
                        if clip.w != 0.0 {
                            x /= clip.w;
                            y /= clip.w;
                            z /= clip.w;
                        }

                        // NDC -> pixel coordinates, with Y flipped to
                        // screen orientation.
                        *point = Vec4::new(
                            x * half_width + half_width,
                            -y * half_height + half_height,
                            z,
                            clip.w,
                        );
                    }

                    if triangles.len() < MAX_TRIANGLES {
                        triangles.push(Triangle::new(
                            points,
                            [v0.texcoord, v1.texcoord, v2.texcoord],
                            shaded_color,
                            mesh.texture(),
                        ));
                    }
                }
            }
        }

        self.triangles_to_render = triangles;
    }

    /// Draw the current render list into the framebuffer.
    pub fn render(&mut self) {
        self.renderer.clear(colors::BACKGROUND);
        self.renderer.clear_depth();

        if self.draw_grid {
            self.renderer.draw_grid(10, colors::GRID);
        }

        let (draw_textured, draw_filled, draw_wireframe, draw_vertices) = match self.render_mode {
            RenderMode::Wireframe => (false, false, true, false),
            RenderMode::WireframeVertices => (false, false, true, true),
            RenderMode::Filled => (false, true, false, false),
            RenderMode::FilledWireframe => (false, true, true, false),
            RenderMode::Textured => (true, false, false, false),
            RenderMode::TexturedWireframe => (true, false, true, false),
        };

        if draw_textured || draw_filled {
            let mut fb = self.renderer.as_framebuffer();
            for triangle in &self.triangles_to_render {
                // Untextured meshes fall back to their flat-shaded color.
                let texture = if draw_textured {
                    triangle.texture.and_then(|id| self.textures.get(id.0))
                } else {
                    None
                };
                self.rasterizer.fill_triangle(triangle, &mut fb, texture);
            }
        }

        for triangle in &self.triangles_to_render {
            if draw_wireframe {
                self.renderer
                    .draw_triangle_wireframe(triangle, colors::WIREFRAME);
            }
            if draw_vertices {
                for vertex in &triangle.points {
                    self.renderer.draw_rect(
                        vertex.x as i32 - 2,
                        vertex.y as i32 - 2,
                        4,
                        4,
                        colors::VERTEX,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Face;
    use crate::texture::Tex2;

    const W: u32 = 100;
    const H: u32 = 100;

    /// One triangle straight ahead of the default camera, wound so its
    /// normal faces the viewer.
    fn facing_triangle() -> Mesh {
        let vertices = vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-1.0, -1.0, 0.0),
        ];
        let faces = vec![Face::new(0, 1, 2, Tex2::ZERO, Tex2::ZERO, Tex2::ZERO)];
        Mesh::new(vertices, faces)
    }

    #[test]
    fn visible_triangle_reaches_the_render_list() {
        let mut engine = Engine::new(W, H);
        engine.add_mesh(facing_triangle());
        engine.update();
        assert_eq!(engine.triangle_count(), 1);
    }

    #[test]
    fn backface_is_culled_unless_disabled() {
        let mut engine = Engine::new(W, H);
        // Reverse winding flips the face normal away from the camera.
        let mesh = facing_triangle();
        let reversed = Mesh::new(
            mesh.vertices().to_vec(),
            vec![Face::new(2, 1, 0, Tex2::ZERO, Tex2::ZERO, Tex2::ZERO)],
        );
        engine.add_mesh(reversed);

        engine.update();
        assert_eq!(engine.triangle_count(), 0);

        engine.set_cull_mode(CullMode::None);
        engine.update();
        assert_eq!(engine.triangle_count(), 1);
    }

    #[test]
    fn filled_render_writes_pixels_inside_the_screen() {
        let mut engine = Engine::new(W, H);
        engine.draw_grid = false;
        engine.add_mesh(facing_triangle());
        engine.set_render_mode(RenderMode::Filled);
        engine.update();
        engine.render();

        let lit = (0..H as i32)
            .flat_map(|y| (0..W as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| engine.pixel_at(x, y) != Some(colors::BACKGROUND))
            .count();
        assert!(lit > 0);

        // The triangle sits at camera-space z = 5, so every covered pixel
        // carries depth 1 - 1/5.
        use approx::assert_relative_eq;
        assert_relative_eq!(engine.depth_at(50, 50), 0.8, epsilon = 1e-5);
    }

    #[test]
    fn out_of_range_face_indices_are_skipped() {
        let mut engine = Engine::new(W, H);
        let mesh = Mesh::new(
            vec![Vec3::new(0.0, 1.0, 0.0)],
            vec![Face::new(0, 7, 9, Tex2::ZERO, Tex2::ZERO, Tex2::ZERO)],
        );
        engine.add_mesh(mesh);
        engine.update();
        assert_eq!(engine.triangle_count(), 0);
    }

    #[test]
    fn near_plane_clip_splits_a_triangle_in_two() {
        let mut engine = Engine::new(W, H);
        engine.set_cull_mode(CullMode::None);
        // Camera sits at z=-5; one vertex closer than the near plane.
        let vertices = vec![
            Vec3::new(0.0, 0.05, -4.5),
            Vec3::new(1.0, -0.5, 0.0),
            Vec3::new(-1.0, -0.5, 0.0),
        ];
        let faces = vec![Face::new(0, 1, 2, Tex2::ZERO, Tex2::ZERO, Tex2::ZERO)];
        engine.add_mesh(Mesh::new(vertices, faces));

        engine.update();
        assert_eq!(engine.triangle_count(), 2);
    }
}
