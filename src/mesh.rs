//! 3D mesh representation and loading.
//!
//! Provides the [`Mesh`] struct for storing vertices and faces, along with
//! OBJ file loading support via the `tobj` crate.
//!
//! UV coordinates live on the [`Face`], not in the vertex table: the same
//! vertex shared by several faces can map to a different texture spot in
//! each of them.

use std::fmt;
use std::path::Path;

use crate::colors;
use crate::math::vec3::Vec3;
use crate::texture::{Tex2, TextureId};

/// A triangle face: zero-based indices into the mesh's vertex array,
/// per-corner UV coordinates, and the face's base color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub a_uv: Tex2,
    pub b_uv: Tex2,
    pub c_uv: Tex2,
    pub color: u32,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32, a_uv: Tex2, b_uv: Tex2, c_uv: Tex2) -> Self {
        Self {
            a,
            b,
            c,
            a_uv,
            b_uv,
            c_uv,
            color: colors::FILL,
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Tobj(tobj::LoadError),
    NoModels,
    NoVertices,
    InvalidFaces,
    IndexOutOfRange,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Tobj(e) => write!(f, "failed to load OBJ: {}", e),
            LoadError::NoModels => write!(f, "OBJ file contains no models"),
            LoadError::NoVertices => write!(f, "mesh has no vertices"),
            LoadError::InvalidFaces => write!(f, "face indices not divisible by 3"),
            LoadError::IndexOutOfRange => write!(f, "face references a missing vertex"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Tobj(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Tobj(e)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    texture: Option<TextureId>,
    rotation: Vec3,
    scale: Vec3,
    translation: Vec3,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            vertices,
            faces,
            texture: None,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            translation: Vec3::ZERO,
        }
    }

    /// Load the first model of a Wavefront OBJ file.
    ///
    /// Faces are triangulated by the loader; positions and texture
    /// coordinates keep separate index streams so each face corner carries
    /// its own UV pair. On-disk indices are 1-based and arrive 0-based from
    /// `tobj`; they are range-checked here.
    pub fn from_obj<P: AsRef<Path>>(file_path: P) -> Result<Self, LoadError> {
        let load_options = tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(file_path.as_ref(), &load_options)?;

        // For now we only support a single model
        let model = models.into_iter().next().ok_or(LoadError::NoModels)?;
        let mesh = model.mesh;

        if mesh.positions.is_empty() {
            return Err(LoadError::NoVertices);
        }

        if mesh.indices.len() % 3 != 0 {
            return Err(LoadError::InvalidFaces);
        }

        // Convert flat [x, y, z, x, y, z, ...] to Vec3
        let vertices: Vec<Vec3> = mesh
            .positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();

        let uv_at = |i: usize| -> Tex2 {
            match mesh.texcoord_indices.get(i) {
                Some(&ti) => {
                    let ti = ti as usize * 2;
                    let u = mesh.texcoords.get(ti).copied().unwrap_or(0.0);
                    let v = mesh.texcoords.get(ti + 1).copied().unwrap_or(0.0);
                    Tex2::new(u, v)
                }
                None => Tex2::ZERO,
            }
        };

        let mut faces = Vec::with_capacity(mesh.indices.len() / 3);
        for (face_index, corner) in mesh.indices.chunks_exact(3).enumerate() {
            if corner.iter().any(|&i| i as usize >= vertices.len()) {
                return Err(LoadError::IndexOutOfRange);
            }
            let base = face_index * 3;
            faces.push(Face::new(
                corner[0],
                corner[1],
                corner[2],
                uv_at(base),
                uv_at(base + 1),
                uv_at(base + 2),
            ));
        }

        Ok(Self::new(vertices, faces))
    }

    /// A unit cube centered on the origin, used when no mesh file is given.
    pub fn cube() -> Self {
        Self::new(CUBE_VERTICES.to_vec(), CUBE_FACES.to_vec())
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn set_texture(&mut self, texture: Option<TextureId>) {
        self.texture = texture;
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn rotation_mut(&mut self) -> &mut Vec3 {
        &mut self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn scale_mut(&mut self) -> &mut Vec3 {
        &mut self.scale
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn translation_mut(&mut self) -> &mut Vec3 {
        &mut self.translation
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }
}

const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

const UV_00: Tex2 = Tex2::new(0.0, 0.0);
const UV_01: Tex2 = Tex2::new(0.0, 1.0);
const UV_10: Tex2 = Tex2::new(1.0, 0.0);
const UV_11: Tex2 = Tex2::new(1.0, 1.0);

const CUBE_FACES: [Face; 12] = [
    // Front face
    Face::new(0, 1, 2, UV_01, UV_11, UV_10),
    Face::new(0, 2, 3, UV_01, UV_10, UV_00),
    // Right face
    Face::new(3, 2, 4, UV_01, UV_11, UV_10),
    Face::new(3, 4, 5, UV_01, UV_10, UV_00),
    // Back face
    Face::new(5, 4, 6, UV_01, UV_11, UV_10),
    Face::new(5, 6, 7, UV_01, UV_10, UV_00),
    // Left face
    Face::new(7, 6, 1, UV_01, UV_11, UV_10),
    Face::new(7, 1, 0, UV_01, UV_10, UV_00),
    // Top face
    Face::new(1, 6, 4, UV_01, UV_11, UV_10),
    Face::new(1, 4, 2, UV_01, UV_10, UV_00),
    // Bottom face
    Face::new(5, 7, 0, UV_01, UV_11, UV_10),
    Face::new(5, 0, 3, UV_01, UV_10, UV_00),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_face_indices_are_in_range() {
        let cube = Mesh::cube();
        let vertex_count = cube.vertices().len() as u32;
        for face in cube.faces() {
            assert!(face.a < vertex_count);
            assert!(face.b < vertex_count);
            assert!(face.c < vertex_count);
        }
    }

    #[test]
    fn cube_has_twelve_faces() {
        let cube = Mesh::cube();
        assert_eq!(cube.faces().len(), 12);
        assert_eq!(cube.vertices().len(), 8);
    }

    #[test]
    fn new_mesh_starts_with_identity_transform() {
        let cube = Mesh::cube();
        assert_eq!(cube.rotation(), Vec3::ZERO);
        assert_eq!(cube.scale(), Vec3::ONE);
        assert_eq!(cube.translation(), Vec3::ZERO);
        assert_eq!(cube.texture(), None);
    }
}
