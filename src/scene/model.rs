use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::loaders::texture::Texture;
use crate::math::{Color4, Vector2, Vector3, Vector4};

use super::layout::{Semantic, VertexAttribute, VertexLayout};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vector4,
    pub normal: Vector3,
    pub color: Color4,
    pub tex_coords: Vector2,
}

impl Vertex {
    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: 52,
        attributes: &[
            VertexAttribute::new(Semantic::Position, 4, 0),
            VertexAttribute::new(Semantic::Normal, 3, 16),
            VertexAttribute::new(Semantic::Color, 4, 28),
            VertexAttribute::new(Semantic::TexCoord, 2, 44),
        ],
    };
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vector4::zero(),
            normal: Vector3::zero(),
            color: Color4::WHITE,
            tex_coords: Vector2::zero(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub ambient: Color4,
    pub diffuse: Color4,
    pub specular: Color4,
    pub texture: Option<Texture>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: Color4::WHITE,
            diffuse: Color4::GRAY,
            specular: Color4::BLACK,
            texture: None,
        }
    }
}

/// Non-indexed triangle list. Every three vertices form one triangle.
#[derive(Clone, Debug)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    material: Option<Arc<Material>>,
}

impl Mesh {
    /// Returns `None` when `vertices` is not a whole number of triangles.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        material: Option<Arc<Material>>,
    ) -> Option<Self> {
        if vertices.len() % 3 != 0 {
            return None;
        }
        Some(Self {
            name: name.into(),
            vertices,
            material,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn material(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    /// Raw vertex bytes laid out as described by [`Vertex::LAYOUT`].
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Meshes keyed by name, iterated in the order they were first added.
#[derive(Clone, Debug, Default)]
pub struct MeshCollection {
    meshes: Vec<Mesh>,
    by_name: HashMap<String, usize>,
}

impl MeshCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `mesh` unless its name is taken. Returns whether it was added.
    pub fn insert(&mut self, mesh: Mesh) -> bool {
        if self.by_name.contains_key(mesh.name()) {
            return false;
        }
        self.by_name.insert(mesh.name().to_string(), self.meshes.len());
        self.meshes.push(mesh);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Mesh> {
        self.by_name.get(name).map(|&index| &self.meshes[index])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mesh> {
        self.meshes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.meshes.iter().map(Mesh::name)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn into_meshes(self) -> Vec<Mesh> {
        self.meshes
    }
}

impl<'a> IntoIterator for &'a MeshCollection {
    type Item = &'a Mesh;
    type IntoIter = std::slice::Iter<'a, Mesh>;

    fn into_iter(self) -> Self::IntoIter {
        self.meshes.iter()
    }
}
