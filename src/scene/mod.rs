mod layout;
mod model;
pub mod primitives;

pub use layout::{Semantic, VertexAttribute, VertexLayout};
pub use model::{Material, Mesh, MeshCollection, Vertex};
