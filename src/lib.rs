pub mod app;
pub mod error;
pub mod io;
pub mod loaders;
pub mod math;
pub mod scene;

pub use error::{AssetError, AssetResult};
pub use loaders::obj::LoadOptions;
pub use loaders::texture::{Texture, load_texture};
pub use loaders::{MeshFormat, load_meshes, load_meshes_as};
pub use scene::{Material, Mesh, MeshCollection, Vertex};
