pub mod obj;
pub mod texture;

use std::path::Path;

use crate::error::{AssetError, AssetResult};
use crate::io::FileTypeResolver;
use crate::scene::MeshCollection;

use obj::LoadOptions;

/// Mesh file formats the crate can read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MeshFormat {
    WavefrontObj,
}

impl MeshFormat {
    pub const ALL: [MeshFormat; 1] = [MeshFormat::WavefrontObj];

    /// File name pattern claimed by this format.
    pub fn pattern(self) -> &'static str {
        match self {
            MeshFormat::WavefrontObj => r"^.*\.obj$",
        }
    }

    pub fn resolver() -> AssetResult<FileTypeResolver<MeshFormat>> {
        let mut resolver = FileTypeResolver::new();
        for format in Self::ALL {
            resolver.register(format.pattern(), format)?;
        }
        Ok(resolver)
    }

    pub fn detect(path: impl AsRef<Path>) -> AssetResult<Option<MeshFormat>> {
        Ok(Self::resolver()?.resolve(path).copied())
    }
}

/// Loads every mesh in `path`, choosing the loader from the file name.
pub fn load_meshes(path: impl AsRef<Path>, options: &LoadOptions) -> AssetResult<MeshCollection> {
    let path = path.as_ref();
    let format = MeshFormat::detect(path)?
        .ok_or_else(|| AssetError::UnresolvedType(path.display().to_string()))?;
    load_meshes_as(path, format, options)
}

pub fn load_meshes_as(
    path: impl AsRef<Path>,
    format: MeshFormat,
    options: &LoadOptions,
) -> AssetResult<MeshCollection> {
    let path = path.as_ref();
    log::debug!("Loading {} as {:?}", path.display(), format);
    match format {
        MeshFormat::WavefrontObj => obj::load_obj(path, options),
    }
}
