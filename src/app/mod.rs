pub mod cli;
pub mod error;

use crate::loaders::obj::LoadOptions;
use crate::loaders::texture::load_texture;
use crate::loaders::{self, MeshFormat};

use cli::AppConfig;
use error::AppError;

pub fn run_from_env() -> Result<(), AppError> {
    let config = cli::parse_from_env().map_err(AppError::Cli)?;
    run(config)
}

/// Loads the asset named by `config` and logs what it contains. Files no
/// mesh loader claims are treated as textures.
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let options = LoadOptions {
        strict_references: config.strict,
    };

    if let Some(format) = MeshFormat::detect(&config.asset_path)? {
        let meshes = loaders::load_meshes_as(&config.asset_path, format, &options)?;
        for mesh in &meshes {
            let material = mesh.material();
            log::info!(
                "mesh '{}': {} triangle(s), material {}, texture {}",
                mesh.name(),
                mesh.triangle_count(),
                material.map_or("<none>", |m| m.name.as_str()),
                material
                    .and_then(|m| m.texture.as_ref())
                    .map_or_else(|| "<none>".to_string(), |t| format!("{}x{}", t.width(), t.height()))
            );
        }
    } else {
        let texture = load_texture(&config.asset_path)?;
        log::info!(
            "texture: {}x{} from {:?}",
            texture.width(),
            texture.height(),
            texture.source()
        );
    }

    Ok(())
}
