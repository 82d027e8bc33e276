use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{AssetError, AssetResult};
use crate::io::resolve_relative;
use crate::loaders::texture::load_texture;
use crate::math::Color4;
use crate::scene::Material;

use super::index::{directive_value, parse_components, parse_f32_component};
use super::types::LoadOptions;

#[derive(Default)]
struct PendingMaterial {
    name: String,
    ambient: Option<Color4>,
    diffuse: Option<Color4>,
    specular: Option<Color4>,
    alpha: Option<f32>,
    ambient_map: Option<PathBuf>,
    diffuse_map: Option<PathBuf>,
    specular_map: Option<PathBuf>,
}

impl PendingMaterial {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Builds the material, or `None` when no texture map was declared.
    fn finish(self, options: &LoadOptions) -> AssetResult<Option<Material>> {
        let Some(texture_path) = self
            .ambient_map
            .or(self.diffuse_map)
            .or(self.specular_map)
        else {
            log::debug!("Material '{}' has no texture map; skipped", self.name);
            return Ok(None);
        };

        let mut material = Material::new(self.name);
        material.ambient = self.ambient.unwrap_or(material.ambient);
        material.diffuse = self.diffuse.unwrap_or(material.diffuse);
        material.specular = self.specular.unwrap_or(material.specular);
        if let Some(alpha) = self.alpha {
            material.ambient = material.ambient.with_alpha(alpha);
            material.diffuse = material.diffuse.with_alpha(alpha);
        }

        if texture_path.is_file() {
            material.texture = Some(load_texture(&texture_path)?);
        } else if options.strict_references {
            return Err(AssetError::MissingReference(texture_path));
        } else {
            log::warn!(
                "Texture map '{}' for material '{}' does not exist; ignored",
                texture_path.display(),
                material.name
            );
        }

        Ok(Some(material))
    }
}

fn push_material(
    pending: PendingMaterial,
    materials: &mut Vec<Material>,
    options: &LoadOptions,
) -> AssetResult<()> {
    if materials.iter().any(|m| m.name == pending.name) {
        log::debug!("Duplicate material '{}' ignored", pending.name);
        return Ok(());
    }
    if let Some(material) = pending.finish(options)? {
        materials.push(material);
    }
    Ok(())
}

pub fn load_mtl(path: &Path, options: &LoadOptions) -> AssetResult<Vec<Material>> {
    let file = File::open(path)?;
    parse_mtl(BufReader::new(file), path, options)
}

/// Parses a material library. `origin` is the library's own path; texture
/// maps resolve against its directory. Only the first material of a given
/// name is kept.
pub fn parse_mtl<R: BufRead>(
    reader: R,
    origin: &Path,
    options: &LoadOptions,
) -> AssetResult<Vec<Material>> {
    let mut materials: Vec<Material> = Vec::new();
    let mut current: Option<PendingMaterial> = None;

    for (line_number, line_result) in reader.lines().enumerate() {
        let line_number = line_number + 1;
        let line = line_result?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let args = &parts[1..];

        match parts[0] {
            "newmtl" => {
                if let Some(pending) = current.take() {
                    push_material(pending, &mut materials, options)?;
                }
                let name = directive_value(line, "newmtl", line_number)?;
                current = Some(PendingMaterial::named(name));
            }
            "Ka" | "Kd" | "Ks" => {
                let [r, g, b] = parse_components::<3>(args, line_number, parts[0])?;
                let color = Some(Color4::new(r, g, b, 1.0));
                if let Some(pending) = current.as_mut() {
                    match parts[0] {
                        "Ka" => pending.ambient = color,
                        "Kd" => pending.diffuse = color,
                        _ => pending.specular = color,
                    }
                }
            }
            "Tr" | "d" => {
                let raw = args.first().ok_or_else(|| {
                    AssetError::malformed(line_number, format!("'{}' requires a value", parts[0]))
                })?;
                let alpha = parse_f32_component(raw, line_number, "transparency")?;
                if let Some(pending) = current.as_mut() {
                    if pending.alpha.is_none() {
                        pending.alpha = Some(alpha);
                    }
                }
            }
            key @ ("map_Ka" | "mapKa" | "map_Kd" | "mapKd" | "map_Ks" | "mapKs") => {
                let value = directive_value(line, key, line_number)?;
                let resolved = resolve_relative(origin, value);
                if let Some(pending) = current.as_mut() {
                    match key {
                        "map_Ka" | "mapKa" => pending.ambient_map = Some(resolved),
                        "map_Kd" | "mapKd" => pending.diffuse_map = Some(resolved),
                        _ => pending.specular_map = Some(resolved),
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(pending) = current {
        push_material(pending, &mut materials, options)?;
    }

    Ok(materials)
}
