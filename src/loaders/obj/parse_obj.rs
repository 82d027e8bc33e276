use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{AssetError, AssetResult};
use crate::io::resolve_relative;
use crate::math::{Color4, Vector2, Vector3, Vector4};
use crate::scene::{Material, Mesh, MeshCollection, Vertex};

use super::index::{
    FaceCorner, directive_remainder, directive_value, parse_components, parse_f32_component,
    parse_face_corner, resolve_index,
};
use super::parse_mtl::load_mtl;
use super::types::LoadOptions;

const FALLBACK_MESH_NAME: &str = "mesh";

pub fn load_obj(path: &Path, options: &LoadOptions) -> AssetResult<MeshCollection> {
    let file = File::open(path)?;
    let meshes = load_obj_from_reader(BufReader::new(file), path, options)?;
    log::info!("Loaded {} mesh(es) from {}", meshes.len(), path.display());
    Ok(meshes)
}

/// Parses OBJ text. `origin` is the path the text came from; `mtllib`
/// references resolve against its directory.
pub fn load_obj_from_reader<R: BufRead>(
    reader: R,
    origin: &Path,
    options: &LoadOptions,
) -> AssetResult<MeshCollection> {
    let mut parser = ObjParser::new(origin, options);

    for (line_number, line_result) in reader.lines().enumerate() {
        let line_number = line_number + 1;
        let line = line_result?;
        parser.parse_line(line.trim(), line_number)?;
    }

    Ok(parser.finish())
}

pub fn load_obj_from_str(
    contents: &str,
    origin: &Path,
    options: &LoadOptions,
) -> AssetResult<MeshCollection> {
    load_obj_from_reader(Cursor::new(contents), origin, options)
}

/// Working state of one load. Attribute pools are 0-based and live only as
/// long as the parse.
struct ObjParser<'a> {
    origin: PathBuf,
    options: &'a LoadOptions,

    positions: Vec<Vector4>,
    texcoords: Vec<Vector2>,
    normals: Vec<Vector3>,
    colors: Vec<Color4>,

    materials: HashMap<String, Arc<Material>>,
    meshes: MeshCollection,
    pending: Vec<Vertex>,
    current_group: Option<String>,
    current_material: Option<String>,
    unnamed_groups: usize,
}

impl<'a> ObjParser<'a> {
    fn new(origin: &Path, options: &'a LoadOptions) -> Self {
        Self {
            origin: origin.to_path_buf(),
            options,
            positions: Vec::new(),
            texcoords: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            materials: HashMap::new(),
            meshes: MeshCollection::new(),
            pending: Vec::new(),
            current_group: None,
            current_material: None,
            unnamed_groups: 0,
        }
    }

    fn parse_line(&mut self, line: &str, line_number: usize) -> AssetResult<()> {
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let args = &parts[1..];

        match parts[0] {
            "v" => {
                if !(2..=4).contains(&args.len()) {
                    return Err(AssetError::malformed(
                        line_number,
                        format!("vertex position requires 2 to 4 components, found {}", args.len()),
                    ));
                }
                let mut xyzw = [0.0, 0.0, 0.0, 1.0];
                for (slot, raw) in xyzw.iter_mut().zip(args) {
                    *slot = parse_f32_component(raw, line_number, "vertex")?;
                }
                let [x, y, z, w] = xyzw;
                self.positions.push(Vector4::new(x, y, z, w));
            }
            "vt" => {
                let [u, v] = parse_components::<2>(args, line_number, "texture coordinate")?;
                self.texcoords.push(Vector2::new(u, -v));
            }
            "vn" => {
                let [x, y, z] = parse_components::<3>(args, line_number, "vertex normal")?;
                self.normals.push(Vector3::new(x, y, z));
            }
            "vc" => {
                let [r, g, b, a] = parse_components::<4>(args, line_number, "vertex color")?;
                self.colors.push(Color4::new(r, g, b, a));
            }
            "f" => {
                let corners = args
                    .iter()
                    .map(|token| parse_face_corner(token, line_number))
                    .collect::<AssetResult<Vec<FaceCorner>>>()?;
                self.push_face(&corners, line_number);
            }
            "g" => {
                self.flush_group();
                let name = match directive_remainder(line, "g") {
                    Some(name) => name.to_string(),
                    None => {
                        self.unnamed_groups += 1;
                        format!("__group_{}", self.unnamed_groups)
                    }
                };
                self.current_group = Some(name);
            }
            "usemtl" => {
                let name = directive_value(line, "usemtl", line_number)?;
                self.current_material = Some(name.to_string());
            }
            "mtllib" => {
                let value = directive_value(line, "mtllib", line_number)?;
                self.load_material_library(value)?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Fan-triangulates around the first corner.
    fn push_face(&mut self, corners: &[FaceCorner], line_number: usize) {
        if corners.len() < 3 {
            log::debug!(
                "OBJ line {}: face with {} corner(s) ignored",
                line_number,
                corners.len()
            );
            return;
        }

        for i in 2..corners.len() {
            for corner in [&corners[0], &corners[i - 1], &corners[i]] {
                let vertex = self.resolve_corner(corner);
                self.pending.push(vertex);
            }
        }
    }

    fn resolve_corner(&self, corner: &FaceCorner) -> Vertex {
        fn pick<T: Copy>(pool: &[T], raw: isize, fallback: T) -> T {
            resolve_index(raw, pool.len())
                .map(|index| pool[index])
                .unwrap_or(fallback)
        }

        Vertex {
            position: pick(&self.positions, corner.position, Vector4::zero()),
            normal: pick(&self.normals, corner.normal, Vector3::zero()),
            color: pick(&self.colors, corner.color, Color4::WHITE),
            tex_coords: pick(&self.texcoords, corner.texcoord, Vector2::zero()),
        }
    }

    fn load_material_library(&mut self, value: &str) -> AssetResult<()> {
        let path = resolve_relative(&self.origin, value);
        if !path.is_file() {
            if self.options.strict_references {
                return Err(AssetError::MissingReference(path));
            }
            log::warn!("Material library '{}' does not exist; ignored", path.display());
            return Ok(());
        }

        for material in load_mtl(&path, self.options)? {
            if self.materials.contains_key(&material.name) {
                continue;
            }
            self.materials
                .insert(material.name.clone(), Arc::new(material));
        }
        Ok(())
    }

    fn active_material(&self) -> Option<Arc<Material>> {
        let name = self.current_material.as_ref()?;
        let material = self.materials.get(name).cloned();
        if material.is_none() {
            log::debug!("Material '{}' is not defined by any loaded library", name);
        }
        material
    }

    /// Emits the pending vertices under the current group name. Nothing
    /// happens when there is no group yet, no pending geometry, or the name
    /// is already taken; the vertices then carry over to the next group.
    fn flush_group(&mut self) {
        let Some(name) = self.current_group.as_ref() else {
            return;
        };
        if self.pending.is_empty() || self.meshes.contains(name) {
            return;
        }
        let name = name.clone();
        self.emit(name);
    }

    fn emit(&mut self, name: String) {
        let vertices = std::mem::take(&mut self.pending);
        let material = self.active_material();
        match Mesh::new(name, vertices, material) {
            Some(mesh) => {
                self.meshes.insert(mesh);
            }
            None => log::error!("Dropped a mesh whose vertex count is not a multiple of 3"),
        }
    }

    /// Flushes trailing geometry under a name that is guaranteed to be free.
    fn finish(mut self) -> MeshCollection {
        if self.meshes.is_empty() || !self.pending.is_empty() {
            let base = self
                .current_group
                .clone()
                .unwrap_or_else(|| FALLBACK_MESH_NAME.to_string());
            let name = unique_name(&self.meshes, base);
            self.emit(name);
        }
        self.meshes
    }
}

fn unique_name(meshes: &MeshCollection, base: String) -> String {
    if !meshes.contains(&base) {
        return base;
    }
    (1..)
        .map(|suffix| format!("{}_{}", base, suffix))
        .find(|candidate| !meshes.contains(candidate))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::load_obj_from_str;
    use crate::error::AssetError;
    use crate::loaders::obj::LoadOptions;
    use crate::math::{Color4, Vector2, Vector3, Vector4};
    use crate::scene::MeshCollection;

    fn parse(source: &str) -> MeshCollection {
        load_obj_from_str(source, Path::new("inline.obj"), &LoadOptions::default()).unwrap()
    }

    #[test]
    fn pentagon_fans_into_three_triangles() {
        let meshes = parse(
            "v 0 0\nv 1 0\nv 2 1\nv 1 2\nv 0 1\nf 1 2 3 4 5\n",
        );
        let mesh = meshes.get("mesh").unwrap();
        let vertices = mesh.vertices();

        assert_eq!(vertices.len(), 9);
        assert_eq!(mesh.triangle_count(), 3);
        for triangle in vertices.chunks_exact(3) {
            assert_eq!(triangle[0].position, Vector4::new(0.0, 0.0, 0.0, 1.0));
        }
        assert_eq!(vertices[1].position, Vector4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(vertices[2].position, Vector4::new(2.0, 1.0, 0.0, 1.0));
        assert_eq!(vertices[8].position, Vector4::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn position_defaults_and_homogeneous_w() {
        let meshes = parse("v 1 2\nv 1 2 3\nv 1 2 3 0.5\nf 1 2 3\n");
        let vertices = meshes.get("mesh").unwrap().vertices();
        assert_eq!(vertices[0].position, Vector4::new(1.0, 2.0, 0.0, 1.0));
        assert_eq!(vertices[1].position, Vector4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(vertices[2].position, Vector4::new(1.0, 2.0, 3.0, 0.5));
    }

    #[test]
    fn out_of_range_indices_substitute_defaults() {
        let meshes = parse("v 1 1 1\nv 2 2 2\nf 0 2 9\n");
        let vertices = meshes.get("mesh").unwrap().vertices();

        assert_eq!(vertices[0].position, Vector4::zero());
        assert_eq!(vertices[1].position, Vector4::new(2.0, 2.0, 2.0, 1.0));
        assert_eq!(vertices[2].position, Vector4::zero());
        assert!(vertices.iter().all(|v| v.normal == Vector3::zero()));
        assert!(vertices.iter().all(|v| v.color == Color4::WHITE));
    }

    #[test]
    fn attributes_resolve_and_texcoord_v_is_flipped() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.25 0.75
vn 0 0 1
vc 1 0 0 0.5
f 1/1/1/1 2//1 -1/1
";
        let meshes = parse(source);
        let vertices = meshes.get("mesh").unwrap().vertices();

        assert_eq!(vertices[0].tex_coords, Vector2::new(0.25, -0.75));
        assert_eq!(vertices[0].normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(vertices[0].color, Color4::new(1.0, 0.0, 0.0, 0.5));
        // Missing texcoord on corner 2 reuses position index 2, which is out of range.
        assert_eq!(vertices[1].tex_coords, Vector2::zero());
        assert_eq!(vertices[1].normal, Vector3::new(0.0, 0.0, 1.0));
        // Relative index -1 is the last position.
        assert_eq!(vertices[2].position, Vector4::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn groups_become_meshes_in_first_seen_order() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
g zeta
f 1 2 3
g alpha beta
f 2 4 3
f 1 2 4
";
        let meshes = parse(source);
        let names: Vec<&str> = meshes.names().collect();
        assert_eq!(names, vec!["zeta", "alpha beta"]);
        assert_eq!(meshes.get("zeta").unwrap().vertices().len(), 3);
        assert_eq!(meshes.get("alpha beta").unwrap().vertices().len(), 6);
        assert!(meshes.iter().all(|m| m.vertices().len() % 3 == 0));
    }

    #[test]
    fn reused_group_name_carries_vertices_forward() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
g a
f 1 2 3
g b
f 1 2 3
g a
f 1 2 3
g c
";
        let meshes = parse(source);
        let names: Vec<&str> = meshes.names().collect();
        // The second `a` block is not emitted at `g c`; its vertices end in `c`.
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(meshes.get("c").unwrap().vertices().len(), 3);
    }

    #[test]
    fn unnamed_groups_get_unique_names() {
        let source = "v 0 0 0\ng\nf 1 1 1\ng\nf 1 1 1\n";
        let meshes = parse(source);
        assert_eq!(meshes.len(), 2);
        let names: Vec<&str> = meshes.names().collect();
        assert_ne!(names[0], names[1]);
    }

    #[test]
    fn trailing_geometry_is_never_dropped() {
        let source = "v 0 0 0\ng mesh\nf 1 1 1\ng\ng mesh\nf 1 1 1\n";
        let meshes = parse(source);
        let names: Vec<&str> = meshes.names().collect();
        assert_eq!(names, vec!["mesh", "mesh_1"]);
    }

    #[test]
    fn empty_input_yields_one_empty_mesh() {
        let meshes = parse("# nothing here\n");
        assert_eq!(meshes.len(), 1);
        assert!(meshes.get("mesh").unwrap().vertices().is_empty());
    }

    #[test]
    fn missing_material_library_is_ignored() {
        let meshes = parse("mtllib does_not_exist.mtl\nusemtl steel\nv 0 0 0\nf 1 1 1\n");
        assert!(meshes.get("mesh").unwrap().material().is_none());

        let strict = load_obj_from_str(
            "mtllib does_not_exist.mtl\n",
            Path::new("inline.obj"),
            &LoadOptions::strict(),
        );
        assert!(matches!(strict, Err(AssetError::MissingReference(_))));
    }

    #[test]
    fn material_libraries_merge_with_first_definition_winning() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        image::RgbaImage::from_pixel(1, 1, image::Rgba([10, 0, 0, 255]))
            .save(root.join("a.png"))
            .unwrap();
        image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 20, 0, 255]))
            .save(root.join("b.png"))
            .unwrap();
        fs::write(root.join("a.mtl"), "newmtl m\nmap_Kd a.png\n").unwrap();
        fs::write(
            root.join("b.mtl"),
            "newmtl m\nmap_Kd b.png\nnewmtl extra\nmap_Kd b.png\n",
        )
        .unwrap();

        let source = "\
mtllib a.mtl
mtllib b.mtl
mtllib missing.mtl
v 0 0 0
v 1 0 0
v 0 1 0
g first
usemtl m
f 1 2 3
g second
usemtl extra
f 1 2 3
";
        let meshes =
            load_obj_from_str(source, &root.join("scene.obj"), &LoadOptions::default()).unwrap();

        let first = meshes.get("first").unwrap().material().unwrap();
        assert_eq!(first.name, "m");
        assert_eq!(
            first.texture.as_ref().unwrap().pixel(0, 0),
            Some([10, 0, 0, 255])
        );
        // Names new to the second library are still merged in.
        let second = meshes.get("second").unwrap().material().unwrap();
        assert_eq!(second.name, "extra");
    }

    #[test]
    fn malformed_numbers_are_fatal() {
        let result = load_obj_from_str(
            "v 0 0 0\nvn 0 one 0\n",
            Path::new("inline.obj"),
            &LoadOptions::default(),
        );
        assert!(matches!(
            result,
            Err(AssetError::MalformedGeometry { line: 2, .. })
        ));

        let too_many = load_obj_from_str("v 1 2 3 4 5\n", Path::new("x.obj"), &LoadOptions::default());
        assert!(too_many.is_err());
        let bad_index = load_obj_from_str("v 0 0 0\nf 1 a 1\n", Path::new("x.obj"), &LoadOptions::default());
        assert!(bad_index.is_err());
    }

    #[test]
    fn short_faces_are_ignored() {
        let meshes = parse("v 0 0 0\nf 1 1\n");
        assert!(meshes.get("mesh").unwrap().vertices().is_empty());
    }
}
