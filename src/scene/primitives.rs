//! Built-in meshes that need no file on disk.

use crate::math::{Color4, Vector3, Vector4};

use super::model::{Mesh, Vertex};

const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
];

const CUBE_INDICES: [usize; 36] = [
    0, 1, 2, 2, 3, 0, //
    3, 2, 6, 6, 7, 3, //
    7, 6, 5, 5, 4, 7, //
    4, 0, 3, 3, 7, 4, //
    0, 5, 1, 4, 5, 0, //
    1, 5, 6, 6, 2, 1,
];

const PYRAMID_CORNERS: [[f32; 3]; 5] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [0.0, 1.0, 0.0],
];

const PYRAMID_INDICES: [usize; 18] = [
    0, 3, 1, 2, 3, 0, //
    0, 1, 4, 1, 3, 4, //
    4, 3, 2, 4, 2, 0,
];

fn base_color() -> Color4 {
    Color4::from_rgba8(0, 71, 171, 255)
}

/// Corner vectors double as normals; both shapes are centered on the origin.
fn expand(name: &str, corners: &[[f32; 3]], indices: &[usize]) -> Mesh {
    let color = base_color();
    let vertices = indices
        .iter()
        .map(|&i| {
            let [x, y, z] = corners[i];
            Vertex {
                position: Vector4::point(x, y, z),
                normal: Vector3::new(x, y, z),
                color,
                ..Vertex::default()
            }
        })
        .collect();

    Mesh::new(name, vertices, None).unwrap_or_else(|| unreachable!("index tables hold whole triangles"))
}

pub fn cube() -> Mesh {
    expand("cube", &CUBE_CORNERS, &CUBE_INDICES)
}

pub fn pyramid() -> Mesh {
    expand("pyramid", &PYRAMID_CORNERS, &PYRAMID_INDICES)
}

#[cfg(test)]
mod tests {
    use super::{cube, pyramid};

    #[test]
    fn cube_has_twelve_triangles() {
        let mesh = cube();
        assert_eq!(mesh.vertices().len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.material().is_none());
    }

    #[test]
    fn pyramid_apex_is_shared() {
        let mesh = pyramid();
        assert_eq!(mesh.triangle_count(), 6);
        let apex_uses = mesh
            .vertices()
            .iter()
            .filter(|v| v.position.y == 1.0)
            .count();
        assert_eq!(apex_uses, 4);
    }
}
