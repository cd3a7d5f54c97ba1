use crate::core::geometry::Vertex;
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file and returns a unified Mesh.
///
/// OBJ files are right-handed with counter-clockwise front faces. Z is flipped
/// into the left-handed world and each triangle's winding reversed, so the
/// model keeps its handedness and `(v1 - v0) x (v2 - v0)` still points out.
pub fn load_obj(path: &str) -> Result<Mesh, String> {
    let path_obj = Path::new(path);
    if !path_obj.exists() {
        return Err(format!("File not found: {}", path));
    }

    info!("Loading OBJ file: {}", path);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    // Materials are ignored; objects are colored from the scene file.
    let (models, _materials) = tobj::load_obj(path_obj, &load_options)
        .map_err(|e| format!("Failed to load OBJ: {}", e))?;

    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for model in models {
        let mesh = &model.mesh;
        let offset = vertices.len();
        let num_vertices = mesh.positions.len() / 3;
        let has_normals = !mesh.normals.is_empty();
        let has_texcoords = !mesh.texcoords.is_empty();

        if !has_normals {
            warn!(
                "Mesh '{}' has no normals; they are rebuilt from faces each frame.",
                model.name
            );
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                -mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    -mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::zeros()
            };
            // OBJ v runs bottom-up, texture rows top-down.
            let texcoord = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };
            vertices.push(Vertex::new(position, normal, texcoord));
        }

        for tri in mesh.indices.chunks_exact(3) {
            faces.push([
                offset + tri[0] as usize,
                offset + tri[2] as usize,
                offset + tri[1] as usize,
            ]);
        }
    }

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total faces: {}",
        vertices.len(),
        faces.len()
    );

    let mesh = Mesh::new(vertices, faces);
    mesh.validate()?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let err = load_obj("does/not/exist.obj").unwrap_err();
        assert!(err.contains("File not found"));
    }
}
