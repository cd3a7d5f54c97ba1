use crate::scene::mesh::Mesh;
use nalgebra::Point3;

/// Analyzes the mesh's bounding box and transforms all vertices so that it is
/// centered at (0,0,0) and its largest dimension equals `size`.
///
/// Returns the original center and the scaling factor used.
pub fn normalize_and_center_mesh(mesh: &mut Mesh, size: f32) -> (Point3<f32>, f32) {
    if mesh.vertices.is_empty() {
        return (Point3::origin(), 1.0);
    }

    let mut min_bound = Point3::new(f32::MAX, f32::MAX, f32::MAX);
    let mut max_bound = Point3::new(f32::MIN, f32::MIN, f32::MIN);
    for vertex in &mesh.vertices {
        min_bound = min_bound.inf(&vertex.position);
        max_bound = max_bound.sup(&vertex.position);
    }

    let center = nalgebra::center(&min_bound, &max_bound);
    let extent = max_bound - min_bound;
    let max_dimension = extent.x.max(extent.y).max(extent.z);

    let scale_factor = if max_dimension > 1e-6 {
        size / max_dimension
    } else {
        1.0
    };

    for vertex in &mut mesh.vertices {
        let centered = vertex.position - center;
        vertex.position = Point3::from(centered * scale_factor);
    }

    (center, scale_factor)
}
