/// Derived, display-only measurements of a loaded model
use nalgebra::Vector3;

use crate::geometry::Aabb;
use crate::scene::Scene;

const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

/// Transient metrics recomputed on every load and discarded on the next.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetrics {
    pub name: String,
    pub extents: Vector3<f32>,
    pub file_size_bytes: u64,
    pub vertex_count: usize,
}

impl ModelMetrics {
    /// Walk every node, widening one bounding box by each node's local box
    /// and summing per-node vertex counts.
    ///
    /// Node boxes are accumulated in their local frames; child transforms
    /// are not folded into a common frame.
    pub fn compute(name: impl Into<String>, scene: &Scene, file_size_bytes: u64) -> Self {
        let mut bounds = Aabb::empty();
        let mut vertex_count = 0;
        for node in &scene.nodes {
            bounds.widen(&node.local_bounding_box());
            vertex_count += node.vertex_count();
        }

        Self {
            name: name.into(),
            extents: bounds.extents(),
            file_size_bytes,
            vertex_count,
        }
    }

    /// `"W x H x D mm"`, two decimals per axis.
    pub fn dimensions_label(&self) -> String {
        format!(
            "{:.2} x {:.2} x {:.2} mm",
            self.extents.x, self.extents.y, self.extents.z
        )
    }

    /// File size in megabytes, two decimals.
    pub fn file_size_label(&self) -> String {
        format!("{:.2} MB", self.file_size_bytes as f64 / BYTES_PER_MEGABYTE)
    }

    /// Plain-text lines for an info overlay.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Model: {}", self.name),
            format!("Dimensions: {}", self.dimensions_label()),
            format!("Size: {}", self.file_size_label()),
            format!("Vertices: {}", self.vertex_count),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Mesh, Triangle, Vertex};
    use crate::scene::Scene;

    /// Two triangles spanning exactly [0,0,0]..[1,2,3].
    fn known_box_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(
            Vertex::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(0.0, 2.0, 0.0, 0.0, 0.0, 1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(1.0, 2.0, 3.0, 0.0, 0.0, 1.0),
            Vertex::new(0.0, 2.0, 3.0, 0.0, 0.0, 1.0),
            Vertex::new(1.0, 0.0, 3.0, 0.0, 0.0, 1.0),
        ));
        mesh
    }

    #[test]
    fn dimensions_and_vertices_of_known_box() {
        let scene = Scene::from_mesh("box", known_box_mesh());
        let metrics = ModelMetrics::compute("box", &scene, 0);
        assert_eq!(metrics.dimensions_label(), "1.00 x 2.00 x 3.00 mm");
        assert_eq!(metrics.vertex_count, 6);
    }

    #[test]
    fn file_size_in_megabytes() {
        let scene = Scene::new();
        let metrics = ModelMetrics::compute("big", &scene, 2_097_152);
        assert_eq!(metrics.file_size_label(), "2.00 MB");
    }

    #[test]
    fn empty_scene_reports_zero_everything() {
        let metrics = ModelMetrics::compute("none", &Scene::new(), 0);
        assert_eq!(metrics.dimensions_label(), "0.00 x 0.00 x 0.00 mm");
        assert_eq!(metrics.vertex_count, 0);
    }

    #[test]
    fn multi_node_box_widens_across_nodes() {
        let mut scene = Scene::from_mesh("a", Mesh::cube(1.0));
        scene
            .nodes
            .push(crate::scene::SceneNode::with_mesh("b", known_box_mesh()));
        let metrics = ModelMetrics::compute("pair", &scene, 0);
        // Cube spans [-0.5, 0.5], box spans [0, 1..3]; union is [-0.5 .. 1/2/3].
        assert_eq!(metrics.dimensions_label(), "1.50 x 2.50 x 3.50 mm");
        assert_eq!(metrics.vertex_count, 36 + 6);
    }
}
