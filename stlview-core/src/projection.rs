/// Camera, projection, and screen-space hit testing
use nalgebra::{Matrix4, Point3, Vector3};

use crate::scene::Scene;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a 3D point to 2D screen space
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let view = self.view_matrix();
        let projection = self.projection_matrix();
        let mvp = projection * view * model_matrix;

        // Transform to clip space
        let clip = mvp.transform_point(point);

        // Prevent division by near-zero depth values
        if clip.z.abs() < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.z;
        let ndc_y = clip.y / clip.z;
        let depth = clip.z;

        // Clip test
        if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }

    /// Resolve a screen location to the first scene node under it.
    ///
    /// Each node's local bounding box is projected (through the same
    /// per-node model matrix the renderer uses) to a screen-space
    /// rectangle; the first node whose rectangle contains the location
    /// wins, in node order.
    pub fn pick_node(
        &self,
        scene: &Scene,
        base_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
        location: (f32, f32),
    ) -> Option<usize> {
        for (index, node) in scene.nodes.iter().enumerate() {
            let bounds = node.local_bounding_box();
            if bounds.is_empty() {
                continue;
            }

            let model = base_matrix * scene.node_matrix(index);

            let mut min_x = f32::INFINITY;
            let mut max_x = f32::NEG_INFINITY;
            let mut min_y = f32::INFINITY;
            let mut max_y = f32::NEG_INFINITY;
            let mut visible = false;

            for corner in 0..8 {
                let p = Point3::new(
                    if corner & 1 == 0 { bounds.min.x } else { bounds.max.x },
                    if corner & 2 == 0 { bounds.min.y } else { bounds.max.y },
                    if corner & 4 == 0 { bounds.min.z } else { bounds.max.z },
                );
                if let Some((sx, sy, _)) = self.project_to_screen(&p, &model, width, height) {
                    min_x = min_x.min(sx);
                    max_x = max_x.max(sx);
                    min_y = min_y.min(sy);
                    max_y = max_y.max(sy);
                    visible = true;
                }
            }

            if visible
                && location.0 >= min_x
                && location.0 <= max_x
                && location.1 >= min_y
                && location.1 <= max_y
            {
                return Some(index);
            }
        }
        None
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use crate::scene::Scene;

    #[test]
    fn camera_defaults_to_perspective() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = Camera::new(800, 600);
        let (sx, sy, _) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!((sx - 400.0).abs() < 1.0);
        assert!((sy - 300.0).abs() < 1.0);
    }

    #[test]
    fn pick_hits_node_under_center() {
        let scene = Scene::from_mesh("cube", Mesh::cube(1.0));
        let camera = Camera::new(800, 600);
        let picked = camera.pick_node(&scene, &Matrix4::identity(), 800, 600, (400.0, 300.0));
        assert_eq!(picked, Some(0));
    }

    #[test]
    fn pick_misses_empty_space() {
        let scene = Scene::from_mesh("cube", Mesh::cube(1.0));
        let camera = Camera::new(800, 600);
        let picked = camera.pick_node(&scene, &Matrix4::identity(), 800, 600, (5.0, 5.0));
        assert_eq!(picked, None);
    }

    #[test]
    fn pick_on_empty_scene_is_none() {
        let scene = Scene::new();
        let camera = Camera::new(800, 600);
        assert_eq!(
            camera.pick_node(&scene, &Matrix4::identity(), 800, 600, (400.0, 300.0)),
            None
        );
    }
}
