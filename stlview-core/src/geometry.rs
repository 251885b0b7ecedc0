/// Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Axis-aligned bounding box, kept as per-axis min/max accumulators.
///
/// Starts inverted (+inf/-inf) so the first `widen` snaps it to the first
/// box or point it sees.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn include_point(&mut self, p: &Point3<f32>) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    pub fn widen(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.include_point(&other.min);
        self.include_point(&other.max);
    }

    /// Per-axis extents (max - min), zero for an empty box.
    pub fn extents(&self) -> Vector3<f32> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f32> {
        if self.is_empty() {
            return Point3::origin();
        }
        nalgebra::center(&self.min, &self.max)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Vertices as stored, three per triangle (STL does not share vertices).
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn bounding_box(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for triangle in &self.triangles {
            for vertex in &triangle.vertices {
                bounds.include_point(&vertex.position);
            }
        }
        bounds
    }

    /// Axis-aligned cube centered at the origin, used by demos and tests.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        const CORNERS: [[f32; 3]; 8] = [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ];
        // Face normal plus two triangles as indices into the corner table.
        const FACES: [([f32; 3], [usize; 6]); 6] = [
            ([0.0, 0.0, 1.0], [4, 5, 6, 4, 6, 7]),
            ([0.0, 0.0, -1.0], [0, 3, 2, 0, 2, 1]),
            ([0.0, 1.0, 0.0], [3, 7, 6, 3, 6, 2]),
            ([0.0, -1.0, 0.0], [0, 1, 5, 0, 5, 4]),
            ([1.0, 0.0, 0.0], [1, 2, 6, 1, 6, 5]),
            ([-1.0, 0.0, 0.0], [0, 4, 7, 0, 7, 3]),
        ];

        let mut mesh = Self::with_capacity(12);
        for (normal, indices) in FACES {
            let [nx, ny, nz] = normal;
            let corner = |i: usize| {
                let [cx, cy, cz] = CORNERS[i];
                Vertex::new(cx * h, cy * h, cz * h, nx, ny, nz)
            };
            for tri in indices.chunks_exact(3) {
                mesh.add_triangle(Triangle::new(corner(tri[0]), corner(tri[1]), corner(tri[2])));
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_triangles() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.triangles.len(), 12);
        assert_eq!(cube.vertex_count(), 36);
    }

    #[test]
    fn cube_bounding_box_is_symmetric() {
        let bounds = Mesh::cube(2.0).bounding_box();
        let ext = bounds.extents();
        assert!((ext.x - 2.0).abs() < 1e-6);
        assert!((ext.y - 2.0).abs() < 1e-6);
        assert!((ext.z - 2.0).abs() < 1e-6);
        assert!((bounds.min.x + 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_aabb_reports_zero_extents() {
        let bounds = Aabb::empty();
        assert!(bounds.is_empty());
        assert_eq!(bounds.extents(), Vector3::zeros());
    }

    #[test]
    fn widen_merges_boxes() {
        let mut a = Aabb::empty();
        a.include_point(&Point3::new(0.0, 0.0, 0.0));
        a.include_point(&Point3::new(1.0, 1.0, 1.0));

        let mut b = Aabb::empty();
        b.include_point(&Point3::new(-1.0, 0.5, 2.0));

        a.widen(&b);
        assert!((a.min.x + 1.0).abs() < 1e-6);
        assert!((a.max.z - 2.0).abs() < 1e-6);

        // Widening by an empty box is a no-op.
        a.widen(&Aabb::empty());
        assert!((a.max.x - 1.0).abs() < 1e-6);
    }
}
