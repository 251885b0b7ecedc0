/// Scene graph displayed by a viewer surface
use nalgebra::{Matrix4, Vector3};

use crate::geometry::{Aabb, Mesh};
use crate::transform::Transform;

/// Uniform material tint, linear RGB in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Tint {
    pub const WHITE: Tint = Tint::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// 8-bit channels, for renderers that speak RGB bytes.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One node of the scene graph: optional geometry plus a local scale and
/// the material tint currently applied to it.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub mesh: Option<Mesh>,
    pub scale: Vector3<f32>,
    pub tint: Tint,
}

impl SceneNode {
    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
            scale: Vector3::new(1.0, 1.0, 1.0),
            tint: Tint::WHITE,
        }
    }

    /// Bounding box in the node's local frame; node transforms are not
    /// applied.
    pub fn local_bounding_box(&self) -> Aabb {
        self.mesh
            .as_ref()
            .map(Mesh::bounding_box)
            .unwrap_or_default()
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, Mesh::vertex_count)
    }

    /// Multiply the node's current scale by `factor`. Pinch gestures feed
    /// incremental deltas here, so scaling is relative, never absolute.
    pub fn apply_scale_delta(&mut self, factor: f32) {
        self.scale *= factor;
    }
}

/// The in-memory model a viewer surface displays. Replaced wholesale on
/// every load; mutated in place only for tint and scale.
#[derive(Debug, Clone)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    root_scale: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root_scale: 1.0,
        }
    }

    /// A single-node scene, the shape every STL load produces.
    pub fn from_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            nodes: vec![SceneNode::with_mesh(name, mesh)],
            root_scale: 1.0,
        }
    }

    pub fn root_scale(&self) -> f32 {
        self.root_scale
    }

    pub fn set_root_scale(&mut self, scale: f32) {
        if scale > 0.0 {
            self.root_scale = scale;
        }
    }

    /// Apply one tint to every node's material.
    pub fn set_tint(&mut self, tint: Tint) {
        for node in &mut self.nodes {
            node.tint = tint;
        }
    }

    pub fn scale_node(&mut self, index: usize, factor: f32) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.apply_scale_delta(factor);
        }
    }

    /// Union of every node's local bounding box.
    pub fn bounding_box(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for node in &self.nodes {
            bounds.widen(&node.local_bounding_box());
        }
        bounds
    }

    /// Model matrix for one node: recenter the scene's bounding box on the
    /// origin, then apply the node scale and the uniform root scale. Both
    /// the renderer and the hit test compose with this, so what is drawn is
    /// what gets picked.
    pub fn node_matrix(&self, index: usize) -> Matrix4<f32> {
        let node_scale = self
            .nodes
            .get(index)
            .map(|n| n.scale)
            .unwrap_or_else(|| Vector3::new(1.0, 1.0, 1.0));
        let center = self.bounding_box().center();
        Transform::uniform_scale_matrix(self.root_scale)
            * Transform::scale_matrix(&node_scale)
            * Transform::translation_matrix(-center.x, -center.y, -center.z)
    }
}

/// Capability interface for pinch gestures. A viewer surface resolves the
/// screen location to a node via hit test and scales it by the incremental
/// delta.
pub trait PinchHandler {
    fn on_pinch(&mut self, location: (f32, f32), scale_delta: f32);
}
