/// STLVIEW Core Library - catalog, parsing, scene, and control state
///
/// This library provides the UI-free half of the viewer: STL decoding, the
/// scene graph and its transforms, the model catalog, display metrics, the
/// background loader, and the controller that ties user actions together.
/// Frontends only wire events in and draw the scene out.

pub mod catalog;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod metrics;
pub mod projection;
pub mod scene;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use catalog::{Catalog, ModelFile};
pub use controller::{Controller, LoadPhase, ViewerState};
pub use error::ViewerError;
pub use geometry::{Aabb, Mesh, Triangle, Vertex};
pub use metrics::ModelMetrics;
pub use projection::{Camera, ProjectionMode};
pub use scene::{PinchHandler, Scene, SceneNode, Tint};
pub use transform::{RotationState, Transform};
