//! Seams towards the rendering pipeline
//!
//! The pipeline itself (draw submission, outline pass, lights) lives outside this
//! crate. Interaction code only needs to read and write node transforms, flag
//! the highlighted node, and ask which nodes sit under the pointer.

mod camera;
pub mod pick;

pub use camera::{Camera, Ray};
pub use pick::{RaycastQuery, SceneHit, SceneQuery};

use crate::scene::{NodeId, Transform};

/// Transform access plus the outline/highlight effect of the rendering pipeline.
pub trait SceneBridge {
    /// Current local transform of `node`, or `None` when it is not (yet) present.
    fn transform(&self, node: NodeId) -> Option<Transform>;

    /// Returns `false` when the node is missing and nothing was written.
    fn set_transform(&mut self, node: NodeId, transform: Transform) -> bool;

    /// Outline `node`, or clear the outline with `None`.
    fn set_highlighted(&mut self, node: Option<NodeId>);
}
