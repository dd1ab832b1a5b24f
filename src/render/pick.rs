//! Pointer picking against scene bounds
//!
//! A [`SceneQuery`] turns a pointer position into the nodes under it, nearest
//! first. Each [`SceneHit`] carries the ownership chain from the hit node up to
//! its root so callers can map a mesh hit back to the object that owns it.
//!
//! [`RaycastQuery`] is the CPU implementation: it casts a camera ray against
//! the bounding sphere of every pickable node of a [`SceneGraph`].

use super::camera::{Camera, Ray};
use crate::scene::{NodeId, SceneGraph};
use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneHit {
    pub node: NodeId,
    pub distance: f32,
    /// `node` first, then each parent up to the root.
    pub ownership_chain: Vec<NodeId>,
}

pub trait SceneQuery {
    fn query_hits(&self, pointer_ndc: Vec2, camera: &Camera) -> Vec<SceneHit>;
}

pub struct RaycastQuery<'a> {
    scene: &'a SceneGraph,
}

impl<'a> RaycastQuery<'a> {
    pub fn new(scene: &'a SceneGraph) -> Self {
        Self { scene }
    }

    pub fn cast(&self, ray: Ray, near: f32, far: f32) -> Vec<SceneHit> {
        let mut hits = Vec::new();
        for (id, node) in self.scene.iter() {
            if !node.pickable {
                continue;
            }
            let Some(radius) = node.bounds_radius else {
                continue;
            };
            let Some(world) = self.scene.world_matrix(id) else {
                continue;
            };
            let (scale, _, center) = world.to_scale_rotation_translation();
            let radius = radius * scale.abs().max_element();
            if let Some(distance) = intersect_sphere(ray, center, radius, near, far) {
                hits.push(SceneHit {
                    node: id,
                    distance,
                    ownership_chain: self.scene.ancestors(id).collect(),
                });
            }
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl SceneQuery for RaycastQuery<'_> {
    fn query_hits(&self, pointer_ndc: Vec2, camera: &Camera) -> Vec<SceneHit> {
        self.cast(camera.ray_from_ndc(pointer_ndc), camera.near, camera.far)
    }
}

/// Nearest ray parameter in `[near, far]` where the ray meets the sphere.
fn intersect_sphere(ray: Ray, center: glam::Vec3, radius: f32, near: f32, far: f32) -> Option<f32> {
    let a = ray.direction.length_squared();
    if a <= f32::EPSILON {
        return None;
    }
    let offset = ray.origin - center;
    let b_half = offset.dot(ray.direction);
    let c = offset.length_squared() - radius * radius;

    let discriminant_quarter = b_half * b_half - a * c;
    if discriminant_quarter < 0.0 {
        return None;
    }
    let root = discriminant_quarter.sqrt();
    let t_near = (-b_half - root) / a;
    let t_far = (-b_half + root) / a;
    let range = near..=far;
    if range.contains(&t_near) {
        Some(t_near)
    } else if range.contains(&t_far) {
        Some(t_far)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{RaycastQuery, SceneQuery};
    use crate::render::Camera;
    use crate::scene::{NodeId, SceneGraph, Transform};
    use glam::{Vec2, Vec3};

    fn row_scene() -> SceneGraph {
        let mut scene = SceneGraph::new();
        let near_group = scene.add_node("near", None, Transform::from_position(Vec3::new(0.0, 0.0, 0.5)));
        let near_mesh = scene.add_node("near_mesh", Some(near_group), Transform::default());
        scene.set_bounds(near_mesh, 0.1);
        let far = scene.add_node("far", None, Transform::from_position(Vec3::new(0.0, 0.0, -1.0)));
        scene.set_bounds(far, 0.3);
        let side = scene.add_node("side", None, Transform::from_position(Vec3::new(3.0, 0.0, 0.0)));
        scene.set_bounds(side, 0.1);
        scene
    }

    fn camera() -> Camera {
        Camera::look_at(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO).with_projection(70.0, 0.01, 10.0)
    }

    #[test]
    fn hits_are_sorted_nearest_first_with_chains() {
        let scene = row_scene();
        let hits = RaycastQuery::new(&scene).query_hits(Vec2::ZERO, &camera());
        let nodes: Vec<NodeId> = hits.iter().map(|hit| hit.node).collect();
        assert_eq!(nodes, vec![NodeId(1), NodeId(2)]);
        assert!((hits[0].distance - 1.4).abs() < 1e-4);
        assert!((hits[1].distance - 2.7).abs() < 1e-4);
        assert_eq!(hits[0].ownership_chain, vec![NodeId(1), NodeId(0)]);
        assert_eq!(hits[1].ownership_chain, vec![NodeId(2)]);
    }

    #[test]
    fn miss_returns_empty_list() {
        let scene = row_scene();
        let hits = RaycastQuery::new(&scene).query_hits(Vec2::new(0.0, 0.9), &camera());
        assert!(hits.is_empty());
    }

    #[test]
    fn unpickable_nodes_are_ignored() {
        let mut scene = row_scene();
        scene.set_pickable(NodeId(1), false);
        let hits = RaycastQuery::new(&scene).query_hits(Vec2::ZERO, &camera());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, NodeId(2));
    }

    #[test]
    fn far_plane_clips_hits() {
        let scene = row_scene();
        let camera = camera().with_projection(70.0, 0.01, 2.0);
        let hits = RaycastQuery::new(&scene).query_hits(Vec2::ZERO, &camera);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, NodeId(1));
    }

    #[test]
    fn camera_inside_bounds_reports_exit_point() {
        let mut scene = SceneGraph::new();
        let shell = scene.add_node("shell", None, Transform::default());
        scene.set_bounds(shell, 5.0);
        let camera = Camera::look_at(Vec3::ZERO, Vec3::NEG_Z);
        let hits = RaycastQuery::new(&scene).query_hits(Vec2::ZERO, &camera);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 5.0).abs() < 1e-4);
    }

    #[test]
    fn parent_scale_grows_bounds() {
        let mut scene = SceneGraph::new();
        let group = scene.add_node(
            "group",
            None,
            Transform {
                position: Vec3::new(0.5, 0.0, 0.0),
                rotation: Vec3::ZERO,
                scale: Vec3::splat(4.0),
            },
        );
        let mesh = scene.add_node("mesh", Some(group), Transform::default());
        scene.set_bounds(mesh, 0.2);
        // Unscaled the sphere would span x in [0.3, 0.7] and miss the center ray.
        let hits = RaycastQuery::new(&scene).query_hits(Vec2::ZERO, &camera());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ownership_chain, vec![mesh, group]);
    }
}
