//! Hover selection and idle spin controller
//!
//! The controller owns the registry of interactive objects, the current hover
//! selection and the tween jobs that move objects between their idle pose and
//! their raised (highlighted) pose. It never draws anything: transforms and the
//! highlight effect go through a [`SceneBridge`], and hit lists come from a
//! [`crate::render::SceneQuery`].
//!
//! Per object the phases are:
//!
//! ```text
//!   Idle ──hover──▶ Selected ──leave──▶ Deselecting ──tween done──▶ Idle
//!                      ▲                     │
//!                      └───────hover─────────┘
//! ```
//!
//! Only `Idle` objects spin. Starting a tween for an object replaces the one it
//! already has.

mod config;

pub use config::{Axis, ConfigError, InteractionConfig};

use crate::render::{SceneBridge, SceneHit};
use crate::scene::NodeId;
use crate::tween::{Lerp, TweenEngine, TweenHandle};
use glam::Vec3;
use std::collections::HashSet;
use std::f32::consts::TAU;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectPhase {
    Idle,
    Selected,
    Deselecting,
}

/// The part of a transform the controller animates: position plus the angle
/// around the spin axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: f32,
}

impl Lerp for Pose {
    fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(to.position, t),
            rotation: Lerp::lerp(self.rotation, to.rotation, t),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractiveObject {
    pub id: ObjectId,
    pub scene_handle: NodeId,
    pub spinning: bool,
    pub idle_rotation_offset: f32,
    pub idle_offset: Vec3,
    phase: ObjectPhase,
    active_animation: Option<TweenHandle>,
}

impl InteractiveObject {
    pub fn phase(&self) -> ObjectPhase {
        self.phase
    }

    pub fn active_animation(&self) -> Option<TweenHandle> {
        self.active_animation
    }

    fn idle_pose(&self) -> Pose {
        Pose {
            position: self.idle_offset,
            rotation: self.idle_rotation_offset,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("object {0:?} is already registered")]
    DuplicateId(ObjectId),
    #[error("scene node {node:?} already backs object {existing:?}")]
    DuplicateNode { node: NodeId, existing: ObjectId },
}

pub struct InteractionController {
    config: InteractionConfig,
    objects: Vec<InteractiveObject>,
    selected: Option<ObjectId>,
    excluded: HashSet<NodeId>,
    tweens: TweenEngine<ObjectId, Pose>,
    // Frame time of the last tick; tweens started between frames begin here.
    clock_ms: f64,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config: config.sanitized(),
            objects: Vec::new(),
            selected: None,
            excluded: HashSet::new(),
            tweens: TweenEngine::new(),
            clock_ms: 0.0,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Add an object whose asset finished loading. Objects are never removed.
    pub fn register(
        &mut self,
        id: ObjectId,
        scene_handle: NodeId,
        idle_offset: Vec3,
        idle_rotation_offset: f32,
    ) -> Result<(), RegisterError> {
        if self.index_of(id).is_some() {
            return Err(RegisterError::DuplicateId(id));
        }
        if let Some(existing) = self.objects.iter().find(|o| o.scene_handle == scene_handle) {
            return Err(RegisterError::DuplicateNode {
                node: scene_handle,
                existing: existing.id,
            });
        }
        self.objects.push(InteractiveObject {
            id,
            scene_handle,
            spinning: true,
            idle_rotation_offset,
            idle_offset,
            phase: ObjectPhase::Idle,
            active_animation: None,
        });
        log::debug!("Registered {:?} on node {:?}", id, scene_handle);
        Ok(())
    }

    /// Never treat hits on `node` as hover targets (ground planes, backdrops).
    pub fn exclude_node(&mut self, node: NodeId) {
        self.excluded.insert(node);
    }

    pub fn excluded(&self) -> &HashSet<NodeId> {
        &self.excluded
    }

    pub fn objects(&self) -> &[InteractiveObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&InteractiveObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn phase(&self, id: ObjectId) -> Option<ObjectPhase> {
        self.object(id).map(InteractiveObject::phase)
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// Map a nearest-first hit list to the object under the pointer.
    ///
    /// Hits on nodes in `exclude` (or excluded on the controller) are skipped.
    /// Only the first remaining hit counts: its node and then its ownership
    /// chain are matched against registered scene handles. When none of them
    /// belongs to an object, anything behind the hit is occluded and the
    /// result is `None`.
    pub fn resolve_hit(&self, hits: &[SceneHit], exclude: &HashSet<NodeId>) -> Option<ObjectId> {
        self.resolve_nearest(hits, Some(exclude))
    }

    /// Resolve `hits` against the controller's exclusions and apply the result.
    pub fn on_pointer_hits<B>(&mut self, hits: &[SceneHit], bridge: &mut B) -> Option<ObjectId>
    where
        B: SceneBridge + ?Sized,
    {
        let hit = self.resolve_nearest(hits, None);
        self.on_pointer_move(hit, bridge);
        hit
    }

    /// Apply the object now under the pointer, or `None` when nothing is.
    pub fn on_pointer_move<B>(&mut self, hit: Option<ObjectId>, bridge: &mut B)
    where
        B: SceneBridge + ?Sized,
    {
        let hit = hit.filter(|id| {
            let known = self.index_of(*id).is_some();
            if !known {
                log::trace!("Pointer over unregistered {:?}; treating as empty", id);
            }
            known
        });
        if hit == self.selected {
            return;
        }
        // Clear the old highlight before setting the new one.
        if let Some(previous) = self.selected.take() {
            self.deselect(previous, bridge);
        }
        if let Some(next) = hit {
            self.select(next, bridge);
        }
    }

    /// Advance one frame: spin idle objects by the fixed step, then push tween
    /// values into transforms and retire finished tweens.
    pub fn tick<B>(&mut self, now_ms: f64, bridge: &mut B)
    where
        B: SceneBridge + ?Sized,
    {
        self.clock_ms = now_ms;
        let axis = self.config.spin_axis;
        let step = self.config.rotation_step;

        for object in self.objects.iter().filter(|object| object.spinning) {
            let Some(mut transform) = bridge.transform(object.scene_handle) else {
                log::trace!(
                    "Skipping spin of {:?}: node {:?} missing",
                    object.id,
                    object.scene_handle
                );
                continue;
            };
            let angle = wrap_angle(axis.component(transform.rotation) + step);
            transform.rotation = axis.with_component(transform.rotation, angle);
            bridge.set_transform(object.scene_handle, transform);
        }

        let objects = &mut self.objects;
        self.tweens.advance(now_ms, |update| {
            let Some(object) = objects.iter_mut().find(|object| object.id == update.key) else {
                return;
            };
            match bridge.transform(object.scene_handle) {
                Some(mut transform) => {
                    transform.position = update.value.position;
                    transform.rotation =
                        axis.with_component(transform.rotation, update.value.rotation);
                    bridge.set_transform(object.scene_handle, transform);
                }
                None => log::trace!(
                    "Skipping tween of {:?}: node {:?} missing",
                    object.id,
                    object.scene_handle
                ),
            }
            if !update.finished || object.active_animation != Some(update.handle) {
                return;
            }
            object.active_animation = None;
            if object.phase == ObjectPhase::Deselecting {
                object.phase = ObjectPhase::Idle;
                object.spinning = true;
                log::debug!("{:?} settled; spinning again", object.id);
            }
        });
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id == id)
    }

    fn resolve_nearest(
        &self,
        hits: &[SceneHit],
        exclude: Option<&HashSet<NodeId>>,
    ) -> Option<ObjectId> {
        let hit = hits.iter().find(|hit| {
            !self.excluded.contains(&hit.node)
                && !exclude.is_some_and(|exclude| exclude.contains(&hit.node))
        })?;
        std::iter::once(hit.node)
            .chain(hit.ownership_chain.iter().copied())
            .find_map(|node| {
                self.objects
                    .iter()
                    .find(|o| o.scene_handle == node)
                    .map(|o| o.id)
            })
    }

    fn select<B>(&mut self, id: ObjectId, bridge: &mut B)
    where
        B: SceneBridge + ?Sized,
    {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let target = {
            let object = &self.objects[index];
            Pose {
                position: object.idle_offset
                    + self.config.highlight_axis.unit() * self.config.highlight_offset,
                rotation: object.idle_rotation_offset,
            }
        };
        let duration = self.config.select_duration_ms;
        self.start_transition(index, target, duration, bridge);

        let object = &mut self.objects[index];
        object.phase = ObjectPhase::Selected;
        object.spinning = false;
        self.selected = Some(id);
        bridge.set_highlighted(Some(object.scene_handle));
        log::debug!("Selected {:?}", id);
    }

    fn deselect<B>(&mut self, id: ObjectId, bridge: &mut B)
    where
        B: SceneBridge + ?Sized,
    {
        bridge.set_highlighted(None);
        let Some(index) = self.index_of(id) else {
            return;
        };
        let target = self.objects[index].idle_pose();
        let duration = self.config.deselect_duration_ms;
        self.start_transition(index, target, duration, bridge);

        let object = &mut self.objects[index];
        object.phase = ObjectPhase::Deselecting;
        object.spinning = false;
        log::debug!("Deselecting {:?}", id);
    }

    fn start_transition<B>(&mut self, index: usize, target: Pose, duration_ms: f64, bridge: &B)
    where
        B: SceneBridge + ?Sized,
    {
        let axis = self.config.spin_axis;
        let object = &self.objects[index];
        let from = bridge
            .transform(object.scene_handle)
            .map(|transform| Pose {
                position: transform.position,
                rotation: axis.component(transform.rotation),
            })
            .unwrap_or(target);
        let handle = self.tweens.start(
            object.id,
            from,
            target,
            duration_ms,
            self.config.easing,
            self.clock_ms,
        );
        self.objects[index].active_animation = Some(handle);
    }
}

/// Keep an angle in `[0, 2π)`; reaching a full turn resets to exactly zero.
fn wrap_angle(angle: f32) -> f32 {
    if angle >= TAU {
        return 0.0;
    }
    if angle < 0.0 {
        let wrapped = angle.rem_euclid(TAU);
        return if wrapped >= TAU { 0.0 } else { wrapped };
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::{InteractionConfig, InteractionController, ObjectId, ObjectPhase};
    use crate::render::{SceneBridge, SceneHit};
    use crate::scene::{NodeId, SceneGraph, Transform};
    use crate::tween::Easing;
    use glam::Vec3;
    use std::collections::HashSet;
    use std::f32::consts::TAU;

    /// Scene graph that also records every highlight call.
    #[derive(Default)]
    struct RecordingScene {
        graph: SceneGraph,
        highlight_calls: Vec<Option<NodeId>>,
    }

    impl SceneBridge for RecordingScene {
        fn transform(&self, node: NodeId) -> Option<Transform> {
            self.graph.transform(node)
        }

        fn set_transform(&mut self, node: NodeId, transform: Transform) -> bool {
            self.graph.set_transform(node, transform)
        }

        fn set_highlighted(&mut self, node: Option<NodeId>) {
            self.highlight_calls.push(node);
            self.graph.set_highlighted(node);
        }
    }

    const A: ObjectId = ObjectId(1);
    const B: ObjectId = ObjectId(2);

    fn config() -> InteractionConfig {
        InteractionConfig {
            easing: Easing::Linear,
            select_duration_ms: 100.0,
            deselect_duration_ms: 200.0,
            ..InteractionConfig::default()
        }
    }

    /// Ground plane at node 0; objects A and B are groups (nodes 1, 3) with a
    /// mesh child each (nodes 2, 4).
    fn setup() -> (InteractionController, RecordingScene) {
        let mut scene = RecordingScene::default();
        let graph = &mut scene.graph;
        graph.add_node("ground", None, Transform::default());
        let a = graph.add_node("a", None, Transform::from_position(Vec3::new(-0.5, 0.0, 0.0)));
        graph.add_node("a_mesh", Some(a), Transform::default());
        let b = graph.add_node("b", None, Transform::from_position(Vec3::new(0.5, 0.0, 0.0)));
        graph.add_node("b_mesh", Some(b), Transform::default());

        let mut controller = InteractionController::new(config());
        controller.register(A, a, Vec3::new(-0.5, 0.0, 0.0), 0.0).unwrap();
        controller.register(B, b, Vec3::new(0.5, 0.0, 0.0), 0.0).unwrap();
        (controller, scene)
    }

    fn hit(chain: &[u32], distance: f32) -> SceneHit {
        SceneHit {
            node: NodeId(chain[0]),
            distance,
            ownership_chain: chain.iter().copied().map(NodeId).collect(),
        }
    }

    fn rotation_y(scene: &RecordingScene, node: u32) -> f32 {
        scene.graph.transform(NodeId(node)).unwrap().rotation.y
    }

    #[test]
    fn empty_registry_pointer_none_is_noop() {
        let mut controller = InteractionController::new(InteractionConfig::default());
        let mut scene = RecordingScene::default();
        controller.on_pointer_move(None, &mut scene);
        controller.tick(16.0, &mut scene);
        assert_eq!(controller.selected(), None);
        assert_eq!(controller.tween_count(), 0);
        assert!(scene.highlight_calls.is_empty());
    }

    #[test]
    fn resolve_hit_walks_ownership_chain() {
        let (controller, _) = setup();
        let hits = [hit(&[4, 3], 1.0), hit(&[2, 1], 2.0)];
        assert_eq!(controller.resolve_hit(&hits, &HashSet::new()), Some(B));
        assert_eq!(controller.resolve_hit(&[], &HashSet::new()), None);
    }

    #[test]
    fn resolve_hit_skips_excluded_nodes() {
        let (mut controller, _) = setup();
        let hits = [hit(&[0], 0.5), hit(&[2, 1], 1.0)];
        assert_eq!(controller.resolve_hit(&hits, &HashSet::new()), None);

        let exclude: HashSet<NodeId> = [NodeId(0)].into_iter().collect();
        assert_eq!(controller.resolve_hit(&hits, &exclude), Some(A));

        controller.exclude_node(NodeId(0));
        assert_eq!(controller.resolve_hit(&hits, &HashSet::new()), Some(A));
    }

    #[test]
    fn resolve_hit_matches_hit_node_without_chain() {
        let (controller, _) = setup();
        let direct = SceneHit {
            node: NodeId(3),
            distance: 1.0,
            ownership_chain: vec![],
        };
        assert_eq!(controller.resolve_hit(&[direct.clone()], &HashSet::new()), Some(B));

        let (mut controller, mut scene) = setup();
        assert_eq!(controller.on_pointer_hits(&[direct], &mut scene), Some(B));
        assert_eq!(controller.selected(), Some(B));
    }

    #[test]
    fn resolve_hit_nearest_unknown_occludes() {
        let (controller, _) = setup();
        let hits = [hit(&[9], 0.5), hit(&[2, 1], 1.0)];
        assert_eq!(controller.resolve_hit(&hits, &HashSet::new()), None);
    }

    #[test]
    fn hover_enter_selects_and_requests_raise() {
        let (mut controller, mut scene) = setup();
        controller.tick(0.0, &mut scene);

        let selected = controller.on_pointer_hits(&[hit(&[2, 1], 1.0)], &mut scene);
        assert_eq!(selected, Some(A));
        assert_eq!(controller.selected(), Some(A));
        let object = controller.object(A).unwrap();
        assert!(!object.spinning);
        assert_eq!(object.phase(), ObjectPhase::Selected);
        assert!(object.active_animation().is_some());
        assert_eq!(controller.tween_count(), 1);
        assert_eq!(scene.highlight_calls, vec![Some(NodeId(1))]);

        controller.tick(100.0, &mut scene);
        let transform = scene.graph.transform(NodeId(1)).unwrap();
        assert_eq!(transform.position, Vec3::new(-0.5, 0.0, 0.1));
        assert_eq!(transform.rotation.y, 0.0);
        assert_eq!(controller.tween_count(), 0);
        assert_eq!(controller.phase(A), Some(ObjectPhase::Selected));
        assert!(!controller.object(A).unwrap().spinning);
    }

    #[test]
    fn rehover_same_object_is_idempotent() {
        let (mut controller, mut scene) = setup();
        controller.on_pointer_move(Some(A), &mut scene);
        let handle = controller.object(A).unwrap().active_animation();
        let jobs = controller.tween_count();

        controller.on_pointer_move(Some(A), &mut scene);
        controller.on_pointer_hits(&[hit(&[2, 1], 1.0)], &mut scene);

        assert_eq!(controller.object(A).unwrap().active_animation(), handle);
        assert_eq!(controller.tween_count(), jobs);
        assert_eq!(controller.selected(), Some(A));
        assert_eq!(scene.highlight_calls, vec![Some(NodeId(1))]);
    }

    #[test]
    fn direct_switch_deselects_then_selects() {
        let (mut controller, mut scene) = setup();
        controller.on_pointer_move(Some(A), &mut scene);
        controller.on_pointer_move(Some(B), &mut scene);

        assert_eq!(controller.selected(), Some(B));
        assert_eq!(controller.phase(A), Some(ObjectPhase::Deselecting));
        assert_eq!(controller.phase(B), Some(ObjectPhase::Selected));
        assert_eq!(controller.tween_count(), 2);
        assert_eq!(
            scene.highlight_calls,
            vec![Some(NodeId(1)), None, Some(NodeId(3))]
        );
        assert_eq!(scene.graph.highlighted(), Some(NodeId(3)));
    }

    #[test]
    fn deselect_settles_exactly_on_idle_pose() {
        let (mut controller, mut scene) = setup();
        controller.tick(0.0, &mut scene);
        controller.on_pointer_move(Some(A), &mut scene);
        controller.tick(50.0, &mut scene);
        assert_ne!(scene.graph.transform(NodeId(1)).unwrap().position.z, 0.0);

        // Leave before the raise finished: the raise is replaced, not queued.
        let raise = controller.object(A).unwrap().active_animation();
        controller.on_pointer_move(None, &mut scene);
        assert_eq!(controller.selected(), None);
        assert_eq!(controller.phase(A), Some(ObjectPhase::Deselecting));
        assert_ne!(controller.object(A).unwrap().active_animation(), raise);
        assert_eq!(controller.tween_count(), 1);
        assert!(!controller.object(A).unwrap().spinning);
        assert_eq!(scene.highlight_calls.last(), Some(&None));

        controller.tick(150.0, &mut scene);
        assert!(!controller.object(A).unwrap().spinning);

        controller.tick(250.0, &mut scene);
        let object = controller.object(A).unwrap();
        assert!(object.spinning);
        assert_eq!(object.phase(), ObjectPhase::Idle);
        assert_eq!(object.active_animation(), None);
        let transform = scene.graph.transform(NodeId(1)).unwrap();
        assert_eq!(transform.position, Vec3::new(-0.5, 0.0, 0.0));
        assert_eq!(transform.rotation.y, 0.0);
    }

    #[test]
    fn reentering_while_deselecting_selects_again() {
        let (mut controller, mut scene) = setup();
        controller.on_pointer_move(Some(A), &mut scene);
        controller.on_pointer_move(None, &mut scene);
        controller.on_pointer_move(Some(A), &mut scene);
        assert_eq!(controller.phase(A), Some(ObjectPhase::Selected));
        assert_eq!(controller.tween_count(), 1);

        controller.tick(1000.0, &mut scene);
        assert_eq!(controller.phase(A), Some(ObjectPhase::Selected));
        assert!(!controller.object(A).unwrap().spinning);
    }

    #[test]
    fn only_selected_stops_spinning_once_settled() {
        let (mut controller, mut scene) = setup();
        controller.on_pointer_move(Some(A), &mut scene);
        controller.on_pointer_move(Some(B), &mut scene);
        controller.tick(1000.0, &mut scene);

        let still: Vec<ObjectId> = controller
            .objects()
            .iter()
            .filter(|object| !object.spinning)
            .map(|object| object.id)
            .collect();
        assert_eq!(still, vec![B]);
    }

    #[test]
    fn idle_spin_steps_and_wraps_once() {
        let (mut controller, mut scene) = setup();
        let step = controller.config().rotation_step;

        controller.tick(0.0, &mut scene);
        assert!((rotation_y(&scene, 1) - step).abs() < 1e-7);
        controller.tick(16.0, &mut scene);
        assert!((rotation_y(&scene, 1) - 2.0 * step).abs() < 1e-6);

        for frame in 2..1256 {
            controller.tick(frame as f64 * 16.0, &mut scene);
        }
        let before_wrap = rotation_y(&scene, 1);
        assert!(before_wrap > 6.27 && before_wrap < TAU);

        controller.tick(1256.0 * 16.0, &mut scene);
        assert_eq!(rotation_y(&scene, 1), 0.0);
        controller.tick(1257.0 * 16.0, &mut scene);
        assert!((rotation_y(&scene, 1) - step).abs() < 1e-7);
    }

    #[test]
    fn selected_object_does_not_spin() {
        let (mut controller, mut scene) = setup();
        controller.on_pointer_move(Some(B), &mut scene);
        controller.tick(0.0, &mut scene);
        controller.tick(16.0, &mut scene);
        assert_eq!(rotation_y(&scene, 3), 0.0);
        assert!(rotation_y(&scene, 1) > 0.0);
    }

    #[test]
    fn missing_nodes_are_skipped() {
        let mut scene = RecordingScene::default();
        let mut controller = InteractionController::new(config());
        controller.register(A, NodeId(42), Vec3::ZERO, 0.0).unwrap();
        controller.tick(0.0, &mut scene);
        controller.on_pointer_move(Some(A), &mut scene);
        controller.tick(500.0, &mut scene);
        assert_eq!(controller.tween_count(), 0);
        assert_eq!(controller.phase(A), Some(ObjectPhase::Selected));
    }

    #[test]
    fn unknown_hover_target_counts_as_none() {
        let (mut controller, mut scene) = setup();
        controller.on_pointer_move(Some(A), &mut scene);
        controller.on_pointer_move(Some(ObjectId(77)), &mut scene);
        assert_eq!(controller.selected(), None);
        assert_eq!(controller.phase(A), Some(ObjectPhase::Deselecting));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let (mut controller, _) = setup();
        assert!(controller.register(A, NodeId(0), Vec3::ZERO, 0.0).is_err());
        assert!(controller.register(ObjectId(9), NodeId(1), Vec3::ZERO, 0.0).is_err());
        assert_eq!(controller.objects().len(), 2);
    }

    #[test]
    fn late_registration_joins_between_frames() {
        let (mut controller, mut scene) = setup();
        controller.tick(0.0, &mut scene);
        let late = scene.graph.add_node("late", None, Transform::default());
        controller.register(ObjectId(3), late, Vec3::ZERO, 0.0).unwrap();
        controller.tick(16.0, &mut scene);
        assert!(rotation_y(&scene, late.0) > 0.0);
        assert!(rotation_y(&scene, 1) > rotation_y(&scene, late.0));
    }
}
