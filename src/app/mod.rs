//! Headless session driver
//!
//! Stands in for the browser demo's window and render loop: stages a scene from
//! a [`SceneDescription`], lets assets arrive over several frames, replays a
//! scripted pointer path and ticks the [`InteractionController`] at a fixed
//! cadence. The rendering pipeline is represented only by the scene graph it
//! would read transforms and the highlight target from.

mod input;
mod timing;

pub use input::{screen_to_ndc, PointerState};
pub use timing::FrameTiming;

use crate::assets::{AssetQueue, LoadedAsset};
use crate::interaction::{InteractionController, ObjectId, ObjectPhase};
use crate::render::{Camera, RaycastQuery, SceneBridge, SceneQuery};
use crate::scene::serialization::{PointerSample, SceneDescription};
use crate::scene::{SceneError, SceneGraph};
use glam::{Vec2, Vec3};

const FRAME_MS: f64 = 16.0;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("asset references unknown node `{0}`")]
    UnknownAssetNode(String),
    #[error("exclusion references unknown node `{0}`")]
    UnknownExcludedNode(String),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SelectionChange {
    pub frame: u32,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ObjectSummary {
    pub name: String,
    pub phase: String,
    pub spinning: bool,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SessionSummary {
    pub frames: u32,
    pub selections: Vec<SelectionChange>,
    pub highlighted: Option<String>,
    pub objects: Vec<ObjectSummary>,
}

pub struct App {
    scene: SceneGraph,
    camera: Camera,
    controller: InteractionController,
    assets: AssetQueue,
    names: Vec<(ObjectId, String)>,
    pointer: PointerState,
    timing: FrameTiming,
    script: Vec<PointerSample>,
    script_cursor: usize,
    frames: u32,
    selections: Vec<SelectionChange>,
}

impl App {
    pub fn from_description(description: SceneDescription) -> Result<Self, AppError> {
        let scene = SceneGraph::from_descriptions(&description.nodes)?;

        let camera_desc = description.camera;
        let mut camera = Camera::look_at(
            Vec3::from_array(camera_desc.position),
            Vec3::from_array(camera_desc.target),
        )
        .with_projection(camera_desc.fov_y_deg, camera_desc.near, camera_desc.far);
        let viewport = description.viewport;
        camera.set_viewport(viewport.width, viewport.height);

        let mut controller = InteractionController::new(description.interaction);
        for name in &description.exclude {
            let node = scene
                .find(name)
                .ok_or_else(|| AppError::UnknownExcludedNode(name.clone()))?;
            controller.exclude_node(node);
        }

        let spin_axis = controller.config().spin_axis;
        let mut assets = AssetQueue::new();
        for asset in &description.assets {
            let node = scene
                .find(&asset.node)
                .ok_or_else(|| AppError::UnknownAssetNode(asset.node.clone()))?;
            let transform = scene.transform(node).unwrap_or_default();
            assets.request(
                LoadedAsset {
                    name: asset.node.clone(),
                    root_node: node,
                    idle_offset: transform.position,
                    idle_rotation: spin_axis.component(transform.rotation),
                },
                asset.load_delay_frames,
            );
        }

        let mut script = description.pointer_script;
        script.sort_by_key(|sample| sample.frame);

        log::info!(
            "Session staged: {} nodes, {} assets loading, {} pointer samples",
            scene.len(),
            assets.pending_count(),
            script.len()
        );

        Ok(Self {
            scene,
            camera,
            controller,
            assets,
            names: Vec::new(),
            pointer: PointerState::new(viewport.width, viewport.height),
            timing: FrameTiming::new(FRAME_MS),
            script,
            script_cursor: 0,
            frames: description.frames,
            selections: Vec::new(),
        })
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn run(&mut self) -> SessionSummary {
        while self.timing.frame() < self.frames {
            self.step();
        }
        log::info!(
            "Session finished after {} frames ({:.1?} wall time)",
            self.timing.frame(),
            self.timing.wall_time()
        );
        self.summary()
    }

    /// One display refresh: asset arrivals, pointer events, then the frame tick.
    pub fn step(&mut self) {
        let frame = self.timing.frame();

        for loaded in self.assets.poll(frame) {
            self.register_asset(loaded);
        }

        while let Some(sample) = self.script.get(self.script_cursor).copied() {
            if sample.frame > frame {
                break;
            }
            self.script_cursor += 1;
            let position = sample.position.map(Vec2::from_array);
            if self.pointer.handle_move(position) {
                self.pointer_moved(frame);
            }
        }

        self.controller.tick(self.timing.now_ms(), &mut self.scene);
        self.timing.advance();
    }

    pub fn summary(&self) -> SessionSummary {
        let objects = self
            .controller
            .objects()
            .iter()
            .map(|object| {
                let transform = self.scene.transform(object.scene_handle).unwrap_or_default();
                ObjectSummary {
                    name: self.name_of(object.id),
                    phase: match object.phase() {
                        ObjectPhase::Idle => "idle",
                        ObjectPhase::Selected => "selected",
                        ObjectPhase::Deselecting => "deselecting",
                    }
                    .to_string(),
                    spinning: object.spinning,
                    position: transform.position.to_array(),
                    rotation: transform.rotation.to_array(),
                }
            })
            .collect();
        let highlighted = self
            .scene
            .highlighted()
            .and_then(|node| self.scene.node(node))
            .map(|node| node.name.clone());
        SessionSummary {
            frames: self.timing.frame(),
            selections: self.selections.clone(),
            highlighted,
            objects,
        }
    }

    fn register_asset(&mut self, loaded: LoadedAsset) {
        let id = ObjectId(self.names.len() as u32 + 1);
        match self.controller.register(
            id,
            loaded.root_node,
            loaded.idle_offset,
            loaded.idle_rotation,
        ) {
            Ok(()) => {
                log::info!("`{}` loaded at frame {}", loaded.name, self.timing.frame());
                self.names.push((id, loaded.name));
            }
            Err(err) => log::warn!("Ignoring `{}`: {}", loaded.name, err),
        }
    }

    fn pointer_moved(&mut self, frame: u32) {
        let hits = match self.pointer.ndc() {
            Some(ndc) => RaycastQuery::new(&self.scene).query_hits(ndc, &self.camera),
            None => Vec::new(),
        };
        let before = self.controller.selected();
        let after = self.controller.on_pointer_hits(&hits, &mut self.scene);
        if before != after {
            let selected = after.map(|id| self.name_of(id));
            log::info!(
                "frame {}: hover {}",
                frame,
                selected.as_deref().unwrap_or("<none>")
            );
            self.selections.push(SelectionChange { frame, selected });
        }
    }

    fn name_of(&self, id: ObjectId) -> String {
        self.names
            .iter()
            .find(|(object_id, _)| *object_id == id)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| format!("{:?}", id))
    }

    #[cfg(test)]
    fn node(&self, name: &str) -> crate::scene::NodeId {
        self.scene.find(name).unwrap()
    }
}
