pub mod serialization;

use crate::render::SceneBridge;
use glam::{EulerRot, Mat4, Quat, Vec3};
use serialization::NodeDescription;

/// Index of a node in a [`SceneGraph`] arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Local transform of a node. Rotation is Euler XYZ in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        compose_transform_matrix(self.position, self.rotation, self.scale)
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub transform: Transform,
    /// Bounding sphere radius in local units; nodes without one are never hit.
    pub bounds_radius: Option<f32>,
    pub pickable: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node `{node}` names parent `{parent}` which is not declared before it")]
    UnknownParent { node: String, parent: String },
    #[error("node name `{0}` is declared twice")]
    DuplicateName(String),
}

/// Arena of scene nodes linked by parent index.
///
/// Parents are always inserted before their children, so parent links can only
/// point at lower indices and the ownership walk terminates without a visited set.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    highlighted: Option<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            highlighted: None,
        }
    }

    pub fn from_descriptions(descriptions: &[NodeDescription]) -> Result<Self, SceneError> {
        let mut graph = Self::new();
        for description in descriptions {
            if graph.find(&description.name).is_some() {
                return Err(SceneError::DuplicateName(description.name.clone()));
            }
            let parent = match &description.parent {
                Some(parent_name) => Some(graph.find(parent_name).ok_or_else(|| {
                    SceneError::UnknownParent {
                        node: description.name.clone(),
                        parent: parent_name.clone(),
                    }
                })?),
                None => None,
            };
            let id = graph.add_node(
                &description.name,
                parent,
                Transform {
                    position: Vec3::from_array(description.position),
                    rotation: Vec3::from_array(description.rotation),
                    scale: Vec3::from_array(description.scale),
                },
            );
            if let Some(radius) = description.radius {
                graph.set_bounds(id, radius);
            }
            graph.set_pickable(id, description.pickable);
        }
        log::info!("Scene graph built with {} nodes", graph.len());
        Ok(graph)
    }

    /// Append a node. A parent id that does not exist yet makes the node a root.
    pub fn add_node(&mut self, name: &str, parent: Option<NodeId>, transform: Transform) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let parent = parent.filter(|parent| {
            let known = parent.index() < self.nodes.len();
            if !known {
                log::warn!("Node `{}` references missing parent {:?}; adding as root", name, parent);
            }
            known
        });
        self.nodes.push(SceneNode {
            name: name.to_string(),
            parent,
            transform,
            bounds_radius: None,
            pickable: true,
        });
        id
    }

    pub fn set_bounds(&mut self, id: NodeId, radius: f32) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.bounds_radius = Some(radius.abs());
        }
    }

    pub fn set_pickable(&mut self, id: NodeId, pickable: bool) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.pickable = pickable;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(|index| NodeId(index as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    /// Walk from `id` up to its root, yielding `id` first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        let next = self.node(id).map(|_| id);
        Ancestors { graph: self, next }
    }

    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.node(id)?;
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.index()];
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        Some(matrix)
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }
}

pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self
            .graph
            .node(current)
            .and_then(|node| node.parent)
            .filter(|parent| *parent < current);
        Some(current)
    }
}

impl SceneBridge for SceneGraph {
    fn transform(&self, node: NodeId) -> Option<Transform> {
        self.node(node).map(|node| node.transform)
    }

    fn set_transform(&mut self, node: NodeId, transform: Transform) -> bool {
        match self.nodes.get_mut(node.index()) {
            Some(entry) => {
                entry.transform = transform;
                true
            }
            None => false,
        }
    }

    fn set_highlighted(&mut self, node: Option<NodeId>) {
        self.highlighted = node;
    }
}

pub fn compose_transform_matrix(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    let rotation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
    Mat4::from_scale_rotation_translation(scale, rotation, position)
}
