use crate::interaction::InteractionConfig;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SerializationError>;

/// Everything the headless driver needs to stage and replay a hover session.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDescription {
    pub viewport: Viewport,
    pub camera: CameraDescription,
    pub nodes: Vec<NodeDescription>,
    pub assets: Vec<AssetDescription>,
    /// Nodes that are hit by the pointer but must never count as hover targets.
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub pointer_script: Vec<PointerSample>,
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default)]
    pub interaction: InteractionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraDescription {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default = "default_true")]
    pub pickable: bool,
}

/// An interactive object whose backing node becomes available after a delay.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetDescription {
    pub node: String,
    #[serde(default)]
    pub load_delay_frames: u32,
}

/// Pointer position in window pixels at a given frame; `None` means the pointer left.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerSample {
    pub frame: u32,
    pub position: Option<[f32; 2]>,
}

fn default_frames() -> u32 {
    240
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_true() -> bool {
    true
}

impl SceneDescription {
    /// Three cubes in a row in front of the camera, each a group with a mesh
    /// child, above a ground plane that is never a hover target.
    pub fn demo() -> Self {
        const CUBE_HALF_DIAGONAL: f32 = 0.1732;
        let mut nodes = vec![NodeDescription {
            name: "ground".to_string(),
            parent: None,
            position: [0.0, -10.3, 0.0],
            rotation: [0.0; 3],
            scale: unit_scale(),
            radius: Some(10.0),
            pickable: true,
        }];
        let mut assets = Vec::new();
        for (name, x, delay) in [("cube_a", -0.35, 3), ("cube_b", 0.0, 12), ("cube_c", 0.35, 7)] {
            nodes.push(NodeDescription {
                name: name.to_string(),
                parent: None,
                position: [x, 0.0, 0.0],
                rotation: [0.0; 3],
                scale: unit_scale(),
                radius: None,
                pickable: true,
            });
            nodes.push(NodeDescription {
                name: format!("{name}_mesh"),
                parent: Some(name.to_string()),
                position: [0.0; 3],
                rotation: [0.0; 3],
                scale: unit_scale(),
                radius: Some(CUBE_HALF_DIAGONAL),
                pickable: true,
            });
            assets.push(AssetDescription {
                node: name.to_string(),
                load_delay_frames: delay,
            });
        }

        let sample = |frame, position| PointerSample { frame, position };
        Self {
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            camera: CameraDescription {
                position: [0.0, 0.0, 1.0],
                target: [0.0, 0.0, 0.0],
                fov_y_deg: 70.0,
                near: 0.01,
                far: 10.0,
            },
            nodes,
            assets,
            exclude: vec!["ground".to_string()],
            pointer_script: vec![
                sample(5, Some([100.0, 100.0])),
                sample(20, Some([640.0, 360.0])),
                sample(60, Some([820.0, 360.0])),
                sample(100, Some([1200.0, 650.0])),
                sample(140, None),
                sample(160, Some([460.0, 360.0])),
                sample(200, None),
            ],
            frames: default_frames(),
            interaction: InteractionConfig::default(),
        }
    }
}

pub fn save_description_to_file(description: &SceneDescription, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(description)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_description_from_file(path: &Path) -> Result<SceneDescription> {
    let json = std::fs::read_to_string(path)?;
    let description: SceneDescription = serde_json::from_str(&json)?;
    Ok(description)
}
