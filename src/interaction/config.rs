use crate::tween::Easing;
use glam::Vec3;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    pub fn with_component(self, mut v: Vec3, value: f32) -> Vec3 {
        match self {
            Self::X => v.x = value,
            Self::Y => v.y = value,
            Self::Z => v.z = value,
        }
        v
    }
}

/// Tunables for hover transitions and idle spin.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Axis idle objects spin around and whose angle settles on deselect.
    pub spin_axis: Axis,
    /// Radians added per frame while idle. Not scaled by frame time.
    pub rotation_step: f32,
    /// Axis the hovered object is pushed along.
    pub highlight_axis: Axis,
    pub highlight_offset: f32,
    pub select_duration_ms: f64,
    pub deselect_duration_ms: f64,
    pub easing: Easing,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            spin_axis: Axis::Y,
            rotation_step: 0.005,
            highlight_axis: Axis::Z,
            highlight_offset: 0.1,
            select_duration_ms: 300.0,
            deselect_duration_ms: 300.0,
            easing: Easing::QuadraticOut,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InteractionConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        Ok(config.sanitized())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Replace values that would break interpolation with their defaults.
    ///
    /// Non-finite numbers and negative durations are rejected. A negative
    /// `rotation_step` or `highlight_offset` is kept: it reverses the spin or
    /// pushes the hovered object the other way along its axis.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.rotation_step.is_finite() {
            log::warn!(
                "rotation_step {} is not finite; using {}",
                self.rotation_step,
                defaults.rotation_step,
            );
            self.rotation_step = defaults.rotation_step;
        }
        if !self.highlight_offset.is_finite() {
            log::warn!(
                "highlight_offset {} is not finite; using {}",
                self.highlight_offset,
                defaults.highlight_offset,
            );
            self.highlight_offset = defaults.highlight_offset;
        }
        if !(self.select_duration_ms.is_finite() && self.select_duration_ms >= 0.0) {
            log::warn!(
                "select_duration_ms {} is invalid; using {}",
                self.select_duration_ms,
                defaults.select_duration_ms,
            );
            self.select_duration_ms = defaults.select_duration_ms;
        }
        if !(self.deselect_duration_ms.is_finite() && self.deselect_duration_ms >= 0.0) {
            log::warn!(
                "deselect_duration_ms {} is invalid; using {}",
                self.deselect_duration_ms,
                defaults.deselect_duration_ms,
            );
            self.deselect_duration_ms = defaults.deselect_duration_ms;
        }
        self
    }
}
