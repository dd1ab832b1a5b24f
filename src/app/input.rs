use glam::Vec2;

/// Last known pointer position over the viewport, in window pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerState {
    pub position: Option<Vec2>,
    pub viewport: (u32, u32),
}

impl PointerState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: None,
            viewport: (width, height),
        }
    }

    /// Returns `true` when the position actually changed.
    pub fn handle_move(&mut self, position: Option<Vec2>) -> bool {
        if self.position == position {
            return false;
        }
        self.position = position;
        true
    }

    /// Pointer in normalized device coordinates, `None` once it left the window.
    pub fn ndc(&self) -> Option<Vec2> {
        let (width, height) = self.viewport;
        self.position
            .map(|position| screen_to_ndc(position, width, height))
    }
}

/// Window pixels (top-left origin) to NDC (`y` up, `[-1, 1]` on both axes).
pub fn screen_to_ndc(position: Vec2, width: u32, height: u32) -> Vec2 {
    let width = width.max(1) as f32;
    let height = height.max(1) as f32;
    Vec2::new(
        position.x / width * 2.0 - 1.0,
        -(position.y / height * 2.0 - 1.0),
    )
}
