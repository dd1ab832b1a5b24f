use crate::scene::NodeId;
use glam::Vec3;

/// An asset whose scene node is ready and can become interactive.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAsset {
    pub name: String,
    pub root_node: NodeId,
    pub idle_offset: Vec3,
    pub idle_rotation: f32,
}

#[derive(Debug, Clone)]
struct PendingLoad {
    asset: LoadedAsset,
    ready_frame: u32,
    order: usize,
}

/// Loads in flight. Completion follows each load's ready frame, not request
/// order, so callers see assets arrive in arbitrary order.
#[derive(Debug, Default)]
pub struct AssetQueue {
    pending: Vec<PendingLoad>,
    requested: usize,
}

impl AssetQueue {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            requested: 0,
        }
    }

    pub fn request(&mut self, asset: LoadedAsset, ready_frame: u32) {
        log::debug!("Loading `{}` (ready at frame {})", asset.name, ready_frame);
        self.pending.push(PendingLoad {
            asset,
            ready_frame,
            order: self.requested,
        });
        self.requested += 1;
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Take every load that completed by `frame`, in completion order.
    pub fn poll(&mut self, frame: u32) -> Vec<LoadedAsset> {
        let (mut done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|load| load.ready_frame <= frame);
        self.pending = pending;
        done.sort_by_key(|load| (load.ready_frame, load.order));
        done.into_iter().map(|load| load.asset).collect()
    }
}
