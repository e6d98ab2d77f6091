use crate::belief::UncertainBelief;
use crate::layer::BeliefLayer;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Unique identity of a [`Submap`] for the lifetime of the process.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SubmapId(pub u32);

static NEXT_SUBMAP_ID: AtomicU32 = AtomicU32::new(0);

impl SubmapId {
    /// Ids are handed out at construction and never reused.
    fn fresh() -> Self {
        Self(NEXT_SUBMAP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct SubmapConfig {
    /// Voxel edge length in meters.
    pub voxel_size: f32,
    /// Voxels along one edge of a block.
    pub voxels_per_side: u32,
}

impl Default for SubmapConfig {
    fn default() -> Self {
        Self {
            voxel_size: 0.1,
            voxels_per_side: 16,
        }
    }
}

/// An independently owned spatial region carrying its own belief voxel grid.
pub struct Submap {
    id: SubmapId,
    config: SubmapConfig,
    layer: BeliefLayer<UncertainBelief>,
}

impl Submap {
    pub fn new(config: SubmapConfig) -> Self {
        Self {
            id: SubmapId::fresh(),
            config,
            layer: BeliefLayer::new(config.voxels_per_side),
        }
    }

    pub fn id(&self) -> SubmapId {
        self.id
    }

    pub fn config(&self) -> &SubmapConfig {
        &self.config
    }

    pub fn voxel_size(&self) -> f32 {
        self.config.voxel_size
    }

    pub fn layer(&self) -> &BeliefLayer<UncertainBelief> {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut BeliefLayer<UncertainBelief> {
        &mut self.layer
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique() {
        let config = SubmapConfig::default();
        let a = Submap::new(config);
        let b = Submap::new(config);
        let c = Submap::new(config);
        assert_ne!(a.id(), b.id());
        assert_ne!(b.id(), c.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn layer_matches_config() {
        let submap = Submap::new(SubmapConfig {
            voxel_size: 0.05,
            voxels_per_side: 8,
        });
        assert_eq!(submap.layer().voxels_per_side(), 8);
        assert_eq!(submap.voxel_size(), 0.05);
    }
}
