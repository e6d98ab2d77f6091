use crate::belief::BeliefVoxel;
use crate::block::BeliefBlock;

use panoptes_core::SmallKeyHashMap;

/// Discrete block coordinates within a submap's grid.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BlockKey(pub [i32; 3]);

/// The voxel storage of one submap. Blocks are allocated on demand; absent
/// partitions of space hold no data.
pub struct BeliefLayer<V> {
    voxels_per_side: u32,
    blocks: SmallKeyHashMap<BlockKey, BeliefBlock<V>>,
}

impl<V: BeliefVoxel> BeliefLayer<V> {
    pub fn new(voxels_per_side: u32) -> Self {
        Self {
            voxels_per_side,
            blocks: SmallKeyHashMap::default(),
        }
    }

    pub fn voxels_per_side(&self) -> u32 {
        self.voxels_per_side
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, key: BlockKey) -> Option<&BeliefBlock<V>> {
        self.blocks.get(&key)
    }

    pub fn block_mut(&mut self, key: BlockKey) -> Option<&mut BeliefBlock<V>> {
        self.blocks.get_mut(&key)
    }

    /// Returns the block at `key`, allocating a fresh one if absent.
    pub fn block_or_insert(&mut self, key: BlockKey) -> &mut BeliefBlock<V> {
        let voxels_per_side = self.voxels_per_side;
        self.blocks
            .entry(key)
            .or_insert_with(|| BeliefBlock::new(voxels_per_side))
    }

    pub fn iter_blocks(&self) -> impl Iterator<Item = (&BlockKey, &BeliefBlock<V>)> {
        self.blocks.iter()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
