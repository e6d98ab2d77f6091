//! The panoptes map data model.
//!
//! # Belief Voxels
//!
//! Every voxel carries a [`ClassBelief`]: a sparse histogram of per-class
//! observation counts, aggregate belongs/foreign judgement counters, and the
//! currently assigned class. [`UncertainBelief`] augments this with an
//! explicit uncertainty estimate. Ground-truth assignments are sticky: once an
//! oracle labels a voxel, no inferred belief can overwrite it.
//!
//! # The Word Codec
//!
//! Voxels persist into a flat stream of 32-bit words with a fixed, versionless
//! layout. The codec is lossy by design: only the [`TOP_K`] highest-count
//! classes survive a round trip, which bounds every initialized voxel to the
//! same number of words. See the [`codec`](crate::codec) module docs for the
//! exact layout and its external contract.
//!
//! # Submaps
//!
//! The map is partitioned into [`Submap`]s, independently owned spatial
//! regions with their own block-structured voxel grid. A [`SubmapCollection`]
//! owns all live submaps and keeps an O(1) id-to-storage-slot index that stays
//! consistent as submaps are removed and the backing storage compacts. When
//! two submaps are aligned and fused, overlapping voxel pairs merge under a
//! probabilistic dominance rule with a ground-truth override.

mod belief;
mod block;
pub mod codec;
mod collection;
mod config;
mod integrator;
mod layer;
mod submap;
mod top_k;

pub use belief::*;
pub use block::*;
pub use codec::{
    DecodeError, EncodeError, COUNT_BITS, HEADER_WORDS, INDEX_WORDS, INITIALIZED_WORDS,
    MAX_CLASSES_PER_VOXEL, TOP_K, VALUE_WORDS,
};
pub use collection::*;
pub use config::*;
pub use integrator::*;
pub use layer::*;
pub use submap::*;
pub use top_k::*;
