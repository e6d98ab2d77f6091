use crate::belief::BeliefVoxel;
use crate::codec::{DecodeError, EncodeError, INITIALIZED_WORDS};

use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use ndshape::{RuntimeShape, Shape};
use std::io;
use std::io::Read;

/// A cubic block of belief voxels in fixed storage (linearized) order.
///
/// The block serializes as the concatenation of per-voxel encodings with no
/// delimiters between voxels; boundaries are recovered only by re-running
/// decode over the slots in the same order.
pub struct BeliefBlock<V> {
    voxels: Box<[V]>,
    voxels_per_side: u32,
    shape: RuntimeShape<u32, 3>,
}

impl<V: Clone> Clone for BeliefBlock<V> {
    fn clone(&self) -> Self {
        Self {
            voxels: self.voxels.clone(),
            voxels_per_side: self.voxels_per_side,
            shape: RuntimeShape::<u32, 3>::new([self.voxels_per_side; 3]),
        }
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for BeliefBlock<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeliefBlock")
            .field("voxels_per_side", &self.voxels_per_side)
            .field("voxels", &self.voxels)
            .finish()
    }
}

impl<V: PartialEq> PartialEq for BeliefBlock<V> {
    fn eq(&self, other: &Self) -> bool {
        self.voxels_per_side == other.voxels_per_side && self.voxels == other.voxels
    }
}

impl<V: BeliefVoxel> BeliefBlock<V> {
    pub fn new(voxels_per_side: u32) -> Self {
        let shape = RuntimeShape::<u32, 3>::new([voxels_per_side; 3]);
        let voxels = vec![V::default(); shape.size() as usize].into_boxed_slice();
        Self {
            voxels,
            voxels_per_side,
            shape,
        }
    }

    pub fn voxels_per_side(&self) -> u32 {
        self.voxels_per_side
    }

    pub fn num_voxels(&self) -> usize {
        self.voxels.len()
    }

    pub fn voxels(&self) -> &[V] {
        &self.voxels
    }

    #[inline]
    pub fn linearize(&self, p: [u32; 3]) -> usize {
        self.shape.linearize(p) as usize
    }

    #[inline]
    pub fn voxel(&self, index: usize) -> &V {
        &self.voxels[index]
    }

    #[inline]
    pub fn voxel_mut(&mut self, index: usize) -> &mut V {
        &mut self.voxels[index]
    }

    /// Encodes every voxel slot into one flat word stream.
    pub fn serialize_into_words(&self) -> Result<Vec<u32>, EncodeError> {
        let mut words = Vec::with_capacity(self.voxels.len() * INITIALIZED_WORDS);
        for voxel in self.voxels.iter() {
            voxel.encode_words(&mut words)?;
        }
        Ok(words)
    }

    /// Fills every voxel slot from `words`, in storage order.
    ///
    /// Fails if the stream is exhausted before all slots are filled, or if any
    /// words remain once they are.
    pub fn deserialize_from_words(&mut self, words: &[u32]) -> Result<(), DecodeError> {
        let mut cursor = 0;
        let mut filled = 0;
        while filled < self.voxels.len() && cursor < words.len() {
            V::decode_words(words, &mut cursor, &mut self.voxels[filled])?;
            filled += 1;
        }
        if filled < self.voxels.len() {
            return Err(DecodeError::Truncated { cursor });
        }
        if cursor < words.len() {
            return Err(DecodeError::TrailingWords {
                remaining: words.len() - cursor,
            });
        }
        Ok(())
    }

    /// Fuses `src` into `self` voxel-by-voxel under the dominance rule.
    ///
    /// Both blocks must have the same shape; aligning overlapping blocks is
    /// the map engine's job.
    pub fn merge_from(&mut self, src: &Self) {
        debug_assert_eq!(self.voxels_per_side, src.voxels_per_side);
        for (dst, src) in self.voxels.iter_mut().zip(src.voxels.iter()) {
            dst.merge_from(src);
        }
    }

    /// LZ4-compresses the serialized word stream.
    pub fn compress(&self) -> Result<CompressedBeliefBlock, EncodeError> {
        let words = self.serialize_into_words()?;
        let mut encoder = FrameEncoder::new(Vec::new());
        let mut reader: &[u8] = bytemuck::cast_slice(&words);
        io::copy(&mut reader, &mut encoder).unwrap();
        Ok(CompressedBeliefBlock {
            bytes: encoder.finish().unwrap().into_boxed_slice(),
        })
    }

    /// Inverse of [`Self::compress`], filling this block's voxel slots.
    pub fn decompress_into(&mut self, compressed: &CompressedBeliefBlock) -> Result<(), DecodeError> {
        let mut decoder = FrameDecoder::new(compressed.bytes.as_ref());
        let mut bytes = Vec::new();
        decoder
            .read_to_end(&mut bytes)
            .map_err(|_| DecodeError::Compression("LZ4 frame is malformed"))?;
        if bytes.len() % 4 != 0 {
            return Err(DecodeError::Compression(
                "payload length is not a whole number of words",
            ));
        }
        let words: Vec<u32> = bytemuck::pod_collect_to_vec(&bytes);
        self.deserialize_from_words(&words)
    }
}

/// The LZ4-compressed word stream of one [`BeliefBlock`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompressedBeliefBlock {
    pub bytes: Box<[u8]>,
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
    use crate::belief::{ClassBelief, UncertainBelief};
    use crate::codec::HEADER_WORDS;

    fn populated_block() -> BeliefBlock<UncertainBelief> {
        let mut block = BeliefBlock::<UncertainBelief>::new(4);
        for index in (0..block.num_voxels()).step_by(3) {
            let voxel = block.voxel_mut(index);
            voxel.belief.observe(index % 11);
            voxel.belief.observe(index % 7);
            voxel.uncertainty = index as f32 / 64.0;
        }
        block
    }

    #[test]
    fn empty_block_roundtrips() {
        let block = BeliefBlock::<ClassBelief>::new(4);
        let words = block.serialize_into_words().unwrap();
        assert_eq!(words.len(), block.num_voxels() * HEADER_WORDS);

        let mut decoded = BeliefBlock::<ClassBelief>::new(4);
        decoded.deserialize_from_words(&words).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn mixed_block_roundtrips() {
        let block = populated_block();
        let words = block.serialize_into_words().unwrap();
        let mut decoded = BeliefBlock::<UncertainBelief>::new(4);
        decoded.deserialize_from_words(&words).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn truncated_stream_is_fatal() {
        let block = populated_block();
        let words = block.serialize_into_words().unwrap();
        let mut decoded = BeliefBlock::<UncertainBelief>::new(4);
        assert!(matches!(
            decoded.deserialize_from_words(&words[..words.len() - 1]),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn trailing_words_are_fatal() {
        let block = populated_block();
        let mut words = block.serialize_into_words().unwrap();
        words.extend_from_slice(&[0; HEADER_WORDS]);
        let mut decoded = BeliefBlock::<UncertainBelief>::new(4);
        assert_eq!(
            decoded.deserialize_from_words(&words),
            Err(DecodeError::TrailingWords {
                remaining: HEADER_WORDS
            })
        );
    }

    #[test]
    fn block_merge_applies_dominance_per_voxel() {
        let mut dst = BeliefBlock::<UncertainBelief>::new(2);
        let mut src = BeliefBlock::<UncertainBelief>::new(2);

        // src dominates at voxel 0; dst dominates at voxel 1.
        src.voxel_mut(0).belief.observe(3);
        dst.voxel_mut(1).belief.observe(5);

        dst.merge_from(&src);
        assert_eq!(dst.voxel(0).belief.current_index, 3);
        assert_eq!(dst.voxel(1).belief.current_index, 5);
    }

    #[test]
    fn compressed_block_roundtrips() {
        let block = populated_block();
        let compressed = block.compress().unwrap();
        let mut decoded = BeliefBlock::<UncertainBelief>::new(4);
        decoded.decompress_into(&compressed).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn garbage_compressed_payload_is_rejected() {
        let mut decoded = BeliefBlock::<ClassBelief>::new(2);
        let garbage = CompressedBeliefBlock {
            bytes: vec![0xAB; 16].into_boxed_slice(),
        };
        assert!(matches!(
            decoded.decompress_into(&garbage),
            Err(DecodeError::Compression(_))
        ));
    }
}
