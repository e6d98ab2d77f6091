//! The packed word codec for belief voxels.
//!
//! Each voxel encodes to a small sequence of 32-bit words:
//!
//! ```text
//! [ class-count,
//!   belongs_count | foreign_count << 16,
//!   is_gt         | current_index << 16,
//!   packed top-K class indices (8 bits each),
//!   packed top-K counts (COUNT_BITS each) ]
//! ```
//!
//! Voxels with an empty histogram stop after the third word. The stream
//! carries no delimiters or version marker: both ends must agree on [`TOP_K`]
//! and [`COUNT_BITS`], and a mismatch silently corrupts data.

use crate::belief::{BeliefVoxel, ClassBelief, Count, UncertainBelief, UNASSIGNED_CLASS};
use crate::top_k::select_top_k;

use panoptes_core::bitpack::{pack_entries, unpack_entries, words_needed};
use panoptes_core::static_assertions::const_assert_eq;
use smallvec::SmallVec;
use thiserror::Error;

/// How many histogram entries survive a round trip through the codec. All
/// other classes decode to a zero count.
pub const TOP_K: usize = 3;

/// Bit width of one packed histogram count. Must divide 32 evenly.
pub const COUNT_BITS: u32 = 16;

const_assert_eq!(32 % COUNT_BITS, 0);
const_assert_eq!(COUNT_BITS, 8 * std::mem::size_of::<Count>() as u32);

/// Packed class indices occupy one byte each, which caps the distinct classes
/// one voxel may store.
pub const MAX_CLASSES_PER_VOXEL: usize = 257;

/// Header words present for every voxel.
pub const HEADER_WORDS: usize = 3;
/// Words holding the packed top-K class indices.
pub const INDEX_WORDS: usize = words_needed(8, TOP_K);
/// Words holding the packed top-K counts.
pub const VALUE_WORDS: usize = words_needed(COUNT_BITS, TOP_K);
/// Every voxel with a nonempty histogram occupies exactly this many words.
pub const INITIALIZED_WORDS: usize = HEADER_WORDS + INDEX_WORDS + VALUE_WORDS;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum EncodeError {
    /// The one-byte packed index space is exhausted.
    #[error(
        "voxel stores {0} distinct classes; the packed format holds at most {MAX_CLASSES_PER_VOXEL}"
    )]
    TooManyClasses(usize),
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// The stream ended before all voxel slots were filled.
    #[error("word stream exhausted at word {cursor} before all voxel slots were filled")]
    Truncated { cursor: usize },
    /// The stream still holds words after all voxel slots were filled.
    #[error("{remaining} words left unconsumed after all voxel slots were filled")]
    TrailingWords { remaining: usize },
    /// A voxel header announced more classes than the format permits.
    #[error("voxel header announces {num_classes} classes, more than the format permits")]
    ClassCountOverflow { num_classes: u32 },
    /// A packed class index points outside the announced histogram.
    #[error("packed class index {index} is outside this voxel's histogram of {num_classes} classes")]
    CorruptVoxel { index: u8, num_classes: u32 },
    /// A compressed block payload could not be decompressed.
    #[error("compressed block payload is invalid: {0}")]
    Compression(&'static str),
}

pub(crate) fn encode_class_belief(
    voxel: &ClassBelief,
    out: &mut Vec<u32>,
) -> Result<bool, EncodeError> {
    let class_count = voxel.counts.len();
    if class_count > MAX_CLASSES_PER_VOXEL {
        return Err(EncodeError::TooManyClasses(class_count));
    }

    out.push(class_count as u32);
    out.push(u32::from(voxel.belongs_count) | u32::from(voxel.foreign_count) << 16);
    out.push(u32::from(voxel.is_gt) | u32::from(voxel.current_index as u16) << 16);

    if class_count == 0 {
        // Legacy voxels may carry aggregate counters without a histogram.
        return Ok(voxel.belongs_count != 0 || voxel.foreign_count != 0);
    }

    let selected = select_top_k(&voxel.counts, TOP_K);
    let mut indices: SmallVec<[u32; TOP_K]> =
        selected.iter().map(|&(index, _)| u32::from(index)).collect();
    let mut values: SmallVec<[u32; TOP_K]> =
        selected.iter().map(|&(_, count)| u32::from(count)).collect();

    // Initialized voxels must always occupy the same number of words. A
    // histogram with fewer than TOP_K classes is padded by repeating its last
    // selected entry; rewriting the same histogram slot on decode is
    // idempotent.
    let (last_index, last_value) = (indices[indices.len() - 1], values[values.len() - 1]);
    while indices.len() < TOP_K {
        indices.push(last_index);
        values.push(last_value);
    }

    pack_entries(&indices, 8, out);
    pack_entries(&values, COUNT_BITS, out);
    Ok(true)
}

pub(crate) fn decode_class_belief(
    words: &[u32],
    cursor: &mut usize,
    voxel: &mut ClassBelief,
) -> Result<bool, DecodeError> {
    if words.len().saturating_sub(*cursor) < HEADER_WORDS {
        return Err(DecodeError::Truncated { cursor: *cursor });
    }
    let num_classes = words[*cursor];
    let aggregates = words[*cursor + 1];
    let assignment = words[*cursor + 2];
    *cursor += HEADER_WORDS;

    voxel.belongs_count = (aggregates & 0xFFFF) as Count;
    voxel.foreign_count = (aggregates >> 16) as Count;
    voxel.is_gt = (assignment & 0xFFFF) != 0;
    voxel.current_index = (assignment >> 16) as u16 as i16;

    if num_classes == 0 {
        voxel.counts.clear();
        voxel.current_index = UNASSIGNED_CLASS;
        return Ok(voxel.belongs_count != 0 || voxel.foreign_count != 0);
    }
    if num_classes as usize > MAX_CLASSES_PER_VOXEL {
        return Err(DecodeError::ClassCountOverflow { num_classes });
    }
    if words.len().saturating_sub(*cursor) < INDEX_WORDS + VALUE_WORDS {
        return Err(DecodeError::Truncated { cursor: *cursor });
    }

    let indices = unpack_entries(&words[*cursor..], 8, TOP_K);
    *cursor += INDEX_WORDS;
    let values = unpack_entries(&words[*cursor..], COUNT_BITS, TOP_K);
    *cursor += VALUE_WORDS;

    voxel.counts.clear();
    voxel.counts.resize(num_classes as usize, 0);
    for (&index, &value) in indices.iter().zip(values.iter()) {
        let slot = voxel
            .counts
            .get_mut(index as usize)
            .ok_or(DecodeError::CorruptVoxel {
                index: index as u8,
                num_classes,
            })?;
        *slot = value as Count;
    }
    Ok(true)
}

impl BeliefVoxel for ClassBelief {
    fn encode_words(&self, out: &mut Vec<u32>) -> Result<bool, EncodeError> {
        encode_class_belief(self, out)
    }

    fn decode_words(
        words: &[u32],
        cursor: &mut usize,
        into: &mut Self,
    ) -> Result<bool, DecodeError> {
        decode_class_belief(words, cursor, into)
    }

    fn merge_from(&mut self, src: &Self) {
        ClassBelief::merge_from(self, src)
    }
}

impl BeliefVoxel for UncertainBelief {
    /// Appends one extra word holding the uncertainty, but only for
    /// initialized voxels. The decoder mirrors this conditional exactly.
    fn encode_words(&self, out: &mut Vec<u32>) -> Result<bool, EncodeError> {
        let initialized = encode_class_belief(&self.belief, out)?;
        if initialized {
            out.push(self.uncertainty.to_bits());
        }
        Ok(initialized)
    }

    fn decode_words(
        words: &[u32],
        cursor: &mut usize,
        into: &mut Self,
    ) -> Result<bool, DecodeError> {
        let initialized = decode_class_belief(words, cursor, &mut into.belief)?;
        if initialized {
            let word = words
                .get(*cursor)
                .copied()
                .ok_or(DecodeError::Truncated { cursor: *cursor })?;
            into.uncertainty = f32::from_bits(word);
            *cursor += 1;
        } else {
            into.uncertainty = 0.0;
        }
        Ok(initialized)
    }

    fn merge_from(&mut self, src: &Self) {
        UncertainBelief::merge_from(self, src)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
