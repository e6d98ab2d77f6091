use crate::codec::{DecodeError, EncodeError};

/// One per-class observation count. Saturates instead of wrapping.
pub type Count = u16;

/// Sentinel for a voxel that has no class assigned yet.
pub const UNASSIGNED_CLASS: i16 = -1;

/// Per-voxel class-belief state: a histogram of per-class observation counts
/// plus aggregate counters tracking how often the voxel was judged as
/// belonging to vs. foreign to its currently assigned class.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassBelief {
    /// Observation count per class, indexed by class.
    pub counts: Vec<Count>,
    /// How often this voxel was judged to belong to its current class.
    pub belongs_count: Count,
    /// How often this voxel was judged foreign to its current class.
    pub foreign_count: Count,
    /// The class currently assigned to the voxel, or [`UNASSIGNED_CLASS`].
    pub current_index: i16,
    /// True if the assignment came from ground truth. Sticky across merges.
    pub is_gt: bool,
}

impl Default for ClassBelief {
    fn default() -> Self {
        Self {
            counts: Vec::new(),
            belongs_count: 0,
            foreign_count: 0,
            current_index: UNASSIGNED_CLASS,
            is_gt: false,
        }
    }
}

impl ClassBelief {
    /// An empty histogram alone does not mean uninitialized: legacy voxels may
    /// carry aggregate counters without one.
    pub fn is_initialized(&self) -> bool {
        !self.counts.is_empty() || self.belongs_count != 0 || self.foreign_count != 0
    }

    /// Probability that this voxel truly belongs to its current class.
    /// Zero by convention when no judgements have been recorded.
    pub fn belonging_probability(&self) -> f32 {
        let total = u32::from(self.belongs_count) + u32::from(self.foreign_count);
        if total == 0 {
            0.0
        } else {
            f32::from(self.belongs_count) / total as f32
        }
    }

    /// Records one observation of `class_index`, growing the histogram as
    /// needed. The current assignment switches when another class overtakes
    /// its count.
    pub fn observe(&mut self, class_index: usize) {
        if self.counts.len() <= class_index {
            self.counts.resize(class_index + 1, 0);
        }
        self.counts[class_index] = self.counts[class_index].saturating_add(1);

        if self.current_index == UNASSIGNED_CLASS {
            self.current_index = class_index as i16;
        }
        if self.current_index == class_index as i16 {
            self.belongs_count = self.belongs_count.saturating_add(1);
        } else {
            self.foreign_count = self.foreign_count.saturating_add(1);
            let current_count = self
                .counts
                .get(self.current_index as usize)
                .copied()
                .unwrap_or(0);
            if self.counts[class_index] > current_count {
                self.current_index = class_index as i16;
            }
        }
    }

    /// Assigns `class_index` from an oracle. Ground truth is never cleared.
    pub fn assign_ground_truth(&mut self, class_index: usize) {
        self.current_index = class_index as i16;
        self.is_gt = true;
    }

    /// Fuses `src` into `self`, keeping the most probable assignment.
    ///
    /// `src`'s identity fields (assignment, counters, histogram) replace
    /// `self`'s iff `src` is ground truth, or `src` scores strictly higher and
    /// `self` is not ground truth. Ground truth propagates and is sticky.
    pub fn merge_from(&mut self, src: &ClassBelief) {
        if src.is_gt
            || (src.belonging_probability() > self.belonging_probability() && !self.is_gt)
        {
            self.current_index = src.current_index;
            self.foreign_count = src.foreign_count;
            self.belongs_count = src.belongs_count;
            self.counts = src.counts.clone();
        }
        if src.is_gt {
            self.is_gt = true;
        }
    }
}

/// A [`ClassBelief`] carrying an explicit uncertainty estimate for downstream
/// consumers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UncertainBelief {
    pub belief: ClassBelief,
    pub uncertainty: f32,
}

impl UncertainBelief {
    /// Applies the belief merge rule, then averages uncertainties. Ground-truth
    /// voxels keep their own uncertainty unchanged.
    pub fn merge_from(&mut self, src: &UncertainBelief) {
        self.belief.merge_from(&src.belief);
        if !self.belief.is_gt {
            self.uncertainty = (self.uncertainty + src.uncertainty) / 2.0;
        }
    }
}

/// The capability interface shared by every belief voxel kind.
///
/// Block serialization and submap fusion dispatch through this trait, so each
/// voxel kind defines its word layout and merge rule exactly once.
pub trait BeliefVoxel: Clone + Default {
    /// Appends this voxel's encoding to `out`.
    ///
    /// Returns whether the voxel was initialized.
    fn encode_words(&self, out: &mut Vec<u32>) -> Result<bool, EncodeError>;

    /// Decodes one voxel starting at `words[*cursor]`, advancing the cursor by
    /// exactly the number of words consumed.
    ///
    /// Returns whether the decoded voxel was initialized.
    fn decode_words(
        words: &[u32],
        cursor: &mut usize,
        into: &mut Self,
    ) -> Result<bool, DecodeError>;

    /// Fuses `src` into `self` under the dominance rule.
    fn merge_from(&mut self, src: &Self);
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
    use approx::assert_relative_eq;

    fn belief(belongs: Count, foreign: Count, class: i16) -> ClassBelief {
        ClassBelief {
            counts: vec![1],
            belongs_count: belongs,
            foreign_count: foreign,
            current_index: class,
            ..Default::default()
        }
    }

    #[test]
    fn fresh_voxel_is_uninitialized() {
        let voxel = ClassBelief::default();
        assert!(!voxel.is_initialized());
        assert_eq!(voxel.current_index, UNASSIGNED_CLASS);
        assert_eq!(voxel.belonging_probability(), 0.0);
    }

    #[test]
    fn legacy_voxel_with_counters_only_is_initialized() {
        let voxel = ClassBelief {
            belongs_count: 2,
            ..Default::default()
        };
        assert!(voxel.is_initialized());
    }

    #[test]
    fn observing_assigns_and_switches_on_overtake() {
        let mut voxel = ClassBelief::default();
        voxel.observe(4);
        assert_eq!(voxel.current_index, 4);
        assert_eq!(voxel.belongs_count, 1);

        // A single conflicting observation ties but does not overtake.
        voxel.observe(1);
        assert_eq!(voxel.current_index, 4);
        assert_eq!(voxel.foreign_count, 1);

        voxel.observe(1);
        assert_eq!(voxel.current_index, 1);
        assert_eq!(voxel.counts, vec![0, 2, 0, 0, 1]);
    }

    #[test]
    fn higher_score_wins_merge() {
        let winner = belief(3, 1, 7);
        let mut loser = belief(1, 3, 2);
        loser.merge_from(&winner);
        assert_eq!(loser.current_index, 7);
        assert_eq!(loser.belongs_count, 3);
        assert_eq!(loser.foreign_count, 1);
        assert!(!loser.is_gt);
    }

    #[test]
    fn lower_score_does_not_win_merge() {
        let loser = belief(1, 3, 7);
        let mut winner = belief(3, 1, 2);
        winner.merge_from(&loser);
        assert_eq!(winner.current_index, 2);
    }

    #[test]
    fn ground_truth_absorbs_and_sticks() {
        let mut gt = belief(0, 0, 9);
        gt.is_gt = true;

        // Ground truth wins even with a zero score.
        let mut dst = belief(100, 1, 3);
        dst.merge_from(&gt);
        assert_eq!(dst.current_index, 9);
        assert!(dst.is_gt);

        // And is never overwritten afterwards.
        let challenger = belief(100, 0, 5);
        dst.merge_from(&challenger);
        assert_eq!(dst.current_index, 9);
        assert!(dst.is_gt);
    }

    #[test]
    fn uncertain_merge_averages_unless_ground_truth() {
        let mut dst = UncertainBelief {
            belief: belief(1, 3, 2),
            uncertainty: 0.4,
        };
        let src = UncertainBelief {
            belief: belief(3, 1, 7),
            uncertainty: 0.8,
        };
        dst.merge_from(&src);
        assert_relative_eq!(dst.uncertainty, 0.6);

        let mut gt_dst = UncertainBelief {
            belief: belief(1, 1, 2),
            uncertainty: 0.0,
        };
        gt_dst.belief.is_gt = true;
        gt_dst.merge_from(&src);
        assert_eq!(gt_dst.uncertainty, 0.0);
    }
}
