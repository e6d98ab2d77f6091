use crate::belief::Count;

use smallvec::SmallVec;
use std::collections::BinaryHeap;

/// The selected `(class index, count)` pairs, descending by count.
pub type TopKEntries = SmallVec<[(u8, Count); 4]>;

/// Returns the `min(k, counts.len())` highest-count class indices and their
/// counts, in descending count order.
///
/// Ties among equal counts resolve by heap order, which here means the higher
/// class index wins; callers must not rely on any particular choice among
/// equal counts. Class indices are bounded to one byte by the codec's
/// [`MAX_CLASSES_PER_VOXEL`](crate::codec::MAX_CLASSES_PER_VOXEL) limit.
pub fn select_top_k(counts: &[Count], k: usize) -> TopKEntries {
    let mut heap: BinaryHeap<(Count, u8)> = counts
        .iter()
        .enumerate()
        .map(|(index, &count)| (count, index as u8))
        .collect();

    let mut selected = TopKEntries::new();
    while selected.len() < k {
        match heap.pop() {
            Some((count, index)) => selected.push((index, count)),
            None => break,
        }
    }
    selected
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
    fn selects_highest_counts_in_order() {
        let counts = [3, 7, 0, 0, 0, 10, 0, 0, 0, 3];
        let selected = select_top_k(&counts, 3);
        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0], (5, 10));
        assert_eq!(selected[1], (1, 7));
        // Counts 3 at classes 0 and 9 tie; either choice is valid.
        assert_eq!(selected[2].1, 3);
        assert!(selected[2].0 == 0 || selected[2].0 == 9);
    }

    #[test]
    fn short_histogram_yields_fewer_entries() {
        let selected = select_top_k(&[4, 2], 3);
        assert_eq!(selected.as_slice(), &[(0, 4), (1, 2)]);
    }

    #[test]
    fn empty_histogram_yields_nothing() {
        assert!(select_top_k(&[], 3).is_empty());
    }

    #[test]
    fn zero_counts_are_still_selectable() {
        let selected = select_top_k(&[0, 0, 0, 0], 3);
        assert_eq!(selected.len(), 3);
        assert!(selected.iter().all(|&(_, count)| count == 0));
    }
}
