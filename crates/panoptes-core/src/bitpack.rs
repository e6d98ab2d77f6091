//! Packing of sub-word fields into 32-bit words.
//!
//! Entries narrower than a word are packed with the most-recently-packed entry
//! occupying the least-significant free slot of the current accumulator word.
//! A word is flushed once it is full or the input is exhausted.

/// The number of 32-bit words needed to hold `n` entries of `bits_per_entry` bits each.
///
/// `bits_per_entry` must divide 32 evenly.
pub const fn words_needed(bits_per_entry: u32, n: usize) -> usize {
    let per_word = (32 / bits_per_entry) as usize;
    (n + per_word - 1) / per_word
}

/// Appends `entries` to `out`, packed at `bits_per_entry` bits each.
///
/// Each entry must fit in `bits_per_entry` bits; higher bits are silently lost.
pub fn pack_entries(entries: &[u32], bits_per_entry: u32, out: &mut Vec<u32>) {
    debug_assert_eq!(32 % bits_per_entry, 0);
    let per_word = (32 / bits_per_entry) as usize;
    let mask = entry_mask(bits_per_entry);

    let mut accumulator = 0u32;
    let mut flushed = 0;
    for (i, &entry) in entries.iter().enumerate() {
        let slot = i % per_word;
        accumulator |= (entry & mask) << (slot as u32 * bits_per_entry);
        if slot == per_word - 1 {
            out.push(accumulator);
            accumulator = 0;
            flushed += per_word;
        }
    }
    // A partially filled accumulator still occupies a whole word.
    if flushed < entries.len() {
        out.push(accumulator);
    }
}

/// The exact inverse of [`pack_entries`] for the first `n` entries of `words`.
///
/// `words` must hold at least [`words_needed`]`(bits_per_entry, n)` words.
pub fn unpack_entries(words: &[u32], bits_per_entry: u32, n: usize) -> Vec<u32> {
    debug_assert_eq!(32 % bits_per_entry, 0);
    debug_assert!(words.len() >= words_needed(bits_per_entry, n));
    let per_word = (32 / bits_per_entry) as usize;
    let mask = entry_mask(bits_per_entry);

    (0..n)
        .map(|i| {
            let slot = (i % per_word) as u32;
            (words[i / per_word] >> (slot * bits_per_entry)) & mask
        })
        .collect()
}

const fn entry_mask(bits_per_entry: u32) -> u32 {
    if bits_per_entry == 32 {
        u32::MAX
    } else {
        (1 << bits_per_entry) - 1
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
    fn words_needed_rounds_up() {
        assert_eq!(words_needed(8, 0), 0);
        assert_eq!(words_needed(8, 3), 1);
        assert_eq!(words_needed(8, 4), 1);
        assert_eq!(words_needed(8, 5), 2);
        assert_eq!(words_needed(16, 3), 2);
        assert_eq!(words_needed(32, 3), 3);
    }

    #[test]
    fn pack_full_word_of_bytes() {
        let mut out = Vec::new();
        pack_entries(&[0x11, 0x22, 0x33, 0x44], 8, &mut out);
        assert_eq!(out, vec![0x44332211]);
    }

    #[test]
    fn pack_flushes_partial_accumulator() {
        let mut out = Vec::new();
        pack_entries(&[0x11, 0x22, 0x33], 8, &mut out);
        assert_eq!(out, vec![0x00332211]);

        let mut out = Vec::new();
        pack_entries(&[0xAAAA, 0xBBBB, 0xCCCC], 16, &mut out);
        assert_eq!(out, vec![0xBBBBAAAA, 0x0000CCCC]);
    }

    #[test]
    fn unpack_inverts_pack() {
        let entries: Vec<u32> = (0..11).map(|i| i * 17 % 256).collect();
        for bits in [8, 16, 32] {
            let mut packed = Vec::new();
            pack_entries(&entries, bits, &mut packed);
            assert_eq!(packed.len(), words_needed(bits, entries.len()));
            assert_eq!(unpack_entries(&packed, bits, entries.len()), entries);
        }
    }

    #[test]
    fn pack_masks_oversized_entries() {
        let mut out = Vec::new();
        pack_entries(&[0x1FF], 8, &mut out);
        assert_eq!(out, vec![0xFF]);
    }
}
