use std::ops::Range;

/// Decodes one row of the run-length compressed visibility lump.
///
/// Leaf ids start at 1, leaf 0 never appears in a row. A non-zero byte is a mask of the next
/// 8 leaves, a zero byte is followed by a count of 8-leaf groups to skip. Decoding stops once
/// the cursor reaches `leaf_count` or the data runs out, so truncated rows end early instead of
/// reading out of bounds.
///
/// The iterator is lazy and cloning it restarts from the clone point.
#[derive(Clone, Debug)]
pub struct VisibleLeaves<'a> {
    data: &'a [u8],
    offset: usize,
    cursor: usize,
    leaf_count: usize,
    mask: u8,
    mask_base: usize,
}

impl<'a> VisibleLeaves<'a> {
    /// `data` starts at the leaf's row, usually running to the end of the lump.
    pub fn new(data: &'a [u8], leaf_count: usize) -> Self {
        Self {
            data,
            offset: 0,
            cursor: 1,
            leaf_count,
            mask: 0,
            mask_base: 0,
        }
    }

    /// Leaf id the next undecoded byte describes.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Iterator for VisibleLeaves<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.mask != 0 {
                let bit = self.mask.trailing_zeros() as usize;
                self.mask &= self.mask - 1;
                let leaf = self.mask_base + bit;
                if leaf <= self.leaf_count {
                    return Some(leaf);
                }
                // bits are visited low to high, the rest are past the end too
                self.mask = 0;
                continue;
            }

            if self.cursor >= self.leaf_count {
                return None;
            }

            let byte = *self.data.get(self.offset)?;
            if byte == 0 {
                let skip = *self.data.get(self.offset + 1)?;
                self.cursor += skip as usize * 8;
                self.offset += 2;
            } else {
                self.mask = byte;
                self.mask_base = self.cursor;
                self.cursor += 8;
                self.offset += 1;
            }
        }
    }
}

/// Leaves to draw from a given leaf.
#[derive(Clone, Debug)]
pub enum PotentiallyVisible<'a> {
    /// The leaf has no visibility row, everything in the hull may be seen.
    All(Range<usize>),
    Pvs(VisibleLeaves<'a>),
}

impl Iterator for PotentiallyVisible<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            PotentiallyVisible::All(range) => range.next(),
            PotentiallyVisible::Pvs(leaves) => leaves.next(),
        }
    }
}
