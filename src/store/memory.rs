use std::io::Write;

use crate::error::Result;
use crate::fastq::PairWriter;
use crate::rng::ShuffleRng;

use super::RecordLoc;

/// The in-memory bucket: a contiguous byte buffer holding `A‖B` blocks in
/// arrival order plus the location of every record pair within it
///
/// Permutation happens on the index alone; the byte buffer is never moved.
#[derive(Debug, Default)]
pub struct MemoryBucket {
    /// Concatenated record bytes
    buf: Vec<u8>,

    /// One location per record pair, in arrival order
    index: Vec<RecordLoc>,
}
impl MemoryBucket {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, a: &[u8], b: &[u8]) {
        let loc = RecordLoc::new(self.buf.len() as u64, a.len() as u32, b.len() as u32);
        self.buf.extend_from_slice(a);
        self.buf.extend_from_slice(b);
        self.index.push(loc);
    }

    /// Replaces the bucket content wholesale, as when loading a spill
    pub(crate) fn replace(&mut self, buf: Vec<u8>, index: Vec<RecordLoc>) {
        debug_assert_eq!(
            buf.len(),
            index.iter().map(RecordLoc::span).sum::<usize>(),
            "buffer length must equal the sum of record spans"
        );
        self.buf = buf;
        self.index = index;
    }

    #[must_use]
    pub fn num_records(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn num_bytes(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Fisher-Yates shuffle of the index, driven entirely by `rng`
    ///
    /// Walks from the top of the index down, swapping position `i` with a
    /// drawn position in `[0, i)`. Zero- and one-record buckets are left
    /// untouched.
    pub fn permute(&mut self, rng: &mut ShuffleRng) {
        for i in (1..self.index.len()).rev() {
            let j = rng.draw_index(i as u64) as usize;
            self.index.swap(i, j);
        }
    }

    /// Writes every record pair to the outputs in current index order
    pub fn write_records<W: Write>(&self, out: &mut PairWriter<W>) -> Result<()> {
        for loc in &self.index {
            let start = loc.offset as usize;
            let mid = start + loc.len_a as usize;
            let end = mid + loc.len_b as usize;
            out.write_pair(&self.buf[start..mid], &self.buf[mid..end])?;
        }
        Ok(())
    }
}
