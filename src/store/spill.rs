use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::{MemoryBucket, RecordLoc, SIZE_RECORD_LOC};

/// One spill bucket: a data file holding raw `A‖B` blocks and an index file
/// holding their packed locations, both appended in arrival order
///
/// Neither file carries a header or framing; the data file length always
/// equals the sum of record spans and the index file length the entry count
/// times the packed entry size.
pub struct SpillBucket {
    /// Buffered writer over the data file
    data: BufWriter<File>,

    /// Buffered writer over the index file
    index: BufWriter<File>,

    /// Path of the data file
    data_path: PathBuf,

    /// Path of the index file
    index_path: PathBuf,

    /// Current data-file offset
    offset: u64,

    /// Number of record pairs appended
    records: usize,
}
impl SpillBucket {
    /// Opens a fresh spill bucket in `dir`.
    ///
    /// File names carry both the input-pair index and the bucket id, so a
    /// multi-pair run never reuses a spill file across pairs.
    pub fn create(dir: &Path, pair_idx: usize, bucket_id: usize) -> Result<Self> {
        let stem = format!("pair{pair_idx:03}-bucket{bucket_id:04}");
        let data_path = dir.join(format!("{stem}.dat"));
        let index_path = dir.join(format!("{stem}.idx"));
        let data = File::create(&data_path).map(BufWriter::new)?;
        let index = File::create(&index_path).map(BufWriter::new)?;
        Ok(Self {
            data,
            index,
            data_path,
            index_path,
            offset: 0,
            records: 0,
        })
    }

    /// Appends one record pair to the data file and its location to the
    /// index file.
    pub fn append(&mut self, a: &[u8], b: &[u8]) -> Result<()> {
        let loc = RecordLoc::new(self.offset, a.len() as u32, b.len() as u32);
        self.data.write_all(a)?;
        self.data.write_all(b)?;
        loc.write_bytes(&mut self.index)?;
        self.offset += loc.span() as u64;
        self.records += 1;
        Ok(())
    }

    #[must_use]
    pub fn num_records(&self) -> usize {
        self.records
    }

    /// Loads the whole bucket into `target`, replacing its content, then
    /// removes the spill files.
    pub fn into_memory(self, target: &mut MemoryBucket) -> Result<()> {
        let Self {
            mut data,
            mut index,
            data_path,
            index_path,
            offset,
            records,
        } = self;
        data.flush()?;
        index.flush()?;
        drop(data);
        drop(index);

        let mut buf = Vec::with_capacity(offset as usize);
        File::open(&data_path)
            .map(BufReader::new)?
            .read_to_end(&mut buf)?;

        let mut raw = Vec::with_capacity(records * SIZE_RECORD_LOC);
        File::open(&index_path)
            .map(BufReader::new)?
            .read_to_end(&mut raw)?;
        let mut locs = Vec::with_capacity(records);
        for entry in raw.chunks_exact(SIZE_RECORD_LOC) {
            locs.push(RecordLoc::from_bytes(entry));
        }
        target.replace(buf, locs);

        fs::remove_file(&data_path)?;
        fs::remove_file(&index_path)?;
        Ok(())
    }
}
