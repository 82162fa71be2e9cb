//! Lockstep record I/O over paired FASTQ files
//!
//! Records are treated as opaque four-line byte blocks; nothing inside a
//! line is parsed or validated. Readers and writers operate on both files
//! of a pair together so that pairing survives every operation.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Error, RecordError, Result};

/// Lines per FASTQ record
const LINES_PER_RECORD: usize = 4;

/// Outcome of pulling one four-line block from a single file
enum Quartet {
    /// All four lines were read
    Full,
    /// The file was exhausted before the first line
    Empty,
    /// The file ended in the middle of the block
    Truncated,
}

/// Reads four lines (newlines included) into `buf`, appending to its
/// current content.
fn read_quartet<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Quartet> {
    for line in 0..LINES_PER_RECORD {
        let n = reader.read_until(b'\n', buf)?;
        if n == 0 {
            return Ok(if line == 0 {
                Quartet::Empty
            } else {
                Quartet::Truncated
            });
        }
    }
    Ok(Quartet::Full)
}

/// Reader over a pair of FASTQ streams, yielding one record pair at a time
pub struct PairReader<R> {
    /// First-read stream
    reads: R,

    /// Second-read stream
    mates: R,

    /// Path of the first-read file, kept for diagnostics
    reads_path: PathBuf,

    /// Path of the second-read file, kept for diagnostics
    mates_path: PathBuf,

    /// Number of record pairs produced so far
    n_processed: usize,
}
impl PairReader<BufReader<File>> {
    pub fn open(reads: &Path, mates: &Path) -> Result<Self> {
        let r1 = File::open(reads).map(BufReader::new)?;
        let r2 = File::open(mates).map(BufReader::new)?;
        Ok(Self::new(r1, r2, reads, mates))
    }
}
impl<R: BufRead> PairReader<R> {
    pub fn new(reads: R, mates: R, reads_path: &Path, mates_path: &Path) -> Self {
        Self {
            reads,
            mates,
            reads_path: reads_path.to_path_buf(),
            mates_path: mates_path.to_path_buf(),
            n_processed: 0,
        }
    }

    /// Reads the next record pair into `a` and `b`, replacing their content.
    ///
    /// Returns `Ok(false)` once both inputs are cleanly exhausted. A file
    /// ending mid-record, or one file ending while the other still has
    /// records, is an error.
    pub fn next_pair(&mut self, a: &mut Vec<u8>, b: &mut Vec<u8>) -> Result<bool> {
        a.clear();
        b.clear();
        let first = read_quartet(&mut self.reads, a)?;
        let second = read_quartet(&mut self.mates, b)?;
        match (first, second) {
            (Quartet::Full, Quartet::Full) => {
                self.n_processed += 1;
                Ok(true)
            }
            (Quartet::Empty, Quartet::Empty) => Ok(false),
            (Quartet::Truncated, _) => Err(RecordError::TruncatedRecord(
                self.reads_path.clone(),
                self.n_processed,
            )
            .into()),
            (_, Quartet::Truncated) => Err(RecordError::TruncatedRecord(
                self.mates_path.clone(),
                self.n_processed,
            )
            .into()),
            (Quartet::Empty, Quartet::Full) => Err(RecordError::UnequalRecordCounts(
                self.reads_path.clone(),
                self.n_processed,
            )
            .into()),
            (Quartet::Full, Quartet::Empty) => Err(RecordError::UnequalRecordCounts(
                self.mates_path.clone(),
                self.n_processed,
            )
            .into()),
        }
    }

    pub fn n_processed(&self) -> usize {
        self.n_processed
    }
}

/// Writer appending record pairs to the two output streams
pub struct PairWriter<W: Write> {
    /// First-read output
    reads: W,

    /// Second-read output
    mates: W,
}
impl PairWriter<BufWriter<File>> {
    /// Creates both output files, refusing to overwrite either one.
    pub fn create(reads: &Path, mates: &Path) -> Result<Self> {
        for path in [reads, mates] {
            if path.exists() {
                return Err(ConfigError::OutputExists(path.to_path_buf()).into());
            }
        }
        let w1 = open_new(reads)?;
        let w2 = open_new(mates)?;
        Ok(Self::new(w1, w2))
    }
}
impl<W: Write> PairWriter<W> {
    pub fn new(reads: W, mates: W) -> Self {
        Self { reads, mates }
    }

    /// Appends `a` to the first-read output and `b` to the second-read
    /// output, with no separator beyond the newlines already in the bytes.
    pub fn write_pair(&mut self, a: &[u8], b: &[u8]) -> Result<()> {
        self.reads.write_all(a)?;
        self.mates.write_all(b)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.reads.flush()?;
        self.mates.flush()?;
        Ok(())
    }
}

fn open_new(path: &Path) -> Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                Error::from(ConfigError::OutputExists(path.to_path_buf()))
            } else {
                Error::from(e)
            }
        })?;
    Ok(BufWriter::new(file))
}
