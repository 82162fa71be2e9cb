//! Two-pass external-memory shuffle driver
//!
//! Pass one distributes every incoming record pair uniformly across the
//! in-memory bucket and the spill buckets. Pass two permutes each bucket
//! independently with a bucket-specific reseed and appends it to the
//! outputs. The concatenation of per-bucket permutations in fixed bucket
//! order is itself a uniform permutation of the input.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::fastq::{PairReader, PairWriter};
use crate::rng::{resolve_seed, ShuffleRng};
use crate::store::{MemoryBucket, SpillBucket};

use super::config::{ShuffleConfig, TempFileCount};

/// Suffix appended to each input file name to form its output name
const OUTPUT_SUFFIX: &str = ".shuffled";

pub struct Shuffler {
    /// Run configuration as handed over by the caller
    config: ShuffleConfig,

    /// Seed actually in use (wall clock when none was given)
    seed: String,
}
impl Shuffler {
    #[must_use]
    pub fn new(config: ShuffleConfig) -> Self {
        let seed = resolve_seed(&config.seed);
        Self { config, seed }
    }

    /// Seed actually driving the run
    #[must_use]
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Shuffles every input pair in order.
    pub fn run(&self) -> Result<()> {
        if self.config.reads.len() != self.config.mates.len() {
            return Err(ConfigError::UnequalFileCounts {
                reads: self.config.reads.len(),
                mates: self.config.mates.len(),
            }
            .into());
        }
        for path in self.config.reads.iter().chain(&self.config.mates) {
            if !path.exists() {
                return Err(ConfigError::MissingInput(path.clone()).into());
            }
        }

        let max_pair_bytes = self.max_pair_bytes()?;
        let block_size = self.resolve_block_size(max_pair_bytes);
        let spill_count = bucket_count(max_pair_bytes, block_size);
        info!("using random seed {}", self.seed);
        debug!(
            "largest input pair is {max_pair_bytes} bytes; \
             block size {block_size}, {spill_count} spill buckets"
        );

        let temp_root = self.create_temp_dir()?;
        for (pair_idx, (reads, mates)) in self
            .config
            .reads
            .iter()
            .zip(&self.config.mates)
            .enumerate()
        {
            self.shuffle_pair(pair_idx, reads, mates, spill_count, temp_root.path())?;
        }
        Ok(())
    }

    /// Largest combined byte size over all input pairs, from file metadata
    fn max_pair_bytes(&self) -> Result<u64> {
        let mut max = 0;
        for (reads, mates) in self.config.reads.iter().zip(&self.config.mates) {
            let total = fs::metadata(reads)?.len() + fs::metadata(mates)?.len();
            max = max.max(total);
        }
        Ok(max)
    }

    /// A fixed temp-file count overrides the configured block size.
    fn resolve_block_size(&self, max_pair_bytes: u64) -> u64 {
        let block_size = match self.config.temp_files {
            TempFileCount::Auto => self.config.block_size,
            TempFileCount::Fixed(n) => max_pair_bytes.div_ceil(n),
        };
        block_size.max(1)
    }

    fn create_temp_dir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("fqshuffle-");
        let dir = match &self.config.temp_dir {
            Some(parent) => {
                if !parent.is_dir() {
                    return Err(ConfigError::MissingTempDir(parent.clone()).into());
                }
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    /// Shuffles one input pair: distribution pass, then per-bucket
    /// reseed + permute + append.
    fn shuffle_pair(
        &self,
        pair_idx: usize,
        reads: &Path,
        mates: &Path,
        spill_count: u64,
        temp_dir: &Path,
    ) -> Result<()> {
        let mut reader = PairReader::open(reads, mates)?;
        let out_reads = output_path(reads, self.config.outdir.as_deref());
        let out_mates = output_path(mates, self.config.outdir.as_deref());
        let mut writer = PairWriter::create(&out_reads, &out_mates)?;
        info!(
            "shuffling {} and {}",
            reads.display(),
            mates.display()
        );

        let mut memory = MemoryBucket::new();
        let mut spills = Vec::with_capacity(spill_count as usize);
        for bucket_id in 1..=spill_count {
            spills.push(SpillBucket::create(temp_dir, pair_idx, bucket_id as usize)?);
        }

        // Distribution pass: each pair lands in any of the spill_count + 1
        // buckets with equal probability.
        let mut rng = ShuffleRng::from_seed(self.seed.as_bytes());
        let mut a = Vec::new();
        let mut b = Vec::new();
        while reader.next_pair(&mut a, &mut b)? {
            let target = rng.draw_index(spill_count + 1);
            if target == 0 {
                memory.append(&a, &b);
            } else {
                spills[target as usize - 1].append(&a, &b)?;
            }
        }
        info!(
            "distributed {} record pairs across {} buckets",
            reader.n_processed(),
            spill_count + 1
        );

        // Permute phase, in-memory bucket first. Every bucket gets its own
        // reseed from (seed, salt) so its permutation is independent of the
        // draw count consumed by distribution.
        let mut salt: i64 = -1;
        debug!(
            "permuting in-memory bucket ({} records, {} bytes)",
            memory.num_records(),
            memory.num_bytes()
        );
        memory.permute(&mut self.bucket_rng(salt));
        memory.write_records(&mut writer)?;

        for spill in spills {
            salt += 1;
            debug!(
                "loading spill bucket {salt} ({} records)",
                spill.num_records()
            );
            spill.into_memory(&mut memory)?;
            memory.permute(&mut self.bucket_rng(salt));
            memory.write_records(&mut writer)?;
        }
        writer.flush()?;
        info!("wrote {} and {}", out_reads.display(), out_mates.display());
        Ok(())
    }

    /// Per-bucket reseed: the salt is concatenated to the seed as a decimal
    /// string, `-1` for the in-memory bucket and `0, 1, ...` for the spills.
    fn bucket_rng(&self, salt: i64) -> ShuffleRng {
        ShuffleRng::from_seed(format!("{}{}", self.seed, salt).as_bytes())
    }
}

/// Number of spill buckets needed so the expected bucket load stays within
/// the block size; zero means a pure in-memory shuffle
fn bucket_count(max_pair_bytes: u64, block_size: u64) -> u64 {
    if block_size >= max_pair_bytes {
        0
    } else {
        max_pair_bytes.div_ceil(block_size) - 1
    }
}

/// Output path for an input: `<basename>.shuffled` in `outdir` or the
/// input's own directory
fn output_path(input: &Path, outdir: Option<&Path>) -> PathBuf {
    let mut name = input
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(OUTPUT_SUFFIX);
    match outdir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}
