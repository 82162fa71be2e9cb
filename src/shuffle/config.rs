use std::path::PathBuf;

use tracing::warn;

/// How many spill files the caller wants per input pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TempFileCount {
    /// Derive the count from the shuffle block size
    #[default]
    Auto,

    /// Fixed count; overrides the block size
    Fixed(u64),
}
impl TempFileCount {
    /// Lenient parse: positive integers become fixed counts, anything else
    /// falls back to auto with a warning.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("auto") {
            return Self::Auto;
        }
        match raw.trim().parse::<i64>() {
            Ok(n) if n > 0 => Self::Fixed(n as u64),
            _ => {
                warn!("invalid --num-temp-files value {raw:?}, falling back to auto");
                Self::Auto
            }
        }
    }
}

/// Everything the shuffle driver needs for one run
#[derive(Debug, Clone)]
pub struct ShuffleConfig {
    /// First-read input files
    pub reads: Vec<PathBuf>,

    /// Second-read input files, parallel to `reads`
    pub mates: Vec<PathBuf>,

    /// Target upper bound on the per-bucket byte footprint
    pub block_size: u64,

    /// Spill file count override
    pub temp_files: TempFileCount,

    /// Directory for spill files (system temp when absent)
    pub temp_dir: Option<PathBuf>,

    /// Directory for output files (alongside each input when absent)
    pub outdir: Option<PathBuf>,

    /// Seed for the random stream; wall-clock seconds when empty
    pub seed: String,
}
