use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::Level;

/// Command-line surface of the shuffler
///
/// Reads and mates accept comma-separated lists and may repeat; the
/// accumulated lists must have equal length.
#[derive(Parser, Debug)]
#[command(
    name = "fqshuffle",
    version = concat!("v", env!("CARGO_PKG_VERSION")),
    about = "External-memory shuffling of paired-end FASTQ files"
)]
pub struct Cli {
    /// First read input file(s); comma separated, may repeat
    #[arg(short = '1', long = "reads", value_delimiter = ',')]
    pub reads: Vec<PathBuf>,

    /// Second read input file(s); comma separated, must match --reads
    #[arg(short = '2', long = "mates", value_delimiter = ',')]
    pub mates: Vec<PathBuf>,

    /// Number of temporary files per input pair, or "auto"
    #[arg(short = 't', long = "num-temp-files", default_value = "auto")]
    pub num_temp_files: String,

    /// Target size of a shuffle block, e.g. "50M" or "1G"
    #[arg(short = 's', long = "shuffle-block-size", default_value = "1G")]
    pub shuffle_block_size: String,

    /// Directory for temporary spill files
    #[arg(short = 'd', long = "temp-directory")]
    pub temp_directory: Option<PathBuf>,

    /// Seed for the random stream; current time when omitted
    #[arg(short = 'r', long = "seed", visible_alias = "randomseed")]
    pub seed: Option<String>,

    /// Directory for output files; defaults to each input's directory
    #[arg(short = 'o', long = "outdir")]
    pub outdir: Option<PathBuf>,

    /// Raise verbosity; may repeat
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug logging
    #[arg(short = 'D', long = "debug")]
    pub debug: bool,
}
impl Cli {
    /// Logging threshold from `-v` count and `-D`
    pub fn log_level(&self) -> Level {
        if self.debug {
            return Level::DEBUG;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
