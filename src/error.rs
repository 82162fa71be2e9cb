use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("Unexpected end of file inside record {1} of {0}")]
    TruncatedRecord(PathBuf, usize),

    #[error("Input file {0} ended after {1} records while its mate has more")]
    UnequalRecordCounts(PathBuf, usize),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Input file does not exist: {0}")]
    MissingInput(PathBuf),

    #[error("Temporary directory does not exist: {0}")]
    MissingTempDir(PathBuf),

    #[error("Output file already exists: {0}")]
    OutputExists(PathBuf),

    #[error("Cannot parse size expression: {0:?}")]
    InvalidSize(String),

    #[error("Number of first and second read files are different ({reads} vs {mates})")]
    UnequalFileCounts { reads: usize, mates: usize },
}
