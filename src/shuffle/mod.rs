mod config;
mod driver;

pub use config::{ShuffleConfig, TempFileCount};
pub use driver::Shuffler;
