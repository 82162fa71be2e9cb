mod index;
mod memory;
mod spill;

pub use index::{RecordLoc, SIZE_RECORD_LOC};
pub use memory::MemoryBucket;
pub use spill::SpillBucket;
