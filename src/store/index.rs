use std::io::Write;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::Result;

/// Size of a packed `RecordLoc` in bytes
pub const SIZE_RECORD_LOC: usize = 16;

/// Location of one record pair inside a contiguous byte buffer
///
/// The first-read block occupies `[offset, offset + len_a)` and the
/// second-read block `[offset + len_a, offset + len_a + len_b)`. A spill
/// bucket's index file is the concatenation of these entries in arrival
/// order, serialized to a fixed 16-byte little-endian structure:
/// - Bytes 0-7: `offset` (u64)
/// - Bytes 8-11: `len_a` (u32)
/// - Bytes 12-15: `len_b` (u32)
#[derive(Debug, Clone, Copy)]
pub struct RecordLoc {
    /// Byte offset of the pair within the buffer or data file
    pub offset: u64,

    /// Length of the first-read block in bytes
    pub len_a: u32,

    /// Length of the second-read block in bytes
    pub len_b: u32,
}
impl RecordLoc {
    #[must_use]
    pub fn new(offset: u64, len_a: u32, len_b: u32) -> Self {
        Self {
            offset,
            len_a,
            len_b,
        }
    }

    /// Serializes the location and writes it to the provided writer
    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut buf = [0; SIZE_RECORD_LOC];
        LittleEndian::write_u64(&mut buf[0..8], self.offset);
        LittleEndian::write_u32(&mut buf[8..12], self.len_a);
        LittleEndian::write_u32(&mut buf[12..16], self.len_b);
        writer.write_all(&buf)?;
        Ok(())
    }

    /// Deserializes a location from a fixed-size buffer
    #[must_use]
    pub fn from_exact(buffer: &[u8; SIZE_RECORD_LOC]) -> Self {
        Self {
            offset: LittleEndian::read_u64(&buffer[0..8]),
            len_a: LittleEndian::read_u32(&buffer[8..12]),
            len_b: LittleEndian::read_u32(&buffer[12..16]),
        }
    }

    /// Deserializes a location from the first 16 bytes of a slice
    ///
    /// # Panics
    ///
    /// Panics if the slice is shorter than 16 bytes.
    #[must_use]
    pub fn from_bytes(buffer: &[u8]) -> Self {
        let mut buf = [0; SIZE_RECORD_LOC];
        buf.copy_from_slice(&buffer[..SIZE_RECORD_LOC]);
        Self::from_exact(&buf)
    }

    /// Total bytes covered by the pair
    #[must_use]
    pub fn span(&self) -> usize {
        self.len_a as usize + self.len_b as usize
    }
}
