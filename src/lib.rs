//! External-memory shuffling of paired-end FASTQ files
//!
//! Produces a uniformly random permutation of paired four-line records via
//! the two-pass algorithm of Sanders (1998): records are first distributed
//! uniformly across buckets small enough to fit in memory, then each bucket
//! is loaded, permuted in place and appended to the outputs. Pairing is
//! preserved throughout, and a fixed seed makes the output bit-identical
//! across runs.

mod error;
mod fastq;
mod rng;
mod shuffle;
mod size;
mod store;

pub use error::{ConfigError, Error, RecordError, Result};
pub use fastq::{PairReader, PairWriter};
pub use rng::{resolve_seed, ShuffleRng};
pub use shuffle::{ShuffleConfig, Shuffler, TempFileCount};
pub use size::parse_size;
pub use store::{MemoryBucket, RecordLoc, SpillBucket, SIZE_RECORD_LOC};

#[cfg(test)]
mod testing {

    use super::*;
    use anyhow::Result;
    use std::io::Cursor;
    use std::path::Path;

    fn record(id: usize, seq: &str) -> Vec<u8> {
        format!("@r{id}\n{seq}\n+\n{}\n", "I".repeat(seq.len())).into_bytes()
    }

    #[test]
    fn test_rng_is_deterministic() {
        let mut first = ShuffleRng::from_seed(b"1234567890");
        let mut second = ShuffleRng::from_seed(b"1234567890");
        for _ in 0..1000 {
            assert_eq!(first.draw_f64(), second.draw_f64());
        }
    }

    #[test]
    fn test_rng_draws_stay_in_unit_interval() {
        let mut rng = ShuffleRng::from_seed(b"range");
        for _ in 0..1000 {
            let x = rng.draw_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_rng_seeds_diverge() {
        let mut first = ShuffleRng::from_seed(b"seed-a");
        let mut second = ShuffleRng::from_seed(b"seed-b");
        let diverged = (0..100).any(|_| first.draw_f64() != second.draw_f64());
        assert!(diverged);
    }

    #[test]
    fn test_rng_index_bounds() {
        let mut rng = ShuffleRng::from_seed(b"bounds");
        for n in 1..64 {
            for _ in 0..100 {
                assert!(rng.draw_index(n) < n);
            }
        }
    }

    #[test]
    fn test_resolve_seed_passthrough() {
        assert_eq!(resolve_seed("1234567890"), "1234567890");
        // an empty seed becomes the wall clock in decimal seconds
        let fallback = resolve_seed("");
        assert!(!fallback.is_empty());
        assert!(fallback.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_parse_size() -> Result<()> {
        assert_eq!(parse_size("512")?, 512);
        assert_eq!(parse_size("1K")?, 1024);
        assert_eq!(parse_size("50M")?, 50 * 1024 * 1024);
        assert_eq!(parse_size("1G")?, 1024 * 1024 * 1024);
        assert_eq!(parse_size("1.5k")?, 1536);
        assert_eq!(parse_size(" 2 GiB ")?, 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("100kb")?, 100 * 1024);
        Ok(())
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        for expr in ["", "G", "1X", "1.2.3", "1KK", "12 34", "1Gx"] {
            assert!(parse_size(expr).is_err(), "accepted {expr:?}");
        }
    }

    #[test]
    fn test_record_loc_roundtrip() -> Result<()> {
        let loc = RecordLoc::new(4096, 120, 240);
        let mut buf = Vec::new();
        loc.write_bytes(&mut buf)?;
        assert_eq!(buf.len(), SIZE_RECORD_LOC);

        let readout = RecordLoc::from_bytes(&buf);
        assert_eq!(readout.offset, 4096);
        assert_eq!(readout.len_a, 120);
        assert_eq!(readout.len_b, 240);
        assert_eq!(readout.span(), 360);
        Ok(())
    }

    #[test]
    fn test_memory_bucket_permutes_whole_multiset() -> Result<()> {
        let mut bucket = MemoryBucket::new();
        for i in 0..50 {
            bucket.append(&record(i, "ACGT"), &record(i, "TGCA"));
        }
        bucket.permute(&mut ShuffleRng::from_seed(b"permute-1"));

        let mut out = Vec::new();
        bucket.write_records(&mut PairWriter::new(&mut out, &mut Vec::new()))?;

        // every line still present exactly once
        let input: Vec<u8> = (0..50).flat_map(|i| record(i, "ACGT")).collect();
        assert_eq!(out.len(), input.len());
        let mut expected: Vec<&[u8]> = input.split(|&b| b == b'\n').collect();
        let mut written: Vec<&[u8]> = out.split(|&b| b == b'\n').collect();
        expected.sort();
        written.sort();
        assert_eq!(expected, written);
        Ok(())
    }

    #[test]
    fn test_memory_bucket_permutation_is_seed_stable() -> Result<()> {
        let mut outputs = Vec::new();
        for _ in 0..2 {
            let mut bucket = MemoryBucket::new();
            for i in 0..100 {
                bucket.append(&record(i, "AACCGGTT"), &record(i, "TTGGCCAA"));
            }
            bucket.permute(&mut ShuffleRng::from_seed(b"stable"));
            let mut out = Vec::new();
            bucket.write_records(&mut PairWriter::new(&mut out, &mut Vec::new()))?;
            outputs.push(out);
        }
        assert_eq!(outputs[0], outputs[1]);
        Ok(())
    }

    #[test]
    fn test_pair_reader_yields_quartets() -> Result<()> {
        let r1 = [record(0, "ACGT"), record(1, "CCCC")].concat();
        let r2 = [record(0, "TTTT"), record(1, "GGGG")].concat();
        let mut reader = PairReader::new(
            Cursor::new(r1),
            Cursor::new(r2),
            Path::new("r1.fq"),
            Path::new("r2.fq"),
        );

        let mut a = Vec::new();
        let mut b = Vec::new();
        assert!(reader.next_pair(&mut a, &mut b)?);
        assert_eq!(a, record(0, "ACGT"));
        assert_eq!(b, record(0, "TTTT"));
        assert!(reader.next_pair(&mut a, &mut b)?);
        assert!(!reader.next_pair(&mut a, &mut b)?);
        assert_eq!(reader.n_processed(), 2);
        Ok(())
    }

    #[test]
    fn test_pair_reader_rejects_truncated_record() {
        let r1 = b"@r0\nACGT\n+\n".to_vec();
        let r2 = record(0, "TTTT");
        let mut reader = PairReader::new(
            Cursor::new(r1),
            Cursor::new(r2),
            Path::new("r1.fq"),
            Path::new("r2.fq"),
        );
        let err = reader
            .next_pair(&mut Vec::new(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Record(RecordError::TruncatedRecord(_, 0))
        ));
    }

    #[test]
    fn test_pair_reader_rejects_unequal_counts() {
        let r1 = [record(0, "ACGT"), record(1, "CCCC")].concat();
        let r2 = record(0, "TTTT");
        let mut reader = PairReader::new(
            Cursor::new(r1),
            Cursor::new(r2),
            Path::new("r1.fq"),
            Path::new("r2.fq"),
        );
        let mut a = Vec::new();
        let mut b = Vec::new();
        assert!(reader.next_pair(&mut a, &mut b).is_ok());
        let err = reader.next_pair(&mut a, &mut b).unwrap_err();
        assert!(matches!(
            err,
            Error::Record(RecordError::UnequalRecordCounts(_, 1))
        ));
    }

    #[test]
    fn test_temp_file_count_lenient_parse() {
        assert_eq!(TempFileCount::parse("auto"), TempFileCount::Auto);
        assert_eq!(TempFileCount::parse("AUTO"), TempFileCount::Auto);
        assert_eq!(TempFileCount::parse("6"), TempFileCount::Fixed(6));
        assert_eq!(TempFileCount::parse("0"), TempFileCount::Auto);
        assert_eq!(TempFileCount::parse("-3"), TempFileCount::Auto);
        assert_eq!(TempFileCount::parse("lots"), TempFileCount::Auto);
    }
}
