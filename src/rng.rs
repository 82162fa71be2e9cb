//! Deterministic random stream backing every shuffling decision
//!
//! The stream is a SHA-256 counter chain: each block hashes the decimal
//! ASCII form of a running counter followed by the previous digest (or the
//! seed bytes on the first step). Any byte string can act as a seed, and a
//! fixed seed yields the same draw sequence on every platform.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

/// 2^64 as a double, the divisor mapping a `u64` word into `[0, 1)`
const WORD_RANGE: f64 = 18_446_744_073_709_551_616.0;

/// Deterministic uniform random source
///
/// Construction installs fresh state; reseeding is done by replacing the
/// value wholesale. Each digest block is split into four little-endian
/// `u64` words which are consumed front to back.
pub struct ShuffleRng {
    /// Number of digest blocks produced so far
    counter: u64,

    /// Previous digest output (the seed bytes before the first block)
    prev: Vec<u8>,

    /// Words of the latest block not yet consumed
    waiting: VecDeque<u64>,
}
impl ShuffleRng {
    #[must_use]
    pub fn from_seed(seed: &[u8]) -> Self {
        Self {
            counter: 0,
            prev: seed.to_vec(),
            waiting: VecDeque::new(),
        }
    }

    /// Hash the next block and refill the word queue
    fn refill(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.counter.to_string().as_bytes());
        hasher.update(&self.prev);
        let block = hasher.finalize();
        self.prev = block.to_vec();
        self.counter += 1;
        for word in block.chunks_exact(8) {
            let word: [u8; 8] = word.try_into().expect("digest splits into 8-byte words");
            self.waiting.push_back(u64::from_le_bytes(word));
        }
    }

    /// Draws a uniform real in `[0, 1)`
    pub fn draw_f64(&mut self) -> f64 {
        if self.waiting.is_empty() {
            self.refill();
        }
        let word = self.waiting.pop_front().expect("queue refilled above");
        word as f64 / WORD_RANGE
    }

    /// Draws a uniform integer in `[0, n)`
    ///
    /// The clamp keeps the contract at the floating-point edge where a word
    /// near `u64::MAX` rounds up to exactly 2^64.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `n` is zero.
    pub fn draw_index(&mut self, n: u64) -> u64 {
        debug_assert!(n > 0, "cannot draw from an empty range");
        let scaled = (n as f64 * self.draw_f64()) as u64;
        scaled.min(n - 1)
    }
}

/// Substitutes the current wall-clock seconds when no seed was given,
/// returning the seed actually in use
#[must_use]
pub fn resolve_seed(seed: &str) -> String {
    if seed.is_empty() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        now.as_secs().to_string()
    } else {
        seed.to_string()
    }
}
