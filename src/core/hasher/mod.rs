//! # Hasher Module
//!
//! Native DCT-based perceptual hashing (pHash).
//!
//! ## How It Works
//! 1. Decode the bytes in memory and convert to grayscale
//! 2. Area-average down to a `4 * hash_size` square
//! 3. Apply an orthonormal 2-D DCT-II
//! 4. Select `hash_size²` low-frequency coefficients (with or without the
//!    DC term, see [`DcPolicy`]), compare them to their median and pack the
//!    signs into bits
//! 5. Render the bits as hex
//!
//! Every call owns its whole chain of buffers, so hashers can be shared
//! across threads freely.
//!
//! ## Example
//! ```rust,ignore
//! use image_hasher_node::core::hasher::{DcPolicy, HasherConfig};
//!
//! let hasher = HasherConfig::new()
//!     .hash_size(16)
//!     .dc_policy(DcPolicy::Exclude)
//!     .build()?;
//!
//! let result = hasher.hash_bytes(&bytes)?;
//! println!("{}", result.hex_hash);
//! ```

pub mod dct;
pub mod decode;
pub mod encode;
pub mod resample;
mod traits;

pub use dct::{transform, CoefficientMatrix};
pub use decode::{decode, PixelGrid};
pub use encode::{encode, DcPolicy};
pub use resample::{resample, GridResampler, ResampledMatrix};
pub use traits::{HashBits, HashResult, PerceptualHash};

use crate::error::HashError;
use std::time::Instant;
use tracing::debug;

/// Largest accepted hash size; keeps the transform at 256x256 or below
pub const MAX_HASH_SIZE: u32 = 64;

/// The resampled matrix is this many times the hash side
pub const RESAMPLE_FACTOR: u32 = 4;

/// Configuration builder for the perceptual hasher
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Side of the sampled bit block; total bits = hash_size²
    hash_size: u32,
    /// Whether the DC term joins the median
    dc_policy: DcPolicy,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self {
            hash_size: 8,
            dc_policy: DcPolicy::default(),
        }
    }

    /// Set the hash size (4, 8, 16 or 32 are the usual choices)
    ///
    /// - 4: 16 bits, very coarse
    /// - 8: 64 bits, good for most uses
    /// - 16: 256 bits, more detail
    /// - 32: 1024 bits, slowest
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Set the DC coefficient policy
    pub fn dc_policy(mut self, policy: DcPolicy) -> Self {
        self.dc_policy = policy;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Result<PerceptualHasher, HashError> {
        if self.hash_size == 0 || self.hash_size > MAX_HASH_SIZE {
            return Err(HashError::InvalidInput(format!(
                "hash size must be between 1 and {}, got {}",
                MAX_HASH_SIZE, self.hash_size
            )));
        }

        Ok(PerceptualHasher {
            hash_size: self.hash_size,
            dc_policy: self.dc_policy,
        })
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated pHash configuration.
///
/// Stateless between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerceptualHasher {
    hash_size: u32,
    dc_policy: DcPolicy,
}

impl PerceptualHasher {
    pub fn hash_size(&self) -> u32 {
        self.hash_size
    }

    pub fn dc_policy(&self) -> DcPolicy {
        self.dc_policy
    }

    /// Hash encoded image bytes (PNG, JPEG, ...)
    pub fn hash_bytes(&self, bytes: &[u8]) -> Result<HashResult, HashError> {
        let grid = decode(bytes)?;
        self.hash_grid(&grid)
    }

    /// Hash an already-decoded grid
    pub fn hash_grid(&self, grid: &PixelGrid) -> Result<HashResult, HashError> {
        let start = Instant::now();

        let side = self.hash_size * RESAMPLE_FACTOR;
        let matrix = resample(grid, side)?;
        let coeffs = transform(&matrix);
        let bits = encode(&coeffs, self.hash_size, self.dc_policy)?;
        let result = HashResult::from_bits(bits);

        debug!(
            hash_size = self.hash_size,
            bits = result.bit_length,
            dc_policy = %self.dc_policy,
            width = grid.width(),
            height = grid.height(),
            elapsed_us = start.elapsed().as_micros() as u64,
            hash = %result.hex_hash,
            "computed perceptual hash"
        );

        Ok(result)
    }
}

/// Hash `bytes` with a `hash_size x hash_size` pHash and the default DC policy.
///
/// Fails with `InvalidInput` for a non-positive or oversized `hash_size`,
/// `DecodeError` for bytes that are not a supported image.
pub fn compute_hash(bytes: &[u8], hash_size: i64) -> Result<HashResult, HashError> {
    compute_hash_with_policy(bytes, hash_size, DcPolicy::default())
}

/// [`compute_hash`] with an explicit DC policy
pub fn compute_hash_with_policy(
    bytes: &[u8],
    hash_size: i64,
    dc_policy: DcPolicy,
) -> Result<HashResult, HashError> {
    let hash_size = u32::try_from(hash_size).map_err(|_| {
        HashError::InvalidInput(format!("hash size must be positive, got {}", hash_size))
    })?;

    HasherConfig::new()
        .hash_size(hash_size)
        .dc_policy(dc_policy)
        .build()?
        .hash_bytes(bytes)
}
