//! Hash value types and comparison.

use serde::{Deserialize, Serialize};

/// A computed perceptual hash that can be compared
pub trait PerceptualHash {
    /// Compute the Hamming distance to another hash
    ///
    /// Returns the number of bits that differ between the two hashes.
    /// Bits present in only one of them (length mismatch) count as differing.
    /// Lower distance = more similar images.
    fn distance(&self, other: &Self) -> u32;

    /// Get the total number of bits in this hash
    fn bit_count(&self) -> u32;

    /// Calculate similarity as a percentage (0-100)
    fn similarity(&self, other: &Self) -> f64 {
        let distance = self.distance(other);
        let max_distance = self.bit_count().max(other.bit_count());
        if max_distance == 0 {
            return 100.0;
        }
        (1.0 - (distance as f64 / max_distance as f64)) * 100.0
    }
}

/// Row-major sign bits of the low-frequency block.
///
/// Always holds exactly `hash_size * hash_size` bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashBits {
    hash_size: u32,
    bits: Vec<bool>,
}

impl HashBits {
    pub(crate) fn new(hash_size: u32, bits: Vec<bool>) -> Self {
        debug_assert_eq!(bits.len(), (hash_size * hash_size) as usize);
        Self { hash_size, bits }
    }

    pub fn hash_size(&self) -> u32 {
        self.hash_size
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Number of set bits
    pub fn count_ones(&self) -> u32 {
        self.bits.iter().filter(|&&b| b).count() as u32
    }

    /// Lowercase hex, MSB first, 4 bits per digit.
    ///
    /// A trailing partial nibble is padded with zero bits on the right.
    pub fn to_hex(&self) -> String {
        self.bits
            .chunks(4)
            .map(|nibble| {
                let value = nibble
                    .iter()
                    .enumerate()
                    .fold(0u32, |acc, (i, &bit)| acc | (u32::from(bit) << (3 - i)));
                // value < 16 by construction
                char::from_digit(value, 16).unwrap_or('0')
            })
            .collect()
    }

    /// Packed bytes, MSB first, final partial byte zero-padded
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | (u8::from(bit) << (7 - i)))
            })
            .collect()
    }
}

impl PerceptualHash for HashBits {
    fn distance(&self, other: &Self) -> u32 {
        let differing = self
            .bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(a, b)| a != b)
            .count();
        let unmatched = self.bits.len().abs_diff(other.bits.len());
        (differing + unmatched) as u32
    }

    fn bit_count(&self) -> u32 {
        self.bits.len() as u32
    }
}

/// Final result of one hashing call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashResult {
    /// Hex rendering of the bits, `ceil(bit_length / 4)` characters
    pub hex_hash: String,
    /// Always `hash_size * hash_size`
    pub bit_length: u32,
    pub hash_size: u32,
    #[serde(skip)]
    bits: HashBits,
}

impl HashResult {
    pub(crate) fn from_bits(bits: HashBits) -> Self {
        Self {
            hex_hash: bits.to_hex(),
            bit_length: bits.len() as u32,
            hash_size: bits.hash_size(),
            bits,
        }
    }

    pub fn bits(&self) -> &HashBits {
        &self.bits
    }
}

impl PerceptualHash for HashResult {
    fn distance(&self, other: &Self) -> u32 {
        self.bits.distance(&other.bits)
    }

    fn bit_count(&self) -> u32 {
        self.bit_length
    }
}

impl std::fmt::Display for HashResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hex_hash)
    }
}
