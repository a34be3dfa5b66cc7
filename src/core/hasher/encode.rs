//! Median-threshold encoding of the low-frequency DCT block.

use super::dct::CoefficientMatrix;
use super::traits::HashBits;
use crate::error::HashError;
use serde::{Deserialize, Serialize};

/// Magnitudes below this are treated as exact zeros.
///
/// Flat images produce AC terms that are float noise around zero; flushing
/// them keeps such images hashing identically on every platform.
pub const COEFFICIENT_EPSILON: f64 = 1e-9;

/// What happens to the DC term at `[0][0]`.
///
/// DC tracks overall brightness and is almost always the largest
/// coefficient, so it carries no structural information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DcPolicy {
    /// Drop DC from the bit block. The `hash_size²` bits are the first AC
    /// terms of the `hash_size`-column strip in row-major order, i.e. the
    /// block without `[0][0]` followed by `[hash_size][0]`.
    #[default]
    Exclude,
    /// Use the top-left `hash_size x hash_size` block as is; DC takes part
    /// in the median and contributes bit 0.
    Include,
}

impl std::fmt::Display for DcPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DcPolicy::Exclude => write!(f, "exclude-dc"),
            DcPolicy::Include => write!(f, "include-dc"),
        }
    }
}

/// Encode the low-frequency coefficients selected by `policy` as sign bits.
///
/// Bit `i` is set when the `i`-th selected coefficient is strictly greater
/// than the median of all selected coefficients.
pub fn encode(
    coeffs: &CoefficientMatrix,
    hash_size: u32,
    policy: DcPolicy,
) -> Result<HashBits, HashError> {
    let size = hash_size as usize;

    if size == 0 {
        return Err(HashError::InvalidInput("hash size must be at least 1".to_string()));
    }

    // Exclude reads one row past the block
    let rows_needed = match policy {
        DcPolicy::Exclude => size + 1,
        DcPolicy::Include => size,
    };
    if rows_needed > coeffs.side() {
        return Err(HashError::InvalidInput(format!(
            "hash size {} exceeds coefficient matrix side {} ({})",
            hash_size,
            coeffs.side(),
            policy
        )));
    }

    let positions = (0..rows_needed)
        .flat_map(|u| (0..size).map(move |v| (u, v)))
        .filter(|&position| policy == DcPolicy::Include || position != (0, 0))
        .take(size * size);

    let mut selected = Vec::with_capacity(size * size);
    for (u, v) in positions {
        let c = coeffs.get(u, v);
        if !c.is_finite() {
            return Err(HashError::InternalError(format!(
                "non-finite DCT coefficient at [{}][{}]",
                u, v
            )));
        }
        selected.push(if c.abs() < COEFFICIENT_EPSILON { 0.0 } else { c });
    }

    let threshold = median(&selected);
    let bits = selected.iter().map(|&c| c > threshold).collect();
    Ok(HashBits::new(hash_size, bits))
}

/// Median of finite values; mean of the two middle values for even counts.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
