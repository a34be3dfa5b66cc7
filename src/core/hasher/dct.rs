//! Separable 2-D DCT-II with orthonormal scaling.
//!
//! For an N x N input:
//!
//! ```text
//! C[u][v] = a(u) a(v) sum_x sum_y M[x][y] cos((2x+1)u pi / 2N) cos((2y+1)v pi / 2N)
//! a(0) = sqrt(1/N), a(k) = sqrt(2/N)
//! ```
//!
//! Computed as a 1-D transform over every row followed by one over every
//! column, sharing a precomputed basis table. The order of floating-point
//! operations is fixed, so the same input always yields the same output.

use super::resample::ResampledMatrix;
use std::f64::consts::PI;

/// Frequency-domain coefficients, row-major, same side as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientMatrix {
    side: usize,
    values: Vec<f64>,
}

impl CoefficientMatrix {
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Coefficient at frequency row `u`, column `v`
    pub fn get(&self, u: usize, v: usize) -> f64 {
        self.values[u * self.side + v]
    }

    /// The DC (zero-frequency) term
    pub fn dc(&self) -> f64 {
        self.values[0]
    }
}

/// Orthonormal DCT-II basis: `basis[k * n + x] = a(k) cos((2x+1) k pi / 2n)`
struct DctBasis {
    n: usize,
    table: Vec<f64>,
}

impl DctBasis {
    fn new(n: usize) -> Self {
        let scale_dc = (1.0 / n as f64).sqrt();
        let scale_ac = (2.0 / n as f64).sqrt();

        let mut table = Vec::with_capacity(n * n);
        for k in 0..n {
            let alpha = if k == 0 { scale_dc } else { scale_ac };
            for x in 0..n {
                let angle = (2 * x + 1) as f64 * k as f64 * PI / (2 * n) as f64;
                table.push(alpha * angle.cos());
            }
        }

        Self { n, table }
    }

    /// 1-D transform of `n` samples read with the given stride
    fn transform_line(&self, input: &[f64], offset: usize, stride: usize, output: &mut [f64]) {
        for (k, out) in output.iter_mut().enumerate() {
            let row = &self.table[k * self.n..(k + 1) * self.n];
            let mut sum = 0.0;
            for (x, weight) in row.iter().enumerate() {
                sum += weight * input[offset + x * stride];
            }
            *out = sum;
        }
    }
}

/// Apply the 2-D DCT-II to a resampled matrix.
pub fn transform(matrix: &ResampledMatrix) -> CoefficientMatrix {
    let n = matrix.side();
    let basis = DctBasis::new(n);
    let input = matrix.values();

    // Rows: rows[y * n + v] holds the v-th frequency of row y
    let mut rows = vec![0.0; n * n];
    for y in 0..n {
        basis.transform_line(input, y * n, 1, &mut rows[y * n..(y + 1) * n]);
    }

    // Columns: walk each frequency column of `rows` top to bottom
    let mut column = vec![0.0; n];
    let mut values = vec![0.0; n * n];
    for v in 0..n {
        basis.transform_line(&rows, v, n, &mut column);
        for (u, coefficient) in column.iter().enumerate() {
            values[u * n + v] = *coefficient;
        }
    }

    CoefficientMatrix { side: n, values }
}
