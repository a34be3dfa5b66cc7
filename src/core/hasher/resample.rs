//! Area-averaging downscale to the square matrix fed into the DCT.
//!
//! Uses fast_image_resize with a box filter. The 8-bit convolution runs in
//! fixed-point integer arithmetic, so the output is identical whichever SIMD
//! path (AVX2, NEON, scalar) the resizer picks.
//!
//! Each cell average is rounded to a whole 8-bit level before scaling, so
//! matrix values are always multiples of 1/255. Floating-point convolution
//! would keep the fraction but sums in a different order on each SIMD path.

use super::decode::PixelGrid;
use crate::error::HashError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};

/// Square matrix of intensities in [0, 1] (steps of 1/255), row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledMatrix {
    side: usize,
    values: Vec<f64>,
}

impl ResampledMatrix {
    /// Wrap precomputed values. `values.len()` must be `side * side`.
    pub fn from_values(side: usize, values: Vec<f64>) -> Result<Self, HashError> {
        if side == 0 || values.len() != side * side {
            return Err(HashError::InvalidInput(format!(
                "matrix of side {} needs {} values, got {}",
                side,
                side * side,
                values.len()
            )));
        }
        Ok(Self { side, values })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.side + col]
    }
}

/// Reusable resizer; keeps SIMD scratch buffers between calls
pub struct GridResampler {
    resizer: Resizer,
}

impl GridResampler {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Downscale (or upscale) `grid` to `target_side x target_side`.
    pub fn resample(
        &mut self,
        grid: &PixelGrid,
        target_side: u32,
    ) -> Result<ResampledMatrix, HashError> {
        if grid.width() == 0 || grid.height() == 0 {
            return Err(HashError::InvalidInput(format!(
                "cannot resample an empty {}x{} grid",
                grid.width(),
                grid.height()
            )));
        }

        if target_side == 0 {
            return Err(HashError::InvalidInput(
                "resample target side must be at least 1".to_string(),
            ));
        }

        let src_image = Image::from_vec_u8(
            grid.width(),
            grid.height(),
            grid.pixels().to_vec(),
            PixelType::U8,
        )
        .map_err(|e| HashError::InternalError(format!("source buffer rejected: {}", e)))?;

        let mut dst_image = Image::new(target_side, target_side, PixelType::U8);

        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| HashError::InternalError(format!("resize failed: {}", e)))?;

        let values = dst_image
            .into_vec()
            .into_iter()
            .map(|v| f64::from(v) / 255.0)
            .collect();

        ResampledMatrix::from_values(target_side as usize, values)
    }
}

impl Default for GridResampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function for one-off resampling
pub fn resample(grid: &PixelGrid, target_side: u32) -> Result<ResampledMatrix, HashError> {
    GridResampler::new().resample(grid, target_side)
}
