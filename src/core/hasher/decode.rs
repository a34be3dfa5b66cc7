//! In-memory image decoding.
//!
//! Uses zune-jpeg for JPEG payloads (1.5-2x faster than image crate),
//! falls back to image crate for everything else. Nothing touches disk.

use crate::error::HashError;
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, Rgba};
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Grayscale intensities (0-255) of a decoded image, row-major.
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelGrid {
    /// Build a grid from raw row-major luma values.
    ///
    /// Fails if `pixels` does not hold exactly `width * height` values.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, HashError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(HashError::InvalidInput(format!(
                "expected {} pixels for a {}x{} grid, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Grid filled with a single intensity
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width as usize * height as usize],
        }
    }

    /// Convert any decoded image to 8-bit luma
    pub fn from_image(image: &DynamicImage) -> Self {
        Self::from(image.to_luma8())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl From<GrayImage> for PixelGrid {
    fn from(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into a luma grid.
pub fn decode(bytes: &[u8]) -> Result<PixelGrid, HashError> {
    let image = decode_image(bytes)?;
    let grid = PixelGrid::from_image(&image);

    if grid.width() == 0 || grid.height() == 0 {
        return Err(HashError::DecodeError(format!(
            "image has no pixels ({}x{})",
            grid.width(),
            grid.height()
        )));
    }

    Ok(grid)
}

/// Decode bytes into a [`DynamicImage`] using the fastest available decoder.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, HashError> {
    if bytes.is_empty() {
        return Err(HashError::DecodeError("empty input".to_string()));
    }

    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => decode_jpeg(bytes).or_else(|_| decode_fallback(bytes)),
        Ok(_) => decode_fallback(bytes),
        Err(_) => Err(HashError::DecodeError("unrecognized image format".to_string())),
    }
}

/// Fast JPEG decoding using zune-jpeg
fn decode_jpeg(bytes: &[u8]) -> Result<DynamicImage, HashError> {
    let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(bytes, options);

    let pixels = decoder
        .decode()
        .map_err(|e| HashError::DecodeError(format!("zune-jpeg decode failed: {:?}", e)))?;

    let info = decoder
        .info()
        .ok_or_else(|| HashError::DecodeError("missing JPEG header info".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    // The decoder may ignore the requested colorspace for some inputs
    let image = match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
        ColorSpace::RGB => {
            let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| {
                    HashError::DecodeError("RGB buffer size mismatch".to_string())
                })?;
            DynamicImage::ImageRgb8(buffer)
        }
        ColorSpace::RGBA => {
            let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| {
                    HashError::DecodeError("RGBA buffer size mismatch".to_string())
                })?;
            DynamicImage::ImageRgba8(buffer)
        }
        ColorSpace::Luma => {
            let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| {
                    HashError::DecodeError("Luma buffer size mismatch".to_string())
                })?;
            DynamicImage::ImageLuma8(buffer)
        }
        _ => return decode_fallback(bytes),
    };

    Ok(image)
}

fn decode_fallback(bytes: &[u8]) -> Result<DynamicImage, HashError> {
    image::load_from_memory(bytes).map_err(|e| HashError::DecodeError(e.to_string()))
}
