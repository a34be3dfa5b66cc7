//! Shared fixture builders for integration tests.
//!
//! Every fixture is generated in memory from a fixed seed, so hashes are
//! reproducible without checked-in image files.

#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, ImageBuffer, ImageFormat, Luma};
use std::f64::consts::PI;
use std::io::Cursor;

/// Small deterministic PRNG (PCG-style LCG), good enough for fixtures
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform in [-1, 1]
    pub fn next_signed(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX >> 1) as f64 * 2.0 - 1.0
    }
}

pub fn solid(width: u32, height: u32, value: u8) -> GrayImage {
    ImageBuffer::from_pixel(width, height, Luma([value]))
}

pub fn noise(width: u32, height: u32, seed: u64) -> GrayImage {
    let mut rng = Lcg::new(seed);
    ImageBuffer::from_fn(width, height, |_, _| Luma([(rng.next_u32() & 0xFF) as u8]))
}

/// Smooth image built from random amplitudes of the 8x8 lowest cosine
/// frequencies, so every low-frequency DCT term carries real signal.
pub fn smooth_scene(side: u32, seed: u64) -> GrayImage {
    let mut rng = Lcg::new(seed);
    let amplitudes: Vec<f64> = (0..64).map(|_| rng.next_signed() * 12.0).collect();
    let n = side as f64;

    ImageBuffer::from_fn(side, side, |x, y| {
        let mut value = 128.0;
        for u in 0..8 {
            for v in 0..8 {
                if u == 0 && v == 0 {
                    continue;
                }
                value += amplitudes[u * 8 + v]
                    * (PI * u as f64 * (y as f64 + 0.5) / n).cos()
                    * (PI * v as f64 * (x as f64 + 0.5) / n).cos();
            }
        }
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

pub fn encode_png(image: &GrayImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding of an in-memory buffer");
    bytes
}

pub fn encode_jpeg(image: &GrayImage, quality: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image.clone())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))
        .expect("JPEG encoding of an in-memory buffer");
    bytes
}
