//! # image-hasher CLI
//!
//! Runs the image-hasher node over files from the command line.
//!
//! ## Usage
//! ```bash
//! image-hasher hash photo.jpg scan.png --size 8
//! image-hasher compare a.jpg b.jpg
//! image-hasher describe
//! ```

mod cli;

use image_hasher_node::Result;

fn main() -> Result<()> {
    cli::run()
}
