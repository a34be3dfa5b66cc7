//! # CLI Module
//!
//! Command-line front end for the image-hasher node.
//!
//! ## Usage
//! ```bash
//! # Hash images (16x16 = 256 bits by default)
//! image-hasher hash photo.jpg scan.png
//!
//! # 64-bit hashes as JSON, keep going past unreadable images
//! image-hasher hash *.jpg --size 8 --continue-on-fail --output json
//!
//! # Hamming distance between two images
//! image-hasher compare original.jpg recompressed.jpg --size 8
//!
//! # Node description as the host would see it
//! image-hasher describe
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use image_hasher_node::core::hasher::{DcPolicy, HasherConfig, PerceptualHash};
use image_hasher_node::error::{ImageHasherError, Result};
use image_hasher_node::events::{Event, EventChannel, NodeEvent};
use image_hasher_node::node::{
    mime_type_for_path, registry, BinaryData, NodeItem, StaticContext, NODE_NAME,
    PARAM_BINARY_PROPERTY, PARAM_HASH_SIZE, PARAM_INCLUDE_DC,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::warn;

/// Binary property the CLI stores file contents under
const BINARY_PROPERTY: &str = "data";

/// Image Hasher - perceptual hashes for images
#[derive(Parser, Debug)]
#[command(name = "image-hasher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute a perceptual hash for each image
    Hash {
        /// Image files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Hash side length (total bits = size²)
        #[arg(short, long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..=64))]
        size: u32,

        /// Use the DC coefficient as one of the hash bits
        #[arg(long)]
        include_dc: bool,

        /// Record failed images as errors instead of stopping
        #[arg(long)]
        continue_on_fail: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Show per-file progress
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare two images by Hamming distance
    Compare {
        first: PathBuf,
        second: PathBuf,

        /// Hash side length (total bits = size²)
        #[arg(short, long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..=64))]
        size: u32,

        /// Use the DC coefficient as one of the hash bits
        #[arg(long)]
        include_dc: bool,
    },

    /// Print the node description as JSON
    Describe,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// `<hash>  <path>` lines
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    image_hasher_node::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            files,
            size,
            include_dc,
            continue_on_fail,
            output,
            verbose,
        } => run_hash(files, size, include_dc, continue_on_fail, output, verbose),
        Commands::Compare {
            first,
            second,
            size,
            include_dc,
        } => run_compare(&first, &second, size, include_dc),
        Commands::Describe => run_describe(),
    }
}

fn run_hash(
    files: Vec<PathBuf>,
    size: u32,
    include_dc: bool,
    continue_on_fail: bool,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Image Hasher").bold().cyan(),
            style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let batch = load_batch(&files, continue_on_fail)?;

    let context = StaticContext::new(batch.items)
        .with_parameter(PARAM_BINARY_PROPERTY, BINARY_PROPERTY)
        .with_parameter(PARAM_HASH_SIZE, size)
        .with_parameter(PARAM_INCLUDE_DC, include_dc)
        .with_continue_on_fail(continue_on_fail);

    let node = registry::lookup(NODE_NAME)?;

    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        // Unreadable files are already done
        pb.inc(batch.slots.iter().filter(|slot| slot.is_err()).count() as u64);
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    // Node item index -> file name
    let names: Vec<String> = files
        .iter()
        .zip(&batch.slots)
        .filter(|(_, slot)| slot.is_ok())
        .map(|(path, _)| display_name(path))
        .collect();

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Node(NodeEvent::ItemHashed { item_index, .. })
                | Event::Node(NodeEvent::ItemFailed { item_index, .. }) => {
                    pb.inc(1);
                    if verbose {
                        if let Some(name) = names.get(item_index) {
                            pb.set_message(name.clone());
                        }
                    }
                }
                Event::Node(NodeEvent::Completed(_)) => pb.finish_and_clear(),
                Event::Node(NodeEvent::Started { .. }) => {}
            }
        }
    });

    let result = node.execute(&context, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let records = merge_records(batch.slots, result?);

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &files, &records),
        OutputFormat::Json => print_json_results(&files, &records)?,
        OutputFormat::Minimal => print_minimal_results(&files, &records),
    }

    Ok(())
}

fn run_compare(first: &Path, second: &Path, size: u32, include_dc: bool) -> Result<()> {
    let policy = if include_dc {
        DcPolicy::Include
    } else {
        DcPolicy::Exclude
    };
    let hasher = HasherConfig::new().hash_size(size).dc_policy(policy).build()?;

    let hash_a = hasher.hash_bytes(&read_file(first)?)?;
    let hash_b = hasher.hash_bytes(&read_file(second)?)?;

    let distance = hash_a.distance(&hash_b);

    println!("{}  {}", hash_a.hex_hash, first.display());
    println!("{}  {}", hash_b.hex_hash, second.display());
    println!(
        "distance: {}/{} bits ({:.1}% similar)",
        distance,
        hash_a.bit_count(),
        hash_a.similarity(&hash_b)
    );

    Ok(())
}

fn run_describe() -> Result<()> {
    let descriptions: Vec<_> = registry::all()
        .iter()
        .map(|node| node.description().clone())
        .collect();
    println!("{}", serde_json::to_string_pretty(&descriptions)?);
    Ok(())
}

/// Files prepared for one node execution
struct Batch {
    /// Node items for the files that could be read
    items: Vec<NodeItem>,
    /// Per file: its node item index, or the read error message
    slots: Vec<std::result::Result<usize, String>>,
}

/// Read every file into a node item.
///
/// With `continue_on_fail` an unreadable file becomes an error slot instead
/// of stopping the batch.
fn load_batch(files: &[PathBuf], continue_on_fail: bool) -> Result<Batch> {
    let mut items = Vec::with_capacity(files.len());
    let mut slots = Vec::with_capacity(files.len());

    for path in files {
        match file_item(path) {
            Ok(item) => {
                slots.push(Ok(items.len()));
                items.push(item);
            }
            Err(e) if continue_on_fail => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                slots.push(Err(e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Batch { items, slots })
}

/// One JSON record per file, in file order
fn merge_records(
    slots: Vec<std::result::Result<usize, String>>,
    records: Vec<NodeItem>,
) -> Vec<Map<String, Value>> {
    let mut records: Vec<Option<NodeItem>> = records.into_iter().map(Some).collect();

    slots
        .into_iter()
        .map(|slot| match slot {
            Ok(index) => records
                .get_mut(index)
                .and_then(Option::take)
                .map(|record| record.json)
                .unwrap_or_default(),
            Err(message) => {
                let mut record = Map::new();
                record.insert("error".to_string(), Value::String(message));
                record
            }
        })
        .collect()
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| ImageHasherError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Wrap a file as a node item under the CLI's binary property
fn file_item(path: &Path) -> Result<NodeItem> {
    let bytes = read_file(path)?;
    let mut data = BinaryData::from_bytes(&bytes, mime_type_for_path(path));
    if let Some(name) = path.file_name() {
        data = data.file_name(name.to_string_lossy());
    }
    Ok(NodeItem::default().with_binary(BINARY_PROPERTY, data))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_pretty_results(term: &Term, files: &[PathBuf], records: &[Map<String, Value>]) {
    let mut failed = 0;

    for (path, record) in files.iter().zip(records) {
        match (record.get("hash"), record.get("error")) {
            (Some(Value::String(hash)), _) => {
                term.write_line(&format!(
                    "  {} {}  {}",
                    style("✓").green(),
                    style(hash).yellow(),
                    path.display()
                ))
                .ok();
            }
            (_, Some(error)) => {
                failed += 1;
                term.write_line(&format!(
                    "  {} {}  {}",
                    style("✗").red(),
                    path.display(),
                    style(error.as_str().unwrap_or_default()).dim()
                ))
                .ok();
            }
            _ => {}
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "  {} hashed, {} failed",
        style(records.len() - failed).cyan(),
        style(failed).cyan()
    ))
    .ok();
}

fn print_json_results(files: &[PathBuf], records: &[Map<String, Value>]) -> Result<()> {
    let output: Vec<Value> = files
        .iter()
        .zip(records)
        .map(|(path, record)| {
            let mut entry = record.clone();
            entry.insert("file".to_string(), json!(path.display().to_string()));
            Value::Object(entry)
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_minimal_results(files: &[PathBuf], records: &[Map<String, Value>]) {
    for (path, record) in files.iter().zip(records) {
        if let Some(Value::String(hash)) = record.get("hash") {
            println!("{}  {}", hash, path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn unreadable_file_aborts_batch_by_default() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.png", b"\x89PNG");
        let missing = dir.path().join("missing.png");

        let error = load_batch(&[good, missing.clone()], false).err().unwrap();

        assert!(matches!(error, ImageHasherError::FileRead { ref path, .. } if *path == missing));
        assert!(error.to_string().contains("missing.png"));
    }

    #[test]
    fn unreadable_file_becomes_error_slot_with_continue_on_fail() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.png");
        let first = write_file(&dir, "a.png", b"a");
        let last = write_file(&dir, "b.png", b"b");

        let batch = load_batch(&[first, missing, last], true).unwrap();

        assert_eq!(batch.items.len(), 2);
        assert_eq!(batch.slots[0], Ok(0));
        assert!(batch.slots[1]
            .as_ref()
            .unwrap_err()
            .contains("missing.png"));
        assert_eq!(batch.slots[2], Ok(1));
    }

    #[test]
    fn records_follow_file_order() {
        let hashed = |hash: &str| {
            let mut json = Map::new();
            json.insert("hash".to_string(), json!(hash));
            NodeItem::from_json(json)
        };
        let slots = vec![Ok(0), Err("Failed to read missing.png".to_string()), Ok(1)];

        let records = merge_records(slots, vec![hashed("aa"), hashed("bb")]);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["hash"], "aa");
        assert_eq!(records[1]["error"], "Failed to read missing.png");
        assert_eq!(records[2]["hash"], "bb");
    }
}
