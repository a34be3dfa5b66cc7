//! # Events Module
//!
//! Progress reporting for node execution.
//!
//! ## Design
//! Nodes emit events through a channel, so a CLI progress bar (or a host
//! adapter) can follow per-item results without the node knowing about it.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Node(NodeEvent::ItemHashed { item_index, hash }) = event {
//!             println!("item {}: {}", item_index, hash);
//!         }
//!     }
//! });
//!
//! node.execute(&context, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
