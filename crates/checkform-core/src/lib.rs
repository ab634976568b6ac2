//! Core primitives for Checkform.
//!
//! This crate provides the small reactive layer the check editor is built on:
//!
//! - **Signals**: observer slots notified when editor state changes
//! - **Properties**: change-detecting value cells
//! - **Tick scheduling**: "coalesce to next tick" with cancel-on-supersede
//! - **Logging**: tracing targets and span helpers shared across crates
//!
//! # Signal Example
//!
//! ```
//! use checkform_core::Signal;
//!
//! let section_changed = Signal::<String>::new();
//! let id = section_changed.connect(|section| {
//!     println!("now on {section}");
//! });
//!
//! section_changed.emit("uptime".to_string());
//! section_changed.disconnect(id);
//! ```
//!
//! # Tick Example
//!
//! ```
//! use checkform_core::TickQueue;
//!
//! let mut queue = TickQueue::new();
//! queue.schedule(1);
//! queue.schedule(2); // supersedes the first
//!
//! assert_eq!(queue.take_due(), Some(2));
//! assert_eq!(queue.take_due(), None);
//! ```

pub mod logging;
pub mod property;
pub mod signal;
pub mod tick;

pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
pub use tick::{TickId, TickQueue};
