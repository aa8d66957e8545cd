//! Core plumbing for toolstrip.
//!
//! This crate provides the small reactive toolkit the layout engine is built on:
//!
//! - **Signal/Slot System**: Observer lists for publishing layout results
//! - **Property System**: Change-detecting cells, so observers hear only real changes
//! - **Timers**: A host-supplied monotonic [`Clock`] and a cancel-and-restart
//!   [`DebounceTimer`]
//! - **Logging**: `tracing` target and span names
//!
//! # Example
//!
//! ```
//! use toolstrip_core::{Property, Signal};
//!
//! let hidden = Property::new(Vec::<u64>::new());
//! let hidden_changed = Signal::<Vec<u64>>::new();
//!
//! hidden_changed.connect(|ids| println!("{} hidden", ids.len()));
//!
//! let next = vec![3, 4];
//! if hidden.set(next.clone()) {
//!     hidden_changed.emit(next);
//! }
//! ```

pub mod logging;
pub mod property;
pub mod signal;
pub mod timer;

pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
pub use timer::{Clock, DebounceTimer, ManualClock, SystemClock};
