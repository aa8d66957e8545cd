//! Responsive toolbar overflow layout.
//!
//! This crate decides, for an ordered list of actions and a finite width,
//! which actions render fully, which collapse to an icon, and which move into
//! an overflow indicator:
//!
//! - **Overflow Resolution**: Priority-aware, single forward walk with bounded
//!   reclamation ([`overflow`])
//! - **Placement**: Alignment, mirroring and vertical centering ([`placement`])
//! - **Representation Cache**: One provider-built visual per action, kept for a
//!   grace period after removal ([`cache`])
//! - **Overflow Indicator**: The lazily created "more actions" visual ([`indicator`])
//! - **Invalidation Coalescing**: Bursts of changes become one deferred pass
//!   ([`coalescer`])
//!
//! [`ToolStrip`] ties these together. The host supplies a
//! [`RepresentationProvider`] to build visuals, a [`PassScheduler`] to run
//! passes on its event loop, and a [`Clock`] for the eviction countdown.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use toolstrip::testing::ScriptedProvider;
//! use toolstrip::{Action, Alignment, Measurement, SystemClock, TemplateId, ToolStrip};
//!
//! let provider = ScriptedProvider::new(Measurement {
//!     full_width: 50.0,
//!     icon_width: 20.0,
//!     height: 24.0,
//! });
//! let mut strip = ToolStrip::new(provider, || {}, Arc::new(SystemClock))
//!     .with_default_template(TemplateId::new(1))
//!     .with_indicator_template(TemplateId::new(2));
//!
//! strip.set_alignment(Alignment::Center);
//! strip.set_spacing(10.0);
//! strip.set_container_width(300.0);
//! strip.add_action(Arc::new(Action::new("Open")));
//! strip.add_action(Arc::new(Action::new("Save")));
//! strip.run_pass();
//!
//! assert_eq!(strip.visible_width(), 110.0);
//! assert!(strip.hidden_actions().is_empty());
//! ```

pub mod action;
pub mod cache;
pub mod coalescer;
pub mod config;
pub mod geometry;
pub mod indicator;
pub mod overflow;
pub mod placement;
pub mod representation;
pub mod testing;
pub mod tool_strip;

mod error;

pub use action::{Action, ActionId, TemplateId};
pub use cache::RepresentationCache;
pub use coalescer::{CoalescerState, InvalidationCoalescer, PassGuard, PassScheduler, Trigger};
pub use config::{
    Alignment, CenterReservation, OverflowOrder, PriorityDemotion, TextDirection, ToolStripConfig,
};
pub use error::{ConfigError, Result, Unready};
pub use geometry::{Point, Size};
pub use indicator::OverflowIndicator;
pub use overflow::{OverflowItem, OverflowParams, Resolution, resolve};
pub use placement::{Placement, PlacementParams, place};
pub use representation::{DisplayMode, Measurement, RepresentationProvider, TemplateChoice};
pub use tool_strip::{ItemLayout, LayoutResult, PassOutcome, ToolStrip};
pub use toolstrip_core::{Clock, ManualClock, Signal, SystemClock};
