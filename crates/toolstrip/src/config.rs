//! Tool strip configuration.
//!
//! [`ToolStripConfig`] holds every container-level layout option. It can be
//! built in code with the `with_*` builders or loaded from TOML:
//!
//! ```
//! use toolstrip::{Alignment, TextDirection, ToolStripConfig};
//!
//! let config = ToolStripConfig::from_toml_str(r#"
//! spacing = 8.0
//! alignment = "center"
//! direction = "reverse"
//! "#).unwrap();
//!
//! assert_eq!(config.spacing, 8.0);
//! assert_eq!(config.alignment, Alignment::Center);
//! assert_eq!(config.direction, TextDirection::Reverse);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use toolstrip_core::logging::targets;

use crate::error::{ConfigError, Result};

/// Where the visible actions sit along the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Packed against the leading edge.
    #[default]
    Leading,
    /// Centered in the strip.
    Center,
    /// Packed against the trailing edge.
    Trailing,
}

/// The direction in which actions are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    /// Left to right.
    #[default]
    Forward,
    /// Right to left. The layout is mirrored.
    Reverse,
}

impl TextDirection {
    /// Check if this is the mirrored direction.
    pub fn is_reverse(self) -> bool {
        matches!(self, TextDirection::Reverse)
    }
}

/// How much room is held back for the overflow indicator under center alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterReservation {
    /// Reserve the indicator's width on both sides, so centered content keeps
    /// its position whether or not the indicator is shown.
    #[default]
    Symmetric,
    /// Reserve the indicator's width once, on the indicator's side only.
    Single,
}

/// Which items remain eligible once the first item has overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowOrder {
    /// After the first overflow, every later non-priority item is hidden too.
    /// The visible non-priority items always form a prefix of the list, so
    /// shrinking the strip never brings a hidden item back.
    #[default]
    Contiguous,
    /// Each item is tested on its own; a narrow item may still fit after a
    /// wider one has been hidden.
    FirstFit,
}

/// What a `keep_visible` action gives up first when it does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityDemotion {
    /// Fall back to the icon form when it fits; reclaim space from earlier
    /// actions only when not even the icon fits.
    #[default]
    IconFirst,
    /// Reclaim space from earlier non-priority actions first; fall back to the
    /// icon form only once nothing is left to reclaim.
    EvictFirst,
}

/// Container-level layout options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolStripConfig {
    /// Fixed space between adjacent items.
    pub spacing: f32,
    /// Alignment of the visible items.
    pub alignment: Alignment,
    /// Layout direction.
    pub direction: TextDirection,
    /// Indicator reservation under center alignment.
    pub center_reservation: CenterReservation,
    /// Overflow eligibility after the first overflow.
    pub overflow_order: OverflowOrder,
    /// Priority fallback order.
    pub priority_demotion: PriorityDemotion,
    /// How long a removed action's representation is kept before it is destroyed.
    pub grace_period_ms: u64,
}

impl Default for ToolStripConfig {
    fn default() -> Self {
        Self {
            spacing: 4.0,
            alignment: Alignment::default(),
            direction: TextDirection::default(),
            center_reservation: CenterReservation::default(),
            overflow_order: OverflowOrder::default(),
            priority_demotion: PriorityDemotion::default(),
            grace_period_ms: 1000,
        }
    }
}

impl ToolStripConfig {
    /// Parse and validate a configuration from a TOML document.
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        tracing::debug!(target: targets::CONFIG, ?config, "loaded tool strip configuration");
        Ok(config)
    }

    /// Check that every value is within its allowed range.
    pub fn validate(&self) -> Result<()> {
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(ConfigError::InvalidSpacing(self.spacing));
        }
        Ok(())
    }

    /// The grace period as a duration.
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    /// Set spacing using builder pattern.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set alignment using builder pattern.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set direction using builder pattern.
    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the center reservation policy using builder pattern.
    pub fn with_center_reservation(mut self, reservation: CenterReservation) -> Self {
        self.center_reservation = reservation;
        self
    }

    /// Set the overflow order using builder pattern.
    pub fn with_overflow_order(mut self, order: OverflowOrder) -> Self {
        self.overflow_order = order;
        self
    }

    /// Set the priority demotion policy using builder pattern.
    pub fn with_priority_demotion(mut self, demotion: PriorityDemotion) -> Self {
        self.priority_demotion = demotion;
        self
    }

    /// Set the grace period using builder pattern.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period_ms = grace_period.as_millis() as u64;
        self
    }
}
