//! The boundary to whatever builds and renders action visuals.
//!
//! The tool strip never draws anything itself. A [`RepresentationProvider`]
//! instantiates one visual per action (possibly asynchronously), measures it,
//! and applies the mode, position and visibility decided by each layout pass.

use std::fmt::Debug;

use crate::action::{Action, TemplateId};
use crate::geometry::Point;

/// How an action is currently rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Full representation (icon and label).
    #[default]
    Full,
    /// Reduced, icon-only representation.
    Icon,
    /// Not rendered; the action is reachable through the overflow indicator
    /// or has been hidden by the consumer.
    Hidden,
}

impl DisplayMode {
    /// Check if the mode renders anything.
    pub fn is_visible(self) -> bool {
        !matches!(self, DisplayMode::Hidden)
    }
}

/// Which template a representation is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateChoice {
    /// The tool strip's default template.
    Default(TemplateId),
    /// A per-action override.
    Custom(TemplateId),
}

impl TemplateChoice {
    /// The template to instantiate.
    pub fn template_id(self) -> TemplateId {
        match self {
            TemplateChoice::Default(id) | TemplateChoice::Custom(id) => id,
        }
    }
}

/// Natural dimensions of a ready representation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    /// Width of the full representation.
    pub full_width: f32,
    /// Width of the icon-only representation.
    pub icon_width: f32,
    /// Height of the representation.
    pub height: f32,
}

/// Creates, measures and updates the visual representations of actions.
///
/// Creation may complete later than [`create`](Self::create) returns. Until
/// [`is_ready`](Self::is_ready) reports `true`, the tool strip treats the
/// representation as pending and declines to lay out. When creation
/// completes, the provider should invalidate the tool strip through its
/// [`InvalidationCoalescer`](crate::InvalidationCoalescer) handle.
pub trait RepresentationProvider {
    /// Handle to one created representation.
    type Handle: Clone + PartialEq + Debug;

    /// Begin building the representation of an action.
    fn create(&mut self, action: &Action, template: TemplateChoice) -> Self::Handle;

    /// Begin building the overflow indicator.
    fn create_indicator(&mut self, template: TemplateId) -> Self::Handle;

    /// Whether the representation has been created and measured.
    fn is_ready(&self, handle: &Self::Handle) -> bool;

    /// Natural width of the full form.
    fn natural_full_width(&self, handle: &Self::Handle) -> f32;

    /// Natural width of the icon-only form.
    fn natural_icon_width(&self, handle: &Self::Handle) -> f32;

    /// Natural height.
    fn natural_height(&self, handle: &Self::Handle) -> f32;

    /// Switch the rendered form.
    fn set_mode(&mut self, handle: &Self::Handle, mode: DisplayMode);

    /// Move the representation within the container.
    fn set_position(&mut self, handle: &Self::Handle, position: Point);

    /// Show or hide the representation.
    fn set_visible(&mut self, handle: &Self::Handle, visible: bool);

    /// Release the representation.
    fn destroy(&mut self, handle: Self::Handle);

    /// Measure a ready representation, `None` while it is pending.
    fn measure(&self, handle: &Self::Handle) -> Option<Measurement> {
        if !self.is_ready(handle) {
            return None;
        }
        Some(Measurement {
            full_width: crate::geometry::sanitize_length(self.natural_full_width(handle)),
            icon_width: crate::geometry::sanitize_length(self.natural_icon_width(handle)),
            height: crate::geometry::sanitize_length(self.natural_height(handle)),
        })
    }
}
