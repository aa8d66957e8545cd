//! The overflow indicator.
//!
//! A single "more actions" representation, created lazily the first time a
//! pass needs it and kept for the lifetime of the tool strip. It is shown only
//! while at least one action is hidden for lack of space.

use toolstrip_core::logging::targets;

use crate::action::TemplateId;
use crate::geometry::{Point, Size};
use crate::representation::RepresentationProvider;

/// Owns the overflow indicator's representation.
#[derive(Debug)]
pub struct OverflowIndicator<H> {
    handle: Option<H>,
    template: Option<TemplateId>,
    position: Option<Point>,
    visible: Option<bool>,
}

impl<H> Default for OverflowIndicator<H> {
    fn default() -> Self {
        Self {
            handle: None,
            template: None,
            position: None,
            visible: None,
        }
    }
}

impl<H: Clone + PartialEq + std::fmt::Debug> OverflowIndicator<H> {
    /// Create a controller with no representation yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The indicator's handle, if it has been requested.
    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    /// Whether the indicator is currently shown.
    pub fn is_visible(&self) -> bool {
        self.visible == Some(true)
    }

    /// Request the indicator's representation.
    ///
    /// Creation happens once; a different template rebuilds it.
    pub fn ensure<P>(&mut self, provider: &mut P, template: TemplateId) -> H
    where
        P: RepresentationProvider<Handle = H>,
    {
        if let Some(handle) = &self.handle
            && self.template == Some(template)
        {
            return handle.clone();
        }

        if let Some(stale) = self.handle.take() {
            provider.destroy(stale);
        }
        tracing::debug!(target: targets::CACHE, ?template, "creating overflow indicator");
        let handle = provider.create_indicator(template);
        self.handle = Some(handle.clone());
        self.template = Some(template);
        self.position = None;
        self.visible = None;
        handle
    }

    /// Natural size of the indicator, `None` until it is created and ready.
    pub fn measure<P>(&self, provider: &P) -> Option<Size>
    where
        P: RepresentationProvider<Handle = H>,
    {
        let handle = self.handle.as_ref()?;
        provider
            .measure(handle)
            .map(|m| Size::new(m.full_width, m.height))
    }

    /// Show the indicator at `position`, or hide it with `None`.
    pub fn apply<P>(&mut self, provider: &mut P, position: Option<Point>)
    where
        P: RepresentationProvider<Handle = H>,
    {
        let Some(handle) = &self.handle else {
            return;
        };

        if let Some(position) = position
            && self.position != Some(position)
        {
            provider.set_position(handle, position);
            self.position = Some(position);
        }
        let visible = position.is_some();
        if self.visible != Some(visible) {
            provider.set_visible(handle, visible);
            self.visible = Some(visible);
        }
    }

    /// Release the representation.
    pub fn destroy<P>(&mut self, provider: &mut P)
    where
        P: RepresentationProvider<Handle = H>,
    {
        if let Some(handle) = self.handle.take() {
            provider.destroy(handle);
        }
        self.template = None;
        self.position = None;
        self.visible = None;
    }
}
