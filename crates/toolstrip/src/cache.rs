//! Per-action representation cache.
//!
//! The cache owns one representation handle per action and reuses it across
//! layout passes. Removing an action only *retires* its record: the handle
//! survives until [`RepresentationCache::evict_stale`] runs, so an action that
//! is removed and re-added within the grace period keeps its representation.
//!
//! The cache also remembers the mode, position and visibility last applied to
//! each representation, so a pass only calls into the provider for values
//! that actually changed.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use toolstrip_core::logging::targets;

use crate::action::{Action, ActionId};
use crate::geometry::Point;
use crate::representation::{DisplayMode, RepresentationProvider, TemplateChoice};

/// One cached representation.
#[derive(Debug, Clone)]
struct Record<H> {
    handle: H,
    template: TemplateChoice,
    retired: bool,
    mode: Option<DisplayMode>,
    position: Option<Point>,
    visible: Option<bool>,
}

impl<H> Record<H> {
    fn new(handle: H, template: TemplateChoice) -> Self {
        Self {
            handle,
            template,
            retired: false,
            mode: None,
            position: None,
            visible: None,
        }
    }
}

/// Representation handles keyed by action identity.
#[derive(Debug)]
pub struct RepresentationCache<H> {
    records: HashMap<ActionId, Record<H>>,
}

impl<H> Default for RepresentationCache<H> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<H: Clone + PartialEq + std::fmt::Debug> RepresentationCache<H> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The handle cached for an action.
    pub fn get(&self, id: ActionId) -> Option<&H> {
        self.records.get(&id).map(|record| &record.handle)
    }

    /// Check if a record exists for an action, retired or not.
    pub fn contains(&self, id: ActionId) -> bool {
        self.records.contains_key(&id)
    }

    /// Check if an action's record is waiting for eviction.
    pub fn is_retired(&self, id: ActionId) -> bool {
        self.records.get(&id).is_some_and(|record| record.retired)
    }

    /// Number of records, including retired ones.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of retired records.
    pub fn retired_count(&self) -> usize {
        self.records.values().filter(|record| record.retired).count()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Return the action's handle, creating the representation if needed.
    ///
    /// A retired record is claimed back. If the cached representation was
    /// built from a different template, it is destroyed and rebuilt.
    pub fn ensure<P>(&mut self, provider: &mut P, action: &Action, template: TemplateChoice) -> H
    where
        P: RepresentationProvider<Handle = H>,
    {
        let id = action.id();
        match self.records.entry(id) {
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                record.retired = false;
                if record.template != template {
                    tracing::debug!(
                        target: targets::CACHE,
                        action = %id,
                        ?template,
                        "template changed, rebuilding representation"
                    );
                    let fresh = Record::new(provider.create(action, template), template);
                    let stale = std::mem::replace(record, fresh);
                    provider.destroy(stale.handle);
                }
                record.handle.clone()
            }
            Entry::Vacant(entry) => {
                tracing::debug!(target: targets::CACHE, action = %id, ?template, "creating representation");
                let handle = provider.create(action, template);
                entry.insert(Record::new(handle.clone(), template));
                handle
            }
        }
    }

    /// Take a retired record back into use.
    ///
    /// Returns `true` if the record was retired.
    pub fn claim(&mut self, id: ActionId) -> bool {
        match self.records.get_mut(&id) {
            Some(record) if record.retired => {
                record.retired = false;
                tracing::trace!(target: targets::CACHE, action = %id, "claimed retired representation");
                true
            }
            _ => false,
        }
    }

    /// Mark an action's record as eligible for eviction.
    ///
    /// Returns `true` if a live record was retired.
    pub fn retire(&mut self, id: ActionId) -> bool {
        match self.records.get_mut(&id) {
            Some(record) if !record.retired => {
                record.retired = true;
                tracing::trace!(target: targets::CACHE, action = %id, "retired representation");
                true
            }
            _ => false,
        }
    }

    /// Hide every retired representation that is still shown.
    pub fn hide_retired<P>(&mut self, provider: &mut P)
    where
        P: RepresentationProvider<Handle = H>,
    {
        for record in self.records.values_mut().filter(|record| record.retired) {
            if record.visible != Some(false) {
                provider.set_visible(&record.handle, false);
                record.visible = Some(false);
            }
        }
    }

    /// Destroy every retired representation. Returns how many were destroyed.
    pub fn evict_stale<P>(&mut self, provider: &mut P) -> usize
    where
        P: RepresentationProvider<Handle = H>,
    {
        let stale: Vec<ActionId> = self
            .records
            .iter()
            .filter(|(_, record)| record.retired)
            .map(|(id, _)| *id)
            .collect();

        for id in &stale {
            if let Some(record) = self.records.remove(id) {
                provider.destroy(record.handle);
            }
        }

        if !stale.is_empty() {
            tracing::debug!(target: targets::CACHE, evicted = stale.len(), "evicted stale representations");
        }
        stale.len()
    }

    /// Destroy every representation, retired or not.
    pub fn destroy_all<P>(&mut self, provider: &mut P)
    where
        P: RepresentationProvider<Handle = H>,
    {
        for (_, record) in self.records.drain() {
            provider.destroy(record.handle);
        }
    }

    // =========================================================================
    // Applying Layout
    // =========================================================================

    /// Push a layout decision to an action's representation.
    ///
    /// Hidden modes hide the representation and leave its position alone. Only
    /// values that differ from the last applied ones reach the provider.
    /// Returns `true` if anything was applied.
    pub fn apply<P>(
        &mut self,
        provider: &mut P,
        id: ActionId,
        mode: DisplayMode,
        position: Option<Point>,
    ) -> bool
    where
        P: RepresentationProvider<Handle = H>,
    {
        let Some(record) = self.records.get_mut(&id) else {
            return false;
        };

        let mut applied = false;
        if record.mode != Some(mode) {
            provider.set_mode(&record.handle, mode);
            record.mode = Some(mode);
            applied = true;
        }
        if let Some(position) = position
            && record.position != Some(position)
        {
            provider.set_position(&record.handle, position);
            record.position = Some(position);
            applied = true;
        }
        let visible = mode.is_visible();
        if record.visible != Some(visible) {
            provider.set_visible(&record.handle, visible);
            record.visible = Some(visible);
            applied = true;
        }
        applied
    }
}
