//! An in-memory representation provider.
//!
//! [`ScriptedProvider`] keeps representations in memory, counts the calls the
//! tool strip makes and lets the caller decide when representations become
//! ready. It backs this crate's own tests and is useful to hosts that want to
//! exercise layout headlessly.
//!
//! # Example
//!
//! ```
//! use toolstrip::testing::ScriptedProvider;
//! use toolstrip::{Measurement, Size};
//!
//! let provider = ScriptedProvider::new(Measurement {
//!     full_width: 80.0,
//!     icon_width: 32.0,
//!     height: 24.0,
//! })
//! .with_indicator_size(Size::new(40.0, 24.0));
//!
//! assert_eq!(provider.live_count(), 0);
//! ```

use std::collections::HashMap;

use crate::action::{Action, ActionId, TemplateId};
use crate::geometry::{Point, Size};
use crate::representation::{DisplayMode, Measurement, RepresentationProvider, TemplateChoice};

/// Handle to a scripted representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptedHandle(u64);

/// State of one scripted representation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedRepresentation {
    /// The action it was built for; `None` for the overflow indicator.
    pub action: Option<ActionId>,
    /// The template it was built from.
    pub template: TemplateId,
    /// Whether creation has completed.
    pub ready: bool,
    /// Reported natural dimensions.
    pub measurement: Measurement,
    /// Last mode applied.
    pub mode: DisplayMode,
    /// Last position applied.
    pub position: Point,
    /// Last visibility applied.
    pub visible: bool,
}

/// A provider whose representations live in a map.
#[derive(Debug)]
pub struct ScriptedProvider {
    representations: HashMap<ScriptedHandle, ScriptedRepresentation>,
    measurements: HashMap<ActionId, Measurement>,
    default_measurement: Measurement,
    indicator_size: Size,
    auto_ready: bool,
    next_handle: u64,
    created: usize,
    destroyed: usize,
    mode_changes: usize,
}

impl ScriptedProvider {
    /// Create a provider that measures every action with `default_measurement`
    /// and completes creation immediately.
    pub fn new(default_measurement: Measurement) -> Self {
        Self {
            representations: HashMap::new(),
            measurements: HashMap::new(),
            default_measurement,
            indicator_size: Size::new(24.0, 24.0),
            auto_ready: true,
            next_handle: 1,
            created: 0,
            destroyed: 0,
            mode_changes: 0,
        }
    }

    /// Set the indicator's natural size using builder pattern.
    pub fn with_indicator_size(mut self, size: Size) -> Self {
        self.indicator_size = size;
        self
    }

    /// Leave new representations pending until [`complete_all`](Self::complete_all)
    /// or [`complete`](Self::complete) is called.
    pub fn with_deferred_creation(mut self) -> Self {
        self.auto_ready = false;
        self
    }

    /// Set the natural dimensions reported for one action.
    ///
    /// Already created representations of the action are updated too.
    pub fn set_measurement(&mut self, action: ActionId, measurement: Measurement) {
        self.measurements.insert(action, measurement);
        for rep in self.representations.values_mut() {
            if rep.action == Some(action) {
                rep.measurement = measurement;
            }
        }
    }

    /// Complete creation of every pending representation of an action.
    ///
    /// Returns `true` if anything became ready.
    pub fn complete(&mut self, action: ActionId) -> bool {
        let mut completed = false;
        for rep in self.representations.values_mut() {
            if rep.action == Some(action) && !rep.ready {
                rep.ready = true;
                completed = true;
            }
        }
        completed
    }

    /// Complete creation of the overflow indicator.
    pub fn complete_indicator(&mut self) -> bool {
        let mut completed = false;
        for rep in self.representations.values_mut() {
            if rep.action.is_none() && !rep.ready {
                rep.ready = true;
                completed = true;
            }
        }
        completed
    }

    /// Complete creation of every pending representation.
    pub fn complete_all(&mut self) -> usize {
        let mut count = 0;
        for rep in self.representations.values_mut().filter(|rep| !rep.ready) {
            rep.ready = true;
            count += 1;
        }
        count
    }

    /// Look up a representation by handle.
    pub fn representation(&self, handle: &ScriptedHandle) -> Option<&ScriptedRepresentation> {
        self.representations.get(handle)
    }

    /// The live representation built for an action.
    pub fn representation_for(&self, action: ActionId) -> Option<&ScriptedRepresentation> {
        self.representations
            .values()
            .find(|rep| rep.action == Some(action))
    }

    /// The live overflow indicator.
    pub fn indicator(&self) -> Option<&ScriptedRepresentation> {
        self.representations.values().find(|rep| rep.action.is_none())
    }

    /// Number of live (created, not destroyed) representations.
    pub fn live_count(&self) -> usize {
        self.representations.len()
    }

    /// Total number of `create`/`create_indicator` calls.
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Total number of `destroy` calls.
    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    /// Total number of `set_mode` calls.
    pub fn mode_change_count(&self) -> usize {
        self.mode_changes
    }

    fn insert(
        &mut self,
        action: Option<ActionId>,
        template: TemplateId,
        measurement: Measurement,
    ) -> ScriptedHandle {
        let handle = ScriptedHandle(self.next_handle);
        self.next_handle += 1;
        self.created += 1;
        self.representations.insert(
            handle,
            ScriptedRepresentation {
                action,
                template,
                ready: self.auto_ready,
                measurement,
                mode: DisplayMode::Full,
                position: Point::ZERO,
                visible: false,
            },
        );
        handle
    }

    fn get(&self, handle: &ScriptedHandle) -> Measurement {
        self.representations
            .get(handle)
            .map(|rep| rep.measurement)
            .unwrap_or_default()
    }
}

impl RepresentationProvider for ScriptedProvider {
    type Handle = ScriptedHandle;

    fn create(&mut self, action: &Action, template: TemplateChoice) -> ScriptedHandle {
        let measurement = self
            .measurements
            .get(&action.id())
            .copied()
            .unwrap_or(self.default_measurement);
        self.insert(Some(action.id()), template.template_id(), measurement)
    }

    fn create_indicator(&mut self, template: TemplateId) -> ScriptedHandle {
        let measurement = Measurement {
            full_width: self.indicator_size.width,
            icon_width: self.indicator_size.width,
            height: self.indicator_size.height,
        };
        self.insert(None, template, measurement)
    }

    fn is_ready(&self, handle: &ScriptedHandle) -> bool {
        self.representations.get(handle).is_some_and(|rep| rep.ready)
    }

    fn natural_full_width(&self, handle: &ScriptedHandle) -> f32 {
        self.get(handle).full_width
    }

    fn natural_icon_width(&self, handle: &ScriptedHandle) -> f32 {
        self.get(handle).icon_width
    }

    fn natural_height(&self, handle: &ScriptedHandle) -> f32 {
        self.get(handle).height
    }

    fn set_mode(&mut self, handle: &ScriptedHandle, mode: DisplayMode) {
        if let Some(rep) = self.representations.get_mut(handle) {
            rep.mode = mode;
            self.mode_changes += 1;
        }
    }

    fn set_position(&mut self, handle: &ScriptedHandle, position: Point) {
        if let Some(rep) = self.representations.get_mut(handle) {
            rep.position = position;
        }
    }

    fn set_visible(&mut self, handle: &ScriptedHandle, visible: bool) {
        if let Some(rep) = self.representations.get_mut(handle) {
            rep.visible = visible;
        }
    }

    fn destroy(&mut self, handle: ScriptedHandle) {
        if self.representations.remove(&handle).is_some() {
            self.destroyed += 1;
        }
    }
}
