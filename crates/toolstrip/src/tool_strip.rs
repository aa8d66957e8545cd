//! The tool strip.
//!
//! [`ToolStrip`] keeps the ordered action list, drives layout passes and
//! publishes their results. Every mutation is reported to the shared
//! [`InvalidationCoalescer`], which asks the host to call
//! [`ToolStrip::run_pass`] once per burst of changes.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use toolstrip::testing::ScriptedProvider;
//! use toolstrip::{Action, ManualClock, Measurement, PassOutcome, Size, TemplateId, ToolStrip};
//!
//! let provider = ScriptedProvider::new(Measurement {
//!     full_width: 80.0,
//!     icon_width: 32.0,
//!     height: 24.0,
//! })
//! .with_indicator_size(Size::new(40.0, 24.0));
//!
//! let mut strip = ToolStrip::new(provider, || {}, Arc::new(ManualClock::new()))
//!     .with_default_template(TemplateId::new(1))
//!     .with_indicator_template(TemplateId::new(2));
//! strip.set_spacing(8.0);
//! strip.set_container_width(300.0);
//! for label in ["Cut", "Copy", "Paste", "Undo", "Redo"] {
//!     strip.add_action(Arc::new(Action::new(label)));
//! }
//!
//! assert!(strip.run_pass().is_completed());
//! assert_eq!(strip.hidden_actions().len(), 3);
//! assert!(strip.indicator_visible());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use toolstrip_core::logging::{span_names, targets};
use toolstrip_core::{Clock, ConnectionId, PerfSpan, Property, Signal};

use crate::action::{Action, ActionId, TemplateId};
use crate::cache::RepresentationCache;
use crate::coalescer::{InvalidationCoalescer, PassScheduler, Trigger};
use crate::config::{Alignment, TextDirection, ToolStripConfig};
use crate::error::{Result, Unready};
use crate::geometry::{Point, Size, sanitize_length};
use crate::indicator::OverflowIndicator;
use crate::overflow::{OverflowItem, OverflowParams, resolve};
use crate::placement::{PlacementParams, place};
use crate::representation::{DisplayMode, RepresentationProvider, TemplateChoice};

/// Layout decision for one action.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemLayout {
    /// The action.
    pub action: ActionId,
    /// The mode its representation renders in.
    pub mode: DisplayMode,
    /// Top-left corner, `None` when not visible.
    pub position: Option<Point>,
    /// Rendered size, zero when not visible.
    pub size: Size,
}

/// Everything one completed pass decided.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Per action, in list order.
    pub items: Vec<ItemLayout>,
    /// Actions hidden for lack of space, in list order.
    pub hidden_actions: Vec<ActionId>,
    /// Width occupied by the visible actions.
    pub visible_width: f32,
    /// Size the strip would take with no width constraint.
    pub natural_size: Size,
    /// Top-left corner of the overflow indicator when shown.
    pub indicator: Option<Point>,
    /// Height items are centered within.
    pub max_height: f32,
    /// Narrowest useful width: the width of the overflow indicator.
    pub minimum_width: f32,
}

impl LayoutResult {
    fn empty(minimum_width: f32) -> Self {
        Self {
            items: Vec::new(),
            hidden_actions: Vec::new(),
            visible_width: 0.0,
            natural_size: Size::ZERO,
            indicator: None,
            max_height: 0.0,
            minimum_width,
        }
    }

    /// The layout decided for one action.
    pub fn item(&self, id: ActionId) -> Option<&ItemLayout> {
        self.items.iter().find(|item| item.action == id)
    }
}

/// Result of [`ToolStrip::run_pass`].
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// No pass was scheduled, or one is already running.
    Idle,
    /// The pass declined to run; published values are unchanged.
    NotReady(Unready),
    /// The pass completed.
    Completed {
        /// Whether any published value changed.
        changed: bool,
    },
}

impl PassOutcome {
    /// Check if the pass completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, PassOutcome::Completed { .. })
    }
}

/// A horizontal strip of actions that overflows into an indicator.
pub struct ToolStrip<P: RepresentationProvider> {
    provider: P,
    clock: Arc<dyn Clock>,
    coalescer: Arc<InvalidationCoalescer>,

    actions: Vec<Arc<Action>>,
    actions_dirty: bool,
    connections: HashMap<ActionId, ConnectionId>,
    cache: RepresentationCache<P::Handle>,
    indicator: OverflowIndicator<P::Handle>,

    config: ToolStripConfig,
    container_width: f32,
    default_template: Option<TemplateId>,
    indicator_template: Option<TemplateId>,

    last_layout: Option<LayoutResult>,
    visible_width: Property<f32>,
    natural_size: Property<Size>,
    hidden_actions: Property<Vec<ActionId>>,
    minimum_width: Property<f32>,

    /// Emitted when the width occupied by visible actions changes.
    pub visible_width_changed: Signal<f32>,
    /// Emitted when the unconstrained size changes.
    pub natural_size_changed: Signal<Size>,
    /// Emitted when the set of overflowed actions changes.
    pub hidden_actions_changed: Signal<Vec<ActionId>>,
    /// Emitted when the overflow indicator's width changes.
    pub minimum_width_changed: Signal<f32>,
    /// Emitted once after the first completed pass following any number of
    /// additions or removals.
    pub actions_changed: Signal<()>,
    /// Emitted after every completed pass.
    pub layout_completed: Signal<()>,
}

impl<P: RepresentationProvider> ToolStrip<P> {
    /// Create an empty tool strip.
    ///
    /// `scheduler` is called whenever a pass should run; the host answers by
    /// calling [`run_pass`](Self::run_pass) from its event loop.
    pub fn new(provider: P, scheduler: impl PassScheduler + 'static, clock: Arc<dyn Clock>) -> Self {
        let config = ToolStripConfig::default();
        let coalescer = Arc::new(InvalidationCoalescer::new(scheduler, config.grace_period()));
        Self {
            provider,
            clock,
            coalescer,
            actions: Vec::new(),
            actions_dirty: false,
            connections: HashMap::new(),
            cache: RepresentationCache::new(),
            indicator: OverflowIndicator::new(),
            config,
            container_width: 0.0,
            default_template: None,
            indicator_template: None,
            last_layout: None,
            visible_width: Property::new(0.0),
            natural_size: Property::new(Size::ZERO),
            hidden_actions: Property::new(Vec::new()),
            minimum_width: Property::new(0.0),
            visible_width_changed: Signal::new(),
            natural_size_changed: Signal::new(),
            hidden_actions_changed: Signal::new(),
            minimum_width_changed: Signal::new(),
            actions_changed: Signal::new(),
            layout_completed: Signal::new(),
        }
    }

    /// The representation provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the representation provider.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// The shared coalescer, for invalidating from completion callbacks.
    pub fn invalidator(&self) -> Arc<InvalidationCoalescer> {
        self.coalescer.clone()
    }

    /// Report that a pending representation finished creation.
    pub fn representation_ready(&self) {
        self.coalescer.invalidate(Trigger::RepresentationReady);
    }

    // =========================================================================
    // Actions - Add
    // =========================================================================

    /// Append an action.
    ///
    /// Returns `false` if the action is already in the strip.
    pub fn add_action(&mut self, action: Arc<Action>) -> bool {
        let index = self.actions.len();
        self.insert_action(index, action)
    }

    /// Insert an action at `index`, clamped to the list length.
    ///
    /// Returns `false` if the action is already in the strip.
    pub fn insert_action(&mut self, index: usize, action: Arc<Action>) -> bool {
        let id = action.id();
        if self.contains(id) {
            tracing::warn!(target: targets::PASS, action = %id, "action already in tool strip");
            return false;
        }

        let index = index.min(self.actions.len());
        self.cache.claim(id);
        let weak: Weak<InvalidationCoalescer> = Arc::downgrade(&self.coalescer);
        let connection = action.changed.connect(move |_| {
            if let Some(coalescer) = weak.upgrade() {
                coalescer.invalidate(Trigger::ActionChanged);
            }
        });
        self.connections.insert(id, connection);
        self.actions.insert(index, action);
        self.actions_dirty = true;
        self.coalescer.invalidate(Trigger::ActionAdded);
        true
    }

    /// Replace the whole action list.
    ///
    /// Actions present before and after keep their representations.
    pub fn set_actions(&mut self, actions: impl IntoIterator<Item = Arc<Action>>) {
        self.clear();
        for action in actions {
            self.add_action(action);
        }
    }

    // =========================================================================
    // Actions - Remove
    // =========================================================================

    /// Remove an action.
    ///
    /// Its representation is hidden at once and kept for the grace period in
    /// case the action returns.
    pub fn remove_action(&mut self, id: ActionId) -> Option<Arc<Action>> {
        let index = self.index_of(id)?;
        let action = self.actions.remove(index);
        self.detach(&action);
        self.cache.hide_retired(&mut self.provider);
        self.actions_dirty = true;
        self.coalescer.note_removal(self.clock.now());
        self.coalescer.invalidate(Trigger::ActionRemoved);
        Some(action)
    }

    /// Remove every action.
    pub fn clear(&mut self) {
        if self.actions.is_empty() {
            return;
        }
        for action in std::mem::take(&mut self.actions) {
            self.detach(&action);
        }
        self.cache.hide_retired(&mut self.provider);
        self.actions_dirty = true;
        self.coalescer.note_removal(self.clock.now());
        self.coalescer.invalidate(Trigger::ActionsCleared);
    }

    fn detach(&mut self, action: &Action) {
        if let Some(connection) = self.connections.remove(&action.id()) {
            action.changed.disconnect(connection);
        }
        self.cache.retire(action.id());
    }

    // =========================================================================
    // Actions - Query
    // =========================================================================

    /// The actions, in display order.
    pub fn actions(&self) -> &[Arc<Action>] {
        &self.actions
    }

    /// Number of actions.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Check if the strip has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Check if an action is in the strip.
    pub fn contains(&self, id: ActionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// Position of an action in the list.
    pub fn index_of(&self, id: ActionId) -> Option<usize> {
        self.actions.iter().position(|action| action.id() == id)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// The current configuration.
    pub fn config(&self) -> &ToolStripConfig {
        &self.config
    }

    /// Replace the whole configuration.
    pub fn set_config(&mut self, config: ToolStripConfig) -> Result<()> {
        config.validate()?;
        if self.config != config {
            self.coalescer.set_grace_period(config.grace_period());
            self.config = config;
            self.coalescer.invalidate(Trigger::ConfigChanged);
        }
        Ok(())
    }

    /// Set the configuration using builder pattern.
    pub fn with_config(mut self, config: ToolStripConfig) -> Result<Self> {
        self.set_config(config)?;
        Ok(self)
    }

    /// Space between adjacent items.
    pub fn spacing(&self) -> f32 {
        self.config.spacing
    }

    /// Set the space between adjacent items.
    ///
    /// Negative or non-finite values are ignored.
    pub fn set_spacing(&mut self, spacing: f32) {
        if !spacing.is_finite() || spacing < 0.0 {
            tracing::warn!(target: targets::CONFIG, spacing, "ignoring invalid spacing");
            return;
        }
        if self.config.spacing != spacing {
            self.config.spacing = spacing;
            self.coalescer.invalidate(Trigger::SpacingChanged);
        }
    }

    /// Alignment of the visible items.
    pub fn alignment(&self) -> Alignment {
        self.config.alignment
    }

    /// Set the alignment of the visible items.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        if self.config.alignment != alignment {
            self.config.alignment = alignment;
            self.coalescer.invalidate(Trigger::AlignmentChanged);
        }
    }

    /// Layout direction.
    pub fn direction(&self) -> TextDirection {
        self.config.direction
    }

    /// Set the layout direction.
    pub fn set_direction(&mut self, direction: TextDirection) {
        if self.config.direction != direction {
            self.config.direction = direction;
            self.coalescer.invalidate(Trigger::DirectionChanged);
        }
    }

    /// Template used for actions without an override.
    pub fn default_template(&self) -> Option<TemplateId> {
        self.default_template
    }

    /// Set the template used for actions without an override.
    pub fn set_default_template(&mut self, template: Option<TemplateId>) {
        if self.default_template != template {
            self.default_template = template;
            self.coalescer.invalidate(Trigger::TemplateChanged);
        }
    }

    /// Set the default template using builder pattern.
    pub fn with_default_template(mut self, template: TemplateId) -> Self {
        self.set_default_template(Some(template));
        self
    }

    /// Template of the overflow indicator.
    pub fn indicator_template(&self) -> Option<TemplateId> {
        self.indicator_template
    }

    /// Set the template of the overflow indicator.
    pub fn set_indicator_template(&mut self, template: Option<TemplateId>) {
        if self.indicator_template != template {
            self.indicator_template = template;
            self.coalescer.invalidate(Trigger::TemplateChanged);
        }
    }

    /// Set the indicator template using builder pattern.
    pub fn with_indicator_template(mut self, template: TemplateId) -> Self {
        self.set_indicator_template(Some(template));
        self
    }

    /// Width of the container.
    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    /// Resize the container.
    ///
    /// Negative or non-finite widths are treated as zero.
    pub fn set_container_width(&mut self, width: f32) {
        let sanitized = sanitize_length(width);
        if sanitized != width {
            tracing::warn!(target: targets::CONFIG, width, "clamping invalid container width");
        }
        if self.container_width != sanitized {
            self.container_width = sanitized;
            self.coalescer.invalidate(Trigger::Resized);
        }
    }

    // =========================================================================
    // Published Results
    // =========================================================================

    /// Width occupied by the visible actions after the last completed pass.
    pub fn visible_width(&self) -> f32 {
        self.visible_width.get()
    }

    /// Unconstrained size after the last completed pass.
    pub fn natural_size(&self) -> Size {
        self.natural_size.get()
    }

    /// Actions hidden for lack of space after the last completed pass.
    pub fn hidden_actions(&self) -> Vec<ActionId> {
        self.hidden_actions.get()
    }

    /// Width of the overflow indicator, zero until it has been measured.
    ///
    /// Hosts should not shrink the container below this width.
    pub fn minimum_width(&self) -> f32 {
        self.minimum_width.get()
    }

    /// Whether the overflow indicator is shown.
    pub fn indicator_visible(&self) -> bool {
        self.indicator.is_visible()
    }

    /// The result of the last completed pass.
    pub fn last_layout(&self) -> Option<&LayoutResult> {
        self.last_layout.as_ref()
    }

    // =========================================================================
    // Passes
    // =========================================================================

    /// Run the scheduled pass.
    ///
    /// Returns [`PassOutcome::Idle`] when nothing is scheduled. Invalidations
    /// raised while the pass runs schedule exactly one follow-up pass.
    pub fn run_pass(&mut self) -> PassOutcome {
        let coalescer = self.coalescer.clone();
        let Some(_guard) = coalescer.begin_pass() else {
            return PassOutcome::Idle;
        };
        let _perf = PerfSpan::new(span_names::PASS);

        match self.layout() {
            Ok(result) => {
                let changed = self.publish(result);
                PassOutcome::Completed { changed }
            }
            Err(reason) => {
                tracing::warn!(target: targets::PASS, %reason, "layout pass not ready");
                PassOutcome::NotReady(reason)
            }
        }
    }

    /// Schedule a pass and run it immediately.
    pub fn force_pass(&mut self) -> PassOutcome {
        self.coalescer.invalidate(Trigger::Forced);
        self.run_pass()
    }

    fn template_choice(&self, action: &Action) -> std::result::Result<TemplateChoice, Unready> {
        match (action.template(), self.default_template) {
            (Some(custom), _) => Ok(TemplateChoice::Custom(custom)),
            (None, Some(default)) => Ok(TemplateChoice::Default(default)),
            (None, None) => Err(Unready::TemplateNotConfigured),
        }
    }

    fn layout(&mut self) -> std::result::Result<LayoutResult, Unready> {
        self.cache.hide_retired(&mut self.provider);

        if self.actions.iter().all(|action| action.is_explicitly_hidden()) {
            for action in &self.actions {
                self.cache
                    .apply(&mut self.provider, action.id(), DisplayMode::Hidden, None);
            }
            self.indicator.apply(&mut self.provider, None);
            let mut result = LayoutResult::empty(self.minimum_width.get());
            result.items = self
                .actions
                .iter()
                .map(|action| ItemLayout {
                    action: action.id(),
                    mode: DisplayMode::Hidden,
                    position: None,
                    size: Size::ZERO,
                })
                .collect();
            return Ok(result);
        }

        // Request everything before checking readiness, so pending creations
        // proceed together. Only actions that can render in the strip get a
        // representation.
        let indicator_template = self
            .indicator_template
            .ok_or(Unready::IndicatorTemplateNotConfigured)?;
        let mut choices = Vec::with_capacity(self.actions.len());
        for action in &self.actions {
            choices.push(if action.is_explicitly_hidden() || action.always_overflow() {
                None
            } else {
                Some(self.template_choice(action)?)
            });
        }

        self.indicator.ensure(&mut self.provider, indicator_template);
        let mut handles = Vec::with_capacity(self.actions.len());
        for (action, choice) in self.actions.iter().zip(&choices) {
            handles.push(choice.map(|choice| self.cache.ensure(&mut self.provider, action, choice)));
        }

        let indicator = self
            .indicator
            .measure(&self.provider)
            .ok_or(Unready::IndicatorNotReady)?;
        let mut items = Vec::with_capacity(self.actions.len());
        for (action, handle) in self.actions.iter().zip(&handles) {
            let item = match handle {
                Some(handle) => {
                    let measurement = self
                        .provider
                        .measure(handle)
                        .ok_or(Unready::RepresentationPending { action: action.id() })?;
                    OverflowItem {
                        full_width: measurement.full_width,
                        icon_width: measurement.icon_width,
                        height: measurement.height,
                        keep_visible: action.keep_visible(),
                        explicitly_hidden: false,
                        icon_only: action.is_icon_only(),
                        always_overflow: false,
                    }
                }
                None => OverflowItem {
                    explicitly_hidden: action.is_explicitly_hidden(),
                    always_overflow: action.always_overflow(),
                    ..OverflowItem::default()
                },
            };
            items.push(item);
        }

        let config = &self.config;
        let resolution = resolve(
            &items,
            &OverflowParams {
                available_width: self.container_width,
                spacing: config.spacing,
                indicator,
                alignment: config.alignment,
                center_reservation: config.center_reservation,
                overflow_order: config.overflow_order,
                priority_demotion: config.priority_demotion,
            },
        );
        let placement = place(
            &items,
            &resolution,
            &PlacementParams {
                available_width: self.container_width,
                spacing: config.spacing,
                indicator,
                alignment: config.alignment,
                direction: config.direction,
                center_reservation: config.center_reservation,
            },
        );

        let mut layout_items = Vec::with_capacity(self.actions.len());
        for (index, action) in self.actions.iter().enumerate() {
            let mode = resolution.modes[index];
            let position = placement.positions[index];
            self.cache
                .apply(&mut self.provider, action.id(), mode, position);
            let size = if mode.is_visible() {
                Size::new(items[index].width(mode), items[index].height)
            } else {
                Size::ZERO
            };
            layout_items.push(ItemLayout {
                action: action.id(),
                mode,
                position,
                size,
            });
        }
        self.indicator.apply(&mut self.provider, placement.indicator);

        Ok(LayoutResult {
            items: layout_items,
            hidden_actions: resolution
                .hidden
                .iter()
                .map(|&index| self.actions[index].id())
                .collect(),
            visible_width: resolution.consumed_width,
            natural_size: Size::new(resolution.natural_width, resolution.content_height),
            indicator: placement.indicator,
            max_height: placement.max_height,
            minimum_width: indicator.width,
        })
    }

    fn publish(&mut self, result: LayoutResult) -> bool {
        let mut changed = false;

        if self.visible_width.set(result.visible_width) {
            self.visible_width_changed.emit(result.visible_width);
            changed = true;
        }
        if self.natural_size.set(result.natural_size) {
            self.natural_size_changed.emit(result.natural_size);
            changed = true;
        }
        if self.hidden_actions.set(result.hidden_actions.clone()) {
            self.hidden_actions_changed.emit(result.hidden_actions.clone());
            changed = true;
        }
        if self.minimum_width.set(result.minimum_width) {
            self.minimum_width_changed.emit(result.minimum_width);
            changed = true;
        }

        tracing::debug!(
            target: targets::PASS,
            actions = result.items.len(),
            hidden = result.hidden_actions.len(),
            visible_width = result.visible_width,
            indicator = result.indicator.is_some(),
            changed,
            "layout pass completed"
        );
        self.last_layout = Some(result);
        if std::mem::take(&mut self.actions_dirty) {
            self.actions_changed.emit(());
        }
        self.layout_completed.emit(());
        changed
    }

    // =========================================================================
    // Eviction
    // =========================================================================

    /// Evict retired representations if the grace period has expired.
    ///
    /// Returns the number of representations destroyed.
    pub fn poll_timers(&mut self) -> usize {
        if !self.coalescer.poll_eviction(self.clock.now()) {
            return 0;
        }
        let _perf = PerfSpan::new(span_names::EVICTION);
        self.cache.evict_stale(&mut self.provider)
    }

    /// Time until [`poll_timers`](Self::poll_timers) has work to do.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.coalescer.time_until_eviction(self.clock.now())
    }
}

impl<P: RepresentationProvider> std::fmt::Debug for ToolStrip<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolStrip")
            .field("actions", &self.actions.len())
            .field("config", &self.config)
            .field("container_width", &self.container_width)
            .field("coalescer", &self.coalescer)
            .finish_non_exhaustive()
    }
}

impl<P: RepresentationProvider> Drop for ToolStrip<P> {
    fn drop(&mut self) {
        for action in &self.actions {
            if let Some(connection) = self.connections.remove(&action.id()) {
                action.changed.disconnect(connection);
            }
        }
        self.cache.destroy_all(&mut self.provider);
        self.indicator.destroy(&mut self.provider);
    }
}
