//! Overflow resolution.
//!
//! Given the natural sizes of every action, the available width and the
//! priority flags, [`resolve`] decides which actions render fully, which
//! render as icons and which move into the overflow indicator.
//!
//! # Algorithm
//!
//! 1. **Classify.** Explicitly hidden actions are excluded from all width
//!    accounting. Actions that always overflow are excluded too, but go
//!    straight to the hidden list. Every other action tentatively takes its
//!    preferred mode (Icon when it is icon-only, Full otherwise). The sum of
//!    those widths plus inter-item spacing is the natural width of the strip.
//! 2. **Fits check.** The layout width is the available width minus room for
//!    the overflow indicator (twice under symmetric center alignment). If the
//!    natural width fits, every tentative mode stands.
//! 3. **Resolve.** Otherwise the items are walked once, in order, keeping a
//!    running consumed width. Items that fit with room to spare keep their
//!    mode; an item landing exactly on the limit counts as not fitting. Those
//!    that do not fit are hidden, unless they are `keep_visible`: those fall back to
//!    their icon form and reclaim space by hiding the nearest earlier
//!    visible non-priority items. A priority item is itself hidden only when
//!    nothing is left to reclaim.
//!
//! Each reclamation permanently removes one item from consideration, so the
//! walk is linear in the number of items.
//!
//! The function is pure: identical inputs give identical outputs.

use crate::config::{Alignment, CenterReservation, OverflowOrder, PriorityDemotion};
use crate::geometry::Size;
use crate::representation::DisplayMode;

/// Layout inputs for one action.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverflowItem {
    /// Natural width of the full form.
    pub full_width: f32,
    /// Natural width of the icon form.
    pub icon_width: f32,
    /// Natural height.
    pub height: f32,
    /// Priority hint.
    pub keep_visible: bool,
    /// Consumer-controlled visibility override.
    pub explicitly_hidden: bool,
    /// Always use the icon form.
    pub icon_only: bool,
    /// Never render in the strip; always listed in the overflow.
    pub always_overflow: bool,
}

impl OverflowItem {
    /// Width of the item when rendered in `mode`.
    pub fn width(&self, mode: DisplayMode) -> f32 {
        match mode {
            DisplayMode::Full => self.full_width,
            DisplayMode::Icon => self.icon_width,
            DisplayMode::Hidden => 0.0,
        }
    }

    /// The mode the item takes when space is not a concern.
    pub fn preferred_mode(&self) -> DisplayMode {
        if self.explicitly_hidden || self.always_overflow {
            DisplayMode::Hidden
        } else if self.icon_only {
            DisplayMode::Icon
        } else {
            DisplayMode::Full
        }
    }
}

/// Container-level inputs to [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverflowParams {
    /// Width of the container.
    pub available_width: f32,
    /// Space between adjacent items.
    pub spacing: f32,
    /// Natural size of the overflow indicator.
    pub indicator: Size,
    /// Alignment of the visible items.
    pub alignment: Alignment,
    /// Indicator reservation under center alignment.
    pub center_reservation: CenterReservation,
    /// Eligibility after the first overflow.
    pub overflow_order: OverflowOrder,
    /// Priority fallback order.
    pub priority_demotion: PriorityDemotion,
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Display mode per item, in input order.
    pub modes: Vec<DisplayMode>,
    /// Indices of items shown through the overflow indicator, in input order.
    ///
    /// Explicitly hidden items never appear here.
    pub hidden: Vec<usize>,
    /// Unconstrained width: every non-excluded item at its preferred mode.
    pub natural_width: f32,
    /// Tallest item that takes part in width accounting.
    pub content_height: f32,
    /// Width occupied by the visible items.
    pub consumed_width: f32,
    /// Width the visible items were allowed to occupy.
    pub layout_width: f32,
    /// Whether the overflow indicator is needed.
    pub indicator_visible: bool,
}

impl Resolution {
    /// Height the strip needs: the tallest item, or the indicator if taller
    /// and shown.
    pub fn max_height(&self, indicator: Size) -> f32 {
        if self.indicator_visible {
            self.content_height.max(indicator.height)
        } else {
            self.content_height
        }
    }
}

/// Width left for items once room for the indicator is held back.
///
/// Under symmetric center alignment the indicator's room is held back on both
/// sides, so centered content does not shift when the indicator appears.
pub fn layout_width(
    available_width: f32,
    spacing: f32,
    indicator_width: f32,
    alignment: Alignment,
    reservation: CenterReservation,
) -> f32 {
    let reserved = indicator_width + spacing;
    let mut width = available_width - reserved;
    if alignment == Alignment::Center && reservation == CenterReservation::Symmetric {
        width -= reserved;
    }
    width
}

/// Sum of `width + spacing` over the visible items, minus one trailing spacing.
pub fn visible_width(items: &[OverflowItem], modes: &[DisplayMode], spacing: f32) -> f32 {
    let mut total = 0.0;
    let mut count = 0usize;
    for (item, &mode) in items.iter().zip(modes) {
        if mode.is_visible() {
            total += item.width(mode) + spacing;
            count += 1;
        }
    }
    if count > 0 { total - spacing } else { 0.0 }
}

/// Decide the display mode of every item.
pub fn resolve(items: &[OverflowItem], params: &OverflowParams) -> Resolution {
    let spacing = params.spacing;

    // Step 1: classify.
    let mut modes: Vec<DisplayMode> = items.iter().map(OverflowItem::preferred_mode).collect();
    let natural_width = visible_width(items, &modes, spacing);
    let content_height = items
        .iter()
        .zip(&modes)
        .filter(|(_, mode)| mode.is_visible())
        .map(|(item, _)| item.height)
        .fold(0.0_f32, f32::max);
    let participating = modes.iter().any(|mode| mode.is_visible());

    // Step 2: fits check.
    let layout_width = layout_width(
        params.available_width,
        spacing,
        params.indicator.width,
        params.alignment,
        params.center_reservation,
    );

    if participating && natural_width > layout_width {
        // Step 3: overflow resolution.
        let mut walk = Walk {
            items,
            modes: &mut modes,
            limit: layout_width,
            spacing,
            consumed: 0.0,
            reclaimable: Vec::new(),
        };
        walk.run(params.overflow_order, params.priority_demotion);
    }

    let hidden: Vec<usize> = items
        .iter()
        .zip(&modes)
        .enumerate()
        .filter(|(_, (item, mode))| !item.explicitly_hidden && !mode.is_visible())
        .map(|(index, _)| index)
        .collect();
    let consumed_width = visible_width(items, &modes, spacing);
    let indicator_visible = !hidden.is_empty();

    Resolution {
        modes,
        hidden,
        natural_width,
        content_height,
        consumed_width,
        layout_width,
        indicator_visible,
    }
}

/// State of the single forward walk of step 3.
struct Walk<'a> {
    items: &'a [OverflowItem],
    modes: &'a mut [DisplayMode],
    limit: f32,
    spacing: f32,
    /// Width of the visible items so far, each followed by one spacing.
    consumed: f32,
    /// Visible non-priority items, nearest last.
    reclaimable: Vec<usize>,
}

impl Walk<'_> {
    fn run(&mut self, order: OverflowOrder, demotion: PriorityDemotion) {
        let mut overflowing = false;

        for index in 0..self.items.len() {
            let mode = self.modes[index];
            if !mode.is_visible() {
                continue;
            }
            let item = self.items[index];

            let closed = overflowing && order == OverflowOrder::Contiguous && !item.keep_visible;
            if !closed && self.fits_with_room(item.width(mode)) {
                self.admit(index, mode);
                continue;
            }

            overflowing = true;
            if !item.keep_visible {
                self.modes[index] = DisplayMode::Hidden;
                continue;
            }

            let resolved = match demotion {
                PriorityDemotion::IconFirst => self.place_icon_first(item, mode),
                PriorityDemotion::EvictFirst => self.place_evict_first(item, mode),
            };
            self.modes[index] = resolved;
            if resolved.is_visible() {
                self.admit(index, resolved);
            }
        }
    }

    /// An item that exactly fills the remaining width does not keep its place.
    fn fits_with_room(&self, width: f32) -> bool {
        self.consumed + width < self.limit
    }

    fn fits(&self, width: f32) -> bool {
        self.consumed + width <= self.limit
    }

    fn admit(&mut self, index: usize, mode: DisplayMode) {
        let item = &self.items[index];
        self.consumed += item.width(mode) + self.spacing;
        if !item.keep_visible {
            self.reclaimable.push(index);
        }
    }

    /// Hide the nearest earlier visible non-priority item.
    fn reclaim_one(&mut self) -> bool {
        let Some(victim) = self.reclaimable.pop() else {
            return false;
        };
        let width = self.items[victim].width(self.modes[victim]);
        self.consumed -= width + self.spacing;
        self.modes[victim] = DisplayMode::Hidden;
        true
    }

    fn place_icon_first(&mut self, item: OverflowItem, preferred: DisplayMode) -> DisplayMode {
        if self.fits(item.icon_width) {
            return DisplayMode::Icon;
        }
        while self.reclaim_one() {
            if self.fits(item.width(preferred)) {
                return preferred;
            }
            if self.fits(item.icon_width) {
                return DisplayMode::Icon;
            }
        }
        DisplayMode::Hidden
    }

    fn place_evict_first(&mut self, item: OverflowItem, preferred: DisplayMode) -> DisplayMode {
        while self.reclaim_one() {
            if self.fits(item.width(preferred)) {
                return preferred;
            }
        }
        if self.fits(item.icon_width) {
            DisplayMode::Icon
        } else {
            DisplayMode::Hidden
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(full: f32, icon: f32) -> OverflowItem {
        OverflowItem {
            full_width: full,
            icon_width: icon,
            height: 24.0,
            ..Default::default()
        }
    }

    fn params(available_width: f32, spacing: f32, indicator_width: f32) -> OverflowParams {
        OverflowParams {
            available_width,
            spacing,
            indicator: Size::new(indicator_width, 24.0),
            alignment: Alignment::Leading,
            center_reservation: CenterReservation::Symmetric,
            overflow_order: OverflowOrder::Contiguous,
            priority_demotion: PriorityDemotion::IconFirst,
        }
    }

    fn visible_indices(resolution: &Resolution) -> Vec<usize> {
        resolution
            .modes
            .iter()
            .enumerate()
            .filter(|(_, mode)| mode.is_visible())
            .map(|(index, _)| index)
            .collect()
    }

    #[test]
    fn test_layout_width_reservations() {
        assert_eq!(
            layout_width(300.0, 8.0, 40.0, Alignment::Leading, CenterReservation::Symmetric),
            252.0
        );
        assert_eq!(
            layout_width(300.0, 8.0, 40.0, Alignment::Center, CenterReservation::Symmetric),
            204.0
        );
        assert_eq!(
            layout_width(300.0, 8.0, 40.0, Alignment::Center, CenterReservation::Single),
            252.0
        );
    }

    #[test]
    fn test_everything_fits() {
        let items = vec![item(50.0, 20.0); 3];
        let resolution = resolve(&items, &params(300.0, 10.0, 20.0));

        assert_eq!(resolution.modes, vec![DisplayMode::Full; 3]);
        assert!(resolution.hidden.is_empty());
        assert!(!resolution.indicator_visible);
        assert_eq!(resolution.natural_width, 170.0);
        assert_eq!(resolution.consumed_width, 170.0);
    }

    #[test]
    fn test_five_equal_items_hide_from_the_end() {
        // natural 5*80 + 4*8 = 432 > L = 300 - 48 = 252.
        // Running: 80 (88), 88+80 = 168 fits (176), 176+80 = 256 > 252.
        let items = vec![item(80.0, 32.0); 5];
        let resolution = resolve(&items, &params(300.0, 8.0, 40.0));

        assert_eq!(resolution.natural_width, 432.0);
        assert_eq!(resolution.layout_width, 252.0);
        assert_eq!(resolution.hidden, vec![2, 3, 4]);
        assert_eq!(
            resolution.modes,
            vec![
                DisplayMode::Full,
                DisplayMode::Full,
                DisplayMode::Hidden,
                DisplayMode::Hidden,
                DisplayMode::Hidden,
            ]
        );
        assert_eq!(resolution.consumed_width, 168.0);
        assert!(resolution.indicator_visible);
    }

    #[test]
    fn test_item_exactly_filling_the_limit_is_hidden() {
        // L = 100 - 20 = 80. 40 < 80, then 40 + 40 = 80 is not below the limit.
        let items = vec![item(40.0, 20.0), item(40.0, 20.0), item(10.0, 5.0)];
        let mut p = params(100.0, 0.0, 20.0);
        p.overflow_order = OverflowOrder::FirstFit;
        let resolution = resolve(&items, &p);

        assert_eq!(
            resolution.modes,
            vec![DisplayMode::Full, DisplayMode::Hidden, DisplayMode::Full]
        );
        assert_eq!(resolution.hidden, vec![1]);
        assert_eq!(resolution.consumed_width, 50.0);

        p.overflow_order = OverflowOrder::Contiguous;
        assert_eq!(resolve(&items, &p).hidden, vec![1, 2]);
    }

    #[test]
    fn test_keep_visible_exactly_filling_the_limit_becomes_icon() {
        let mut items = vec![item(40.0, 20.0), item(40.0, 20.0), item(10.0, 5.0)];
        items[1].keep_visible = true;
        let mut p = params(100.0, 0.0, 20.0);
        p.overflow_order = OverflowOrder::FirstFit;
        let resolution = resolve(&items, &p);

        assert_eq!(resolution.modes[0], DisplayMode::Full);
        assert_eq!(resolution.modes[1], DisplayMode::Icon);
        assert!(resolution.hidden.is_empty());
        assert_eq!(resolution.consumed_width, 70.0);
    }

    #[test]
    fn test_icon_only_priority_item_on_the_limit_stays() {
        // Icon-only and priority: an icon landing exactly on the limit is kept
        // without reclaiming the item before it.
        let mut items = vec![item(40.0, 20.0), item(60.0, 40.0), item(30.0, 10.0)];
        items[1].keep_visible = true;
        items[1].icon_only = true;
        let resolution = resolve(&items, &params(100.0, 0.0, 20.0));

        assert_eq!(
            resolution.modes,
            vec![DisplayMode::Full, DisplayMode::Icon, DisplayMode::Hidden]
        );
        assert_eq!(resolution.hidden, vec![2]);
    }

    #[test]
    fn test_reclaim_stops_when_item_fits_exactly() {
        // L = 80. Item 0 (50) fits, consumed 50. Priority item 1 (80 full,
        // 40 icon): icon overflows, item 0 is reclaimed and 0 + 80 = 80 fits.
        let mut items = vec![item(50.0, 20.0), item(80.0, 40.0)];
        items[1].keep_visible = true;
        let resolution = resolve(&items, &params(100.0, 0.0, 20.0));

        assert_eq!(resolution.modes, vec![DisplayMode::Hidden, DisplayMode::Full]);
        assert_eq!(resolution.consumed_width, 80.0);
    }

    #[test]
    fn test_keep_visible_last_item_icon_first() {
        let mut items = vec![item(80.0, 32.0); 5];
        items[4].keep_visible = true;
        let resolution = resolve(&items, &params(300.0, 8.0, 40.0));

        // 176 consumed after two items; full (256) does not fit, icon (208) does.
        assert_eq!(resolution.modes[4], DisplayMode::Icon);
        assert_eq!(resolution.hidden, vec![2, 3]);
        assert_eq!(resolution.consumed_width, 80.0 + 8.0 + 80.0 + 8.0 + 32.0);
    }

    #[test]
    fn test_keep_visible_last_item_evict_first() {
        let mut items = vec![item(80.0, 32.0); 5];
        items[4].keep_visible = true;
        let mut p = params(300.0, 8.0, 40.0);
        p.priority_demotion = PriorityDemotion::EvictFirst;
        let resolution = resolve(&items, &p);

        // Item 1 is reclaimed so item 4 keeps its full form: 88 + 80 = 168.
        assert_eq!(resolution.modes[4], DisplayMode::Full);
        assert_eq!(resolution.hidden, vec![1, 2, 3]);
        assert_eq!(visible_indices(&resolution), vec![0, 4]);
    }

    #[test]
    fn test_keep_visible_reclaims_when_icon_does_not_fit() {
        // L = 100 - 20 = 80. Item 0 (60) fits, consumed 64.
        // Item 1 is priority: full 70 and icon 30 both overflow 80 - 64.
        let mut items = vec![item(60.0, 20.0), item(70.0, 30.0)];
        items[1].keep_visible = true;
        let resolution = resolve(&items, &params(100.0, 4.0, 16.0));

        assert_eq!(resolution.modes, vec![DisplayMode::Hidden, DisplayMode::Full]);
        assert_eq!(resolution.hidden, vec![0]);
        assert_eq!(resolution.consumed_width, 70.0);
    }

    #[test]
    fn test_keep_visible_settles_for_icon_after_reclaim() {
        // L = 60 - 20 = 40. Item 0 (36) fits, consumed 40.
        // Item 1 priority: icon 30 does not fit; reclaim item 0 -> 0 + 50 > 40, icon 30 fits.
        let mut items = vec![item(36.0, 20.0), item(50.0, 30.0)];
        items[1].keep_visible = true;
        let resolution = resolve(&items, &params(60.0, 4.0, 16.0));

        assert_eq!(resolution.modes, vec![DisplayMode::Hidden, DisplayMode::Icon]);
    }

    #[test]
    fn test_unsatisfiable_priority_is_hidden() {
        let mut items = vec![item(200.0, 150.0)];
        items[0].keep_visible = true;
        let resolution = resolve(&items, &params(100.0, 4.0, 16.0));

        assert_eq!(resolution.modes, vec![DisplayMode::Hidden]);
        assert_eq!(resolution.hidden, vec![0]);
        assert!(resolution.indicator_visible);
        assert_eq!(resolution.consumed_width, 0.0);
    }

    #[test]
    fn test_priority_items_are_never_reclaimed() {
        // L = 200 - 24 = 176.
        let mut items = vec![item(80.0, 30.0), item(80.0, 30.0), item(80.0, 70.0)];
        items[0].keep_visible = true;
        items[2].keep_visible = true;
        let resolution = resolve(&items, &params(200.0, 4.0, 20.0));

        // 84 + 80 = 164 fits (168). Item 2: 70 too wide for the 8 left, so item 1
        // is reclaimed (84); full 80 then fits.
        assert_eq!(resolution.modes[0], DisplayMode::Full);
        assert_eq!(resolution.modes[1], DisplayMode::Hidden);
        assert_eq!(resolution.modes[2], DisplayMode::Full);
    }

    #[test]
    fn test_explicitly_hidden_excluded_everywhere() {
        let mut items = vec![item(100.0, 30.0); 3];
        items[1].explicitly_hidden = true;
        items[1].height = 90.0;
        let resolution = resolve(&items, &params(300.0, 10.0, 20.0));

        assert_eq!(resolution.natural_width, 210.0);
        assert_eq!(resolution.content_height, 24.0);
        assert_eq!(resolution.modes[1], DisplayMode::Hidden);
        assert!(resolution.hidden.is_empty());
        assert!(!resolution.indicator_visible);
    }

    #[test]
    fn test_always_overflow_shows_indicator_when_rest_fits() {
        let mut items = vec![item(50.0, 20.0); 3];
        items[1].always_overflow = true;
        items[1].height = 60.0;
        let resolution = resolve(&items, &params(300.0, 10.0, 20.0));

        assert_eq!(resolution.natural_width, 110.0);
        assert_eq!(resolution.content_height, 24.0);
        assert_eq!(resolution.modes[1], DisplayMode::Hidden);
        assert_eq!(resolution.hidden, vec![1]);
        assert!(resolution.indicator_visible);
        assert_eq!(resolution.consumed_width, 110.0);
    }

    #[test]
    fn test_icon_only_items_use_icon_width() {
        let mut items = vec![item(100.0, 30.0); 2];
        items[0].icon_only = true;
        let resolution = resolve(&items, &params(300.0, 10.0, 20.0));

        assert_eq!(resolution.modes[0], DisplayMode::Icon);
        assert_eq!(resolution.natural_width, 140.0);
    }

    #[test]
    fn test_first_fit_admits_later_narrow_item() {
        // L = 200 - 20 = 180. 50 (54), 54+140 = 194 > 180 hidden, 54+20 = 74 fits.
        let items = vec![item(50.0, 20.0), item(140.0, 30.0), item(20.0, 10.0)];
        let mut p = params(200.0, 4.0, 16.0);

        p.overflow_order = OverflowOrder::FirstFit;
        assert_eq!(visible_indices(&resolve(&items, &p)), vec![0, 2]);

        p.overflow_order = OverflowOrder::Contiguous;
        assert_eq!(visible_indices(&resolve(&items, &p)), vec![0]);
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty = resolve(&[], &params(0.0, 4.0, 16.0));
        assert_eq!(empty.natural_width, 0.0);
        assert_eq!(empty.consumed_width, 0.0);
        assert!(!empty.indicator_visible);

        let items = vec![item(50.0, 20.0); 2];
        let zero = resolve(&items, &params(0.0, 4.0, 16.0));
        assert_eq!(zero.modes, vec![DisplayMode::Hidden; 2]);
        assert_eq!(zero.hidden, vec![0, 1]);
        assert_eq!(zero.consumed_width, 0.0);
    }

    #[test]
    fn test_max_height_includes_shown_indicator() {
        let items = vec![item(80.0, 32.0); 5];
        let indicator = Size::new(40.0, 30.0);
        let mut p = params(300.0, 8.0, 40.0);
        p.indicator = indicator;

        let overflowing = resolve(&items, &p);
        assert_eq!(overflowing.max_height(indicator), 30.0);

        p.available_width = 1000.0;
        let fitting = resolve(&items, &p);
        assert_eq!(fitting.max_height(indicator), 24.0);
    }
}
