//! Placement of resolved items inside the container.
//!
//! Items are laid out along the strip in list order, separated by the
//! configured spacing, offset according to the alignment and centered
//! vertically on whole pixels. Reverse direction mirrors every x coordinate
//! about the container width. The overflow indicator sits at the trailing edge.
//!
//! The indicator's width is only subtracted from the alignment offset when the
//! indicator is actually shown; a strip with nothing overflowed aligns its
//! items against the full container width.

use crate::config::{Alignment, CenterReservation, TextDirection};
use crate::geometry::{Point, Size};
use crate::overflow::{OverflowItem, Resolution};

/// Container-level inputs to [`place`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementParams {
    /// Width of the container.
    pub available_width: f32,
    /// Space between adjacent items.
    pub spacing: f32,
    /// Natural size of the overflow indicator.
    pub indicator: Size,
    /// Alignment of the visible items.
    pub alignment: Alignment,
    /// Layout direction.
    pub direction: TextDirection,
    /// Indicator reservation under center alignment.
    pub center_reservation: CenterReservation,
}

/// Positions computed by [`place`].
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Top-left corner per item; `None` for items that are not visible.
    pub positions: Vec<Option<Point>>,
    /// Top-left corner of the overflow indicator when it is shown.
    pub indicator: Option<Point>,
    /// Height every item is centered within.
    pub max_height: f32,
}

/// Offset of the first visible item from the leading edge.
pub fn alignment_offset(params: &PlacementParams, consumed_width: f32, indicator_visible: bool) -> f32 {
    let reserved = if indicator_visible {
        params.indicator.width + params.spacing
    } else {
        0.0
    };
    match params.alignment {
        Alignment::Leading => 0.0,
        Alignment::Trailing => params.available_width - reserved - consumed_width,
        Alignment::Center => match params.center_reservation {
            CenterReservation::Symmetric => (params.available_width - consumed_width) / 2.0,
            CenterReservation::Single => (params.available_width - reserved - consumed_width) / 2.0,
        },
    }
}

/// Compute the position of every visible item and of the indicator.
pub fn place(items: &[OverflowItem], resolution: &Resolution, params: &PlacementParams) -> Placement {
    let max_height = resolution.max_height(params.indicator);
    let start = alignment_offset(params, resolution.consumed_width, resolution.indicator_visible);
    let reverse = params.direction.is_reverse();
    let width = params.available_width;

    let mut cursor = 0.0;
    let positions = items
        .iter()
        .zip(&resolution.modes)
        .map(|(item, &mode)| {
            if !mode.is_visible() {
                return None;
            }
            let item_width = item.width(mode);
            let leading = start + cursor;
            let x = if reverse {
                width - leading - item_width
            } else {
                leading
            };
            let y = ((max_height - item.height) / 2.0).round();
            cursor += item_width + params.spacing;
            Some(Point::new(x, y))
        })
        .collect();

    let indicator = resolution.indicator_visible.then(|| {
        let x = if reverse {
            0.0
        } else {
            width - params.indicator.width
        };
        Point::new(x, ((max_height - params.indicator.height) / 2.0).round())
    });

    Placement {
        positions,
        indicator,
        max_height,
    }
}
