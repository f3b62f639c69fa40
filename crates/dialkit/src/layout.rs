use serde::{Deserialize, Serialize};

pub const MIN_ITEM: f64 = 12.0;
pub const MIN_CIRCLE: f64 = 120.0;
pub const MIN_DESC: f64 = 120.0;
pub const MIN_HIT: f64 = 44.0;
pub const DEFAULT_GAP: f64 = 8.0;
/// Horizontal padding the widget carries around the ring and panel.
pub const WIDGET_PADDING: f64 = 32.0;

/// Externally supplied sizes. Unset fields are derived from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeParams {
    pub circle: Option<f64>,
    pub item: Option<f64>,
    pub hit: Option<f64>,
    pub desc: Option<f64>,
    pub gap: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolvedSizes {
    circle: f64,
    item: f64,
    hit: f64,
    desc: f64,
    gap: f64,
}

impl SizeParams {
    fn resolve(&self, viewport_width: f64) -> ResolvedSizes {
        let item = self
            .item
            .unwrap_or_else(|| (viewport_width * 0.022).clamp(14.0, 22.0));
        let circle = self.circle.unwrap_or_else(|| (item * 10.0).clamp(160.0, 320.0));
        let desc = self.desc.unwrap_or_else(|| (circle * 0.75).clamp(140.0, 260.0));
        ResolvedSizes {
            circle,
            item,
            hit: self.hit.unwrap_or(MIN_HIT),
            desc,
            gap: self.gap.unwrap_or(DEFAULT_GAP),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutValues {
    pub circle_diameter: f64,
    pub item_size: f64,
    pub hit_target_size: f64,
    pub desc_panel_width: f64,
    pub gap: f64,
    pub ring_radius: f64,
    /// Distance from the container's top-left corner to the ring centre on each axis.
    pub ring_center_offset: f64,
}

impl LayoutValues {
    /// Returns `None` when any input is unusable; callers keep their previous values.
    pub fn compute(params: &SizeParams, viewport_width: f64) -> Option<Self> {
        if !viewport_width.is_finite() {
            return None;
        }
        let sizes = params.resolve(viewport_width);
        let all_finite = [sizes.circle, sizes.item, sizes.hit, sizes.desc, sizes.gap]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return None;
        }

        let item_size = sizes.item.max(MIN_ITEM);
        let circle_diameter = sizes.circle.max(MIN_CIRCLE);
        let desc_panel_width = sizes.desc.max(MIN_DESC);
        let hit_target_size = MIN_HIT.max(sizes.hit).max(item_size);

        let ring_center_offset = circle_diameter / 2.0;
        let min_radius = MIN_ITEM.max(item_size * 1.6);
        let ring_radius = min_radius.max(ring_center_offset - item_size * 1.1);

        Some(Self {
            circle_diameter,
            item_size,
            hit_target_size,
            desc_panel_width,
            gap: sizes.gap.max(0.0),
            ring_radius,
            ring_center_offset,
        })
    }

    pub fn widget_max_width(&self) -> f64 {
        self.circle_diameter + self.desc_panel_width + self.gap + WIDGET_PADDING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimums_are_enforced() {
        let params = SizeParams {
            circle: Some(40.0),
            item: Some(4.0),
            hit: Some(10.0),
            desc: Some(0.0),
            gap: Some(8.0),
        };
        let l = LayoutValues::compute(&params, 375.0).unwrap();
        assert_eq!(l.item_size, 12.0);
        assert_eq!(l.circle_diameter, 120.0);
        assert_eq!(l.desc_panel_width, 120.0);
        assert_eq!(l.hit_target_size, 44.0);
    }

    #[test]
    fn test_hit_target_grows_with_item() {
        let params = SizeParams {
            item: Some(60.0),
            ..SizeParams::default()
        };
        let l = LayoutValues::compute(&params, 375.0).unwrap();
        assert_eq!(l.hit_target_size, 60.0);
    }

    #[test]
    fn test_derived_from_narrow_viewport() {
        // 375 * 0.022 = 8.25 -> item 14, circle 160, desc 140 (120 clamped up)
        let l = LayoutValues::compute(&SizeParams::default(), 375.0).unwrap();
        assert_eq!(l.item_size, 14.0);
        assert_eq!(l.circle_diameter, 160.0);
        assert_eq!(l.desc_panel_width, 140.0);
        assert_eq!(l.gap, 8.0);
        assert_eq!(l.ring_center_offset, 80.0);
        assert!((l.ring_radius - (80.0 - 14.0 * 1.1)).abs() < 1e-9);
    }

    #[test]
    fn test_derived_from_wide_viewport() {
        let l = LayoutValues::compute(&SizeParams::default(), 1920.0).unwrap();
        assert_eq!(l.item_size, 22.0);
        assert_eq!(l.circle_diameter, 220.0);
        assert_eq!(l.desc_panel_width, 165.0);
    }

    #[test]
    fn test_radius_never_collapses_below_item_spacing() {
        let params = SizeParams {
            circle: Some(120.0),
            item: Some(50.0),
            ..SizeParams::default()
        };
        let l = LayoutValues::compute(&params, 375.0).unwrap();
        assert_eq!(l.ring_radius, 80.0);
    }

    #[test]
    fn test_non_finite_input_is_rejected_whole() {
        let params = SizeParams {
            gap: Some(f64::NAN),
            ..SizeParams::default()
        };
        assert_eq!(LayoutValues::compute(&params, 375.0), None);
        assert_eq!(LayoutValues::compute(&SizeParams::default(), f64::INFINITY), None);
    }
}
