use crate::geometry::Rect;

/// Narrowest description panel worth anchoring beside the ring.
pub const MIN_PANEL: f64 = 120.0;
/// Left must beat right by this much to win; keeps the right side preferred.
pub const LEFT_BIAS: f64 = 12.0;
pub const OVERLAY_WIDTH_RATIO: f64 = 0.8;
pub const WIDTH_JITTER: f64 = 3.0;
pub const RECENTER_JITTER: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementSide {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    pub left: f64,
    pub right: f64,
}

impl Room {
    pub fn on(&self, side: PlacementSide) -> f64 {
        match side {
            PlacementSide::Left => self.left,
            PlacementSide::Right => self.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideInput {
    /// The ring container as currently placed.
    pub container: Rect,
    pub frame: Rect,
    pub circle: f64,
    pub gap: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    pub safety: f64,
    pub preferred_desc: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub side: PlacementSide,
    pub overlay: bool,
    pub desc_width: f64,
    /// Cap on the whole widget, only set in overlay mode.
    pub max_widget_width: Option<f64>,
    /// Horizontal shift that re-centres the ring in the frame.
    pub recenter_dx: f64,
}

pub fn measure_room(input: &SideInput) -> Room {
    let f = &input.frame;
    let c = &input.container;
    Room {
        right: f.right() - (c.left() + input.circle + input.gap + input.padding_right) - input.safety,
        left: (c.left() - f.left()) - (input.gap + input.padding_left) - input.safety,
    }
}

pub fn choose_side(room: Room, preferred: f64) -> PlacementSide {
    let needed = MIN_PANEL.max(preferred);
    if room.right >= needed {
        PlacementSide::Right
    } else if room.left >= needed && room.left > room.right + LEFT_BIAS {
        PlacementSide::Left
    } else if room.left > room.right {
        PlacementSide::Left
    } else {
        PlacementSide::Right
    }
}

pub fn place(input: &SideInput) -> Placement {
    let room = measure_room(input);
    let side = choose_side(room, input.preferred_desc);
    let desc_used = room.on(side).min(input.preferred_desc).max(MIN_PANEL);

    let paddings = input.padding_left + input.padding_right;
    let footprint = input.circle + desc_used + input.gap + paddings;
    let overlay = footprint > input.frame.width || room.left.max(room.right) < MIN_PANEL;

    if !overlay {
        return Placement {
            side,
            overlay,
            desc_width: desc_used,
            max_widget_width: None,
            recenter_dx: 0.0,
        };
    }

    let max_width = input.frame.width * OVERLAY_WIDTH_RATIO;
    let desc_width = input.preferred_desc.min((max_width - paddings).max(0.0));
    let ring_width = input.circle.min(max_width);
    let target_left = input.frame.left() + (input.frame.width - ring_width) / 2.0;

    Placement {
        side,
        overlay,
        desc_width,
        max_widget_width: Some(max_width),
        recenter_dx: target_left - input.container.left(),
    }
}

fn close(a: f64, b: f64, threshold: f64) -> bool {
    (a - b).abs() < threshold
}

/// Re-runs [`place`] per layout pass and filters out sub-threshold changes.
#[derive(Debug, Default)]
pub struct SideSelector {
    last: Option<Placement>,
}

impl SideSelector {
    pub fn current(&self) -> Option<Placement> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Returns the placement to apply, or `None` when nothing meaningful changed.
    /// The ring is re-centred when a pass first lands in overlay, either right after
    /// a reset or coming from inline. Later overlay passes leave the position alone.
    pub fn update(&mut self, input: &SideInput) -> Option<Placement> {
        let mut next = place(input);
        let entering_overlay = self.last.is_none_or(|last| !last.overlay);
        if !entering_overlay || close(next.recenter_dx, 0.0, RECENTER_JITTER) {
            next.recenter_dx = 0.0;
        }

        if let Some(last) = self.last {
            if close(next.desc_width, last.desc_width, WIDTH_JITTER) {
                next.desc_width = last.desc_width;
            }
            if let (Some(a), Some(b)) = (next.max_widget_width, last.max_widget_width)
                && close(a, b, WIDTH_JITTER)
            {
                next.max_widget_width = Some(b);
            }
            let settled = Placement {
                recenter_dx: 0.0,
                ..next
            };
            if settled == last && next.recenter_dx == 0.0 {
                return None;
            }
        }

        self.last = Some(Placement {
            recenter_dx: 0.0,
            ..next
        });
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(container_left: f64, frame_width: f64) -> SideInput {
        SideInput {
            container: Rect::new(container_left, 500.0, 160.0, 160.0),
            frame: Rect::new(0.0, 0.0, frame_width, 800.0),
            circle: 160.0,
            gap: 8.0,
            padding_left: 0.0,
            padding_right: 0.0,
            safety: 4.0,
            preferred_desc: 140.0,
        }
    }

    #[test]
    fn test_right_wins_when_it_fits() {
        let room = Room {
            left: 400.0,
            right: 150.0,
        };
        assert_eq!(choose_side(room, 140.0), PlacementSide::Right);
    }

    #[test]
    fn test_partial_right_room_still_preferred() {
        // right clears 120 but not 170; left cannot fit either
        let room = Room {
            left: 30.0,
            right: 150.0,
        };
        assert_eq!(choose_side(room, 170.0), PlacementSide::Right);
    }

    #[test]
    fn test_left_needs_to_beat_right_by_bias() {
        let room = Room {
            left: 200.0,
            right: 100.0,
        };
        assert_eq!(choose_side(room, 170.0), PlacementSide::Left);

        let both_fit = Room {
            left: 400.0,
            right: 175.0,
        };
        assert_eq!(choose_side(both_fit, 170.0), PlacementSide::Right);
    }

    #[test]
    fn test_fallback_picks_roomier_side_right_on_tie() {
        let room = Room {
            left: 40.0,
            right: 80.0,
        };
        assert_eq!(choose_side(room, 170.0), PlacementSide::Right);

        let tie = Room {
            left: 60.0,
            right: 60.0,
        };
        assert_eq!(choose_side(tie, 170.0), PlacementSide::Right);
    }

    #[test]
    fn test_measure_room_matches_formula() {
        let i = input(100.0, 600.0);
        let room = measure_room(&i);
        assert_eq!(room.right, 600.0 - (100.0 + 160.0 + 8.0) - 4.0);
        assert_eq!(room.left, 100.0 - 8.0 - 4.0);
    }

    #[test]
    fn test_neither_side_clearing_minimum_forces_overlay() {
        // room: right 80, left 40 with preferred 170
        let i = SideInput {
            container: Rect::new(48.0, 500.0, 160.0, 160.0),
            frame: Rect::new(0.0, 0.0, 296.0, 800.0),
            circle: 160.0,
            gap: 8.0,
            padding_left: 0.0,
            padding_right: 0.0,
            safety: 0.0,
            preferred_desc: 170.0,
        };
        let room = measure_room(&i);
        assert_eq!(room.right, 80.0);
        assert_eq!(room.left, 40.0);

        let p = place(&i);
        assert_eq!(p.side, PlacementSide::Right);
        assert!(p.overlay);
        assert_eq!(p.max_widget_width, Some(296.0 * 0.8));
        assert!(p.desc_width <= 296.0 * 0.8);
        // centred: ring left = (296 - 160) / 2 = 68
        assert_eq!(p.recenter_dx, 68.0 - 48.0);
    }

    #[test]
    fn test_roomy_frame_stays_inline() {
        let p = place(&input(40.0, 600.0));
        assert!(!p.overlay);
        assert_eq!(p.side, PlacementSide::Right);
        assert_eq!(p.desc_width, 140.0);
        assert_eq!(p.recenter_dx, 0.0);
    }

    #[test]
    fn test_selector_suppresses_jitter() {
        let mut selector = SideSelector::default();
        assert!(selector.update(&input(40.0, 600.0)).is_some());
        // one pixel of drift changes nothing
        assert!(selector.update(&input(41.0, 600.0)).is_none());

        let moved = selector.update(&input(380.0, 600.0)).unwrap();
        assert_eq!(moved.side, PlacementSide::Left);
    }

    #[test]
    fn test_selector_recenters_only_when_entering_overlay() {
        let mut selector = SideSelector::default();
        let first = selector.update(&input(0.0, 200.0)).unwrap();
        assert!(first.overlay);
        assert_eq!(first.recenter_dx, 20.0);

        // after a reset the first overlay pass centres again, within jitter it does not
        selector.reset();
        assert_eq!(selector.update(&input(16.0, 200.0)).unwrap().recenter_dx, 0.0);

        let mut selector = SideSelector::default();
        assert!(!selector.update(&input(40.0, 600.0)).unwrap().overlay);
        let mut i = input(0.0, 200.0);
        let entered = selector.update(&i).unwrap();
        assert!(entered.overlay);
        assert_eq!(entered.recenter_dx, 20.0);

        // already overlaid: a few pixels off centre is left alone
        i.container.x = 16.0;
        assert!(selector.update(&i).is_none());
    }
}
