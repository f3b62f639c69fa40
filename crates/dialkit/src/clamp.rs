use crate::geometry::{Offset, Rect};

pub const DEFAULT_MIN_VISIBLE: f64 = 12.0;
/// A frame must be at least this much narrower than the viewport to be used as reference.
pub const FRAME_MARGIN: f64 = 48.0;

/// Picks what positioning is constrained against: the app frame when it is
/// letterboxed inside a wider viewport, the viewport otherwise.
pub fn reference_rect(viewport: Rect, frame: Option<Rect>, margin: f64) -> Rect {
    match frame {
        Some(frame) if frame.is_finite() && frame.width < viewport.width - margin => frame,
        _ => viewport,
    }
}

/// Smallest shift moving `[start, end]` into `[lo, hi]`. Oversized spans align to `lo`.
fn axis_delta(start: f64, end: f64, lo: f64, hi: f64) -> f64 {
    if end - start > hi - lo {
        lo - start
    } else if start < lo {
        lo - start
    } else if end > hi {
        hi - end
    } else {
        0.0
    }
}

/// Corrects `candidate` so the element, whose box at zero offset is `natural`,
/// stays `min_visible` inside `reference` on every edge.
pub fn clamp(candidate: Offset, natural: Rect, reference: Rect, min_visible: f64) -> Offset {
    let placed = natural.translate(candidate);
    let bounds = reference.inset(min_visible);

    let dx = axis_delta(placed.left(), placed.right(), bounds.left(), bounds.right());
    let dy = axis_delta(placed.top(), placed.bottom(), bounds.top(), bounds.bottom());

    Offset::new(candidate.x + dx, candidate.y + dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn frame() -> Rect {
        Rect::new(0.0, 0.0, 375.0, 800.0)
    }

    #[test]
    fn test_in_bounds_position_is_untouched() {
        let natural = Rect::new(100.0, 100.0, 200.0, 200.0);
        let p = clamp(Point::new(10.0, -20.0), natural, frame(), 12.0);
        assert_eq!(p, Point::new(10.0, -20.0));
    }

    #[test]
    fn test_right_edge_is_pulled_back() {
        // element at x=163 with a +90 drag would end at 453
        let natural = Rect::new(163.0, 500.0, 200.0, 200.0);
        let p = clamp(Point::new(90.0, 40.0), natural, frame(), 12.0);
        let placed = natural.translate(p);
        assert!((placed.right() - 363.0).abs() < EPS);
        assert_eq!(p.y, 40.0);
    }

    #[test]
    fn test_top_left_overflow_is_pushed_in() {
        let natural = Rect::new(20.0, 20.0, 100.0, 100.0);
        let p = clamp(Point::new(-100.0, -100.0), natural, frame(), 12.0);
        assert_eq!(natural.translate(p).origin(), Point::new(12.0, 12.0));
    }

    #[test]
    fn test_oversized_element_aligns_leading_edge() {
        let natural = Rect::new(0.0, 0.0, 500.0, 100.0);
        let p = clamp(Point::new(-50.0, 0.0), natural, frame(), 12.0);
        assert_eq!(natural.translate(p).left(), 12.0);
    }

    #[test]
    fn test_reference_prefers_letterboxed_frame() {
        let viewport = Rect::new(0.0, 0.0, 1440.0, 900.0);
        let app = Rect::new(520.0, 0.0, 400.0, 900.0);
        assert_eq!(reference_rect(viewport, Some(app), FRAME_MARGIN), app);
    }

    #[test]
    fn test_reference_ignores_frame_barely_narrower() {
        let viewport = Rect::new(0.0, 0.0, 375.0, 800.0);
        let app = Rect::new(10.0, 0.0, 340.0, 800.0);
        assert_eq!(reference_rect(viewport, Some(app), FRAME_MARGIN), viewport);
        assert_eq!(reference_rect(viewport, None, FRAME_MARGIN), viewport);
    }

    proptest! {
        #[test]
        fn prop_clamp_is_idempotent(
            x in -2000.0f64..2000.0,
            y in -2000.0f64..2000.0,
            nx in -500.0f64..900.0,
            ny in -500.0f64..900.0,
            w in 1.0f64..600.0,
            h in 1.0f64..600.0,
        ) {
            let natural = Rect::new(nx, ny, w, h);
            let once = clamp(Point::new(x, y), natural, frame(), DEFAULT_MIN_VISIBLE);
            let twice = clamp(once, natural, frame(), DEFAULT_MIN_VISIBLE);
            prop_assert!((once.x - twice.x).abs() < EPS);
            prop_assert!((once.y - twice.y).abs() < EPS);
        }

        #[test]
        fn prop_in_bounds_never_moves(
            left in 12.0f64..200.0,
            top in 12.0f64..400.0,
            w in 1.0f64..150.0,
            h in 1.0f64..350.0,
        ) {
            let natural = Rect::new(0.0, 0.0, w, h);
            let candidate = Point::new(left, top);
            prop_assert_eq!(clamp(candidate, natural, frame(), DEFAULT_MIN_VISIBLE), candidate);
        }
    }
}
