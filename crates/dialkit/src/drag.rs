use crate::env::{Environment, FrameSlots, FrameStream, ListenerKind, PointerId};
use crate::geometry::{Offset, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Touch,
}

impl PointerButton {
    /// Maps a toolkit button number (1 = primary, 2 = middle, 3 = secondary).
    pub fn from_number(n: u32) -> Self {
        match n {
            2 => Self::Middle,
            3 => Self::Secondary,
            _ => Self::Primary,
        }
    }

    /// Only the primary button and touch activate or drag.
    pub fn is_primary(self) -> bool {
        matches!(self, Self::Primary | Self::Touch)
    }
}

/// What sits under the pointer when a press starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Surface,
    Button,
    Link,
    NoDrag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub pointer: PointerId,
    pub button: PointerButton,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub pointer: PointerId,
    pub start: Point,
    pub origin: Offset,
    pub latest: Offset,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Unclamped offset the element should show right now, while dragging.
    pub fn live_offset(&self) -> Option<Offset> {
        match self.state {
            DragState::Dragging(s) => Some(s.latest),
            DragState::Idle => None,
        }
    }

    pub fn pointer_down(
        &mut self,
        input: PointerInput,
        target: TargetKind,
        origin: Offset,
        env: &mut dyn Environment,
    ) -> bool {
        if self.is_dragging() || target != TargetKind::Surface || !input.button.is_primary() {
            return false;
        }

        if let Err(e) = env.capture_pointer(input.pointer) {
            log::debug!("Pointer capture skipped: {}", e);
        }

        self.state = DragState::Dragging(DragSession {
            pointer: input.pointer,
            start: input.position,
            origin,
            latest: origin,
        });
        env.listen(ListenerKind::PointerMove);
        env.listen(ListenerKind::PointerUp);
        true
    }

    /// Records the pointer and makes sure a drag frame is pending. Returns
    /// whether anything changed.
    pub fn pointer_move(
        &mut self,
        position: Point,
        env: &mut dyn Environment,
        frames: &mut FrameSlots,
    ) -> bool {
        let DragState::Dragging(session) = &mut self.state else {
            return false;
        };
        session.latest = session.origin + (position - session.start);
        frames.coalesce(env, FrameStream::Drag);
        true
    }

    /// Ends the drag and returns the offset to commit, already run through `clamp`.
    /// A release without a matching press does nothing.
    pub fn pointer_up(
        &mut self,
        position: Option<Point>,
        env: &mut dyn Environment,
        frames: &mut FrameSlots,
        clamp: impl FnOnce(Offset) -> Offset,
    ) -> Option<Offset> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };

        if let Err(e) = env.release_pointer(session.pointer) {
            log::debug!("Pointer release skipped: {}", e);
        }
        frames.cancel(env, FrameStream::Drag);
        env.unlisten(ListenerKind::PointerMove);
        env.unlisten(ListenerKind::PointerUp);

        let unclamped = position
            .map(|p| session.origin + (p - session.start))
            .unwrap_or(session.latest);
        Some(clamp(unclamped))
    }

    pub fn teardown(&mut self, env: &mut dyn Environment, frames: &mut FrameSlots) {
        if let DragState::Dragging(session) = std::mem::take(&mut self.state) {
            let _ = env.release_pointer(session.pointer);
        }
        frames.cancel(env, FrameStream::Drag);
        env.unlisten(ListenerKind::PointerMove);
        env.unlisten(ListenerKind::PointerUp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clamp::clamp;
    use crate::env::HeadlessEnvironment;
    use crate::geometry::Rect;

    fn press(x: f64, y: f64) -> PointerInput {
        PointerInput {
            pointer: PointerId::from(1),
            button: PointerButton::Primary,
            position: Point::new(x, y),
        }
    }

    fn env() -> HeadlessEnvironment {
        HeadlessEnvironment::new(Rect::new(0.0, 0.0, 375.0, 800.0))
    }

    #[test]
    fn test_buttons_and_secondary_clicks_do_not_drag() {
        let mut env = env();
        let mut drag = DragController::default();

        assert!(!drag.pointer_down(press(0.0, 0.0), TargetKind::Button, Point::ORIGIN, &mut env));
        assert!(!drag.pointer_down(press(0.0, 0.0), TargetKind::Link, Point::ORIGIN, &mut env));
        assert!(!drag.pointer_down(press(0.0, 0.0), TargetKind::NoDrag, Point::ORIGIN, &mut env));

        let right = PointerInput {
            button: PointerButton::Secondary,
            ..press(0.0, 0.0)
        };
        assert!(!drag.pointer_down(right, TargetKind::Surface, Point::ORIGIN, &mut env));
        assert!(env.listeners.is_empty());
    }

    #[test]
    fn test_moves_coalesce_into_one_frame_with_latest_offset() {
        let mut env = env();
        let mut frames = FrameSlots::default();
        let mut drag = DragController::default();

        assert!(drag.pointer_down(press(100.0, 100.0), TargetKind::Surface, Point::new(50.0, 50.0), &mut env));
        assert_eq!(env.captured, Some(PointerId::from(1)));

        drag.pointer_move(Point::new(110.0, 100.0), &mut env, &mut frames);
        drag.pointer_move(Point::new(140.0, 90.0), &mut env, &mut frames);

        assert_eq!(env.pending(FrameStream::Drag), 1);
        assert_eq!(drag.live_offset(), Some(Point::new(90.0, 40.0)));
    }

    #[test]
    fn test_release_clamps_and_cleans_up() {
        let mut env = env();
        let mut frames = FrameSlots::default();
        let mut drag = DragController::default();
        let natural = Rect::new(163.0, 500.0, 200.0, 200.0);
        let reference = Rect::new(0.0, 0.0, 375.0, 800.0);

        drag.pointer_down(press(100.0, 100.0), TargetKind::Surface, Point::new(50.0, 50.0), &mut env);
        drag.pointer_move(Point::new(140.0, 90.0), &mut env, &mut frames);

        let committed = drag
            .pointer_up(Some(Point::new(140.0, 90.0)), &mut env, &mut frames, |p| {
                clamp(p, natural, reference, 12.0)
            })
            .unwrap();

        assert!(natural.translate(committed).right() <= 375.0 - 12.0);
        assert!(!drag.is_dragging());
        assert!(env.listeners.is_empty());
        assert!(env.frames.is_empty());
        assert_eq!(env.captured, None);
    }

    #[test]
    fn test_release_without_press_is_noop() {
        let mut env = env();
        let mut frames = FrameSlots::default();
        let mut drag = DragController::default();

        let result = drag.pointer_up(None, &mut env, &mut frames, |p| p);
        assert_eq!(result, None);
    }

    #[test]
    fn test_capture_failure_still_drags() {
        let mut env = env();
        env.refuse_capture = true;
        let mut drag = DragController::default();

        assert!(drag.pointer_down(press(0.0, 0.0), TargetKind::Surface, Point::ORIGIN, &mut env));
        let mut frames = FrameSlots::default();
        assert_eq!(
            drag.pointer_up(Some(Point::new(5.0, 5.0)), &mut env, &mut frames, |p| p),
            Some(Point::new(5.0, 5.0))
        );
    }

    #[test]
    fn test_teardown_removes_listeners_mid_drag() {
        let mut env = env();
        let mut frames = FrameSlots::default();
        let mut drag = DragController::default();

        drag.pointer_down(press(0.0, 0.0), TargetKind::Surface, Point::ORIGIN, &mut env);
        drag.pointer_move(Point::new(3.0, 3.0), &mut env, &mut frames);
        drag.teardown(&mut env, &mut frames);

        assert!(!drag.is_dragging());
        assert!(env.listeners.is_empty());
        assert!(env.frames.is_empty());
    }
}
