use dialkit::drag::{PointerButton, PointerInput};
use dialkit::env::{
    EnvError, Environment, FocusTarget, FrameId, FrameStream, ListenerKind, PointerId,
};
use dialkit::geometry::{Point, Rect};
use dialkit::ring::Key;
use dialkit::storage::{JsonFileStorage, MemoryStorage, Storage};
use dialkit::widget::Hit;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

type FrameCallbacks = Rc<RefCell<HashMap<FrameId, gtk::TickCallbackId>>>;

/// [`Environment`] backed by the overlay's drawing area and its frame clock.
pub struct GtkEnvironment {
    area: gtk::DrawingArea,
    frame_width: Option<f64>,
    frames: FrameCallbacks,
    next_frame: u64,
    on_frame: Rc<dyn Fn(FrameId)>,
    listeners: HashSet<ListenerKind>,
    captured: Option<PointerId>,
    focused: Option<FocusTarget>,
    storage: Box<dyn Storage>,
}

impl GtkEnvironment {
    pub fn new(
        area: gtk::DrawingArea,
        frame_width: Option<f64>,
        on_frame: impl Fn(FrameId) + 'static,
    ) -> Self {
        let storage: Box<dyn Storage> = match JsonFileStorage::open_default() {
            Ok(s) => {
                log::debug!("Persisting widget state to {}", s.path().display());
                Box::new(s)
            }
            Err(e) => {
                log::warn!("Widget state will not survive restarts: {}", e);
                Box::new(MemoryStorage::new())
            }
        };

        Self {
            area,
            frame_width,
            frames: Rc::default(),
            next_frame: 0,
            on_frame: Rc::new(on_frame),
            listeners: HashSet::new(),
            captured: None,
            focused: None,
            storage,
        }
    }

    pub fn set_frame_width(&mut self, frame_width: Option<f64>) {
        self.frame_width = frame_width;
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.contains(&kind)
    }
}

impl Environment for GtkEnvironment {
    fn viewport(&self) -> Option<Rect> {
        let (w, h) = (self.area.width() as f64, self.area.height() as f64);
        (w > 0.0 && h > 0.0).then(|| Rect::new(0.0, 0.0, w, h))
    }

    fn frame(&self) -> Option<Rect> {
        column_rect(self.viewport()?, self.frame_width?)
    }

    fn listen(&mut self, kind: ListenerKind) {
        if self.listeners.insert(kind) {
            log::trace!("listen {}", kind);
        }
    }

    fn unlisten(&mut self, kind: ListenerKind) {
        if self.listeners.remove(&kind) {
            log::trace!("unlisten {}", kind);
        }
    }

    fn request_frame(&mut self, stream: FrameStream) -> FrameId {
        self.next_frame += 1;
        let id = FrameId::from(self.next_frame);

        let frames = self.frames.clone();
        let on_frame = self.on_frame.clone();
        let handle = self.area.add_tick_callback(move |_, _| {
            // a finished callback is dropped by GTK, so forget it before returning
            frames.borrow_mut().remove(&id);
            on_frame(id);
            glib::ControlFlow::Break
        });
        self.frames.borrow_mut().insert(id, handle);
        log::trace!("frame {} requested for {:?}", id, stream);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if let Some(handle) = self.frames.borrow_mut().remove(&id) {
            handle.remove();
        }
    }

    fn capture_pointer(&mut self, pointer: PointerId) -> Result<(), EnvError> {
        // the drag gesture already holds an implicit grab while a button is down
        self.captured = Some(pointer);
        Ok(())
    }

    fn release_pointer(&mut self, pointer: PointerId) -> Result<(), EnvError> {
        match self.captured.take_if(|p| *p == pointer) {
            Some(_) => Ok(()),
            None => Err(EnvError::Release(pointer)),
        }
    }

    fn focus(&mut self, target: FocusTarget) -> Result<(), EnvError> {
        if !self.area.is_mapped() {
            return Err(EnvError::Focus(target));
        }
        self.area.grab_focus();
        self.focused = Some(target);
        Ok(())
    }

    fn focused(&self) -> Option<FocusTarget> {
        self.focused
    }

    fn storage(&mut self) -> &mut dyn Storage {
        self.storage.as_mut()
    }
}

/// A centred column of `width` inside the viewport.
pub fn column_rect(viewport: Rect, width: f64) -> Option<Rect> {
    if !width.is_finite() || width <= 0.0 {
        return None;
    }
    let width = width.min(viewport.width);
    Some(Rect::new(
        viewport.center().x - width / 2.0,
        viewport.top(),
        width,
        viewport.height,
    ))
}

/// Where keyboard focus lands when the pointer presses on a hit.
pub fn focus_target(hit: Hit) -> Option<FocusTarget> {
    match hit {
        Hit::Slot(slot) => Some(FocusTarget::Slot(slot)),
        Hit::CenterButton => Some(FocusTarget::CenterButton),
        Hit::Panel => Some(FocusTarget::Panel),
        Hit::PanelClose => Some(FocusTarget::PanelClose),
        Hit::Backdrop | Hit::Surface => Some(FocusTarget::Host(0)),
        Hit::Nothing => None,
    }
}

pub fn map_key(key: gdk::Key) -> Key {
    match key {
        gdk::Key::Right | gdk::Key::KP_Right => Key::ArrowRight,
        gdk::Key::Down | gdk::Key::KP_Down => Key::ArrowDown,
        gdk::Key::Left | gdk::Key::KP_Left => Key::ArrowLeft,
        gdk::Key::Up | gdk::Key::KP_Up => Key::ArrowUp,
        gdk::Key::Home | gdk::Key::KP_Home => Key::Home,
        gdk::Key::End | gdk::Key::KP_End => Key::End,
        gdk::Key::Tab | gdk::Key::ISO_Left_Tab => Key::Tab,
        gdk::Key::Escape => Key::Escape,
        gdk::Key::Return | gdk::Key::KP_Enter => Key::Enter,
        gdk::Key::space => Key::Space,
        _ => Key::Other,
    }
}

/// Shift+Tab arrives as `ISO_Left_Tab` on most layouts, with or without the modifier.
pub fn is_shifted(key: gdk::Key, state: gdk::ModifierType) -> bool {
    key == gdk::Key::ISO_Left_Tab || state.contains(gdk::ModifierType::SHIFT_MASK)
}

/// Touch sequences report button 0.
pub fn pointer_input(button: u32, x: f64, y: f64) -> PointerInput {
    PointerInput {
        pointer: PointerId::from(button),
        button: match button {
            0 => PointerButton::Touch,
            n => PointerButton::from_number(n),
        },
        position: Point::new(x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialkit::ring::Slot;

    #[test]
    fn test_column_rect() {
        let viewport = Rect::new(0.0, 0.0, 1440.0, 900.0);
        assert_eq!(
            column_rect(viewport, 420.0),
            Some(Rect::new(510.0, 0.0, 420.0, 900.0))
        );
        // wider than the screen collapses to the screen
        assert_eq!(column_rect(viewport, 2000.0), Some(viewport));
        assert_eq!(column_rect(viewport, 0.0), None);
        assert_eq!(column_rect(viewport, f64::NAN), None);
    }

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(gdk::Key::Right), Key::ArrowRight);
        assert_eq!(map_key(gdk::Key::KP_Up), Key::ArrowUp);
        assert_eq!(map_key(gdk::Key::ISO_Left_Tab), Key::Tab);
        assert_eq!(map_key(gdk::Key::Return), Key::Enter);
        assert_eq!(map_key(gdk::Key::a), Key::Other);
    }

    #[test]
    fn test_is_shifted() {
        assert!(is_shifted(gdk::Key::ISO_Left_Tab, gdk::ModifierType::empty()));
        assert!(is_shifted(gdk::Key::Tab, gdk::ModifierType::SHIFT_MASK));
        assert!(!is_shifted(gdk::Key::Tab, gdk::ModifierType::CONTROL_MASK));
    }

    #[test]
    fn test_pointer_input_buttons() {
        assert_eq!(pointer_input(1, 0.0, 0.0).button, PointerButton::Primary);
        assert_eq!(pointer_input(3, 0.0, 0.0).button, PointerButton::Secondary);
        assert_eq!(pointer_input(0, 0.0, 0.0).button, PointerButton::Touch);
        assert_eq!(pointer_input(1, 4.0, 5.0).position, Point::new(4.0, 5.0));
    }

    #[test]
    fn test_focus_target() {
        assert_eq!(
            focus_target(Hit::Slot(Slot::East)),
            Some(FocusTarget::Slot(Slot::East))
        );
        assert_eq!(focus_target(Hit::Nothing), None);
        assert!(!focus_target(Hit::Backdrop).is_some_and(|t| t.is_within_panel()));
    }
}
