//! The host-facing seam. Everything the widget would otherwise reach for as a
//! global (listeners, frame callbacks, pointer capture, focus, storage) goes
//! through [`Environment`].

use crate::geometry::Rect;
use crate::ring::Slot;
use crate::storage::{MemoryStorage, Storage};
use derive_more::{Display, From, Into};
use std::collections::{BTreeMap, HashSet};
use strum::EnumIter;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum ListenerKind {
    Resize,
    PointerMove,
    PointerUp,
    KeyDown,
    FocusIn,
}

/// Independent update streams. Each has at most one pending frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FrameStream {
    Drag,
    Layout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct FrameId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct PointerId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Slot(Slot),
    CenterButton,
    Panel,
    PanelClose,
    /// Something outside the widget, identified by the host.
    Host(u32),
}

impl FocusTarget {
    pub fn is_within_panel(self) -> bool {
        matches!(self, Self::Panel | Self::PanelClose)
    }
}

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Pointer {0} cannot be captured")]
    Capture(PointerId),
    #[error("Pointer {0} is not captured")]
    Release(PointerId),
    #[error("Focus target {0:?} is not mounted")]
    Focus(FocusTarget),
}

pub trait Environment {
    /// `None` until the host has something measurable.
    fn viewport(&self) -> Option<Rect>;
    /// The app frame the widget lives in, if the host has one.
    fn frame(&self) -> Option<Rect>;

    fn listen(&mut self, kind: ListenerKind);
    fn unlisten(&mut self, kind: ListenerKind);

    fn request_frame(&mut self, stream: FrameStream) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);

    fn capture_pointer(&mut self, pointer: PointerId) -> Result<(), EnvError>;
    fn release_pointer(&mut self, pointer: PointerId) -> Result<(), EnvError>;

    fn focus(&mut self, target: FocusTarget) -> Result<(), EnvError>;
    fn focused(&self) -> Option<FocusTarget>;

    fn storage(&mut self) -> &mut dyn Storage;
}

/// Tracks at most one pending frame per stream on top of an [`Environment`].
#[derive(Debug, Default)]
pub struct FrameSlots {
    drag: Option<FrameId>,
    layout: Option<FrameId>,
}

impl FrameSlots {
    fn slot(&mut self, stream: FrameStream) -> &mut Option<FrameId> {
        match stream {
            FrameStream::Drag => &mut self.drag,
            FrameStream::Layout => &mut self.layout,
        }
    }

    /// Keeps an already pending frame; it will read the latest state when it fires.
    pub fn coalesce(&mut self, env: &mut dyn Environment, stream: FrameStream) {
        let slot = self.slot(stream);
        if slot.is_none() {
            *slot = Some(env.request_frame(stream));
        }
    }

    /// Cancels whatever is pending and requests a fresh frame.
    pub fn supersede(&mut self, env: &mut dyn Environment, stream: FrameStream) {
        if let Some(old) = self.slot(stream).take() {
            env.cancel_frame(old);
        }
        *self.slot(stream) = Some(env.request_frame(stream));
    }

    pub fn cancel(&mut self, env: &mut dyn Environment, stream: FrameStream) {
        if let Some(id) = self.slot(stream).take() {
            env.cancel_frame(id);
        }
    }

    pub fn cancel_all(&mut self, env: &mut dyn Environment) {
        self.cancel(env, FrameStream::Drag);
        self.cancel(env, FrameStream::Layout);
    }

    /// Claims a fired frame. Returns the stream it belonged to, or `None` for a stale id.
    pub fn fire(&mut self, id: FrameId) -> Option<FrameStream> {
        [FrameStream::Drag, FrameStream::Layout]
            .into_iter()
            .find(|&stream| {
                let slot = self.slot(stream);
                if *slot == Some(id) {
                    *slot = None;
                    true
                } else {
                    false
                }
            })
    }

    pub fn is_pending(&self, stream: FrameStream) -> bool {
        match stream {
            FrameStream::Drag => self.drag.is_some(),
            FrameStream::Layout => self.layout.is_some(),
        }
    }
}

/// In-memory environment for tests and tools. Frames only fire when the
/// caller drains them with [`HeadlessEnvironment::take_frames`].
#[derive(Debug, Default)]
pub struct HeadlessEnvironment {
    pub viewport: Option<Rect>,
    pub frame: Option<Rect>,
    pub listeners: HashSet<ListenerKind>,
    pub frames: BTreeMap<FrameId, FrameStream>,
    pub captured: Option<PointerId>,
    pub refuse_capture: bool,
    pub focused: Option<FocusTarget>,
    /// Targets that refuse focus, as an unmounted element would.
    pub unfocusable: HashSet<FocusTarget>,
    pub storage: MemoryStorage,
    next_frame: u64,
}

impl HeadlessEnvironment {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport: Some(viewport),
            ..Self::default()
        }
    }

    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn with_storage(mut self, storage: MemoryStorage) -> Self {
        self.storage = storage;
        self
    }

    /// Drains pending frames in request order, like one tick of a frame clock.
    pub fn take_frames(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.frames).into_keys().collect()
    }

    pub fn pending(&self, stream: FrameStream) -> usize {
        self.frames.values().filter(|&&s| s == stream).count()
    }
}

impl Environment for HeadlessEnvironment {
    fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    fn frame(&self) -> Option<Rect> {
        self.frame
    }

    fn listen(&mut self, kind: ListenerKind) {
        self.listeners.insert(kind);
    }

    fn unlisten(&mut self, kind: ListenerKind) {
        self.listeners.remove(&kind);
    }

    fn request_frame(&mut self, stream: FrameStream) -> FrameId {
        self.next_frame += 1;
        let id = FrameId(self.next_frame);
        self.frames.insert(id, stream);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.frames.remove(&id);
    }

    fn capture_pointer(&mut self, pointer: PointerId) -> Result<(), EnvError> {
        if self.refuse_capture {
            return Err(EnvError::Capture(pointer));
        }
        self.captured = Some(pointer);
        Ok(())
    }

    fn release_pointer(&mut self, pointer: PointerId) -> Result<(), EnvError> {
        match self.captured {
            Some(p) if p == pointer => {
                self.captured = None;
                Ok(())
            }
            _ => Err(EnvError::Release(pointer)),
        }
    }

    fn focus(&mut self, target: FocusTarget) -> Result<(), EnvError> {
        if self.unfocusable.contains(&target) {
            return Err(EnvError::Focus(target));
        }
        self.focused = Some(target);
        Ok(())
    }

    fn focused(&self) -> Option<FocusTarget> {
        self.focused
    }

    fn storage(&mut self) -> &mut dyn Storage {
        &mut self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> HeadlessEnvironment {
        HeadlessEnvironment::new(Rect::new(0.0, 0.0, 375.0, 800.0))
    }

    #[test]
    fn test_coalesce_keeps_single_pending_frame() {
        let mut env = env();
        let mut slots = FrameSlots::default();
        slots.coalesce(&mut env, FrameStream::Drag);
        slots.coalesce(&mut env, FrameStream::Drag);
        assert_eq!(env.pending(FrameStream::Drag), 1);
    }

    #[test]
    fn test_supersede_discards_obsolete_frame() {
        let mut env = env();
        let mut slots = FrameSlots::default();
        slots.supersede(&mut env, FrameStream::Layout);
        let first = *env.frames.keys().next().unwrap();
        slots.supersede(&mut env, FrameStream::Layout);

        assert_eq!(env.pending(FrameStream::Layout), 1);
        assert_eq!(slots.fire(first), None);

        let ids = env.take_frames();
        assert_eq!(slots.fire(ids[0]), Some(FrameStream::Layout));
        assert!(!slots.is_pending(FrameStream::Layout));
    }

    #[test]
    fn test_streams_are_independent() {
        let mut env = env();
        let mut slots = FrameSlots::default();
        slots.coalesce(&mut env, FrameStream::Drag);
        slots.supersede(&mut env, FrameStream::Layout);
        slots.cancel(&mut env, FrameStream::Drag);

        assert_eq!(env.pending(FrameStream::Drag), 0);
        assert_eq!(env.pending(FrameStream::Layout), 1);
        slots.cancel_all(&mut env);
        assert!(env.frames.is_empty());
    }

    #[test]
    fn test_release_without_capture_errors() {
        let mut env = env();
        assert!(env.release_pointer(PointerId::from(1)).is_err());
        env.capture_pointer(PointerId::from(1)).unwrap();
        assert!(env.release_pointer(PointerId::from(1)).is_ok());
    }
}
