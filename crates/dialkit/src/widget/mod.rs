//! The widget's root controller. It owns position, selection and disclosure
//! state and is the only place they change; the drag controller, ring and
//! panel hand their results back here.

pub mod view;


use crate::clamp::{self, DEFAULT_MIN_VISIBLE, FRAME_MARGIN};
use crate::drag::{DragController, PointerInput};
use crate::env::{Environment, FocusTarget, FrameId, FrameSlots, FrameStream, ListenerKind};
use crate::geometry::{Offset, Point, Rect};
use crate::items::{self, FaqItem};
use crate::layout::{LayoutValues, SizeParams};
use crate::lifecycle::{Lifecycle, LifecycleEvent};
use crate::panel::{DEFAULT_SMALL_SCREEN_WIDTH, DisclosureState, FocusTrap, PanelMode, TrapOutcome};
use crate::persist::PersistedState;
use crate::ring::{self, Key, Slot, SlotGeometry};
use crate::side::{Placement, PlacementSide, SideInput, SideSelector};
use strum::IntoEnumIterator;

pub use view::{Hit, PanelView, Reaction, SlotView, WidgetView};

/// Distance of the ring container's natural position from the reference frame's
/// bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub right: f64,
    pub bottom: f64,
}

impl Default for Anchor {
    fn default() -> Self {
        Self {
            right: 24.0,
            bottom: 96.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub sizes: SizeParams,
    pub anchor: Anchor,
    pub min_visible: f64,
    pub frame_margin: f64,
    pub small_screen_width: f64,
    pub panel_padding: f64,
    pub safety_buffer: f64,
    pub debug_crosshair: bool,
    pub items: Vec<FaqItem>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            sizes: SizeParams::default(),
            anchor: Anchor::default(),
            min_visible: DEFAULT_MIN_VISIBLE,
            frame_margin: FRAME_MARGIN,
            small_screen_width: DEFAULT_SMALL_SCREEN_WIDTH,
            panel_padding: 16.0,
            safety_buffer: 4.0,
            debug_crosshair: false,
            items: items::default_items(),
        }
    }
}

/// Everything one layout pass measures, applied together or not at all.
#[derive(Debug, Clone, Copy)]
struct Measured {
    layout: LayoutValues,
    reference: Rect,
    small_screen: bool,
}

pub struct Widget<E: Environment> {
    env: E,
    settings: WidgetSettings,
    items: Vec<FaqItem>,
    lifecycle: Lifecycle,
    position: Offset,
    /// What is on screen; differs from `position` only mid-drag.
    rendered: Offset,
    selected: Slot,
    disclosure: DisclosureState,
    preference: bool,
    measured: Option<Measured>,
    placement: Placement,
    drag: DragController,
    side: SideSelector,
    frames: FrameSlots,
    trap: Option<FocusTrap>,
    pressed: Option<Hit>,
}

impl<E: Environment> Widget<E> {
    pub fn new(env: E, settings: WidgetSettings) -> Self {
        let items = items::fill_ring(&settings.items);
        Self {
            env,
            settings,
            items,
            lifecycle: Lifecycle::Closed,
            position: Offset::ORIGIN,
            rendered: Offset::ORIGIN,
            selected: Slot::default(),
            disclosure: DisclosureState::default(),
            preference: false,
            measured: None,
            placement: Placement {
                side: PlacementSide::Right,
                overlay: false,
                desc_width: 0.0,
                max_widget_width: None,
                recenter_dx: 0.0,
            },
            drag: DragController::default(),
            side: SideSelector::default(),
            frames: FrameSlots::default(),
            trap: None,
            pressed: None,
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn position(&self) -> Offset {
        self.position
    }

    pub fn rendered_offset(&self) -> Offset {
        self.rendered
    }

    pub fn selected(&self) -> Slot {
        self.selected
    }

    pub fn disclosure(&self) -> DisclosureState {
        self.disclosure
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn layout(&self) -> Option<LayoutValues> {
        self.measured.map(|m| m.layout)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn panel_mode(&self) -> PanelMode {
        let small = self.measured.is_some_and(|m| m.small_screen);
        PanelMode::select(small, self.placement.overlay)
    }

    /// Swaps settings in place, e.g. after a config reload. Takes effect on the next layout pass.
    pub fn update_settings(&mut self, settings: WidgetSettings) -> Reaction {
        self.items = items::fill_ring(&settings.items);
        self.settings = settings;
        self.side.reset();
        if self.lifecycle.is_mounted() {
            self.frames.supersede(&mut self.env, FrameStream::Layout);
        }
        Reaction::REDRAW
    }

    fn transition(&mut self, event: LifecycleEvent) -> bool {
        match self.lifecycle.next(event) {
            Some(next) => {
                log::debug!("Widget {:?} -> {:?}", self.lifecycle, next);
                self.lifecycle = next;
                true
            }
            None => false,
        }
    }

    /// The host's open/closed prop.
    pub fn set_open(&mut self, open: bool) -> Reaction {
        if open {
            self.open()
        } else {
            self.close()
        }
    }

    fn open(&mut self) -> Reaction {
        if !self.transition(LifecycleEvent::Open) {
            return Reaction::NONE;
        }

        let persisted = PersistedState::load(self.env.storage());
        self.position = persisted.position;
        self.rendered = persisted.position;
        self.selected = persisted.selected;
        self.preference = persisted.description_open;
        self.disclosure = DisclosureState::default();
        self.side.reset();

        self.env.listen(ListenerKind::Resize);
        self.env.listen(ListenerKind::KeyDown);
        self.frames.supersede(&mut self.env, FrameStream::Layout);
        Reaction::REDRAW
    }

    fn close(&mut self) -> Reaction {
        if !self.transition(LifecycleEvent::Close) {
            return Reaction::NONE;
        }
        self.teardown();
        self.transition(LifecycleEvent::TeardownDone);
        Reaction::REDRAW
    }

    fn teardown(&mut self) {
        self.drag.teardown(&mut self.env, &mut self.frames);
        self.frames.cancel_all(&mut self.env);
        if let Some(trap) = self.trap.take() {
            trap.release(&mut self.env, FocusTarget::Slot(self.selected));
        }
        for kind in ListenerKind::iter() {
            self.env.unlisten(kind);
        }
        self.disclosure = DisclosureState::default();
        self.pressed = None;
    }

    /// Viewport or frame size changed. Any pending layout pass is superseded.
    pub fn resize(&mut self) -> Reaction {
        if !self.lifecycle.is_mounted() {
            return Reaction::NONE;
        }
        self.frames.supersede(&mut self.env, FrameStream::Layout);
        Reaction::NONE
    }

    /// A frame requested through the environment fired.
    pub fn on_frame(&mut self, id: FrameId) -> Reaction {
        match self.frames.fire(id) {
            Some(FrameStream::Drag) => match self.drag.live_offset() {
                Some(live) => {
                    let changed = live != self.rendered;
                    self.rendered = live;
                    Reaction::redraw_if(changed)
                }
                None => Reaction::NONE,
            },
            Some(FrameStream::Layout) => self.layout_frame(),
            None => Reaction::NONE,
        }
    }

    fn layout_frame(&mut self) -> Reaction {
        if !self.layout_pass() {
            return Reaction::NONE;
        }
        if self.transition(LifecycleEvent::LayoutReady) {
            // the stored preference only decides whether toggles are honoured
            self.disclosure.allowed = self.preference;
            self.focus(FocusTarget::Slot(self.selected));
        }
        self.sync_trap();
        Reaction::REDRAW
    }

    fn measure(&self) -> Option<Measured> {
        let viewport = self.env.viewport().filter(Rect::is_finite)?;
        let layout = LayoutValues::compute(&self.settings.sizes, viewport.width)?;
        let reference = clamp::reference_rect(viewport, self.env.frame(), self.settings.frame_margin);
        Some(Measured {
            layout,
            reference,
            small_screen: viewport.width < self.settings.small_screen_width,
        })
    }

    fn natural_rect(&self, m: &Measured) -> Rect {
        let circle = m.layout.circle_diameter;
        Rect::new(
            m.reference.right() - self.settings.anchor.right - circle,
            m.reference.bottom() - self.settings.anchor.bottom - circle,
            circle,
            circle,
        )
    }

    fn clamp_to(&self, m: &Measured, candidate: Offset) -> Offset {
        clamp::clamp(
            candidate,
            self.natural_rect(m),
            m.reference,
            self.settings.min_visible,
        )
    }

    /// Measures, places and clamps in one go. Returns `false` when measurement
    /// is not possible yet; the next layout trigger retries.
    fn layout_pass(&mut self) -> bool {
        let Some(m) = self.measure() else {
            log::debug!("Layout pass skipped: nothing to measure yet");
            return false;
        };

        let mut position = self.clamp_to(&m, self.position);
        let input = SideInput {
            container: self.natural_rect(&m).translate(position),
            frame: m.reference,
            circle: m.layout.circle_diameter,
            gap: m.layout.gap,
            padding_left: self.settings.panel_padding,
            padding_right: self.settings.panel_padding,
            safety: self.settings.safety_buffer,
            preferred_desc: m.layout.desc_panel_width,
        };
        let placement = self.side.update(&input);
        if let Some(p) = placement
            && p.recenter_dx != 0.0
        {
            position = self.clamp_to(&m, Offset::new(position.x + p.recenter_dx, position.y));
        }

        self.measured = Some(m);
        if let Some(p) = placement {
            self.placement = p;
        }
        self.commit_position(position);
        true
    }

    fn commit_position(&mut self, position: Offset) {
        if !self.drag.is_dragging() {
            self.rendered = position;
        }
        if position != self.position {
            self.position = position;
            PersistedState::save_position(self.env.storage(), position);
        }
    }

    fn focus(&mut self, target: FocusTarget) {
        if let Err(e) = self.env.focus(target) {
            log::debug!("Focus skipped: {}", e);
        }
    }

    fn set_selected(&mut self, slot: Slot) {
        if slot != self.selected {
            self.selected = slot;
            PersistedState::save_selected(self.env.storage(), slot);
        }
        self.focus(FocusTarget::Slot(slot));
    }

    fn set_disclosure(&mut self, next: DisclosureState) {
        let visible_changed = next.visible != self.disclosure.visible;
        self.disclosure = next;
        if visible_changed {
            self.preference = next.visible;
            PersistedState::save_description_open(self.env.storage(), next.visible);
        }
        self.sync_trap();
    }

    /// Arms the focus trap exactly while the overlay panel is showing.
    fn sync_trap(&mut self) {
        let wants_trap = self.lifecycle.is_mounted()
            && self.disclosure.shown()
            && self.panel_mode() == PanelMode::Overlay;

        match (wants_trap, self.trap.is_some()) {
            (true, false) => {
                self.trap = Some(FocusTrap::activate(
                    &mut self.env,
                    vec![FocusTarget::PanelClose],
                ));
            }
            (false, true) => {
                if let Some(trap) = self.trap.take() {
                    trap.release(&mut self.env, FocusTarget::Slot(self.selected));
                }
            }
            _ => {}
        }
    }

    /// Pointer or keyboard activation of a ring slot.
    pub fn activate_slot(&mut self, slot: Slot) -> Reaction {
        if !self.lifecycle.is_mounted() {
            return Reaction::NONE;
        }
        let mut disclosure = self.disclosure;
        let slot = ring::activate(self.selected, slot, &mut disclosure);
        self.set_selected(slot);
        self.set_disclosure(disclosure);
        Reaction::REDRAW
    }

    pub fn close_panel(&mut self) -> Reaction {
        if self.disclosure == DisclosureState::default() {
            return Reaction::NONE;
        }
        let mut disclosure = self.disclosure;
        disclosure.close();
        self.set_disclosure(disclosure);
        if self.env.focused().is_some_and(FocusTarget::is_within_panel) {
            self.focus(FocusTarget::Slot(self.selected));
        }
        Reaction::REDRAW
    }

    /// Slots, then the centre button, then the panel's close button while it shows.
    fn tab_order(&self) -> Vec<FocusTarget> {
        let mut order: Vec<_> = Slot::iter().map(FocusTarget::Slot).collect();
        order.push(FocusTarget::CenterButton);
        if self.disclosure.shown() {
            order.push(FocusTarget::PanelClose);
        }
        order
    }

    fn tab(&mut self, shift: bool) -> Reaction {
        let order = self.tab_order();
        let len = order.len();
        let current = self
            .env
            .focused()
            .and_then(|f| order.iter().position(|t| *t == f));
        let next = match current {
            Some(i) if shift => (i + len - 1) % len,
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.focus(order[next]);
        Reaction::REDRAW
    }

    pub fn key(&mut self, key: Key, shift: bool) -> Reaction {
        if !self.lifecycle.is_mounted() {
            return Reaction::NONE;
        }

        let pressed = matches!(key, Key::Enter | Key::Space);

        if let Some(trap) = &self.trap {
            return match trap.key(key, shift, &mut self.env) {
                TrapOutcome::Close => self.close_panel(),
                TrapOutcome::Handled => Reaction::REDRAW,
                TrapOutcome::Ignored
                    if pressed && self.env.focused() == Some(FocusTarget::PanelClose) =>
                {
                    self.close_panel()
                }
                TrapOutcome::Ignored => Reaction::NONE,
            };
        }

        if key == Key::Escape {
            // one consumer per press: an open panel swallows it
            return if self.disclosure.shown() {
                self.close_panel()
            } else {
                Reaction::CLOSE
            };
        }
        if key == Key::Tab {
            return self.tab(shift);
        }

        match self.env.focused() {
            Some(FocusTarget::Slot(focused)) => {
                if let Some(next) = ring::navigate(focused, key) {
                    self.set_selected(next);
                    return Reaction::REDRAW;
                }
                if pressed {
                    self.activate_slot(focused)
                } else {
                    Reaction::NONE
                }
            }
            Some(FocusTarget::CenterButton) if pressed => Reaction::CLOSE,
            Some(FocusTarget::PanelClose) if pressed => self.close_panel(),
            _ => Reaction::NONE,
        }
    }

    pub fn focus_in(&mut self, target: FocusTarget) -> Reaction {
        if let Some(trap) = &self.trap
            && trap.focus_in(target, &mut self.env)
        {
            return Reaction::REDRAW;
        }
        Reaction::NONE
    }

    pub fn pointer_down(&mut self, input: PointerInput) -> Reaction {
        if !self.lifecycle.is_mounted() {
            return Reaction::NONE;
        }
        let hit = self.hit_test(input.position);
        if hit == Hit::Nothing || !input.button.is_primary() {
            return Reaction::NONE;
        }
        self.pressed = Some(hit);
        self.drag
            .pointer_down(input, hit.target_kind(), self.position, &mut self.env);
        Reaction::NONE
    }

    pub fn pointer_move(&mut self, position: Point) -> Reaction {
        self.drag.pointer_move(position, &mut self.env, &mut self.frames);
        Reaction::NONE
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> Reaction {
        let pressed = self.pressed.take();

        if self.drag.is_dragging() {
            let Some(m) = self.measured else {
                self.drag.teardown(&mut self.env, &mut self.frames);
                self.rendered = self.position;
                return Reaction::REDRAW;
            };
            let natural = self.natural_rect(&m);
            let (reference, min_visible) = (m.reference, self.settings.min_visible);
            let committed = self.drag.pointer_up(
                Some(input.position),
                &mut self.env,
                &mut self.frames,
                |p| clamp::clamp(p, natural, reference, min_visible),
            );
            if let Some(position) = committed {
                self.commit_position(position);
                self.frames.supersede(&mut self.env, FrameStream::Layout);
            }
            return Reaction::REDRAW;
        }

        let Some(pressed) = pressed else {
            return Reaction::NONE;
        };
        if self.hit_test(input.position) != pressed {
            return Reaction::NONE;
        }
        match pressed {
            Hit::Slot(slot) => self.activate_slot(slot),
            Hit::CenterButton => Reaction::CLOSE,
            Hit::PanelClose | Hit::Backdrop => self.close_panel(),
            Hit::Panel | Hit::Surface | Hit::Nothing => Reaction::NONE,
        }
    }

    fn container(&self, m: &Measured) -> Rect {
        self.natural_rect(m).translate(self.rendered)
    }

    fn ring_center(&self, m: &Measured) -> Point {
        let c = self.container(m);
        let offset = m.layout.ring_center_offset;
        Point::new(c.left() + offset, c.top() + offset)
    }

    fn panel_rect(&self, m: &Measured) -> Rect {
        match self.panel_mode() {
            PanelMode::Inline => {
                view::inline_panel_rect(self.container(m), &m.layout, &self.placement)
            }
            PanelMode::Overlay => view::overlay_panel_rect(m.reference, &self.placement),
        }
    }

    pub fn hit_test(&self, point: Point) -> Hit {
        let Some(m) = self.measured.filter(|_| self.lifecycle.is_mounted()) else {
            return Hit::Nothing;
        };

        if self.disclosure.shown() {
            let panel = self.panel_rect(&m);
            if view::close_button_rect(panel).contains(point) {
                return Hit::PanelClose;
            }
            if panel.contains(point) {
                return Hit::Panel;
            }
            if self.panel_mode() == PanelMode::Overlay {
                return Hit::Backdrop;
            }
        }

        let center = self.ring_center(&m);
        if center.distance(point) <= view::CENTER_BUTTON_RADIUS {
            return Hit::CenterButton;
        }
        let slots = SlotGeometry::ring(center, m.layout.ring_radius, m.layout.hit_target_size);
        if let Some(g) = slots.iter().find(|g| g.hit_box.contains(point)) {
            return Hit::Slot(g.slot);
        }
        if center.distance(point) <= m.layout.circle_diameter / 2.0 {
            return Hit::Surface;
        }
        Hit::Nothing
    }

    /// Render model. `None` while closed or before the first layout pass.
    pub fn view(&self) -> Option<WidgetView<'_>> {
        let m = self.measured.filter(|_| self.lifecycle.is_mounted())?;
        let container = self.container(&m);
        let center = self.ring_center(&m);
        let focused = self.env.focused();

        let slots = SlotGeometry::ring(center, m.layout.ring_radius, m.layout.hit_target_size)
            .into_iter()
            .map(|geometry| SlotView {
                active: geometry.slot == self.selected,
                focused: focused == Some(FocusTarget::Slot(geometry.slot)),
                item: &self.items[geometry.slot.index()],
                geometry,
            })
            .collect();

        let mode = self.panel_mode();
        let shown = self.disclosure.shown();
        let panel = (mode == PanelMode::Inline || shown).then(|| {
            let rect = self.panel_rect(&m);
            PanelView {
                mode,
                side: self.placement.side,
                rect,
                close_button: view::close_button_rect(rect),
                close_focused: focused == Some(FocusTarget::PanelClose),
                item: &self.items[self.selected.index()],
                shown,
            }
        });

        Some(WidgetView {
            reference: m.reference,
            container,
            ring_center: center,
            layout: m.layout,
            slots,
            center_button_radius: view::CENTER_BUTTON_RADIUS,
            center_focused: focused == Some(FocusTarget::CenterButton),
            panel,
            backdrop: (mode == PanelMode::Overlay && shown).then_some(m.reference),
            crosshair: self.settings.debug_crosshair.then_some(center),
            dragging: self.drag.is_dragging(),
        })
    }
}

impl<E: Environment> Drop for Widget<E> {
    fn drop(&mut self) {
        if self.lifecycle.is_mounted() {
            self.teardown();
        }
    }
}
