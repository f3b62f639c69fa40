use crate::drag::TargetKind;
use crate::geometry::{Point, Rect};
use crate::items::FaqItem;
use crate::layout::LayoutValues;
use crate::panel::PanelMode;
use crate::ring::{Slot, SlotGeometry};
use crate::side::{PlacementSide, Placement};

pub const CENTER_BUTTON_RADIUS: f64 = 28.0;
pub const INLINE_PANEL_HEIGHT: f64 = 120.0;
pub const OVERLAY_PANEL_HEIGHT: f64 = 200.0;
pub const CLOSE_BUTTON_SIZE: f64 = 28.0;
const CLOSE_BUTTON_INSET: f64 = 6.0;

/// What the host should do after feeding the widget an input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reaction {
    pub should_redraw: bool,
    pub should_close: bool,
}

impl Reaction {
    pub const NONE: Reaction = Reaction {
        should_redraw: false,
        should_close: false,
    };
    pub const REDRAW: Reaction = Reaction {
        should_redraw: true,
        should_close: false,
    };
    pub const CLOSE: Reaction = Reaction {
        should_redraw: false,
        should_close: true,
    };

    pub fn redraw_if(changed: bool) -> Self {
        Self {
            should_redraw: changed,
            should_close: false,
        }
    }
}

/// The element under a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Slot(Slot),
    CenterButton,
    Panel,
    PanelClose,
    Backdrop,
    Surface,
    Nothing,
}

impl Hit {
    pub fn target_kind(self) -> TargetKind {
        match self {
            Self::Slot(_) | Self::CenterButton | Self::PanelClose => TargetKind::Button,
            Self::Panel | Self::Backdrop | Self::Nothing => TargetKind::NoDrag,
            Self::Surface => TargetKind::Surface,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlotView<'a> {
    pub geometry: SlotGeometry,
    pub item: &'a FaqItem,
    pub active: bool,
    pub focused: bool,
}

#[derive(Debug, Clone)]
pub struct PanelView<'a> {
    pub mode: PanelMode,
    pub side: PlacementSide,
    pub rect: Rect,
    pub close_button: Rect,
    pub close_focused: bool,
    pub item: &'a FaqItem,
    /// Inline panels stay in the view while hidden so their box keeps being measured.
    pub shown: bool,
}

#[derive(Debug, Clone)]
pub struct WidgetView<'a> {
    pub reference: Rect,
    pub container: Rect,
    pub ring_center: Point,
    pub layout: LayoutValues,
    pub slots: Vec<SlotView<'a>>,
    pub center_button_radius: f64,
    pub center_focused: bool,
    pub panel: Option<PanelView<'a>>,
    /// Dimmed area behind an overlay panel.
    pub backdrop: Option<Rect>,
    pub crosshair: Option<Point>,
    pub dragging: bool,
}

/// Where the inline panel sits next to the ring container.
pub fn inline_panel_rect(container: Rect, layout: &LayoutValues, placement: &Placement) -> Rect {
    let x = match placement.side {
        PlacementSide::Right => container.right() + layout.gap,
        PlacementSide::Left => container.left() - layout.gap - placement.desc_width,
    };
    Rect::new(x, container.top(), placement.desc_width, INLINE_PANEL_HEIGHT)
}

pub fn overlay_panel_rect(reference: Rect, placement: &Placement) -> Rect {
    let width = placement
        .max_widget_width
        .unwrap_or(reference.width * crate::side::OVERLAY_WIDTH_RATIO);
    let height = OVERLAY_PANEL_HEIGHT.min(reference.height);
    Rect::centered_on(reference.center(), width, height)
}

pub fn close_button_rect(panel: Rect) -> Rect {
    Rect::new(
        panel.right() - CLOSE_BUTTON_SIZE - CLOSE_BUTTON_INSET,
        panel.top() + CLOSE_BUTTON_INSET,
        CLOSE_BUTTON_SIZE,
        CLOSE_BUTTON_SIZE,
    )
}
