use crate::geometry::{Point, Rect};
use crate::panel::DisclosureState;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::f64::consts::PI;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

pub const SLOT_COUNT: usize = 8;
pub const ANGLE_STEP: f64 = 2.0 * PI / SLOT_COUNT as f64;
pub const START_OFFSET: f64 = -PI / 2.0;

/// One of the eight fixed positions around the ring, clockwise from the top.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    #[default]
    #[strum(serialize = "North", serialize = "n", serialize = "0")]
    North,
    #[strum(serialize = "NorthEast", serialize = "ne", serialize = "1")]
    NorthEast,
    #[strum(serialize = "East", serialize = "e", serialize = "2")]
    East,
    #[strum(serialize = "SouthEast", serialize = "se", serialize = "3")]
    SouthEast,
    #[strum(serialize = "South", serialize = "s", serialize = "4")]
    South,
    #[strum(serialize = "SouthWest", serialize = "sw", serialize = "5")]
    SouthWest,
    #[strum(serialize = "West", serialize = "w", serialize = "6")]
    West,
    #[strum(serialize = "NorthWest", serialize = "nw", serialize = "7")]
    NorthWest,
}

impl Slot {
    pub const FIRST: Slot = Slot::North;
    pub const LAST: Slot = Slot::NorthWest;

    pub fn index(self) -> usize {
        self as usize
    }

    /// Exact lookup; indices past the ring are rejected rather than wrapped.
    pub fn from_index(idx: usize) -> Option<Self> {
        (idx < SLOT_COUNT).then(|| Self::iter().nth(idx)).flatten()
    }

    fn wrapping(idx: usize) -> Self {
        Self::from_index(idx % SLOT_COUNT).unwrap_or_default()
    }

    pub fn next(self) -> Self {
        Self::wrapping(self.index() + 1)
    }

    pub fn prev(self) -> Self {
        Self::wrapping(self.index() + SLOT_COUNT - 1)
    }

    pub fn angle(self) -> f64 {
        START_OFFSET + self.index() as f64 * ANGLE_STEP
    }

    pub fn position(self, center: Point, radius: f64) -> Point {
        let angle = self.angle();
        Point::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowDown,
    ArrowLeft,
    ArrowUp,
    Home,
    End,
    Tab,
    Escape,
    Enter,
    Space,
    Other,
}

/// Moves the selection for a navigation key. Other keys leave it alone.
pub fn navigate(current: Slot, key: Key) -> Option<Slot> {
    match key {
        Key::ArrowRight | Key::ArrowDown => Some(current.next()),
        Key::ArrowLeft | Key::ArrowUp => Some(current.prev()),
        Key::Home => Some(Slot::FIRST),
        Key::End => Some(Slot::LAST),
        _ => None,
    }
}

/// Applies a click on `slot`. Returns the new selection and updates the disclosure in place.
pub fn activate(selected: Slot, slot: Slot, disclosure: &mut DisclosureState) -> Slot {
    disclosure.allowed = true;
    if slot == selected {
        disclosure.visible = !disclosure.visible;
    } else {
        disclosure.visible = true;
    }
    slot
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGeometry {
    pub slot: Slot,
    pub center: Point,
    pub hit_box: Rect,
}

impl SlotGeometry {
    /// Places all eight slots around `center`. The hit box is a square of `hit_size`.
    pub fn ring(center: Point, radius: f64, hit_size: f64) -> Vec<Self> {
        Slot::iter()
            .map(|slot| {
                let c = slot.position(center, radius);
                Self {
                    slot,
                    center: c,
                    hit_box: Rect::centered_on(c, hit_size, hit_size),
                }
            })
            .collect()
    }
}
