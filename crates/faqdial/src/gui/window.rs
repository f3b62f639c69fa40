use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};

pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("faqdial"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(KeyboardMode::OnDemand);
}

/// The monitor under the pointer, so the overlay opens where the user is looking.
pub fn monitor_at_pointer() -> Option<gdk::Monitor> {
    let display = gdk::Display::default()?;
    let pointer = display.default_seat()?.pointer()?;
    let (surface, _, _) = pointer.surface_at_position();
    display.monitor_at_surface(&surface?)
}

pub fn move_to_pointer_monitor(window: &gtk::ApplicationWindow) {
    if let Some(monitor) = monitor_at_pointer() {
        window.set_monitor(Some(&monitor));
    }
}
