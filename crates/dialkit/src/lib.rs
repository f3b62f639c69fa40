pub mod clamp;
pub mod drag;
pub mod env;
pub mod geometry;
pub mod items;
pub mod layout;
pub mod lifecycle;
pub mod panel;
pub mod persist;
pub mod ring;
pub mod side;
pub mod storage;
pub mod widget;

/// Unix socket the overlay listens on for `show`/`hide`/`toggle`.
pub const SOCKET_PATH: &str = "/tmp/faqdial.sock";
