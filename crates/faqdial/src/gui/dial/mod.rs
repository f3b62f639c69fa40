pub mod host;
pub mod view;

pub use host::GtkEnvironment;
pub use view::draw;

pub const FONT_FACE: &str = "Sans";
pub const PANEL_INSET: f64 = 12.0;
pub const PANEL_RADIUS: f64 = 10.0;
pub const TITLE_SCALE: f64 = 1.15;
pub const LINE_SPACING: f64 = 1.3;
