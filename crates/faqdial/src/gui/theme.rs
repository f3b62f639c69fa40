use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub ring: Srgba<f64>,
    pub tile: Srgba<f64>,
    pub tile_active: Srgba<f64>,
    pub focus: Srgba<f64>,
    pub center: Srgba<f64>,
    pub panel: Srgba<f64>,
    pub text: Srgba<f64>,
    pub backdrop: Srgba<f64>,
    pub crosshair: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            ring: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.15, 0.15, 0.15, 0.6),
                Some(0.6),
            ),
            tile: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.25, 0.25, 0.25, 0.85),
                Some(0.3),
            ),
            tile_active: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.4, 0.4, 0.8, 0.9),
                Some(0.9),
            ),
            focus: Self::lookup_color(
                context,
                "theme_selected_fg_color",
                Srgba::new(1.0, 1.0, 1.0, 0.9),
                None,
            ),
            center: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.2, 0.2, 0.2, 0.25),
                Some(0.2),
            ),
            panel: Self::lookup_color(
                context,
                "theme_base_color",
                Srgba::new(0.1, 0.1, 0.12, 0.95),
                Some(0.95),
            ),
            text: Self::lookup_color(
                context,
                "theme_text_color",
                Srgba::new(0.95, 0.95, 0.95, 1.0),
                None,
            ),
            backdrop: Srgba::new(0.0, 0.0, 0.0, 0.4),
            crosshair: Self::lookup_color(
                context,
                "error_color",
                Srgba::new(0.9, 0.2, 0.2, 0.8),
                Some(0.8),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.faqdial-window, .faqdial-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
