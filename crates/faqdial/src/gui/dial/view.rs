use super::{FONT_FACE, LINE_SPACING, PANEL_INSET, PANEL_RADIUS, TITLE_SCALE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use dialkit::geometry::{Point, Rect};
use dialkit::layout::LayoutValues;
use dialkit::panel::PanelMode;
use dialkit::widget::{PanelView, SlotView, WidgetView};
use palette::Srgba;
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn rounded_rect(cr: &Context, rect: Rect, radius: f64) {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0);
    cr.new_sub_path();
    cr.arc(rect.right() - r, rect.top() + r, r, -PI / 2.0, 0.0);
    cr.arc(rect.right() - r, rect.bottom() - r, r, 0.0, PI / 2.0);
    cr.arc(rect.left() + r, rect.bottom() - r, r, PI / 2.0, PI);
    cr.arc(rect.left() + r, rect.top() + r, r, PI, 1.5 * PI);
    cr.close_path();
}

fn draw_focus_ring(
    cr: &Context,
    center: Point,
    radius: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_color(cr, colors.focus);
    cr.set_line_width(2.0);
    cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
    cr.stroke()
}

fn draw_cross(cr: &Context, center: Point, half: f64) -> Result<(), cairo::Error> {
    cr.move_to(center.x - half, center.y - half);
    cr.line_to(center.x + half, center.y + half);
    cr.move_to(center.x + half, center.y - half);
    cr.line_to(center.x - half, center.y + half);
    cr.stroke()
}

/// Greedy word wrap. `measure` gives the rendered width of a candidate line.
pub fn wrap_lines(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `item_size` is the tile's diameter.
pub fn tile_radius(layout: &LayoutValues) -> f64 {
    layout.item_size / 2.0
}

struct SlotRenderer<'a> {
    slot: &'a SlotView<'a>,
    radius: f64,
}

impl<'a> SlotRenderer<'a> {
    fn new(slot: &'a SlotView<'a>, radius: f64) -> Self {
        Self { slot, radius }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let center = self.slot.geometry.center;
        set_color(
            cr,
            if self.slot.active {
                colors.tile_active
            } else {
                colors.tile
            },
        );
        cr.arc(center.x, center.y, self.radius, 0.0, 2.0 * PI);
        cr.fill()?;

        if self.slot.focused {
            draw_focus_ring(cr, center, self.radius + 3.0, colors)?;
        }

        self.draw_label(cr, colors)
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let label = (self.slot.geometry.slot.index() + 1).to_string();
        let center = self.slot.geometry.center;
        set_color(cr, colors.text);
        cr.select_font_face(FONT_FACE, cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(self.radius * 1.2);
        if let Ok(ext) = cr.text_extents(&label) {
            cr.move_to(
                center.x - ext.width() / 2.0 - ext.x_bearing(),
                center.y + ext.height() / 2.0,
            );
            cr.show_text(&label)?;
        }
        Ok(())
    }
}

struct PanelRenderer<'a> {
    panel: &'a PanelView<'a>,
    font_size: f64,
}

impl PanelRenderer<'_> {
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let rect = self.panel.rect;
        set_color(cr, colors.panel);
        rounded_rect(cr, rect, PANEL_RADIUS);
        cr.fill()?;

        let close = self.panel.close_button;
        if self.panel.close_focused {
            draw_focus_ring(cr, close.center(), close.width / 2.0, colors)?;
        }
        set_color(cr, colors.text);
        cr.set_line_width(2.0);
        draw_cross(cr, close.center(), close.width / 4.0)?;

        cr.save()?;
        rounded_rect(cr, rect, PANEL_RADIUS);
        cr.clip();
        let text_width = close.left() - rect.left() - 2.0 * PANEL_INSET;
        let mut y = rect.top() + PANEL_INSET;
        y = self.draw_block(cr, &self.panel.item.title, y, text_width, true)?;
        self.draw_block(cr, &self.panel.item.body, y, rect.width - 2.0 * PANEL_INSET, false)?;
        cr.restore()
    }

    fn draw_block(
        &self,
        cr: &Context,
        text: &str,
        mut y: f64,
        width: f64,
        title: bool,
    ) -> Result<f64, cairo::Error> {
        let (weight, size) = if title {
            (cairo::FontWeight::Bold, self.font_size * TITLE_SCALE)
        } else {
            (cairo::FontWeight::Normal, self.font_size)
        };
        cr.select_font_face(FONT_FACE, cairo::FontSlant::Normal, weight);
        cr.set_font_size(size);

        let measure = |s: &str| cr.text_extents(s).map(|e| e.x_advance()).unwrap_or(f64::MAX);
        for line in wrap_lines(text, width, measure) {
            y += size;
            cr.move_to(self.panel.rect.left() + PANEL_INSET, y);
            cr.show_text(&line)?;
            y += size * (LINE_SPACING - 1.0);
        }
        Ok(y + size * 0.5)
    }
}

pub fn draw(cr: &Context, view: &WidgetView<'_>, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let center = view.ring_center;
    let layout = &view.layout;

    set_color(cr, colors.ring);
    cr.arc(
        center.x,
        center.y,
        layout.circle_diameter / 2.0,
        0.0,
        2.0 * PI,
    );
    cr.fill()?;

    for slot in &view.slots {
        SlotRenderer::new(slot, tile_radius(layout)).draw(cr, colors)?;
    }

    draw_center_button(cr, view, colors)?;

    if let Some(backdrop) = view.backdrop {
        set_color(cr, colors.backdrop);
        cr.rectangle(backdrop.x, backdrop.y, backdrop.width, backdrop.height);
        cr.fill()?;
    }

    // inline panels stay in the view while hidden; only paint the shown one
    if let Some(panel) = view.panel.as_ref().filter(|p| p.shown) {
        let font_size = match panel.mode {
            PanelMode::Inline => layout.item_size * 0.7,
            PanelMode::Overlay => layout.item_size * 0.85,
        };
        PanelRenderer { panel, font_size }.draw(cr, colors)?;
    }

    if let Some(point) = view.crosshair {
        set_color(cr, colors.crosshair);
        cr.set_line_width(1.0);
        cr.move_to(point.x - 10.0, point.y);
        cr.line_to(point.x + 10.0, point.y);
        cr.move_to(point.x, point.y - 10.0);
        cr.line_to(point.x, point.y + 10.0);
        cr.stroke()?;
    }
    Ok(())
}

fn draw_center_button(
    cr: &Context,
    view: &WidgetView<'_>,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let center = view.ring_center;
    set_color(cr, colors.center);
    cr.arc(center.x, center.y, view.center_button_radius, 0.0, 2.0 * PI);
    cr.fill()?;
    if view.center_focused {
        draw_focus_ring(cr, center, view.center_button_radius + 3.0, colors)?;
    }

    set_color(cr, colors.text);
    cr.set_line_width(2.0);
    draw_cross(cr, center, view.center_button_radius / 3.0)
}
