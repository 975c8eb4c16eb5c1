use super::{
    HOVER_RADIUS, THUMB_CORE_RADIUS, THUMB_RADIUS, TOOLTIP_FONT_SIZE, TRACK_WIDTH,
    UNIT_FONT_SIZE, VALUE_FONT_SIZE,
};
use crate::gui::theme::ThemeColors;
use cairo::{Context, FontSlant, FontWeight, LineCap};
use dialkit::format::format_dial_value;
use dialkit::{DialFrame, DialUnit, Point};
use palette::Srgba;
use std::f64::consts::PI;

// cairo measures angles from 3 o'clock; dials start at 12
const TOP: f64 = -PI / 2.0;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct DialRenderer<'a> {
    frame: &'a DialFrame,
    unit: DialUnit,
    colors: &'a ThemeColors,
}

impl<'a> DialRenderer<'a> {
    fn new(frame: &'a DialFrame, unit: DialUnit, colors: &'a ThemeColors) -> Self {
        Self {
            frame,
            unit,
            colors,
        }
    }

    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        draw_track(cr, self.frame.center, self.frame.radius, self.colors)?;
        draw_arc(
            cr,
            self.frame.center,
            self.frame.radius,
            self.frame.progress_fraction(),
            self.colors.accent,
        )?;
        self.draw_thumb(cr)?;
        self.draw_center_label(cr)?;
        self.draw_hover(cr)
    }

    fn draw_thumb(&self, cr: &Context) -> Result<(), cairo::Error> {
        let p = self.frame.indicator();

        set_color(cr, self.colors.accent);
        cr.arc(p.x, p.y, THUMB_RADIUS, 0.0, 2.0 * PI);
        cr.fill()?;

        set_color(cr, self.colors.thumb_outline);
        cr.set_line_width(2.0);
        cr.arc(p.x, p.y, THUMB_RADIUS, 0.0, 2.0 * PI);
        cr.stroke()?;

        set_color(cr, self.colors.accent);
        cr.arc(p.x, p.y, THUMB_CORE_RADIUS, 0.0, 2.0 * PI);
        cr.fill()
    }

    fn draw_center_label(&self, cr: &Context) -> Result<(), cairo::Error> {
        let c = self.frame.center;
        set_color(cr, self.colors.label);

        cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);
        cr.set_font_size(VALUE_FONT_SIZE);
        let value = format_dial_value(self.frame.value);
        let ext = cr.text_extents(&value)?;
        cr.move_to(c.x - ext.width() / 2.0 - ext.x_bearing(), c.y);
        cr.show_text(&value)?;

        cr.set_font_size(UNIT_FONT_SIZE);
        let unit = self.unit.label();
        let ext = cr.text_extents(unit)?;
        let mut faded = self.colors.label;
        faded.alpha *= 0.6;
        set_color(cr, faded);
        cr.move_to(c.x - ext.width() / 2.0 - ext.x_bearing(), c.y + ext.height() + 4.0);
        cr.show_text(unit)
    }

    /// Preview dot plus a small "NN unit" tag above it.
    fn draw_hover(&self, cr: &Context) -> Result<(), cairo::Error> {
        let (Some(step), Some(p)) = (self.frame.hover_step, self.frame.hover_indicator()) else {
            return Ok(());
        };

        set_color(cr, self.colors.hover);
        cr.arc(p.x, p.y, HOVER_RADIUS, 0.0, 2.0 * PI);
        cr.fill()?;

        let text = format!("{} {}", step, self.unit.label());
        cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);
        cr.set_font_size(TOOLTIP_FONT_SIZE);
        let ext = cr.text_extents(&text)?;
        let (pad_x, pad_y) = (4.0, 2.0);
        let (w, h) = (ext.width() + pad_x * 2.0, ext.height() + pad_y * 2.0);
        let (x, y) = (p.x - w / 2.0, p.y - 8.0 - h);

        set_color(cr, self.colors.tooltip_bg);
        rounded_rect(cr, x, y, w, h, 3.0);
        cr.fill()?;

        set_color(cr, self.colors.tooltip_fg);
        cr.move_to(x + pad_x - ext.x_bearing(), y + pad_y - ext.y_bearing());
        cr.show_text(&text)
    }
}

fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 1.5 * PI);
    cr.close_path();
}

fn draw_track(
    cr: &Context,
    center: Point,
    radius: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_color(cr, colors.track);
    cr.set_line_width(TRACK_WIDTH);
    cr.new_path();
    cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
    cr.stroke()
}

/// Clockwise arc from 12 o'clock covering `fraction` of the ring.
fn draw_arc(
    cr: &Context,
    center: Point,
    radius: f64,
    fraction: f64,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    if fraction <= 0.0 {
        return Ok(());
    }
    set_color(cr, color);
    cr.set_line_width(TRACK_WIDTH);
    cr.set_line_cap(LineCap::Round);
    cr.new_path();
    cr.arc(center.x, center.y, radius, TOP, TOP + fraction.min(1.0) * 2.0 * PI);
    cr.stroke()?;
    cr.set_line_cap(LineCap::Butt);
    Ok(())
}

pub fn draw(
    cr: &Context,
    frame: &DialFrame,
    unit: DialUnit,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    DialRenderer::new(frame, unit, colors).draw(cr)
}

/// Full accent ring with a "done" label, shown once the countdown finishes.
pub fn draw_completed(
    cr: &Context,
    width: f64,
    height: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let center = Point::new(width / 2.0, height / 2.0);
    let radius = (width.min(height) / 2.0 - dialkit::geometry::DIAL_PADDING).max(1.0);

    draw_track(cr, center, radius, colors)?;
    draw_arc(cr, center, radius, 1.0, colors.accent)?;

    set_color(cr, colors.label);
    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
    cr.set_font_size(VALUE_FONT_SIZE);
    let text = "00:00";
    let ext = cr.text_extents(text)?;
    cr.move_to(
        center.x - ext.width() / 2.0 - ext.x_bearing(),
        center.y - ext.height() / 2.0 - ext.y_bearing(),
    );
    cr.show_text(text)
}
