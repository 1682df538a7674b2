use super::model::{MenuEntry, MenuSession};
use super::{CENTER_DOT_RADIUS, LABEL_BADGE_RADIUS, SLICE_ALPHA, SLICE_STROKE_ALPHA};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use palette::{Srgba, WithAlpha};
use piekit::wm::Point;
use std::f64::consts::PI;

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct SliceRenderer<'a> {
    entry: &'a MenuEntry,
    center: Point,
    inner: f64,
    outer: f64,
    highlighted: bool,
}

impl<'a> SliceRenderer<'a> {
    fn new(entry: &'a MenuEntry, session: &MenuSession, highlighted: bool) -> Self {
        Self {
            entry,
            center: session.geometry.center,
            inner: session.geometry.inner_radius,
            outer: session.geometry.outer_radius,
            highlighted,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_sector(cr, colors)?;
        self.draw_label(cr, colors)
    }

    /// Window space has `y` pointing down, so math angles are mirrored.
    fn draw_sector(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let start = -self.entry.angle_end.to_radians();
        let end = -self.entry.angle_start.to_radians();

        cr.new_path();
        cr.arc(self.center.x, self.center.y, self.outer, start, end);
        cr.arc_negative(self.center.x, self.center.y, self.inner, end, start);
        cr.close_path();

        let fill_alpha = if self.highlighted { 1.0 } else { SLICE_ALPHA };
        set_source(cr, self.entry.color.color.with_alpha(fill_alpha));
        cr.fill_preserve()?;

        let (stroke_alpha, width) = if self.highlighted {
            (1.0, 2.0)
        } else {
            (SLICE_STROKE_ALPHA, 1.0)
        };
        set_source(cr, colors.stroke.color.with_alpha(stroke_alpha));
        cr.set_line_width(width);
        cr.stroke()
    }

    fn label_anchor(&self) -> Point {
        let mid = self.entry.angles().mid().to_radians();
        let radius = (self.inner + self.outer) / 2.0;
        Point::new(
            self.center.x + mid.cos() * radius,
            self.center.y - mid.sin() * radius,
        )
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let anchor = self.label_anchor();
        let badge = Point::new(anchor.x, anchor.y - LABEL_BADGE_RADIUS - 4.0);

        set_source(cr, colors.badge);
        cr.new_path();
        cr.arc(badge.x, badge.y, LABEL_BADGE_RADIUS, 0.0, 2.0 * PI);
        cr.fill()?;

        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);

        cr.set_font_size(14.0);
        set_source(cr, colors.badge_text);
        show_centered(cr, &self.entry.index.to_string(), badge)?;

        cr.set_font_size(11.0);
        let name_at = Point::new(anchor.x, anchor.y + 10.0);
        set_source(cr, colors.label_shadow);
        show_centered(cr, &self.entry.display_name, Point::new(name_at.x, name_at.y + 0.5))?;
        set_source(cr, colors.label);
        show_centered(cr, &self.entry.display_name, name_at)
    }
}

fn show_centered(cr: &Context, text: &str, at: Point) -> Result<(), cairo::Error> {
    let ext = cr.text_extents(text)?;
    cr.move_to(
        at.x - ext.width() / 2.0 - ext.x_bearing(),
        at.y - ext.height() / 2.0 - ext.y_bearing(),
    );
    cr.show_text(text)
}

pub fn draw(cr: &Context, session: &MenuSession, colors: &ThemeColors) -> Result<(), cairo::Error> {
    for (i, entry) in session.entries.iter().enumerate() {
        SliceRenderer::new(entry, session, session.highlighted == Some(i)).draw(cr, colors)?;
    }
    draw_center(cr, session, colors)
}

fn draw_center(cr: &Context, session: &MenuSession, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let c = session.geometry.center;

    set_source(cr, colors.center_hole);
    cr.new_path();
    cr.arc(c.x, c.y, session.geometry.inner_radius, 0.0, 2.0 * PI);
    cr.fill()?;

    set_source(cr, colors.center_dot);
    cr.new_path();
    cr.arc(c.x, c.y, CENTER_DOT_RADIUS, 0.0, 2.0 * PI);
    cr.fill()
}
