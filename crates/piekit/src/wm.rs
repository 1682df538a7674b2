use derive_more::{AsRef, Deref, Display, From, Into};
use hyprland::data::{CursorPosition, Monitor, Monitors};
use hyprland::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Edges are inclusive on both sides.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.y >= self.y && p.y <= self.max_y()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct MonitorName(String);

crate::impl_string_newtype!(MonitorName);

/// The pointer location and the display it sits on, both in that display's local
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerContext {
    pub monitor: MonitorName,
    pub pointer: Point,
    pub display: Rect,
}

fn logical_frame(m: &Monitor) -> Rect {
    let scale = if m.scale > 0.0 { m.scale as f64 } else { 1.0 };
    Rect::new(
        m.x as f64,
        m.y as f64,
        m.width as f64 / scale,
        m.height as f64 / scale,
    )
}

/// Picks the first monitor whose frame contains the pointer, else the focused one.
pub fn containing_frame<'a>(
    frames: &'a [(MonitorName, Rect, bool)],
    pointer: Point,
) -> Option<&'a (MonitorName, Rect, bool)> {
    frames
        .iter()
        .find(|(_, frame, _)| frame.contains(pointer))
        .or_else(|| frames.iter().find(|(_, _, focused)| *focused))
}

pub fn get_pointer_context() -> Option<PointerContext> {
    let cursor = CursorPosition::get().ok()?;
    let frames: Vec<_> = Monitors::get()
        .ok()?
        .into_iter()
        .map(|m| (MonitorName::new(m.name.clone()), logical_frame(&m), m.focused))
        .collect();

    let global = Point::new(cursor.x as f64, cursor.y as f64);
    let (name, frame, _) = containing_frame(&frames, global)?;

    Some(PointerContext {
        monitor: name.clone(),
        pointer: Point::new(global.x - frame.x, global.y - frame.y),
        display: Rect::new(0.0, 0.0, frame.width, frame.height),
    })
}
