use super::layout::{self, SessionGeometry, SliceAngles};
use crate::color::Color;
use crate::config::{MAX_APPS, ResolvedConfig};
use piekit::wm::{Point, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub name: String,
    pub display_name: String,
    /// 1-based; also the number key that selects it.
    pub index: usize,
    pub color: Color,
    pub angle_start: f64,
    pub angle_end: f64,
}

impl MenuEntry {
    pub fn angles(&self) -> SliceAngles {
        SliceAngles {
            start: self.angle_start,
            end: self.angle_end,
        }
    }

    pub fn build_all(config: &ResolvedConfig) -> Vec<Self> {
        let angles = layout::slice_angles(config.apps.len());

        config
            .apps
            .iter()
            .zip(angles)
            .enumerate()
            .map(|(i, (name, slice))| Self {
                name: name.clone(),
                display_name: config.display_name(name),
                index: i + 1,
                color: config.color(name),
                angle_start: slice.start,
                angle_end: slice.end,
            })
            .collect()
    }
}

/// Key presses the menu reacts to, already stripped of toolkit detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Row or keypad digit.
    Digit(u8),
    Escape,
    Other,
}

/// Outcome of an input on a visible menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Selected(usize),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuSession {
    pub entries: Vec<MenuEntry>,
    pub highlighted: Option<usize>,
    /// Pointer position the session was opened at.
    pub origin: Point,
    pub bounds: Rect,
    pub geometry: SessionGeometry,
}

impl MenuSession {
    pub fn new(entries: Vec<MenuEntry>, pointer: Point, display: Rect) -> Self {
        let bounds = layout::session_bounds(pointer, display);
        Self {
            entries,
            highlighted: None,
            origin: pointer,
            bounds,
            geometry: SessionGeometry::new(bounds.center()),
        }
    }

    pub fn slices(&self) -> Vec<SliceAngles> {
        self.entries.iter().map(MenuEntry::angles).collect()
    }

    /// Returns whether the highlight moved.
    pub fn update_cursor(&mut self, cursor: Point) -> bool {
        let new_idx = layout::hit_test(cursor, &self.geometry, &self.slices());
        self.set_highlight(new_idx)
    }

    pub fn clear_highlight(&mut self) -> bool {
        self.set_highlight(None)
    }

    fn set_highlight(&mut self, idx: Option<usize>) -> bool {
        let changed = self.highlighted != idx;
        self.highlighted = idx;
        changed
    }

    /// A press outside the menu square dismisses it; inside, it only refreshes the highlight.
    pub fn press(&mut self, cursor: Point) -> Option<SessionEvent> {
        if !self.bounds.contains(cursor) {
            return Some(SessionEvent::Cancelled);
        }
        self.update_cursor(cursor);
        None
    }

    pub fn release(&self) -> SessionEvent {
        self.highlighted
            .map_or(SessionEvent::Cancelled, SessionEvent::Selected)
    }

    pub fn key(&self, key: KeyInput) -> Option<SessionEvent> {
        match key {
            KeyInput::Escape => Some(SessionEvent::Cancelled),
            KeyInput::Digit(k) => {
                let k = usize::from(k);
                (1..=MAX_APPS.min(self.entries.len()))
                    .contains(&k)
                    .then_some(SessionEvent::Selected(k - 1))
            }
            KeyInput::Other => None,
        }
    }

    pub fn entry(&self, index: usize) -> Option<&MenuEntry> {
        self.entries.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(apps: &[&str]) -> ResolvedConfig {
        ResolvedConfig {
            apps: apps.iter().map(|s| s.to_string()).collect(),
            ..ResolvedConfig::default()
        }
    }

    fn session(apps: &[&str]) -> MenuSession {
        let entries = MenuEntry::build_all(&config(apps));
        MenuSession::new(
            entries,
            Point::new(500.0, 500.0),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
        )
    }

    #[test]
    fn entries_carry_one_based_index_and_slice() {
        let entries = MenuEntry::build_all(&config(&["Safari", "Mail"]));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 1);
        assert_eq!((entries[0].angle_start, entries[0].angle_end), (0.0, 180.0));
        assert_eq!(entries[1].index, 2);
        assert_eq!((entries[1].angle_start, entries[1].angle_end), (-180.0, 0.0));
        assert_eq!(entries[0].display_name, "Safari");
    }

    #[test]
    fn session_is_centred_in_its_bounds() {
        let s = session(&["A", "B", "C"]);
        assert_eq!(s.bounds, Rect::new(300.0, 300.0, 400.0, 400.0));
        assert_eq!(s.geometry.center, Point::new(500.0, 500.0));
        assert_eq!(s.origin, Point::new(500.0, 500.0));
    }

    #[test]
    fn cursor_updates_report_only_changes() {
        let mut s = session(&["A", "B"]);
        assert!(s.update_cursor(Point::new(500.0, 450.0)));
        assert_eq!(s.highlighted, Some(0));
        assert!(!s.update_cursor(Point::new(505.0, 440.0)));
        assert!(s.update_cursor(Point::new(500.0, 500.0)));
        assert_eq!(s.highlighted, None);
        assert!(!s.clear_highlight());
    }

    #[test]
    fn release_selects_highlight_or_cancels() {
        let mut s = session(&["A", "B"]);
        assert_eq!(s.release(), SessionEvent::Cancelled);
        s.update_cursor(Point::new(500.0, 560.0));
        assert_eq!(s.release(), SessionEvent::Selected(1));
    }

    #[test]
    fn press_outside_bounds_cancels() {
        let mut s = session(&["A", "B"]);
        assert_eq!(s.press(Point::new(10.0, 10.0)), Some(SessionEvent::Cancelled));
        assert_eq!(s.press(Point::new(500.0, 450.0)), None);
        assert_eq!(s.highlighted, Some(0));
    }

    #[test]
    fn digits_select_only_existing_entries() {
        let s = session(&["A", "B", "C"]);
        assert_eq!(s.key(KeyInput::Digit(1)), Some(SessionEvent::Selected(0)));
        assert_eq!(s.key(KeyInput::Digit(3)), Some(SessionEvent::Selected(2)));
        assert_eq!(s.key(KeyInput::Digit(4)), None);
        assert_eq!(s.key(KeyInput::Digit(0)), None);
        assert_eq!(s.key(KeyInput::Escape), Some(SessionEvent::Cancelled));
        assert_eq!(s.key(KeyInput::Other), None);
    }
}
