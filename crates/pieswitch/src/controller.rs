//! Session lifecycle: one menu at a time, built fresh on every activation.

use crate::config::ConfigResolver;
use crate::gui::menu::{KeyInput, MenuEntry, MenuSession, SessionEvent};
use piekit::wm::{Point, Rect};
use std::path::PathBuf;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    Idle,
    Visible,
    Hidden,
}

/// Where a selected entry goes. Launch failures never come back to the menu.
pub trait Launcher {
    fn launch(&self, app: &str);
}

pub struct SystemLauncher {
    home: PathBuf,
}

impl SystemLauncher {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }
}

impl Launcher for SystemLauncher {
    fn launch(&self, app: &str) {
        log::info!("launching '{}'", app);
        if let Err(e) = piekit::launcher::launch(app, &self.home) {
            log::error!("Failed to launch '{}': {}", app, e);
        }
    }
}

pub struct MenuController<L> {
    resolver: ConfigResolver,
    launcher: L,
    phase: Phase,
    session: Option<MenuSession>,
    transitioning: bool,
}

impl<L: Launcher> MenuController<L> {
    pub fn new(resolver: ConfigResolver, launcher: L) -> Self {
        Self {
            resolver,
            launcher,
            phase: Phase::Idle,
            session: None,
            transitioning: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Visible
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn session(&self) -> Option<&MenuSession> {
        self.session.as_ref()
    }

    /// Tears down any open session and builds a new one around `pointer`. The transition
    /// stays open until [`finish_transition`](Self::finish_transition), so focus churn caused
    /// by the rebuild is not taken as a dismissal.
    pub fn show(&mut self, pointer: Point, display: Rect) {
        self.transitioning = true;
        self.hide();

        let config = self.resolver.resolve();
        let entries = MenuEntry::build_all(&config);
        let session = MenuSession::new(entries, pointer, display);
        log::info!(
            "menu shown with {} entries at ({:.0}, {:.0})",
            session.entries.len(),
            session.geometry.center.x,
            session.geometry.center.y
        );

        self.session = Some(session);
        self.phase = Phase::Visible;
    }

    pub fn finish_transition(&mut self) {
        self.transitioning = false;
    }

    pub fn hide(&mut self) {
        if self.session.take().is_some() {
            log::info!("menu hidden");
            self.phase = Phase::Hidden;
        }
    }

    /// Returns whether the highlight changed and the menu needs a redraw.
    pub fn pointer_moved(&mut self, point: Point) -> bool {
        self.session
            .as_mut()
            .is_some_and(|s| s.update_cursor(point))
    }

    pub fn pointer_left(&mut self) -> bool {
        self.session.as_mut().is_some_and(MenuSession::clear_highlight)
    }

    pub fn pointer_pressed(&mut self, point: Point) -> Option<SessionEvent> {
        self.session.as_mut()?.press(point)
    }

    pub fn pointer_released(&mut self, point: Point) -> Option<SessionEvent> {
        let session = self.session.as_mut()?;
        session.update_cursor(point);
        Some(session.release())
    }

    pub fn key_pressed(&mut self, key: KeyInput) -> Option<SessionEvent> {
        self.session.as_ref()?.key(key)
    }

    pub fn focus_lost(&mut self) -> Option<SessionEvent> {
        if self.transitioning || !self.is_visible() {
            log::debug!("ignoring focus loss in phase {}", self.phase);
            return None;
        }
        Some(SessionEvent::Cancelled)
    }

    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Selected(index) => {
                let Some(entry) = self.session.as_ref().and_then(|s| s.entry(index)) else {
                    log::debug!("ignoring selection {} outside the menu", index);
                    return;
                };
                let name = entry.name.clone();
                self.hide();
                self.launcher.launch(&name);
            }
            SessionEvent::Cancelled => self.hide(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingLauncher(Rc<RefCell<Vec<String>>>);

    impl Launcher for RecordingLauncher {
        fn launch(&self, app: &str) {
            self.0.borrow_mut().push(app.to_string());
        }
    }

    const DISPLAY: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 1000.0,
        height: 1000.0,
    };
    const CENTER: Point = Point { x: 500.0, y: 500.0 };

    fn controller(dir: &Path, apps: &[&str]) -> (MenuController<RecordingLauncher>, RecordingLauncher) {
        let path = dir.join("config.json");
        fs_err::write(&path, json!({ "apps": apps }).to_string()).unwrap();
        let launcher = RecordingLauncher::default();
        let c = MenuController::new(ConfigResolver::new(vec![path]), launcher.clone());
        (c, launcher)
    }

    fn launched(l: &RecordingLauncher) -> Vec<String> {
        l.0.borrow().clone()
    }

    #[test]
    fn show_builds_a_visible_session() {
        let dir = tempfile::tempdir().unwrap();
        let (mut c, _) = controller(dir.path(), &["Safari", "Mail"]);
        assert_eq!(c.phase(), Phase::Idle);

        c.show(CENTER, DISPLAY);
        assert!(c.is_visible());
        let session = c.session().unwrap();
        assert_eq!(session.entries.len(), 2);
        assert_eq!(session.highlighted, None);
    }

    #[test]
    fn show_rereads_the_config_each_time() {
        let dir = tempfile::tempdir().unwrap();
        let (mut c, _) = controller(dir.path(), &["A", "B"]);
        c.show(CENTER, DISPLAY);
        c.pointer_moved(Point::new(500.0, 450.0));

        fs_err::write(
            dir.path().join("config.json"),
            json!({ "apps": ["A", "B", "C"] }).to_string(),
        )
        .unwrap();
        c.show(CENTER, DISPLAY);

        let session = c.session().unwrap();
        assert_eq!(session.entries.len(), 3);
        assert_eq!(session.highlighted, None);
        assert!(c.is_visible());
    }

    #[test]
    fn release_on_highlight_launches_and_hides() {
        let dir = tempfile::tempdir().unwrap();
        let (mut c, launcher) = controller(dir.path(), &["Safari", "Mail"]);
        c.show(CENTER, DISPLAY);

        assert!(c.pointer_moved(Point::new(500.0, 560.0)));
        assert!(!c.pointer_moved(Point::new(502.0, 560.0)));
        let event = c.pointer_released(Point::new(502.0, 560.0)).unwrap();
        assert_eq!(event, SessionEvent::Selected(1));

        c.handle(event);
        assert_eq!(launched(&launcher), vec!["Mail"]);
        assert_eq!(c.phase(), Phase::Hidden);
        assert!(c.session().is_none());
    }

    #[test]
    fn release_in_dead_zone_cancels() {
        let dir = tempfile::tempdir().unwrap();
        let (mut c, launcher) = controller(dir.path(), &["Safari", "Mail"]);
        c.show(CENTER, DISPLAY);

        let event = c.pointer_released(CENTER).unwrap();
        assert_eq!(event, SessionEvent::Cancelled);
        c.handle(event);
        assert!(launched(&launcher).is_empty());
        assert_eq!(c.phase(), Phase::Hidden);
    }

    #[test]
    fn out_of_range_selection_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let (mut c, launcher) = controller(dir.path(), &["A", "B", "C"]);
        c.show(CENTER, DISPLAY);
        c.pointer_moved(Point::new(500.0, 450.0));
        let before = c.session().cloned();

        c.handle(SessionEvent::Selected(3));
        assert!(c.is_visible());
        assert_eq!(c.session().cloned(), before);
        assert!(launched(&launcher).is_empty());
    }

    #[test]
    fn digit_keys_select_directly() {
        let dir = tempfile::tempdir().unwrap();
        let (mut c, launcher) = controller(dir.path(), &["A", "B", "C"]);
        c.show(CENTER, DISPLAY);
        c.pointer_moved(Point::new(500.0, 450.0));

        assert_eq!(c.key_pressed(KeyInput::Digit(7)), None);
        let event = c.key_pressed(KeyInput::Digit(3)).unwrap();
        c.handle(event);
        assert_eq!(launched(&launcher), vec!["C"]);
    }

    #[test]
    fn escape_and_outside_click_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let (mut c, launcher) = controller(dir.path(), &["A", "B"]);

        c.show(CENTER, DISPLAY);
        let event = c.key_pressed(KeyInput::Escape).unwrap();
        c.handle(event);
        assert!(!c.is_visible());

        c.show(CENTER, DISPLAY);
        let event = c.pointer_pressed(Point::new(5.0, 5.0)).unwrap();
        c.handle(event);
        assert!(!c.is_visible());
        assert!(launched(&launcher).is_empty());
    }

    #[test]
    fn focus_loss_is_ignored_while_transitioning() {
        let dir = tempfile::tempdir().unwrap();
        let (mut c, _) = controller(dir.path(), &["A", "B"]);

        c.show(CENTER, DISPLAY);
        assert!(c.is_transitioning());
        assert_eq!(c.focus_lost(), None);

        c.finish_transition();
        assert_eq!(c.focus_lost(), Some(SessionEvent::Cancelled));
    }

    #[test]
    fn hide_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let (mut c, _) = controller(dir.path(), &["A", "B"]);
        c.hide();
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.focus_lost(), None);
        assert_eq!(c.pointer_released(CENTER), None);

        c.show(CENTER, DISPLAY);
        c.hide();
        c.hide();
        assert_eq!(c.phase(), Phase::Hidden);
    }

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = RecordingLauncher::default();
        let mut c = MenuController::new(
            ConfigResolver::new(vec![dir.path().join("absent.json")]),
            launcher,
        );
        c.show(CENTER, DISPLAY);
        assert_eq!(c.session().unwrap().entries.len(), 5);
    }
}
