use crate::gui::menu::KeyInput;
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, Layer, LayerShell};
use piekit::wm::{self, MonitorName, Point, PointerContext, Rect};

pub fn get_cursor_position(window: &gtk::ApplicationWindow) -> Option<Point> {
    gdk::Display::default()
        .and_then(|d| d.default_seat())
        .and_then(|s| s.pointer())
        .zip(window.surface())
        .and_then(|(p, s)| s.device_position(&p))
        .map(|(x, y, _)| Point::new(x, y))
}

pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("pieswitch"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::Exclusive);
}

pub fn get_monitor_by_name(name: &MonitorName) -> Option<gdk::Monitor> {
    let display = gdk::Display::default()?;
    let monitors = display.monitors();
    (0..monitors.n_items()).find_map(|i| {
        monitors
            .item(i)
            .and_then(|item| item.downcast::<gdk::Monitor>().ok())
            .filter(|m| m.connector().is_some_and(|n| n.as_str() == **name))
    })
}

pub fn set_window_monitor(window: &gtk::ApplicationWindow, monitor_name: &MonitorName) {
    if let Some(monitor) = get_monitor_by_name(monitor_name) {
        window.set_monitor(Some(&monitor));
    }
}

fn fallback_monitor(window: &gtk::ApplicationWindow) -> Option<gdk::Monitor> {
    let display = gdk::Display::default()?;
    window
        .surface()
        .and_then(|s| display.monitor_at_surface(&s))
        .or_else(|| {
            display
                .monitors()
                .item(0)
                .and_then(|item| item.downcast::<gdk::Monitor>().ok())
        })
}

/// Where the pointer is and which display area the menu must stay inside, in window
/// coordinates. The compositor is asked first; GDK is the fallback.
pub fn locate_pointer(window: &gtk::ApplicationWindow) -> (Point, Rect) {
    if let Some(PointerContext {
        monitor,
        pointer,
        display,
    }) = wm::get_pointer_context()
    {
        set_window_monitor(window, &monitor);
        return (pointer, display);
    }

    let display = fallback_monitor(window)
        .map(|m| {
            let g = m.geometry();
            Rect::new(0.0, 0.0, g.width() as f64, g.height() as f64)
        })
        .unwrap_or_else(|| Rect::new(0.0, 0.0, 1920.0, 1080.0));
    let pointer = get_cursor_position(window).unwrap_or_else(|| display.center());
    (pointer, display)
}

pub fn key_input(key: gdk::Key) -> KeyInput {
    const ROW: [gdk::Key; 8] = [
        gdk::Key::_1,
        gdk::Key::_2,
        gdk::Key::_3,
        gdk::Key::_4,
        gdk::Key::_5,
        gdk::Key::_6,
        gdk::Key::_7,
        gdk::Key::_8,
    ];
    const KEYPAD: [gdk::Key; 8] = [
        gdk::Key::KP_1,
        gdk::Key::KP_2,
        gdk::Key::KP_3,
        gdk::Key::KP_4,
        gdk::Key::KP_5,
        gdk::Key::KP_6,
        gdk::Key::KP_7,
        gdk::Key::KP_8,
    ];
    // keypad with num lock off
    const KEYPAD_NAV: [gdk::Key; 8] = [
        gdk::Key::KP_End,
        gdk::Key::KP_Down,
        gdk::Key::KP_Next,
        gdk::Key::KP_Left,
        gdk::Key::KP_Begin,
        gdk::Key::KP_Right,
        gdk::Key::KP_Home,
        gdk::Key::KP_Up,
    ];

    if key == gdk::Key::Escape {
        return KeyInput::Escape;
    }

    [ROW, KEYPAD, KEYPAD_NAV]
        .iter()
        .find_map(|keys| keys.iter().position(|k| *k == key))
        .map_or(KeyInput::Other, |i| KeyInput::Digit(i as u8 + 1))
}
