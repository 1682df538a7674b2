pub mod layout;
pub mod model;
pub mod view;

pub use layout::{SessionGeometry, SliceAngles, hit_test, slice_angles};
pub use model::{KeyInput, MenuEntry, MenuSession, SessionEvent};
pub use view::draw;

pub const MENU_SIZE: f64 = 400.0; // side of the square the menu occupies
pub const SCREEN_MARGIN: f64 = 60.0; // min distance from display edges
pub const INNER_RADIUS: f64 = 15.0; // dead zone
pub const OUTER_RADIUS: f64 = 100.0; // visible ring
pub const HIT_TOLERANCE: f64 = 30.0; // sticky band past the ring
pub const LABEL_BADGE_RADIUS: f64 = 13.0;
pub const CENTER_DOT_RADIUS: f64 = 3.0;
pub const SLICE_ALPHA: f64 = 0.34;
pub const SLICE_STROKE_ALPHA: f64 = 0.1;
