pub mod macros;

pub mod desktop;
pub mod instance;
pub mod launcher;
pub mod wm;
