pub mod cli;
pub mod color;
pub mod config;
pub mod controller;
pub mod events;
pub mod gui;
pub mod logging;
pub mod sys;
