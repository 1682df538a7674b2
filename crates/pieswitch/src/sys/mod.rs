pub mod instance;
pub mod runtime;
