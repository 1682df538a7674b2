/// Messages that reach the UI loop from outside it: the trigger watch and signal handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Show,
    Quit,
}
