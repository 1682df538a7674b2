//! Single-instance ownership and the trigger marker.
//!
//! A new daemon evicts the one named in the PID marker, then advertises itself there. Other
//! processes wake a running daemon by touching the trigger marker. Every failure in here is
//! logged and swallowed: the worst outcome is a short overlap with the old daemon or a daemon
//! that can only be re-activated by restarting it.

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use piekit::instance::InstanceIdentity;
use std::path::Path;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Time given to an evicted daemon to drop its watch and markers.
pub const EVICTION_GRACE: Duration = Duration::from_millis(50);

#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Watch error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Failed to signal pid {pid}: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: nix::Error,
    },
}

/// Something that can call back when a single file changes. The returned handle keeps the
/// watch alive; dropping it cancels the watch.
pub trait TriggerWatcher {
    type Handle;

    fn watch(
        &mut self,
        path: &Path,
        on_fire: Box<dyn Fn() + Send>,
    ) -> Result<Self::Handle, InstanceError>;
}

#[derive(Debug, Default)]
pub struct NotifyWatcher;

impl TriggerWatcher for NotifyWatcher {
    type Handle = RecommendedWatcher;

    fn watch(
        &mut self,
        path: &Path,
        on_fire: Box<dyn Fn() + Send>,
    ) -> Result<RecommendedWatcher, InstanceError> {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_trigger_event(&event.kind) => on_fire(),
            Ok(_) => {}
            Err(e) => log::warn!("trigger watch error: {}", e),
        })?;
        watcher.watch(path, RecursiveMode::NonRecursive)?;
        Ok(watcher)
    }
}

/// Writes and attribute changes count; opens, reads and closes do not. Every qualifying
/// event fires separately.
pub fn is_trigger_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Metadata(_) | ModifyKind::Any)
    )
}

/// Whitespace is trimmed; anything that is not a positive integer means "no owner".
pub fn parse_pid(content: &str) -> Option<i32> {
    content.trim().parse::<i32>().ok().filter(|pid| *pid > 0)
}

pub fn read_pid(path: &Path) -> Option<i32> {
    fs_err::read_to_string(path)
        .ok()
        .as_deref()
        .and_then(parse_pid)
}

pub struct InstanceCoordinator<W: TriggerWatcher = NotifyWatcher> {
    identity: InstanceIdentity,
    watcher: W,
    watch: Option<W::Handle>,
    pid: i32,
}

impl InstanceCoordinator<NotifyWatcher> {
    pub fn new(identity: InstanceIdentity) -> Self {
        Self::with_watcher(identity, NotifyWatcher)
    }
}

impl<W: TriggerWatcher> InstanceCoordinator<W> {
    pub fn with_watcher(identity: InstanceIdentity, watcher: W) -> Self {
        Self {
            identity,
            watcher,
            watch: None,
            pid: std::process::id() as i32,
        }
    }

    pub fn identity(&self) -> &InstanceIdentity {
        &self.identity
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Terminates the previous owner, if any. Returns the pid that was signalled.
    pub fn claim_instance(&self) -> Option<i32> {
        let previous = read_pid(&self.identity.pid_file).filter(|pid| *pid != self.pid)?;

        log::info!("evicting previous owner pid {}", previous);
        match terminate(previous) {
            Ok(()) => {
                thread::sleep(EVICTION_GRACE);
                Some(previous)
            }
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    pub fn write_ownership(&self) -> bool {
        match self.try_write_ownership() {
            Ok(()) => {
                log::info!(
                    "pid {} written to {}",
                    self.pid,
                    self.identity.pid_file.display()
                );
                true
            }
            Err(e) => {
                log::warn!("Failed to write pid marker: {}", e);
                false
            }
        }
    }

    fn try_write_ownership(&self) -> Result<(), InstanceError> {
        fs_err::create_dir_all(self.identity.run_dir())?;
        let mut tmp = self.identity.pid_file.clone().into_os_string();
        tmp.push(".tmp");
        fs_err::write(&tmp, format!("{}\n", self.pid))?;
        fs_err::rename(&tmp, &self.identity.pid_file)?;
        Ok(())
    }

    /// Creates the trigger marker and calls `on_fire` for every change to it. Replaces any
    /// earlier watch.
    pub fn watch_trigger(&mut self, on_fire: impl Fn() + Send + 'static) -> bool {
        self.watch = None;
        match self.try_watch_trigger(Box::new(on_fire)) {
            Ok(handle) => {
                log::info!("watching {}", self.identity.trigger_file.display());
                self.watch = Some(handle);
                true
            }
            Err(e) => {
                log::warn!("Trigger watch unavailable: {}", e);
                false
            }
        }
    }

    fn try_watch_trigger(&mut self, on_fire: Box<dyn Fn() + Send>) -> Result<W::Handle, InstanceError> {
        fs_err::create_dir_all(self.identity.run_dir())?;
        fs_err::File::create(&self.identity.trigger_file)?;
        self.watcher.watch(&self.identity.trigger_file, on_fire)
    }

    /// Drops the watch, then removes both markers unless a newer daemon already owns them.
    pub fn release(&mut self) {
        if self.watch.take().is_some() {
            log::debug!("trigger watch cancelled");
        }

        if let Some(owner) = read_pid(&self.identity.pid_file).filter(|pid| *pid != self.pid) {
            log::info!("markers now belong to pid {}, leaving them", owner);
            return;
        }

        for path in [&self.identity.pid_file, &self.identity.trigger_file] {
            match fs_err::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Failed to remove marker: {}", e),
            }
        }
        log::info!("instance '{}' released", self.identity.name);
    }
}

fn terminate(pid: i32) -> Result<(), InstanceError> {
    kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(|source| InstanceError::Signal { pid, source })
}
