//! Turns a configured app name into something the desktop can open, then opens it
//! without waiting on the child.

use crate::desktop::{self, AppInfo};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

const OPENER: &str = "xdg-open";
const NAME_LAUNCHER: &str = "gtk-launch";
const BUNDLE_SUFFIXES: &[&str] = &[".app", ".desktop"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    Path(PathBuf),
    Entry(AppInfo),
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// `"/opt/apps/Mail.app"`, `"Mail.app"` and `"Mail"` all reduce to `"Mail"`.
pub fn canonical_app_name(name: &str) -> String {
    if name.contains('/') {
        return Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
    }

    BUNDLE_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
        .to_string()
}

pub fn resolve(name: &str, home: &Path) -> Option<LaunchTarget> {
    resolve_in(name, home, desktop::find_desktop_entry)
}

pub fn resolve_in(
    name: &str,
    home: &Path,
    lookup: impl Fn(&str) -> Option<AppInfo>,
) -> Option<LaunchTarget> {
    let direct = Path::new(name);
    if direct.is_absolute() && direct.exists() {
        return Some(LaunchTarget::Path(direct.to_path_buf()));
    }

    let relative = home.join(name);
    if !direct.is_absolute() && relative.exists() {
        return Some(LaunchTarget::Path(relative));
    }

    let group = canonical_app_name(name);
    if !group.is_empty() {
        let file = format!("{group}.desktop");
        let bundled = home.join("assets").join("groups").join(&file);
        if bundled.exists() {
            return Some(LaunchTarget::Path(bundled));
        }

        let legacy = home.parent().map(|p| p.join("bin").join("groups").join(&file));
        if let Some(legacy) = legacy.filter(|p| p.exists()) {
            return Some(LaunchTarget::Path(legacy));
        }
    }

    lookup(name)
        .or_else(|| (group != name).then(|| lookup(&group)).flatten())
        .map(LaunchTarget::Entry)
}

fn command_for(target: Option<&LaunchTarget>, name: &str) -> Command {
    match target {
        Some(LaunchTarget::Path(path)) => {
            let mut cmd = Command::new(OPENER);
            cmd.arg(path);
            cmd
        }
        Some(LaunchTarget::Entry(app)) => {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(app.exec.as_str());
            cmd
        }
        None => {
            let mut cmd = Command::new(NAME_LAUNCHER);
            cmd.arg(name);
            cmd
        }
    }
}

/// Fire and forget. Unresolved names are handed to the desktop launcher as-is.
pub fn spawn(target: Option<&LaunchTarget>, name: &str) -> Result<(), LaunchError> {
    let mut cmd = command_for(target, name);
    let program = cmd.get_program().to_string_lossy().into_owned();

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(drop)
        .map_err(|source| LaunchError::Spawn { program, source })
}

pub fn launch(name: &str, home: &Path) -> Result<(), LaunchError> {
    let target = resolve(name, home);
    log::debug!("launch target for '{}': {:?}", name, target);
    spawn(target.as_ref(), name)
}
