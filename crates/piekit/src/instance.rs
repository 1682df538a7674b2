//! Naming and on-disk layout of a logical daemon instance.
//!
//! Every instance owns a PID marker and a trigger marker under `<home>/run/` and reads its
//! menu from `<home>/config/instances/`. The marker file names are prefixed with a namespace
//! so that several independent installs can share one home directory.

use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INSTANCE: &str = "default";
pub const DEFAULT_NAMESPACE: &str = "piswitch";
pub const NAMESPACE_ENV: &str = "PISWITCH_NAMESPACE";
pub const HOME_ENV: &str = "PISWITCH_HOME";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct InstanceName(String);

crate::impl_string_newtype!(InstanceName);

impl Default for InstanceName {
    fn default() -> Self {
        Self::new(DEFAULT_INSTANCE)
    }
}

impl InstanceName {
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_INSTANCE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    pub name: InstanceName,
    pub namespace: String,
    pub home: PathBuf,
    pub pid_file: PathBuf,
    pub trigger_file: PathBuf,
}

impl InstanceIdentity {
    pub fn new(name: InstanceName, namespace: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        let namespace = namespace.into();
        let home = home.into();
        let run = home.join("run");

        let (pid, trigger) = if name.is_default() {
            (format!("{namespace}.pid"), format!("{namespace}-trigger"))
        } else {
            (
                format!("{namespace}-{name}.pid"),
                format!("{namespace}-trigger-{name}"),
            )
        };

        Self {
            pid_file: run.join(pid),
            trigger_file: run.join(trigger),
            name,
            namespace,
            home,
        }
    }

    /// Resolves namespace and home from the process environment.
    pub fn from_env(name: InstanceName) -> Self {
        let namespace = namespace_prefix(std::env::var(NAMESPACE_ENV).ok().as_deref());
        let home = app_home(
            std::env::var_os(HOME_ENV).map(PathBuf::from),
            std::env::current_exe().ok(),
        );
        Self::new(name, namespace, home)
    }

    pub fn run_dir(&self) -> PathBuf {
        self.home.join("run")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.home.join("config").join("instances")
    }

    /// Directory that held configs before per-instance directories existed.
    pub fn legacy_dir(&self) -> PathBuf {
        self.home
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.home.clone())
    }

    pub fn events_log(&self) -> PathBuf {
        self.run_dir().join(format!("{}-events.log", self.namespace))
    }
}

pub fn namespace_prefix(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(ns) if !ns.is_empty() => ns.to_string(),
        _ => DEFAULT_NAMESPACE.to_string(),
    }
}

/// `env` wins; an executable installed as `<root>/dist/bin/<exe>` maps to `<root>`;
/// otherwise the platform data dir, and the working directory as a last resort.
pub fn app_home(env: Option<PathBuf>, exe: Option<PathBuf>) -> PathBuf {
    if let Some(home) = env.filter(|p| !p.as_os_str().is_empty()) {
        return home;
    }

    if let Some(root) = exe.as_deref().and_then(dist_root) {
        return root;
    }

    ProjectDirs::from("org", "pieswitch", "pieswitch")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn dist_root(exe: &Path) -> Option<PathBuf> {
    let exe = fs_err::canonicalize(exe).unwrap_or_else(|_| exe.to_path_buf());
    let bin = exe.parent()?;
    let dist = bin.parent()?;
    if bin.file_name()? == "bin" && dist.file_name()? == "dist" {
        dist.parent().map(Path::to_path_buf)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_instance_marker_names() {
        let id = InstanceIdentity::new(InstanceName::default(), "piswitch", "/opt/pie");
        assert_eq!(id.pid_file, PathBuf::from("/opt/pie/run/piswitch.pid"));
        assert_eq!(id.trigger_file, PathBuf::from("/opt/pie/run/piswitch-trigger"));
        assert_eq!(id.config_dir(), PathBuf::from("/opt/pie/config/instances"));
        assert_eq!(id.legacy_dir(), PathBuf::from("/opt"));
    }

    #[test]
    fn named_instance_marker_names() {
        let id = InstanceIdentity::new(InstanceName::new("work"), "ns", "/opt/pie");
        assert_eq!(id.pid_file, PathBuf::from("/opt/pie/run/ns-work.pid"));
        assert_eq!(id.trigger_file, PathBuf::from("/opt/pie/run/ns-trigger-work"));
    }

    #[test]
    fn blank_namespace_falls_back() {
        assert_eq!(namespace_prefix(None), DEFAULT_NAMESPACE);
        assert_eq!(namespace_prefix(Some("   ")), DEFAULT_NAMESPACE);
        assert_eq!(namespace_prefix(Some(" mine ")), "mine");
    }

    #[test]
    fn home_prefers_env_then_dist_layout() {
        assert_eq!(
            app_home(Some(PathBuf::from("/env/home")), None),
            PathBuf::from("/env/home")
        );

        let root = tempfile::tempdir().unwrap();
        let bin = root.path().join("dist").join("bin");
        fs_err::create_dir_all(&bin).unwrap();
        let exe = bin.join("pieswitch");
        fs_err::write(&exe, b"").unwrap();

        let expected = fs_err::canonicalize(root.path()).unwrap();
        assert_eq!(app_home(None, Some(exe)), expected);
    }
}
