//! Installed applications as advertised by XDG desktop entries.

use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_entry_parser::parse_entry;
use fs_err as fs;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct AppName(String);

crate::impl_string_newtype!(AppName);

/// File name of a desktop entry without the `.desktop` suffix, e.g. `org.gnome.Terminal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct DesktopId(String);

crate::impl_string_newtype!(DesktopId);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ExecCommand(String);

crate::impl_string_newtype!(ExecCommand);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: AppName,
    pub id: DesktopId,
    pub exec: ExecCommand,
}

#[derive(Debug, Default)]
pub struct DesktopIndex {
    entries: Vec<AppInfo>,
}

impl DesktopIndex {
    pub fn new(entries: Vec<AppInfo>) -> Self {
        Self { entries }
    }

    pub fn scan(dirs: &[PathBuf]) -> Self {
        let entries: Vec<AppInfo> = desktop_files(dirs)
            .into_values()
            .filter_map(|path| parse_desktop_file(&path))
            .collect();
        log::debug!("indexed {} desktop entries", entries.len());
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Matches the display name or the full desktop id first, then the last dotted part of
    /// the id (`org.gnome.Terminal` answers to `terminal`). Case is ignored throughout.
    pub fn find(&self, query: &str) -> Option<&AppInfo> {
        let query = query.to_lowercase();
        let id_tail = |app: &AppInfo| app.id.rsplit('.').next().map(str::to_lowercase);

        self.entries
            .iter()
            .find(|app| app.name.to_lowercase() == query || app.id.to_lowercase() == query)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|app| id_tail(app).is_some_and(|tail| tail == query))
            })
    }
}

static INDEX: OnceLock<RwLock<DesktopIndex>> = OnceLock::new();

fn index() -> &'static RwLock<DesktopIndex> {
    INDEX.get_or_init(|| RwLock::new(DesktopIndex::scan(&application_dirs())))
}

pub fn rescan() {
    let fresh = DesktopIndex::scan(&application_dirs());
    *index().write() = fresh;
}

/// The cached index is rebuilt once on a miss, so apps installed after startup resolve.
pub fn find_desktop_entry(query: &str) -> Option<AppInfo> {
    if let Some(app) = index().read().find(query).cloned() {
        return Some(app);
    }
    rescan();
    index().read().find(query).cloned()
}

/// Highest priority first: the user's data home, then the system data dirs.
fn application_dirs() -> Vec<PathBuf> {
    let xdg = xdg::BaseDirectories::new();
    xdg.get_data_home()
        .into_iter()
        .chain(xdg.get_data_dirs())
        .map(|p| p.join("applications"))
        .collect()
}

/// Keyed by file name; a directory earlier in `dirs` shadows later ones.
fn desktop_files(dirs: &[PathBuf]) -> BTreeMap<String, PathBuf> {
    let mut files = BTreeMap::new();

    for dir in dirs {
        let Ok(read_dir) = fs::read_dir(dir) else {
            continue;
        };
        for path in read_dir.flatten().map(|e| e.path()) {
            if path.extension().and_then(|s| s.to_str()) != Some("desktop") {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|s| s.to_str()) {
                files.entry(file_name.to_string()).or_insert(path);
            }
        }
    }
    files
}

pub fn parse_desktop_file(path: &Path) -> Option<AppInfo> {
    let entry = parse_entry(path).ok()?;
    let section = entry.section("Desktop Entry")?;

    if section.attr("Type").first()? != "Application" {
        return None;
    }

    let flag = |key: &str| section.attr(key).first().is_some_and(|v| v == "true");
    if flag("NoDisplay") || flag("Hidden") {
        return None;
    }

    let name = section.attr("Name").first()?;
    let exec = section.attr("Exec").first()?;
    let id = path.file_stem()?.to_str()?;

    Some(AppInfo {
        name: AppName::new(name.as_str()),
        id: DesktopId::new(id),
        exec: ExecCommand::new(strip_field_codes(exec)),
    })
}

/// Drops `%f`, `%U` and friends; the menu never passes files to what it launches.
fn strip_field_codes(exec: &str) -> String {
    match shell_words::split(exec) {
        Ok(words) => shell_words::join(words.iter().filter(|w| !w.starts_with('%'))),
        Err(_) => exec.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(name: &str, id: &str) -> AppInfo {
        AppInfo {
            name: AppName::new(name),
            id: DesktopId::new(id),
            exec: ExecCommand::new(id),
        }
    }

    fn write_entry(dir: &Path, file: &str, body: &str) {
        fs::write(dir.join(file), format!("[Desktop Entry]\nType=Application\n{body}")).unwrap();
    }

    #[test]
    fn lookup_prefers_name_or_id_over_id_tail() {
        let index = DesktopIndex::new(vec![
            app("GNOME Terminal", "org.gnome.Terminal"),
            app("Terminal", "xterm"),
        ]);

        assert_eq!(index.find("terminal").unwrap().id.as_str(), "xterm");
        assert_eq!(
            index.find("ORG.GNOME.TERMINAL").unwrap().id.as_str(),
            "org.gnome.Terminal"
        );
        assert!(index.find("mail").is_none());

        let gnome_only = DesktopIndex::new(vec![app("GNOME Terminal", "org.gnome.Terminal")]);
        assert_eq!(
            gnome_only.find("Terminal").unwrap().name.as_str(),
            "GNOME Terminal"
        );
    }

    #[test]
    fn scan_skips_hidden_entries_and_strips_field_codes() {
        let dir = tempfile::tempdir().unwrap();
        write_entry(
            dir.path(),
            "org.example.Mail.desktop",
            "Name=Mail\nExec=mail-client --new %U\n",
        );
        write_entry(dir.path(), "nodisplay.desktop", "Name=A\nExec=a\nNoDisplay=true\n");
        write_entry(dir.path(), "hidden.desktop", "Name=B\nExec=b\nHidden=true\n");
        fs::write(dir.path().join("notes.txt"), "not an entry").unwrap();

        let index = DesktopIndex::scan(&[dir.path().to_path_buf()]);
        assert_eq!(index.len(), 1);
        let mail = index.find("mail").unwrap();
        assert_eq!(mail.id.as_str(), "org.example.Mail");
        assert_eq!(mail.exec.as_str(), "mail-client --new");
    }

    #[test]
    fn earlier_directories_shadow_later_ones() {
        let user = tempfile::tempdir().unwrap();
        let system = tempfile::tempdir().unwrap();
        write_entry(user.path(), "editor.desktop", "Name=Editor\nExec=user-editor\n");
        write_entry(system.path(), "editor.desktop", "Name=Editor\nExec=system-editor\n");

        let index = DesktopIndex::scan(&[user.path().to_path_buf(), system.path().to_path_buf()]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.find("editor").unwrap().exec.as_str(), "user-editor");
    }
}
