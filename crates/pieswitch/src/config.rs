use crate::color::{self, Color, DEFAULT_GRAY, NamedColor};
use config::FileFormat;
use piekit::instance::InstanceIdentity;
use piekit::launcher::canonical_app_name;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MIN_APPS: usize = 2;
pub const MAX_APPS: usize = 8;

pub const DEFAULT_APPS: [&str; 5] = ["Safari", "Visual Studio Code", "Terminal", "Messages", "Mail"];

/// Well-known apps: default tint and the shorter label shown on the slice.
const CATALOG: &[(&str, NamedColor, &str)] = &[
    ("Codex", NamedColor::Blue, "Codex"),
    ("Claude", NamedColor::Orange, "Claude"),
    ("Claude Code", NamedColor::Orange, "Claude Code"),
    ("Claude Desktop", NamedColor::Orange, "Claude"),
    ("iTerm", NamedColor::Green, "iTerm"),
    ("iTerm2", NamedColor::Green, "iTerm"),
    ("Terminal", NamedColor::Green, "Terminal"),
    ("Visual Studio Code", NamedColor::Blue, "VS Code"),
    ("Code", NamedColor::Blue, "VS Code"),
    ("Safari", NamedColor::Cyan, "Safari"),
    ("Firefox", NamedColor::Orange, "Firefox"),
    ("Chrome", NamedColor::Yellow, "Chrome"),
    ("Vivaldi", NamedColor::Red, "Vivaldi"),
    ("Finder", NamedColor::Gray, "Finder"),
    ("Files", NamedColor::Gray, "Files"),
    ("Mail", NamedColor::Blue, "Mail"),
    ("Thunderbird", NamedColor::Blue, "Thunderbird"),
    ("Messages", NamedColor::Green, "Messages"),
    ("Slack", NamedColor::Purple, "Slack"),
    ("Discord", NamedColor::Indigo, "Discord"),
    ("Spotify", NamedColor::Green, "Spotify"),
    ("Music", NamedColor::Pink, "Music"),
    ("Photos", NamedColor::Yellow, "Photos"),
    ("Notes", NamedColor::Yellow, "Notes"),
    ("Reminders", NamedColor::Orange, "Reminders"),
    ("Calendar", NamedColor::Red, "Calendar"),
    ("Maps", NamedColor::Green, "Maps"),
    ("System Settings", NamedColor::Gray, "Settings"),
    ("Activity Monitor", NamedColor::Green, "Activity"),
    ("Console", NamedColor::Gray, "Console"),
    ("Telegram", NamedColor::Blue, "Telegram"),
];

/// On-disk shape of an instance config.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ConfigFile {
    pub apps: Vec<String>,
    pub colors: Option<HashMap<String, String>>,
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Menu contents for one activation. `apps` always holds `MIN_APPS..=MAX_APPS` names.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub apps: Vec<String>,
    pub color_overrides: HashMap<String, Color>,
    pub label_overrides: HashMap<String, String>,
    pub source: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            apps: DEFAULT_APPS.iter().map(|s| s.to_string()).collect(),
            color_overrides: HashMap::new(),
            label_overrides: HashMap::new(),
            source: None,
        }
    }
}

impl ResolvedConfig {
    fn from_file(file: ConfigFile, source: &Path) -> Self {
        let label_overrides = file
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|(app, label)| (normalized_app_key(&app), label))
            .filter(|(key, _)| !key.is_empty())
            .collect();

        let color_overrides = file
            .colors
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(app, spec)| {
                let key = normalized_app_key(&app);
                let parsed = color::parse_color_spec(&spec);
                if parsed.is_none() {
                    log::debug!("ignoring color '{}' for '{}'", spec, app);
                }
                (!key.is_empty()).then_some((key, parsed?))
            })
            .collect();

        Self {
            apps: clamp_apps(file.apps),
            color_overrides,
            label_overrides,
            source: Some(source.to_path_buf()),
        }
    }

    pub fn display_name(&self, app: &str) -> String {
        let canonical = canonical_app_name(app);
        self.label_overrides
            .get(&canonical.to_lowercase())
            .cloned()
            .or_else(|| catalog_entry(app).map(|(_, _, label)| label.to_string()))
            .or_else(|| catalog_entry(&canonical).map(|(_, _, label)| label.to_string()))
            .unwrap_or(canonical)
    }

    pub fn color(&self, app: &str) -> Color {
        self.color_overrides
            .get(&normalized_app_key(app))
            .copied()
            .or_else(|| catalog_entry(app).map(|(_, c, _)| c.color()))
            .or_else(|| catalog_entry(&canonical_app_name(app)).map(|(_, c, _)| c.color()))
            .unwrap_or(DEFAULT_GRAY)
    }
}

fn catalog_entry(name: &str) -> Option<&'static (&'static str, NamedColor, &'static str)> {
    CATALOG.iter().find(|(known, _, _)| *known == name)
}

/// Key under which label and color overrides are stored.
pub fn normalized_app_key(app: &str) -> String {
    canonical_app_name(app).to_lowercase()
}

/// Fewer than `MIN_APPS` means the list is unusable; more than `MAX_APPS` is cut.
pub fn clamp_apps(mut apps: Vec<String>) -> Vec<String> {
    if apps.len() < MIN_APPS {
        return ResolvedConfig::default().apps;
    }
    apps.truncate(MAX_APPS);
    apps
}

pub struct ConfigResolver {
    candidates: Vec<PathBuf>,
}

impl ConfigResolver {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    pub fn for_instance(identity: &InstanceIdentity) -> Self {
        let config_dir = identity.config_dir();
        let legacy = identity.legacy_dir();
        let name = &identity.name;

        let candidates = if name.is_default() {
            vec![
                config_dir.join("default.json"),
                config_dir.join("config.json"),
                legacy.join("pie-switcher-config.json"),
            ]
        } else {
            vec![
                config_dir.join(format!("{name}.json")),
                config_dir.join(format!("config-{name}.json")),
                legacy.join(format!("pie-switcher-config-{name}.json")),
            ]
        };

        Self::new(candidates)
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that parses wins; nothing is merged across files.
    pub fn resolve(&self) -> ResolvedConfig {
        for path in &self.candidates {
            match load_file(path) {
                Ok(file) => {
                    log::debug!("using config {}", path.display());
                    return ResolvedConfig::from_file(file, path);
                }
                Err(ConfigError::NotFound(_)) => {}
                Err(e) => log::warn!("skipping {}: {}", path.display(), e),
            }
        }
        ResolvedConfig::default()
    }
}

pub fn resolve(identity: &InstanceIdentity) -> ResolvedConfig {
    ConfigResolver::for_instance(identity).resolve()
}

pub fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let s = config::Config::builder()
        .add_source(config::File::from(path).format(FileFormat::Json))
        .build()?;

    Ok(s.try_deserialize()?)
}
