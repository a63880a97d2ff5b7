//! Application settings.
//!
//! Settings are loaded once at start-up, handed to whoever needs them, and
//! written back at shutdown and whenever the recent-files list changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, ViewerError};
use crate::loader::LoadOptions;

pub const MAX_RECENT_FILES: usize = 10;
const CONFIG_ENV: &str = "PARQUET_VIEWER_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowGeometry {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Defaults offered by the text file options dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    pub separator: char,
    pub infer_types: bool,
    pub has_header: bool,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            separator: '|',
            infer_types: true,
            has_header: true,
        }
    }
}

impl TextDefaults {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            separator: self.separator.is_ascii().then_some(self.separator as u8),
            has_header: self.has_header,
            infer_types: self.infer_types,
            ..LoadOptions::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub recent_files: Vec<PathBuf>,
    pub last_directory: Option<PathBuf>,
    pub window: WindowGeometry,
    pub text_defaults: TextDefaults,
}

impl Settings {
    /// Settings file location: `$PARQUET_VIEWER_CONFIG`, then
    /// `$HOME/.config/parquet-viewer/settings.json`, then `./settings.json`.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home)
                .join(".config")
                .join("parquet-viewer")
                .join("settings.json"),
            None => PathBuf::from("settings.json"),
        }
    }

    /// Read settings, falling back to defaults when the file is missing or
    /// unreadable.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                if path.exists() {
                    warn!("Could not read settings {:?} ({}), using defaults", path, e);
                } else {
                    debug!("No settings at {:?}, using defaults", path);
                }
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Could not parse settings {:?} ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ViewerError::io(parent, e))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| ViewerError::io(path, e))
    }

    /// Move `path` to the front of the recent-files list.
    pub fn add_recent_file(&mut self, path: &Path) {
        self.recent_files.retain(|p| p != path);
        self.recent_files.insert(0, path.to_path_buf());
        self.recent_files.truncate(MAX_RECENT_FILES);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_directory = Some(parent.to_path_buf());
        }
    }

    /// Recent files that still exist on disk.
    pub fn existing_recent_files(&self) -> Vec<PathBuf> {
        self.recent_files
            .iter()
            .filter(|p| p.exists())
            .cloned()
            .collect()
    }
}
