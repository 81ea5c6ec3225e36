//! Grid configuration persistence
//!
//! Stores grid defaults in `~/.config/rowgrid/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::GridOptions;

/// Grid configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_row_height")]
    pub row_height: f32,
    /// Header height, same as `row_height` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_row_height: Option<f32>,
    #[serde(default)]
    pub lock_rows: bool,
    #[serde(default)]
    pub auto_add_row: bool,
    #[serde(default = "default_true")]
    pub disable_expand_selection: bool,
    #[serde(default)]
    pub disable_context_menu: bool,
    #[serde(default)]
    pub range_selection: bool,
    #[serde(default)]
    pub edit_mode: bool,
}

fn default_row_height() -> f32 {
    40.0
}

fn default_true() -> bool {
    true
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: default_row_height(),
            header_row_height: None,
            lock_rows: false,
            auto_add_row: false,
            disable_expand_selection: default_true(),
            disable_context_menu: false,
            range_selection: false,
            edit_mode: false,
        }
    }
}

impl GridConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            Self::default()
        })
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        let config = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a path, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn options(&self) -> GridOptions {
        GridOptions {
            row_height: self.row_height,
            header_row_height: self.header_row_height.unwrap_or(self.row_height),
            lock_rows: self.lock_rows,
            auto_add_row: self.auto_add_row,
            disable_expand_selection: self.disable_expand_selection,
            disable_context_menu: self.disable_context_menu,
            range_selection: self.range_selection,
            edit_mode: self.edit_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_grid_options() {
        assert_eq!(GridConfig::default().options(), GridOptions::default());
    }

    #[test]
    fn test_header_height_follows_row_height() {
        let config: GridConfig = serde_yaml::from_str("row_height: 28").unwrap();
        let options = config.options();
        assert_eq!(options.row_height, 28.0);
        assert_eq!(options.header_row_height, 28.0);
        assert!(options.disable_expand_selection);
    }
}
