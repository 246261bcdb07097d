use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;

const CONFIG_DIR: &str = ".gwt";
const CONFIG_FILE: &str = "config.json";

/// Host settings stored in `.gwt/config.json` under a project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Record panics raised inside a scope as hard failures of that scope
    /// instead of letting them escape the run.
    pub catch_panics: bool,
    /// Joins parent and child names in scope paths.
    pub separator: String,
    /// Log passing scopes at info level (they are logged at debug otherwise).
    pub log_passing_scopes: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            catch_panics: true,
            separator: "/".to_string(),
            log_passing_scopes: false,
        }
    }
}

impl HarnessConfig {
    /// Read config from project directory
    pub fn read(project_path: &Path) -> Self {
        let config_path = project_path.join(CONFIG_DIR).join(CONFIG_FILE);

        if !config_path.exists() {
            debug!(path = %config_path.display(), "Config file does not exist, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    debug!(path = %config_path.display(), "Config loaded successfully");
                    config
                }
                Err(e) => {
                    warn!(path = %config_path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "Failed to read config file, using defaults");
                Self::default()
            }
        }
    }

    /// Read config from the crate under test (`CARGO_MANIFEST_DIR`), falling
    /// back to the current directory.
    pub fn load() -> Self {
        let dir = std::env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok());

        match dir {
            Some(dir) => Self::read(&dir),
            None => Self::default(),
        }
    }

    /// Write config to project directory
    pub fn write(&self, project_path: &Path) -> Result<()> {
        let config_dir = project_path.join(CONFIG_DIR);
        let config_path = config_dir.join(CONFIG_FILE);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        debug!(path = %config_path.display(), "Config saved successfully");

        Ok(())
    }
}
