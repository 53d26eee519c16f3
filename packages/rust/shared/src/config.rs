//! Application configuration for folder2md.
//!
//! User config lives at `~/.folder2md/folder2md.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Folder2MdError, Result};
use crate::types::{ALL_EXTENSIONS, ExtensionFilter};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "folder2md.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".folder2md";

// ---------------------------------------------------------------------------
// Config structs (matching folder2md.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Path filters applied during traversal.
    #[serde(default)]
    pub filters: FiltersConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Extension filter: `all` or a comma-separated list such as `py,md`.
    #[serde(default = "default_extensions")]
    pub extensions: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> String {
    ALL_EXTENSIONS.into()
}

/// `[filters]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    /// Names excluded anywhere in a path (tool caches, VCS metadata, ...).
    #[serde(default = "default_hard_excludes")]
    pub hard_excludes: Vec<String>,

    /// Extra substrings; a directory whose path contains one is skipped.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Only directories whose path contains this substring produce output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtree_marker: Option<String>,

    /// Files whose path contains this substring are listed but never embedded.
    #[serde(default = "default_venv_marker")]
    pub venv_marker: String,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            hard_excludes: default_hard_excludes(),
            exclude_patterns: Vec::new(),
            subtree_marker: None,
            venv_marker: default_venv_marker(),
        }
    }
}

fn default_hard_excludes() -> Vec<String> {
    ["CLAM", ".venv", "__pycache__", ".git"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_venv_marker() -> String {
    "venv/".into()
}

// ---------------------------------------------------------------------------
// Filter config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime filter configuration handed to the traversal.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Names excluded anywhere in a path.
    pub hard_excludes: Vec<String>,
    /// Caller-supplied exclusion substrings, checked in order.
    pub exclude_patterns: Vec<String>,
    /// Required substring for a directory to produce output.
    pub subtree_marker: Option<String>,
    /// Substring marking virtual-environment files.
    pub venv_marker: String,
    /// Which files get their content embedded.
    pub extensions: ExtensionFilter,
}

impl FilterConfig {
    /// Build from an app config, parsing its extension filter.
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        let extensions = config.defaults.extensions.parse()?;
        Ok(Self {
            hard_excludes: config.filters.hard_excludes.clone(),
            exclude_patterns: config.filters.exclude_patterns.clone(),
            subtree_marker: config.filters.subtree_marker.clone(),
            venv_marker: config.filters.venv_marker.clone(),
            extensions,
        })
    }
}

impl TryFrom<&AppConfig> for FilterConfig {
    type Error = Folder2MdError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        Self::from_app_config(config)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.folder2md/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Folder2MdError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.folder2md/folder2md.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Folder2MdError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        Folder2MdError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| Folder2MdError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| Folder2MdError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| Folder2MdError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("extensions = \"all\""));
        assert!(toml_str.contains("__pycache__"));
        assert!(!toml_str.contains("subtree_marker"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.extensions, "all");
        assert_eq!(parsed.filters.hard_excludes.len(), 4);
        assert_eq!(parsed.filters.venv_marker, "venv/");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[filters]
exclude_patterns = ["web/src/core/sse", "web/src/app/landing"]
subtree_marker = "web/src"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.filters.exclude_patterns.len(), 2);
        assert_eq!(config.filters.subtree_marker.as_deref(), Some("web/src"));
        assert_eq!(config.filters.hard_excludes, default_hard_excludes());
        assert_eq!(config.defaults.extensions, "all");
    }

    #[test]
    fn filter_config_from_app_config() {
        let mut app = AppConfig::default();
        app.defaults.extensions = "py,sh".into();
        let filter = FilterConfig::try_from(&app).expect("valid filter");
        assert!(filter.extensions.allows("py"));
        assert!(!filter.extensions.allows("ts"));
        assert_eq!(filter.venv_marker, "venv/");
        assert!(filter.subtree_marker.is_none());
    }

    #[test]
    fn filter_config_rejects_empty_extension_list() {
        let mut app = AppConfig::default();
        app.defaults.extensions = ",".into();
        assert!(FilterConfig::try_from(&app).is_err());
    }

    #[test]
    fn load_config_from_file() {
        let path = std::env::temp_dir().join(format!(
            "f2md-config-test-{}.toml",
            uuid::Uuid::now_v7()
        ));
        std::fs::write(&path, "[defaults]\nextensions = \"md\"\n").unwrap();

        let config = load_config_from(&path).expect("load");
        assert_eq!(config.defaults.extensions, "md");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_config_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!(
            "f2md-config-bad-{}.toml",
            uuid::Uuid::now_v7()
        ));
        std::fs::write(&path, "[defaults\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        std::fs::remove_file(&path).ok();
    }
}
