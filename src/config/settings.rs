//! Settings file (`config.yaml`) data structures
//!
//! ```yaml
//! store_root: /home/user/.local/share/appstow
//! cache_dir: /home/user/.cache/appstow
//! transformer:
//!   program: d8
//!   args: ["--output", "{output}", "{input}"]
//! fetch:
//!   connect_timeout_secs: 15
//!   read_timeout_secs: 180
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache;
use crate::error::{
    AppstowError, Result, config_invalid, config_parse_failed, config_read_failed,
};
use crate::fetch::FetchOptions;
use crate::transform::CommandTransformer;

/// Environment variable naming the settings file
pub const CONFIG_ENV: &str = "APPSTOW_CONFIG";
/// Environment variable overriding the store root
pub const HOME_ENV: &str = "APPSTOW_HOME";

const APP_DIR: &str = "appstow";
const CONFIG_FILE: &str = "config.yaml";

/// Settings loaded from `config.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the application store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_root: Option<PathBuf>,

    /// Payload cache location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    pub transformer: TransformerSettings,

    pub fetch: FetchSettings,
}

/// External transformer invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerSettings {
    /// Program to run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Arguments; `{input}` and `{output}` are substituted
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// Download timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        let defaults = FetchOptions::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            read_timeout_secs: defaults.read_timeout.as_secs(),
        }
    }
}

/// Default settings file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

impl Settings {
    /// Parse settings from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load settings.
    ///
    /// The file is `explicit`, else `$APPSTOW_CONFIG`, else the platform
    /// default. A missing default file yields default settings; a missing
    /// explicitly named file is an error. `$APPSTOW_HOME` then overrides the
    /// store root.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let named = explicit.map(Path::to_path_buf).or_else(|| {
            std::env::var(CONFIG_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        });

        let mut settings = match (&named, default_config_path()) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(path)) if path.is_file() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Ok(home) = std::env::var(HOME_ENV) {
            if !home.trim().is_empty() {
                settings.store_root = Some(PathBuf::from(home));
            }
        }
        Ok(settings)
    }

    /// Read and parse a settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading settings");
        let content = fs::read_to_string(path)
            .map_err(|e| config_read_failed(path.display().to_string(), e.to_string()))?;
        Self::from_yaml(&content).map_err(|e| match e {
            AppstowError::ConfigParseFailed { reason, .. } => {
                config_parse_failed(path.display().to_string(), reason)
            }
            other => other,
        })
    }

    /// Reject values no install could run with
    pub fn validate(&self) -> Result<()> {
        if self.fetch.connect_timeout_secs == 0 || self.fetch.read_timeout_secs == 0 {
            return Err(config_invalid("fetch timeouts must be greater than zero"));
        }
        if self
            .transformer
            .program
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(config_invalid("transformer.program must not be empty"));
        }
        Ok(())
    }

    /// Store root, defaulting to `<platform data dir>/appstow`
    pub fn store_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.store_root {
            return Ok(root.clone());
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or_else(|| config_invalid("could not determine a store root; set store_root"))
    }

    /// Payload cache root
    pub fn cache_root(&self) -> Result<PathBuf> {
        cache::resolve_cache_dir(self.cache_dir.as_deref())
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.fetch.read_timeout_secs),
        }
    }

    /// Transformer described by the settings
    pub fn transformer(&self) -> Result<CommandTransformer> {
        let program = self.transformer.program.as_deref().ok_or_else(|| {
            config_invalid("no transformer configured; set transformer.program in config.yaml")
        })?;
        Ok(CommandTransformer::new(
            program,
            self.transformer.args.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_full() {
        let yaml = r#"
store_root: /srv/apps
transformer:
  program: d8
  args: ["--output", "{output}", "{input}"]
fetch:
  connect_timeout_secs: 5
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.store_root, Some(PathBuf::from("/srv/apps")));
        assert_eq!(settings.transformer.program.as_deref(), Some("d8"));
        assert_eq!(settings.transformer.args.len(), 3);
        assert_eq!(settings.fetch.connect_timeout_secs, 5);
        assert_eq!(settings.fetch.read_timeout_secs, 180);
        assert_eq!(
            settings.fetch_options().connect_timeout,
            Duration::from_secs(5)
        );
        assert!(settings.transformer().is_ok());
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
        assert_eq!(
            Settings::default().fetch_options(),
            FetchOptions::default()
        );
    }

    #[test]
    fn test_invalid_values() {
        let result = Settings::from_yaml("fetch:\n  read_timeout_secs: 0\n");
        assert!(matches!(result, Err(AppstowError::ConfigInvalid { .. })));

        let result = Settings::from_yaml("transformer:\n  program: '  '\n");
        assert!(matches!(result, Err(AppstowError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_missing_transformer() {
        let result = Settings::default().transformer();
        assert!(matches!(result, Err(AppstowError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "transformer: [unclosed").unwrap();
        match Settings::from_file(&path) {
            Err(AppstowError::ConfigParseFailed { path: p, .. }) => {
                assert!(p.ends_with("config.yaml"));
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_load_explicit_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = Settings::load(Some(&temp.path().join("nope.yaml")));
        assert!(matches!(result, Err(AppstowError::ConfigReadFailed { .. })));
    }

    #[test]
    #[serial]
    fn test_load_env_overrides() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "store_root: /from/file\n").unwrap();

        unsafe {
            std::env::set_var(CONFIG_ENV, &path);
            std::env::set_var(HOME_ENV, temp.path().join("home"));
        }
        let settings = Settings::load(None);
        unsafe {
            std::env::remove_var(CONFIG_ENV);
            std::env::remove_var(HOME_ENV);
        }

        let settings = settings.unwrap();
        assert_eq!(settings.store_root, Some(temp.path().join("home")));
    }

    #[test]
    fn test_yaml_roundtrip_omits_unset() {
        let yaml = Settings::default().to_yaml().unwrap();
        assert!(!yaml.contains("store_root"));
        assert!(yaml.contains("connect_timeout_secs"));
    }
}
