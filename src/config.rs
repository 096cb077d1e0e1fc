// Configuration: resolves the base URL of the recognition server once at
// startup. The value is handed to `ApiClient` instead of being read from a
// global.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Used when neither the environment nor a config file names a server.
pub const DEFAULT_API: &str = "http://localhost:5000/";

/// Router base path baked in at build time, like a bundler's `BASE_URL`.
pub const BASE_PATH: &str = match option_env!("BASE_URL") {
    Some(base) => base,
    None => "/",
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the API, always ending with `/`.
    pub api: String,
    /// Base path the router mounts views under.
    pub base_path: String,
}

/// On-disk shape of `app.config.json`.
#[derive(Deserialize, Debug)]
struct ConfigFile {
    api: String,
}

impl Config {
    pub fn new(api: &str) -> Self {
        Config {
            api: normalize_api(api),
            base_path: BASE_PATH.to_string(),
        }
    }

    /// Resolve from `FACEREC_API`, then the config file, then the default.
    pub fn from_env() -> Result<Self> {
        let api = std::env::var("FACEREC_API").ok();
        Config::resolve(api.as_deref(), config_path().as_deref())
    }

    /// A blank `api` counts as unset; a missing file falls through to the
    /// default.
    fn resolve(api: Option<&str>, path: Option<&Path>) -> Result<Self> {
        if let Some(api) = api.filter(|api| !api.trim().is_empty()) {
            tracing::debug!(%api, "api url taken from FACEREC_API");
            return Ok(Config::new(api));
        }
        match path {
            Some(path) if path.exists() => Config::from_file(path),
            _ => Ok(Config::new(DEFAULT_API)),
        }
    }

    /// Load the `api` field from a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&raw)
            .with_context(|| format!("Parsing config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), api = %file.api, "api url taken from config file");
        Ok(Config::new(&file.api))
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("FACEREC_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("facerec").join("app.config.json"))
}

// Endpoint paths are appended directly, so the base needs its trailing slash.
fn normalize_api(api: &str) -> String {
    let api = api.trim();
    if api.ends_with('/') {
        api.to_string()
    } else {
        format!("{api}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn api_gets_trailing_slash() {
        assert_eq!(Config::new("http://host").api, "http://host/");
        assert_eq!(Config::new("http://host/api/").api, "http://host/api/");
        assert_eq!(Config::new(" http://host/v1 ").api, "http://host/v1/");
    }

    #[test]
    fn reads_api_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api": "http://recognition:5000"}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.api, "http://recognition:5000/");
        assert_eq!(config.base_path, BASE_PATH);
    }

    #[test]
    fn rejects_file_without_api() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"server": "http://recognition:5000"}}"#).unwrap();

        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn blank_env_api_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api": "http://from-file:5000"}}"#).unwrap();

        let config = Config::resolve(Some("  "), Some(file.path())).unwrap();
        assert_eq!(config.api, "http://from-file:5000/");
        assert_eq!(Config::resolve(Some(""), None).unwrap().api, DEFAULT_API);
    }

    #[test]
    fn env_api_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api": "http://from-file:5000"}}"#).unwrap();

        let config = Config::resolve(Some("http://from-env"), Some(file.path())).unwrap();
        assert_eq!(config.api, "http://from-env/");
    }

    #[test]
    fn absent_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(None, Some(&dir.path().join("app.config.json"))).unwrap();
        assert_eq!(config.api, DEFAULT_API);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(&dir.path().join("absent.json")).is_err());
    }
}
