//! Config loader — reads `~/.cleverbot/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `ClientConfig::default()`)
//! 2. JSON file at `~/.cleverbot/config.json`
//! 3. Environment variables `CLEVERBOT_<FIELD>` (override JSON)

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

use super::schema::{ClientConfig, RequestMethod};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `ClientConfig::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> ClientConfig {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    apply_env_overrides(load_config_from_path(&config_path))
}

fn load_config_from_path(path: &Path) -> ClientConfig {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return ClientConfig::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return ClientConfig::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            ClientConfig::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &ClientConfig, path: Option<&Path>) -> anyhow::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&config_path, json)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// - `CLEVERBOT_BASE_URL` → `base_url`
/// - `CLEVERBOT_TIMEOUT_SECS` → `timeout_secs`
/// - `CLEVERBOT_METHOD` → `method` (`get` / `post`)
/// - `CLEVERBOT_SESSION_ID` → `session_id`
/// - `CLEVERBOT_USER_AGENT` → `user_agent`
fn apply_env_overrides(mut config: ClientConfig) -> ClientConfig {
    if let Ok(val) = std::env::var("CLEVERBOT_BASE_URL") {
        config.base_url = val;
    }
    if let Ok(val) = std::env::var("CLEVERBOT_TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(n) => config.timeout_secs = n,
            Err(e) => warn!("Ignoring CLEVERBOT_TIMEOUT_SECS={}: {}", val, e),
        }
    }
    if let Ok(val) = std::env::var("CLEVERBOT_METHOD") {
        match val.parse::<RequestMethod>() {
            Ok(m) => config.method = m,
            Err(e) => warn!("Ignoring CLEVERBOT_METHOD: {}", e),
        }
    }
    if let Ok(val) = std::env::var("CLEVERBOT_SESSION_ID") {
        config.session_id = Some(val).filter(|s| !s.is_empty());
    }
    if let Ok(val) = std::env::var("CLEVERBOT_USER_AGENT") {
        config.user_agent = Some(val);
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "baseUrl": "http://localhost:9000",
            "method": "post",
            "sessionId": "ABC123"
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.method, RequestMethod::Post);
        assert_eq!(config.session_id.as_deref(), Some("ABC123"));
        // Defaults preserved
        assert_eq!(config.timeout_secs, 30);
        assert!(config.bootstrap);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = ClientConfig {
            timeout_secs: 5,
            bootstrap: false,
            ..ClientConfig::default()
        };
        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&ClientConfig::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(raw.get("timeoutSecs").is_some());
        assert!(raw.get("timeout_secs").is_none());
        assert!(raw.get("sessionId").is_none());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("CLEVERBOT_METHOD", "post");
        std::env::set_var("CLEVERBOT_TIMEOUT_SECS", "not-a-number");
        std::env::set_var("CLEVERBOT_SESSION_ID", "env-session");
        let config = apply_env_overrides(ClientConfig::default());
        std::env::remove_var("CLEVERBOT_METHOD");
        std::env::remove_var("CLEVERBOT_TIMEOUT_SECS");
        std::env::remove_var("CLEVERBOT_SESSION_ID");

        assert_eq!(config.method, RequestMethod::Post);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.session_id.as_deref(), Some("env-session"));
    }
}
