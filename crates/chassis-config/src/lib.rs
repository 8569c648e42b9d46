//! Configuration types and loaders for chassis.
//!
//! This crate owns the on-disk configuration schema so runtime crates can
//! share a single source of truth.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application configuration loaded from `chassis.toml`.
///
/// `debug` gates the registry's diagnostic lines ("Registered module ..",
/// "Module .. started", "Module .. stopped"). It is read once at startup
/// and fixed for the lifetime of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { debug: true }
    }
}

impl AppConfig {
    /// Parse configuration TOML.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse chassis configuration TOML")
    }

    /// Load configuration from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;

        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid configuration at {}", path.display()))
    }

    /// Resolve the effective configuration from the environment.
    ///
    /// Precedence: file named by `CHASSIS_CONFIG` (if set) > defaults; then
    /// `CHASSIS_DEBUG` overrides the `debug` flag (`1`/`true` on,
    /// `0`/`false` off, anything else ignored).
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("CHASSIS_CONFIG") {
            Ok(path) => Self::from_path(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(flag) = std::env::var("CHASSIS_DEBUG") {
            match flag.as_str() {
                "1" | "true" => config.debug = true,
                "0" | "false" => config.debug = false,
                _ => {}
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    // Serialize env-mutating tests to avoid data races.
    static ENV_LOCK: StdMutex<()> = StdMutex::new(());

    #[test]
    fn parses_valid_config() {
        let config = AppConfig::from_toml_str("debug = false").unwrap();
        assert!(!config.debug);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.debug);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = AppConfig::from_toml_str("verbosity = 3")
            .unwrap_err()
            .to_string();
        assert!(err.contains("failed to parse chassis configuration TOML"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AppConfig::from_path(Path::new("/nonexistent/chassis.toml"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("failed to read configuration"));
    }

    #[test]
    fn load_honors_debug_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original = std::env::var("CHASSIS_DEBUG").ok();

        unsafe { std::env::set_var("CHASSIS_DEBUG", "0") };
        assert!(!AppConfig::load().unwrap().debug);

        unsafe { std::env::set_var("CHASSIS_DEBUG", "true") };
        assert!(AppConfig::load().unwrap().debug);

        // Unrecognized values leave the flag alone.
        unsafe { std::env::set_var("CHASSIS_DEBUG", "maybe") };
        assert!(AppConfig::load().unwrap().debug);

        match original {
            Some(v) => unsafe { std::env::set_var("CHASSIS_DEBUG", v) },
            None => unsafe { std::env::remove_var("CHASSIS_DEBUG") },
        }
    }

    #[test]
    fn load_reads_file_named_by_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original = std::env::var("CHASSIS_CONFIG").ok();
        let original_debug = std::env::var("CHASSIS_DEBUG").ok();
        unsafe { std::env::remove_var("CHASSIS_DEBUG") };

        let path = std::env::temp_dir().join("chassis-test-config.toml");
        std::fs::write(&path, "debug = false").unwrap();
        unsafe { std::env::set_var("CHASSIS_CONFIG", &path) };

        assert!(!AppConfig::load().unwrap().debug);

        let _ = std::fs::remove_file(&path);
        match original {
            Some(v) => unsafe { std::env::set_var("CHASSIS_CONFIG", v) },
            None => unsafe { std::env::remove_var("CHASSIS_CONFIG") },
        }
        if let Some(v) = original_debug {
            unsafe { std::env::set_var("CHASSIS_DEBUG", v) };
        }
    }
}
