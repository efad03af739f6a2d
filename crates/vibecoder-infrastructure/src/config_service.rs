//! Configuration service implementation.
//!
//! Loads `VibecoderConfig` from `config.toml` (see [`VibecoderPaths`]) and
//! caches it. A missing file yields the defaults.

use crate::paths::VibecoderPaths;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use vibecoder_core::config::VibecoderConfig;
use vibecoder_core::{Result, VibeError};

/// Configuration service that loads and caches the engine configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration, filled lazily on first access
    config: Arc<RwLock<Option<VibecoderConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config location.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `path` (used by the CLI `--config` flag and tests).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it if not cached.
    ///
    /// A file that fails to load is logged and replaced by the defaults.
    pub fn get_config(&self) -> VibecoderConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = read_lock.as_ref() {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|e| {
            tracing::warn!(target: "vibecoder::storage", error = %e, "Falling back to default config");
            VibecoderConfig::default()
        });

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Reads and parses the config file.
    pub fn load_config(&self) -> Result<VibecoderConfig> {
        let path = self.config_path()?;
        if !path.exists() {
            tracing::debug!(target: "vibecoder::storage", path = %path.display(), "No config file, using defaults");
            return Ok(VibecoderConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: VibecoderConfig = toml::from_str(&content)?;
        if config.limits.max_sections == 0 {
            return Err(VibeError::config("limits.max_sections must be at least 1"));
        }
        Ok(config)
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => VibecoderPaths::default().config_file(),
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(dir.path().join("config.toml"));
        assert_eq!(service.get_config(), VibecoderConfig::default());
    }

    #[test]
    fn test_partial_file_and_cache_invalidation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[limits]\nmax_sections = 10\n").unwrap();

        let service = ConfigService::with_path(&path);
        let config = service.get_config();
        assert_eq!(config.limits.max_sections, 10);
        assert_eq!(config.limits.bio_max_chars, 160);

        std::fs::write(&path, "[session]\npage_size = 5\n").unwrap();
        assert_eq!(service.get_config().limits.max_sections, 10);

        service.invalidate_cache();
        let reloaded = service.get_config();
        assert_eq!(reloaded.limits.max_sections, 25);
        assert_eq!(reloaded.session.page_size, 5);
    }

    #[test]
    fn test_invalid_file_is_an_error_but_get_config_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "limits = 3").unwrap();

        let service = ConfigService::with_path(&path);
        assert!(service.load_config().is_err());
        assert_eq!(service.get_config(), VibecoderConfig::default());
    }
}
