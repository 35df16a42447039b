//! Configuration Module
//!
//! Handles loading cache and admin server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheSettings, DEFAULT_MAX_ENTRIES};
use crate::metadata::{MetadataNormalizer, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, DEFAULT_META_PREFIX};

/// Stat cache and admin server configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of cached paths, 0 = unbounded
    pub max_entries: usize,
    /// Entry TTL in seconds, 0 = entries never expire by age
    pub ttl_secs: u64,
    /// Cache "object does not exist" results
    pub cache_no_object: bool,
    /// Prefix of user metadata headers (mode, uid, gid, mtime)
    pub meta_prefix: String,
    /// Permission bits for files whose metadata carries no mode
    pub file_mode: u32,
    /// Permission bits for directories whose metadata carries no mode
    pub dir_mode: u32,
    /// Owner reported when metadata carries no uid
    pub uid: u32,
    /// Group reported when metadata carries no gid
    pub gid: u32,
    /// Admin HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STAT_CACHE_MAX_ENTRIES` - Maximum cached paths (default: 100000)
    /// - `STAT_CACHE_TTL_SECS` - Entry TTL in seconds, 0 disables (default: 0)
    /// - `STAT_CACHE_NO_OBJECT` - Enable negative caching (default: false)
    /// - `STAT_CACHE_META_PREFIX` - User metadata prefix (default: x-cos-meta-)
    /// - `STAT_CACHE_FILE_MODE` / `STAT_CACHE_DIR_MODE` - Octal defaults (644 / 755)
    /// - `STAT_CACHE_UID` / `STAT_CACHE_GID` - Default owner (default: 0)
    /// - `SERVER_PORT` - Admin HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_parse("STAT_CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            ttl_secs: env_parse("STAT_CACHE_TTL_SECS").unwrap_or(defaults.ttl_secs),
            cache_no_object: env_flag("STAT_CACHE_NO_OBJECT").unwrap_or(defaults.cache_no_object),
            meta_prefix: env::var("STAT_CACHE_META_PREFIX")
                .ok()
                .filter(|prefix| !prefix.is_empty())
                .unwrap_or(defaults.meta_prefix),
            file_mode: env_octal("STAT_CACHE_FILE_MODE").unwrap_or(defaults.file_mode),
            dir_mode: env_octal("STAT_CACHE_DIR_MODE").unwrap_or(defaults.dir_mode),
            uid: env_parse("STAT_CACHE_UID").unwrap_or(defaults.uid),
            gid: env_parse("STAT_CACHE_GID").unwrap_or(defaults.gid),
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Entry TTL, None when disabled.
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }

    pub fn normalizer(&self) -> MetadataNormalizer {
        MetadataNormalizer::new(self.meta_prefix.as_str())
            .with_default_modes(self.file_mode, self.dir_mode)
            .with_default_owner(self.uid, self.gid)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl_secs: 0,
            cache_no_object: false,
            meta_prefix: DEFAULT_META_PREFIX.to_string(),
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            uid: 0,
            gid: 0,
            server_port: 3000,
        }
    }
}

impl From<&Config> for CacheSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_entries: config.max_entries,
            ttl: config.ttl(),
            cache_no_object: config.cache_no_object,
            normalizer: config.normalizer(),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_octal(name: &str) -> Option<u32> {
    env::var(name)
        .ok()
        .and_then(|v| u32::from_str_radix(v.trim(), 8).ok())
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 100_000);
        assert_eq!(config.ttl_secs, 0);
        assert!(!config.cache_no_object);
        assert_eq!(config.meta_prefix, "x-cos-meta-");
        assert_eq!(config.file_mode, 0o644);
        assert_eq!(config.dir_mode, 0o755);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "STAT_CACHE_MAX_ENTRIES",
            "STAT_CACHE_TTL_SECS",
            "STAT_CACHE_NO_OBJECT",
            "STAT_CACHE_META_PREFIX",
            "STAT_CACHE_FILE_MODE",
            "STAT_CACHE_DIR_MODE",
            "STAT_CACHE_UID",
            "STAT_CACHE_GID",
            "SERVER_PORT",
        ] {
            env::remove_var(name);
        }

        assert_eq!(Config::from_env(), Config::default());
    }

    #[test]
    fn test_ttl_zero_disables() {
        let config = Config::default();
        assert_eq!(config.ttl(), None);

        let config = Config {
            ttl_secs: 60,
            ..Config::default()
        };
        assert_eq!(config.ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_cache_settings_from_config() {
        let config = Config {
            max_entries: 10,
            ttl_secs: 5,
            cache_no_object: true,
            meta_prefix: "x-amz-meta-".to_string(),
            uid: 1000,
            ..Config::default()
        };
        let settings = CacheSettings::from(&config);

        assert_eq!(settings.max_entries, 10);
        assert_eq!(settings.ttl, Some(Duration::from_secs(5)));
        assert!(settings.cache_no_object);
        assert_eq!(settings.normalizer.meta_prefix(), "x-amz-meta-");
    }
}
