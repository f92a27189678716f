// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Plugin configuration management
//!
//! The plugin persists three fields as a JSON object at a fixed path
//! under `/var/cpanel`. The file is created with defaults on first
//! load, always written with owner-only permissions, and loaded once
//! per process - entry points construct a [`PluginConfig`] at startup
//! and pass it by reference into every component that needs it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{Error, Result};

/// Default location of the persisted configuration
pub const DEFAULT_CONFIG_PATH: &str = "/var/cpanel/pdnsbridge.json";

/// Persisted plugin configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// PowerDNS API base URL (e.g., "https://127.0.0.1:8081"), stored
    /// without a trailing slash
    #[serde(default)]
    pub api_url: String,

    /// PowerDNS API key, sent as the X-API-Key header
    #[serde(default)]
    pub api_key: String,

    /// Whether the plugin is switched on in WHM
    #[serde(default)]
    pub enabled: bool,
}

/// Where a loaded configuration actually came from
///
/// Read failures fall back to defaults rather than aborting, but the
/// fallback is surfaced here so callers can log it instead of silently
/// running on an empty configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from an existing file
    File,
    /// File was absent; defaults were written out
    Created,
    /// File existed but did not parse; defaults are in effect
    ParseError,
}

impl PluginConfig {
    /// Load the configuration from `path`
    ///
    /// An absent file is created with defaults. A malformed file falls
    /// back to defaults with [`ConfigSource::ParseError`] so the caller
    /// can tell the difference.
    pub fn load(path: &Path) -> (Self, ConfigSource) {
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                warn!("Could not create default config {}: {}", path.display(), e);
            }
            return (config, ConfigSource::Created);
        }

        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Self>(&raw) {
                Ok(config) => (config, ConfigSource::File),
                Err(e) => {
                    warn!("Malformed config {}: {}", path.display(), e);
                    (Self::default(), ConfigSource::ParseError)
                }
            },
            Err(e) => {
                warn!("Could not read config {}: {}", path.display(), e);
                (Self::default(), ConfigSource::ParseError)
            }
        }
    }

    /// Write the configuration to `path` with owner-only permissions
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("create {}: {}", parent.display(), e)))?;
        }

        let body = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("serialize config: {}", e)))?;
        fs::write(path, body)
            .map_err(|e| Error::Config(format!("write {}: {}", path.display(), e)))?;

        restrict_permissions(path)?;
        debug!("Config written to {}", path.display());
        Ok(())
    }

    /// Apply a partial update and persist the result
    ///
    /// Any subset of the three fields may be supplied; a trailing slash
    /// on `api_url` is stripped before the write.
    pub fn update(
        path: &Path,
        api_url: Option<&str>,
        api_key: Option<&str>,
        enabled: Option<bool>,
    ) -> Result<Self> {
        let (mut config, _) = Self::load(path);

        if let Some(url) = api_url {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(key) = api_key {
            config.api_key = key.to_string();
        }
        if let Some(flag) = enabled {
            config.enabled = flag;
        }

        config.save(path)?;
        Ok(config)
    }

    /// Whether the plugin may actually do anything
    ///
    /// The stored flag alone is not enough - both API fields must be
    /// populated as well.
    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.api_url.is_empty() && !self.api_key.is_empty()
    }
}

/// Outcome of a [`repair`] pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    /// Whether anything had to be rewritten
    pub changed: bool,
    /// The configuration now on disk
    pub config: PluginConfig,
}

/// Repair a legacy configuration file in place
///
/// Early plugin builds stored `enabled` as a string ("true", "1",
/// "yes", "on") and left trailing slashes on `api_url`. Both are
/// coerced into the current format; the file is only rewritten when
/// something changed.
pub fn repair(path: &Path) -> Result<RepairOutcome> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("read {}: {}", path.display(), e)))?;
    let mut value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| Error::Config(format!("parse {}: {}", path.display(), e)))?;

    let mut changed = false;

    let legacy_enabled = value.get("enabled").and_then(|v| v.as_str()).map(|flag| {
        matches!(
            flag.to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        )
    });
    if let Some(coerced) = legacy_enabled {
        value["enabled"] = serde_json::Value::Bool(coerced);
        changed = true;
    }

    let trimmed_url = value
        .get("api_url")
        .and_then(|v| v.as_str())
        .filter(|url| url.ends_with('/'))
        .map(|url| url.trim_end_matches('/').to_string());
    if let Some(url) = trimmed_url {
        value["api_url"] = serde_json::Value::String(url);
        changed = true;
    }

    let config: PluginConfig = serde_json::from_value(value)
        .map_err(|e| Error::Config(format!("coerce {}: {}", path.display(), e)))?;

    if changed {
        config.save(path)?;
    }

    Ok(RepairOutcome { changed, config })
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| Error::Config(format!("chmod {}: {}", path.display(), e)))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
