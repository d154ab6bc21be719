// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan review configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScanError};
use crate::types::Quality;

/// Persistent scan review settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Quality used for re-crops when the caller gives no usable hint.
    pub default_quality: f32,
    /// Upper bound on a single transform service call.
    pub service_timeout_secs: u64,
    /// MIME type attached to bare payloads returned by the service.
    pub default_mime: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_quality: Quality::DEFAULT.value(),
            service_timeout_secs: 30,
            default_mime: "image/jpeg".into(),
        }
    }
}

impl ScanConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        let config: Self = serde_json::from_str(&data)
            .map_err(|err| ScanError::Config(format!("{}: {err}", path.display())))?;
        config.validate()?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Write as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if Quality::new(self.default_quality).is_none() {
            return Err(ScanError::Config(format!(
                "default_quality {} is outside (0, 1]",
                self.default_quality
            )));
        }
        if self.service_timeout_secs == 0 {
            return Err(ScanError::Config("service_timeout_secs must be positive".into()));
        }
        if self.default_mime.trim().is_empty() {
            return Err(ScanError::Config("default_mime must not be empty".into()));
        }
        Ok(())
    }

    pub fn default_quality(&self) -> Quality {
        Quality::new(self.default_quality).unwrap_or_default()
    }

    pub fn service_timeout(&self) -> Duration {
        Duration::from_secs(self.service_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A missing config file loads as the defaults.
    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ScanConfig::load(&dir.path().join("config.json")).expect("load");
        assert_eq!(config, ScanConfig::default());
        assert_eq!(config.default_quality(), Quality::DEFAULT);
        assert_eq!(config.service_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let config = ScanConfig {
            default_quality: 0.95,
            service_timeout_secs: 5,
            default_mime: "image/png".into(),
        };
        config.save(&path).expect("save");
        assert_eq!(ScanConfig::load(&path).expect("load"), config);
    }

    /// Fields absent from the file take their default values.
    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_quality": 0.6}"#).expect("write");
        let config = ScanConfig::load(&path).expect("load");
        assert_eq!(config.default_quality, 0.6);
        assert_eq!(config.service_timeout_secs, 30);
        assert_eq!(config.default_mime, "image/jpeg");
    }

    #[test]
    fn out_of_range_quality_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_quality": 1.5}"#).expect("write");
        assert!(matches!(ScanConfig::load(&path), Err(ScanError::Config(_))));
    }

    #[test]
    fn garbage_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").expect("write");
        assert!(matches!(ScanConfig::load(&path), Err(ScanError::Config(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ScanConfig {
            service_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
