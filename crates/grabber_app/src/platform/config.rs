//! RON configuration for the grabber binary.
//!
//! A missing file means defaults. Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use grabber_core::{Format, DEFAULT_DEBOUNCE};
use grabber_engine::ServiceSettings;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use url::Url;

pub(crate) const CONFIG_FILENAME: &str = "grabber.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub(crate) enum FormatSetting {
    Mp3,
    #[default]
    Mp4,
}

impl From<FormatSetting> for Format {
    fn from(setting: FormatSetting) -> Self {
        match setting {
            FormatSetting::Mp3 => Format::Mp3,
            FormatSetting::Mp4 => Format::Mp4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub service_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub debounce_ms: u64,
    pub default_format: FormatSetting,
    pub log_to_file: bool,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let service = ServiceSettings::default();
        Self {
            service_url: service.base_url,
            connect_timeout_secs: service.connect_timeout.as_secs(),
            request_timeout_secs: service.request_timeout.as_secs(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            default_format: FormatSetting::default(),
            log_to_file: true,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            base_url: self.service_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Origin used to build artifact links.
    pub fn origin(&self) -> Result<Url> {
        let mut origin = Url::parse(self.service_url.trim())
            .with_context(|| format!("service_url {:?} is not a valid URL", self.service_url))?;
        if !origin.path().ends_with('/') {
            let path = format!("{}/", origin.path());
            origin.set_path(&path);
        }
        Ok(origin)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn format(&self) -> Format {
        self.default_format.into()
    }

    pub fn level(&self) -> Result<LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| anyhow!("log_level {:?} is not a log level", self.log_level))
    }
}

/// Config path from the first CLI argument, else `./grabber.ron`.
pub(crate) fn config_path(mut args: impl Iterator<Item = String>) -> PathBuf {
    args.nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

pub(crate) fn load_config(path: &Path) -> Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {:?}", path));
        }
    };
    ron::from_str(&content).with_context(|| format!("failed to parse config {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.debounce(), Duration::from_millis(800));
        assert_eq!(config.format(), Format::Mp4);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(service_url: "http://media.local:8080", default_format: Mp3, debounce_ms: 250)"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.service_url, "http://media.local:8080");
        assert_eq!(config.format(), Format::Mp3);
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.log_to_file);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "(service_url: 5").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn origin_gains_trailing_slash() {
        let config = AppConfig {
            service_url: "http://media.local:8080/grab".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.origin().unwrap().as_str(), "http://media.local:8080/grab/");
        let bad = AppConfig {
            service_url: "nowhere".to_string(),
            ..AppConfig::default()
        };
        assert!(bad.origin().is_err());
    }

    #[test]
    fn log_level_is_parsed() {
        let config = AppConfig {
            log_level: "debug".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.level().unwrap(), LevelFilter::Debug);
        let bad = AppConfig {
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert!(bad.level().is_err());
    }

    #[test]
    fn first_argument_overrides_config_path() {
        let args = ["grabber".to_string(), "/etc/grabber.ron".to_string()];
        assert_eq!(config_path(args.into_iter()), PathBuf::from("/etc/grabber.ron"));
        assert_eq!(
            config_path(std::iter::once("grabber".to_string())),
            PathBuf::from(CONFIG_FILENAME)
        );
    }
}
