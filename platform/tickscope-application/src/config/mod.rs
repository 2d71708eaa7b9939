use crate::reporting::ReportLocale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tickscope_domain::value_objects::session::DEFAULT_MAX_PAGE;

pub const DEFAULT_BASE_URL: &str = "https://stock.gtimg.cn/data/index.php";
pub const DEFAULT_PAGE_DELAY_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const DEFAULT_HISTORY_PATH: &str = "tickscope_history.json";
pub const DEFAULT_HISTORY_ENTRIES: usize = 20;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub source: Option<SourceConfig>,
    pub report: Option<ReportConfig>,
    pub history: Option<HistoryConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub max_pages: Option<u32>,
    pub page_delay_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub max_redirects: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    pub locale: Option<ReportLocale>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    pub path: Option<String>,
    pub max_entries: Option<usize>,
}

/// Connection settings for the detail feed with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    pub base_url: String,
    pub max_pages: u32,
    pub page_delay: Duration,
    pub timeout: Duration,
    pub max_redirects: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistorySettings {
    pub path: PathBuf,
    pub max_entries: usize,
}

impl Config {
    pub fn source_settings(&self) -> SourceSettings {
        let source = self.source.clone().unwrap_or_default();
        SourceSettings {
            base_url: source
                .base_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_pages: source.max_pages.unwrap_or(DEFAULT_MAX_PAGE),
            page_delay: Duration::from_millis(
                source.page_delay_ms.unwrap_or(DEFAULT_PAGE_DELAY_MS),
            ),
            timeout: Duration::from_millis(source.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
            max_redirects: source.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
        }
    }

    pub fn locale(&self) -> ReportLocale {
        self.report
            .as_ref()
            .and_then(|report| report.locale)
            .unwrap_or_default()
    }

    pub fn history_settings(&self) -> HistorySettings {
        let history = self.history.clone().unwrap_or_default();
        HistorySettings {
            path: PathBuf::from(
                history
                    .path
                    .unwrap_or_else(|| DEFAULT_HISTORY_PATH.to_string()),
            ),
            max_entries: history.max_entries.unwrap_or(DEFAULT_HISTORY_ENTRIES).max(1),
        }
    }

    /// Copy of this config with every default written out.
    pub fn effective(&self) -> Config {
        let source = self.source_settings();
        let history = self.history_settings();
        Config {
            source: Some(SourceConfig {
                base_url: Some(source.base_url),
                max_pages: Some(source.max_pages),
                page_delay_ms: Some(source.page_delay.as_millis() as u64),
                timeout_ms: Some(source.timeout.as_millis() as u64),
                max_redirects: Some(source.max_redirects),
            }),
            report: Some(ReportConfig {
                locale: Some(self.locale()),
            }),
            history: Some(HistoryConfig {
                path: Some(history.path.display().to_string()),
                max_entries: Some(history.max_entries),
            }),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let settings = self.source_settings();
        if settings.max_pages == 0 {
            return Err("source.max_pages must be > 0".to_string());
        }
        if settings.timeout.is_zero() {
            return Err("source.timeout_ms must be > 0".to_string());
        }
        if !settings.base_url.starts_with("http://") && !settings.base_url.starts_with("https://")
        {
            return Err(format!(
                "source.base_url must be an http(s) url: {}",
                settings.base_url
            ));
        }
        if matches!(self.history.as_ref().and_then(|h| h.max_entries), Some(0)) {
            return Err("history.max_entries must be > 0".to_string());
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    config
        .validate()
        .map_err(|err| format!("invalid config {}: {}", path.display(), err))?;
    Ok(config)
}

/// Loads `path` when given, falling back to built-in defaults when no file was asked for.
///
/// A path that was given explicitly but does not exist is an error; the default
/// `tickscope.toml` in the working directory is optional.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = Path::new("tickscope.toml");
            if default_path.exists() {
                load_config(default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}
