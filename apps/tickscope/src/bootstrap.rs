use crate::tasks::QueryDeps;
use std::path::{Path, PathBuf};
use tickscope_application::config::{load_config_or_default, Config};
use tickscope_application::reporting::ReportLocale;
use tickscope_infrastructure::feed::HttpPageSource;
use tickscope_infrastructure::history::{InMemoryHistoryStore, JsonHistoryStore};

/// `--config` wins over `TICKSCOPE_CONFIG`.
pub fn resolve_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    cli_path.or_else(|| {
        std::env::var("TICKSCOPE_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
}

pub fn load_config(path: Option<&Path>) -> Result<Config, String> {
    let config = load_config_or_default(path)?;
    match path {
        Some(path) => tracing::debug!(path = %path.display(), "config loaded"),
        None => tracing::debug!("using built-in config defaults"),
    }
    Ok(config)
}

pub fn history_store(config: &Config) -> JsonHistoryStore {
    let settings = config.history_settings();
    JsonHistoryStore::new(settings.path, settings.max_entries)
}

/// Locale precedence: command line, then `[report] locale`, then the language
/// saved with the history, then English.
pub fn resolve_locale(
    cli_locale: Option<&str>,
    config: &Config,
    history: Option<&JsonHistoryStore>,
) -> Result<ReportLocale, String> {
    if let Some(raw) = cli_locale {
        return ReportLocale::parse(raw);
    }
    if let Some(locale) = config.report.as_ref().and_then(|report| report.locale) {
        return Ok(locale);
    }
    let saved = history
        .and_then(|store| store.language().ok())
        .and_then(|language| ReportLocale::parse(&language).ok());
    Ok(saved.unwrap_or_default())
}

pub fn build_query_deps(config: &Config, record_history: bool) -> Result<QueryDeps, String> {
    let source = config.source_settings();
    let feed = HttpPageSource::new(source.base_url, source.timeout, source.max_redirects)?;
    let history: Box<dyn tickscope_domain::repositories::history::HistoryStore + Send> =
        if record_history {
            Box::new(history_store(config))
        } else {
            Box::new(InMemoryHistoryStore::new())
        };
    Ok(QueryDeps {
        source: Box::new(feed),
        history,
    })
}
