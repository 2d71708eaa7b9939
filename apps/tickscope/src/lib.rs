pub mod bootstrap;
pub mod input;
pub mod obs;
pub mod tasks;

use crate::tasks::{TaskEvent, TaskRunner};
use std::path::PathBuf;
use tickscope_application::config::to_toml_pretty;
use tickscope_application::querying::{QueryOptions, QueryReport, QueryRequest};
use tickscope_domain::errors::QueryError;
use tickscope_domain::repositories::history::HistoryStore;

pub const EXIT_OK: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_NO_DATA: i32 = 3;

#[derive(Debug, Clone)]
pub struct QueryArgs {
    pub code: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub locale: Option<String>,
    pub config_path: Option<PathBuf>,
    pub no_history: bool,
    pub json: bool,
}

/// Failure of a command, already mapped to a process exit code.
#[derive(Debug)]
pub struct CommandError {
    pub exit_code: i32,
    pub message: String,
}

impl From<String> for CommandError {
    fn from(message: String) -> Self {
        Self {
            exit_code: EXIT_ERROR,
            message,
        }
    }
}

impl From<QueryError> for CommandError {
    fn from(err: QueryError) -> Self {
        let exit_code = match err {
            QueryError::NoDataAvailable { .. } => EXIT_NO_DATA,
            _ => EXIT_ERROR,
        };
        Self {
            exit_code,
            message: err.to_string(),
        }
    }
}

pub fn run_query_command(args: QueryArgs) -> Result<String, CommandError> {
    let (start, end) =
        input::validate_query_args(&args.code, args.start.as_deref(), args.end.as_deref())?;
    let config_path = bootstrap::resolve_config_path(args.config_path);
    let config = bootstrap::load_config(config_path.as_deref())?;

    let history = bootstrap::history_store(&config);
    let locale = bootstrap::resolve_locale(
        args.locale.as_deref(),
        &config,
        (!args.no_history).then_some(&history),
    )?;
    drop(history);

    let settings = config.source_settings();
    let options = QueryOptions {
        max_pages: settings.max_pages,
        page_delay: settings.page_delay,
        locale,
    };
    let request = QueryRequest::new(args.code.trim()).with_window(start, end);
    let deps = bootstrap::build_query_deps(&config, !args.no_history)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .map_err(|err| format!("failed to init tokio runtime: {err}"))?;
    let report = runtime.block_on(drive_query(deps, request, options))?;

    render_output(&report, args.json)
}

async fn drive_query(
    deps: tasks::QueryDeps,
    request: QueryRequest,
    options: QueryOptions,
) -> Result<QueryReport, CommandError> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let runner = TaskRunner::new(tx);
    runner.start(deps, request, options)?;
    while let Some(event) = rx.recv().await {
        match event {
            TaskEvent::QueryStarted { code } => {
                tracing::info!(code = %code, "query started");
            }
            TaskEvent::QueryFinished(result) => return result.map_err(CommandError::from),
            TaskEvent::TaskFailed { message, .. } => return Err(CommandError::from(message)),
        }
    }
    Err(CommandError::from(
        "query task ended without a result".to_string(),
    ))
}

fn render_output(report: &QueryReport, json: bool) -> Result<String, CommandError> {
    if json {
        return serde_json::to_string_pretty(report)
            .map_err(|err| CommandError::from(format!("failed to serialize report: {err}")));
    }
    Ok(report.text.clone())
}

pub fn run_history_command(config_path: Option<PathBuf>) -> Result<String, CommandError> {
    let config_path = bootstrap::resolve_config_path(config_path);
    let config = bootstrap::load_config(config_path.as_deref())?;
    let store = bootstrap::history_store(&config);
    let entries = store.history()?;
    if entries.is_empty() {
        return Ok(format!("no queries recorded in {}", store.path().display()));
    }
    Ok(entries
        .iter()
        .enumerate()
        .map(|(idx, code)| format!("{:>2}. {code}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Effective configuration with defaults filled in, as TOML.
pub fn run_config_command(config_path: Option<PathBuf>) -> Result<String, CommandError> {
    let config_path = bootstrap::resolve_config_path(config_path);
    let config = bootstrap::load_config(config_path.as_deref())?;
    Ok(to_toml_pretty(&config.effective())?)
}
