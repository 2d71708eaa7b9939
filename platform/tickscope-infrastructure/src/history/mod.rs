use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tickscope_domain::repositories::history::{push_recent, HistoryStore};

const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
struct HistoryFile {
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    stock_history: Vec<String>,
}

impl Default for HistoryFile {
    fn default() -> Self {
        Self {
            language: default_language(),
            stock_history: Vec::new(),
        }
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// History kept in a small JSON document next to the user's data.
///
/// The file is read on first use and rewritten after every recorded query.
pub struct JsonHistoryStore {
    path: PathBuf,
    max_entries: usize,
    state: Mutex<Option<HistoryFile>>,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries: max_entries.max(1),
            state: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Language tag stored alongside the history, lowercased.
    pub fn language(&self) -> Result<String, String> {
        let mut state = self.state.lock();
        let file = self.loaded(&mut state)?;
        Ok(file.language.to_lowercase())
    }

    fn loaded<'a>(&self, state: &'a mut Option<HistoryFile>) -> Result<&'a mut HistoryFile, String> {
        if state.is_none() {
            *state = Some(read_history_file(&self.path)?);
        }
        state
            .as_mut()
            .ok_or_else(|| "history state not loaded".to_string())
    }
}

fn read_history_file(path: &Path) -> Result<HistoryFile, String> {
    let start = Instant::now();
    let result = if path.exists() {
        fs::read_to_string(path)
            .map_err(|err| format!("failed to read history {}: {}", path.display(), err))
            .and_then(|contents| {
                serde_json::from_str::<HistoryFile>(&contents)
                    .map_err(|err| format!("failed to parse history {}: {}", path.display(), err))
            })
    } else {
        tracing::debug!(path = %path.display(), "history file missing, starting empty");
        Ok(HistoryFile::default())
    };
    record_metrics("read", start, result.is_ok());
    result
}

fn write_history_file(path: &Path, file: &HistoryFile) -> Result<(), String> {
    let start = Instant::now();
    let result = write_json(path, file);
    record_metrics("write", start, result.is_ok());
    result
}

fn write_json(path: &Path, file: &HistoryFile) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create dir {}: {}", parent.display(), err))?;
    }
    let json = serde_json::to_string_pretty(file)
        .map_err(|err| format!("failed to serialize history: {err}"))?;
    fs::write(path, json).map_err(|err| format!("failed to write history {}: {}", path.display(), err))
}

fn record_metrics(op: &'static str, start: Instant, ok: bool) {
    let result_label = if ok { "ok" } else { "err" };
    metrics::counter!(
        "tickscope.infra.history.calls_total",
        "op" => op,
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("tickscope.infra.history.io_ms", "op" => op, "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
}

impl HistoryStore for JsonHistoryStore {
    fn record_query(&self, security_code: &str) -> Result<Vec<String>, String> {
        let mut state = self.state.lock();
        let file = self.loaded(&mut state)?;
        let mut updated = file.clone();
        push_recent(&mut updated.stock_history, security_code, Some(self.max_entries));
        write_history_file(&self.path, &updated)?;
        *file = updated;
        tracing::debug!(code = security_code, entries = file.stock_history.len(), "history updated");
        Ok(file.stock_history.clone())
    }

    fn history(&self) -> Result<Vec<String>, String> {
        let mut state = self.state.lock();
        let file = self.loaded(&mut state)?;
        Ok(file.stock_history.clone())
    }
}

/// Process-local history, used for `--no-history` runs and in tests.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: Mutex<Vec<String>>,
    max_entries: Option<usize>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            max_entries: Some(max_entries),
        }
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn record_query(&self, security_code: &str) -> Result<Vec<String>, String> {
        let mut entries = self.entries.lock();
        push_recent(&mut entries, security_code, self.max_entries);
        Ok(entries.clone())
    }

    fn history(&self) -> Result<Vec<String>, String> {
        Ok(self.entries.lock().clone())
    }
}
