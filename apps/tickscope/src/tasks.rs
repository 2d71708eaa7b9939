use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tickscope_application::querying::{run_query, QueryOptions, QueryReport, QueryRequest};
use tickscope_domain::errors::QueryError;
use tickscope_domain::repositories::history::HistoryStore;
use tickscope_domain::repositories::page_source::PageSource;

/// Adapters a query task owns for its whole run.
pub struct QueryDeps {
    pub source: Box<dyn PageSource + Send>,
    pub history: Box<dyn HistoryStore + Send>,
}

pub enum TaskEvent {
    QueryStarted { code: String },
    QueryFinished(Result<QueryReport, QueryError>),
    /// The worker died before producing a result.
    TaskFailed { code: String, message: String },
}

/// Runs queries on the blocking pool, one at a time.
#[derive(Clone)]
pub struct TaskRunner {
    inner: Arc<TaskRunnerInner>,
}

struct TaskRunnerInner {
    tx: tokio::sync::mpsc::UnboundedSender<TaskEvent>,
    current: Mutex<Option<String>>,
}

impl TaskRunner {
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<TaskEvent>) -> Self {
        Self {
            inner: Arc::new(TaskRunnerInner {
                tx,
                current: Mutex::new(None),
            }),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.inner.current.lock().is_some()
    }

    /// Code of the query in flight, if any.
    pub fn current(&self) -> Option<String> {
        self.inner.current.lock().clone()
    }

    /// Starts `request` unless another query is still running.
    ///
    /// Must be called from within a tokio runtime. The result arrives as
    /// `TaskEvent::QueryFinished` on the runner's channel, or `TaskEvent::TaskFailed` if
    /// the worker panicked.
    pub fn start(
        &self,
        deps: QueryDeps,
        request: QueryRequest,
        options: QueryOptions,
    ) -> Result<(), String> {
        {
            let mut slot = self.inner.current.lock();
            if let Some(code) = slot.as_ref() {
                return Err(format!("a query for {code} is already running"));
            }
            *slot = Some(request.security_code.clone());
        }

        let inner = self.inner.clone();
        let code = request.security_code.clone();
        let _ = inner.tx.send(TaskEvent::QueryStarted { code: code.clone() });

        let handle = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let result = run_query(
                deps.source.as_ref(),
                deps.history.as_ref(),
                &request,
                &options,
            );
            drop(deps);

            let result_label = match &result {
                Ok(report) if report.is_complete() => "ok",
                Ok(_) => "partial",
                Err(_) => "err",
            };
            metrics::counter!("tickscope.cli.tasks_total", "result" => result_label).increment(1);
            metrics::histogram!("tickscope.cli.task_ms", "result" => result_label)
                .record(start.elapsed().as_millis() as f64);
            result
        });

        // The slot is released here so a panicking query cannot leave it taken.
        tokio::spawn(async move {
            let event = match handle.await {
                Ok(result) => TaskEvent::QueryFinished(result),
                Err(err) => {
                    metrics::counter!("tickscope.cli.tasks_total", "result" => "panic")
                        .increment(1);
                    tracing::error!(code = %code, error = %err, "query task aborted");
                    TaskEvent::TaskFailed {
                        code,
                        message: format!("query task aborted: {err}"),
                    }
                }
            };
            {
                let mut slot = inner.current.lock();
                *slot = None;
            }
            let _ = inner.tx.send(event);
        });
        Ok(())
    }
}
