use std::net::SocketAddr;

/// Installs the global subscriber. Logs go to stderr so stdout stays the report.
pub fn init_tracing(log_level: &str, log_format: &str) -> Result<(), String> {
    let filter = std::env::var("TICKSCOPE_LOG").unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    match log_format.trim().to_lowercase().as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .init(),
        "text" => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
        _ => {
            return Err(format!(
                "unsupported log format: {log_format} (expected text | json)"
            ))
        }
    }
    Ok(())
}

#[cfg(feature = "prometheus")]
pub fn init_metrics() -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = std::env::var("TICKSCOPE_METRICS_ADDR").ok() else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid TICKSCOPE_METRICS_ADDR (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
pub fn init_metrics() -> Result<Option<SocketAddr>, String> {
    let requested = std::env::var("TICKSCOPE_METRICS_ADDR")
        .map(|raw| !raw.trim().is_empty())
        .unwrap_or(false);
    if requested {
        return Err("metrics exporter requires tickscope feature `prometheus`".to_string());
    }
    Ok(None)
}
