use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tickscope_domain::errors::QueryError;
use tickscope_domain::repositories::page_source::{PageAction, PageSource};

/// Blocking HTTP client for the paginated tick detail feed.
pub struct HttpPageSource {
    pub base_url: String,
    pub timeout_ms: u64,
    client: Client,
}

impl HttpPageSource {
    pub fn new(base_url: String, timeout: Duration, max_redirects: usize) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(max_redirects))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self {
            base_url,
            timeout_ms: timeout.as_millis() as u64,
            client,
        })
    }

    pub fn page_url(&self, symbol: &str, page: u32, action: PageAction) -> String {
        format!(
            "{}?appn=detail&action={}&c={}&p={}",
            self.base_url.trim_end_matches('?'),
            action.as_str(),
            symbol.to_lowercase(),
            page
        )
    }
}

impl PageSource for HttpPageSource {
    fn fetch_page(&self, symbol: &str, page: u32, action: PageAction) -> Result<String, QueryError> {
        let url = self.page_url(symbol, page, action);
        let span = tracing::debug_span!(
            "infra.feed.fetch_page",
            url = %url,
            page,
            action = action.as_str(),
            timeout_ms = self.timeout_ms
        );
        let _enter = span.enter();

        let start = Instant::now();
        metrics::counter!("tickscope.infra.feed.requests_total", "action" => action.as_str())
            .increment(1);

        let result = self
            .client
            .get(&url)
            .send()
            .map_err(|err| QueryError::Transport(err.to_string()))
            .and_then(|resp| {
                let status = resp.status();
                if status != StatusCode::OK {
                    return Err(QueryError::HttpStatus {
                        code: status.as_u16(),
                    });
                }
                resp.text()
                    .map_err(|err| QueryError::Transport(format!("failed to read body: {err}")))
            });

        let elapsed_ms = start.elapsed().as_millis() as f64;
        match &result {
            Ok(body) => {
                metrics::histogram!(
                    "tickscope.infra.feed.request_ms",
                    "action" => action.as_str(),
                    "result" => "ok"
                )
                .record(elapsed_ms);
                tracing::debug!(bytes = body.len(), "page fetched");
            }
            Err(err) => {
                metrics::counter!(
                    "tickscope.infra.feed.errors_total",
                    "action" => action.as_str(),
                    "kind" => err.kind()
                )
                .increment(1);
                metrics::histogram!(
                    "tickscope.infra.feed.request_ms",
                    "action" => action.as_str(),
                    "result" => "err"
                )
                .record(elapsed_ms);
                tracing::warn!(error = %err, "page request failed");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::HttpPageSource;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tickscope_domain::errors::QueryError;
    use tickscope_domain::repositories::page_source::{PageAction, PageSource};

    fn http_response(status: u16, reason: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn redirect_response(location: &str) -> String {
        format!(
            "HTTP/1.1 302 Found\r\nLocation: {location}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        )
    }

    /// Serves `responses` in order and reports each request line it saw.
    fn try_spawn_server(responses: Vec<String>) -> Option<(String, mpsc::Receiver<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").ok()?;
        let addr = listener.local_addr().ok()?;
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for response in responses {
                let (mut stream, _) = listener.accept().expect("accept");
                let mut buf = [0u8; 4096];
                let n = stream.read(&mut buf).unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let line = request.lines().next().unwrap_or_default().to_string();
                let _ = tx.send(line);
                stream
                    .write_all(response.as_bytes())
                    .expect("write response");
            }
        });

        Some((format!("http://{}", addr), rx))
    }

    fn source(base_url: String) -> HttpPageSource {
        HttpPageSource::new(base_url, Duration::from_secs(2), 10).expect("client")
    }

    #[test]
    fn page_url_lowercases_symbol() {
        let source = source("https://stock.gtimg.cn/data/index.php".to_string());
        assert_eq!(
            source.page_url("SH600000", 3, PageAction::Data),
            "https://stock.gtimg.cn/data/index.php?appn=detail&action=data&c=sh600000&p=3"
        );
    }

    #[test]
    fn fetch_page_returns_body_and_sends_query() {
        let body = "v_detail_data_sh600000=[1,\"0/09:30:00/10.00/0.1/100/100000/B\"]";
        let Some((url, requests)) = try_spawn_server(vec![http_response(200, "OK", body)]) else {
            return;
        };
        let source = source(format!("{url}/data/index.php"));

        let got = source
            .fetch_page("sh600000", 2, PageAction::Data)
            .expect("page");
        assert_eq!(got, body);

        let line = requests.recv().expect("request line");
        assert!(line.starts_with("GET /data/index.php?appn=detail&action=data&c=sh600000&p=2"));
    }

    #[test]
    fn fetch_page_empty_body_is_not_an_error() {
        let Some((url, _requests)) = try_spawn_server(vec![http_response(200, "OK", "")]) else {
            return;
        };
        let got = source(url)
            .fetch_page("sz000001", 9, PageAction::Data)
            .expect("empty page");
        assert!(got.is_empty());
    }

    #[test]
    fn fetch_page_maps_non_200_to_status_error() {
        let Some((url, _requests)) =
            try_spawn_server(vec![http_response(404, "Not Found", "missing")])
        else {
            return;
        };
        let err = source(url)
            .fetch_page("sh600000", 2, PageAction::Data)
            .expect_err("404");
        assert_eq!(err, QueryError::HttpStatus { code: 404 });
    }

    #[test]
    fn fetch_page_maps_connection_failure_to_transport_error() {
        let addr = {
            let Ok(listener) = TcpListener::bind("127.0.0.1:0") else {
                return;
            };
            listener.local_addr().expect("addr")
        };
        let err = source(format!("http://{addr}"))
            .fetch_page("sh600000", 0, PageAction::Boundaries)
            .expect_err("connection refused");
        assert_eq!(err.kind(), "transport");
    }

    #[test]
    fn fetch_page_follows_redirects_within_the_cap() {
        let body = "v_detail_data_sh600000=[0,\"0/09:30:00/10.00/0.1/100/100000/B\"]";
        let Some((url, requests)) = try_spawn_server(vec![
            redirect_response("/moved/index.php?appn=detail&action=data&c=sh600000&p=0"),
            http_response(200, "OK", body),
        ]) else {
            return;
        };
        let source = HttpPageSource::new(url, Duration::from_secs(2), 3).expect("client");

        let got = source
            .fetch_page("sh600000", 0, PageAction::Data)
            .expect("page after redirect");
        assert_eq!(got, body);

        let _first = requests.recv().expect("first request");
        let second = requests.recv().expect("redirected request");
        assert!(second.starts_with("GET /moved/index.php"));
    }

    #[test]
    fn fetch_page_maps_too_many_redirects_to_transport_error() {
        let Some((url, _requests)) = try_spawn_server(vec![
            redirect_response("/hop-1"),
            redirect_response("/hop-2"),
            http_response(200, "OK", "unreachable"),
        ]) else {
            return;
        };
        let source = HttpPageSource::new(url, Duration::from_secs(2), 1).expect("client");

        let err = source
            .fetch_page("sh600000", 0, PageAction::Data)
            .expect_err("redirect cap exceeded");
        assert_eq!(err.kind(), "transport");
    }
}
