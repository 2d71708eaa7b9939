use std::fmt;

/// A single record that could not be decoded. Reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldParseError {
    pub record: String,
    pub reason: String,
}

impl fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped record '{}': {}", self.record, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    Transport(String),
    HttpStatus { code: u16 },
    MalformedResponse(String),
    FieldParse(FieldParseError),
    NoDataAvailable { cause: Option<Box<QueryError>> },
    InvalidRequest(String),
    History(String),
}

impl QueryError {
    pub fn no_data() -> Self {
        QueryError::NoDataAvailable { cause: None }
    }

    /// Stable label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Transport(_) => "transport",
            QueryError::HttpStatus { .. } => "http_status",
            QueryError::MalformedResponse(_) => "malformed_response",
            QueryError::FieldParse(_) => "field_parse",
            QueryError::NoDataAvailable { .. } => "no_data",
            QueryError::InvalidRequest(_) => "invalid_request",
            QueryError::History(_) => "history",
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Transport(msg) => write!(f, "transport error: {msg}"),
            QueryError::HttpStatus { code } => {
                write!(f, "http request failed with status code: {code}")
            }
            QueryError::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
            QueryError::FieldParse(err) => write!(f, "field parse error: {err}"),
            QueryError::NoDataAvailable { cause: None } => {
                write!(f, "no data available for analysis")
            }
            QueryError::NoDataAvailable { cause: Some(cause) } => {
                write!(f, "no data available for analysis ({cause})")
            }
            QueryError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            QueryError::History(msg) => write!(f, "history store error: {msg}"),
        }
    }
}

impl std::error::Error for QueryError {}

#[cfg(test)]
mod tests {
    use super::{FieldParseError, QueryError};

    #[test]
    fn display_includes_status_code_and_cause() {
        let err = QueryError::HttpStatus { code: 404 };
        assert!(err.to_string().contains("404"));

        let wrapped = QueryError::NoDataAvailable {
            cause: Some(Box::new(err)),
        };
        let msg = wrapped.to_string();
        assert!(msg.contains("no data available"));
        assert!(msg.contains("404"));
        assert_eq!(wrapped.kind(), "no_data");
    }

    #[test]
    fn field_parse_error_names_the_record() {
        let err = FieldParseError {
            record: "1/09:30:01".to_string(),
            reason: "missing fields".to_string(),
        };
        assert_eq!(
            QueryError::FieldParse(err).to_string(),
            "field parse error: skipped record '1/09:30:01': missing fields"
        );
    }
}
