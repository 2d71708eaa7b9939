/// Persisted list of previously queried security codes.
pub trait HistoryStore {
    /// Records a successful query and returns the updated history, most recent
    /// first and deduplicated case-insensitively.
    fn record_query(&self, security_code: &str) -> Result<Vec<String>, String>;

    fn history(&self) -> Result<Vec<String>, String>;
}

/// Moves `code` to the front of `history`, dropping any case-insensitive
/// duplicate, then truncates to `max_entries` when given.
pub fn push_recent(history: &mut Vec<String>, code: &str, max_entries: Option<usize>) {
    let code = code.trim();
    if code.is_empty() {
        return;
    }
    let lower = code.to_lowercase();
    history.retain(|existing| existing.to_lowercase() != lower);
    history.insert(0, code.to_string());
    if let Some(max) = max_entries {
        history.truncate(max.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::push_recent;

    #[test]
    fn push_recent_moves_case_insensitive_duplicate_to_front() {
        let mut history = vec![
            "sz000001".to_string(),
            "600000.SH".to_string(),
            "sh601318".to_string(),
        ];
        push_recent(&mut history, "600000.sh", None);
        assert_eq!(history, vec!["600000.sh", "sz000001", "sh601318"]);
    }

    #[test]
    fn push_recent_truncates_and_ignores_blank_codes() {
        let mut history = vec!["a".to_string(), "b".to_string()];
        push_recent(&mut history, "  ", Some(2));
        assert_eq!(history, vec!["a", "b"]);
        push_recent(&mut history, "c", Some(2));
        assert_eq!(history, vec!["c", "a"]);
    }
}
