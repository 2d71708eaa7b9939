use serde::Serialize;

/// A security code as typed by the user plus the symbol the detail feed expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityCode {
    pub raw: String,
    pub symbol: String,
}

impl SecurityCode {
    /// `600000.SH` becomes `sh600000`; anything else is only lowercased.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("security code is empty".to_string());
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(format!("security code contains whitespace: {trimmed}"));
        }
        // The symbol goes into the feed query string as is.
        if trimmed.matches('.').count() > 1
            || trimmed.chars().any(|ch| ch != '.' && !ch.is_ascii_alphanumeric())
        {
            return Err(format!("invalid security code: {trimmed}"));
        }

        let symbol = match trimmed.split_once('.') {
            Some((code, exchange)) if !code.is_empty() && !exchange.is_empty() => {
                format!("{}{}", exchange, code)
            }
            Some(_) => return Err(format!("invalid security code: {trimmed}")),
            None => trimmed.to_string(),
        };

        Ok(Self {
            raw: trimmed.to_string(),
            symbol: symbol.to_lowercase(),
        })
    }
}
