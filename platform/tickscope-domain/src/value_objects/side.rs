use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
    #[default]
    Neutral,
}

impl Side {
    /// Maps the provider's one-letter type code. Anything that is not `B` or `S`
    /// is a neutral print.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "B" => Side::Buy,
            "S" => Side::Sell,
            _ => Side::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
            Side::Neutral => "neutral",
        }
    }
}
