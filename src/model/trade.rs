use serde::{Deserialize, Serialize};

/// A construction trade a task can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub name: String,
    /// Hex colour, e.g. `#FF6B6B`.
    pub color: String,
    #[serde(default)]
    pub category: String,
}

/// First trade whose name appears in `text`, ignoring case.
pub fn match_trade<'a>(trades: &'a [Trade], text: &str) -> Option<&'a Trade> {
    let text = text.to_lowercase();
    trades
        .iter()
        .find(|t| !t.name.is_empty() && text.contains(&t.name.to_lowercase()))
}

/// Look a trade up by exact name.
pub fn find_trade<'a>(trades: &'a [Trade], name: &str) -> Option<&'a Trade> {
    trades.iter().find(|t| t.name == name)
}
