//! Column rules for the Cryptact custom file.
//!
//! Each rule is a pure function of one input row.

use crate::models::{Action, Chain, TransactionRecord, Volume};

/// Prefix marking a user-defined (non-listed) asset in Cryptact.
pub const BASE_PREFIX: &str = "USER-";

/// Characters of the title kept in `Base`.
pub const BASE_MAX_CHARS: usize = 10;

/// `Bulk` value meaning "single item".
pub const NO_BULK: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Classified {
    Buy,
    Sell,
}

/// Event-type substrings and their classification, in priority order.
///
/// Every rule is checked against the original text; the last matching rule wins.
const ACTION_RULES: [(&str, Classified); 5] = [
    ("Mint", Classified::Buy),
    ("Sell", Classified::Sell),
    ("Claim", Classified::Buy),
    ("BidWon", Classified::Buy),
    ("Run", Classified::Buy),
];

/// Classify an event type. Unmatched text is passed through.
pub fn classify_action(event_type: &str) -> Action {
    let matched = ACTION_RULES
        .iter()
        .rev()
        .find(|(needle, _)| event_type.contains(*needle))
        .map(|(_, class)| *class);

    match matched {
        Some(Classified::Buy) => Action::Buy,
        Some(Classified::Sell) => Action::Sell,
        None => Action::Other(event_type.to_string()),
    }
}

/// `USER-` followed by the first ten characters of the title before its first `#`.
pub fn derive_base(title: &str) -> String {
    let name = title.split('#').next().unwrap_or(title);
    let short: String = name.chars().take(BASE_MAX_CHARS).collect();
    format!("{}{}", BASE_PREFIX, short)
}

/// The `Bulk` quantity when there is one, otherwise 1 for trades and 0 for the rest.
pub fn derive_volume(bulk: Option<&str>, action: &Action) -> Volume {
    match bulk {
        Some(qty) if qty != NO_BULK => Volume::Bulk(qty.to_string()),
        _ if action.is_trade() => Volume::Count(1),
        _ => Volume::Count(0),
    }
}

/// Per-item JPY value on Ethereum, total JPY value on Polygon.
pub fn select_price(record: &TransactionRecord) -> Option<String> {
    match record.chain() {
        Chain::Ethereum => record.value_jpy.clone(),
        Chain::Polygon => record.value_total_jpy.clone(),
    }
}
