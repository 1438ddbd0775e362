//! Domain models for the conversion pipeline.
//!
//! - [`TransactionRecord`] - One row of a marketplace transaction export
//! - [`Chain`] - Network a transaction ran on (Ethereum or Polygon)
//! - [`Action`] - Cryptact trade classification (BUY, SELL, or passthrough)
//! - [`Volume`] - Traded quantity
//! - [`OutputRecord`] - One row of the Cryptact custom-file format

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

// =============================================================================
// Column names
// =============================================================================

/// Input column names, as they appear in the export headers.
pub mod columns {
    pub const TIME: &str = "Time";
    pub const CONTRACT_ADDRESS: &str = "Contract Address";
    pub const EVENT_TYPE: &str = "Event Type";
    pub const TITLE: &str = "Title";
    pub const BULK: &str = "Bulk";
    pub const VALUE_JPY: &str = "Value(JPY)";
    pub const VALUE_TOTAL_JPY: &str = "Value(Total JPY)";
    pub const ETH_PRICE_USD: &str = "1ETH Price(USD)";
    pub const TX_FEE_JPY: &str = "TX Fee(JPY)";
    pub const TRANSACTION_HASH: &str = "Transaction Hash";
}

/// Every column the converter reads. A file lacking any of them is rejected.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    columns::TIME,
    columns::CONTRACT_ADDRESS,
    columns::EVENT_TYPE,
    columns::TITLE,
    columns::BULK,
    columns::VALUE_JPY,
    columns::VALUE_TOTAL_JPY,
    columns::ETH_PRICE_USD,
    columns::TX_FEE_JPY,
    columns::TRANSACTION_HASH,
];

/// Header of the converted file, in output order.
pub const OUTPUT_COLUMNS: [&str; 10] = [
    "Timestamp", "Action", "Source", "Base", "Volume", "Price", "Counter", "Fee", "FeeCcy",
    "Comment",
];

/// Currency written to `Counter` and `FeeCcy`.
pub const QUOTE_CURRENCY: &str = "JPY";

// =============================================================================
// Null cells
// =============================================================================

/// Cell texts read as "no value", in addition to the empty cell.
static NA_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
        "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
    ]
    .into_iter()
    .collect()
});

/// Whether a raw cell should be treated as null.
pub fn is_null_cell(raw: &str) -> bool {
    raw.is_empty() || NA_TOKENS.contains(raw)
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(if is_null_cell(&raw) { None } else { Some(raw) })
}

// =============================================================================
// Transaction Record
// =============================================================================

/// One row of a transaction export.
///
/// Numeric-looking columns are kept as their original text so that the
/// converted file carries exactly what the export said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "Time")]
    pub time: String,

    #[serde(rename = "Contract Address")]
    pub contract_address: String,

    #[serde(rename = "Event Type")]
    pub event_type: String,

    /// Item title, usually `<collection>#<token id>`.
    #[serde(rename = "Title")]
    pub title: String,

    /// Quantity for bulk events, `-` otherwise.
    #[serde(rename = "Bulk", deserialize_with = "nullable", default)]
    pub bulk: Option<String>,

    #[serde(rename = "Value(JPY)", deserialize_with = "nullable", default)]
    pub value_jpy: Option<String>,

    #[serde(rename = "Value(Total JPY)", deserialize_with = "nullable", default)]
    pub value_total_jpy: Option<String>,

    /// Only filled in by Ethereum exports.
    #[serde(rename = "1ETH Price(USD)", deserialize_with = "nullable", default)]
    pub eth_price_usd: Option<String>,

    #[serde(rename = "TX Fee(JPY)", deserialize_with = "nullable", default)]
    pub tx_fee_jpy: Option<String>,

    #[serde(rename = "Transaction Hash")]
    pub transaction_hash: String,
}

impl TransactionRecord {
    /// Network the transaction ran on.
    pub fn chain(&self) -> Chain {
        if self.eth_price_usd.is_some() {
            Chain::Ethereum
        } else {
            Chain::Polygon
        }
    }

    /// Cells in [`REQUIRED_COLUMNS`] order, nulls rendered empty.
    pub fn cells(&self) -> Vec<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            self.time.clone(),
            self.contract_address.clone(),
            self.event_type.clone(),
            self.title.clone(),
            opt(&self.bulk),
            opt(&self.value_jpy),
            opt(&self.value_total_jpy),
            opt(&self.eth_price_usd),
            opt(&self.tx_fee_jpy),
            self.transaction_hash.clone(),
        ]
    }
}

// =============================================================================
// Chain
// =============================================================================

/// Blockchain a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Ethereum,
    Polygon,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Ethereum => f.write_str("Ethereum"),
            Chain::Polygon => f.write_str("Polygon"),
        }
    }
}

// =============================================================================
// Action
// =============================================================================

/// Trade classification written to the `Action` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Buy,
    Sell,
    /// Event text that matched no rule, passed through unchanged.
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Other(text) => text,
        }
    }

    /// BUY or SELL.
    pub fn is_trade(&self) -> bool {
        matches!(self, Action::Buy | Action::Sell)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// =============================================================================
// Volume
// =============================================================================

/// Quantity written to the `Volume` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Volume {
    /// `Bulk` cell copied as-is.
    Bulk(String),
    /// Implied count for single-item events.
    Count(u8),
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Volume::Bulk(text) => f.write_str(text),
            Volume::Count(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for Volume {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Volume::Bulk(text) => serializer.serialize_str(text),
            Volume::Count(n) => serializer.serialize_u8(*n),
        }
    }
}

// =============================================================================
// Output Record (Cryptact custom file)
// =============================================================================

/// One row of the converted file. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Action")]
    pub action: Action,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Base")]
    pub base: String,
    #[serde(rename = "Volume")]
    pub volume: Volume,
    #[serde(rename = "Price")]
    pub price: Option<String>,
    #[serde(rename = "Counter")]
    pub counter: &'static str,
    #[serde(rename = "Fee")]
    pub fee: Option<String>,
    #[serde(rename = "FeeCcy")]
    pub fee_ccy: &'static str,
    #[serde(rename = "Comment")]
    pub comment: String,
}

impl OutputRecord {
    /// Cells in [`OUTPUT_COLUMNS`] order, nulls rendered empty.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.action.to_string(),
            self.source.clone(),
            self.base.clone(),
            self.volume.to_string(),
            self.price.clone().unwrap_or_default(),
            self.counter.to_string(),
            self.fee.clone().unwrap_or_default(),
            self.fee_ccy.to_string(),
            self.comment.clone(),
        ]
    }
}

// =============================================================================
// Tests
// =============================================================================
