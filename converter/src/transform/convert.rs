//! Row-wise conversion of the merged table into Cryptact custom-file rows.

use std::collections::BTreeMap;

use super::rules::{classify_action, derive_base, derive_volume, select_price};
use crate::loader::MergedTable;
use crate::models::{OutputRecord, TransactionRecord, QUOTE_CURRENCY};

/// Converted rows, in merged-table order
#[derive(Debug, Clone, Default)]
pub struct ConvertedTable {
    pub records: Vec<OutputRecord>,
}

impl ConvertedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows per `Action` value, sorted by value.
    pub fn action_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.action.to_string()).or_insert(0) += 1;
        }
        counts
    }
}

/// Convert one row.
pub fn convert_record(record: &TransactionRecord) -> OutputRecord {
    let action = classify_action(&record.event_type);
    let volume = derive_volume(record.bulk.as_deref(), &action);

    OutputRecord {
        timestamp: record.time.clone(),
        action,
        source: record.title.clone(),
        base: derive_base(&record.title),
        volume,
        price: select_price(record),
        counter: QUOTE_CURRENCY,
        fee: record.tx_fee_jpy.clone(),
        fee_ccy: QUOTE_CURRENCY,
        comment: record.transaction_hash.clone(),
    }
}

/// Convert every row of the merged table, keeping row order.
pub fn convert_table(table: &MergedTable) -> ConvertedTable {
    ConvertedTable {
        records: table.records.iter().map(convert_record).collect(),
    }
}
