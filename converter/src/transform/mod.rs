//! Transformation module.
//!
//! This module handles the export to Cryptact conversion:
//! - Rules: per-column derivations (Action, Base, Volume, Price)
//! - Convert: row and table conversion
//! - Pipeline: load, convert and write in one call

pub mod convert;
pub mod pipeline;
pub mod rules;

pub use convert::{convert_record, convert_table, ConvertedTable};
pub use pipeline::*;
pub use rules::{classify_action, derive_base, derive_volume, select_price};
