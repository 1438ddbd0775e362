//! Folder loader: reads every export in a folder into one sorted table.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, LoadResult};
use crate::logs::{log_info, log_info_indent, log_success};
use crate::models::TransactionRecord;
use crate::parser::parse_csv_file;

/// All rows of a folder's exports, sorted by `(Time, Contract Address)`.
#[derive(Debug, Clone, Default)]
pub struct MergedTable {
    /// Files that contributed rows, in read order
    pub files: Vec<PathBuf>,
    /// Sorted rows
    pub records: Vec<TransactionRecord>,
}

impl MergedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// List `*.csv` files directly inside `dir`, sorted by name.
///
/// Sub-directories (including `output/`) are not scanned.
pub fn list_csv_files(dir: &Path) -> LoadResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(LoadError::FolderNotFound(dir.to_path_buf()));
    }

    let unreadable = |source| LoadError::Unreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        let is_csv = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Sort rows by `Time`, then `Contract Address`.
///
/// The sort is stable: rows with equal keys keep their file-then-row order.
pub fn sort_records(records: &mut [TransactionRecord]) {
    records.sort_by(|a, b| {
        a.time
            .cmp(&b.time)
            .then_with(|| a.contract_address.cmp(&b.contract_address))
    });
}

/// Load, concatenate and sort every export in `dir`.
///
/// Fails on the first file that cannot be parsed, and when the folder holds
/// no `*.csv` file at all.
pub fn merge_csv_files(dir: &Path) -> LoadResult<MergedTable> {
    let files = list_csv_files(dir)?;
    if files.is_empty() {
        return Err(LoadError::NoCsvFiles(dir.to_path_buf()));
    }

    log_info(format!("📂 Reading {} CSV file(s) from {}", files.len(), dir.display()));

    let mut records = Vec::new();
    for path in &files {
        let parsed = parse_csv_file(path)?;
        log_info_indent(
            format!(
                "{}: {} rows ({}, '{}')",
                path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
                parsed.records.len(),
                parsed.encoding,
                format_delimiter(parsed.delimiter),
            ),
            1,
        );
        records.extend(parsed.records);
    }

    sort_records(&mut records);
    log_success(format!("Merged {} rows", records.len()));

    Ok(MergedTable { files, records })
}

pub(crate) fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HEADER: &str = "Time,Contract Address,Event Type,Title,Bulk,Value(JPY),Value(Total JPY),1ETH Price(USD),TX Fee(JPY),Transaction Hash";

    fn write(dir: &Path, name: &str, rows: &[&str]) {
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        fs::write(dir.join(name), content).unwrap();
    }

    fn is_sorted(records: &[TransactionRecord]) -> bool {
        records.windows(2).all(|w| {
            (&w[0].time, &w[0].contract_address) <= (&w[1].time, &w[1].contract_address)
        })
    }

    #[test]
    fn test_merge_counts_and_sorts() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "eth.csv",
            &[
                "2022-03-01 00:00:00,0xb,Mint,A#1,-,100,,1800,10,h1",
                "2022-01-01 00:00:00,0xa,Sell,B#2,-,200,,1800,10,h2",
            ],
        );
        write(
            dir.path(),
            "polygon.csv",
            &[
                "2022-03-01 00:00:00,0xa,Claim,C#3,2,,300,,0,h3",
                "2022-02-01 00:00:00,0xc,Transfer,D#4,-,,,,0,h4",
                "2022-01-15 00:00:00,0xd,BidWon,E#5,-,,500,,0,h5",
            ],
        );

        let merged = merge_csv_files(dir.path()).unwrap();

        assert_eq!(merged.len(), 5);
        assert_eq!(merged.files.len(), 2);
        assert!(is_sorted(&merged.records));
        let hashes: Vec<_> = merged.records.iter().map(|r| r.transaction_hash.as_str()).collect();
        assert_eq!(hashes, vec!["h2", "h5", "h4", "h3", "h1"]);
    }

    #[test]
    fn test_only_csv_files_are_read() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.csv", &["2022-01-01,0x1,Mint,A,-,,,,,h1"]);
        fs::write(dir.path().join("notes.txt"), "not a csv").unwrap();
        fs::write(dir.path().join("b.CSV"), "not read either").unwrap();
        fs::create_dir(dir.path().join("output")).unwrap();
        write(&dir.path().join("output"), "converted.csv", &["x,x,x,x,x,x,x,x,x,x"]);

        let files = list_csv_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.csv")]);
    }

    #[test]
    fn test_empty_folder_fails() {
        let dir = tempdir().unwrap();
        let err = merge_csv_files(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::NoCsvFiles(_)));
    }

    #[test]
    fn test_missing_folder_fails() {
        let dir = tempdir().unwrap();
        let err = merge_csv_files(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, LoadError::FolderNotFound(_)));
    }

    #[test]
    fn test_one_bad_file_aborts() {
        let dir = tempdir().unwrap();
        write(dir.path(), "good.csv", &["2022-01-01,0x1,Mint,A,-,,,,,h1"]);
        fs::write(dir.path().join("bad.csv"), "Time,Title\n2022-01-01,A").unwrap();

        let err = merge_csv_files(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn test_ties_keep_file_order() {
        let dir = tempdir().unwrap();
        write(dir.path(), "1.csv", &["2022-01-01,0x1,Mint,A,-,,,,,first"]);
        write(dir.path(), "2.csv", &["2022-01-01,0x1,Mint,A,-,,,,,second"]);

        let merged = merge_csv_files(dir.path()).unwrap();
        assert_eq!(merged.records[0].transaction_hash, "first");
        assert_eq!(merged.records[1].transaction_hash, "second");
    }
}
