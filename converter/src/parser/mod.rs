//! Transaction export parser with encoding and delimiter auto-detection.
//!
//! Turns one export file into typed [`TransactionRecord`]s. Columns are
//! matched by header name, so exports with extra or reordered columns load
//! fine; a missing column the converter reads is a hard error.

use std::path::{Path, PathBuf};

use crate::error::{CsvError, CsvResult};
use crate::models::{TransactionRecord, REQUIRED_COLUMNS};

/// A parsed export file with metadata
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// File the records came from
    pub path: PathBuf,
    /// Parsed rows, in file order
    pub records: Vec<TransactionRecord>,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
    /// Column headers as found in the file
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 always wins; chardet only decides between legacy encodings.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "shift_jis" | "sjis" | "cp932" | "windows-31j" => "shift_jis".to_string(),
        "euc-jp" | "eucjp" => "euc-jp".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes with the given encoding.
///
/// Returns `None` when the bytes contain sequences the encoding cannot map.
pub fn decode_content(bytes: &[u8], encoding: &str) -> Option<String> {
    let codec = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => encoding_rs::UTF_8,
        "shift_jis" | "sjis" | "cp932" => encoding_rs::SHIFT_JIS,
        "euc-jp" => encoding_rs::EUC_JP,
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252,
        other => encoding_rs::Encoding::for_label(other.as_bytes())?,
    };

    // `decode` strips a leading BOM
    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Falls back to a comma when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse an export file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let parsed = parse_csv_file("exports/opensea.csv")?;
/// println!("{} rows ({}, '{}')", parsed.records.len(), parsed.encoding, parsed.delimiter);
/// ```
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> CsvResult<ParsedFile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_bytes(&bytes, path)
}

/// Parse export bytes. `path` is only used for error context.
pub fn parse_bytes(bytes: &[u8], path: &Path) -> CsvResult<ParsedFile> {
    let encoding = detect_encoding(bytes);

    let content = decode_content(bytes, &encoding).ok_or_else(|| CsvError::Encoding {
        path: path.to_path_buf(),
        encoding: encoding.clone(),
    })?;

    let delimiter = detect_delimiter(&content);
    let (headers, records) = parse_str(&content, delimiter, path)?;

    Ok(ParsedFile {
        path: path.to_path_buf(),
        records,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse decoded CSV text with an explicit delimiter.
///
/// Returns the trimmed headers and the typed rows. Blank lines are skipped.
pub fn parse_str(
    content: &str,
    delimiter: char,
    path: &Path,
) -> CsvResult<(Vec<String>, Vec<TransactionRecord>)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let raw_headers = reader
        .headers()
        .map_err(|e| malformed_row(path, &e))?
        .clone();
    let trimmed: csv::StringRecord = raw_headers.iter().map(str::trim).collect();
    reader.set_headers(trimmed.clone());

    let headers: Vec<String> = trimmed.iter().map(str::to_string).collect();

    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        return Err(CsvError::MissingColumn {
            path: path.to_path_buf(),
            column: missing.to_string(),
        });
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<TransactionRecord>() {
        records.push(row.map_err(|e| malformed_row(path, &e))?);
    }

    Ok((headers, records))
}

fn malformed_row(path: &Path, err: &csv::Error) -> CsvError {
    CsvError::MalformedRow {
        path: path.to_path_buf(),
        line: err.position().map(|p| p.line()).unwrap_or(0),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Time,Contract Address,Event Type,Title,Bulk,Value(JPY),Value(Total JPY),1ETH Price(USD),TX Fee(JPY),Transaction Hash";

    fn parse(csv: &str) -> CsvResult<(Vec<String>, Vec<TransactionRecord>)> {
        parse_str(csv, detect_delimiter(csv), Path::new("test.csv"))
    }

    #[test]
    fn test_simple_export() {
        let csv = format!(
            "{}\n2022-01-01 10:00:00,0xabc,Mint,CoolCat#1,-,5000,,1800,300,0xh1\n2022-01-02 10:00:00,0xdef,Sell,Frog#2,3,,9000,,0,0xh2",
            HEADER
        );
        let (headers, rows) = parse(&csv).unwrap();

        assert_eq!(headers.len(), 10);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].time, "2022-01-01 10:00:00");
        assert_eq!(rows[0].title, "CoolCat#1");
        assert_eq!(rows[0].bulk.as_deref(), Some("-"));
        assert_eq!(rows[0].value_jpy.as_deref(), Some("5000"));
        assert_eq!(rows[0].value_total_jpy, None);
        assert_eq!(rows[0].eth_price_usd.as_deref(), Some("1800"));
        assert_eq!(rows[1].bulk.as_deref(), Some("3"));
        assert_eq!(rows[1].eth_price_usd, None);
        assert_eq!(rows[1].tx_fee_jpy.as_deref(), Some("0"));
    }

    #[test]
    fn test_columns_matched_by_name() {
        let csv = "Transaction Hash,Title,Extra,Time,Contract Address,Event Type,Bulk,Value(JPY),Value(Total JPY),1ETH Price(USD),TX Fee(JPY)\n\
                   0xh1,Cat#9,ignored,2022-03-01,0x1,Claim,-,,100,,5";
        let (_, rows) = parse(csv).unwrap();

        assert_eq!(rows[0].transaction_hash, "0xh1");
        assert_eq!(rows[0].title, "Cat#9");
        assert_eq!(rows[0].time, "2022-03-01");
        assert_eq!(rows[0].value_total_jpy.as_deref(), Some("100"));
    }

    #[test]
    fn test_quoted_values() {
        let csv = format!(
            "{}\n2022-01-01,0xabc,Mint,\"Cat, the #1\",-,\"1,000\",,1800,300,0xh1",
            HEADER
        );
        let (_, rows) = parse(&csv).unwrap();

        assert_eq!(rows[0].title, "Cat, the #1");
        assert_eq!(rows[0].value_jpy.as_deref(), Some("1,000"));
    }

    #[test]
    fn test_na_tokens_are_null() {
        let csv = format!("{}\n2022-01-01,0xabc,Mint,Cat#1,-,NaN,,null,N/A,0xh1", HEADER);
        let (_, rows) = parse(&csv).unwrap();

        assert_eq!(rows[0].value_jpy, None);
        assert_eq!(rows[0].eth_price_usd, None);
        assert_eq!(rows[0].tx_fee_jpy, None);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let csv = format!(
            "{}\n2022-01-01,0x1,Mint,A,-,,,,,h1\n\n2022-01-02,0x2,Mint,B,-,,,,,h2\n",
            HEADER
        );
        let (_, rows) = parse(&csv).unwrap();

        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_column_error() {
        let csv = "Time,Contract Address,Event Type,Title\n2022-01-01,0x1,Mint,A";
        let err = parse(csv).unwrap_err();

        match err {
            CsvError::MissingColumn { column, .. } => assert_eq!(column, "Bulk"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ragged_row_error() {
        let csv = format!("{}\n2022-01-01,0x1,Mint", HEADER);
        let err = parse(&csv).unwrap_err();

        assert!(matches!(err, CsvError::MalformedRow { .. }));
        assert!(err.to_string().contains("test.csv"));
    }

    #[test]
    fn test_empty_csv_error() {
        let result = parse("");
        assert!(matches!(result, Err(CsvError::EmptyFile(_))));
    }

    #[test]
    fn test_bom_and_padded_headers() {
        let csv = "\u{feff}Time , Contract Address,Event Type,Title,Bulk,Value(JPY),Value(Total JPY),1ETH Price(USD),TX Fee(JPY),Transaction Hash\n\
                   2022-01-01,0x1,Mint,A,-,,,,,h1";
        let (headers, rows) = parse(csv).unwrap();

        assert_eq!(headers[0], "Time");
        assert_eq!(rows[0].time, "2022-01-01");
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_detect_delimiter_defaults_to_comma() {
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_semicolon_export() {
        let csv = HEADER.replace(',', ";") + "\n2022-01-01;0x1;Sell;A#1;-;10;;1800;1;h1";
        let result = parse_bytes(csv.as_bytes(), Path::new("semi.csv")).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.records[0].event_type, "Sell");
    }

    #[test]
    fn test_shift_jis_decoding() {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("クリプト猫#12");
        let decoded = decode_content(&bytes, "shift_jis").unwrap();
        assert_eq!(decoded, "クリプト猫#12");
    }

    #[test]
    fn test_utf8_detected_before_chardet() {
        assert_eq!(detect_encoding("ねこ#1".as_bytes()), "utf-8");
    }

    #[test]
    fn test_parse_csv_file_missing() {
        let err = parse_csv_file("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, CsvError::Io { .. }));
    }
}
