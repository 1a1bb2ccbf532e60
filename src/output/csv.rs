//! Spreadsheet export of sensitive-log hits.
//!
//! Column order is fixed: index, matched word, file type, content, line
//! number, file path. Output starts with a UTF-8 BOM so spreadsheet tools
//! pick the right encoding.

use std::fs;
use std::path::Path;

use crate::classifier::SensitiveHit;
use crate::collector::Discovered;
use crate::error::IoError;

pub const CSV_HEADER: [&str; 6] = [
    "Index",
    "Sensitive Word",
    "File Type",
    "Content",
    "Line Number",
    "File Path",
];

const BOM: &str = "\u{feff}";

/// Rows follow the slice order; the index column is the 1-based row number.
pub fn sensitive_hits_to_csv(records: &[Discovered<SensitiveHit>]) -> String {
    let mut out = String::from(BOM);
    push_row(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));

    for (row, record) in records.iter().enumerate() {
        let hit = &record.finding;
        push_row(
            &mut out,
            [
                (row + 1).to_string(),
                hit.matched_word.clone(),
                hit.file_type.clone(),
                hit.line_content.clone(),
                hit.line_number.to_string(),
                hit.file_path.display().to_string(),
            ],
        );
    }
    out
}

pub fn write_sensitive_csv(path: &Path, records: &[Discovered<SensitiveHit>]) -> Result<(), IoError> {
    fs::write(path, sensitive_hits_to_csv(records)).map_err(|e| IoError::write_error(path, e))
}

fn push_row<I: IntoIterator<Item = String>>(out: &mut String, fields: I) {
    let row: Vec<String> = fields.into_iter().map(|f| escape(&f)).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
