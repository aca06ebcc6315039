//! Wheel contents from a headerless `code,name,picture` CSV file.

use std::path::Path;

use serde::Serialize;

use crate::barcode::{Upc, upc_value};
use crate::error::{Result, WheelError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub upc: Upc,
    pub name: String,
    pub picture: Option<String>,
}

pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let contents = std::fs::read_to_string(path)?;
    let entries = parse_catalog(&contents)?;
    log::info!("read {} catalog rows from {}", entries.len(), path.display());
    Ok(entries)
}

pub fn parse_catalog(input: &str) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_record(line)
            .map_err(|reason| WheelError::InvalidConfig(format!("catalog line {line_no}: {reason}")))?;
        if fields.len() > 3 {
            log::warn!(
                "catalog line {line_no}: ignoring {} extra column(s)",
                fields.len() - 3
            );
        }
        let mut fields = fields.into_iter();
        let code = fields.next().unwrap_or_default();
        let name = fields.next().unwrap_or_default();
        let picture = fields.next().filter(|value| !value.trim().is_empty());

        let upc = upc_value(&code).map_err(|err| {
            WheelError::InvalidConfig(format!("catalog line {line_no}: {err}"))
        })?;
        entries.push(CatalogEntry {
            upc,
            name: name.trim().to_string(),
            picture: picture.map(|value| value.trim().to_string()),
        });
    }
    Ok(entries)
}

/// Splits one CSV record, honouring double quotes and `""` escapes.
fn split_record(line: &str) -> std::result::Result<Vec<String>, &'static str> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match (ch, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            ('"', false) if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field");
    }
    fields.push(current);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_normalizes_codes() {
        let input = "\n22001,Money Order (Principal),\n12345678901,Test Product (Name Here),./random-picture.gif\n\n9,Mardi Gras,\n";
        let entries = parse_catalog(input).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].upc.as_str(), "00000022001");
        assert_eq!(entries[0].name, "Money Order (Principal)");
        assert_eq!(entries[0].picture, None);
        assert_eq!(entries[1].picture.as_deref(), Some("./random-picture.gif"));
        assert_eq!(entries[2].upc.as_str(), "00000000009");
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let entries = parse_catalog("10502,\"Club Card, \"\"Gold\"\" Savings\",\n").unwrap();
        assert_eq!(entries[0].name, "Club Card, \"Gold\" Savings");
    }

    #[test]
    fn bad_rows_report_their_line() {
        let err = parse_catalog("22001,ok,\nnot-a-code,broken,\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");

        let err = parse_catalog("22001,\"open,\n").unwrap_err();
        assert!(err.to_string().contains("unterminated"), "{err}");
    }

    #[test]
    fn missing_columns_are_empty() {
        let entries = parse_catalog("42").unwrap();
        assert_eq!(entries[0].name, "");
        assert_eq!(entries[0].picture, None);
    }
}
