//! Ingredient catalog parsing for the bulk loader.
//!
//! The catalog is a headerless CSV file of `name,measurement_unit` lines.

use serde::{Deserialize, Serialize};

/// One catalog line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub measurement_unit: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("line {line}: expected `name,measurement_unit`, found {found} column(s)")]
    MissingColumn { line: usize, found: usize },

    #[error("line {line}: empty {column}")]
    EmptyValue { line: usize, column: &'static str },
}

/// Parse catalog text into entries, in file order.
///
/// Blank lines are skipped, values are trimmed, and extra columns are ignored.
/// Line numbers in errors are 1-based.
pub fn parse_catalog(text: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut entries = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let columns = parse_csv_line(line);

        let [name, unit, ..] = columns.as_slice() else {
            return Err(CatalogError::MissingColumn {
                line: line_no,
                found: columns.len(),
            });
        };

        let name = name.trim();
        let unit = unit.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyValue {
                line: line_no,
                column: "name",
            });
        }
        if unit.is_empty() {
            return Err(CatalogError::EmptyValue {
                line: line_no,
                column: "measurement_unit",
            });
        }

        entries.push(CatalogEntry {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        });
    }

    Ok(entries)
}

/// Split one CSV line, honouring double-quoted fields and `""` escapes.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == ',' {
            result.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    result.push(current);
    result
}
