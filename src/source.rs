//! Tabular source reading.
//!
//! Input files are decoded to UTF-8 according to the configured
//! [`SourceEncoding`], parsed with the Polars CSV reader with every column
//! kept as a string, and have their header names trimmed. Codes and numbers
//! are parsed by the stages that consume them, so a stray value never changes
//! the inferred type of a whole column.

use crate::config::SourceEncoding;
use crate::error::{PriceError, Result};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Read a delimited file into a string-typed DataFrame
pub fn read_table(path: &Path, encoding: SourceEncoding) -> Result<DataFrame> {
    if !path.exists() {
        return Err(PriceError::source_read(path, "file not found"));
    }

    let bytes = std::fs::read(path).map_err(|e| PriceError::source_read(path, e.to_string()))?;
    let text = decode(bytes, encoding).map_err(|reason| PriceError::source_read(path, reason))?;

    let df = parse_csv(text).map_err(|e| PriceError::source_read(path, e.to_string()))?;
    debug!(
        "Read {}: {} rows, {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Parse CSV text held in memory
pub fn read_table_from_str(text: &str) -> Result<DataFrame> {
    Ok(parse_csv(text.to_string())?)
}

fn parse_csv(text: String) -> PolarsResult<DataFrame> {
    let options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0));

    let mut df = CsvReader::new(Cursor::new(text.into_bytes()))
        .with_options(options)
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str().trim().to_string())
        .collect();
    df.set_column_names(trimmed)?;
    Ok(df)
}

/// Decode raw file bytes to UTF-8 text
pub fn decode(bytes: Vec<u8>, encoding: SourceEncoding) -> std::result::Result<String, String> {
    match encoding {
        // Every Latin-1 byte is the code point of the same value
        SourceEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        SourceEncoding::Utf8 => {
            let bytes = match bytes.strip_prefix(UTF8_BOM) {
                Some(rest) => rest.to_vec(),
                None => bytes,
            };
            String::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {}", e))
        }
    }
}

/// Values of a string column; fails with a schema error naming the column
pub fn string_values<'a>(
    df: &'a DataFrame,
    column: &str,
    stage: &'static str,
) -> Result<Vec<Option<&'a str>>> {
    let values = df
        .column(column)
        .map_err(|_| PriceError::schema(stage, format!("missing column '{}'", column)))?
        .str()?
        .into_iter()
        .collect();
    Ok(values)
}

/// Fail with a schema error unless every listed column is present
pub fn require_columns(df: &DataFrame, required: &[&str], stage: &'static str) -> Result<()> {
    let present: BTreeSet<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PriceError::schema(
            stage,
            format!("missing column(s): {}", missing.join(", ")),
        ))
    }
}

/// Attributes of one reference code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub name: Option<String>,
    /// Extra attribute, e.g. the M49 geographic code of an area
    pub attribute: Option<String>,
}

/// Auxiliary code table (areas, items, elements or flags)
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    pub label: String,
    pub code_column: String,
    entries: BTreeMap<String, ReferenceEntry>,
    duplicate_codes: usize,
}

impl ReferenceTable {
    /// Build a table from a frame; repeated codes keep their first entry
    pub fn from_frame(
        label: &str,
        df: &DataFrame,
        code_column: &str,
        name_column: &str,
        attribute_column: Option<&str>,
    ) -> Result<Self> {
        let codes = string_values(df, code_column, "source")?;
        let names = string_values(df, name_column, "source")?;
        let attributes = match attribute_column {
            Some(column) => Some(string_values(df, column, "source")?),
            None => None,
        };

        let mut entries = BTreeMap::new();
        let mut duplicate_codes = 0;

        for (i, code) in codes.iter().enumerate() {
            let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
                continue;
            };
            if entries.contains_key(code) {
                duplicate_codes += 1;
                continue;
            }
            let entry = ReferenceEntry {
                name: names[i].map(|n| n.trim().to_string()),
                attribute: attributes
                    .as_ref()
                    .and_then(|a| a[i])
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string),
            };
            entries.insert(code.to_string(), entry);
        }

        if duplicate_codes > 0 {
            debug!("{} table: ignored {} duplicate codes", label, duplicate_codes);
        }

        Ok(Self {
            label: label.to_string(),
            code_column: code_column.to_string(),
            entries,
            duplicate_codes,
        })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn get(&self, code: &str) -> Option<&ReferenceEntry> {
        self.entries.get(code)
    }

    /// Distinct codes, sorted
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in code order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ReferenceEntry)> {
        self.entries.iter().map(|(code, entry)| (code.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duplicate_codes(&self) -> usize {
        self.duplicate_codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_latin1_decoding() {
        // "Côte" with ô as the single Latin-1 byte 0xF4
        let bytes = vec![b'C', 0xF4, b't', b'e'];
        assert_eq!(decode(bytes, SourceEncoding::Latin1).unwrap(), "Côte");
    }

    #[test]
    fn test_utf8_decoding_strips_bom_and_rejects_invalid() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Türkiye".as_bytes());
        assert_eq!(decode(bytes, SourceEncoding::Utf8).unwrap(), "Türkiye");

        assert!(decode(vec![b'C', 0xF4, b't'], SourceEncoding::Utf8).is_err());
    }

    #[test]
    fn test_read_table_trims_headers_and_keeps_strings() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, " Area Code ,Area,M49 Code ").unwrap();
        writeln!(file, "4,Afghanistan,'004").unwrap();
        writeln!(file, "41,\"China, mainland\",'156").unwrap();

        let df = read_table(file.path(), SourceEncoding::Utf8).unwrap();
        assert_eq!(df.height(), 2);

        let codes = string_values(&df, "Area Code", "source").unwrap();
        assert_eq!(codes, vec![Some("4"), Some("41")]);
        let names = string_values(&df, "Area", "source").unwrap();
        assert_eq!(names[1], Some("China, mainland"));
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let result = read_table(Path::new("/nonexistent/Prices_E_All_Data.csv"), SourceEncoding::Latin1);
        match result.unwrap_err() {
            PriceError::SourceRead { path, .. } => {
                assert!(path.ends_with("Prices_E_All_Data.csv"));
            }
            other => panic!("Expected SourceRead error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let df = read_table_from_str("Area,Item\nFrance,Wheat\n").unwrap();
        assert!(require_columns(&df, &["Area", "Item"], "source").is_ok());

        match require_columns(&df, &["Area", "Element Code"], "reshape").unwrap_err() {
            PriceError::Schema { stage, reason } => {
                assert_eq!(stage, "reshape");
                assert!(reason.contains("Element Code"));
            }
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_table_ignores_duplicates() {
        let df = read_table_from_str(
            "Area Code,M49 Code,Area\n4,'004,Afghanistan\n4,'004,Afghanistan\n68,,France\n",
        )
        .unwrap();
        let table =
            ReferenceTable::from_frame("areas", &df, "Area Code", "Area", Some("M49 Code")).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.duplicate_codes(), 1);
        assert!(table.contains("4"));
        assert_eq!(table.get("4").unwrap().attribute.as_deref(), Some("'004"));
        assert_eq!(table.get("68").unwrap().attribute, None);
        assert_eq!(table.codes().collect::<Vec<_>>(), vec!["4", "68"]);
    }
}
