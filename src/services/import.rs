//! CSV Import service
//!
//! Reads `concept,amount` expense files. The first row is a header and is
//! discarded. Amounts use the locale format ("1.234,56"). Rows that cannot be
//! read are skipped and reported; they never abort the import.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::error::{CuotasError, CuotasResult};
use crate::models::{Amount, ExpenseItem};

/// A row that was skipped during import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the file (the header is line 1)
    pub line: u64,
    /// Why the row was skipped
    pub reason: String,
}

/// Result of reading an expense file
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Expense items read successfully, in file order
    pub items: Vec<ExpenseItem>,
    /// Rows that could not be read
    pub skipped: Vec<SkippedRow>,
}

impl ImportResult {
    /// Number of skipped rows
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Return the items, or `NoValidData` if none could be read
    pub fn into_items(self) -> CuotasResult<Vec<ExpenseItem>> {
        if self.items.is_empty() {
            return Err(CuotasError::NoValidData {
                skipped: self.skipped.len(),
            });
        }
        Ok(self.items)
    }
}

/// Service for importing expense CSV files
#[derive(Debug, Clone, Copy)]
pub struct ImportService {
    delimiter: u8,
}

impl Default for ImportService {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl ImportService {
    /// Create a new import service
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different field delimiter (e.g. `;`)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Import an expense file from disk
    pub fn import_file(&self, path: &Path) -> CuotasResult<ImportResult> {
        if !path.exists() {
            return Err(CuotasError::NotFound {
                entity_type: "File",
                identifier: path.display().to_string(),
            });
        }
        let file = std::fs::File::open(path)
            .map_err(|e| CuotasError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
        self.import_reader(file)
    }

    /// Import expenses from any reader
    pub fn import_reader<R: Read>(&self, reader: R) -> CuotasResult<ImportResult> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let mut result = ImportResult::default();

        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    result.skipped.push(SkippedRow {
                        line,
                        reason: format!("Error reading CSV record: {}", e),
                    });
                    continue;
                }
            };

            let line = record.position().map(|p| p.line()).unwrap_or(0);
            match parse_record(&record, self.delimiter) {
                Ok(item) => result.items.push(item),
                Err(reason) => {
                    warn!(line, %reason, "skipping expense row");
                    result.skipped.push(SkippedRow { line, reason });
                }
            }
        }

        debug!(
            items = result.items.len(),
            skipped = result.skipped.len(),
            "imported expense file"
        );

        Ok(result)
    }
}

/// Parse one record into an expense item
///
/// Concept fields split on an unquoted delimiter are joined back with the
/// delimiter and a single space, since trimming drops the original spacing.
fn parse_record(record: &StringRecord, delimiter: u8) -> Result<ExpenseItem, String> {
    let fields: Vec<&str> = record.iter().collect();
    if fields.len() < 2 {
        return Err("Missing amount column".to_string());
    }

    let (concept_fields, amount_str) = split_amount(&fields);
    let separator = format!("{} ", delimiter as char);
    let concept = concept_fields.join(&separator).trim().to_string();
    if concept.is_empty() {
        return Err("Missing concept".to_string());
    }

    let amount = Amount::parse_locale(&amount_str)
        .map_err(|e| format!("Could not parse amount for '{}': {}", concept, e))?;

    Ok(ExpenseItem::new(concept, amount))
}

/// Separate the concept fields from the amount
///
/// The amount is the last field. An unquoted amount such as `1.234,56` is
/// split by the CSV reader into `1.234` and `56`; when the last field is a
/// one or two digit fraction following an integer field, the two are joined
/// back together.
fn split_amount<'a>(fields: &[&'a str]) -> (Vec<&'a str>, String) {
    let n = fields.len();
    if n >= 3 && is_fraction(fields[n - 1]) && is_integer_part(fields[n - 2]) {
        let amount = format!("{},{}", fields[n - 2], fields[n - 1]);
        return (fields[..n - 2].to_vec(), amount);
    }
    (fields[..n - 1].to_vec(), fields[n - 1].to_string())
}

fn is_fraction(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
}

fn is_integer_part(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
}
