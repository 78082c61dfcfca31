//! Checks an uploaded transactions CSV before it is forwarded to the API.
//!
//! The expected columns are `Fecha, Descripción, Monto, Tipo, Categoría, Notas`,
//! the same layout the API exports.

use time::Date;

use crate::{Error, api::TransactionType, validation::ISO_DATE_FORMAT};

/// Rows with fewer columns than this are skipped by the API, so they are skipped here too.
const MIN_COLUMNS: usize = 4;

const DATE_COLUMN: usize = 0;
const AMOUNT_COLUMN: usize = 2;
const TYPE_COLUMN: usize = 3;

/// Check every data row of `contents` and return how many rows will be imported.
///
/// # Errors
/// Returns [Error::InvalidCsv] naming the first row that the API would reject,
/// or the header row if the file has no data rows.
pub fn validate_transactions_csv(contents: &[u8]) -> Result<usize, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents);

    let mut row_count = 0;

    for (index, record) in reader.records().enumerate() {
        // The header is row 1.
        let fallback_row = index + 2;
        let record = record.map_err(|error| Error::InvalidCsv {
            row: error
                .position()
                .map(|position| position.line() as usize)
                .unwrap_or(fallback_row),
            reason: "the row could not be read as CSV".to_owned(),
        })?;
        let row = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(fallback_row);

        if record.len() < MIN_COLUMNS {
            tracing::debug!("Skipping CSV row {row} with {} columns", record.len());
            continue;
        }

        let invalid = |reason: &str| Error::InvalidCsv {
            row,
            reason: reason.to_owned(),
        };

        // The API parses the date as is, padding included.
        if Date::parse(&record[DATE_COLUMN], ISO_DATE_FORMAT).is_err() {
            return Err(invalid("the date must be in the format yyyy-MM-dd"));
        }

        let amount_is_valid = record[AMOUNT_COLUMN]
            .parse::<f64>()
            .is_ok_and(|amount| amount.is_finite() && amount > 0.0);
        if !amount_is_valid {
            return Err(invalid("the amount must be a positive number"));
        }

        if TransactionType::parse(&record[TYPE_COLUMN].to_uppercase())
            .is_none_or(|_| record[TYPE_COLUMN].trim() != &record[TYPE_COLUMN])
        {
            return Err(invalid("the type must be INCOME or EXPENSE"));
        }

        row_count += 1;
    }

    if row_count == 0 {
        return Err(Error::InvalidCsv {
            row: 1,
            reason: "the file has no transactions to import".to_owned(),
        });
    }

    Ok(row_count)
}
