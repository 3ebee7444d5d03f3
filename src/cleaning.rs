//! One-shot conversion of the delimited sales source into a workbook.
//!
//! The source keeps every column verbatim except `Invoice Date`, which is
//! rewritten from `05-03-2021` to `5-3-2021`. Values that are not a real
//! date become the null date (an empty cell) and the row is kept.

use rust_xlsxwriter::Workbook;
use std::io::Read;
use std::path::Path;

use crate::dates;
use crate::error::{DashboardError, Result};
use crate::record::{INVOICE_DATE, is_plain_number};

/// Source rows as text, before any typing
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Outcome of date normalization
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows: usize,
    pub parsed: usize,
    pub coerced: usize,
}

/// Read comma-separated text with a header row
pub fn read_source<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(|v| v.to_string()).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

pub fn read_source_file(path: impl AsRef<Path>) -> Result<RawTable> {
    let file = std::fs::File::open(path.as_ref())?;
    // Exports from spreadsheet tools often start with a byte order mark
    let mut text = String::new();
    std::io::BufReader::new(file).read_to_string(&mut text)?;
    read_source(text.trim_start_matches('\u{FEFF}').as_bytes())
}

/// Rewrite the `Invoice Date` column in place
///
/// Fails only when the column is absent. Each value is either rewritten in
/// unpadded day-month-year form or cleared.
pub fn normalize_invoice_dates(table: &mut RawTable) -> Result<NormalizeReport> {
    let col = table
        .headers
        .iter()
        .position(|h| h.trim() == INVOICE_DATE)
        .ok_or_else(|| DashboardError::missing_column(INVOICE_DATE))?;

    let mut report = NormalizeReport {
        rows: table.rows.len(),
        ..Default::default()
    };

    for (r, row) in table.rows.iter_mut().enumerate() {
        let Some(cell) = row.get_mut(col) else {
            continue;
        };
        match dates::normalize_date(cell) {
            Some(normalized) => {
                *cell = normalized;
                report.parsed += 1;
            }
            None => {
                log::debug!("row {}: invalid invoice date {:?}, storing null", r + 2, cell);
                cell.clear();
                report.coerced += 1;
            }
        }
    }

    Ok(report)
}

/// Build the workbook bytes: first sheet, header row, no index column
///
/// Bare numbers are stored as numbers so the dashboard reads them back
/// typed; everything else, dates included, is stored as text. Empty values
/// are left as blank cells.
pub fn workbook_bytes(table: &RawTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (c, header) in table.headers.iter().enumerate() {
        worksheet.write_string(0, c as u16, header)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let sheet_row = (r + 1) as u32;
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let is_date = table.headers.get(c).map(|h| h.trim()) == Some(INVOICE_DATE);
            if !is_date && is_plain_number(value) {
                if let Ok(number) = value.trim().parse::<f64>() {
                    worksheet.write_number(sheet_row, c as u16, number)?;
                    continue;
                }
            }
            worksheet.write_string(sheet_row, c as u16, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write the workbook to disk, replacing any existing file
pub fn write_workbook(table: &RawTable, path: impl AsRef<Path>) -> Result<()> {
    let bytes = workbook_bytes(table)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Read, normalize and write in one go
///
/// Nothing is written unless reading and normalizing both succeeded.
pub fn clean_sales_file(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<NormalizeReport> {
    let source = source.as_ref();
    let output = output.as_ref();

    let mut table = read_source_file(source)?;
    log::info!(
        "read {} rows with {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        source.display()
    );

    let report = normalize_invoice_dates(&mut table)?;
    if report.coerced > 0 {
        log::warn!("{} invoice dates could not be parsed and were cleared", report.coerced);
    }

    write_workbook(&table, output)?;
    log::info!("wrote {}", output.display());

    Ok(report)
}
