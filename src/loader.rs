use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

use crate::cleaning;
use crate::dates;
use crate::error::{DashboardError, Result};
use crate::record::{CellValue, SalesTable, is_plain_number};

/// Load the sales table from the first sheet of a workbook
///
/// The first row is the header row. Every other row becomes one row of the
/// table; trailing short rows are padded with empty cells. Spreadsheets
/// store every number as a float, so whole values load as integers unless
/// their column also holds fractions.
///
/// # Arguments
/// * `filepath` - Path to the `.xlsx` file written by the cleaning step
///
/// # Returns
/// * `Result<SalesTable>` - The loaded table or an error
///
/// # Examples
/// ```no_run
/// use sales_dashboard::loader::load_workbook;
///
/// match load_workbook("Nike.xlsx") {
///     Ok(table) => println!("Loaded {} sales rows", table.rows.len()),
///     Err(e) => eprintln!("Error loading workbook: {}", e),
/// }
/// ```
pub fn load_workbook(filepath: impl AsRef<Path>) -> Result<SalesTable> {
    let path = filepath.as_ref();
    if !path.exists() {
        return Err(DashboardError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )));
    }

    let mut workbook = open_workbook_auto(path)?;

    // Get the first worksheet
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DashboardError::EmptyWorkbook(path.display().to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|cell| data_to_text(cell)).collect(),
        None => return Err(DashboardError::EmptyWorkbook(sheet_name)),
    };

    let body: Vec<Vec<CellValue>> = rows
        .map(|row| {
            let mut cells: Vec<CellValue> = row.iter().map(data_to_cell).collect();
            cells.resize(headers.len(), CellValue::Empty);
            cells
        })
        .collect();

    log::debug!("loaded sheet {:?} from {}", sheet_name, path.display());
    let mut table = SalesTable::new(headers, body);
    table.unify_numeric_columns();
    Ok(table)
}

/// Load the sales table from comma-separated text
///
/// Bare numbers become numeric cells, everything else stays text, matching
/// what the workbook would hold after the cleaning step.
pub fn from_csv(filepath: impl AsRef<Path>) -> Result<SalesTable> {
    let raw = cleaning::read_source_file(filepath)?;
    let rows: Vec<Vec<CellValue>> = raw
        .rows
        .into_iter()
        .map(|row| row.into_iter().map(text_to_cell).collect())
        .collect();
    let mut table = SalesTable::new(raw.headers, rows);
    table.unify_numeric_columns();
    Ok(table)
}

/// Detect file type and load appropriate format
pub fn load_table(filepath: impl AsRef<Path>) -> Result<SalesTable> {
    let path = filepath.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("csv") => from_csv(path),
        Some("xlsx") | Some("xlsm") | Some("xls") | Some("ods") => load_workbook(path),
        Some(ext) => Err(DashboardError::UnsupportedFile(ext.to_string())),
        None => Err(DashboardError::UnsupportedFile(path.display().to_string())),
    }
}

pub fn text_to_cell(text: String) -> CellValue {
    if text.trim().is_empty() {
        return CellValue::Empty;
    }
    if is_plain_number(&text) {
        let trimmed = text.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Number(f);
        }
    }
    CellValue::Text(text)
}

fn data_to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => text_to_cell(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => {
            // Whole floats are how spreadsheets store integer columns
            if f.fract() == 0.0 && f.abs() < 9.0e15 {
                CellValue::Integer(*f as i64)
            } else {
                CellValue::Number(*f)
            }
        }
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => CellValue::Text(dates::format_normalized(dt.date())),
            None => CellValue::Empty,
        },
        Data::DateTimeIso(s) => match dates::parse_invoice_date(s) {
            Some(date) => CellValue::Text(dates::format_normalized(date)),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        // Formula errors such as #N/A carry no value
        Data::Error(_) => CellValue::Empty,
    }
}

fn data_to_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
