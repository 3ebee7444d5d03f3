use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::dates;
use crate::error::{DashboardError, Result};

pub const RETAILER: &str = "Retailer";
pub const REGION: &str = "Region";
pub const STATE: &str = "State";
pub const INVOICE_DATE: &str = "Invoice Date";
pub const UNITS_SOLD: &str = "Units Sold";
pub const TOTAL_SALES: &str = "Total Sales";
pub const MONTH_YEAR: &str = "Month_Year";

lazy_static! {
    // Currency symbols, thousands separators and stray spaces around a number
    static ref NUMERIC_NOISE: Regex = Regex::new(r"[\s$€£,]").unwrap();
    static ref PLAIN_NUMBER: Regex = Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").unwrap();
}

/// One cell of the loaded sales table
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form used for grouping keys; empty cells have no key
    pub fn as_key(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string().trim().to_string())
        }
    }

    /// Numeric value, cleaning `$600,000`-style text first
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Empty => None,
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Number(f) if f.is_finite() => Some(*f),
            CellValue::Number(_) => None,
            CellValue::Text(text) => parse_numeric_text(text),
        }
    }

    /// Whole-number value; fractional numbers are rejected
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            other => {
                let value = other.as_f64()?;
                if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                    Some(value as i64)
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Number(n) => f.write_str(&format_decimal(*n)),
        }
    }
}

/// Parse numeric text the way it appears in sales exports
///
/// `1,200`, `$600,000` and ` 42 ` are all numbers; anything that is still
/// not a plain number after removing currency symbols and separators is
/// `None`.
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let cleaned = NUMERIC_NOISE.replace_all(text, "");
    if !PLAIN_NUMBER.is_match(&cleaned) {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// True when the text is a bare number that a spreadsheet should store as one
pub fn is_plain_number(text: &str) -> bool {
    PLAIN_NUMBER.is_match(text.trim())
}

/// Decimal rendering matching the dataframe exports: whole values keep a
/// trailing `.0`, everything else uses the shortest round-trip form.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// One typed row of the sales table
#[derive(Clone, Debug, PartialEq)]
pub struct SalesRecord {
    pub retailer: Option<String>,
    pub region: Option<String>,
    pub state: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub units_sold: Option<i64>,
    pub total_sales: Option<f64>,
}

impl SalesRecord {
    /// Derived `Month_Year` key, absent when the invoice date is null
    pub fn month_year(&self) -> Option<String> {
        self.invoice_date.map(dates::month_year)
    }
}

/// The full loaded table: every source column, in file order
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SalesTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

struct ColumnIndex {
    retailer: usize,
    region: usize,
    state: usize,
    invoice_date: usize,
    units_sold: usize,
    total_sales: usize,
}

impl SalesTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        SalesTable { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| DashboardError::missing_column(name))
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&CellValue::Empty)
    }

    fn required_columns(&self) -> Result<ColumnIndex> {
        Ok(ColumnIndex {
            retailer: self.column_index(RETAILER)?,
            region: self.column_index(REGION)?,
            state: self.column_index(STATE)?,
            invoice_date: self.column_index(INVOICE_DATE)?,
            units_sold: self.column_index(UNITS_SOLD)?,
            total_sales: self.column_index(TOTAL_SALES)?,
        })
    }

    /// Typed projection of the six columns the views are built from
    ///
    /// Fails with [`DashboardError::MissingColumn`] if any of them is absent.
    /// Numbers that cannot be read are logged and left empty.
    pub fn records(&self) -> Result<Vec<SalesRecord>> {
        let cols = self.required_columns()?;
        let mut records = Vec::with_capacity(self.rows.len());

        for r in 0..self.rows.len() {
            let units = self.cell(r, cols.units_sold);
            let sales = self.cell(r, cols.total_sales);

            let units_sold = units.as_i64();
            if units_sold.is_none() && !units.is_empty() {
                log::warn!("row {}: ignoring {} value {:?}", r + 2, UNITS_SOLD, units.to_string());
            }
            let total_sales = sales.as_f64();
            if total_sales.is_none() && !sales.is_empty() {
                log::warn!("row {}: ignoring {} value {:?}", r + 2, TOTAL_SALES, sales.to_string());
            }

            records.push(SalesRecord {
                retailer: self.cell(r, cols.retailer).as_key(),
                region: self.cell(r, cols.region).as_key(),
                state: self.cell(r, cols.state).as_key(),
                invoice_date: dates::parse_invoice_date(&self.cell(r, cols.invoice_date).to_string()),
                units_sold,
                total_sales,
            });
        }

        Ok(records)
    }

    /// Give each column a single numeric type
    ///
    /// A column holding any fractional number is a decimal column, so its
    /// whole numbers are stored as [`CellValue::Number`] too and keep their
    /// `.0` when written out. Text and empty cells are left alone.
    pub fn unify_numeric_columns(&mut self) {
        for col in 0..self.headers.len() {
            let decimal = self
                .rows
                .iter()
                .any(|row| matches!(row.get(col), Some(CellValue::Number(_))));
            if !decimal {
                continue;
            }
            for row in self.rows.iter_mut() {
                if let Some(cell) = row.get_mut(col) {
                    if let CellValue::Integer(i) = *cell {
                        *cell = CellValue::Number(i as f64);
                    }
                }
            }
        }
    }

    /// The table with the derived `Month_Year` column appended
    pub fn with_month_year(&self) -> Result<SalesTable> {
        let date_col = self.column_index(INVOICE_DATE)?;
        let mut headers = self.headers.clone();
        headers.push(MONTH_YEAR.to_string());

        let rows = (0..self.rows.len())
            .map(|r| {
                let mut row = self.rows[r].clone();
                row.resize(self.headers.len(), CellValue::Empty);
                let key = dates::parse_invoice_date(&self.cell(r, date_col).to_string())
                    .map(dates::month_year);
                row.push(key.map(CellValue::Text).unwrap_or(CellValue::Empty));
                row
            })
            .collect();

        Ok(SalesTable { headers, rows })
    }
}
