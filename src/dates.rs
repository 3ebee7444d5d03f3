use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

/// Format of `Invoice Date` in the delimited source (`05-03-2021`)
pub const SOURCE_DATE_FORMAT: &str = "%d-%m-%Y";

/// Format written to the workbook: same order, no zero padding (`5-3-2021`)
pub const NORMALIZED_DATE_FORMAT: &str = "%-d-%-m-%Y";

/// Abbreviated month and two-digit year (`Mar'21`)
pub const MONTH_YEAR_FORMAT: &str = "%b'%y";

lazy_static! {
    // chrono's %Y takes any number of digits; the source always has four
    static ref DAY_MONTH_YEAR: Regex = Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").unwrap();
    static ref ISO_DATE: Regex =
        Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}(T\d{2}:\d{2}:\d{2})?$").unwrap();
}

/// Parse a day-month-year date
///
/// Zero-padded and unpadded components are both accepted, so a value that
/// went through [`normalize_date`] parses back to the same calendar date.
/// Returns `None` for anything that is not a real calendar date
/// (`31-02-2021`, empty text, free text) or whose year is not four digits
/// (`05-03-21`).
pub fn parse_day_month_year(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if !DAY_MONTH_YEAR.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, SOURCE_DATE_FORMAT).ok()
}

/// Parse a date cell read back from the workbook
///
/// Besides day-month-year text this also takes ISO dates and ISO
/// timestamps, which is what spreadsheet tools tend to leave behind when
/// somebody re-saves the file.
pub fn parse_invoice_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Some(date) = parse_day_month_year(text) {
        return Some(date);
    }
    if !ISO_DATE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

pub fn format_normalized(date: NaiveDate) -> String {
    date.format(NORMALIZED_DATE_FORMAT).to_string()
}

/// Rewrite a source date in its normalized form
///
/// Unparseable input yields `None`, the null date.
pub fn normalize_date(text: &str) -> Option<String> {
    parse_day_month_year(text).map(format_normalized)
}

pub fn month_year(date: NaiveDate) -> String {
    date.format(MONTH_YEAR_FORMAT).to_string()
}
