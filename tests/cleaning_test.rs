mod common;

use common::{SAMPLE_CSV, write_sample_csv, write_sample_workbook};
use sales_dashboard::DashboardError;
use sales_dashboard::cleaning::{self, RawTable};
use sales_dashboard::dates::parse_day_month_year;
use sales_dashboard::loader;
use sales_dashboard::record::{CellValue, INVOICE_DATE};

fn column(table: &RawTable, name: &str) -> usize {
    table.headers.iter().position(|h| h == name).unwrap()
}

#[test]
fn test_read_source_keeps_every_column() {
    let table = cleaning::read_source(SAMPLE_CSV.as_bytes()).unwrap();

    assert_eq!(table.headers.len(), 11);
    assert_eq!(table.rows.len(), 5);
    assert_eq!(table.rows[1][column(&table, "Units Sold")], "1,200");
    assert_eq!(table.rows[1][column(&table, "Total Sales")], "$48,000");
    assert_eq!(table.rows[4][column(&table, "Units Sold")], "");
    println!("✓ Source parsed with all 11 columns and quoted numbers intact");
}

#[test]
fn test_normalize_rewrites_dates_without_padding() {
    let mut table = cleaning::read_source(SAMPLE_CSV.as_bytes()).unwrap();
    let original = table.clone();
    let report = cleaning::normalize_invoice_dates(&mut table).unwrap();

    assert_eq!(report.rows, 5);
    assert_eq!(report.parsed, 4);
    assert_eq!(report.coerced, 1);

    let date_col = column(&table, INVOICE_DATE);
    let dates: Vec<&str> = table.rows.iter().map(|r| r[date_col].as_str()).collect();
    assert_eq!(dates, vec!["5-3-2021", "12-1-2020", "", "17-3-2021", "1-1-2020"]);
    println!("✓ Dates rewritten as day-month-year without zero padding");

    // Every other field is untouched, including the row with the bad date
    for (before, after) in original.rows.iter().zip(table.rows.iter()) {
        for c in 0..before.len() {
            if c != date_col {
                assert_eq!(before[c], after[c]);
            }
        }
    }
    println!("✓ Non-date fields unchanged, invalid-date row retained");
}

#[test]
fn test_normalized_dates_parse_to_same_day() {
    let mut table = cleaning::read_source(SAMPLE_CSV.as_bytes()).unwrap();
    let original = table.clone();
    cleaning::normalize_invoice_dates(&mut table).unwrap();

    let date_col = column(&table, INVOICE_DATE);
    for (before, after) in original.rows.iter().zip(table.rows.iter()) {
        match parse_day_month_year(&before[date_col]) {
            Some(date) => assert_eq!(parse_day_month_year(&after[date_col]), Some(date)),
            None => assert!(after[date_col].is_empty()),
        }
    }
    println!("✓ Normalized dates re-parse to the original calendar dates");
}

#[test]
fn test_missing_date_column_is_fatal() {
    let mut table = cleaning::read_source("Retailer,Total Sales\nFootLocker,10\n".as_bytes()).unwrap();
    let err = cleaning::normalize_invoice_dates(&mut table).unwrap_err();
    assert!(matches!(err, DashboardError::MissingColumn { ref column } if column == INVOICE_DATE));
    println!("✓ Missing Invoice Date column reported: {}", err);
}

#[test]
fn test_missing_source_is_fatal_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xlsx");

    let err = cleaning::clean_sales_file(dir.path().join("absent.csv"), &output).unwrap_err();
    assert!(matches!(err, DashboardError::Io(_)));
    assert!(!output.exists());

    let source = dir.path().join("no_dates.csv");
    std::fs::write(&source, "Retailer,Total Sales\nFootLocker,10\n").unwrap();
    let err = cleaning::clean_sales_file(&source, &output).unwrap_err();
    assert!(matches!(err, DashboardError::MissingColumn { .. }));
    assert!(!output.exists());
    println!("✓ No workbook written when the run fails");
}

#[test]
fn test_workbook_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = write_sample_workbook(dir.path());
    assert!(workbook.exists());

    let table = loader::load_workbook(&workbook).unwrap();
    assert_eq!(table.headers[0], "Retailer");
    assert_eq!(table.headers.len(), 11);
    assert_eq!(table.rows.len(), 5);

    let date_col = table.column_index(INVOICE_DATE).unwrap();
    assert_eq!(table.cell(0, date_col), &CellValue::Text("5-3-2021".to_string()));
    assert_eq!(table.cell(2, date_col), &CellValue::Empty);
    println!("✓ Workbook holds normalized dates and a blank null date");

    let units_col = table.column_index("Units Sold").unwrap();
    assert_eq!(table.cell(0, units_col), &CellValue::Integer(10));
    assert_eq!(table.cell(1, units_col), &CellValue::Text("1,200".to_string()));
    assert_eq!(table.cell(4, units_col), &CellValue::Empty);

    let sales_col = table.column_index("Total Sales").unwrap();
    assert_eq!(table.cell(0, sales_col), &CellValue::Number(500.0));
    assert_eq!(table.cell(4, sales_col), &CellValue::Number(350.5));
    println!("✓ Bare numbers stored as numbers, formatted numbers kept as text");
}

#[test]
fn test_clean_overwrites_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_sample_csv(dir.path());
    let output = dir.path().join("sales.xlsx");
    std::fs::write(&output, b"stale").unwrap();

    let report = cleaning::clean_sales_file(&source, &output).unwrap();
    assert_eq!(report.rows, 5);
    assert!(loader::load_workbook(&output).is_ok());
    println!("✓ Existing output replaced");
}
