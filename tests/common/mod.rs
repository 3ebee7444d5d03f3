#![allow(dead_code)]

use sales_dashboard::{CellValue, SalesTable};
use sales_dashboard::cleaning;
use sales_dashboard::loader::text_to_cell;
use std::path::{Path, PathBuf};

/// Five invoices: one invalid date (31-02), one missing unit count, and
/// numbers written the way sales exports write them.
pub const SAMPLE_CSV: &str = "\
Retailer,Retailer ID,Invoice Date,Region,State,City,Product,Price per Unit,Units Sold,Total Sales,Sales Method
FootLocker,1185732,05-03-2021,West,CA,Los Angeles,Men's Street Footwear,$50.00,10,500.0,In-store
Walmart,1128299,12-01-2020,Southeast,FL,Orlando,Women's Apparel,$40.00,\"1,200\",\"$48,000\",Online
FootLocker,1185732,31-02-2021,Northeast,NY,New York,Men's Apparel,$45.00,20,900.0,Outlet
Amazon,1185732,17-03-2021,West,CA,San Francisco,Women's Street Footwear,$30.00,5,150.0,Online
Walmart,1128299,01-01-2020,West,WA,Seattle,Men's Athletic Footwear,$35.00,,350.5,Online
";

pub const SAMPLE_TOTAL_SALES: f64 = 49900.5;
pub const SAMPLE_UNITS_SOLD: i64 = 1235;

/// The sample as the dashboard sees it when loaded straight from CSV
pub fn sample_table() -> SalesTable {
    let raw = cleaning::read_source(SAMPLE_CSV.as_bytes()).unwrap();
    let rows: Vec<Vec<CellValue>> = raw
        .rows
        .into_iter()
        .map(|row| row.into_iter().map(text_to_cell).collect())
        .collect();
    SalesTable::new(raw.headers, rows)
}

pub fn write_sample_csv(dir: &Path) -> PathBuf {
    let path = dir.join("sales.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();
    path
}

/// Run the cleaning step on the sample and return the workbook path
pub fn write_sample_workbook(dir: &Path) -> PathBuf {
    let source = write_sample_csv(dir);
    let output = dir.join("sales.xlsx");
    cleaning::clean_sales_file(&source, &output).unwrap();
    output
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
