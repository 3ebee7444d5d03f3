/*!
# Sales Dashboard

A browser-based dashboard over a static sales dataset, built in Rust.

## Overview

The dataset is a table of sales invoices: retailer, region, state, invoice
date, units sold and total sales, plus whatever other columns the export
carries. A one-off cleaning step turns the delimited source into a workbook
with normalized dates; the dashboard reads that workbook on every page load
and presents four grouped summaries next to the raw table, each with a chart
and a CSV download.

## Architecture

### Ingestion
- **cleaning**: reads the CSV source, rewrites `Invoice Date` from
  `05-03-2021` to `5-3-2021` (invalid dates become empty), writes `.xlsx`

### Aggregation
- **loader**: reads the first sheet of the workbook into a [`SalesTable`]
- **record**: typed cells, the [`SalesRecord`] projection, numeric cleanup
- **aggregate**: stable group-by and the four views
  - Retailer → Total Sales
  - Month_Year → Total Sales
  - State → Units Sold, Total Sales
  - Region, Retailer → Total Sales

### Presentation (feature `web`)
- **graph**: bar, line, dual-axis and treemap charts rendered to SVG
- **downloader**: CSV exports (`RetailerSales.csv`, `Monthly Sales.csv`,
  `Sales_by_units_Sold.csv`, `Sales by Region.csv`, `SalesRawData.csv`)
- **app**: routing and page rendering

## Error Handling

Malformed dates and unreadable numbers are tolerated: dates become null and
numbers count as zero in every sum. A missing file or a missing expected
column aborts the run with a [`DashboardError`].

## REST API Endpoints

- `/` - Dashboard page
- `/download/{file_name}` - One of the five CSV exports
- `/api/views` - The four aggregate views as JSON
*/

pub mod aggregate;
#[cfg(feature = "web")]
pub mod app;
pub mod cleaning;
pub mod config;
pub mod dates;
pub mod downloader;
pub mod error;
#[cfg(feature = "web")]
pub mod graph;
pub mod loader;
pub mod record;

pub use aggregate::{AggregateView, Dashboard, Measure, Totals};
pub use config::Config;
pub use error::{DashboardError, Result};
pub use record::{CellValue, SalesRecord, SalesTable};
