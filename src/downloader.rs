use crate::aggregate::{AggregateView, Dashboard};
use crate::error::Result;
use crate::record::{CellValue, SalesTable};

pub const CSV_MIME: &str = "text/csv";

/// The five downloadable tables of the dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Export {
    RetailerSales,
    MonthlySales,
    UnitsByState,
    SalesByRegion,
    RawData,
}

impl Export {
    pub const ALL: [Export; 5] = [
        Export::RetailerSales,
        Export::MonthlySales,
        Export::UnitsByState,
        Export::SalesByRegion,
        Export::RawData,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Export::RetailerSales => "RetailerSales.csv",
            Export::MonthlySales => "Monthly Sales.csv",
            Export::UnitsByState => "Sales_by_units_Sold.csv",
            Export::SalesByRegion => "Sales by Region.csv",
            Export::RawData => "SalesRawData.csv",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Export> {
        Export::ALL.into_iter().find(|e| e.file_name() == name)
    }

    /// Render this export from an already built dashboard
    pub fn render(&self, dashboard: &Dashboard) -> Result<String> {
        match self {
            Export::RetailerSales => view_to_csv(&dashboard.by_retailer),
            Export::MonthlySales => view_to_csv(&dashboard.monthly),
            Export::UnitsByState => view_to_csv(&dashboard.by_state),
            Export::SalesByRegion => view_to_csv(&dashboard.by_region),
            Export::RawData => raw_table_to_csv(&dashboard.raw),
        }
    }
}

/// Convert an aggregate view to CSV text
///
/// The header row names the key columns followed by the summed columns.
/// Key columns always lead, whether or not the view is indexed by its key,
/// and no positional row-number column is written.
///
/// # Examples
/// ```
/// use sales_dashboard::aggregate::sales_by_retailer;
/// use sales_dashboard::downloader::view_to_csv;
///
/// let view = sales_by_retailer(&[]);
/// assert_eq!(view_to_csv(&view).unwrap(), "Retailer,Total Sales\n");
/// ```
pub fn view_to_csv(view: &AggregateView) -> Result<String> {
    write_csv(&view.headers(), &view.table_rows())
}

/// Convert the raw table (with `Month_Year`) to CSV text
pub fn raw_table_to_csv(table: &SalesTable) -> Result<String> {
    write_csv(&table.headers, &table.rows)
}

fn write_csv(headers: &[String], rows: &[Vec<CellValue>]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.utf8_error()).into()
    })
}
