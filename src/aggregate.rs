use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Result;
use crate::record::{
    CellValue, MONTH_YEAR, REGION, RETAILER, STATE, SalesRecord, SalesTable, TOTAL_SALES,
    UNITS_SOLD,
};

/// Summed columns a view can carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Measure {
    UnitsSold,
    TotalSales,
}

impl Measure {
    pub fn column_name(&self) -> &'static str {
        match self {
            Measure::UnitsSold => UNITS_SOLD,
            Measure::TotalSales => TOTAL_SALES,
        }
    }
}

/// Running sums for one group
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Totals {
    pub units_sold: i64,
    pub total_sales: f64,
}

impl Totals {
    /// Add one record; missing values contribute nothing
    ///
    /// Unit counts saturate at the `i64` bounds instead of overflowing.
    pub fn add(&mut self, record: &SalesRecord) {
        self.units_sold = self
            .units_sold
            .saturating_add(record.units_sold.unwrap_or(0));
        self.total_sales += record.total_sales.unwrap_or(0.0);
    }

    pub fn value(&self, measure: Measure) -> CellValue {
        match measure {
            Measure::UnitsSold => CellValue::Integer(self.units_sold),
            Measure::TotalSales => CellValue::Number(self.total_sales),
        }
    }
}

/// One row of an aggregate view
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: Vec<String>,
    pub totals: Totals,
}

/// A grouped summary of the sales records
///
/// `key_columns` name the grouping key parts, `measures` the summed columns
/// shown for each group. Rows are in encounter order. `keyed_index` marks
/// views whose key is their index (retailer, region/retailer) rather than
/// ordinary columns (month, state). It is carried in the JSON views; the CSV
/// layout is the same for both kinds, key columns first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateView {
    pub title: String,
    pub key_columns: Vec<&'static str>,
    pub measures: Vec<Measure>,
    pub keyed_index: bool,
    pub rows: Vec<AggregateRow>,
}

impl AggregateView {
    pub fn headers(&self) -> Vec<String> {
        self.key_columns
            .iter()
            .map(|c| c.to_string())
            .chain(self.measures.iter().map(|m| m.column_name().to_string()))
            .collect()
    }

    /// Flattened cell rows: key parts then measures
    pub fn table_rows(&self) -> Vec<Vec<CellValue>> {
        self.rows
            .iter()
            .map(|row| {
                row.key
                    .iter()
                    .cloned()
                    .map(CellValue::Text)
                    .chain(self.measures.iter().map(|m| row.totals.value(*m)))
                    .collect()
            })
            .collect()
    }

    pub fn total(&self, measure: Measure) -> f64 {
        self.rows
            .iter()
            .map(|row| match measure {
                Measure::UnitsSold => row.totals.units_sold as f64,
                Measure::TotalSales => row.totals.total_sales,
            })
            .sum()
    }

    pub fn get(&self, key: &[&str]) -> Option<&Totals> {
        self.rows
            .iter()
            .find(|row| row.key.iter().map(String::as_str).eq(key.iter().copied()))
            .map(|row| &row.totals)
    }
}

/// Stable group-by: groups come out in the order their key first appears
///
/// Records whose key is `None` are left out of the result.
pub fn group_by<K, F>(records: &[SalesRecord], key_fn: F) -> Vec<(K, Totals)>
where
    K: Eq + Hash + Clone,
    F: Fn(&SalesRecord) -> Option<K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Totals)> = Vec::new();

    for record in records {
        let Some(key) = key_fn(record) else {
            continue;
        };
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Totals::default()));
            groups.len() - 1
        });
        groups[slot].1.add(record);
    }

    groups
}

fn single_key_view(
    records: &[SalesRecord],
    title: &str,
    key_column: &'static str,
    measures: Vec<Measure>,
    keyed_index: bool,
    key_fn: impl Fn(&SalesRecord) -> Option<String>,
) -> AggregateView {
    let rows = group_by(records, key_fn)
        .into_iter()
        .map(|(key, totals)| AggregateRow {
            key: vec![key],
            totals,
        })
        .collect();

    AggregateView {
        title: title.to_string(),
        key_columns: vec![key_column],
        measures,
        keyed_index,
        rows,
    }
}

/// Retailer → sum(Total Sales)
pub fn sales_by_retailer(records: &[SalesRecord]) -> AggregateView {
    single_key_view(
        records,
        "Sales per Retailer",
        RETAILER,
        vec![Measure::TotalSales],
        true,
        |r| r.retailer.clone(),
    )
}

/// Month_Year → sum(Total Sales); rows without a date are skipped
pub fn monthly_sales(records: &[SalesRecord]) -> AggregateView {
    single_key_view(
        records,
        "Monthly Sales",
        MONTH_YEAR,
        vec![Measure::TotalSales],
        false,
        SalesRecord::month_year,
    )
}

/// State → sum(Units Sold), sum(Total Sales)
pub fn sales_by_state(records: &[SalesRecord]) -> AggregateView {
    single_key_view(
        records,
        "Sales by Units Sold",
        STATE,
        vec![Measure::UnitsSold, Measure::TotalSales],
        false,
        |r| r.state.clone(),
    )
}

/// (Region, Retailer) → sum(Total Sales)
pub fn sales_by_region(records: &[SalesRecord]) -> AggregateView {
    let rows = group_by(records, |r| Some((r.region.clone()?, r.retailer.clone()?)))
        .into_iter()
        .map(|((region, retailer), totals)| AggregateRow {
            key: vec![region, retailer],
            totals,
        })
        .collect();

    AggregateView {
        title: "Total Sales by Region and Retailer".to_string(),
        key_columns: vec![REGION, RETAILER],
        measures: vec![Measure::TotalSales],
        keyed_index: true,
        rows,
    }
}

/// Everything one dashboard render needs, computed from a single table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub by_retailer: AggregateView,
    pub monthly: AggregateView,
    pub by_state: AggregateView,
    pub by_region: AggregateView,
    #[serde(skip)]
    pub raw: SalesTable,
}

impl Dashboard {
    pub fn build(table: &SalesTable) -> Result<Self> {
        let records = table.records()?;
        let raw = table.with_month_year()?;

        log::debug!("aggregating {} sales records", records.len());

        Ok(Dashboard {
            by_retailer: sales_by_retailer(&records),
            monthly: monthly_sales(&records),
            by_state: sales_by_state(&records),
            by_region: sales_by_region(&records),
            raw,
        })
    }
}
