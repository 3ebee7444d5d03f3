#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]
use crate::aggregate::{AggregateView, Measure};
use crate::error::{DashboardError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Configuration options for chart generation
#[derive(Clone, Debug)]
pub struct GraphOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            width: 800,
            height: 500,
        }
    }
}

fn chart_error<E: std::fmt::Display>(e: E) -> DashboardError {
    DashboardError::Chart(e.to_string())
}

/// Category labels of a view: key parts joined with `/`
fn labels(view: &AggregateView) -> Vec<String> {
    view.rows.iter().map(|row| row.key.join(" / ")).collect()
}

fn values(view: &AggregateView, measure: Measure) -> Vec<f64> {
    view.rows
        .iter()
        .map(|row| match measure {
            Measure::UnitsSold => row.totals.units_sold as f64,
            Measure::TotalSales => row.totals.total_sales,
        })
        .collect()
}

/// Axis range from zero to a little above the largest value
fn value_range(values: &[f64]) -> std::ops::Range<f64> {
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    let min = values.iter().cloned().fold(0.0_f64, f64::min);
    if max == min {
        min..min + 1.0
    } else {
        min..max * 1.1
    }
}

/// Bar chart of one measure per group, e.g. total sales by retailer
///
/// # Returns
/// * SVG document as a string
pub fn bar_chart(view: &AggregateView, measure: Measure, options: &GraphOptions) -> Result<String> {
    let labels = labels(view);
    let data = values(view, measure);
    let n = data.len().max(1);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), value_range(&data))
            .map_err(chart_error)?;

        let formatter = |v: &SegmentValue<usize>| segment_label(&labels, v);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&formatter)
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(data.iter().enumerate().map(|(i, &y)| {
                Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), y)],
                    BLUE.mix(0.8).filled(),
                )
            }))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

/// Line chart of one measure over the groups in encounter order
pub fn line_chart(view: &AggregateView, measure: Measure, options: &GraphOptions) -> Result<String> {
    let labels = labels(view);
    let data = values(view, measure);
    let n = data.len().max(1);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), value_range(&data))
            .map_err(chart_error)?;

        let formatter = |v: &SegmentValue<usize>| segment_label(&labels, v);
        chart
            .configure_mesh()
            .x_labels(n)
            .x_label_formatter(&formatter)
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(LineSeries::new(
                data.iter()
                    .enumerate()
                    .map(|(i, &y)| (SegmentValue::CenterOf(i), y)),
                &BLUE,
            ))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

/// Bars for total sales with units sold as a line on a secondary axis
pub fn dual_axis_chart(view: &AggregateView, options: &GraphOptions) -> Result<String> {
    let labels = labels(view);
    let sales = values(view, Measure::TotalSales);
    let units = values(view, Measure::UnitsSold);
    let n = sales.len().max(1);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .right_y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), value_range(&sales))
            .map_err(chart_error)?
            .set_secondary_coord((0..n).into_segmented(), value_range(&units));

        let formatter = |v: &SegmentValue<usize>| segment_label(&labels, v);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&formatter)
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()
            .map_err(chart_error)?;

        chart
            .configure_secondary_axes()
            .y_desc(Measure::UnitsSold.column_name())
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(sales.iter().enumerate().map(|(i, &y)| {
                Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), y)],
                    BLUE.mix(0.7).filled(),
                )
            }))
            .map_err(chart_error)?
            .label(Measure::TotalSales.column_name())
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLUE.filled()));

        chart
            .draw_secondary_series(LineSeries::new(
                units
                    .iter()
                    .enumerate()
                    .map(|(i, &y)| (SegmentValue::CenterOf(i), y)),
                &RED,
            ))
            .map_err(chart_error)?
            .label(Measure::UnitsSold.column_name())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &RED));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

fn segment_label(labels: &[String], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

/// One rectangle of the region/retailer treemap, in pixels
#[derive(Clone, Debug, PartialEq)]
pub struct TreemapTile {
    pub region: String,
    pub retailer: String,
    pub value: f64,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Hover-style label for the treemap: thousands with two decimals
///
/// Negative totals have no label.
pub fn format_grand(value: f64) -> Option<String> {
    if value >= 0.0 {
        Some(format!("{:.2} grand", value / 1000.0))
    } else {
        None
    }
}

/// Slice-and-dice layout of a (Region, Retailer) view
///
/// Regions split the width in proportion to their totals, in encounter
/// order; retailers then split their region's height the same way.
/// Groups with a non-positive total take no space.
pub fn treemap_layout(view: &AggregateView, width: f64, height: f64) -> Vec<TreemapTile> {
    let mut regions: Vec<(String, Vec<(String, f64)>)> = Vec::new();
    for row in &view.rows {
        let (Some(region), Some(retailer)) = (row.key.first(), row.key.get(1)) else {
            continue;
        };
        let value = row.totals.total_sales;
        if value <= 0.0 {
            continue;
        }
        match regions.iter_mut().find(|(name, _)| name == region) {
            Some((_, retailers)) => retailers.push((retailer.clone(), value)),
            None => regions.push((region.clone(), vec![(retailer.clone(), value)])),
        }
    }

    let grand_total: f64 = regions
        .iter()
        .flat_map(|(_, retailers)| retailers.iter().map(|(_, v)| v))
        .sum();
    if grand_total <= 0.0 {
        return Vec::new();
    }

    let mut tiles = Vec::new();
    let mut x = 0.0;
    for (region, retailers) in regions {
        let region_total: f64 = retailers.iter().map(|(_, v)| v).sum();
        let region_width = width * region_total / grand_total;
        let mut y = 0.0;
        for (retailer, value) in retailers {
            let tile_height = height * value / region_total;
            tiles.push(TreemapTile {
                region: region.clone(),
                retailer,
                value,
                x0: x,
                y0: y,
                x1: x + region_width,
                y1: y + tile_height,
            });
            y += tile_height;
        }
        x += region_width;
    }

    tiles
}

/// Treemap of total sales by region and retailer, colored per retailer
pub fn treemap_chart(view: &AggregateView, options: &GraphOptions) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;
        let area = root
            .titled(&options.title, ("sans-serif", 24))
            .map_err(chart_error)?;

        let (w, h) = area.dim_in_pixel();
        let tiles = treemap_layout(view, w as f64, h as f64);
        draw_tiles(&area, &tiles)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

fn draw_tiles(area: &DrawingArea<SVGBackend<'_>, Shift>, tiles: &[TreemapTile]) -> Result<()> {
    let mut retailers: Vec<&str> = Vec::new();

    for tile in tiles {
        let color_index = match retailers.iter().position(|r| *r == tile.retailer) {
            Some(i) => i,
            None => {
                retailers.push(&tile.retailer);
                retailers.len() - 1
            }
        };
        let (x0, y0) = (tile.x0.round() as i32, tile.y0.round() as i32);
        let (x1, y1) = (tile.x1.round() as i32, tile.y1.round() as i32);

        area.draw(&Rectangle::new(
            [(x0, y0), (x1, y1)],
            Palette99::pick(color_index).mix(0.8).filled(),
        ))
        .map_err(chart_error)?;
        area.draw(&Rectangle::new([(x0, y0), (x1, y1)], WHITE.stroke_width(2)))
            .map_err(chart_error)?;

        // Labels only where there is room for them
        if x1 - x0 > 60 && y1 - y0 > 50 {
            let style = ("sans-serif", 13).into_font().color(&BLACK);
            let lines = [
                format!("{} / {}", tile.region, tile.retailer),
                format!("{:.0}", tile.value),
                format_grand(tile.value).unwrap_or_default(),
            ];
            for (i, line) in lines.iter().enumerate() {
                area.draw(&Text::new(line.clone(), (x0 + 6, y0 + 6 + 16 * i as i32), style.clone()))
                    .map_err(chart_error)?;
            }
        }
    }

    Ok(())
}

/// The four dashboard charts as SVG documents
#[derive(Clone, Debug)]
pub struct DashboardCharts {
    pub by_retailer: String,
    pub monthly: String,
    pub by_state: String,
    pub by_region: String,
}

pub fn dashboard_charts(dashboard: &crate::aggregate::Dashboard) -> Result<DashboardCharts> {
    let by_retailer = bar_chart(
        &dashboard.by_retailer,
        Measure::TotalSales,
        &GraphOptions {
            title: "Total Sales by Retailer".to_string(),
            x_label: "Retailer".to_string(),
            y_label: "Total Sales {$}".to_string(),
            ..Default::default()
        },
    )?;

    let monthly = line_chart(
        &dashboard.monthly,
        Measure::TotalSales,
        &GraphOptions {
            title: "Total Sales Over Time".to_string(),
            x_label: "Month_Year".to_string(),
            y_label: "Total Sales".to_string(),
            ..Default::default()
        },
    )?;

    let by_state = dual_axis_chart(
        &dashboard.by_state,
        &GraphOptions {
            title: "Total units and total sales sold by state".to_string(),
            x_label: "state".to_string(),
            y_label: "Total Sales".to_string(),
            width: 1200,
            height: 500,
        },
    )?;

    let by_region = treemap_chart(
        &dashboard.by_region,
        &GraphOptions {
            title: "Total Sales By Region Treemap".to_string(),
            width: 1000,
            height: 700,
            ..Default::default()
        },
    )?;

    Ok(DashboardCharts {
        by_retailer,
        monthly,
        by_state,
        by_region,
    })
}
