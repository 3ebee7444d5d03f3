#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::aggregate::{AggregateView, Dashboard};
use crate::config::Config;
use crate::downloader::{CSV_MIME, Export};
use crate::error::{DashboardError, Result};
use crate::graph;
use crate::loader;
use crate::record::CellValue;

const DASHBOARD_TEMPLATE: &str = "dashboard";

pub struct AppState {
    workbook: PathBuf,
    title: String,
    templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let mut templates = Handlebars::new();
        templates.register_template_string(DASHBOARD_TEMPLATE, include_str!("./static/dashboard.hbs"))?;

        Ok(AppState {
            workbook: config.workbook.clone(),
            title: config.title.clone(),
            templates,
        })
    }

    /// Reload the workbook and recompute every view
    fn dashboard(&self) -> Result<Dashboard> {
        let table = loader::load_table(&self.workbook)?;
        Dashboard::build(&table)
    }
}

/// Run workbook loading and rendering off the async workers
async fn blocking<T, F>(state: &Arc<AppState>, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> Result<T> + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || work(&state)).await?
}

#[derive(Serialize)]
struct TableSection {
    title: String,
    chart: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    download_name: &'static str,
    download_href: String,
}

#[derive(Serialize)]
struct PageContext {
    title: String,
    updated: String,
    sections: Vec<TableSection>,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        log::error!("request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_dashboard))
        .route("/download/:file_name", get(download))
        .route("/api/views", get(get_views))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let app_state = Arc::new(AppState::new(&config)?);
    let app = router(app_state);

    let listener = TcpListener::bind(&config.addr).await?;
    log::info!(
        "serving {} on http://{}",
        config.workbook.display(),
        config.addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}

fn download_href(export: Export) -> String {
    format!("/download/{}", urlencoding::encode(export.file_name()))
}

fn text_rows(rows: Vec<Vec<CellValue>>) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn view_section(view: &AggregateView, chart: String, export: Export) -> TableSection {
    TableSection {
        title: view.title.clone(),
        chart: Some(chart),
        headers: view.headers(),
        rows: text_rows(view.table_rows()),
        download_name: export.file_name(),
        download_href: download_href(export),
    }
}

fn render_page(state: &AppState) -> Result<String> {
    let dashboard = state.dashboard()?;
    let charts = graph::dashboard_charts(&dashboard)?;

    let sections = vec![
        view_section(&dashboard.by_retailer, charts.by_retailer, Export::RetailerSales),
        view_section(&dashboard.monthly, charts.monthly, Export::MonthlySales),
        view_section(&dashboard.by_state, charts.by_state, Export::UnitsByState),
        view_section(&dashboard.by_region, charts.by_region, Export::SalesByRegion),
        TableSection {
            title: "Sales Raw Data".to_string(),
            chart: None,
            headers: dashboard.raw.headers.clone(),
            rows: text_rows(dashboard.raw.rows),
            download_name: Export::RawData.file_name(),
            download_href: download_href(Export::RawData),
        },
    ];

    let context = PageContext {
        title: state.title.clone(),
        updated: chrono::Local::now().format("%d %B %Y").to_string(),
        sections,
    };

    Ok(state.templates.render(DASHBOARD_TEMPLATE, &context)?)
}

async fn serve_dashboard(State(state): State<Arc<AppState>>) -> Response {
    match blocking(&state, render_page).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn download(
    Path(file_name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(export) = Export::from_file_name(&file_name) else {
        return (StatusCode::NOT_FOUND, format!("no download named {}", file_name)).into_response();
    };

    let rendered = blocking(&state, move |state| {
        state.dashboard().and_then(|dashboard| export.render(&dashboard))
    })
    .await;
    let csv = match rendered {
        Ok(csv) => csv,
        Err(e) => return e.into_response(),
    };

    let headers = [
        (header::CONTENT_TYPE, format!("{}; charset=utf-8", CSV_MIME)),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name()),
        ),
    ];
    (headers, csv).into_response()
}

async fn get_views(State(state): State<Arc<AppState>>) -> Response {
    match blocking(&state, AppState::dashboard).await {
        Ok(dashboard) => Json(serde_json::json!({
            "by_retailer": dashboard.by_retailer,
            "monthly": dashboard.monthly,
            "by_state": dashboard.by_state,
            "by_region": dashboard.by_region,
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}
