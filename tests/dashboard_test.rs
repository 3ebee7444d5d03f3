#![cfg(feature = "web")]

mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::write_sample_workbook;
use sales_dashboard::Config;
use sales_dashboard::app::{AppState, router};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

fn app_for(workbook: &Path) -> Router {
    let config = Config {
        workbook: workbook.to_path_buf(),
        ..Config::default()
    };
    router(Arc::new(AppState::new(&config).unwrap()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_dashboard_page() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&write_sample_workbook(dir.path()));

    let (status, content_type, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(body.contains("Nike Interactive Sales Dashboard (2020-2021)"));
    assert_eq!(body.matches("<svg").count(), 4);
    assert!(body.contains("Total Sales by Retailer"));
    assert!(body.contains("FootLocker"));
    println!("✓ Page renders four charts and the view tables");

    for href in [
        "/download/RetailerSales.csv",
        "/download/Monthly%20Sales.csv",
        "/download/Sales_by_units_Sold.csv",
        "/download/Sales%20by%20Region.csv",
        "/download/SalesRawData.csv",
    ] {
        assert!(body.contains(href), "missing link {}", href);
    }
    println!("✓ Page links all five downloads");
}

#[tokio::test]
async fn test_download_serves_csv() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&write_sample_workbook(dir.path()));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/download/Monthly%20Sales.csv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Monthly Sales.csv\""
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        String::from_utf8(body.to_vec()).unwrap(),
        "Month_Year,Total Sales\nMar'21,650.0\nJan'20,48350.5\n"
    );
    println!("✓ Monthly Sales.csv served as text/csv");

    let (status, _, body) = get(app, "/download/RetailerSales.csv").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("Retailer,Total Sales\nFootLocker,1400.0\n"));
    println!("✓ RetailerSales.csv served");
}

#[tokio::test]
async fn test_unknown_download_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&write_sample_workbook(dir.path()));

    let (status, _, _) = get(app, "/download/passwords.csv").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    println!("✓ Unknown export name gives 404");
}

#[tokio::test]
async fn test_views_api() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&write_sample_workbook(dir.path()));

    let (status, _, body) = get(app, "/api/views").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["by_retailer"]["rows"][0]["key"][0], "FootLocker");
    assert_eq!(json["by_state"]["rows"][0]["totals"]["units_sold"], 15);
    assert_eq!(json["monthly"]["rows"].as_array().unwrap().len(), 2);
    assert_eq!(json["by_region"]["key_columns"][1], "Retailer");
    println!("✓ /api/views returns the four views");
}

#[tokio::test]
async fn test_missing_workbook_fails_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&dir.path().join("absent.xlsx"));

    let (status, _, body) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("not found"));

    let (status, _, _) = get(app, "/download/RetailerSales.csv").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    println!("✓ Missing workbook reported, no partial output");
}

#[tokio::test(flavor = "current_thread")]
async fn test_concurrent_requests_on_single_thread() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&write_sample_workbook(dir.path()));

    let (page, views, download) = tokio::join!(
        get(app.clone(), "/"),
        get(app.clone(), "/api/views"),
        get(app, "/download/SalesRawData.csv"),
    );
    assert_eq!(page.0, StatusCode::OK);
    assert_eq!(views.0, StatusCode::OK);
    assert_eq!(download.0, StatusCode::OK);
    assert!(download.2.starts_with("Retailer,"));
    println!("✓ Page, views and download served together on one worker");
}
