#![cfg(not(tarpaulin_include))]

use sales_dashboard::Config;
use sales_dashboard::app;
use std::env;

/// Main entry point for the dashboard web server
///
/// # Arguments
/// * `[workbook.xlsx]` - Normalized workbook to serve (default `Nike.xlsx`)
/// * `[bind-address]` - Listen address (default `127.0.0.1:3000`)
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let config = Config::for_dashboard(&args);

    app::run(config).await
}
