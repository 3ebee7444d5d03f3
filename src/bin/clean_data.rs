#![cfg(not(tarpaulin_include))]

use sales_dashboard::Config;
use sales_dashboard::cleaning;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 3 {
        eprintln!("Usage: {} [source.csv] [output.xlsx]", args[0]);
        std::process::exit(2);
    }
    let config = Config::for_cleaning(&args);

    let report = cleaning::clean_sales_file(&config.source, &config.workbook)?;
    println!(
        "Converted {} rows ({} dates reformatted, {} cleared) to {}",
        report.rows,
        report.parsed,
        report.coerced,
        config.workbook.display()
    );

    Ok(())
}
