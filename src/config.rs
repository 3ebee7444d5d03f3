use std::path::PathBuf;

pub const DEFAULT_SOURCE: &str = "Nike.csv";
pub const DEFAULT_WORKBOOK: &str = "Nike.xlsx";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_TITLE: &str = "Nike Interactive Sales Dashboard (2020-2021)";

/// Paths and server settings shared by the two binaries
///
/// Both binaries take optional positional arguments and fall back to
/// these defaults for anything not given.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Delimited source read by the cleaning step
    pub source: PathBuf,

    /// Workbook written by the cleaning step and read by the dashboard
    pub workbook: PathBuf,

    /// Address the dashboard listens on
    pub addr: String,

    /// Page heading of the dashboard
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: PathBuf::from(DEFAULT_SOURCE),
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            addr: DEFAULT_ADDR.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Config {
    /// `clean_data [source.csv] [output.xlsx]`
    pub fn for_cleaning(args: &[String]) -> Self {
        let mut config = Config::default();
        if let Some(source) = args.get(1) {
            config.source = PathBuf::from(source);
        }
        if let Some(workbook) = args.get(2) {
            config.workbook = PathBuf::from(workbook);
        }
        config
    }

    /// `dashboard [workbook.xlsx] [bind-address]`
    pub fn for_dashboard(args: &[String]) -> Self {
        let mut config = Config::default();
        if let Some(workbook) = args.get(1) {
            config.workbook = PathBuf::from(workbook);
        }
        if let Some(addr) = args.get(2) {
            config.addr = addr.clone();
        }
        config
    }
}
