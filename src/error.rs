use thiserror::Error;

/// Errors raised while cleaning, loading or presenting the sales data
///
/// Malformed dates and unparseable numbers are not errors: they are coerced
/// to empty values where they are read. Everything listed here aborts the
/// current run or request.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Source or workbook file could not be opened, read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited source could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Normalized workbook could not be written
    #[error("workbook write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Normalized workbook could not be read
    #[error("workbook read error: {0}")]
    Workbook(#[from] calamine::Error),

    /// A column the pipeline depends on is absent from the header row
    #[error("missing expected column: {column}")]
    MissingColumn { column: String },

    /// Workbook has no sheet, or its first sheet has no header row
    #[error("workbook is empty: {0}")]
    EmptyWorkbook(String),

    /// File extension the loader does not know how to read
    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),

    /// Chart drawing failed
    #[error("chart error: {0}")]
    Chart(String),

    #[cfg(feature = "web")]
    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[cfg(feature = "web")]
    #[error("template syntax error: {0}")]
    TemplateSyntax(#[from] handlebars::TemplateError),

    /// Blocking load or render task panicked or was cancelled
    #[cfg(feature = "web")]
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl DashboardError {
    pub fn missing_column(column: &str) -> Self {
        DashboardError::MissingColumn {
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
