//! Crate-wide error type.

use thiserror::Error;

/// Everything that can go wrong while resolving palettes, loading data, or rendering.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid color rule pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("cannot parse {value:?} in column {column:?} (row {row})")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("dataset has no series")]
    EmptyDataset,

    #[error("no finite values to summarize: {0}")]
    Degenerate(String),

    #[error("palette has {found} colors but the dataset has {expected} series")]
    PaletteMismatch { expected: usize, found: usize },

    #[error("no palette color for series {0:?}")]
    MissingColor(String),

    #[error("not a color specifier: {0:?}")]
    InvalidColor(String),

    #[error("series column has {series} rows but value column has {values}")]
    LengthMismatch { series: usize, values: usize },

    #[error("series {0:?} is not one of the declared category levels")]
    UnknownLevel(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error("PDF export failed: {0}")]
    Pdf(String),

    #[error("plot style was already initialized")]
    StyleAlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a plotters drawing error, keeping its debug text.
    pub(crate) fn render<E: std::fmt::Debug>(e: E) -> Self {
        Error::Render(format!("{:?}", e))
    }

    pub(crate) fn pdf<E: std::fmt::Debug>(e: E) -> Self {
        Error::Pdf(format!("{:?}", e))
    }
}
