/// Error types shared across the advisor crates.
///
/// These errors represent failures in infrastructure components (dataset files, CSV decoding)
/// that sit below the application logic. Application-specific errors should be defined
/// in the server crate and wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),
}
