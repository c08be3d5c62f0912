use std::path::PathBuf;

use thiserror::Error;

/// A dialect document that cannot be used for conversion.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid dialect JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read dialect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{feature}[{index}] has an empty tag")]
    EmptyTag { feature: &'static str, index: usize },

    #[error("headings[{index}] uses a whitespace character as its tag")]
    WhitespaceHeadingTag { index: usize },
}
