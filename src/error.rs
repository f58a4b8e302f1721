use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised outside the extraction core: loading the page and the schema.
///
/// Extraction itself never fails; missing tables, rows, and unparsable cells
/// all surface as absent values.
#[derive(Debug, Error)]
pub enum SurfboardError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("schema has no table named '{0}'")]
    UnknownTable(String),
}

pub type Result<T> = std::result::Result<T, SurfboardError>;
