//! The one internal error enum (spec.md §7: "only two externally visible
//! failure modes" — neither of which is a `Result` error; this type exists
//! purely so `initialize`/`update`/`refresh` can log a specific cause via
//! `tracing::warn!` before falling back to the empty-virtual-Source
//! recovery the spec mandates. It is never returned from a query method.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiMapError {
    #[error("failed to load source {filename}: {source}")]
    SourceLoad {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}
