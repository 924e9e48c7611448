//! Run-level analysis errors.

/// Errors that abort an analysis run. Per-file parse failures never surface
/// here; they are skipped at ingestion.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("failed to read analysis root {path}: {source}")]
    RootUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("analysis cancelled")]
    Cancelled,
}
