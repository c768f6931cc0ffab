use thiserror::Error;

/// Failures that abort a whole scan cycle.
///
/// Per-message problems (a failed fetch, a garbled header, an unparsable
/// date) never show up here; the scanner absorbs them and moves on to the
/// next candidate.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Transport, TLS, or login failure. No partial session survives this.
    #[error("connection failed: {0:#}")]
    Connection(anyhow::Error),

    /// The server rejected the unseen-message search.
    #[error("unseen search failed: {0:#}")]
    Search(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
