//! Error taxonomy for the generation pipeline.
//!
//! Only in-process callers see these values. The opaque [`crate::generate`]
//! facade collapses every variant into `None` so nothing about which stage or
//! which source failed crosses the boundary.

use thiserror::Error;

/// Failure raised anywhere between preset resolution and output encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RngError {
    /// Zero length, undersized destination, overflowing length, or an
    /// inconsistent configuration.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The hash/HMAC primitive or the hardware instruction failed.
    #[error("primitive failure during {0}")]
    PrimitiveFailure(&'static str),

    /// A source produced no data. Absorbed per source by the mixer and only
    /// surfaced when no enabled source contributed anything.
    #[error("entropy source unavailable: {0}")]
    SourceUnavailable(&'static str),
}

impl RngError {
    /// Short stable label, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::PrimitiveFailure(_) => "primitive_failure",
            Self::SourceUnavailable(_) => "source_unavailable",
        }
    }
}

pub type Result<T> = std::result::Result<T, RngError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = RngError::InvalidArgument("output buffer too small");
        assert_eq!(err.to_string(), "invalid argument: output buffer too small");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(RngError::InvalidArgument("x").kind(), "invalid_argument");
        assert_eq!(RngError::PrimitiveFailure("x").kind(), "primitive_failure");
        assert_eq!(RngError::SourceUnavailable("x").kind(), "source_unavailable");
    }
}
