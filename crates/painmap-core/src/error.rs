//! Engine error taxonomy.
//!
//! Only precondition failures are fatal. Ignored input and unknown ids in
//! stored data are recovered locally (clamp, ignore, neutral fallback) and
//! never surface here.

use crate::storage::StorageError;
use thiserror::Error;

/// Errors returned by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A drawing session was mounted without a surface to paint on.
    #[error("Precondition failed: no drawing surface attached at mount")]
    MissingSurface,
    /// The surface reports a size that cannot hold any pixels.
    #[error("Precondition failed: invalid surface size {width}x{height}")]
    InvalidSurfaceSize { width: f64, height: f64 },
    /// A region model was mounted without any pickable body parts.
    #[error("Precondition failed: region registry is empty")]
    EmptyRegistry,
    /// Stored data could not be parsed at all.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// External persistence failed; in-memory state is unchanged.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StorageError),
}

impl EngineError {
    /// Whether this error is a mount-time precondition failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EngineError::MissingSurface
                | EngineError::InvalidSurfaceSize { .. }
                | EngineError::EmptyRegistry
        )
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        assert!(EngineError::MissingSurface.is_precondition());
        assert!(EngineError::EmptyRegistry.is_precondition());
        assert!(
            EngineError::InvalidSurfaceSize {
                width: 0.0,
                height: 10.0
            }
            .is_precondition()
        );

        let err = EngineError::Persistence(StorageError::NotFound("x".to_string()));
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::MissingSurface;
        assert!(err.to_string().contains("no drawing surface"));
    }
}
