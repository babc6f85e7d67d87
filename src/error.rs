//! Error taxonomy for the construction pipeline
//!
//! Every failure is detected at a stage boundary (renumber, symmetrize, CSR
//! build) and reported synchronously. Construction is all-or-nothing: no
//! partial graph is ever observable after an error.

use thiserror::Error;

/// Errors produced by graph construction and structural queries.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Malformed input: empty columns, mismatched column lengths, etc.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A count exceeded an addressable limit (vertex ids are stored in 32
    /// bits; distinct keys are capped at 2^31 - 1, matching the engine's
    /// int32 vertex domain).
    #[error("capacity exceeded: needed {needed}, limit {limit}")]
    CapacityExceeded {
        /// How many entries the operation required.
        needed: usize,
        /// The addressable limit that would have been crossed.
        limit: usize,
    },

    /// A vertex id referenced outside the established domain `[0, bound)`.
    #[error("vertex id {id} out of range (vertex count {bound})")]
    OutOfRange {
        /// The offending vertex id.
        id: u32,
        /// Number of vertices in the domain.
        bound: u32,
    },

    /// A requested configuration is not implemented (e.g. an unknown weight
    /// reduction policy).
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
}

/// Result type for graph construction operations.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphError::OutOfRange { id: 7, bound: 3 };
        assert_eq!(err.to_string(), "vertex id 7 out of range (vertex count 3)");

        let err = GraphError::CapacityExceeded {
            needed: 4_000_000_000,
            limit: 2_147_483_647,
        };
        assert!(err.to_string().contains("2147483647"));
    }
}
