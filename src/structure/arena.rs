//! Explicit memory accounting for graph construction
//!
//! The engine's device tier sizes transfers against a fixed budget; the host
//! construction core mirrors that with an explicit arena object instead of a
//! process-wide pool. Each [`GraphHandle`](crate::GraphHandle) owns the arena
//! it was built against, so the budget's lifecycle is the handle's lifecycle
//! and nothing is ambient.

use crate::error::{GraphError, Result};

/// Byte budget charged during construction and owned by the finished handle.
///
/// # Example
///
/// ```
/// use cimiento_graph::GraphArena;
///
/// let arena = GraphArena::with_limit(64 * 1024 * 1024); // 64 MB
/// assert_eq!(arena.bytes_used(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphArena {
    limit: Option<usize>,
    used: usize,
}

impl GraphArena {
    /// An arena with no byte limit.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// An arena that refuses allocations past `bytes`.
    #[must_use]
    pub fn with_limit(bytes: usize) -> Self {
        Self {
            limit: Some(bytes),
            used: 0,
        }
    }

    /// Bytes charged so far.
    #[must_use]
    pub fn bytes_used(&self) -> usize {
        self.used
    }

    /// The configured limit, if any.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Whether an allocation of `bytes` more would still fit.
    #[must_use]
    pub fn fits(&self, bytes: usize) -> bool {
        self.limit
            .map_or(true, |limit| self.used.saturating_add(bytes) <= limit)
    }

    /// Charge `bytes` against the budget.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CapacityExceeded`] if the charge would cross
    /// the limit; the arena is left unchanged on failure.
    pub(crate) fn charge(&mut self, bytes: usize) -> Result<()> {
        let needed = self.used.saturating_add(bytes);
        if let Some(limit) = self.limit {
            if needed > limit {
                return Err(GraphError::CapacityExceeded { needed, limit });
            }
        }
        self.used = needed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_accepts_everything() {
        let mut arena = GraphArena::unbounded();
        arena.charge(usize::MAX / 2).unwrap();
        arena.charge(usize::MAX / 2).unwrap();
        assert!(arena.fits(1));
    }

    #[test]
    fn test_limit_enforced() {
        let mut arena = GraphArena::with_limit(100);
        arena.charge(60).unwrap();
        assert!(arena.fits(40));
        assert!(!arena.fits(41));

        let err = arena.charge(41).unwrap_err();
        assert!(matches!(
            err,
            GraphError::CapacityExceeded {
                needed: 101,
                limit: 100
            }
        ));
        // failed charge leaves usage unchanged
        assert_eq!(arena.bytes_used(), 60);
        arena.charge(40).unwrap();
        assert_eq!(arena.bytes_used(), 100);
    }
}
