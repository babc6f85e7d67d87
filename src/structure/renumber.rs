//! Vertex renumbering: arbitrary keys to a dense zero-based id space
//!
//! Callers identify vertices with whatever the source data carries: sparse
//! int64 ids, strings, or composite (multi-column) tuples. Device kernels
//! want a dense `[0, V)` int32 domain. [`renumber`] bridges the two: it
//! assigns each distinct key a [`VertexId`] by first appearance across the
//! union of the source and target columns, translates both columns, and
//! returns the [`NumberingMap`] needed to translate results back.
//!
//! # Example
//!
//! ```
//! use cimiento_graph::renumber;
//!
//! let out = renumber(&[5_i64, 5, 9], &[9_i64, 2, 2]).unwrap();
//! assert_eq!(out.map.len(), 3); // distinct keys {5, 9, 2}
//! assert_eq!(out.sources.iter().map(|v| v.0).collect::<Vec<_>>(), [0, 0, 1]);
//! assert_eq!(out.targets.iter().map(|v| v.0).collect::<Vec<_>>(), [1, 2, 2]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::{GraphError, Result};
use crate::structure::edges::{VertexId, MAX_VERTICES};

/// Marker trait for externally-supplied vertex identifiers.
///
/// Blanket-implemented: any clonable, hashable, structurally-comparable type
/// qualifies. Composite (multi-column) identities are plain tuples, e.g.
/// `(String, u32)` for (name, department).
pub trait VertexKey: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> VertexKey for T {}

/// Bidirectional mapping between original keys and dense vertex ids.
///
/// Immutable after construction. Forward lookup (key to id) is hash-based;
/// reverse lookup (id to key) is a direct index into a dense table.
#[derive(Debug, Clone)]
pub struct NumberingMap<K> {
    /// Reverse table: `keys[id]` is the original key for vertex `id`.
    keys: Vec<K>,
    /// Forward table: original key to assigned vertex id.
    ids: HashMap<K, VertexId>,
}

impl<K: VertexKey> NumberingMap<K> {
    fn with_capacity(cap: usize) -> Self {
        Self {
            keys: Vec::with_capacity(cap),
            ids: HashMap::with_capacity(cap),
        }
    }

    /// Look up the id for `key`, assigning the next dense id on first sight.
    fn intern(&mut self, key: &K, limit: usize) -> Result<VertexId> {
        if let Some(&id) = self.ids.get(key) {
            return Ok(id);
        }
        if self.keys.len() >= limit {
            return Err(GraphError::CapacityExceeded {
                needed: self.keys.len() + 1,
                limit,
            });
        }
        #[allow(clippy::cast_possible_truncation)] // len < MAX_VERTICES < u32::MAX
        let id = VertexId(self.keys.len() as u32);
        self.keys.push(key.clone());
        self.ids.insert(key.clone(), id);
        Ok(id)
    }

    /// Number of distinct keys (equals the vertex count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Reverse lookup: the original key for a vertex id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `id` is outside `[0, len)`.
    pub fn key(&self, id: VertexId) -> Result<&K> {
        #[allow(clippy::cast_possible_truncation)] // len <= MAX_VERTICES
        let bound = self.keys.len() as u32;
        self.keys
            .get(id.0 as usize)
            .ok_or(GraphError::OutOfRange { id: id.0, bound })
    }

    /// Forward lookup: the vertex id assigned to `key`, if observed.
    #[must_use]
    pub fn id(&self, key: &K) -> Option<VertexId> {
        self.ids.get(key).copied()
    }

    /// Iterate (id, key) pairs in id order.
    #[allow(clippy::cast_possible_truncation)] // len <= MAX_VERTICES
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &K)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(i, k)| (VertexId(i as u32), k))
    }

    /// Approximate heap footprint in bytes, for arena accounting.
    pub(crate) fn heap_bytes(&self) -> usize {
        let key = std::mem::size_of::<K>();
        let entry = key + std::mem::size_of::<VertexId>();
        self.keys.capacity() * key + self.ids.capacity() * entry
    }
}

/// Output of [`renumber`]: both columns translated to dense ids, plus the
/// numbering map for reverse translation.
#[derive(Debug, Clone)]
pub struct Renumbered<K> {
    /// Source column, translated to dense ids.
    pub sources: Vec<VertexId>,
    /// Target column, translated to dense ids.
    pub targets: Vec<VertexId>,
    /// Key to id mapping established during translation.
    pub map: NumberingMap<K>,
}

/// Renumber a pair of key columns into the dense `[0, V)` id space.
///
/// Ids are assigned by first appearance scanning edges in input order, the
/// source key before the target key within each edge. The assignment is
/// deterministic: identical input always yields identical ids.
///
/// # Errors
///
/// - [`GraphError::InvalidArgument`] if either column is empty or their
///   lengths differ.
/// - [`GraphError::CapacityExceeded`] if the distinct-key count exceeds
///   [`MAX_VERTICES`].
pub fn renumber<K: VertexKey>(source_keys: &[K], target_keys: &[K]) -> Result<Renumbered<K>> {
    renumber_bounded(source_keys, target_keys, MAX_VERTICES)
}

/// Renumber against an explicit id-space bound. [`renumber`] fixes the
/// bound at [`MAX_VERTICES`]; tests exercise the overflow path with small
/// bounds.
fn renumber_bounded<K: VertexKey>(
    source_keys: &[K],
    target_keys: &[K],
    limit: usize,
) -> Result<Renumbered<K>> {
    if source_keys.is_empty() || target_keys.is_empty() {
        return Err(GraphError::InvalidArgument(
            "source and target key columns must not be empty".into(),
        ));
    }
    if source_keys.len() != target_keys.len() {
        return Err(GraphError::InvalidArgument(format!(
            "source column has {} entries, target column has {}",
            source_keys.len(),
            target_keys.len()
        )));
    }

    let mut map = NumberingMap::with_capacity(source_keys.len());
    let mut sources = Vec::with_capacity(source_keys.len());
    let mut targets = Vec::with_capacity(target_keys.len());

    for (src, dst) in source_keys.iter().zip(target_keys) {
        sources.push(map.intern(src, limit)?);
        targets.push(map.intern(dst, limit)?);
    }

    Ok(Renumbered {
        sources,
        targets,
        map,
    })
}
