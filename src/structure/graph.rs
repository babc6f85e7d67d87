//! The composed construction artifact: CSR adjacency plus identity mapping
//!
//! [`GraphHandle`] is what the algorithm layers consume. It owns the CSR
//! buffers, the reverse CSR for directed graphs, and the
//! [`NumberingMap`] that translates results back into caller vocabulary.
//! Everything is frozen at construction: queries take `&self`, there is no
//! mutation API, and a changed graph means a new `from_edgelist` call.

use crate::error::Result;
use crate::structure::arena::GraphArena;
use crate::structure::csr::{Csr, CsrBuilder};
use crate::structure::edges::{EdgeList, Reduction, VertexId};
use crate::structure::renumber::{renumber, NumberingMap, VertexKey};
use crate::structure::symmetrize::symmetrize;

/// Whether edges keep their direction or are symmetrized into an undirected
/// adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    /// Edges keep their direction; a reverse CSR is built for predecessor
    /// queries.
    Directed,
    /// Both directions of every edge are materialized; forward and reverse
    /// adjacency coincide.
    Undirected,
}

/// Immutable graph: dense-id CSR adjacency plus the key mapping.
///
/// # Example
///
/// ```
/// use cimiento_graph::{GraphHandle, GraphKind, VertexId};
///
/// let srcs = vec!["main", "main", "parse"];
/// let dsts = vec!["parse", "validate", "validate"];
/// let graph = GraphHandle::from_edgelist(&srcs, &dsts, None, GraphKind::Directed).unwrap();
///
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.degree(VertexId(0)).unwrap(), 2);
/// assert_eq!(*graph.original_key(VertexId(0)).unwrap(), "main");
/// ```
#[derive(Debug, Clone)]
pub struct GraphHandle<K> {
    csr: Csr,
    /// Transposed adjacency for directed graphs; `None` when undirected
    /// (forward CSR already holds both directions).
    reverse: Option<Csr>,
    map: NumberingMap<K>,
    kind: GraphKind,
    arena: GraphArena,
}

impl<K: VertexKey> GraphHandle<K> {
    /// Build a graph from key columns with default policies (sum reduction,
    /// unbounded arena).
    ///
    /// # Errors
    ///
    /// See [`GraphHandle::from_edgelist_in`].
    pub fn from_edgelist(
        source_keys: &[K],
        target_keys: &[K],
        weights: Option<&[f32]>,
        kind: GraphKind,
    ) -> Result<Self> {
        Self::from_edgelist_in(
            source_keys,
            target_keys,
            weights,
            kind,
            Reduction::default(),
            GraphArena::unbounded(),
        )
    }

    /// Build a graph from key columns: renumber, symmetrize (undirected
    /// only), CSR assembly. All-or-nothing: any stage failure yields an
    /// error and no handle.
    ///
    /// # Errors
    ///
    /// - `GraphError::InvalidArgument` for empty or length-mismatched
    ///   columns.
    /// - `GraphError::CapacityExceeded` if distinct keys exceed the id
    ///   space or buffers blow the arena budget.
    /// - `GraphError::OutOfRange` never escapes here for well-formed
    ///   pipeline output; it guards the builder's contract.
    pub fn from_edgelist_in(
        source_keys: &[K],
        target_keys: &[K],
        weights: Option<&[f32]>,
        kind: GraphKind,
        reduction: Reduction,
        mut arena: GraphArena,
    ) -> Result<Self> {
        let renumbered = renumber(source_keys, target_keys)?;
        let map = renumbered.map;
        #[allow(clippy::cast_possible_truncation)] // map len <= MAX_VERTICES
        let vertex_count = map.len() as u32;

        let edges = EdgeList::new(
            renumbered.sources,
            renumbered.targets,
            weights.map(<[f32]>::to_vec),
        )?;
        let edges = match kind {
            GraphKind::Undirected => symmetrize(&edges, reduction),
            GraphKind::Directed => edges,
        };

        let builder = CsrBuilder::new(vertex_count).with_reduction(reduction);
        let csr = builder.build(&edges)?;

        // Directed graphs also carry the transpose so predecessor queries
        // stay O(degree); undirected adjacency is its own transpose.
        let reverse = match kind {
            GraphKind::Directed => {
                let transposed = EdgeList::new(
                    edges.targets().to_vec(),
                    edges.sources().to_vec(),
                    edges.weights().map(<[f32]>::to_vec),
                )?;
                Some(builder.build(&transposed)?)
            }
            GraphKind::Undirected => None,
        };

        let bytes = csr.heap_bytes()
            + reverse.as_ref().map_or(0, Csr::heap_bytes)
            + map.heap_bytes();
        arena.charge(bytes)?;

        Ok(Self {
            csr,
            reverse,
            map,
            kind,
            arena,
        })
    }

    /// Number of vertices (distinct keys observed).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.map.len()
    }

    /// Number of edges after symmetrization and deduplication.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.csr.edge_count()
    }

    /// Whether edges keep their direction.
    #[must_use]
    pub fn directed(&self) -> bool {
        self.kind == GraphKind::Directed
    }

    /// Out-degree of `v`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::OutOfRange` if `v` is not a vertex.
    pub fn degree(&self, v: VertexId) -> Result<u32> {
        self.csr.degree(v.0)
    }

    /// In-degree of `v`. Equals [`GraphHandle::degree`] for undirected
    /// graphs.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::OutOfRange` if `v` is not a vertex.
    pub fn in_degree(&self, v: VertexId) -> Result<u32> {
        self.reverse.as_ref().unwrap_or(&self.csr).degree(v.0)
    }

    /// Iterate `v`'s neighbors with weights, ascending by neighbor id.
    ///
    /// The iterator is restartable: the CSR is immutable, so a fresh call
    /// always re-produces the same sequence.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::OutOfRange` if `v` is not a vertex.
    pub fn neighbors(&self, v: VertexId) -> Result<Neighbors<'_>> {
        let (indices, weights) = self.csr.row(v.0)?;
        Ok(Neighbors {
            indices,
            weights,
            pos: 0,
        })
    }

    /// Iterate the vertices with an edge into `v` (sources of in-edges).
    /// Equals [`GraphHandle::neighbors`] for undirected graphs.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::OutOfRange` if `v` is not a vertex.
    pub fn predecessors(&self, v: VertexId) -> Result<Neighbors<'_>> {
        let (indices, weights) = self.reverse.as_ref().unwrap_or(&self.csr).row(v.0)?;
        Ok(Neighbors {
            indices,
            weights,
            pos: 0,
        })
    }

    /// The original key for a vertex id (result translation).
    ///
    /// # Errors
    ///
    /// Returns `GraphError::OutOfRange` if `v` is not a vertex.
    pub fn original_key(&self, v: VertexId) -> Result<&K> {
        self.map.key(v)
    }

    /// The vertex id assigned to `key`, if it was observed in the input.
    #[must_use]
    pub fn lookup(&self, key: &K) -> Option<VertexId> {
        self.map.id(key)
    }

    /// The full identity mapping.
    #[must_use]
    pub fn numbering(&self) -> &NumberingMap<K> {
        &self.map
    }

    /// Raw forward CSR components (offsets, indices, weights) for algorithm
    /// layers and device upload.
    #[must_use]
    pub fn csr_components(&self) -> (&[u32], &[u32], Option<&[f32]>) {
        self.csr.components()
    }

    /// The arena this graph was built against.
    #[must_use]
    pub fn arena(&self) -> &GraphArena {
        &self.arena
    }
}

/// Lazy neighbor sequence over a vertex's CSR row.
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    indices: &'a [u32],
    weights: Option<&'a [f32]>,
    pos: usize,
}

impl Iterator for Neighbors<'_> {
    type Item = (VertexId, Option<f32>);

    fn next(&mut self) -> Option<Self::Item> {
        let dst = *self.indices.get(self.pos)?;
        let weight = self.weights.map(|w| w[self.pos]);
        self.pos += 1;
        Some((VertexId(dst), weight))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.indices.len() - self.pos;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for Neighbors<'_> {}
