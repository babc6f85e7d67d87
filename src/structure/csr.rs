//! CSR (Compressed Sparse Row) adjacency assembly
//!
//! Based on `GraphBLAST` (Yang et al., ACM `ToMS` 2022) for GPU-optimized
//! sparse layouts.
//!
//! # CSR Format
//!
//! ```text
//! Graph: 0 → 1, 0 → 2, 1 → 2
//!
//! CSR:
//!   offsets: [0, 2, 3, 3]  // Vertex 0: edges [0..2), vertex 1: [2..3), vertex 2: [3..3)
//!   indices: [1, 2, 2]     // Edge 0 → vertex 1, edge 1 → vertex 2, edge 2 → vertex 2
//!   weights: [1.0, 1.0, 1.0]
//! ```
//!
//! Assembly is count → prefix-sum → scatter → per-row sort/collapse. The
//! scatter writes through per-vertex cursors derived from the prefix sum, so
//! every destination range is disjoint; the per-row pass touches only its
//! own slice. Both properties let the `parallel` feature fan rows out across
//! threads without locks while producing the identical logical result.

use crate::error::{GraphError, Result};
use crate::structure::edges::{EdgeList, Reduction, VertexId};

/// Immutable CSR adjacency: offsets, neighbor indices, optional weights.
///
/// Invariants (checked by [`Csr::validate`], guaranteed by [`CsrBuilder`]):
/// - `offsets.len() == vertex_count + 1`, `offsets[0] == 0`, non-decreasing,
///   `offsets[vertex_count] == indices.len()`
/// - each vertex's slice of `indices` is sorted ascending with no duplicate
///   destination
/// - `weights`, when present, parallels `indices`
#[derive(Debug, Clone, PartialEq)]
pub struct Csr {
    /// Row offsets, length `vertex_count + 1`.
    offsets: Vec<u32>,
    /// Neighbor vertex ids, length `edge_count`.
    indices: Vec<u32>,
    /// Edge weights parallel to `indices`, if the graph is weighted.
    weights: Option<Vec<f32>>,
}

impl Csr {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of (deduplicated) edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.indices.len()
    }

    /// Out-degree of a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `id` is not a vertex.
    #[allow(clippy::cast_possible_truncation)] // row len <= u32 edge count
    pub fn degree(&self, id: u32) -> Result<u32> {
        let (row, _) = self.row(id)?;
        Ok(row.len() as u32)
    }

    /// A vertex's neighbor slice and matching weight slice.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `id` is not a vertex.
    pub fn row(&self, id: u32) -> Result<(&[u32], Option<&[f32]>)> {
        let v = id as usize;
        if v >= self.vertex_count() {
            #[allow(clippy::cast_possible_truncation)] // vertex_count <= 2^31
            let bound = self.vertex_count() as u32;
            return Err(GraphError::OutOfRange { id, bound });
        }
        let start = self.offsets[v] as usize;
        let end = self.offsets[v + 1] as usize;
        Ok((
            &self.indices[start..end],
            self.weights.as_ref().map(|w| &w[start..end]),
        ))
    }

    /// Raw CSR components (offsets, indices, weights) for algorithm layers
    /// and device upload.
    #[must_use]
    pub fn components(&self) -> (&[u32], &[u32], Option<&[f32]>) {
        (&self.offsets, &self.indices, self.weights.as_deref())
    }

    /// Check the structural invariants hold.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] describing the first violated
    /// invariant.
    pub fn validate(&self) -> Result<()> {
        if self.offsets.first() != Some(&0) {
            return Err(GraphError::InvalidArgument(
                "offsets must start at 0".into(),
            ));
        }
        for (i, pair) in self.offsets.windows(2).enumerate() {
            if pair[0] > pair[1] {
                return Err(GraphError::InvalidArgument(format!(
                    "offsets not monotonic at vertex {i}"
                )));
            }
        }
        let nnz = self.offsets.last().copied().unwrap_or(0) as usize;
        if nnz != self.indices.len() {
            return Err(GraphError::InvalidArgument(format!(
                "offsets[-1] = {nnz} != indices.len() = {}",
                self.indices.len()
            )));
        }
        if let Some(ref w) = self.weights {
            if w.len() != self.indices.len() {
                return Err(GraphError::InvalidArgument(format!(
                    "weights.len() = {} != indices.len() = {}",
                    w.len(),
                    self.indices.len()
                )));
            }
        }
        for v in 0..self.vertex_count() {
            let row = &self.indices[self.offsets[v] as usize..self.offsets[v + 1] as usize];
            for pair in row.windows(2) {
                if pair[0] >= pair[1] {
                    return Err(GraphError::InvalidArgument(format!(
                        "row {v} not sorted/deduplicated"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Heap footprint of the CSR buffers in bytes, for arena accounting.
    #[must_use]
    pub fn heap_bytes(&self) -> usize {
        self.offsets.capacity() * std::mem::size_of::<u32>()
            + self.indices.capacity() * std::mem::size_of::<u32>()
            + self
                .weights
                .as_ref()
                .map_or(0, |w| w.capacity() * std::mem::size_of::<f32>())
    }
}

/// Builds [`Csr`] adjacency from a renumbered edge list.
///
/// # Example
///
/// ```
/// use cimiento_graph::{CsrBuilder, EdgeList, VertexId};
///
/// let edges = EdgeList::new(
///     vec![VertexId(0), VertexId(0), VertexId(1)],
///     vec![VertexId(2), VertexId(1), VertexId(2)],
///     None,
/// ).unwrap();
///
/// let csr = CsrBuilder::new(3).build(&edges).unwrap();
/// let (offsets, indices, _) = csr.components();
/// assert_eq!(offsets, &[0, 2, 3, 3]);
/// assert_eq!(indices, &[1, 2, 2]); // rows sorted by destination
/// ```
#[derive(Debug, Clone)]
pub struct CsrBuilder {
    vertex_count: u32,
    reduction: Reduction,
}

impl CsrBuilder {
    /// Create a builder for a graph with `vertex_count` vertices.
    #[must_use]
    pub fn new(vertex_count: u32) -> Self {
        Self {
            vertex_count,
            reduction: Reduction::default(),
        }
    }

    /// Set the policy for collapsing exact duplicate (src, dst) pairs.
    ///
    /// Matters only when symmetrization was skipped but duplicates remain.
    #[must_use]
    pub fn with_reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    /// Assemble the CSR.
    ///
    /// O(V + E) for counting and scatter plus the per-row sort. Duplicate
    /// (src, dst) pairs collapse under the builder's reduction policy.
    ///
    /// # Errors
    ///
    /// - [`GraphError::OutOfRange`] if any edge references an id `>=`
    ///   `vertex_count`.
    /// - [`GraphError::CapacityExceeded`] if the edge count overflows the
    ///   32-bit offset space.
    pub fn build(&self, edges: &EdgeList) -> Result<Csr> {
        let v_count = self.vertex_count as usize;
        if edges.len() > u32::MAX as usize {
            return Err(GraphError::CapacityExceeded {
                needed: edges.len(),
                limit: u32::MAX as usize,
            });
        }

        for &VertexId(id) in edges.sources().iter().chain(edges.targets()) {
            if id >= self.vertex_count {
                return Err(GraphError::OutOfRange {
                    id,
                    bound: self.vertex_count,
                });
            }
        }

        // Per-source degree counts, then exclusive prefix sum.
        let mut counts = vec![0_u32; v_count];
        for src in edges.sources() {
            counts[src.0 as usize] += 1;
        }
        let mut offsets = Vec::with_capacity(v_count + 1);
        let mut running = 0_u32;
        offsets.push(0);
        for &c in &counts {
            running += c;
            offsets.push(running);
        }

        match edges.weights() {
            Some(weights) => self.scatter_weighted(&offsets, edges, weights),
            None => self.scatter_unweighted(&offsets, edges),
        }
    }

    fn scatter_weighted(
        &self,
        offsets: &[u32],
        edges: &EdgeList,
        edge_weights: &[f32],
    ) -> Result<Csr> {
        let v_count = self.vertex_count as usize;
        let mut slots = vec![(0_u32, 0.0_f32); edges.len()];
        let mut cursor: Vec<u32> = offsets[..v_count].to_vec();

        for (i, (src, dst)) in edges.sources().iter().zip(edges.targets()).enumerate() {
            let pos = cursor[src.0 as usize] as usize;
            cursor[src.0 as usize] += 1;
            slots[pos] = (dst.0, edge_weights[i]);
        }

        // Stable sort keeps input order among duplicates, so Reduction::First
        // sees the earliest occurrence.
        for_each_row(offsets, &mut slots, |row| {
            row.sort_by_key(|&(dst, _)| dst);
        });

        let mut out_offsets = Vec::with_capacity(v_count + 1);
        out_offsets.push(0_u32);
        let mut indices = Vec::with_capacity(edges.len());
        let mut weights = Vec::with_capacity(edges.len());

        for v in 0..v_count {
            let row = &slots[offsets[v] as usize..offsets[v + 1] as usize];
            let mut prev = None;
            for &(dst, w) in row {
                if prev == Some(dst) {
                    if let Some(acc) = weights.last_mut() {
                        *acc = self.reduction.merge(*acc, w);
                    }
                } else {
                    indices.push(dst);
                    weights.push(w);
                    prev = Some(dst);
                }
            }
            #[allow(clippy::cast_possible_truncation)] // bounded by edge count
            out_offsets.push(indices.len() as u32);
        }

        Ok(Csr {
            offsets: out_offsets,
            indices,
            weights: Some(weights),
        })
    }

    fn scatter_unweighted(&self, offsets: &[u32], edges: &EdgeList) -> Result<Csr> {
        let v_count = self.vertex_count as usize;
        let mut slots = vec![0_u32; edges.len()];
        let mut cursor: Vec<u32> = offsets[..v_count].to_vec();

        for (src, dst) in edges.sources().iter().zip(edges.targets()) {
            let pos = cursor[src.0 as usize] as usize;
            cursor[src.0 as usize] += 1;
            slots[pos] = dst.0;
        }

        for_each_row(offsets, &mut slots, |row| row.sort_unstable());

        let mut out_offsets = Vec::with_capacity(v_count + 1);
        out_offsets.push(0_u32);
        let mut indices = Vec::with_capacity(edges.len());

        for v in 0..v_count {
            let row = &slots[offsets[v] as usize..offsets[v + 1] as usize];
            let mut prev = None;
            for &dst in row {
                if prev != Some(dst) {
                    indices.push(dst);
                    prev = Some(dst);
                }
            }
            #[allow(clippy::cast_possible_truncation)] // bounded by edge count
            out_offsets.push(indices.len() as u32);
        }

        Ok(Csr {
            offsets: out_offsets,
            indices,
            weights: None,
        })
    }
}

/// Apply `f` to each vertex's row slice of `data`.
///
/// Rows are disjoint by construction (prefix-sum ranges), which is what
/// makes the rayon fan-out race-free without locks.
#[cfg(feature = "parallel")]
fn for_each_row<T: Send>(
    offsets: &[u32],
    data: &mut [T],
    f: impl Fn(&mut [T]) + Send + Sync,
) {
    use rayon::prelude::*;

    let mut rows: Vec<&mut [T]> = Vec::with_capacity(offsets.len().saturating_sub(1));
    let mut rest = data;
    for pair in offsets.windows(2) {
        let (row, tail) = rest.split_at_mut((pair[1] - pair[0]) as usize);
        rows.push(row);
        rest = tail;
    }
    rows.into_par_iter().for_each(|row| f(row));
}

#[cfg(not(feature = "parallel"))]
fn for_each_row<T: Send>(
    offsets: &[u32],
    data: &mut [T],
    f: impl Fn(&mut [T]) + Send + Sync,
) {
    for pair in offsets.windows(2) {
        f(&mut data[pair[0] as usize..pair[1] as usize]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_list(rows: &[(u32, u32)], weights: Option<Vec<f32>>) -> EdgeList {
        EdgeList::new(
            rows.iter().map(|&(s, _)| VertexId(s)).collect(),
            rows.iter().map(|&(_, t)| VertexId(t)).collect(),
            weights,
        )
        .unwrap()
    }

    #[test]
    fn test_build_simple() {
        let edges = edge_list(&[(0, 1), (0, 2), (1, 2)], Some(vec![1.0, 1.0, 1.0]));
        let csr = CsrBuilder::new(3).build(&edges).unwrap();

        let (offsets, indices, weights) = csr.components();
        assert_eq!(offsets, &[0, 2, 3, 3]);
        assert_eq!(indices, &[1, 2, 2]);
        assert_eq!(weights, Some(&[1.0, 1.0, 1.0][..]));
        assert!(csr.validate().is_ok());
    }

    #[test]
    fn test_build_sorts_rows() {
        let edges = edge_list(&[(0, 3), (0, 1), (0, 2)], None);
        let csr = CsrBuilder::new(4).build(&edges).unwrap();

        let (row, _) = csr.row(0).unwrap();
        assert_eq!(row, &[1, 2, 3]);
    }

    #[test]
    fn test_build_rejects_out_of_range() {
        let edges = edge_list(&[(0, 5)], None);
        let err = CsrBuilder::new(3).build(&edges).unwrap_err();
        assert!(matches!(err, GraphError::OutOfRange { id: 5, bound: 3 }));
    }

    #[test]
    fn test_build_collapses_duplicates_sum() {
        let edges = edge_list(&[(0, 1), (0, 1), (0, 2)], Some(vec![1.5, 2.5, 1.0]));
        let csr = CsrBuilder::new(3).build(&edges).unwrap();

        let (row, weights) = csr.row(0).unwrap();
        assert_eq!(row, &[1, 2]);
        assert_eq!(weights, Some(&[4.0, 1.0][..]));
        assert_eq!(csr.edge_count(), 2);
    }

    #[test]
    fn test_build_collapses_duplicates_first() {
        // First keeps the earliest input occurrence, even after sorting
        let edges = edge_list(
            &[(0, 2), (0, 1), (0, 2)],
            Some(vec![9.0, 1.0, 3.0]),
        );
        let csr = CsrBuilder::new(3)
            .with_reduction(Reduction::First)
            .build(&edges)
            .unwrap();

        let (row, weights) = csr.row(0).unwrap();
        assert_eq!(row, &[1, 2]);
        assert_eq!(weights, Some(&[1.0, 9.0][..]));
    }

    #[test]
    fn test_build_collapses_duplicates_unweighted() {
        let edges = edge_list(&[(0, 1), (0, 1), (0, 1)], None);
        let csr = CsrBuilder::new(2).build(&edges).unwrap();

        let (offsets, indices, weights) = csr.components();
        assert_eq!(offsets, &[0, 1, 1]);
        assert_eq!(indices, &[1]);
        assert_eq!(weights, None);
    }

    #[test]
    fn test_build_self_loop() {
        let edges = edge_list(&[(0, 0)], Some(vec![2.0]));
        let csr = CsrBuilder::new(1).build(&edges).unwrap();

        let (offsets, indices, weights) = csr.components();
        assert_eq!(offsets, &[0, 1]);
        assert_eq!(indices, &[0]);
        assert_eq!(weights, Some(&[2.0][..]));
    }

    #[test]
    fn test_build_isolated_vertices() {
        // Vertices 2 and 3 have no edges; their rows are empty
        let edges = edge_list(&[(0, 1)], None);
        let csr = CsrBuilder::new(4).build(&edges).unwrap();

        let (offsets, _, _) = csr.components();
        assert_eq!(offsets, &[0, 1, 1, 1, 1]);
        assert_eq!(csr.degree(2).unwrap(), 0);
    }

    #[test]
    fn test_degree_and_row_bounds() {
        let edges = edge_list(&[(0, 1), (0, 2)], None);
        let csr = CsrBuilder::new(3).build(&edges).unwrap();

        assert_eq!(csr.degree(0).unwrap(), 2);
        assert!(matches!(
            csr.degree(3),
            Err(GraphError::OutOfRange { id: 3, bound: 3 })
        ));
    }

    #[test]
    fn test_validate_catches_corruption() {
        let edges = edge_list(&[(0, 1), (1, 0)], None);
        let mut csr = CsrBuilder::new(2).build(&edges).unwrap();
        assert!(csr.validate().is_ok());

        csr.offsets[1] = 5; // corrupt monotonicity
        assert!(csr.validate().is_err());
    }

    #[test]
    fn test_heap_bytes_nonzero() {
        let edges = edge_list(&[(0, 1)], Some(vec![1.0]));
        let csr = CsrBuilder::new(2).build(&edges).unwrap();
        assert!(csr.heap_bytes() >= 3 * 4);
    }
}
