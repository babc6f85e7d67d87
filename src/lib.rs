//! cimiento-graph: GPU-first graph construction core
//!
//! # Overview
//!
//! cimiento-graph is the construction layer under a GPU graph analytics
//! engine: it turns arbitrary edge lists into the dense, deduplicated CSR
//! adjacency the algorithm kernels (BFS, `PageRank`, centrality) consume.
//! The kernels themselves live elsewhere; this crate owns everything they
//! assume: vertex renumbering, edge symmetrization, CSR assembly, and the
//! mapping that translates results back to caller vocabulary.
//!
//! # Quick Start
//!
//! ```
//! use cimiento_graph::{GraphHandle, GraphKind, VertexId};
//!
//! # fn example() -> cimiento_graph::Result<()> {
//! // Sparse int64 keys in, dense zero-based CSR out
//! let sources = vec![105_i64, 105, 942];
//! let targets = vec![942_i64, 17, 17];
//! let graph = GraphHandle::from_edgelist(&sources, &targets, None, GraphKind::Directed)?;
//!
//! assert_eq!(graph.vertex_count(), 3);              // distinct keys {105, 942, 17}
//! assert_eq!(graph.degree(VertexId(0))?, 2);        // 105 has two out-edges
//! assert_eq!(*graph.original_key(VertexId(1))?, 942);
//!
//! // Neighbor iteration is O(degree) over the CSR row
//! for (neighbor, weight) in graph.neighbors(VertexId(0))? {
//!     let _ = (neighbor, weight);
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Architecture
//!
//! - **Renumbering**: arbitrary (possibly composite) keys to a dense
//!   `[0, V)` int32-addressable id space, first-appearance order
//! - **Symmetrization**: directed edge lists to undirected equivalents with
//!   configurable weight merging
//! - **Storage**: CSR (Compressed Sparse Row), sorted and deduplicated
//!   per-row, plus a reverse CSR for directed predecessor queries
//! - **Persistence**: Parquet-backed edge lists (feature `storage`)
//!
//! Construction is all-or-nothing: every failure surfaces as a typed
//! [`GraphError`] at a stage boundary and no partial graph is observable.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod structure;

#[cfg(feature = "storage")]
pub mod storage;

// Re-export core types
pub use error::{GraphError, Result};
pub use structure::{
    renumber, symmetrize, Csr, CsrBuilder, EdgeList, GraphArena, GraphHandle, GraphKind,
    Neighbors, NumberingMap, Reduction, Renumbered, VertexId, VertexKey, MAX_VERTICES,
};
