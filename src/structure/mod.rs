//! Graph construction pipeline
//!
//! Raw key columns flow through renumbering, optional symmetrization, and
//! CSR assembly into an immutable [`GraphHandle`].

pub mod arena;
pub mod csr;
pub mod edges;
pub mod graph;
pub mod renumber;
pub mod symmetrize;

pub use arena::GraphArena;
pub use csr::{Csr, CsrBuilder};
pub use edges::{EdgeList, Reduction, VertexId, MAX_VERTICES};
pub use graph::{GraphHandle, GraphKind, Neighbors};
pub use renumber::{renumber, NumberingMap, Renumbered, VertexKey};
pub use symmetrize::symmetrize;
