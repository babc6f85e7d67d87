//! Graph persistence layer
//!
//! Edge lists (with original keys) are the durable form; CSR buffers are
//! always rebuilt through the construction pipeline on load.

pub mod parquet;
