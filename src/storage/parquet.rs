//! Parquet I/O for graph persistence
//!
//! Based on `DuckDB` (Raasveldt et al., SIGMOD 2019) columnar storage patterns.
//!
//! # Format
//!
//! Graphs with int64 keys are stored as two Parquet files:
//! - `{path}_edges.parquet`: (source, target[, weight]) in original keys,
//!   with a `directed` flag in the schema metadata. Undirected graphs store
//!   each unordered pair once; symmetrization restores the mirror on load.
//! - `{path}_vertices.parquet`: (`vertex_id`, key), the numbering at write
//!   time, for external result translation.
//!
//! Vertex ids are reassigned on load (the pipeline reruns), so only the
//! logical graph over keys round-trips, not the physical id assignment.

use crate::structure::{GraphHandle, GraphKind, VertexId};
use anyhow::{anyhow, Context, Result};
use arrow::array::{Float32Array, Int64Array, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const DIRECTED_META_KEY: &str = "cimiento.directed";

impl GraphHandle<i64> {
    /// Write the graph to Parquet files.
    ///
    /// Creates two files:
    /// - `{path}_edges.parquet`: edge list in original keys
    /// - `{path}_vertices.parquet`: vertex id to key numbering
    ///
    /// # Errors
    ///
    /// Returns error if file I/O fails or Arrow conversion fails
    #[allow(clippy::unused_async)] // Async API for future I/O operations
    pub async fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let base_path = path.as_ref();

        self.write_edges_parquet(base_path)?;
        self.write_vertices_parquet(base_path)?;

        Ok(())
    }

    /// Read a graph from Parquet files, rerunning the construction pipeline
    /// on the stored edge list.
    ///
    /// # Errors
    ///
    /// Returns error if files don't exist, columns have unexpected types, or
    /// construction fails
    #[allow(clippy::unused_async)] // Async API for future I/O operations
    pub async fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref();

        let (sources, targets, weights, kind) = Self::read_edges_parquet(base_path)?;

        let graph = Self::from_edgelist(&sources, &targets, weights.as_deref(), kind)
            .context("Failed to rebuild graph from stored edge list")?;

        Ok(graph)
    }

    fn write_edges_parquet(&self, base_path: &Path) -> Result<()> {
        let edges_path = format!("{}_edges.parquet", base_path.display());

        // Translate CSR rows back to original keys; undirected graphs keep
        // only the src <= dst half so weights don't double on reload.
        let mut sources = Vec::new();
        let mut targets = Vec::new();
        let weighted = self.csr_components().2.is_some();
        let mut weights = Vec::new();

        for v in 0..self.vertex_count() {
            #[allow(clippy::cast_possible_truncation)] // vertex_count <= 2^31
            let src = VertexId(v as u32);
            for (dst, weight) in self.neighbors(src)? {
                if !self.directed() && dst.0 < src.0 {
                    continue;
                }
                sources.push(*self.original_key(src)?);
                targets.push(*self.original_key(dst)?);
                if weighted {
                    weights.push(weight.unwrap_or(1.0));
                }
            }
        }

        let mut fields = vec![
            Field::new("source", DataType::Int64, false),
            Field::new("target", DataType::Int64, false),
        ];
        if weighted {
            fields.push(Field::new("weight", DataType::Float32, false));
        }
        let metadata = HashMap::from([(
            DIRECTED_META_KEY.to_string(),
            self.directed().to_string(),
        )]);
        let schema = Arc::new(Schema::new_with_metadata(fields, metadata));

        let mut columns: Vec<arrow::array::ArrayRef> = vec![
            Arc::new(Int64Array::from(sources)),
            Arc::new(Int64Array::from(targets)),
        ];
        if weighted {
            columns.push(Arc::new(Float32Array::from(weights)));
        }

        let batch = RecordBatch::try_new(schema.clone(), columns)
            .context("Failed to create edges RecordBatch")?;

        let file =
            File::create(&edges_path).with_context(|| format!("Failed to create {edges_path}"))?;

        let props = WriterProperties::builder()
            .set_compression(parquet::basic::Compression::ZSTD(
                parquet::basic::ZstdLevel::try_new(3)?,
            ))
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    fn write_vertices_parquet(&self, base_path: &Path) -> Result<()> {
        let vertices_path = format!("{}_vertices.parquet", base_path.display());

        let mut ids = Vec::with_capacity(self.vertex_count());
        let mut keys = Vec::with_capacity(self.vertex_count());
        for (id, key) in self.numbering().iter() {
            ids.push(id.0);
            keys.push(*key);
        }

        let schema = Arc::new(Schema::new(vec![
            Field::new("vertex_id", DataType::UInt32, false),
            Field::new("key", DataType::Int64, false),
        ]));

        let id_array = Arc::new(UInt32Array::from(ids));
        let key_array = Arc::new(Int64Array::from(keys));

        let batch = RecordBatch::try_new(schema.clone(), vec![id_array, key_array])
            .context("Failed to create vertices RecordBatch")?;

        let file = File::create(&vertices_path)
            .with_context(|| format!("Failed to create {vertices_path}"))?;

        let props = WriterProperties::builder()
            .set_compression(parquet::basic::Compression::ZSTD(
                parquet::basic::ZstdLevel::try_new(3)?,
            ))
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    #[allow(clippy::type_complexity)]
    fn read_edges_parquet(
        base_path: &Path,
    ) -> Result<(Vec<i64>, Vec<i64>, Option<Vec<f32>>, GraphKind)> {
        let edges_path = format!("{}_edges.parquet", base_path.display());

        let file =
            File::open(&edges_path).with_context(|| format!("Failed to open {edges_path}"))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

        let kind = match builder
            .schema()
            .metadata()
            .get(DIRECTED_META_KEY)
            .map(String::as_str)
        {
            Some("true") => GraphKind::Directed,
            Some("false") => GraphKind::Undirected,
            other => {
                return Err(anyhow!(
                    "missing or invalid '{DIRECTED_META_KEY}' schema metadata: {other:?}"
                ))
            }
        };
        let weighted = builder.schema().column_with_name("weight").is_some();

        let reader = builder.build()?;

        let mut sources = Vec::new();
        let mut targets = Vec::new();
        let mut weights = weighted.then(Vec::new);

        for batch_result in reader {
            let batch: RecordBatch = batch_result?;

            let src_col = batch
                .column(0)
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("Invalid source column type")?;

            let dst_col = batch
                .column(1)
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("Invalid target column type")?;

            let weight_col = if weighted {
                Some(
                    batch
                        .column(2)
                        .as_any()
                        .downcast_ref::<Float32Array>()
                        .context("Invalid weight column type")?,
                )
            } else {
                None
            };

            for i in 0..batch.num_rows() {
                sources.push(src_col.value(i));
                targets.push(dst_col.value(i));
                if let (Some(ws), Some(col)) = (weights.as_mut(), weight_col) {
                    ws.push(col.value(i));
                }
            }
        }

        Ok((sources, targets, weights, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_parquet_roundtrip_directed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_graph");

        let graph = GraphHandle::from_edgelist(
            &[100_i64, 100, 250],
            &[250_i64, 300, 300],
            Some(&[1.0, 2.0, 3.0]),
            GraphKind::Directed,
        )
        .unwrap();

        graph.write_parquet(&path).await.unwrap();
        let loaded = GraphHandle::<i64>::read_parquet(&path).await.unwrap();

        assert_eq!(loaded.vertex_count(), graph.vertex_count());
        assert_eq!(loaded.edge_count(), graph.edge_count());
        assert!(loaded.directed());

        // Logical graph over keys survives the round-trip
        let v100 = loaded.lookup(&100).unwrap();
        let out: Vec<(i64, Option<f32>)> = loaded
            .neighbors(v100)
            .unwrap()
            .map(|(dst, w)| (*loaded.original_key(dst).unwrap(), w))
            .collect();
        assert!(out.contains(&(250, Some(1.0))));
        assert!(out.contains(&(300, Some(2.0))));
    }

    #[tokio::test]
    async fn test_parquet_roundtrip_undirected_no_weight_doubling() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("undirected_graph");

        let graph = GraphHandle::from_edgelist(
            &[1_i64, 2],
            &[2_i64, 3],
            Some(&[5.0, 7.0]),
            GraphKind::Undirected,
        )
        .unwrap();

        graph.write_parquet(&path).await.unwrap();
        let loaded = GraphHandle::<i64>::read_parquet(&path).await.unwrap();

        assert!(!loaded.directed());
        assert_eq!(loaded.edge_count(), graph.edge_count());

        // Sum reduction must not double the 1-2 weight through the round-trip
        let v1 = loaded.lookup(&1).unwrap();
        let row: Vec<_> = loaded.neighbors(v1).unwrap().collect();
        assert_eq!(row.len(), 1);
        assert_eq!(row[0].1, Some(5.0));
    }

    #[tokio::test]
    async fn test_parquet_roundtrip_unweighted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unweighted_graph");

        let graph =
            GraphHandle::from_edgelist(&[7_i64], &[9_i64], None, GraphKind::Directed).unwrap();

        graph.write_parquet(&path).await.unwrap();
        let loaded = GraphHandle::<i64>::read_parquet(&path).await.unwrap();

        assert_eq!(loaded.edge_count(), 1);
        assert!(loaded.csr_components().2.is_none());
    }

    #[tokio::test]
    async fn test_vertices_file_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("with_vertices");

        let graph =
            GraphHandle::from_edgelist(&[4_i64], &[8_i64], None, GraphKind::Directed).unwrap();
        graph.write_parquet(&path).await.unwrap();

        assert!(std::path::Path::new(&format!("{}_edges.parquet", path.display())).exists());
        assert!(
            std::path::Path::new(&format!("{}_vertices.parquet", path.display())).exists()
        );
    }
}
