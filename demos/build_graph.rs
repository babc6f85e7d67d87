//! End-to-end example: sparse keys in, CSR graph out
//!
//! Run with: cargo run --example build_graph

use cimiento_graph::{GraphHandle, GraphKind, Reduction, VertexId};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🦀 cimiento-graph Example\n");

    // 1. Raw edge list with sparse 64-bit keys, both directions supplied
    //    for some pairs (typical of pre-symmetrized exports)
    println!("📊 Building undirected graph from raw edge list...");
    let sources = vec![105_i64, 105, 942, 17, 338];
    let targets = vec![942_i64, 17, 105, 338, 17];
    let weights = vec![1.0_f32, 1.0, 1.0, 2.5, 2.5];

    let graph = GraphHandle::from_edgelist(
        &sources,
        &targets,
        Some(&weights),
        GraphKind::Undirected,
    )?;

    println!(
        "  ✅ Graph built: {} vertices, {} edges (after symmetrize + dedup)\n",
        graph.vertex_count(),
        graph.edge_count()
    );

    // 2. Structural queries over the dense id space
    println!("🔍 Querying graph...");
    for v in 0..graph.vertex_count() as u32 {
        let v = VertexId(v);
        let key = graph.original_key(v)?;
        println!("  vertex {} (key {key}): degree {}", v.0, graph.degree(v)?);
        for (u, w) in graph.neighbors(v)? {
            let neighbor_key = graph.original_key(u)?;
            println!("    ↔ {neighbor_key} (weight {:?})", w);
        }
    }

    // 3. The 105-942 pair was supplied in both directions; sum reduction
    //    merged it. Rebuild with `first` to keep the original weight.
    let reduction = Reduction::from_name("first")?;
    let graph_first = GraphHandle::from_edgelist_in(
        &sources,
        &targets,
        Some(&weights),
        GraphKind::Undirected,
        reduction,
        cimiento_graph::GraphArena::unbounded(),
    )?;
    let v105 = graph_first.lookup(&105).ok_or("missing key 105")?;
    let (_, w) = graph_first
        .neighbors(v105)?
        .next()
        .ok_or("105 has no neighbors")?;
    println!("\n  with reduction=first, 105's first edge weight: {w:?}");

    // 4. Persist to Parquet and reload
    println!("\n💾 Saving to Parquet...");
    let path = std::env::temp_dir().join("cimiento_example_graph");
    graph.write_parquet(&path).await?;
    println!("  ✅ Saved to {}_edges.parquet", path.display());

    println!("\n📂 Loading from Parquet...");
    let loaded = GraphHandle::<i64>::read_parquet(&path).await?;
    println!(
        "  ✅ Loaded: {} vertices, {} edges",
        loaded.vertex_count(),
        loaded.edge_count()
    );

    assert_eq!(loaded.vertex_count(), graph.vertex_count());
    assert_eq!(loaded.edge_count(), graph.edge_count());

    println!("\n✨ Example complete!");

    Ok(())
}
