//! Edge symmetrization: directed edge lists to undirected equivalents
//!
//! For every edge (u, v, w) the output contains both (u, v) and (v, u)
//! exactly once. When the caller already supplied both directions (common
//! with pre-symmetrized data), the duplicates are merged with a
//! [`Reduction`] policy rather than doubled. Self-loops pass through once.
//!
//! Merging is keyed on the unordered pair {u, v}, so the logical edge set
//! and merged weights never depend on hash iteration order; the output is
//! emitted sorted by (src, dst) to keep the physical ordering deterministic
//! as well.

use std::collections::HashMap;

use crate::structure::edges::{EdgeList, Reduction, VertexId};

/// Produce the undirected equivalent of `edges`.
///
/// Every unordered pair {u, v} observed in the input appears as the two rows
/// (u, v) and (v, u) in the output; self-loops appear as a single row. All
/// input multiplicity of a pair is merged into one weight via `reduction`
/// (unweighted lists simply deduplicate).
///
/// Idempotent: symmetrizing an already-symmetric list leaves the logical
/// edge set unchanged (with [`Reduction::Sum`], weights of a symmetric input
/// are preserved only if each direction carries half the total; use
/// [`Reduction::First`] or [`Reduction::Max`] when re-symmetrizing).
#[must_use]
pub fn symmetrize(edges: &EdgeList, reduction: Reduction) -> EdgeList {
    let merged = merge_pairs(edges, reduction);

    // Mirror each pair, then sort rows for a deterministic physical layout.
    let mut rows: Vec<(u32, u32, Option<f32>)> = Vec::with_capacity(merged.len() * 2);
    for (&(a, b), &w) in &merged {
        rows.push((a, b, w));
        if a != b {
            rows.push((b, a, w));
        }
    }
    rows.sort_unstable_by_key(|&(src, dst, _)| (src, dst));

    let sources = rows.iter().map(|&(src, _, _)| VertexId(src)).collect();
    let targets = rows.iter().map(|&(_, dst, _)| VertexId(dst)).collect();
    let weights = if edges.weights().is_some() {
        Some(rows.iter().map(|&(_, _, w)| w.unwrap_or(1.0)).collect())
    } else {
        None
    };

    EdgeList::from_parts(sources, targets, weights)
}

/// Collapse all multiplicity of each unordered pair into one merged weight.
///
/// Input rows are scanned in order so [`Reduction::First`] is well-defined.
fn merge_pairs(edges: &EdgeList, reduction: Reduction) -> HashMap<(u32, u32), Option<f32>> {
    let mut merged: HashMap<(u32, u32), Option<f32>> = HashMap::with_capacity(edges.len());

    for (src, dst, weight) in edges.iter() {
        let pair = if src.0 <= dst.0 {
            (src.0, dst.0)
        } else {
            (dst.0, src.0)
        };
        merged
            .entry(pair)
            .and_modify(|acc| {
                if let (Some(a), Some(w)) = (*acc, weight) {
                    *acc = Some(reduction.merge(a, w));
                }
            })
            .or_insert(weight);
    }

    merged
}
