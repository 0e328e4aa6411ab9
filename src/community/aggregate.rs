//! Super-vertex graph contraction.
//!
//! After compaction each cluster becomes one vertex of the next level.
//! The contraction runs as bulk steps over the edge set: expand every row
//! into (source, target, weight) triples with both endpoints remapped
//! through the cluster vector, stable-sort the triples by endpoint pair,
//! merge runs of equal pairs by summing weights, and rebuild the offset
//! column. Intra-cluster edges turn into self-loops, so the total stored
//! edge weight of the level is preserved.

use crate::graph::CsrGraph;
use crate::weight::Weight;

use rayon::prelude::*;

/// Contract `graph` so that each of the `cluster_count` dense clusters in
/// `clusters` becomes a single vertex. Parallel edges (including the
/// self-loops formed from intra-cluster edges) are merged by summing
/// weights.
///
/// The sort is stable, so for a fixed input ordering the contracted graph
/// is deterministic down to the adjacency order.
pub(crate) fn aggregate<W: Weight>(
    graph: &CsrGraph<W>,
    cluster_count: usize,
    clusters: &[u32],
) -> CsrGraph<W> {
    // Row expansion fused with the endpoint remap; collect keeps the
    // original edge order.
    let mut edges: Vec<(u32, u32, W)> = (0..graph.vertex_count())
        .into_par_iter()
        .flat_map_iter(|v| {
            let (start, end) = graph.row_bounds(v);
            let source = clusters[v];
            graph.targets()[start..end]
                .iter()
                .zip(&graph.weights()[start..end])
                .map(move |(&t, &w)| (source, clusters[t as usize], w))
        })
        .collect();

    edges.par_sort_by_key(|&(s, t, _)| (s, t));

    // Reduce-by-key over adjacent equal pairs.
    let mut reduced: Vec<(u32, u32, W)> = Vec::with_capacity(edges.len().min(cluster_count * 8));
    for (s, t, w) in edges {
        match reduced.last_mut() {
            Some(last) if last.0 == s && last.1 == t => last.2 += w,
            _ => reduced.push((s, t, w)),
        }
    }

    let mut offsets = vec![0u32; cluster_count + 1];
    for &(s, _, _) in &reduced {
        offsets[s as usize + 1] += 1;
    }
    for c in 0..cluster_count {
        offsets[c + 1] += offsets[c];
    }

    let mut targets = Vec::with_capacity(reduced.len());
    let mut weights = Vec::with_capacity(reduced.len());
    for (_, t, w) in reduced {
        targets.push(t);
        weights.push(w);
    }

    CsrGraph::from_parts(offsets, targets, weights)
}
