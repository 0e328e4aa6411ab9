//! The local-move pass.
//!
//! One sweep visits every vertex of the current-level graph in ascending
//! id order and greedily moves it to the neighboring cluster with the
//! largest positive modularity gain. Assignments and cluster weights are
//! updated as the sweep goes, so later vertices see earlier moves. This
//! sequential order is the engine's correctness contract: it makes the
//! modularity trajectory, and therefore the final dendrogram,
//! deterministic for a fixed input.

use crate::graph::CsrGraph;
use crate::weight::Weight;

/// Scratch buffers reused across sweeps.
///
/// `cluster_weight[c]` accumulates the edge weight from the current vertex
/// into cluster c; `touched` remembers which entries are live, in
/// first-seen order, so the reset after each vertex is proportional to the
/// vertex degree rather than the cluster count.
pub(crate) struct SweepScratch<W> {
    cluster_weight: Vec<W>,
    touched: Vec<u32>,
}

impl<W: Weight> SweepScratch<W> {
    pub(crate) fn new(vertex_count: usize) -> Self {
        Self {
            cluster_weight: vec![W::zero(); vertex_count],
            touched: Vec::new(),
        }
    }
}

/// Run one local-move sweep. Returns the number of accepted moves.
///
/// For vertex v in cluster `old`, the gain of moving to a neighboring
/// cluster `new` is
///
/// ```text
/// ΔQ(v, new) = S_in(new) − (k_v/m2)·Σ_new − [ S_in(old) − (k_v/m2)·(Σ_old − k_v) ]
/// ```
///
/// with S_in(c) the weight from v to cluster c over neighbors other than v
/// itself (a self-loop never contributes to a move). The bracketed term is
/// constant across candidates, so the scan maximizes the leading part and
/// subtracts the removal cost once. Ties break to the candidate seen
/// earliest in the adjacency list, which `touched`'s first-seen order and
/// a strict comparison give for free.
pub(crate) fn sweep<W: Weight>(
    graph: &CsrGraph<W>,
    k: &[W],
    sigma: &mut [W],
    clusters: &mut [u32],
    m2: W,
    scratch: &mut SweepScratch<W>,
) -> usize {
    let mut moves = 0usize;

    for v in 0..graph.vertex_count() {
        let old = clusters[v];
        let k_v = k[v];

        // Segmented reduce of the adjacency slice: weight into each
        // neighboring cluster, self-loops excluded.
        for (u, w) in graph.neighbors(v as u32) {
            if u as usize == v {
                continue;
            }
            let c = clusters[u as usize];
            if scratch.cluster_weight[c as usize] == W::zero() && !scratch.touched.contains(&c) {
                scratch.touched.push(c);
            }
            scratch.cluster_weight[c as usize] += w;
        }

        let s_in_old = scratch.cluster_weight[old as usize];
        let removal = s_in_old - k_v / m2 * (sigma[old as usize] - k_v);

        let mut best_cluster = old;
        let mut best_gain = W::zero();
        for &c in &scratch.touched {
            if c == old {
                continue;
            }
            let gain = scratch.cluster_weight[c as usize] - k_v / m2 * sigma[c as usize] - removal;
            debug_assert!(!gain.is_nan());
            if gain > best_gain {
                best_gain = gain;
                best_cluster = c;
            }
        }

        if best_cluster != old {
            sigma[old as usize] -= k_v;
            debug_assert!(sigma[old as usize] >= -W::from_f64(1e-6) * m2);
            clusters[v] = best_cluster;
            sigma[best_cluster as usize] += k_v;
            moves += 1;
        }

        for &c in &scratch.touched {
            scratch.cluster_weight[c as usize] = W::zero();
        }
        scratch.touched.clear();
    }

    moves
}
