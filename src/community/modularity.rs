//! Modularity evaluation.
//!
//! The evaluator works on the per-vertex "energy" form of the objective:
//! each vertex contributes the weight it sends outside its own community,
//! minus the null-model expectation for the rest of the graph. Summing the
//! contributions and negating recovers the conventional higher-is-better
//! modularity of the partition.

use crate::error::{Error, Result};
use crate::graph::CsrGraph;
use crate::weight::Weight;

use rayon::prelude::*;

/// Modularity of the clustering described by `clusters`, given the vertex
/// weights `k`, the cluster weights `sigma`, and the total stored edge
/// weight `m2`.
///
/// Computes
///
/// ```text
/// E = Σ_v [ A_v − k_v · (m2 − Σ_{C[v]}) / m2 ]
/// ```
///
/// where A_v is the weight of edges leaving v's cluster, and reports
/// −E / m2: the conventional modularity, higher is better. Per-vertex
/// contributions are independent, so this is a parallel map with a sum
/// reduction.
pub(crate) fn modularity<W: Weight>(
    graph: &CsrGraph<W>,
    clusters: &[u32],
    k: &[W],
    sigma: &[W],
    m2: W,
) -> W {
    let energy: W = (0..graph.vertex_count())
        .into_par_iter()
        .map(|v| {
            let cluster = clusters[v];
            let mut external = W::zero();
            for (u, w) in graph.neighbors(v as u32) {
                if clusters[u as usize] != cluster {
                    external += w;
                }
            }
            external - k[v] * (m2 - sigma[cluster as usize]) / m2
        })
        .sum();
    -(energy / m2)
}

/// Modularity of an arbitrary vertex labeling on `graph`.
///
/// `labels[v]` is the community of vertex v; labels need not be dense.
/// Returns 0 for a graph without edge weight. Useful for scoring a
/// clustering produced elsewhere, and for cross-checking the value
/// reported by [`Louvain::cluster`](crate::Louvain::cluster).
pub fn modularity_of<W: Weight>(graph: &CsrGraph<W>, labels: &[u32]) -> Result<W> {
    let n = graph.vertex_count();
    if labels.len() != n {
        return Err(Error::LabelLengthMismatch {
            expected: n,
            found: labels.len(),
        });
    }
    let m2 = graph.total_weight();
    if m2 <= W::zero() {
        return Ok(W::zero());
    }

    let k = graph.vertex_weights();
    let top = labels.iter().copied().max().unwrap_or(0) as usize;
    let mut sigma = vec![W::zero(); top + 1];
    for (v, &c) in labels.iter().enumerate() {
        sigma[c as usize] += k[v];
    }
    Ok(modularity(graph, labels, &k, &sigma, m2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> CsrGraph<f64> {
        CsrGraph::from_csr(vec![0, 2, 4, 6], vec![1, 2, 0, 2, 0, 1], vec![1.0; 6]).unwrap()
    }

    #[test]
    fn test_singleton_partition_of_triangle() {
        // Every vertex alone: Q = -Σ (k_v/m2)² = -3·(1/3)² = -1/3.
        let g = triangle();
        let q = modularity_of(&g, &[0, 1, 2]).unwrap();
        assert!((q - (-1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_whole_graph_in_one_cluster() {
        let g = triangle();
        let q = modularity_of(&g, &[0, 0, 0]).unwrap();
        assert!(q.abs() < 1e-12);
    }

    #[test]
    fn test_two_triangles_split() {
        let g: CsrGraph<f64> = CsrGraph::from_edges(
            6,
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (0, 2, 1.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (3, 5, 1.0),
            ],
        )
        .unwrap();
        let q = modularity_of(&g, &[0, 0, 0, 1, 1, 1]).unwrap();
        assert!((q - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_labels_need_not_be_dense() {
        let g = triangle();
        let dense = modularity_of(&g, &[0, 0, 1]).unwrap();
        let sparse = modularity_of(&g, &[7, 7, 2]).unwrap();
        assert!((dense - sparse).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let g = triangle();
        let r = modularity_of(&g, &[0, 0]);
        assert_eq!(
            r.unwrap_err(),
            Error::LabelLengthMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_edgeless_graph_scores_zero() {
        let g: CsrGraph<f64> = CsrGraph::from_csr(vec![0, 0, 0], vec![], vec![]).unwrap();
        assert_eq!(modularity_of(&g, &[0, 1]).unwrap(), 0.0);
    }
}
