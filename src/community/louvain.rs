//! Louvain dendrogram driver.

use crate::community::aggregate::aggregate;
use crate::community::compact::compact;
use crate::community::modularity::modularity;
use crate::community::sweep::{sweep, SweepScratch};
use crate::error::{Error, Result};
use crate::graph::CsrGraph;
use crate::weight::Weight;

use std::sync::Arc;

/// Result of a Louvain run.
///
/// Carries the per-vertex cluster label of the deepest completed level of
/// the dendrogram, the modularity achieved there, and the shape of the
/// hierarchy.
#[derive(Debug, Clone)]
pub struct Clustering<W> {
    labels: Vec<u32>,
    modularity: W,
    levels: usize,
    cluster_count: usize,
}

impl<W: Weight> Clustering<W> {
    /// Cluster label of each original vertex; values lie in
    /// [0, [`cluster_count`](Self::cluster_count)).
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Consume the clustering, keeping only the label vector.
    pub fn into_labels(self) -> Vec<u32> {
        self.labels
    }

    /// Modularity of the reported clustering, conventional sign: higher
    /// is better, 0 for a trivial partition.
    pub fn modularity(&self) -> W {
        self.modularity
    }

    /// Number of dendrogram levels that moved at least one vertex.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of clusters at the deepest completed level.
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Vertices per cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.cluster_count];
        for &label in &self.labels {
            sizes[label as usize] += 1;
        }
        sizes
    }
}

/// Louvain community detection over CSR graphs.
///
/// Configuration follows the builder pattern; [`cluster`](Self::cluster)
/// runs the engine. The heavy kernels run on rayon; pass a dedicated
/// thread pool with [`with_thread_pool`](Self::with_thread_pool) to keep
/// them off the global pool.
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Safety cap on dendrogram depth.
    max_levels: usize,
    /// Minimum modularity gain for the inner loop to keep sweeping.
    tolerance: f64,
    /// Execution context for the parallel kernels.
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Louvain {
    /// Create a detector with default settings.
    pub fn new() -> Self {
        Self {
            max_levels: 32,
            tolerance: 1e-4,
            pool: None,
        }
    }

    /// Set the maximum number of dendrogram levels.
    ///
    /// A safety bound; convergence ends the run first on any realistic
    /// input.
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    /// Set the minimum per-sweep modularity improvement that keeps the
    /// inner loop running. Interpreted in the weight type of the graph.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Run the parallel kernels on `pool` instead of the global rayon
    /// pool.
    pub fn with_thread_pool(mut self, pool: Arc<rayon::ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Cluster `graph`, returning the deepest level of the dendrogram.
    ///
    /// The reported modularity uses the conventional sign: higher is
    /// better, and it is non-decreasing from level to level. The input
    /// graph is never mutated; on error no result is produced.
    pub fn cluster<W: Weight>(&self, graph: &CsrGraph<W>) -> Result<Clustering<W>> {
        match &self.pool {
            Some(pool) => pool.install(|| self.run(graph)),
            None => self.run(graph),
        }
    }

    fn run<W: Weight>(&self, graph: &CsrGraph<W>) -> Result<Clustering<W>> {
        let n0 = graph.vertex_count();
        let mut labels: Vec<u32> = (0..n0 as u32).collect();

        let m2 = graph.total_weight();
        if m2 <= W::zero() {
            // Nothing to optimize: every vertex is its own cluster.
            return Ok(Clustering {
                labels,
                modularity: W::zero(),
                levels: 0,
                cluster_count: n0,
            });
        }

        let tolerance = W::from_f64(self.tolerance);
        let mut work = graph.clone();
        let mut best_q = W::zero();
        let mut levels = 0usize;
        let mut cluster_count = n0;
        let mut scratch = SweepScratch::new(n0);

        for level in 0..self.max_levels {
            let n = work.vertex_count();
            let k = work.vertex_weights();
            // Identity clusters at level start, so Σ_c = k_c.
            let mut sigma = k.clone();
            let mut clusters: Vec<u32> = (0..n as u32).collect();

            let mut new_q = modularity(&work, &clusters, &k, &sigma, m2);
            let mut cur_q = new_q - W::one();
            while new_q > cur_q + tolerance {
                cur_q = new_q;
                let moves = sweep(&work, &k, &mut sigma, &mut clusters, m2, &mut scratch);
                new_q = modularity(&work, &clusters, &k, &sigma, m2);
                if new_q.is_nan() {
                    return Err(Error::NumericalDegeneracy { level });
                }
                log::trace!("level {level}: sweep moved {moves} vertices, Q = {new_q}");
            }

            // C was reset to the identity above, so an unchanged C means
            // no vertex moved anywhere this level: the dendrogram is done.
            if clusters.iter().enumerate().all(|(v, &c)| c == v as u32) {
                break;
            }

            best_q = new_q;
            cluster_count = compact(&mut clusters, &mut labels);
            work = aggregate(&work, cluster_count, &clusters);
            levels += 1;
            log::debug!(
                "level {level}: {n} vertices -> {cluster_count} clusters, Q = {best_q}"
            );
        }

        Ok(Clustering {
            labels,
            modularity: best_q,
            levels,
            cluster_count,
        })
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::modularity::modularity_of;
    use petgraph::graph::UnGraph;

    fn unit_edges(pairs: &[(u32, u32)]) -> Vec<(u32, u32, f64)> {
        pairs.iter().map(|&(u, v)| (u, v, 1.0)).collect()
    }

    #[test]
    fn test_triangle_collapses_to_one_cluster() {
        let g: CsrGraph<f64> = CsrGraph::from_csr(
            vec![0, 2, 4, 6],
            vec![1, 2, 0, 2, 0, 1],
            vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        )
        .unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.labels(), &[0, 0, 0]);
        assert_eq!(c.cluster_count(), 1);
        assert!(c.modularity().abs() < 1e-12);
    }

    #[test]
    fn test_two_disjoint_triangles() {
        let g: CsrGraph<f64> = CsrGraph::from_edges(
            6,
            &unit_edges(&[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]),
        )
        .unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.labels(), &[0, 0, 0, 1, 1, 1]);
        assert_eq!(c.cluster_count(), 2);
        assert_eq!(c.cluster_sizes(), vec![3, 3]);
        // Q = 1 − 2·(6/12)² = 0.5
        assert!((c.modularity() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_path_of_three_is_one_cluster() {
        let g: CsrGraph<f64> =
            CsrGraph::from_csr(vec![0, 1, 3, 4], vec![1, 0, 2, 1], vec![1.0; 4]).unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.labels(), &[0, 0, 0]);
        assert_eq!(c.cluster_count(), 1);
        assert!(c.modularity().abs() < 1e-9);
    }

    #[test]
    fn test_bowtie_splits_at_the_shared_vertex() {
        // Two triangles sharing vertex 2. The shared vertex joins the
        // triangle whose members appear first in its adjacency list.
        let g: CsrGraph<f64> = CsrGraph::from_edges(
            5,
            &unit_edges(&[(0, 1), (0, 2), (1, 2), (2, 3), (2, 4), (3, 4)]),
        )
        .unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.cluster_count(), 2);
        assert_eq!(c.labels(), &[0, 0, 0, 1, 1]);
        assert!((c.modularity() - 1.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_disconnected_pair_is_weight_independent() {
        for w in [0.25, 1.0, 100.0] {
            let g: CsrGraph<f64> =
                CsrGraph::from_edges(4, &[(0, 1, w), (2, 3, w)]).unwrap();
            let c = Louvain::new().cluster(&g).unwrap();

            assert_eq!(c.labels(), &[0, 0, 1, 1]);
            assert!((c.modularity() - 0.5).abs() < 1e-9, "w = {w}");
        }
    }

    #[test]
    fn test_degenerate_two_vertices_no_edges() {
        let g: CsrGraph<f64> = CsrGraph::from_csr(vec![0, 0, 0], vec![], vec![]).unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.levels(), 0);
        assert_eq!(c.labels(), &[0, 1]);
        assert_eq!(c.modularity(), 0.0);
    }

    #[test]
    fn test_single_vertex() {
        let g: CsrGraph<f64> = CsrGraph::from_csr(vec![0, 0], vec![], vec![]).unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.levels(), 0);
        assert_eq!(c.labels(), &[0]);
        assert_eq!(c.modularity(), 0.0);
    }

    #[test]
    fn test_single_self_loop_only() {
        let g: CsrGraph<f64> = CsrGraph::from_csr(vec![0, 1], vec![0], vec![3.0]).unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.labels(), &[0]);
        assert_eq!(c.cluster_count(), 1);
        assert_eq!(c.levels(), 0);
        assert!(c.modularity().abs() < 1e-12);
    }

    #[test]
    fn test_edgeless_graph_keeps_singletons() {
        let g: CsrGraph<f64> = CsrGraph::from_csr(vec![0; 6], vec![], vec![]).unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.levels(), 0);
        assert_eq!(c.cluster_count(), 5);
        assert_eq!(c.labels(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_disjoint_cliques_recover_exactly() {
        // K3 + K4 + K5 with uniform weights: one cluster per clique and
        // the closed-form modularity 1 − Σ(k_c/m2)².
        let mut edges = Vec::new();
        let cliques: [&[u32]; 3] = [&[0, 1, 2], &[3, 4, 5, 6], &[7, 8, 9, 10, 11]];
        for members in cliques {
            for (i, &u) in members.iter().enumerate() {
                for &v in &members[i + 1..] {
                    edges.push((u, v));
                }
            }
        }
        let g: CsrGraph<f64> = CsrGraph::from_edges(12, &unit_edges(&edges)).unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.cluster_count(), 3);
        for members in cliques {
            let first = c.labels()[members[0] as usize];
            for &v in members {
                assert_eq!(c.labels()[v as usize], first);
            }
        }

        let m2 = g.total_weight();
        let expected: f64 = 1.0
            - cliques
                .iter()
                .map(|members| {
                    let degree = (members.len() - 1) as f64;
                    let k_c = degree * members.len() as f64;
                    (k_c / m2) * (k_c / m2)
                })
                .sum::<f64>();
        assert!((c.modularity() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_reported_modularity_matches_standalone_evaluation() {
        let g: CsrGraph<f64> = CsrGraph::from_edges(
            6,
            &unit_edges(&[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)]),
        )
        .unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        let q = modularity_of(&g, c.labels()).unwrap();
        assert!((c.modularity() - q).abs() < 1e-9);
    }

    #[test]
    fn test_labels_stay_in_cluster_range() {
        let g: CsrGraph<f64> = CsrGraph::from_edges(
            8,
            &unit_edges(&[
                (0, 1),
                (1, 2),
                (2, 0),
                (3, 4),
                (4, 5),
                (5, 3),
                (6, 7),
                (2, 3),
                (5, 6),
            ]),
        )
        .unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        for &label in c.labels() {
            assert!((label as usize) < c.cluster_count());
        }
        assert_eq!(c.labels().len(), 8);
    }

    #[test]
    fn test_max_levels_zero_returns_singletons() {
        let g: CsrGraph<f64> = CsrGraph::from_edges(3, &unit_edges(&[(0, 1), (1, 2)])).unwrap();
        let c = Louvain::new().with_max_levels(0).cluster(&g).unwrap();

        assert_eq!(c.levels(), 0);
        assert_eq!(c.cluster_count(), 3);
        assert_eq!(c.labels(), &[0, 1, 2]);
    }

    #[test]
    fn test_from_petgraph_two_cliques_with_bridge() {
        let mut graph = UnGraph::<(), f64>::new_undirected();
        let nodes: Vec<_> = (0..6).map(|_| graph.add_node(())).collect();
        for (i, j) in [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)] {
            let _ = graph.add_edge(nodes[i], nodes[j], 1.0);
        }

        let g = CsrGraph::from_graph(&graph).unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.cluster_count(), 2);
        assert_eq!(c.labels()[0], c.labels()[1]);
        assert_eq!(c.labels()[1], c.labels()[2]);
        assert_eq!(c.labels()[3], c.labels()[4]);
        assert_eq!(c.labels()[4], c.labels()[5]);
        assert_ne!(c.labels()[0], c.labels()[5]);
    }

    #[test]
    fn test_single_precision_run() {
        let g: CsrGraph<f32> = CsrGraph::from_edges(
            6,
            &[
                (0, 1, 1.0f32),
                (1, 2, 1.0),
                (0, 2, 1.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (3, 5, 1.0),
            ],
        )
        .unwrap();
        let c = Louvain::new().cluster(&g).unwrap();

        assert_eq!(c.labels(), &[0, 0, 0, 1, 1, 1]);
        assert!((c.modularity() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_dedicated_thread_pool() {
        let pool = Arc::new(
            rayon::ThreadPoolBuilder::new()
                .num_threads(2)
                .build()
                .unwrap(),
        );
        let g: CsrGraph<f64> = CsrGraph::from_edges(
            6,
            &unit_edges(&[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]),
        )
        .unwrap();
        let c = Louvain::new().with_thread_pool(pool).cluster(&g).unwrap();

        assert_eq!(c.labels(), &[0, 0, 0, 1, 1, 1]);
    }
}
