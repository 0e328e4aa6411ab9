//! Compressed sparse row graph storage.

use crate::error::{Error, Result};
use crate::weight::Weight;

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use rayon::prelude::*;

/// Largest vertex or edge count the engine accepts.
///
/// Ids are 32-bit; counts beyond this would overflow the offset column.
const MAX_INDEX: usize = i32::MAX as usize;

/// A weighted undirected graph in compressed sparse row form.
///
/// Three parallel buffers: `offsets` (length n+1, non-decreasing, running
/// from 0 to m), `targets` (length m, neighbor ids), and `weights`
/// (length m, finite and non-negative). Self-loops are permitted and
/// stored once.
///
/// Every public constructor validates its input; a constructed graph is
/// always well-formed.
#[derive(Debug, Clone)]
pub struct CsrGraph<W> {
    offsets: Vec<u32>,
    targets: Vec<u32>,
    weights: Vec<W>,
}

impl<W: Weight> CsrGraph<W> {
    /// Build a graph from raw CSR buffers.
    ///
    /// The buffers are taken as-is; the caller is responsible for symmetry
    /// (for every (u→v, w) there is (v→u, w)). Structural invariants
    /// (offset monotonicity and bounds, target range, weight finiteness
    /// and sign) are checked here, before any clustering work starts.
    pub fn from_csr(offsets: Vec<u32>, targets: Vec<u32>, weights: Vec<W>) -> Result<Self> {
        if offsets.len() < 2 {
            return Err(Error::EmptyGraph);
        }
        let n = offsets.len() - 1;
        let m = targets.len();
        if n > MAX_INDEX {
            return Err(Error::TooLarge { count: n });
        }
        if m > MAX_INDEX {
            return Err(Error::TooLarge { count: m });
        }
        if weights.len() != m {
            return Err(Error::ColumnLengthMismatch {
                targets: m,
                weights: weights.len(),
            });
        }
        if offsets[0] != 0 || offsets[n] as usize != m {
            return Err(Error::BadOffsetBounds {
                first: offsets[0],
                last: offsets[n],
                edge_count: m,
            });
        }
        for i in 1..offsets.len() {
            if offsets[i] < offsets[i - 1] {
                return Err(Error::OffsetsNotMonotonic { position: i });
            }
        }
        for (edge, &target) in targets.iter().enumerate() {
            if target as usize >= n {
                return Err(Error::TargetOutOfRange {
                    edge,
                    target,
                    vertex_count: n,
                });
            }
        }
        for (edge, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < W::zero() {
                return Err(Error::InvalidWeight { edge });
            }
        }
        Ok(Self {
            offsets,
            targets,
            weights,
        })
    }

    /// Build a graph from an undirected edge list.
    ///
    /// Each entry (u, v, w) is stored in both directions; a self-loop
    /// (u, u, w) is stored once. Adjacency lists keep the input edge
    /// order, so the result is deterministic for a fixed list.
    pub fn from_edges(vertex_count: usize, edges: &[(u32, u32, W)]) -> Result<Self> {
        if vertex_count == 0 {
            return Err(Error::EmptyGraph);
        }
        if vertex_count > MAX_INDEX {
            return Err(Error::TooLarge {
                count: vertex_count,
            });
        }
        if edges.len() > MAX_INDEX {
            return Err(Error::TooLarge { count: edges.len() });
        }
        for (edge, &(u, v, w)) in edges.iter().enumerate() {
            if u as usize >= vertex_count {
                return Err(Error::TargetOutOfRange {
                    edge,
                    target: u,
                    vertex_count,
                });
            }
            if v as usize >= vertex_count {
                return Err(Error::TargetOutOfRange {
                    edge,
                    target: v,
                    vertex_count,
                });
            }
            if !w.is_finite() || w < W::zero() {
                return Err(Error::InvalidWeight { edge });
            }
        }

        // Counting sort: degree pass, prefix sum, then a write-cursor pass.
        let mut degree = vec![0u32; vertex_count];
        let mut stored = 0usize;
        for &(u, v, _) in edges {
            degree[u as usize] += 1;
            stored += 1;
            if u != v {
                degree[v as usize] += 1;
                stored += 1;
            }
        }
        if stored > MAX_INDEX {
            return Err(Error::TooLarge { count: stored });
        }

        let mut offsets = vec![0u32; vertex_count + 1];
        for v in 0..vertex_count {
            offsets[v + 1] = offsets[v] + degree[v];
        }

        let mut targets = vec![0u32; stored];
        let mut weights = vec![W::zero(); stored];
        let mut cursor: Vec<u32> = offsets[..vertex_count].to_vec();
        for &(u, v, w) in edges {
            let pos = cursor[u as usize] as usize;
            targets[pos] = v;
            weights[pos] = w;
            cursor[u as usize] += 1;
            if u != v {
                let pos = cursor[v as usize] as usize;
                targets[pos] = u;
                weights[pos] = w;
                cursor[v as usize] += 1;
            }
        }

        Ok(Self {
            offsets,
            targets,
            weights,
        })
    }

    /// Build a graph from a petgraph undirected graph whose edge weights
    /// are the edge weights here.
    pub fn from_graph<N>(graph: &UnGraph<N, W>) -> Result<Self> {
        let edges: Vec<(u32, u32, W)> = graph
            .edge_references()
            .map(|e| {
                (
                    e.source().index() as u32,
                    e.target().index() as u32,
                    *e.weight(),
                )
            })
            .collect();
        Self::from_edges(graph.node_count(), &edges)
    }

    /// Assemble a graph from buffers the engine itself produced.
    ///
    /// Skips validation; only the contraction step uses this.
    pub(crate) fn from_parts(offsets: Vec<u32>, targets: Vec<u32>, weights: Vec<W>) -> Self {
        debug_assert!(!offsets.is_empty());
        debug_assert_eq!(offsets[0], 0);
        debug_assert_eq!(*offsets.last().unwrap() as usize, targets.len());
        debug_assert_eq!(targets.len(), weights.len());
        Self {
            offsets,
            targets,
            weights,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of stored edges (each undirected edge counts twice, a
    /// self-loop once).
    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }

    /// Bounds of vertex `v`'s adjacency slice.
    #[inline]
    pub(crate) fn row_bounds(&self, v: usize) -> (usize, usize) {
        (self.offsets[v] as usize, self.offsets[v + 1] as usize)
    }

    /// Adjacency of vertex `v` as (target, weight) pairs, in storage order.
    pub fn neighbors(&self, v: u32) -> impl Iterator<Item = (u32, W)> + '_ {
        let (start, end) = self.row_bounds(v as usize);
        self.targets[start..end]
            .iter()
            .zip(&self.weights[start..end])
            .map(|(&t, &w)| (t, w))
    }

    /// Sum of incident edge weights per vertex.
    ///
    /// Each vertex sums its own adjacency slice; vertices are independent,
    /// so this is a flat parallel map.
    pub fn vertex_weights(&self) -> Vec<W> {
        (0..self.vertex_count())
            .into_par_iter()
            .map(|v| {
                let (start, end) = self.row_bounds(v);
                self.weights[start..end].iter().copied().sum()
            })
            .collect()
    }

    /// Sum of all stored edge weights.
    ///
    /// For a symmetric graph this is twice the total undirected edge
    /// weight (self-loops counted once), the `m2` of the modularity
    /// formulas.
    pub fn total_weight(&self) -> W {
        self.weights.par_iter().copied().sum()
    }

    pub(crate) fn targets(&self) -> &[u32] {
        &self.targets
    }

    pub(crate) fn weights(&self) -> &[W] {
        &self.weights
    }
}
