//! Community detection by modularity maximization.
//!
//! Given a weighted undirected graph, find groupings where vertices within
//! a group are densely connected and connections between groups are sparse.
//!
//! ## The Modularity Objective
//!
//! The engine maximizes **modularity** Q, which compares the edge weight
//! inside communities to the weight expected in a random graph with the
//! same weighted degree sequence:
//!
//! ```text
//! Q = (1/2m) × Σ[A_ij - (k_i × k_j)/(2m)] × δ(c_i, c_j)
//! ```
//!
//! Where:
//! - 2m = total stored edge weight (each undirected edge counted twice)
//! - A_ij = edge weight between i and j
//! - k_i = weighted degree of vertex i
//! - δ(c_i, c_j) = 1 if i and j share a community
//!
//! **Intuition**: for each pair in the same community, add (actual weight) -
//! (expected weight). A good partition has Q > 0, meaning more internal
//! weight than chance would give. Q lies in [-1/2, 1].
//!
//! ## The Algorithm (Blondel et al. 2008)
//!
//! Louvain is a multi-level, greedy modularity optimizer:
//!
//! 1. **Local moving**: start with each vertex in its own community.
//!    Sweep the vertices in ascending id order, moving each to the
//!    neighboring community with the highest positive modularity gain,
//!    until a sweep improves Q by less than the tolerance.
//!
//! 2. **Contraction**: renumber the surviving communities densely, then
//!    build a super-vertex graph where each community becomes one vertex.
//!    Parallel edges are merged by summing weights; intra-community edges
//!    become self-loops, so total edge weight is preserved.
//!
//! 3. **Iterate**: repeat on the contracted graph until a level ends with
//!    no vertex having moved.
//!
//! The per-vertex labels of the finest level, composed through every
//! contraction, are the result: the deepest cut of the dendrogram.
//!
//! ## Parallelism
//!
//! Vertex weights, the modularity evaluation, and the contraction sort are
//! bulk data-parallel kernels (rayon). The local-move sweep itself is
//! sequential over vertex ids: each vertex sees the most recent assignments
//! of its neighbors, which keeps the modularity trajectory deterministic
//! for a fixed input.
//!
//! ## Usage
//!
//! ```rust
//! use crag::{CsrGraph, Louvain};
//!
//! // Two triangles, no connection between them.
//! let g: CsrGraph<f64> = CsrGraph::from_edges(
//!     6,
//!     &[
//!         (0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0),
//!         (3, 4, 1.0), (4, 5, 1.0), (3, 5, 1.0),
//!     ],
//! )
//! .unwrap();
//!
//! let clustering = Louvain::new().cluster(&g).unwrap();
//! assert_eq!(clustering.cluster_count(), 2);
//! assert!((clustering.modularity() - 0.5).abs() < 1e-9);
//! ```
//!
//! ## References
//!
//! Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! Journal of Statistical Mechanics: Theory and Experiment, P10008.

mod aggregate;
mod compact;
mod louvain;
mod modularity;
mod sweep;

pub use louvain::{Clustering, Louvain};
pub use modularity::modularity_of;
