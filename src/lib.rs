//! # crag
//!
//! Parallel Louvain community detection over weighted CSR graphs.
//!
//! The engine takes an undirected weighted graph in compressed sparse row
//! form and produces a hierarchical clustering: the per-vertex cluster
//! label of the deepest dendrogram level, together with the modularity
//! achieved there. Bulk kernels (vertex weights, modularity, contraction)
//! run data-parallel on rayon; the greedy local-move sweep is sequential,
//! which makes results deterministic for a fixed input.
//!
//! ```rust
//! use crag::{CsrGraph, Louvain};
//!
//! let g: CsrGraph<f64> =
//!     CsrGraph::from_edges(4, &[(0, 1, 1.0), (2, 3, 1.0)]).unwrap();
//! let clustering = Louvain::new().cluster(&g).unwrap();
//!
//! assert_eq!(clustering.labels(), &[0, 0, 1, 1]);
//! assert!((clustering.modularity() - 0.5).abs() < 1e-9);
//! ```

pub mod community;
pub mod error;
pub mod graph;
mod weight;

pub use crate::community::{modularity_of, Clustering, Louvain};
pub use crate::error::{Error, Result};
pub use crate::graph::CsrGraph;
pub use crate::weight::Weight;
