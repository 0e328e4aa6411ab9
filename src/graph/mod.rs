//! Graph representation for the clustering engine.
//!
//! The engine operates on [`CsrGraph`], an owning compressed-sparse-row
//! value: an offset array of length n+1 and a parallel (target, weight)
//! column pair of length m, where the adjacency of vertex v is the slice
//! `targets[offsets[v]..offsets[v+1]]`.
//!
//! Graphs are undirected by convention: for every stored edge (u→v, w) the
//! caller must also store (v→u, w). The convenience constructors
//! ([`CsrGraph::from_edges`], [`CsrGraph::from_graph`]) take care of this
//! symmetrization; [`CsrGraph::from_csr`] trusts the caller and validates
//! only the per-entry invariants.

mod csr;

pub use csr::CsrGraph;
