use core::fmt;

/// Result alias for `crag`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by graph construction and the clustering engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Graph has no vertices.
    EmptyGraph,

    /// CSR offset array decreases somewhere.
    OffsetsNotMonotonic {
        /// Index of the first offending offset.
        position: usize,
    },

    /// CSR offset array does not start at 0 or end at the edge count.
    BadOffsetBounds {
        /// First offset value.
        first: u32,
        /// Last offset value.
        last: u32,
        /// Number of stored edges.
        edge_count: usize,
    },

    /// Lengths of the target and weight columns disagree.
    ColumnLengthMismatch {
        /// Length of the target column.
        targets: usize,
        /// Length of the weight column.
        weights: usize,
    },

    /// Edge target is not a valid vertex id.
    TargetOutOfRange {
        /// Edge position in the target column.
        edge: usize,
        /// Offending target id.
        target: u32,
        /// Number of vertices.
        vertex_count: usize,
    },

    /// Edge weight is negative or non-finite.
    InvalidWeight {
        /// Edge position in the weight column.
        edge: usize,
    },

    /// Vertex or edge count exceeds the 32-bit id space.
    TooLarge {
        /// Offending count.
        count: usize,
    },

    /// Label vector length does not match the graph.
    LabelLengthMismatch {
        /// Expected length (vertex count).
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// Modularity became NaN mid-run.
    NumericalDegeneracy {
        /// Dendrogram level at which the degeneracy appeared.
        level: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyGraph => write!(f, "graph has no vertices"),
            Error::OffsetsNotMonotonic { position } => {
                write!(f, "offset array decreases at position {position}")
            }
            Error::BadOffsetBounds {
                first,
                last,
                edge_count,
            } => write!(
                f,
                "offsets must run from 0 to the edge count: found {first}..{last} with {edge_count} edges"
            ),
            Error::ColumnLengthMismatch { targets, weights } => write!(
                f,
                "target and weight columns differ in length: {targets} vs {weights}"
            ),
            Error::TargetOutOfRange {
                edge,
                target,
                vertex_count,
            } => write!(
                f,
                "edge {edge} targets vertex {target}, but the graph has {vertex_count} vertices"
            ),
            Error::InvalidWeight { edge } => {
                write!(f, "edge {edge} has a negative or non-finite weight")
            }
            Error::TooLarge { count } => {
                write!(f, "{count} exceeds the 32-bit id space")
            }
            Error::LabelLengthMismatch { expected, found } => {
                write!(f, "label vector has length {found}, expected {expected}")
            }
            Error::NumericalDegeneracy { level } => {
                write!(f, "modularity became NaN at dendrogram level {level}")
            }
        }
    }
}

impl std::error::Error for Error {}
