//! Error types produced while building, editing or relaxing a structure.

use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::Serialize;
use thiserror::Error;

/// Input list that is validated against the node or spring count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum InputList {
    /// Per-spring stiffness constants.
    Stiffnesses,
    /// Per-spring natural lengths.
    NaturalLengths,
    /// Per-node mass densities.
    MassDensities,
}

impl InputList {
    /// Name of the collection the list must match.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Stiffnesses | Self::NaturalLengths => "spring",
            Self::MassDensities => "node",
        }
    }
}

impl fmt::Display for InputList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stiffnesses => "stiffness",
            Self::NaturalLengths => "natural length",
            Self::MassDensities => "mass density",
        };
        f.write_str(name)
    }
}

/// Error returned when the supplied input lists cannot describe a structure.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InputError {
    /// Returned when a list neither matches its target count nor holds a single value.
    #[error(
        "{list} list count must be either equal to the {} count ({expected}) or a single value (received {received})",
        .list.target()
    )]
    CountMismatch {
        /// Offending list.
        list: InputList,
        /// Number of springs or nodes the list must match.
        expected: usize,
        /// Number of entries supplied.
        received: usize,
    },
    /// Returned when the mass type tag is not 0, 1 or 2.
    #[error("mass type {0} is not one of 0 (constant), 1 (length based) or 2 (area based)")]
    UnknownMassType(i64),
}

/// Error returned when spring segments cannot be wired onto the node set.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TopologyError {
    /// Returned when springs are supplied without any nodes to attach to.
    #[error("spring {segment} cannot be attached because the structure has no nodes")]
    NoNodes {
        /// Index of the spring segment in the input list.
        segment: usize,
    },
    /// Returned when both endpoints of a spring resolve to the same node.
    #[error("spring {segment} starts and ends at node {node}")]
    CollapsedSegment {
        /// Index of the spring segment in the input list.
        segment: usize,
        /// Index of the node both endpoints resolved to.
        node: usize,
    },
    /// Returned when a bar would connect a node to itself.
    #[error("bar cannot start and end at node {0:?}")]
    SelfLoop(NodeIndex),
    /// Returned when a bar would connect two distinct nodes at the same position.
    #[error("bar between {start:?} and {end:?} has zero length")]
    ZeroLengthBar {
        /// Start node of the rejected bar.
        start: NodeIndex,
        /// End node of the rejected bar.
        end: NodeIndex,
    },
    /// Returned when a spring endpoint lies further than the snap tolerance from every node.
    #[error("spring {segment} endpoint is {distance} from the nearest node (tolerance {tolerance})")]
    DistantEndpoint {
        /// Index of the spring segment in the input list.
        segment: usize,
        /// Distance to the nearest node.
        distance: f64,
        /// Configured snap tolerance.
        tolerance: f64,
    },
    /// Returned when a bar references a node handle that is not part of the structure.
    #[error("node {0:?} does not exist in this structure")]
    UnknownNode(NodeIndex),
}

/// Error returned when a trigger cannot produce a relaxation step.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StepError {
    /// Returned when the input lists are inconsistent.
    #[error(transparent)]
    Input(#[from] InputError),
    /// Returned when the springs cannot be attached to the nodes.
    #[error(transparent)]
    Topology(#[from] TopologyError),
    /// Returned when a freshly built bar or node handle cannot be edited.
    #[error(transparent)]
    Edit(#[from] EditError),
    /// Returned when the structure has fewer than two nodes.
    #[error("not enough nodes to relax: at least 2 are required (received {count})")]
    InsufficientNodes {
        /// Number of nodes available.
        count: usize,
    },
}

/// Error returned when editing a live [`Structure`](crate::Structure) with invalid handles.
///
/// # Examples
///
/// ```
/// use petgraph::graph::EdgeIndex;
/// use funicular::{EditError, MassStrategy, Structure};
///
/// let mut structure = Structure::new(MassStrategy::Constant);
/// let stale = EdgeIndex::new(3);
/// let error = structure.retune(stale, 2.0).expect_err("unknown bar is rejected");
/// assert_eq!(error, EditError::UnknownBar(stale));
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// Returned when a node cannot be found in the structure.
    #[error("node {0:?} does not exist in this structure")]
    UnknownNode(NodeIndex),
    /// Returned when a bar cannot be found in the structure.
    #[error("bar {0:?} does not exist in this structure")]
    UnknownBar(EdgeIndex),
    /// Returned when a load is attached to a pinned, fixed or roller node.
    #[error("node {0:?} is restrained and cannot carry an imposed load")]
    RestrainedNode(NodeIndex),
}
