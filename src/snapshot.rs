//! Read-back outputs of a relaxation step.

use std::fmt;

use ndarray::Array2;
use serde::Serialize;

use crate::errors::InputList;
use crate::geometry::{Line, Point, TriangleMesh};
use crate::node::NodeKind;

/// Non-fatal remark produced while building or stepping a structure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Advisory {
    /// A single input value was copied for every spring or node.
    Broadcast {
        /// List that was broadcast.
        list: InputList,
        /// Number of springs or nodes that received the value.
        count: usize,
    },
    /// A node has more than three incident bars.
    StaticallyIndeterminate {
        /// Index of the node.
        node: usize,
        /// Number of incident bars.
        valency: usize,
    },
    /// A point load landed on a node that cannot carry imposed loads.
    IgnoredLoad {
        /// Index of the node.
        node: usize,
        /// Kind of the node.
        kind: NodeKind,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Broadcast { list, count } => write!(
                f,
                "single value {list} copied for all {count} {}s",
                list.target()
            ),
            Self::StaticallyIndeterminate { node, valency } => write!(
                f,
                "node {node} has valency {valency} > 3; the system is not statically determinate"
            ),
            Self::IgnoredLoad { node, kind } => {
                write!(f, "load on node {node} ignored: {kind:?} nodes carry no imposed loads")
            }
        }
    }
}

/// State of every node and bar after a relaxation step.
///
/// Node-wise vectors are indexed by node index and bar-wise vectors by bar
/// index, matching the order of the input lists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    /// Number of steps since the last rebuild.
    pub iteration: u64,
    /// Relaxed node positions.
    pub positions: Vec<Point>,
    /// Number of bars incident to each node.
    pub valencies: Vec<usize>,
    /// Mass applied to each node during the step.
    pub masses: Vec<f64>,
    /// Relaxed bar geometry.
    pub bars: Vec<Line>,
    /// Axial force in each bar, positive in tension.
    pub tensions: Vec<f64>,
    /// Axial stress in each bar.
    pub stresses: Vec<f64>,
    /// Neighbour indices grouped by node.
    pub neighbors: Vec<Vec<usize>>,
    /// Tributary triangle of each node with exactly three neighbours.
    ///
    /// With area-based mass this is the triangle that produced the node's mass.
    pub meshes: Vec<Option<TriangleMesh>>,
    /// Remarks raised while producing this snapshot.
    pub advisories: Vec<Advisory>,
}

impl Snapshot {
    /// Node coordinates as an `n × 3` matrix.
    ///
    /// # Examples
    /// ```
    /// use funicular::{line, point, ModelInput, Session, StepParameters};
    ///
    /// let input = ModelInput {
    ///     nodes: vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)],
    ///     springs: vec![line(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0))],
    ///     ..ModelInput::default()
    /// };
    /// let mut session = Session::new();
    /// let snapshot = session
    ///     .step(&input, &StepParameters::default())
    ///     .expect("valid input");
    /// assert_eq!(snapshot.coordinates().dim(), (2, 3));
    /// ```
    #[must_use]
    pub fn coordinates(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.positions.len(), 3), |(row, axis)| {
            let position = self.positions[row];
            match axis {
                0 => position.x,
                1 => position.y,
                _ => position.z,
            }
        })
    }

    /// Sum of all nodal masses.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.masses.iter().sum()
    }

    /// Index and value of the bar force with the largest magnitude.
    #[must_use]
    pub fn peak_tension(&self) -> Option<(usize, f64)> {
        self.tensions
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{line, point};

    fn snapshot() -> Snapshot {
        Snapshot {
            iteration: 3,
            positions: vec![point(0.0, 1.0, 2.0), point(3.0, 4.0, 5.0)],
            valencies: vec![1, 1],
            masses: vec![0.5, 1.5],
            bars: vec![line(point(0.0, 1.0, 2.0), point(3.0, 4.0, 5.0))],
            tensions: vec![-2.0],
            stresses: vec![-2.0],
            neighbors: vec![vec![1], vec![0]],
            meshes: vec![None, None],
            advisories: Vec::new(),
        }
    }

    #[test]
    fn coordinates_follow_node_order() {
        let coordinates = snapshot().coordinates();
        assert_eq!(coordinates[[0, 2]], 2.0);
        assert_eq!(coordinates[[1, 0]], 3.0);
        assert_eq!(coordinates.column(1).to_vec(), vec![1.0, 4.0]);
    }

    #[test]
    fn summaries_pick_expected_values() {
        let snapshot = snapshot();
        assert_eq!(snapshot.total_mass(), 2.0);
        assert_eq!(snapshot.peak_tension(), Some((0, -2.0)));
    }

    #[test]
    fn advisories_render_for_users() {
        let broadcast = Advisory::Broadcast {
            list: InputList::Stiffnesses,
            count: 4,
        };
        assert_eq!(
            broadcast.to_string(),
            "single value stiffness copied for all 4 springs"
        );
        let indeterminate = Advisory::StaticallyIndeterminate {
            node: 2,
            valency: 4,
        };
        assert!(indeterminate.to_string().starts_with("node 2 has valency 4"));
        let ignored = Advisory::IgnoredLoad {
            node: 1,
            kind: NodeKind::Fixed,
        };
        assert_eq!(
            ignored.to_string(),
            "load on node 1 ignored: Fixed nodes carry no imposed loads"
        );
    }
}
