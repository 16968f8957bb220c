//! Input lists and the build phase that turns them into a [`Structure`].

use nalgebra::Vector3;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::errors::{InputError, InputList, StepError};
use crate::geometry::{Line, Point};
use crate::mass::MassStrategy;
use crate::node::{Node, NodeKind};
use crate::snapshot::Advisory;
use crate::structure::Structure;
use crate::topology::snap_segments;

/// An imposed force attached to the node nearest `position`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    /// Where the load acts.
    pub position: Point,
    /// Force components added to the node every step.
    pub force: [f64; 3],
}

/// Everything needed to build a structure.
///
/// Per-spring and per-node lists must either match their target count or
/// hold a single value, which is then copied for every spring or node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInput {
    /// Node positions.
    pub nodes: Vec<Point>,
    /// Spring segments; their endpoints snap to the nearest node.
    pub springs: Vec<Line>,
    /// Support points; matching nodes are pinned.
    pub supports: Vec<Point>,
    /// Roller points; matching nodes slide in their horizontal plane.
    pub rollers: Vec<Point>,
    /// Fixed points; matching nodes are fully restrained.
    pub fixed: Vec<Point>,
    /// Point loads; matching free nodes carry the force every step.
    pub loads: Vec<PointLoad>,
    /// Spring constants. Default: `[0.1]`.
    pub stiffnesses: Vec<f64>,
    /// Rest lengths, `-1` adopting the initial length. Default: `[0.0]`.
    pub natural_lengths: Vec<f64>,
    /// Nodal mass densities. Default: `[1.0]`.
    pub mass_densities: Vec<f64>,
    /// Mass strategy tag: 0 constant, 1 length based, 2 area based. Default: 1.
    pub mass_type: i64,
    /// Distance within which a node matches a support, roller, fixed or load point.
    pub support_tolerance: f64,
    /// Maximum distance between a spring endpoint and its node, unchecked when absent.
    pub snap_tolerance: Option<f64>,
}

impl Default for ModelInput {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            springs: Vec::new(),
            supports: Vec::new(),
            rollers: Vec::new(),
            fixed: Vec::new(),
            loads: Vec::new(),
            stiffnesses: vec![0.1],
            natural_lengths: vec![0.0],
            mass_densities: vec![1.0],
            mass_type: MassStrategy::LengthBased.tag(),
            support_tolerance: 0.001,
            snap_tolerance: None,
        }
    }
}

/// Expand `values` to `count` entries.
///
/// A single value is copied `count` times and reported as an advisory.
fn broadcast(
    values: &[f64],
    list: InputList,
    count: usize,
    advisories: &mut Vec<Advisory>,
) -> Result<Vec<f64>, InputError> {
    match values {
        _ if values.len() == count => Ok(values.to_vec()),
        [_] if count == 0 => Ok(Vec::new()),
        [value] => {
            let advisory = Advisory::Broadcast { list, count };
            ftlog::info!("{advisory}");
            advisories.push(advisory);
            Ok(vec![*value; count])
        }
        _ => Err(InputError::CountMismatch {
            list,
            expected: count,
            received: values.len(),
        }),
    }
}

impl ModelInput {
    /// Mass strategy selected by `mass_type`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::UnknownMassType`] for tags other than 0, 1 or 2.
    pub fn mass_strategy(&self) -> Result<MassStrategy, InputError> {
        MassStrategy::try_from(self.mass_type)
    }

    /// Whether `position` lies within the support tolerance of any of `points`.
    fn matches(&self, points: &[Point], position: Point) -> bool {
        points
            .iter()
            .any(|point| point.distance_to(position) <= self.support_tolerance)
    }

    /// Kind and imposed load of the node at `position`.
    ///
    /// Fixed points take precedence over supports, supports over rollers and
    /// rollers over loads. Loads near the same node are summed.
    fn classify(&self, position: Point) -> (NodeKind, Option<Vector3<f64>>) {
        let mut load: Option<Vector3<f64>> = None;
        for point_load in &self.loads {
            if point_load.position.distance_to(position) <= self.support_tolerance {
                *load.get_or_insert_with(Vector3::zeros) += Vector3::from(point_load.force);
            }
        }
        let kind = if self.matches(&self.fixed, position) {
            NodeKind::Fixed
        } else if self.matches(&self.supports, position) {
            NodeKind::Pinned
        } else if self.matches(&self.rollers, position) {
            NodeKind::Roller
        } else if load.is_some() {
            NodeKind::Loaded
        } else {
            NodeKind::Free
        };
        (kind, load)
    }

    /// Validate the lists and build nodes, bars and neighbour topology.
    ///
    /// Nothing is built unless every list is valid, so a failed build has no
    /// side effects.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Input`] for inconsistent lists and
    /// [`StepError::Topology`] when springs cannot be wired onto the nodes.
    ///
    /// # Examples
    /// ```
    /// use funicular::{line, point, ModelInput};
    ///
    /// let input = ModelInput {
    ///     nodes: vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0), point(2.0, 0.0, 0.0)],
    ///     springs: vec![
    ///         line(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)),
    ///         line(point(1.0, 0.0, 0.0), point(2.0, 0.0, 0.0)),
    ///     ],
    ///     supports: vec![point(0.0, 0.0, 0.0), point(2.0, 0.0, 0.0)],
    ///     ..ModelInput::default()
    /// };
    /// let (structure, advisories) = input.build().expect("valid input");
    /// assert_eq!(structure.bar_count(), 2);
    /// assert_eq!(advisories.len(), 3);
    /// ```
    pub fn build(&self) -> Result<(Structure, Vec<Advisory>), StepError> {
        let strategy = self.mass_strategy()?;
        let mut advisories = Vec::new();
        let stiffnesses = broadcast(
            &self.stiffnesses,
            InputList::Stiffnesses,
            self.springs.len(),
            &mut advisories,
        )?;
        let natural_lengths = broadcast(
            &self.natural_lengths,
            InputList::NaturalLengths,
            self.springs.len(),
            &mut advisories,
        )?;
        let densities = broadcast(
            &self.mass_densities,
            InputList::MassDensities,
            self.nodes.len(),
            &mut advisories,
        )?;
        let segments = snap_segments(&self.nodes, &self.springs, self.snap_tolerance)?;

        let mut structure = Structure::new(strategy);
        for (index, (position, density)) in self.nodes.iter().zip(densities).enumerate() {
            let (kind, load) = self.classify(*position);
            let mut node = Node::new(*position, kind, density);
            if let Some(load) = load {
                if !node.set_load(load) {
                    let advisory = Advisory::IgnoredLoad { node: index, kind };
                    ftlog::warn!("{advisory}");
                    advisories.push(advisory);
                }
            }
            structure.insert_node(node);
        }
        for ((segment, stiffness), natural_length) in
            segments.iter().zip(stiffnesses).zip(natural_lengths)
        {
            let bar = structure.add_bar(
                NodeIndex::new(segment.start),
                NodeIndex::new(segment.end),
                stiffness,
            )?;
            structure.set_natural_length(bar, natural_length)?;
        }
        structure.rebuild_neighbors();
        ftlog::info!(
            "built {} structure with {} nodes and {} bars",
            strategy,
            structure.node_count(),
            structure.bar_count()
        );
        Ok((structure, advisories))
    }
}
