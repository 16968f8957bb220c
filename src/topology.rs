//! Topology import: wiring spring segments onto the nearest nodes.
//!
//! Springs arrive as free line segments. Before any bar is created, each
//! segment endpoint is resolved to the geometrically closest node. Keeping
//! this pass separate from bar construction makes miswired or degenerate
//! snaps visible as typed errors instead of silent topology changes.

use crate::errors::TopologyError;
use crate::geometry::{Line, Point};

/// Result of snapping one spring segment onto the node set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnappedSegment {
    /// Index of the node nearest the segment start.
    pub start: usize,
    /// Index of the node nearest the segment end.
    pub end: usize,
}

/// Index of the node nearest `target` and its distance; the first node wins ties.
///
/// # Examples
/// ```
/// use funicular::{nearest_node, point};
///
/// let nodes = [point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)];
/// assert_eq!(nearest_node(&nodes, point(0.9, 0.1, 0.0)).map(|(i, _)| i), Some(1));
/// assert_eq!(nearest_node(&[], point(0.0, 0.0, 0.0)), None);
/// ```
#[must_use]
pub fn nearest_node(nodes: &[Point], target: Point) -> Option<(usize, f64)> {
    let mut nearest: Option<(usize, f64)> = None;
    for (index, node) in nodes.iter().enumerate() {
        let distance = target.distance_to(*node);
        if nearest.map_or(true, |(_, best)| distance < best) {
            nearest = Some((index, distance));
        }
    }
    nearest
}

/// Snap every segment onto the node set.
///
/// When `tolerance` is supplied, endpoints further than it from every node
/// are rejected.
///
/// # Errors
///
/// Returns [`TopologyError::NoNodes`] when there is nothing to snap to,
/// [`TopologyError::DistantEndpoint`] for endpoints outside the tolerance,
/// and [`TopologyError::CollapsedSegment`] when both endpoints land on the
/// same node. Duplicated node positions always resolve to the first copy, so a
/// segment between them collapses too.
pub fn snap_segments(
    nodes: &[Point],
    segments: &[Line],
    tolerance: Option<f64>,
) -> Result<Vec<SnappedSegment>, TopologyError> {
    segments
        .iter()
        .enumerate()
        .map(|(segment, line)| snap_segment(nodes, segment, line, tolerance))
        .collect()
}

/// Snap a single segment; see [`snap_segments`].
fn snap_segment(
    nodes: &[Point],
    segment: usize,
    line: &Line,
    tolerance: Option<f64>,
) -> Result<SnappedSegment, TopologyError> {
    let resolve = |target: Point| -> Result<usize, TopologyError> {
        let (index, distance) =
            nearest_node(nodes, target).ok_or(TopologyError::NoNodes { segment })?;
        match tolerance {
            Some(tolerance) if distance > tolerance => Err(TopologyError::DistantEndpoint {
                segment,
                distance,
                tolerance,
            }),
            _ => Ok(index),
        }
    };
    let start = resolve(line.from)?;
    let end = resolve(line.to)?;
    if start == end {
        return Err(TopologyError::CollapsedSegment {
            segment,
            node: start,
        });
    }
    Ok(SnappedSegment { start, end })
}
