//! The relaxation engine: an arena of nodes and bars advanced one step at a time.

use nalgebra::Vector3;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::bar::Bar;
use crate::errors::{EditError, StepError, TopologyError};
use crate::geometry::{Point, TriangleMesh};
use crate::mass::MassStrategy;
use crate::node::{Node, NodeKind, RollerMode};
use crate::snapshot::{Advisory, Snapshot};

/// Global parameters read on every relaxation step.
///
/// They are supplied afresh with each trigger so damping, gravity and the
/// time step can be tuned while the structure relaxes.
///
/// # Builder Pattern
/// ```
/// use funicular::StepParameters;
///
/// let parameters = StepParameters::default()
///     .with_damping(0.9)
///     .with_gravity(-9.81)
///     .with_time_step(0.01);
/// assert_eq!(parameters.damping, 0.9);
/// assert_eq!(parameters.wind, 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepParameters {
    /// Velocity damping factor; 1.0 disables damping. Default: 0.95.
    pub damping: f64,
    /// Gravitational constant acting along Z. Default: 9.81.
    pub gravity: f64,
    /// Explicit Euler time step. Default: 0.005.
    pub time_step: f64,
    /// Horizontal wind load along X added to every node. Default: 0.0.
    pub wind: f64,
    /// Vertical dead load along Z added to every node. Default: 0.0.
    pub dead_load: f64,
    /// Position update used for roller nodes.
    pub roller_mode: RollerMode,
}

impl Default for StepParameters {
    fn default() -> Self {
        Self {
            damping: 0.95,
            gravity: 9.81,
            time_step: 0.005,
            wind: 0.0,
            dead_load: 0.0,
            roller_mode: RollerMode::default(),
        }
    }
}

impl StepParameters {
    /// Set the damping factor.
    #[must_use]
    pub const fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the gravitational constant.
    #[must_use]
    pub const fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the time step.
    #[must_use]
    pub const fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Set the wind load.
    #[must_use]
    pub const fn with_wind(mut self, wind: f64) -> Self {
        self.wind = wind;
        self
    }

    /// Set the dead load.
    #[must_use]
    pub const fn with_dead_load(mut self, dead_load: f64) -> Self {
        self.dead_load = dead_load;
        self
    }

    /// Set the roller position update.
    #[must_use]
    pub const fn with_roller_mode(mut self, roller_mode: RollerMode) -> Self {
        self.roller_mode = roller_mode;
        self
    }
}

/// Network of point masses and axial springs relaxed by explicit integration.
#[derive(Clone, Debug, Default)]
pub struct Structure {
    /// Nodes are graph vertices and bars are directed edges from start to end.
    graph: Graph<Node, Bar>,
    /// Policy deriving nodal masses every step.
    strategy: MassStrategy,
}

impl Structure {
    /// Create an empty structure.
    ///
    /// # Examples
    /// ```
    /// use funicular::{MassStrategy, Structure};
    ///
    /// let structure = Structure::new(MassStrategy::LengthBased);
    /// assert_eq!(structure.node_count(), 0);
    /// ```
    #[must_use]
    pub fn new(strategy: MassStrategy) -> Self {
        Self {
            graph: Graph::new(),
            strategy,
        }
    }

    /// Mass strategy applied every step.
    #[must_use]
    pub const fn strategy(&self) -> MassStrategy {
        self.strategy
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of bars.
    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a node at rest.
    ///
    /// # Examples
    /// ```
    /// use funicular::{point, MassStrategy, NodeKind, Structure};
    ///
    /// let mut structure = Structure::new(MassStrategy::Constant);
    /// let node = structure.add_node(point(0.0, 0.0, 0.0), NodeKind::Pinned, 2.0);
    /// assert_eq!(node.index(), 0);
    /// assert_eq!(structure.node(node).map(|node| node.mass()), Some(2.0));
    /// ```
    pub fn add_node(&mut self, position: Point, kind: NodeKind, density: f64) -> NodeIndex {
        self.insert_node(Node::new(position, kind, density))
    }

    /// Insert a prepared node, seeding its mass from the strategy.
    pub fn insert_node(&mut self, mut node: Node) -> NodeIndex {
        node.set_mass(self.strategy.initial_mass(node.density()));
        self.graph.add_node(node)
    }

    /// Connect two nodes with a new bar whose natural length is its current length.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnknownNode`] for handles outside the structure,
    /// [`TopologyError::SelfLoop`] when `start == end` and
    /// [`TopologyError::ZeroLengthBar`] when both nodes share a position.
    pub fn add_bar(
        &mut self,
        start: NodeIndex,
        end: NodeIndex,
        stiffness: f64,
    ) -> Result<EdgeIndex, TopologyError> {
        let from = self
            .graph
            .node_weight(start)
            .ok_or(TopologyError::UnknownNode(start))?
            .position();
        let to = self
            .graph
            .node_weight(end)
            .ok_or(TopologyError::UnknownNode(end))?
            .position();
        if start == end {
            return Err(TopologyError::SelfLoop(start));
        }
        if from.distance_to(to) == 0.0 {
            return Err(TopologyError::ZeroLengthBar { start, end });
        }
        self.graph[start].attach_bar();
        self.graph[end].attach_bar();
        Ok(self.graph.add_edge(start, end, Bar::new(from, to, stiffness)))
    }

    /// Rebuild every node's neighbour list from the bars.
    pub fn rebuild_neighbors(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.reset_neighbors();
        }
        for edge in self.graph.edge_indices() {
            let Some((start, end)) = self.graph.edge_endpoints(edge) else {
                continue;
            };
            self.graph[start].register_neighbor(end);
            self.graph[end].register_neighbor(start);
        }
    }

    /// Retrieve a node.
    #[must_use]
    pub fn node(&self, node: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(node)
    }

    /// Retrieve a bar.
    #[must_use]
    pub fn bar(&self, bar: EdgeIndex) -> Option<&Bar> {
        self.graph.edge_weight(bar)
    }

    /// Start and end node of a bar.
    #[must_use]
    pub fn bar_endpoints(&self, bar: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(bar)
    }

    /// Iterate over all nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.graph
            .node_indices()
            .map(move |index| (index, &self.graph[index]))
    }

    /// Iterate over all bars in index order.
    pub fn bars(&self) -> impl Iterator<Item = (EdgeIndex, &Bar)> {
        self.graph
            .edge_indices()
            .map(move |index| (index, &self.graph[index]))
    }

    /// Set the rest length of a bar; see [`Bar::set_natural_length`].
    ///
    /// # Errors
    ///
    /// Returns [`EditError::UnknownBar`] when `bar` is not part of this structure.
    pub fn set_natural_length(&mut self, bar: EdgeIndex, value: f64) -> Result<(), EditError> {
        self.graph
            .edge_weight_mut(bar)
            .ok_or(EditError::UnknownBar(bar))?
            .set_natural_length(value);
        Ok(())
    }

    /// Change a bar's spring constant between steps.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::UnknownBar`] when `bar` is not part of this structure.
    pub fn retune(&mut self, bar: EdgeIndex, stiffness: f64) -> Result<(), EditError> {
        self.graph
            .edge_weight_mut(bar)
            .ok_or(EditError::UnknownBar(bar))?
            .retune(stiffness);
        Ok(())
    }

    /// Attach an imposed load to a node; see [`Node::set_load`].
    ///
    /// # Errors
    ///
    /// Returns [`EditError::UnknownNode`] when `node` is not part of this structure
    /// and [`EditError::RestrainedNode`] when it is pinned, fixed or a roller.
    pub fn set_load(&mut self, node: NodeIndex, load: Vector3<f64>) -> Result<(), EditError> {
        let target = self
            .graph
            .node_weight_mut(node)
            .ok_or(EditError::UnknownNode(node))?;
        if target.set_load(load) {
            Ok(())
        } else {
            Err(EditError::RestrainedNode(node))
        }
    }

    /// Triangle spanned by the neighbours of a node with exactly three neighbours.
    #[must_use]
    pub fn tributary_mesh(&self, node: NodeIndex) -> Option<TriangleMesh> {
        match self.node(node)?.neighbors() {
            [a, b, c] => Some(TriangleMesh::triangle(
                self.graph[*a].position(),
                self.graph[*b].position(),
                self.graph[*c].position(),
            )),
            _ => None,
        }
    }

    /// Largest velocity magnitude among nodes that can move.
    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.graph
            .node_weights()
            .filter(|node| !matches!(node.kind(), NodeKind::Pinned | NodeKind::Fixed))
            .map(|node| node.velocity().norm())
            .fold(0.0, f64::max)
    }

    /// Check the structure can be relaxed and collect advisories.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InsufficientNodes`] when fewer than two nodes exist.
    pub fn check(&self) -> Result<Vec<Advisory>, StepError> {
        let count = self.node_count();
        if count < 2 {
            return Err(StepError::InsufficientNodes { count });
        }
        let advisories = self
            .nodes()
            .filter(|(_, node)| node.valency() > 3)
            .map(|(index, node)| Advisory::StaticallyIndeterminate {
                node: index.index(),
                valency: node.valency(),
            })
            .collect();
        Ok(advisories)
    }

    /// Advance the structure by one time step.
    ///
    /// The order is fixed: masses are reset, bar forces accumulated, masses
    /// recomputed, gravity and damping applied with the fresh masses, nodes
    /// integrated and finally bar geometry refreshed for the next step.
    pub fn relax(&mut self, parameters: &StepParameters) {
        self.reset_masses();
        self.accumulate_bar_forces();
        self.recompute_masses();
        self.apply_global_loads(parameters);
        self.integrate_nodes(parameters);
        self.update_bar_geometry();
    }

    /// Zero the nodal masses when the strategy rebuilds them.
    fn reset_masses(&mut self) {
        let strategy = self.strategy;
        for node in self.graph.node_weights_mut() {
            node.reset_mass(strategy);
        }
    }

    /// Push every bar's axial force into its endpoints' velocity registers.
    fn accumulate_bar_forces(&mut self) {
        for edge in self.graph.edge_indices() {
            let Some((start, end)) = self.graph.edge_endpoints(edge) else {
                continue;
            };
            let from = self.graph[start].position();
            let to = self.graph[end].position();
            if let Some(pull) = self.graph[edge].compute_force(from, to) {
                self.graph[start].apply_force(pull);
                self.graph[end].apply_force(-pull);
            } else {
                ftlog::warn!(
                    "bar {} has collapsed to zero length; it exerts no force this step",
                    edge.index()
                );
            }
        }
    }

    /// Rebuild the nodal masses for this step.
    fn recompute_masses(&mut self) {
        match self.strategy {
            MassStrategy::Constant => {
                for node in self.graph.node_weights_mut() {
                    node.set_mass(node.density());
                }
            }
            MassStrategy::LengthBased => {
                for edge in self.graph.edge_indices() {
                    let Some((start, end)) = self.graph.edge_endpoints(edge) else {
                        continue;
                    };
                    let (first, second) =
                        self.graph[edge].distribute_mass(&self.graph[start], &self.graph[end]);
                    self.graph[start].add_mass(first);
                    self.graph[end].add_mass(second);
                }
            }
            MassStrategy::AreaBased => {
                for index in self.graph.node_indices() {
                    let corners: Vec<Point> = self.graph[index]
                        .neighbors()
                        .iter()
                        .map(|&neighbor| self.graph[neighbor].position())
                        .collect();
                    self.graph[index].compute_area_mass(&corners);
                }
            }
        }
    }

    /// Apply gravity and imposed loads, then damp every node.
    fn apply_global_loads(&mut self, parameters: &StepParameters) {
        for node in self.graph.node_weights_mut() {
            node.apply_gravity(parameters.gravity);
            if parameters.wind != 0.0 {
                node.apply_wind(parameters.wind);
            }
            if parameters.dead_load != 0.0 {
                node.apply_dead_load(parameters.dead_load);
            }
            if node.kind() == NodeKind::Loaded {
                node.apply_force(node.load());
            }
            node.damp(parameters.damping);
        }
    }

    /// Move every node according to its kind.
    fn integrate_nodes(&mut self, parameters: &StepParameters) {
        for node in self.graph.node_weights_mut() {
            node.integrate(parameters.time_step, parameters.roller_mode);
        }
    }

    /// Refresh each bar's cached line from the updated positions.
    fn update_bar_geometry(&mut self) {
        for edge in self.graph.edge_indices() {
            let Some((start, end)) = self.graph.edge_endpoints(edge) else {
                continue;
            };
            let from = self.graph[start].position();
            let to = self.graph[end].position();
            self.graph[edge].update_geometry(from, to);
        }
    }

    /// Collect the outputs of the latest step.
    #[must_use]
    pub fn snapshot(&self, iteration: u64, advisories: Vec<Advisory>) -> Snapshot {
        let count = self.node_count();
        let mut snapshot = Snapshot {
            iteration,
            positions: Vec::with_capacity(count),
            valencies: Vec::with_capacity(count),
            masses: Vec::with_capacity(count),
            bars: self.bars().map(|(_, bar)| bar.line()).collect(),
            tensions: self.bars().map(|(_, bar)| bar.tension()).collect(),
            stresses: self.bars().map(|(_, bar)| bar.stress()).collect(),
            neighbors: Vec::with_capacity(count),
            meshes: Vec::with_capacity(count),
            advisories,
        };
        for (index, node) in self.nodes() {
            snapshot.positions.push(node.position());
            snapshot.valencies.push(node.valency());
            snapshot.masses.push(node.mass());
            snapshot
                .neighbors
                .push(node.neighbors().iter().map(|n| n.index()).collect());
            // Area-based steps report the triangle that produced the mass.
            let mesh = node.mesh().cloned().or_else(|| self.tributary_mesh(index));
            snapshot.meshes.push(mesh);
        }
        snapshot
    }
}
