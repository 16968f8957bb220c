//! Point masses of the relaxation network.

use nalgebra::Vector3;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, TriangleMesh};
use crate::mass::MassStrategy;

/// How a node is allowed to move during integration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Moves freely in all three directions.
    #[default]
    Free,
    /// Held in place by a support.
    Pinned,
    /// Slides in the XY plane, restrained vertically.
    Roller,
    /// Fully restrained.
    Fixed,
    /// Moves freely and carries an imposed load every step.
    Loaded,
}

/// Position update applied to [`NodeKind::Roller`] nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollerMode {
    /// Add the in-plane velocity to the position without scaling by the time step.
    #[default]
    InPlaneSnap,
    /// Scale the in-plane velocity by the time step like every other moving node.
    Integrated,
}

/// A point mass connected to its neighbours by bars.
#[derive(Clone, Debug)]
pub struct Node {
    /// Current position.
    position: Point,
    /// Force and velocity register, accumulated then damped every step.
    velocity: Vector3<f64>,
    /// Mass used for gravity during the current step.
    mass: f64,
    /// Mass density: kg, kg/m or kg/m² depending on the mass strategy.
    density: f64,
    /// Kinematic behaviour of the node.
    kind: NodeKind,
    /// Imposed load applied every step to loaded nodes.
    load: Vector3<f64>,
    /// Handles of adjacent nodes in bar registration order.
    neighbors: Vec<NodeIndex>,
    /// Number of incident bars.
    valency: usize,
    /// Tributary triangle that produced the area mass of the latest step.
    mesh: Option<TriangleMesh>,
}

impl Node {
    /// Create a node at rest.
    #[must_use]
    pub fn new(position: Point, kind: NodeKind, density: f64) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            mass: 0.0,
            density,
            kind,
            load: Vector3::zeros(),
            neighbors: Vec::new(),
            valency: 0,
            mesh: None,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Current velocity register.
    #[must_use]
    pub const fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }

    /// Mass applied during the latest step.
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Mass density supplied for this node.
    #[must_use]
    pub const fn density(&self) -> f64 {
        self.density
    }

    /// Kinematic behaviour of the node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Imposed load carried by the node.
    #[must_use]
    pub const fn load(&self) -> Vector3<f64> {
        self.load
    }

    /// Number of incident bars.
    #[must_use]
    pub const fn valency(&self) -> usize {
        self.valency
    }

    /// Handles of adjacent nodes.
    #[must_use]
    pub fn neighbors(&self) -> &[NodeIndex] {
        &self.neighbors
    }

    /// Triangle used for the area mass of the latest step, if any.
    #[must_use]
    pub const fn mesh(&self) -> Option<&TriangleMesh> {
        self.mesh.as_ref()
    }

    /// Overwrite the mass, used when seeding a constant-mass node.
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    /// Add to the mass accumulated during this step.
    pub fn add_mass(&mut self, mass: f64) {
        self.mass += mass;
    }

    /// Attach an imposed load, turning the node into [`NodeKind::Loaded`] when it was free.
    ///
    /// Restrained and roller nodes never carry imposed loads: they are left
    /// untouched and `false` is returned.
    pub fn set_load(&mut self, load: Vector3<f64>) -> bool {
        match self.kind {
            NodeKind::Free | NodeKind::Loaded => {
                self.load = load;
                self.kind = NodeKind::Loaded;
                true
            }
            NodeKind::Pinned | NodeKind::Roller | NodeKind::Fixed => false,
        }
    }

    /// Record one more incident bar.
    pub(crate) fn attach_bar(&mut self) {
        self.valency += 1;
    }

    /// Record `neighbor` as adjacent through a bar.
    pub(crate) fn register_neighbor(&mut self, neighbor: NodeIndex) {
        self.neighbors.push(neighbor);
    }

    /// Add vertical self weight `mass * g` to the velocity register.
    pub fn apply_gravity(&mut self, g: f64) {
        self.velocity.z += self.mass * g;
    }

    /// Add a horizontal wind load along X.
    pub fn apply_wind(&mut self, wind: f64) {
        self.apply_force(Vector3::new(wind, 0.0, 0.0));
    }

    /// Add a vertical dead load along Z.
    pub fn apply_dead_load(&mut self, load: f64) {
        self.apply_force(Vector3::new(0.0, 0.0, load));
    }

    /// Add an arbitrary imposed force to the velocity register.
    pub fn apply_force(&mut self, force: Vector3<f64>) {
        self.velocity += force;
    }

    /// Scale the velocity register by the damping factor.
    pub fn damp(&mut self, damping: f64) {
        self.velocity *= damping;
    }

    /// Advance the position with one explicit Euler step.
    pub fn integrate(&mut self, time_step: f64, roller: RollerMode) {
        match self.kind {
            NodeKind::Free | NodeKind::Loaded => {
                self.position = self.position.translated(self.velocity * time_step);
            }
            NodeKind::Roller => {
                let in_plane = Vector3::new(self.velocity.x, self.velocity.y, 0.0);
                let step = match roller {
                    RollerMode::InPlaneSnap => in_plane,
                    RollerMode::Integrated => in_plane * time_step,
                };
                self.position = self.position.translated(step);
            }
            NodeKind::Pinned | NodeKind::Fixed => {}
        }
    }

    /// Zero the mass when `strategy` rebuilds it every step and forget the last triangle.
    pub fn reset_mass(&mut self, strategy: MassStrategy) {
        self.mesh = None;
        if strategy.rebuilds_mass() {
            self.mass = 0.0;
        }
    }

    /// Forget every registered neighbour.
    pub fn reset_neighbors(&mut self) {
        self.neighbors.clear();
    }

    /// Add the tributary triangle mass spanned by the three neighbour positions.
    ///
    /// The triangle is kept until the next mass reset. Only nodes with exactly
    /// three neighbours have a tributary triangle; any other node is left
    /// untouched and `None` is returned.
    ///
    /// # Examples
    /// ```
    /// use funicular::{point, Node, NodeKind};
    ///
    /// let node = Node::new(point(1.0, 1.0, 1.0), NodeKind::Free, 2.0);
    /// let mut lonely = node.clone();
    /// let corners = [point(0.0, 0.0, 0.0), point(3.0, 0.0, 0.0), point(0.0, 4.0, 0.0)];
    /// assert!(lonely.compute_area_mass(&corners).is_none());
    /// assert_eq!(lonely.mass(), 0.0);
    /// ```
    pub fn compute_area_mass(&mut self, corners: &[Point]) -> Option<&TriangleMesh> {
        let [a, b, c] = corners else {
            return None;
        };
        if self.neighbors.len() != 3 {
            return None;
        }
        let mesh = TriangleMesh::triangle(*a, *b, *c);
        self.mass += mesh.area() * self.density;
        Some(&*self.mesh.insert(mesh))
    }
}
