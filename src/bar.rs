//! Axial springs connecting two nodes.

use nalgebra::Vector3;

use crate::geometry::{Line, Point};
use crate::node::Node;

/// Natural length value that adopts the bar's current length as its rest length.
pub const USE_CURRENT_LENGTH: f64 = -1.0;

/// An axial spring between two nodes.
///
/// The endpoints are the edge endpoints of the bar inside a
/// [`Structure`](crate::Structure); the bar itself only caches geometry and
/// force state.
#[derive(Clone, Debug)]
pub struct Bar {
    /// Effective spring constant.
    stiffness: f64,
    /// Cross-sectional area, fixed at one for the spring model.
    area: f64,
    /// Length at which the bar carries no force.
    natural_length: f64,
    /// Line between the endpoints as of the latest geometry update.
    line: Line,
    /// Axial force, positive in tension.
    tension: f64,
    /// Axial force per unit area.
    stress: f64,
}

impl Bar {
    /// Create a bar spanning `from` to `to` with the given spring constant.
    ///
    /// The natural length starts at the initial length.
    #[must_use]
    pub fn new(from: Point, to: Point, stiffness: f64) -> Self {
        let line = Line::new(from, to);
        Self {
            stiffness,
            area: 1.0,
            natural_length: line.length(),
            line,
            tension: 0.0,
            stress: 0.0,
        }
    }

    /// Effective spring constant.
    #[must_use]
    pub const fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Cross-sectional area.
    #[must_use]
    pub const fn area(&self) -> f64 {
        self.area
    }

    /// Rest length.
    #[must_use]
    pub const fn natural_length(&self) -> f64 {
        self.natural_length
    }

    /// Line between the endpoints as of the latest geometry update.
    #[must_use]
    pub const fn line(&self) -> Line {
        self.line
    }

    /// Current length as of the latest geometry update.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.line.length()
    }

    /// Axial force, positive in tension and negative in compression.
    #[must_use]
    pub const fn tension(&self) -> f64 {
        self.tension
    }

    /// Axial stress.
    #[must_use]
    pub const fn stress(&self) -> f64 {
        self.stress
    }

    /// Set the rest length.
    ///
    /// [`USE_CURRENT_LENGTH`] adopts the current length; any other value is
    /// taken literally.
    ///
    /// # Examples
    /// ```
    /// use funicular::{point, Bar, USE_CURRENT_LENGTH};
    ///
    /// let mut bar = Bar::new(point(0.0, 0.0, 0.0), point(2.0, 0.0, 0.0), 1.0);
    /// bar.set_natural_length(0.5);
    /// assert_eq!(bar.natural_length(), 0.5);
    /// bar.set_natural_length(USE_CURRENT_LENGTH);
    /// assert_eq!(bar.natural_length(), 2.0);
    /// ```
    #[allow(clippy::float_cmp)]
    pub fn set_natural_length(&mut self, value: f64) {
        self.natural_length = if value == USE_CURRENT_LENGTH {
            self.length()
        } else {
            value
        };
    }

    /// Replace the spring constant without touching the topology.
    pub fn retune(&mut self, stiffness: f64) {
        self.stiffness = stiffness;
    }

    /// Recompute the cached line from live endpoint positions.
    pub fn update_geometry(&mut self, from: Point, to: Point) {
        self.line = Line::new(from, to);
    }

    /// Compute the axial force from the live endpoint positions.
    ///
    /// Returns the pull exerted on the start node; the end node receives the
    /// negated pull. A bar whose endpoints coincide has no axis to act along:
    /// its tension is cleared and `None` is returned.
    pub fn compute_force(&mut self, from: Point, to: Point) -> Option<Vector3<f64>> {
        self.update_geometry(from, to);
        let length = self.length();
        if length <= 0.0 {
            self.tension = 0.0;
            self.stress = 0.0;
            return None;
        }
        self.tension = -self.stiffness * self.area * (self.natural_length - length);
        self.stress = self.tension / self.area;
        Some(self.line.direction() / length * self.tension)
    }

    /// Mass shares `(start, end)` of half the current length times each endpoint's density.
    #[must_use]
    pub fn distribute_mass(&self, start: &Node, end: &Node) -> (f64, f64) {
        let length = self.length();
        (start.density() * length / 2.0, end.density() * length / 2.0)
    }
}
