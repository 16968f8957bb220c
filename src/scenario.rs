//! Scenario files for the command line tool.

use std::path::Path;

use funicular::{line, point, ModelInput, Point, Session, Snapshot, StepError, StepParameters};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a scenario file cannot be loaded.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Returned when the file cannot be read.
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the file is not a valid scenario.
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A model together with the parameters and number of steps used to relax it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Input lists describing the structure.
    #[serde(flatten)]
    pub input: ModelInput,
    /// Parameters applied on every step.
    pub parameters: StepParameters,
    /// Number of relaxation steps to run.
    pub steps: usize,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            input: ModelInput::default(),
            parameters: StepParameters::default(),
            steps: 200,
        }
    }
}

impl Scenario {
    /// Load a scenario from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Square net of `size × size` nodes with unit spacing hanging from its corners.
    pub fn hanging_net(size: usize) -> Self {
        let size = size.max(2);
        let at = |row: usize, column: usize| point(column as f64, row as f64, 0.0);
        let mut nodes = Vec::with_capacity(size * size);
        let mut springs = Vec::new();
        for row in 0..size {
            for column in 0..size {
                nodes.push(at(row, column));
                if column + 1 < size {
                    springs.push(line(at(row, column), at(row, column + 1)));
                }
                if row + 1 < size {
                    springs.push(line(at(row, column), at(row + 1, column)));
                }
            }
        }
        let last = size - 1;
        let supports: Vec<Point> = [(0, 0), (0, last), (last, 0), (last, last)]
            .into_iter()
            .map(|(row, column)| at(row, column))
            .collect();
        Self {
            input: ModelInput {
                nodes,
                springs,
                supports,
                stiffnesses: vec![10.0],
                natural_lengths: vec![-1.0],
                ..ModelInput::default()
            },
            parameters: StepParameters::default()
                .with_gravity(-9.81)
                .with_time_step(0.01),
            steps: 500,
        }
    }

    /// Relax the model for `steps` triggers, at least one, and return the last snapshot.
    pub fn run(&self, steps: usize) -> Result<Snapshot, StepError> {
        let mut session = Session::new();
        let mut snapshot = session.step(&self.input, &self.parameters)?;
        for _ in 1..steps {
            snapshot = session.step(&self.input, &self.parameters)?;
        }
        ftlog::info!(
            "relaxed {} nodes and {} bars for {} steps",
            snapshot.positions.len(),
            snapshot.bars.len(),
            snapshot.iteration
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hanging_net_is_supported_at_its_corners() {
        let scenario = Scenario::hanging_net(4);
        assert_eq!(scenario.input.nodes.len(), 16);
        assert_eq!(scenario.input.springs.len(), 24);
        let snapshot = scenario.run(50).expect("valid scenario");
        assert_eq!(snapshot.iteration, 50);
        assert_eq!(snapshot.positions[0], point(0.0, 0.0, 0.0));
        assert_eq!(snapshot.positions[15], point(3.0, 3.0, 0.0));
        assert!(snapshot.positions[5].z < 0.0);
    }

    #[test]
    fn scenario_files_flatten_the_model() {
        let text = r#"{
            "nodes": [{"x": 0.0, "y": 0.0, "z": 0.0}, {"x": 1.0, "y": 0.0, "z": 0.0}],
            "springs": [{"from": {"x": 0.0, "y": 0.0, "z": 0.0}, "to": {"x": 1.0, "y": 0.0, "z": 0.0}}],
            "mass_type": 0,
            "parameters": {"damping": 0.5},
            "steps": 3
        }"#;
        let scenario: Scenario = serde_json::from_str(text).expect("valid json");
        assert_eq!(scenario.input.nodes.len(), 2);
        assert_eq!(scenario.input.stiffnesses, vec![0.1]);
        assert_eq!(scenario.parameters.damping, 0.5);
        assert_eq!(scenario.parameters.gravity, 9.81);
        assert_eq!(scenario.steps, 3);
        assert_eq!(scenario.run(0).map(|snapshot| snapshot.iteration), Ok(1));
    }

    #[test]
    fn missing_files_are_reported() {
        let error = Scenario::from_path(Path::new("does/not/exist.json")).expect_err("missing");
        assert!(matches!(error, ScenarioError::Io(_)));
    }
}
