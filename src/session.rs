//! Incremental stepping protocol.
//!
//! A [`Session`] owns the structure between triggers. The first trigger after
//! creation or a reset rebuilds the structure from the input lists; every
//! later trigger relaxes the persisted structure by one more step.

use crate::errors::StepError;
use crate::model::ModelInput;
use crate::snapshot::{Advisory, Snapshot};
use crate::structure::{StepParameters, Structure};

/// Outcome of a trigger.
#[derive(Clone, Debug, PartialEq)]
pub enum Tick {
    /// The session was reset; no step ran and nothing is reported.
    Reset,
    /// One relaxation step ran.
    Stepped(Snapshot),
}

/// Persistent relaxation state driven one trigger at a time.
///
/// # Examples
/// ```
/// use funicular::{line, point, ModelInput, Session, StepParameters, Tick};
///
/// let input = ModelInput {
///     nodes: vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)],
///     springs: vec![line(point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0))],
///     supports: vec![point(0.0, 0.0, 0.0)],
///     ..ModelInput::default()
/// };
/// let parameters = StepParameters::default();
/// let mut session = Session::new();
/// for _ in 0..3 {
///     session.trigger(&input, &parameters, false).expect("valid input");
/// }
/// assert_eq!(session.iteration(), 3);
/// assert_eq!(session.trigger(&input, &parameters, true), Ok(Tick::Reset));
/// assert_eq!(session.iteration(), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Session {
    /// Steps run since the last rebuild; zero requests a rebuild.
    iteration: u64,
    /// Structure built on the latest successful rebuild.
    structure: Option<Structure>,
    /// Advisories raised while building the current structure.
    remarks: Vec<Advisory>,
}

impl Session {
    /// Create a session that rebuilds on its first trigger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps run since the last rebuild.
    #[must_use]
    pub const fn iteration(&self) -> u64 {
        self.iteration
    }

    /// The persisted structure, if one has been built.
    #[must_use]
    pub const fn structure(&self) -> Option<&Structure> {
        self.structure.as_ref()
    }

    /// Mutable access for live edits between steps.
    pub fn structure_mut(&mut self) -> Option<&mut Structure> {
        self.structure.as_mut()
    }

    /// Request a rebuild on the next step without touching the structure.
    pub fn reset(&mut self) {
        self.iteration = 0;
    }

    /// Handle one trigger: reset when `reset` is set, otherwise step.
    ///
    /// # Errors
    ///
    /// See [`Session::step`].
    pub fn trigger(
        &mut self,
        input: &ModelInput,
        parameters: &StepParameters,
        reset: bool,
    ) -> Result<Tick, StepError> {
        if reset {
            self.reset();
            ftlog::debug!("session reset");
            return Ok(Tick::Reset);
        }
        self.step(input, parameters).map(Tick::Stepped)
    }

    /// Run one relaxation step, rebuilding first when the counter is zero.
    ///
    /// `input` is only read on a rebuild; `parameters` are read every step.
    ///
    /// # Errors
    ///
    /// Returns the build error when a rebuild fails, leaving the previous
    /// structure in place and the counter at zero, or
    /// [`StepError::InsufficientNodes`] when fewer than two nodes exist.
    pub fn step(
        &mut self,
        input: &ModelInput,
        parameters: &StepParameters,
    ) -> Result<Snapshot, StepError> {
        let rebuilt = self.iteration == 0;
        if rebuilt {
            self.rebuild(input)?;
        }
        let structure = self
            .structure
            .as_mut()
            .ok_or(StepError::InsufficientNodes { count: 0 })?;
        let warnings = structure.check()?;
        if rebuilt {
            for warning in &warnings {
                ftlog::warn!("{warning}");
            }
        }
        let mut advisories = self.remarks.clone();
        advisories.extend(warnings);
        structure.relax(parameters);
        self.iteration += 1;
        ftlog::debug!(
            "step {} finished, peak speed {:.6}",
            self.iteration,
            structure.max_speed()
        );
        Ok(structure.snapshot(self.iteration, advisories))
    }

    /// Replace the structure with a fresh build of `input`.
    fn rebuild(&mut self, input: &ModelInput) -> Result<(), StepError> {
        let (structure, remarks) = input.build()?;
        structure.check()?;
        self.structure = Some(structure);
        self.remarks = remarks;
        Ok(())
    }
}
