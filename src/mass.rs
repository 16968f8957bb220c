//! Nodal mass strategies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::InputError;

/// Policy used to derive every node's mass at each relaxation step.
///
/// The integer tags follow the `mass_type` input: `0` constant, `1` length
/// based and `2` area based.
///
/// # Examples
/// ```
/// use funicular::MassStrategy;
///
/// assert_eq!(MassStrategy::try_from(2_i64), Ok(MassStrategy::AreaBased));
/// assert!(MassStrategy::try_from(5_i64).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassStrategy {
    /// Mass equals the node's density, reasserted every step.
    Constant,
    /// Mass is half the length of every incident bar times the node density.
    #[default]
    LengthBased,
    /// Mass is the tributary triangle area times the node density.
    AreaBased,
}

impl MassStrategy {
    /// Integer tag of the strategy.
    #[must_use]
    pub const fn tag(self) -> i64 {
        match self {
            Self::Constant => 0,
            Self::LengthBased => 1,
            Self::AreaBased => 2,
        }
    }

    /// Whether nodal masses are zeroed and rebuilt from scratch every step.
    #[must_use]
    pub const fn rebuilds_mass(self) -> bool {
        !matches!(self, Self::Constant)
    }

    /// Mass a node starts with before its first step.
    #[must_use]
    pub const fn initial_mass(self, density: f64) -> f64 {
        match self {
            Self::Constant => density,
            Self::LengthBased | Self::AreaBased => 0.0,
        }
    }
}

impl TryFrom<i64> for MassStrategy {
    type Error = InputError;

    fn try_from(tag: i64) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Constant),
            1 => Ok(Self::LengthBased),
            2 => Ok(Self::AreaBased),
            other => Err(InputError::UnknownMassType(other)),
        }
    }
}

impl fmt::Display for MassStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => f.write_str("constant"),
            Self::LengthBased => f.write_str("length based"),
            Self::AreaBased => f.write_str("area based"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip() {
        for strategy in [
            MassStrategy::Constant,
            MassStrategy::LengthBased,
            MassStrategy::AreaBased,
        ] {
            assert_eq!(MassStrategy::try_from(strategy.tag()), Ok(strategy));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            MassStrategy::try_from(-1_i64),
            Err(InputError::UnknownMassType(-1))
        );
    }

    #[test]
    fn only_constant_mass_is_held() {
        assert!(!MassStrategy::Constant.rebuilds_mass());
        assert!(MassStrategy::LengthBased.rebuilds_mass());
        assert!(MassStrategy::AreaBased.rebuilds_mass());
        assert_eq!(MassStrategy::Constant.initial_mass(2.5), 2.5);
        assert_eq!(MassStrategy::AreaBased.initial_mass(2.5), 0.0);
    }
}
