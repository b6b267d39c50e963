//! Domain-level errors (no external dependencies)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::pokemon::BreederKind;

/// Construction-contract violations. These abort the operation rather
/// than leave a partially valid tree behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("desired IV count must be between 2 and 5, got {0}")]
    InvalidIvCount(usize),

    #[error("IV {0} is selected more than once")]
    DuplicateIv(String),

    #[error("last-row breeder kind {0} has no matching target IV")]
    MissingTargetIv(BreederKind),

    #[error("position {0} is not part of the breed tree")]
    PositionNotInTree(String),

    #[error("invalid position key: {0}")]
    InvalidPositionKey(String),

    #[error("unknown species number: {0}")]
    UnknownSpecies(u32),

    #[error("snapshot has no root entry")]
    MissingRootEntry,

    #[error("unknown egg group: {0}")]
    UnknownEggGroup(String),

    #[error("unknown nature: {0}")]
    UnknownNature(String),

    #[error("unknown IV stat: {0}")]
    UnknownIvStat(String),

    #[error("unknown gender: {0}")]
    UnknownGender(String),

    #[error("no gender guarantee cost for {0}% male")]
    UnknownGenderRatio(f64),

    #[error("the root species is the breed target; retarget to change it")]
    RootSpeciesLocked,
}

/// Advisory breeding problems attached to a tree position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BreedError {
    GenderCompatibility,
    EggGroupCompatibility,
    GenderlessSpeciesCompatibility,
    RootLeafSpeciesMismatch,
    /// Not a real incompatibility: the pairing yields what the slot already holds.
    ChildDidNotChange,
}

impl BreedError {
    /// Whether this error should be surfaced to the user.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, BreedError::ChildDidNotChange)
    }
}

impl fmt::Display for BreedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            BreedError::GenderCompatibility => "parents must be one male and one female",
            BreedError::EggGroupCompatibility => "parents share no egg group",
            BreedError::GenderlessSpeciesCompatibility => {
                "genderless parents must come from the same evolution family"
            }
            BreedError::RootLeafSpeciesMismatch => "offspring does not match the breed target",
            BreedError::ChildDidNotChange => "offspring unchanged",
        };
        f.write_str(msg)
    }
}
