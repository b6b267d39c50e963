use std::fmt;

use crate::domain::pokemon::{Gender, IvStat, Nature, Species};
use crate::domain::position::Position;

/// One slot of the breeding tree.
///
/// `ivs` and `nature` are fixed at build time. Species, gender, nickname
/// and the gender-cost flag are the only mutable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    position: Position,
    ivs: Vec<IvStat>,
    nature: Option<Nature>,
    pub species: Option<Species>,
    pub gender: Option<Gender>,
    pub nickname: Option<String>,
    pub gender_cost_ignored: bool,
}

impl TreeNode {
    pub fn new(position: Position, ivs: Vec<IvStat>, nature: Option<Nature>) -> Self {
        Self {
            position,
            ivs,
            nature,
            species: None,
            gender: None,
            nickname: None,
            gender_cost_ignored: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn ivs(&self) -> &[IvStat] {
        &self.ivs
    }

    pub fn nature(&self) -> Option<Nature> {
        self.nature
    }

    pub fn is_root(&self) -> bool {
        self.position.is_root()
    }

    pub fn is_ditto(&self) -> bool {
        self.species.as_ref().is_some_and(Species::is_ditto)
    }

    pub fn is_genderless(&self) -> bool {
        self.species.as_ref().is_some_and(Species::is_genderless)
    }

    /// Species and gender both assigned, so the node can take part in a breed.
    pub fn is_ready(&self) -> bool {
        self.species.is_some() && self.gender.is_some()
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.species {
            Some(species) => write!(f, "[{}] {}", self.position, species.name())?,
            None => write!(f, "[{}] ?", self.position)?,
        }
        if let Some(nickname) = &self.nickname {
            write!(f, " \"{}\"", nickname)?;
        }
        if let Some(gender) = self.gender {
            write!(f, " {}", gender)?;
        }
        Ok(())
    }
}
