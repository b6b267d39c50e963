//! Pairwise breeding resolution.
//!
//! Every compatibility check runs independently and contributes to one
//! error set; the only early exit is when no child species can be
//! determined at all.

use std::collections::BTreeSet;

use tracing::trace;

use crate::domain::error::BreedError;
use crate::domain::node::TreeNode;
use crate::domain::pokemon::{Gender, Species};
use crate::domain::reference::GenderlessFamilies;

pub type BreedResult = Result<Species, BTreeSet<BreedError>>;

/// A node that has both a species and a gender, so it can be bred.
#[derive(Debug, Clone, Copy)]
pub struct Mate<'a> {
    pub species: &'a Species,
    pub gender: Gender,
}

impl<'a> Mate<'a> {
    pub fn of(node: &'a TreeNode) -> Option<Self> {
        Some(Self {
            species: node.species.as_ref()?,
            gender: node.gender?,
        })
    }

    fn is_ditto(&self) -> bool {
        self.species.is_ditto()
    }

    fn is_genderless(&self) -> bool {
        self.species.is_genderless()
    }
}

/// Resolve breeding `mate1` with `mate2` into the `offspring` slot.
///
/// `Err` carries every failed check. A lone
/// [`BreedError::ChildDidNotChange`] means the pair is fine but the slot
/// already holds the result.
pub fn breed(
    mate1: Mate<'_>,
    mate2: Mate<'_>,
    offspring: &TreeNode,
    families: &GenderlessFamilies,
) -> BreedResult {
    let mut errors = BTreeSet::new();

    errors.extend(check_genderless(mate1, mate2, families));
    errors.extend(check_egg_groups(mate1, mate2));
    errors.extend(check_genders(mate1, mate2));

    let child = match child_species(mate1, mate2) {
        Ok(species) => species,
        Err(err) => {
            errors.insert(err);
            trace!("no child species for {} x {}", mate1.species, mate2.species);
            return Err(errors);
        }
    };

    errors.extend(check_offspring(offspring, child, families));

    if errors.is_empty() {
        Ok(child.clone())
    } else {
        Err(errors)
    }
}

fn check_genderless(
    mate1: Mate<'_>,
    mate2: Mate<'_>,
    families: &GenderlessFamilies,
) -> Option<BreedError> {
    // Ditto is in no family, so a genderless species paired with Ditto
    // fails its own side of this check.
    let one_side = |this: Mate<'_>, other: Mate<'_>| -> Option<BreedError> {
        if this.gender != Gender::Genderless {
            return None;
        }
        if this.is_ditto() {
            return other
                .is_ditto()
                .then_some(BreedError::GenderlessSpeciesCompatibility);
        }
        if families.same_family(this.species.number(), other.species.number()) {
            None
        } else {
            Some(BreedError::GenderlessSpeciesCompatibility)
        }
    };
    one_side(mate1, mate2).or_else(|| one_side(mate2, mate1))
}

fn check_egg_groups(mate1: Mate<'_>, mate2: Mate<'_>) -> Option<BreedError> {
    if mate1.is_ditto() || mate2.is_ditto() {
        return None;
    }
    if mate1.species.shares_egg_group_with(mate2.species) {
        None
    } else {
        Some(BreedError::EggGroupCompatibility)
    }
}

fn check_genders(mate1: Mate<'_>, mate2: Mate<'_>) -> Option<BreedError> {
    if mate1.is_genderless() && mate2.is_genderless() {
        return None;
    }
    (mate1.gender == mate2.gender).then_some(BreedError::GenderCompatibility)
}

fn child_species<'a>(mate1: Mate<'a>, mate2: Mate<'a>) -> Result<&'a Species, BreedError> {
    if mate1.is_ditto() {
        return Ok(mate2.species);
    }
    if mate2.is_ditto() {
        return Ok(mate1.species);
    }
    // Families were checked above; mate1 stands for both.
    if mate1.is_genderless() && mate2.is_genderless() {
        return Ok(mate1.species);
    }
    match (mate1.gender, mate2.gender) {
        (Gender::Female, other) if other != Gender::Female => Ok(mate1.species),
        (other, Gender::Female) if other != Gender::Female => Ok(mate2.species),
        _ => Err(BreedError::GenderCompatibility),
    }
}

fn check_offspring(
    offspring: &TreeNode,
    child: &Species,
    families: &GenderlessFamilies,
) -> Option<BreedError> {
    let current = offspring.species.as_ref();
    if offspring.is_root() {
        let matches = match current {
            Some(target) if target.is_genderless() => {
                target.number() == child.number()
                    || families.same_family(target.number(), child.number())
            }
            Some(target) => target.number() == child.number(),
            None => false,
        };
        return (!matches).then_some(BreedError::RootLeafSpeciesMismatch);
    }
    current
        .is_some_and(|species| species.number() == child.number())
        .then_some(BreedError::ChildDidNotChange)
}
