//! Bottom-up propagation of successful breeds towards the root.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument, trace};

use crate::domain::arena::BreedTree;
use crate::domain::breed::{breed, Mate};
use crate::domain::error::BreedError;
use crate::domain::pokemon::Gender;
use crate::domain::position::Position;
use crate::domain::reference::GenderlessFamilies;

/// Advisory breeding errors, keyed by the position of the pair member
/// the chain walk was standing on.
pub type BreedErrors = BTreeMap<Position, BTreeSet<BreedError>>;

/// Who caused the tree update that triggers a propagation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// An edit, import or rebuild. Propagation runs.
    User,
    /// The write-back of a previous pass. Propagation is a no-op.
    Propagation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Positions that received a new species, in assignment order.
    pub assigned: Vec<Position>,
}

impl PropagationReport {
    /// Whether the caller has to write the tree back once.
    pub fn changed(&self) -> bool {
        !self.assigned.is_empty()
    }
}

/// Walk every sibling pair's ancestor chain once, breeding ready pairs
/// into their offspring slot and recording per-pair errors.
///
/// The root is never overwritten. One call reaches the local fixpoint.
#[instrument(level = "debug", skip(tree, errors, families), fields(height = tree.height()))]
pub fn propagate(
    tree: &mut BreedTree,
    errors: &mut BreedErrors,
    families: &GenderlessFamilies,
    origin: UpdateOrigin,
) -> PropagationReport {
    let mut report = PropagationReport::default();
    if origin == UpdateOrigin::Propagation {
        trace!("update came from propagation, skipping pass");
        return report;
    }

    let last_row = tree.height();
    for col in (0..Position::row_width(last_row)).step_by(2) {
        let mut cursor = Position::new(last_row, col);

        while let Some(partner) = cursor.mate() {
            let Some(dest) = cursor.offspring() else {
                break;
            };

            let outcome = {
                let (Some(node), Some(other), Some(slot)) =
                    (tree.get(cursor), tree.get(partner), tree.get(dest))
                else {
                    break;
                };
                match (Mate::of(node), Mate::of(other)) {
                    (Some(mate1), Some(mate2)) => Some(breed(mate1, mate2, slot, families)),
                    _ => None,
                }
            };

            match outcome {
                None => {
                    errors.remove(&cursor);
                }
                Some(Err(found)) if is_idle(&found) => {
                    errors.remove(&cursor);
                }
                Some(Err(found)) => {
                    trace!("{} x {}: {:?}", cursor, partner, found);
                    errors.insert(cursor, found);
                }
                Some(Ok(_)) if dest.is_root() => {
                    errors.remove(&cursor);
                }
                Some(Ok(child)) => {
                    errors.remove(&cursor);
                    if let Some(slot) = tree.get_mut(dest) {
                        // Ratio first: genderless rosters record 0% male,
                        // so a bred genderless child comes out Female.
                        if child.percentage_male() == 0.0 {
                            slot.gender = Some(Gender::Female);
                        } else if child.percentage_male() == 100.0 {
                            slot.gender = Some(Gender::Male);
                        } else if child.is_genderless() {
                            slot.gender = Some(Gender::Genderless);
                        }
                        debug!("{} bred into {}", child, dest);
                        slot.species = Some(child);
                        report.assigned.push(dest);
                    }
                }
            }

            cursor = dest;
        }
    }

    report
}

fn is_idle(errors: &BTreeSet<BreedError>) -> bool {
    errors.len() == 1 && errors.contains(&BreedError::ChildDidNotChange)
}
