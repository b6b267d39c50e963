//! What the user wants to breed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::pokemon::{BreederKind, IvStat, Nature, Species};
use crate::domain::reference::{tree_height, MAX_IV_COUNT, MIN_IV_COUNT};

/// Perfect IVs the target must carry, in labeled slots `A..E`.
/// `A` and `B` are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct IvSet {
    pub a: IvStat,
    pub b: IvStat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<IvStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<IvStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<IvStat>,
}

impl Default for IvSet {
    fn default() -> Self {
        Self::new(IvStat::Hp, IvStat::Attack)
    }
}

impl IvSet {
    pub fn new(a: IvStat, b: IvStat) -> Self {
        Self {
            a,
            b,
            c: None,
            d: None,
            e: None,
        }
    }

    /// Fill slots in order from a list of 2 to 5 distinct stats.
    pub fn from_stats(stats: &[IvStat]) -> Result<Self, DomainError> {
        if !(MIN_IV_COUNT..=MAX_IV_COUNT).contains(&stats.len()) {
            return Err(DomainError::InvalidIvCount(stats.len()));
        }
        let set = Self {
            a: stats[0],
            b: stats[1],
            c: stats.get(2).copied(),
            d: stats.get(3).copied(),
            e: stats.get(4).copied(),
        };
        set.validate()?;
        Ok(set)
    }

    /// The stat bound to a breeder kind. `None` for `Nature` and empty slots.
    pub fn get(&self, kind: BreederKind) -> Option<IvStat> {
        match kind {
            BreederKind::A => Some(self.a),
            BreederKind::B => Some(self.b),
            BreederKind::C => self.c,
            BreederKind::D => self.d,
            BreederKind::E => self.e,
            BreederKind::Nature => None,
        }
    }

    /// Present stats in slot order.
    pub fn stats(&self) -> Vec<IvStat> {
        BreederKind::IV_KINDS
            .iter()
            .filter_map(|kind| self.get(*kind))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.stats().len()
    }

    /// Rejects a stat selected in two slots.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = BTreeSet::new();
        for stat in self.stats() {
            if !seen.insert(stat) {
                return Err(DomainError::DuplicateIv(stat.to_string()));
            }
        }
        Ok(())
    }
}

/// Target species, IVs and optional nature.
#[derive(Debug, Clone, PartialEq)]
pub struct BreedTarget {
    pub species: Species,
    pub ivs: IvSet,
    pub nature: Option<Nature>,
}

impl BreedTarget {
    pub fn new(species: Species, ivs: IvSet, nature: Option<Nature>) -> Self {
        Self {
            species,
            ivs,
            nature,
        }
    }

    pub fn iv_count(&self) -> usize {
        self.ivs.count()
    }

    pub fn is_natured(&self) -> bool {
        self.nature.is_some()
    }

    /// Index of the last row of the tree this target needs.
    pub fn height(&self) -> Result<u32, DomainError> {
        tree_height(self.iv_count(), self.is_natured())
    }
}
