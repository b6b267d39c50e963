//! Static reference data the engine consumes read-only: the last-row
//! assignment table, genderless evolution families and cost tables.

use std::collections::BTreeMap;

use crate::domain::error::DomainError;
use crate::domain::pokemon::BreederKind;
use crate::domain::position::Position;

use BreederKind as K;

pub const MIN_IV_COUNT: usize = 2;
pub const MAX_IV_COUNT: usize = 5;

/// Height of the tree (index of the last row) for a target.
pub fn tree_height(iv_count: usize, natured: bool) -> Result<u32, DomainError> {
    if !(MIN_IV_COUNT..=MAX_IV_COUNT).contains(&iv_count) {
        return Err(DomainError::InvalidIvCount(iv_count));
    }
    let height = if natured { iv_count } else { iv_count - 1 };
    Ok(height as u32)
}

// Last-row kinds in column order. Intentionally unbalanced; do not derive.
const LAYOUT_2_NATURED: [BreederKind; 4] = [K::Nature, K::A, K::A, K::B];
const LAYOUT_2_NATURELESS: [BreederKind; 2] = [K::A, K::B];
const LAYOUT_3_NATURED: [BreederKind; 8] = [K::Nature, K::A, K::A, K::B, K::A, K::B, K::A, K::B];
const LAYOUT_3_NATURELESS: [BreederKind; 4] = [K::A, K::B, K::A, K::C];
const LAYOUT_4_NATURED: [BreederKind; 16] = [
    K::Nature, K::A, K::A, K::B, K::A, K::B, K::A, K::C,
    K::A, K::B, K::A, K::C, K::B, K::C, K::B, K::D,
];
const LAYOUT_4_NATURELESS: [BreederKind; 8] = [K::A, K::B, K::A, K::C, K::B, K::C, K::B, K::D];
const LAYOUT_5_NATURED: [BreederKind; 32] = [
    K::A, K::B, K::A, K::C, K::B, K::C, K::B, K::D,
    K::B, K::C, K::B, K::D, K::C, K::D, K::C, K::E,
    K::Nature, K::B, K::B, K::C, K::B, K::C, K::B, K::D,
    K::B, K::C, K::B, K::D, K::C, K::D, K::C, K::E,
];
const LAYOUT_5_NATURELESS: [BreederKind; 16] = [
    K::A, K::B, K::A, K::C, K::B, K::C, K::B, K::D,
    K::B, K::C, K::B, K::D, K::C, K::D, K::C, K::E,
];

/// Maps `(iv_count, natured)` to the breeder kind of every last-row slot.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentTable {
    layouts: BTreeMap<(usize, bool), BTreeMap<Position, BreederKind>>,
}

impl Default for AssignmentTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl AssignmentTable {
    /// An empty table; fill it with [`AssignmentTable::insert_layout`].
    pub fn empty() -> Self {
        Self {
            layouts: BTreeMap::new(),
        }
    }

    /// The pre-optimized breeding pyramids used by the planner.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        let rows: [(usize, bool, &[BreederKind]); 8] = [
            (2, true, &LAYOUT_2_NATURED),
            (2, false, &LAYOUT_2_NATURELESS),
            (3, true, &LAYOUT_3_NATURED),
            (3, false, &LAYOUT_3_NATURELESS),
            (4, true, &LAYOUT_4_NATURED),
            (4, false, &LAYOUT_4_NATURELESS),
            (5, true, &LAYOUT_5_NATURED),
            (5, false, &LAYOUT_5_NATURELESS),
        ];
        for (iv_count, natured, kinds) in rows {
            let row = (if natured { iv_count } else { iv_count - 1 }) as u32;
            let layout = kinds
                .iter()
                .enumerate()
                .map(|(col, kind)| (Position::new(row, col as u32), *kind))
                .collect();
            table.layouts.insert((iv_count, natured), layout);
        }
        table
    }

    pub fn insert_layout(
        &mut self,
        iv_count: usize,
        natured: bool,
        layout: BTreeMap<Position, BreederKind>,
    ) {
        self.layouts.insert((iv_count, natured), layout);
    }

    /// Last-row layout for a target. Fails for counts outside `2..=5`
    /// or counts the table has no entry for.
    pub fn layout(
        &self,
        iv_count: usize,
        natured: bool,
    ) -> Result<&BTreeMap<Position, BreederKind>, DomainError> {
        tree_height(iv_count, natured)?;
        self.layouts
            .get(&(iv_count, natured))
            .ok_or(DomainError::InvalidIvCount(iv_count))
    }

    /// How many breeders of each IV kind the last row needs.
    /// The nature breeder is not counted.
    pub fn breeder_counts(
        &self,
        iv_count: usize,
        natured: bool,
    ) -> Result<BTreeMap<BreederKind, usize>, DomainError> {
        let mut counts = BTreeMap::new();
        for kind in self.layout(iv_count, natured)?.values() {
            if *kind != BreederKind::Nature {
                *counts.entry(*kind).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

const MAGNEMITE_FAMILY: &[u32] = &[81, 82, 462];
const STARYU_FAMILY: &[u32] = &[120, 121];
const BRONZOR_FAMILY: &[u32] = &[436, 437];
const BELDUM_FAMILY: &[u32] = &[374, 375, 376];
const BALTOY_FAMILY: &[u32] = &[343, 344];
const VOLTORB_FAMILY: &[u32] = &[100, 101];
const PORYGON_FAMILY: &[u32] = &[137, 233, 474];
const KLINK_FAMILY: &[u32] = &[599, 600, 601];
const GOLETT_FAMILY: &[u32] = &[622, 623];

/// Evolution families of genderless species that may cross-breed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenderlessFamilies {
    families: Vec<Vec<u32>>,
}

impl Default for GenderlessFamilies {
    fn default() -> Self {
        Self::standard()
    }
}

impl GenderlessFamilies {
    pub fn new(families: Vec<Vec<u32>>) -> Self {
        Self { families }
    }

    pub fn standard() -> Self {
        Self::new(
            [
                MAGNEMITE_FAMILY,
                STARYU_FAMILY,
                BRONZOR_FAMILY,
                BELDUM_FAMILY,
                BALTOY_FAMILY,
                VOLTORB_FAMILY,
                PORYGON_FAMILY,
                KLINK_FAMILY,
                GOLETT_FAMILY,
            ]
            .iter()
            .map(|f| f.to_vec())
            .collect(),
        )
    }

    /// The family containing `number`, if it is a listed genderless species.
    pub fn family_of(&self, number: u32) -> Option<&[u32]> {
        self.families
            .iter()
            .find(|family| family.contains(&number))
            .map(Vec::as_slice)
    }

    /// Whether `other` belongs to the family of `number`. Unlisted species
    /// have no family and match nothing.
    pub fn same_family(&self, number: u32, other: u32) -> bool {
        self.family_of(number)
            .is_some_and(|family| family.contains(&other))
    }
}

/// Price of the IV-forcing held items.
pub const IV_ITEM_COST: u32 = 10_000;
/// Price of the nature-forcing held item.
pub const NATURE_ITEM_COST: u32 = 6_000;

// Keyed by male percentage in tenths, so 87.5% is 875.
const GENDER_GUARANTEE_COSTS: [(i64, u32); 7] = [
    (875, 5_000),
    (750, 5_000),
    (500, 5_000),
    (250, 9_000),
    (125, 21_000),
    (0, 0),
    (1000, 0),
];

/// Cost of guaranteeing an offspring whose gender occurs `percentage`% of the time.
pub fn gender_guarantee_cost(percentage: f64) -> Result<u32, DomainError> {
    let key = (percentage * 10.0).round() as i64;
    GENDER_GUARANTEE_COSTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, cost)| *cost)
        .ok_or(DomainError::UnknownGenderRatio(percentage))
}

/// Typical total spend for a full breed of this size.
pub fn expected_cost(iv_count: usize, natured: bool) -> Result<u32, DomainError> {
    let (with_nature, without_nature) = match iv_count {
        2 => (75_000, 20_000),
        3 => (170_000, 65_000),
        4 => (355_000, 155_000),
        5 => (715_000, 340_000),
        n => return Err(DomainError::InvalidIvCount(n)),
    };
    Ok(if natured { with_nature } else { without_nature })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2, true, 2)]
    #[case(2, false, 1)]
    #[case(3, true, 3)]
    #[case(3, false, 2)]
    #[case(4, true, 4)]
    #[case(4, false, 3)]
    #[case(5, true, 5)]
    #[case(5, false, 4)]
    fn given_standard_table_when_reading_layout_then_fills_last_row(
        #[case] iv_count: usize,
        #[case] natured: bool,
        #[case] height: u32,
    ) {
        let table = AssignmentTable::standard();
        let layout = table.layout(iv_count, natured).unwrap();
        assert_eq!(layout.len(), Position::row_width(height) as usize);
        assert!(layout.keys().all(|p| p.row == height));
        assert_eq!(
            layout.values().filter(|k| **k == BreederKind::Nature).count(),
            usize::from(natured)
        );
    }

    #[test]
    fn given_out_of_range_count_when_reading_layout_then_fails() {
        let table = AssignmentTable::standard();
        assert_eq!(table.layout(6, false), Err(DomainError::InvalidIvCount(6)));
        assert_eq!(table.layout(1, true), Err(DomainError::InvalidIvCount(1)));
    }

    #[rstest]
    #[case(2, true, vec![(K::A, 2), (K::B, 1)])]
    #[case(3, false, vec![(K::A, 2), (K::B, 1), (K::C, 1)])]
    #[case(4, true, vec![(K::A, 6), (K::B, 5), (K::C, 3), (K::D, 1)])]
    #[case(5, false, vec![(K::A, 2), (K::B, 5), (K::C, 5), (K::D, 3), (K::E, 1)])]
    fn given_layout_when_counting_breeders_then_excludes_nature(
        #[case] iv_count: usize,
        #[case] natured: bool,
        #[case] expected: Vec<(BreederKind, usize)>,
    ) {
        let counts = AssignmentTable::standard()
            .breeder_counts(iv_count, natured)
            .unwrap();
        assert_eq!(counts.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn given_family_member_when_checking_family_then_matches_relatives_only() {
        let families = GenderlessFamilies::standard();
        assert!(families.same_family(81, 462));
        assert!(!families.same_family(81, 120));
        assert!(!families.same_family(132, 81));
    }

    #[rstest]
    #[case(87.5, 5_000)]
    #[case(50.0, 5_000)]
    #[case(25.0, 9_000)]
    #[case(12.5, 21_000)]
    #[case(100.0, 0)]
    fn given_known_ratio_when_pricing_gender_then_uses_table(#[case] pct: f64, #[case] cost: u32) {
        assert_eq!(gender_guarantee_cost(pct).unwrap(), cost);
    }

    #[test]
    fn given_unlisted_ratio_when_pricing_gender_then_fails() {
        assert!(gender_guarantee_cost(33.0).is_err());
    }
}
