//! Held items and money spent on a breeding tree.

use std::fmt;

use tracing::trace;

use crate::domain::arena::BreedTree;
use crate::domain::error::DomainError;
use crate::domain::pokemon::{Gender, IvStat};
use crate::domain::position::Position;
use crate::domain::reference::{gender_guarantee_cost, IV_ITEM_COST, NATURE_ITEM_COST};

/// Item given to a breeder to force one trait onto the offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeldItem {
    PowerWeight,
    PowerBracer,
    PowerBelt,
    PowerLens,
    PowerBand,
    PowerAnklet,
    Everstone,
}

impl HeldItem {
    pub fn for_iv(iv: IvStat) -> Self {
        match iv {
            IvStat::Hp => HeldItem::PowerWeight,
            IvStat::Attack => HeldItem::PowerBracer,
            IvStat::Defense => HeldItem::PowerBelt,
            IvStat::SpecialAttack => HeldItem::PowerLens,
            IvStat::SpecialDefense => HeldItem::PowerBand,
            IvStat::Speed => HeldItem::PowerAnklet,
        }
    }

    pub fn is_nature_item(&self) -> bool {
        matches!(self, HeldItem::Everstone)
    }

    pub fn name(&self) -> &'static str {
        match self {
            HeldItem::PowerWeight => "Power Weight",
            HeldItem::PowerBracer => "Power Bracer",
            HeldItem::PowerBelt => "Power Belt",
            HeldItem::PowerLens => "Power Lens",
            HeldItem::PowerBand => "Power Band",
            HeldItem::PowerAnklet => "Power Anklet",
            HeldItem::Everstone => "Everstone",
        }
    }
}

impl fmt::Display for HeldItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flat prices of the held items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCosts {
    pub iv: u32,
    pub nature: u32,
}

impl Default for ItemCosts {
    fn default() -> Self {
        Self {
            iv: IV_ITEM_COST,
            nature: NATURE_ITEM_COST,
        }
    }
}

impl ItemCosts {
    pub fn price(&self, item: HeldItem) -> u32 {
        if item.is_nature_item() {
            self.nature
        } else {
            self.iv
        }
    }
}

/// The item the node at `position` must hold when bred with its mate.
///
/// A nature its mate lacks takes precedence; otherwise the first IV the
/// mate does not carry. The root has no mate and holds nothing.
pub fn held_item(tree: &BreedTree, position: Position) -> Option<HeldItem> {
    let node = tree.get(position)?;
    let mate = tree.mate(position)?;

    if node.nature().is_some() && mate.nature().is_none() {
        return Some(HeldItem::Everstone);
    }
    node.ivs()
        .iter()
        .find(|iv| !mate.ivs().contains(iv))
        .map(|iv| HeldItem::for_iv(*iv))
}

/// Money spent so far: gender guarantees for bred nodes plus held items
/// for every node with a species.
///
/// Last-row breeders are supplied directly, so they carry no gender cost;
/// neither does a node flagged `gender_cost_ignored`.
pub fn current_cost(tree: &BreedTree, items: ItemCosts) -> Result<u32, DomainError> {
    let mut total = 0;
    for node in tree.iter() {
        let Some(species) = &node.species else {
            continue;
        };

        if !node.gender_cost_ignored && !tree.is_last_row(node.position()) {
            let chance = match node.gender {
                Some(Gender::Male) => Some(species.percentage_male()),
                Some(Gender::Female) => Some(100.0 - species.percentage_male()),
                _ => None,
            };
            if let Some(chance) = chance {
                total += gender_guarantee_cost(chance)?;
            }
        }

        if let Some(item) = held_item(tree, node.position()) {
            trace!("{} holds {}", node.position(), item);
            total += items.price(item);
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::TreeBuilder;
    use crate::domain::pokemon::{Nature, RawSpecies, Species};
    use crate::domain::reference::AssignmentTable;
    use crate::domain::target::{BreedTarget, IvSet};

    fn bulbasaur() -> Species {
        Species::parse(&RawSpecies {
            number: 1,
            name: "Bulbasaur".into(),
            egg_groups: vec!["Monster".into(), "Plant".into()],
            percentage_male: 87.5,
        })
        .unwrap()
    }

    fn natured_tree() -> BreedTree {
        let table = AssignmentTable::standard();
        let target = BreedTarget::new(
            bulbasaur(),
            IvSet::new(IvStat::Hp, IvStat::Attack),
            Some(Nature::Modest),
        );
        TreeBuilder::new(&table).build(&target).unwrap()
    }

    #[test]
    fn given_nature_leaf_when_asking_item_then_everstone() {
        let tree = natured_tree();
        assert_eq!(held_item(&tree, Position::new(2, 0)), Some(HeldItem::Everstone));
        assert_eq!(held_item(&tree, Position::new(2, 1)), Some(HeldItem::PowerWeight));
        assert_eq!(held_item(&tree, Position::ROOT), None);
    }

    #[test]
    fn given_empty_tree_when_costing_then_only_root_item_free() {
        let tree = natured_tree();
        // Only the root has a species and it holds nothing.
        assert_eq!(current_cost(&tree, ItemCosts::default()).unwrap(), 0);
    }

    #[test]
    fn given_female_middle_node_when_costing_then_adds_gender_and_item() {
        let mut tree = natured_tree();
        let node = tree.get_mut(Position::new(1, 1)).unwrap();
        node.species = Some(bulbasaur());
        node.gender = Some(Gender::Female);
        // 12.5% female chance plus the item for HP/Atk vs nature+HP.
        let cost = current_cost(&tree, ItemCosts::default()).unwrap();
        assert_eq!(cost, 21_000 + IV_ITEM_COST);

        tree.get_mut(Position::new(1, 1)).unwrap().gender_cost_ignored = true;
        assert_eq!(current_cost(&tree, ItemCosts::default()).unwrap(), IV_ITEM_COST);
    }

    #[test]
    fn given_last_row_breeder_when_costing_then_no_gender_cost() {
        let mut tree = natured_tree();
        let node = tree.get_mut(Position::new(2, 3)).unwrap();
        node.species = Some(bulbasaur());
        node.gender = Some(Gender::Male);
        let items = ItemCosts { iv: 1, nature: 2 };
        assert_eq!(current_cost(&tree, items).unwrap(), 1);
    }
}
