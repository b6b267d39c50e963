//! Tests for pair resolution and propagation against the bundled roster

use std::collections::BTreeSet;

use rstest::{fixture, rstest};

use pokebreed::application::services::SpeciesCatalog;
use pokebreed::domain::{
    breed, propagate, AssignmentTable, BreedError, BreedErrors, BreedTarget, BreedTree, Gender,
    IvSet, IvStat, Mate, Position, Species, TreeBuilder, TreeNode, UpdateOrigin,
};

#[fixture]
fn catalog() -> SpeciesCatalog {
    SpeciesCatalog::builtin().unwrap()
}

fn tree_for(catalog: &SpeciesCatalog, root: &str, iv_count: usize) -> BreedTree {
    let table = AssignmentTable::standard();
    let ivs = IvSet::from_stats(&IvStat::ALL[..iv_count]).unwrap();
    let target = BreedTarget::new(catalog.find(root).unwrap().clone(), ivs, None);
    TreeBuilder::new(&table).build(&target).unwrap()
}

fn place(tree: &mut BreedTree, catalog: &SpeciesCatalog, row: u32, col: u32, name: &str, gender: Gender) {
    let node = tree.get_mut(Position::new(row, col)).unwrap();
    node.species = Some(catalog.find(name).unwrap().clone());
    node.gender = Some(gender);
}

fn empty_slot() -> TreeNode {
    TreeNode::new(Position::new(2, 0), vec![], None)
}

fn run(tree: &mut BreedTree, errors: &mut BreedErrors, catalog: &SpeciesCatalog) -> Vec<Position> {
    propagate(tree, errors, catalog.families(), UpdateOrigin::User).assigned
}

#[rstest]
fn given_field_and_water_parents_when_propagating_then_egg_group_error_on_left_leaf(
    catalog: SpeciesCatalog,
) {
    // Arrange
    let mut tree = tree_for(&catalog, "Bulbasaur", 2);
    place(&mut tree, &catalog, 1, 0, "Growlithe", Gender::Female);
    place(&mut tree, &catalog, 1, 1, "Dratini", Gender::Male);
    let mut errors = BreedErrors::new();

    // Act
    let assigned = run(&mut tree, &mut errors, &catalog);

    // Assert
    assert!(assigned.is_empty());
    assert_eq!(
        errors.get(&Position::new(1, 0)),
        Some(&BTreeSet::from([
            BreedError::EggGroupCompatibility,
            BreedError::RootLeafSpeciesMismatch,
        ]))
    );
    assert_eq!(
        tree.root().species.as_ref().map(Species::number),
        Some(1),
        "root is never overwritten"
    );
}

#[rstest]
fn given_matching_pair_under_root_when_propagating_then_accepted_without_errors(
    catalog: SpeciesCatalog,
) {
    let mut tree = tree_for(&catalog, "Bulbasaur", 2);
    place(&mut tree, &catalog, 1, 0, "Bulbasaur", Gender::Female);
    place(&mut tree, &catalog, 1, 1, "Bulbasaur", Gender::Male);
    let mut errors = BreedErrors::new();
    errors.insert(Position::new(1, 0), BTreeSet::from([BreedError::GenderCompatibility]));

    let assigned = run(&mut tree, &mut errors, &catalog);

    assert!(assigned.is_empty());
    assert!(errors.is_empty(), "stale entry must be cleared");
}

#[rstest]
fn given_ready_leaves_when_propagating_twice_then_second_pass_is_idle(catalog: SpeciesCatalog) {
    // Arrange
    let mut tree = tree_for(&catalog, "Bulbasaur", 3);
    place(&mut tree, &catalog, 2, 0, "Bulbasaur", Gender::Female);
    place(&mut tree, &catalog, 2, 1, "Charmander", Gender::Male);
    let mut errors = BreedErrors::new();

    // Act
    let first = run(&mut tree, &mut errors, &catalog);
    let after_first = tree.clone();
    let second = run(&mut tree, &mut errors, &catalog);

    // Assert
    assert_eq!(first, vec![Position::new(1, 0)]);
    let bred = tree.get(Position::new(1, 0)).unwrap();
    assert_eq!(bred.species.as_ref().map(Species::name), Some("Bulbasaur"));
    assert_eq!(bred.gender, None, "mixed ratio leaves gender to the user");
    assert!(second.is_empty());
    assert_eq!(tree, after_first);
    assert!(errors.is_empty());
}

#[rstest]
#[case("Nidoran-F", "Nidoran-M", Gender::Female, Gender::Male, Gender::Female)]
#[case("Kangaskhan", "Snorlax", Gender::Female, Gender::Male, Gender::Female)]
#[case("Tauros", "Tauros", Gender::Male, Gender::Female, Gender::Male)]
#[case("Magnemite", "Magneton", Gender::Genderless, Gender::Genderless, Gender::Female)]
fn given_fixed_ratio_child_when_propagating_then_gender_is_forced(
    catalog: SpeciesCatalog,
    #[case] mother: &str,
    #[case] father: &str,
    #[case] first: Gender,
    #[case] second: Gender,
    #[case] expected: Gender,
) {
    let mut tree = tree_for(&catalog, mother, 3);
    place(&mut tree, &catalog, 2, 0, mother, first);
    place(&mut tree, &catalog, 2, 1, father, second);
    let mut errors = BreedErrors::new();

    run(&mut tree, &mut errors, &catalog);

    let bred = tree.get(Position::new(1, 0)).unwrap();
    assert_eq!(bred.species.as_ref().map(Species::name), Some(mother));
    assert_eq!(bred.gender, Some(expected));
}

#[rstest]
fn given_propagation_origin_when_propagating_then_tree_and_errors_untouched(
    catalog: SpeciesCatalog,
) {
    let mut tree = tree_for(&catalog, "Bulbasaur", 3);
    place(&mut tree, &catalog, 2, 0, "Bulbasaur", Gender::Female);
    place(&mut tree, &catalog, 2, 1, "Bulbasaur", Gender::Male);
    let before = tree.clone();
    let mut errors = BreedErrors::new();

    let report = propagate(&mut tree, &mut errors, catalog.families(), UpdateOrigin::Propagation);

    assert!(!report.changed());
    assert_eq!(tree, before);
}

#[rstest]
fn given_ditto_with_any_gendered_partner_when_breeding_then_no_family_or_egg_group_error(
    catalog: SpeciesCatalog,
) {
    let ditto = catalog.ditto().unwrap();
    let slot = empty_slot();
    for partner in catalog.iter().filter(|s| !s.is_ditto() && !s.is_genderless()) {
        for gender in [Gender::Female, Gender::Male] {
            let result = breed(
                Mate { species: ditto, gender: Gender::Genderless },
                Mate { species: partner, gender },
                &slot,
                catalog.families(),
            );
            match result {
                Ok(child) => assert_eq!(child.number(), partner.number()),
                Err(errors) => {
                    assert!(!errors.contains(&BreedError::GenderlessSpeciesCompatibility));
                    assert!(!errors.contains(&BreedError::EggGroupCompatibility));
                }
            }
        }
    }
}

#[rstest]
fn given_any_pair_when_swapping_mates_then_same_errors(catalog: SpeciesCatalog) {
    let slot = empty_slot();
    let genders = [Gender::Female, Gender::Male, Gender::Genderless];
    for a in catalog.iter() {
        for b in catalog.iter() {
            for ga in genders {
                for gb in genders {
                    let forward = breed(
                        Mate { species: a, gender: ga },
                        Mate { species: b, gender: gb },
                        &slot,
                        catalog.families(),
                    );
                    let backward = breed(
                        Mate { species: b, gender: gb },
                        Mate { species: a, gender: ga },
                        &slot,
                        catalog.families(),
                    );
                    assert_eq!(
                        forward.err(),
                        backward.err(),
                        "{} {} x {} {}",
                        a,
                        ga,
                        b,
                        gb
                    );
                }
            }
        }
    }
}

#[rstest]
fn given_genderless_species_with_ditto_when_breeding_then_family_check_fires_either_way(
    catalog: SpeciesCatalog,
) {
    let ditto = Mate {
        species: catalog.ditto().unwrap(),
        gender: Gender::Genderless,
    };
    let staryu = Mate {
        species: catalog.find("Staryu").unwrap(),
        gender: Gender::Genderless,
    };

    for (first, second) in [(staryu, ditto), (ditto, staryu)] {
        let errors = breed(first, second, &empty_slot(), catalog.families()).unwrap_err();
        assert!(errors.contains(&BreedError::GenderlessSpeciesCompatibility));
        assert!(!errors.contains(&BreedError::EggGroupCompatibility));
    }
}
