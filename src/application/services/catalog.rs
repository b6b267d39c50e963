//! Species roster service
//!
//! Loads the roster (built-in or user supplied JSON), validates every record
//! and answers lookups by number or name.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{GenderlessFamilies, RawSpecies, Species, SpeciesLookup, DITTO_NUMBER};
use crate::infrastructure::traits::FileSystem;

/// Roster shipped with the binary.
pub const BUILTIN_ROSTER: &str = include_str!("../../../data/species.json");

/// Validated species roster plus the genderless evolution families.
#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    species: BTreeMap<u32, Species>,
    families: GenderlessFamilies,
}

impl SpeciesCatalog {
    /// Catalog from already validated species.
    pub fn new(species: impl IntoIterator<Item = Species>, families: GenderlessFamilies) -> Self {
        Self {
            species: species.into_iter().map(|s| (s.number(), s)).collect(),
            families,
        }
    }

    /// The built-in roster.
    pub fn builtin() -> ApplicationResult<Self> {
        Self::from_json(BUILTIN_ROSTER, "built-in roster")
    }

    /// Load `path` if given, else the built-in roster.
    #[instrument(level = "debug", skip(fs))]
    pub fn load(fs: &dyn FileSystem, path: Option<&Path>) -> ApplicationResult<Self> {
        match path {
            Some(path) => {
                let json = fs
                    .read_to_string(path)
                    .with_path_context("read species roster", path)?;
                Self::from_json(&json, &path.display().to_string())
            }
            None => Self::builtin(),
        }
    }

    /// Parse a JSON array of raw species records. `source` names the
    /// origin in error messages.
    pub fn from_json(json: &str, source: &str) -> ApplicationResult<Self> {
        let raw: Vec<RawSpecies> =
            serde_json::from_str(json).map_err(|e| ApplicationError::Catalog {
                message: format!("parse {source}: {e}"),
            })?;

        let mut species = BTreeMap::new();
        for record in &raw {
            let parsed = Species::parse(record)?;
            if species.insert(parsed.number(), parsed).is_some() {
                return Err(ApplicationError::Catalog {
                    message: format!("duplicate pokedex number {} in {source}", record.number),
                });
            }
        }
        debug!("loaded {} species from {}", species.len(), source);

        Ok(Self {
            species,
            families: GenderlessFamilies::standard(),
        })
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn families(&self) -> &GenderlessFamilies {
        &self.families
    }

    /// All species in pokedex order.
    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.values()
    }

    pub fn by_number(&self, number: u32) -> Option<&Species> {
        self.species.get(&number)
    }

    pub fn by_name(&self, name: &str) -> Option<&Species> {
        let name = name.trim();
        self.species
            .values()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Resolve a pokedex number or a name.
    pub fn find(&self, query: &str) -> ApplicationResult<&Species> {
        let found = match query.trim().parse::<u32>() {
            Ok(number) => self.by_number(number),
            Err(_) => self.by_name(query),
        };
        found.ok_or_else(|| ApplicationError::Catalog {
            message: format!("unknown species: {query}"),
        })
    }

    pub fn ditto(&self) -> Option<&Species> {
        self.by_number(DITTO_NUMBER)
    }

    /// Species that can breed towards `target`: Ditto first, then the
    /// genderless family of a genderless target, or everything sharing an
    /// egg group otherwise.
    pub fn compatible_with(&self, target: &Species) -> Vec<&Species> {
        let matching = self.species.values().filter(|s| !s.is_ditto()).filter(|s| {
            if target.is_genderless() {
                s.number() == target.number()
                    || self.families.same_family(target.number(), s.number())
            } else {
                !s.is_genderless() && s.shares_egg_group_with(target)
            }
        });
        self.ditto().into_iter().chain(matching).collect()
    }
}

impl SpeciesLookup for SpeciesCatalog {
    fn species_by_number(&self, number: u32) -> Option<Species> {
        self.by_number(number).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_builtin_roster_when_loading_then_has_ditto_and_families() {
        let catalog = SpeciesCatalog::builtin().unwrap();
        assert!(catalog.ditto().is_some_and(Species::is_ditto));
        for family in [&[81u32, 82, 462][..], &[120, 121], &[374, 375, 376]] {
            for number in family {
                assert!(catalog.by_number(*number).is_some_and(Species::is_genderless));
            }
        }
    }

    #[test]
    fn given_name_in_any_case_when_finding_then_resolves() {
        let catalog = SpeciesCatalog::builtin().unwrap();
        assert_eq!(catalog.find("bulbasaur").unwrap().number(), 1);
        assert_eq!(catalog.find("132").unwrap().name(), "Ditto");
        assert!(catalog.find("missingno").is_err());
    }

    #[test]
    fn given_genderless_target_when_filtering_then_ditto_first_then_family() {
        let catalog = SpeciesCatalog::builtin().unwrap();
        let magnemite = catalog.by_number(81).unwrap();
        let numbers: Vec<u32> = catalog
            .compatible_with(magnemite)
            .iter()
            .map(|s| s.number())
            .collect();
        assert_eq!(numbers, vec![132, 81, 82, 462]);
    }

    #[test]
    fn given_gendered_target_when_filtering_then_shares_an_egg_group() {
        let catalog = SpeciesCatalog::builtin().unwrap();
        let squirtle = catalog.by_number(7).unwrap();
        let compatible = catalog.compatible_with(squirtle);
        assert!(compatible[0].is_ditto());
        assert!(compatible[1..].iter().all(|s| s.shares_egg_group_with(squirtle)));
        assert!(compatible.iter().any(|s| s.number() == 147));
    }

    #[test]
    fn given_unknown_egg_group_when_parsing_roster_then_fails() {
        let json = r#"[{ "number": 1, "name": "X", "eggGroups": ["Robot"], "percentageMale": 50 }]"#;
        let err = SpeciesCatalog::from_json(json, "test").unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::UnknownEggGroup(_))
        ));
    }

    #[test]
    fn given_duplicate_number_when_parsing_roster_then_fails() {
        let json = r#"[
            { "number": 1, "name": "A", "eggGroups": ["Monster"], "percentageMale": 50 },
            { "number": 1, "name": "B", "eggGroups": ["Monster"], "percentageMale": 50 }
        ]"#;
        assert!(matches!(
            SpeciesCatalog::from_json(json, "test"),
            Err(ApplicationError::Catalog { .. })
        ));
    }
}
