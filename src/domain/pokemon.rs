//! Species and trait model: egg groups, natures, IV stats, genders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Pokedex number of Ditto.
pub const DITTO_NUMBER: u32 = 132;

/// Breeding category of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EggGroup {
    Monster,
    WaterA,
    WaterB,
    WaterC,
    Bug,
    Flying,
    Field,
    Fairy,
    Plant,
    Humanoid,
    Mineral,
    Chaos,
    Ditto,
    Dragon,
    CannotBreed,
    Genderless,
}

impl EggGroup {
    pub const ALL: [EggGroup; 16] = [
        EggGroup::Monster,
        EggGroup::WaterA,
        EggGroup::WaterB,
        EggGroup::WaterC,
        EggGroup::Bug,
        EggGroup::Flying,
        EggGroup::Field,
        EggGroup::Fairy,
        EggGroup::Plant,
        EggGroup::Humanoid,
        EggGroup::Mineral,
        EggGroup::Chaos,
        EggGroup::Ditto,
        EggGroup::Dragon,
        EggGroup::CannotBreed,
        EggGroup::Genderless,
    ];
}

impl fmt::Display for EggGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for EggGroup {
    type Err = DomainError;

    /// Accepts the tag as written in roster data (`WaterA`), tolerating
    /// spaces and case (`Water A`, `water a`).
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized: String = tag.chars().filter(|c| !c.is_whitespace()).collect();
        Self::ALL
            .iter()
            .copied()
            .find(|group| group.to_string().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| DomainError::UnknownEggGroup(tag.to_string()))
    }
}

/// One of the 25 personality traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    pub const ALL: [Nature; 25] = [
        Nature::Hardy,
        Nature::Lonely,
        Nature::Brave,
        Nature::Adamant,
        Nature::Naughty,
        Nature::Bold,
        Nature::Docile,
        Nature::Relaxed,
        Nature::Impish,
        Nature::Lax,
        Nature::Timid,
        Nature::Hasty,
        Nature::Serious,
        Nature::Jolly,
        Nature::Naive,
        Nature::Modest,
        Nature::Mild,
        Nature::Quiet,
        Nature::Bashful,
        Nature::Rash,
        Nature::Calm,
        Nature::Gentle,
        Nature::Sassy,
        Nature::Careful,
        Nature::Quirky,
    ];
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Nature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|n| n.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownNature(s.to_string()))
    }
}

/// One of the six individual-value stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IvStat {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl IvStat {
    pub const ALL: [IvStat; 6] = [
        IvStat::Hp,
        IvStat::Attack,
        IvStat::Defense,
        IvStat::SpecialAttack,
        IvStat::SpecialDefense,
        IvStat::Speed,
    ];

    /// Short label for compact output.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            IvStat::Hp => "HP",
            IvStat::Attack => "Atk",
            IvStat::Defense => "Def",
            IvStat::SpecialAttack => "SpA",
            IvStat::SpecialDefense => "SpD",
            IvStat::Speed => "Spe",
        }
    }
}

impl fmt::Display for IvStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for IvStat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|iv| iv.to_string().eq_ignore_ascii_case(s) || iv.abbreviation().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownIvStat(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Genderless,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Gender::Female),
            "male" | "m" => Ok(Gender::Male),
            "genderless" | "none" => Ok(Gender::Genderless),
            _ => Err(DomainError::UnknownGender(s.to_string())),
        }
    }
}

/// Which single target attribute a last-row breeder supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BreederKind {
    A,
    B,
    C,
    D,
    E,
    Nature,
}

impl BreederKind {
    /// IV-carrying kinds in slot order.
    pub const IV_KINDS: [BreederKind; 5] = [
        BreederKind::A,
        BreederKind::B,
        BreederKind::C,
        BreederKind::D,
        BreederKind::E,
    ];
}

impl fmt::Display for BreederKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Species record as it appears in roster data, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpecies {
    pub number: u32,
    pub name: String,
    pub egg_groups: Vec<String>,
    pub percentage_male: f64,
}

/// An immutable, validated species.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    number: u32,
    name: String,
    egg_groups: (EggGroup, Option<EggGroup>),
    percentage_male: f64,
}

impl Species {
    /// Validate a raw roster record. Rejects unknown egg-group tags and
    /// records with no egg group at all.
    pub fn parse(raw: &RawSpecies) -> Result<Self, DomainError> {
        let mut tags = raw.egg_groups.iter().filter(|t| !t.trim().is_empty());
        let primary = tags
            .next()
            .ok_or_else(|| DomainError::UnknownEggGroup(format!("<none> for #{}", raw.number)))?
            .parse::<EggGroup>()?;
        let secondary = tags.next().map(|t| t.parse::<EggGroup>()).transpose()?;

        Ok(Self {
            number: raw.number,
            name: raw.name.clone(),
            egg_groups: (primary, secondary),
            percentage_male: raw.percentage_male,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_egg_group(&self) -> EggGroup {
        self.egg_groups.0
    }

    /// The one or two egg groups of this species.
    pub fn egg_groups(&self) -> impl Iterator<Item = EggGroup> + '_ {
        std::iter::once(self.egg_groups.0).chain(self.egg_groups.1)
    }

    pub fn percentage_male(&self) -> f64 {
        self.percentage_male
    }

    pub fn is_ditto(&self) -> bool {
        self.primary_egg_group() == EggGroup::Ditto
    }

    pub fn is_genderless(&self) -> bool {
        self.primary_egg_group() == EggGroup::Genderless
    }

    pub fn shares_egg_group_with(&self, other: &Species) -> bool {
        self.egg_groups().any(|g| other.egg_groups().any(|o| o == g))
    }

    pub fn to_raw(&self) -> RawSpecies {
        RawSpecies {
            number: self.number,
            name: self.name.clone(),
            egg_groups: self.egg_groups().map(|g| g.to_string()).collect(),
            percentage_male: self.percentage_male,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.number)
    }
}

/// Resolves pokedex numbers against the species roster.
pub trait SpeciesLookup {
    fn species_by_number(&self, number: u32) -> Option<Species>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(number: u32, groups: &[&str]) -> RawSpecies {
        RawSpecies {
            number,
            name: format!("mon-{number}"),
            egg_groups: groups.iter().map(|g| g.to_string()).collect(),
            percentage_male: 50.0,
        }
    }

    #[test]
    fn given_valid_record_when_parsing_then_keeps_both_egg_groups() {
        let species = Species::parse(&raw(1, &["Monster", "Plant"])).unwrap();
        assert_eq!(
            species.egg_groups().collect::<Vec<_>>(),
            vec![EggGroup::Monster, EggGroup::Plant]
        );
    }

    #[test]
    fn given_spaced_tag_when_parsing_then_normalizes() {
        let species = Species::parse(&raw(7, &["Water A", "monster"])).unwrap();
        assert_eq!(species.primary_egg_group(), EggGroup::WaterA);
    }

    #[test]
    fn given_unknown_egg_group_when_parsing_then_rejects() {
        let err = Species::parse(&raw(1, &["Monster", "Robot"])).unwrap_err();
        assert!(matches!(err, DomainError::UnknownEggGroup(tag) if tag == "Robot"));
    }

    #[test]
    fn given_ditto_record_when_parsing_then_is_ditto_not_genderless() {
        let ditto = Species::parse(&raw(DITTO_NUMBER, &["Ditto"])).unwrap();
        assert!(ditto.is_ditto());
        assert!(!ditto.is_genderless());
    }

    #[test]
    fn given_short_names_when_parsing_traits_then_accepts_them() {
        assert_eq!("spa".parse::<IvStat>().unwrap(), IvStat::SpecialAttack);
        assert_eq!("Speed".parse::<IvStat>().unwrap(), IvStat::Speed);
        assert_eq!("adamant".parse::<Nature>().unwrap(), Nature::Adamant);
        assert_eq!("F".parse::<Gender>().unwrap(), Gender::Female);
    }
}
