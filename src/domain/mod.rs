//! Domain layer: breeding-tree engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod breed;
pub mod builder;
pub mod cost;
pub mod error;
pub mod node;
pub mod pokemon;
pub mod position;
pub mod propagate;
pub mod reference;
pub mod snapshot;
pub mod target;

pub use arena::BreedTree;
pub use breed::{breed, BreedResult, Mate};
pub use builder::{apply_snapshot, TreeBuilder, TreeResult};
pub use cost::{current_cost, held_item, HeldItem, ItemCosts};
pub use error::{BreedError, DomainError};
pub use node::TreeNode;
pub use pokemon::{
    BreederKind, EggGroup, Gender, IvStat, Nature, RawSpecies, Species, SpeciesLookup,
    DITTO_NUMBER,
};
pub use position::Position;
pub use propagate::{propagate, BreedErrors, PropagationReport, UpdateOrigin};
pub use reference::{AssignmentTable, GenderlessFamilies};
pub use snapshot::{snapshot_tree, NodeSnapshot, PlanSnapshot, TargetSnapshot, TreeSnapshot};
pub use target::{BreedTarget, IvSet};
