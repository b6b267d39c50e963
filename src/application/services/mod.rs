//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod catalog;
mod planner;

pub use catalog::{SpeciesCatalog, BUILTIN_ROSTER};
pub use planner::{BreedPlan, BreedPlanService, NodeEdit};
