//! Breed plan service
//!
//! Owns the plan lifecycle: create, edit, retarget, import/export and
//! persistence of the current plan. Every mutation ends with one
//! propagation pass.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::services::SpeciesCatalog;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt, JsonResultExt};
use crate::domain::reference::expected_cost;
use crate::domain::snapshot::snapshot_tree;
use crate::domain::{
    apply_snapshot, current_cost, propagate, AssignmentTable, BreedErrors, BreedTarget,
    BreedTree, DomainError, Gender, GenderlessFamilies, ItemCosts, IvSet, Nature, PlanSnapshot,
    Position, PropagationReport, Species, SpeciesLookup, TargetSnapshot, TreeBuilder,
    UpdateOrigin,
};
use crate::infrastructure::traits::FileSystem;

/// A user edit on one node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEdit {
    SetSpecies(Species),
    ClearSpecies,
    SetGender(Option<Gender>),
    SetNickname(Option<String>),
    ToggleGenderCostIgnored,
}

/// A breed target, its tree and the advisory errors of the last pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BreedPlan {
    target: BreedTarget,
    tree: BreedTree,
    errors: BreedErrors,
}

impl BreedPlan {
    pub fn target(&self) -> &BreedTarget {
        &self.target
    }

    pub fn tree(&self) -> &BreedTree {
        &self.tree
    }

    pub fn errors(&self) -> &BreedErrors {
        &self.errors
    }

    /// Run the propagation pass for an update of the given origin.
    pub fn apply_update(
        &mut self,
        families: &GenderlessFamilies,
        origin: UpdateOrigin,
    ) -> PropagationReport {
        propagate(&mut self.tree, &mut self.errors, families, origin)
    }

    /// Persistable state of this plan.
    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot::capture(&self.target, &self.tree)
    }

    pub fn current_cost(&self, items: ItemCosts) -> ApplicationResult<u32> {
        Ok(current_cost(&self.tree, items)?)
    }

    pub fn expected_cost(&self) -> ApplicationResult<u32> {
        Ok(expected_cost(
            self.target.iv_count(),
            self.target.is_natured(),
        )?)
    }
}

/// Service for creating, editing and persisting breed plans.
pub struct BreedPlanService {
    fs: Arc<dyn FileSystem>,
    catalog: Arc<SpeciesCatalog>,
    table: AssignmentTable,
    plan_path: PathBuf,
}

impl BreedPlanService {
    /// Create a new plan service saving to `plan_path`.
    pub fn new(fs: Arc<dyn FileSystem>, catalog: Arc<SpeciesCatalog>, plan_path: PathBuf) -> Self {
        Self {
            fs,
            catalog,
            table: AssignmentTable::standard(),
            plan_path,
        }
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    pub fn table(&self) -> &AssignmentTable {
        &self.table
    }

    pub fn plan_path(&self) -> &Path {
        &self.plan_path
    }

    /// Build a fresh plan for `target`.
    #[instrument(level = "debug", skip(self, target), fields(species = %target.species))]
    pub fn create(&self, target: BreedTarget) -> ApplicationResult<BreedPlan> {
        let tree = TreeBuilder::new(&self.table).build(&target)?;
        let mut plan = BreedPlan {
            target,
            tree,
            errors: BreedErrors::new(),
        };
        plan.apply_update(self.catalog.families(), UpdateOrigin::User);
        Ok(plan)
    }

    /// Apply one edit at `position`, then propagate.
    #[instrument(level = "debug", skip(self, plan, edit))]
    pub fn edit(
        &self,
        plan: &mut BreedPlan,
        position: Position,
        edit: NodeEdit,
    ) -> ApplicationResult<PropagationReport> {
        let node = plan.tree.node_mut(position)?;
        match edit {
            NodeEdit::SetSpecies(_) | NodeEdit::ClearSpecies if node.is_root() => {
                return Err(DomainError::RootSpeciesLocked.into());
            }
            NodeEdit::SetSpecies(species) => {
                node.gender = derive_gender(&species, node.gender);
                debug!("{} <- {}", position, species);
                node.species = Some(species);
            }
            NodeEdit::ClearSpecies => {
                node.species = None;
                node.gender = None;
            }
            NodeEdit::SetGender(gender) => node.gender = gender,
            NodeEdit::SetNickname(nickname) => {
                node.nickname = nickname.filter(|n| !n.trim().is_empty());
            }
            NodeEdit::ToggleGenderCostIgnored => {
                node.gender_cost_ignored = !node.gender_cost_ignored;
            }
        }
        Ok(plan.apply_update(self.catalog.families(), UpdateOrigin::User))
    }

    /// Rebuild the plan for a changed target, keeping node state that
    /// still has a place in the new tree. The root entry is dropped so the
    /// new target species wins.
    #[instrument(level = "debug", skip(self, plan))]
    pub fn retarget(
        &self,
        plan: &BreedPlan,
        species: Option<Species>,
        ivs: Option<IvSet>,
        nature: Option<Option<Nature>>,
    ) -> ApplicationResult<BreedPlan> {
        let target = BreedTarget::new(
            species.unwrap_or_else(|| plan.target.species.clone()),
            ivs.unwrap_or(plan.target.ivs),
            nature.unwrap_or(plan.target.nature),
        );

        let mut tree = TreeBuilder::new(&self.table).build(&target)?;
        let mut carried = snapshot_tree(&plan.tree);
        carried.retain(|key, _| {
            key.parse::<Position>()
                .is_ok_and(|p| !p.is_root() && tree.contains(p))
        });
        apply_snapshot(&mut tree, &carried, self.catalog.as_ref())?;

        let mut next = BreedPlan {
            target,
            tree,
            errors: BreedErrors::new(),
        };
        next.apply_update(self.catalog.families(), UpdateOrigin::User);
        Ok(next)
    }

    pub fn export(&self, plan: &BreedPlan) -> PlanSnapshot {
        plan.snapshot()
    }

    pub fn export_json(&self, plan: &BreedPlan) -> ApplicationResult<String> {
        plan.snapshot().to_json().with_snapshot_context("serialize plan")
    }

    /// Build a plan from a snapshot. Nothing is replaced unless this
    /// returns `Ok`.
    #[instrument(level = "debug", skip_all)]
    pub fn import(&self, snapshot: &PlanSnapshot) -> ApplicationResult<BreedPlan> {
        let number = snapshot.root_species().ok_or(DomainError::MissingRootEntry)?;
        let species = self
            .catalog
            .species_by_number(number)
            .ok_or(DomainError::UnknownSpecies(number))?;
        let TargetSnapshot { ivs, nature } = snapshot.breed_target.clone();
        let target = BreedTarget::new(species, ivs, nature);

        let tree = TreeBuilder::new(&self.table).build_with_snapshot(
            &target,
            &snapshot.breed_tree,
            self.catalog.as_ref(),
        )?;
        let mut plan = BreedPlan {
            target,
            tree,
            errors: BreedErrors::new(),
        };
        plan.apply_update(self.catalog.families(), UpdateOrigin::User);
        Ok(plan)
    }

    pub fn import_json(&self, json: &str) -> ApplicationResult<BreedPlan> {
        let snapshot = PlanSnapshot::from_json(json).with_snapshot_context("parse plan")?;
        self.import(&snapshot)
    }

    /// Write the plan to the plan file.
    ///
    /// Writing does not re-enter propagation; the pass already ran with
    /// `UpdateOrigin::User` inside the mutating call.
    pub fn save(&self, plan: &BreedPlan) -> ApplicationResult<()> {
        let json = self.export_json(plan)?;
        self.fs
            .ensure_parent(&self.plan_path)
            .with_path_context("create plan directory", &self.plan_path)?;
        self.fs
            .write(&self.plan_path, &json)
            .with_path_context("write plan", &self.plan_path)?;
        info!("saved plan to {}", self.plan_path.display());
        Ok(())
    }

    /// Load the saved plan.
    pub fn load(&self) -> ApplicationResult<BreedPlan> {
        if !self.fs.exists(&self.plan_path) {
            return Err(ApplicationError::NoPlan(self.plan_path.clone()));
        }
        let json = self
            .fs
            .read_to_string(&self.plan_path)
            .with_path_context("read plan", &self.plan_path)?;
        self.import_json(&json)
    }

    /// Delete the saved plan. Returns whether there was one.
    pub fn reset(&self) -> ApplicationResult<bool> {
        if !self.fs.exists(&self.plan_path) {
            return Ok(false);
        }
        self.fs
            .remove_file(&self.plan_path)
            .with_path_context("remove plan", &self.plan_path)?;
        info!("removed plan {}", self.plan_path.display());
        Ok(true)
    }
}

/// Gender after picking `species` by hand.
fn derive_gender(species: &Species, previous: Option<Gender>) -> Option<Gender> {
    if species.is_ditto() || species.is_genderless() {
        Some(Gender::Genderless)
    } else if species.percentage_male() == 0.0 {
        Some(Gender::Female)
    } else if species.percentage_male() == 100.0 {
        Some(Gender::Male)
    } else if previous == Some(Gender::Genderless) {
        None
    } else {
        previous
    }
}
