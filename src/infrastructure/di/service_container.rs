//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{BreedPlanService, SpeciesCatalog};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Species roster
    pub catalog: Arc<SpeciesCatalog>,

    /// Plan lifecycle
    pub planner: BreedPlanService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings, plan_override: Option<PathBuf>) -> InfraResult<Self> {
        Self::with_deps(settings, plan_override, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        plan_override: Option<PathBuf>,
        fs: Arc<dyn FileSystem>,
    ) -> InfraResult<Self> {
        let catalog = Arc::new(SpeciesCatalog::load(
            fs.as_ref(),
            settings.species_file.as_deref(),
        )?);
        let plan_path = plan_override.unwrap_or_else(|| settings.plan_path());
        let planner = BreedPlanService::new(Arc::clone(&fs), Arc::clone(&catalog), plan_path);

        Ok(Self {
            settings: Arc::new(settings),
            fs,
            catalog,
            planner,
        })
    }
}
