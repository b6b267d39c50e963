//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pokebreed/pokebreed.toml`
//! 3. Environment variables: `POKEBREED_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::reference::{IV_ITEM_COST, NATURE_ITEM_COST};
use crate::domain::ItemCosts;

/// File name of the saved plan inside `data_dir`.
pub const PLAN_FILE_NAME: &str = "last-tree.json";

/// Held-item prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CostSettings {
    pub iv_item: u32,
    pub nature_item: u32,
}

impl Default for CostSettings {
    fn default() -> Self {
        Self {
            iv_item: IV_ITEM_COST,
            nature_item: NATURE_ITEM_COST,
        }
    }
}

impl From<&CostSettings> for ItemCosts {
    fn from(costs: &CostSettings) -> Self {
        ItemCosts {
            iv: costs.iv_item,
            nature: costs.nature_item,
        }
    }
}

/// Raw cost config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCostSettings {
    pub iv_item: Option<u32>,
    pub nature_item: Option<u32>,
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub species_file: Option<PathBuf>,
    pub plan_file: Option<PathBuf>,
    pub costs: RawCostSettings,
}

/// Unified configuration for pokebreed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Data directory (default: ~/.pokebreed)
    pub data_dir: PathBuf,
    /// Species roster JSON replacing the built-in one
    pub species_file: Option<PathBuf>,
    /// Saved plan (default: `<data_dir>/last-tree.json`)
    pub plan_file: Option<PathBuf>,
    /// Held-item prices
    pub costs: CostSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: dirs_default_data_dir(),
            species_file: None,
            plan_file: None,
            costs: CostSettings::default(),
        }
    }
}

/// Get the default data directory (~/.pokebreed).
fn dirs_default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".pokebreed"))
        .unwrap_or_else(|| PathBuf::from("~/.pokebreed"))
}

/// Get the XDG config directory for pokebreed.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pokebreed").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pokebreed.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input alone if expansion fails.
fn expand_env_vars(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Where the current plan is saved.
    pub fn plan_path(&self) -> PathBuf {
        self.plan_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(PLAN_FILE_NAME))
    }

    pub fn item_costs(&self) -> ItemCosts {
        ItemCosts::from(&self.costs)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_dir = expand_env_vars(&self.data_dir);
        self.species_file = self.species_file.as_deref().map(expand_env_vars);
        self.plan_file = self.plan_file.as_deref().map(expand_env_vars);
    }

    /// Apply a config file onto self: specified keys win.
    fn apply_raw(&self, raw: &RawSettings) -> Self {
        Self {
            data_dir: raw.data_dir.clone().unwrap_or_else(|| self.data_dir.clone()),
            species_file: raw.species_file.clone().or_else(|| self.species_file.clone()),
            plan_file: raw.plan_file.clone().or_else(|| self.plan_file.clone()),
            costs: CostSettings {
                iv_item: raw.costs.iv_item.unwrap_or(self.costs.iv_item),
                nature_item: raw.costs.nature_item.unwrap_or(self.costs.nature_item),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/pokebreed/pokebreed.toml`
    /// 3. Environment variables: `POKEBREED_*` prefix, `__` as separator
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Like [`Settings::load`], reading the config file at `config_path`.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.apply_raw(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply POKEBREED_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("POKEBREED")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("species_file") {
            settings.species_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("plan_file") {
            settings.plan_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<u32>("costs.iv_item") {
            settings.costs.iv_item = val;
        }
        if let Ok(val) = config.get::<u32>("costs.nature_item") {
            settings.costs.nature_item = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# pokebreed configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/pokebreed/pokebreed.toml
#   Env:    POKEBREED_* environment variables (e.g. POKEBREED_COSTS__IV_ITEM=9500)

# Data directory (saved plan lives here)
# data_dir = "~/.pokebreed"

# Species roster (JSON array of { number, name, eggGroups, percentageMale }).
# Uses the built-in roster when unset.
# species_file = "~/.pokebreed/species.json"

# Saved plan, defaults to <data_dir>/last-tree.json
# plan_file = "~/.pokebreed/last-tree.json"

[costs]
# Power items (one per IV)
# iv_item = 10000

# Everstone
# nature_item = 6000
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None).expect("load defaults");
        assert!(settings.data_dir.to_string_lossy().contains(".pokebreed"));
        assert!(settings.plan_path().ends_with(PLAN_FILE_NAME));
        assert_eq!(settings.costs, CostSettings::default());
    }

    #[test]
    fn given_tilde_in_paths_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/.pokebreed"),
            species_file: Some(PathBuf::from("$HOME/roster.json")),
            plan_file: None,
            costs: CostSettings::default(),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.data_dir.to_string_lossy().starts_with(&home));
        assert!(!settings.data_dir.to_string_lossy().contains('~'));
        let species = settings.species_file.expect("species file kept");
        assert!(species.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_partial_raw_when_applying_then_unspecified_keys_inherit() {
        let base = Settings::default();
        let raw = RawSettings {
            plan_file: Some(PathBuf::from("/tmp/plan.json")),
            costs: RawCostSettings {
                iv_item: Some(9_500),
                nature_item: None,
            },
            ..RawSettings::default()
        };

        let result = base.apply_raw(&raw);

        assert_eq!(result.data_dir, base.data_dir);
        assert_eq!(result.plan_path(), PathBuf::from("/tmp/plan.json"));
        assert_eq!(result.costs.iv_item, 9_500);
        assert_eq!(result.costs.nature_item, NATURE_ITEM_COST);
    }

    #[test]
    fn given_settings_when_rendering_toml_then_contains_costs_table() {
        let toml = Settings::default().to_toml().expect("serialize");
        assert!(toml.contains("[costs]"));
        assert!(toml.contains("iv_item = 10000"));
    }
}
