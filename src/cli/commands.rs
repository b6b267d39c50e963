//! Command dispatch: one function per subcommand.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{BreedPlan, NodeEdit};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::tree_view::TreeViewConvert;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{
    AssignmentTable, BreedTarget, BreederKind, Gender, IvSet, IvStat, Nature, Position,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, run `pokebreed --help`".into(),
        ));
    };

    // Commands that need neither settings nor the roster.
    match command {
        Commands::Completion { shell } => {
            completion(*shell);
            return Ok(());
        }
        Commands::Config { command } => return config_command(command),
        Commands::Breeders { ivs, natured } => return breeders(*ivs, *natured),
        _ => {}
    }

    let settings = Settings::load()?;
    let container = ServiceContainer::new(settings, cli.plan.clone())?;

    match command {
        Commands::Plan {
            species,
            ivs,
            nature,
        } => plan(&container, species, ivs, *nature),
        Commands::Show => show(&container),
        Commands::Set {
            position,
            species,
            gender,
            nickname,
            toggle_gender_cost,
        } => set(
            &container,
            *position,
            species.as_deref(),
            *gender,
            nickname.clone(),
            *toggle_gender_cost,
        ),
        Commands::Clear { position } => clear(&container, *position),
        Commands::Retarget {
            species,
            ivs,
            nature,
            no_nature,
        } => retarget(
            &container,
            species.as_deref(),
            ivs.as_deref(),
            *nature,
            *no_nature,
        ),
        Commands::Export { file } => export(&container, file.as_deref()),
        Commands::Import { file } => import(&container, file),
        Commands::Reset => reset(&container),
        Commands::Species { compatible_with } => species(&container, compatible_with.as_deref()),
        Commands::Completion { .. } | Commands::Config { .. } | Commands::Breeders { .. } => {
            Ok(())
        }
    }
}

#[instrument(skip(container))]
fn plan(
    container: &ServiceContainer,
    species: &str,
    ivs: &[IvStat],
    nature: Option<Nature>,
) -> CliResult<()> {
    let species = container.catalog.find(species)?.clone();
    let target = BreedTarget::new(species, IvSet::from_stats(ivs)?, nature);
    let plan = container.planner.create(target)?;
    container.planner.save(&plan)?;
    output::success(&format!(
        "new plan for {} ({} breeders on the last row)",
        plan.target().species,
        plan.tree().leaves().count()
    ));
    render(container, &plan)
}

fn show(container: &ServiceContainer) -> CliResult<()> {
    let plan = container.planner.load()?;
    render(container, &plan)
}

#[instrument(skip(container))]
fn set(
    container: &ServiceContainer,
    position: Position,
    species: Option<&str>,
    gender: Option<Gender>,
    nickname: Option<String>,
    toggle_gender_cost: bool,
) -> CliResult<()> {
    let mut edits = Vec::new();
    if let Some(query) = species {
        edits.push(NodeEdit::SetSpecies(container.catalog.find(query)?.clone()));
    }
    if let Some(gender) = gender {
        edits.push(NodeEdit::SetGender(Some(gender)));
    }
    if let Some(nickname) = nickname {
        edits.push(NodeEdit::SetNickname(Some(nickname)));
    }
    if toggle_gender_cost {
        edits.push(NodeEdit::ToggleGenderCostIgnored);
    }
    if edits.is_empty() {
        return Err(CliError::InvalidArgs(
            "nothing to set, pass --species, --gender, --nickname or --toggle-gender-cost".into(),
        ));
    }

    let mut plan = container.planner.load()?;
    let mut bred = Vec::new();
    for edit in edits {
        let report = container.planner.edit(&mut plan, position, edit)?;
        bred.extend(report.assigned);
    }
    container.planner.save(&plan)?;

    output::success(&format!("updated {}", position));
    report_bred(&plan, &bred);
    render(container, &plan)
}

fn clear(container: &ServiceContainer, position: Position) -> CliResult<()> {
    let mut plan = container.planner.load()?;
    container
        .planner
        .edit(&mut plan, position, NodeEdit::ClearSpecies)?;
    container.planner.save(&plan)?;
    output::success(&format!("cleared {}", position));
    render(container, &plan)
}

#[instrument(skip(container))]
fn retarget(
    container: &ServiceContainer,
    species: Option<&str>,
    ivs: Option<&[IvStat]>,
    nature: Option<Nature>,
    no_nature: bool,
) -> CliResult<()> {
    let species = species
        .map(|query| container.catalog.find(query).cloned())
        .transpose()?;
    let ivs = ivs.map(IvSet::from_stats).transpose()?;
    let nature = if no_nature { Some(None) } else { nature.map(Some) };
    if species.is_none() && ivs.is_none() && nature.is_none() {
        return Err(CliError::InvalidArgs(
            "nothing to change, pass --species, --ivs, --nature or --no-nature".into(),
        ));
    }

    let current = container.planner.load()?;
    let plan = container.planner.retarget(&current, species, ivs, nature)?;
    container.planner.save(&plan)?;
    output::success(&format!("retargeted to {}", plan.target().species));
    render(container, &plan)
}

fn export(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let plan = container.planner.load()?;
    let json = container.planner.export_json(&plan)?;
    match file {
        Some(path) => {
            container
                .fs
                .write(path, &json)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Exported", &path.display());
        }
        None => output::info(&json),
    }
    Ok(())
}

fn import(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let json = container
        .fs
        .read_to_string(file)
        .map_err(|e| InfraError::io(format!("read {}", file.display()), e))?;
    let plan = container.planner.import_json(&json)?;
    container.planner.save(&plan)?;
    output::action("Imported", &file.display());
    render(container, &plan)
}

fn reset(container: &ServiceContainer) -> CliResult<()> {
    if container.planner.reset()? {
        output::success(&format!(
            "removed {}",
            container.planner.plan_path().display()
        ));
    } else {
        output::warning("no saved plan");
    }
    Ok(())
}

fn breeders(iv_count: usize, natured: bool) -> CliResult<()> {
    let table = AssignmentTable::standard();
    let counts = table.breeder_counts(iv_count, natured)?;
    output::header(&format!(
        "{} perfect IVs{}",
        iv_count,
        if natured { " + nature" } else { "" }
    ));
    for kind in BreederKind::IV_KINDS {
        if let Some(count) = counts.get(&kind) {
            output::detail(&format!("{}: {}", kind, count));
        }
    }
    if natured {
        output::detail("Nature: 1");
    }
    output::detail(&format!(
        "expected cost: {}",
        output::money(crate::domain::reference::expected_cost(iv_count, natured)?)
    ));
    Ok(())
}

fn species(container: &ServiceContainer, compatible_with: Option<&str>) -> CliResult<()> {
    let listed = match compatible_with {
        Some(query) => {
            let target = container.catalog.find(query)?;
            output::header(&format!("can breed towards {}", target));
            container.catalog.compatible_with(target)
        }
        None => container.catalog.iter().collect(),
    };
    for species in listed {
        let groups: Vec<String> = species.egg_groups().map(|g| g.to_string()).collect();
        output::info(&format!(
            "{:>4}  {:<12} {:<20} {}% male",
            species.number(),
            species.name(),
            groups.join(", "),
            species.percentage_male()
        ));
    }
    Ok(())
}

fn config_command(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("cannot determine config directory"),
        },
        ConfigCommands::Init { force } => {
            let path = global_config_path()
                .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "{} exists, use --force to overwrite",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn report_bred(plan: &BreedPlan, bred: &[Position]) {
    for position in bred {
        if let Some(species) = plan.tree().get(*position).and_then(|n| n.species.as_ref()) {
            output::action("Bred", &format!("{} at {}", species, position));
        }
    }
}

fn render(container: &ServiceContainer, plan: &BreedPlan) -> CliResult<()> {
    debug!("rendering plan with {} error entries", plan.errors().len());
    output::info(&plan.to_tree_view());

    let reportable = plan
        .errors()
        .values()
        .flatten()
        .filter(|e| e.is_reportable())
        .count();
    if reportable > 0 {
        output::failure(&format!("{} breeding problem(s)", reportable));
    }

    let current = plan.current_cost(container.settings.item_costs())?;
    let expected = plan.expected_cost()?;
    output::detail(&format!(
        "cost so far: {} / expected {}",
        output::money(current),
        output::money(expected)
    ));
    Ok(())
}
