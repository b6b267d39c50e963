//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{Gender, IvStat, Nature, Position};

/// Breeding planner: lays out the breeder pyramid for a target and tracks progress
#[derive(Parser, Debug)]
#[command(name = "pokebreed")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Plan file (default: <data_dir>/last-tree.json)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub plan: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new plan (replaces the saved one)
    Plan {
        /// Target species (name or pokedex number)
        #[arg(short, long)]
        species: String,
        /// Perfect IVs, 2 to 5, comma separated (e.g. hp,atk,spe)
        #[arg(short, long, value_delimiter = ',', required = true)]
        ivs: Vec<IvStat>,
        /// Desired nature
        #[arg(short, long)]
        nature: Option<Nature>,
    },

    /// Render the current plan
    Show,

    /// Edit one node of the plan
    Set {
        /// Node position as row,col
        position: Position,
        /// Species (name or pokedex number)
        #[arg(short, long)]
        species: Option<String>,
        /// Gender (female, male, genderless)
        #[arg(short, long)]
        gender: Option<Gender>,
        /// Nickname, empty string removes it
        #[arg(short, long)]
        nickname: Option<String>,
        /// Flip whether this node's gender cost is counted
        #[arg(long)]
        toggle_gender_cost: bool,
    },

    /// Remove species and gender from a node
    Clear {
        /// Node position as row,col
        position: Position,
    },

    /// Change the target and rebuild, keeping what still fits
    Retarget {
        /// New target species
        #[arg(short, long)]
        species: Option<String>,
        /// New perfect IVs, comma separated
        #[arg(short, long, value_delimiter = ',')]
        ivs: Option<Vec<IvStat>>,
        /// New nature
        #[arg(short, long, conflicts_with = "no_nature")]
        nature: Option<Nature>,
        /// Drop the nature requirement
        #[arg(long)]
        no_nature: bool,
    },

    /// Print the plan as JSON, or write it to a file
    Export {
        /// Output file
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Replace the plan with an exported one
    Import {
        /// Exported plan
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Delete the saved plan
    Reset,

    /// Show how many breeders of each kind a breed needs
    Breeders {
        /// Number of perfect IVs (2 to 5)
        #[arg(short, long)]
        ivs: usize,
        /// Nature is also bred
        #[arg(long)]
        natured: bool,
    },

    /// List species, optionally only those that can breed towards one
    Species {
        /// Only species compatible with this one
        #[arg(short, long)]
        compatible_with: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Write a template config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show config file location
    Path,
}
