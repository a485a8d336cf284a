//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::RenderStyle;
use crate::domain::Mode;

/// Inspect module trees: structure, flattened parameters and train/eval modes
#[derive(Parser, Debug)]
#[command(name = "modtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the module structure of a blueprint
    Show {
        /// Blueprint TOML file
        #[arg(value_hint = ValueHint::FilePath)]
        blueprint: PathBuf,

        /// Output style (default from config)
        #[arg(short, long, value_enum)]
        style: Option<RenderStyle>,
    },

    /// List every parameter by dotted path
    Params {
        /// Blueprint TOML file
        #[arg(value_hint = ValueHint::FilePath)]
        blueprint: PathBuf,

        /// Mode to apply before listing (default from config)
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Only print names
        #[arg(long)]
        no_values: bool,
    },

    /// List every module by dotted path with its mode
    Modes {
        /// Blueprint TOML file
        #[arg(value_hint = ValueHint::FilePath)]
        blueprint: PathBuf,

        /// Mode to apply before listing (default from config)
        #[arg(short, long)]
        mode: Option<Mode>,
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

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show {
        /// Directory whose .modtree.toml is layered on top
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Print a commented config template
    Template,

    /// Show config file locations
    Path,
}
