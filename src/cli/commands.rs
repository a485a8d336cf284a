//! Command dispatch: each subcommand loads what it needs and prints through `output`.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::inspect::{apply_mode, mode_lines, parameter_lines};
use crate::application::{Blueprint, BlueprintValue};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, RenderStyle, Settings};
use crate::domain::{DynamicModule, Mode, Module};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { blueprint, style }) => _show(blueprint, *style),
        Some(Commands::Params {
            blueprint,
            mode,
            no_values,
        }) => _params(blueprint, *mode, *no_values),
        Some(Commands::Modes { blueprint, mode }) => _modes(blueprint, *mode),
        Some(Commands::Config { command }) => _config(command),
        Some(Commands::Completion { shell }) => {
            _completion(*shell);
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

/// Settings are layered with the `.modtree.toml` next to the blueprint.
fn load_tree(path: &Path) -> CliResult<(Settings, DynamicModule<BlueprintValue>)> {
    let settings = Settings::load(path.parent())?;
    let tree = Blueprint::load(path)?.build()?;
    debug!(kind = %tree.kind(), "loaded tree");
    Ok((settings, tree))
}

#[instrument]
fn _show(blueprint: &Path, style: Option<RenderStyle>) -> CliResult<()> {
    let (settings, tree) = load_tree(blueprint)?;
    match style.unwrap_or(settings.style) {
        RenderStyle::Repr => output::info(&tree),
        RenderStyle::Tree => output::info(&tree.to_tree()),
    }
    Ok(())
}

#[instrument]
fn _params(blueprint: &Path, mode: Option<Mode>, no_values: bool) -> CliResult<()> {
    let (settings, mut tree) = load_tree(blueprint)?;
    let mode = mode.unwrap_or(settings.mode);
    apply_mode(&mut tree, mode);
    let show_values = settings.show_values && !no_values;

    output::header(&format!("{} [{}]", tree.kind(), mode));
    for line in parameter_lines(&tree) {
        let frozen = if line.trainable { "" } else { " (frozen)" };
        if show_values {
            output::detail(&format!("{} = {}{}", line.path, line.value, frozen));
        } else {
            output::detail(&format!("{}{}", line.path, frozen));
        }
    }
    Ok(())
}

#[instrument]
fn _modes(blueprint: &Path, mode: Option<Mode>) -> CliResult<()> {
    let (settings, mut tree) = load_tree(blueprint)?;
    apply_mode(&mut tree, mode.unwrap_or(settings.mode));

    for line in mode_lines(&tree) {
        let path = if line.path.is_empty() {
            "<root>"
        } else {
            line.path.as_str()
        };
        output::action(line.mode.as_str(), &format!("{} ({})", path, line.kind));
    }
    Ok(())
}

#[instrument]
fn _config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show { dir } => {
            let settings = Settings::load(dir.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory available"),
            }
            output::action("local", &local_config_path(Path::new(".")).display());
        }
    }
    Ok(())
}

fn _completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
