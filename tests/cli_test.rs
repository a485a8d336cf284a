//! Tests for argument parsing, command dispatch and exit codes

use clap::Parser;
use rstest::rstest;

use modtree::cli::{execute_command, Cli, CliError, Commands};
use modtree::config::RenderStyle;
use modtree::util::testing;
use modtree::{exitcode, Mode};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

const NETWORK: &str = "tests/resources/blueprints/network.toml";

fn run(args: &[&str]) -> Result<(), CliError> {
    let cli = Cli::try_parse_from(args).expect("parse args");
    execute_command(&cli)
}

#[test]
fn given_params_flags_when_parsing_then_values_are_typed() {
    let cli = Cli::try_parse_from([
        "modtree",
        "-dd",
        "params",
        NETWORK,
        "--mode",
        "EVAL",
        "--no-values",
    ])
    .unwrap();
    assert_eq!(cli.debug, 2);
    match cli.command {
        Some(Commands::Params {
            mode,
            no_values,
            ..
        }) => {
            assert_eq!(mode, Some(Mode::Eval));
            assert!(no_values);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_show_style_when_parsing_then_value_enum_is_used() {
    let cli = Cli::try_parse_from(["modtree", "show", NETWORK, "--style", "tree"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Show {
            style: Some(RenderStyle::Tree),
            ..
        })
    ));
}

#[test]
fn given_unknown_mode_when_parsing_then_rejected() {
    assert!(Cli::try_parse_from(["modtree", "modes", NETWORK, "--mode", "predict"]).is_err());
}

#[rstest]
#[case(&["modtree", "show", NETWORK])]
#[case(&["modtree", "show", NETWORK, "--style", "tree"])]
#[case(&["modtree", "params", NETWORK])]
#[case(&["modtree", "params", NETWORK, "--mode", "eval", "--no-values"])]
#[case(&["modtree", "modes", NETWORK, "-m", "eval"])]
#[case(&["modtree", "config", "template"])]
#[case(&["modtree", "config", "path"])]
fn given_valid_command_when_executed_then_succeeds(#[case] args: &[&str]) {
    let result = run(args);
    assert!(result.is_ok(), "{args:?} failed: {result:?}");
}

#[test]
fn given_no_command_when_executed_then_usage_error() {
    let err = run(&["modtree"]).unwrap_err();
    assert!(matches!(err, CliError::Usage(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[rstest]
#[case("tests/resources/blueprints/absent.toml", exitcode::NOINPUT)]
#[case("tests/resources/blueprints/malformed.toml", exitcode::DATAERR)]
#[case("tests/resources/blueprints/dotted_name.toml", exitcode::DATAERR)]
fn given_bad_blueprint_when_executed_then_exit_code_matches(
    #[case] blueprint: &str,
    #[case] expected: i32,
) {
    let err = run(&["modtree", "show", blueprint]).unwrap_err();
    assert_eq!(err.exit_code(), expected, "error: {err}");
}
