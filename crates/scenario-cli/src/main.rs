//! `sce-variants` - generate scaled/retimed variants of scenario files

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod prompt;

fn cli() -> Command {
    let folder = Arg::new("folder")
        .long("folder")
        .value_parser(value_parser!(PathBuf))
        .help("Scenario folder (defaults to the active profile's folder)");

    let modifier = Arg::new("modifier")
        .required(true)
        .help("Modifier: SIZE, SPEED, TIMESCALE, DURATION, HP or REGEN_RATE");

    Command::new("sce-variants")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scenario Variant Generator")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("settings")
                .long("settings")
                .global(true)
                .default_value(scenario_batch::SETTINGS_FILE)
                .value_parser(value_parser!(PathBuf))
                .help("Settings file"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand(
            Command::new("list")
                .about("List scenarios in the folder")
                .arg(folder.clone())
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .help("Case-insensitive name filter"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the base stats of a scenario")
                .arg(Arg::new("name").required(true).help("Scenario name (file stem)"))
                .arg(folder.clone())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate the checked variants of a scenario")
                .arg(Arg::new("name").required(true).help("Scenario name (file stem)"))
                .arg(folder)
                .arg(
                    Arg::new("profile")
                        .long("profile")
                        .help("Settings profile to use (becomes the active profile)"),
                )
                .arg(
                    Arg::new("only")
                        .long("only")
                        .action(ArgAction::Append)
                        .value_name("MOD=V,V")
                        .help("Generate these instead of the profile's checked values"),
                )
                .arg(
                    Arg::new("overwrite")
                        .long("overwrite")
                        .default_value("ask")
                        .value_parser(["ask", "always", "never"])
                        .help("What to do when an output file exists"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Show what would be written"),
                ),
        )
        .subcommand(
            Command::new("profile")
                .about("Manage settings profiles")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List profiles and the active one's values"))
                .subcommand(
                    Command::new("use")
                        .about("Switch the active profile")
                        .arg(Arg::new("profile").required(true)),
                )
                .subcommand(
                    Command::new("save-as")
                        .about("Copy the active profile under a new name")
                        .arg(Arg::new("profile").required(true)),
                )
                .subcommand(
                    Command::new("rename")
                        .about("Rename the active profile")
                        .arg(Arg::new("profile").required(true)),
                )
                .subcommand(Command::new("delete").about("Delete the active profile"))
                .subcommand(
                    Command::new("set-folder")
                        .about("Set the scenario folder")
                        .arg(
                            Arg::new("folder")
                                .required(true)
                                .value_parser(value_parser!(PathBuf)),
                        ),
                )
                .subcommand(
                    Command::new("set-tag")
                        .about("Set the tag text used in generated names")
                        .arg(modifier.clone())
                        .arg(Arg::new("tag").required(true)),
                )
                .subcommand(
                    Command::new("set-values")
                        .about("Replace a modifier's value list (comma separated)")
                        .arg(modifier.clone())
                        .arg(Arg::new("values").required(true)),
                )
                .subcommand(
                    Command::new("check")
                        .about("Check or uncheck one value")
                        .arg(modifier.clone())
                        .arg(
                            Arg::new("value")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("off").long("off").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("check-all")
                        .about("Check or uncheck every value of a modifier")
                        .arg(modifier)
                        .arg(Arg::new("off").long("off").action(ArgAction::SetTrue)),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    if let Err(e) = commands::run(&matches) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
