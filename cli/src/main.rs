mod commands;
mod logger;

use std::path::PathBuf;
use std::rc::Rc;

use buildline_command::{CliCommand, Outcome, Program};
use buildline_core::validate_command;
use buildline_transform::{DEFAULT_CONFIG_FILE, ProjectConfiguration};
use clap::Parser;
use tracing::{debug, warn};

use crate::commands::{BuildCommand, ExternalCommand, PROGRAM_NAME, TransformConfigCommand};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "buildline")]
#[command(about = "Build JavaScript targets and inspect their transformation configuration")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Project configuration file (default: .buildline.yml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Command and its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, String> {
    let project = load_project(cli.config)?;
    let program = build_program(project);

    match program.run(&cli.args).map_err(|err| err.to_string())? {
        Outcome::Handled { command } => {
            debug!(command, "command finished");
            Ok(0)
        }
        Outcome::Help(text) | Outcome::Version(text) => {
            println!("{text}");
            Ok(0)
        }
        Outcome::SubProgram { program, args } => run_sub_program(&program, &args),
    }
}

fn load_project(path: Option<PathBuf>) -> Result<ProjectConfiguration, String> {
    let result = match &path {
        Some(path) => ProjectConfiguration::load(path),
        None => ProjectConfiguration::load_or_default(DEFAULT_CONFIG_FILE),
    };
    result.map_err(|err| {
        let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        format!("failed to load {}: {err}", path.display())
    })
}

fn build_program(project: ProjectConfiguration) -> Program {
    let project = Rc::new(project);
    let mut commands: Vec<Box<dyn CliCommand>> = vec![
        Box::new(BuildCommand::new(Rc::clone(&project))),
        Box::new(TransformConfigCommand::new(Rc::clone(&project))),
    ];
    for name in &project.external_commands {
        commands.push(Box::new(ExternalCommand::new(name)));
    }

    let mut program = Program::new(PROGRAM_NAME)
        .with_description("Build JavaScript targets and inspect their transformation configuration")
        .with_version(PACKAGE_VERSION);
    for command in commands {
        for problem in validate_command(command.descriptor()) {
            warn!(command = command.descriptor().name(), %problem, "invalid command declaration");
        }
        program.register(command);
    }
    program
}

fn run_sub_program(program: &str, args: &[String]) -> Result<i32, String> {
    debug!(program, ?args, "running external command");
    let status = std::process::Command::new(program)
        .args(args)
        .status()
        .map_err(|err| format!("failed to run {program}: {err}"))?;
    Ok(status.code().unwrap_or(1))
}
