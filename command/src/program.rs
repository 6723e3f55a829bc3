//! Command registration and argument binding.
//!
//! A [`Program`] owns the registered commands, builds a clap command tree
//! from their declarations, binds a raw argument list with it and hands the
//! resulting tokens to [`dispatch`].

use buildline_core::{CommandError, OptionSpec, Result};
use clap::Command;
use clap::error::ErrorKind;
use tracing::debug;

use crate::command::{CliCommand, dispatch};
use crate::interface::{
    END_OF_OPTIONS, FORWARDED_ID, bind_matches, clap_command, command_error, option_arg,
    option_values,
};

/// Result of [`Program::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The named command handled the invocation.
    Handled {
        /// Command name
        command: String,
    },
    /// Help was requested; the text to print.
    Help(String),
    /// The version was requested; the text to print.
    Version(String),
    /// The command runs as a separate executable.
    SubProgram {
        /// Executable name, `{program}-{command}`
        program: String,
        /// Arguments following the command name
        args: Vec<String>,
    },
}

/// A CLI program with registered commands.
///
/// # Examples
///
/// ```
/// use buildline_command::{CliCommand, Invocation, Outcome, Program};
/// use buildline_core::{CommandDescriptor, OptionSpec, Result};
///
/// struct Destroy(CommandDescriptor);
///
/// impl CliCommand for Destroy {
///     fn descriptor(&self) -> &CommandDescriptor {
///         &self.0
///     }
///
///     fn handle(&self, invocation: Invocation) -> Result<()> {
///         assert_eq!(invocation.argument(0), Some("pluto"));
///         Ok(())
///     }
/// }
///
/// let mut program = Program::new("planets");
/// program.register(Box::new(Destroy(
///     CommandDescriptor::new("destroy [target]", "Destroy a target")
///         .with_option(OptionSpec::flag("once", "-o, --once")),
/// )));
///
/// let outcome = program.run(&["destroy".to_string(), "pluto".to_string()]).unwrap();
/// assert_eq!(outcome, Outcome::Handled { command: "destroy".into() });
/// ```
pub struct Program {
    name: String,
    description: String,
    version: Option<String>,
    global_options: Vec<OptionSpec>,
    commands: Vec<Box<dyn CliCommand>>,
}

impl Program {
    /// Creates a program with no commands.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            version: None,
            global_options: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Sets the program description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sets the version reported by `-V/--version`.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Adds a program-level option; commands may read its value as their
    /// parent's.
    pub fn with_global_option(mut self, option: OptionSpec) -> Self {
        self.global_options.push(option);
        self
    }

    /// Registers a command.
    pub fn register(&mut self, command: Box<dyn CliCommand>) {
        debug!(program = %self.name, command = command.descriptor().name(), "registering command");
        self.commands.push(command);
    }

    /// Program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finds a registered command by name.
    pub fn command(&self, name: &str) -> Option<&dyn CliCommand> {
        self.commands
            .iter()
            .find(|command| command.descriptor().name() == name)
            .map(|command| command.as_ref())
    }

    /// Iterates over the registered commands.
    pub fn commands(&self) -> impl Iterator<Item = &dyn CliCommand> {
        self.commands.iter().map(|command| command.as_ref())
    }

    /// Runs the program with the arguments following the program name.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownCommand`],
    /// [`CommandError::UnknownOption`], [`CommandError::MissingArgument`],
    /// [`CommandError::UnexpectedArgument`],
    /// [`CommandError::MissingOptionValue`] or [`CommandError::Usage`] when
    /// binding fails, or the handler's error.
    pub fn run(&self, args: &[String]) -> Result<Outcome> {
        let matches = match self.clap_command().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(err) => return self.parse_failure(&err, args),
        };

        let Some((name, command_matches)) = matches.subcommand() else {
            return Ok(Outcome::Help(self.help()));
        };
        let command = self
            .command(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        let descriptor = command.descriptor();

        if descriptor.sub_program {
            let forwarded = command_matches
                .get_many::<String>(FORWARDED_ID)
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            return Ok(Outcome::SubProgram {
                program: format!("{}-{}", self.name, descriptor.name()),
                args: forwarded,
            });
        }

        let parent = option_values(&self.global_options, &matches);
        let literals = args
            .iter()
            .position(|token| token == END_OF_OPTIONS)
            .map_or(0, |index| args.len() - index - 1);
        let raw = bind_matches(descriptor, command_matches, parent, literals);
        debug!(command = descriptor.name(), ?raw, "bound command arguments");
        dispatch(command, raw)?;

        Ok(Outcome::Handled {
            command: descriptor.name().to_string(),
        })
    }

    fn parse_failure(&self, err: &clap::Error, args: &[String]) -> Result<Outcome> {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                Ok(Outcome::Help(err.render().to_string()))
            }
            ErrorKind::DisplayVersion => Ok(Outcome::Version(
                self.version.clone().unwrap_or_default(),
            )),
            _ => {
                let command = args
                    .iter()
                    .find_map(|token| self.command(token))
                    .map_or(self.name.as_str(), |command| command.descriptor().name());
                Err(command_error(err, command))
            }
        }
    }

    /// Renders the help for the named command.
    pub fn command_help(&self, name: &str) -> Option<String> {
        let command = self.command(name)?;
        let mut help = command.prepare_help(clap_command(&self.name, command.descriptor()));
        Some(help.render_long_help().to_string())
    }

    /// Renders the program help. Hidden commands are left out.
    pub fn help(&self) -> String {
        self.clap_command().render_help().to_string()
    }

    fn clap_command(&self) -> Command {
        let mut program = Command::new(self.name.clone())
            .no_binary_name(true)
            .about(self.description.clone())
            .override_usage(format!("{} [options] [command]", self.name))
            .disable_help_subcommand(true)
            .args_override_self(true);
        if let Some(version) = &self.version {
            program = program.version(version.clone());
        }
        for option in &self.global_options {
            program = program.arg(option_arg(option));
        }
        for command in &self.commands {
            program = program
                .subcommand(command.prepare_help(clap_command(&self.name, command.descriptor())));
        }
        program
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use buildline_core::{CommandDescriptor, DefaultValue, OptionValue};

    use super::*;
    use crate::command::Invocation;

    type Calls = Rc<RefCell<Vec<Invocation>>>;

    struct Recorder {
        descriptor: CommandDescriptor,
        calls: Calls,
    }

    impl CliCommand for Recorder {
        fn descriptor(&self) -> &CommandDescriptor {
            &self.descriptor
        }

        fn handle(&self, invocation: Invocation) -> Result<()> {
            self.calls.borrow_mut().push(invocation);
            Ok(())
        }
    }

    fn build_descriptor() -> CommandDescriptor {
        CommandDescriptor::new("build [target]", "Build a target")
            .with_full_description("Build a target.\nUse --type to pick the build type.")
            .with_option(
                OptionSpec::new("type", "-t, --type [type]")
                    .with_description("Which build type")
                    .with_default(DefaultValue::Text("development".into())),
            )
            .with_option(OptionSpec::flag("watch", "-w, --watch"))
            .allow_unknown_options()
    }

    fn program_with(descriptor: CommandDescriptor) -> (Program, Calls) {
        let calls: Calls = Rc::default();
        let mut program = Program::new("app")
            .with_version("1.2.3")
            .with_global_option(OptionSpec::new("type", "-t, --type [type]"));
        program.register(Box::new(Recorder {
            descriptor,
            calls: Rc::clone(&calls),
        }));
        (program, calls)
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|token| token.to_string()).collect()
    }

    #[test]
    fn test_run_binds_arguments_and_options() {
        let (program, calls) = program_with(build_descriptor());

        let outcome = program
            .run(&args(&["build", "moon", "--type", "production", "-w"]))
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Handled {
                command: "build".into()
            }
        );
        let calls = calls.borrow();
        assert_eq!(calls[0].argument(0), Some("moon"));
        assert_eq!(calls[0].options["type"], OptionValue::from("production"));
        assert_eq!(calls[0].options["watch"], OptionValue::from(true));
        assert_eq!(calls[0].unknown, Some(Default::default()));
    }

    #[test]
    fn test_run_relocates_flag_bound_to_argument() {
        let (program, calls) = program_with(build_descriptor());

        program
            .run(&args(&["build", "--something", "else"]))
            .unwrap();

        let calls = calls.borrow();
        assert_eq!(calls[0].arguments, vec![None]);
        let unknown = calls[0].unknown.as_ref().unwrap();
        assert_eq!(unknown["something"], OptionValue::from("else"));
    }

    #[test]
    fn test_run_collects_unknown_options_after_arguments() {
        let (program, calls) = program_with(build_descriptor());

        program
            .run(&args(&["build", "moon", "--include=src", "-x=y", "--fast"]))
            .unwrap();

        let calls = calls.borrow();
        let unknown = calls[0].unknown.as_ref().unwrap();
        assert_eq!(calls[0].argument(0), Some("moon"));
        assert_eq!(unknown["include"], OptionValue::from("src"));
        assert_eq!(unknown["x"], OptionValue::from("y"));
        assert_eq!(unknown["fast"], OptionValue::from(true));
    }

    #[test]
    fn test_run_ignores_tokens_after_end_of_options() {
        let (program, calls) = program_with(build_descriptor());

        program
            .run(&args(&["build", "moon", "--", "--weird", "x"]))
            .unwrap();

        let calls = calls.borrow();
        assert_eq!(calls[0].argument(0), Some("moon"));
        assert_eq!(calls[0].unknown, Some(Default::default()));
    }

    #[test]
    fn test_run_parses_unknown_options_before_end_of_options() {
        let (program, calls) = program_with(build_descriptor());

        program
            .run(&args(&["build", "moon", "--fast", "--", "--weird", "x"]))
            .unwrap();

        let calls = calls.borrow();
        let unknown = calls[0].unknown.as_ref().unwrap();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown["fast"], OptionValue::from(true));
    }

    #[test]
    fn test_run_splits_leftover_tokens_once() {
        let (program, calls) = program_with(build_descriptor());

        program
            .run(&args(&["build", "moon", "--foo=-abc"]))
            .unwrap();

        let calls = calls.borrow();
        let unknown = calls[0].unknown.as_ref().unwrap();
        assert_eq!(unknown["foo"], OptionValue::from(true));
        assert_eq!(unknown["abc"], OptionValue::from(true));
        assert!(!unknown.contains_key("a"));
    }

    #[test]
    fn test_run_reads_global_options_as_parent() {
        let (program, calls) = program_with(build_descriptor());

        program
            .run(&args(&["--type", "staging", "build", "moon"]))
            .unwrap();

        assert_eq!(
            calls.borrow()[0].options["type"],
            OptionValue::from("staging")
        );
    }

    #[test]
    fn test_run_ignores_parent_when_disabled() {
        let (program, calls) = program_with(build_descriptor().ignore_parent_options());

        program
            .run(&args(&["--type", "staging", "build", "moon"]))
            .unwrap();

        assert_eq!(
            calls.borrow()[0].options["type"],
            OptionValue::from("development")
        );
    }

    #[test]
    fn test_run_rejects_unknown_options_without_opt_in() {
        let descriptor = CommandDescriptor::new("build [target]", "Build a target");
        let (program, calls) = program_with(descriptor);

        let err = program
            .run(&args(&["build", "moon", "--fast"]))
            .unwrap_err();

        assert!(matches!(err, CommandError::UnknownOption { ref option, .. } if option == "--fast"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_run_reports_missing_required_argument() {
        let descriptor = CommandDescriptor::new("copy <source>", "Copy");
        let (program, _) = program_with(descriptor);

        let err = program.run(&args(&["copy"])).unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument { ref argument, .. } if argument == "source"));
    }

    #[test]
    fn test_run_reports_missing_option_value() {
        let descriptor = CommandDescriptor::new("copy", "Copy")
            .with_option(OptionSpec::new("output", "-o, --output <path>"));
        let (program, _) = program_with(descriptor);

        let err = program.run(&args(&["copy", "--output"])).unwrap_err();
        assert!(matches!(err, CommandError::MissingOptionValue(_)));
    }

    #[test]
    fn test_run_unknown_command() {
        let (program, _) = program_with(build_descriptor());

        let err = program.run(&args(&["deploy"])).unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(ref name) if name == "deploy"));
    }

    #[test]
    fn test_run_sub_program() {
        let (program, calls) = program_with(
            CommandDescriptor::new("watch [target]", "Watch a target").sub_program(),
        );

        let outcome = program.run(&args(&["watch", "moon", "--fast"])).unwrap();

        assert_eq!(
            outcome,
            Outcome::SubProgram {
                program: "app-watch".into(),
                args: args(&["moon", "--fast"]),
            }
        );
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_command_help_uses_full_description() {
        let (program, calls) = program_with(build_descriptor());

        let outcome = program.run(&args(&["build", "--help"])).unwrap();

        let Outcome::Help(text) = outcome else {
            panic!("expected help");
        };
        assert!(text.contains("Usage: app build [options] [target]"));
        assert!(text.contains("Build a target.\n  Use --type to pick the build type."));
        assert!(text.contains("Which build type"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_program_help_hides_hidden_commands() {
        let (mut program, _) = program_with(build_descriptor());
        program.register(Box::new(Recorder {
            descriptor: CommandDescriptor::new("secret", "Internal").hidden(),
            calls: Rc::default(),
        }));

        let Outcome::Help(text) = program.run(&[]).unwrap() else {
            panic!("expected help");
        };
        assert!(text.contains("Usage: app [options] [command]"));
        assert!(text.contains("build"));
        assert!(text.contains("Build a target"));
        assert!(!text.contains("secret"));
        assert!(text.contains("-V, --version"));
    }

    #[test]
    fn test_version() {
        let (program, _) = program_with(build_descriptor());
        assert_eq!(
            program.run(&args(&["--version"])).unwrap(),
            Outcome::Version("1.2.3".into())
        );
    }
}
