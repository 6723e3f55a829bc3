//! Command abstraction, option normalization and dispatch.
//!
//! This crate turns a raw argument list into a call to a command handler:
//!
//! - [`Program`] registers [`CliCommand`]s and lets clap bind arguments to
//!   one of them and render help ([`clap_command`]).
//! - [`normalize_arguments`] moves flags the binder put in positional slots
//!   into the leftover bucket.
//! - [`resolve_options`] picks each declared option's value from the command,
//!   its parent program or the declared default.
//! - [`parse_unknown`] turns leftover flags into a dictionary for commands
//!   that accept unknown options.
//! - [`generate_command`] builds the instruction that would run a command.
//!
//! # Example
//!
//! ```
//! use buildline_command::{CliCommand, Invocation, Program};
//! use buildline_core::{CommandDescriptor, OptionSpec, OptionValue, Result};
//!
//! struct Build(CommandDescriptor);
//!
//! impl CliCommand for Build {
//!     fn descriptor(&self) -> &CommandDescriptor {
//!         &self.0
//!     }
//!
//!     fn handle(&self, invocation: Invocation) -> Result<()> {
//!         let unknown = invocation.unknown.clone().unwrap_or_default();
//!         assert_eq!(invocation.argument(0), None);
//!         assert_eq!(unknown["fast"], OptionValue::from("yes"));
//!         Ok(())
//!     }
//! }
//!
//! let mut program = Program::new("app");
//! program.register(Box::new(Build(
//!     CommandDescriptor::new("build [target]", "Build a target")
//!         .with_option(OptionSpec::flag("watch", "-w, --watch"))
//!         .allow_unknown_options(),
//! )));
//!
//! let args: Vec<String> = ["build", "--fast", "yes"].map(String::from).to_vec();
//! program.run(&args).unwrap();
//! ```

mod command;
mod generate;
mod interface;
mod normalize;
mod program;
mod resolve;
mod token;
mod unknown;

pub use command::{CliCommand, Invocation, build_invocation, dispatch};
pub use generate::generate_command;
pub use interface::{clap_command, indent_description};
pub use normalize::normalize_arguments;
pub use program::{Outcome, Program};
pub use resolve::resolve_options;
pub use token::{InvokedCommand, Token};
pub use unknown::{SHORT_VALUE_SEPARATOR, parse_unknown, split_tokens};
