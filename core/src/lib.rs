//! Core command declaration types shared across buildline.
//!
//! This crate defines the foundational types for declaring CLI commands and
//! carrying option values through an invocation:
//!
//! - [`CommandDescriptor`] - a command pattern (e.g. `build [target]`), its
//!   descriptions, declared options and behavior switches.
//! - [`OptionSpec`] - a declared option with its flag instruction
//!   (`-t, --type [type]`) and default value.
//! - [`OptionValue`] - a textual value or a boolean flag.
//! - [`ResolvedOptions`] / [`UnknownOptions`] - per-invocation value maps.
//!
//! Validation ([`validate_command`]) catches duplicate option names and
//! malformed instructions. [`CommandError`] covers binding and handler
//! failures.
//!
//! # Example
//!
//! ```
//! use buildline_core::*;
//!
//! let command = CommandDescriptor::new("build [target]", "Build a target")
//!     .with_option(
//!         OptionSpec::new("type", "-t, --type [type]")
//!             .with_description("Which build type")
//!             .with_default(DefaultValue::Text("development".into())),
//!     )
//!     .with_option(OptionSpec::flag("watch", "-w, --watch"))
//!     .allow_unknown_options();
//!
//! assert_eq!(command.name(), "build");
//! assert_eq!(command.arguments().len(), 1);
//! assert!(validate_command(&command).is_empty());
//! ```

mod error;
mod types;
mod validate;

pub use error::{CommandError, Result};
pub use types::*;
pub use validate::{ValidationError, validate_command};
