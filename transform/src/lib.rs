//! Build targets and their source transformation configuration.
//!
//! [`ProjectConfiguration`] is loaded from a YAML file and lists the
//! project's targets. [`TransformConfigurationBuilder`] turns a target's
//! [`TargetSettings`] into the preset/plugin configuration a source
//! transformer consumes, letting a [`ConfigurationReducer`] have the last
//! word.

mod configuration;
mod error;
mod project;

pub use configuration::{
    CONFIGURATION_EVENT, ConfigurationReducer, ENV_PRESET, FLOW_PRESET, NoopReducer, Preset,
    TransformConfiguration, TransformConfigurationBuilder,
};
pub use error::{Result, TransformError};
pub use project::{
    DEFAULT_CONFIG_FILE, Feature, ProjectConfiguration, TargetKind, TargetSettings,
    TransformSettings,
};
