//! Project configuration: the build targets and their settings.
//!
//! # Example YAML
//!
//! ```yaml
//! default_target: web
//! targets:
//!   web:
//!     kind: browser
//!     transform:
//!       browser_versions: 2
//!       mobile_support: true
//!       features: [properties]
//!   api:
//!     kind: node
//!     flow: true
//!     transform:
//!       node_version: "18"
//! external_commands: [deploy]
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::configuration::TransformConfiguration;
use crate::error::{Result, TransformError};

/// Default project configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".buildline.yml";

/// Runtime a target is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Browser bundle.
    Browser,
    /// Server-side runtime (the default).
    #[default]
    Node,
}

/// Optional language feature enabled through a transformation plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Class properties.
    Properties,
    /// Legacy decorators.
    Decorators,
}

impl Feature {
    /// Name of the plugin that enables this feature.
    pub fn plugin(self) -> &'static str {
        match self {
            Self::Properties => "transform-class-properties",
            Self::Decorators => "transform-decorators-legacy",
        }
    }
}

/// Transformation settings of a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    /// How many recent versions of each browser to support.
    pub browser_versions: u32,
    /// Include mobile browsers (iOS, Android).
    pub mobile_support: bool,
    /// Node version to target.
    pub node_version: String,
    /// Extra language features.
    pub features: Vec<Feature>,
    /// Configuration to start from instead of an empty one.
    pub overwrites: Option<TransformConfiguration>,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            browser_versions: 2,
            mobile_support: true,
            node_version: "current".to_string(),
            features: Vec::new(),
            overwrites: None,
        }
    }
}

/// Settings of a single build target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    /// Target runtime.
    pub kind: TargetKind,
    /// Source uses Flow annotations.
    pub flow: bool,
    /// Transformation settings.
    pub transform: TransformSettings,
}

impl TargetSettings {
    /// Creates settings for a browser target.
    pub fn browser() -> Self {
        Self {
            kind: TargetKind::Browser,
            ..Default::default()
        }
    }

    /// Creates settings for a node target.
    pub fn node() -> Self {
        Self::default()
    }

    /// Returns `true` for browser targets.
    pub fn is_browser(&self) -> bool {
        self.kind == TargetKind::Browser
    }
}

/// Top-level project configuration.
///
/// # Examples
///
/// ```
/// use buildline_transform::{ProjectConfiguration, TargetKind};
///
/// let yaml = r#"
/// default_target: web
/// targets:
///   web:
///     kind: browser
///   api: {}
/// "#;
/// let config: ProjectConfiguration = serde_yaml::from_str(yaml).unwrap();
///
/// let (name, web) = config.target(None).unwrap();
/// assert_eq!(name, "web");
/// assert_eq!(web.kind, TargetKind::Browser);
/// assert_eq!(config.target(Some("api")).unwrap().1.kind, TargetKind::Node);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfiguration {
    /// Target used when none is given.
    pub default_target: Option<String>,
    /// Targets by name.
    pub targets: BTreeMap<String, TargetSettings>,
    /// Commands served by separate `buildline-<name>` executables.
    pub external_commands: Vec<String>,
}

impl ProjectConfiguration {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](TransformError::IoError) if the file cannot be
    /// read, or [`YamlError`](TransformError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Loads configuration from a YAML file, or returns an empty
    /// configuration if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) for files that exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no project configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](TransformError::IoError) if the file cannot be
    /// written, or [`YamlError`](TransformError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Finds a target by name, falling back to the default target.
    ///
    /// # Errors
    ///
    /// Returns [`NoTarget`](TransformError::NoTarget) when no name is given
    /// and there is no default, or
    /// [`UnknownTarget`](TransformError::UnknownTarget) when the target
    /// doesn't exist.
    pub fn target<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a TargetSettings)> {
        let name = name
            .filter(|name| !name.is_empty())
            .or(self.default_target.as_deref())
            .ok_or(TransformError::NoTarget)?;
        self.targets
            .get(name)
            .map(|settings| (name, settings))
            .ok_or_else(|| TransformError::UnknownTarget(name.to_string()))
    }
}
