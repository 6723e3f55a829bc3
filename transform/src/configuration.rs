//! Per-target transformation configuration.
//!
//! Builds the preset/plugin configuration a source transformer needs for a
//! target: an `env` preset aimed at the target's browsers or Node version,
//! plugins for the enabled language features, and a `flow` preset when the
//! target uses Flow. Services can adjust the result through a
//! [`ConfigurationReducer`].

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::project::{Feature, TargetSettings};

/// Event name passed to the reducer.
pub const CONFIGURATION_EVENT: &str = "transform-configuration";

/// Preset that targets the runtime environment.
pub const ENV_PRESET: &str = "env";

/// Preset for Flow annotations.
pub const FLOW_PRESET: &str = "flow";

const BROWSERS: &[&str] = &["chrome", "safari", "edge", "firefox"];
const MOBILE_BROWSERS: &[&str] = &["ios", "android"];

/// A preset entry: a name with optional options.
///
/// Serialized as `["name"]` or `["name", {options}]`; a bare `"name"` string
/// is accepted when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PresetRepr", into = "PresetRepr")]
pub struct Preset {
    /// Preset name
    pub name: String,
    /// Preset options
    pub options: Option<Value>,
}

impl Preset {
    /// Creates a preset without options.
    pub fn bare(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: None,
        }
    }

    /// Creates a preset with options.
    pub fn with_options(name: &str, options: Value) -> Self {
        Self {
            name: name.to_string(),
            options: Some(options),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PresetRepr {
    Name(String),
    Bare((String,)),
    WithOptions((String, Value)),
}

impl From<PresetRepr> for Preset {
    fn from(repr: PresetRepr) -> Self {
        match repr {
            PresetRepr::Name(name) | PresetRepr::Bare((name,)) => Self {
                name,
                options: None,
            },
            PresetRepr::WithOptions((name, options)) => Self {
                name,
                options: Some(options),
            },
        }
    }
}

impl From<Preset> for PresetRepr {
    fn from(preset: Preset) -> Self {
        match preset.options {
            Some(options) => Self::WithOptions((preset.name, options)),
            None => Self::Bare((preset.name,)),
        }
    }
}

/// Transformation configuration for a target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfiguration {
    /// Plugin names
    pub plugins: Vec<String>,
    /// Presets, in application order
    pub presets: Vec<Preset>,
}

impl TransformConfiguration {
    /// Finds a preset by name.
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.name == name)
    }

    fn add_plugin(&mut self, plugin: &str) {
        if !self.plugins.iter().any(|existing| existing == plugin) {
            self.plugins.push(plugin.to_string());
        }
    }
}

/// Hook that lets other services adjust a generated configuration.
pub trait ConfigurationReducer {
    /// Returns the configuration to use for `target`.
    fn reduce(
        &self,
        event: &str,
        configuration: TransformConfiguration,
        target: &TargetSettings,
    ) -> TransformConfiguration;
}

/// Reducer that returns the configuration unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReducer;

impl ConfigurationReducer for NoopReducer {
    fn reduce(
        &self,
        _event: &str,
        configuration: TransformConfiguration,
        _target: &TargetSettings,
    ) -> TransformConfiguration {
        configuration
    }
}

/// Builds transformation configurations for targets.
///
/// # Examples
///
/// ```
/// use buildline_transform::{NoopReducer, TargetSettings, TransformConfigurationBuilder};
///
/// let builder = TransformConfigurationBuilder::new(NoopReducer);
/// let config = builder.config_for_target(&TargetSettings::node());
///
/// let json = serde_json::to_value(&config).unwrap();
/// assert_eq!(
///     json,
///     serde_json::json!({
///         "plugins": [],
///         "presets": [["env", {"targets": {"node": "current"}}]],
///     })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransformConfigurationBuilder<R> {
    reducer: R,
}

impl<R: ConfigurationReducer> TransformConfigurationBuilder<R> {
    /// Creates a builder that passes its results through `reducer`.
    pub fn new(reducer: R) -> Self {
        Self { reducer }
    }

    /// Builds the configuration for `target`.
    ///
    /// Starts from the target's overwrites; an `env` preset, feature plugins
    /// and the `flow` preset are only added when missing.
    pub fn config_for_target(&self, target: &TargetSettings) -> TransformConfiguration {
        let settings = &target.transform;
        let mut configuration = settings.overwrites.clone().unwrap_or_default();

        if configuration.preset(ENV_PRESET).is_none() {
            configuration.presets.insert(
                0,
                Preset::with_options(ENV_PRESET, json!({ "targets": env_targets(target) })),
            );
        }

        let mut features = settings.features.clone();
        if target.flow && !features.contains(&Feature::Properties) {
            features.push(Feature::Properties);
        }
        for feature in features {
            configuration.add_plugin(feature.plugin());
        }

        if target.flow && configuration.preset(FLOW_PRESET).is_none() {
            configuration.presets.push(Preset::bare(FLOW_PRESET));
        }

        debug!(
            plugins = ?configuration.plugins,
            presets = configuration.presets.len(),
            "built transformation configuration"
        );
        self.reducer
            .reduce(CONFIGURATION_EVENT, configuration, target)
    }
}

fn env_targets(target: &TargetSettings) -> Value {
    let settings = &target.transform;
    if !target.is_browser() {
        return json!({ "node": settings.node_version });
    }

    let mobile: &[&str] = if settings.mobile_support {
        MOBILE_BROWSERS
    } else {
        &[]
    };
    let browsers: Vec<String> = BROWSERS
        .iter()
        .chain(mobile)
        .map(|browser| format!("last {} {browser} versions", settings.browser_versions))
        .collect();
    json!({ "browsers": browsers })
}
