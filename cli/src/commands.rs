//! Commands served by the `buildline` binary.

use std::rc::Rc;

use buildline_command::{CliCommand, Invocation, generate_command};
use buildline_core::{
    CommandDescriptor, CommandError, DefaultValue, OptionSpec, OptionValue, ResolvedOptions,
    Result, UnknownOptions,
};
use buildline_transform::{
    NoopReducer, ProjectConfiguration, TargetSettings, TransformConfiguration,
    TransformConfigurationBuilder,
};
use serde::Serialize;
use tracing::{info, warn};

pub const PROGRAM_NAME: &str = "buildline";

const DEVELOPMENT: &str = "development";
const PRODUCTION: &str = "production";

const BUILD_DESCRIPTION: &str = "Build a target that can be executed or bundled";

/// What `build` would do, printed as JSON.
#[derive(Debug, Serialize)]
pub struct BuildPlan {
    pub target: String,
    #[serde(rename = "type")]
    pub build_type: String,
    pub options: ResolvedOptions,
    pub unknown: UnknownOptions,
    pub instruction: String,
    pub transform: TransformConfiguration,
}

/// `build [target]`
pub struct BuildCommand {
    descriptor: CommandDescriptor,
    project: Rc<ProjectConfiguration>,
}

impl BuildCommand {
    pub fn new(project: Rc<ProjectConfiguration>) -> Self {
        let descriptor = CommandDescriptor::new("build [target]", BUILD_DESCRIPTION)
            .with_full_description(
                "Build a target that can be executed or bundled.\n\
                 Without a target, the project's default target is used.\n\
                 Options the command doesn't declare are forwarded to the builder.",
            )
            .with_option(
                OptionSpec::new("type", "-t, --type [type]")
                    .with_description("Which build type: development (default) or production")
                    .with_default(DefaultValue::Text(DEVELOPMENT.to_string())),
            )
            .with_option(
                OptionSpec::flag("run", "-r, --run").with_description(
                    "Run the target after the build is completed. It only works when the build type is development",
                ),
            )
            .with_option(
                OptionSpec::flag("watch", "-w, --watch").with_description(
                    "Rebuild the target every time one of its files changes. It only works when the build type is development",
                ),
            )
            .with_option(
                OptionSpec::flag("inspect", "-i, --inspect")
                    .with_description("Enables the Node inspector. It only works with Node targets"),
            )
            .with_option(
                OptionSpec::flag("analyze", "-a, --analyze").with_description(
                    "Enables the bundle analyzer. It only works with targets with bundling",
                ),
            )
            .allow_unknown_options();

        Self {
            descriptor,
            project,
        }
    }

    /// Resolves the target and assembles the build plan.
    pub fn plan(&self, invocation: &Invocation) -> Result<BuildPlan> {
        let name = self.descriptor.name();
        let (target, settings) = self
            .project
            .target(invocation.argument(0))
            .map_err(|err| CommandError::handler(name, err))?;

        let build_type = invocation
            .options
            .get("type")
            .and_then(OptionValue::as_text)
            .unwrap_or_default()
            .to_string();
        if build_type != DEVELOPMENT && build_type != PRODUCTION {
            return Err(CommandError::handler(
                name,
                format!("invalid build type '{build_type}', expected {DEVELOPMENT} or {PRODUCTION}"),
            ));
        }
        warn_ignored_options(target, settings, &build_type, &invocation.options);

        let unknown = invocation.unknown.clone().unwrap_or_default();
        let instruction = generate_command(
            PROGRAM_NAME,
            &self.descriptor,
            std::iter::once(("target", OptionValue::from(target)))
                .chain(
                    invocation
                        .options
                        .iter()
                        .map(|(key, value)| (key.as_str(), value.clone())),
                )
                .chain(unknown.iter().map(|(key, value)| (key.as_str(), value.clone()))),
        );

        let transform = TransformConfigurationBuilder::new(NoopReducer).config_for_target(settings);

        Ok(BuildPlan {
            target: target.to_string(),
            build_type,
            options: invocation.options.clone(),
            unknown,
            instruction,
            transform,
        })
    }
}

impl CliCommand for BuildCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn handle(&self, invocation: Invocation) -> Result<()> {
        let plan = self.plan(&invocation)?;
        info!(target_name = %plan.target, build_type = %plan.build_type, "planned build");
        let json = serde_json::to_string(&plan)
            .map_err(|err| CommandError::handler(self.descriptor.name(), err))?;
        self.output(&json);
        Ok(())
    }
}

fn warn_ignored_options(
    target: &str,
    settings: &TargetSettings,
    build_type: &str,
    options: &ResolvedOptions,
) {
    let enabled = |name: &str| options.get(name).and_then(OptionValue::as_flag).unwrap_or(false);

    if build_type != DEVELOPMENT {
        for name in ["run", "watch"] {
            if enabled(name) {
                warn!(option = name, build_type, "option only applies to development builds");
            }
        }
    }
    if enabled("inspect") && settings.is_browser() {
        warn!(target_name = target, "--inspect only applies to node targets");
    }
    if enabled("analyze") && !settings.is_browser() {
        warn!(target_name = target, "--analyze only applies to bundled targets");
    }
}

/// `transform-config [target]`
pub struct TransformConfigCommand {
    descriptor: CommandDescriptor,
    project: Rc<ProjectConfiguration>,
}

impl TransformConfigCommand {
    pub fn new(project: Rc<ProjectConfiguration>) -> Self {
        let descriptor = CommandDescriptor::new(
            "transform-config [target]",
            "Print the transformation configuration of a target",
        )
        .with_option(
            OptionSpec::flag("pretty", "-p, --pretty").with_description("Pretty-print the JSON"),
        );

        Self {
            descriptor,
            project,
        }
    }
}

impl CliCommand for TransformConfigCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn handle(&self, invocation: Invocation) -> Result<()> {
        let name = self.descriptor.name();
        let (_, settings) = self
            .project
            .target(invocation.argument(0))
            .map_err(|err| CommandError::handler(name, err))?;
        let config = TransformConfigurationBuilder::new(NoopReducer).config_for_target(settings);

        let pretty = invocation
            .options
            .get("pretty")
            .and_then(OptionValue::as_flag)
            .unwrap_or(false);
        let json = if pretty {
            serde_json::to_string_pretty(&config)
        } else {
            serde_json::to_string(&config)
        }
        .map_err(|err| CommandError::handler(name, err))?;
        self.output(&json);
        Ok(())
    }
}

/// A command implemented by a separate `buildline-<name>` executable.
pub struct ExternalCommand {
    descriptor: CommandDescriptor,
}

impl ExternalCommand {
    pub fn new(name: &str) -> Self {
        let description = format!("Run {PROGRAM_NAME}-{name}");
        Self {
            descriptor: CommandDescriptor::new(name, &description).sub_program(),
        }
    }
}

impl CliCommand for ExternalCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn handle(&self, _invocation: Invocation) -> Result<()> {
        Err(CommandError::handler(
            self.descriptor.name(),
            "external commands run as separate executables",
        ))
    }
}
