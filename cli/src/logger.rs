//! Logging setup for the `buildline` binary.
//!
//! Log lines go to stderr so they never mix with the JSON the commands print
//! on stdout.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: &[&str] = &[
    "buildline",
    "buildline_core",
    "buildline_command",
    "buildline_transform",
];

/// Installs the global tracing subscriber.
///
/// The level is picked in this order:
/// 1. `verbose`: debug for the buildline crates
/// 2. `quiet`: errors only
/// 3. the `RUST_LOG` environment variable
/// 4. info for the buildline crates
pub fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        crate_filter("debug")
    } else if quiet {
        crate_filter("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| crate_filter("info"))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(should_use_colors())
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn crate_filter(level: &str) -> EnvFilter {
    let directives: Vec<String> = CRATES
        .iter()
        .map(|name| format!("{name}={level}"))
        .collect();
    EnvFilter::new(directives.join(","))
}

/// Colors are off when `NO_COLOR` is set or stderr is not a terminal.
fn should_use_colors() -> bool {
    use std::io::IsTerminal;

    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}
