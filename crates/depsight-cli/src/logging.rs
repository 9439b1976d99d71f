use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DEPSIGHT_LOG";

pub(crate) fn init_logging(verbosity: u8) -> Result<()> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(verbosity))
            .context("failed to build default log filter")?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialise logging: {err}"))
}

pub(crate) fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    ["depsight", "depsight_core", "depsight_graph"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
