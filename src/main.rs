//! a compact system monitor.
//!
//! run with:  `sysgraph [SAMPLES] [TDELAY] [--cpu] [--memory] [--cores]`

use {
    std::io,
    sysgraph::{
        App, Cancel,
        config::{ConfigError, RunConfig},
    },
    tracing_subscriber::EnvFilter,
};

fn main() -> anyhow::Result<()> {
    // logs go to stderr so they stay out of the redrawn display. RUST_LOG controls verbosity.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match RunConfig::parse_from(std::env::args_os()) {
        Ok(config) => config,
        // `--help` and `--version`.
        Err(ConfigError::Cli(err)) if !err.use_stderr() => {
            err.print()?;
            return Ok(());
        }
        Err(ConfigError::Cli(err)) => {
            err.print()?;
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    App::new(config).run(&mut io::stdout().lock(), &Cancel::new())?;

    Ok(())
}
