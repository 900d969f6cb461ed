use {
    clap::Parser,
    std::{ffi::OsString, time::Duration},
};

/// a validated run configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunConfig {
    /// the number of refreshes.
    pub samples: usize,
    /// the delay between refreshes, in microseconds.
    pub interval_micros: u64,
    pub show: Show,
}

/// which displays are enabled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Show {
    pub cpu: bool,
    pub memory: bool,
    pub cores: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Cli(#[from] clap::Error),
    #[error("invalid argument \"{0}\" (positional arguments must come before flags)")]
    PositionalAfterFlag(String),
}

/// graph cpu and memory usage in the terminal.
#[derive(Debug, Parser)]
#[command(name = "sysgraph", version, about, args_override_self = true)]
struct Cli {
    /// number of refreshes.
    #[arg(
        value_name = "SAMPLES",
        value_parser = clap::value_parser!(u64).range(1..=RunConfig::MAX_SAMPLES),
    )]
    samples: Option<u64>,

    /// delay between refreshes, in microseconds.
    #[arg(value_name = "TDELAY", value_parser = clap::value_parser!(u64).range(1..))]
    tdelay: Option<u64>,

    /// number of refreshes.
    #[arg(
        long = "samples",
        id = "samples_flag",
        value_name = "N",
        require_equals = true,
        value_parser = clap::value_parser!(u64).range(1..=RunConfig::MAX_SAMPLES),
    )]
    samples_flag: Option<u64>,

    /// delay between refreshes, in microseconds.
    #[arg(
        long = "tdelay",
        id = "tdelay_flag",
        value_name = "MICROS",
        require_equals = true,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    tdelay_flag: Option<u64>,

    /// show the cpu usage graph.
    #[arg(long)]
    cpu: bool,

    /// show the memory usage graph.
    #[arg(long)]
    memory: bool,

    /// show the number of cores and their frequency.
    #[arg(long)]
    cores: bool,
}

// === impl RunConfig ===

impl RunConfig {
    pub const DEFAULT_SAMPLES: usize = 20;
    pub const DEFAULT_INTERVAL_MICROS: u64 = 500_000;
    /// the widest graph that can be drawn.
    pub const MAX_SAMPLES: u64 = 100_000;

    /// parses a configuration from command line arguments, including the program name.
    pub fn parse_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<OsString>>();
        Self::check_order(&args)?;

        let Cli {
            samples,
            tdelay,
            samples_flag,
            tdelay_flag,
            cpu,
            memory,
            cores,
        } = Cli::try_parse_from(args)?;

        let samples = samples_flag
            .or(samples)
            .map_or(Ok(Self::DEFAULT_SAMPLES), usize::try_from)
            .map_err(|_| {
                clap::Error::raw(
                    clap::error::ErrorKind::ValueValidation,
                    "sample count does not fit in memory\n",
                )
            })?;
        let interval_micros = tdelay_flag
            .or(tdelay)
            .unwrap_or(Self::DEFAULT_INTERVAL_MICROS);

        let show = if cpu || memory || cores {
            Show { cpu, memory, cores }
        } else {
            Show::ALL
        };

        Ok(Self {
            samples,
            interval_micros,
            show,
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_micros(self.interval_micros)
    }

    /// rejects positional arguments that follow a flag.
    fn check_order(args: &[OsString]) -> Result<(), ConfigError> {
        let mut seen_flag = false;
        for arg in args.iter().skip(1) {
            let arg = arg.to_string_lossy();
            if arg.starts_with('-') {
                seen_flag = true;
            } else if seen_flag {
                return Err(ConfigError::PositionalAfterFlag(arg.into_owned()));
            }
        }

        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            samples: Self::DEFAULT_SAMPLES,
            interval_micros: Self::DEFAULT_INTERVAL_MICROS,
            show: Show::ALL,
        }
    }
}

// === impl Show ===

impl Show {
    pub const ALL: Self = Self {
        cpu: true,
        memory: true,
        cores: true,
    };

    /// whether any graph is drawn.
    pub fn graphs(&self) -> bool {
        self.cpu || self.memory
    }
}
