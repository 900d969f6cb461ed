use {
    crate::source::StatsSource,
    std::{
        io::{self, BufRead, BufReader},
        num::ParseIntError,
        ops::Not,
        str::FromStr,
    },
};

pub use self::{
    cpu_time::{CpuTimes, Measurement},
    user_hz::UserHz,
};

mod cpu_time;
mod user_hz;


/// an entry in the `/proc/stat` kernel statistics table.
///
/// see `proc_stat(5)` for more information.
#[derive(Debug, Eq, PartialEq)]
pub enum Entry {
    /// the amount of time that the system ("cpu" line) spent in various states.
    AllCpu { time: CpuTimes },
    /// a specific cpu ("cpuN" line). per-cpu times are not tracked.
    Cpu { id: CpuId },
    /// any other line of the table (`intr`, `ctxt`, `softirq`, ...). its values are not parsed.
    Other,
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct CpuId(u16);

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum EntryParseError {
    #[error("empty entry")]
    Empty,
    #[error("unrecognized entry kind: {kind}")]
    UnrecognizedEntry { kind: String },
    #[error("invalid cpu id")]
    CpuIdParse(#[source] ParseIntError),
    #[error("invalid time value")]
    UserHzParse(#[source] ParseIntError),
    #[error("expected 10 cpu time counters, found {found}")]
    CounterCount { found: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum StatReadError {
    #[error("could not read kernel statistics")]
    Io(#[from] io::Error),
    #[error("malformed kernel statistics")]
    Entry(#[from] EntryParseError),
    #[error("kernel statistics have no aggregate cpu line")]
    MissingCpu,
}

enum Either<'a> {
    Cpu(&'a str),
    Entry(Entry),
}

// === impl CpuTimes ===

impl CpuTimes {
    /// reads a snapshot of the aggregate cpu counters from the given source.
    ///
    /// lines after the aggregate `cpu` line are not parsed.
    pub fn read(stats: &impl StatsSource) -> Result<Self, StatReadError> {
        let reader = stats.open().map(BufReader::new)?;

        for line in reader.lines() {
            if let Entry::AllCpu { time } = line?.parse::<Entry>()? {
                return Ok(time);
            }
        }

        Err(StatReadError::MissingCpu)
    }
}

// === impl Entry ===

impl FromStr for Entry {
    type Err = EntryParseError;
    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let tokens = entry
            .split(' ')
            .filter(|t| t.is_empty().not())
            .collect::<Vec<_>>();
        let [kind, tokens @ ..] = tokens.as_slice() else {
            return Err(EntryParseError::Empty);
        };

        let id = match Self::parse_entry_kind(kind) {
            Either::Cpu(cpu) => Self::parse_cpu_id(cpu)?,
            Either::Entry(entry) => return Ok(entry),
        };

        if let Some(id) = id {
            return Ok(Self::Cpu { id });
        }

        let time = tokens
            .iter()
            .map(|t| t.parse::<UserHz>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(EntryParseError::UserHzParse)
            .and_then(CpuTimes::try_from)?;

        Ok(Self::AllCpu { time })
    }
}

impl Entry {
    /// the non-cpu lines documented in `proc_stat(5)`.
    const OTHER_KINDS: [&str; 10] = [
        "page",
        "swap",
        "intr",
        "disk_io",
        "ctxt",
        "btime",
        "processes",
        "procs_running",
        "procs_blocked",
        "softirq",
    ];

    fn parse_entry_kind(kind: &str) -> Either<'_> {
        if Self::OTHER_KINDS.contains(&kind) {
            Either::Entry(Self::Other)
        } else {
            Either::Cpu(kind)
        }
    }

    fn parse_cpu_id(token: &str) -> Result<Option<CpuId>, EntryParseError> {
        use EntryParseError::{CpuIdParse, UnrecognizedEntry};

        // strip the token of its "cpu" prefix.
        let suffix = token.strip_prefix("cpu").ok_or_else(|| UnrecognizedEntry {
            kind: token.to_owned(),
        })?;

        // if there is no suffix, this is the aggregate line.
        if suffix.is_empty() {
            return Ok(None);
        }

        suffix
            .parse::<u16>()
            .map(CpuId)
            .map(Some)
            .map_err(CpuIdParse)
    }
}
