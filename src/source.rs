use std::{
    cell::RefCell,
    collections::VecDeque,
    fs::File,
    io::{self, BufReader, Cursor, Read},
    time::Duration,
};

pub use self::{memory::*, pause::*, processor::*, stats::*};

mod pause {
    use super::*;

    /// blocks the calling thread.
    pub trait Pause {
        fn pause(&self, duration: Duration);
    }

    #[derive(Clone, Copy, Debug, Default)]
    pub struct ThreadPause;

    impl Pause for ThreadPause {
        fn pause(&self, duration: Duration) {
            std::thread::sleep(duration);
        }
    }

    /// a mock pause that records how long it was asked to wait.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockPause {
        pauses: RefCell<Vec<Duration>>,
    }

    impl Pause for MockPause {
        fn pause(&self, duration: Duration) {
            self.pauses.borrow_mut().push(duration);
        }
    }

    impl MockPause {
        #[allow(dead_code, reason = "this is a testing utility.")]
        pub fn pauses(&self) -> Vec<Duration> {
            self.pauses.borrow().clone()
        }
    }

    impl<P: Pause> Pause for &P {
        fn pause(&self, duration: Duration) {
            (**self).pause(duration)
        }
    }
}

/// abstracts over providers of statistics.
mod stats {
    use super::*;

    /// a source of kernel statistics.
    pub trait StatsSource {
        /// returns a reader.
        fn open(&self) -> io::Result<impl Read>;
    }

    /// stats backed by `/proc/stat`.
    #[derive(Default)]
    pub struct ProcStatFile;

    /// a mock stat source.
    ///
    /// each call to [`StatsSource::open()`] yields the next queued file. once the queue is
    /// exhausted, opening fails.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockStatFile {
        stats: RefCell<VecDeque<String>>,
    }

    // === impl ProcStatFile ===

    impl StatsSource for ProcStatFile {
        fn open(&self) -> io::Result<impl Read> {
            File::open(Self::STAT).map(BufReader::new)
        }
    }

    impl ProcStatFile {
        const STAT: &str = "/proc/stat";
    }

    // === impl MockStatFile ===

    impl StatsSource for MockStatFile {
        fn open(&self) -> io::Result<impl Read> {
            let Self { stats } = self;

            stats
                .borrow_mut()
                .pop_front()
                .map(Cursor::new)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "mock stats exhausted"))
        }
    }

    impl MockStatFile {
        #[allow(dead_code, reason = "this is a testing utility.")]
        pub fn new<I, S>(stats: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let stats = stats.into_iter().map(Into::into).collect();
            Self {
                stats: RefCell::new(stats),
            }
        }
    }
}

/// memory usage, in decimal gigabytes.
mod memory {
    use super::*;

    const BYTES_PER_GB: f64 = 1e9;

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct MemoryStats {
        /// installed memory.
        pub total: f64,
        /// memory in use, i.e. not free.
        pub used: f64,
    }

    pub trait MemorySource {
        fn read(&mut self) -> MemoryStats;
    }

    /// memory statistics backed by [`sysinfo`].
    pub struct SystemMemory {
        system: sysinfo::System,
    }

    /// a mock memory source that replays queued readings, repeating the last one.
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockMemory {
        readings: VecDeque<MemoryStats>,
    }

    // === impl MemoryStats ===

    impl MemoryStats {
        #[allow(clippy::cast_precision_loss, reason = "byte counts fit comfortably in an f64")]
        pub fn from_bytes(total: u64, free: u64) -> Self {
            let used = total.saturating_sub(free);
            Self {
                total: total as f64 / BYTES_PER_GB,
                used: used as f64 / BYTES_PER_GB,
            }
        }

        /// the graph capacity: installed memory in whole gigabytes, at least one.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        pub fn capacity(&self) -> u64 {
            (self.total.trunc() as u64).max(1)
        }
    }

    // === impl SystemMemory ===

    impl Default for SystemMemory {
        fn default() -> Self {
            Self {
                system: sysinfo::System::new(),
            }
        }
    }

    impl MemorySource for SystemMemory {
        fn read(&mut self) -> MemoryStats {
            let Self { system } = self;

            system.refresh_memory();
            MemoryStats::from_bytes(system.total_memory(), system.free_memory())
        }
    }

    // === impl MockMemory ===

    impl MockMemory {
        #[allow(dead_code, reason = "this is a testing utility.")]
        pub fn new(readings: impl IntoIterator<Item = MemoryStats>) -> Self {
            Self {
                readings: readings.into_iter().collect(),
            }
        }
    }

    impl MemorySource for MockMemory {
        fn read(&mut self) -> MemoryStats {
            let Self { readings } = self;

            match readings.len() {
                0 => panic!("mock memory readings should not be empty"),
                1 => readings[0],
                _ => readings.pop_front().expect("readings are not empty"),
            }
        }
    }
}

/// processor topology and clock speed.
mod processor {
    use super::*;

    /// a clock frequency, as reported by cpufreq.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Frequency {
        khz: u64,
    }

    #[derive(Debug, thiserror::Error)]
    pub enum SourceError {
        #[error("could not read {path}")]
        Io {
            path: &'static str,
            #[source]
            source: io::Error,
        },
        #[error("malformed frequency in {path}")]
        Frequency {
            path: &'static str,
            #[source]
            source: std::num::ParseIntError,
        },
    }

    pub trait ProcessorSource {
        /// the maximum scaling frequency of the first cpu.
        fn max_frequency(&self) -> Result<Frequency, SourceError>;
        /// the number of logical processors.
        fn logical_cores(&self) -> usize;
    }

    /// processor information backed by sysfs and [`sysinfo`].
    #[derive(Default)]
    pub struct SystemProcessor;

    /// a mock processor source.
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockProcessor {
        pub frequency: Option<Frequency>,
        pub cores: usize,
    }

    // === impl Frequency ===

    impl Frequency {
        pub const fn from_khz(khz: u64) -> Self {
            Self { khz }
        }

        #[allow(clippy::cast_precision_loss)]
        pub fn mhz(&self) -> f64 {
            self.khz as f64 / 1e3
        }

        #[allow(clippy::cast_precision_loss)]
        pub fn ghz(&self) -> f64 {
            self.khz as f64 / 1e6
        }
    }

    // === impl SystemProcessor ===

    impl SystemProcessor {
        const MAX_FREQ: &str = "/sys/devices/system/cpu/cpu0/cpufreq/scaling_max_freq";
    }

    impl ProcessorSource for SystemProcessor {
        fn max_frequency(&self) -> Result<Frequency, SourceError> {
            let path = Self::MAX_FREQ;
            let mut contents = String::new();
            File::open(path)
                .and_then(|mut file| file.read_to_string(&mut contents))
                .map_err(|source| SourceError::Io { path, source })?;

            contents
                .trim()
                .parse::<u64>()
                .map(Frequency::from_khz)
                .map_err(|source| SourceError::Frequency { path, source })
        }

        fn logical_cores(&self) -> usize {
            use sysinfo::{CpuRefreshKind, RefreshKind, System};

            let system =
                System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()));
            system.cpus().len()
        }
    }

    // === impl MockProcessor ===

    impl ProcessorSource for MockProcessor {
        fn max_frequency(&self) -> Result<Frequency, SourceError> {
            self.frequency.ok_or_else(|| SourceError::Io {
                path: "mock",
                source: io::Error::new(io::ErrorKind::NotFound, "no mock frequency"),
            })
        }

        fn logical_cores(&self) -> usize {
            self.cores
        }
    }
}
