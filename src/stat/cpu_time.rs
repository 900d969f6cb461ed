use super::*;

/// cumulative time the system's cpus spent in various states since boot.
///
/// this is read from the aggregate `cpu` line of `/proc/stat`. the kernel reports ten columns;
/// the `irq` column is discarded, so interrupt servicing counts neither as busy nor idle time.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CpuTimes {
    /// time spent in user mode.
    pub user: UserHz,
    /// time spent in user mode with low priority (nice).
    pub nice: UserHz,
    /// time spent in system mode.
    pub system: UserHz,
    /// time spent in the idle task.
    pub idle: UserHz,
    /// time waiting for i/o to complete.
    ///
    /// this value is not reliable; the value in this field may decrease in certain conditions.
    pub iowait: UserHz,
    /// time servicing softirqs.
    pub softirq: UserHz,
    /// stolen time, which is the time spent in other operating systems when running in a
    /// virtualized environment.
    pub steal: UserHz,
    /// time spent running a virtual cpu for guest operating systems.
    pub guest: UserHz,
    /// time spent running a niced guest.
    pub guest_nice: UserHz,
}

/// a measurement of the difference between two [`CpuTimes`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Measurement {
    /// ticks elapsed across all counters.
    total: UserHz,
    /// ticks elapsed in the idle task.
    idle: UserHz,
}

// === impl CpuTimes ===

impl CpuTimes {
    /// the number of counters on a kernel `cpu` line.
    const COLUMNS: usize = 10;

    /// the sum of all nine counters.
    pub fn total(&self) -> UserHz {
        self.counters().into_iter().sum()
    }

    pub fn counters(&self) -> [UserHz; 9] {
        let Self {
            user,
            nice,
            system,
            idle,
            iowait,
            softirq,
            steal,
            guest,
            guest_nice,
        } = *self;

        [
            user, nice, system, idle, iowait, softirq, steal, guest, guest_nice,
        ]
    }
}

impl TryFrom<Vec<UserHz>> for CpuTimes {
    type Error = EntryParseError;
    fn try_from(times: Vec<UserHz>) -> Result<Self, Self::Error> {
        let found = times.len();
        <_ as TryInto<[_; CpuTimes::COLUMNS]>>::try_into(times)
            .map(Self::from)
            .map_err(|_| EntryParseError::CounterCount { found })
    }
}

impl From<[UserHz; 10]> for CpuTimes {
    fn from(
        [
            user,
            nice,
            system,
            idle,
            iowait,
            _irq,
            softirq,
            steal,
            guest,
            guest_nice,
        ]: [UserHz; 10],
    ) -> Self {
        Self {
            user,
            nice,
            system,
            idle,
            iowait,
            softirq,
            steal,
            guest,
            guest_nice,
        }
    }
}

// == impl Measurement ===

impl Measurement {
    /// compares snapshot `a` with the later snapshot `b`.
    pub fn new(a: &CpuTimes, b: &CpuTimes) -> Self {
        Self {
            total: b.total().since(a.total()),
            idle: b.idle.since(a.idle),
        }
    }

    /// returns the percentage of non-idle cpu time, in `[0, 100]`.
    ///
    /// when no counter advanced between the two snapshots this returns `0.0`.
    pub fn percentage(&self) -> f64 {
        let Self { total, idle } = *self;

        if total == UserHz::ZERO {
            tracing::debug!("cpu counters did not advance, reporting idle");
            return 0.0;
        }

        let active = total.since(idle);
        let percent = (active / total) * 100.0;

        percent.clamp(0.0, 100.0)
    }

    pub fn total(&self) -> UserHz {
        self.total
    }

    pub fn idle(&self) -> UserHz {
        self.idle
    }
}
