use {
    crate::{
        source::{Pause, ProcStatFile, StatsSource, ThreadPause},
        stat::{CpuTimes, Measurement, StatReadError},
    },
    std::time::Duration,
};

/// measures cpu utilization.
///
/// each sample compares two snapshots of the kernel's cpu counters, taken [`CpuSampler::DELAY`]
/// apart.
pub struct CpuSampler<S = ProcStatFile, P = ThreadPause> {
    /// the underlying source of kernel statistics.
    source: S,
    /// waits between the two snapshots.
    pause: P,
}

// === impl CpuSampler ===

impl<S, P> CpuSampler<S, P> {
    /// the time between the two snapshots of a sample.
    ///
    /// this only needs to be long enough for the counters to advance; it does not pace the
    /// display.
    pub const DELAY: Duration = Duration::from_millis(30);

    pub fn new(source: S, pause: P) -> Self {
        Self { source, pause }
    }
}

impl<S, P> CpuSampler<S, P>
where
    S: StatsSource,
    P: Pause,
{
    /// returns the percentage of cpu time spent outside of the idle task, in `[0, 100]`.
    ///
    /// this blocks for [`CpuSampler::DELAY`].
    pub fn sample(&self) -> Result<f64, StatReadError> {
        let Self { source, pause } = self;

        let a = CpuTimes::read(source)?;
        pause.pause(Self::DELAY);
        let b = CpuTimes::read(source)?;

        let measurement = Measurement::new(&a, &b);
        let percent = measurement.percentage();
        tracing::debug!(
            total = measurement.total().get(),
            idle = measurement.idle().get(),
            percent,
            "sampled cpu usage"
        );

        Ok(percent)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::source::{MockPause, MockStatFile},
    };

    fn stat(user: u64, idle: u64) -> String {
        format!("cpu  {user} 0 0 {idle} 0 0 0 0 0 0\ncpu0 {user} 0 0 {idle} 0 0 0 0 0 0\n")
    }

    #[test]
    fn twenty_percent() {
        let source = MockStatFile::new([stat(1000, 5000), stat(1200, 5800)]);
        let sampler = CpuSampler::new(source, MockPause::default());
        let percent = sampler.sample().unwrap();
        assert_eq!(format!("{percent:.2}"), "20.00");
    }

    #[test]
    fn pauses_between_snapshots() {
        let pause = MockPause::default();
        let source = MockStatFile::new([stat(1, 1), stat(2, 2)]);
        CpuSampler::new(source, &pause).sample().unwrap();
        assert_eq!(pause.pauses(), [CpuSampler::<(), ()>::DELAY]);
    }

    #[test]
    fn stalled_counters_read_as_idle() {
        let source = MockStatFile::new([stat(300, 900), stat(300, 900)]);
        let sampler = CpuSampler::new(source, MockPause::default());
        assert_eq!(sampler.sample().unwrap(), 0.0);
    }

    #[test]
    fn unreadable_source() {
        let source = MockStatFile::new([stat(300, 900)]);
        let sampler = CpuSampler::new(source, MockPause::default());
        assert!(matches!(sampler.sample(), Err(StatReadError::Io(_))));
    }
}
