//! a compact system monitor.
//!
//! samples cpu and memory usage on a fixed cadence, and redraws a history graph of each in
//! place on the terminal.

use {
    self::{
        buffer::{BufferError, Metric, SampleBuffer},
        config::RunConfig,
        cores::CorePanel,
        render::Graph,
        sampler::CpuSampler,
        source::{
            Frequency, MemorySource, Pause, ProcStatFile, ProcessorSource, SourceError,
            StatsSource, SystemMemory, SystemProcessor, ThreadPause,
        },
        stat::StatReadError,
    },
    std::{
        io::{self, Write},
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
    },
    tracing::{debug, info},
};

pub mod buffer;
pub mod config;
pub mod cores;
pub mod render;
pub mod sampler;
pub mod source;

/// kernel statistics facilities.
///
/// this file provides tools to interact with `/proc/stat`.
pub mod stat;

mod window;

/// samples and draws the enabled displays.
pub struct App<S = ProcStatFile, M = SystemMemory, C = SystemProcessor, P = ThreadPause> {
    config: RunConfig,
    cpu: CpuSampler<S, P>,
    memory: M,
    processor: C,
    /// waits between refreshes.
    pause: P,
}

/// asks a running [`App`] to stop.
///
/// the app checks this once per refresh, before it sleeps.
#[derive(Clone, Debug, Default)]
pub struct Cancel(Arc<AtomicBool>);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error(transparent)]
    Stat(#[from] StatReadError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("could not write to the terminal")]
    Io(#[from] io::Error),
}

/// the core panel's contents, read when the app starts.
struct Processor {
    cores: usize,
    frequency: Frequency,
}

// === impl App ===

impl App {
    /// initializes a new application, backed by the running system.
    pub fn new(config: RunConfig) -> Self {
        Self::with_sources(
            config,
            ProcStatFile,
            SystemMemory::default(),
            SystemProcessor,
            ThreadPause,
        )
    }
}

impl<S, M, C, P: Clone> App<S, M, C, P> {
    /// initializes a new application with the given collaborators.
    pub fn with_sources(config: RunConfig, stats: S, memory: M, processor: C, pause: P) -> Self {
        Self {
            config,
            cpu: CpuSampler::new(stats, pause.clone()),
            memory,
            processor,
            pause,
        }
    }
}

impl<S, M, C, P> App<S, M, C, P>
where
    S: StatsSource,
    M: MemorySource,
    C: ProcessorSource,
    P: Pause,
{
    /// runs the application, drawing to `out`.
    ///
    /// returns the number of refreshes drawn. this is the configured sample count, unless
    /// `cancel` was triggered first.
    pub fn run(mut self, out: &mut impl Write, cancel: &Cancel) -> Result<usize, Error> {
        let RunConfig {
            samples,
            interval_micros,
            show,
        } = self.config;
        info!(samples, interval_micros, ?show, "starting");

        // allocate a buffer for each enabled graph.
        let memory = show.memory.then(|| {
            let capacity = self.memory.read().capacity();
            SampleBuffer::new(Metric::Memory { capacity }, samples)
        });
        let mut memory = memory.transpose()?;
        let mut cpu = show
            .cpu
            .then(|| SampleBuffer::new(Metric::Cpu, samples))
            .transpose()?;
        let processor = show.cores.then(|| self.processor()).transpose()?;

        let mut ticks = 0;
        if show.graphs() {
            for tick in 1..=samples {
                self.refresh(out, tick, memory.as_mut(), cpu.as_mut())?;
                ticks = tick;

                if cancel.is_cancelled() {
                    info!(tick, "cancelled");
                    break;
                }
                self.pause.pause(self.config.interval());
            }
        }

        if let Some(Processor { cores, frequency }) = processor {
            CorePanel {
                cores,
                frequency,
                width: CorePanel::WIDTH,
            }
            .draw(out)?;
        }
        writeln!(out, "\n")?;
        out.flush()?;

        info!(ticks, "finished");
        Ok(ticks)
    }

    /// draws one frame, recording a new sample into each buffer.
    fn refresh(
        &mut self,
        out: &mut impl Write,
        tick: usize,
        memory: Option<&mut SampleBuffer>,
        cpu: Option<&mut SampleBuffer>,
    ) -> Result<(), Error> {
        let RunConfig {
            samples,
            interval_micros,
            ..
        } = self.config;
        debug!(tick, "refreshing");

        window::home(out)?;
        #[allow(clippy::cast_precision_loss)]
        let secs = interval_micros as f64 * 1e-6;
        writeln!(
            out,
            "Nbr of samples: {samples} -- every {interval_micros} microSecs ({secs:.3} secs)\n"
        )?;

        if let Some(buffer) = memory {
            let used = self.memory.read().used;
            let row = buffer.update(tick, used);
            debug!(tick, used, ?row, "sampled memory usage");
            Graph {
                buffer,
                current: used,
            }
            .draw(out)?;
            writeln!(out, "\n")?;
        }

        if let Some(buffer) = cpu {
            let percent = self.cpu.sample()?;
            let row = buffer.update(tick, percent);
            debug!(tick, percent, ?row, "recorded cpu usage");
            Graph {
                buffer,
                current: percent,
            }
            .draw(out)?;
            writeln!(out, "\n")?;
        }

        out.flush().map_err(Error::from)
    }

    fn processor(&self) -> Result<Processor, SourceError> {
        let frequency = self.processor.max_frequency()?;
        let cores = self.processor.logical_cores();
        debug!(cores, mhz = frequency.mhz(), "read processor information");

        Ok(Processor { cores, frequency })
    }
}

// === impl Cancel ===

impl Cancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let Self(flag) = self;
        flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        let Self(flag) = self;
        flag.load(Ordering::Acquire)
    }
}
