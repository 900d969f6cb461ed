//! drives the sampling loop against mock collaborators.

use {
    std::time::Duration,
    sysgraph::{
        App, Cancel, Error,
        config::{RunConfig, Show},
        sampler::CpuSampler,
        source::{Frequency, MemoryStats, MockMemory, MockPause, MockProcessor, MockStatFile},
    },
};

const CPU_ONLY: Show = Show {
    cpu: true,
    memory: false,
    cores: false,
};

fn config(samples: usize, show: Show) -> RunConfig {
    RunConfig {
        samples,
        interval_micros: 250_000,
        show,
    }
}

/// a `/proc/stat` file whose aggregate line has the given busy and idle ticks.
fn stat(busy: u64, idle: u64) -> String {
    format!("cpu  {busy} 0 0 {idle} 0 0 0 0 0 0\nintr 0\n")
}

/// pairs of snapshots that sample to the given percentages.
fn stats(percents: &[u64]) -> MockStatFile {
    let files = percents.iter().flat_map(|p| [stat(0, 0), stat(*p, 100 - p)]);
    MockStatFile::new(files)
}

fn memory(used_gb: &[f64]) -> MockMemory {
    let readings = std::iter::once(MemoryStats {
        total: 16.4,
        used: 0.0,
    })
    .chain(used_gb.iter().map(|used| MemoryStats {
        total: 16.4,
        used: *used,
    }));
    MockMemory::new(readings.collect::<Vec<_>>())
}

fn processor() -> MockProcessor {
    MockProcessor {
        frequency: Some(Frequency::from_khz(3_000_000)),
        cores: 6,
    }
}

fn run(
    config: RunConfig,
    stats: MockStatFile,
    memory: MockMemory,
    processor: MockProcessor,
    pause: &MockPause,
    cancel: &Cancel,
) -> (Result<usize, Error>, String) {
    let mut out = Vec::new();
    let result =
        App::with_sources(config, stats, memory, processor, pause).run(&mut out, cancel);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn cpu_only_runs_every_sample() {
    let pause = MockPause::default();
    let (ticks, out) = run(
        config(3, CPU_ONLY),
        stats(&[20, 50, 90]),
        memory(&[]),
        processor(),
        &pause,
        &Cancel::new(),
    );

    assert_eq!(ticks.unwrap(), 3);
    assert_eq!(out.matches("Nbr of samples: 3 -- every 250000 microSecs (0.250 secs)").count(), 3);
    assert_eq!(out.matches("v  Current CPU Usage:").count(), 3);
    assert!(out.contains("v  Current CPU Usage: 90.00%"));
    assert!(!out.contains("Memory"));
    assert!(!out.contains("Number of Cores"));

    let interval = Duration::from_micros(250_000);
    let delay = CpuSampler::<(), ()>::DELAY;
    assert_eq!(
        pause.pauses(),
        [delay, interval, delay, interval, delay, interval]
    );
}

#[test]
fn last_frame_holds_the_whole_history() {
    let pause = MockPause::default();
    let (_, out) = run(
        config(3, CPU_ONLY),
        stats(&[20, 50, 90]),
        memory(&[]),
        processor(),
        &pause,
        &Cancel::new(),
    );

    let frame = out.rsplit("\x1b[1;1H").next().unwrap();
    let lines = frame.lines().collect::<Vec<_>>();
    assert_eq!(lines[2], "v  Current CPU Usage: 90.00%");
    assert_eq!(lines[4], "100% |   ");
    assert_eq!(lines[5], "     |  :");
    assert_eq!(lines[9], "     | : ");
    assert_eq!(lines[12], "     |:  ");
    assert_eq!(lines[14], "  0%  ___");
}

#[test]
fn frames_clear_the_screen() {
    let pause = MockPause::default();
    let (_, out) = run(
        config(2, CPU_ONLY),
        stats(&[10, 10]),
        memory(&[]),
        processor(),
        &pause,
        &Cancel::new(),
    );

    assert!(out.starts_with("\x1b[2J\x1b[1;1HNbr of samples: 2"));
    assert_eq!(out.matches("\x1b[2J").count(), 2);
}

#[test]
fn memory_is_drawn_before_cpu() {
    let pause = MockPause::default();
    let show = Show {
        cpu: true,
        memory: true,
        cores: false,
    };
    let (ticks, out) = run(
        config(2, show),
        stats(&[40, 60]),
        memory(&[6.5, 7.25]),
        processor(),
        &pause,
        &Cancel::new(),
    );

    assert_eq!(ticks.unwrap(), 2);
    let memory = out.find("v  Current Memory Usage: 6.50GB").unwrap();
    let cpu = out.find("v  Current CPU Usage: 40.00%").unwrap();
    assert!(memory < cpu);
    assert!(out.contains("v  Current Memory Usage: 7.25GB"));
    assert!(out.contains("16GB |"));
}

#[test]
fn cancel_stops_at_the_tick_boundary() {
    let pause = MockPause::default();
    let cancel = Cancel::new();
    cancel.cancel();
    let show = Show {
        cpu: true,
        memory: false,
        cores: true,
    };

    let (ticks, out) = run(
        config(10, show),
        stats(&[30]),
        memory(&[]),
        processor(),
        &pause,
        &cancel,
    );

    assert_eq!(ticks.unwrap(), 1);
    assert_eq!(out.matches("Nbr of samples").count(), 1);
    assert_eq!(pause.pauses(), [CpuSampler::<(), ()>::DELAY]);
    assert!(out.contains("v  Number of Cores: 6 @ 3.00 GHz"));
}

#[test]
fn cores_only_skips_sampling() {
    let pause = MockPause::default();
    let show = Show {
        cpu: false,
        memory: false,
        cores: true,
    };
    let (ticks, out) = run(
        config(5, show),
        MockStatFile::default(),
        memory(&[]),
        processor(),
        &pause,
        &Cancel::new(),
    );

    assert_eq!(ticks.unwrap(), 0);
    assert!(pause.pauses().is_empty());
    assert!(!out.contains("Nbr of samples"));
    assert_eq!(
        out,
        "v  Number of Cores: 6 @ 3.00 GHz\n\
         +---+ +---+ +---+ +---+ \n\
         |   | |   | |   | |   | \n\
         +---+ +---+ +---+ +---+ \n\
         +---+ +---+ \n\
         |   | |   | \n\
         +---+ +---+ \n\
         \n\n"
    );
}

#[test]
fn unreadable_frequency_is_fatal_before_drawing() {
    let pause = MockPause::default();
    let mut processor = processor();
    processor.frequency = None;

    let (result, out) = run(
        RunConfig::default(),
        stats(&[10]),
        memory(&[1.0]),
        processor,
        &pause,
        &Cancel::new(),
    );

    assert!(matches!(result, Err(Error::Source(_))));
    assert!(out.is_empty());
}

#[test]
fn unreadable_counters_are_fatal() {
    let pause = MockPause::default();
    let (result, _) = run(
        config(3, CPU_ONLY),
        stats(&[10]),
        memory(&[]),
        processor(),
        &pause,
        &Cancel::new(),
    );

    assert!(matches!(result, Err(Error::Stat(_))));
}

#[test]
fn oversized_graph_is_rejected_before_drawing() {
    let pause = MockPause::default();
    let (result, out) = run(
        config(usize::MAX, CPU_ONLY),
        stats(&[10]),
        memory(&[]),
        processor(),
        &pause,
        &Cancel::new(),
    );

    assert!(matches!(result, Err(Error::Buffer(_))));
    assert!(out.is_empty());
    assert!(pause.pauses().is_empty());
}
