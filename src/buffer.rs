//! fixed-width history of discretized samples.

/// the quantity a [`SampleBuffer`] records, and how it is discretized.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Metric {
    /// cpu utilization, from 0 to 100 percent.
    Cpu,
    /// memory in use, from 0 to `capacity` gigabytes.
    Memory { capacity: u64 },
}

/// a grid of cells, one column per tick.
///
/// column 0 is the y-axis. the bottom row is the x-axis, and represents zero. cells are stored
/// row-major, `width` cells per row.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    metric: Metric,
    width: usize,
    cells: Vec<char>,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum BufferError {
    #[error("cannot allocate a graph {samples} samples wide")]
    TooWide { samples: usize },
}

// === impl Metric ===

impl Metric {
    pub const BLANK: char = ' ';
    pub const Y_AXIS: char = '|';
    pub const X_AXIS: char = '_';
    /// the y-axis character on the x-axis row.
    pub const TERMINATOR: char = ' ';

    /// the number of bands a reading is classified into.
    pub const fn buckets(&self) -> usize {
        match self {
            Self::Cpu => 10,
            Self::Memory { .. } => 12,
        }
    }

    /// the largest representable reading.
    #[allow(clippy::cast_precision_loss)]
    pub fn range(&self) -> f64 {
        match *self {
            Self::Cpu => 100.0,
            Self::Memory { capacity } => capacity.max(1) as f64,
        }
    }

    pub const fn marker(&self) -> char {
        match self {
            Self::Cpu => ':',
            Self::Memory { .. } => '#',
        }
    }

    pub const fn rows(&self) -> usize {
        self.buckets() + 1
    }

    /// the index of the x-axis row.
    pub const fn axis_row(&self) -> usize {
        self.buckets()
    }

    #[allow(clippy::cast_precision_loss)]
    fn bucket_size(&self) -> f64 {
        self.range() / self.buckets() as f64
    }

    /// returns the row a reading is drawn on, or `None` if it falls on the axis.
    ///
    /// readings above the range are drawn on the top row. zero, negative, and NaN readings are
    /// not drawn.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn row(&self, value: f64) -> Option<usize> {
        if value.is_nan() || value <= 0.0 {
            return None;
        }

        // any positive reading climbs at least one row off the axis.
        let steps = ((value / self.bucket_size()).ceil() as usize).max(1);

        Some(self.buckets().saturating_sub(steps))
    }
}

// === impl SampleBuffer ===

impl SampleBuffer {
    /// returns a new, empty buffer with room for `samples` ticks.
    pub fn new(metric: Metric, samples: usize) -> Result<Self, BufferError> {
        let too_wide = || BufferError::TooWide { samples };
        let width = samples.checked_add(1).ok_or_else(too_wide)?;
        let len = metric.rows().checked_mul(width).ok_or_else(too_wide)?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_wide())?;

        let axis = metric.axis_row();
        let grid = (0..metric.rows())
            .flat_map(|row| (0..width).map(move |col| (row, col)))
            .map(|cell| match cell {
                (row, 0) if row == axis => Metric::TERMINATOR,
                (_, 0) => Metric::Y_AXIS,
                (row, _) if row == axis => Metric::X_AXIS,
                _ => Metric::BLANK,
            });
        cells.extend(grid);

        Ok(Self {
            metric,
            width,
            cells,
        })
    }

    /// records `value` at column `tick`, returning the row that was marked.
    ///
    /// # panics
    ///
    /// panics if `tick` is not in `1..=samples`.
    pub fn update(&mut self, tick: usize, value: f64) -> Option<usize> {
        assert!(
            (1..self.width).contains(&tick),
            "tick {tick} is outside of 1..={}",
            self.samples()
        );

        let row = self.metric.row(value)?;
        let index = row * self.width + tick;
        self.cells[index] = self.metric.marker();

        Some(row)
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// the number of tick columns.
    pub fn samples(&self) -> usize {
        self.width - 1
    }

    /// iterates over rows from the top of the graph to the x-axis.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        (col < self.width)
            .then(|| self.cells.get(row * self.width + col).copied())
            .flatten()
    }
}
