use {
    crate::buffer::{Metric, SampleBuffer},
    std::io::{self, Write},
};

/// a history graph, ready to be drawn.
pub struct Graph<'a> {
    /// the recorded history.
    pub buffer: &'a SampleBuffer,
    /// the latest reading, shown in the header.
    pub current: f64,
}

/// labels for the top and bottom of the y-axis.
struct Axis {
    top: String,
    bottom: String,
}

// === impl Graph ===

impl Graph<'_> {
    pub fn draw(&self, writer: &mut impl Write) -> io::Result<()> {
        let Self { buffer, current } = self;
        let metric = buffer.metric();

        writeln!(writer, "{}\n", Self::header(metric, *current))?;

        let Axis { top, bottom } = Axis::new(metric);
        let width = top.len().max(bottom.len());
        let last = metric.axis_row();

        for (i, row) in buffer.rows().enumerate() {
            let label = match i {
                0 => top.as_str(),
                i if i == last => bottom.as_str(),
                _ => "",
            };
            let cells = row.iter().collect::<String>();
            writeln!(writer, "{label:>width$}{cells}")?;
        }

        Ok(())
    }

    fn header(metric: Metric, current: f64) -> String {
        match metric {
            Metric::Cpu => format!("v  Current CPU Usage: {current:.2}%"),
            Metric::Memory { .. } => format!("v  Current Memory Usage: {current:.2}GB"),
        }
    }
}

// === impl Axis ===

impl Axis {
    fn new(metric: Metric) -> Self {
        match metric {
            Metric::Cpu => Self {
                top: "100% ".to_owned(),
                bottom: "0% ".to_owned(),
            },
            Metric::Memory { capacity } => Self {
                top: format!("{}GB ", capacity.max(1)),
                bottom: "0GB ".to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(buffer: &SampleBuffer, current: f64) -> String {
        let mut out = Vec::new();
        Graph { buffer, current }.draw(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cpu_graph() {
        let mut buffer = SampleBuffer::new(Metric::Cpu, 4).unwrap();
        buffer.update(1, 95.0);
        buffer.update(2, 12.5);
        buffer.update(3, 0.0);
        buffer.update(4, 40.0);

        let text = draw(&buffer, 40.0);
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "v  Current CPU Usage: 40.00%");
        assert_eq!(lines[1], "");
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[2], "100% |:   ");
        assert_eq!(lines[3], "     |    ");
        assert_eq!(lines[8], "     |   :");
        assert_eq!(lines[10], "     | :  ");
        assert_eq!(lines[12], "  0%  ____");
    }

    #[test]
    fn memory_labels_widen_with_capacity() {
        let mut buffer = SampleBuffer::new(Metric::Memory { capacity: 128 }, 2).unwrap();
        buffer.update(1, 128.0);
        buffer.update(2, 64.0);

        let text = draw(&buffer, 64.0);
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "v  Current Memory Usage: 64.00GB");
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[2], "128GB |# ");
        assert_eq!(lines[3], "      |  ");
        assert_eq!(lines[8], "      | #");
        assert_eq!(lines[14], "  0GB  __");
    }

    /// every row lines its y-axis up in the same column.
    #[test]
    fn axis_is_aligned() {
        for capacity in [1, 9, 10, 999, 1000] {
            let buffer = SampleBuffer::new(Metric::Memory { capacity }, 3).unwrap();
            let text = draw(&buffer, 0.0);
            let widths = text
                .lines()
                .skip(2)
                .map(|line| line.chars().count())
                .collect::<Vec<_>>();
            assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
        }
    }

    #[test]
    fn two_decimal_header() {
        let buffer = SampleBuffer::new(Metric::Memory { capacity: 16 }, 1).unwrap();
        let text = draw(&buffer, 7.126);
        assert!(text.starts_with("v  Current Memory Usage: 7.13GB\n\n"));
    }
}
