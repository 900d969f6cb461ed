use {
    crate::source::Frequency,
    std::{
        io::{self, Write},
        iter::repeat_n,
    },
};

/// a box for each logical core, wrapped into rows.
pub struct CorePanel {
    pub cores: usize,
    pub frequency: Frequency,
    /// boxes per row.
    pub width: usize,
}

// === impl CorePanel ===

impl CorePanel {
    pub const WIDTH: usize = 4;

    const BORDER: &str = "+---+ ";
    const BODY: &str = "|   | ";

    pub fn draw(&self, writer: &mut impl Write) -> io::Result<()> {
        let Self {
            cores,
            frequency,
            width,
        } = *self;
        assert!(width > 0, "core rows must hold at least one core");

        writeln!(
            writer,
            "v  Number of Cores: {cores} @ {:.2} GHz",
            frequency.ghz()
        )?;

        let mut remaining = cores;
        while remaining > 0 {
            let n = remaining.min(width);
            for part in [Self::BORDER, Self::BODY, Self::BORDER] {
                let line = repeat_n(part, n).collect::<String>();
                writeln!(writer, "{line}")?;
            }
            remaining -= n;
        }

        Ok(())
    }
}
