use {
    crossterm::{QueueableCommand, cursor, terminal},
    std::io::{self, Write},
};

/// clears the screen and moves the cursor to the top-left corner.
///
/// the commands are queued; they reach the terminal when `writer` is flushed.
pub fn home(writer: &mut impl Write) -> io::Result<()> {
    writer
        .queue(terminal::Clear(terminal::ClearType::All))?
        .queue(cursor::MoveTo(0, 0))
        .map(drop)
}
