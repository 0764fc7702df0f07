//! Line-oriented console driver for a navigation session.

use std::io::{self, BufRead, Write};

use log::debug;
use rooms::{Error, Result, RoomSet, Session, Step, TimeQuery};

pub const INVALID_ROOM_MESSAGE: &str = "HUH? I DON’T UNDERSTAND THAT ROOM. TRY AGAIN.";
pub const VICTORY_MESSAGE: &str = "YOU HAVE FOUND THE END ROOM. CONGRATULATIONS!";
pub const PROMPT: &str = "WHERE TO? >";

/// How a finished session went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub steps: usize,
    pub path: Vec<String>,
}

/// Play `rooms` from the start room until the end room is entered.
///
/// Fails with `Error::InputClosed` if `input` runs dry first.
pub fn run_session<R, W, T>(
    rooms: &RoomSet,
    input: &mut R,
    output: &mut W,
    time: &mut T,
) -> Result<SessionSummary>
where
    R: BufRead,
    W: Write,
    T: TimeQuery,
{
    let mut session = Session::start(rooms)?;
    let mut line = Vec::new();

    while !session.is_finished() {
        write_location(output, &session).map_err(stdout_error)?;
        loop {
            write!(output, "{PROMPT}").map_err(stdout_error)?;
            output.flush().map_err(stdout_error)?;

            line.clear();
            if input.read_until(b'\n', &mut line).map_err(|e| Error::io("<stdin>", e))? == 0 {
                return Err(Error::InputClosed);
            }
            // Bytes that are not UTF-8 decode to U+FFFD and never name a room.
            let decoded = String::from_utf8_lossy(&line);
            let entry = decoded.trim_end_matches(['\r', '\n']);

            match session.advance(entry) {
                Step::QueryTime => {
                    let reading = time.query_time()?;
                    write!(output, "\n{}\n\n", reading.text).map_err(stdout_error)?;
                    continue;
                }
                Step::Invalid => {
                    debug!("rejected input '{entry}' in {}", session.current_name());
                    write!(output, "\n{INVALID_ROOM_MESSAGE}\n\n").map_err(stdout_error)?;
                }
                // Blank line between the answered prompt and the next block.
                Step::Moved(_) | Step::Arrived(_) => writeln!(output).map_err(stdout_error)?,
            }
            break;
        }
    }

    let summary = SessionSummary {
        steps: session.steps(),
        path: session.path_names().into_iter().map(str::to_string).collect(),
    };
    write_victory(output, &summary).map_err(stdout_error)?;
    Ok(summary)
}

fn write_location<W: Write>(output: &mut W, session: &Session<'_>) -> io::Result<()> {
    writeln!(output, "CURRENT LOCATION: {}", session.current_name())?;
    writeln!(output, "POSSIBLE CONNECTIONS: {}.", session.exits().join(", "))
}

fn write_victory<W: Write>(output: &mut W, summary: &SessionSummary) -> io::Result<()> {
    writeln!(output, "{VICTORY_MESSAGE}")?;
    writeln!(output, "YOU TOOK {} STEPS. YOUR PATH TO VICTORY WAS:", summary.steps)?;
    for name in &summary.path {
        writeln!(output, "{name}")?;
    }
    output.flush()
}

fn stdout_error(e: io::Error) -> Error {
    Error::io("<stdout>", e)
}
