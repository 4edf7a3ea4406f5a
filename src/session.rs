//! Interactive prompt loop: ask for a username, scan it, offer another.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::report::{OutputFormat, Reporter};
use crate::scan::{ScanSummary, Scanner};

/// Inputs at the username prompt that end the session.
const QUIT_WORDS: &[&str] = &["q", "quit", "exit"];

/// Prompt for usernames on `input` and scan each one until the operator
/// quits, enters nothing, declines another scan, or input ends.
///
/// Returns the summary of every completed scan, in order.
///
/// # Errors
///
/// Fails if reading `input` or writing `output` fails. Probe failures are
/// reported inline and never end the session.
pub fn run<R: BufRead, W: Write>(
    scanner: &Scanner,
    format: OutputFormat,
    found_only: bool,
    mut input: R,
    mut output: W,
) -> io::Result<Vec<ScanSummary>> {
    let mut scans = Vec::new();

    loop {
        write!(output, "Enter base username: ")?;
        output.flush()?;

        let Some(line) = read_answer(&mut input)? else {
            writeln!(output)?;
            break;
        };
        let base = line.trim();

        if base.is_empty() {
            writeln!(output, "No username entered. Exiting.")?;
            break;
        }
        if QUIT_WORDS.iter().any(|w| base.eq_ignore_ascii_case(w)) {
            break;
        }

        writeln!(output)?;
        let mut reporter = Reporter::new(&mut output, format, found_only);
        scans.push(scanner.scan(base, &mut reporter)?);

        if !ask_again(&mut input, &mut output)? {
            break;
        }
    }

    writeln!(output, "Goodbye.")?;
    output.flush()?;
    debug!(scans = scans.len(), "session ended");
    Ok(scans)
}

fn ask_again<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    loop {
        write!(output, "Scan another username? (y/n): ")?;
        output.flush()?;

        let Some(answer) = read_answer(input)? else {
            writeln!(output)?;
            return Ok(false);
        };
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => writeln!(output, "Please answer with 'y' or 'n'.")?,
        }
    }
}

/// One line of input, or `None` at end of input.
fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
