//! Interactive Front-end
//!
//! Line-oriented prompt that wires text commands to cache operations.
//!
//! # Commands
//! - `s` / `set` - Store a key-value pair
//! - `g` / `get` - Look up a key
//! - `d` / `delete` - Remove a key
//! - `i` / `info` - Show entry count and capacity
//! - `q` / `quit` - Leave the prompt

mod session;

use std::io::{BufRead, Write};

use anyhow::Context;

pub use session::{Command, Session};

/// Printed once before the first prompt.
pub const BANNER: &str = "Welcome to the interactive demo of ring_lru";

/// Drives `session` over `input` until it closes or input runs out.
///
/// # Errors
/// Returns an error if reading from `input` or writing to `output` fails.
pub fn run<R: BufRead, W: Write>(
    mut session: Session,
    mut input: R,
    mut output: W,
) -> anyhow::Result<()> {
    writeln!(output, "{}", BANNER)?;

    let mut line = String::new();
    while let Some(prompt) = session.prompt() {
        write!(output, "{}", prompt)?;
        output.flush()?;

        line.clear();
        let read = input
            .read_line(&mut line)
            .context("failed to read from input")?;
        if read == 0 {
            writeln!(output)?;
            break;
        }

        if let Some(reply) = session.advance(&line) {
            writeln!(output, "{}", reply)?;
        }
    }

    output.flush()?;
    Ok(())
}
