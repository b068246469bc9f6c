//! Reporter - problems as plain lines

use crate::lint::Problem;
use std::io::{self, Write};

/// Write each problem on its own line, in order
///
/// Returns the number of lines written. Nothing is numbered, merged or
/// dropped, so the output is stable for scripts.
pub fn report<W: Write + ?Sized>(problems: &[Problem], out: &mut W) -> io::Result<usize> {
    for problem in problems {
        writeln!(out, "{}", problem)?;
    }
    out.flush()?;
    Ok(problems.len())
}
