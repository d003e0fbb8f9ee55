//! Line-oriented front end.
//!
//! ```text
//! Enter C# method body:
//! public int Add(int a, int b) { return a + b; }
//! Enter parameter value for parameter: int a
//! 3
//! Enter parameter value for parameter: int b
//! 4
//! Result: 7
//! ```

use std::io::{self, BufRead, Write};

use crate::engine::Engine;
use crate::extract::extract_parameters;
use crate::params::ParameterSet;
use crate::toolchain::Toolchain;

/// Run one prompt/execute/report round over `input` and `output`.
///
/// Engine failures are reported on `output` as `Error: <message>`; only
/// I/O failures are returned.
pub fn run_session<T: Toolchain>(
    engine: &Engine<T>,
    mut input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    writeln!(output, "Enter C# method body:")?;
    output.flush()?;
    let body = read_line(&mut input)?;

    let parameters = extract_parameters(&body);
    let mut values = Vec::with_capacity(parameters.len());
    for parameter in &parameters {
        writeln!(output, "Enter parameter value for parameter: {parameter}")?;
        output.flush()?;
        values.push(read_line(&mut input)?);
    }
    let params = if parameters.is_empty() {
        ParameterSet::none()
    } else {
        ParameterSet::from_extracted(&parameters, values)
    };

    match engine.execute_method(&body, &params) {
        Ok(value) => writeln!(output, "Result: {value}")?,
        Err(error) => writeln!(output, "Error: {error}")?,
    }
    output.flush()
}

/// One line without its terminator; empty at end of input.
fn read_line(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

#[cfg(test)]
mod tests;
