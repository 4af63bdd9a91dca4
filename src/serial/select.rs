//! Interactive port selection

use super::port::PortInfo;
use crate::error::PortError;
use colored::Colorize;
use std::io::{BufRead, Write};

/// Parse an operator's answer into a port index
pub fn parse_selection(answer: &str, port_count: usize) -> Result<usize, PortError> {
    let answer = answer.trim();
    let index: usize = answer
        .parse()
        .map_err(|_| PortError::InvalidSelection(format!("'{}' is not a number", answer)))?;

    if index >= port_count {
        return Err(PortError::InvalidSelection(format!(
            "{} is out of range (0-{})",
            index,
            port_count.saturating_sub(1)
        )));
    }

    Ok(index)
}

/// List `ports` on `output` and ask for a selection until a valid index is
/// entered. Closing `input` aborts the prompt.
pub fn choose_port<R: BufRead, W: Write>(
    ports: &[PortInfo],
    input: &mut R,
    output: &mut W,
) -> Result<String, PortError> {
    if ports.is_empty() {
        return Err(PortError::PortUnavailable);
    }

    writeln!(output, "{}", "Available serial ports:".green().bold())?;
    for (i, port) in ports.iter().enumerate() {
        writeln!(output, "  {}: {} - {}", i, port.path, port.description)?;
    }

    loop {
        write!(output, "Select port number (e.g. 0): ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Err(PortError::SelectionAborted);
        }

        match parse_selection(&answer, ports.len()) {
            Ok(index) => return Ok(ports[index].path.clone()),
            Err(e) => writeln!(output, "{} {}", "[WARNING]".yellow().bold(), e)?,
        }
    }
}
