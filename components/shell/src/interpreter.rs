//! Command interpreter
//!
//! Splits a completed line into a command name and its arguments, runs the
//! matching built-in and writes the outcome to the terminal. Failures are
//! reported as `Error: ...` lines; nothing here aborts the shell.

use core::fmt::Write;

use ohnebs_hal::numfmt::parse_i32;
use ohnebs_hal::{CharDevice, TextWriter};

use crate::expression::evaluate;
use crate::variables::{var_name, VariableStore};
use crate::{Result, ShellError, COMMAND_NAME_MAX, HELP_TEXT, VERSION_TEXT};

const SET_USAGE: &str = "set <name> <value>";
const GET_USAGE: &str = "get <name>";

/// A parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Version,
    /// `set <name> <value>`; either part may be missing
    Set {
        name: &'a str,
        value: Option<&'a str>,
    },
    Get {
        name: &'a str,
    },
    Print {
        expr: &'a str,
    },
    Unknown,
}

impl<'a> Command<'a> {
    /// Parse a line
    ///
    /// The command name runs up to the first space. Names longer than
    /// [`COMMAND_NAME_MAX`] never match a built-in.
    pub fn parse(line: &'a str) -> Self {
        let (name, args) = line.split_once(' ').unwrap_or((line, ""));

        if name.len() > COMMAND_NAME_MAX {
            return Command::Unknown;
        }

        match name {
            "help" => Command::Help,
            "version" => Command::Version,
            "set" => {
                let (name, value) = match args.split_once(' ') {
                    Some((name, value)) => (name, Some(value)),
                    None => (args, None),
                };
                Command::Set { name, value }
            }
            "get" => Command::Get {
                name: args.split(' ').next().unwrap_or_default(),
            },
            "print" => Command::Print { expr: args },
            _ => Command::Unknown,
        }
    }
}

/// Run one line against the variable store, writing results to `out`
pub fn execute<D: CharDevice + ?Sized>(line: &str, vars: &mut VariableStore, out: &mut D) {
    let command = Command::parse(line);
    log::trace!("{:?}", command);

    let outcome = match command {
        Command::Help => {
            out.write_text(HELP_TEXT);
            Ok(())
        }
        Command::Version => {
            out.write_text(VERSION_TEXT);
            Ok(())
        }
        Command::Set { name, value } => run_set(name, value, vars, out),
        Command::Get { name } => run_get(name, vars, out),
        Command::Print { expr } => evaluate(expr, vars).map(|value| print_value(value, out)),
        Command::Unknown => {
            let _ = write!(TextWriter::new(out), "Unknown command: '{}'\n", line);
            Ok(())
        }
    };

    if let Err(e) = outcome {
        let _ = write!(TextWriter::new(out), "Error: {}\n", e);
    }
}

fn run_set<D: CharDevice + ?Sized>(
    name: &str,
    value: Option<&str>,
    vars: &mut VariableStore,
    out: &mut D,
) -> Result<()> {
    let value = match value {
        Some(text) if !name.is_empty() => parse_i32(text),
        _ => return Err(ShellError::MissingArgument { usage: SET_USAGE }),
    };

    vars.set(name, value)?;
    out.write_text("OK.\n");
    Ok(())
}

fn run_get<D: CharDevice + ?Sized>(name: &str, vars: &VariableStore, out: &mut D) -> Result<()> {
    if name.is_empty() {
        return Err(ShellError::MissingArgument { usage: GET_USAGE });
    }

    let value = vars.get(name).ok_or_else(|| ShellError::UndefinedVariable {
        name: var_name(name),
    })?;
    print_value(value, out);
    Ok(())
}

fn print_value<D: CharDevice + ?Sized>(value: i32, out: &mut D) {
    out.write_int(value);
    out.write_text("\n");
}
