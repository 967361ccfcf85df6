//! OhneBS Shell - line-oriented command shell over a serial channel
//!
//! # Purpose
//! Polls a [`CharDevice`](ohnebs_hal::CharDevice) for keystrokes, edits the
//! current line in place and hands completed lines to the command
//! interpreter, which manages named integer variables and evaluates
//! single-`+` expressions.
//!
//! # Commands
//! - `help`: list commands
//! - `version`: print the version string
//! - `set <name> <value>`: store an integer variable
//! - `get <name>`: print a variable
//! - `print <expr>`: evaluate `term` or `term+term`
//!
//! # Architecture
//! No heap: the line buffer, variable names and the variable table are
//! fixed-capacity `heapless` collections. All state is owned by the caller
//! and passed in; there are no globals.

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

use static_assertions::const_assert;
use thiserror::Error;

pub mod expression;
pub mod interpreter;
pub mod line_editor;
pub mod variables;

pub use expression::{evaluate, evaluate_term};
pub use interpreter::{execute, Command};
pub use line_editor::{LineState, Shell};
pub use variables::{NamedVariable, VarName, VariableStore};

/// Line buffer size in bytes; one slot stays unused
pub const LINE_CAPACITY: usize = 256;

/// Maximum number of variables
pub const MAX_VARIABLES: usize = 50;

/// Visible characters kept from a variable name
pub const MAX_NAME_LEN: usize = 15;

/// Longest command name that can match a built-in
pub const COMMAND_NAME_MAX: usize = 9;

const_assert!(LINE_CAPACITY > 1);
const_assert!(MAX_VARIABLES > 0);

pub const PROMPT: &str = "> ";
pub const BANNER: &str = "Welcome to OhneBS!\n";
pub const VERSION_TEXT: &str = "OhneBS v0.1.0-alpha\n";
pub const HELP_TEXT: &str = "Commands:\n - set <name> <value>\n - get <name>\n - print <expr>\n - version\n - help\n";

/// Shell error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("Maximum number of variables reached!")]
    StoreFull { capacity: usize },

    #[error("Invalid expression or variable not found.")]
    InvalidExpression,

    #[error("Variable '{name}' not found.")]
    UndefinedVariable { name: VarName },

    #[error("Usage: {usage}")]
    MissingArgument { usage: &'static str },
}

pub type Result<T> = core::result::Result<T, ShellError>;
