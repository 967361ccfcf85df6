//! Interactive line editing
//!
//! The shell consumes at most one input byte per [`Shell::poll`]:
//!
//! | byte                  | effect                                          |
//! |-----------------------|-------------------------------------------------|
//! | none                  | nothing                                         |
//! | `\r`                  | newline, run the line if non-empty, new prompt  |
//! | 0x08 / 0x7F           | drop the last character, erase it on screen     |
//! | `' '..='~'`           | append and echo while the buffer has room       |
//! | anything else         | ignored                                         |

use heapless::String;
use ohnebs_hal::CharDevice;

use crate::interpreter::execute;
use crate::variables::VariableStore;
use crate::{BANNER, LINE_CAPACITY, PROMPT};

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Outcome of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Still collecting characters
    AwaitingInput,
    /// A line was completed and handled during this poll
    LineReady,
}

/// Line editor bound to a terminal and a variable store
pub struct Shell<'v, D> {
    io: D,
    line: String<LINE_CAPACITY>,
    vars: &'v mut VariableStore,
}

impl<'v, D: CharDevice> Shell<'v, D> {
    pub fn new(io: D, vars: &'v mut VariableStore) -> Self {
        Self {
            io,
            line: String::new(),
            vars,
        }
    }

    /// Print the welcome banner and the first prompt
    pub fn greet(&mut self) {
        self.io.write_text(BANNER);
        self.io.write_text(PROMPT);
    }

    /// Text typed so far on the current line
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn variables(&self) -> &VariableStore {
        &*self.vars
    }

    pub fn io(&mut self) -> &mut D {
        &mut self.io
    }

    /// Handle at most one pending input byte
    pub fn poll(&mut self) -> LineState {
        let Some(byte) = self.io.read_byte() else {
            return LineState::AwaitingInput;
        };

        match byte {
            b'\r' => {
                self.submit();
                return LineState::LineReady;
            }
            BACKSPACE | DELETE => {
                if self.line.pop().is_some() {
                    self.io.write_text("\x08 \x08");
                }
            }
            b' '..=b'~' if self.line.len() < LINE_CAPACITY - 1 => {
                if self.line.push(byte as char).is_ok() {
                    self.io.write_byte(byte);
                }
            }
            _ => {}
        }

        LineState::AwaitingInput
    }

    /// Poll forever
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    fn submit(&mut self) {
        self.io.write_text("\n");

        if !self.line.is_empty() {
            execute(&self.line, self.vars, &mut self.io);
        }

        self.line.clear();
        self.io.write_text(PROMPT);
    }
}
