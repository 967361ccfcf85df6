//! Named integer variables
//!
//! A fixed table of up to [`MAX_VARIABLES`] `(name, value)` pairs. Lookups
//! are a linear scan; there is no eviction, so once the table is full new
//! names are refused while existing ones can still be overwritten.
//!
//! Names are truncated to [`MAX_NAME_LEN`] characters on every entry point,
//! so `set` and lookups agree on which variable a long name refers to.

use heapless::{String, Vec};

use crate::{Result, ShellError, MAX_NAME_LEN, MAX_VARIABLES};

/// Variable name, truncated to [`MAX_NAME_LEN`] bytes
pub type VarName = String<MAX_NAME_LEN>;

/// Build a [`VarName`], dropping whatever does not fit
pub fn var_name(text: &str) -> VarName {
    let mut name = VarName::new();
    for c in text.chars() {
        if name.push(c).is_err() {
            break;
        }
    }
    name
}

/// One stored variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedVariable {
    name: VarName,
    value: i32,
}

impl NamedVariable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

/// Fixed-capacity variable table
#[derive(Debug, Default)]
pub struct VariableStore {
    entries: Vec<NamedVariable, MAX_VARIABLES>,
}

impl VariableStore {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Find a variable by (truncated) name
    pub fn find(&self, name: &str) -> Option<&NamedVariable> {
        let key = var_name(name);
        self.entries.iter().find(|v| v.name == key)
    }

    /// Store `value` under `name`, overwriting an existing entry in place
    ///
    /// A new name is appended if there is room; otherwise the request is
    /// dropped and [`ShellError::StoreFull`] returned, leaving every existing
    /// variable untouched.
    pub fn set(&mut self, name: &str, value: i32) -> Result<()> {
        let key = var_name(name);

        if let Some(existing) = self.entries.iter_mut().find(|v| v.name == key) {
            existing.value = value;
            return Ok(());
        }

        self.entries
            .push(NamedVariable { name: key, value })
            .map_err(|rejected| {
                log::warn!("variable '{}' dropped, store full", rejected.name);
                ShellError::StoreFull {
                    capacity: MAX_VARIABLES,
                }
            })
    }

    /// Value of `name`, or `None` when it was never set
    pub fn get(&self, name: &str) -> Option<i32> {
        self.find(name).map(NamedVariable::value)
    }

    /// Value of `name`, with 0 standing in for an undefined variable
    pub fn get_or_zero(&self, name: &str) -> (i32, bool) {
        match self.get(name) {
            Some(value) => (value, true),
            None => (0, false),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        MAX_VARIABLES
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedVariable> {
        self.entries.iter()
    }
}
