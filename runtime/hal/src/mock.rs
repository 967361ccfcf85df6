//! In-memory register file
//!
//! Stands in for MMIO when running off-target. Registers that were never
//! written read back as zero. Capacity is fixed so the mock stays usable in
//! `no_std` test harnesses.

use core::cell::RefCell;
use heapless::LinearMap;

use crate::mmio::RegisterAccess;

/// Register file backed by a fixed-capacity address map
pub struct MockRegisters<const N: usize = 64> {
    cells: RefCell<LinearMap<usize, u32, N>>,
}

impl<const N: usize> MockRegisters<N> {
    pub const fn new() -> Self {
        Self {
            cells: RefCell::new(LinearMap::new()),
        }
    }

    /// Number of distinct registers that have been written
    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.borrow().is_empty()
    }

    /// Whether `addr` has ever been written
    pub fn contains(&self, addr: usize) -> bool {
        self.cells.borrow().contains_key(&addr)
    }
}

impl<const N: usize> Default for MockRegisters<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RegisterAccess for MockRegisters<N> {
    fn read(&self, addr: usize) -> u32 {
        self.cells.borrow().get(&addr).copied().unwrap_or(0)
    }

    fn write(&self, addr: usize, value: u32) {
        log::trace!("write {:#x} <- {:#010x}", addr, value);
        if self.cells.borrow_mut().insert(addr, value).is_err() {
            panic!("mock register file full ({} registers)", N);
        }
    }
}
