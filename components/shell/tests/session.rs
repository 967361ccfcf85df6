//! End-to-end shell sessions over a simulated mini UART
//!
//! Keystrokes enter through the AUX receive register, pass through
//! `MiniUart` and `Console`, and the shell's replies are captured from the
//! transmit register.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use ohnebs_console::{Console, ConsoleConfig, NullRenderer, TextRenderer};
use ohnebs_drivers::mini_uart::{LineStatus, AUX_MU_BAUD_REG, AUX_MU_IO_REG, AUX_MU_LSR_REG};
use ohnebs_drivers::{MiniUart, UartConfig};
use ohnebs_hal::RegisterAccess;
use ohnebs_shell::{LineState, Shell, VariableStore, MAX_VARIABLES};

/// AUX block with a transmitter that is busy every `stall_every`-th status poll
#[derive(Default)]
struct Aux {
    cells: RefCell<BTreeMap<usize, u32>>,
    stall_every: usize,
    polls: Cell<usize>,
    rx: RefCell<VecDeque<u8>>,
    tx: RefCell<Vec<u8>>,
}

impl Aux {
    fn stalling(stall_every: usize) -> Self {
        Self {
            stall_every,
            ..Self::default()
        }
    }

    fn type_keys(&self, keys: &str) {
        self.rx.borrow_mut().extend(keys.bytes());
    }

    fn transcript(&self) -> String {
        String::from_utf8_lossy(&self.tx.borrow()).into_owned()
    }
}

impl RegisterAccess for Aux {
    fn read(&self, addr: usize) -> u32 {
        match addr {
            AUX_MU_LSR_REG => {
                let n = self.polls.get() + 1;
                self.polls.set(n);

                let mut status = LineStatus::empty();
                if !self.rx.borrow().is_empty() {
                    status |= LineStatus::DATA_READY;
                }
                if self.stall_every == 0 || n % self.stall_every != 0 {
                    status |= LineStatus::TX_READY;
                }
                status.bits()
            }
            AUX_MU_IO_REG => self.rx.borrow_mut().pop_front().map_or(0, u32::from),
            _ => self.cells.borrow().get(&addr).copied().unwrap_or(0),
        }
    }

    fn write(&self, addr: usize, value: u32) {
        match addr {
            AUX_MU_IO_REG => self.tx.borrow_mut().push(value as u8),
            _ => {
                self.cells.borrow_mut().insert(addr, value);
            }
        }
    }
}

/// Counts glyphs drawn so screen output can be compared with serial output
#[derive(Default)]
struct GlyphCounter {
    glyphs: usize,
    clears: usize,
}

impl TextRenderer for GlyphCounter {
    fn draw_char(&mut self, _c: u8, _x: u32, _y: u32, _color: u32) {
        self.glyphs += 1;
    }

    fn fill_rect(&mut self, _x: u32, _y: u32, _width: u32, _height: u32, _color: u32) {
        self.clears += 1;
    }
}

/// Poll until the receive queue is empty and a few idle polls have passed
fn settle<D: ohnebs_hal::CharDevice>(shell: &mut Shell<'_, D>) -> usize {
    let mut lines = 0;
    for _ in 0..100_000 {
        if shell.poll() == LineState::LineReady {
            lines += 1;
        }
    }
    lines
}

#[test]
fn test_boot_and_session() {
    let aux = Aux::default();
    let mut uart: MiniUart<&Aux, 64> = MiniUart::new(&aux, UartConfig::default());
    uart.init().unwrap();
    assert_eq!(aux.read(AUX_MU_BAUD_REG), 541);

    let console = Console::new(uart, NullRenderer, ConsoleConfig::default());
    let mut vars = VariableStore::new();
    let mut shell = Shell::new(console, &mut vars);
    shell.greet();

    aux.type_keys("set x 5\rprint x+10\rprint y\rbogus\rversion\r");
    assert_eq!(settle(&mut shell), 5);

    assert_eq!(
        aux.transcript(),
        "Welcome to OhneBS!\r\n\
         > set x 5\r\nOK.\r\n\
         > print x+10\r\n15\r\n\
         > print y\r\nError: Invalid expression or variable not found.\r\n\
         > bogus\r\nUnknown command: 'bogus'\r\n\
         > version\r\nOhneBS v0.1.0-alpha\r\n\
         > "
    );
}

#[test]
fn test_stalled_transmitter_keeps_order() {
    let aux = Aux::stalling(3);
    let uart: MiniUart<&Aux, 16> = MiniUart::new(&aux, UartConfig::default());
    let console = Console::new(uart, NullRenderer, ConsoleConfig::default());
    let mut vars = VariableStore::new();
    let mut shell = Shell::new(console, &mut vars);

    aux.type_keys("help\r");
    settle(&mut shell);

    let expected = "help\r\n\
                    Commands:\r\n - set <name> <value>\r\n - get <name>\r\n - print <expr>\r\n - version\r\n - help\r\n\
                    > ";
    assert_eq!(aux.transcript(), expected);
    assert_eq!(shell.io().serial().pending(), 0);
}

#[test]
fn test_editing_on_the_wire_and_screen() {
    let aux = Aux::default();
    let uart: MiniUart<&Aux, 64> = MiniUart::new(&aux, UartConfig::default());
    let mut glyphs = GlyphCounter::default();
    let console = Console::new(uart, &mut glyphs, ConsoleConfig::default());
    let mut vars = VariableStore::new();

    {
        let mut shell = Shell::new(console, &mut vars);
        aux.type_keys("sex\x7ft n 2\rget n\r");
        assert_eq!(settle(&mut shell), 2);
        assert_eq!(shell.variables().get("n"), Some(2));
    }

    assert_eq!(
        aux.transcript(),
        "sex\x08 \x08t n 2\r\nOK.\r\n> get n\r\n2\r\n> "
    );
    // Every printable byte on the wire was also drawn
    let printable = aux.transcript().bytes().filter(|b| (b' '..=b'~').contains(b)).count();
    assert_eq!(glyphs.glyphs, printable);
    // Erasing one character blanks the cell twice: back over it, then back over the space
    assert_eq!(glyphs.clears, 2);
}

#[test]
fn test_store_limit_over_serial() {
    let aux = Aux::default();
    let uart: MiniUart<&Aux, 256> = MiniUart::new(&aux, UartConfig::default());
    let console = Console::new(uart, NullRenderer, ConsoleConfig::default());
    let mut vars = VariableStore::new();
    let mut shell = Shell::new(console, &mut vars);

    for i in 0..=MAX_VARIABLES {
        aux.type_keys(&format!("set v{} {}\r", i, i));
    }
    aux.type_keys("print v49+v0\r");
    settle(&mut shell);

    let transcript = aux.transcript();
    assert_eq!(transcript.matches("OK.\r\n").count(), MAX_VARIABLES);
    assert!(transcript.contains("> set v50 50\r\nError: Maximum number of variables reached!\r\n"));
    assert!(transcript.ends_with("> print v49+v0\r\n49\r\n> "));
    assert_eq!(shell.variables().len(), MAX_VARIABLES);
}
