//! Kernel configuration and component composition
//!
//! Everything is chosen at compile time from cargo features:
//! - `log-error` .. `log-trace`: maximum log level
//! - `render-null`: text renderer behind the console

use log::LevelFilter;
use ohnebs_console::ConsoleConfig;
use ohnebs_drivers::UartConfig;

/// Serial line: 115200 8N1 on GPIO 14/15
pub const UART: UartConfig = UartConfig::DEFAULT;

/// Framebuffer text geometry
pub const CONSOLE: ConsoleConfig = ConsoleConfig::DEFAULT;

/// Most verbose level enabled by features
pub const LOG_LEVEL: LevelFilter = if cfg!(feature = "log-trace") {
    LevelFilter::Trace
} else if cfg!(feature = "log-debug") {
    LevelFilter::Debug
} else if cfg!(feature = "log-info") {
    LevelFilter::Info
} else if cfg!(feature = "log-warn") {
    LevelFilter::Warn
} else if cfg!(feature = "log-error") {
    LevelFilter::Error
} else {
    LevelFilter::Off
};

#[cfg(feature = "render-null")]
pub type Renderer = ohnebs_console::NullRenderer;

#[cfg(not(feature = "render-null"))]
compile_error!("select a text renderer feature (render-null)");

/// Build the configured renderer
#[cfg(feature = "render-null")]
pub fn renderer() -> Renderer {
    ohnebs_console::NullRenderer
}
