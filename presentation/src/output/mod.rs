//! Output formatting

pub mod console;
pub mod report;

pub use console::ConsoleFormatter;
pub use report::ConsoleReportRenderer;
