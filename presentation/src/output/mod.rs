//! Output formatting for match reports

pub mod console;
pub mod formatter;
