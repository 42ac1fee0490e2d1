//! Terminal output
//!
//! `logger` prints the coloured status lines every command uses; `format`
//! holds the small formatting helpers shared by the listing commands.

pub mod format;
pub mod logger;

pub use format::{format_local, format_size_kb, format_time_ago};
