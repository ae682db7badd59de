//! Command-line interface
//!
//! A thin operations surface over the navigator: fetch a page, walk to
//! the last page, estimate counts, validate configuration. Rendering is
//! JSON lines or a plain text summary; anything fancier belongs to the
//! dashboard frontend.

mod commands;
mod runner;

pub use commands::{Cli, Commands, FilterArgs, OutputFormat};
pub use runner::Runner;
