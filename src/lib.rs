//! `replacer` is a library for bulk find-and-replace across a directory tree.
//!
//! It provides the core logic for the `replacer` command-line tool but can also
//! be used as a standalone library. The main components are:
//!
//! - `filters`: Pure predicates on file extensions and hidden names.
//! - `walker`: Deterministic directory traversal producing the list of files.
//! - `Replacer`: Applies an ordered `key -> replacement` mapping to each file,
//!   with support for dry runs.
//! - `OutputFormatter`: Writes the per-file report and summary to any writer.
//! - `config`: Run configuration and loading of the JSON mapping file.

pub mod cli;
pub mod config;
pub mod errors;
pub mod filters;
pub mod logging;
pub mod output_formatter;
pub mod patterns;
pub mod replacer;
pub mod walker;

// Re-export main types for easier access by library users.
pub use config::{ErrorPolicy, FilterConfig, RunConfig};
pub use errors::{Error, Result};
pub use output_formatter::{OutputFormatter, report_error};
pub use patterns::ReplacementMapping;
pub use replacer::{ReplacementResult, Replacer};
