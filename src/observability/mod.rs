//! Structured logging to a rotating file.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → <data dir>/marquee.log
//! ```
//!
//! # Features
//!
//! - **File Output**: logs are written to `marquee.log` in the data directory,
//!   keeping stdout free for the CLI
//! - **Automatic Rotation**: files rotate at 10MB with 3-backup retention
//! - **Span Context**: each line carries the enclosing spans (`search`,
//!   `bootstrap`, ...) and their fields
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - [`file_writer`]: rotating file writer

pub mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
