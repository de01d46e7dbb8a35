//! # Shopsim CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/shopsim/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring, load/flush lifecycle (commands.rs)       │
//! │  - One handler per command, JSON output (handlers.rs)       │
//! │  - tracing subscriber installation (logging.rs)             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Services (crates/shopsimapp/src/service/)                  │
//! │  - Validation + typed CRUD per record kind                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  RecordStore (crates/shopsimapp/src/store/)                 │
//! │  - Flat files under the data directory                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything below the CLI layer is UI agnostic. The CLI owns argument
//! parsing, logging setup, stdout/stderr and exit codes.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests against the in-memory backend, integration tests
//!   over temp directories.
//! - **CLI**: `tests/` drives the real binary with `assert_cmd` against a temp
//!   data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
