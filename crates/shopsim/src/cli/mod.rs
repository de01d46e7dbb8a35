//! # CLI Behavior
//!
//! This is **one possible UI client** for shopsim, not the application itself.
//!
//! Every invocation follows the same lifecycle:
//!
//! 1. Parse arguments and install logging (`-v` raises the level, `RUST_LOG`
//!    overrides it).
//! 2. Resolve the data directory and build the context.
//! 3. Load every registered collection.
//! 4. Run the command and print its result as JSON on stdout.
//! 5. After `add` or `remove`, flush every collection back to disk. Other
//!    commands leave the files alone.
//!
//! Errors go to stderr and exit with status 1.

pub mod commands;
pub mod handlers;
pub mod logging;
pub mod setup;

pub use commands::run;
