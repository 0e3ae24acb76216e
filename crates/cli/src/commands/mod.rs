//! Command implementations.
//!
//! Each command returns the process exit code on completion. Errors that abort a
//! command are returned as `Err` and mapped to an exit code by `main`.

mod connection;
mod helpers;
mod query;
mod values;

pub use connection::test_connection;
pub use query::{batch, query};
pub use values::values;
