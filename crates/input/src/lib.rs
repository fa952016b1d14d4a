//! Command intake: the discrete commands a front end forwards into a session.
//!
//! # Invariants
//! - Front ends produce `Command`s, never raw key events; the session consumes only commands.

pub mod command;

pub use command::{Command, InputError, parse_script};

pub fn crate_info() -> &'static str {
    "stockroom-input v0.1.0"
}
