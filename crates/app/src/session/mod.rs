//! Session scripts: a line-oriented way to drive a file system manager
//! from the command line.
//!
//! A script is parsed up front ([`parse_script`]) and then executed one
//! command at a time by a [`Session`], which turns each command into an
//! [`Event`] describing the resulting state change.

mod runner;
mod script;
mod upload;

pub use runner::{Event, Session, SessionError};
pub use script::{parse_script, ScriptError};
