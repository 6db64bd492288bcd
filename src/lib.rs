//! Command-line front end for the chat backend.
//!
//! Transport and stream decoding live in `chat_api`; this crate only parses
//! arguments, configures logging and prints what arrives.

pub mod cli;
pub mod logging;
pub mod printer;

pub use cli::{Cli, Command};
pub use printer::ReplyPrinter;
