//! A minimal interactive command shell.
//!
//! Each line read from standard input is split into words and the
//! redirection operators `<` and `>`, parsed into an argument vector plus at
//! most one input and one output file, and run in a child process. A trailing
//! `&` runs the command in the background; foreground commands are timed.
//!
//! The main entry point is [`Shell`]. Process creation sits behind the
//! [`command::Spawner`] trait so the loop can be driven without touching the
//! process table, and lines come from any [`io_adapters::LineSource`].

pub mod builtin;
pub mod command;
pub mod config;
pub mod external;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod parser;

pub use config::{Config, Options};
/// Just a convenient re-export of the command loop.
///
/// See [`Shell`] for the high-level API.
pub use interpreter::Shell;
