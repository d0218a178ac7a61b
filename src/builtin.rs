use crate::io_adapters::LineSource;
use std::io::{self, Write};

/// Commands handled by the shell itself without spawning a process.
///
/// Names are matched exactly and case-sensitively against the first word;
/// any further words are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Quit,
}

impl Builtin {
    const ALL: [Builtin; 2] = [Builtin::Exit, Builtin::Quit];

    /// Canonical name of the command.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Quit => "quit",
        }
    }

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }
}

/// Copies every remaining line of `input` to `output`, one line per line.
///
/// This is what a bare `cat` amounts to when the shell reads piped input, so
/// the shell does it in-process instead of forking.
pub fn echo_remaining(input: &mut dyn LineSource, output: &mut dyn Write) -> io::Result<()> {
    while let Some(line) = input.read_line("")? {
        writeln!(output, "{line}")?;
    }
    output.flush()
}
