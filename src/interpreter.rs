use crate::builtin::{self, Builtin};
use crate::command::{CommandSpec, Outcome, SpawnError, Spawner};
use crate::config::Config;
use crate::external::ProcessSpawner;
use crate::io_adapters::{LineSource, is_blank};
use crate::lexer::{self, Token};
use crate::parser::{self, ParsedCommand};
use anyhow::Result;
use std::fmt;
use std::io::{self, Write};
use std::time::Instant;

/// What the loop does after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Terminate,
}

/// A minimal shell that reads lines, parses redirections and runs each
/// command in a child process.
///
/// Command output goes wherever the child's streams point. The shell's own
/// messages go to `stdout` (syntax errors) and `stderr` (timing, background
/// notices, OS errors). Both are flushed after each message and before every
/// process creation.
pub struct Shell {
    config: Config,
    spawner: Box<dyn Spawner>,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl Shell {
    pub fn new(
        config: Config,
        spawner: Box<dyn Spawner>,
        stdout: Box<dyn Write>,
        stderr: Box<dyn Write>,
    ) -> Self {
        Self {
            config,
            spawner,
            stdout,
            stderr,
        }
    }

    /// Shell wired to real processes and the process's standard streams.
    pub fn with_std_streams(config: Config) -> Self {
        Self::new(
            config,
            Box::new(ProcessSpawner::new()),
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        )
    }

    /// Runs the read-parse-execute loop until the session ends.
    ///
    /// End of input, a read failure, `exit`, `quit` and the piped `cat`
    /// passthrough end the session normally. Running out of memory while
    /// tokenizing ends it with an error. Failing to write the shell's own
    /// messages never does.
    pub fn run(&mut self, input: &mut dyn LineSource) -> Result<()> {
        loop {
            let line = match input.read_line(&self.config.prompt) {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    self.diag(format_args!("read failed: {err}"));
                    break;
                }
            };
            if self.execute_line(&line, input)? == Step::Terminate {
                break;
            }
        }
        Ok(())
    }

    fn execute_line(&mut self, line: &str, input: &mut dyn LineSource) -> Result<Step> {
        if is_blank(line) {
            return Ok(Step::Continue);
        }
        self.trace(format_args!("line: {}", HexBytes(line.as_bytes())));

        let tokens = lexer::split_into_tokens(line, self.config.max_tokens)?;
        if tokens.is_empty() {
            return Ok(Step::Continue);
        }
        self.trace(format_args!("tokens: {}", TokenList(&tokens)));

        let ParsedCommand {
            mut argv,
            redirection,
        } = match parser::parse_command(&tokens, self.config.max_args) {
            Ok(command) => command,
            Err(err) => {
                self.trace(format_args!("{err}"));
                let _ = writeln!(self.stdout, "Syntax error");
                let _ = self.stdout.flush();
                return Ok(Step::Continue);
            }
        };
        let Some(&name) = argv.first() else {
            return Ok(Step::Continue);
        };
        if Builtin::lookup(name).is_some() {
            return Ok(Step::Terminate);
        }

        let background = argv.last() == Some(&"&");
        if background {
            argv.pop();
            if argv.is_empty() {
                return Ok(Step::Continue);
            }
        }

        if !background && !input.is_interactive() && argv == ["cat"] && redirection.is_empty() {
            self.trace(format_args!("copying remaining input"));
            builtin::echo_remaining(input, &mut self.stdout)?;
            return Ok(Step::Terminate);
        }

        let command = CommandSpec {
            argv,
            redirection,
            background,
        };
        self.trace(format_args!(
            "argv: {:?}, input: {:?}, output: {:?}, background: {}",
            command.argv, command.redirection.input, command.redirection.output, background
        ));
        self.dispatch(&command);
        Ok(Step::Continue)
    }

    fn dispatch(&mut self, command: &CommandSpec<'_>) {
        let _ = self.stdout.flush();
        let _ = self.stderr.flush();

        let started = (!command.background).then(Instant::now);
        match self.spawner.spawn(command) {
            Ok(Outcome::Detached(pid)) => self.diag(format_args!("[{pid}]")),
            Ok(Outcome::Exited(code)) => {
                self.trace(format_args!("exit status: {code}"));
                self.report_time(started);
            }
            Err(err @ SpawnError::Wait(_)) => {
                self.diag(format_args!("{err}"));
                self.report_time(started);
            }
            Err(err) => self.diag(format_args!("{err}")),
        }
    }

    fn report_time(&mut self, started: Option<Instant>) {
        if let Some(started) = started {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            self.diag(format_args!("[time] {elapsed_ms:.2} ms"));
        }
    }

    /// Writes a line to the diagnostic stream. Write errors are dropped.
    fn diag(&mut self, message: fmt::Arguments<'_>) {
        let _ = writeln!(self.stderr, "{message}");
        let _ = self.stderr.flush();
    }

    fn trace(&mut self, message: fmt::Arguments<'_>) {
        if self.config.verbose {
            self.diag(format_args!("vtsh: {message}"));
        }
    }
}

struct HexBytes<'a>(&'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

struct TokenList<'a>(&'a [Token]);

impl fmt::Display for TokenList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(Token::as_str))
            .finish()
    }
}
