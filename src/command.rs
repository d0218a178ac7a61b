use nix::errno::Errno;
use nix::unistd::Pid;
use thiserror::Error;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Status a child exits with when its command cannot be executed.
pub const EXIT_COMMAND_NOT_FOUND: ExitCode = 127;

/// Status a child exits with when a redirection cannot be set up.
pub const EXIT_IO_ERROR: ExitCode = 1;

/// Files a command's standard streams are redirected to.
///
/// Both names borrow from the tokens of the line being executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redirection<'a> {
    /// File opened read-only as standard input (`< file`).
    pub input: Option<&'a str>,
    /// File created or truncated as standard output (`> file`).
    pub output: Option<&'a str>,
}

impl Redirection<'_> {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }
}

/// A fully parsed command ready to be handed to a [`Spawner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec<'a> {
    /// Command name followed by its arguments. Never empty.
    pub argv: Vec<&'a str>,
    pub redirection: Redirection<'a>,
    /// When set, the spawner returns as soon as the child exists.
    pub background: bool,
}

/// What happened to a spawned command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The child was waited for and terminated with this status.
    Exited(ExitCode),
    /// The child was left running in the background and is never reaped.
    Detached(Pid),
}

/// Failures of the parent side of process creation.
///
/// Failures inside the child (redirections, exec) never show up here: the
/// child reports them itself and exits with a dedicated status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpawnError {
    #[error("fork failed: {}", .0.desc())]
    Fork(Errno),
    #[error("waitpid failed: {}", .0.desc())]
    Wait(Errno),
    /// A word contains a NUL byte and cannot be passed to the OS.
    #[error("invalid argument: {0:?}")]
    InvalidArgument(String),
}

/// Capability to run a command in a child process with its redirections
/// applied, then either wait for it or detach from it.
///
/// The execution loop only talks to this trait, so it can be driven by a fake
/// implementation that never creates processes.
pub trait Spawner {
    fn spawn(&mut self, command: &CommandSpec<'_>) -> Result<Outcome, SpawnError>;
}
