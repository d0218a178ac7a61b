use crate::command::{
    CommandSpec, EXIT_COMMAND_NOT_FOUND, EXIT_IO_ERROR, ExitCode, Outcome, SpawnError, Spawner,
};
use nix::fcntl::{OFlag, open};
use nix::libc;
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, close, dup2, execvp, fork};
use std::ffi::{CStr, CString};
use std::os::fd::RawFd;

/// Spawner that runs commands as real child processes.
///
/// The child is created with `fork`, rewires its standard streams with
/// `dup2` and replaces itself with `execvp`, which searches `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSpawner;

impl ProcessSpawner {
    pub fn new() -> Self {
        ProcessSpawner
    }
}

impl Spawner for ProcessSpawner {
    fn spawn(&mut self, command: &CommandSpec<'_>) -> Result<Outcome, SpawnError> {
        // Everything the child needs is allocated before forking.
        let image = ChildImage::new(command)?;

        // SAFETY: the child only opens files, duplicates descriptors, writes
        // to stdout and then either execs or calls `_exit`.
        match unsafe { fork() }.map_err(SpawnError::Fork)? {
            ForkResult::Child => image.exec(),
            ForkResult::Parent { child } => {
                if command.background {
                    return Ok(Outcome::Detached(child));
                }
                let status = waitpid(child, None).map_err(SpawnError::Wait)?;
                Ok(Outcome::Exited(exit_code(status)))
            }
        }
    }
}

struct ChildImage {
    argv: Vec<CString>,
    input: Option<CString>,
    output: Option<CString>,
}

impl ChildImage {
    fn new(command: &CommandSpec<'_>) -> Result<Self, SpawnError> {
        let argv = command
            .argv
            .iter()
            .map(|arg| c_string(arg))
            .collect::<Result<Vec<_>, _>>()?;
        if argv.is_empty() {
            return Err(SpawnError::InvalidArgument(String::new()));
        }
        Ok(ChildImage {
            argv,
            input: command.redirection.input.map(c_string).transpose()?,
            output: command.redirection.output.map(c_string).transpose()?,
        })
    }

    /// Runs in the forked child and never returns to the shell loop.
    fn exec(self) -> ! {
        // The Rust runtime ignores SIGPIPE and an ignored disposition survives
        // exec, so the command would get EPIPE instead of being killed.
        // SAFETY: resetting to the default action installs no handler.
        let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };

        if let Some(path) = &self.input {
            if redirect(path, OFlag::O_RDONLY, libc::STDIN_FILENO).is_err() {
                fail(b"I/O error\n", EXIT_IO_ERROR);
            }
        }
        if let Some(path) = &self.output {
            let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC;
            if redirect(path, flags, libc::STDOUT_FILENO).is_err() {
                fail(b"I/O error\n", EXIT_IO_ERROR);
            }
        }

        let _ = execvp(&self.argv[0], &self.argv);
        fail(b"Command not found\n", EXIT_COMMAND_NOT_FOUND)
    }
}

fn c_string(arg: &str) -> Result<CString, SpawnError> {
    CString::new(arg).map_err(|_| SpawnError::InvalidArgument(arg.to_string()))
}

/// Opens `path` and moves the descriptor onto `target`.
fn redirect(path: &CStr, flags: OFlag, target: RawFd) -> nix::Result<()> {
    let fd = open(path, flags, Mode::from_bits_truncate(0o644))?;
    if fd == target {
        return Ok(());
    }
    let result = dup2(fd, target).map(drop);
    let _ = close(fd);
    result
}

/// Reports a failure on the child's stdout and terminates the child.
///
/// `_exit` skips the buffers inherited from the shell so nothing is printed
/// twice.
fn fail(message: &[u8], code: ExitCode) -> ! {
    // SAFETY: `message` is a valid buffer of `message.len()` bytes, and
    // `_exit` does not touch any state shared with the parent.
    unsafe {
        libc::write(libc::STDOUT_FILENO, message.as_ptr().cast(), message.len());
        libc::_exit(code)
    }
}

/// Converts a wait status into a shell-style exit code.
fn exit_code(status: WaitStatus) -> ExitCode {
    match status {
        WaitStatus::Exited(_, code) => code,
        WaitStatus::Signaled(_, sig, _) => 128 + sig as i32,
        _ => -1,
    }
}
