use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::io::{self, ErrorKind, Read, Result as IoResult, Write};
use std::rc::Rc;

/// Source of command lines for the shell loop.
pub trait LineSource {
    /// Reads one line without its line terminator.
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_line(&mut self, prompt: &str) -> IoResult<Option<String>>;

    /// Whether lines come from a terminal the user is typing at.
    fn is_interactive(&self) -> bool;
}

/// Line source for a terminal, backed by a `rustyline` editor.
///
/// The editor prints the prompt itself. Ctrl-C and Ctrl-D both end the input.
pub struct EditorInput {
    editor: DefaultEditor,
    history: bool,
}

impl EditorInput {
    pub fn new(history: bool) -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            history,
        })
    }
}

impl LineSource for EditorInput {
    fn read_line(&mut self, prompt: &str) -> IoResult<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if self.history && !is_blank(&line) {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(trim_newline(line)))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(ReadlineError::Io(err)) => Err(err),
            Err(err) => Err(io::Error::other(err.to_string())),
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Line source for piped or redirected input. No prompt is printed.
///
/// The reader is consumed one byte at a time and never past the end of the
/// current line, so a child sharing the descriptor reads the lines that
/// follow. Do not hand it a buffered reader such as `io::stdin()`.
pub struct PipedInput<R> {
    reader: R,
}

impl<R: Read> PipedInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> LineSource for PipedInput<R> {
    fn read_line(&mut self, _prompt: &str) -> IoResult<Option<String>> {
        let mut buf = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    buf.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        if buf.is_empty() {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf).into_owned();
        Ok(Some(trim_newline(line)))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Strips every trailing `\n` and `\r`.
pub fn trim_newline(mut line: String) -> String {
    while line.ends_with(&['\n', '\r'][..]) {
        line.pop();
    }
    line
}

/// Empty, or made of spaces and tabs only.
pub fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

/// Writer that appends to a shared buffer, so output handed to a [`Shell`]
/// as a boxed writer can still be inspected afterwards.
///
/// [`Shell`]: crate::Shell
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Returns the writer and a handle onto the bytes it collects.
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let buf = Rc::new(RefCell::new(Vec::new()));
        (Self { buf: buf.clone() }, buf)
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
