use crate::lexer::DEFAULT_MAX_TOKENS;
use crate::parser::DEFAULT_MAX_ARGS;
use argh::FromArgs;

pub const DEFAULT_PROMPT: &str = "vtsh> ";

#[derive(FromArgs, Debug)]
/// A minimal interactive command shell with I/O redirection and timing.
pub struct Options {
    #[argh(option, default = "String::from(DEFAULT_PROMPT)")]
    /// prompt shown before each line read from a terminal
    pub prompt: String,

    #[argh(option, default = "DEFAULT_MAX_TOKENS")]
    /// maximum number of tokens kept from one line; the rest are dropped
    pub max_tokens: usize,

    #[argh(option, default = "DEFAULT_MAX_ARGS")]
    /// maximum number of words in a command's argument list
    pub max_args: usize,

    #[argh(switch, short = 'v')]
    /// trace every line, its tokens and the parsed command to stderr
    pub verbose: bool,

    #[argh(switch)]
    /// do not keep a history of lines typed at the terminal
    pub no_history: bool,
}

/// Settings of a [`Shell`](crate::Shell) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub max_tokens: usize,
    pub max_args: usize,
    pub verbose: bool,
    pub history: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_args: DEFAULT_MAX_ARGS,
            verbose: false,
            history: true,
        }
    }
}

impl From<Options> for Config {
    fn from(options: Options) -> Self {
        Self {
            prompt: options.prompt,
            max_tokens: options.max_tokens,
            max_args: options.max_args,
            verbose: options.verbose,
            history: !options.no_history,
        }
    }
}
