use anyhow::Context;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::os::fd::AsFd;
use vtsh::io_adapters::{EditorInput, PipedInput};
use vtsh::{Config, Options, Shell};

fn main() -> anyhow::Result<()> {
    let options: Options = argh::from_env();
    let config = Config::from(options);
    let mut shell = Shell::with_std_streams(config.clone());

    if io::stdin().is_terminal() {
        let mut input = EditorInput::new(config.history)
            .map_err(|err| anyhow::anyhow!("cannot start line editor: {err}"))?;
        shell.run(&mut input)
    } else {
        // `io::stdin()` is buffered; read the descriptor directly so the rest
        // of the stream stays available to the commands being run.
        let stdin = io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .context("cannot duplicate standard input")?;
        let mut input = PipedInput::new(File::from(stdin));
        shell.run(&mut input)
    }
}
