use crate::evaluator::Error;
use crate::Interpreter;
use ansi_term::Colour::Red;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fmt;
use std::fs::read_to_string;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CmdlineError {
    IOError(std::io::Error),
    TooManyArguments(usize),
}

impl fmt::Display for CmdlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmdlineError::IOError(e) => write!(f, "io error: {}", e),
            CmdlineError::TooManyArguments(n) => {
                write!(f, "expected at most one source file, got {}", n)
            }
        }
    }
}

impl std::error::Error for CmdlineError {}

impl From<std::io::Error> for CmdlineError {
    fn from(e: std::io::Error) -> Self {
        CmdlineError::IOError(e)
    }
}

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("scheme")?;
    interface.set_prompt("scheme> ")?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".scheme_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

/// Render an error as `KIND: message`, in red when stdout is a terminal.
pub fn describe_error(e: &Error) -> String {
    let text = format!("{}: {}", e.kind(), e);
    match atty::is(atty::Stream::Stdout) {
        true => Red.paint(text).to_string(),
        false => text,
    }
}

/// Run one line through the interpreter. Blank lines produce no output.
fn rep(line: &str, interpreter: &Interpreter) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    let output = match interpreter.run(line) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("{:?}", e);
            describe_error(&e)
        }
    };
    Some(output)
}

pub fn repl<T: Terminal>(interface: &Interface<T>, interpreter: &Interpreter) {
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                interface.add_history_unique(line.clone());
                if let Some(output) = rep(&line, interpreter) {
                    writeln!(interface, "{}", output).ok();
                }
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}

/// Evaluate each line of the file at `path` in order, printing each result.
pub fn run_file(path: &str, interpreter: &Interpreter) -> Result<(), CmdlineError> {
    let source = read_to_string(path)?;
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    for line in source.lines() {
        if let Some(output) = rep(line, interpreter) {
            writeln!(stdout, "{}", output)?;
        }
    }
    Ok(())
}

/// With no arguments, start a REPL; with one, run that file.
pub fn launch(args: Vec<String>, interpreter: &Interpreter) -> Result<(), CmdlineError> {
    match args.len() {
        0 | 1 => {
            let interface = setup()?;
            repl(&interface, interpreter);
            save_history(&interface)?;
            Ok(())
        }
        2 => run_file(&args[1], interpreter),
        n => Err(CmdlineError::TooManyArguments(n - 1)),
    }
}
