use crate::environment::Environment;
use crate::interpreter::{self, Evaluation};
use ansi_term::Colour::Red;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::path::{Path, PathBuf};
use std::{fmt, fs, io};

const PROMPT: &str = "lisp> ";
const CONTINUATION_PROMPT: &str = "....> ";

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Run(interpreter::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Run(e) => write!(f, "{}", e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<interpreter::Error> for Error {
    fn from(e: interpreter::Error) -> Self {
        Self::Run(e)
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Options {
    /// Print an environment snapshot after every statement.
    pub debug: bool,
    /// Program to run. Without one we start a REPL.
    pub file: Option<PathBuf>,
}

impl Options {
    /// `args` includes the program name, as from `std::env::args`.
    pub fn from_args(args: Vec<String>) -> Self {
        let mut options = Options::default();
        for arg in args.into_iter().skip(1) {
            if arg == "-d" || arg == "--debug" {
                options.debug = true;
            } else if options.file.is_none() {
                options.file = Some(PathBuf::from(arg));
            } else {
                log::warn!("ignoring extra argument {}", arg);
            }
        }
        options
    }
}

pub fn launch(args: Vec<String>) -> Result<(), Error> {
    let options = Options::from_args(args);
    log::debug!("launching with {:?}", options);
    let mut env = Environment::new();
    match &options.file {
        Some(path) => run_file(path, &mut env, options.debug),
        None => {
            let interface = setup()?;
            repl(&interface, &mut env, options.debug);
            save_history(&interface)?;
            Ok(())
        }
    }
}

fn run_file(path: &Path, env: &mut Environment, debug: bool) -> Result<(), Error> {
    let source = fs::read_to_string(path)?;
    for evaluation in interpreter::run(&source, env, debug)? {
        println!("{}", describe(&evaluation));
    }
    Ok(())
}

/// `source => value`, plus the environment snapshot if there is one.
pub fn describe(evaluation: &Evaluation) -> String {
    let outcome = match &evaluation.value {
        Ok(value) => value.to_string(),
        Err(e) => paint_error(&format!("error: {}", e)),
    };
    match &evaluation.env {
        Some(env) => format!("{} => {}\n  env: {}", evaluation.statement.source, outcome, env),
        None => format!("{} => {}", evaluation.statement.source, outcome),
    }
}

fn paint_error(text: &str) -> String {
    match atty::is(atty::Stream::Stdout) {
        true => Red.paint(text).to_string(),
        false => String::from(text),
    }
}

pub fn setup() -> io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("tiny_lisp")?;
    interface.set_prompt(PROMPT)?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".tiny_lisp_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

/// Read lines until EOF, running each complete program against `env`.
/// Input with unclosed brackets is held back until a later line closes them.
pub fn repl<T: Terminal>(interface: &Interface<T>, env: &mut Environment, debug: bool) {
    let mut pending = String::new();
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                interface.add_history_unique(line.clone());
                pending.push_str(&line);
                pending.push('\n');
                match interpreter::run(&pending, env, debug) {
                    Err(interpreter::Error::Structural(e)) if e.unclosed > 0 => {
                        interface.set_prompt(CONTINUATION_PROMPT).ok();
                        continue;
                    }
                    Err(e) => {
                        writeln!(interface, "{}", paint_error(&e.to_string())).ok();
                    }
                    Ok(evaluations) => {
                        for evaluation in &evaluations {
                            writeln!(interface, "{}", describe(evaluation)).ok();
                        }
                    }
                }
                pending.clear();
                interface.set_prompt(PROMPT).ok();
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Statement;
    use crate::tokens::Token;
    use crate::types::Value;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn no_arguments_means_repl() {
        assert_eq!(Options::from_args(args(&["tiny_lisp"])), Options::default());
    }

    #[test]
    fn debug_flag_and_file() {
        let options = Options::from_args(args(&["tiny_lisp", "--debug", "prog.lisp"]));
        assert!(options.debug);
        assert_eq!(options.file, Some(PathBuf::from("prog.lisp")));

        let options = Options::from_args(args(&["tiny_lisp", "prog.lisp", "-d"]));
        assert!(options.debug);
    }

    #[test]
    fn describe_shows_source_and_value() {
        let evaluation = Evaluation {
            statement: Statement {
                source: String::from("(list 2 3)"),
                root: Token::List(vec![]),
            },
            value: Ok(Value::wrap_list(vec![Value::Number(2.0), Value::Number(3.0)])),
            env: None,
        };
        assert_eq!(describe(&evaluation), "(list 2 3) => (2 3)");
    }
}
