use crate::format::{Format, FormatError};
use std::fmt;

/// Words that start a new command in the command list.
const COMMAND_WORDS: [&str; 6] = ["-b", "-v", "read", "write", "reset", "-I"];

/// One step of a command list, executed left to right.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Toggle echoing each operation to stderr.
    Verbose,
    /// Toggle raw binary output of reads.
    Binary,
    /// Reset the bus.
    Reset,
    /// Write bytes to the bus.
    Write(Vec<u8>),
    /// Read a number of bytes, printed as hex.
    Read(usize),
    /// Read the bytes a format needs and print the decoded values.
    ReadFormat(Format),
    /// Read further command lines from stdin.
    Interactive,
}

#[derive(Debug, PartialEq)]
pub enum ParseError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidHex(String),
    InvalidFormat(String, FormatError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(cmd) => write!(f, "invalid command: {cmd}"),
            Self::MissingArgument(cmd) => write!(f, "missing argument for {cmd}"),
            Self::InvalidHex(token) => write!(f, "invalid hex: {token}"),
            Self::InvalidFormat(fmt, e) => write!(f, "invalid format {fmt:?}: {e}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses a hex token such as `33` or `cc44`.
fn parse_hex(token: &str) -> Result<Vec<u8>, ParseError> {
    let invalid = || ParseError::InvalidHex(token.to_owned());
    if token.len() % 2 != 0 || !token.is_ascii() {
        return Err(invalid());
    }
    (0..token.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&token[i..i + 2], 16).map_err(|_| invalid()))
        .collect()
}

/// Parses a command list.
pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Vec<Command>, ParseError> {
    let mut args = args.iter().map(AsRef::as_ref).peekable();
    let mut commands = Vec::new();
    while let Some(cmd) = args.next() {
        let command = match cmd {
            "-v" => Command::Verbose,
            "-b" => Command::Binary,
            "-I" => Command::Interactive,
            "reset" => Command::Reset,
            "write" => {
                let mut data = Vec::new();
                while let Some(token) = args.next_if(|t| !COMMAND_WORDS.contains(t)) {
                    data.extend(parse_hex(token)?);
                }
                Command::Write(data)
            }
            "read" => {
                let arg = args.next().ok_or(ParseError::MissingArgument("read"))?;
                match arg.parse::<usize>() {
                    Ok(count) => Command::Read(count),
                    Err(_) => Command::ReadFormat(
                        Format::parse(arg)
                            .map_err(|e| ParseError::InvalidFormat(arg.to_owned(), e))?,
                    ),
                }
            }
            other => return Err(ParseError::UnknownCommand(other.to_owned())),
        };
        commands.push(command);
    }
    Ok(commands)
}
