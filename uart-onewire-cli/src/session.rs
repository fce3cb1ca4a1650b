use crate::{
    command::{self, Command},
    format::Format,
};
use std::{
    fmt,
    io::{self, BufRead, Write},
};
use uart_onewire::{BusError, Transport, UartOneWire};

#[derive(Debug)]
pub enum SessionError<E> {
    Bus(BusError<E>),
    Io(io::Error),
}

impl<E> From<BusError<E>> for SessionError<E> {
    fn from(value: BusError<E>) -> Self {
        Self::Bus(value)
    }
}

impl<E> From<io::Error> for SessionError<E> {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl<E: fmt::Debug> fmt::Display for SessionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "output error: {e}"),
        }
    }
}

fn hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Executes command lists against a bus, carrying the output toggles between commands.
pub struct Session<T> {
    bus: UartOneWire<T>,
    verbose: bool,
    binary: bool,
}

impl<T: Transport> Session<T> {
    pub fn new(bus: UartOneWire<T>) -> Self {
        Self {
            bus,
            verbose: false,
            binary: false,
        }
    }

    /// Runs `commands` in order, stopping at the first error.
    ///
    /// `input` supplies command lines for interactive mode, read results go to `out`.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        commands: &[Command],
        input: &mut R,
        out: &mut W,
    ) -> Result<(), SessionError<T::Error>> {
        for command in commands {
            self.execute(command, input, out)?;
        }
        Ok(())
    }

    fn execute<R: BufRead, W: Write>(
        &mut self,
        command: &Command,
        input: &mut R,
        out: &mut W,
    ) -> Result<(), SessionError<T::Error>> {
        match command {
            Command::Verbose => self.verbose = !self.verbose,
            Command::Binary => self.binary = !self.binary,
            Command::Reset => {
                if self.verbose {
                    eprintln!("reset");
                }
                self.bus.reset()?;
            }
            Command::Write(data) => {
                self.bus.write(data)?;
                if self.verbose {
                    eprintln!("write: {}", hex(data));
                }
            }
            Command::Read(count) => {
                let data = self.bus.read(*count)?;
                self.report(&data, None, out)?;
            }
            Command::ReadFormat(format) => {
                let data = self.bus.read(format.size())?;
                self.report(&data, Some(format), out)?;
            }
            Command::Interactive => self.interact(input, out)?,
        }
        Ok(())
    }

    fn report<W: Write>(
        &self,
        data: &[u8],
        format: Option<&Format>,
        out: &mut W,
    ) -> io::Result<()> {
        if self.verbose {
            eprintln!(" read: {}", hex(data));
        }
        if self.binary {
            out.write_all(data)?;
        } else if let Some(format) = format {
            let values: Vec<String> = format
                .unpack(data)
                .iter()
                .map(ToString::to_string)
                .collect();
            writeln!(out, "{}", values.join(" "))?;
        } else {
            writeln!(out, "{}", hex(data))?;
        }
        out.flush()
    }

    /// Reads command lines from `input` until end of input.
    ///
    /// Errors are reported and the rest of the offending line is skipped.
    fn interact<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> Result<(), SessionError<T::Error>> {
        let mut line = String::new();
        loop {
            eprint!("> ");
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let commands = match command::parse(tokens.as_slice()) {
                Ok(commands) => commands,
                Err(e) => {
                    log::error!("{e}");
                    continue;
                }
            };
            for command in &commands {
                if *command == Command::Interactive {
                    log::warn!("already in interactive mode");
                    continue;
                }
                match self.execute(command, input, out) {
                    Ok(()) => {}
                    Err(SessionError::Bus(e)) => {
                        log::error!("{e}");
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }
}
