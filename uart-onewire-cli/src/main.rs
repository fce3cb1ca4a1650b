use clap::Parser;
use std::{io, process, time::Duration};
use uart_onewire::{UartOneWireBuilder, transport};

mod command;
mod format;
mod session;

const COMMANDS_HELP: &str = "\
COMMANDS are executed left to right:
  -v                  Toggle verbose mode (default off)
  -b                  Toggle raw binary output from reads (default off)
  reset               Perform bus reset
  write HEX [HEX ...] Write bytes to bus
  read COUNT          Read COUNT bytes from bus
  read FMT            Read from bus and decode with struct format FMT (e.g. <hH4B)
  -I                  Read further commands from stdin

Example:
  uart-onewire /dev/ttyUSB0 -v reset write 33 read 8";

/// Talk to 1-Wire devices through a UART
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, after_help = COMMANDS_HELP)]
struct Args {
    /// Path to UART device (e.g., /dev/ttyUSB0)
    device: String,
    /// Baud rate for read and write time slots
    #[arg(long, default_value_t = uart_onewire::DEFAULT_BAUD_RATE)]
    baud: u32,
    /// Baud rate for the reset pulse
    #[arg(long, default_value_t = uart_onewire::DEFAULT_RESET_BAUD_RATE)]
    reset_baud: u32,
    /// Read timeout in milliseconds
    #[arg(long, default_value_t = transport::DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,
    /// Commands to execute
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    commands: Vec<String>,
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    let commands = match command::parse(args.commands.as_slice()) {
        Ok(commands) => commands,
        Err(e) => {
            log::error!("{e}");
            process::exit(2);
        }
    };
    // Open the UART
    let port = match transport::open(
        &args.device,
        args.baud,
        Duration::from_millis(args.timeout_ms),
    ) {
        Ok(port) => port,
        Err(e) => {
            log::error!("failed to open {}: {e}", args.device);
            process::exit(1);
        }
    };
    let bus = match UartOneWireBuilder::default()
        .with_baud_rate(args.baud)
        .with_reset_baud_rate(args.reset_baud)
        .build(port)
    {
        Ok(bus) => bus,
        Err(e) => {
            log::error!("failed to configure {}: {e}", args.device);
            process::exit(1);
        }
    };
    let mut session = session::Session::new(bus);
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    if let Err(e) = session.run(&commands, &mut stdin, &mut stdout) {
        log::error!("{e}");
        process::exit(1);
    }
}
