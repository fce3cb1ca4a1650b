//! The byte channel a [`UartOneWire`](crate::UartOneWire) drives.

/// A UART wired to the 1-Wire bus.
///
/// TX and RX share the bus line through an open-drain buffer, so every byte written is read
/// back as the bus physically carried it.
pub trait Transport {
    /// Error type of the underlying port.
    type Error: core::fmt::Debug;

    /// Changes the baud rate of the port.
    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), Self::Error>;

    /// Writes all of `data` to the port.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads into `buf` until it is full or the read timeout expires.
    ///
    /// Returns the number of bytes read, fewer than `buf.len()` on timeout.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), Self::Error> {
        T::set_baud_rate(self, baud_rate)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read(self, buf)
    }
}

#[cfg(feature = "serialport")]
mod serial {
    use super::Transport;
    use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
    use std::{
        boxed::Box,
        io::{self, Read, Write},
        time::Duration,
    };

    /// Read timeout used by the command line front-end, long enough for one slot echo.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10);

    /// Opens `path` as an 8N1 port without flow control.
    ///
    /// `timeout` bounds every read, a missing echo turns into a short read.
    pub fn open(
        path: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> serialport::Result<Box<dyn SerialPort>> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(timeout)
            .open()?;
        port.clear(serialport::ClearBuffer::All)?;
        log::debug!("opened {path} at {baud_rate} baud, timeout {timeout:?}");
        Ok(port)
    }

    impl Transport for Box<dyn SerialPort> {
        type Error = serialport::Error;

        fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), Self::Error> {
            SerialPort::set_baud_rate(&mut **self, baud_rate)
        }

        fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            Write::write_all(self, data)?;
            Write::flush(self)?;
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let mut filled = 0;
            while filled < buf.len() {
                match Read::read(self, &mut buf[filled..]) {
                    Ok(0) => break,
                    Ok(n) => filled += n,
                    Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(filled)
        }
    }
}

#[cfg(feature = "serialport")]
pub use serial::{DEFAULT_TIMEOUT, open};
