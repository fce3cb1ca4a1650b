#![no_std]
#![deny(missing_docs)]

/*! # uart-onewire
 *
 * A 1-Wire bus master built from a plain UART.
 *
 * The UART's TX and RX pins are tied to the 1-Wire line through an open-drain buffer. Each
 * 1-Wire time slot is produced by sending one UART byte whose bit pattern reproduces the
 * slot's pulse shape, and the byte received back is the line as the bus carried it. The reset
 * pulse is sent at a lower baud rate so that one UART frame spans the reset and presence
 * windows.
 *
 * [`UartOneWire`] exposes [`reset`](UartOneWire::reset), [`write`](UartOneWire::write) and
 * [`read`](UartOneWire::read), and implements the [`OneWire`] trait so 1-Wire device drivers
 * can run on top of it.
 */

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use embedded_onewire::{OneWire, OneWireError, OneWireResult, OneWireStatus};
pub mod codec;
mod error;
mod onewire;
mod reset;
mod transceiver;
pub mod transport;

use alloc::vec::Vec;
pub use error::BusError;
pub use reset::ResetEcho;
pub use transport::Transport;

/// Results of bus operations.
pub type BusResult<T, E> = Result<T, BusError<E>>;

/// Baud rate at which one UART frame matches a standard speed time slot.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Baud rate at which one UART frame spans the reset pulse and presence window.
pub const DEFAULT_RESET_BAUD_RATE: u32 = 9_600;

/// A 1-Wire bus driven through a UART.
///
/// Takes ownership of a [`Transport`]; operations take `&mut self`, so one operation at a time
/// runs on the bus. Share a bus between threads behind a mutex held for the whole operation.
pub struct UartOneWire<T> {
    pub(crate) transport: T,
    pub(crate) baud_rate: u32,
    pub(crate) reset_baud_rate: u32,
}

/// Builder for creating a [`UartOneWire`] instance with custom baud rates.
pub struct UartOneWireBuilder {
    pub(crate) baud_rate: u32,
    pub(crate) reset_baud_rate: u32,
}

impl Default for UartOneWireBuilder {
    fn default() -> Self {
        UartOneWireBuilder {
            baud_rate: DEFAULT_BAUD_RATE,
            reset_baud_rate: DEFAULT_RESET_BAUD_RATE,
        }
    }
}

impl UartOneWireBuilder {
    /// Sets the baud rate used for read and write slots.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Sets the baud rate used for the reset pulse.
    pub fn with_reset_baud_rate(mut self, reset_baud_rate: u32) -> Self {
        self.reset_baud_rate = reset_baud_rate;
        self
    }

    /// Builds a new `UartOneWire`, switching the transport to the slot baud rate.
    pub fn build<T: Transport>(self, mut transport: T) -> BusResult<UartOneWire<T>, T::Error> {
        transport.set_baud_rate(self.baud_rate)?;
        Ok(UartOneWire {
            transport,
            baud_rate: self.baud_rate,
            reset_baud_rate: self.reset_baud_rate,
        })
    }
}

impl<T> UartOneWire<T> {
    /// Wraps a transport that must already run at [`DEFAULT_BAUD_RATE`].
    ///
    /// The transport is not reconfigured; every reset switches it back to
    /// [`DEFAULT_BAUD_RATE`]. Use [`UartOneWire::at_baud_rate`] for a port opened at another
    /// rate, or [`UartOneWireBuilder`] to configure the port.
    pub fn new(transport: T) -> Self {
        Self::at_baud_rate(transport, DEFAULT_BAUD_RATE)
    }

    /// Wraps a transport currently running at `baud_rate`, keeping that rate for time slots.
    pub fn at_baud_rate(transport: T, baud_rate: u32) -> Self {
        UartOneWire {
            transport,
            baud_rate,
            reset_baud_rate: DEFAULT_RESET_BAUD_RATE,
        }
    }

    /// Baud rate used for read and write slots.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Baud rate used for the reset pulse.
    pub fn reset_baud_rate(&self) -> u32 {
        self.reset_baud_rate
    }

    /// Releases the underlying transport.
    pub fn release(self) -> T {
        self.transport
    }
}

impl<T: Transport> UartOneWire<T> {
    /// Resets the bus and checks for a presence pulse.
    ///
    /// # Errors
    /// [`BusError::NoPresence`] if no device pulled the line low, including when the echo
    /// timed out. The slot baud rate is restored before returning in every case.
    pub fn reset(&mut self) -> BusResult<(), T::Error> {
        self.reset_with_echo().map(|_| ())
    }

    /// Resets the bus and returns the observed echo.
    pub fn reset_with_echo(&mut self) -> BusResult<ResetEcho, T::Error> {
        reset::reset(&mut self.transport, self.baud_rate, self.reset_baud_rate)
    }

    /// Writes `data` to the bus, least significant bit of each byte first.
    ///
    /// # Errors
    /// [`BusError::Collision`] if the bus did not carry exactly what was written. The whole
    /// write is reported as failed; the caller restarts from a reset.
    pub fn write(&mut self, data: &[u8]) -> BusResult<(), T::Error> {
        transceiver::write(&mut self.transport, data)
    }

    /// Reads `count` bytes from the bus.
    ///
    /// # Errors
    /// [`BusError::SymbolError`] at the first slot whose echo shows the line held low past the
    /// sampling window. No bytes are returned in that case.
    pub fn read(&mut self, count: usize) -> BusResult<Vec<u8>, T::Error> {
        transceiver::read(&mut self.transport, count)
    }

    /// Fills `buf` with bytes read from the bus.
    ///
    /// The contents of `buf` are unspecified on error.
    pub fn read_into(&mut self, buf: &mut [u8]) -> BusResult<(), T::Error> {
        transceiver::read_into(&mut self.transport, buf)
    }
}
