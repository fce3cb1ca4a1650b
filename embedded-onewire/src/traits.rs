use crate::{OneWireError, OneWireResult};

/// Status of the bus as reported by a reset.
pub trait OneWireStatus {
    /// At least one device answered the reset with a presence pulse.
    fn presence(&self) -> bool;
    /// The line was held low for the whole presence-detect window.
    fn shortcircuit(&self) -> bool;
}

/// Trait for 1-Wire communication.
/// This trait defines the basic operations required for 1-Wire communication, such as resetting the bus,
/// writing and reading bytes, and writing and reading bits.
pub trait OneWire {
    /// The status type returned by the reset operation.
    /// This type must implement the [OneWireStatus] trait.
    type Status: OneWireStatus;
    /// The error type returned by the operations of this trait.
    /// This type is used to indicate errors in the underlying hardware or communication.
    type BusError;

    /// Resets the 1-Wire bus and returns the status of the bus.
    ///
    /// # Errors
    /// Returns [`OneWireError::NoDevicePresent`] if no device answered the reset.
    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError>;

    /// Writes a byte to the 1-Wire bus, least significant bit first.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError>;

    /// Reads a byte from the 1-Wire bus, least significant bit first.
    ///
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError>;

    /// Writes a single bit to the 1-Wire bus.
    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError>;

    /// Reads a single bit from the 1-Wire bus.
    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Writes a sequence of bytes to the 1-Wire bus.
    ///
    /// Masters that can move a whole buffer in one transaction should override this.
    fn write_bytes(&mut self, data: &[u8]) -> OneWireResult<(), Self::BusError> {
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Fills `buf` with bytes read from the 1-Wire bus.
    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        for byte in buf.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(())
    }

    /// Check if the 1-Wire bus is in overdrive mode.
    fn get_overdrive_mode(&mut self) -> bool {
        false
    }

    /// Set the 1-Wire bus to overdrive mode.
    /// # Arguments
    /// * `enable` - A boolean indicating whether to enable or disable overdrive mode.
    fn set_overdrive_mode(&mut self, _enable: bool) -> OneWireResult<(), Self::BusError> {
        Err(OneWireError::Unimplemented)
    }
}
