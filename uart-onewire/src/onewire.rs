use crate::{BusError, ResetEcho, Transport, UartOneWire, reset, transceiver};
use embedded_onewire::{OneWire, OneWireError, OneWireResult};

impl<T: Transport> OneWire for UartOneWire<T> {
    type Status = ResetEcho;

    type BusError = BusError<T::Error>;

    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError> {
        reset::reset(&mut self.transport, self.baud_rate, self.reset_baud_rate).map_err(
            |e| match e {
                BusError::NoPresence { .. } => OneWireError::NoDevicePresent,
                e => OneWireError::Other(e),
            },
        )
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        Ok(transceiver::write(&mut self.transport, &[byte])?)
    }

    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        let mut val = [0; 1];
        transceiver::read_into(&mut self.transport, &mut val)?;
        Ok(val[0])
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        Ok(transceiver::write_slot(&mut self.transport, bit)?)
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        Ok(transceiver::read_slot(&mut self.transport, 0, 0)?)
    }

    fn write_bytes(&mut self, data: &[u8]) -> OneWireResult<(), Self::BusError> {
        Ok(transceiver::write(&mut self.transport, data)?)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        Ok(transceiver::read_into(&mut self.transport, buf)?)
    }
}
