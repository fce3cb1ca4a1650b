use crate::{BusError, BusResult, Transport, codec::RESET_PATTERN};
use embedded_onewire::OneWireStatus;

/// Echo of the reset pattern, as returned by a successful reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetEcho(pub(crate) u8);

impl ResetEcho {
    /// Byte observed on the bus while the reset pattern was sent.
    pub fn echo(&self) -> u8 {
        self.0
    }
}

impl OneWireStatus for ResetEcho {
    fn presence(&self) -> bool {
        self.0 != RESET_PATTERN
    }

    fn shortcircuit(&self) -> bool {
        self.0 == 0
    }
}

/// Switches the transport to another baud rate until restored or dropped.
pub(crate) struct BaudRateGuard<'a, T: Transport> {
    transport: &'a mut T,
    restore_to: u32,
    armed: bool,
}

impl<'a, T: Transport> BaudRateGuard<'a, T> {
    pub(crate) fn switch(transport: &'a mut T, from: u32, to: u32) -> Result<Self, T::Error> {
        transport.set_baud_rate(to)?;
        Ok(Self {
            transport,
            restore_to: from,
            armed: true,
        })
    }

    pub(crate) fn transport(&mut self) -> &mut T {
        self.transport
    }

    /// Restores the saved baud rate, reporting failure to the caller.
    pub(crate) fn restore(mut self) -> Result<(), T::Error> {
        self.armed = false;
        self.transport.set_baud_rate(self.restore_to)
    }
}

impl<T: Transport> Drop for BaudRateGuard<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = self.transport.set_baud_rate(self.restore_to) {
            log::warn!("failed to restore baud rate {}: {e:?}", self.restore_to);
        }
    }
}

/// Issues a reset pulse and checks the echo for a presence pulse.
///
/// The transport runs at `reset_baud_rate` for the duration of the pulse and is switched back to
/// `baud_rate` on every exit path.
pub(crate) fn reset<T: Transport>(
    transport: &mut T,
    baud_rate: u32,
    reset_baud_rate: u32,
) -> BusResult<ResetEcho, T::Error> {
    let mut guard = BaudRateGuard::switch(transport, baud_rate, reset_baud_rate)?;
    guard.transport().write(&[RESET_PATTERN])?;
    let mut echo = [0; 1];
    let read = guard.transport().read(&mut echo)?;
    guard.restore()?;
    let observed = (read == 1).then_some(echo[0]);
    log::trace!("reset echo {observed:02x?}");
    match observed {
        Some(echo) if echo != RESET_PATTERN => Ok(ResetEcho(echo)),
        _ => Err(BusError::NoPresence {
            sent: RESET_PATTERN,
            observed,
        }),
    }
}
