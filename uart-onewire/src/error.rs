use alloc::vec::Vec;
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised by a [`UartOneWire`](crate::UartOneWire) bus.
pub enum BusError<E> {
    /// Error reported by the underlying transport.
    Transport(E),
    /// The reset echo came back unchanged, no device pulled the line low.
    NoPresence {
        /// Reset pattern sent on the bus.
        sent: u8,
        /// Byte observed on the bus, `None` if the read timed out.
        observed: Option<u8>,
    },
    /// A read slot echo showed the line held low past the sampling window.
    SymbolError {
        /// Index of the byte being read.
        byte: usize,
        /// Bit position within that byte.
        bit: u8,
        /// Echo observed for the slot, `None` if the read timed out.
        observed: Option<u8>,
    },
    /// The bytes observed on the bus differ from the slot patterns written.
    Collision {
        /// Slot patterns written.
        sent: Vec<u8>,
        /// Bytes observed on the bus.
        observed: Vec<u8>,
    },
}

impl<E> From<E> for BusError<E> {
    fn from(value: E) -> Self {
        Self::Transport(value)
    }
}

struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug> fmt::Display for BusError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {e:?}"),
            Self::NoPresence {
                sent,
                observed: Some(observed),
            } => write!(
                f,
                "did not receive presence detect pulse after reset (sent {sent:02x}, on bus {observed:02x})"
            ),
            Self::NoPresence { sent, observed: None } => write!(
                f,
                "did not receive presence detect pulse after reset (sent {sent:02x}, no echo)"
            ),
            Self::SymbolError {
                byte,
                bit,
                observed: Some(observed),
            } => write!(
                f,
                "bus held low for too long (byte {byte}, bit {bit}, echo {observed:02x})"
            ),
            Self::SymbolError {
                byte,
                bit,
                observed: None,
            } => write!(f, "no echo for read slot (byte {byte}, bit {bit})"),
            Self::Collision { sent, observed } => write!(
                f,
                "collision on bus\nWrote: {}\nOn bus: {}",
                Hex(sent),
                Hex(observed)
            ),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for BusError<E> {}
