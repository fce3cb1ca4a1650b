/// One wire communication error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying bus master.
    Other(E),
    /// Indicates that no device answered the reset with a presence pulse.
    NoDevicePresent,
    /// Indicates that a short circuit was detected on the bus.
    ShortCircuit,
    /// Indicates that the operation is not supported by the bus master, such as overdrive speed.
    Unimplemented,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}
