use crate::{
    BusError, BusResult, Transport,
    codec::{ONE_PATTERN, bit_patterns, decode_slot, encode_bit},
};
use alloc::{vec, vec::Vec};

/// Writes `data` to the bus in a single transport transaction and checks the echo.
pub(crate) fn write<T: Transport>(transport: &mut T, data: &[u8]) -> BusResult<(), T::Error> {
    exchange(transport, bit_patterns(data).collect())
}

/// Writes a single bit to the bus.
pub(crate) fn write_slot<T: Transport>(transport: &mut T, bit: bool) -> BusResult<(), T::Error> {
    exchange(transport, vec![encode_bit(bit)])
}

fn exchange<T: Transport>(transport: &mut T, sent: Vec<u8>) -> BusResult<(), T::Error> {
    transport.write(&sent)?;
    let mut observed = vec![0; sent.len()];
    let read = transport.read(&mut observed)?;
    observed.truncate(read);
    if observed != sent {
        return Err(BusError::Collision { sent, observed });
    }
    Ok(())
}

/// Generates one read slot and samples the bit a slave drove into it.
///
/// `byte` and `bit` locate the slot within the current read for diagnostics.
pub(crate) fn read_slot<T: Transport>(
    transport: &mut T,
    byte: usize,
    bit: u8,
) -> BusResult<bool, T::Error> {
    transport.write(&[ONE_PATTERN])?;
    let mut echo = [0; 1];
    let read = transport.read(&mut echo)?;
    let observed = (read == 1).then_some(echo[0]);
    log::trace!("read slot {byte}:{bit} echo {observed:02x?}");
    observed
        .and_then(decode_slot)
        .ok_or(BusError::SymbolError {
            byte,
            bit,
            observed,
        })
}

fn read_byte<T: Transport>(transport: &mut T, index: usize) -> BusResult<u8, T::Error> {
    (0..8).try_fold(0u8, |byte, bit| -> BusResult<u8, T::Error> {
        Ok(byte | (u8::from(read_slot(transport, index, bit)?) << bit))
    })
}

/// Fills `buf` with bytes read from the bus.
///
/// Stops at the first malformed slot, the contents of `buf` are unspecified on error.
pub(crate) fn read_into<T: Transport>(
    transport: &mut T,
    buf: &mut [u8],
) -> BusResult<(), T::Error> {
    for (index, byte) in buf.iter_mut().enumerate() {
        *byte = read_byte(transport, index)?;
    }
    Ok(())
}

/// Reads `count` bytes from the bus.
///
/// The output grows one assembled byte at a time, so `count` is bounded by the bus, not by an
/// up-front allocation.
pub(crate) fn read<T: Transport>(
    transport: &mut T,
    count: usize,
) -> BusResult<Vec<u8>, T::Error> {
    let mut data = Vec::new();
    for index in 0..count {
        data.push(read_byte(transport, index)?);
    }
    Ok(data)
}
