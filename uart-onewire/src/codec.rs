//! Mapping between 1-Wire bits and the UART bytes that produce their time slots.
//!
//! A UART frame starts with a low start bit followed by the data bits, least significant bit
//! first. At 115200 baud one frame lasts ~87µs, one 1-Wire time slot. Sending `0x80` keeps the
//! line low for the start bit and the seven following bit-times, a write-zero slot. Sending
//! `0xFF` only drops the line for the start bit, a write-one slot, which doubles as the read
//! slot: a slave answering zero stretches the low pulse into the first data bits.

use bitfield_struct::bitfield;

/// UART byte generating a write-zero time slot.
pub const ZERO_PATTERN: u8 = 0x80;

/// UART byte generating a write-one (and read) time slot.
pub const ONE_PATTERN: u8 = 0xff;

/// UART byte generating the reset pulse when sent at the reset baud rate.
///
/// At 9600 baud the start bit and the low nibble hold the line low for ~520µs, the upper nibble
/// is the presence-detect window.
pub const RESET_PATTERN: u8 = 0xf0;

/// Mask of the echo bits that must read released in a valid read slot.
pub const RECOVERY_MASK: u8 = 0xf0;

/// Sampled echo of a single time slot.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct SlotEcho {
    /// Line level right after the start bit, the bit driven by the slave.
    pub sample: bool,
    /// Remainder of the sampling window.
    #[bits(3)]
    pub window: u8,
    /// Recovery time, the line must be released here.
    #[bits(4)]
    pub recovery: u8,
}

impl SlotEcho {
    /// The line was released for the whole recovery time.
    pub fn released(&self) -> bool {
        self.into_bits() & RECOVERY_MASK == RECOVERY_MASK
    }
}

/// Returns the UART byte that writes `bit` to the bus.
#[inline]
pub const fn encode_bit(bit: bool) -> u8 {
    if bit { ONE_PATTERN } else { ZERO_PATTERN }
}

/// Extracts the bit sampled in a read slot from its echo.
///
/// Returns `None` if the line was still held low during the recovery time, which no valid
/// slot can produce.
#[inline]
pub fn decode_slot(echo: u8) -> Option<bool> {
    let echo = SlotEcho::from_bits(echo);
    echo.released().then(|| echo.sample())
}

/// Iterates the slot patterns for `data`, least significant bit of each byte first.
pub fn bit_patterns(data: &[u8]) -> impl Iterator<Item = u8> + '_ {
    data.iter()
        .flat_map(|&byte| (0..8).map(move |i| encode_bit((byte >> i) & 1 == 1)))
}
