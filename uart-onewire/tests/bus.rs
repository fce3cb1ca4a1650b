use std::collections::VecDeque;

use rand::Rng;
use uart_onewire::{
    BusError, DEFAULT_BAUD_RATE, DEFAULT_RESET_BAUD_RATE, OneWire, OneWireError, OneWireStatus,
    Transport, UartOneWire, UartOneWireBuilder,
};

#[derive(Debug, Clone, PartialEq)]
struct UartFault;

/// A UART on a wired-AND bus with a scripted slave.
///
/// Every written byte is ANDed with the next scripted slave byte; an empty script means the
/// slave leaves the line released. `None` in the script swallows the echo (read timeout).
#[derive(Default)]
struct MockUart {
    baud_rate: u32,
    baud_history: Vec<u32>,
    written: Vec<u8>,
    rx: VecDeque<u8>,
    slave: VecDeque<Option<u8>>,
    fail_reads: bool,
    fail_writes: bool,
    /// Rate the port refuses to switch to.
    refused_baud_rate: Option<u32>,
}

impl MockUart {
    fn new() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            ..Default::default()
        }
    }

    fn slave(mut self, script: impl IntoIterator<Item = Option<u8>>) -> Self {
        self.slave.extend(script);
        self
    }

    /// Scripts read slots that answer with `data`, least significant bit first.
    fn answer(&mut self, data: &[u8]) {
        for byte in data {
            for i in 0..8 {
                let pulled = if (byte >> i) & 1 == 1 { 0xff } else { 0xf0 };
                self.slave.push_back(Some(pulled));
            }
        }
    }
}

impl Transport for MockUart {
    type Error = UartFault;

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), Self::Error> {
        if self.refused_baud_rate == Some(baud_rate) {
            return Err(UartFault);
        }
        self.baud_rate = baud_rate;
        self.baud_history.push(baud_rate);
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(UartFault);
        }
        for &byte in data {
            self.written.push(byte);
            if let Some(pulled) = self.slave.pop_front().unwrap_or(Some(0xff)) {
                self.rx.push_back(byte & pulled);
            }
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_reads {
            return Err(UartFault);
        }
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(byte) => buf[n] = byte,
                None => break,
            }
            n += 1;
        }
        Ok(n)
    }
}

#[test]
fn reset_detects_presence() {
    let mut uart = MockUart::new().slave([Some(0b0111_0000)]);
    UartOneWire::new(&mut uart).reset().unwrap();
    assert_eq!(uart.written, [0xf0]);
    assert_eq!(
        uart.baud_history,
        [DEFAULT_RESET_BAUD_RATE, DEFAULT_BAUD_RATE]
    );
}

#[test]
fn reset_without_presence() {
    let mut uart = MockUart::new();
    let err = UartOneWire::new(&mut uart).reset().unwrap_err();
    assert_eq!(
        err,
        BusError::NoPresence {
            sent: 0xf0,
            observed: Some(0xf0)
        }
    );
    assert_eq!(uart.baud_rate, DEFAULT_BAUD_RATE);
}

#[test]
fn reset_timeout_is_no_presence() {
    let mut uart = MockUart::new().slave([None]);
    let err = UartOneWire::new(&mut uart).reset().unwrap_err();
    assert_eq!(
        err,
        BusError::NoPresence {
            sent: 0xf0,
            observed: None
        }
    );
    assert_eq!(uart.baud_rate, DEFAULT_BAUD_RATE);
}

#[test]
fn reset_restores_baud_rate_on_transport_error() {
    let mut uart = MockUart::new();
    uart.fail_reads = true;
    let mut bus = UartOneWireBuilder::default()
        .with_baud_rate(57_600)
        .with_reset_baud_rate(4_800)
        .build(&mut uart)
        .unwrap();
    assert_eq!(bus.reset().unwrap_err(), BusError::Transport(UartFault));
    assert_eq!(bus.baud_rate(), 57_600);
    drop(bus);
    assert_eq!(uart.baud_history, [57_600, 4_800, 57_600]);
}

#[test]
fn reset_restores_baud_rate_on_write_error() {
    let mut uart = MockUart::new();
    uart.fail_writes = true;
    let err = UartOneWire::new(&mut uart).reset().unwrap_err();
    assert_eq!(err, BusError::Transport(UartFault));
    assert_eq!(
        uart.baud_history,
        [DEFAULT_RESET_BAUD_RATE, DEFAULT_BAUD_RATE]
    );
    assert_eq!(uart.baud_rate, DEFAULT_BAUD_RATE);
}

#[test]
fn reset_reports_failed_baud_restore() {
    let mut uart = MockUart::new().slave([Some(0b0111_0000)]);
    uart.refused_baud_rate = Some(DEFAULT_BAUD_RATE);
    let err = UartOneWire::new(&mut uart).reset().unwrap_err();
    assert_eq!(err, BusError::Transport(UartFault));
    assert_eq!(uart.written, [0xf0]);
    assert_eq!(uart.baud_history, [DEFAULT_RESET_BAUD_RATE]);
}

#[test]
fn reset_returns_to_wrapped_port_rate() {
    let mut uart = MockUart::new().slave([Some(0b0111_0000)]);
    uart.baud_rate = 57_600;
    let mut bus = UartOneWire::at_baud_rate(&mut uart, 57_600);
    bus.reset().unwrap();
    assert_eq!(bus.baud_rate(), 57_600);
    drop(bus);
    assert_eq!(uart.baud_rate, 57_600);
    assert_eq!(uart.baud_history, [DEFAULT_RESET_BAUD_RATE, 57_600]);
}

#[test]
fn writes_lsb_first() {
    let mut uart = MockUart::new();
    UartOneWire::new(&mut uart).write(&[0b1011_0000]).unwrap();
    assert_eq!(
        uart.written,
        [0x80, 0x80, 0x80, 0x80, 0xff, 0xff, 0x80, 0xff]
    );
}

#[test]
fn write_detects_collision() {
    let mut script = vec![Some(0xff); 9];
    script.push(Some(0x00));
    let mut uart = MockUart::new().slave(script);
    let err = UartOneWire::new(&mut uart).write(&[0x00, 0xff]).unwrap_err();
    let BusError::Collision { sent, observed } = err else {
        panic!("expected collision");
    };
    assert_eq!(sent.len(), 16);
    assert_eq!(observed.len(), 16);
    let differing: Vec<_> = (0..16).filter(|&i| sent[i] != observed[i]).collect();
    assert_eq!(differing, [9]);
}

#[test]
fn write_short_echo_is_collision() {
    let mut uart = MockUart::new().slave([Some(0xff), None]);
    let err = UartOneWire::new(&mut uart).write(&[0xff]).unwrap_err();
    let BusError::Collision { sent, observed } = err else {
        panic!("expected collision");
    };
    assert_eq!(sent, [0xff; 8]);
    assert_eq!(observed, [0xff; 7]);
}

#[test]
fn read_assembles_lsb_first() {
    let mut uart = MockUart::new();
    uart.answer(&[0xa5, 0x01]);
    let data = UartOneWire::new(&mut uart).read(2).unwrap();
    assert_eq!(data, [0xa5, 0x01]);
    assert_eq!(uart.written, [0xff; 16]);
}

#[test]
fn read_aborts_on_malformed_slot() {
    let mut uart = MockUart::new();
    uart.answer(&[0x42]);
    uart.slave.push_back(Some(0b0000_0000));
    let err = UartOneWire::new(&mut uart).read(2).unwrap_err();
    assert_eq!(
        err,
        BusError::SymbolError {
            byte: 1,
            bit: 0,
            observed: Some(0)
        }
    );
    assert_eq!(uart.written.len(), 9);
}

#[test]
fn read_timeout_is_symbol_error() {
    let mut uart = MockUart::new().slave([Some(0xff), None]);
    let err = UartOneWire::new(&mut uart).read(1).unwrap_err();
    assert_eq!(
        err,
        BusError::SymbolError {
            byte: 0,
            bit: 1,
            observed: None
        }
    );
}

#[test]
fn huge_read_fails_at_first_slot() {
    let mut uart = MockUart::new().slave([None]);
    let err = UartOneWire::new(&mut uart).read(usize::MAX).unwrap_err();
    assert_eq!(
        err,
        BusError::SymbolError {
            byte: 0,
            bit: 0,
            observed: None
        }
    );
    assert_eq!(uart.written, [0xff]);
}

#[test]
fn written_bytes_read_back() {
    let mut rng = rand::rng();
    for value in 0..=u8::MAX {
        let mut uart = MockUart::new();
        let mut bus = UartOneWire::new(&mut uart);
        bus.write(&[value]).unwrap();
        drop(bus);
        uart.answer(&[value]);
        assert_eq!(UartOneWire::new(&mut uart).read(1).unwrap(), [value]);
    }
    let data: Vec<u8> = (0..rng.random_range(1..64)).map(|_| rng.random()).collect();
    let mut uart = MockUart::new();
    UartOneWire::new(&mut uart).write(&data).unwrap();
    uart.answer(&data);
    assert_eq!(UartOneWire::new(&mut uart).read(data.len()).unwrap(), data);
}

#[test]
fn read_rom_session() {
    let mut uart = MockUart::new().slave([Some(0b0111_0000)]);
    let mut bus = UartOneWireBuilder::default()
        .with_baud_rate(115_200)
        .build(&mut uart)
        .unwrap();
    bus.reset().unwrap();
    bus.write(&[0x33]).unwrap();
    assert_eq!(bus.read(1).unwrap(), [0xff]);
    assert_eq!(bus.baud_rate(), 115_200);
}

#[test]
fn onewire_trait_maps_errors() {
    let mut uart = MockUart::new();
    let mut bus = UartOneWire::new(&mut uart);
    assert_eq!(
        OneWire::reset(&mut bus).unwrap_err(),
        OneWireError::NoDevicePresent
    );
    drop(bus);

    uart.slave.push_back(Some(0x70));
    let status = OneWire::reset(&mut UartOneWire::new(&mut uart)).unwrap();
    assert!(status.presence());
    assert!(!status.shortcircuit());

    uart.slave.extend([Some(0x00)]);
    let err = UartOneWire::new(&mut uart).write_bit(true).unwrap_err();
    assert!(matches!(err, OneWireError::Other(BusError::Collision { .. })));
}

#[test]
fn onewire_trait_transfers_bytes() {
    let mut uart = MockUart::new();
    let mut bus = UartOneWire::new(&mut uart);
    bus.write_byte(0xcc).unwrap();
    bus.write_bytes(&[0x44, 0xbe]).unwrap();
    bus.write_bit(false).unwrap();
    drop(bus);
    assert_eq!(uart.written.len(), 8 * 3 + 1);
    assert_eq!(uart.written.last(), Some(&0x80));

    uart.answer(&[0x5a, 0x10, 0x01]);
    uart.slave.push_back(Some(0xf0));
    let mut bus = UartOneWire::new(&mut uart);
    assert_eq!(bus.read_byte().unwrap(), 0x5a);
    let mut buf = [0; 2];
    bus.read_bytes(&mut buf).unwrap();
    assert_eq!(buf, [0x10, 0x01]);
    assert!(!bus.read_bit().unwrap());
    assert!(!bus.get_overdrive_mode());
    assert_eq!(
        bus.set_overdrive_mode(true).unwrap_err(),
        OneWireError::Unimplemented
    );
}
