#![no_std]
#![deny(missing_docs)]
//! # embedded-onewire
//! A no-std trait definition for 1-Wire bus masters.
//!
//! The [OneWire] trait defines the transport primitive every 1-Wire master provides: resetting
//! the bus with presence detection, and writing and reading single bits and whole bytes.
//! Device drivers are written against this trait, so they run unchanged over any master
//! (a UART wired to the bus, an I2C bridge, a bit-banged GPIO).

mod error;
mod traits;
pub use error::OneWireError;
pub use traits::{OneWire, OneWireStatus};

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
