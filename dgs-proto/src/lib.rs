//! Wire format and field parsing for DGS-series gas sensors.
//!
//! SPEC Sensors' DGS modules (DGS-O3, DGS-NO2, DGS-SO2, ...) stream one
//! ASCII telemetry line per measurement over a 9600 8N1 serial link. This
//! crate provides everything needed to work with that stream:
//!
//! - **Types**: [`TelemetryFrame`] (one decoded line), [`SensorReading`]
//!   (the validated subset published to the rest of the firmware)
//! - **Parsing**: [`parse_frame`] splits a terminator-stripped line into
//!   its eleven signed fields
//! - **Commands**: [`Command`] — the single-byte commands written to the
//!   sensor (wake-up, continuous measurement)
//!
//! # Wire Format
//!
//! ```text
//! <serial>,<o3_ppb>,<temp_c>,<rh_pct>,<adc>,<temp_raw>,<rh_raw>,<day>,<hour>,<min>,<sec>\r\n
//! ```
//!
//! Eleven comma-separated signed decimal integers terminated by CR LF, for
//! example:
//!
//! ```text
//! 1234567890,42,21,45,100,200,300,5,12,30,15\r\n
//! ```
//!
//! Field values use lenient decimal parsing: a segment with a non-numeric
//! prefix decodes as zero instead of failing the frame. This matches the
//! sensor vendor's own tooling, which parses fields with `atoll`.
//!
//! # Example
//!
//! ```
//! use dgs_proto::parse_frame;
//!
//! let frame = parse_frame(b"1234567890,42,21,45,100,200,300,5,12,30,15").unwrap();
//! assert_eq!(frame.serial, 1234567890);
//! assert_eq!(frame.o3_ppb, 42);
//! assert_eq!(frame.temperature_c, 21);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod command;
pub mod parser;
pub mod types;

// Re-export types at crate root for convenience
pub use command::Command;
pub use parser::{parse_frame, ParseError, MAX_LINE_LENGTH};
pub use types::{SensorReading, TelemetryFrame, FIELD_COUNT};
