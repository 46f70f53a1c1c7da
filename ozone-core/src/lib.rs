//! Platform-agnostic telemetry pipeline for DGS-series gas sensors.
//!
//! This crate turns the raw byte stream of a serial-connected DGS sensor
//! into validated [`SensorReading`] values, without touching any hardware.
//! It can be used both in embedded `no_std` environments and on host for
//! testing.
//!
//! # Overview
//!
//! The crate is organized into several modules, one per pipeline stage:
//!
//! - [`ring`]: interrupt-safe SPSC byte queue ([`RxRing`], [`RxProducer`],
//!   [`RxConsumer`])
//! - [`assembler`]: accumulates bytes into CR/LF-terminated lines
//!   ([`LineAssembler`])
//! - [`session`]: latches the sensor identity and clamps readings
//!   ([`SessionValidator`])
//! - [`pipeline`]: ties the stages together ([`SensorPipeline`])
//!
//! Data flow:
//!
//! ```text
//! UART IRQ -> RxProducer::push -> RxRing -> SensorPipeline::tick
//!                                             |- LineAssembler
//!                                             |- dgs_proto::parse_frame
//!                                             '- SessionValidator
//! ```
//!
//! The producing context (typically a receive interrupt) holds the
//! [`RxProducer`] and pushes each incoming byte; everything downstream runs
//! from [`SensorPipeline::tick`], invoked periodically by the surrounding
//! firmware. `tick` never blocks and never fails: malformed input is
//! logged, counted in [`PipelineStats`], and discarded, and the next
//! well-formed line simply becomes the next reading.
//!
//! # Example
//!
//! ```
//! use ozone_core::{RxRing, SensorPipeline};
//!
//! let mut ring = RxRing::<64>::new();
//! let (mut feeder, rx) = ring.split();
//! let mut pipeline = SensorPipeline::new(rx);
//!
//! for &b in b"1234567890,42,21,45,100,200,300,5,12,30,15\r\n".as_slice() {
//!     feeder.push(b);
//! }
//! pipeline.tick();
//!
//! let reading = pipeline.latest_reading().unwrap();
//! assert_eq!(reading.o3_ppb, 42);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Route pipeline log events through defmt (embedded)
//! - **`log`**: Route pipeline log events through the `log` crate (host)
//!
//! With neither logging feature enabled, log events compile to nothing.
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This must come first so the other modules see its macros.
mod fmt;

pub mod assembler;
pub mod pipeline;
pub mod ring;
pub mod session;

// Re-export main types at crate root
pub use assembler::{FeedOutcome, LineAssembler, LineError};
pub use pipeline::{PipelineStats, SensorPipeline};
pub use ring::{RxConsumer, RxProducer, RxRing};
pub use session::{SessionError, SessionValidator};

// Re-export the wire-format crate's types so consumers only need one import
pub use dgs_proto::{
    parse_frame, Command, ParseError, SensorReading, TelemetryFrame, FIELD_COUNT, MAX_LINE_LENGTH,
};
