//! DGS-O3 ozone sensor monitor for RP2040.
//!
//! This crate provides the embedded implementation of a telemetry monitor
//! that reads a SPEC Sensors DGS-O3 module over UART and publishes
//! validated ozone readings.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Wakes the sensor and switches it to continuous measurement
//! 2. Receives one telemetry line per second over UART (9600 baud, 8N1)
//! 3. Assembles, parses, and validates each line
//! 4. Publishes the latest accepted reading and logs it via defmt
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | Sensor commands (wake-up, continuous mode) |
//! | UART1 RX | 9    | Telemetry input |
//! | LED      | 25   | On-board LED (error indicator) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with three concurrent tasks:
//!
//! - **RX Task**: reads UART bytes and pushes them into the SPSC ring,
//!   standing in for the receive interrupt
//! - **Pipeline Task**: ticks the pipeline on a fixed cadence and publishes
//!   newly accepted readings
//! - **Report Task**: waits for published readings and logs them
//!
//! The RX task and the pipeline task share only the lock-free
//! [`RxRing`]; readings cross to the report task through Embassy's
//! [`Signal`](embassy_sync::signal::Signal) with "latest value wins"
//! semantics, so a reader never observes a torn update.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//!
//! # Re-exports
//!
//! This crate re-exports the public items of [`ozone_core`] (which itself
//! re-exports [`dgs_proto`]) for convenience, so consumers only need to
//! depend on this crate.

#![no_std]

// Re-export core types for convenience
pub use ozone_core::{
    parse_frame, Command, FeedOutcome, LineAssembler, LineError, ParseError, PipelineStats,
    RxConsumer, RxProducer, RxRing, SensorPipeline, SensorReading, SessionError, SessionValidator,
    TelemetryFrame, FIELD_COUNT, MAX_LINE_LENGTH,
};

/// Receive ring capacity in bytes; ample for the pipeline tick cadence at
/// the sensor's baud rate.
pub const RX_BUFFER_SIZE: usize = 1024;

/// The sensor's fixed baud rate (8N1).
pub const SENSOR_BAUD: u32 = 9600;

/// Pipeline tick cadence. At 9600 baud at most ~48 bytes arrive per tick,
/// a small fraction of [`RX_BUFFER_SIZE`].
pub const TICK_INTERVAL_MS: u64 = 50;
