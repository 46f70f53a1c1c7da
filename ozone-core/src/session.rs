//! Latches the sensor identity and publishes validated readings.

use dgs_proto::{SensorReading, TelemetryFrame};

/// Error type for session validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// The frame's serial number differs from the one latched at session
    /// start; the frame is discarded.
    SerialMismatch {
        /// Serial number latched on the first accepted frame.
        expected: i64,
        /// Serial number carried by the rejected frame.
        received: i64,
    },
}

/// Validates frames against the latched sensor identity.
///
/// The serial number of the first accepted frame becomes the identity for
/// the rest of the session: any frame carrying a different serial is
/// rejected without touching the published reading. This catches a sensor
/// swap (or a neighbor's sensor bleeding onto the wire) mid-session.
#[derive(Debug, Default)]
pub struct SessionValidator {
    serial: Option<i64>,
    latest: Option<SensorReading>,
}

impl SessionValidator {
    /// Create a validator with no latched identity.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            serial: None,
            latest: None,
        }
    }

    /// Validate a frame and, on success, publish its reading.
    ///
    /// The first frame latches the identity and is accepted
    /// unconditionally. Ozone and humidity are clamped at zero — the
    /// sensor reports small negative ozone values around the detection
    /// limit — while temperature is passed through, negative values being
    /// physically valid.
    pub fn accept(&mut self, frame: &TelemetryFrame) -> Result<SensorReading, SessionError> {
        match self.serial {
            Some(expected) if expected != frame.serial => {
                return Err(SessionError::SerialMismatch {
                    expected,
                    received: frame.serial,
                });
            }
            Some(_) => {}
            None => self.serial = Some(frame.serial),
        }

        let reading = SensorReading {
            o3_ppb: clamp_unsigned(frame.o3_ppb),
            temperature_c: narrow_signed(frame.temperature_c),
            humidity_pct: clamp_unsigned(frame.humidity_pct),
        };
        self.latest = Some(reading);
        Ok(reading)
    }

    /// The most recently published reading, if any frame was accepted.
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<SensorReading> {
        self.latest
    }

    /// The latched serial number, if a first frame was accepted.
    #[inline]
    #[must_use]
    pub fn serial(&self) -> Option<i64> {
        self.serial
    }
}

#[inline]
fn clamp_unsigned(value: i64) -> u16 {
    value.clamp(0, u16::MAX as i64) as u16
}

#[inline]
fn narrow_signed(value: i64) -> i16 {
    value.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}
