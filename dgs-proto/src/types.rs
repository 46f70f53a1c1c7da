//! Core telemetry types: TelemetryFrame and SensorReading.

/// Number of comma-separated fields in one telemetry line.
pub const FIELD_COUNT: usize = 11;

/// One decoded telemetry line, in wire order.
///
/// All fields arrive as signed decimal text and are decoded to `i64`
/// without further interpretation. The first four fields carry the sensor
/// identity and the calibrated measurements; the rest are raw ADC and
/// uptime diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub struct TelemetryFrame {
    /// Factory-assigned serial number of the sensor module.
    pub serial: i64,
    /// Ozone concentration in parts-per-billion.
    pub o3_ppb: i64,
    /// Temperature in degrees Celsius.
    pub temperature_c: i64,
    /// Relative humidity in percent.
    pub humidity_pct: i64,
    /// Raw gas-channel ADC count.
    pub adc_raw: i64,
    /// Raw temperature-channel ADC count.
    pub temperature_raw: i64,
    /// Raw humidity-channel ADC count.
    pub humidity_raw: i64,
    /// Days since the sensor powered on.
    pub day: i64,
    /// Hours component of the sensor uptime.
    pub hour: i64,
    /// Minutes component of the sensor uptime.
    pub minute: i64,
    /// Seconds component of the sensor uptime.
    pub second: i64,
}

impl TelemetryFrame {
    /// Build a frame from the eleven decoded field values in wire order.
    pub const fn from_values(values: [i64; FIELD_COUNT]) -> Self {
        Self {
            serial: values[0],
            o3_ppb: values[1],
            temperature_c: values[2],
            humidity_pct: values[3],
            adc_raw: values[4],
            temperature_raw: values[5],
            humidity_raw: values[6],
            day: values[7],
            hour: values[8],
            minute: values[9],
            second: values[10],
        }
    }
}

/// A validated sensor reading, as published to the rest of the firmware.
///
/// Only the calibrated measurements survive validation; the raw diagnostic
/// fields of [`TelemetryFrame`] are not carried forward. Field types match
/// the physical ranges: ozone and humidity cannot be negative, temperature
/// can.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    /// Ozone concentration in parts-per-billion, clamped at zero.
    pub o3_ppb: u16,
    /// Temperature in degrees Celsius. Negative values are valid.
    pub temperature_c: i16,
    /// Relative humidity in percent, clamped at zero.
    pub humidity_pct: u16,
}
