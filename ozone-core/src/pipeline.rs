//! SensorPipeline: drains the receive ring through assembly, parsing, and
//! validation.

use crate::assembler::{FeedOutcome, LineAssembler, LineError};
use crate::ring::RxConsumer;
use crate::session::{SessionError, SessionValidator};
use dgs_proto::{parse_frame, ParseError, SensorReading};

/// Event counters for the pipeline.
///
/// Every malformed-input condition is counted here in addition to being
/// logged; none of them is ever surfaced as an error to the caller of
/// [`SensorPipeline::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PipelineStats {
    /// Bytes lost because the receive ring was full.
    pub bytes_dropped: u32,
    /// Lines discarded for exceeding the line buffer.
    pub line_overflows: u32,
    /// Lines discarded for a line feed without carriage return.
    pub bad_terminators: u32,
    /// Lines discarded for having the wrong number of fields.
    pub field_count_errors: u32,
    /// Frames discarded for carrying an unexpected serial number.
    pub serial_mismatches: u32,
    /// Frames accepted and published.
    pub frames_accepted: u32,
}

impl PipelineStats {
    /// Sum of all error counters; useful as a single health indicator.
    #[must_use]
    pub const fn error_total(&self) -> u32 {
        self.bytes_dropped
            .saturating_add(self.line_overflows)
            .saturating_add(self.bad_terminators)
            .saturating_add(self.field_count_errors)
            .saturating_add(self.serial_mismatches)
    }
}

/// The byte-to-reading pipeline for one sensor session.
///
/// Owns the consumer half of the receive ring plus the line assembler and
/// session validator, and advances all of them from [`tick`](Self::tick).
/// The producing context keeps the [`RxProducer`](crate::ring::RxProducer)
/// and is the only other party touching shared state.
pub struct SensorPipeline<'a, const N: usize> {
    rx: RxConsumer<'a, N>,
    assembler: LineAssembler,
    validator: SessionValidator,
    stats: PipelineStats,
}

impl<'a, const N: usize> SensorPipeline<'a, N> {
    /// Create a pipeline draining the given consumer half.
    #[must_use]
    pub fn new(rx: RxConsumer<'a, N>) -> Self {
        Self {
            rx,
            assembler: LineAssembler::new(),
            validator: SessionValidator::new(),
            stats: PipelineStats::default(),
        }
    }

    /// Drain all currently buffered bytes and advance the pipeline.
    ///
    /// Processes whatever accumulated since the last invocation — call it
    /// often enough relative to the wire baud rate and ring capacity to
    /// avoid sustained overruns. Malformed input of any kind is logged,
    /// counted, and discarded; the only caller-visible effect is that
    /// [`latest_reading`](Self::latest_reading) does not advance.
    pub fn tick(&mut self) {
        let dropped = self.rx.take_dropped();
        if dropped > 0 {
            warn!("receive ring overrun, {} bytes dropped", dropped);
            self.stats.bytes_dropped = self.stats.bytes_dropped.saturating_add(dropped);
        }

        while let Some(byte) = self.rx.pop() {
            self.handle_byte(byte);
        }
    }

    /// The most recently accepted reading, or `None` if no frame has ever
    /// been accepted.
    #[inline]
    #[must_use]
    pub fn latest_reading(&self) -> Option<SensorReading> {
        self.validator.latest()
    }

    /// The serial number latched on the first accepted frame.
    #[inline]
    #[must_use]
    pub fn latched_serial(&self) -> Option<i64> {
        self.validator.serial()
    }

    /// Snapshot of the event counters.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    fn handle_byte(&mut self, byte: u8) {
        let line = match self.assembler.feed(byte) {
            FeedOutcome::Pending => return,
            FeedOutcome::Line(line) => line,
            FeedOutcome::Discarded(LineError::Overflow) => {
                error!("line buffer overflow, discarding partial line");
                self.stats.line_overflows = self.stats.line_overflows.saturating_add(1);
                return;
            }
            FeedOutcome::Discarded(LineError::MalformedTerminator) => {
                error!("line feed without carriage return, discarding line");
                self.stats.bad_terminators = self.stats.bad_terminators.saturating_add(1);
                return;
            }
        };

        match parse_frame(line) {
            Ok(frame) => match self.validator.accept(&frame) {
                Ok(_) => {
                    self.stats.frames_accepted = self.stats.frames_accepted.saturating_add(1);
                    debug!(
                        "frame accepted: sn={} o3={}ppb t={}C rh={}% adc={} t_raw={} rh_raw={} up={}d {}:{}:{}",
                        frame.serial,
                        frame.o3_ppb,
                        frame.temperature_c,
                        frame.humidity_pct,
                        frame.adc_raw,
                        frame.temperature_raw,
                        frame.humidity_raw,
                        frame.day,
                        frame.hour,
                        frame.minute,
                        frame.second,
                    );
                }
                Err(SessionError::SerialMismatch { expected, received }) => {
                    error!(
                        "unexpected serial number: {} vs latched {}",
                        received, expected
                    );
                    self.stats.serial_mismatches = self.stats.serial_mismatches.saturating_add(1);
                }
            },
            Err(ParseError::TooFewFields(count)) => {
                error!("malformed frame, too few fields: {}", count);
                self.stats.field_count_errors = self.stats.field_count_errors.saturating_add(1);
            }
            Err(ParseError::TooManyFields) => {
                error!("malformed frame, too many fields");
                self.stats.field_count_errors = self.stats.field_count_errors.saturating_add(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::ring::{RxProducer, RxRing};

    const RING: usize = 2048;

    fn feed<const N: usize>(tx: &mut RxProducer<'_, N>, bytes: &[u8]) {
        for &b in bytes {
            assert!(tx.push(b));
        }
    }

    #[test]
    fn test_first_frame_publishes_and_latches() {
        let mut ring = RxRing::<RING>::new();
        let (mut tx, rx) = ring.split();
        let mut pipeline = SensorPipeline::new(rx);

        feed(&mut tx, b"1,2,3,4,5,6,7,8,9,10,11\r\n");
        pipeline.tick();

        let reading = pipeline.latest_reading().unwrap();
        assert_eq!(reading.o3_ppb, 2);
        assert_eq!(reading.temperature_c, 3);
        assert_eq!(reading.humidity_pct, 4);
        assert_eq!(pipeline.latched_serial(), Some(1));
        assert_eq!(pipeline.stats().frames_accepted, 1);
        assert_eq!(pipeline.stats().error_total(), 0);
    }

    #[test]
    fn test_tick_on_empty_ring_is_a_no_op() {
        let mut ring = RxRing::<RING>::new();
        let (_tx, rx) = ring.split();
        let mut pipeline = SensorPipeline::new(rx);

        pipeline.tick();
        assert_eq!(pipeline.latest_reading(), None);
        assert_eq!(pipeline.stats(), PipelineStats::default());
    }

    #[test]
    fn test_partial_line_spans_ticks() {
        let mut ring = RxRing::<RING>::new();
        let (mut tx, rx) = ring.split();
        let mut pipeline = SensorPipeline::new(rx);

        feed(&mut tx, b"1,2,3,4,5,");
        pipeline.tick();
        assert_eq!(pipeline.latest_reading(), None);

        feed(&mut tx, b"6,7,8,9,10,11\r\n");
        pipeline.tick();
        assert_eq!(pipeline.latest_reading().unwrap().o3_ppb, 2);
    }

    #[test]
    fn test_short_frame_leaves_reading_unchanged() {
        let mut ring = RxRing::<RING>::new();
        let (mut tx, rx) = ring.split();
        let mut pipeline = SensorPipeline::new(rx);

        feed(&mut tx, b"1,2,3,4,5,6,7,8,9,10,11\r\n");
        feed(&mut tx, b"1,2,3\r\n");
        pipeline.tick();

        assert_eq!(pipeline.stats().field_count_errors, 1);
        assert_eq!(pipeline.stats().frames_accepted, 1);
        assert_eq!(pipeline.latest_reading().unwrap().o3_ppb, 2);
    }

    #[test]
    fn test_twelve_field_frame_is_discarded() {
        let mut ring = RxRing::<RING>::new();
        let (mut tx, rx) = ring.split();
        let mut pipeline = SensorPipeline::new(rx);

        feed(&mut tx, b"1,2,3,4,5,6,7,8,9,10,11,12\r\n");
        pipeline.tick();

        assert_eq!(pipeline.stats().field_count_errors, 1);
        assert_eq!(pipeline.latest_reading(), None);
    }

    #[test]
    fn test_malformed_terminator_then_clean_recovery() {
        let mut ring = RxRing::<RING>::new();
        let (mut tx, rx) = ring.split();
        let mut pipeline = SensorPipeline::new(rx);

        feed(&mut tx, b"1,2,3\n");
        feed(&mut tx, b"1,2,3,4,5,6,7,8,9,10,11\r\n");
        pipeline.tick();

        assert_eq!(pipeline.stats().bad_terminators, 1);
        assert_eq!(pipeline.stats().frames_accepted, 1);
        assert_eq!(pipeline.latest_reading().unwrap().o3_ppb, 2);
    }

    #[test]
    fn test_serial_latch_session() {
        let mut ring = RxRing::<RING>::new();
        let (mut tx, rx) = ring.split();
        let mut pipeline = SensorPipeline::new(rx);

        feed(&mut tx, b"1000,1,2,3,4,5,6,7,8,9,10\r\n");
        feed(&mut tx, b"1000,5,2,3,4,5,6,7,8,9,10\r\n");
        feed(&mut tx, b"2000,9,9,9,9,9,9,9,9,9,9\r\n");
        pipeline.tick();

        assert_eq!(pipeline.latched_serial(), Some(1000));
        assert_eq!(pipeline.stats().frames_accepted, 2);
        assert_eq!(pipeline.stats().serial_mismatches, 1);
        assert_eq!(pipeline.latest_reading().unwrap().o3_ppb, 5);
    }

    #[test]
    fn test_clamping_through_the_full_pipeline() {
        let mut ring = RxRing::<RING>::new();
        let (mut tx, rx) = ring.split();
        let mut pipeline = SensorPipeline::new(rx);

        feed(&mut tx, b"1,-3,-3,45,0,0,0,0,0,0,0\r\n");
        pipeline.tick();

        let reading = pipeline.latest_reading().unwrap();
        assert_eq!(reading.o3_ppb, 0);
        assert_eq!(reading.temperature_c, -3);
        assert_eq!(reading.humidity_pct, 45);
    }

    #[test]
    fn test_line_overflow_then_clean_recovery() {
        let mut ring = RxRing::<RING>::new();
        let (mut tx, rx) = ring.split();
        let mut pipeline = SensorPipeline::new(rx);

        // More bytes than the line buffer holds, with no terminator
        for _ in 0..dgs_proto::MAX_LINE_LENGTH + 1 {
            assert!(tx.push(b'x'));
        }
        pipeline.tick();
        assert_eq!(pipeline.stats().line_overflows, 1);
        assert_eq!(pipeline.latest_reading(), None);

        feed(&mut tx, b"1,2,3,4,5,6,7,8,9,10,11\r\n");
        pipeline.tick();
        assert_eq!(pipeline.stats().frames_accepted, 1);
        assert_eq!(pipeline.latest_reading().unwrap().o3_ppb, 2);
    }

    #[test]
    fn test_ring_overrun_is_counted_not_fatal() {
        let mut ring = RxRing::<8>::new();
        let (mut tx, rx) = ring.split();
        let mut pipeline = SensorPipeline::new(rx);

        for _ in 0..7 {
            assert!(tx.push(b'x'));
        }
        assert!(!tx.push(b'x'));
        assert!(!tx.push(b'x'));
        pipeline.tick();

        assert_eq!(pipeline.stats().bytes_dropped, 2);
        assert_eq!(pipeline.latest_reading(), None);
    }
}
