//! Accumulates the byte stream into CR/LF-terminated lines.

use dgs_proto::MAX_LINE_LENGTH;
use heapless::Vec;

/// Error type for line assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// The line exceeded [`MAX_LINE_LENGTH`] without a terminator.
    Overflow,
    /// A line feed arrived without a preceding carriage return.
    MalformedTerminator,
}

/// Result of feeding one byte to the assembler.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum FeedOutcome<'a> {
    /// The line is still being accumulated.
    Pending,
    /// A complete line, with the CR/LF terminator stripped.
    Line(&'a [u8]),
    /// The accumulated line was discarded.
    Discarded(LineError),
}

/// Assembles incoming bytes into terminator-delimited lines.
///
/// The line buffer is cleared unconditionally after every completed or
/// discarded line, so a malformed line never contaminates the next one.
/// There is no terminal state; the assembler keeps accepting bytes for the
/// life of the session.
pub struct LineAssembler {
    buf: Vec<u8, MAX_LINE_LENGTH>,
    /// Clear the buffer on the next feed; set after a line completes so
    /// the slice handed to the caller stays borrowable until then.
    flush: bool,
}

impl LineAssembler {
    /// Create an empty assembler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            flush: false,
        }
    }

    /// Feed one byte.
    ///
    /// Returns [`FeedOutcome::Line`] when the byte completes a well-formed
    /// CR/LF-terminated line. A line feed without a carriage return before
    /// it discards the line ([`LineError::MalformedTerminator`]), and a
    /// byte that would not fit discards everything accumulated so far
    /// ([`LineError::Overflow`]); either way the next byte starts a fresh
    /// line.
    pub fn feed(&mut self, byte: u8) -> FeedOutcome<'_> {
        if self.flush {
            self.buf.clear();
            self.flush = false;
        }

        if self.buf.push(byte).is_err() {
            self.buf.clear();
            return FeedOutcome::Discarded(LineError::Overflow);
        }

        if byte == b'\n' {
            self.flush = true;
            let len = self.buf.len();
            if len >= 2 && self.buf[len - 2] == b'\r' {
                return FeedOutcome::Line(&self.buf[..len - 2]);
            }
            return FeedOutcome::Discarded(LineError::MalformedTerminator);
        }

        FeedOutcome::Pending
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    /// Feed bytes that must all leave the assembler pending.
    fn feed_expect_pending(asm: &mut LineAssembler, bytes: &[u8]) {
        for &b in bytes {
            assert_eq!(asm.feed(b), FeedOutcome::Pending);
        }
    }

    #[test]
    fn test_crlf_line_completes() {
        let mut asm = LineAssembler::new();
        feed_expect_pending(&mut asm, b"1,2,3\r");
        assert_eq!(asm.feed(b'\n'), FeedOutcome::Line(b"1,2,3"));
    }

    #[test]
    fn test_empty_line() {
        let mut asm = LineAssembler::new();
        assert_eq!(asm.feed(b'\r'), FeedOutcome::Pending);
        assert_eq!(asm.feed(b'\n'), FeedOutcome::Line(b""));
    }

    #[test]
    fn test_bare_line_feed_is_malformed() {
        let mut asm = LineAssembler::new();
        feed_expect_pending(&mut asm, b"1,2,3");
        assert_eq!(
            asm.feed(b'\n'),
            FeedOutcome::Discarded(LineError::MalformedTerminator)
        );
    }

    #[test]
    fn test_lone_line_feed_is_malformed() {
        let mut asm = LineAssembler::new();
        assert_eq!(
            asm.feed(b'\n'),
            FeedOutcome::Discarded(LineError::MalformedTerminator)
        );
    }

    #[test]
    fn test_no_state_leaks_after_malformed_line() {
        let mut asm = LineAssembler::new();
        feed_expect_pending(&mut asm, b"garbage");
        let _ = asm.feed(b'\n');

        feed_expect_pending(&mut asm, b"4,5\r");
        assert_eq!(asm.feed(b'\n'), FeedOutcome::Line(b"4,5"));
    }

    #[test]
    fn test_overflow_discards_and_recovers() {
        let mut asm = LineAssembler::new();
        for _ in 0..MAX_LINE_LENGTH {
            assert_eq!(asm.feed(b'x'), FeedOutcome::Pending);
        }
        assert_eq!(asm.feed(b'x'), FeedOutcome::Discarded(LineError::Overflow));

        // No partial line survives; the next line parses normally
        feed_expect_pending(&mut asm, b"7\r");
        assert_eq!(asm.feed(b'\n'), FeedOutcome::Line(b"7"));
    }

    #[test]
    fn test_line_of_exactly_max_length_completes() {
        let mut asm = LineAssembler::new();
        for _ in 0..MAX_LINE_LENGTH - 2 {
            assert_eq!(asm.feed(b'x'), FeedOutcome::Pending);
        }
        assert_eq!(asm.feed(b'\r'), FeedOutcome::Pending);
        match asm.feed(b'\n') {
            FeedOutcome::Line(line) => assert_eq!(line.len(), MAX_LINE_LENGTH - 2),
            other => panic!("expected completed line, got {other:?}"),
        }
    }
}
