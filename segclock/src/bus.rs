//! Module describing the [`ShiftOut`] trait and the bit-banging implementation that drives the
//! serial-to-parallel shift register behind the display.

use embedded_hal_1::digital::OutputPin;

/// Byte-level interface to the shift register chain that feeds the display.
///
/// One call sends a segment pattern followed by a digit-select mask, and both only become visible
/// on the register's parallel outputs when the whole 16 bits are in.  Anything that can honor that
/// contract can stand in for the bit-banged [`ShiftRegister`], which is also how the multiplexer is
/// tested without hardware.
pub trait ShiftOut {
    type Error;

    /// Shift out `segments` then `digit_select`, each MSB first, and latch them together.
    fn shift_out(&mut self, segments: u8, digit_select: u8) -> Result<(), Self::Error>;
}

/// Bit-banging implementation of [`ShiftOut`] on top of three Embedded HAL output pins.
///
/// The wire protocol, which any replacement driver must reproduce:
///
/// 1. latch low
/// 2. for each bit of `segments`, bit 7 down to bit 0: set data, then pulse clock low-then-high
/// 3. the same for `digit_select`
/// 4. latch high, which copies the shift stage to the outputs in one step
///
/// Holding the latch low for the whole transfer is what keeps half-shifted contents off the
/// digits.
pub struct ShiftRegister<Latch, Clock, Data> {
    latch: Latch,
    clock: Clock,
    data: Data,
}

impl<Latch, Clock, Data, E> ShiftRegister<Latch, Clock, Data>
where
    Latch: OutputPin<Error = E>,
    Clock: OutputPin<Error = E>,
    Data: OutputPin<Error = E>,
{
    pub fn new(latch: Latch, clock: Clock, data: Data) -> Self {
        Self { latch, clock, data }
    }

    /// Give the pins back
    pub fn release(self) -> (Latch, Clock, Data) {
        (self.latch, self.clock, self.data)
    }

    /// Shift the byte value out on the data pin, MSB first.
    ///
    /// The register samples data on the rising clock edge, so data is always set while the clock
    /// is still high from the previous bit, and only then is the clock pulsed.
    fn shift_byte_out(&mut self, b: u8) -> Result<(), E> {
        for bit in (0..8).rev() {
            let value = (b >> bit) & 1 != 0;

            self.data.set_state(value.into())?;

            self.clock.set_low()?;
            self.clock.set_high()?;
        }

        Ok(())
    }
}

impl<Latch, Clock, Data, E> ShiftOut for ShiftRegister<Latch, Clock, Data>
where
    Latch: OutputPin<Error = E>,
    Clock: OutputPin<Error = E>,
    Data: OutputPin<Error = E>,
{
    type Error = E;

    fn shift_out(&mut self, segments: u8, digit_select: u8) -> Result<(), Self::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "shift out segments = {=u8:x} select = {=u8:x}",
            segments,
            digit_select
        );

        self.latch.set_low()?;
        self.shift_byte_out(segments)?;
        self.shift_byte_out(digit_select)?;
        self.latch.set_high()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingPin, Wire, WireLog};
    use std::vec::Vec;

    fn shift(segments: u8, digit_select: u8) -> (Vec<(Wire, bool)>, WireLog) {
        let (latch, clock, data, log) = RecordingPin::triple();
        let mut register = ShiftRegister::new(latch, clock, data);

        register.shift_out(segments, digit_select).unwrap();

        let events = log.borrow().clone();
        (events, log)
    }

    /// Pull the value of the data wire at each rising clock edge
    fn sampled_bits(events: &[(Wire, bool)]) -> Vec<bool> {
        let mut data = false;
        let mut bits = Vec::new();

        for (wire, level) in events {
            match wire {
                Wire::Data => data = *level,
                Wire::Clock if *level => bits.push(data),
                _ => {}
            }
        }

        bits
    }

    #[test]
    fn latch_brackets_the_transfer() {
        let (events, _) = shift(0xA4, 0xF2);

        assert_eq!(events.first(), Some(&(Wire::Latch, false)));
        assert_eq!(events.last(), Some(&(Wire::Latch, true)));

        // No latch activity in between, so nothing reaches the outputs mid-shift
        let latch_writes = events.iter().filter(|(w, _)| *w == Wire::Latch).count();
        assert_eq!(2, latch_writes);
    }

    #[test]
    fn bits_go_out_msb_first_segments_then_select() {
        let segments = 0b1010_0100u8;
        let digit_select = 0b1111_0010u8;
        let (events, _) = shift(segments, digit_select);

        let bits = sampled_bits(&events);
        assert_eq!(16, bits.len());

        let expected: Vec<bool> = (0..8)
            .rev()
            .map(|bit| (segments >> bit) & 1 != 0)
            .chain((0..8).rev().map(|bit| (digit_select >> bit) & 1 != 0))
            .collect();

        assert_eq!(expected, bits);
    }

    #[test]
    fn data_settles_before_each_clock_pulse() {
        let (events, _) = shift(0x00, 0xFF);

        // Skip the leading latch edge; the rest (minus the trailing latch) is 16 groups of
        // data, clock low, clock high
        let body = &events[1..events.len() - 1];
        assert_eq!(16 * 3, body.len());

        for group in body.chunks(3) {
            assert_eq!(Wire::Data, group[0].0);
            assert_eq!((Wire::Clock, false), group[1]);
            assert_eq!((Wire::Clock, true), group[2]);
        }
    }

    #[test]
    fn identical_calls_produce_identical_wire_traffic() {
        let (first, _) = shift(0x92, 0xF8);
        let (second, _) = shift(0x92, 0xF8);
        assert_eq!(first, second);

        // And a second call on the same driver repeats the first exactly
        let (latch, clock, data, log) = RecordingPin::triple();
        let mut register = ShiftRegister::new(latch, clock, data);
        register.shift_out(0x92, 0xF8).unwrap();
        register.shift_out(0x92, 0xF8).unwrap();

        let events = log.borrow();
        let (a, b) = events.split_at(events.len() / 2);
        assert_eq!(a, b);
        assert_eq!(a, &first[..]);
    }

    #[test]
    fn release_returns_the_pins() {
        let (latch, clock, data, log) = RecordingPin::triple();
        let register = ShiftRegister::new(latch, clock, data);

        let (mut latch, _clock, _data) = register.release();
        latch.set_high().unwrap();

        assert_eq!(&[(Wire::Latch, true)], &log.borrow()[..]);
    }
}
