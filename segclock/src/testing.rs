//! Fakes for the hardware seams, shared by the tests in this crate

use core::cell::RefCell;
use core::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal_1::digital::{ErrorType, OutputPin};

use crate::{AnalogInput, ShiftOut};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Wire {
    Latch,
    Clock,
    Data,
}

pub type WireLog = Rc<RefCell<Vec<(Wire, bool)>>>;

/// Output pin that appends every write to a log shared with its sibling pins, so the relative
/// order of writes across all three wires can be checked.
pub struct RecordingPin {
    wire: Wire,
    log: WireLog,
}

impl RecordingPin {
    /// Latch, clock and data pins writing to one log
    pub fn triple() -> (RecordingPin, RecordingPin, RecordingPin, WireLog) {
        let log = WireLog::default();
        let pin = |wire| RecordingPin {
            wire,
            log: log.clone(),
        };

        (
            pin(Wire::Latch),
            pin(Wire::Clock),
            pin(Wire::Data),
            log.clone(),
        )
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push((self.wire, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push((self.wire, true));
        Ok(())
    }
}

/// Keeps every `(segments, digit_select)` pair it was asked to send
#[derive(Default)]
pub struct FrameRecorder {
    pub frames: Vec<(u8, u8)>,
}

impl ShiftOut for FrameRecorder {
    type Error = Infallible;

    fn shift_out(&mut self, segments: u8, digit_select: u8) -> Result<(), Self::Error> {
        self.frames.push((segments, digit_select));
        Ok(())
    }
}

/// A bus that never works
#[derive(Default)]
pub struct BrokenBus {
    pub attempts: usize,
}

impl ShiftOut for BrokenBus {
    type Error = ();

    fn shift_out(&mut self, _segments: u8, _digit_select: u8) -> Result<(), Self::Error> {
        self.attempts += 1;
        Err(())
    }
}

/// Analog input that always reads the same value
pub struct FixedAnalog(pub f32);

impl AnalogInput for FixedAnalog {
    type Error = Infallible;

    fn read_normalized(&mut self) -> Result<f32, Self::Error> {
        Ok(self.0)
    }
}

/// Analog input that can be told to fail
pub struct FlakyAnalog {
    pub value: f32,
    pub fail: bool,
}

impl AnalogInput for FlakyAnalog {
    type Error = ();

    fn read_normalized(&mut self) -> Result<f32, Self::Error> {
        if self.fail {
            Err(())
        } else {
            Ok(self.value)
        }
    }
}
