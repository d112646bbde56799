//! Digit multiplexing: one digit per refresh, round-robin across the four positions.
//!
//! Only one digit conducts at a time.  Each refresh picks the next position, works out its segment
//! pattern from whatever the current mode shows, and sends that pattern together with the
//! position's select byte.  At 500 refreshes per second each digit is lit 125 times a second, which
//! is plenty for persistence of vision to show all four at once.

use crate::font::{self, BLANK};
use crate::tick::{ElapsedTime, TickState};
use crate::{Error, ShiftOut};

/// Number of digit positions on the display
pub const DIGIT_COUNT: usize = 4;

/// Digit-select byte for each position, left to right.
///
/// The low nibble has exactly one bit set, picking the single digit that conducts; the high
/// nibble is unused by the board and left high.
pub const DIGIT_ENABLE: [u8; DIGIT_COUNT] = [0xF1, 0xF2, 0xF4, 0xF8];

/// Analog reading of 1.0 corresponds to this many volts
pub const FULL_SCALE_VOLTS: f32 = 3.3;

/// 9.99 V, the most the `X.YY` layout can show
pub const MAX_CENTIVOLTS: u16 = 999;

/// What the display is showing
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::VariantArray)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Elapsed time as `MM:SS`
    Time,
    /// Analog input as `X.YY` volts, rightmost digit blank
    Voltage,
}

/// Source of the normalized analog reading shown in [`DisplayMode::Voltage`].
///
/// Embedded HAL 1.0 has no ADC abstraction, so boards implement this directly on top of whatever
/// their HAL offers.
pub trait AnalogInput {
    type Error;

    /// Sample the input, scaled so that `0.0` is ground and `1.0` is full scale
    fn read_normalized(&mut self) -> Result<f32, Self::Error>;
}

/// Convert a normalized analog reading into whole hundredths of a volt.
///
/// The fraction is truncated, not rounded.  Anything above [`MAX_CENTIVOLTS`] saturates to it, and
/// negative or NaN readings come out as zero, so the result always fits three digits.
pub fn centivolts(normalized: f32) -> u16 {
    let volts = normalized * FULL_SCALE_VOLTS;

    // `as` saturates at the i32 bounds and maps NaN to 0
    let cv = (volts * 100.0) as i32;

    cv.clamp(0, MAX_CENTIVOLTS as i32) as u16
}

/// One sample of whatever the current mode displays
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    Time(ElapsedTime),
    Voltage {
        /// Already clamped to [`MAX_CENTIVOLTS`]
        centivolts: u16,
    },
}

impl Reading {
    /// Segment pattern for the digit at `position` (`0` is the leftmost).
    ///
    /// Time is laid out as `M M : S S` with the colon on position 1.  Voltage is laid out as
    /// `V . V V _` with the decimal point on position 0 and position 3 dark.
    pub fn pattern(&self, position: usize) -> u8 {
        match *self {
            Reading::Time(elapsed) => {
                let mins = elapsed.minutes();
                let secs = elapsed.seconds();

                match position {
                    0 => font::encode(mins / 10),
                    1 => font::with_colon(font::encode(mins % 10)),
                    2 => font::encode(secs / 10),
                    3 => font::encode(secs % 10),
                    _ => BLANK,
                }
            }
            Reading::Voltage { centivolts } => {
                let centivolts = centivolts.min(MAX_CENTIVOLTS);
                let int_part = (centivolts / 100) as u8;
                let frac_part = (centivolts % 100) as u8;

                match position {
                    0 => font::with_decimal(font::encode(int_part)),
                    1 => font::encode(frac_part / 10),
                    2 => font::encode(frac_part % 10),
                    _ => BLANK,
                }
            }
        }
    }
}

/// Drives one digit per call, cycling through the positions.
///
/// The mode is passed on every call instead of being latched at the start of a cycle, so a mode
/// switch takes effect on the very next digit.  A switch in the middle of a cycle can therefore
/// leave one frame with digits from both modes; it is gone on the next cycle.
#[derive(Clone, Debug, Default)]
pub struct Multiplexer {
    active: usize,
}

impl Multiplexer {
    pub const fn new() -> Self {
        Self { active: 0 }
    }

    /// Position the next call to [`Self::refresh`] will drive
    pub fn active_digit(&self) -> usize {
        self.active
    }

    /// Take the reading the mode calls for.  Voltage mode samples the analog input fresh.
    pub fn read<A: AnalogInput>(
        mode: DisplayMode,
        state: &TickState,
        analog: &mut A,
    ) -> Result<Reading, A::Error> {
        match mode {
            DisplayMode::Time => Ok(Reading::Time(state.elapsed())),
            DisplayMode::Voltage => {
                let normalized = analog.read_normalized()?;

                Ok(Reading::Voltage {
                    centivolts: centivolts(normalized),
                })
            }
        }
    }

    /// Drive the active digit with data for `mode`, then move on to the next position.
    ///
    /// The position advances even if reading the input or writing the bus fails, so one bad
    /// sample leaves a single digit stale rather than freezing the whole display on it.
    pub fn refresh<Bus: ShiftOut, Adc: AnalogInput>(
        &mut self,
        mode: DisplayMode,
        state: &TickState,
        bus: &mut Bus,
        analog: &mut Adc,
    ) -> Result<(), Error<Bus::Error, Adc::Error>> {
        let position = self.active;
        self.active = (self.active + 1) % DIGIT_COUNT;

        let reading = Self::read(mode, state, analog).map_err(Error::Analog)?;
        let segments = reading.pattern(position);

        #[cfg(feature = "defmt")]
        defmt::trace!("digit {=usize} <- {=u8:x} ({})", position, segments, reading);

        bus.shift_out(segments, DIGIT_ENABLE[position])
            .map_err(Error::Bus)
    }
}
