//! Firmware core for a 4-digit, 7-segment stopwatch and voltmeter.
//!
//! The display is fed through a serial-to-parallel shift register and multiplexed one digit at a
//! time.  It shows either the elapsed time as `MM:SS` or an analog input as `X.YY` volts, and two
//! active-low buttons reset the time and switch modes.
//!
//! The pieces, from the bottom up:
//!
//! - [`font`]: segment patterns for the digits
//! - [`ShiftOut`] and [`ShiftRegister`]: the 3-wire bus to the display
//! - [`TickState`]: the two periodic triggers and the state they share with the main loop
//! - [`Multiplexer`]: picks the next digit and what to show on it
//! - [`InputMonitor`]: turns button samples into reset and mode decisions
//! - [`SegClock`]: one pass of the main loop, tying all of the above together
//!
//! Nothing here touches a specific HAL.  Boards supply Embedded HAL pins, an [`AnalogInput`], and
//! something that calls [`TickState::on_second`] and [`TickState::on_refresh`] on time (with the
//! `embassy-time` feature, [`run_second_ticker`] and [`run_refresh_ticker`] do that part).
#![no_std]

#[cfg(test)]
extern crate std;

mod bus;
pub mod font;
mod keys;
mod mux;
mod tick;

#[cfg(test)]
mod testing;

use core::convert::Infallible;

use embedded_hal_1::digital::InputPin;

pub use bus::*;
pub use keys::*;
pub use mux::*;
pub use tick::*;

/// Failures reported by the hardware behind the seams.
///
/// The display logic itself can't fail; these only carry errors from the collaborators up to the
/// board, which decides whether to log them or give up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<BusError, AnalogError, InputError = Infallible> {
    /// Writing to the shift register failed
    Bus(BusError),

    /// Sampling the analog input failed
    Analog(AnalogError),

    /// Reading a button failed
    Input(InputError),
}

impl<BusError, AnalogError> Error<BusError, AnalogError> {
    /// Re-type an error that can't have come from a button
    fn with_input_error<InputError>(self) -> Error<BusError, AnalogError, InputError> {
        match self {
            Error::Bus(e) => Error::Bus(e),
            Error::Analog(e) => Error::Analog(e),
            Error::Input(never) => match never {},
        }
    }
}

/// Summary of one main-loop iteration, for logging and tests
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Poll {
    /// Mode in effect for this iteration
    pub mode: DisplayMode,

    /// The elapsed time was reset
    pub reset: bool,

    /// Position of the digit that was driven, if a refresh was pending
    pub refreshed: Option<usize>,
}

/// The main controller: everything the main loop owns, plus a borrow of the tick state.
///
/// Start-up (pull-ups, starting the tickers) is the board's job; after that the board calls
/// [`Self::poll`] in a tight loop forever.  No call ever blocks.
///
/// ```
/// # use core::convert::Infallible;
/// use segclock::{AnalogInput, DisplayMode, SegClock, ShiftOut, TickState};
///
/// # struct Bus;
/// # impl ShiftOut for Bus {
/// #     type Error = Infallible;
/// #     fn shift_out(&mut self, _: u8, _: u8) -> Result<(), Infallible> { Ok(()) }
/// # }
/// # struct Pot;
/// # impl AnalogInput for Pot {
/// #     type Error = Infallible;
/// #     fn read_normalized(&mut self) -> Result<f32, Infallible> { Ok(0.5) }
/// # }
/// static STATE: TickState = TickState::new();
///
/// let mut clock = SegClock::new(&STATE, Bus, Pot);
///
/// // Neither button pressed; the refresh that is pending at start-up drives digit 0
/// let poll = clock.poll_levels(false, false).unwrap();
/// assert_eq!(DisplayMode::Time, poll.mode);
/// assert_eq!(Some(0), poll.refreshed);
/// ```
pub struct SegClock<'s, Bus, Adc> {
    state: &'s TickState,
    monitor: InputMonitor,
    mux: Multiplexer,
    bus: Bus,
    analog: Adc,
}

impl<'s, Bus: ShiftOut, Adc: AnalogInput> SegClock<'s, Bus, Adc> {
    pub fn new(state: &'s TickState, bus: Bus, analog: Adc) -> Self {
        Self {
            state,
            monitor: InputMonitor::new(),
            mux: Multiplexer::new(),
            bus,
            analog,
        }
    }

    /// One pass of the main loop, sampling the buttons from their pins
    pub fn poll<Reset, Mode>(
        &mut self,
        reset: &mut Reset,
        mode: &mut Mode,
    ) -> Result<Poll, Error<Bus::Error, Adc::Error, Reset::Error>>
    where
        Reset: InputPin,
        Mode: InputPin<Error = Reset::Error>,
    {
        let decision = self.monitor.poll(reset, mode).map_err(Error::Input)?;

        self.apply(decision).map_err(Error::with_input_error)
    }

    /// One pass of the main loop with button levels that were already sampled.
    ///
    /// `true` means pressed (the pin reads low).
    pub fn poll_levels(
        &mut self,
        reset_low: bool,
        mode_low: bool,
    ) -> Result<Poll, Error<Bus::Error, Adc::Error>> {
        let decision = self.monitor.sample(reset_low, mode_low);

        self.apply(decision)
    }

    /// Apply the button decision, then service the refresh flag if it is set
    fn apply(&mut self, decision: ButtonDecision) -> Result<Poll, Error<Bus::Error, Adc::Error>> {
        if decision.reset {
            #[cfg(feature = "defmt")]
            defmt::debug!("reset at {}", self.state.elapsed());

            self.state.reset_elapsed();
        }

        let refreshed = if self.state.take_refresh() {
            let position = self.mux.active_digit();
            self.mux
                .refresh(decision.mode, self.state, &mut self.bus, &mut self.analog)?;

            Some(position)
        } else {
            None
        };

        Ok(Poll {
            mode: decision.mode,
            reset: decision.reset,
            refreshed,
        })
    }

    /// Give the bus and analog input back
    pub fn release(self) -> (Bus, Adc) {
        (self.bus, self.analog)
    }
}
