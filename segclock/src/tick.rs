//! The two periodic triggers and the state they share with the main loop.
//!
//! Only two cells are ever touched from the tick context: the elapsed-seconds counter and the
//! refresh-pending flag.  Everything else (which digit is next, which mode is showing, the previous
//! button sample) belongs to the main loop alone, which is why no lock is needed anywhere.  Both
//! cells are atomics so the same code is correct whether the ticks come from a real interrupt, a
//! higher-priority executor, or another thread in a host test.

use portable_atomic::{AtomicBool, AtomicU16, Ordering};

/// The counter rolls over here, which is one past 99:59
pub const SECONDS_WRAP: u16 = 6000;

/// Period of the slow trigger that advances the elapsed time
pub const SECOND_PERIOD_MS: u64 = 1000;

/// Period of the fast trigger that requests a display refresh (500 Hz)
pub const REFRESH_PERIOD_US: u64 = 2000;

/// Whole seconds elapsed since power-up or the last reset, always below [`SECONDS_WRAP`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElapsedTime(u16);

impl ElapsedTime {
    pub const ZERO: Self = Self(0);

    /// 99:59
    pub const MAX: Self = Self(SECONDS_WRAP - 1);

    /// Values past 99:59 wrap the same way the counter does
    pub const fn from_seconds(seconds: u16) -> Self {
        Self(seconds % SECONDS_WRAP)
    }

    pub const fn as_seconds(self) -> u16 {
        self.0
    }

    /// Minutes part of the MM:SS reading, `0..=99`
    pub const fn minutes(self) -> u8 {
        (self.0 / 60) as u8
    }

    /// Seconds part of the MM:SS reading, `0..=59`
    pub const fn seconds(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// The value one slow tick later
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % SECONDS_WRAP)
    }
}

/// State written from the tick context and read by the main loop.
///
/// Meant to live in a `static`:
///
/// ```
/// use segclock::TickState;
///
/// static STATE: TickState = TickState::new();
///
/// STATE.on_second();
/// assert_eq!(1, STATE.elapsed().as_seconds());
/// ```
pub struct TickState {
    elapsed: AtomicU16,
    refresh_pending: AtomicBool,
}

impl TickState {
    /// Start at 00:00 with a refresh already pending, so the first loop iteration paints a digit
    /// without waiting for the fast trigger.
    pub const fn new() -> Self {
        Self::starting_at(ElapsedTime::ZERO)
    }

    pub const fn starting_at(elapsed: ElapsedTime) -> Self {
        Self {
            elapsed: AtomicU16::new(elapsed.0),
            refresh_pending: AtomicBool::new(true),
        }
    }

    /// Slow trigger handler: advance the elapsed time by one second, wrapping after 99:59.
    ///
    /// The increment and wrap happen as one atomic update, so a reset from the main loop landing
    /// at the same moment is either fully before or fully after it.
    pub fn on_second(&self) {
        // The closure never returns `None`, so this can't fail
        let _ = self
            .elapsed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |seconds| {
                Some(ElapsedTime(seconds).next().0)
            });
    }

    /// Fast trigger handler: ask the main loop to drive the next digit
    pub fn on_refresh(&self) {
        self.refresh_pending.store(true, Ordering::Release);
    }

    pub fn elapsed(&self) -> ElapsedTime {
        ElapsedTime(self.elapsed.load(Ordering::Acquire))
    }

    /// Back to 00:00
    pub fn reset_elapsed(&self) {
        self.elapsed.store(0, Ordering::Release);
    }

    /// Check and clear the refresh flag in one step.
    ///
    /// Returns `true` at most once per fast tick.  A tick that fires after this call sets the flag
    /// again for the next iteration, it is never swallowed.  Ticks that fire while a request is
    /// already pending are coalesced into that one request.
    pub fn take_refresh(&self) -> bool {
        self.refresh_pending.swap(false, Ordering::AcqRel)
    }
}

impl Default for TickState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embassy-time")]
mod embassy_time_ticker {
    use embassy_time::{Duration, Ticker};

    use super::{TickState, REFRESH_PERIOD_US, SECOND_PERIOD_MS};

    /// Drive [`TickState::on_second`] at 1 Hz, forever.
    ///
    /// `Ticker` schedules against absolute deadlines, so a late wakeup doesn't make the clock
    /// drift.
    pub async fn run_second_ticker(state: &TickState) -> ! {
        let mut ticker = Ticker::every(Duration::from_millis(SECOND_PERIOD_MS));

        loop {
            ticker.next().await;
            state.on_second();
        }
    }

    /// Drive [`TickState::on_refresh`] at 500 Hz, forever.
    pub async fn run_refresh_ticker(state: &TickState) -> ! {
        let mut ticker = Ticker::every(Duration::from_micros(REFRESH_PERIOD_US));

        loop {
            ticker.next().await;
            state.on_refresh();
        }
    }
}

#[cfg(feature = "embassy-time")]
pub use embassy_time_ticker::{run_refresh_ticker, run_second_ticker};
