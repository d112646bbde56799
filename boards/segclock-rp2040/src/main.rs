//! Stopwatch and voltmeter on a Pi Pico, driving a 4-digit 7-segment display through a shift
//! register.
//!
//! The two tickers run on an interrupt executor so they preempt the main loop the same way timer
//! interrupts would.  The main loop itself runs in thread mode, never awaits, and just calls
//! [`SegClock::poll`] as fast as it can.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::InterruptExecutor;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{ADC, PIN_26};
use {defmt_rtt as _, panic_probe as _};

use segclock::{AnalogInput, DisplayMode, SegClock, ShiftRegister, TickState};

/// Raw reading of the 12-bit ADC at full scale
const ADC_FULL_SCALE: f32 = 4095.0;

/// Shared between the tickers and the main loop
static STATE: TickState = TickState::new();

static TICK_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    TICK_EXECUTOR.on_interrupt()
}

#[embassy_executor::task]
async fn second_ticker(state: &'static TickState) {
    segclock::run_second_ticker(state).await
}

#[embassy_executor::task]
async fn refresh_ticker(state: &'static TickState) {
    segclock::run_refresh_ticker(state).await
}

/// The potentiometer on ADC0, read with the blocking driver so the main loop never awaits
struct Potentiometer<'d> {
    adc: Adc<'d, adc::Blocking>,
    channel: Channel<'d>,
}

impl<'d> Potentiometer<'d> {
    fn new(adc: ADC, pin: PIN_26) -> Self {
        Self {
            adc: Adc::new_blocking(adc, adc::Config::default()),
            channel: Channel::new_pin(pin, Pull::None),
        }
    }
}

impl AnalogInput for Potentiometer<'_> {
    type Error = adc::Error;

    fn read_normalized(&mut self) -> Result<f32, Self::Error> {
        let raw = self.adc.blocking_read(&mut self.channel)?;

        Ok(raw as f32 / ADC_FULL_SCALE)
    }
}

#[entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());

    info!("segclock starting");
    info!("Pin connections:");
    info!("  latch: GPIO 18, clock: GPIO 19, data: GPIO 20");
    info!("  reset button: GPIO 14, mode button: GPIO 15 (to ground)");
    info!("  potentiometer wiper: GPIO 26 (ADC0)");

    // Buttons are active-low, so idle needs the pull-ups
    let mut reset_button = Input::new(p.PIN_14, Pull::Up);
    let mut mode_button = Input::new(p.PIN_15, Pull::Up);

    let bus = ShiftRegister::new(
        Output::new(p.PIN_18, Level::High),
        Output::new(p.PIN_19, Level::High),
        Output::new(p.PIN_20, Level::Low),
    );
    let pot = Potentiometer::new(p.ADC, p.PIN_26);

    // Tickers run at a higher priority than thread mode, which is where the main loop lives
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = TICK_EXECUTOR.start(interrupt::SWI_IRQ_1);
    unwrap!(spawner.spawn(second_ticker(&STATE)));
    unwrap!(spawner.spawn(refresh_ticker(&STATE)));

    debug!("tickers started");

    let mut clock = SegClock::new(&STATE, bus, pot);
    let mut shown = DisplayMode::Time;

    loop {
        match clock.poll(&mut reset_button, &mut mode_button) {
            Ok(poll) => {
                if poll.reset {
                    info!("Time reset");
                }

                if poll.mode != shown {
                    info!("Showing {}", poll.mode);
                    shown = poll.mode;
                }
            }
            Err(e) => {
                // The digit slot is skipped; the next refresh moves on to the next one
                warn!("Refresh failed: {}", e);
            }
        }
    }
}
