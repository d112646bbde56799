use embedded_hal_1::digital::InputPin;

use crate::DisplayMode;

/// What the buttons asked for on one pass of the main loop
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonDecision {
    /// The reset button went from released to pressed since the previous sample
    pub reset: bool,

    /// Mode selected by the live level of the mode button
    pub mode: DisplayMode,
}

/// Samples the two active-low buttons once per main-loop iteration.
///
/// The reset button is edge-triggered: only a high-to-low transition fires, so holding the button
/// down resets the clock exactly once.  That needs the previous sample, which is the only state
/// kept here.
///
/// The mode button is level-triggered with no memory at all: the voltage reading shows for
/// exactly as long as the button reads low.  There is no debouncing on either button; a bouncing
/// contact can produce extra resets or a flickering mode.
#[derive(Clone, Debug)]
pub struct InputMonitor {
    reset_was_high: bool,
}

impl InputMonitor {
    /// Both buttons are pulled up, so the idle level is high
    pub const fn new() -> Self {
        Self {
            reset_was_high: true,
        }
    }

    /// Turn one pair of samples into a decision.
    ///
    /// `reset_low` and `mode_low` are `true` while the corresponding button is pressed.
    pub fn sample(&mut self, reset_low: bool, mode_low: bool) -> ButtonDecision {
        let reset = self.reset_was_high && reset_low;
        self.reset_was_high = !reset_low;

        let mode = if mode_low {
            DisplayMode::Voltage
        } else {
            DisplayMode::Time
        };

        ButtonDecision { reset, mode }
    }

    /// Read both pins, reset first, and decide
    pub fn poll<Reset, Mode>(
        &mut self,
        reset: &mut Reset,
        mode: &mut Mode,
    ) -> Result<ButtonDecision, Reset::Error>
    where
        Reset: InputPin,
        Mode: InputPin<Error = Reset::Error>,
    {
        let reset_low = reset.is_low()?;
        let mode_low = mode.is_low()?;

        Ok(self.sample(reset_low, mode_low))
    }
}

impl Default for InputMonitor {
    fn default() -> Self {
        Self::new()
    }
}
