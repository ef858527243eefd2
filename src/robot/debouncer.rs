use crate::system::millis::millis;
use defmt::trace;
use embedded_hal::digital::InputPin;

/// A debounced button. The button counts as pressed while the pin sits at
/// the level given by `ACTIVE` (true = active high). Level changes inside
/// the `DEBOUNCE` millisecond window are ignored as contact bounce.
pub struct DebouncedButton<PIN: InputPin, const ACTIVE: bool, const DEBOUNCE: u32> {
    pin: PIN,
    state: bool,
    press_consumed: bool,
    last_change: u32,
}

impl<PIN: InputPin, const ACTIVE: bool, const DEBOUNCE: u32>
    DebouncedButton<PIN, ACTIVE, DEBOUNCE>
{
    pub fn new(pin: PIN) -> Self {
        Self {
            pin,
            state: !ACTIVE,
            press_consumed: false,
            last_change: 0,
        }
    }

    /// Samples the pin. Call every pass through the main loop.
    pub fn handle_loop(&mut self) {
        if let Ok(level) = self.pin.is_high() {
            if level != self.state {
                let change_time = millis();
                if change_time.wrapping_sub(self.last_change) > DEBOUNCE {
                    trace!("button level changed to {} at {}", level, change_time);
                    self.state = level;
                    self.last_change = change_time;

                    // a fresh press arms the edge; a release re-arms nothing
                    if self.state == ACTIVE {
                        self.press_consumed = false;
                    } else {
                        self.press_consumed = true;
                    }
                }
            }
        }
    }

    /// True once per press: reports the press edge since the last call.
    pub fn is_newly_pressed(&mut self) -> bool {
        if self.state == ACTIVE && !self.press_consumed {
            self.press_consumed = true;
            true
        } else {
            false
        }
    }
}
