use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal_02::adc::OneShot;
use rp2040_line_follower::config::NUM_SENSORS;
use rp2040_line_follower::sensing::{Calibration, ReflectanceSensors, SensorReadings};
use rp_pico::hal::adc::{Adc, AdcPin};
use rp_pico::hal::gpio::{bank0::Gpio26, FunctionSio, Pin, PullNone, SioInput};

// The whole array shares one ADC input through an 8-channel analog
// multiplexer; sensor i sits on mux channel i.
pub type ArraySensePin = AdcPin<Pin<Gpio26, FunctionSio<SioInput>, PullNone>>;

const MUX_SETTLE_US: u32 = 10;

/// The reflectance sensor bank: three mux select lines, the shared ADC
/// input, and the min/max calibration accumulated during the sweep.
pub struct ReflectanceArray<S0, S1, S2, DELAY>
where
    S0: OutputPin,
    S1: OutputPin,
    S2: OutputPin,
    DELAY: DelayNs,
{
    select0: S0,
    select1: S1,
    select2: S2,
    adc: Adc,
    sense_pin: ArraySensePin,
    delay: DELAY,
    calibration: Calibration,
}

impl<S0, S1, S2, DELAY> ReflectanceArray<S0, S1, S2, DELAY>
where
    S0: OutputPin,
    S1: OutputPin,
    S2: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(
        select0: S0,
        select1: S1,
        select2: S2,
        adc: Adc,
        sense_pin: ArraySensePin,
        delay: DELAY,
    ) -> Self {
        Self {
            select0,
            select1,
            select2,
            adc,
            sense_pin,
            delay,
            calibration: Calibration::new(),
        }
    }

    fn select_channel(&mut self, channel: u8) {
        if channel & 0b001 != 0 {
            self.select0.set_high().ok();
        } else {
            self.select0.set_low().ok();
        }
        if channel & 0b010 != 0 {
            self.select1.set_high().ok();
        } else {
            self.select1.set_low().ok();
        }
        if channel & 0b100 != 0 {
            self.select2.set_high().ok();
        } else {
            self.select2.set_low().ok();
        }
        // let the mux output settle before sampling
        self.delay.delay_us(MUX_SETTLE_US);
    }

    /// One raw 12-bit sample per sensor, in array order. A failed
    /// conversion reads as 0 for that sensor.
    pub fn read_raw(&mut self) -> [u16; NUM_SENSORS] {
        let mut raw = [0u16; NUM_SENSORS];
        for (channel, value) in raw.iter_mut().enumerate() {
            self.select_channel(channel as u8);
            *value = self.adc.read(&mut self.sense_pin).unwrap_or(0);
        }
        raw
    }

    /// Discards any previous sweep ahead of a new calibration run.
    pub fn reset_calibration(&mut self) {
        self.calibration.reset();
    }

    /// Folds one raw sample into the calibration ranges.
    pub fn record_calibration_sample(&mut self) {
        let raw = self.read_raw();
        self.calibration.record(&raw);
    }

    /// True once the sweep has given every sensor a usable range.
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_usable()
    }
}

impl<S0, S1, S2, DELAY> ReflectanceSensors for ReflectanceArray<S0, S1, S2, DELAY>
where
    S0: OutputPin,
    S1: OutputPin,
    S2: OutputPin,
    DELAY: DelayNs,
{
    type Error = Infallible;

    fn read_calibrated(&mut self) -> Result<SensorReadings, Self::Error> {
        let raw = self.read_raw();
        Ok(self.calibration.normalize(&raw))
    }
}
