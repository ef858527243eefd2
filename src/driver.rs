use crate::{robot::Robot, system::millis::millis};
use defmt::{info, warn};
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    i2c::I2c,
    pwm::SetDutyCycle,
};
use rp2040_line_follower::{config::Tuning, control::LineFollower, sensing::line_position};

// refresh cadence of the live bar graph during the calibration sweep
const CALIBRATION_DISPLAY_PERIOD_MS: u32 = 100;
// dwell on the go message before the follow loop takes over
const GO_MESSAGE_MS: u32 = 1000;
// the derivative term assumes a steady control period
const CONTROL_PERIOD_MS: u32 = 10;

/// Owns the robot and walks it through the operator flow: calibration
/// prompt, sweep with live sensor bars, go message, then the follow loop
/// until power-off.
pub struct Driver<
    PHA: OutputPin,
    ENA: SetDutyCycle,
    PHB: OutputPin,
    ENB: SetDutyCycle,
    BUTTA: InputPin,
    S0: OutputPin,
    S1: OutputPin,
    S2: OutputPin,
    TWI,
    DELAY,
    LED1: OutputPin,
> where
    TWI: I2c,
    DELAY: DelayNs,
{
    robot: Robot<PHA, ENA, PHB, ENB, BUTTA, S0, S1, S2, TWI, DELAY>,
    follower: LineFollower,
    led1: LED1,
    delay: DELAY,
}

impl<
        PHA: OutputPin,
        ENA: SetDutyCycle,
        PHB: OutputPin,
        ENB: SetDutyCycle,
        BUTTA: InputPin,
        S0: OutputPin,
        S1: OutputPin,
        S2: OutputPin,
        TWI,
        DELAY,
        LED1: OutputPin,
    > Driver<PHA, ENA, PHB, ENB, BUTTA, S0, S1, S2, TWI, DELAY, LED1>
where
    TWI: I2c,
    DELAY: DelayNs,
{
    pub fn new(
        robot: Robot<PHA, ENA, PHB, ENB, BUTTA, S0, S1, S2, TWI, DELAY>,
        tuning: Tuning,
        delay: DELAY,
        led1_pin: LED1,
    ) -> Self {
        info!("driver tuning: {}", defmt::Display2Format(&tuning));
        Self {
            robot,
            follower: LineFollower::new(tuning),
            led1: led1_pin,
            delay,
        }
    }

    /// Delays for the given milliseconds while keeping the button
    /// debouncer serviced.
    fn delay_ms(&mut self, ms: u32) {
        let start_millis = millis();
        while millis().wrapping_sub(start_millis) < ms {
            self.robot.handle_loop();
            self.delay.delay_us(500);
        }
    }

    fn wait_for_button_a(&mut self) {
        while !self.robot.button_a_pressed() {
            self.robot.handle_loop();
            self.delay.delay_us(500);
        }
    }

    /// Never returns: one calibration flow, then the follow loop.
    pub fn run(&mut self) -> ! {
        self.robot.stop();
        self.robot.display_calibration_prompt();
        self.wait_for_button_a();

        // operator sweeps the array across the line until the second press,
        // watching the live bars settle
        self.robot.start_calibration();
        let mut last_display_millis = millis();
        while !self.robot.button_a_pressed() {
            self.robot.handle_loop();
            self.robot.record_calibration_sample();
            if millis().wrapping_sub(last_display_millis) >= CALIBRATION_DISPLAY_PERIOD_MS {
                let readings = self.robot.read_sensors();
                self.robot.display_readings(&readings);
                last_display_millis = millis();
            }
        }
        if self.robot.calibration_ready() {
            info!("Calibration sweep complete");
        } else {
            warn!("Calibration sweep saw no contrast; readings will sit at zero");
        }

        self.robot.display_go();
        self.delay_ms(GO_MESSAGE_MS);
        self.robot.clear_display();
        self.follower.reset();
        self.led1.set_high().ok();

        loop {
            self.robot.handle_loop();
            let readings = self.robot.read_sensors();
            let speeds = self.follower.update(line_position(&readings));
            self.robot.drive(speeds);
            self.delay.delay_ms(CONTROL_PERIOD_MS);
        }
    }
}
