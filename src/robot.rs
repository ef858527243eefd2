mod debouncer;
mod lcd;
mod motor_controller;
pub mod reflectance_array;

use crate::robot::{
    debouncer::DebouncedButton, lcd::Lcd, motor_controller::MotorController,
    reflectance_array::ReflectanceArray,
};
use defmt::{debug, error, info};
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    i2c::I2c,
    pwm::SetDutyCycle,
};
use rp2040_line_follower::{
    config::NUM_SENSORS,
    control::WheelSpeeds,
    display::TelemetryDisplay,
    sensing::{ReflectanceSensors, SensorReadings},
};

const BUTTON_DEBOUNCE_TIME_MS: u32 = 10;

/// Hardware facade: motors, the user button, the sensor bank, and the
/// telemetry display, behind the handful of calls the operator flow needs.
/// Display failures are logged and swallowed here; a wrong screen is never
/// worth stalling the control loop over.
pub struct Robot<
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
> where
    TWI: I2c,
    DELAY: DelayNs,
{
    motors: MotorController<PHA, ENA, PHB, ENB>,
    button_a: DebouncedButton<BUTTA, false, BUTTON_DEBOUNCE_TIME_MS>,
    sensors: ReflectanceArray<S0, S1, S2, DELAY>,
    telemetry: TelemetryDisplay<Lcd<TWI, DELAY>>,
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
    > Robot<PHA, ENA, PHB, ENB, BUTTA, S0, S1, S2, TWI, DELAY>
where
    TWI: I2c,
    DELAY: DelayNs,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        left_phase_pin: PHA,
        left_enable: ENA,
        right_phase_pin: PHB,
        right_enable: ENB,
        button_a_pin: BUTTA,
        sensor_array: ReflectanceArray<S0, S1, S2, DELAY>,
        i2c: TWI,
        max_speed: u16,
        delay: DELAY,
    ) -> Self {
        let motors = MotorController::new(
            left_phase_pin,
            left_enable,
            right_phase_pin,
            right_enable,
            max_speed,
        );

        let mut display = Lcd::new(i2c, delay);
        match display.init() {
            Ok(()) => {
                info!("LCD initialized");
            }
            Err(_e) => {
                error!("Error initializing LCD");
            }
        }

        // bar glyphs must be in place before the first sensor screen
        debug!("Loading bar graph characters");
        let mut telemetry = TelemetryDisplay::new(display);
        if let Err(_e) = telemetry.load_custom_characters() {
            error!("Error creating bar graph characters");
        }

        Self {
            motors,
            button_a: DebouncedButton::<BUTTA, false, BUTTON_DEBOUNCE_TIME_MS>::new(button_a_pin),
            sensors: sensor_array,
            telemetry,
        }
    }

    /// Services the button debouncer. Call every pass through any loop.
    pub fn handle_loop(&mut self) {
        self.button_a.handle_loop();
    }

    /// Press edge of the user button since the last call.
    pub fn button_a_pressed(&mut self) -> bool {
        self.button_a.is_newly_pressed()
    }

    /// Calibrated snapshot of the sensor array.
    pub fn read_sensors(&mut self) -> SensorReadings {
        self.sensors.read_calibrated().unwrap_or([0; NUM_SENSORS])
    }

    pub fn start_calibration(&mut self) {
        info!("Starting sensor calibration sweep");
        self.sensors.reset_calibration();
    }

    pub fn record_calibration_sample(&mut self) {
        self.sensors.record_calibration_sample();
    }

    pub fn calibration_ready(&self) -> bool {
        self.sensors.is_calibrated()
    }

    pub fn display_readings(&mut self, readings: &SensorReadings) {
        if let Err(_e) = self.telemetry.show_readings(readings) {
            error!("Error writing sensor bars to LCD");
        }
    }

    pub fn display_calibration_prompt(&mut self) {
        if let Err(_e) = self.telemetry.calibration_message() {
            error!("Error writing calibration prompt to LCD");
        }
    }

    pub fn display_go(&mut self) {
        if let Err(_e) = self.telemetry.go_message() {
            error!("Error writing go message to LCD");
        }
    }

    pub fn clear_display(&mut self) {
        if let Err(_e) = self.telemetry.clear() {
            error!("Error clearing LCD");
        }
    }

    pub fn drive(&mut self, speeds: WheelSpeeds) {
        self.motors.set_speeds(speeds.left, speeds.right);
    }

    pub fn stop(&mut self) {
        self.motors.stop();
    }
}
