use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

/// Dual phase/enable motor driver: one direction pin and one PWM enable
/// per side. Speeds are signed commands in the tuning units; magnitude
/// maps linearly onto PWM duty with `max_speed` as full scale, and the
/// sign drives the phase pin. The `flip-motors` feature inverts the phase
/// polarity for boards wired with the motor leads swapped.
pub struct MotorController<PHA, ENA, PHB, ENB>
where
    PHA: OutputPin,
    ENA: SetDutyCycle,
    PHB: OutputPin,
    ENB: SetDutyCycle,
{
    left_phase: PHA,
    left_enable: ENA,
    right_phase: PHB,
    right_enable: ENB,
    max_speed: u16,
}

impl<PHA, ENA, PHB, ENB> MotorController<PHA, ENA, PHB, ENB>
where
    PHA: OutputPin,
    ENA: SetDutyCycle,
    PHB: OutputPin,
    ENB: SetDutyCycle,
{
    pub fn new(
        left_phase: PHA,
        left_enable: ENA,
        right_phase: PHB,
        right_enable: ENB,
        max_speed: u16,
    ) -> Self {
        Self {
            left_phase,
            left_enable,
            right_phase,
            right_enable,
            max_speed,
        }
    }

    pub fn set_speeds(&mut self, left: i16, right: i16) {
        self.set_left_speed(left);
        self.set_right_speed(right);
    }

    pub fn set_left_speed(&mut self, speed: i16) {
        let mut forward = speed >= 0;
        if cfg!(feature = "flip-motors") {
            forward = !forward;
        }
        // phase low drives the motor forward on this driver
        if forward {
            self.left_phase.set_low().ok();
        } else {
            self.left_phase.set_high().ok();
        }
        let magnitude = speed.unsigned_abs().min(self.max_speed);
        let _ = self.left_enable.set_duty_cycle_fraction(magnitude, self.max_speed);
    }

    pub fn set_right_speed(&mut self, speed: i16) {
        let mut forward = speed >= 0;
        if cfg!(feature = "flip-motors") {
            forward = !forward;
        }
        if forward {
            self.right_phase.set_low().ok();
        } else {
            self.right_phase.set_high().ok();
        }
        let magnitude = speed.unsigned_abs().min(self.max_speed);
        let _ = self.right_enable.set_duty_cycle_fraction(magnitude, self.max_speed);
    }

    /// Cuts both PWM enables; the motors coast.
    pub fn stop(&mut self) {
        let _ = self.left_enable.set_duty_cycle_fully_off();
        let _ = self.right_enable.set_duty_cycle_fully_off();
    }
}
