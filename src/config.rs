//! Build-time tuning surface for the line follower.
//!
//! Values are fixed when the firmware is flashed. The control loop reads
//! them through [`Tuning`]; nothing mutates them at runtime. The two
//! hardware variant switches (display type, motor polarity) are cargo
//! features resolved at build time, not fields here.

/// Number of reflectance sensors in the array. The sensor driver and the
/// telemetry display both size themselves from this; a board with a
/// different array width is a different build.
pub const NUM_SENSORS: usize = 5;

const MAX_SPEED: u16 = 400;
const K_P: f32 = 0.4;
const K_D: f32 = 8.5;
const USE_FAST_TURN: bool = true;
const FAST_TURN_MIN: i16 = -200;

/// Tuning constants consumed by the line-follow control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Speed ceiling for either wheel, in motor command units
    pub max_speed: u16,
    /// Proportional gain on line-position error
    pub k_p: f32,
    /// Derivative gain on line-position error
    pub k_d: f32,
    /// Enables the pivot strategy on sharp turns
    pub use_fast_turn: bool,
    /// Error threshold that engages a fast turn; also the reversed
    /// inside-wheel command while pivoting
    pub fast_turn_min: i16,
}

impl Tuning {
    pub const fn new() -> Self {
        Self {
            max_speed: MAX_SPEED,
            k_p: K_P,
            k_d: K_D,
            use_fast_turn: USE_FAST_TURN,
            fast_turn_min: FAST_TURN_MIN,
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for Tuning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Tuning {{\n  max_speed = {},\n  k_p = {},\n  k_d = {},\n  use_fast_turn = {},\n  fast_turn_min = {}\n}}",
            self.max_speed, self.k_p, self.k_d, self.use_fast_turn, self.fast_turn_min
        )
    }
}
