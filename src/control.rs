//! PD steering for the follow loop.
//!
//! Turns the line-position estimate into per-wheel speed commands using
//! the build-time [`Tuning`] record. Pure arithmetic; the firmware applies
//! the commands to the motor controller.

use crate::config::Tuning;
use crate::sensing::LINE_CENTER;

/// Signed wheel commands in the same units as [`Tuning::max_speed`].
/// Negative values drive the wheel in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelSpeeds {
    pub left: i16,
    pub right: i16,
}

/// Line-follow controller. Holds only the tuning record and the previous
/// error sample for the derivative term.
pub struct LineFollower {
    tuning: Tuning,
    last_error: f32,
}

impl LineFollower {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            last_error: 0.0,
        }
    }

    /// Clears the derivative memory between runs.
    pub fn reset(&mut self) {
        self.last_error = 0.0;
    }

    /// One control cycle: line position in, wheel speeds out.
    ///
    /// PD steering around the array center; when the error passes the
    /// fast-turn threshold (and the strategy is enabled) the inside wheel
    /// reverses at `fast_turn_min` for a pivot instead. A lost line reads
    /// as a full-scale error toward the side it was last seen on.
    pub fn update(&mut self, position: Option<u16>) -> WheelSpeeds {
        let error = match position {
            Some(position) => position as f32 - LINE_CENTER as f32,
            None => {
                if self.last_error < 0.0 {
                    -(LINE_CENTER as f32)
                } else {
                    LINE_CENTER as f32
                }
            }
        };

        let max_speed = self.tuning.max_speed as f32;
        let fast_turn_min = self.tuning.fast_turn_min as f32;

        let speeds = if self.tuning.use_fast_turn && error <= fast_turn_min {
            WheelSpeeds {
                left: self.tuning.fast_turn_min,
                right: self.tuning.max_speed as i16,
            }
        } else if self.tuning.use_fast_turn && error >= -fast_turn_min {
            WheelSpeeds {
                left: self.tuning.max_speed as i16,
                right: self.tuning.fast_turn_min,
            }
        } else {
            let steering =
                self.tuning.k_p * error + self.tuning.k_d * (error - self.last_error);
            WheelSpeeds {
                left: (max_speed + steering).clamp(0.0, max_speed) as i16,
                right: (max_speed - steering).clamp(0.0, max_speed) as i16,
            }
        };
        self.last_error = error;
        speeds
    }
}
