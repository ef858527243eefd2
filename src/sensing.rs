//! Reflectance-array data model: calibrated readings, the min/max
//! calibration fold, and the weighted line-position estimate.
//!
//! Raw ADC counts never leave the acquisition layer. Everything downstream
//! of it, display and control alike, sees readings normalized onto the
//! fixed `0..=1000` scale.

use crate::config::NUM_SENSORS;

/// Full scale of a calibrated reading.
pub const MAX_READING: u16 = 1000;

/// Position reported when the line is centered under the array.
pub const LINE_CENTER: u16 = (NUM_SENSORS as u16 - 1) * MAX_READING / 2;

// Readings at or below this carry no position information.
const NOISE_FLOOR: u16 = 50;

// At least one sensor must read this high for the line to count as seen.
const ON_LINE_MIN: u16 = 200;

/// One calibrated sample of the whole array, in sensor order.
pub type SensorReadings = [u16; NUM_SENSORS];

/// Acquisition capability the firmware provides: one calibrated snapshot
/// of the array per call.
pub trait ReflectanceSensors {
    type Error;

    fn read_calibrated(&mut self) -> Result<SensorReadings, Self::Error>;
}

/// Per-sensor observed range, accumulated during the calibration sweep and
/// used to normalize raw counts afterwards.
pub struct Calibration {
    min: [u16; NUM_SENSORS],
    max: [u16; NUM_SENSORS],
}

impl Calibration {
    pub const fn new() -> Self {
        Self {
            min: [u16::MAX; NUM_SENSORS],
            max: [0; NUM_SENSORS],
        }
    }

    /// Folds one raw sample into the per-sensor ranges.
    pub fn record(&mut self, raw: &[u16; NUM_SENSORS]) {
        for (i, &value) in raw.iter().enumerate() {
            self.min[i] = self.min[i].min(value);
            self.max[i] = self.max[i].max(value);
        }
    }

    /// Discards the accumulated ranges ahead of a fresh sweep.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// True once every sensor has seen a non-empty range, i.e. the sweep
    /// actually moved the array across the line.
    pub fn is_usable(&self) -> bool {
        self.min.iter().zip(self.max.iter()).all(|(min, max)| max > min)
    }

    /// Maps a raw sample onto `0..=1000` per sensor: the observed minimum
    /// becomes 0, the observed maximum 1000, values outside the range
    /// clamp. A sensor with an empty range reads 0.
    pub fn normalize(&self, raw: &[u16; NUM_SENSORS]) -> SensorReadings {
        let mut readings = [0u16; NUM_SENSORS];
        for (i, &value) in raw.iter().enumerate() {
            let (min, max) = (self.min[i], self.max[i]);
            if max <= min {
                continue;
            }
            let clamped = value.clamp(min, max);
            readings[i] = ((clamped - min) as u32 * MAX_READING as u32 / (max - min) as u32) as u16;
        }
        readings
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

/// Weighted mean of the readings on the `0..=(N-1)*1000` scale, `None`
/// when no sensor sees the line. Readings at the noise floor are left out
/// of the mean so dust under an off-line sensor cannot drag the estimate.
pub fn line_position(readings: &SensorReadings) -> Option<u16> {
    let mut weighted: u32 = 0;
    let mut total: u32 = 0;
    let mut on_line = false;
    for (i, &value) in readings.iter().enumerate() {
        if value >= ON_LINE_MIN {
            on_line = true;
        }
        if value > NOISE_FLOOR {
            weighted += value as u32 * (i as u32 * MAX_READING as u32);
            total += value as u32;
        }
    }
    if !on_line {
        return None;
    }
    Some((weighted / total) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swept_calibration() -> Calibration {
        let mut calibration = Calibration::new();
        calibration.record(&[100, 120, 90, 110, 100]);
        calibration.record(&[2100, 2120, 2090, 2110, 2100]);
        calibration
    }

    #[test]
    fn normalization_spans_the_observed_range() {
        let calibration = swept_calibration();
        assert!(calibration.is_usable());

        assert_eq!(
            calibration.normalize(&[100, 120, 90, 110, 100]),
            [0, 0, 0, 0, 0]
        );
        assert_eq!(
            calibration.normalize(&[2100, 2120, 2090, 2110, 2100]),
            [1000, 1000, 1000, 1000, 1000]
        );
        // halfway through each sensor's range
        assert_eq!(
            calibration.normalize(&[1100, 1120, 1090, 1110, 1100]),
            [500, 500, 500, 500, 500]
        );
    }

    #[test]
    fn normalization_clamps_outside_the_observed_range() {
        let calibration = swept_calibration();
        assert_eq!(
            calibration.normalize(&[0, 50, 4095, 3000, 90]),
            [0, 0, 1000, 1000, 0]
        );
    }

    #[test]
    fn unswept_sensors_normalize_to_zero() {
        let mut calibration = Calibration::new();
        calibration.record(&[700, 700, 700, 700, 700]);
        // a single sample leaves every range empty
        assert!(!calibration.is_usable());
        assert_eq!(calibration.normalize(&[700, 700, 700, 700, 700]), [0; 5]);
        assert_eq!(calibration.normalize(&[4095; 5]), [0; 5]);
    }

    #[test]
    fn reset_discards_the_sweep() {
        let mut calibration = swept_calibration();
        assert!(calibration.is_usable());
        calibration.reset();
        assert!(!calibration.is_usable());
    }

    #[test]
    fn position_is_centered_under_the_middle_sensor() {
        assert_eq!(line_position(&[0, 0, 1000, 0, 0]), Some(LINE_CENTER));
    }

    #[test]
    fn position_reaches_the_array_edges() {
        assert_eq!(line_position(&[1000, 0, 0, 0, 0]), Some(0));
        assert_eq!(line_position(&[0, 0, 0, 0, 1000]), Some(4000));
    }

    #[test]
    fn position_blends_neighboring_sensors() {
        // symmetric spread stays centered
        assert_eq!(line_position(&[0, 500, 1000, 500, 0]), Some(LINE_CENTER));
        // equal pull from sensors 2 and 3 lands halfway between them
        assert_eq!(line_position(&[0, 0, 1000, 1000, 0]), Some(2500));
    }

    #[test]
    fn noise_floor_readings_do_not_drag_the_estimate() {
        assert_eq!(line_position(&[50, 0, 1000, 0, 50]), Some(LINE_CENTER));
    }

    #[test]
    fn line_is_lost_below_the_detection_threshold() {
        assert_eq!(line_position(&[0, 0, 0, 0, 0]), None);
        assert_eq!(line_position(&[199, 180, 60, 150, 199]), None);
        // one sensor over the threshold is enough
        assert_eq!(line_position(&[0, 0, 200, 0, 0]), Some(LINE_CENTER));
    }
}
