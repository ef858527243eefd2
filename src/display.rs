//! Sensor telemetry on a character display.
//!
//! Renders the reflectance array as a one-row bar graph: each sensor
//! becomes a single character cell whose fill height tracks the calibrated
//! reading. Heights 1 through 7 use custom glyphs programmed into the
//! display's character RAM; height 8 uses the controller's built-in full
//! block. Also draws the two fixed operator screens (calibration prompt,
//! go message).

use crate::sensing::{SensorReadings, MAX_READING};

/// Tallest bar a single character cell can show.
pub const MAX_BAR_HEIGHT: u8 = 8;

/// Number of partial-fill glyphs programmed into display character RAM,
/// occupying slots 0 through 6.
pub const NUM_CUSTOM_GLYPHS: u8 = 7;

/// Built-in full-block character code on HD44780-style controllers.
pub const FULL_BLOCK: u8 = 0xFF;

// Sliding-window glyph patterns: slot i takes bytes i..i+8, lighting the
// bottom i+1 rows of the cell. Only the low five bits of a row are pixels.
const BAR_LEVELS: [u8; 14] = [0, 0, 0, 0, 0, 0, 0, 63, 63, 63, 63, 63, 63, 63];

// One character per bar height: blank, the seven custom glyph slots, then
// the built-in full block.
const BAR_CHARS: [u8; 9] = [b' ', 0, 1, 2, 3, 4, 5, 6, FULL_BLOCK];

/// Maps a calibrated reading in `0..=1000` onto a bar height in `0..=8`.
pub fn bar_height(reading: u16) -> u8 {
    ((reading as u32 * MAX_BAR_HEIGHT as u32) / MAX_READING as u32).min(MAX_BAR_HEIGHT as u32) as u8
}

/// Character-cell display surface the telemetry rendering runs on.
///
/// Implemented in the firmware by an adapter over the actual I2C display
/// driver; implemented in tests by a recording mock. The cursor advances
/// one cell per character written, per the usual controller convention.
pub trait CharacterDisplay {
    type Error;

    /// Blanks the display and returns the cursor to the origin.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Moves the cursor to a zero-based column and row.
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;

    /// Writes printable text at the cursor.
    fn print(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Writes one raw character code at the cursor. Needed for the custom
    /// glyph slots and [`FULL_BLOCK`], which are not printable text.
    fn write_raw_char(&mut self, code: u8) -> Result<(), Self::Error>;

    /// Programs an 8-row bitmap into a custom character slot.
    fn create_char(&mut self, slot: u8, pattern: [u8; 8]) -> Result<(), Self::Error>;
}

impl<T: CharacterDisplay + ?Sized> CharacterDisplay for &mut T {
    type Error = T::Error;

    fn clear(&mut self) -> Result<(), Self::Error> {
        T::clear(self)
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        T::set_cursor(self, col, row)
    }

    fn print(&mut self, text: &str) -> Result<(), Self::Error> {
        T::print(self, text)
    }

    fn write_raw_char(&mut self, code: u8) -> Result<(), Self::Error> {
        T::write_raw_char(self, code)
    }

    fn create_char(&mut self, slot: u8, pattern: [u8; 8]) -> Result<(), Self::Error> {
        T::create_char(self, slot, pattern)
    }
}

/// Bar-graph and status-screen rendering over a [`CharacterDisplay`].
///
/// Owns the one physical display for the lifetime of the firmware.
/// [`TelemetryDisplay::load_custom_characters`] must run once before the
/// first [`TelemetryDisplay::show_readings`]; the firmware does this at
/// construction time.
pub struct TelemetryDisplay<D: CharacterDisplay> {
    display: D,
}

impl<D: CharacterDisplay> TelemetryDisplay<D> {
    pub fn new(display: D) -> Self {
        Self { display }
    }

    /// Programs the seven partial-bar glyphs into slots 0 through 6.
    /// Calling it again rewrites the same patterns; wasteful but harmless.
    pub fn load_custom_characters(&mut self) -> Result<(), D::Error> {
        for slot in 0..NUM_CUSTOM_GLYPHS {
            let mut pattern = [0u8; 8];
            pattern.copy_from_slice(&BAR_LEVELS[slot as usize..slot as usize + 8]);
            self.display.create_char(slot, pattern)?;
        }
        Ok(())
    }

    /// Writes one bar character at the cursor. Heights above 8 are capped
    /// to the full block rather than treated as an error; a slightly wrong
    /// bar beats halting the control loop.
    pub fn print_bar(&mut self, height: u8) -> Result<(), D::Error> {
        let capped = height.min(MAX_BAR_HEIGHT);
        self.display.write_raw_char(BAR_CHARS[capped as usize])
    }

    /// Draws the whole array as one bar per sensor, left to right in
    /// sensor order, starting from a cleared display.
    pub fn show_readings(&mut self, readings: &SensorReadings) -> Result<(), D::Error> {
        self.clear()?;
        self.display.set_cursor(0, 0)?;
        for &reading in readings.iter() {
            self.print_bar(bar_height(reading))?;
        }
        Ok(())
    }

    /// Two-line prompt shown until the operator starts calibration.
    pub fn calibration_message(&mut self) -> Result<(), D::Error> {
        self.clear()?;
        self.display.print("Press A")?;
        self.display.set_cursor(0, 1)?;
        self.display.print("to calib")
    }

    /// Shown just before the follow loop takes over.
    pub fn go_message(&mut self) -> Result<(), D::Error> {
        self.clear()?;
        self.display.print("Go!")
    }

    pub fn clear(&mut self) -> Result<(), D::Error> {
        self.display.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NUM_SENSORS;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Clear,
        SetCursor(u8, u8),
        Print(String),
        WriteChar(u8),
        CreateChar(u8, [u8; 8]),
    }

    #[derive(Default)]
    struct RecordingDisplay {
        ops: Vec<Op>,
    }

    impl CharacterDisplay for RecordingDisplay {
        type Error = core::convert::Infallible;

        fn clear(&mut self) -> Result<(), Self::Error> {
            self.ops.push(Op::Clear);
            Ok(())
        }

        fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
            self.ops.push(Op::SetCursor(col, row));
            Ok(())
        }

        fn print(&mut self, text: &str) -> Result<(), Self::Error> {
            self.ops.push(Op::Print(text.to_string()));
            Ok(())
        }

        fn write_raw_char(&mut self, code: u8) -> Result<(), Self::Error> {
            self.ops.push(Op::WriteChar(code));
            Ok(())
        }

        fn create_char(&mut self, slot: u8, pattern: [u8; 8]) -> Result<(), Self::Error> {
            self.ops.push(Op::CreateChar(slot, pattern));
            Ok(())
        }
    }

    #[test]
    fn bar_height_is_the_floored_linear_map() {
        for reading in 0..=MAX_READING {
            let expected = (reading as u32 * 8 / 1000) as u8;
            assert_eq!(bar_height(reading), expected, "reading {}", reading);
            assert!(bar_height(reading) <= MAX_BAR_HEIGHT);
        }
        assert_eq!(bar_height(0), 0);
        assert_eq!(bar_height(124), 0);
        assert_eq!(bar_height(125), 1);
        assert_eq!(bar_height(500), 4);
        assert_eq!(bar_height(875), 7);
        assert_eq!(bar_height(999), 7);
        assert_eq!(bar_height(1000), 8);
    }

    #[test]
    fn bar_height_saturates_past_full_scale() {
        assert_eq!(bar_height(1001), 8);
        assert_eq!(bar_height(u16::MAX), 8);
    }

    #[test]
    fn print_bar_emits_exactly_one_character() {
        for height in 0..=u8::MAX {
            let mut mock = RecordingDisplay::default();
            TelemetryDisplay::new(&mut mock).print_bar(height).unwrap();
            assert_eq!(mock.ops.len(), 1, "height {}", height);
        }
    }

    #[test]
    fn print_bar_uses_the_fixed_character_table() {
        let mut mock = RecordingDisplay::default();
        let mut telemetry = TelemetryDisplay::new(&mut mock);
        for height in 0..=MAX_BAR_HEIGHT {
            telemetry.print_bar(height).unwrap();
        }
        let expected: Vec<Op> = [b' ', 0, 1, 2, 3, 4, 5, 6, FULL_BLOCK]
            .iter()
            .map(|&code| Op::WriteChar(code))
            .collect();
        assert_eq!(mock.ops, expected);
    }

    #[test]
    fn print_bar_caps_heights_above_eight() {
        let mut capped = RecordingDisplay::default();
        TelemetryDisplay::new(&mut capped).print_bar(9).unwrap();

        let mut full = RecordingDisplay::default();
        TelemetryDisplay::new(&mut full).print_bar(8).unwrap();

        assert_eq!(capped.ops, full.ops);
        assert_eq!(capped.ops, vec![Op::WriteChar(FULL_BLOCK)]);
    }

    #[test]
    fn show_readings_draws_one_bar_per_sensor_after_the_clear() {
        let readings: SensorReadings = [0, 125, 500, 875, 1000];
        let mut mock = RecordingDisplay::default();
        TelemetryDisplay::new(&mut mock)
            .show_readings(&readings)
            .unwrap();

        // heights [0, 1, 4, 7, 8]: blank, slot 0, slot 3, slot 6, full block
        assert_eq!(
            mock.ops,
            vec![
                Op::Clear,
                Op::SetCursor(0, 0),
                Op::WriteChar(b' '),
                Op::WriteChar(0),
                Op::WriteChar(3),
                Op::WriteChar(6),
                Op::WriteChar(FULL_BLOCK),
            ]
        );

        let bars = mock.ops.iter().filter(|op| matches!(op, Op::WriteChar(_)));
        assert_eq!(bars.count(), NUM_SENSORS);
        assert_eq!(mock.ops[0], Op::Clear);
    }

    #[test]
    fn readings_past_full_scale_render_as_full_blocks() {
        let readings: SensorReadings = [1500, 2000, 4095, 1001, 1000];
        let mut mock = RecordingDisplay::default();
        TelemetryDisplay::new(&mut mock)
            .show_readings(&readings)
            .unwrap();
        let bars: Vec<&Op> = mock
            .ops
            .iter()
            .filter(|op| matches!(op, Op::WriteChar(_)))
            .collect();
        assert_eq!(bars, vec![&Op::WriteChar(FULL_BLOCK); NUM_SENSORS]);
    }

    #[test]
    fn custom_glyphs_fill_from_the_bottom_of_the_cell() {
        let mut mock = RecordingDisplay::default();
        TelemetryDisplay::new(&mut mock)
            .load_custom_characters()
            .unwrap();

        assert_eq!(mock.ops.len(), NUM_CUSTOM_GLYPHS as usize);
        for (i, op) in mock.ops.iter().enumerate() {
            let Op::CreateChar(slot, pattern) = op else {
                panic!("unexpected operation {:?}", op);
            };
            assert_eq!(*slot, i as u8);
            for (row, &bits) in pattern.iter().enumerate() {
                // slot i lights the bottom i+1 rows, five pixels wide
                let expected = if row + i >= 7 { 63 } else { 0 };
                assert_eq!(bits, expected, "slot {} row {}", i, row);
            }
        }
    }

    #[test]
    fn reloading_glyphs_registers_identical_bitmaps() {
        let mut mock = RecordingDisplay::default();
        let mut telemetry = TelemetryDisplay::new(&mut mock);
        telemetry.load_custom_characters().unwrap();
        telemetry.load_custom_characters().unwrap();

        let count = NUM_CUSTOM_GLYPHS as usize;
        assert_eq!(mock.ops.len(), count * 2);
        assert_eq!(mock.ops[..count], mock.ops[count..]);
    }

    #[test]
    fn status_screens_are_deterministic() {
        let mut first = RecordingDisplay::default();
        let mut second = RecordingDisplay::default();
        TelemetryDisplay::new(&mut first).calibration_message().unwrap();
        TelemetryDisplay::new(&mut second).calibration_message().unwrap();
        assert_eq!(first.ops, second.ops);
        assert_eq!(
            first.ops,
            vec![
                Op::Clear,
                Op::Print("Press A".to_string()),
                Op::SetCursor(0, 1),
                Op::Print("to calib".to_string()),
            ]
        );

        let mut go = RecordingDisplay::default();
        TelemetryDisplay::new(&mut go).go_message().unwrap();
        assert_eq!(go.ops, vec![Op::Clear, Op::Print("Go!".to_string())]);
    }

    #[test]
    fn clear_is_exposed_standalone() {
        let mut mock = RecordingDisplay::default();
        TelemetryDisplay::new(&mut mock).clear().unwrap();
        assert_eq!(mock.ops, vec![Op::Clear]);
    }
}
