use embedded_hal::{delay::DelayNs, i2c::I2c};
#[cfg(not(feature = "display-pcf8574t"))]
use i2c_character_display::AdafruitLCDBackpack;
#[cfg(feature = "display-pcf8574t")]
use i2c_character_display::CharacterDisplayPCF8574T;
use i2c_character_display::LcdDisplayType;
use rp2040_line_follower::display::CharacterDisplay;

#[cfg(not(feature = "display-pcf8574t"))]
type Backpack<TWI, DELAY> = AdafruitLCDBackpack<TWI, DELAY>;
#[cfg(feature = "display-pcf8574t")]
type Backpack<TWI, DELAY> = CharacterDisplayPCF8574T<TWI, DELAY>;

/// The robot's 16x2 character display on its I2C backpack, behind the
/// display capability the telemetry rendering consumes. The backpack
/// flavor is picked at build time by the `display-pcf8574t` feature.
pub struct Lcd<TWI, DELAY>
where
    TWI: I2c,
    DELAY: DelayNs,
{
    lcd: Backpack<TWI, DELAY>,
}

impl<TWI, DELAY> Lcd<TWI, DELAY>
where
    TWI: I2c,
    DELAY: DelayNs,
{
    pub fn new(i2c: TWI, delay: DELAY) -> Self {
        Self {
            lcd: Backpack::new(i2c, LcdDisplayType::Lcd16x2, delay),
        }
    }

    pub fn init(&mut self) -> Result<(), i2c_character_display::Error<TWI>> {
        self.lcd.init()?;
        Ok(())
    }
}

impl<TWI, DELAY> CharacterDisplay for Lcd<TWI, DELAY>
where
    TWI: I2c,
    DELAY: DelayNs,
{
    type Error = i2c_character_display::Error<TWI>;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.lcd.clear()?;
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        self.lcd.set_cursor(col, row)?;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), Self::Error> {
        self.lcd.print(text)?;
        Ok(())
    }

    fn write_raw_char(&mut self, code: u8) -> Result<(), Self::Error> {
        // the driver writes one byte per char, so codes above 0x7F (the
        // glyph slots are below it, the full block is 0xFF) pass through
        // as single display bytes
        let mut buf = [0u8; 4];
        self.lcd.print((code as char).encode_utf8(&mut buf))?;
        Ok(())
    }

    fn create_char(&mut self, slot: u8, pattern: [u8; 8]) -> Result<(), Self::Error> {
        self.lcd.create_char(slot, pattern)?;
        Ok(())
    }
}
