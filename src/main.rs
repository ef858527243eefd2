//! Line-follower firmware for a Raspberry Pi Pico robot.
//!
//! Wiring: motor phase pins on GP8/GP9 with PWM enables on GP6/GP7, user
//! button on GP21 (active low), sensor multiplexer select lines on
//! GP10-GP12 with the shared analog input on GP26, and the character
//! display on I2C0 (GP4/GP5).
#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]

#[cfg(target_arch = "arm")]
mod driver;
#[cfg(target_arch = "arm")]
mod robot;
#[cfg(target_arch = "arm")]
mod system;

#[cfg(target_arch = "arm")]
use defmt::*;
#[cfg(target_arch = "arm")]
use defmt_rtt as _;
#[cfg(target_arch = "arm")]
use panic_probe as _;

#[cfg(target_arch = "arm")]
use rp_pico as bsp;

#[cfg(target_arch = "arm")]
use bsp::entry;
#[cfg(target_arch = "arm")]
use bsp::hal::{
    adc::{Adc, AdcPin},
    clocks::init_clocks_and_plls,
    fugit::RateExtU32,
    gpio::{FunctionI2C, Pin, PullUp},
    pac,
    pwm::Slices,
    sio::Sio,
    watchdog::Watchdog,
    Timer, I2C,
};

#[cfg(target_arch = "arm")]
use crate::{
    driver::Driver,
    robot::{reflectance_array::ReflectanceArray, Robot},
    system::millis::init_millis,
};
#[cfg(target_arch = "arm")]
use rp2040_line_follower::config::Tuning;

#[cfg(target_arch = "arm")]
#[entry]
fn main() -> ! {
    info!("Program start");
    let mut pac = pac::Peripherals::take().unwrap();
    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let sio = Sio::new(pac.SIO);

    // External high-speed crystal on the pico board is 12Mhz
    let external_xtal_freq_hz = 12_000_000u32;
    let clocks = init_clocks_and_plls(
        external_xtal_freq_hz,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    init_millis(timer);

    let pins = bsp::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // Init PWMs for the motor enables
    let pwm_slices = Slices::new(pac.PWM, &mut pac.RESETS);
    let mut pwm3 = pwm_slices.pwm3;
    pwm3.set_ph_correct();
    pwm3.enable();

    let mut channel_a = pwm3.channel_a;
    let mut channel_b = pwm3.channel_b;
    channel_a.output_to(pins.gpio6);
    channel_b.output_to(pins.gpio7);

    // I2C bus for the character display
    let sda_pin: Pin<_, FunctionI2C, PullUp> = pins.gpio4.reconfigure();
    let scl_pin: Pin<_, FunctionI2C, PullUp> = pins.gpio5.reconfigure();
    let i2c = I2C::i2c0(
        pac.I2C0,
        sda_pin,
        scl_pin,
        400.kHz(),
        &mut pac.RESETS,
        &clocks.system_clock,
    );

    // sensor array: multiplexer select lines plus the shared ADC input
    let adc = Adc::new(pac.ADC, &mut pac.RESETS);
    let sense_pin = AdcPin::new(pins.gpio26.into_floating_input()).unwrap();
    let sensor_array = ReflectanceArray::new(
        pins.gpio10.into_push_pull_output(),
        pins.gpio11.into_push_pull_output(),
        pins.gpio12.into_push_pull_output(),
        adc,
        sense_pin,
        timer,
    );

    let tuning = Tuning::new();
    let robot = Robot::new(
        pins.gpio8.into_push_pull_output(),
        channel_a,
        pins.gpio9.into_push_pull_output(),
        channel_b,
        pins.gpio21.into_pull_up_input(),
        sensor_array,
        i2c,
        tuning.max_speed,
        timer,
    );
    info!("robot created");

    let led_pin = pins.led.into_push_pull_output();
    let mut driver = Driver::new(robot, tuning, timer, led_pin);
    driver.run()
}

#[cfg(not(target_arch = "arm"))]
fn main() {
    // Firmware entry only exists for the RP2040 target. Host builds are
    // for the library's unit tests.
}
