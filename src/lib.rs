//! Support library for a differential-drive line-following robot.
//!
//! Everything in here is hardware-independent `no_std` logic: the tuning
//! configuration surface, the sensor bar-graph telemetry display, sensor
//! calibration, and the line-follow controller. The firmware binary binds
//! these to the RP2040 peripherals; the same modules unit-test on the host.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod display;
pub mod sensing;
