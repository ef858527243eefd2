pub mod millis;
