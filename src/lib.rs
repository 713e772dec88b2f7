//! # sonar-ranging
//!
//! This crate turns the echo time of an ultrasonic rangefinder into a
//! temperature compensated distance, optionally smoothed by an exponential
//! filter, in millimeters, centimeters or inches.
//!
//! The speed of sound is modeled from the air temperature
//! (`331.3 + 0.606 * T` m/s). It can also be overridden directly, e.g. with a
//! calibrated value. Any sensor that can report a round-trip echo time in
//! microseconds plugs in through [`EchoSource`] (blocking) or
//! [`AsyncEchoSource`]. A driver for four-pin trigger/echo sensors such as the
//! HC-SR04 is included in [`hcsr04`].
//!
//! ## Features
//!
//! - `blocking_trigger`: (Default) Block for the 10us trigger pulse on the
//!   async path, see [`hcsr04`].
//!
//! # Example
//!
//! ```rust, ignore
//! #![no_std]
//! #![no_main]
//!
//! use defmt::*;
//! use embassy_executor::Spawner;
//! use embassy_rp::gpio::{Input, Level, Output, Pull};
//! use embassy_time::{Delay, Duration, Instant, Timer};
//! use sonar_ranging::{hcsr04::Hcsr04, DistanceUnit, Now, Sonar, TemperatureUnit};
//! use {defmt_rtt as _, panic_probe as _};
//!
//! #[embassy_executor::main]
//! async fn main(_spawner: Spawner) {
//!     let p = embassy_rp::init(Default::default());
//!
//!     let trigger = Output::new(p.PIN_13, Level::Low);
//!     let echo = Input::new(p.PIN_28, Pull::None);
//!
//!     struct EmbassyClock;
//!
//!     impl Now for EmbassyClock {
//!         fn now_micros(&self) -> u64 {
//!             Instant::now().as_micros()
//!         }
//!     }
//!
//!     let mut sonar = Sonar::new(Hcsr04::new(trigger, echo, EmbassyClock, Delay));
//!     sonar.set_air_temperature(24.0, TemperatureUnit::Celsius);
//!
//!     loop {
//!         let distance = sonar.filter_read(DistanceUnit::Centimeters);
//!         info!("Distance: {} cm", distance);
//!         Timer::after(Duration::from_millis(25)).await;
//!     }
//! }
//! ```

#![no_std]

mod config;
mod engine;
pub mod environment;
mod error;
pub mod filter;
pub mod hcsr04;
mod source;
pub mod units;

#[cfg(test)]
mod test_support;

pub use config::{Config, DEFAULT_NOMINAL_PERIOD_US};
pub use engine::Sonar;
pub use error::Error;
pub use source::{AsyncEchoSource, EchoSource, Now, NO_ECHO};
pub use units::{DistanceUnit, SpeedUnit, TemperatureUnit};
