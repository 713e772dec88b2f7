//! # Simple Measurement
//! This example demonstrates how to use the HCSR04 sensor with the ranging engine to measure distance in a loop.
//!
//! ## Note
//!
//! Most of the hc-sr04 sensors are rated for 5V. The Raspberry Pi Pico is a 3.3V device. While some hc-sr04 tolerate to be operated on 3.3V, it is not recommended to do so. At best the sensor will have a reduced precision.
//! When operating the sensor at 5V with a 3.3V controller like the Pi Pico, the following considerations must be taken into account:
//!
//! - The trigger pin can be directly connected to the controller. 3.3V should be enough to trigger the sensor.
//! - The echo pin must be connected to the controller through a voltage divider to reduce the voltage from 5V to 3.3V. The echo pin on the hc-sr04 will output 5V when the sensor is operated at 5V and that will then damage the controller.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Duration, Instant, Timer};
use sonar_ranging::{hcsr04::Hcsr04, DistanceUnit, Now, Sonar, TemperatureUnit};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Running!");

    let trigger = Output::new(p.PIN_13, Level::Low);
    let echo = Input::new(p.PIN_28, Pull::None);

    // Create clock function that returns microseconds
    struct EmbassyClock;

    impl Now for EmbassyClock {
        fn now_micros(&self) -> u64 {
            Instant::now().as_micros()
        }
    }

    let mut hcsr04 = Hcsr04::new(trigger, echo, EmbassyClock, Delay);
    if let Err(e) = hcsr04.begin() {
        warn!("Error: {:?}", e);
    }
    let mut sonar = Sonar::new(hcsr04);

    // The temperature of the environment, if known, can be used to adjust the speed of sound.
    // If unknown, the default of 20 degrees Celsius is used.
    sonar.set_air_temperature(24.0, TemperatureUnit::Celsius);

    loop {
        let distance = sonar.read_async(DistanceUnit::Centimeters).await;
        if distance == 0.0 {
            info!("No echo");
        } else {
            info!("Distance: {} cm", distance);
        }
        Timer::after(Duration::from_secs(1)).await;
    }
}
