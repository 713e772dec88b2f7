//! # Temperature Compensation
//! This example shows how the air temperature changes the distance computed for the same echo.
//! It uses the blocking read path: the driver busy-polls the echo pin, so nothing else runs on the core while a measurement is taken.
//!
//! Every second one echo is measured, then the distance for that echo is shown at several temperatures and with a fixed, calibrated speed of sound.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Duration, Instant, Timer};
use sonar_ranging::{
    environment::sound_speed_at, hcsr04::Hcsr04, Config, DistanceUnit, Now, Sonar, SpeedUnit,
    TemperatureUnit,
};
use {defmt_rtt as _, panic_probe as _};

const TEMPERATURES_F: [f32; 4] = [14.0, 50.0, 77.0, 104.0];

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Running!");

    let trigger = Output::new(p.PIN_13, Level::Low);
    let echo = Input::new(p.PIN_28, Pull::None);

    struct EmbassyClock;

    impl Now for EmbassyClock {
        fn now_micros(&self) -> u64 {
            Instant::now().as_micros()
        }
    }

    let mut sonar = Sonar::with_config(
        Hcsr04::new(trigger, echo, EmbassyClock, Delay),
        Config::imperial(68.0),
    );

    loop {
        let echo_us = sonar.raw_echo_micros();
        if echo_us == 0 {
            info!("No echo");
            Timer::after(Duration::from_secs(1)).await;
            continue;
        }

        for temperature in TEMPERATURES_F {
            sonar.set_air_temperature(temperature, TemperatureUnit::Fahrenheit);
            let speed = sonar.sound_speed(SpeedUnit::MilesPerHour);
            let mm = sound_speed_at(sonar.air_temperature(TemperatureUnit::Celsius))
                * echo_us as f32
                / 2.0;
            info!(
                "{} F: {} mph, {} in",
                temperature,
                speed,
                DistanceUnit::Inches.convert_mm(mm)
            );
        }

        // A calibrated speed overrides the model until the temperature is set again.
        sonar.set_sound_speed(343.0, SpeedUnit::MetersPerSecond);
        info!(
            "calibrated 343 m/s: {} in (air still {} F)",
            sonar.distance(),
            sonar.air_temperature(TemperatureUnit::Fahrenheit)
        );

        Timer::after(Duration::from_secs(1)).await;
    }
}
