//! # Filtered Measurement
//! This example polls the HCSR04 sensor through the engine's exponential filter and, for comparison, through a Moving Median Filter.
//! The exponential filter only needs one value of state and reacts smoothly, the median rejects single outliers better but lags by half its window.
//!
//! The exponential filter assumes a steady polling rate, so the loop waits a fixed 25ms between measurements.
//!
//! ## Note
//!
//! The echo pin must be connected to the controller through a voltage divider when the sensor is operated at 5V, see `simple_measurement`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Duration, Instant, Timer};
use moving_median::MovingMedian;
use sonar_ranging::{hcsr04::Hcsr04, DistanceUnit, Now, Sonar};
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

    let mut sonar = Sonar::new(Hcsr04::new(trigger, echo, EmbassyClock, Delay));
    // lower gain, smoother but slower to follow
    sonar.set_gain(0.3);

    let mut moving_median = MovingMedian::<f64, 5>::new();
    let mut count: u32 = 0;

    loop {
        let raw = sonar.read_async(DistanceUnit::Millimeters).await;
        moving_median.add_value(raw as f64);

        let filtered = sonar.filter_read_async(DistanceUnit::Millimeters).await;

        // print every 20th sample, roughly twice per second
        count = count.wrapping_add(1);
        if count % 20 == 0 {
            info!(
                "raw: {} mm, exponential: {} mm, median: {} mm",
                raw,
                filtered,
                moving_median.median()
            );
        }
        Timer::after(Duration::from_millis(25)).await;
    }
}
