//! Driver for four-pin trigger/echo ultrasonic rangefinders (HC-SR04,
//! HC-SR05 and compatibles).
//!
//! The sensor is started with a 10 µs high pulse on the trigger pin. It then
//! emits a burst and raises the echo pin until the reflection arrives, so the
//! width of the echo pulse is the round-trip time of flight.
//!
//! Both a blocking path ([`EchoSource`]) and an async path
//! ([`AsyncEchoSource`]) are provided. The blocking path busy-polls the echo
//! pin against the [`Now`] clock, the async path waits for the echo edges
//! with `embedded-hal-async` and races them against a delay.
//!
//! ## Features
//!
//! - `blocking_trigger`: (Default) The trigger pulse on the async path blocks
//!   instead of awaiting. For 10us async is not very accurate, because it
//!   introduces a few microseconds of management. Most sensors still trigger
//!   on a longer pulse, so disable this if the core must not block at all.
//!
//! # Example
//!
//! ```rust, ignore
//! let trigger = Output::new(p.PIN_13, Level::Low);
//! let echo = Input::new(p.PIN_28, Pull::None);
//!
//! struct EmbassyClock;
//!
//! impl Now for EmbassyClock {
//!     fn now_micros(&self) -> u64 {
//!         Instant::now().as_micros()
//!     }
//! }
//!
//! let mut hcsr04 = Hcsr04::new(trigger, echo, EmbassyClock, Delay);
//! hcsr04.begin().ok();
//! let mut sonar = Sonar::new(hcsr04);
//! let cm = sonar.read(DistanceUnit::Centimeters);
//! ```

use defmt::debug;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};
use embedded_hal_async::{delay::DelayNs as DelayNsAsync, digital::Wait};
use futures::{select_biased, FutureExt};

use crate::{
    error::Error,
    source::{AsyncEchoSource, EchoSource, Now, NO_ECHO},
};

/// Length of the trigger pulse.
const TRIGGER_PULSE_US: u32 = 10;

/// Timing limits of a measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub struct Timing {
    /// Give up when the echo pin does not change within this time. The
    /// HC-SR04 drops the echo after about 38 ms when nothing is in range.
    pub echo_timeout_us: u32,
    /// Minimum time between the end of one echo and the next trigger, so a
    /// late reflection of the previous burst is not taken for the new one.
    pub min_cycle_us: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            echo_timeout_us: 40_000,
            min_cycle_us: 25_000,
        }
    }
}

/// The HC-SR04 ultrasonic distance sensor driver.
///
/// # Note
///
/// A measurement fails if the echo pin is already high, or if the echo pin
/// does not go high or low again within [`Timing::echo_timeout_us`].
/// Used as an [`EchoSource`], failures read as [`NO_ECHO`].
pub struct Hcsr04<TRIGPIN, ECHOPIN, CLOCK, DELAY> {
    trigger: TRIGPIN,
    echo: ECHOPIN,
    clock: CLOCK,
    delay: DELAY,
    timing: Timing,
    last_echo_end: Option<u64>,
}

impl<TRIGPIN, ECHOPIN, CLOCK, DELAY> Hcsr04<TRIGPIN, ECHOPIN, CLOCK, DELAY> {
    /// Initialize a new sensor with default timing.
    /// Requires trigger pin and an echo pin, measurements are taken on the echo pin.
    /// Requires a clock that will provide the time in microseconds via the `Now` trait.
    /// Requires a delay that implements DelayNs, sync and async for the async path.
    pub fn new(trigger: TRIGPIN, echo: ECHOPIN, clock: CLOCK, delay: DELAY) -> Self {
        Self::with_timing(trigger, echo, clock, delay, Timing::default())
    }

    pub fn with_timing(
        trigger: TRIGPIN,
        echo: ECHOPIN,
        clock: CLOCK,
        delay: DELAY,
        timing: Timing,
    ) -> Self {
        Self {
            trigger,
            echo,
            clock,
            delay,
            timing,
            last_echo_end: None,
        }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Release the pins, clock and delay.
    pub fn release(self) -> (TRIGPIN, ECHOPIN, CLOCK, DELAY) {
        (self.trigger, self.echo, self.clock, self.delay)
    }
}

impl<TRIGPIN, ECHOPIN, CLOCK, DELAY> Hcsr04<TRIGPIN, ECHOPIN, CLOCK, DELAY>
where
    TRIGPIN: OutputPin,
    ECHOPIN: InputPin,
    CLOCK: Now,
    DELAY: DelayNs,
{
    /// Put the trigger pin into its idle (low) state.
    pub fn begin(&mut self) -> Result<(), Error> {
        self.trigger.set_low().map_err(|_| Error::TriggerPin)
    }

    /// Measure the width of one echo pulse in microseconds, blocking until
    /// the echo ends or times out.
    pub fn echo_micros(&mut self) -> Result<u32, Error> {
        let wait = self.cycle_remaining_us();
        if wait > 0 {
            DelayNs::delay_us(&mut self.delay, wait);
        }

        self.check_echo_idle()?;
        self.trigger.set_high().map_err(|_| Error::TriggerPin)?;
        DelayNs::delay_us(&mut self.delay, TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(|_| Error::TriggerPin)?;

        let timeout = u64::from(self.timing.echo_timeout_us);

        let wait_start = self.clock.now_micros();
        while !self.echo_is_high()? {
            if self.clock.now_micros().saturating_sub(wait_start) > timeout {
                return Err(Error::EchoTimeout);
            }
        }

        let start = self.clock.now_micros();
        while self.echo_is_high()? {
            if self.clock.now_micros().saturating_sub(start) > timeout {
                return Err(Error::EchoTooLong);
            }
        }
        let end = self.clock.now_micros();

        Ok(self.finish(start, end))
    }

    fn echo_is_high(&mut self) -> Result<bool, Error> {
        self.echo.is_high().map_err(|_| Error::EchoPin)
    }

    // error if the echo pin is already high
    fn check_echo_idle(&mut self) -> Result<(), Error> {
        if self.echo_is_high()? {
            return Err(Error::EchoAlreadyHigh);
        }
        Ok(())
    }

    /// Time still to wait before the next trigger is allowed.
    fn cycle_remaining_us(&self) -> u32 {
        match self.last_echo_end {
            Some(end) => {
                let elapsed = self.clock.now_micros().saturating_sub(end);
                let remaining = u64::from(self.timing.min_cycle_us).saturating_sub(elapsed);
                // bounded by min_cycle_us
                remaining as u32
            }
            None => 0,
        }
    }

    fn finish(&mut self, start: u64, end: u64) -> u32 {
        self.last_echo_end = Some(end);
        u32::try_from(end.saturating_sub(start)).unwrap_or(u32::MAX)
    }
}

impl<TRIGPIN, ECHOPIN, CLOCK, DELAY> Hcsr04<TRIGPIN, ECHOPIN, CLOCK, DELAY>
where
    TRIGPIN: OutputPin,
    ECHOPIN: InputPin + Wait,
    CLOCK: Now,
    DELAY: DelayNs + DelayNsAsync,
{
    /// Measure the width of one echo pulse in microseconds, awaiting the
    /// echo edges.
    pub async fn echo_micros_async(&mut self) -> Result<u32, Error> {
        let wait = self.cycle_remaining_us();
        if wait > 0 {
            DelayNsAsync::delay_us(&mut self.delay, wait).await;
        }

        self.check_echo_idle()?;

        // Send a 10us pulse to the trigger pin
        self.trigger.set_high().map_err(|_| Error::TriggerPin)?;

        // Either block for or wait for 10us, depending on active feature flag
        #[cfg(feature = "blocking_trigger")]
        DelayNs::delay_us(&mut self.delay, TRIGGER_PULSE_US);
        #[cfg(not(feature = "blocking_trigger"))]
        DelayNsAsync::delay_us(&mut self.delay, TRIGGER_PULSE_US).await;

        self.trigger.set_low().map_err(|_| Error::TriggerPin)?;

        let timeout = self.timing.echo_timeout_us;

        let start = select_biased! {
            res = self.echo.wait_for_high().fuse() => {
                res.map_err(|_| Error::EchoPin)?;
                Now::now_micros(&self.clock)
            }
            _ = DelayNsAsync::delay_us(&mut self.delay, timeout).fuse() => {
                return Err(Error::EchoTimeout);
            }
        };

        let end = select_biased! {
            res = self.echo.wait_for_low().fuse() => {
                res.map_err(|_| Error::EchoPin)?;
                Now::now_micros(&self.clock)
            }
            _ = DelayNsAsync::delay_us(&mut self.delay, timeout).fuse() => {
                return Err(Error::EchoTooLong);
            }
        };

        Ok(self.finish(start, end))
    }
}

impl<TRIGPIN, ECHOPIN, CLOCK, DELAY> EchoSource for Hcsr04<TRIGPIN, ECHOPIN, CLOCK, DELAY>
where
    TRIGPIN: OutputPin,
    ECHOPIN: InputPin,
    CLOCK: Now,
    DELAY: DelayNs,
{
    fn raw_echo_micros(&mut self) -> u32 {
        self.echo_micros().unwrap_or_else(|e| {
            debug!("hc-sr04: {}", e);
            NO_ECHO
        })
    }
}

impl<TRIGPIN, ECHOPIN, CLOCK, DELAY> AsyncEchoSource for Hcsr04<TRIGPIN, ECHOPIN, CLOCK, DELAY>
where
    TRIGPIN: OutputPin,
    ECHOPIN: InputPin + Wait,
    CLOCK: Now,
    DELAY: DelayNs + DelayNsAsync,
{
    async fn raw_echo_micros(&mut self) -> u32 {
        self.echo_micros_async().await.unwrap_or_else(|e| {
            debug!("hc-sr04: {}", e);
            NO_ECHO
        })
    }
}
