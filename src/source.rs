//! Raw echo timing sources.
//!
//! A source is anything that can fire one ultrasonic ping and report how long
//! the echo took to come back. The measurement engine only depends on these
//! traits, never on a particular sensor's wiring.

/// Echo time reported when no echo was detected (timeout, wiring fault, ...).
///
/// Converts to a distance of zero. Callers that need to tell "no echo" apart
/// from "very close" should look at the raw echo time.
pub const NO_ECHO: u32 = 0;

/// Blocking source of raw echo times.
pub trait EchoSource {
    /// Fire one ping and return the round-trip echo time in microseconds,
    /// or [`NO_ECHO`] when nothing came back in time.
    ///
    /// May block for as long as the source's timeout.
    fn raw_echo_micros(&mut self) -> u32;
}

impl<T: EchoSource + ?Sized> EchoSource for &mut T {
    fn raw_echo_micros(&mut self) -> u32 {
        T::raw_echo_micros(self)
    }
}

/// Async source of raw echo times.
///
/// Same contract as [`EchoSource`], for drivers that wait for the echo edges
/// without blocking the executor.
#[allow(async_fn_in_trait)]
pub trait AsyncEchoSource {
    async fn raw_echo_micros(&mut self) -> u32;
}

impl<T: AsyncEchoSource + ?Sized> AsyncEchoSource for &mut T {
    async fn raw_echo_micros(&mut self) -> u32 {
        T::raw_echo_micros(self).await
    }
}

pub trait Now {
    // The time elapsed since startup in microseconds
    fn now_micros(&self) -> u64;
}

impl<T: Now + ?Sized> Now for &T {
    fn now_micros(&self) -> u64 {
        T::now_micros(self)
    }
}
