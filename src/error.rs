//! Errors reported by the sensor drivers and the strict unit parsers.
//!
//! The measurement engine itself never fails; see [`crate::NO_ECHO`].

use core::fmt;

/// Errors that can occur while timing an echo or parsing a unit selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub enum Error {
    /// The echo line was already high before the trigger pulse was sent
    EchoAlreadyHigh,
    /// Reading the echo line failed
    EchoPin,
    /// Driving the trigger line failed
    TriggerPin,
    /// The echo line did not go high within the timeout
    EchoTimeout,
    /// The echo line did not go low again within the timeout
    EchoTooLong,
    /// A numeric unit selector did not name any known unit
    UnknownUnit(u8),
}

impl Error {
    /// Short human readable description
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::EchoAlreadyHigh => "Echo pin is already high",
            Error::EchoPin => "Error reading echo pin",
            Error::TriggerPin => "Error driving trigger pin",
            Error::EchoTimeout => "Timeout waiting for echo pin to go high",
            Error::EchoTooLong => "Timeout waiting for echo pin to go low",
            Error::UnknownUnit(_) => "Unknown unit selector",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownUnit(code) => write!(f, "{} ({})", self.as_str(), code),
            _ => f.write_str(self.as_str()),
        }
    }
}
