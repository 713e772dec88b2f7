//! Units accepted at the public boundary and their conversions to and from
//! the canonical internal units (millimeters, degrees Celsius, mm/µs).
//!
//! Each unit also has a numeric selector code. `from_code` silently falls
//! back to the canonical unit on an unknown code, use `TryFrom<u8>` when an
//! unknown code should be rejected instead.

use defmt::warn;

use crate::error::Error;

/// Millimeters to centimeters.
const MM_TO_CM: f32 = 0.1;
/// Millimeters to inches.
const MM_TO_IN: f32 = 0.03937;

/// mm/µs to meters per second.
const MM_PER_US_TO_M_PER_S: f32 = 1000.0;
/// mm/µs to inches per second.
const MM_PER_US_TO_IN_PER_S: f32 = 39370.0;
/// mm/µs to kilometers per hour.
const MM_PER_US_TO_KM_PER_H: f32 = 3600.0;
/// mm/µs to miles per hour.
const MM_PER_US_TO_MI_PER_H: f32 = 2237.0;

/// Offset between the Celsius and Kelvin scales.
const KELVIN_OFFSET: f32 = 273.15;

/// The distance unit to use for measurements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, defmt::Format)]
pub enum DistanceUnit {
    Millimeters,
    #[default]
    Centimeters,
    Inches,
}

/// The temperature unit used to set or read the air temperature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, defmt::Format)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

/// The unit used to set or read the speed of sound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, defmt::Format)]
pub enum SpeedUnit {
    #[default]
    MetersPerSecond,
    InchesPerSecond,
    KilometersPerHour,
    MilesPerHour,
}

impl DistanceUnit {
    /// Unit for a numeric selector code, unknown codes read as millimeters.
    pub fn from_code(code: u8) -> Self {
        DistanceUnit::try_from(code).unwrap_or_else(|_| {
            warn!("unknown distance unit {}, using millimeters", code);
            DistanceUnit::Millimeters
        })
    }

    /// Convert a distance in millimeters to this unit.
    pub fn convert_mm(self, mm: f32) -> f32 {
        match self {
            DistanceUnit::Millimeters => mm,
            DistanceUnit::Centimeters => mm * MM_TO_CM,
            DistanceUnit::Inches => mm * MM_TO_IN,
        }
    }

    /// Convert a distance in this unit to millimeters.
    pub fn to_mm(self, value: f32) -> f32 {
        match self {
            DistanceUnit::Millimeters => value,
            DistanceUnit::Centimeters => value / MM_TO_CM,
            DistanceUnit::Inches => value / MM_TO_IN,
        }
    }

    /// Numeric selector code of this unit
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TemperatureUnit {
    /// Unit for a numeric selector code, unknown codes read as Celsius.
    pub fn from_code(code: u8) -> Self {
        TemperatureUnit::try_from(code).unwrap_or_else(|_| {
            warn!("unknown temperature unit {}, using Celsius", code);
            TemperatureUnit::Celsius
        })
    }

    /// Convert a temperature in degrees Celsius to this unit.
    pub fn convert_celsius(self, celsius: f32) -> f32 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
            TemperatureUnit::Kelvin => celsius_to_kelvin(celsius),
        }
    }

    /// Convert a temperature in this unit to degrees Celsius.
    pub fn to_celsius(self, value: f32) -> f32 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => fahrenheit_to_celsius(value),
            TemperatureUnit::Kelvin => kelvin_to_celsius(value),
        }
    }

    /// Numeric selector code of this unit
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl SpeedUnit {
    /// Unit for a numeric selector code, unknown codes read as m/s.
    pub fn from_code(code: u8) -> Self {
        SpeedUnit::try_from(code).unwrap_or_else(|_| {
            warn!("unknown speed unit {}, using m/s", code);
            SpeedUnit::MetersPerSecond
        })
    }

    /// Convert a speed in mm/µs to this unit.
    ///
    /// The factors are rounded: 1 mm/µs is taken as exactly 39370 in/s and
    /// 2237 mph.
    pub fn convert_mm_per_us(self, speed: f32) -> f32 {
        speed * self.factor()
    }

    /// Convert a speed in this unit to mm/µs.
    pub fn to_mm_per_us(self, value: f32) -> f32 {
        value / self.factor()
    }

    /// Numeric selector code of this unit
    pub const fn code(self) -> u8 {
        self as u8
    }

    const fn factor(self) -> f32 {
        match self {
            SpeedUnit::MetersPerSecond => MM_PER_US_TO_M_PER_S,
            SpeedUnit::InchesPerSecond => MM_PER_US_TO_IN_PER_S,
            SpeedUnit::KilometersPerHour => MM_PER_US_TO_KM_PER_H,
            SpeedUnit::MilesPerHour => MM_PER_US_TO_MI_PER_H,
        }
    }
}

impl TryFrom<u8> for DistanceUnit {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DistanceUnit::Millimeters),
            1 => Ok(DistanceUnit::Centimeters),
            2 => Ok(DistanceUnit::Inches),
            _ => Err(Error::UnknownUnit(code)),
        }
    }
}

impl TryFrom<u8> for TemperatureUnit {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TemperatureUnit::Celsius),
            1 => Ok(TemperatureUnit::Fahrenheit),
            2 => Ok(TemperatureUnit::Kelvin),
            _ => Err(Error::UnknownUnit(code)),
        }
    }
}

impl TryFrom<u8> for SpeedUnit {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SpeedUnit::MetersPerSecond),
            1 => Ok(SpeedUnit::InchesPerSecond),
            2 => Ok(SpeedUnit::KilometersPerHour),
            3 => Ok(SpeedUnit::MilesPerHour),
            _ => Err(Error::UnknownUnit(code)),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn celsius_to_kelvin(celsius: f32) -> f32 {
    celsius + KELVIN_OFFSET
}

pub fn fahrenheit_to_celsius(fahrenheit: f32) -> f32 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn fahrenheit_to_kelvin(fahrenheit: f32) -> f32 {
    celsius_to_kelvin(fahrenheit_to_celsius(fahrenheit))
}

pub fn kelvin_to_celsius(kelvin: f32) -> f32 {
    kelvin - KELVIN_OFFSET
}

pub fn kelvin_to_fahrenheit(kelvin: f32) -> f32 {
    celsius_to_fahrenheit(kelvin_to_celsius(kelvin))
}
