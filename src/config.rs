use crate::{
    environment::DEFAULT_AIR_TEMPERATURE,
    filter::DEFAULT_FILTER_GAIN,
    units::{DistanceUnit, TemperatureUnit},
};

/// Polling period the filter gain is tuned for, in microseconds.
pub const DEFAULT_NOMINAL_PERIOD_US: u32 = 25_000;

/// The configuration for the measurement engine.
#[derive(Clone, Copy, Debug, PartialEq, defmt::Format)]
pub struct Config {
    /// Unit used by [`Sonar::distance`](crate::Sonar::distance) and
    /// [`Sonar::filtered_distance`](crate::Sonar::filtered_distance)
    pub distance_unit: DistanceUnit,
    /// Unit `air_temperature` is given in
    pub temperature_unit: TemperatureUnit,
    /// Initial air temperature
    pub air_temperature: f32,
    /// Initial smoothing gain, meaningful in `[0, 1]`
    pub filter_gain: f32,
    /// Polling period the gain is meant for, used by time-aware filtering
    pub nominal_period_us: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distance_unit: DistanceUnit::Centimeters,
            temperature_unit: TemperatureUnit::Celsius,
            air_temperature: DEFAULT_AIR_TEMPERATURE,
            filter_gain: DEFAULT_FILTER_GAIN,
            nominal_period_us: DEFAULT_NOMINAL_PERIOD_US,
        }
    }
}

impl Config {
    /// Config for imperial readings: inches and degrees Fahrenheit
    pub const fn imperial(air_temperature_f: f32) -> Self {
        Self {
            distance_unit: DistanceUnit::Inches,
            temperature_unit: TemperatureUnit::Fahrenheit,
            air_temperature: air_temperature_f,
            filter_gain: DEFAULT_FILTER_GAIN,
            nominal_period_us: DEFAULT_NOMINAL_PERIOD_US,
        }
    }

    /// Config for metric readings in the given distance unit, temperature in °C
    pub const fn metric(distance_unit: DistanceUnit, air_temperature_c: f32) -> Self {
        Self {
            distance_unit,
            temperature_unit: TemperatureUnit::Celsius,
            air_temperature: air_temperature_c,
            filter_gain: DEFAULT_FILTER_GAIN,
            nominal_period_us: DEFAULT_NOMINAL_PERIOD_US,
        }
    }
}
