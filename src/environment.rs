//! Air temperature and the speed of sound derived from it.

use crate::units::{SpeedUnit, TemperatureUnit};

/// Air temperature assumed until the application sets one, in °C.
pub const DEFAULT_AIR_TEMPERATURE: f32 = 20.0;

/// Speed of sound in mm/µs for an air temperature in °C.
///
/// Linear approximation `331.3 + 0.606 * T` m/s, scaled to mm/µs.
pub fn sound_speed_at(celsius: f32) -> f32 {
    (331.3 + 0.606 * celsius) / 1000.0
}

/// Environmental state used to turn echo time into distance.
///
/// Temperature and speed are both stored. Setting the temperature always
/// recomputes the speed, setting the speed directly leaves the temperature
/// alone so a measured or calibrated speed can override the model.
#[derive(Clone, Copy, Debug, PartialEq, defmt::Format)]
pub struct SoundModel {
    temperature_c: f32,
    speed_mm_per_us: f32,
}

impl Default for SoundModel {
    fn default() -> Self {
        Self::at_celsius(DEFAULT_AIR_TEMPERATURE)
    }
}

impl SoundModel {
    /// Model for air at the given temperature in °C.
    pub fn at_celsius(celsius: f32) -> Self {
        Self {
            temperature_c: celsius,
            speed_mm_per_us: sound_speed_at(celsius),
        }
    }

    pub fn set_air_temperature(&mut self, value: f32, unit: TemperatureUnit) {
        self.temperature_c = unit.to_celsius(value);
        self.speed_mm_per_us = sound_speed_at(self.temperature_c);
    }

    pub fn air_temperature(&self, unit: TemperatureUnit) -> f32 {
        unit.convert_celsius(self.temperature_c)
    }

    /// Override the speed of sound. The stored temperature is kept as is and
    /// may no longer match the speed afterwards.
    pub fn set_sound_speed(&mut self, value: f32, unit: SpeedUnit) {
        self.speed_mm_per_us = unit.to_mm_per_us(value);
    }

    pub fn sound_speed(&self, unit: SpeedUnit) -> f32 {
        unit.convert_mm_per_us(self.speed_mm_per_us)
    }

    /// Speed of sound in the canonical mm/µs.
    pub fn speed_mm_per_us(&self) -> f32 {
        self.speed_mm_per_us
    }

    /// One-way distance in millimeters for a round-trip echo time.
    pub fn distance_mm(&self, echo_micros: u32) -> f32 {
        self.speed_mm_per_us * echo_micros as f32 / 2.0
    }
}
