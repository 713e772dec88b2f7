//! The measurement engine: echo time in, calibrated distance out.

use defmt::trace;

use crate::{
    config::Config,
    environment::SoundModel,
    filter::ExponentialFilter,
    source::{AsyncEchoSource, EchoSource},
    units::{DistanceUnit, SpeedUnit, TemperatureUnit},
};

/// Temperature compensated distance measurement on top of any echo source.
///
/// Internally everything is kept in millimeters, degrees Celsius and mm/µs,
/// conversion to the caller's units happens in the accessors.
///
/// `read` takes a single measurement and leaves the filter alone, which suits
/// one-shot measurements such as on a button press. `filter_read` feeds every
/// measurement through an exponential filter and is meant to be called from a
/// polling loop at a steady rate, e.g. for obstacle avoidance.
pub struct Sonar<S> {
    source: S,
    model: SoundModel,
    filter: ExponentialFilter,
    distance_unit: DistanceUnit,
    nominal_period_us: u32,
}

impl<S> Sonar<S> {
    /// Initialize an engine with the default config: 20 °C, gain 0.485,
    /// readings in centimeters.
    pub fn new(source: S) -> Self {
        Self::with_config(source, Config::default())
    }

    pub fn with_config(source: S, config: Config) -> Self {
        let mut model = SoundModel::default();
        model.set_air_temperature(config.air_temperature, config.temperature_unit);
        Self {
            source,
            model,
            filter: ExponentialFilter::new(config.filter_gain),
            distance_unit: config.distance_unit,
            nominal_period_us: config.nominal_period_us,
        }
    }

    /// Set the air temperature. This always recomputes the speed of sound,
    /// discarding a speed set with [`set_sound_speed`](Self::set_sound_speed).
    pub fn set_air_temperature(&mut self, value: f32, unit: TemperatureUnit) {
        self.model.set_air_temperature(value, unit);
        trace!(
            "air temperature {} C, sound speed {} mm/us",
            self.model.air_temperature(TemperatureUnit::Celsius),
            self.model.speed_mm_per_us()
        );
    }

    pub fn air_temperature(&self, unit: TemperatureUnit) -> f32 {
        self.model.air_temperature(unit)
    }

    /// Set the speed of sound directly. The stored air temperature is not
    /// changed, so the two may disagree afterwards.
    pub fn set_sound_speed(&mut self, value: f32, unit: SpeedUnit) {
        self.model.set_sound_speed(value, unit);
    }

    pub fn sound_speed(&self, unit: SpeedUnit) -> f32 {
        self.model.sound_speed(unit)
    }

    /// Set the smoothing gain used by `filter_read`. Not validated, only
    /// values in `[0, 1]` give a stable filter.
    pub fn set_gain(&mut self, gain: f32) {
        self.filter.set_gain(gain);
    }

    pub fn gain(&self) -> f32 {
        self.filter.gain()
    }

    /// Zero the filter state.
    pub fn reset_filter(&mut self) {
        self.filter.reset(0.0);
    }

    /// Seed the filter state with a known distance.
    pub fn reset_filter_to(&mut self, value: f32, unit: DistanceUnit) {
        self.filter.reset(unit.to_mm(value));
    }

    /// Last filtered distance without taking a new measurement.
    pub fn last_filtered(&self, unit: DistanceUnit) -> f32 {
        unit.convert_mm(self.filter.value())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Give back the echo source.
    pub fn release(self) -> S {
        self.source
    }

    fn distance_mm(&self, echo_micros: u32) -> f32 {
        let mm = self.model.distance_mm(echo_micros);
        trace!("echo {} us -> {} mm", echo_micros, mm);
        mm
    }

    fn filtered_mm(&mut self, echo_micros: u32) -> f32 {
        let raw = self.distance_mm(echo_micros);
        self.filter.update(raw)
    }
}

impl<S: EchoSource> Sonar<S> {
    /// Round-trip echo time of one ping, in microseconds.
    pub fn raw_echo_micros(&mut self) -> u32 {
        EchoSource::raw_echo_micros(&mut self.source)
    }

    /// Take one measurement and return it in the given unit. The filter is
    /// not touched.
    pub fn read(&mut self, unit: DistanceUnit) -> f32 {
        let echo = EchoSource::raw_echo_micros(&mut self.source);
        unit.convert_mm(self.distance_mm(echo))
    }

    /// Take one measurement, blend it into the filter and return the
    /// updated filtered distance in the given unit.
    pub fn filter_read(&mut self, unit: DistanceUnit) -> f32 {
        let echo = EchoSource::raw_echo_micros(&mut self.source);
        unit.convert_mm(self.filtered_mm(echo))
    }

    /// Like [`filter_read`](Self::filter_read), with the gain rescaled for
    /// `elapsed_us` since the previous call relative to the configured
    /// nominal polling period.
    pub fn filter_read_elapsed(&mut self, unit: DistanceUnit, elapsed_us: u32) -> f32 {
        let echo = EchoSource::raw_echo_micros(&mut self.source);
        let raw = self.distance_mm(echo);
        let mm = self
            .filter
            .update_elapsed(raw, elapsed_us, self.nominal_period_us);
        unit.convert_mm(mm)
    }

    /// [`read`](Self::read) in the configured distance unit.
    pub fn distance(&mut self) -> f32 {
        self.read(self.distance_unit)
    }

    /// [`filter_read`](Self::filter_read) in the configured distance unit.
    pub fn filtered_distance(&mut self) -> f32 {
        self.filter_read(self.distance_unit)
    }
}

impl<S: AsyncEchoSource> Sonar<S> {
    /// Async counterpart of [`read`](Self::read).
    pub async fn read_async(&mut self, unit: DistanceUnit) -> f32 {
        let echo = AsyncEchoSource::raw_echo_micros(&mut self.source).await;
        unit.convert_mm(self.distance_mm(echo))
    }

    /// Async counterpart of [`filter_read`](Self::filter_read).
    pub async fn filter_read_async(&mut self, unit: DistanceUnit) -> f32 {
        let echo = AsyncEchoSource::raw_echo_micros(&mut self.source).await;
        unit.convert_mm(self.filtered_mm(echo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{close, ScriptedEcho};
    use embassy_futures::block_on;

    #[test]
    fn defaults() {
        let sonar = Sonar::new(ScriptedEcho::constant(0));
        assert_eq!(sonar.air_temperature(TemperatureUnit::Celsius), 20.0);
        assert!(close(sonar.sound_speed(SpeedUnit::MetersPerSecond), 343.42, 1e-3));
        assert_eq!(sonar.gain(), 0.485);
        assert_eq!(sonar.last_filtered(DistanceUnit::Millimeters), 0.0);
    }

    #[test]
    fn one_millisecond_echo_at_twenty_degrees() {
        let mut sonar = Sonar::new(ScriptedEcho::constant(1000));
        assert!(close(sonar.read(DistanceUnit::Millimeters), 171.71, 1e-2));
        assert!(close(sonar.read(DistanceUnit::Centimeters), 17.171, 1e-3));
        assert!(close(sonar.read(DistanceUnit::Inches), 6.76, 1e-2));
    }

    #[test]
    fn units_agree_on_the_same_echo() {
        let mut sonar = Sonar::new(ScriptedEcho::constant(2345));
        let mm = sonar.read(DistanceUnit::Millimeters);
        let cm = sonar.read(DistanceUnit::Centimeters);
        let inches = sonar.read(DistanceUnit::Inches);
        assert!(close(mm, cm * 10.0, 1e-3));
        assert!(close(mm, inches / 0.03937, 1e-2));
    }

    #[test]
    fn read_leaves_filter_alone() {
        let mut sonar = Sonar::new(ScriptedEcho::constant(1000));
        sonar.read(DistanceUnit::Millimeters);
        sonar.read(DistanceUnit::Centimeters);
        assert_eq!(sonar.last_filtered(DistanceUnit::Millimeters), 0.0);
    }

    #[test]
    fn filter_steps_with_half_gain() {
        // 1 mm/us and a 200 us round trip is exactly 100 mm
        let mut sonar = Sonar::new(ScriptedEcho::constant(200));
        sonar.set_sound_speed(1000.0, SpeedUnit::MetersPerSecond);
        sonar.set_gain(0.5);
        assert_eq!(sonar.read(DistanceUnit::Millimeters), 100.0);
        assert_eq!(sonar.filter_read(DistanceUnit::Millimeters), 50.0);
        assert_eq!(sonar.filter_read(DistanceUnit::Millimeters), 75.0);
        assert!(close(sonar.last_filtered(DistanceUnit::Centimeters), 7.5, 1e-5));
    }

    #[test]
    fn unity_gain_matches_read() {
        let mut sonar = Sonar::new(ScriptedEcho::new(&[1200, 800, 3000]));
        sonar.set_gain(1.0);
        let mut reference = Sonar::new(ScriptedEcho::new(&[1200, 800, 3000]));
        for _ in 0..3 {
            assert!(close(
                sonar.filter_read(DistanceUnit::Millimeters),
                reference.read(DistanceUnit::Millimeters),
                1e-3
            ));
        }
    }

    #[test]
    fn zero_gain_holds_state() {
        let mut sonar = Sonar::new(ScriptedEcho::new(&[1200, 800, 3000]));
        sonar.reset_filter_to(30.0, DistanceUnit::Centimeters);
        sonar.set_gain(0.0);
        for _ in 0..3 {
            assert!(close(sonar.filter_read(DistanceUnit::Millimeters), 300.0, 1e-3));
        }
    }

    #[test]
    fn filter_state_survives_unit_changes() {
        let mut sonar = Sonar::new(ScriptedEcho::constant(1000));
        sonar.set_gain(0.5);
        let first = sonar.filter_read(DistanceUnit::Inches);
        let second = sonar.filter_read(DistanceUnit::Millimeters);
        assert!(close(first / 0.03937, 171.71 * 0.5, 1e-2));
        assert!(close(second, 171.71 * 0.75, 1e-2));
        sonar.reset_filter();
        assert_eq!(sonar.last_filtered(DistanceUnit::Millimeters), 0.0);
    }

    #[test]
    fn temperature_recomputes_speed() {
        let mut sonar = Sonar::new(ScriptedEcho::constant(0));
        for t in [-10.0, 0.0, 25.0, 35.5] {
            sonar.set_air_temperature(t, TemperatureUnit::Celsius);
            assert_eq!(sonar.model.speed_mm_per_us(), (331.3 + 0.606 * t) / 1000.0);
        }
    }

    #[test]
    fn fahrenheit_round_trip() {
        let mut sonar = Sonar::new(ScriptedEcho::constant(0));
        for f in [-4.0, 50.0, 77.0, 104.0] {
            sonar.set_air_temperature(crate::units::fahrenheit_to_celsius(f), TemperatureUnit::Celsius);
            assert!(close(sonar.air_temperature(TemperatureUnit::Fahrenheit), f, 1e-3));
        }
    }

    #[test]
    fn explicit_speed_keeps_temperature() {
        let mut sonar = Sonar::new(ScriptedEcho::constant(1000));
        sonar.set_air_temperature(77.0, TemperatureUnit::Fahrenheit);
        sonar.set_sound_speed(767.0, SpeedUnit::MilesPerHour);
        assert!(close(sonar.air_temperature(TemperatureUnit::Fahrenheit), 77.0, 1e-3));
        assert!(close(sonar.sound_speed(SpeedUnit::MilesPerHour), 767.0, 1e-2));
        // 767 mph is 0.342870 mm/us
        assert!(close(sonar.read(DistanceUnit::Millimeters), 171.435, 1e-2));
    }

    #[test]
    fn temperature_discards_explicit_speed() {
        let mut sonar = Sonar::new(ScriptedEcho::constant(1000));
        sonar.set_sound_speed(13000.0, SpeedUnit::InchesPerSecond);
        sonar.set_air_temperature(293.15, TemperatureUnit::Kelvin);
        assert!(close(sonar.read(DistanceUnit::Millimeters), 171.71, 1e-2));
    }

    #[test]
    fn no_echo_reads_zero() {
        let mut sonar = Sonar::new(ScriptedEcho::constant(crate::NO_ECHO));
        assert_eq!(sonar.raw_echo_micros(), 0);
        assert_eq!(sonar.read(DistanceUnit::Centimeters), 0.0);
    }

    #[test]
    fn config_sets_initial_state() {
        let mut sonar = Sonar::with_config(ScriptedEcho::constant(1000), Config::imperial(68.0));
        assert!(close(sonar.air_temperature(TemperatureUnit::Celsius), 20.0, 1e-4));
        assert!(close(sonar.distance(), 6.76, 1e-2));

        let config = Config {
            filter_gain: 1.0,
            ..Config::metric(DistanceUnit::Millimeters, 20.0)
        };
        let mut sonar = Sonar::with_config(ScriptedEcho::constant(1000), config);
        assert!(close(sonar.filtered_distance(), 171.71, 1e-2));
    }

    #[test]
    fn elapsed_filter_at_nominal_period() {
        let mut timed = Sonar::new(ScriptedEcho::constant(1000));
        let mut plain = Sonar::new(ScriptedEcho::constant(1000));
        for _ in 0..4 {
            let a = timed.filter_read_elapsed(DistanceUnit::Millimeters, 25_000);
            let b = plain.filter_read(DistanceUnit::Millimeters);
            assert!(close(a, b, 1e-3));
        }
    }

    #[test]
    fn borrowed_source() {
        let mut echo = ScriptedEcho::constant(1000);
        {
            let mut sonar = Sonar::new(&mut echo);
            assert!(close(sonar.read(DistanceUnit::Millimeters), 171.71, 1e-2));
        }
        assert_eq!(echo.calls(), 1);
    }

    #[test]
    fn async_reads() {
        let mut sonar = Sonar::new(ScriptedEcho::constant(1000));
        sonar.set_gain(0.5);
        assert!(close(block_on(sonar.read_async(DistanceUnit::Millimeters)), 171.71, 1e-2));
        assert!(close(
            block_on(sonar.filter_read_async(DistanceUnit::Millimeters)),
            85.855,
            1e-2
        ));
        assert_eq!(sonar.release().calls(), 2);
    }
}
