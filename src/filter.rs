//! First-order exponential smoothing of distance readings.

use libm::powf;

/// Gain used until the application sets one.
pub const DEFAULT_FILTER_GAIN: f32 = 0.485;

/// Exponential moving average (first-order IIR low-pass).
///
/// Each update moves the state a fraction `gain` of the way toward the new
/// sample. A gain of 1 passes samples through unchanged, a gain of 0 freezes
/// the state. Values outside `[0, 1]` are accepted but overshoot or diverge.
///
/// The time constant depends on how often [`update`](Self::update) is called,
/// use [`update_elapsed`](Self::update_elapsed) when samples arrive at
/// irregular intervals.
#[derive(Clone, Copy, Debug, PartialEq, defmt::Format)]
pub struct ExponentialFilter {
    gain: f32,
    value: f32,
}

impl Default for ExponentialFilter {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_GAIN)
    }
}

impl ExponentialFilter {
    /// New filter with zeroed state.
    pub const fn new(gain: f32) -> Self {
        Self { gain, value: 0.0 }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    /// Current smoothed value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Overwrite the smoothed value, e.g. to seed it with a first reading.
    pub fn reset(&mut self, value: f32) {
        self.value = value;
    }

    /// Blend a new sample into the state and return the updated value.
    pub fn update(&mut self, sample: f32) -> f32 {
        self.step(self.gain, sample)
    }

    /// Like [`update`](Self::update), but with the gain rescaled for the time
    /// since the previous sample.
    ///
    /// `gain` is taken to be the per-step gain at `nominal_period_us`, so the
    /// decay over `elapsed_us` is `(1 - gain)^(elapsed_us / nominal_period_us)`.
    /// With `elapsed_us == nominal_period_us` this is identical to `update`.
    pub fn update_elapsed(&mut self, sample: f32, elapsed_us: u32, nominal_period_us: u32) -> f32 {
        if nominal_period_us == 0 {
            return self.update(sample);
        }
        let steps = elapsed_us as f32 / nominal_period_us as f32;
        let gain = 1.0 - powf(1.0 - self.gain, steps);
        self.step(gain, sample)
    }

    fn step(&mut self, gain: f32, sample: f32) -> f32 {
        self.value += gain * (sample - self.value);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libm::fabsf;

    #[test]
    fn half_gain_steps() {
        let mut filter = ExponentialFilter::new(0.5);
        assert_eq!(filter.update(100.0), 50.0);
        assert_eq!(filter.update(100.0), 75.0);
        assert_eq!(filter.value(), 75.0);
    }

    #[test]
    fn unity_gain_passes_through() {
        let mut filter = ExponentialFilter::new(1.0);
        for sample in [12.0, 400.0, 3.5, 0.0] {
            assert_eq!(filter.update(sample), sample);
        }
    }

    #[test]
    fn zero_gain_freezes() {
        let mut filter = ExponentialFilter::new(0.0);
        filter.reset(42.0);
        for sample in [12.0, 400.0, 3.5] {
            assert_eq!(filter.update(sample), 42.0);
        }
    }

    #[test]
    fn converges_toward_constant_input() {
        let mut filter = ExponentialFilter::default();
        let mut previous = filter.value();
        for _ in 0..30 {
            let next = filter.update(250.0);
            assert!(next >= previous && next <= 250.0);
            previous = next;
        }
        assert!(fabsf(previous - 250.0) < 1e-3);
    }

    #[test]
    fn nominal_interval_matches_update() {
        let mut plain = ExponentialFilter::new(0.3);
        let mut timed = ExponentialFilter::new(0.3);
        for sample in [10.0, 20.0, 15.0] {
            let a = plain.update(sample);
            let b = timed.update_elapsed(sample, 25_000, 25_000);
            assert!(fabsf(a - b) < 1e-4);
        }
    }

    #[test]
    fn double_interval_is_two_steps() {
        let mut twice = ExponentialFilter::new(0.5);
        twice.update(100.0);
        twice.update(100.0);

        let mut once = ExponentialFilter::new(0.5);
        once.update_elapsed(100.0, 50_000, 25_000);
        assert!(fabsf(once.value() - twice.value()) < 1e-3);
    }

    #[test]
    fn zero_period_falls_back_to_update() {
        let mut filter = ExponentialFilter::new(0.5);
        assert_eq!(filter.update_elapsed(100.0, 1_000, 0), 50.0);
    }
}
