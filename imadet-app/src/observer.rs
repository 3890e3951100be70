use imadet_core::{Imagery, ImageryKey, Response};
use rand::Rng;

/// Stand-in participant with a logistic psychometric function over
/// visibility level.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedObserver {
    /// Level detected half of the time.
    pub threshold: f64,
    pub spread: f64,
    /// Probability of reporting a grating in pure noise.
    pub false_alarm_rate: f64,
    /// Probability of answering the imagery check with "nothing" regardless
    /// of the instruction.
    pub imagery_lapse_rate: f64,
}

impl Default for SimulatedObserver {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            spread: 4.0,
            false_alarm_rate: 0.1,
            imagery_lapse_rate: 0.05,
        }
    }
}

impl SimulatedObserver {
    pub fn p_detect(&self, level: i32) -> f64 {
        1.0 / (1.0 + (-(f64::from(level) - self.threshold) / self.spread).exp())
    }

    pub fn respond<R: Rng>(&self, rng: &mut R, stimulus_present: bool, level: i32) -> Response {
        let p = if stimulus_present {
            self.p_detect(level)
        } else {
            self.false_alarm_rate
        };
        if rng.random_bool(p.clamp(0.0, 1.0)) {
            Response::Present
        } else {
            Response::Absent
        }
    }

    pub fn report_imagery<R: Rng>(&self, rng: &mut R, instructed: Imagery) -> ImageryKey {
        if rng.random_bool(self.imagery_lapse_rate.clamp(0.0, 1.0)) {
            ImageryKey::N
        } else {
            instructed.expected_key()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn detection_grows_with_visibility() {
        let observer = SimulatedObserver::default();
        assert!((observer.p_detect(20) - 0.5).abs() < 1e-9);
        assert!(observer.p_detect(10) < observer.p_detect(30));
        assert!(observer.p_detect(-40) < 1e-6);
    }

    #[test]
    fn certain_observer() {
        let observer = SimulatedObserver {
            threshold: -1000.0,
            spread: 1.0,
            false_alarm_rate: 0.0,
            imagery_lapse_rate: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(observer.respond(&mut rng, true, 1), Response::Present);
            assert_eq!(observer.respond(&mut rng, false, 1), Response::Absent);
            assert_eq!(
                observer.report_imagery(&mut rng, Imagery::RightTilted),
                ImageryKey::R
            );
        }
    }
}
