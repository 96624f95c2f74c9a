use std::ops::Range;

use ndarray::Array1;
use tracing::debug;

use crate::{
    array::superpose,
    config::ArrayConfig,
    error::{ArrayError, ArrayResult},
    geometry::{self, Receiver},
    helper::decibels_or_else,
};

pub const DEFAULT_START: f64 = -90.;
pub const DEFAULT_END: f64 = 90.;
pub const DEFAULT_SAMPLES: usize = 1000;

// Receiver angles in degrees, sampled uniformly from `start` (included) towards `end` (excluded).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleSweep {
    start: f64,
    end: f64,
    samples: usize,
}

impl Default for AngleSweep {
    fn default() -> Self {
        AngleSweep {
            start: DEFAULT_START,
            end: DEFAULT_END,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl AngleSweep {
    pub fn new(start: f64, end: f64, samples: usize) -> ArrayResult<AngleSweep> {
        if samples == 0 {
            return Err(ArrayError::InvalidSweep("sweep needs at least one sample".into()));
        }
        if !(start.is_finite() && end.is_finite()) || start > end {
            return Err(ArrayError::InvalidSweep(format!(
                "cannot sweep from {}° to {}°",
                start, end
            )));
        }
        Ok(AngleSweep {
            start,
            end,
            samples,
        })
    }

    pub fn from_range(range: Range<f64>, samples: usize) -> ArrayResult<AngleSweep> {
        AngleSweep::new(range.start, range.end, samples)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn sample_count(&self) -> usize {
        self.samples
    }

    pub fn sample_interval(&self) -> f64 {
        self.range() / self.samples as f64
    }

    pub fn range(&self) -> f64 {
        self.end - self.start
    }

    pub fn angle(&self, i: usize) -> f64 {
        (i as f64 / self.samples as f64) * self.range() + self.start
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> {
        let sweep = *self;
        (0..sweep.samples).map(move |i| sweep.angle(i))
    }
}

impl From<AngleSweep> for Array1<f64> {
    fn from(sweep: AngleSweep) -> Self {
        sweep.iter().collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiationSample {
    // Degrees from broadside
    pub angle: f64,
    pub amplitude: f64,
}

// Samples of a sweep, in ascending angle order.
#[derive(Clone, Debug, PartialEq)]
pub struct RadiationPattern {
    samples: Vec<RadiationSample>,
}

impl RadiationPattern {
    pub fn samples(&self) -> &[RadiationSample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<RadiationSample> {
        self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &RadiationSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn angles(&self) -> Array1<f64> {
        self.samples.iter().map(|s| s.angle).collect()
    }

    pub fn amplitudes(&self) -> Array1<f64> {
        self.samples.iter().map(|s| s.amplitude).collect()
    }

    pub fn max_amplitude(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.amplitude)
            .fold(0., f64::max)
    }

    // The main lobe. Ties go to the lowest angle.
    pub fn peak(&self) -> Option<RadiationSample> {
        self.samples.iter().copied().reduce(|best, s| {
            if s.amplitude.total_cmp(&best.amplitude).is_gt() {
                s
            } else {
                best
            }
        })
    }

    // Power relative to the main lobe, in dB, never below `floor`.
    pub fn normalized_decibels(&self, floor: f64) -> Array1<f64> {
        let max = self.max_amplitude();
        self.samples
            .iter()
            .map(|s| {
                if max > 0. {
                    decibels_or_else((s.amplitude / max).powi(2), floor)
                } else {
                    floor
                }
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a RadiationPattern {
    type Item = &'a RadiationSample;
    type IntoIter = std::slice::Iter<'a, RadiationSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

// Evaluates `base` at every angle of the sweep. Only the receiver angle changes between samples.
pub fn sweep_domain(base: &ArrayConfig, domain: &AngleSweep) -> ArrayResult<RadiationPattern> {
    // The transmitters do not depend on the receiver, so lay them out once.
    let mut geometry = geometry::build(base)?;
    let samples = domain
        .iter()
        .map(|angle| {
            let config = base.clone().with_receiver_angle(angle.to_radians());
            geometry.receiver = Receiver::at(config.distance, config.receiver_angle);
            let resultant = superpose(&config, &geometry)?;
            Ok(RadiationSample {
                angle,
                amplitude: resultant.amplitude,
            })
        })
        .collect::<ArrayResult<Vec<_>>>()?;

    let pattern = RadiationPattern { samples };
    debug!(
        samples = pattern.len(),
        start = domain.start(),
        end = domain.end(),
        max_amplitude = pattern.max_amplitude(),
        "swept receiver angle"
    );
    Ok(pattern)
}

pub fn sweep(base: &ArrayConfig, range: Range<f64>, samples: usize) -> ArrayResult<RadiationPattern> {
    sweep_domain(base, &AngleSweep::from_range(range, samples)?)
}

// Half-plane sweep at the default resolution.
pub fn sweep_default(base: &ArrayConfig) -> ArrayResult<RadiationPattern> {
    sweep_domain(base, &AngleSweep::default())
}

#[cfg(test)]
mod test {
    use std::f64::consts::FRAC_PI_6;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use crate::{array::evaluate, config::ArrayConfig, error::ArrayError};

    use super::{sweep, sweep_default, AngleSweep, RadiationPattern, RadiationSample};

    #[test]
    fn default_sweep_angles() {
        let domain = AngleSweep::default();
        let angles: Vec<f64> = domain.iter().collect();
        assert_eq!(angles.len(), 1000);
        assert_eq!(angles[0], -90.);
        assert_relative_eq!(angles[500], 0.);
        assert_relative_eq!(angles[999], 89.82, max_relative = 1e-12);
        assert_relative_eq!(domain.sample_interval(), 0.18);
        assert!(angles.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rejects_bad_sweeps() {
        assert!(matches!(
            AngleSweep::new(-90., 90., 0),
            Err(ArrayError::InvalidSweep(_))
        ));
        assert!(matches!(
            AngleSweep::new(10., -10., 5),
            Err(ArrayError::InvalidSweep(_))
        ));
        assert!(matches!(
            AngleSweep::new(f64::NAN, 10., 5),
            Err(ArrayError::InvalidSweep(_))
        ));
    }

    #[test]
    fn samples_match_single_evaluations() {
        let base = ArrayConfig::default().with_steering_angle(0.2);
        let pattern = sweep(&base, -60.0..60.0, 24).unwrap();
        assert_eq!(pattern.len(), 24);
        for sample in pattern.iter() {
            let expected = evaluate(&base.clone().with_receiver_angle(sample.angle.to_radians())).unwrap();
            assert_relative_eq!(sample.amplitude, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn sweep_is_restartable() {
        let base = ArrayConfig::default();
        assert_eq!(sweep_default(&base).unwrap(), sweep_default(&base).unwrap());
    }

    #[test]
    fn single_element_pattern_is_flat() {
        let configs = [
            ArrayConfig::ungrouped(20., 0.5, 1),
            ArrayConfig::ungrouped(3., 2.5, 1).with_steering_angle(FRAC_PI_6),
            ArrayConfig::ungrouped(120., 0.1, 1).with_distance(50.),
        ];
        for config in configs.iter() {
            let pattern = sweep_default(config).unwrap();
            assert_eq!(pattern.len(), 1000);
            assert!(pattern.iter().all(|s| s.amplitude == 1.));
        }
    }

    #[test]
    fn invalid_base_is_rejected_up_front() {
        let base = ArrayConfig::ungrouped(0., 0.5, 5);
        assert!(matches!(
            sweep_default(&base),
            Err(ArrayError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn pattern_reductions() {
        let pattern = RadiationPattern {
            samples: vec![
                RadiationSample { angle: -10., amplitude: 1. },
                RadiationSample { angle: 0., amplitude: 4. },
                RadiationSample { angle: 10., amplitude: 4. },
                RadiationSample { angle: 20., amplitude: 0. },
            ],
        };
        assert_eq!(pattern.max_amplitude(), 4.);
        assert_eq!(pattern.peak().unwrap().angle, 0.);
        assert_eq!(pattern.angles().to_vec(), vec![-10., 0., 10., 20.]);

        let db = pattern.normalized_decibels(-40.);
        assert_abs_diff_eq!(db[0], -12.041199826559248, epsilon = 1e-9);
        assert_eq!(db[1], 0.);
        assert_eq!(db[3], -40.);
    }
}
