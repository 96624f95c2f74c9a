use tracing::trace;

use crate::{
    config::ArrayConfig,
    error::ArrayResult,
    geometry::{self, ArrayGeometry},
    phasor::Phasor,
};

// Sums the contribution of every transmitter at the configured receiver.
pub fn evaluate_phasor(config: &ArrayConfig) -> ArrayResult<Phasor> {
    let geometry = geometry::build(config)?;
    superpose(config, &geometry)
}

// Resultant amplitude at the configured receiver.
pub fn evaluate(config: &ArrayConfig) -> ArrayResult<f64> {
    Ok(evaluate_phasor(config)?.amplitude)
}

pub fn superpose(config: &ArrayConfig, geometry: &ArrayGeometry) -> ArrayResult<Phasor> {
    let offsets = config.policy.offsets(config, &geometry.transmitters)?;

    let resultant = geometry
        .path_lengths()
        .zip(offsets)
        .map(|(path, offset)| Phasor::propagated(path, config.wavelength, offset))
        .fold(Phasor::zero(), Phasor::add);

    trace!(
        receiver_angle = config.receiver_angle,
        amplitude = resultant.amplitude,
        "evaluated array"
    );
    Ok(resultant)
}

#[cfg(test)]
mod test {
    use std::{
        f64::consts::{FRAC_PI_2, FRAC_PI_6},
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
    };

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use crate::{
        config::ArrayConfig,
        error::ArrayError,
        geometry::build,
        phasor::Phasor,
        policy::LinearGroupShift,
    };

    use super::{evaluate, evaluate_phasor};

    #[test]
    fn broadside_is_fully_constructive() {
        let amplitude = evaluate(&ArrayConfig::default()).unwrap();
        assert_relative_eq!(amplitude, 5., max_relative = 1e-5);
    }

    #[test]
    fn single_element_is_isotropic() {
        for angle in [-1.4, -0.2, 0., 0.7, 1.5] {
            let config = ArrayConfig::ungrouped(7., 3.3, 1)
                .with_steering_angle(0.4)
                .with_receiver_angle(angle);
            assert_eq!(evaluate(&config).unwrap(), 1.);
        }
    }

    #[test]
    fn matches_per_transmitter_waves() {
        let config = ArrayConfig::default()
            .with_steering_angle(FRAC_PI_6)
            .with_receiver_angle(0.3);
        let geometry = build(&config).unwrap();
        let by_hand: Phasor = geometry
            .transmitters
            .iter()
            .map(|t| Phasor::wave_from(&config, t, &geometry.receiver).unwrap())
            .sum();
        let resultant = evaluate_phasor(&config).unwrap();
        assert_relative_eq!(resultant.amplitude, by_hand.amplitude, epsilon = 1e-12);
        assert_relative_eq!(resultant.phase, by_hand.phase, epsilon = 1e-12);
    }

    #[test]
    fn steering_moves_the_lobe() {
        let steered = ArrayConfig::default().with_steering_angle(FRAC_PI_6);
        let on_target = evaluate(&steered.clone().with_receiver_angle(FRAC_PI_6)).unwrap();
        let broadside = evaluate(&steered).unwrap();
        assert_relative_eq!(on_target, 5., max_relative = 1e-3);
        // Quarter turn steps around the circle leave a single element's worth
        assert_relative_eq!(broadside, 1., max_relative = 1e-3);
    }

    #[test]
    fn endfire_from_two_half_wave_elements_cancels() {
        // Half a wavelength apart, seen along the array axis: the two waves are in antiphase
        let config = ArrayConfig::ungrouped(20., 0.5, 2).with_receiver_angle(FRAC_PI_2);
        assert_abs_diff_eq!(evaluate(&config).unwrap(), 0., epsilon = 1e-6);
    }

    #[test]
    fn group_policy_is_applied() {
        // Half a turn between the two groups of one element each cancels the broadside beam
        let config = ArrayConfig::grouped(20., 0.5, 2, 1)
            .with_group_policy(LinearGroupShift { turns_per_group: 0.5 })
            .with_receiver_angle(0.);
        assert_abs_diff_eq!(evaluate(&config).unwrap(), 0., epsilon = 1e-3);
    }

    #[test]
    fn invalid_geometry_stops_before_policy() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let mut config = ArrayConfig::grouped(20., 0.5, 2, 2).with_group_policy(
            move |_: &ArrayConfig, _: usize| {
                flag.store(true, Ordering::SeqCst);
                0.
            },
        );
        config.wavelength = 0.;

        assert!(matches!(
            evaluate(&config),
            Err(ArrayError::InvalidGeometry(_))
        ));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn policy_errors_do_not_leak_into_later_calls() {
        let config = ArrayConfig::grouped(20., 0.5, 2, 2)
            .with_group_policy(|_: &ArrayConfig, _: usize| f64::INFINITY);
        assert!(matches!(
            evaluate(&config),
            Err(ArrayError::PolicyEvaluation { group: 0, .. })
        ));

        let healthy = ArrayConfig::grouped(20., 0.5, 2, 2);
        assert!(evaluate(&healthy).is_ok());
    }
}
