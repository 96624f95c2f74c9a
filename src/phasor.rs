use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

use num::complex::Complex64;

use crate::{
    config::ArrayConfig,
    error::ArrayResult,
    geometry::{Receiver, Transmitter},
    helper::{turns_to_radians, wrap_phase},
};

// A sinusoid at the array's frequency, reduced to its amplitude and phase.
// The phase is in radians and is not normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Phasor {
    pub amplitude: f64,
    pub phase: f64,
}

impl Phasor {
    pub fn new(amplitude: f64, phase: f64) -> Phasor {
        Phasor { amplitude, phase }
    }

    pub fn unit(phase: f64) -> Phasor {
        Phasor::new(1., phase)
    }

    pub fn zero() -> Phasor {
        Phasor::new(0., 0.)
    }

    // Unit wave after travelling `path` length units, with an extra offset in turns.
    pub fn propagated(path: f64, wavelength: f64, offset_turns: f64) -> Phasor {
        Phasor::unit(turns_to_radians(path / wavelength + offset_turns))
    }

    // The wave one transmitter contributes at the receiver, steering offset included.
    pub fn wave_from(
        config: &ArrayConfig,
        transmitter: &Transmitter,
        receiver: &Receiver,
    ) -> ArrayResult<Phasor> {
        let path = nalgebra::distance(&transmitter.pos, &receiver.pos);
        let offset = config.policy.offset_turns(config, transmitter)?;
        Ok(Phasor::propagated(path, config.wavelength, offset))
    }

    /*
    Superposition of two sinusoids of the same frequency. The magnitude comes from the law of
    cosines and the phase from the four quadrant arctangent of the summed components. Rounding
    can push the radicand slightly below zero when the two waves cancel, so it is clamped.
    A zero amplitude contributes nothing, including to the phase.
    */
    pub fn add(self, other: Phasor) -> Phasor {
        if self.amplitude == 0. {
            return other;
        }
        if other.amplitude == 0. {
            return self;
        }

        let (a1, φ1) = (self.amplitude, self.phase);
        let (a2, φ2) = (other.amplitude, other.phase);

        let radicand = a1 * a1 + a2 * a2 + 2. * a1 * a2 * (φ1 - φ2).cos();
        Phasor {
            amplitude: radicand.max(0.).sqrt(),
            phase: f64::atan2(a1 * φ1.sin() + a2 * φ2.sin(), a1 * φ1.cos() + a2 * φ2.cos()),
        }
    }

    pub fn wrapped(self) -> Phasor {
        Phasor::new(self.amplitude, wrap_phase(self.phase))
    }

    pub fn to_complex(self) -> Complex64 {
        Complex64::from_polar(self.amplitude, self.phase)
    }

    pub fn from_complex(z: Complex64) -> Phasor {
        let (amplitude, phase) = z.to_polar();
        Phasor { amplitude, phase }
    }
}

impl Add for Phasor {
    type Output = Phasor;

    fn add(self, rhs: Phasor) -> Phasor {
        Phasor::add(self, rhs)
    }
}

impl AddAssign for Phasor {
    fn add_assign(&mut self, rhs: Phasor) {
        *self = Phasor::add(*self, rhs);
    }
}

impl Sum for Phasor {
    fn sum<I: Iterator<Item = Phasor>>(iter: I) -> Phasor {
        iter.fold(Phasor::zero(), Phasor::add)
    }
}

impl<'a> Sum<&'a Phasor> for Phasor {
    fn sum<I: Iterator<Item = &'a Phasor>>(iter: I) -> Phasor {
        iter.copied().sum()
    }
}
