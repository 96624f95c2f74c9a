use crate::{
    error::{ArrayError, ArrayResult},
    policy::{GroupPhasePolicy, PhaseShiftPolicy},
};

// Lengths are in mm unless otherwise stated, angles in radians.
pub const DEFAULT_WAVELENGTH: f64 = 20.;
pub const DEFAULT_SEPARATION: f64 = 0.5;
pub const DEFAULT_ELEMENTS: usize = 5;
pub const DEFAULT_DISTANCE: f64 = 100_000.;

// Where the array sits along the x axis. This also fixes the point that carries zero path delay,
// so it changes the phase reference and not only the drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    // Symmetric about x = 0
    Centered,
    // First element at x = 0, extending towards +x
    LeftAligned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grouping {
    pub groups: usize,
    pub per_group: usize,
}

impl Grouping {
    // (group, index within group) of a linear element index
    pub fn slot_of(&self, element: usize) -> (usize, usize) {
        (element / self.per_group, element % self.per_group)
    }
}

/// Everything needed to evaluate the array at one receiver position.
///
/// A config is a plain value: build one per request, adjust it with the `with_*` helpers and hand
/// it to [`crate::array::evaluate`] or [`crate::sweep::sweep`]. Nothing is cached between calls.
#[derive(Clone, Debug)]
pub struct ArrayConfig {
    pub wavelength: f64,
    // Element spacing as a fraction of the wavelength
    pub separation: f64,
    pub elements: usize,
    pub grouping: Option<Grouping>,
    // Main lobe direction, from broadside
    pub steering_angle: f64,
    pub distance: f64,
    // Receiver direction, from broadside
    pub receiver_angle: f64,
    pub layout: Layout,
    pub policy: PhaseShiftPolicy,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        ArrayConfig {
            wavelength: DEFAULT_WAVELENGTH,
            separation: DEFAULT_SEPARATION,
            elements: DEFAULT_ELEMENTS,
            grouping: None,
            steering_angle: 0.,
            distance: DEFAULT_DISTANCE,
            receiver_angle: 0.,
            layout: Layout::Centered,
            policy: PhaseShiftPolicy::PerElementLinear,
        }
    }
}

impl ArrayConfig {
    pub fn ungrouped(wavelength: f64, separation: f64, elements: usize) -> ArrayConfig {
        ArrayConfig {
            wavelength,
            separation,
            elements,
            ..ArrayConfig::default()
        }
    }

    // Grouped arrays start at the origin rather than being centred on it.
    pub fn grouped(wavelength: f64, separation: f64, groups: usize, per_group: usize) -> ArrayConfig {
        ArrayConfig {
            wavelength,
            separation,
            elements: groups.saturating_mul(per_group),
            grouping: Some(Grouping { groups, per_group }),
            layout: Layout::LeftAligned,
            ..ArrayConfig::default()
        }
    }

    pub fn with_steering_angle(mut self, angle: f64) -> ArrayConfig {
        self.steering_angle = angle;
        self
    }

    pub fn with_receiver_angle(mut self, angle: f64) -> ArrayConfig {
        self.receiver_angle = angle;
        self
    }

    pub fn with_distance(mut self, distance: f64) -> ArrayConfig {
        self.distance = distance;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> ArrayConfig {
        self.layout = layout;
        self
    }

    pub fn with_policy(mut self, policy: PhaseShiftPolicy) -> ArrayConfig {
        self.policy = policy;
        self
    }

    pub fn with_group_policy(self, policy: impl GroupPhasePolicy + 'static) -> ArrayConfig {
        self.with_policy(PhaseShiftPolicy::per_group(policy))
    }

    // Distance between neighbouring elements, in length units.
    pub fn spacing(&self) -> f64 {
        self.wavelength * self.separation
    }

    pub fn validate(&self) -> ArrayResult<()> {
        if !(self.wavelength.is_finite() && self.wavelength > 0.) {
            return Err(ArrayError::geometry(format!(
                "wavelength must be positive, got {}",
                self.wavelength
            )));
        }
        if !(self.separation.is_finite() && self.separation > 0.) {
            return Err(ArrayError::geometry(format!(
                "separation must be positive, got {}",
                self.separation
            )));
        }
        if !(self.distance.is_finite() && self.distance > 0.) {
            return Err(ArrayError::geometry(format!(
                "receiver distance must be positive, got {}",
                self.distance
            )));
        }
        if !self.steering_angle.is_finite() || !self.receiver_angle.is_finite() {
            return Err(ArrayError::geometry("angles must be finite"));
        }
        if self.elements == 0 {
            return Err(ArrayError::geometry("array needs at least one element"));
        }
        if let Some(Grouping { groups, per_group }) = self.grouping {
            if groups == 0 || per_group == 0 {
                return Err(ArrayError::geometry(format!(
                    "group counts must be positive, got {} groups of {}",
                    groups, per_group
                )));
            }
            if groups.checked_mul(per_group) != Some(self.elements) {
                return Err(ArrayError::geometry(format!(
                    "{} groups of {} do not make {} elements",
                    groups, per_group, self.elements
                )));
            }
        }
        Ok(())
    }
}
