use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    config::ArrayConfig,
    error::{ArrayError, ArrayResult, PolicyError},
    geometry::Transmitter,
    helper::broadside_to_standard,
};

// Caller-supplied beam steering logic, evaluated once per group. Offsets are in turns.
// Implementations must be pure: the same (config, group) always gives the same offset.
pub trait GroupPhasePolicy: Send + Sync {
    fn phase_shift(&self, config: &ArrayConfig, group: usize) -> Result<f64, PolicyError>;
}

impl<F> GroupPhasePolicy for F
where
    F: Fn(&ArrayConfig, usize) -> f64 + Send + Sync,
{
    fn phase_shift(&self, config: &ArrayConfig, group: usize) -> Result<f64, PolicyError> {
        Ok(self(config, group))
    }
}

// Adapts a closure that can fail.
pub struct FallibleGroupPolicy<F>(pub F);

impl<F> FallibleGroupPolicy<F>
where
    F: Fn(&ArrayConfig, usize) -> Result<f64, PolicyError> + Send + Sync,
{
    pub fn new(policy: F) -> FallibleGroupPolicy<F> {
        FallibleGroupPolicy(policy)
    }
}

impl<F> GroupPhasePolicy for FallibleGroupPolicy<F>
where
    F: Fn(&ArrayConfig, usize) -> Result<f64, PolicyError> + Send + Sync,
{
    fn phase_shift(&self, config: &ArrayConfig, group: usize) -> Result<f64, PolicyError> {
        (self.0)(config, group)
    }
}

// Constant phase step between consecutive groups.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGroupShift {
    pub turns_per_group: f64,
}

impl GroupPhasePolicy for LinearGroupShift {
    fn phase_shift(&self, _: &ArrayConfig, group: usize) -> Result<f64, PolicyError> {
        Ok(group as f64 * self.turns_per_group)
    }
}

#[derive(Clone)]
pub enum PhaseShiftPolicy {
    // Closed-form steering towards `steering_angle`, referenced to the leftmost element.
    PerElementLinear,
    // Opaque caller policy, shared by every element of a group.
    PerGroupPolicy(Arc<dyn GroupPhasePolicy>),
}

impl Default for PhaseShiftPolicy {
    fn default() -> Self {
        PhaseShiftPolicy::PerElementLinear
    }
}

impl fmt::Debug for PhaseShiftPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseShiftPolicy::PerElementLinear => write!(f, "PerElementLinear"),
            PhaseShiftPolicy::PerGroupPolicy(_) => write!(f, "PerGroupPolicy(..)"),
        }
    }
}

/*
For a beam steered to θ from broadside, neighbouring elements see a path difference of
separation·sin θ wavelengths, which is separation·cos(π/2 − θ). Delaying element i by i times
that difference lines all wavefronts up in the steered direction.
*/
pub fn linear_steering_offset(config: &ArrayConfig, element: usize) -> f64 {
    element as f64 * config.separation * broadside_to_standard(config.steering_angle).cos()
}

fn checked_group_offset(
    policy: &dyn GroupPhasePolicy,
    config: &ArrayConfig,
    group: usize,
) -> ArrayResult<f64> {
    match policy.phase_shift(config, group) {
        Ok(turns) if turns.is_finite() => Ok(turns),
        Ok(turns) => Err(ArrayError::PolicyEvaluation {
            group,
            reason: format!("non-finite offset {}", turns),
        }),
        Err(err) => Err(ArrayError::PolicyEvaluation {
            group,
            reason: err.to_string(),
        }),
    }
}

impl PhaseShiftPolicy {
    pub fn per_group(policy: impl GroupPhasePolicy + 'static) -> PhaseShiftPolicy {
        PhaseShiftPolicy::PerGroupPolicy(Arc::new(policy))
    }

    // Offset in turns for a single transmitter.
    pub fn offset_turns(&self, config: &ArrayConfig, transmitter: &Transmitter) -> ArrayResult<f64> {
        match self {
            PhaseShiftPolicy::PerElementLinear => Ok(linear_steering_offset(config, transmitter.index)),
            PhaseShiftPolicy::PerGroupPolicy(policy) => {
                checked_group_offset(&**policy, config, transmitter.group_index())
            }
        }
    }

    // Offsets for a whole array, in transmitter order. Group policies run once per group.
    pub fn offsets(&self, config: &ArrayConfig, transmitters: &[Transmitter]) -> ArrayResult<Vec<f64>> {
        match self {
            PhaseShiftPolicy::PerElementLinear => Ok(transmitters
                .iter()
                .map(|t| linear_steering_offset(config, t.index))
                .collect()),
            PhaseShiftPolicy::PerGroupPolicy(policy) => {
                let mut by_group: HashMap<usize, f64> = HashMap::new();
                transmitters
                    .iter()
                    .map(|t| {
                        let group = t.group_index();
                        if let Some(&turns) = by_group.get(&group) {
                            return Ok(turns);
                        }
                        let turns = checked_group_offset(&**policy, config, group)?;
                        by_group.insert(group, turns);
                        Ok(turns)
                    })
                    .collect()
            }
        }
    }
}
