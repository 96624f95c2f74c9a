use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::Vector2;

// Angles handed to the array are measured from broadside: 0 points along +y, perpendicular to the
// array axis, and positive angles lean towards +x.
pub fn broadside_to_standard(angle: f64) -> f64 {
    FRAC_PI_2 - angle
}

// Unit vector pointing along a broadside angle.
pub fn broadside_to_vec(angle: f64) -> Vector2<f64> {
    let effective = broadside_to_standard(angle);
    Vector2::new(effective.cos(), effective.sin())
}

pub fn turns_to_radians(turns: f64) -> f64 {
    TAU * turns
}

// Maps a phase onto (-π, π].
pub fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

pub fn decibels(x: f64) -> f64 {
    10. * x.log10()
}

pub fn decibels_or_else(x: f64, or: f64) -> f64 {
    if x <= 0. {
        or
    } else {
        decibels(x).max(or)
    }
}
