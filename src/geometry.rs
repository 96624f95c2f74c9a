use nalgebra::Point2;

use crate::{
    config::{ArrayConfig, Layout},
    error::ArrayResult,
    helper::broadside_to_vec,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupSlot {
    pub group: usize,
    // Position within the group
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transmitter {
    pub pos: Point2<f64>,
    // 0-based, left to right
    pub index: usize,
    pub slot: Option<GroupSlot>,
}

impl Transmitter {
    // Ungrouped elements act as groups of one.
    pub fn group_index(&self) -> usize {
        self.slot.map_or(self.index, |slot| slot.group)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Receiver {
    pub pos: Point2<f64>,
}

impl Receiver {
    pub fn at(distance: f64, angle: f64) -> Receiver {
        Receiver {
            pos: Point2::from(distance * broadside_to_vec(angle)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayGeometry {
    pub transmitters: Vec<Transmitter>,
    pub receiver: Receiver,
}

impl ArrayGeometry {
    // Path length from each transmitter to the receiver, in transmitter order.
    pub fn path_lengths(&self) -> impl Iterator<Item = f64> + '_ {
        let rcvr = self.receiver.pos;
        self.transmitters
            .iter()
            .map(move |t| nalgebra::distance(&t.pos, &rcvr))
    }

    // Distance between the outermost elements.
    pub fn aperture(&self) -> f64 {
        match (self.transmitters.first(), self.transmitters.last()) {
            (Some(first), Some(last)) => last.pos.x - first.pos.x,
            _ => 0.,
        }
    }
}

// x coordinate of the leftmost element.
fn array_origin(config: &ArrayConfig) -> f64 {
    match config.layout {
        Layout::Centered => -((config.elements - 1) as f64) * config.spacing() / 2.,
        Layout::LeftAligned => 0.,
    }
}

pub fn build(config: &ArrayConfig) -> ArrayResult<ArrayGeometry> {
    config.validate()?;

    let spacing = config.spacing();
    let origin = array_origin(config);
    let transmitters = (0..config.elements)
        .map(|i| Transmitter {
            pos: Point2::new(origin + i as f64 * spacing, 0.),
            index: i,
            slot: config.grouping.map(|grouping| {
                let (group, index) = grouping.slot_of(i);
                GroupSlot { group, index }
            }),
        })
        .collect();

    Ok(ArrayGeometry {
        transmitters,
        receiver: Receiver::at(config.distance, config.receiver_angle),
    })
}
