//! Selection and command dispatch.
//!
//! Commands arrive already resolved from raw input (see [`crate::input`]).
//! This module decides which part they address and what they do to it.

use crate::robot::LimbRole;
use crate::transform::Axis;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// One of the four motion keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Up and left move or turn in the positive sense.
    pub fn sign(self) -> f64 {
        match self {
            Self::Up | Self::Left => 1.0,
            Self::Down | Self::Right => -1.0,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// A discrete request from the input layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    SelectNext,
    SelectPrevious,
    /// Motion key without the pivot modifier.
    Drive(Direction),
    /// Motion key with the pivot modifier held.
    Pivot(Direction),
    /// Aim the head at a picked world-space point.
    LookAt(DVec3),
}

/// What a motion key does to the selected part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Move along the part's heading.
    Translate,
    /// Turn about the part's own axis, through its anchor.
    Rotate(Axis),
}

/// Maps a motion key on `role` to an [`Action`].
///
/// Only the torso walks; every other part answers up/down by pitching. The
/// binding may name an axis the part does not allow, in which case the rig
/// reports the move as illegal.
pub fn binding(role: LimbRole, direction: Direction, pivot: bool) -> Action {
    match (pivot, direction.is_vertical()) {
        (true, true) => Action::Rotate(Axis::X),
        (true, false) => Action::Rotate(Axis::Z),
        (false, true) if role == LimbRole::Torso => Action::Translate,
        (false, true) => Action::Rotate(Axis::X),
        (false, false) => Action::Rotate(role.swing_axis()),
    }
}

/// Step sizes applied per command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Radians per rotate command.
    pub rotate_step: f64,
    /// World units per translate command.
    pub move_step: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            rotate_step: 0.1,
            move_step: 0.1,
        }
    }
}

impl ControlConfig {
    /// Signed amount for `action` in `direction`.
    pub fn step(&self, action: Action, direction: Direction) -> f64 {
        let magnitude = match action {
            Action::Translate => self.move_step,
            Action::Rotate(_) => self.rotate_step,
        };
        magnitude * direction.sign()
    }
}

/// The currently selected part; cycles through [`LimbRole::ALL`] in both directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    pub fn current(&self) -> LimbRole {
        LimbRole::ALL[self.index]
    }

    pub fn select(&mut self, role: LimbRole) {
        self.index = role as usize;
    }

    pub fn next(&mut self) -> LimbRole {
        self.index = (self.index + 1) % LimbRole::ALL.len();
        self.current()
    }

    pub fn previous(&mut self) -> LimbRole {
        self.index = (self.index + LimbRole::ALL.len() - 1) % LimbRole::ALL.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_both_ways() {
        let mut selection = Selection::default();
        assert_eq!(selection.current(), LimbRole::Torso);
        assert_eq!(selection.previous(), LimbRole::RightFoot);
        assert_eq!(selection.next(), LimbRole::Torso);
        assert_eq!(selection.next(), LimbRole::Head);
    }

    #[test]
    fn only_the_torso_walks() {
        assert_eq!(
            binding(LimbRole::Torso, Direction::Up, false),
            Action::Translate
        );
        assert_eq!(
            binding(LimbRole::Head, Direction::Up, false),
            Action::Rotate(Axis::X)
        );
        assert_eq!(
            binding(LimbRole::LeftArm, Direction::Left, false),
            Action::Rotate(Axis::Z)
        );
        assert_eq!(
            binding(LimbRole::Torso, Direction::Right, true),
            Action::Rotate(Axis::Z)
        );
    }

    #[test]
    fn steps_are_signed_by_direction() {
        let config = ControlConfig::default();
        assert_eq!(config.step(Action::Translate, Direction::Up), 0.1);
        assert_eq!(config.step(Action::Rotate(Axis::Y), Direction::Right), -0.1);
    }
}
