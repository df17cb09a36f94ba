//! Input capability: turns held keys and pointer picks into [`Command`]s.

use crate::control::{Command, Direction};
use glam::{DVec2, DVec3};

/// The command keys the rig listens to.
///
/// Conventional bindings: Next `E`, Previous `Q`, Up `W`, Down `S`,
/// Left `A`, Right `D`, Pivot `Shift`, Pick `F`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Next,
    Previous,
    Up,
    Down,
    Left,
    Right,
    Pivot,
    Pick,
}

/// Snapshot of the host's input devices for the current frame.
pub trait InputState {
    fn is_pressed(&self, key: Key) -> bool;

    /// Pointer position in normalised device coordinates.
    fn pointer(&self) -> DVec2;
}

/// Casts the pointer into the scene.
pub trait Picker {
    /// Nearest world-space hit under `pointer`, if any.
    fn pick(&self, pointer: DVec2) -> Option<DVec3>;
}

/// A picker for hosts without raycasting; never hits.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPicker;

impl Picker for NoPicker {
    fn pick(&self, _pointer: DVec2) -> Option<DVec3> {
        None
    }
}

const MOTION_KEYS: [(Key, Direction); 4] = [
    (Key::Up, Direction::Up),
    (Key::Down, Direction::Down),
    (Key::Left, Direction::Left),
    (Key::Right, Direction::Right),
];

/// Polls input once per frame.
///
/// Selection keys fire once per press; motion keys repeat every frame they
/// are held.
#[derive(Clone, Debug, Default)]
pub struct CommandPoller {
    next_held: bool,
    previous_held: bool,
}

impl CommandPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll<I, P>(&mut self, input: &I, picker: &P) -> Vec<Command>
    where
        I: InputState + ?Sized,
        P: Picker + ?Sized,
    {
        let mut commands = Vec::new();

        if pressed_now(&mut self.next_held, input.is_pressed(Key::Next)) {
            commands.push(Command::SelectNext);
        }
        if pressed_now(&mut self.previous_held, input.is_pressed(Key::Previous)) {
            commands.push(Command::SelectPrevious);
        }

        let pivot = input.is_pressed(Key::Pivot);
        for (key, direction) in MOTION_KEYS {
            if input.is_pressed(key) {
                commands.push(if pivot {
                    Command::Pivot(direction)
                } else {
                    Command::Drive(direction)
                });
            }
        }

        if input.is_pressed(Key::Pick)
            && let Some(point) = picker.pick(input.pointer())
        {
            commands.push(Command::LookAt(point));
        }

        commands
    }
}

/// Rising-edge detector.
fn pressed_now(held: &mut bool, pressed: bool) -> bool {
    let fired = pressed && !*held;
    *held = pressed;
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Keys {
        down: HashSet<Key>,
    }

    impl Keys {
        fn with(keys: &[Key]) -> Self {
            Self {
                down: keys.iter().copied().collect(),
            }
        }
    }

    impl InputState for Keys {
        fn is_pressed(&self, key: Key) -> bool {
            self.down.contains(&key)
        }

        fn pointer(&self) -> DVec2 {
            DVec2::ZERO
        }
    }

    struct Floor;

    impl Picker for Floor {
        fn pick(&self, pointer: DVec2) -> Option<DVec3> {
            Some(DVec3::new(pointer.x, 0.0, pointer.y))
        }
    }

    #[test]
    fn selection_fires_once_per_press() {
        let mut poller = CommandPoller::new();
        let held = Keys::with(&[Key::Next]);

        assert_eq!(poller.poll(&held, &NoPicker), vec![Command::SelectNext]);
        assert!(poller.poll(&held, &NoPicker).is_empty());

        poller.poll(&Keys::default(), &NoPicker);
        assert_eq!(poller.poll(&held, &NoPicker), vec![Command::SelectNext]);
    }

    #[test]
    fn motion_repeats_while_held() {
        let mut poller = CommandPoller::new();
        let held = Keys::with(&[Key::Up, Key::Left]);
        for _ in 0..3 {
            assert_eq!(
                poller.poll(&held, &NoPicker),
                vec![
                    Command::Drive(Direction::Up),
                    Command::Drive(Direction::Left)
                ]
            );
        }
    }

    #[test]
    fn pivot_modifier_changes_motion_commands() {
        let mut poller = CommandPoller::new();
        let held = Keys::with(&[Key::Pivot, Key::Right]);
        assert_eq!(
            poller.poll(&held, &NoPicker),
            vec![Command::Pivot(Direction::Right)]
        );
    }

    #[test]
    fn pick_needs_a_hit() {
        let mut poller = CommandPoller::new();
        let held = Keys::with(&[Key::Pick]);
        assert!(poller.poll(&held, &NoPicker).is_empty());
        assert_eq!(
            poller.poll(&held, &Floor),
            vec![Command::LookAt(DVec3::ZERO)]
        );
    }
}
