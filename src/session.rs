//! The application context: one robot, its selection and its controls.
//!
//! A host owns a [`RigSession`] and calls [`RigSession::run_frame`] once per
//! render-loop tick, before drawing.

use crate::control::{Action, Command, ControlConfig, Direction, Selection, binding};
use crate::error::RigError;
use crate::input::{CommandPoller, InputState, Picker};
use crate::render::{ProxyFactory, RenderSink, SyncReport};
use crate::robot::{LimbRole, Robot, RobotGeometry};
use serde::{Deserialize, Serialize};

/// Everything a host can tune about the rig.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub geometry: RobotGeometry,
    pub controls: ControlConfig,
}

/// Outcome of one [`RigSession::run_frame`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Commands polled this frame, all of which were processed.
    pub commands: usize,
    pub sync: SyncReport,
    /// Commands the rig refused, in input order. Their state is untouched.
    pub rejected: Vec<RigError>,
}

#[derive(Debug)]
pub struct RigSession {
    robot: Robot,
    selection: Selection,
    controls: ControlConfig,
}

impl RigSession {
    /// Builds the robot with proxies from `factory`. Call
    /// [`sync_all`](Self::sync_all) to push the rest pose.
    pub fn new<F: ProxyFactory + ?Sized>(
        config: &RigConfig,
        factory: &mut F,
    ) -> Result<Self, RigError> {
        let robot = Robot::build(&config.geometry, factory)?;
        Ok(Self::from_robot(robot, config.controls))
    }

    pub fn from_robot(robot: Robot, controls: ControlConfig) -> Self {
        Self {
            robot,
            selection: Selection::default(),
            controls,
        }
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn selected(&self) -> LimbRole {
        self.selection.current()
    }

    pub fn select(&mut self, role: LimbRole) {
        self.selection.select(role);
    }

    pub fn sync_all<S: RenderSink + ?Sized>(&self, sink: &mut S) -> SyncReport {
        self.robot.skeleton().sync_all(sink)
    }

    /// Applies one command to the robot.
    pub fn apply<S: RenderSink + ?Sized>(
        &mut self,
        command: Command,
        sink: &mut S,
    ) -> Result<SyncReport, RigError> {
        match command {
            Command::SelectNext => {
                let role = self.selection.next();
                log::debug!("{role} selected");
                Ok(SyncReport::default())
            }
            Command::SelectPrevious => {
                let role = self.selection.previous();
                log::debug!("{role} selected");
                Ok(SyncReport::default())
            }
            Command::Drive(direction) => self.motion(direction, false, sink),
            Command::Pivot(direction) => self.motion(direction, true, sink),
            Command::LookAt(target) => self.robot.look_at(LimbRole::Head, target, sink),
        }
    }

    /// Polls input and applies every resulting command in input order.
    ///
    /// Refused commands are collected in the report; the rest of the frame
    /// still runs.
    pub fn run_frame<I, P, S>(
        &mut self,
        poller: &mut CommandPoller,
        input: &I,
        picker: &P,
        sink: &mut S,
    ) -> FrameReport
    where
        I: InputState + ?Sized,
        P: Picker + ?Sized,
        S: RenderSink + ?Sized,
    {
        let commands = poller.poll(input, picker);
        let mut report = FrameReport {
            commands: commands.len(),
            ..FrameReport::default()
        };
        for command in commands {
            match self.apply(command, sink) {
                Ok(sync) => report.sync.merge(sync),
                Err(err) => report.rejected.push(err),
            }
        }
        report
    }

    fn motion<S: RenderSink + ?Sized>(
        &mut self,
        direction: Direction,
        pivot: bool,
        sink: &mut S,
    ) -> Result<SyncReport, RigError> {
        let role = self.selection.current();
        let action = binding(role, direction, pivot);
        let amount = self.controls.step(action, direction);
        log::debug!("{role}: {action:?} by {amount}");
        match action {
            Action::Translate => self.robot.translate(role, amount, sink),
            Action::Rotate(axis) => self.robot.rotate(role, amount, axis, sink),
        }
    }
}
