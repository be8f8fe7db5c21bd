//! Epsilon-guarded approach
//!
//! `delta = (goal - current) * ratio`. While `|delta| > epsilon` the value
//! advances by `delta`; otherwise it snaps to the goal and the goal is
//! cleared. The guard compares the magnitude of the whole step (absolute
//! value, vector length, rotation angle), never individual components.
//! A step that no longer changes the value (the remaining distance is below
//! float resolution at the goal's magnitude) also snaps.

use serde::{Deserialize, Serialize};
use tether_core::{GhostConfig, Vec3};

/// Values that can take a ratio step toward a goal
pub trait Approach: Copy + PartialEq {
    /// Move `ratio` of the way toward `goal`.
    ///
    /// Returns the stepped value and the magnitude of the step.
    fn approach(&self, goal: &Self, ratio: f32) -> (Self, f32);
}

impl Approach for f32 {
    fn approach(&self, goal: &Self, ratio: f32) -> (Self, f32) {
        let delta = (goal - self) * ratio;
        (self + delta, delta.abs())
    }
}

impl Approach for Vec3 {
    fn approach(&self, goal: &Self, ratio: f32) -> (Self, f32) {
        let delta = (*goal - *self) * ratio;
        (*self + delta, delta.length())
    }
}

/// Step parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApproachConfig {
    /// Fraction of the remaining distance closed per step
    pub ratio: f32,
    /// Step magnitude at or below which the value snaps
    pub epsilon: f32,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self {
            ratio: 0.1,
            epsilon: 1e-6,
        }
    }
}

impl ApproachConfig {
    pub fn new(ratio: f32, epsilon: f32) -> Self {
        Self { ratio, epsilon }
    }
}

impl From<&GhostConfig> for ApproachConfig {
    fn from(config: &GhostConfig) -> Self {
        Self {
            ratio: config.drag_ratio,
            epsilon: config.epsilon,
        }
    }
}

/// Outcome of one step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Convergence {
    /// Moved toward the goal, goal still pending
    Converging,
    /// Snapped onto the goal this step, goal cleared
    Converged,
    /// No goal to move toward
    Idle,
}

impl Convergence {
    pub fn is_converging(self) -> bool {
        matches!(self, Convergence::Converging)
    }
}

/// Advance `current` one step toward `goal`
pub fn step<T: Approach>(
    current: &mut T,
    goal: &mut Option<T>,
    config: &ApproachConfig,
) -> Convergence {
    let Some(target) = *goal else {
        return Convergence::Idle;
    };

    let (next, magnitude) = current.approach(&target, config.ratio);
    if magnitude > config.epsilon && next != *current {
        *current = next;
        Convergence::Converging
    } else {
        *current = target;
        *goal = None;
        tracing::trace!(magnitude, "snapped to goal");
        Convergence::Converged
    }
}

/// A value with an optional pending goal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Channel<T: Approach> {
    value: T,
    goal: Option<T>,
}

impl<T: Approach> Channel<T> {
    pub fn new(value: T) -> Self {
        Self { value, goal: None }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn goal(&self) -> Option<T> {
        self.goal
    }

    pub fn set_goal(&mut self, goal: T) {
        self.goal = Some(goal);
    }

    /// Jump straight to `value`, discarding any pending goal
    pub fn snap(&mut self, value: T) {
        self.value = value;
        self.goal = None;
    }

    pub fn clear_goal(&mut self) {
        self.goal = None;
    }

    pub fn is_converging(&self) -> bool {
        self.goal.is_some()
    }

    pub fn step(&mut self, config: &ApproachConfig) -> Convergence {
        step(&mut self.value, &mut self.goal, config)
    }
}
