//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use flapq::{
    Action, Observation, Result,
    ports::{Environment, StepOutcome},
};

/// Observation that discretizes to `(1, 2, 3, 4)` under the default bins.
pub fn scenario_observation() -> Observation {
    // x: -150 sits on the first edge; offset -290; velocity -17; gap -120
    Observation::new(-290.0, -17.0, -150.0, 60.0, -60.0)
}

/// Minimal side-scroller: gravity pulls the player down, flapping kicks it
/// up, and one gap repeatedly scrolls past. Screen y grows downwards.
pub struct GapEnvironment {
    y: f64,
    vel: f64,
    dist: f64,
    top: f64,
    bottom: f64,
}

impl GapEnvironment {
    pub const HEIGHT: f64 = 512.0;

    pub fn new() -> Self {
        let mut env = Self {
            y: 0.0,
            vel: 0.0,
            dist: 0.0,
            top: 0.0,
            bottom: 0.0,
        };
        env.place();
        env
    }

    fn place(&mut self) {
        self.y = 250.0;
        self.vel = 0.0;
        self.dist = 200.0;
        self.top = 200.0;
        self.bottom = 300.0;
    }

    fn crashed(&self) -> bool {
        let outside_screen = self.y < 0.0 || self.y > Self::HEIGHT;
        let in_pipe = self.dist.abs() <= 20.0 && (self.y < self.top || self.y > self.bottom);
        outside_screen || in_pipe
    }
}

impl Environment for GapEnvironment {
    fn reset(&mut self) -> Result<()> {
        self.place();
        Ok(())
    }

    fn observe(&self) -> Observation {
        Observation::new(self.y, self.vel, self.dist, self.top, self.bottom)
    }

    fn step(&mut self, action: Action) -> Result<StepOutcome> {
        self.vel = match action {
            Action::Flap => -8.0,
            Action::Noop => (self.vel + 1.0).min(10.0),
        };
        self.y += self.vel;
        self.dist -= 4.0;
        if self.dist < -60.0 {
            self.dist = 200.0;
        }

        if self.crashed() {
            Ok(StepOutcome::new(-5.0, true))
        } else {
            Ok(StepOutcome::new(1.0, false))
        }
    }
}
