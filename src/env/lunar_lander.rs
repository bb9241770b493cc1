//! A 2D lunar lander.
//!
//! The lander is a rigid body with two legs above a flat pad. It starts near
//! the top of the viewport with a small random push and must come to rest on
//! both legs.
//!
//! Actions:
//! - `0`: do nothing
//! - `1`: fire the left orientation engine (spins the body counter-clockwise, drifts it left)
//! - `2`: fire the main engine
//! - `3`: fire the right orientation engine (spins the body clockwise, drifts it right)
//!
//! Observation: `[x, y, vx, vy, angle, angular_velocity, left_leg, right_leg]`,
//! with positions relative to the pad and scaled to roughly `[-1, 1]`.
use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};

use super::{Environment, Step};
use crate::error::{LanderError, Result};

const OBSERVATION_DIM: usize = 8;
const ACTION_SPACE: usize = 4;

/// Physical constants of the lander task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanderConfig {
    /// Simulation frames per second.
    pub fps: f32,
    /// Vertical acceleration, negative is down.
    pub gravity: f32,
    /// Acceleration produced by the main engine along the body axis.
    pub main_engine_accel: f32,
    /// Lateral acceleration produced by an orientation engine.
    pub side_engine_accel: f32,
    /// Angular acceleration produced by an orientation engine.
    pub side_engine_torque: f32,
    /// Viewport width in world units.
    pub width: f32,
    /// Viewport height in world units.
    pub height: f32,
    /// Vertical distance from the body centre to the leg tips.
    pub leg_reach: f32,
    /// Horizontal distance from the body centre to each leg tip.
    pub leg_spread: f32,
    /// Bound on each component of the random initial velocity.
    pub initial_push: f32,
    /// Touching down faster than this is a crash.
    pub crash_speed: f32,
    /// Touching down tilted further than this is a crash.
    pub crash_angle: f32,
    /// Below this linear and angular speed on both legs the lander is at rest.
    pub rest_speed: f32,
}

impl Default for LanderConfig {
    fn default() -> Self {
        LanderConfig {
            fps: 50.0,
            gravity: -10.0,
            main_engine_accel: 15.0,
            side_engine_accel: 0.6,
            side_engine_torque: 2.5,
            width: 20.0,
            height: 40.0 / 3.0,
            leg_reach: 0.6,
            leg_spread: 0.67,
            initial_push: 1.5,
            crash_speed: 2.5,
            crash_angle: 0.8,
            rest_speed: 0.1,
        }
    }
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Landed,
    Crashed,
    OutOfBounds,
}

/// Per-step information: the outcome on the final step, `None` before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepInfo {
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Body {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    angle: f32,
    angular_velocity: f32,
}

/// The lander environment.
pub struct LunarLander {
    config: LanderConfig,
    body: Body,
    legs: [bool; 2],
    prev_shaping: f32,
    done: bool,
    rng: StdRng,
}

impl LunarLander {
    pub fn new(config: LanderConfig, rng: StdRng) -> Self {
        LunarLander {
            config,
            body: Body::default(),
            legs: [false; 2],
            prev_shaping: 0.0,
            // No episode until the first reset.
            done: true,
            rng,
        }
    }

    pub fn with_seed(config: LanderConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &LanderConfig {
        &self.config
    }

    fn pad_y(&self) -> f32 {
        self.config.height / 4.0
    }

    fn observation(&self) -> Array1<f32> {
        let c = &self.config;
        let b = &self.body;
        array![
            (b.x - c.width / 2.0) / (c.width / 2.0),
            (b.y - (self.pad_y() + c.leg_reach)) / (c.height / 2.0),
            b.vx * (c.width / 2.0) / c.fps,
            b.vy * (c.height / 2.0) / c.fps,
            b.angle,
            20.0 * b.angular_velocity / c.fps,
            if self.legs[0] { 1.0 } else { 0.0 },
            if self.legs[1] { 1.0 } else { 0.0 },
        ]
    }

    /// Potential of the current state; rewards are differences of this value.
    fn shaping(observation: &Array1<f32>) -> f32 {
        let (x, y) = (observation[0], observation[1]);
        let (vx, vy) = (observation[2], observation[3]);
        -100.0 * (x * x + y * y).sqrt() - 100.0 * (vx * vx + vy * vy).sqrt() - 100.0 * observation[4].abs()
            + 10.0 * observation[6]
            + 10.0 * observation[7]
    }

    /// World-space heights of the left and right leg tips.
    fn leg_tip_heights(&self) -> [f32; 2] {
        let (sin, cos) = self.body.angle.sin_cos();
        let c = &self.config;
        [-1.0f32, 1.0].map(|side| {
            let (ox, oy) = (side * c.leg_spread, -c.leg_reach);
            self.body.y + ox * sin + oy * cos
        })
    }

    fn apply_engines(&mut self, action: usize) -> (f32, f32) {
        let c = self.config;
        let (sin, cos) = self.body.angle.sin_cos();
        let mut ax = 0.0;
        let mut ay = c.gravity;
        let mut alpha = 0.0;
        let mut main_power = 0.0;
        let mut side_power = 0.0;

        match action {
            1 => {
                alpha += c.side_engine_torque;
                ax -= c.side_engine_accel * cos;
                ay -= c.side_engine_accel * sin;
                side_power = 1.0;
            }
            2 => {
                ax -= c.main_engine_accel * sin;
                ay += c.main_engine_accel * cos;
                main_power = 1.0;
            }
            3 => {
                alpha -= c.side_engine_torque;
                ax += c.side_engine_accel * cos;
                ay += c.side_engine_accel * sin;
                side_power = 1.0;
            }
            _ => {}
        }

        let dt = 1.0 / c.fps;
        let b = &mut self.body;
        b.vx += ax * dt;
        b.vy += ay * dt;
        b.angular_velocity += alpha * dt;
        b.x += b.vx * dt;
        b.y += b.vy * dt;
        b.angle += b.angular_velocity * dt;

        (main_power, side_power)
    }

    /// Resolves ground contact; returns `true` if the touchdown was a crash.
    fn resolve_contact(&mut self) -> bool {
        let pad_y = self.pad_y();
        let tips = self.leg_tip_heights();
        self.legs = [tips[0] <= pad_y, tips[1] <= pad_y];
        if !self.legs[0] && !self.legs[1] {
            return false;
        }

        let lowest = tips[0].min(tips[1]);
        self.body.y += pad_y - lowest;

        let impact = (-self.body.vy).max(0.0);
        if impact > self.config.crash_speed || self.body.angle.abs() > self.config.crash_angle {
            return true;
        }

        self.body.vy = self.body.vy.max(0.0);
        self.body.vx *= 0.9;
        self.body.angular_velocity *= 0.5;
        if self.legs[0] && self.legs[1] {
            self.body.angle *= 0.9;
        }
        false
    }

    fn at_rest(&self) -> bool {
        let b = &self.body;
        let speed = (b.vx * b.vx + b.vy * b.vy).sqrt();
        self.legs[0] && self.legs[1] && speed < self.config.rest_speed && b.angular_velocity.abs() < self.config.rest_speed
    }
}

impl Environment for LunarLander {
    type Info = StepInfo;

    fn reset(&mut self) -> Result<Array1<f32>> {
        let push = self.config.initial_push.abs();
        let (vx, vy) = if push > 0.0 {
            let dist = Uniform::new_inclusive(-push, push);
            (self.rng.sample(&dist), self.rng.sample(&dist))
        } else {
            (0.0, 0.0)
        };

        self.body = Body {
            x: self.config.width / 2.0,
            y: self.config.height,
            vx,
            vy,
            angle: 0.0,
            angular_velocity: 0.0,
        };
        self.legs = [false; 2];
        self.done = false;

        let observation = self.observation();
        self.prev_shaping = Self::shaping(&observation);
        Ok(observation)
    }

    fn step(&mut self, action: usize) -> Result<Step<StepInfo>> {
        if action >= ACTION_SPACE {
            return Err(LanderError::InvalidAction { action, max_actions: ACTION_SPACE });
        }
        if self.done {
            return Err(LanderError::Environment(
                "step called on a finished episode; call reset first".to_string(),
            ));
        }

        let (main_power, side_power) = self.apply_engines(action);
        let crashed = self.resolve_contact();
        let observation = self.observation();

        let shaping = Self::shaping(&observation);
        let mut reward = shaping - self.prev_shaping;
        self.prev_shaping = shaping;
        reward -= main_power * 0.30;
        reward -= side_power * 0.03;

        let outcome = if crashed {
            reward = -100.0;
            Some(Outcome::Crashed)
        } else if observation[0].abs() >= 1.0 {
            reward = -100.0;
            Some(Outcome::OutOfBounds)
        } else if self.at_rest() {
            reward = 100.0;
            Some(Outcome::Landed)
        } else {
            None
        };
        self.done = outcome.is_some();

        Ok(Step {
            observation,
            reward,
            done: self.done,
            info: StepInfo { outcome },
        })
    }

    fn action_space(&self) -> usize {
        ACTION_SPACE
    }

    fn observation_dim(&self) -> usize {
        OBSERVATION_DIM
    }
}
