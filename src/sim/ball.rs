//! Balls and the active ball set

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::paddle::Paddle;
use crate::consts::*;

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 12;

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Desired speed magnitude
    pub speed: f32,
    /// Riding the paddle, waiting for launch
    pub anchored: bool,
    /// Passes through bricks without reflecting
    pub fire: bool,
    /// Recent positions (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Ball {
    /// A ball anchored on top of the paddle
    pub fn anchored(paddle: &Paddle, speed: f32) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            speed,
            anchored: true,
            fire: false,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        };
        ball.follow(paddle);
        ball
    }

    /// A free ball with the given velocity
    pub fn free(pos: Vec2, vel: Vec2, speed: f32) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            speed,
            anchored: false,
            fire: false,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Keep an anchored ball centered just above the paddle
    pub fn follow(&mut self, paddle: &Paddle) {
        if self.anchored {
            self.pos = Vec2::new(
                paddle.center_x(),
                paddle.y - self.radius - BALL_ANCHOR_GAP,
            );
        }
    }

    /// Release from the paddle, heading up and to one side
    pub fn launch(&mut self, to_right: bool) {
        if self.anchored {
            let dx = if to_right { self.speed } else { -self.speed };
            self.vel = Vec2::new(dx, -self.speed);
            self.anchored = false;
            self.clear_trail();
        }
    }

    /// Record current position to trail
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Change the desired speed, rescaling velocity while keeping direction
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        if !self.anchored && self.vel != Vec2::ZERO {
            self.vel = self.vel.normalize() * speed;
        }
    }
}

/// All balls in play
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BallSet {
    pub balls: Vec<Ball>,
}

impl BallSet {
    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        self.balls.iter_mut()
    }

    pub fn push(&mut self, ball: Ball) {
        self.balls.push(ball);
    }

    /// True while a ball is waiting on the paddle
    pub fn has_anchored(&self) -> bool {
        self.balls.iter().any(|b| b.anchored)
    }

    /// Drop everything and put a single ball on the paddle
    pub fn reset_anchored(&mut self, paddle: &Paddle, speed: f32, fire: bool) {
        self.balls.clear();
        let mut ball = Ball::anchored(paddle, speed);
        ball.fire = fire;
        self.balls.push(ball);
    }

    /// Integrate free balls and record their trails
    pub fn advance(&mut self) {
        for ball in self.balls.iter_mut().filter(|b| !b.anchored) {
            ball.pos += ball.vel;
            ball.record_trail();
        }
    }

    /// Move anchored balls along with the paddle
    pub fn follow_paddle(&mut self, paddle: &Paddle) {
        for ball in self.balls.iter_mut() {
            ball.follow(paddle);
        }
    }

    /// Release anchored balls. Returns true if any ball was launched.
    pub fn launch(&mut self, to_right: bool) -> bool {
        let mut launched = false;
        for ball in self.balls.iter_mut().filter(|b| b.anchored) {
            ball.launch(to_right);
            launched = true;
        }
        launched
    }

    pub fn set_fire(&mut self, fire: bool) {
        for ball in self.balls.iter_mut() {
            ball.fire = fire;
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        for ball in self.balls.iter_mut() {
            ball.set_speed(speed);
        }
    }

    /// Split the lead ball into two more, one leaning left and one right.
    /// A stationary source (still anchored) gets a default upward velocity.
    pub fn split(&mut self, default_speed: f32) -> usize {
        let Some(source) = self
            .balls
            .iter()
            .find(|b| !b.anchored)
            .or_else(|| self.balls.first())
            .cloned()
        else {
            return 0;
        };

        let speed = if source.speed > 0.0 {
            source.speed
        } else {
            default_speed
        };
        let (dx, dy) = if source.vel.length_squared() > f32::EPSILON {
            (source.vel.x.abs().max(1.0), source.vel.y)
        } else {
            (speed, -speed)
        };

        for dir in [-1.0, 1.0] {
            let mut ball = Ball::free(source.pos, Vec2::new(dx * dir, dy), speed);
            ball.fire = source.fire;
            self.balls.push(ball);
        }
        2
    }

    /// Remove balls by index (indices must be ascending)
    pub fn remove_indices(&mut self, indices: &[usize]) {
        for &i in indices.iter().rev() {
            self.balls.remove(i);
        }
    }
}
