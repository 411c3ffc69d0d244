//! The player's paddle

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Held horizontal input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddleDirection {
    Left,
    Right,
    #[default]
    None,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Signed horizontal velocity (pixels per frame)
    pub velocity: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    /// Multiplicative decay applied every frame
    pub friction: f32,
    /// Width to revert to when an expansion ends
    pub base_width: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self::new(DEFAULT_PADDLE_SPEED)
    }
}

impl Paddle {
    pub fn new(max_speed: f32) -> Self {
        let max_speed = max_speed.max(1.0);
        Self {
            x: (FIELD_WIDTH - PADDLE_WIDTH) / 2.0,
            y: PADDLE_Y,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            velocity: 0.0,
            max_speed,
            acceleration: max_speed * PADDLE_ACCEL_RATIO,
            friction: PADDLE_FRICTION,
            base_width: PADDLE_WIDTH,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_expanded(&self) -> bool {
        self.width > self.base_width
    }

    /// Keyboard-style movement: accelerate, decay, clamp, integrate
    pub fn advance(&mut self, direction: PaddleDirection) {
        match direction {
            PaddleDirection::Left => self.velocity -= self.acceleration,
            PaddleDirection::Right => self.velocity += self.acceleration,
            PaddleDirection::None => {}
        }
        self.velocity *= self.friction;
        self.velocity = self.velocity.clamp(-self.max_speed, self.max_speed);
        self.x += self.velocity;
        self.clamp_to_field();
    }

    /// Pointer/touch movement: center the paddle under `x`, no momentum
    pub fn set_absolute(&mut self, x: f32) {
        self.x = x - self.width / 2.0;
        self.velocity = 0.0;
        self.clamp_to_field();
    }

    /// Relative movement (pointer lock): shift by `dx`, no momentum
    pub fn nudge(&mut self, dx: f32) {
        self.x += dx;
        self.velocity = 0.0;
        self.clamp_to_field();
    }

    /// Widen by `factor` around the current center. No-op while expanded.
    pub fn expand(&mut self, factor: f32) -> bool {
        if self.is_expanded() {
            return false;
        }
        self.resize(self.base_width * factor.max(1.0));
        true
    }

    /// Return to the canonical width. Returns false if not expanded.
    pub fn revert(&mut self) -> bool {
        if !self.is_expanded() {
            return false;
        }
        self.resize(self.base_width);
        true
    }

    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed.max(1.0);
        self.acceleration = self.max_speed * PADDLE_ACCEL_RATIO;
    }

    /// Center the paddle and stop it
    pub fn recenter(&mut self) {
        self.x = (FIELD_WIDTH - self.width) / 2.0;
        self.velocity = 0.0;
    }

    fn resize(&mut self, width: f32) {
        let center = self.center_x();
        self.width = width.min(FIELD_WIDTH);
        self.x = center - self.width / 2.0;
        self.clamp_to_field();
    }

    fn clamp_to_field(&mut self) {
        let max_x = FIELD_WIDTH - self.width;
        if self.x <= 0.0 {
            self.x = 0.0;
            self.velocity = 0.0;
        } else if self.x >= max_x {
            self.x = max_x;
            self.velocity = 0.0;
        }
    }
}
