//! Brickfall - breakout gameplay core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (paddle, balls, bricks, power-ups, game state)
//! - `audio`: Sound cues derived from simulation events (no playback)
//! - `platform`: Wall-clock abstraction for timed effects
//! - `persistence`: Key-value storage for preferences and high score
//! - `session`: Driver-facing facade tying the above together

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 480.0;
    pub const FIELD_HEIGHT: f32 = 640.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Distance from the paddle top to the bottom of the field
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
    pub const PADDLE_Y: f32 = FIELD_HEIGHT - PADDLE_BOTTOM_OFFSET;
    /// Multiplicative velocity decay applied every frame
    pub const PADDLE_FRICTION: f32 = 0.85;
    /// Per-frame acceleration as a fraction of max speed
    pub const PADDLE_ACCEL_RATIO: f32 = 0.2;
    pub const DEFAULT_PADDLE_SPEED: f32 = 15.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const DEFAULT_BALL_SPEED: f32 = 5.0;
    /// Gap between an anchored ball and the paddle top
    pub const BALL_ANCHOR_GAP: f32 = 2.0;
    /// Minimum speed after a paddle bounce
    pub const PADDLE_MIN_BOUNCE_SPEED: f32 = 4.0;
    /// Maximum deflection from vertical on a paddle bounce (60°)
    pub const PADDLE_MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Brick grid
    pub const BRICK_COLS: usize = 7;
    pub const BRICK_ROWS: usize = 8;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 60.0;
    pub const BRICK_OFFSET_LEFT: f32 = 35.0;
    pub const BRICK_HEIGHT: f32 = 24.0;
    pub const BRICK_WIDTH: f32 = (FIELD_WIDTH
        - BRICK_OFFSET_LEFT * 2.0
        - BRICK_PADDING * (BRICK_COLS as f32 - 1.0))
        / BRICK_COLS as f32;
    pub const MOVING_BRICK_SPEED: f32 = 1.0;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.5;
    pub const POWERUP_DROP_CHANCE: f64 = 0.15;
    pub const PADDLE_EXPAND_FACTOR: f32 = 1.5;
    pub const PADDLE_EXPAND_DURATION_MS: f64 = 10_000.0;
    pub const FIREBALL_DURATION_MS: f64 = 5_000.0;

    /// Nominal frame length for drivers with a fixed step (60 fps)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Level banner length in simulated frames (2 seconds at 60 fps)
    pub const LEVEL_TRANSITION_FRAMES: u32 = 120;

    pub const DEFAULT_LIVES: u32 = 3;
}
