//! Game state and core simulation types
//!
//! `GameState` is the single context object every component operation works
//! on. There is no ambient or static game state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::BallSet;
use super::bricks::{BrickField, BrickKind};
use super::paddle::{Paddle, PaddleDirection};
use super::powerups::{PowerUpKind, PowerUpManager, TimedEffect};
use crate::consts::*;

/// Current run mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunMode {
    /// Nothing started yet
    #[default]
    NotStarted,
    /// Active gameplay (including a ball waiting on the paddle)
    Running,
    /// Frozen; `resume` returns to the mode that was paused
    Paused,
    /// Level banner after a clear; still simulates
    LevelTransition,
    /// Out of lives, terminal until restart
    GameOver,
    /// Cleared the configured final level
    Victory,
}

impl RunMode {
    /// Modes in which a tick advances the simulation
    pub fn simulates(self) -> bool {
        matches!(self, RunMode::Running | RunMode::LevelTransition)
    }
}

/// Notifications for audio/particle/UI consumers (fire-and-forget)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PaddleHit,
    WallHit,
    BrickHit { destroyed: bool, kind: BrickKind },
    /// Particle burst request at a destroyed brick
    Particles { pos: Vec2, kind: BrickKind },
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    EffectExpired(TimedEffect),
    Launch,
    LifeLost { lives_left: u32 },
    LevelUp { level: u32 },
    GameOver { score: u64 },
    Victory { score: u64 },
    NewHighScore(u64),
}

/// Parameters for `start`; numbers below 1 are coerced to 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    pub lives: u32,
    pub level: u32,
    pub ball_speed: f32,
    pub paddle_speed: f32,
    /// Clearing this level ends the run in Victory (unbounded when `None`)
    pub max_level: Option<u32>,
    /// RNG seed for brick kinds, drops and launch direction
    pub seed: u64,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            lives: DEFAULT_LIVES,
            level: 1,
            ball_speed: DEFAULT_BALL_SPEED,
            paddle_speed: DEFAULT_PADDLE_SPEED,
            max_level: None,
            seed: 0,
        }
    }
}

impl StartConfig {
    /// Clamp every numeric field to its minimum
    pub fn normalized(&self) -> Self {
        Self {
            lives: self.lives.max(1),
            level: self.level.max(1),
            ball_speed: clamp_speed(self.ball_speed),
            paddle_speed: clamp_speed(self.paddle_speed),
            max_level: self.max_level.map(|m| m.max(1)),
            seed: self.seed,
        }
    }
}

/// Coerce a speed setting to at least 1 (NaN becomes 1)
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() { 1.0 } else { speed.max(1.0) }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub mode: RunMode,
    /// Mode to return to on resume
    pub resume_mode: RunMode,
    pub score: u64,
    pub lives: u32,
    /// Current level (1-based, unbounded)
    pub level: u32,
    pub max_level: Option<u32>,
    pub high_score: u64,
    pub muted: bool,
    /// Ball speed baseline for new and rescaled balls
    pub ball_speed: f32,
    pub paddle: Paddle,
    pub paddle_input: PaddleDirection,
    pub balls: BallSet,
    pub bricks: BrickField,
    pub powerups: PowerUpManager,
    /// Level banner frames remaining
    pub transition_frames: u32,
    /// Simulated frame counter
    pub frame: u64,
    /// Latest wall-clock time seen (ms)
    pub now_ms: f64,
    /// Pending notifications, drained by the driver
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state showing level 1, not yet started
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bricks = BrickField::build(1, &mut rng);
        let paddle = Paddle::new(DEFAULT_PADDLE_SPEED);
        let mut balls = BallSet::default();
        balls.reset_anchored(&paddle, DEFAULT_BALL_SPEED, false);

        Self {
            seed,
            rng,
            mode: RunMode::NotStarted,
            resume_mode: RunMode::Running,
            score: 0,
            lives: DEFAULT_LIVES,
            level: 1,
            max_level: None,
            high_score: 0,
            muted: false,
            ball_speed: DEFAULT_BALL_SPEED,
            paddle,
            paddle_input: PaddleDirection::None,
            balls,
            bricks,
            powerups: PowerUpManager::default(),
            transition_frames: 0,
            frame: 0,
            now_ms: 0.0,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// True while the main ball rides the paddle
    pub fn ball_on_paddle(&self) -> bool {
        self.balls.has_anchored()
    }

    /// Whether FireBall is currently active
    pub fn fire_active(&self) -> bool {
        self.powerups.effects.is_active(TimedEffect::FireBall)
    }

    /// Center the paddle and put a single ball on it
    pub fn respawn_anchored_ball(&mut self) {
        self.paddle.recenter();
        let fire = self.fire_active();
        self.balls.reset_anchored(&self.paddle, self.ball_speed, fire);
    }

    /// Build the brick field for the current level
    pub fn rebuild_bricks(&mut self) {
        self.bricks = BrickField::build(self.level, &mut self.rng);
    }

    /// Fold the current score into the high score
    pub fn record_high_score(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
            self.emit(GameEvent::NewHighScore(self.score));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_config_is_coerced() {
        let config = StartConfig {
            lives: 0,
            level: 0,
            ball_speed: -3.0,
            paddle_speed: f32::NAN,
            max_level: Some(0),
            seed: 4,
        }
        .normalized();
        assert_eq!(config.lives, 1);
        assert_eq!(config.level, 1);
        assert_eq!(config.ball_speed, 1.0);
        assert_eq!(config.paddle_speed, 1.0);
        assert_eq!(config.max_level, Some(1));
    }

    #[test]
    fn test_start_config_serde_defaults() {
        let config: StartConfig = serde_json::from_str(r#"{"lives": 5}"#).unwrap();
        assert_eq!(config.lives, 5);
        assert_eq!(config.level, 1);
        assert_eq!(config.ball_speed, DEFAULT_BALL_SPEED);
    }

    #[test]
    fn test_new_state_waits_on_paddle() {
        let state = GameState::new(1);
        assert_eq!(state.mode, RunMode::NotStarted);
        assert!(state.ball_on_paddle());
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_high_score_only_rises() {
        let mut state = GameState::new(1);
        state.score = 10;
        state.record_high_score();
        state.score = 4;
        state.record_high_score();
        assert_eq!(state.high_score, 10);
        assert_eq!(state.drain_events(), vec![GameEvent::NewHighScore(10)]);
        assert!(state.events.is_empty());
    }
}
