//! Frame step and game commands
//!
//! One call to `tick` is one simulation step. The external render loop
//! decides whether to keep calling it; commands may arrive between ticks.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{ResolveOutcome, resolve};
use super::paddle::PaddleDirection;
use super::powerups::{apply_power_up, expire_effects, reset_effects};
use super::state::{GameEvent, GameState, RunMode, StartConfig, clamp_speed};
use crate::consts::*;

/// Advance the game by one frame
///
/// Wall-clock effect deadlines are checked first and regardless of mode, so
/// timed power-ups wear off in real time even while paused. Everything else
/// (including the level banner countdown) only moves while simulating.
pub fn tick(state: &mut GameState, now_ms: f64) {
    state.now_ms = now_ms;
    expire_effects(state, now_ms);

    if !state.mode.simulates() {
        return;
    }

    state.frame += 1;

    state.balls.advance();
    let outcome = resolve(state);
    state.record_high_score();

    for kind in state.powerups.advance(&state.paddle.rect()) {
        apply_power_up(state, kind);
    }

    state.bricks.advance_moving();
    state.paddle.advance(state.paddle_input);
    state.balls.follow_paddle(&state.paddle);

    if state.mode == RunMode::LevelTransition {
        state.transition_frames = state.transition_frames.saturating_sub(1);
        if state.transition_frames == 0 {
            state.mode = RunMode::Running;
        }
    }

    check_terminal(state, &outcome);
}

/// Life loss and game over take precedence over a level clear
fn check_terminal(state: &mut GameState, outcome: &ResolveOutcome) {
    if outcome.set_emptied {
        lose_life(state);
        if state.mode == RunMode::GameOver {
            return;
        }
    }

    if state.bricks.live_count() == 0 {
        level_up(state);
    }
}

/// The last ball is gone: one life, regardless of how many balls there were
fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    let lives_left = state.lives;
    state.emit(GameEvent::LifeLost { lives_left });
    log::info!("Life lost, {} remaining", lives_left);

    if lives_left == 0 {
        game_over(state);
    } else {
        state.respawn_anchored_ball();
    }
}

fn game_over(state: &mut GameState) {
    state.mode = RunMode::GameOver;
    reset_effects(state);
    state.powerups.clear_falling();
    state.paddle_input = PaddleDirection::None;
    let score = state.score;
    state.emit(GameEvent::GameOver { score });
    state.record_high_score();
    log::info!("Game over at level {} with score {}", state.level, score);
}

/// Advance to the next level (or finish the run at the configured cap)
pub fn level_up(state: &mut GameState) {
    if state.max_level.is_some_and(|max| state.level >= max) {
        state.mode = RunMode::Victory;
        reset_effects(state);
        state.powerups.clear_falling();
        let score = state.score;
        state.emit(GameEvent::Victory { score });
        state.record_high_score();
        log::info!("Victory with score {}", score);
        return;
    }

    state.level = state.level.saturating_add(1);
    state.ball_speed += 1.0;
    state.rebuild_bricks();
    state.powerups.clear_falling();
    state.respawn_anchored_ball();
    state.mode = RunMode::LevelTransition;
    state.transition_frames = LEVEL_TRANSITION_FRAMES;
    let level = state.level;
    state.emit(GameEvent::LevelUp { level });
    log::info!("Level up: {} (ball speed {})", level, state.ball_speed);
}

impl GameState {
    /// Begin a fresh run
    pub fn start(&mut self, config: &StartConfig) {
        let config = config.normalized();
        reset_effects(self);
        self.powerups.clear_falling();
        self.events.clear();
        // An abandoned run can still hold the best score
        self.record_high_score();

        self.seed = config.seed;
        self.rng = Pcg32::seed_from_u64(config.seed);
        self.score = 0;
        self.lives = config.lives;
        self.level = config.level;
        self.max_level = config.max_level;
        self.ball_speed = config.ball_speed;
        self.paddle.set_max_speed(config.paddle_speed);
        self.paddle_input = PaddleDirection::None;
        self.transition_frames = 0;
        self.frame = 0;

        self.rebuild_bricks();
        self.respawn_anchored_ball();
        self.mode = RunMode::Running;
        self.resume_mode = RunMode::Running;
        log::info!(
            "Game started: level {}, {} lives, ball speed {}",
            self.level,
            self.lives,
            self.ball_speed
        );
    }

    /// Freeze the simulation. Only Running and LevelTransition can pause.
    pub fn pause(&mut self) -> bool {
        if !self.mode.simulates() {
            return false;
        }
        self.resume_mode = self.mode;
        self.mode = RunMode::Paused;
        self.paddle_input = PaddleDirection::None;
        true
    }

    /// Return to whatever was paused
    pub fn resume(&mut self) -> bool {
        if self.mode != RunMode::Paused {
            return false;
        }
        self.mode = self.resume_mode;
        true
    }

    /// Release the anchored ball, randomly left- or right-leaning
    pub fn launch(&mut self) -> bool {
        if !self.mode.simulates() || !self.ball_on_paddle() {
            return false;
        }
        let to_right = self.rng.random_bool(0.5);
        let launched = self.balls.launch(to_right);
        if launched {
            self.emit(GameEvent::Launch);
        }
        launched
    }

    pub fn set_paddle_direction(&mut self, direction: PaddleDirection) {
        self.paddle_input = direction;
    }

    /// Pointer/touch position; ignored unless the game is live
    pub fn set_paddle_absolute(&mut self, x: f32) {
        if !self.mode.simulates() || x.is_nan() {
            return;
        }
        self.paddle.set_absolute(x);
        self.balls.follow_paddle(&self.paddle);
    }

    /// Relative pointer motion (pointer lock); ignored unless the game is live
    pub fn set_paddle_relative(&mut self, dx: f32) {
        if !self.mode.simulates() || !dx.is_finite() {
            return;
        }
        self.paddle.nudge(dx);
        self.balls.follow_paddle(&self.paddle);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives.max(1);
    }

    /// Jump to a level: rebuild bricks and put the ball back on the paddle
    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
        self.rebuild_bricks();
        self.powerups.clear_falling();
        self.respawn_anchored_ball();
    }

    /// New speed baseline; balls in flight keep their heading
    pub fn set_ball_speed(&mut self, speed: f32) {
        self.ball_speed = clamp_speed(speed);
        self.balls.set_speed(self.ball_speed);
    }

    pub fn set_paddle_speed(&mut self, speed: f32) {
        self.paddle.set_max_speed(clamp_speed(speed));
    }
}
