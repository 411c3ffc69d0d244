//! Falling power-ups and timed effects
//!
//! Timed effects expire on wall-clock deadlines kept in an explicit schedule,
//! polled by the state machine. Nothing here depends on frames continuing to
//! run, and cancelling the schedule drops every pending expiry at once.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    MultiBall,
    PaddleExpand,
    FireBall,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::MultiBall,
        PowerUpKind::PaddleExpand,
        PowerUpKind::FireBall,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Effects that wear off after a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedEffect {
    PaddleExpand,
    FireBall,
}

impl TimedEffect {
    pub fn duration_ms(self) -> f64 {
        match self {
            TimedEffect::PaddleExpand => PADDLE_EXPAND_DURATION_MS,
            TimedEffect::FireBall => FIREBALL_DURATION_MS,
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    /// Center position
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, POWERUP_SIZE, POWERUP_SIZE)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Expiry {
    effect: TimedEffect,
    deadline_ms: f64,
}

/// Pending effect expiries; at most one per effect
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectSchedule {
    pending: Vec<Expiry>,
}

impl EffectSchedule {
    pub fn is_active(&self, effect: TimedEffect) -> bool {
        self.pending.iter().any(|e| e.effect == effect)
    }

    /// Deadline of an active effect
    pub fn deadline(&self, effect: TimedEffect) -> Option<f64> {
        self.pending
            .iter()
            .find(|e| e.effect == effect)
            .map(|e| e.deadline_ms)
    }

    /// Start an effect. Returns false (and keeps the old deadline) if it is
    /// already active.
    pub fn schedule(&mut self, effect: TimedEffect, now_ms: f64) -> bool {
        if self.is_active(effect) {
            return false;
        }
        self.pending.push(Expiry {
            effect,
            deadline_ms: now_ms + effect.duration_ms(),
        });
        true
    }

    /// Remove and return every effect whose deadline has passed
    pub fn poll(&mut self, now_ms: f64) -> Vec<TimedEffect> {
        let mut expired = Vec::new();
        self.pending.retain(|e| {
            if now_ms >= e.deadline_ms {
                expired.push(e.effect);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Drop every pending expiry
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

/// Owns falling power-ups and the effect schedule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpManager {
    pub powerups: Vec<PowerUp>,
    pub effects: EffectSchedule,
}

impl PowerUpManager {
    pub fn spawn(&mut self, pos: Vec2, kind: PowerUpKind) {
        self.powerups.push(PowerUp { pos, kind });
    }

    /// Drop every falling power-up by one step. Returns the kinds collected
    /// by the paddle; power-ups past the bottom edge vanish.
    pub fn advance(&mut self, paddle: &Rect) -> Vec<PowerUpKind> {
        let mut collected = Vec::new();
        self.powerups.retain_mut(|p| {
            p.pos.y += POWERUP_FALL_SPEED;
            if p.rect().overlaps(paddle) {
                collected.push(p.kind);
                false
            } else {
                p.rect().y <= FIELD_HEIGHT
            }
        });
        collected
    }

    /// Remove falling power-ups (effects keep running)
    pub fn clear_falling(&mut self) {
        self.powerups.clear();
    }
}

/// Apply a collected power-up to the game
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    state.emit(GameEvent::PowerUpCollected(kind));
    match kind {
        PowerUpKind::MultiBall => {
            let added = state.balls.split(state.ball_speed);
            log::debug!("Multi-ball: {} balls in play", state.balls.len());
            if added == 0 {
                log::warn!("Multi-ball collected with no ball to split");
            }
        }
        PowerUpKind::PaddleExpand => {
            if state
                .powerups
                .effects
                .schedule(TimedEffect::PaddleExpand, state.now_ms)
            {
                state.paddle.expand(PADDLE_EXPAND_FACTOR);
                log::debug!("Paddle expanded to {}", state.paddle.width);
            }
        }
        PowerUpKind::FireBall => {
            if state
                .powerups
                .effects
                .schedule(TimedEffect::FireBall, state.now_ms)
            {
                state.balls.set_fire(true);
                log::debug!("Fire ball active");
            }
        }
    }
}

/// Revert every effect whose deadline passed. Safe to call while paused.
pub fn expire_effects(state: &mut GameState, now_ms: f64) {
    for effect in state.powerups.effects.poll(now_ms) {
        match effect {
            TimedEffect::PaddleExpand => {
                state.paddle.revert();
            }
            TimedEffect::FireBall => state.balls.set_fire(false),
        }
        log::debug!("{:?} expired", effect);
        state.emit(GameEvent::EffectExpired(effect));
    }
}

/// Cancel pending expiries and undo their effects immediately
pub fn reset_effects(state: &mut GameState) {
    state.powerups.effects.cancel_all();
    state.paddle.revert();
    state.balls.set_fire(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::Ball;

    #[test]
    fn test_schedule_does_not_stack() {
        let mut schedule = EffectSchedule::default();
        assert!(schedule.schedule(TimedEffect::FireBall, 0.0));
        assert!(!schedule.schedule(TimedEffect::FireBall, 1_000.0));
        assert_eq!(schedule.deadline(TimedEffect::FireBall), Some(FIREBALL_DURATION_MS));

        assert!(schedule.poll(FIREBALL_DURATION_MS - 1.0).is_empty());
        assert_eq!(schedule.poll(FIREBALL_DURATION_MS), vec![TimedEffect::FireBall]);
        assert!(schedule.poll(FIREBALL_DURATION_MS * 10.0).is_empty());
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut schedule = EffectSchedule::default();
        schedule.schedule(TimedEffect::FireBall, 0.0);
        schedule.schedule(TimedEffect::PaddleExpand, 0.0);
        schedule.cancel_all();
        assert!(schedule.poll(f64::MAX).is_empty());
    }

    #[test]
    fn test_powerup_collected_by_paddle() {
        let mut manager = PowerUpManager::default();
        let paddle = Rect::new(100.0, 600.0, 100.0, 15.0);
        manager.spawn(Vec2::new(150.0, 595.0), PowerUpKind::FireBall);
        let collected = manager.advance(&paddle);
        assert_eq!(collected, vec![PowerUpKind::FireBall]);
        assert!(manager.powerups.is_empty());
    }

    #[test]
    fn test_missed_powerup_despawns() {
        let mut manager = PowerUpManager::default();
        let paddle = Rect::new(0.0, 600.0, 100.0, 15.0);
        manager.spawn(Vec2::new(400.0, 600.0), PowerUpKind::MultiBall);
        let mut collected = Vec::new();
        for _ in 0..100 {
            collected.extend(manager.advance(&paddle));
        }
        assert!(collected.is_empty());
        assert!(manager.powerups.is_empty());
    }

    #[test]
    fn test_expand_reverts_once_despite_recollection() {
        let mut state = GameState::new(3);
        state.now_ms = 0.0;
        apply_power_up(&mut state, PowerUpKind::PaddleExpand);
        state.now_ms = 4_000.0;
        apply_power_up(&mut state, PowerUpKind::PaddleExpand);
        assert_eq!(state.paddle.width, PADDLE_WIDTH * PADDLE_EXPAND_FACTOR);

        expire_effects(&mut state, PADDLE_EXPAND_DURATION_MS - 1.0);
        assert_eq!(state.paddle.width, PADDLE_WIDTH * PADDLE_EXPAND_FACTOR);

        expire_effects(&mut state, PADDLE_EXPAND_DURATION_MS);
        expire_effects(&mut state, PADDLE_EXPAND_DURATION_MS + 4_000.0);
        assert_eq!(state.paddle.width, PADDLE_WIDTH);
        let expired = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EffectExpired(_)))
            .count();
        assert_eq!(expired, 1);
    }

    #[test]
    fn test_fire_ball_applies_to_all_balls() {
        let mut state = GameState::new(3);
        state.balls.push(Ball::free(Vec2::new(10.0, 10.0), Vec2::ONE, 5.0));
        apply_power_up(&mut state, PowerUpKind::FireBall);
        assert!(state.balls.iter().all(|b| b.fire));
        expire_effects(&mut state, FIREBALL_DURATION_MS);
        assert!(state.balls.iter().all(|b| !b.fire));
    }

    #[test]
    fn test_multiball_adds_two() {
        let mut state = GameState::new(3);
        apply_power_up(&mut state, PowerUpKind::MultiBall);
        assert_eq!(state.balls.len(), 3);
        assert_eq!(state.balls.iter().filter(|b| !b.anchored).count(), 2);
    }
}
