//! Read-only snapshot of the game for renderers and UI
//!
//! Everything a drawing or HUD layer needs, detached from the live state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bricks::BrickKind;
use super::powerups::{PowerUpKind, TimedEffect};
use super::rect::Rect;
use super::state::{GameState, RunMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
    pub trail: Vec<Vec2>,
    pub fire: bool,
    pub anchored: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickView {
    pub col: usize,
    pub row: usize,
    pub alive: bool,
    pub kind: BrickKind,
    pub hp: u8,
    pub max_hp: u8,
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub kind: PowerUpKind,
    pub rect: Rect,
}

/// Full frame snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: RunMode,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub high_score: u64,
    pub muted: bool,
    /// Show the "level N" banner
    pub level_banner: bool,
    pub ball_on_paddle: bool,
    pub paddle: Rect,
    pub balls: Vec<BallView>,
    pub bricks: Vec<BrickView>,
    pub powerups: Vec<PowerUpView>,
    pub active_effects: Vec<TimedEffect>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let active_effects = [TimedEffect::PaddleExpand, TimedEffect::FireBall]
            .into_iter()
            .filter(|e| self.powerups.effects.is_active(*e))
            .collect();

        Snapshot {
            mode: self.mode,
            score: self.score,
            lives: self.lives,
            level: self.level,
            high_score: self.high_score,
            muted: self.muted,
            level_banner: self.mode == RunMode::LevelTransition,
            ball_on_paddle: self.ball_on_paddle(),
            paddle: self.paddle.rect(),
            balls: self
                .balls
                .iter()
                .map(|b| BallView {
                    pos: b.pos,
                    radius: b.radius,
                    trail: b.trail.clone(),
                    fire: b.fire,
                    anchored: b.anchored,
                })
                .collect(),
            bricks: self
                .bricks
                .iter()
                .map(|b| BrickView {
                    col: b.col,
                    row: b.row,
                    alive: b.alive,
                    kind: b.kind,
                    hp: b.hp,
                    max_hp: b.max_hp,
                    rect: b.rect(),
                })
                .collect(),
            powerups: self
                .powerups
                .powerups
                .iter()
                .map(|p| PowerUpView {
                    kind: p.kind,
                    rect: p.rect(),
                })
                .collect(),
            active_effects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::StartConfig;

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(8);
        state.start(&StartConfig::default());
        let snap = state.snapshot();
        assert_eq!(snap.mode, RunMode::Running);
        assert_eq!(snap.bricks.len(), BRICK_COLS * BRICK_ROWS);
        assert_eq!(snap.bricks.iter().filter(|b| b.alive).count(), state.bricks.live_count());
        assert_eq!(snap.balls.len(), 1);
        assert!(snap.ball_on_paddle);
        assert!(!snap.level_banner);
        assert_eq!(snap.paddle.w, PADDLE_WIDTH);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(8);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"mode\":\"NotStarted\""));
    }
}
