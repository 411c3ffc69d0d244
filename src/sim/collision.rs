//! Collision detection and response
//!
//! Each ball is resolved on its own against walls, ceiling, paddle and the
//! live bricks, in that order. Brick liveness is re-read for every ball, so a
//! brick destroyed earlier in the frame (by a hit or an explosion) is never
//! hit twice.

use glam::Vec2;
use rand::Rng;

use super::ball::Ball;
use super::bricks::{BrickField, HitOutcome};
use super::powerups::{PowerUpKind, PowerUpManager};
use super::rect::Rect;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Summary of one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveOutcome {
    /// Points gained this frame
    pub score_delta: u64,
    /// Bricks destroyed this frame (including explosion victims)
    pub bricks_destroyed: usize,
    /// Balls that left through the bottom
    pub balls_lost: usize,
    /// The last ball left the field this frame
    pub set_emptied: bool,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n. With an axis-aligned normal only
/// that axis changes sign and the magnitude is preserved.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Side walls and ceiling, checked against the next position.
/// Returns true if the ball bounced.
pub fn reflect_off_walls(ball: &mut Ball) -> bool {
    let next = ball.pos + ball.vel;
    let mut bounced = false;

    let into_right = next.x > FIELD_WIDTH - ball.radius && ball.vel.x > 0.0;
    let into_left = next.x < ball.radius && ball.vel.x < 0.0;
    if into_right || into_left {
        ball.vel = reflect_velocity(ball.vel, Vec2::X);
        bounced = true;
    }

    if next.y < ball.radius && ball.vel.y < 0.0 {
        ball.vel = reflect_velocity(ball.vel, Vec2::Y);
        bounced = true;
    }

    bounced
}

/// Outgoing velocity for a paddle bounce
///
/// `offset` is the impact position relative to the paddle center in half
/// widths (-1 = left edge, +1 = right edge). The angle from vertical grows
/// linearly with the offset up to ±60°.
pub fn paddle_bounce_velocity(offset: f32, incoming: Vec2) -> Vec2 {
    let angle = offset.clamp(-1.0, 1.0) * PADDLE_MAX_BOUNCE_ANGLE;
    let speed = incoming.length().max(PADDLE_MIN_BOUNCE_SPEED);
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}

/// Paddle contact: only while falling, within the top half of the paddle
/// and inside its horizontal extent. Returns true on a hit.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Rect) -> bool {
    let falling = ball.vel.y > 0.0;
    let in_band = ball.pos.y + ball.radius >= paddle.y && ball.pos.y < paddle.y + paddle.h / 2.0;
    let in_extent = ball.pos.x > paddle.x && ball.pos.x < paddle.right();
    if !(falling && in_band && in_extent) {
        return false;
    }

    // Sit exactly on top so the ball never sinks into the paddle
    ball.pos.y = paddle.y - ball.radius;
    let half = paddle.w / 2.0;
    let offset = (ball.pos.x - (paddle.x + half)) / half;
    ball.vel = paddle_bounce_velocity(offset, ball.vel);
    true
}

/// Grid cells of live bricks containing a point
pub fn bricks_at(bricks: &BrickField, point: Vec2) -> Vec<(usize, usize)> {
    bricks
        .live_bricks()
        .filter(|b| b.rect().contains_point(point))
        .map(|b| (b.col, b.row))
        .collect()
}

/// Score, drops and particles for destroyed bricks. Returns points gained.
fn destroy_bricks(
    victims: &[(usize, usize)],
    bricks: &BrickField,
    powerups: &mut PowerUpManager,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) -> u64 {
    for &(col, row) in victims {
        let Some(brick) = bricks.get(col, row) else {
            continue;
        };
        let center = brick.rect().center();
        events.push(GameEvent::Particles {
            pos: center,
            kind: brick.kind,
        });
        if rng.random_bool(POWERUP_DROP_CHANCE) {
            let kind = PowerUpKind::random(rng);
            powerups.spawn(center, kind);
            events.push(GameEvent::PowerUpSpawned(kind));
        }
    }
    victims.len() as u64
}

/// Resolve every free ball for this frame
pub fn resolve(state: &mut GameState) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();
    let paddle = state.paddle.rect();
    let mut lost = Vec::new();

    for (i, ball) in state.balls.balls.iter_mut().enumerate() {
        if ball.anchored {
            continue;
        }

        if reflect_off_walls(ball) {
            state.events.push(GameEvent::WallHit);
        }

        if bounce_off_paddle(ball, &paddle) {
            state.events.push(GameEvent::PaddleHit);
        }

        let hits = bricks_at(&state.bricks, ball.pos);
        if !hits.is_empty() && !ball.fire {
            ball.vel = reflect_velocity(ball.vel, Vec2::Y);
        }
        for (col, row) in hits {
            let kind = match state.bricks.get(col, row) {
                Some(brick) => brick.kind,
                None => continue,
            };
            match state.bricks.apply_hit(col, row) {
                Some(HitOutcome::Damaged { .. }) => {
                    state.events.push(GameEvent::BrickHit {
                        destroyed: false,
                        kind,
                    });
                }
                Some(HitOutcome::Destroyed { victims }) => {
                    state.events.push(GameEvent::BrickHit {
                        destroyed: true,
                        kind,
                    });
                    outcome.bricks_destroyed += victims.len();
                    outcome.score_delta += destroy_bricks(
                        &victims,
                        &state.bricks,
                        &mut state.powerups,
                        &mut state.rng,
                        &mut state.events,
                    );
                }
                // Already taken out by an explosion this frame
                None => {}
            }
        }

        if ball.pos.y - ball.radius > FIELD_HEIGHT {
            lost.push(i);
        }
    }

    if !lost.is_empty() {
        outcome.balls_lost = lost.len();
        state.balls.remove_indices(&lost);
        outcome.set_emptied = state.balls.is_empty();
    }

    state.score += outcome.score_delta;
    outcome
}
