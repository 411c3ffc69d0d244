//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - One step per external tick, no threads, no hidden timers
//! - Seeded RNG only (brick kinds, drops, launch direction)
//! - Level silhouettes are pure functions of the level index
//! - No rendering, audio or platform dependencies

pub mod ball;
pub mod bricks;
pub mod collision;
pub mod paddle;
pub mod powerups;
pub mod rect;
pub mod state;
pub mod tick;
pub mod view;

pub use ball::{Ball, BallSet, TRAIL_LENGTH};
pub use bricks::{Brick, BrickField, BrickKind, HitOutcome, pattern_alive, silhouette};
pub use collision::{ResolveOutcome, paddle_bounce_velocity, reflect_velocity, resolve};
pub use paddle::{Paddle, PaddleDirection};
pub use powerups::{PowerUp, PowerUpKind, PowerUpManager, TimedEffect};
pub use rect::Rect;
pub use state::{GameEvent, GameState, RunMode, StartConfig};
pub use tick::{level_up, tick};
pub use view::Snapshot;
