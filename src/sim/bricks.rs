//! Brick field: grid storage, level layouts and brick behaviors
//!
//! Layout silhouettes are a pure function of `(level, col, row)`. Only the
//! per-brick kind draw consumes the run RNG, so regenerating a level always
//! reproduces the same alive/dead shape.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Number of hand-authored layouts before procedural generation takes over
pub const NUM_CURATED_PATTERNS: u32 = 10;

/// Procedural layouts only populate the top rows
pub const PROCEDURAL_ROWS: usize = 5;
/// Cells whose hash value is above this threshold are alive
pub const PROCEDURAL_DENSITY: f64 = 0.35;

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    /// Takes several hits, scales with level
    Steel,
    /// Destroys its 3x3 neighborhood when broken
    Explosive,
    /// Drifts horizontally, bouncing off the field edges
    Moving,
}

/// A single grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub col: usize,
    pub row: usize,
    pub kind: BrickKind,
    pub alive: bool,
    pub hp: u8,
    pub max_hp: u8,
    /// Horizontal offset from the grid slot (Moving only)
    pub drift: f32,
    /// Horizontal velocity in pixels per frame (Moving only)
    pub vx: f32,
}

impl Brick {
    fn dead(col: usize, row: usize) -> Self {
        Self {
            col,
            row,
            kind: BrickKind::Normal,
            alive: false,
            hp: 0,
            max_hp: 0,
            drift: 0.0,
            vx: 0.0,
        }
    }

    fn live(col: usize, row: usize, kind: BrickKind, hp: u8, vx: f32) -> Self {
        Self {
            col,
            row,
            kind,
            alive: true,
            hp,
            max_hp: hp,
            drift: 0.0,
            vx,
        }
    }

    /// Eligible for collision
    #[inline]
    pub fn is_live(&self) -> bool {
        self.alive && self.hp > 0
    }

    /// Screen rect, derived from the grid slot plus drift
    pub fn rect(&self) -> Rect {
        Rect::new(
            slot_x(self.col) + self.drift,
            slot_y(self.row),
            BRICK_WIDTH,
            BRICK_HEIGHT,
        )
    }
}

/// Left edge of a grid column
#[inline]
pub fn slot_x(col: usize) -> f32 {
    BRICK_OFFSET_LEFT + col as f32 * (BRICK_WIDTH + BRICK_PADDING)
}

/// Top edge of a grid row
#[inline]
pub fn slot_y(row: usize) -> f32 {
    BRICK_OFFSET_TOP + row as f32 * (BRICK_HEIGHT + BRICK_PADDING)
}

/// Result of hitting a live brick
#[derive(Debug, Clone, PartialEq)]
pub enum HitOutcome {
    /// Brick survived with `hp` hit points left
    Damaged { hp: u8 },
    /// Every brick destroyed by this hit, the struck brick first
    Destroyed { victims: Vec<(usize, usize)> },
}

/// The brick grid for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickField {
    pub level: u32,
    /// Column-major cells (`col * BRICK_ROWS + row`)
    cells: Vec<Brick>,
    live_count: usize,
}

impl BrickField {
    /// Build a fresh field for a level
    pub fn build(level: u32, rng: &mut impl Rng) -> Self {
        let level = level.max(1);
        let shape = silhouette(level);
        let mut cells = Vec::with_capacity(BRICK_COLS * BRICK_ROWS);
        let mut live_count = 0;

        for (col, column) in shape.iter().enumerate() {
            for (row, &alive) in column.iter().enumerate() {
                if alive {
                    let kind = draw_kind(level, rng);
                    let hp = hit_points(kind, level);
                    let vx = if kind == BrickKind::Moving {
                        if rng.random_bool(0.5) {
                            MOVING_BRICK_SPEED
                        } else {
                            -MOVING_BRICK_SPEED
                        }
                    } else {
                        0.0
                    };
                    cells.push(Brick::live(col, row, kind, hp, vx));
                    live_count += 1;
                } else {
                    cells.push(Brick::dead(col, row));
                }
            }
        }

        log::info!("Level {} built with {} bricks", level, live_count);

        Self {
            level,
            cells,
            live_count,
        }
    }

    /// Build a field from an explicit kind map (`None` = empty cell)
    pub fn from_layout(level: u32, layout: impl Fn(usize, usize) -> Option<BrickKind>) -> Self {
        let mut cells = Vec::with_capacity(BRICK_COLS * BRICK_ROWS);
        let mut live_count = 0;
        for col in 0..BRICK_COLS {
            for row in 0..BRICK_ROWS {
                match layout(col, row) {
                    Some(kind) => {
                        let vx = if kind == BrickKind::Moving {
                            MOVING_BRICK_SPEED
                        } else {
                            0.0
                        };
                        cells.push(Brick::live(col, row, kind, hit_points(kind, level), vx));
                        live_count += 1;
                    }
                    None => cells.push(Brick::dead(col, row)),
                }
            }
        }
        Self {
            level,
            cells,
            live_count,
        }
    }

    #[inline]
    fn index(col: usize, row: usize) -> Option<usize> {
        (col < BRICK_COLS && row < BRICK_ROWS).then_some(col * BRICK_ROWS + row)
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Brick> {
        Self::index(col, row).map(|i| &self.cells[i])
    }

    /// Bricks still in play (level clears at zero)
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.cells.iter()
    }

    pub fn live_bricks(&self) -> impl Iterator<Item = &Brick> {
        self.cells.iter().filter(|b| b.is_live())
    }

    /// Alive/dead shape of the current field
    pub fn alive_mask(&self) -> Vec<bool> {
        self.cells.iter().map(|b| b.alive).collect()
    }

    /// Hit a brick once. Returns `None` for empty, dead or out-of-range cells.
    pub fn apply_hit(&mut self, col: usize, row: usize) -> Option<HitOutcome> {
        let idx = Self::index(col, row)?;
        let brick = &mut self.cells[idx];
        if !brick.is_live() {
            return None;
        }

        brick.hp = brick.hp.saturating_sub(1);
        if brick.hp > 0 {
            return Some(HitOutcome::Damaged { hp: brick.hp });
        }

        brick.alive = false;
        let kind = brick.kind;
        self.live_count -= 1;

        let mut victims = vec![(col, row)];
        if kind == BrickKind::Explosive {
            victims.extend(self.explode(col, row));
        }
        Some(HitOutcome::Destroyed { victims })
    }

    /// Destroy every live brick in the 3x3 neighborhood, ignoring remaining
    /// hit points. Explosive neighbors do not detonate in turn.
    pub fn explode(&mut self, col: usize, row: usize) -> Vec<(usize, usize)> {
        let mut destroyed = Vec::new();
        let cols = col.saturating_sub(1)..=(col + 1).min(BRICK_COLS - 1);
        for c in cols {
            for r in row.saturating_sub(1)..=(row + 1).min(BRICK_ROWS - 1) {
                let Some(idx) = Self::index(c, r) else {
                    continue;
                };
                let brick = &mut self.cells[idx];
                if brick.is_live() {
                    brick.hp = 0;
                    brick.alive = false;
                    self.live_count -= 1;
                    destroyed.push((c, r));
                }
            }
        }
        if !destroyed.is_empty() {
            log::debug!("Explosion at ({}, {}) destroyed {} bricks", col, row, destroyed.len());
        }
        destroyed
    }

    /// Drift Moving bricks, reflecting at the field edges
    pub fn advance_moving(&mut self) {
        for brick in self.cells.iter_mut() {
            if !brick.is_live() || brick.kind != BrickKind::Moving {
                continue;
            }
            brick.drift += brick.vx;
            let x = slot_x(brick.col) + brick.drift;
            if x <= 0.0 {
                brick.drift = -slot_x(brick.col);
                brick.vx = brick.vx.abs();
            } else if x + BRICK_WIDTH >= FIELD_WIDTH {
                brick.drift = FIELD_WIDTH - BRICK_WIDTH - slot_x(brick.col);
                brick.vx = -brick.vx.abs();
            }
        }
    }
}

/// Hit points for a freshly built brick
pub fn hit_points(kind: BrickKind, level: u32) -> u8 {
    match kind {
        BrickKind::Steel => (2 + level / 5).min(u8::MAX as u32) as u8,
        _ => 1,
    }
}

/// Weighted kind draw, gated by level
pub fn draw_kind(level: u32, rng: &mut impl Rng) -> BrickKind {
    let roll: f32 = rng.random();
    if level >= 4 && roll < 0.08 {
        BrickKind::Moving
    } else if level >= 3 && roll < 0.18 {
        BrickKind::Explosive
    } else if level >= 2 && roll < 0.38 {
        BrickKind::Steel
    } else {
        BrickKind::Normal
    }
}

/// Whether a cell is populated on the given level (before empty-level fallback)
pub fn pattern_alive(level: u32, col: usize, row: usize) -> bool {
    if level == 0 || level > NUM_CURATED_PATTERNS {
        procedural_alive(level, col, row)
    } else {
        curated_alive(level, col, row)
    }
}

/// Full silhouette for a level, indexed `[col][row]`
///
/// A procedural level that comes out completely empty reuses a curated shape
/// so every level has something to break.
pub fn silhouette(level: u32) -> [[bool; BRICK_ROWS]; BRICK_COLS] {
    let mut shape = [[false; BRICK_ROWS]; BRICK_COLS];
    let mut any = false;
    for (col, column) in shape.iter_mut().enumerate() {
        for (row, cell) in column.iter_mut().enumerate() {
            *cell = pattern_alive(level, col, row);
            any |= *cell;
        }
    }
    if !any {
        let fallback = (level % NUM_CURATED_PATTERNS) + 1;
        for (col, column) in shape.iter_mut().enumerate() {
            for (row, cell) in column.iter_mut().enumerate() {
                *cell = curated_alive(fallback, col, row);
            }
        }
    }
    shape
}

fn curated_alive(level: u32, col: usize, row: usize) -> bool {
    let c = col as i32;
    let r = row as i32;
    let mid = (BRICK_COLS as i32 - 1) / 2;
    let last_col = BRICK_COLS as i32 - 1;
    match level {
        // Rows block
        1 => r < 3,
        // Checkerboard
        2 => (c + r) % 2 == 0,
        // Pyramid
        3 => r < 4 && (c - mid).abs() <= r,
        // Columns
        4 => c % 2 == 0,
        // Diamond
        5 => (c - mid).abs() + (r - 3).abs() <= 3,
        // Cross
        6 => c == mid || r == 3,
        // Framed interior
        7 => {
            let frame = r == 0 || r == 5 || c == 0 || c == last_col;
            r <= 5 && (frame || (c == mid && (2..=3).contains(&r)))
        }
        // Vertical pipes
        8 => c % 3 == 0 && r < 6,
        // Dense canopy
        9 => r < 4 || (r == 4 && c % 2 == 1),
        // Maze
        _ => r < 6 && (c * (r + 1)) % 3 != 1,
    }
}

/// Hash-based procedural layout, mirrored across the center column
fn procedural_alive(level: u32, col: usize, row: usize) -> bool {
    if row >= PROCEDURAL_ROWS || col >= BRICK_COLS {
        return false;
    }
    let seed = level as f64 * 7.31;
    let mirrored = col.min(BRICK_COLS - 1 - col) as f64;
    let x = (seed + mirrored * 12.9898 + row as f64 * 78.233).sin() * 43_758.545_3;
    let value = x - x.floor();
    value > PROCEDURAL_DENSITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field(layout: impl Fn(usize, usize) -> Option<BrickKind>) -> BrickField {
        BrickField::from_layout(1, layout)
    }

    #[test]
    fn test_level_one_is_three_full_rows() {
        let mut rng = Pcg32::seed_from_u64(1);
        let field = BrickField::build(1, &mut rng);
        for brick in field.iter() {
            assert_eq!(brick.alive, brick.row < 3, "cell ({}, {})", brick.col, brick.row);
            if brick.alive {
                assert_eq!(brick.kind, BrickKind::Normal);
            }
        }
        assert_eq!(field.live_count(), BRICK_COLS * 3);
    }

    #[test]
    fn test_every_curated_level_has_bricks() {
        for level in 1..=NUM_CURATED_PATTERNS {
            let shape = silhouette(level);
            assert!(shape.iter().flatten().any(|&a| a), "level {} empty", level);
        }
    }

    #[test]
    fn test_steel_hp_scales_with_level() {
        assert_eq!(hit_points(BrickKind::Steel, 2), 2);
        assert_eq!(hit_points(BrickKind::Steel, 5), 3);
        assert_eq!(hit_points(BrickKind::Steel, 12), 4);
        assert_eq!(hit_points(BrickKind::Explosive, 12), 1);
    }

    #[test]
    fn test_kind_draw_respects_level_gates() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            assert_eq!(draw_kind(1, &mut rng), BrickKind::Normal);
            let k = draw_kind(2, &mut rng);
            assert!(matches!(k, BrickKind::Normal | BrickKind::Steel));
            let k = draw_kind(3, &mut rng);
            assert_ne!(k, BrickKind::Moving);
        }
    }

    #[test]
    fn test_procedural_is_mirrored_and_top_only() {
        for level in [11, 12, 37, 250] {
            for col in 0..BRICK_COLS {
                for row in 0..BRICK_ROWS {
                    let a = pattern_alive(level, col, row);
                    assert_eq!(a, pattern_alive(level, BRICK_COLS - 1 - col, row));
                    if row >= PROCEDURAL_ROWS {
                        assert!(!a);
                    }
                }
            }
        }
    }

    #[test]
    fn test_rebuild_keeps_silhouette() {
        let mut rng_a = Pcg32::seed_from_u64(1);
        let mut rng_b = Pcg32::seed_from_u64(99);
        let a = BrickField::build(23, &mut rng_a);
        let b = BrickField::build(23, &mut rng_b);
        assert_eq!(a.alive_mask(), b.alive_mask());
    }

    #[test]
    fn test_steel_takes_two_hits() {
        let mut field = field(|c, r| (c == 0 && r == 0).then_some(BrickKind::Steel));
        assert_eq!(field.apply_hit(0, 0), Some(HitOutcome::Damaged { hp: 1 }));
        assert!(field.get(0, 0).is_some_and(|b| b.alive));
        assert_eq!(field.live_count(), 1);
        assert_eq!(
            field.apply_hit(0, 0),
            Some(HitOutcome::Destroyed { victims: vec![(0, 0)] })
        );
        assert_eq!(field.live_count(), 0);
        assert_eq!(field.apply_hit(0, 0), None);
        assert_eq!(field.get(0, 0).map(|b| b.hp), Some(0));
    }

    #[test]
    fn test_explosion_clears_neighborhood_without_chaining() {
        // Explosive at (3, 3); another explosive at (4, 4) inside the blast,
        // a normal brick at (5, 5) just outside it.
        let mut field = field(|c, r| match (c, r) {
            (3, 3) | (4, 4) => Some(BrickKind::Explosive),
            (2..=5, 2..=5) => Some(BrickKind::Steel),
            _ => None,
        });
        let before = field.live_count();
        let Some(HitOutcome::Destroyed { victims }) = field.apply_hit(3, 3) else {
            panic!("explosive should break in one hit");
        };
        assert_eq!(victims.len(), 9);
        assert_eq!(victims[0], (3, 3));
        assert_eq!(field.live_count(), before - 9);
        assert!(field.get(5, 5).is_some_and(|b| b.is_live()));
        assert!(field.get(5, 4).is_some_and(|b| b.is_live()));
    }

    #[test]
    fn test_explosion_clamped_at_corner() {
        let mut field = field(|c, r| match (c, r) {
            (0, 0) => Some(BrickKind::Explosive),
            (0..=1, 0..=1) => Some(BrickKind::Normal),
            _ => None,
        });
        let Some(HitOutcome::Destroyed { victims }) = field.apply_hit(0, 0) else {
            panic!("expected destroy");
        };
        assert_eq!(victims.len(), 4);
        assert_eq!(field.live_count(), 0);
    }

    #[test]
    fn test_moving_bricks_bounce_off_walls() {
        let mut field = field(|c, r| (c == BRICK_COLS - 1 && r == 0).then_some(BrickKind::Moving));
        let start_x = field.get(BRICK_COLS - 1, 0).map(|b| b.rect().x).unwrap_or_default();
        for _ in 0..200 {
            field.advance_moving();
            let rect = field.get(BRICK_COLS - 1, 0).map(|b| b.rect()).unwrap();
            assert!(rect.x >= 0.0 && rect.right() <= FIELD_WIDTH);
        }
        let brick = field.get(BRICK_COLS - 1, 0).unwrap();
        assert!(brick.vx < 0.0);
        assert!(brick.rect().x < start_x + 200.0);
    }

    #[test]
    fn test_static_bricks_stay_on_grid() {
        let mut field = field(|c, r| (c == 2 && r == 1).then_some(BrickKind::Normal));
        field.advance_moving();
        let rect = field.get(2, 1).unwrap().rect();
        assert_eq!(rect.x, slot_x(2));
        assert_eq!(rect.y, slot_y(1));
    }

    proptest! {
        #[test]
        fn prop_pattern_is_pure(
            level in 1u32..5000,
            col in 0usize..BRICK_COLS,
            row in 0usize..BRICK_ROWS,
        ) {
            prop_assert_eq!(pattern_alive(level, col, row), pattern_alive(level, col, row));
            prop_assert_eq!(silhouette(level), silhouette(level));
        }
    }
}
