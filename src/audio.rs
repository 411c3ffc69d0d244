//! Sound cues derived from game events
//!
//! Procedurally generated tones - no external files needed. This module only
//! describes what to play; an outer layer owns the actual audio device.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits brick (broken or not)
    BrickHit,
    /// Ball hits wall or ceiling
    WallHit,
    /// Last ball lost
    LifeLoss,
    /// Final level cleared
    Win,
    GameOver,
    LevelUp,
}

/// A single oscillator note with an exponential fade-out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// Frequency in Hz
    pub freq: f32,
    pub waveform: Waveform,
    /// Seconds until the gain has decayed
    pub duration: f32,
    /// Starting gain (0.0 - 1.0)
    pub volume: f32,
    /// Offset from the moment the cue fires
    pub delay_ms: u32,
}

const fn tone(freq: f32, waveform: Waveform, duration: f32, volume: f32, delay_ms: u32) -> Tone {
    Tone {
        freq,
        waveform,
        duration,
        volume,
        delay_ms,
    }
}

impl SoundEffect {
    /// Map an event to its effect, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::WallHit => Some(SoundEffect::WallHit),
            GameEvent::BrickHit { .. } => Some(SoundEffect::BrickHit),
            GameEvent::LifeLost { .. } => Some(SoundEffect::LifeLoss),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::Victory { .. } => Some(SoundEffect::Win),
            _ => None,
        }
    }

    /// Notes making up this effect
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::PaddleHit => PADDLE_HIT,
            SoundEffect::BrickHit => BRICK_HIT,
            SoundEffect::WallHit => WALL_HIT,
            SoundEffect::LifeLoss => LIFE_LOSS,
            SoundEffect::Win => WIN,
            SoundEffect::GameOver => GAME_OVER,
            SoundEffect::LevelUp => LEVEL_UP,
        }
    }
}

// A4
const PADDLE_HIT: &[Tone] = &[tone(440.0, Waveform::Square, 0.1, 0.1, 0)];
// A5
const BRICK_HIT: &[Tone] = &[tone(880.0, Waveform::Sine, 0.1, 0.1, 0)];
// A3
const WALL_HIT: &[Tone] = &[tone(220.0, Waveform::Triangle, 0.1, 0.1, 0)];

const LIFE_LOSS: &[Tone] = &[
    tone(110.0, Waveform::Sawtooth, 0.5, 0.2, 0),
    tone(55.0, Waveform::Sawtooth, 0.5, 0.2, 200),
];

// C major arpeggio
const WIN: &[Tone] = &[
    tone(523.25, Waveform::Square, 0.1, 0.1, 0),
    tone(659.25, Waveform::Square, 0.1, 0.1, 100),
    tone(783.99, Waveform::Square, 0.2, 0.1, 200),
    tone(1046.50, Waveform::Square, 0.4, 0.1, 300),
];

const GAME_OVER: &[Tone] = &[
    tone(300.0, Waveform::Sawtooth, 0.3, 0.2, 0),
    tone(200.0, Waveform::Sawtooth, 0.3, 0.2, 200),
    tone(100.0, Waveform::Sawtooth, 0.5, 0.2, 400),
];

const LEVEL_UP: &[Tone] = &[
    tone(440.0, Waveform::Sine, 0.2, 0.1, 0),
    tone(880.0, Waveform::Sine, 0.4, 0.1, 200),
];

/// Turns drained events into sound cues, honoring mute
#[derive(Debug, Clone, Default)]
pub struct AudioCues {
    muted: bool,
}

impl AudioCues {
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Effects to play for a batch of events, in event order
    pub fn cues_for(&self, events: &[GameEvent]) -> Vec<SoundEffect> {
        if self.muted {
            return Vec::new();
        }
        events.iter().filter_map(SoundEffect::for_event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BrickKind, PowerUpKind};

    #[test]
    fn test_event_mapping() {
        let events = [
            GameEvent::PaddleHit,
            GameEvent::PowerUpCollected(PowerUpKind::FireBall),
            GameEvent::BrickHit {
                destroyed: false,
                kind: BrickKind::Steel,
            },
            GameEvent::WallHit,
            GameEvent::LevelUp { level: 2 },
        ];
        let cues = AudioCues::new(false).cues_for(&events);
        assert_eq!(
            cues,
            vec![
                SoundEffect::PaddleHit,
                SoundEffect::BrickHit,
                SoundEffect::WallHit,
                SoundEffect::LevelUp,
            ]
        );
    }

    #[test]
    fn test_muted_yields_nothing() {
        let mut cues = AudioCues::default();
        cues.set_muted(true);
        assert!(cues.is_muted());
        assert!(cues.cues_for(&[GameEvent::PaddleHit]).is_empty());
    }

    #[test]
    fn test_sequences_are_ordered_by_delay() {
        for effect in [
            SoundEffect::LifeLoss,
            SoundEffect::Win,
            SoundEffect::GameOver,
            SoundEffect::LevelUp,
        ] {
            let tones = effect.tones();
            assert!(tones.len() > 1);
            assert!(tones.windows(2).all(|w| w[0].delay_ms < w[1].delay_ms));
        }
        assert_eq!(SoundEffect::Win.tones()[3].freq, 1046.50);
    }

    #[test]
    fn test_tone_tables_outlive_lookup() {
        let tables: Vec<&'static [Tone]> = [
            SoundEffect::PaddleHit,
            SoundEffect::BrickHit,
            SoundEffect::WallHit,
        ]
        .into_iter()
        .map(SoundEffect::tones)
        .collect();
        let pitches: Vec<f32> = tables.iter().map(|t| t[0].freq).collect();
        assert_eq!(pitches, vec![440.0, 880.0, 220.0]);
        assert_eq!(tables[0][0].waveform, Waveform::Square);
        assert_eq!(tables[2][0].waveform, Waveform::Triangle);
    }
}
