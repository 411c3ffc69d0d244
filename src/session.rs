//! Driver-facing game session
//!
//! Owns the simulation together with its clock, storage and audio cue
//! mapping. A host (browser shell, native window, headless runner) forwards
//! input as commands, calls `tick` once per rendered frame and drains events.

use crate::audio::{AudioCues, SoundEffect};
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::platform::Clock;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, PaddleDirection, Snapshot, StartConfig, tick};

pub struct Session<S: KeyValueStore, C: Clock> {
    state: GameState,
    store: S,
    clock: C,
    settings: Settings,
    high_score: HighScore,
    audio: AudioCues,
    events: Vec<GameEvent>,
}

impl<S: KeyValueStore, C: Clock> Session<S, C> {
    /// Load preferences and best score, show level 1 waiting for `start`
    pub fn new(store: S, clock: C, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let high_score = HighScore::load(&store);

        let mut state = GameState::new(seed);
        state.high_score = high_score.best;
        state.set_muted(settings.muted);

        Self {
            state,
            store,
            clock,
            audio: AudioCues::new(settings.muted),
            settings,
            high_score,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> HighScore {
        self.high_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Start a run from the saved start defaults
    pub fn start(&mut self, seed: u64) {
        let config = self.settings.start_config(seed);
        self.start_with(&config);
    }

    pub fn start_with(&mut self, config: &StartConfig) {
        self.events.clear();
        self.state.start(config);
        self.collect_events();
    }

    /// Advance one frame using the session clock
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        tick(&mut self.state, now);
        self.collect_events();
    }

    /// Events produced since the last drain, in emission order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.collect_events();
        std::mem::take(&mut self.events)
    }

    /// Sound effects for a batch of drained events (empty when muted)
    pub fn sound_cues(&self, events: &[GameEvent]) -> Vec<SoundEffect> {
        self.audio.cues_for(events)
    }

    pub fn pause(&mut self) -> bool {
        self.state.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.state.resume()
    }

    pub fn launch(&mut self) -> bool {
        let launched = self.state.launch();
        self.collect_events();
        launched
    }

    pub fn set_paddle_direction(&mut self, direction: PaddleDirection) {
        self.state.set_paddle_direction(direction);
    }

    pub fn set_paddle_absolute(&mut self, x: f32) {
        self.state.set_paddle_absolute(x);
    }

    pub fn set_paddle_relative(&mut self, dx: f32) {
        self.state.set_paddle_relative(dx);
    }

    /// Toggle sound; persisted immediately
    pub fn set_muted(&mut self, muted: bool) {
        self.state.set_muted(muted);
        self.audio.set_muted(muted);
        if self.settings.muted != muted {
            self.settings.muted = muted;
            self.save_settings();
        }
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.state.set_lives(lives);
        self.settings.start.lives = self.state.lives;
        self.save_settings();
    }

    pub fn set_level(&mut self, level: u32) {
        self.state.set_level(level);
        self.settings.start.level = self.state.level;
        self.save_settings();
    }

    pub fn set_ball_speed(&mut self, speed: f32) {
        self.state.set_ball_speed(speed);
        self.settings.start.ball_speed = self.state.ball_speed;
        self.save_settings();
    }

    pub fn set_paddle_speed(&mut self, speed: f32) {
        self.state.set_paddle_speed(speed);
        self.settings.start.paddle_speed = self.state.paddle.max_speed;
        self.save_settings();
    }

    /// Move events out of the simulation, persisting a new best score
    fn collect_events(&mut self) {
        for event in self.state.drain_events() {
            if let GameEvent::NewHighScore(score) = event {
                if self.high_score.submit(score, self.state.level) {
                    if let Err(e) = self.high_score.save(&mut self.store) {
                        log::warn!("Failed to save high score: {}", e);
                    }
                }
            }
            self.events.push(event);
        }
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.settings.save(&mut self.store) {
            log::warn!("Failed to save settings: {}", e);
        }
    }
}
