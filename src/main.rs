//! Brickfall entry point
//!
//! Native builds run a headless autoplay session: the paddle tracks the
//! lowest ball, events are logged and the final snapshot is dumped as JSON.
//! Usage: `brickfall [frames] [store.json]`

#[cfg(not(target_arch = "wasm32"))]
use brickfall::{
    Session,
    consts::FRAME_MS,
    persistence::{JsonFileStore, KeyValueStore, MemoryStore},
    platform::ManualClock,
    sim::{GameEvent, RunMode},
};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brickfall (native, headless) starting...");

    let mut args = std::env::args().skip(1);
    let frames = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(60 * 120);

    match args.next() {
        Some(path) => match JsonFileStore::open(&path) {
            Ok(store) => autoplay(store, frames),
            Err(e) => {
                log::warn!("Cannot open {}: {}, using memory store", path, e);
                autoplay(MemoryStore::new(), frames);
            }
        },
        None => autoplay(MemoryStore::new(), frames),
    }
}

#[cfg(not(target_arch = "wasm32"))]
/// Play until the run ends or the frame budget runs out
fn autoplay<S: KeyValueStore>(store: S, frames: u64) {
    let clock = ManualClock::new(0.0);
    let mut session = Session::new(store, &clock, 0);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    session.start(seed);

    for _ in 0..frames {
        if session.state().ball_on_paddle() {
            session.launch();
        }

        // Track the free ball closest to the paddle
        let target = session
            .state()
            .balls
            .iter()
            .filter(|b| !b.anchored && b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|b| b.pos.x);
        if let Some(x) = target {
            session.set_paddle_absolute(x);
        }

        clock.advance(FRAME_MS);
        session.tick();

        let events = session.drain_events();
        for event in &events {
            match event {
                GameEvent::LevelUp { .. }
                | GameEvent::LifeLost { .. }
                | GameEvent::GameOver { .. }
                | GameEvent::Victory { .. }
                | GameEvent::NewHighScore(_) => log::info!("{:?}", event),
                _ => log::trace!("{:?}", event),
            }
        }
        for cue in session.sound_cues(&events) {
            log::trace!("cue {:?}", cue);
        }

        if matches!(session.state().mode, RunMode::GameOver | RunMode::Victory) {
            break;
        }
    }

    let state = session.state();
    log::info!(
        "Finished after {} frames: level {}, score {}, best {}",
        state.frame,
        state.level,
        state.score,
        session.high_score().best
    );
    match serde_json::to_string(&session.snapshot()) {
        Ok(json) => log::debug!("Final snapshot: {}", json),
        Err(e) => log::warn!("Snapshot serialization failed: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `brickfall::Session` directly, this is just to satisfy the compiler
}
