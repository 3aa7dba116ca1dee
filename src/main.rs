//! Headless demo runner
//!
//! Picks a session by name, feeds it a scripted input through the
//! fixed-timestep accumulator loop, and logs the outcome. Useful for
//! eyeballing determinism and for profiling the tick without a renderer.

use microcade::consts::{MAX_SUBSTEPS, SIM_DT};
use microcade::games::breakout::BreakoutSession;
use microcade::games::kart::KartSession;
use microcade::games::nearpin::NearPinSession;
use microcade::games::platformer::PlatformerSession;
use microcade::games::race::{PathRace, TrackRace, WINDING_BEST_KEY};
use microcade::games::smash::SmashSession;
use microcade::games::swarm::SwarmSession;
use microcade::games::Session;
use microcade::input::{InputSnapshot, Key};
use microcade::storage::{BestTime, KvStore, MemoryStore};

const DEMO_SEED: u64 = 0xC0FFEE;
const DEMO_FRAMES: u32 = 600;

fn main() {
    env_logger::init();

    let game = std::env::args().nth(1).unwrap_or_else(|| "kart".into());
    let mut store = MemoryStore::new();

    let result = run_game(&game, &mut store);
    match result {
        Ok(summary) => log::info!("{summary}"),
        Err(err) => {
            log::error!("session failed to start: {err}");
            std::process::exit(1);
        }
    }
}

fn run_game(game: &str, store: &mut dyn KvStore) -> Result<String, microcade::SessionError> {
    let mut input = InputSnapshot::new();
    match game {
        "breakout" => {
            input.set_key(Key::Right, true);
            let mut session = BreakoutSession::new(DEMO_SEED)?;
            Ok(run(&mut session, &input))
        }
        "platformer" => {
            input.set_key(Key::Right, true);
            input.set_key(Key::Jump, true);
            let mut session = PlatformerSession::demo_level()?;
            Ok(run(&mut session, &input))
        }
        "kart" => {
            input.set_key(Key::Up, true);
            input.set_key(Key::Drift, true);
            input.set_key(Key::Right, true);
            let mut session = KartSession::new(DEMO_SEED)?;
            Ok(run(&mut session, &input))
        }
        "race" => {
            input.set_key(Key::Up, true);
            input.set_key(Key::Left, true);
            let mut session = TrackRace::new()?;
            Ok(run(&mut session, &input))
        }
        "winding" => {
            input.set_key(Key::Up, true);
            let mut best = BestTime::new(store, WINDING_BEST_KEY);
            let mut session = PathRace::new(best.load())?;
            let summary = run(&mut session, &input);
            if let Some(final_ms) = session.final_ms() {
                best.submit(final_ms)?;
            }
            Ok(summary)
        }
        "swarm" => {
            input.set_key(Key::Whistle, true);
            let mut session = SwarmSession::new(DEMO_SEED)?;
            Ok(run(&mut session, &input))
        }
        "smash" => {
            let mut session = SmashSession::new(DEMO_SEED)?;
            Ok(run(&mut session, &input))
        }
        "nearpin" => {
            input.set_key(Key::Charge, true);
            let mut session = NearPinSession::new()?;
            // Release the gauge partway through the run
            let mut released = input.clone();
            released.set_key(Key::Charge, false);
            for _ in 0..45 {
                session.tick(&input);
            }
            Ok(run(&mut session, &released))
        }
        other => Err(microcade::SessionError::DegenerateGeometry(format!(
            "unknown game '{other}' (try breakout, platformer, kart, race, winding, swarm, smash, nearpin)"
        ))),
    }
}

/// Drive a session through the fixed-timestep accumulator for the demo
/// duration, clearing one-shot inputs after each processed tick
fn run(session: &mut dyn Session, script: &InputSnapshot) -> String {
    let mut input = script.clone();
    let mut accumulator = 0.0_f32;
    for frame in 0..DEMO_FRAMES {
        // Host frame time; a real host would measure it
        accumulator += SIM_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            session.tick(&input);
            input.clear_edges();
            accumulator -= SIM_DT;
            substeps += 1;
        }
        if session.over() {
            log::debug!("terminal state after {frame} frames");
            break;
        }
        let frame_cmds = session.render();
        log::trace!("frame {frame}: {} draw commands", frame_cmds.len());
    }
    session.summary()
}
