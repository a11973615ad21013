//! Walkabout entry point
//!
//! Builds the courtyard and walks the body around it with a seeded wander
//! script, logging what the controller does.
//!
//! Usage: `walkabout [config.json] [frames]`

use std::process::ExitCode;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use walkabout::consts::FRAME_MS;
use walkabout::sim::AnimationSink;
use walkabout::{Control, ControllerConfig, Scene, Session};

const DEFAULT_FRAMES: u32 = 1800;
const WANDER_SEED: u64 = 0x5741_4c4b;
/// Frames between wander decisions
const DECISION_INTERVAL: u32 = 45;
const JUMP_CHANCE: f64 = 0.15;
/// Log the body state every this many frames
const REPORT_INTERVAL: u32 = 120;

/// Idle wandering: pick a heading change and a gait, hold them for a while
struct Wander {
    rng: Pcg32,
    held: Vec<Control>,
}

impl Wander {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            held: Vec::new(),
        }
    }

    fn decide(&mut self, session: &mut Session) {
        for control in self.held.drain(..) {
            session.release(control);
        }

        let gait = match self.rng.random_range(0..10) {
            0..=6 => Some(Control::Forward),
            7 => Some(Control::Backward),
            _ => None,
        };
        let turn = match self.rng.random_range(0..3) {
            0 => Some(Control::Left),
            1 => Some(Control::Right),
            _ => None,
        };
        for control in [gait, turn].into_iter().flatten() {
            session.press(control);
            self.held.push(control);
        }

        if self.rng.random_bool(JUMP_CHANCE) {
            session.press(Control::Jump);
        }
    }
}

/// Logs walk clip transitions instead of driving a skeleton
#[derive(Default)]
struct LoggingAnimator {
    walking: Option<bool>,
}

impl AnimationSink for LoggingAnimator {
    fn set_speed_ratio(&mut self, ratio: f32) {
        let walking = ratio != 0.0;
        if self.walking != Some(walking) {
            let clip = if walking { "playing" } else { "idle" };
            log::debug!("Walk clip {clip} (ratio {ratio:.2})");
            self.walking = Some(walking);
        }
    }
}

fn load_config(path: Option<&str>) -> Result<ControllerConfig, walkabout::ConfigError> {
    match path {
        Some(path) => ControllerConfig::load(path),
        None => Ok(ControllerConfig::default()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Walkabout (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match load_config(args.first().map(String::as_str)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let frames = match args.get(1).map(|s| s.parse::<u32>()) {
        None => DEFAULT_FRAMES,
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::error!("Invalid frame count {:?}: {e}", args[1]);
            return ExitCode::FAILURE;
        }
    };

    let mut scene = Scene::new();
    walkabout::world::build_courtyard(&mut scene);

    let mut session = Session::new(config);
    let mut wander = Wander::new(WANDER_SEED);
    let mut animator = LoggingAnimator::default();

    for frame in 0..frames {
        if frame % DECISION_INTERVAL == 0 {
            wander.decide(&mut session);
        }

        let time_ms = f64::from(frame) * FRAME_MS;
        session.frame(time_ms, &mut scene, &mut animator);

        if frame % REPORT_INTERVAL == 0 {
            report(frame, &session, &scene);
        }
    }

    log::info!("Finished {frames} frames");
    report(frames, &session, &scene);
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() -> ExitCode {
    // No host loop on wasm; embedders drive `Session::frame` directly
    ExitCode::SUCCESS
}

fn report(frame: u32, session: &Session, scene: &Scene) {
    let controller = session.controller();
    let position = controller.body().position();
    let state = controller.state();
    let faded: Vec<&str> = session
        .probe()
        .faded()
        .filter_map(|id| scene.get(id))
        .map(|e| e.label.as_str())
        .collect();

    log::info!(
        "frame {frame}: pos=({:.2}, {:.2}, {:.2}) yaw={:.2} \
         forward={:.3} vertical={:.3} grounded={} faded={faded:?}",
        position.x,
        position.y,
        position.z,
        controller.body().transform.yaw,
        state.forward_speed,
        state.vertical_speed,
        state.on_ground,
    );
}
