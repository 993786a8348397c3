//! Quiz Ball entry point
//!
//! The browser build is driven from JS through `quiz_ball::web`. Natively
//! this runs the quiz headless, answering each prompt as soon as the ball
//! reaches it, and logs frames along the way.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use quiz_ball::renderer::LogRenderer;
    use quiz_ball::sim::{SceneConfig, SimEvent, Simulation, StartMode};
    use quiz_ball::{Result, Settings};

    /// Run the quiz headless, answering each prompt as the ball reaches it
    #[derive(Debug, Parser)]
    #[command(name = "quiz-ball")]
    #[command(version, about, long_about = None)]
    pub struct Options {
        /// Scene config (JSON); the built-in quiz when omitted
        #[arg(long)]
        scene: Option<PathBuf>,

        /// Settings file (JSON); defaults when omitted or missing
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Debug start: idle, initial-bounce, last-question, final-platform
        #[arg(long, value_parser = parse_start_mode)]
        start: Option<StartMode>,

        /// Stop after this many simulated seconds
        #[arg(long, default_value_t = 60.0)]
        seconds: f32,

        /// Turn on every debug overlay
        #[arg(long)]
        debug: bool,
    }

    fn parse_start_mode(s: &str) -> std::result::Result<StartMode, String> {
        StartMode::from_str(s).ok_or_else(|| format!("unknown start mode {s}"))
    }

    pub fn run(opts: Options) -> Result<()> {
        let mut settings = match &opts.settings {
            Some(path) => Settings::load_from(path)?,
            None => Settings::default(),
        };
        if opts.debug {
            settings = Settings {
                seed: settings.seed,
                ..Settings::debug()
            };
        }

        let mut config = match &opts.scene {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        if let Some(start) = opts.start {
            config.start = start;
        }

        let (mut sim, scene) = Simulation::with_scene(settings, &config)?;
        let mut renderer = LogRenderer::new(sim.settings().target_fps as u64);
        let max_ticks = (opts.seconds.max(0.0) * sim.settings().target_fps as f32) as u64;

        if config.start == StartMode::Idle {
            scene.focus_prompt(&mut sim.world, 0)?;
            scene.submit_prompt(&mut sim.world, 0)?;
        }

        let mut celebrated = false;
        while sim.step_count() < max_ticks {
            sim.tick()?;
            sim.render(&mut renderer);

            for event in sim.drain_events() {
                match event {
                    SimEvent::PromptFocused { name } => {
                        log::info!("Ball reached {name}");
                        if let Some(index) = scene.prompt_index(&sim.world, &name) {
                            scene.submit_prompt(&mut sim.world, index)?;
                        }
                    }
                    SimEvent::BallsSpawned { count } => {
                        log::info!("{count} celebration balls dropped");
                        celebrated = true;
                    }
                    SimEvent::CameraScroll { .. } => {}
                    other => log::debug!("{other:?}"),
                }
            }

            // Let the celebration play out for a couple of seconds
            if celebrated {
                sim.step_frame(2 * sim.settings().target_fps)?;
                break;
            }
        }

        let frame = sim.frame();
        log::info!(
            "Finished after {} steps ({:.2}s simulated), {} entities, camera at {:.0}",
            frame.step_count,
            frame.time,
            frame.sprites.len(),
            frame.camera.scroll_y
        );
        if !celebrated {
            log::warn!("Quiz did not reach the final platform");
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Quiz Ball (native, headless) starting...");

    let opts = headless::Options::parse();

    if let Err(e) = headless::run(opts) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is quiz_ball::web::wasm_start, this is just to satisfy the compiler
}
