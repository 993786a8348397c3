//! Fixed timestep frame driver
//!
//! Runs world steps at `1 / target_fps` either from wall-clock time
//! (`advance`) or on demand for debugging (`step_frame`).

use serde::{Deserialize, Serialize};

use super::scene::{QuizScene, SceneConfig};
use super::world::{SimEvent, World};
use crate::consts::FAST_FORWARD_TICKS;
use crate::error::Result;
use crate::renderer::{Frame, Renderer};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Playing,
    Paused,
}

/// Debug controls (Ctrl+Alt+P, Ctrl+Alt+ArrowRight, with Shift for fast-forward)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    TogglePause,
    Step,
    FastForward,
}

impl DebugCommand {
    /// Map a keyboard event (DOM `code` plus modifiers) to a command
    pub fn from_key(code: &str, ctrl: bool, alt: bool, shift: bool) -> Option<Self> {
        if !(ctrl && alt) {
            return None;
        }
        match code {
            "KeyP" => Some(DebugCommand::TogglePause),
            "ArrowRight" | "PageDown" if shift => Some(DebugCommand::FastForward),
            "ArrowRight" | "PageDown" => Some(DebugCommand::Step),
            _ => None,
        }
    }
}

/// Owns the world and decides when it steps
#[derive(Debug, Clone)]
pub struct Simulation {
    pub world: World,
    settings: Settings,
    state: RunState,
    step_count: u64,
    accumulator: f32,
}

impl Simulation {
    pub fn new(mut world: World, settings: Settings) -> Self {
        world.camera.viewport_height = settings.viewport_height;
        Self {
            world,
            settings,
            state: RunState::Playing,
            step_count: 0,
            accumulator: 0.0,
        }
    }

    /// Fresh world seeded from `settings`, populated with the quiz
    pub fn with_scene(settings: Settings, config: &SceneConfig) -> Result<(Self, QuizScene)> {
        let mut world = World::new(settings.seed);
        let scene = QuizScene::build(&mut world, config)?;
        Ok((Self::new(world, settings), scene))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn dt(&self) -> f32 {
        self.settings.dt()
    }

    /// One world step
    pub fn tick(&mut self) -> Result<()> {
        self.world.step(self.dt())?;
        self.step_count += 1;
        Ok(())
    }

    /// `count` ticks right now, paused or not
    pub fn step_frame(&mut self, count: u32) -> Result<()> {
        for _ in 0..count {
            self.tick()?;
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state != RunState::Paused {
            log::info!("Paused at step {}", self.step_count);
        }
        self.state = RunState::Paused;
    }

    pub fn resume(&mut self) {
        if self.state != RunState::Playing {
            log::info!("Resumed at step {}", self.step_count);
        }
        self.state = RunState::Playing;
        // Don't replay time spent paused
        self.accumulator = 0.0;
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            RunState::Playing => self.pause(),
            RunState::Paused => self.resume(),
        }
    }

    /// Run the ticks owed for `elapsed` seconds of wall time; returns how many ran
    pub fn advance(&mut self, elapsed: f32) -> Result<u32> {
        if self.is_paused() {
            return Ok(0);
        }

        let dt = self.dt();
        // A NaN delta would poison the accumulator for good
        let elapsed = if elapsed.is_finite() { elapsed.clamp(0.0, 0.1) } else { 0.0 };
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < self.settings.max_substeps {
            self.tick()?;
            self.accumulator -= dt;
            substeps += 1;
        }
        // Late ticks are dropped, not replayed
        if substeps == self.settings.max_substeps {
            self.accumulator = self.accumulator.min(dt);
        }
        Ok(substeps)
    }

    pub fn handle_command(&mut self, command: DebugCommand) -> Result<()> {
        match command {
            DebugCommand::TogglePause => self.toggle_pause(),
            DebugCommand::Step => self.step_frame(1)?,
            DebugCommand::FastForward => self.step_frame(FAST_FORWARD_TICKS)?,
        }
        Ok(())
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.drain_events()
    }

    pub fn frame(&self) -> Frame {
        Frame::capture(&self.world, self.step_count, &self.settings)
    }

    pub fn render(&self, renderer: &mut impl Renderer) {
        renderer.draw(&self.frame());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::renderer::LogRenderer;
    use crate::sim::entity::Entity;

    fn falling_ball() -> Simulation {
        let mut world = World::new(0);
        let ball = Entity::ball(&mut world.names, None).unwrap();
        world.push(ball);
        Simulation::new(world, Settings::default())
    }

    fn ball_y(sim: &Simulation) -> f32 {
        sim.world.iter().next().unwrap().1.rect().y
    }

    #[test]
    fn test_advance_runs_owed_ticks() {
        let mut sim = falling_ball();
        assert_eq!(sim.advance(0.035).unwrap(), 3);
        assert_eq!(sim.step_count(), 3);
        // Leftover 5ms carries into the next call
        assert_eq!(sim.advance(0.006).unwrap(), 1);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut sim = falling_ball();
        assert_eq!(sim.advance(5.0).unwrap(), MAX_SUBSTEPS);
    }

    #[test]
    fn test_advance_ignores_non_finite_elapsed() {
        let mut sim = falling_ball();
        assert_eq!(sim.advance(f32::NAN).unwrap(), 0);
        assert_eq!(sim.advance(f32::INFINITY).unwrap(), 0);
        assert_eq!(sim.advance(f32::NEG_INFINITY).unwrap(), 0);

        let ticks: u32 = (0..100).map(|_| sim.advance(0.016).unwrap()).sum();
        assert!((158..=160).contains(&ticks), "ran {ticks} ticks");
    }

    #[test]
    fn test_slow_frames_drop_backlog() {
        let mut sim = falling_ball();
        for _ in 0..500 {
            assert_eq!(sim.advance(0.1).unwrap(), MAX_SUBSTEPS);
        }
        assert!(sim.accumulator <= sim.dt());

        // One second of 60 fps frames runs about one second of ticks
        let ticks: u32 = (0..60).map(|_| sim.advance(1.0 / 60.0).unwrap()).sum();
        assert!((99..=101).contains(&ticks), "ran {ticks} ticks");

        // Alternating slow and normal frames never builds up a backlog
        for _ in 0..50 {
            sim.advance(0.1).unwrap();
            assert!(sim.advance(1.0 / 60.0).unwrap() <= 2);
        }
    }

    #[test]
    fn test_pause_freezes_advance_but_not_step() {
        let mut sim = falling_ball();
        assert_eq!(sim.advance(0.055).unwrap(), 5);
        let y = ball_y(&sim);

        sim.handle_command(DebugCommand::TogglePause).unwrap();
        assert!(sim.is_paused());
        assert_eq!(sim.advance(0.05).unwrap(), 0);
        assert_eq!(ball_y(&sim), y);

        sim.handle_command(DebugCommand::Step).unwrap();
        assert_eq!(sim.step_count(), 6);
        sim.handle_command(DebugCommand::FastForward).unwrap();
        assert_eq!(sim.step_count(), 6 + FAST_FORWARD_TICKS as u64);
        assert!(sim.is_paused());

        sim.toggle_pause();
        assert_eq!(sim.state(), RunState::Playing);
        assert!(sim.advance(0.02).unwrap() > 0);
    }

    #[test]
    fn test_debug_keys() {
        assert_eq!(
            DebugCommand::from_key("KeyP", true, true, false),
            Some(DebugCommand::TogglePause)
        );
        assert_eq!(
            DebugCommand::from_key("ArrowRight", true, true, true),
            Some(DebugCommand::FastForward)
        );
        assert_eq!(
            DebugCommand::from_key("PageDown", true, true, false),
            Some(DebugCommand::Step)
        );
        assert_eq!(DebugCommand::from_key("KeyP", true, false, false), None);
        assert_eq!(DebugCommand::from_key("KeyQ", true, true, false), None);
    }

    #[test]
    fn test_step_frame_matches_world_time() {
        let mut sim = falling_ball();
        sim.step_frame(50).unwrap();
        assert!((sim.world.time() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_celebration_delay_waits_while_paused() {
        let config = SceneConfig {
            start: crate::sim::scene::StartMode::FinalPlatform,
            ..SceneConfig::default()
        };
        let (mut sim, _) = Simulation::with_scene(Settings::default(), &config).unwrap();

        let mut scheduled = false;
        for _ in 0..1000 {
            sim.tick().unwrap();
            if sim
                .drain_events()
                .iter()
                .any(|e| matches!(e, SimEvent::CelebrationScheduled { .. }))
            {
                scheduled = true;
                break;
            }
        }
        assert!(scheduled);

        let count = sim.world.len();
        sim.pause();
        for _ in 0..300 {
            sim.advance(0.016).unwrap();
        }
        assert_eq!(sim.world.len(), count);

        sim.resume();
        sim.step_frame((CELEBRATION_DELAY / SIM_DT) as u32 + 2).unwrap();
        assert_eq!(sim.world.len(), count + CELEBRATION_BALLS);
    }

    #[test]
    fn test_render_hands_frame_to_renderer() {
        let (mut sim, scene) = Simulation::with_scene(Settings::default(), &SceneConfig::default()).unwrap();
        sim.step_frame(3).unwrap();
        let frame = sim.frame();
        assert_eq!(frame.step_count, 3);
        assert_eq!(frame.sprites.len(), sim.world.len());
        assert!(frame.sprite(sim.world.get(scene.ball()).unwrap().name()).is_some());

        let mut renderer = LogRenderer::new(1);
        sim.render(&mut renderer);
        assert_eq!(renderer.drawn(), 1);
    }
}
