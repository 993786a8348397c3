//! Browser facade
//!
//! The page owns the DOM and the animation loop. It feeds elapsed time and
//! input in, and reads frames and events back out as JSON.

use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{DebugCommand, QuizScene, SceneConfig, Simulation};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Quiz Ball starting...");
}

#[wasm_bindgen]
pub struct WebSimulation {
    sim: Simulation,
    scene: QuizScene,
}

#[wasm_bindgen]
impl WebSimulation {
    /// Build the quiz from optional scene JSON; settings come from LocalStorage
    #[wasm_bindgen(constructor)]
    pub fn new(scene_json: Option<String>) -> Result<WebSimulation, JsError> {
        let config = match scene_json {
            Some(json) => SceneConfig::from_json(&json)?,
            None => SceneConfig::default(),
        };
        let (sim, scene) = Simulation::with_scene(Settings::load(), &config)?;
        Ok(Self { sim, scene })
    }

    /// Seconds of wall time since the previous call; returns ticks run
    pub fn advance(&mut self, elapsed: f32) -> Result<u32, JsError> {
        Ok(self.sim.advance(elapsed)?)
    }

    pub fn step_frame(&mut self, count: u32) -> Result<(), JsError> {
        Ok(self.sim.step_frame(count)?)
    }

    /// Handle a keydown; true if it was a debug control
    pub fn key_down(&mut self, code: &str, ctrl: bool, alt: bool, shift: bool) -> Result<bool, JsError> {
        let Some(command) = DebugCommand::from_key(code, ctrl, alt, shift) else {
            return Ok(false);
        };
        self.sim.handle_command(command)?;
        Ok(true)
    }

    pub fn toggle_pause(&mut self) {
        self.sim.toggle_pause();
    }

    pub fn is_paused(&self) -> bool {
        self.sim.is_paused()
    }

    pub fn focus_prompt(&mut self, index: usize) -> Result<(), JsError> {
        Ok(self.scene.focus_prompt(&mut self.sim.world, index)?)
    }

    pub fn submit_prompt(&mut self, index: usize) -> Result<bool, JsError> {
        Ok(self.scene.submit_prompt(&mut self.sim.world, index)?)
    }

    /// Prompt index for an entity name from a `prompt_focused` event
    pub fn prompt_index(&self, name: &str) -> Option<usize> {
        self.scene.prompt_index(&self.sim.world, name)
    }

    pub fn frame_json(&self) -> Result<String, JsError> {
        Ok(self.sim.frame().to_json()?)
    }

    pub fn drain_events_json(&mut self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.sim.drain_events())?)
    }
}
