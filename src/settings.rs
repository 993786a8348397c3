//! Driver and debug-render settings
//!
//! Persisted as JSON: a file on native, LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBSTEPS, TARGET_FPS};
use crate::error::Result;

/// How the ball image is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BallRenderMode {
    #[default]
    Solid,
    Outline,
}

impl BallRenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallRenderMode::Solid => "solid",
            BallRenderMode::Outline => "outline",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "solid" | "fill" => Some(BallRenderMode::Solid),
            "outline" => Some(BallRenderMode::Outline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Driver ===
    /// Ticks per simulated second
    pub target_fps: u32,
    /// Cap on ticks run by one `advance` call
    pub max_substeps: u32,
    /// Seed for the world RNG
    pub seed: u64,
    pub viewport_height: f32,

    // === Debug overlay ===
    pub show_step_count: bool,
    pub show_ball_bounding_box: bool,
    pub show_image_container: bool,
    pub ball_render_mode: BallRenderMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_fps: TARGET_FPS,
            max_substeps: MAX_SUBSTEPS,
            seed: 0,
            viewport_height: 900.0,

            show_step_count: false,
            show_ball_bounding_box: false,
            show_image_container: false,
            ball_render_mode: BallRenderMode::Solid,
        }
    }
}

impl Settings {
    /// Every overlay on, ball drawn as an outline
    pub fn debug() -> Self {
        Self {
            show_step_count: true,
            show_ball_bounding_box: true,
            show_image_container: true,
            ball_render_mode: BallRenderMode::Outline,
            ..Self::default()
        }
    }

    /// Seconds per tick
    pub fn dt(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "quiz_ball_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = self.to_json()
        {
            match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {e:?}"),
            }
        }
    }

    /// Load settings from a JSON file, defaults if it doesn't exist
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
