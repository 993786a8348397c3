//! Quiz Ball - a bouncing ball that walks the user through a quiz
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, world, ball physics, driver)
//! - `renderer`: Render snapshots handed to the presentation layer
//! - `settings`: Driver and debug-render settings
//! - `web`: wasm-bindgen facade for the browser build

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{Result, SimError};
pub use settings::{BallRenderMode, Settings};

/// Simulation configuration constants
pub mod consts {
    /// Default tick rate of the frame driver
    pub const TARGET_FPS: u32 = 100;
    /// Fixed simulation timestep at the default tick rate
    pub const SIM_DT: f32 = 1.0 / TARGET_FPS as f32;
    /// Maximum ticks per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Ticks run by the fast-forward debug control
    pub const FAST_FORWARD_TICKS: u32 = 10;

    /// Ball defaults
    pub const DEFAULT_GRAVITY: f32 = 2000.0;
    pub const DEFAULT_TERMINAL_VELOCITY: f32 = 1000.0;
    pub const DEFAULT_BOUNCE_VELOCITY: f32 = -900.0;
    pub const BALL_BOUNDING_SIZE: f32 = 20.0;
    pub const BALL_RENDER_SIZE: f32 = 48.0;
    pub const BALL_START_POS: (f32, f32) = (50.0, 50.0);
    pub const BALL_COLOR: &str = "#fad300";

    /// Speed (units/s) below which the ball is drawn unstretched
    pub const STRETCH_START_SPEED: f32 = 400.0;
    pub const STRETCH_MAX_HEIGHT: f32 = 1.5;
    pub const STRETCH_MIN_WIDTH: f32 = 0.9;
    /// Visual slack allowed when the stretch reaches toward a surface
    pub const STRETCH_FUDGE: f32 = 12.0;
    /// Share of downward velocity banked on impact
    pub const SQUASH_ENERGY_FRACTION: f32 = 0.95;

    /// Launch solver
    pub const LAUNCH_VELOCITY: f32 = -800.0;
    pub const LAUNCH_SOLVER_DT: f32 = 1.0 / 60.0;
    pub const LAUNCH_SOLVER_MAX_STEPS: u32 = 100_000;

    /// Scripted ball nudges
    pub const ACTIVATE_VELOCITY: f32 = 900.0;
    pub const HURRY_VELOCITY: f32 = 800.0;

    /// Final platform celebration
    pub const FINAL_TRIGGER_DISTANCE: f32 = 500.0;
    pub const CELEBRATION_DELAY: f32 = 1.0;
    pub const CELEBRATION_BALLS: usize = 10;
    pub const CELEBRATION_RIGHT_EDGE: f32 = 900.0;
    pub const CELEBRATION_DROP_HEIGHT: f32 = 1200.0;
    pub const CELEBRATION_DROP_SPREAD: f32 = 2000.0;
    pub const CELEBRATION_BOUNCE_BOOST: f32 = 1.3;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map `value` from `[min1, max1]` onto `[min2, max2]` (unclamped)
#[inline]
pub fn map_range(value: f32, min1: f32, max1: f32, min2: f32, max2: f32) -> f32 {
    (value - min1) / (max1 - min1) * (max2 - min2) + min2
}
