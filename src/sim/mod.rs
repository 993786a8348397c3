//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, by entity ID)
//! - No drawing or platform dependencies

pub mod ball;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod names;
pub mod platform;
pub mod scene;
pub mod tick;
pub mod world;

pub use ball::{Ball, BallRender, time_to_target_y};
pub use entity::{Body, Entity, EntityId, EntityKind, EntityTag, Renderable, Steppable};
pub use geometry::{Point, Rect, Vector};
pub use names::NameAllocator;
pub use platform::{FinalPlatform, InputPlatform, Platform, spawn_celebration};
pub use scene::{MAIN_BALL_NAME, PromptConfig, QuizScene, SceneConfig, StartMode};
pub use tick::{DebugCommand, RunState, Simulation};
pub use world::{Camera, Effect, RayHit, SimEvent, StepContext, World, WorldView};
