//! Presentation contract
//!
//! The simulation never draws. Each frame it hands a [`Frame`] of plain
//! sprite geometry to whatever [`Renderer`] the host provides.

pub mod frame;
pub mod sprite;

pub use frame::{Frame, LogRenderer, Renderer};
pub use sprite::{BallSprite, Sprite};
