//! Game object model
//!
//! Every entity embeds a [`Body`] (name, rect, velocity) and carries one of
//! a closed set of kinds. Per-kind behavior is reached through the
//! [`Steppable`] and [`Renderable`] capabilities.

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geometry::{Rect, Vector};
use super::names::NameAllocator;
use super::platform::{FinalPlatform, InputPlatform, Platform};
use super::world::StepContext;
use crate::error::Result;
use crate::renderer::Sprite;

/// Stable handle to an entity (its insertion index in the world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// State shared by every entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    name: String,
    pub rect: Rect,
    pub v: Vector,
}

impl Body {
    pub fn new(name: String) -> Self {
        Self {
            name,
            rect: Rect::new(10.0, 10.0, 10.0, 10.0),
            v: Vector::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Discriminant of [`EntityKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityTag {
    Platform,
    InputPlatform,
    FinalPlatform,
    Ball,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Platform(Platform),
    InputPlatform(InputPlatform),
    FinalPlatform(FinalPlatform),
    Ball(Ball),
}

/// Per-tick behavior. Kinds without behavior keep the default no-op.
pub trait Steppable {
    fn step(&mut self, _body: &mut Body, _dt: f32, _ctx: &mut StepContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Read-only render attributes polled by the presentation layer
pub trait Renderable {
    fn sprite(&self, body: &Body) -> Sprite;
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub body: Body,
    pub kind: EntityKind,
}

impl Entity {
    fn new(body: Body, kind: EntityKind) -> Self {
        Self { body, kind }
    }

    pub fn platform(names: &mut NameAllocator, name: Option<&str>) -> Result<Self> {
        let name = names.assign("Platform", name)?;
        Ok(Self::new(Body::new(name), EntityKind::Platform(Platform::default())))
    }

    pub fn input_platform(names: &mut NameAllocator, label: &str, button_label: &str) -> Result<Self> {
        let name = names.claim(&format!("InputPlatform: {label}"))?;
        Ok(Self::new(
            Body::new(name),
            EntityKind::InputPlatform(InputPlatform::new(label, button_label)),
        ))
    }

    pub fn final_platform(names: &mut NameAllocator) -> Result<Self> {
        let name = names.claim("FinalPlatform")?;
        Ok(Self::new(Body::new(name), EntityKind::FinalPlatform(FinalPlatform::default())))
    }

    pub fn ball(names: &mut NameAllocator, name: Option<&str>) -> Result<Self> {
        let name = names.assign("Ball", name)?;
        let mut body = Body::new(name);
        body.rect = Ball::default_rect();
        Ok(Self::new(body, EntityKind::Ball(Ball::default())))
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.body.rect = rect;
        self
    }

    /// Run a configuration closure on a freshly built entity
    pub fn with(mut self, configure: impl FnOnce(&mut Entity)) -> Self {
        configure(&mut self);
        self
    }

    pub fn name(&self) -> &str {
        self.body.name()
    }

    pub fn rect(&self) -> &Rect {
        &self.body.rect
    }

    pub fn tag(&self) -> EntityTag {
        match self.kind {
            EntityKind::Platform(_) => EntityTag::Platform,
            EntityKind::InputPlatform(_) => EntityTag::InputPlatform,
            EntityKind::FinalPlatform(_) => EntityTag::FinalPlatform,
            EntityKind::Ball(_) => EntityTag::Ball,
        }
    }

    /// Whether the ball lands on / bounces off this entity
    pub fn is_obstacle(&self) -> bool {
        !matches!(self.kind, EntityKind::Ball(_))
    }

    pub fn as_ball(&self) -> Option<&Ball> {
        match &self.kind {
            EntityKind::Ball(ball) => Some(ball),
            _ => None,
        }
    }

    pub fn as_ball_mut(&mut self) -> Option<&mut Ball> {
        match &mut self.kind {
            EntityKind::Ball(ball) => Some(ball),
            _ => None,
        }
    }

    /// Ball state together with the body it moves
    pub fn ball_parts_mut(&mut self) -> Option<(&mut Ball, &mut Body)> {
        match &mut self.kind {
            EntityKind::Ball(ball) => Some((ball, &mut self.body)),
            _ => None,
        }
    }

    pub fn as_input_platform(&self) -> Option<&InputPlatform> {
        match &self.kind {
            EntityKind::InputPlatform(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_input_platform_mut(&mut self) -> Option<&mut InputPlatform> {
        match &mut self.kind {
            EntityKind::InputPlatform(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_final_platform(&self) -> Option<&FinalPlatform> {
        match &self.kind {
            EntityKind::FinalPlatform(p) => Some(p),
            _ => None,
        }
    }

    /// Platform fill color, if this kind has one
    pub fn set_color(&mut self, color: &str) {
        match &mut self.kind {
            EntityKind::Platform(p) => p.color = color.to_string(),
            EntityKind::FinalPlatform(p) => p.platform.color = color.to_string(),
            EntityKind::Ball(b) => b.color = color.to_string(),
            EntityKind::InputPlatform(_) => {}
        }
    }

    pub fn step(&mut self, dt: f32, ctx: &mut StepContext<'_>) -> Result<()> {
        let body = &mut self.body;
        match &mut self.kind {
            EntityKind::Platform(p) => p.step(body, dt, ctx),
            EntityKind::InputPlatform(p) => p.step(body, dt, ctx),
            EntityKind::FinalPlatform(p) => p.step(body, dt, ctx),
            EntityKind::Ball(b) => b.step(body, dt, ctx),
        }
    }

    pub fn sprite(&self) -> Sprite {
        match &self.kind {
            EntityKind::Platform(p) => p.sprite(&self.body),
            EntityKind::InputPlatform(p) => p.sprite(&self.body),
            EntityKind::FinalPlatform(p) => p.sprite(&self.body),
            EntityKind::Ball(b) => b.sprite(&self.body),
        }
    }
}
