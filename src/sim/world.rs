//! World registry: entities, ray casts, timers and outbound events
//!
//! Entities are stepped in insertion order. While one entity steps it sees
//! the rest of the world through a [`WorldView`] and requests world-level
//! changes as [`Effect`]s, which are applied before the next entity steps.
//! Entities created during a tick wait in a pending buffer until the tick's
//! iteration is over.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use super::geometry::{Point, Vector, distance};
use super::names::NameAllocator;
use super::platform::spawn_celebration;
use crate::error::{Result, SimError};

/// A ray cast hit against an entity's rect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub id: EntityId,
    pub obstacle: bool,
    pub point: Point,
    pub distance: f32,
}

/// Vertical scroll state of the presentation viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub scroll_y: f32,
    pub viewport_height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            viewport_height: 900.0,
        }
    }
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    /// The ball touched a prompt for the first time; focus its input
    PromptFocused { name: String },
    /// Scroll the viewport so its top sits at `y`
    CameraScroll { y: f32 },
    CelebrationScheduled { fire_at: f32 },
    BallsSpawned { count: usize },
    TargetLaunched { ball: String, target: Point, velocity: Vector },
}

/// World-level change requested by a stepping entity
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Collided { ball: EntityId, obstacle: EntityId },
    ScrollCamera { y: f32 },
    ScheduleCelebration { platform: EntityId, ball: EntityId, delay: f32 },
    Launched { ball: EntityId, target: Point, velocity: Vector },
}

#[derive(Debug, Clone)]
enum TimerAction {
    Celebration { platform: EntityId, ball: EntityId },
}

#[derive(Debug, Clone)]
struct Timer {
    fire_at: f32,
    action: TimerAction,
}

/// Cast a ray against every entity yielded by `entities`, nearest first
fn cast_ray<'a>(
    entities: impl Iterator<Item = (EntityId, &'a Entity)>,
    origin: Point,
    direction: Vector,
    length: f32,
) -> Vec<RayHit> {
    let mut hits: Vec<RayHit> = entities
        .filter_map(|(id, entity)| {
            entity
                .rect()
                .intersects_ray_at(origin, direction, length)
                .map(|point| RayHit {
                    id,
                    obstacle: entity.is_obstacle(),
                    point,
                    distance: distance(origin, point),
                })
        })
        .collect();

    // Stable: equal distances keep insertion order
    hits.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits
}

/// Read-only view of every entity except the one currently stepping
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    before: &'a [Entity],
    after: &'a [Entity],
}

impl<'a> WorldView<'a> {
    pub fn iter(self) -> impl Iterator<Item = (EntityId, &'a Entity)> + 'a {
        let (before, after) = (self.before, self.after);
        let skip = before.len() + 1;
        before
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId(i as u32), e))
            .chain(
                after
                    .iter()
                    .enumerate()
                    .map(move |(i, e)| (EntityId((skip + i) as u32), e)),
            )
    }

    pub fn get(&self, id: EntityId) -> Option<&'a Entity> {
        self.iter().find(|(other, _)| *other == id).map(|(_, e)| e)
    }

    pub fn ray_intersections(&self, origin: Point, direction: Vector, length: f32) -> Vec<RayHit> {
        cast_ray(self.iter(), origin, direction, length)
    }

    /// First ball in insertion order
    pub fn first_ball(&self) -> Option<(EntityId, &'a Entity)> {
        self.iter().find(|(_, e)| e.as_ball().is_some())
    }
}

/// Everything an entity may read or request while stepping
pub struct StepContext<'a> {
    pub id: EntityId,
    pub view: WorldView<'a>,
    pub camera: &'a Camera,
    effects: &'a mut Vec<Effect>,
}

impl StepContext<'_> {
    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}

/// Insertion-ordered registry of all simulated entities
#[derive(Debug, Clone)]
pub struct World {
    entities: Vec<Entity>,
    pending: Vec<Entity>,
    timers: Vec<Timer>,
    events: Vec<SimEvent>,
    pub names: NameAllocator,
    pub camera: Camera,
    pub(crate) rng: Pcg32,
    time: f32,
}

impl Default for World {
    fn default() -> Self {
        Self::new(0)
    }
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            entities: Vec::new(),
            pending: Vec::new(),
            timers: Vec::new(),
            events: Vec::new(),
            names: NameAllocator::new(),
            camera: Camera::default(),
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
        }
    }

    /// Append an entity and return its handle
    pub fn push(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(entity);
        id
    }

    /// Add an entity once the current tick finishes iterating
    pub fn queue(&mut self, entity: Entity) {
        self.pending.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Simulation time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index())
    }

    /// Like [`World::get`], failing with [`SimError::UnknownEntity`]
    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.get(id)
            .ok_or_else(|| SimError::UnknownEntity(format!("#{}", id.0)))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.get_mut(id)
            .ok_or_else(|| SimError::UnknownEntity(format!("#{}", id.0)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId(i as u32), e))
    }

    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.iter().find(|(_, e)| e.name() == name).map(|(id, _)| id)
    }

    pub fn first_ball(&self) -> Option<EntityId> {
        self.iter()
            .find(|(_, e)| e.as_ball().is_some())
            .map(|(id, _)| id)
    }

    pub fn ray_intersections(&self, origin: Point, direction: Vector, length: f32) -> Vec<RayHit> {
        cast_ray(self.iter(), origin, direction, length)
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance every entity by `dt`, then fire due timers and admit pending entities
    pub fn step(&mut self, dt: f32) -> Result<()> {
        let count = self.entities.len();
        let mut effects = Vec::new();

        for i in 0..count {
            {
                let (before, rest) = self.entities.split_at_mut(i);
                let Some((current, after)) = rest.split_first_mut() else {
                    break;
                };
                let mut ctx = StepContext {
                    id: EntityId(i as u32),
                    view: WorldView {
                        before: &*before,
                        after: &*after,
                    },
                    camera: &self.camera,
                    effects: &mut effects,
                };
                current.step(dt, &mut ctx)?;
            }

            for effect in effects.drain(..) {
                self.apply(effect);
            }
        }

        self.time += dt;
        self.fire_timers()?;
        self.flush_pending();
        Ok(())
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Collided { ball, obstacle } => {
                let Some(entity) = self.entities.get_mut(obstacle.index()) else {
                    return;
                };
                let name = entity.name().to_string();
                if let Some(prompt) = entity.as_input_platform_mut() {
                    if prompt.on_collide() {
                        log::debug!("Ball #{} reached prompt {name}", ball.0);
                        self.events.push(SimEvent::PromptFocused { name });
                    }
                }
            }
            Effect::ScrollCamera { y } => {
                self.camera.scroll_y = y;
                self.events.push(SimEvent::CameraScroll { y });
            }
            Effect::ScheduleCelebration {
                platform,
                ball,
                delay,
            } => {
                self.schedule_celebration(platform, ball, delay);
            }
            Effect::Launched {
                ball,
                target,
                velocity,
            } => {
                let ball = self
                    .get(ball)
                    .map(|e| e.name().to_string())
                    .unwrap_or_default();
                self.events.push(SimEvent::TargetLaunched {
                    ball,
                    target,
                    velocity,
                });
            }
        }
    }

    /// One-shot celebration `delay` seconds of simulation time from now
    pub fn schedule_celebration(&mut self, platform: EntityId, ball: EntityId, delay: f32) -> f32 {
        let fire_at = self.time + delay;
        log::info!("Celebration scheduled at t={fire_at:.2}s");
        self.timers.push(Timer {
            fire_at,
            action: TimerAction::Celebration { platform, ball },
        });
        self.events.push(SimEvent::CelebrationScheduled { fire_at });
        fire_at
    }

    fn fire_timers(&mut self) -> Result<()> {
        let now = self.time;
        let (due, waiting): (Vec<Timer>, Vec<Timer>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|t| t.fire_at <= now);
        self.timers = waiting;

        for timer in due {
            match timer.action {
                TimerAction::Celebration { platform, ball } => {
                    let count = spawn_celebration(self, platform, ball)?;
                    self.events.push(SimEvent::BallsSpawned { count });
                }
            }
        }
        Ok(())
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Admitting {} pending entities", self.pending.len());
            self.entities.append(&mut self.pending);
        }
    }
}
