//! Static platforms the ball lands on
//!
//! Plain platforms only occupy space. Prompt platforms remember their first
//! touch, and the final platform schedules the celebration when the ball
//! gets close.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, EntityId, Renderable, Steppable};
use super::world::{Effect, StepContext, World};
use crate::consts::*;
use crate::error::Result;
use crate::lerp;
use crate::renderer::Sprite;

pub const PLATFORM_COLOR: &str = "white";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// CSS color; "transparent" hides the platform
    pub color: String,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            color: PLATFORM_COLOR.to_string(),
        }
    }
}

impl Steppable for Platform {}

impl Renderable for Platform {
    fn sprite(&self, body: &Body) -> Sprite {
        Sprite::Platform {
            name: body.name().to_string(),
            rect: body.rect,
            color: self.color.clone(),
        }
    }
}

/// Platform carrying a question with a text input and a submit button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputPlatform {
    pub label: String,
    pub button_label: String,
    touched: bool,
    submitted: bool,
}

impl InputPlatform {
    pub fn new(label: &str, button_label: &str) -> Self {
        Self {
            label: label.to_string(),
            button_label: button_label.to_string(),
            touched: false,
            submitted: false,
        }
    }

    /// Record a ball touch; true only for the first one
    pub fn on_collide(&mut self) -> bool {
        !std::mem::replace(&mut self.touched, true)
    }

    /// Record a submit; true only for the first one
    pub fn submit(&mut self) -> bool {
        !std::mem::replace(&mut self.submitted, true)
    }

    pub fn touched(&self) -> bool {
        self.touched
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }
}

impl Steppable for InputPlatform {}

impl Renderable for InputPlatform {
    fn sprite(&self, body: &Body) -> Sprite {
        Sprite::Prompt {
            name: body.name().to_string(),
            rect: body.rect,
            label: self.label.clone(),
            button_label: self.button_label.clone(),
            focused: self.touched,
            submitted: self.submitted,
        }
    }
}

/// Last platform; starts the celebration once the ball is near
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalPlatform {
    pub platform: Platform,
    triggered: bool,
}

impl FinalPlatform {
    pub fn triggered(&self) -> bool {
        self.triggered
    }
}

impl Steppable for FinalPlatform {
    fn step(&mut self, body: &mut Body, _dt: f32, ctx: &mut StepContext<'_>) -> Result<()> {
        if self.triggered {
            return Ok(());
        }
        let Some((ball_id, ball)) = ctx.view.first_ball() else {
            return Ok(());
        };

        if body.rect.y - ball.rect().y < FINAL_TRIGGER_DISTANCE {
            self.triggered = true;
            log::info!("{} reached {}", ball.name(), body.name());
            ctx.emit(Effect::ScheduleCelebration {
                platform: ctx.id,
                ball: ball_id,
                delay: CELEBRATION_DELAY,
            });
        }
        Ok(())
    }
}

impl Renderable for FinalPlatform {
    fn sprite(&self, body: &Body) -> Sprite {
        self.platform.sprite(body)
    }
}

/// Drop a spread of extra balls onto the final platform
///
/// Half land left of the main ball and half right of it. The main ball stops
/// driving the camera. New balls are queued and join after the current tick.
pub fn spawn_celebration(world: &mut World, platform: EntityId, ball: EntityId) -> Result<usize> {
    let platform_rect = *world.entity(platform)?.rect();

    let ball_entity = world.entity_mut(ball)?;
    let ball_rect = *ball_entity.rect();
    if let Some(main) = ball_entity.as_ball_mut() {
        main.camera_follow = false;
    }

    let per_side = CELEBRATION_BALLS / 2;
    let left_edge = ball_rect.left() - ball_rect.w * 3.0;
    let right_start = ball_rect.right() - 40.0;
    let fraction = |i: usize| (i + 1) as f32 / per_side as f32;

    let xs: Vec<f32> = (0..per_side)
        .map(|i| lerp(0.0, left_edge, fraction(i)))
        .chain((0..per_side).map(|i| lerp(right_start, CELEBRATION_RIGHT_EDGE, fraction(i))))
        .collect();

    for &x in &xs {
        let drop = world.rng.random::<f32>();
        let boost = world.rng.random::<f32>();
        let entity = Entity::ball(&mut world.names, None)?.with(|e| {
            e.body.rect.x = x;
            e.body.rect.y =
                platform_rect.y - CELEBRATION_DROP_HEIGHT - lerp(0.0, CELEBRATION_DROP_SPREAD, drop);
            if let Some(b) = e.as_ball_mut() {
                b.camera_follow = false;
                b.bounce_velocity *= lerp(1.0, CELEBRATION_BOUNCE_BOOST, boost);
            }
        });
        world.queue(entity);
    }

    log::info!("Celebration: {} balls dropped", xs.len());
    Ok(xs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use crate::sim::world::SimEvent;

    fn final_scene(seed: u64, ball_y: f32) -> (World, EntityId, EntityId) {
        let mut world = World::new(seed);
        let platform = Entity::final_platform(&mut world.names)
            .unwrap()
            .with_rect(Rect::new(0.0, 7950.0, 1000.0, 50.0));
        let platform = world.push(platform);
        let ball = Entity::ball(&mut world.names, Some("Main Ball"))
            .unwrap()
            .with_rect(Rect::new(500.0, ball_y, 20.0, 20.0))
            .with(|e| e.as_ball_mut().unwrap().gravity = 0.0);
        let ball = world.push(ball);
        (world, platform, ball)
    }

    /// Step until the celebration spawns; returns the spawned entities
    fn run_until_spawn(world: &mut World) -> Vec<Entity> {
        for _ in 0..500 {
            let before = world.len();
            world.step(SIM_DT).unwrap();
            let events = world.drain_events();
            if events.iter().any(|e| matches!(e, SimEvent::BallsSpawned { .. })) {
                return world.iter().skip(before).map(|(_, e)| e.clone()).collect();
            }
        }
        panic!("celebration never spawned");
    }

    #[test]
    fn test_prompt_first_touch_only() {
        let mut prompt = InputPlatform::new("vim or emacs?", "Next");
        assert!(prompt.on_collide());
        assert!(!prompt.on_collide());
        assert!(prompt.submit());
        assert!(!prompt.submit());
    }

    #[test]
    fn test_final_platform_waits_for_ball() {
        let (mut world, platform, _) = final_scene(1, 6000.0);
        for _ in 0..50 {
            world.step(SIM_DT).unwrap();
        }
        let p = world.get(platform).unwrap().as_final_platform().unwrap();
        assert!(!p.triggered());
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_celebration_fires_once_after_delay() {
        let (mut world, platform, ball) = final_scene(1, 7500.0);

        world.step(SIM_DT).unwrap();
        assert!(world.get(platform).unwrap().as_final_platform().unwrap().triggered());
        assert!(world.drain_events().iter().any(
            |e| matches!(e, SimEvent::CelebrationScheduled { fire_at } if (*fire_at - CELEBRATION_DELAY).abs() < 1e-3)
        ));

        let spawned = run_until_spawn(&mut world);
        assert!(world.time() >= CELEBRATION_DELAY);
        assert_eq!(spawned.len(), CELEBRATION_BALLS);
        assert!(!world.get(ball).unwrap().as_ball().unwrap().camera_follow);

        for e in &spawned {
            let b = e.as_ball().unwrap();
            assert!(!b.camera_follow);
            assert!(b.bounce_velocity <= DEFAULT_BOUNCE_VELOCITY);
            assert!(b.bounce_velocity >= DEFAULT_BOUNCE_VELOCITY * CELEBRATION_BOUNCE_BOOST - 1e-3);
            let y = e.rect().y;
            assert!(y <= 7950.0 - CELEBRATION_DROP_HEIGHT);
            assert!(y >= 7950.0 - CELEBRATION_DROP_HEIGHT - CELEBRATION_DROP_SPREAD);
        }

        // Left half ends at ball.left - 3w, right half at the right edge
        assert!((spawned[4].rect().x - (500.0 - 60.0)).abs() < 1e-3);
        assert!((spawned[9].rect().x - CELEBRATION_RIGHT_EDGE).abs() < 1e-3);

        for _ in 0..300 {
            world.step(SIM_DT).unwrap();
        }
        assert_eq!(world.len(), 2 + CELEBRATION_BALLS);
    }

    #[test]
    fn test_celebration_deterministic_per_seed() {
        let positions = |seed| {
            let (mut world, _, _) = final_scene(seed, 7500.0);
            run_until_spawn(&mut world)
                .iter()
                .map(|e| e.rect().y)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(42), positions(42));
        assert_ne!(positions(42), positions(43));
    }
}
