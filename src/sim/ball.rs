//! Ball simulation
//!
//! Each step integrates gravity, moves the ball, then derives its squash or
//! stretch from downward ray casts. Deformation is render-only state; the
//! one exception is the squash energy bank, which takes velocity out of the
//! ball on impact and never gives it back.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision;
use super::entity::{Body, Renderable, Steppable};
use super::geometry::{DOWN, Point, Rect, UP, angle, is_pointing_downward, is_pointing_upward, magnitude, normalize};
use super::world::{Effect, RayHit, StepContext, WorldView};
use crate::consts::*;
use crate::error::{Result, SimError};
use crate::renderer::{BallSprite, Sprite};
use crate::{lerp, map_range};

/// Render-only deformation derived each step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallRender {
    /// Nominal (undeformed) size of the drawn ball
    pub actual_width: f32,
    pub actual_height: f32,
    /// Size along / across the rotation axis
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
    /// Radians, aligned with velocity (or pointing up while squashed)
    pub rotation: f32,
}

impl Default for BallRender {
    fn default() -> Self {
        Self {
            actual_width: BALL_RENDER_SIZE,
            actual_height: BALL_RENDER_SIZE,
            width: BALL_RENDER_SIZE,
            height: BALL_RENDER_SIZE,
            offset: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl BallRender {
    fn reset_size(&mut self) {
        self.width = self.actual_width;
        self.height = self.actual_height;
    }
}

/// A bouncing ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub bounce_velocity: f32,
    pub stretch: bool,
    pub bounce: bool,
    pub squash: bool,
    pub collision: bool,
    pub use_squash_energy: bool,
    pub camera_follow: bool,
    pub color: String,
    /// Landing points to launch at, consumed one per collision
    pub targets: VecDeque<Point>,
    squash_energy: f32,
    render: BallRender,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            terminal_velocity: DEFAULT_TERMINAL_VELOCITY,
            bounce_velocity: DEFAULT_BOUNCE_VELOCITY,
            stretch: true,
            bounce: true,
            squash: true,
            collision: true,
            use_squash_energy: true,
            camera_follow: true,
            color: BALL_COLOR.to_string(),
            targets: VecDeque::new(),
            squash_energy: 0.0,
            render: BallRender::default(),
        }
    }
}

impl Ball {
    /// Bounding box of a freshly created ball
    pub fn default_rect() -> Rect {
        Rect::new(
            BALL_START_POS.0,
            BALL_START_POS.1,
            BALL_BOUNDING_SIZE,
            BALL_BOUNDING_SIZE,
        )
    }

    pub fn squash_energy(&self) -> f32 {
        self.squash_energy
    }

    pub fn render(&self) -> &BallRender {
        &self.render
    }

    pub(crate) fn discard_squash_energy(&mut self) {
        if self.squash_energy > 0.0 {
            log::trace!("Discarding {:.1} squash energy", self.squash_energy);
        }
        self.squash_energy = 0.0;
    }

    /// Obstacles within half the drawn height below the center
    fn ground_hits(&self, body: &Body, view: WorldView<'_>) -> Vec<RayHit> {
        let mut hits = view.ray_intersections(body.rect.center(), DOWN, self.render.actual_height / 2.0);
        hits.retain(|h| h.obstacle);
        hits
    }

    fn apply_squash(&mut self, body: &mut Body, nearest: f32) {
        let r = &mut self.render;
        r.height = nearest * 2.0;
        let shrink = 1.0 - r.height / r.actual_height;
        r.width = r.actual_width * (1.0 + shrink) * 0.9;
        r.offset.y = 0.0;
        r.rotation = angle(UP);

        if self.use_squash_energy && is_pointing_downward(body.v) && self.squash_energy == 0.0 {
            let energy = body.v.y * SQUASH_ENERGY_FRACTION;
            self.squash_energy = energy;
            body.v.y -= energy;
        }
    }

    fn apply_stretch(&mut self, body: &Body, view: WorldView<'_>) {
        let speed = magnitude(body.v);
        let percent = if speed < STRETCH_START_SPEED {
            0.0
        } else {
            map_range(speed, STRETCH_START_SPEED, self.terminal_velocity, 0.0, 1.0)
        };

        let r = &mut self.render;
        let mut height = r.actual_height * lerp(1.0, STRETCH_MAX_HEIGHT, percent);

        // Don't reach past the nearest surface below while rising off it
        if is_pointing_upward(body.v)
            && let Some(hit) = view.ray_intersections(body.rect.center(), DOWN, height).first()
        {
            let max_height = hit.distance + body.rect.h / 2.0 + STRETCH_FUDGE;
            height = height.min(max_height);
        }

        // Keep the leading edge where the bounding box is
        let offset_amount = (height - r.actual_height) / 2.0;
        r.offset = -normalize(body.v) * offset_amount;
        r.height = height;
        r.width = r.actual_width * lerp(1.0, STRETCH_MIN_WIDTH, percent);
    }

    /// Launch toward `target` so the arc arrives there; returns the flight time
    pub fn launch_at(&self, body: &mut Body, target: Point) -> Result<f32> {
        let time_to_target = time_to_target_y(
            body.rect.y,
            self.gravity,
            LAUNCH_VELOCITY,
            DEFAULT_TERMINAL_VELOCITY,
            target.y,
        )?;
        body.v.y = LAUNCH_VELOCITY;
        body.v.x = (target.x - body.rect.x) / time_to_target;
        log::debug!(
            "{} launched at ({:.0}, {:.0}), t={:.3}s v=({:.1}, {:.1})",
            body.name(),
            target.x,
            target.y,
            time_to_target,
            body.v.x,
            body.v.y
        );
        Ok(time_to_target)
    }

    /// Switch the ball on: bounce, default gravity and a downward push
    pub fn activate(&mut self, body: &mut Body) {
        self.bounce = true;
        self.gravity = DEFAULT_GRAVITY;
        body.v.y = ACTIVATE_VELOCITY;
    }

    /// Make sure the ball is heading down at least at hurry speed
    pub fn hurry(&self, body: &mut Body) {
        if is_pointing_upward(body.v) || body.v.y < HURRY_VELOCITY {
            body.v.y = HURRY_VELOCITY;
        }
    }
}

/// Time for a vertical launch from `start_y` to fall past `target_y`
///
/// Forward-simulates at a fixed 1/60 s step regardless of the tick rate,
/// then backs out the overshoot of the last step linearly.
pub fn time_to_target_y(
    start_y: f32,
    gravity: f32,
    initial_velocity: f32,
    terminal_velocity: f32,
    target_y: f32,
) -> Result<f32> {
    if target_y <= start_y {
        return Err(SimError::TargetNotBelow {
            target_y,
            ball_y: start_y,
        });
    }

    let dt = LAUNCH_SOLVER_DT;
    let mut vy = initial_velocity;
    let mut y = start_y;
    let mut total_time = 0.0;
    let mut steps = 0;

    while y <= target_y {
        if steps >= LAUNCH_SOLVER_MAX_STEPS {
            return Err(SimError::UnreachableTarget {
                start_y,
                target_y,
                gravity,
            });
        }
        steps += 1;

        vy += gravity * dt;
        if vy > terminal_velocity {
            vy = terminal_velocity;
        }
        y += vy * dt;
        total_time += dt;
    }

    let overshoot = y - target_y;
    total_time -= overshoot / vy;
    Ok(total_time)
}

impl Steppable for Ball {
    fn step(&mut self, body: &mut Body, dt: f32, ctx: &mut StepContext<'_>) -> Result<()> {
        // Resting on something: don't sink into it
        let squashing = self.squash && !self.ground_hits(body, ctx.view).is_empty();
        if !squashing {
            body.v.y += self.gravity * dt;
            if body.v.y > self.terminal_velocity {
                body.v.y = self.terminal_velocity;
            }
        }

        body.rect.translate(body.v * dt);

        let nearest = if self.squash {
            self.ground_hits(body, ctx.view).first().map(|h| h.distance)
        } else {
            None
        };

        match nearest {
            Some(distance) => self.apply_squash(body, distance),
            None => {
                self.render.reset_size();
                if self.stretch {
                    self.apply_stretch(body, ctx.view);
                }
                self.render.rotation = angle(body.v);
            }
        }

        if self.collision
            && let Some((obstacle, surface)) = collision::find_obstacle(ctx.view, &body.rect)
        {
            if let Some(target) = collision::land(self, body, &surface)? {
                ctx.emit(Effect::Launched {
                    ball: ctx.id,
                    target,
                    velocity: body.v,
                });
            }
            ctx.emit(Effect::Collided {
                ball: ctx.id,
                obstacle,
            });
        }

        if self.camera_follow {
            let half_view = ctx.camera.viewport_height / 2.0;
            if body.rect.y - ctx.camera.scroll_y > half_view {
                ctx.emit(Effect::ScrollCamera {
                    y: body.rect.y - half_view,
                });
            }
        }

        Ok(())
    }
}

impl Renderable for Ball {
    fn sprite(&self, body: &Body) -> Sprite {
        Sprite::Ball(BallSprite::new(body, &self.render, &self.color))
    }
}
