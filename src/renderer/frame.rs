//! Frame snapshots and the renderer seam

use serde::Serialize;

use super::sprite::Sprite;
use crate::error::Result;
use crate::settings::Settings;
use crate::sim::world::{Camera, World};

/// One presentation frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub step_count: u64,
    pub time: f32,
    pub camera: Camera,
    pub show_step_count: bool,
    pub show_bounding_boxes: bool,
    pub show_image_containers: bool,
    /// In world insertion order, which is also paint order
    pub sprites: Vec<Sprite>,
}

impl Frame {
    pub fn capture(world: &World, step_count: u64, settings: &Settings) -> Self {
        let sprites = world
            .iter()
            .map(|(_, entity)| match entity.sprite() {
                Sprite::Ball(ball) => Sprite::Ball(ball.with_mode(settings.ball_render_mode)),
                other => other,
            })
            .collect();

        Self {
            step_count,
            time: world.time(),
            camera: world.camera,
            show_step_count: settings.show_step_count,
            show_bounding_boxes: settings.show_ball_bounding_box,
            show_image_containers: settings.show_image_container,
            sprites,
        }
    }

    pub fn sprite(&self, name: &str) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.name() == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Host-side drawing
pub trait Renderer {
    fn draw(&mut self, frame: &Frame);
}

/// Headless renderer that logs a summary of every `every`-th frame
#[derive(Debug, Clone)]
pub struct LogRenderer {
    every: u64,
    drawn: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            drawn: 0,
        }
    }

    pub fn drawn(&self) -> u64 {
        self.drawn
    }
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &Frame) {
        self.drawn += 1;
        if self.drawn % self.every != 0 {
            return;
        }

        let balls: Vec<String> = frame
            .sprites
            .iter()
            .filter_map(Sprite::as_ball)
            .map(|b| format!("{}@({:.0},{:.0})", b.name, b.bounds.x, b.bounds.y))
            .collect();
        log::debug!(
            "step {} t={:.2}s scroll={:.0} {}",
            frame.step_count,
            frame.time,
            frame.camera.scroll_y,
            balls.join(" ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BallRenderMode;
    use crate::sim::entity::Entity;

    #[test]
    fn test_capture_applies_render_settings() {
        let mut world = World::new(1);
        let platform = Entity::platform(&mut world.names, None).unwrap();
        world.push(platform);
        let ball = Entity::ball(&mut world.names, None).unwrap();
        world.push(ball);

        let settings = Settings {
            ball_render_mode: BallRenderMode::Outline,
            show_ball_bounding_box: true,
            ..Settings::default()
        };
        let frame = Frame::capture(&world, 3, &settings);

        assert_eq!(frame.step_count, 3);
        assert_eq!(frame.sprites.len(), 2);
        assert!(frame.show_bounding_boxes);
        let ball = frame.sprite("Ball1").and_then(Sprite::as_ball).unwrap();
        assert_eq!(ball.mode, BallRenderMode::Outline);
        assert!(frame.to_json().unwrap().contains("\"Platform1\""));
    }

    #[test]
    fn test_log_renderer_counts_frames() {
        let world = World::new(1);
        let frame = Frame::capture(&world, 0, &Settings::default());
        let mut renderer = LogRenderer::new(2);
        for _ in 0..5 {
            renderer.draw(&frame);
        }
        assert_eq!(renderer.drawn(), 5);
    }
}
