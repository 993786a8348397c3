//! Per-entity render geometry

use glam::Vec2;
use serde::Serialize;

use crate::settings::BallRenderMode;
use crate::sim::ball::BallRender;
use crate::sim::entity::Body;
use crate::sim::geometry::Rect;

/// Everything needed to draw one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sprite {
    Platform {
        name: String,
        rect: Rect,
        color: String,
    },
    Prompt {
        name: String,
        rect: Rect,
        label: String,
        button_label: String,
        /// The ball has touched it; the input should have focus
        focused: bool,
        /// Input and button are disabled
        submitted: bool,
    },
    Ball(BallSprite),
}

impl Sprite {
    pub fn name(&self) -> &str {
        match self {
            Sprite::Platform { name, .. } | Sprite::Prompt { name, .. } => name,
            Sprite::Ball(ball) => &ball.name,
        }
    }

    pub fn as_ball(&self) -> Option<&BallSprite> {
        match self {
            Sprite::Ball(ball) => Some(ball),
            _ => None,
        }
    }
}

/// Ball image placement
///
/// The image is drawn at its nominal size inside `container`, then rotated
/// by `rotation_degrees` and scaled by `scale`. The container is a square
/// of twice the nominal size centered on the bounding box and shifted by
/// the stretch offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallSprite {
    pub name: String,
    pub bounds: Rect,
    pub container: Rect,
    pub image_width: f32,
    pub image_height: f32,
    pub render_width: f32,
    pub render_height: f32,
    pub rotation_degrees: f32,
    /// (height ratio, width ratio) against the nominal size
    pub scale: Vec2,
    pub color: String,
    pub mode: BallRenderMode,
}

impl BallSprite {
    pub fn new(body: &Body, render: &BallRender, color: &str) -> Self {
        let mut container = Rect::new(0.0, 0.0, render.actual_height * 2.0, render.actual_width * 2.0);
        container.set_center(body.rect.center());
        container.translate(render.offset);

        Self {
            name: body.name().to_string(),
            bounds: body.rect,
            container,
            image_width: render.actual_width,
            image_height: render.actual_height,
            render_width: render.width,
            render_height: render.height,
            rotation_degrees: render.rotation.to_degrees(),
            scale: Vec2::new(
                render.height / render.actual_height,
                render.width / render.actual_width,
            ),
            color: color.to_string(),
            mode: BallRenderMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: BallRenderMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_centered_and_offset() {
        let mut body = Body::new("Ball1".into());
        body.rect = Rect::new(50.0, 50.0, 20.0, 20.0);
        let render = BallRender {
            height: 72.0,
            width: 43.2,
            offset: Vec2::new(0.0, -12.0),
            rotation: std::f32::consts::FRAC_PI_2,
            ..BallRender::default()
        };

        let sprite = BallSprite::new(&body, &render, "#fad300");
        assert_eq!(sprite.container, Rect::new(12.0, 0.0, 96.0, 96.0));
        assert!((sprite.rotation_degrees - 90.0).abs() < 1e-4);
        assert!((sprite.scale.x - 1.5).abs() < 1e-6);
        assert!((sprite.scale.y - 0.9).abs() < 1e-6);
        assert_eq!(sprite.mode, BallRenderMode::Solid);
    }

    #[test]
    fn test_sprite_json_is_tagged() {
        let sprite = Sprite::Platform {
            name: "Padding".into(),
            rect: Rect::new(0.0, 8000.0, 1000.0, 40.0),
            color: "transparent".into(),
        };
        let json = serde_json::to_value(&sprite).unwrap();
        assert_eq!(json["kind"], "platform");
        assert_eq!(json["rect"]["y"], 8000.0);
    }
}
