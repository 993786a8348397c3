//! Quiz scene layout and scripts
//!
//! Prompts are stacked down the page, alternating left and right columns,
//! with the final platform at the bottom. Submitting a prompt queues two
//! landing targets on the main ball: off the prompt's far corner, then onto
//! the next prompt.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::entity::{Body, Entity, EntityId};
use super::geometry::{Point, Rect};
use super::world::World;
use crate::consts::DEFAULT_GRAVITY;
use crate::error::{Result, SimError};

pub const MAIN_BALL_NAME: &str = "Main Ball";
pub const PADDING_NAME: &str = "Padding";

/// Where the main ball starts; everything but `Idle` is a debug shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartMode {
    /// Resting above the first prompt until it is focused
    #[default]
    Idle,
    InitialBounce,
    LastQuestion,
    FinalPlatform,
}

impl StartMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "idle" => Some(StartMode::Idle),
            "initial-bounce" => Some(StartMode::InitialBounce),
            "last-question" => Some(StartMode::LastQuestion),
            "final-platform" => Some(StartMode::FinalPlatform),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub label: String,
    pub button_label: String,
}

impl PromptConfig {
    pub fn new(label: &str, button_label: &str) -> Self {
        Self {
            label: label.to_string(),
            button_label: button_label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub left_x: f32,
    pub right_x: f32,
    pub first_y: f32,
    /// Vertical distance between consecutive prompts
    pub spacing: f32,
    pub prompt_width: f32,
    pub prompt_height: f32,
    pub final_rect: Rect,
    pub padding_height: f32,
    /// Gap between the main ball's top and the first prompt's top
    pub ball_lift: f32,
    pub prompts: Vec<PromptConfig>,
    pub start: StartMode,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            left_x: 50.0,
            right_x: 550.0,
            first_y: 450.0,
            spacing: 1000.0,
            prompt_width: 300.0,
            prompt_height: 25.0,
            final_rect: Rect::new(0.0, 7950.0, 1000.0, 50.0),
            padding_height: 40.0,
            ball_lift: 35.0,
            prompts: vec![
                PromptConfig::new("Spaces or Tabs?", "Next"),
                PromptConfig::new("vim or emacs?", "Next"),
                PromptConfig::new("iPhone or Android?", "Next"),
                PromptConfig::new("Xbox or Playstation?", "Next"),
                PromptConfig::new("Windows or Linux?", "Done"),
            ],
            start: StartMode::Idle,
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded scene from {} ({} prompts)", path.display(), config.prompts.len());
        Ok(config)
    }

    fn prompt_rect(&self, index: usize) -> Rect {
        let x = if index % 2 == 0 { self.left_x } else { self.right_x };
        let y = self.first_y + self.spacing * index as f32;
        Rect::new(x, y, self.prompt_width, self.prompt_height)
    }
}

/// Handles to the entities of a built quiz
#[derive(Debug, Clone)]
pub struct QuizScene {
    prompts: Vec<EntityId>,
    final_platform: EntityId,
    padding: EntityId,
    ball: EntityId,
}

impl QuizScene {
    /// Populate `world` with the quiz
    ///
    /// Insertion order is first prompt, final platform, padding, remaining
    /// prompts, main ball. Collision and ray ties resolve in this order.
    pub fn build(world: &mut World, config: &SceneConfig) -> Result<Self> {
        if config.prompts.is_empty() {
            return Err(SimError::UnknownPrompt { index: 0, count: 0 });
        }

        let push_prompt = |world: &mut World, index: usize| -> Result<EntityId> {
            let prompt = &config.prompts[index];
            let entity = Entity::input_platform(&mut world.names, &prompt.label, &prompt.button_label)?
                .with_rect(config.prompt_rect(index));
            Ok(world.push(entity))
        };

        let mut prompts = vec![push_prompt(world, 0)?];

        let final_platform = Entity::final_platform(&mut world.names)?.with_rect(config.final_rect);
        let final_platform = world.push(final_platform);

        let padding = Entity::platform(&mut world.names, Some(PADDING_NAME))?
            .with_rect(Rect::new(
                config.final_rect.x,
                config.final_rect.bottom(),
                config.final_rect.w,
                config.padding_height,
            ))
            .with(|e| e.set_color("transparent"));
        let padding = world.push(padding);

        for index in 1..config.prompts.len() {
            prompts.push(push_prompt(world, index)?);
        }

        let first = config.prompt_rect(0);
        let last = config.prompt_rect(config.prompts.len() - 1);
        let ball = Entity::ball(&mut world.names, Some(MAIN_BALL_NAME))?.with(|e| {
            let w = e.body.rect.w;
            e.body.rect.x = first.x + w;
            e.body.rect.y = first.y - config.ball_lift;

            let spot = match config.start {
                StartMode::Idle => None,
                StartMode::InitialBounce => Some((e.body.rect.x, first.y - 300.0)),
                StartMode::LastQuestion => Some((last.center_x(), last.y - 300.0)),
                StartMode::FinalPlatform => Some((config.final_rect.center_x(), config.final_rect.y - 900.0)),
            };

            if let Some(ball) = e.as_ball_mut() {
                ball.bounce = spot.is_some();
                ball.gravity = if spot.is_some() { DEFAULT_GRAVITY } else { 0.0 };
            }
            if let Some((x, y)) = spot {
                e.body.rect.x = x;
                e.body.rect.y = y;
            }
        });
        let ball = world.push(ball);

        log::info!(
            "Built quiz with {} prompts, start mode {:?}",
            prompts.len(),
            config.start
        );

        Ok(Self {
            prompts,
            final_platform,
            padding,
            ball,
        })
    }

    pub fn ball(&self) -> EntityId {
        self.ball
    }

    pub fn final_platform(&self) -> EntityId {
        self.final_platform
    }

    pub fn padding(&self) -> EntityId {
        self.padding
    }

    pub fn prompts(&self) -> &[EntityId] {
        &self.prompts
    }

    /// Index of the prompt with this entity name
    pub fn prompt_index(&self, world: &World, name: &str) -> Option<usize> {
        self.prompts
            .iter()
            .position(|&id| world.get(id).is_some_and(|e| e.name() == name))
    }

    fn prompt(&self, index: usize) -> Result<EntityId> {
        self.prompts.get(index).copied().ok_or(SimError::UnknownPrompt {
            index,
            count: self.prompts.len(),
        })
    }

    /// Prompt input gained focus
    pub fn focus_prompt(&self, world: &mut World, index: usize) -> Result<()> {
        self.prompt(index)?;
        if index == 0 {
            self.activate_ball(world)?;
        }
        Ok(())
    }

    /// Prompt answer submitted; false if it had been submitted already
    pub fn submit_prompt(&self, world: &mut World, index: usize) -> Result<bool> {
        let id = self.prompt(index)?;
        let prompt = world.entity_mut(id)?;
        let name = prompt.name().to_string();
        let first = prompt.as_input_platform_mut().is_some_and(|p| p.submit());
        if !first {
            log::warn!("{name} already submitted, ignoring");
            return Ok(false);
        }

        if index == 0 {
            self.activate_ball(world)?;
        }

        let exit = self.exit_point(world, index)?;
        let next = self.next_landing(world, index)?;

        let (ball, body) = self.ball_parts(world)?;
        ball.hurry(body);
        ball.targets.push_back(exit);
        ball.targets.push_back(next);
        log::info!("{name} submitted, {} targets queued", ball.targets.len());
        Ok(true)
    }

    fn activate_ball(&self, world: &mut World) -> Result<()> {
        let (ball, body) = self.ball_parts(world)?;
        ball.activate(body);
        Ok(())
    }

    fn ball_parts<'w>(&self, world: &'w mut World) -> Result<(&'w mut Ball, &'w mut Body)> {
        world
            .entity_mut(self.ball)?
            .ball_parts_mut()
            .ok_or_else(|| SimError::UnknownEntity(MAIN_BALL_NAME.to_string()))
    }

    /// Corner the ball leaves a prompt from, on the side facing the next one
    fn exit_point(&self, world: &World, index: usize) -> Result<Point> {
        let rect = world.entity(self.prompt(index)?)?.rect();
        Ok(if index % 2 == 0 {
            rect.top_right() - Point::new(10.0, 0.0)
        } else {
            rect.top_left()
        })
    }

    fn next_landing(&self, world: &World, index: usize) -> Result<Point> {
        let next = match self.prompts.get(index + 1) {
            Some(&id) => id,
            None => self.final_platform,
        };
        Ok(world.entity(next)?.rect().top_center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::EntityTag;
    use crate::sim::world::SimEvent;
    use glam::Vec2;

    fn quiz(config: &SceneConfig) -> (World, QuizScene) {
        let mut world = World::new(3);
        let scene = QuizScene::build(&mut world, config).unwrap();
        (world, scene)
    }

    #[test]
    fn test_build_layout_and_order() {
        let (world, scene) = quiz(&SceneConfig::default());
        let tags: Vec<_> = world.iter().map(|(_, e)| e.tag()).collect();
        assert_eq!(
            tags,
            vec![
                EntityTag::InputPlatform,
                EntityTag::FinalPlatform,
                EntityTag::Platform,
                EntityTag::InputPlatform,
                EntityTag::InputPlatform,
                EntityTag::InputPlatform,
                EntityTag::InputPlatform,
                EntityTag::Ball,
            ]
        );

        let p1 = world.get(scene.prompts()[1]).unwrap();
        assert_eq!(*p1.rect(), Rect::new(550.0, 1450.0, 300.0, 25.0));
        assert_eq!(p1.name(), "InputPlatform: vim or emacs?");
        assert_eq!(world.get(scene.padding()).unwrap().rect().y, 8000.0);

        let ball = world.get(scene.ball()).unwrap();
        assert_eq!(ball.name(), MAIN_BALL_NAME);
        assert_eq!(ball.rect().position(), Vec2::new(70.0, 415.0));
        let b = ball.as_ball().unwrap();
        assert!(!b.bounce);
        assert_eq!(b.gravity, 0.0);
    }

    #[test]
    fn test_idle_ball_stays_put() {
        let (mut world, scene) = quiz(&SceneConfig::default());
        for _ in 0..100 {
            world.step(SIM_DT).unwrap();
        }
        assert_eq!(world.get(scene.ball()).unwrap().rect().y, 415.0);
    }

    #[test]
    fn test_focus_first_prompt_activates() {
        let (mut world, scene) = quiz(&SceneConfig::default());
        scene.focus_prompt(&mut world, 0).unwrap();
        let e = world.get(scene.ball()).unwrap();
        assert_eq!(e.body.v.y, ACTIVATE_VELOCITY);
        assert!(e.as_ball().unwrap().bounce);
        assert_eq!(e.as_ball().unwrap().gravity, DEFAULT_GRAVITY);

        // Other prompts have no focus script
        let (mut world, scene) = quiz(&SceneConfig::default());
        scene.focus_prompt(&mut world, 2).unwrap();
        assert_eq!(world.get(scene.ball()).unwrap().body.v.y, 0.0);
    }

    #[test]
    fn test_submit_queues_targets_once() {
        let (mut world, scene) = quiz(&SceneConfig::default());
        assert!(scene.submit_prompt(&mut world, 0).unwrap());

        let e = world.get(scene.ball()).unwrap();
        let b = e.as_ball().unwrap();
        assert_eq!(e.body.v.y, ACTIVATE_VELOCITY);
        assert_eq!(
            b.targets.iter().copied().collect::<Vec<_>>(),
            vec![Vec2::new(340.0, 450.0), Vec2::new(700.0, 1450.0)]
        );

        assert!(!scene.submit_prompt(&mut world, 0).unwrap());
        assert_eq!(world.get(scene.ball()).unwrap().as_ball().unwrap().targets.len(), 2);
    }

    #[test]
    fn test_submit_right_column_and_last_prompt() {
        let (mut world, scene) = quiz(&SceneConfig::default());
        scene.submit_prompt(&mut world, 1).unwrap();
        scene.submit_prompt(&mut world, 4).unwrap();

        let e = world.get(scene.ball()).unwrap();
        assert_eq!(e.body.v.y, HURRY_VELOCITY);
        assert_eq!(
            e.as_ball().unwrap().targets.iter().copied().collect::<Vec<_>>(),
            vec![
                Vec2::new(550.0, 1450.0),
                Vec2::new(200.0, 2450.0),
                Vec2::new(340.0, 4450.0),
                Vec2::new(500.0, 7950.0),
            ]
        );
    }

    #[test]
    fn test_unknown_prompt() {
        let (mut world, scene) = quiz(&SceneConfig::default());
        assert!(matches!(
            scene.submit_prompt(&mut world, 5),
            Err(SimError::UnknownPrompt { index: 5, count: 5 })
        ));
        assert!(scene.focus_prompt(&mut world, 9).is_err());
    }

    #[test]
    fn test_empty_scene_rejected() {
        let config = SceneConfig {
            prompts: Vec::new(),
            ..SceneConfig::default()
        };
        assert!(QuizScene::build(&mut World::new(0), &config).is_err());
    }

    #[test]
    fn test_config_json_defaults() {
        let config = SceneConfig::from_json(r#"{"spacing": 500, "start": "last-question"}"#).unwrap();
        assert_eq!(config.spacing, 500.0);
        assert_eq!(config.start, StartMode::LastQuestion);
        assert_eq!(config.prompts.len(), 5);
        assert_eq!(config.final_rect, SceneConfig::default().final_rect);
        assert_eq!(StartMode::from_str("final-platform"), Some(StartMode::FinalPlatform));
    }

    #[test]
    fn test_debug_start_modes() {
        let config = SceneConfig {
            start: StartMode::FinalPlatform,
            ..SceneConfig::default()
        };
        let (world, scene) = quiz(&config);
        let e = world.get(scene.ball()).unwrap();
        assert_eq!(e.rect().position(), Vec2::new(500.0, 7050.0));
        assert!(e.as_ball().unwrap().bounce);

        let config = SceneConfig {
            start: StartMode::LastQuestion,
            ..SceneConfig::default()
        };
        let (world, scene) = quiz(&config);
        assert_eq!(
            world.get(scene.ball()).unwrap().rect().position(),
            Vec2::new(200.0, 4150.0)
        );
    }

    #[test]
    fn test_full_quiz_reaches_celebration() {
        let (mut world, scene) = quiz(&SceneConfig::default());
        scene.focus_prompt(&mut world, 0).unwrap();
        scene.submit_prompt(&mut world, 0).unwrap();

        let mut submitted = 1;
        let mut spawned = 0;
        for _ in 0..20_000 {
            world.step(SIM_DT).unwrap();
            for event in world.drain_events() {
                match event {
                    SimEvent::PromptFocused { name } => {
                        let index = scene.prompt_index(&world, &name).unwrap();
                        if scene.submit_prompt(&mut world, index).unwrap() {
                            submitted += 1;
                        }
                    }
                    SimEvent::BallsSpawned { count } => spawned = count,
                    _ => {}
                }
            }
            if spawned > 0 {
                break;
            }
        }

        assert_eq!(submitted, 5);
        assert_eq!(spawned, CELEBRATION_BALLS);
        let main = world.get(scene.ball()).unwrap();
        assert!(!main.as_ball().unwrap().camera_follow);
        assert!(main.rect().y > 7000.0);
    }
}
