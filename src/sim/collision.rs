//! Collision detection and landing response
//!
//! Detection is corner-in-rect: the ball collides with the first obstacle
//! (in insertion order) containing any corner of its bounding box. A
//! landing always pins the ball's bottom to the obstacle's top edge,
//! whichever side it actually touched.

use super::ball::Ball;
use super::entity::{Body, EntityId};
use super::geometry::{Point, Rect};
use super::world::WorldView;
use crate::error::Result;

/// First obstacle overlapping `rect`, with its rect
pub fn find_obstacle(view: WorldView<'_>, rect: &Rect) -> Option<(EntityId, Rect)> {
    view.iter()
        .find(|(_, e)| e.is_obstacle() && e.rect().intersects_rect(rect))
        .map(|(id, e)| (id, *e.rect()))
}

/// Land `body` on `surface`
///
/// With targets queued the next one is popped and the ball launched at it
/// (returned). Otherwise the ball bounces, or stops if bouncing is off.
pub fn land(ball: &mut Ball, body: &mut Body, surface: &Rect) -> Result<Option<Point>> {
    if let Some(target) = ball.targets.pop_front() {
        body.rect.set_bottom(surface.top());
        ball.launch_at(body, target)?;
        return Ok(Some(target));
    }

    if ball.bounce {
        ball.discard_squash_energy();
        body.v.y = ball.bounce_velocity;
    } else {
        body.v.y = 0.0;
    }
    body.v.x = 0.0;
    body.rect.set_bottom(surface.top());
    Ok(None)
}
