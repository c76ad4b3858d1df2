//! Fixed timestep simulation tick
//!
//! Order within a tick: player update, pickup consumption, camera scroll.
//! Nothing observes the session until the whole tick has run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Collidable;
use super::entity::EntityKind;
use super::player::{Regime, Surroundings};
use super::state::{GameEvent, Session};

/// Cells ahead of the player the autopilot inspects
const AUTOPILOT_LOOKAHEAD_CELLS: usize = 3;
/// Jump once a hazard starts within this distance of the player's front edge
const AUTOPILOT_JUMP_DISTANCE: f32 = 85.0;

/// Held controls, sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump fires on the press edge only
    pub jump: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput) {
    session.time_ticks += 1;

    let world = Surroundings {
        entities: &session.entities,
        camera_x: session.camera_x,
        level_width: session.level_width(),
    };
    session
        .player
        .update(input, &world, &session.tuning, &mut session.events);

    // Camera freezes and pickups stay put once the run is over
    if session.player.dead {
        return;
    }

    collect_pickups(session);
    advance_camera(session);
}

impl Session {
    /// Run one tick with the given controls
    pub fn advance(&mut self, input: &TickInput) {
        tick(self, input);
    }
}

/// Remove every pickup the player touches; the first one starts a flight
///
/// Pickups touched while already flying are counted but do not extend the
/// flight.
fn collect_pickups(session: &mut Session) {
    let player_box = session.player.collision_box();
    let mut touched = Vec::new();
    session.entities.retain(|entity| {
        let hit = entity.kind == EntityKind::Pickup && entity.collision.overlaps(&player_box);
        if hit {
            touched.push(entity.id);
        }
        !hit
    });

    for entity_id in touched {
        session.pickups_collected += 1;
        session.events.push(GameEvent::PickupCollected { entity_id });
        log::debug!("Pickup {} collected", entity_id);

        let anchor = Vec2::new(
            session.camera_x + session.tuning.viewport.x / 2.0,
            session.tuning.flight.anchor_y,
        );
        session.player.start_flight(anchor, &mut session.events);
    }
}

fn advance_camera(session: &mut Session) {
    let max_x = session.max_camera_x();
    let speed = if session.player.flying {
        session.tuning.camera.fly_speed
    } else {
        session.tuning.camera.speed
    };
    if session.camera_x < max_x {
        session.camera_x = (session.camera_x + speed).min(max_x);
    }
}

/// Demo input: run right and hop over whatever hazard comes next
pub fn autopilot(session: &Session) -> TickInput {
    let player = &session.player;
    let mut input = TickInput {
        right: true,
        ..Default::default()
    };
    if player.dead || player.regime() != Regime::Grounded || player.jump_held() {
        return input;
    }

    let player_box = player.collision_box();
    let cell_width = session.tuning.cell_width;
    let first = (player_box.left() / cell_width).floor().max(0.0) as usize;
    let hazard_start = session
        .cells()
        .iter()
        .skip(first)
        .take(AUTOPILOT_LOOKAHEAD_CELLS)
        .find(|c| !c.has_ground || c.has_obstacle || c.has_monster)
        .map(|c| c.index as f32 * cell_width);

    if let Some(start) = hazard_start {
        input.jump = start - player_box.right() <= AUTOPILOT_JUMP_DISTANCE;
    }
    input
}
