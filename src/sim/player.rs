//! Player physics and state machine
//!
//! Each tick runs, in order: off-screen death check, flight, horizontal
//! movement, jump, gravity, collision resolution and animation selection.
//! Upward motion never collides; the player only lands on platforms while
//! falling, which lets jumps pass through obstacles from below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{AnimState, Animator};
use super::collision::{Aabb, Collidable};
use super::entity::{EntityKind, WorldEntity};
use super::state::GameEvent;
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Horizontal facing, mirrored by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Collision box left the visible play-field
    FellOffScreen,
    /// Touched a monster
    Monster,
}

/// Vertical regime of a living player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    Grounded,
    Flying,
    Airborne,
}

/// What the player can see of the world during its update
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    pub entities: &'a [WorldEntity],
    /// Left edge of the viewport in level space
    pub camera_x: f32,
    pub level_width: f32,
}

/// The single player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Bottom-centre of the collision box
    pub pos: Vec2,
    /// Vertical velocity (px/tick, negative is up)
    pub vel_y: f32,
    /// Collision box size
    pub size: Vec2,
    pub facing: Facing,
    pub grounded: bool,
    /// Grounded flag as of the previous animation update
    was_grounded: bool,
    /// Jump input as of the previous tick, for edge detection
    jump_held: bool,
    pub dead: bool,
    /// Died event already emitted
    death_reported: bool,
    pub flying: bool,
    /// Ticks spent in the current flight
    pub flight_ticks: u32,
    pub anim: Animator,
}

impl Collidable for Player {
    fn collision_box(&self) -> Aabb {
        self.box_at(self.pos)
    }
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel_y: 0.0,
            size,
            facing: Facing::Right,
            grounded: false,
            was_grounded: true,
            jump_held: false,
            dead: false,
            death_reported: false,
            flying: false,
            flight_ticks: 0,
            anim: Animator::new(AnimState::Idle),
        }
    }

    /// Collision box with its bottom-centre at `pos`
    pub fn box_at(&self, pos: Vec2) -> Aabb {
        let half = self.size.x / 2.0;
        Aabb::from_edges(pos.x - half, pos.x + half, pos.y - self.size.y, pos.y)
    }

    pub fn regime(&self) -> Regime {
        if self.flying {
            Regime::Flying
        } else if self.grounded {
            Regime::Grounded
        } else {
            Regime::Airborne
        }
    }

    /// Whether jump was held on the previous tick
    pub fn jump_held(&self) -> bool {
        self.jump_held
    }

    /// Advance the player by one tick
    pub fn update(
        &mut self,
        input: &TickInput,
        world: &Surroundings<'_>,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.dead {
            self.check_off_screen(world.camera_x, tuning, events);
        }

        if self.dead {
            self.anim.advance(&tuning.clips, tuning.tick_rate);
            return;
        }

        if self.flying {
            self.update_flight(world.level_width, tuning, events);
            self.update_animation(false);
            self.anim.advance(&tuning.clips, tuning.tick_rate);
            return;
        }

        let speed = tuning.player.speed;
        let mut moving = false;
        if input.left {
            moving = true;
            if self.try_walk(-speed, world) {
                self.facing = Facing::Left;
            }
        }
        if input.right {
            moving = true;
            if self.try_walk(speed, world) {
                self.facing = Facing::Right;
            }
        }

        if self.grounded && input.jump && !self.jump_held {
            self.vel_y = tuning.player.jump_speed;
            self.grounded = false;
            events.push(GameEvent::Jumped);
        }
        self.jump_held = input.jump;

        self.vel_y += tuning.player.gravity;
        self.pos.y += self.vel_y;

        self.resolve_collisions(world.entities, events);

        if self.grounded && !self.was_grounded && !self.dead {
            events.push(GameEvent::Landed);
        }

        self.update_animation(moving);
        self.anim.advance(&tuning.clips, tuning.tick_rate);
    }

    /// Enter flight at `anchor`; no-op when already flying
    ///
    /// Vertical velocity is discarded, so after the flight the player falls
    /// from rest rather than resuming the arc it had before the pickup.
    pub fn start_flight(&mut self, anchor: Vec2, events: &mut Vec<GameEvent>) -> bool {
        if self.flying || self.dead {
            return false;
        }
        self.flying = true;
        self.flight_ticks = 0;
        self.pos = anchor;
        self.vel_y = 0.0;
        self.grounded = false;
        self.anim.set_state(AnimState::Fly);
        events.push(GameEvent::FlightStarted);
        log::info!("Flight started at ({:.0}, {:.0})", anchor.x, anchor.y);
        true
    }

    fn die(&mut self, cause: DeathCause, events: &mut Vec<GameEvent>) {
        if !self.dead {
            self.dead = true;
            self.flying = false;
            self.anim.set_state(AnimState::Die);
            log::info!("Player died ({:?}) at x={:.0}", cause, self.pos.x);
        }
        if !self.death_reported {
            self.death_reported = true;
            events.push(GameEvent::Died { cause });
        }
    }

    /// Dies once the collision box is fully outside the camera's view
    fn check_off_screen(&mut self, camera_x: f32, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        let on_screen = self.collision_box().translated(Vec2::new(-camera_x, 0.0));
        let viewport = Aabb::new(Vec2::ZERO, tuning.viewport);
        if on_screen.is_outside(&viewport) {
            self.die(DeathCause::FellOffScreen, events);
        }
    }

    fn update_flight(&mut self, level_width: f32, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        self.flight_ticks += 1;
        if self.flight_ticks >= tuning.flight.duration_ticks {
            self.flying = false;
            self.flight_ticks = 0;
            self.grounded = false;
            self.was_grounded = false;
            self.anim.set_state(AnimState::JumpLoop);
            events.push(GameEvent::FlightEnded);
            log::info!("Flight ended at x={:.0}", self.pos.x);
            return;
        }

        let new_x = self.pos.x + tuning.flight.speed;
        if new_x <= level_width - self.size.x / 2.0 {
            self.pos.x = new_x;
        }
    }

    /// Move horizontally unless it leaves the level or hits a blocking entity
    fn try_walk(&mut self, dx: f32, world: &Surroundings<'_>) -> bool {
        let new_x = self.pos.x + dx;
        let half = self.size.x / 2.0;
        if new_x < half || new_x > world.level_width - half {
            return false;
        }

        let candidate = self.box_at(Vec2::new(new_x, self.pos.y));
        let blocked = world
            .entities
            .iter()
            .any(|e| e.kind.blocks_movement() && e.collision.overlaps(&candidate));
        if blocked {
            return false;
        }

        self.pos.x = new_x;
        true
    }

    fn resolve_collisions(&mut self, entities: &[WorldEntity], events: &mut Vec<GameEvent>) {
        self.grounded = false;

        for entity in entities {
            if !self.collision_box().overlaps(&entity.collision) {
                continue;
            }

            match entity.kind {
                EntityKind::Monster => {
                    self.die(DeathCause::Monster, events);
                    return;
                }
                // Consumed by the session after the player update
                EntityKind::Pickup => continue,
                EntityKind::Ground | EntityKind::Obstacle => {
                    let top = entity.collision.top();
                    if self.vel_y >= 0.0 && self.pos.y > top {
                        self.pos.y = top;
                        self.vel_y = 0.0;
                        self.grounded = true;
                    }
                }
            }
        }
    }

    /// Pick the animation clip from the physics state
    fn update_animation(&mut self, moving: bool) {
        if self.dead {
            return;
        }
        if self.flying {
            self.anim.set_state(AnimState::Fly);
            return;
        }

        if self.was_grounded && !self.grounded {
            self.anim.set_state(AnimState::JumpStart);
        }
        if !self.was_grounded && self.grounded {
            self.anim.set_state(AnimState::JumpEnd);
        }

        let ground_state = if moving { AnimState::Move } else { AnimState::Idle };
        match self.anim.state() {
            AnimState::JumpStart => {
                if self.anim.is_finished() {
                    self.anim.set_state(AnimState::JumpLoop);
                }
            }
            AnimState::JumpEnd => {
                if self.anim.is_finished() {
                    self.anim.set_state(ground_state);
                }
            }
            AnimState::Idle | AnimState::Move => {
                if self.grounded {
                    self.anim.set_state(ground_state);
                }
            }
            AnimState::JumpLoop | AnimState::Die | AnimState::Fly => {}
        }

        self.was_grounded = self.grounded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::build_entities;
    use crate::sim::level::LaneCell;

    const GROUND_TOP: f32 = 600.0;

    fn flat(len: usize) -> Vec<LaneCell> {
        (0..len)
            .map(|index| LaneCell {
                index,
                has_ground: true,
                ..Default::default()
            })
            .collect()
    }

    struct Rig {
        tuning: Tuning,
        entities: Vec<WorldEntity>,
        level_width: f32,
        camera_x: f32,
        player: Player,
        events: Vec<GameEvent>,
    }

    impl Rig {
        fn new(cells: &[LaneCell], pos: Vec2) -> Self {
            let tuning = Tuning::default();
            let entities = build_entities(cells, &tuning);
            let level_width = cells.len() as f32 * tuning.cell_width;
            let player = Player::new(pos, tuning.player.size);
            Self {
                tuning,
                entities,
                level_width,
                camera_x: 0.0,
                player,
                events: Vec::new(),
            }
        }

        /// Player standing still on ground at `x`
        fn standing(cells: &[LaneCell], x: f32) -> Self {
            let mut rig = Self::new(cells, Vec2::new(x, GROUND_TOP));
            rig.player.grounded = true;
            rig
        }

        fn step(&mut self, input: TickInput) {
            let world = Surroundings {
                entities: &self.entities,
                camera_x: self.camera_x,
                level_width: self.level_width,
            };
            self.player.update(&input, &world, &self.tuning, &mut self.events);
        }

        fn count(&self, event: GameEvent) -> usize {
            self.events.iter().filter(|e| **e == event).count()
        }
    }

    const IDLE: TickInput = TickInput {
        left: false,
        right: false,
        jump: false,
    };
    const JUMP: TickInput = TickInput {
        left: false,
        right: false,
        jump: true,
    };
    const RIGHT: TickInput = TickInput {
        left: false,
        right: true,
        jump: false,
    };
    const LEFT: TickInput = TickInput {
        left: true,
        right: false,
        jump: false,
    };

    #[test]
    fn test_grounded_player_rests() {
        let mut rig = Rig::standing(&flat(20), 300.0);
        for _ in 0..10 {
            rig.step(IDLE);
        }
        assert_eq!(rig.player.vel_y, 0.0);
        assert_eq!(rig.player.pos.y, GROUND_TOP);
        assert!(rig.player.grounded);
        assert_eq!(rig.player.regime(), Regime::Grounded);
        assert_eq!(rig.player.anim.state(), AnimState::Idle);
        assert!(rig.events.is_empty());
    }

    #[test]
    fn test_walking_selects_move_and_facing() {
        let mut rig = Rig::standing(&flat(20), 300.0);
        rig.step(RIGHT);
        assert_eq!(rig.player.pos.x, 305.5);
        assert_eq!(rig.player.anim.state(), AnimState::Move);
        rig.step(LEFT);
        assert_eq!(rig.player.pos.x, 300.0);
        assert_eq!(rig.player.facing, Facing::Left);
        rig.step(IDLE);
        assert_eq!(rig.player.anim.state(), AnimState::Idle);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let mut rig = Rig::standing(&flat(20), 300.0);
        let tuning = rig.tuning.clone();

        rig.step(JUMP);
        assert!(!rig.player.grounded);
        assert_eq!(rig.player.vel_y, tuning.player.jump_speed + tuning.player.gravity);
        assert_eq!(rig.count(GameEvent::Jumped), 1);

        // Holding jump through the whole arc and after landing never re-fires
        for _ in 0..120 {
            rig.step(JUMP);
        }
        assert!(rig.player.grounded);
        assert_eq!(rig.count(GameEvent::Jumped), 1);
        assert_eq!(rig.count(GameEvent::Landed), 1);

        rig.step(IDLE);
        rig.step(JUMP);
        assert_eq!(rig.count(GameEvent::Jumped), 2);
    }

    #[test]
    fn test_cannot_jump_in_air() {
        let mut rig = Rig::new(&flat(20), Vec2::new(300.0, 400.0));
        rig.step(JUMP);
        assert_eq!(rig.count(GameEvent::Jumped), 0);
        assert!(rig.player.vel_y > 0.0);
    }

    #[test]
    fn test_landing_snaps_to_top() {
        let mut rig = Rig::new(&flat(20), Vec2::new(300.0, 590.0));
        rig.player.vel_y = 15.0;
        rig.player.was_grounded = false;
        rig.step(IDLE);
        assert_eq!(rig.player.pos.y, GROUND_TOP);
        assert_eq!(rig.player.vel_y, 0.0);
        assert!(rig.player.grounded);
        assert_eq!(rig.count(GameEvent::Landed), 1);
        assert_eq!(rig.player.anim.state(), AnimState::JumpEnd);
    }

    #[test]
    fn test_lands_on_obstacle_top() {
        let mut cells = flat(20);
        cells[2].has_obstacle = true;
        let mut rig = Rig::new(&cells, Vec2::new(300.0, 470.0));
        rig.player.vel_y = 12.0;
        rig.step(IDLE);
        assert_eq!(rig.player.pos.y, 480.0);
        assert!(rig.player.grounded);
    }

    #[test]
    fn test_rising_passes_through_obstacle() {
        let mut cells = flat(20);
        cells[2].has_obstacle = true;
        let mut rig = Rig::new(&cells, Vec2::new(300.0, 560.0));
        rig.player.vel_y = -10.0;
        rig.step(IDLE);
        assert!((rig.player.pos.y - 550.6).abs() < 1e-3);
        assert!(rig.player.vel_y < 0.0);
        assert!(!rig.player.grounded);
    }

    #[test]
    fn test_obstacle_blocks_walking() {
        let mut cells = flat(20);
        cells[3].has_obstacle = true;
        let mut rig = Rig::standing(&cells, 329.0);
        rig.step(RIGHT);
        assert_eq!(rig.player.pos.x, 329.0);
        // Blocked but still trying to walk
        assert_eq!(rig.player.anim.state(), AnimState::Move);
    }

    #[test]
    fn test_level_bounds_block_walking() {
        let mut rig = Rig::standing(&flat(4), 31.0);
        rig.step(LEFT);
        assert_eq!(rig.player.pos.x, 31.0);

        let mut rig = Rig::standing(&flat(4), 480.0 - 32.0);
        rig.step(RIGHT);
        assert_eq!(rig.player.pos.x, 448.0);
    }

    #[test]
    fn test_monster_does_not_block_but_kills() {
        let mut cells = flat(20);
        cells[3].has_monster = true;
        // Hitbox spans x 385..455
        let mut rig = Rig::standing(&cells, 350.0);
        rig.step(RIGHT);
        assert_eq!(rig.player.pos.x, 355.5);
        assert!(rig.player.dead);
        assert_eq!(rig.player.anim.state(), AnimState::Die);
        assert_eq!(
            rig.count(GameEvent::Died {
                cause: DeathCause::Monster
            }),
            1
        );
    }

    #[test]
    fn test_off_screen_death_each_side() {
        let cases = [
            Vec2::new(-31.0, 400.0),   // right edge left of the viewport
            Vec2::new(1311.0, 400.0),  // left edge right of the viewport
            Vec2::new(640.0, -1.0),    // bottom edge above the viewport
            Vec2::new(640.0, 1067.0),  // top edge below the viewport
        ];
        for pos in cases {
            let mut rig = Rig::new(&[], pos);
            rig.step(IDLE);
            assert!(rig.player.dead, "expected death at {pos:?}");
            assert_eq!(
                rig.events,
                vec![GameEvent::Died {
                    cause: DeathCause::FellOffScreen
                }]
            );
        }
    }

    #[test]
    fn test_partially_visible_player_lives() {
        let mut rig = Rig::new(&[], Vec2::new(-29.0, 400.0));
        rig.step(IDLE);
        assert!(!rig.player.dead);
    }

    #[test]
    fn test_off_screen_is_camera_relative() {
        let mut rig = Rig::standing(&flat(40), 969.0);
        rig.camera_x = 1000.0;
        rig.step(IDLE);
        assert!(rig.player.dead);
    }

    #[test]
    fn test_death_is_terminal_and_reported_once() {
        let mut rig = Rig::new(&[], Vec2::new(640.0, 1067.0));
        rig.step(IDLE);
        let frozen = rig.player.pos;
        for _ in 0..30 {
            rig.step(RIGHT);
            rig.step(JUMP);
        }
        assert!(rig.player.dead);
        assert_eq!(rig.player.pos, frozen);
        assert_eq!(rig.events.len(), 1);
        assert_eq!(rig.player.anim.state(), AnimState::Die);
        assert!(rig.player.anim.frame_index() > 0);
    }

    #[test]
    fn test_flight_ignores_gravity_and_ends_on_time() {
        let mut rig = Rig::new(&flat(200), Vec2::new(640.0, 600.0));
        rig.tuning.flight.duration_ticks = 20;
        let mut events = Vec::new();
        assert!(rig.player.start_flight(Vec2::new(640.0, 240.0), &mut events));
        assert!(!rig.player.start_flight(Vec2::new(0.0, 0.0), &mut events));
        assert_eq!(events, vec![GameEvent::FlightStarted]);

        for i in 1..20 {
            rig.step(JUMP);
            assert!(rig.player.flying, "tick {i}");
            assert_eq!(rig.player.pos, Vec2::new(640.0 + 15.0 * i as f32, 240.0));
            assert_eq!(rig.player.anim.state(), AnimState::Fly);
        }

        rig.step(IDLE);
        assert!(!rig.player.flying);
        assert_eq!(rig.player.anim.state(), AnimState::JumpLoop);
        assert_eq!(rig.count(GameEvent::FlightEnded), 1);
        assert_eq!(rig.count(GameEvent::Jumped), 0);

        // Falling resumes on the next tick
        rig.step(IDLE);
        assert_eq!(rig.player.regime(), Regime::Airborne);
        assert!(rig.player.pos.y > 240.0);
        assert_eq!(rig.player.anim.state(), AnimState::JumpLoop);
    }

    #[test]
    fn test_jump_animation_sequence() {
        let mut rig = Rig::standing(&flat(20), 300.0);
        rig.step(JUMP);
        assert_eq!(rig.player.anim.state(), AnimState::JumpStart);

        let mut saw_loop = false;
        for _ in 0..120 {
            rig.step(IDLE);
            if rig.player.anim.state() == AnimState::JumpLoop {
                saw_loop = true;
            }
            if rig.player.grounded {
                break;
            }
        }
        assert!(saw_loop);
        assert_eq!(rig.player.anim.state(), AnimState::JumpEnd);

        for _ in 0..60 {
            rig.step(IDLE);
        }
        assert_eq!(rig.player.anim.state(), AnimState::Idle);
    }

    #[test]
    fn test_landing_while_walking_ends_in_move() {
        let mut rig = Rig::standing(&flat(20), 300.0);
        rig.step(JUMP);
        let mut states = vec![rig.player.anim.state()];
        for _ in 0..120 {
            rig.step(RIGHT);
            let state = rig.player.anim.state();
            if states.last() != Some(&state) {
                states.push(state);
            }
        }
        assert_eq!(
            states,
            vec![
                AnimState::JumpStart,
                AnimState::JumpLoop,
                AnimState::JumpEnd,
                AnimState::Move
            ]
        );
        assert!(rig.player.grounded);
    }

    #[test]
    fn test_monster_hit_stops_resolution() {
        let mut cells = flat(20);
        cells[3].has_monster = true;
        // Falling onto cell 3 ground while inside the monster hitbox
        let mut rig = Rig::new(&cells, Vec2::new(400.0, 595.0));
        rig.player.vel_y = 10.0;
        // Monster first, so the ground under it is never reached
        rig.entities.sort_by_key(|e| e.kind != EntityKind::Monster);
        assert_eq!(rig.entities[0].kind, EntityKind::Monster);

        rig.step(IDLE);
        assert!(rig.player.dead);
        assert!(!rig.player.grounded);
        assert!(rig.player.pos.y > GROUND_TOP);
        assert_eq!(rig.count(GameEvent::Landed), 0);
    }
}
