//! Session state
//!
//! One `Session` is one run: the generated lane, the live entities, the
//! player and the camera. It is built fresh from a seed and a level length
//! and dropped when a new run begins.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Collidable};
use super::entity::{EntityKind, WorldEntity, build_entities};
use super::level::{LaneCell, generate_level};
use super::player::{DeathCause, Player};
use crate::tuning::Tuning;

/// Things that happened during a tick, for audio and presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player left the ground from a jump press
    Jumped,
    /// Player came to rest on ground or an obstacle
    Landed,
    /// Emitted exactly once per run
    Died { cause: DeathCause },
    PickupCollected { entity_id: u32 },
    FlightStarted,
    FlightEnded,
}

/// Complete simulation state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Level seed (0 for hand-built levels)
    pub seed: u64,
    pub tuning: Tuning,
    cells: Vec<LaneCell>,
    /// Live entities in construction order; only pickups are ever removed
    pub(super) entities: Vec<WorldEntity>,
    pub player: Player,
    /// Left edge of the viewport in level space
    pub camera_x: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub pickups_collected: u32,
    /// Events since the last drain
    #[serde(skip)]
    pub(super) events: Vec<GameEvent>,
}

impl Session {
    /// Start a run on a level generated from `seed`
    pub fn new(seed: u64, length: usize, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut session = Self::with_rng(length, tuning, &mut rng);
        session.seed = seed;
        log::info!(
            "Session started: seed={}, cells={}, obstacles={}, monsters={}, pickups={}",
            seed,
            session.cells.len(),
            session.count_kind(EntityKind::Obstacle),
            session.count_kind(EntityKind::Monster),
            session.count_kind(EntityKind::Pickup)
        );
        session
    }

    /// Start a run on a level drawn from any random source
    pub fn with_rng<R: Rng + ?Sized>(length: usize, tuning: Tuning, rng: &mut R) -> Self {
        let cells = generate_level(length, &tuning.level, rng);
        Self::from_cells(cells, tuning)
    }

    /// Start a run on a prepared lane
    pub fn from_cells(cells: Vec<LaneCell>, tuning: Tuning) -> Self {
        let entities = build_entities(&cells, &tuning);
        let player = Player::new(tuning.player.spawn, tuning.player.size);
        Self {
            seed: 0,
            tuning,
            cells,
            entities,
            player,
            camera_x: 0.0,
            time_ticks: 0,
            pickups_collected: 0,
            events: Vec::new(),
        }
    }

    pub fn cells(&self) -> &[LaneCell] {
        &self.cells
    }

    /// Live entities, in level order
    pub fn entities(&self) -> &[WorldEntity] {
        &self.entities
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn level_width(&self) -> f32 {
        self.cells.len() as f32 * self.tuning.cell_width
    }

    /// Furthest the camera may scroll
    pub fn max_camera_x(&self) -> f32 {
        (self.level_width() - self.tuning.viewport.x).max(0.0)
    }

    /// Visible region in level space
    pub fn viewport_box(&self) -> Aabb {
        Aabb::new(Vec2::new(self.camera_x, 0.0), self.tuning.viewport)
    }

    pub fn player_box(&self) -> Aabb {
        self.player.collision_box()
    }

    pub fn is_dead(&self) -> bool {
        self.player.dead
    }

    /// Events raised since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
