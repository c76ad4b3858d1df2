//! Procedural lane generation
//!
//! A level is a row of fixed-width cells. Each cell may carry ground, and a
//! grounded cell may additionally carry an obstacle, a monster or a pickup.
//! The rules keep every layout fair:
//! - the first cells always have ground so the player spawns safely
//! - gaps are at most `max_ground_gap` cells wide
//! - obstacles never sit next to each other, nor do monsters
//! - a cell never holds both an obstacle and a monster
//! - monsters never sit on the first or last cell of a ground run

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One horizontal slot of the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneCell {
    /// Position in the level, 0-based
    pub index: usize,
    pub has_ground: bool,
    pub has_obstacle: bool,
    pub has_monster: bool,
    pub has_pickup: bool,
}

/// Generator probabilities and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelRules {
    /// Leading cells that always have ground
    pub safe_spawn_cells: usize,
    /// Longest allowed run of ground-less cells
    pub max_ground_gap: usize,
    pub ground_chance: f32,
    pub obstacle_chance: f32,
    pub monster_chance: f32,
    pub pickup_chance: f32,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            safe_spawn_cells: SAFE_SPAWN_CELLS,
            max_ground_gap: MAX_GROUND_GAP,
            ground_chance: GROUND_CHANCE,
            obstacle_chance: OBSTACLE_CHANCE,
            monster_chance: MONSTER_CHANCE,
            pickup_chance: PICKUP_CHANCE,
        }
    }
}

/// Generate `length` lane cells
///
/// Deterministic for a given RNG stream. The pickup roll is drawn for every
/// cell so the stream does not depend on ground placement, but the flag only
/// sticks on grounded cells.
pub fn generate_level<R: Rng + ?Sized>(length: usize, rules: &LevelRules, rng: &mut R) -> Vec<LaneCell> {
    let mut cells: Vec<LaneCell> = Vec::with_capacity(length);
    let mut gap_streak = 0usize;

    for index in 0..length {
        let prev = cells.last().copied().unwrap_or_default();

        let has_ground = if index < rules.safe_spawn_cells || gap_streak >= rules.max_ground_gap {
            true
        } else {
            rng.random::<f32>() < rules.ground_chance
        };
        gap_streak = if has_ground { 0 } else { gap_streak + 1 };

        let has_obstacle =
            has_ground && !prev.has_obstacle && rng.random::<f32>() < rules.obstacle_chance;

        let has_monster = has_ground
            && !has_obstacle
            && !prev.has_monster
            && rng.random::<f32>() < rules.monster_chance;

        let pickup_roll = rng.random::<f32>() < rules.pickup_chance;

        cells.push(LaneCell {
            index,
            has_ground,
            has_obstacle,
            has_monster,
            has_pickup: has_ground && pickup_roll,
        });
    }

    clear_monsters_at_run_edges(&mut cells);

    log::debug!(
        "Generated {} cells: {} ground, {} obstacles, {} monsters, {} pickups",
        cells.len(),
        cells.iter().filter(|c| c.has_ground).count(),
        cells.iter().filter(|c| c.has_obstacle).count(),
        cells.iter().filter(|c| c.has_monster).count(),
        cells.iter().filter(|c| c.has_pickup).count(),
    );

    cells
}

/// Monsters on the first or last cell of a ground run leave no reaction time
fn clear_monsters_at_run_edges(cells: &mut [LaneCell]) {
    // Only monster flags change, so run edges stay stable during the pass
    for index in 0..cells.len() {
        if is_run_edge(cells, index) {
            cells[index].has_monster = false;
        }
    }
}

/// True when `index` is the first or last cell of its ground run
pub fn is_run_edge(cells: &[LaneCell], index: usize) -> bool {
    let Some(cell) = cells.get(index) else {
        return false;
    };
    if !cell.has_ground {
        return false;
    }
    let before = index.checked_sub(1).and_then(|i| cells.get(i));
    let after = cells.get(index + 1);
    !before.is_some_and(|c| c.has_ground) || !after.is_some_and(|c| c.has_ground)
}
