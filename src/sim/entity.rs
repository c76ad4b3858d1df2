//! World entities built from lane cells
//!
//! Ground, obstacles, monsters and pickups share one shape: a draw anchor, a
//! collision box and a kind tag. Behaviour differs only where the player and
//! session dispatch on [`EntityKind`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Collidable};
use super::level::LaneCell;
use crate::tuning::Tuning;

/// Entity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Walkable lane segment
    Ground,
    /// Solid block standing on ground
    Obstacle,
    /// Kills on contact
    Monster,
    /// Consumed on contact, grants flight
    Pickup,
}

impl EntityKind {
    /// Whether the player can stand on top of this entity
    pub fn is_platform(self) -> bool {
        matches!(self, EntityKind::Ground | EntityKind::Obstacle)
    }

    /// Whether this entity stops horizontal movement
    ///
    /// Monsters and pickups let the player walk into them so their contact
    /// effects can fire.
    pub fn blocks_movement(self) -> bool {
        self.is_platform()
    }
}

/// A placed entity in level space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEntity {
    pub id: u32,
    pub kind: EntityKind,
    /// Lane cell this entity was built from
    pub cell: usize,
    /// Top-left corner of the sprite
    pub draw_pos: Vec2,
    /// Hitbox, independent of the sprite
    pub collision: Aabb,
}

impl Collidable for WorldEntity {
    fn collision_box(&self) -> Aabb {
        self.collision
    }
}

/// Build the live entity list for a level
///
/// Per grounded cell, in order: ground, then obstacle, monster and pickup if
/// flagged. Ids are assigned sequentially from 1.
pub fn build_entities(cells: &[LaneCell], tuning: &Tuning) -> Vec<WorldEntity> {
    let layout = &tuning.sprites;
    let ground_y = tuning.viewport.y - layout.ground.y;

    let mut entities = Vec::with_capacity(cells.len() * 2);
    let mut next_id = 1u32;
    let mut push = |kind, cell, draw_pos, collision| {
        entities.push(WorldEntity {
            id: next_id,
            kind,
            cell,
            draw_pos,
            collision,
        });
        next_id += 1;
    };

    for cell in cells.iter().filter(|c| c.has_ground) {
        let x = cell.index as f32 * tuning.cell_width;

        let ground_pos = Vec2::new(x, ground_y);
        push(EntityKind::Ground, cell.index, ground_pos, Aabb::new(ground_pos, layout.ground));

        if cell.has_obstacle {
            let pos = Vec2::new(x, ground_y - layout.obstacle.y);
            push(EntityKind::Obstacle, cell.index, pos, Aabb::new(pos, layout.obstacle));
        }

        if cell.has_monster {
            let pos = Vec2::new(x, ground_y - layout.monster_sprite.y);
            let hitbox = Aabb::new(pos + layout.monster_box_offset, layout.monster_box);
            push(EntityKind::Monster, cell.index, pos, hitbox);
        }

        if cell.has_pickup {
            let pos = Vec2::new(x, layout.pickup_y);
            push(EntityKind::Pickup, cell.index, pos, Aabb::new(pos, layout.pickup));
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(index: usize) -> LaneCell {
        LaneCell {
            index,
            has_ground: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ground_sits_on_viewport_bottom() {
        let tuning = Tuning::default();
        let entities = build_entities(&[cell(0), cell(3)], &tuning);
        assert_eq!(entities.len(), 2);

        let ground = &entities[1];
        assert_eq!(ground.kind, EntityKind::Ground);
        assert_eq!(ground.cell, 3);
        assert_eq!(ground.draw_pos, Vec2::new(360.0, 600.0));
        assert_eq!(ground.collision.bottom(), tuning.viewport.y);
        assert_eq!(ground.collision.top(), 600.0);
    }

    #[test]
    fn test_groundless_cells_emit_nothing() {
        let tuning = Tuning::default();
        let floating = LaneCell {
            index: 0,
            has_ground: false,
            has_pickup: true,
            ..Default::default()
        };
        assert!(build_entities(&[floating], &tuning).is_empty());
    }

    #[test]
    fn test_obstacle_stacks_on_ground() {
        let tuning = Tuning::default();
        let entities = build_entities(
            &[LaneCell {
                has_obstacle: true,
                ..cell(1)
            }],
            &tuning,
        );
        let obstacle = &entities[1];
        assert_eq!(obstacle.kind, EntityKind::Obstacle);
        assert_eq!(obstacle.collision.bottom(), entities[0].collision.top());
        assert_eq!(obstacle.collision.left(), 120.0);
        assert_eq!(obstacle.draw_pos, obstacle.collision.min);
    }

    #[test]
    fn test_monster_hitbox_is_inset() {
        let tuning = Tuning::default();
        let entities = build_entities(
            &[LaneCell {
                has_monster: true,
                ..cell(2)
            }],
            &tuning,
        );
        let monster = &entities[1];
        assert_eq!(monster.kind, EntityKind::Monster);
        assert_eq!(monster.draw_pos, Vec2::new(240.0, 430.0));
        assert_eq!(monster.collision.min, Vec2::new(265.0, 442.0));
        assert_eq!(monster.collision.size(), Vec2::new(70.0, 145.0));
        // Hazard stays inside the sprite and above the ground
        assert!(monster.collision.bottom() <= entities[0].collision.top());
    }

    #[test]
    fn test_pickup_height_is_fixed() {
        let tuning = Tuning::default();
        let entities = build_entities(
            &[LaneCell {
                has_pickup: true,
                ..cell(5)
            }],
            &tuning,
        );
        let pickup = &entities[1];
        assert_eq!(pickup.kind, EntityKind::Pickup);
        assert_eq!(pickup.collision.top(), 120.0);
        assert_eq!(pickup.collision.left(), 600.0);
    }

    #[test]
    fn test_ids_are_sequential() {
        let tuning = Tuning::default();
        let cells = [
            LaneCell {
                has_obstacle: true,
                has_pickup: true,
                ..cell(0)
            },
            cell(1),
        ];
        let ids: Vec<u32> = build_entities(&cells, &tuning).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_only_platforms_block() {
        assert!(EntityKind::Ground.blocks_movement());
        assert!(EntityKind::Obstacle.blocks_movement());
        assert!(!EntityKind::Monster.blocks_movement());
        assert!(!EntityKind::Pickup.blocks_movement());
    }
}
