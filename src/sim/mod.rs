//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entity construction order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod entity;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;

pub use animation::{AnimState, Animator, Clip, ClipTable};
pub use collision::{Aabb, Collidable, check_collision};
pub use entity::{EntityKind, WorldEntity, build_entities};
pub use level::{LaneCell, LevelRules, generate_level, is_run_edge};
pub use player::{DeathCause, Facing, Player, Regime, Surroundings};
pub use state::{GameEvent, Session};
pub use tick::{TickInput, autopilot, tick};
