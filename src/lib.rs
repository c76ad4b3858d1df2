//! Lane Runner - simulation core of an endless side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, collisions, player, session)
//! - `tuning`: Data-driven game balance
//! - `logging`: Logger bootstrap for native and web hosts
//! - `platform`: Browser host facade (wasm32 only)
//!
//! Rendering, audio and input polling are left to the host. The host samples
//! [`sim::TickInput`] once per frame, calls [`sim::Session::advance`] and reads
//! the resulting positions, animation state and [`sim::GameEvent`]s.

pub mod logging;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Reference values for [`Tuning::default`]
///
/// Units are pixels and ticks. Y grows downward, the origin is the top-left of
/// the level.
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: f32 = 60.0;

    /// Visible play-field
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Width of one lane cell
    pub const CELL_WIDTH: f32 = 120.0;

    /// Player collision box (origin at its bottom-centre)
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 346.0;
    /// Horizontal walk speed (px/tick)
    pub const PLAYER_SPEED: f32 = 5.5;
    /// Downward acceleration (px/tick²)
    pub const GRAVITY: f32 = 0.6;
    /// Launch velocity of a jump (negative = up)
    pub const JUMP_SPEED: f32 = -18.0;

    /// Flight after touching a pickup
    pub const FLY_SPEED: f32 = 15.0;
    pub const FLY_DURATION_TICKS: u32 = 300;
    pub const FLY_ANCHOR_Y: f32 = 240.0;

    /// Camera scroll (px/tick)
    pub const CAMERA_SPEED: f32 = 5.0;
    pub const CAMERA_FLY_SPEED: f32 = 15.0;

    /// Sprite footprints
    pub const GROUND_SIZE: (f32, f32) = (CELL_WIDTH, 120.0);
    pub const OBSTACLE_SIZE: (f32, f32) = (120.0, 120.0);
    pub const MONSTER_SPRITE_SIZE: (f32, f32) = (120.0, 170.0);
    /// Monster hazard box is smaller than, and inset into, its sprite
    pub const MONSTER_BOX_OFFSET: (f32, f32) = (25.0, 12.0);
    pub const MONSTER_BOX_SIZE: (f32, f32) = (70.0, 145.0);
    pub const PICKUP_SIZE: (f32, f32) = (120.0, 120.0);
    /// Pickups float at a fixed height regardless of ground
    pub const PICKUP_Y: f32 = 120.0;

    /// Level generator
    pub const SAFE_SPAWN_CELLS: usize = 10;
    pub const MAX_GROUND_GAP: usize = 2;
    pub const GROUND_CHANCE: f32 = 0.8;
    pub const OBSTACLE_CHANCE: f32 = 0.1;
    pub const MONSTER_CHANCE: f32 = 0.05;
    pub const PICKUP_CHANCE: f32 = 0.03;
}
