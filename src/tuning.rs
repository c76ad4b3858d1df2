//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so hosts can override any
//! subset from JSON without touching the core.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::animation::{AnimState, ClipTable};
use crate::sim::level::LevelRules;

/// Errors raised while loading a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Player physics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Collision box (width, height)
    pub size: Vec2,
    /// Walk speed (px/tick)
    pub speed: f32,
    /// Gravity (px/tick²)
    pub gravity: f32,
    /// Jump launch velocity, negative is up
    pub jump_speed: f32,
    /// Bottom-centre spawn point
    pub spawn: Vec2,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            spawn: Vec2::new(VIEWPORT_WIDTH / 2.0, VIEWPORT_HEIGHT / 2.0),
        }
    }
}

/// Pickup-triggered flight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    pub speed: f32,
    pub duration_ticks: u32,
    /// Height the player is moved to when flight starts
    pub anchor_y: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            speed: FLY_SPEED,
            duration_ticks: FLY_DURATION_TICKS,
            anchor_y: FLY_ANCHOR_Y,
        }
    }
}

/// Camera scroll speeds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub speed: f32,
    pub fly_speed: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            speed: CAMERA_SPEED,
            fly_speed: CAMERA_FLY_SPEED,
        }
    }
}

/// Entity footprints used when building the world from lane cells
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteLayout {
    pub ground: Vec2,
    pub obstacle: Vec2,
    pub monster_sprite: Vec2,
    pub monster_box_offset: Vec2,
    pub monster_box: Vec2,
    pub pickup: Vec2,
    pub pickup_y: f32,
}

impl Default for SpriteLayout {
    fn default() -> Self {
        let v = |(x, y): (f32, f32)| Vec2::new(x, y);
        Self {
            ground: v(GROUND_SIZE),
            obstacle: v(OBSTACLE_SIZE),
            monster_sprite: v(MONSTER_SPRITE_SIZE),
            monster_box_offset: v(MONSTER_BOX_OFFSET),
            monster_box: v(MONSTER_BOX_SIZE),
            pickup: v(PICKUP_SIZE),
            pickup_y: PICKUP_Y,
        }
    }
}

/// Complete simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ticks per simulated second (drives animation playback)
    pub tick_rate: f32,
    /// Visible play-field (width, height)
    pub viewport: Vec2,
    /// Horizontal size of one lane cell
    pub cell_width: f32,
    pub player: PlayerTuning,
    pub flight: FlightTuning,
    pub camera: CameraTuning,
    pub sprites: SpriteLayout,
    pub level: LevelRules,
    pub clips: ClipTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            cell_width: CELL_WIDTH,
            player: PlayerTuning::default(),
            flight: FlightTuning::default(),
            camera: CameraTuning::default(),
            sprites: SpriteLayout::default(),
            level: LevelRules::default(),
            clips: ClipTable::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("tick_rate", self.tick_rate)?;
        positive("viewport.x", self.viewport.x)?;
        positive("viewport.y", self.viewport.y)?;
        positive("cell_width", self.cell_width)?;
        positive("player.size.x", self.player.size.x)?;
        positive("player.size.y", self.player.size.y)?;
        finite("player.speed", self.player.speed)?;
        finite("player.gravity", self.player.gravity)?;
        finite("player.jump_speed", self.player.jump_speed)?;
        finite("flight.speed", self.flight.speed)?;
        finite("flight.anchor_y", self.flight.anchor_y)?;
        finite("camera.speed", self.camera.speed)?;
        finite("camera.fly_speed", self.camera.fly_speed)?;

        let sprites = &self.sprites;
        for (field, size) in [
            ("sprites.ground", sprites.ground),
            ("sprites.obstacle", sprites.obstacle),
            ("sprites.monster_sprite", sprites.monster_sprite),
            ("sprites.monster_box", sprites.monster_box),
            ("sprites.pickup", sprites.pickup),
        ] {
            positive(field, size.x)?;
            positive(field, size.y)?;
        }

        let level = &self.level;
        for (field, p) in [
            ("level.ground_chance", level.ground_chance),
            ("level.obstacle_chance", level.obstacle_chance),
            ("level.monster_chance", level.monster_chance),
            ("level.pickup_chance", level.pickup_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("probability {p} outside [0, 1]"),
                });
            }
        }

        for (state, clip) in self.clips.iter() {
            if clip.frame_count == 0 || !clip.fps.is_finite() || clip.fps < 0.0 {
                return Err(TuningError::Invalid {
                    field: "clips",
                    reason: format!("clip for {} needs frames and a finite speed", state.as_str()),
                });
            }
        }

        for state in AnimState::ALL {
            if self.clips.get(state).is_none() {
                log::warn!("No clip for {}, its animation will not advance", state.as_str());
            }
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("{value} is not finite"),
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("{value} must be positive"),
        })
    }
}
