//! Player animation playback
//!
//! The renderer owns the sprite sheets; the simulation only tracks which clip
//! is playing and a fractional frame cursor. Clip metadata is configuration
//! keyed by state, so the state machine never branches on presentation
//! details. A state without a clip simply does not advance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Animation states of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnimState {
    Idle,
    Move,
    /// Take-off transition (plays once)
    JumpStart,
    /// Airborne loop
    JumpLoop,
    /// Landing transition (plays once)
    JumpEnd,
    Die,
    Fly,
}

impl AnimState {
    pub const ALL: [AnimState; 7] = [
        AnimState::Idle,
        AnimState::Move,
        AnimState::JumpStart,
        AnimState::JumpLoop,
        AnimState::JumpEnd,
        AnimState::Die,
        AnimState::Fly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimState::Idle => "Idle",
            AnimState::Move => "Move",
            AnimState::JumpStart => "JumpStart",
            AnimState::JumpLoop => "JumpLoop",
            AnimState::JumpEnd => "JumpEnd",
            AnimState::Die => "Die",
            AnimState::Fly => "Fly",
        }
    }
}

/// Playback metadata for one state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub frame_count: u32,
    /// Playback speed in frames per simulated second
    pub fps: f32,
    pub looping: bool,
    /// Vertical draw-origin offset from the frame bottom (positive is up)
    pub origin_offset_y: f32,
}

impl Clip {
    pub const fn new(frame_count: u32, fps: f32, looping: bool, origin_offset_y: f32) -> Self {
        Self {
            frame_count,
            fps,
            looping,
            origin_offset_y,
        }
    }
}

/// Clip metadata keyed by state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipTable {
    clips: BTreeMap<AnimState, Clip>,
}

impl Default for ClipTable {
    fn default() -> Self {
        let clips = [
            (AnimState::Idle, Clip::new(39, 20.0, true, 22.0)),
            (AnimState::Move, Clip::new(26, 20.0, true, 45.0)),
            (AnimState::JumpStart, Clip::new(10, 27.0, false, 16.0)),
            (AnimState::JumpLoop, Clip::new(1, 1.0, true, 35.0)),
            (AnimState::JumpEnd, Clip::new(7, 27.0, false, 13.0)),
            (AnimState::Die, Clip::new(30, 20.0, false, 18.0)),
            (AnimState::Fly, Clip::new(22, 20.0, true, 0.0)),
        ];
        Self {
            clips: clips.into_iter().collect(),
        }
    }
}

impl ClipTable {
    /// Table with no clips at all
    pub fn empty() -> Self {
        Self {
            clips: BTreeMap::new(),
        }
    }

    pub fn get(&self, state: AnimState) -> Option<&Clip> {
        self.clips.get(&state)
    }

    /// Replace (or with `None`, remove) the clip of a state
    pub fn set(&mut self, state: AnimState, clip: Option<Clip>) {
        match clip {
            Some(clip) => {
                self.clips.insert(state, clip);
            }
            None => {
                self.clips.remove(&state);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimState, &Clip)> {
        self.clips.iter().map(|(state, clip)| (*state, clip))
    }
}

/// Current clip and frame cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animator {
    state: AnimState,
    /// Fractional frame position
    cursor: f32,
    /// One-shot clip ran past its last frame
    finished: bool,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimState::Idle)
    }
}

impl Animator {
    pub fn new(state: AnimState) -> Self {
        Self {
            state,
            cursor: 0.0,
            finished: false,
        }
    }

    pub fn state(&self) -> AnimState {
        self.state
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Frame the renderer should draw
    pub fn frame_index(&self) -> u32 {
        self.cursor.max(0.0) as u32
    }

    /// Switch clips; re-entering the current state keeps the cursor
    pub fn set_state(&mut self, state: AnimState) {
        if self.state != state {
            self.state = state;
            self.cursor = 0.0;
            self.finished = false;
        }
    }

    /// Step the cursor by one tick
    ///
    /// Looping clips wrap, one-shot clips hold their last frame.
    pub fn advance(&mut self, clips: &ClipTable, tick_rate: f32) {
        let Some(clip) = clips.get(self.state) else {
            return;
        };
        if tick_rate <= 0.0 || clip.frame_count == 0 {
            return;
        }

        let frames = clip.frame_count as f32;
        self.cursor += clip.fps / tick_rate;
        if self.cursor >= frames {
            if clip.looping {
                self.cursor %= frames;
            } else {
                self.cursor = frames - 1.0;
                self.finished = true;
            }
        }
    }

    /// One-shot clip has played through (looping clips never finish)
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Draw-origin offset of the current clip
    pub fn origin_offset_y(&self, clips: &ClipTable) -> f32 {
        clips.get(self.state).map_or(0.0, |clip| clip.origin_offset_y)
    }
}
