use wasm_bindgen::prelude::*;

use crate::Tuning;
use crate::sim::{GameEvent, Session, TickInput};

/// One run, exposed to JavaScript
#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
}

#[wasm_bindgen]
impl WasmSession {
    /// Start a run; without a seed the wall clock is used
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>, length: i32) -> WasmSession {
        crate::logging::init(false);
        let seed = seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let length = usize::try_from(length).unwrap_or(0);
        WasmSession {
            session: Session::new(seed, length, Tuning::default()),
        }
    }

    /// Start a run with tuning overrides given as JSON
    #[wasm_bindgen(js_name = withTuning)]
    pub fn with_tuning(seed: u64, length: i32, tuning_json: &str) -> Result<WasmSession, JsValue> {
        crate::logging::init(false);
        let tuning = Tuning::from_json(tuning_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let length = usize::try_from(length).unwrap_or(0);
        Ok(WasmSession {
            session: Session::new(seed, length, tuning),
        })
    }

    /// Run one tick with the held keys
    pub fn advance(&mut self, left: bool, right: bool, jump: bool) {
        self.session.advance(&TickInput { left, right, jump });
    }

    #[wasm_bindgen(getter)]
    pub fn seed(&self) -> u64 {
        self.session.seed
    }

    #[wasm_bindgen(getter, js_name = playerX)]
    pub fn player_x(&self) -> f32 {
        self.session.player.pos.x
    }

    #[wasm_bindgen(getter, js_name = playerY)]
    pub fn player_y(&self) -> f32 {
        self.session.player.pos.y
    }

    #[wasm_bindgen(getter, js_name = facingLeft)]
    pub fn facing_left(&self) -> bool {
        self.session.player.facing == crate::sim::Facing::Left
    }

    #[wasm_bindgen(getter, js_name = animState)]
    pub fn anim_state(&self) -> String {
        self.session.player.anim.state().as_str().to_string()
    }

    #[wasm_bindgen(getter, js_name = animFrame)]
    pub fn anim_frame(&self) -> u32 {
        self.session.player.anim.frame_index()
    }

    #[wasm_bindgen(getter, js_name = cameraX)]
    pub fn camera_x(&self) -> f32 {
        self.session.camera_x
    }

    #[wasm_bindgen(getter)]
    pub fn dead(&self) -> bool {
        self.session.is_dead()
    }

    #[wasm_bindgen(getter)]
    pub fn flying(&self) -> bool {
        self.session.player.flying
    }

    /// Names of events raised since the last call
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Vec<String> {
        self.session
            .drain_events()
            .into_iter()
            .map(|event| match event {
                GameEvent::Jumped => "jumped".to_string(),
                GameEvent::Landed => "landed".to_string(),
                GameEvent::Died { .. } => "died".to_string(),
                GameEvent::PickupCollected { .. } => "pickup".to_string(),
                GameEvent::FlightStarted => "flightStarted".to_string(),
                GameEvent::FlightEnded => "flightEnded".to_string(),
            })
            .collect()
    }

    /// Full snapshot for the renderer
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
