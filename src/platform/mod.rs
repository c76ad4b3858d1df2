//! Platform abstraction layer
//!
//! Browser host facade. The JS side owns the canvas, sprite sheets, audio and
//! key polling; it feeds held keys in once per frame and reads the state back.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::WasmSession;
