//! Logger bootstrap
//!
//! Native hosts log through `env_logger` (overridable with `RUST_LOG`), the
//! browser build logs to the devtools console.

#[cfg(not(target_arch = "wasm32"))]
pub fn init(verbose: bool) {
    use env_logger::{Builder, Env};
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    // Fails only when a logger is already installed
    let _ = Builder::from_env(env).try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init(verbose: bool) {
    console_error_panic_hook::set_once();
    let level = if verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);
}
