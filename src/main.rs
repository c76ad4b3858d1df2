//! Lane Runner headless entry point
//!
//! Plays one run with the autopilot and reports how far it got. The browser
//! build drives the simulation through `platform::WasmSession` instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use clap::Parser;

    use lane_runner::sim::{GameEvent, Session, autopilot};
    use lane_runner::{Tuning, logging};

    /// Run the lane runner simulation headless
    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Level seed (defaults to the wall clock)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Level length in cells; zero or less gives an empty level
        #[arg(short, long, default_value_t = 1000, allow_negative_numbers = true)]
        length: i64,

        /// Maximum ticks to simulate
        #[arg(short, long, default_value_t = 3600)]
        ticks: u64,

        /// JSON file with tuning overrides
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Print the final session as JSON
        #[arg(long)]
        dump: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        let tuning = Tuning::from_json(&json)
            .with_context(|| format!("parsing tuning file {}", path.display()))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        logging::init(args.verbose);

        let tuning = load_tuning(args.tuning.as_ref())?;
        let seed = match args.seed {
            Some(seed) => seed,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .context("system clock before epoch")?
                .as_millis() as u64,
        };
        let length = usize::try_from(args.length).unwrap_or(0);

        let mut session = Session::new(seed, length, tuning);
        let mut jumps = 0u32;
        let mut cause = None;
        while session.time_ticks < args.ticks && !session.is_dead() {
            let input = autopilot(&session);
            session.advance(&input);
            for event in session.drain_events() {
                match event {
                    GameEvent::Jumped => jumps += 1,
                    GameEvent::Died { cause: c } => cause = Some(c),
                    _ => {}
                }
            }
        }

        let distance = session.player.pos.x - session.tuning.player.spawn.x;
        match cause {
            Some(cause) => log::info!(
                "Run over after {} ticks: {:?}, distance {:.0}px, {} jumps, {} pickups",
                session.time_ticks,
                cause,
                distance,
                jumps,
                session.pickups_collected
            ),
            None => log::info!(
                "Survived {} ticks: distance {:.0}px, {} jumps, {} pickups",
                session.time_ticks,
                distance,
                jumps,
                session.pickups_collected
            ),
        }

        if args.dump {
            let json = serde_json::to_string_pretty(&session).context("serializing session")?;
            println!("{json}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::WasmSession, this is just to satisfy the compiler
}
