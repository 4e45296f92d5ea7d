//! MIDI Bird entry point
//!
//! Native builds run a headless demo: the autopilot plays through the same
//! session a real input device would drive, with records kept in a JSON file.
//! The browser build is driven from JavaScript through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;

    use midibird::consts::SIM_DT;
    use midibird::demo::Autopilot;
    use midibird::persistence::FileStore;
    use midibird::sim::GameEvent;
    use midibird::{Difficulty, InputBinding, Session, Settings};

    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    struct CliArgs {
        /// Simulated time to play, in seconds.
        #[arg(long, value_name = "SECONDS", default_value_t = 60.0)]
        seconds: f32,
        /// Difficulty preset (relaxed, normal or hard).
        #[arg(long, value_name = "PRESET", value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,
        /// Fixed RNG seed for a reproducible run.
        #[arg(long)]
        seed: Option<u64>,
        /// Resume from the last passed obstacle after a crash.
        #[arg(long)]
        checkpoints: bool,
        /// JSON file holding records and settings.
        #[arg(long, value_name = "PATH", default_value = "midibird.json")]
        store: PathBuf,
        /// Write the effective settings back to the store.
        #[arg(long)]
        save_settings: bool,
        /// Label of the input source to display.
        #[arg(long, value_name = "LABEL", default_value = "Autopilot")]
        input: String,
    }

    fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
        Difficulty::parse(s).ok_or_else(|| format!("unknown difficulty `{}`", s))
    }

    /// Stored settings with the command-line overrides applied
    fn effective_settings(args: &CliArgs, store: &mut FileStore) -> anyhow::Result<Settings> {
        let mut settings = Settings::load(&*store);
        if let Some(preset) = args.difficulty {
            settings.apply_preset(preset);
        }
        if args.seed.is_some() {
            settings.seed = args.seed;
        }
        settings.checkpoints |= args.checkpoints;
        if args.save_settings {
            settings
                .save(store)
                .with_context(|| format!("saving settings to {}", args.store.display()))?;
        }
        Ok(settings)
    }

    pub fn run() -> anyhow::Result<()> {
        env_logger::init();
        let args = CliArgs::parse();
        log::info!("MIDI Bird (native demo) starting...");

        let mut store = FileStore::new(&args.store);
        let settings = effective_settings(&args, &mut store)?;

        let binding = InputBinding::new(args.input).context("binding input source")?;
        let mut session = Session::new(settings, binding, Box::new(store)).with_probe();
        session.subscribe(|event| match event {
            GameEvent::LevelUp { level } => log::info!("Reached level {}", level),
            GameEvent::GameOver { score } => println!("Crashed with score {}", score),
            _ => {}
        });

        let sender = session.trigger_sender();
        let mut pilot = Autopilot::new();
        let ticks = (args.seconds.max(0.0) / SIM_DT).round() as u64;
        let mut best = 0;
        for _ in 0..ticks {
            if let Some(event) = pilot.decide(session.state()) {
                sender.send(event);
            }
            session.tick(SIM_DT, &[]);
            best = best.max(session.score());
        }

        let records = session.records();
        println!(
            "Played {:.1}s as `{}`: best score {}, {} hops. Records: score {}, level {}",
            args.seconds,
            session.input_label(),
            best,
            pilot.hops(),
            records.highest_score,
            records.highest_level
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
