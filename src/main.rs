//! PARM Blaster headless runner
//!
//! Plays one demo-mode session against on-disk storage and prints the
//! leaderboard. Useful for soak-testing the simulation without a browser.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs::{self, OpenOptions};
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;
    use parm_blaster::GameError;
    use parm_blaster::highscores::ScoreKeeper;
    use parm_blaster::persistence::{FileStorage, JsonLinesOutbox, Storage};
    use parm_blaster::platform::{Clock, FontFiles, ManualClock, SystemClock};
    use parm_blaster::settings::Settings;
    use parm_blaster::sim::{GameEvent, Session, SessionPhase, TickInput};

    /// Frames before a stuck demo run is abandoned (about 30 minutes at 60 Hz)
    const MAX_FRAMES: u64 = 60 * 60 * 30;

    #[derive(Parser, Debug)]
    #[command(name = "parm-blaster")]
    #[command(about = "Plays one demo-mode PARM Blaster session and prints the leaderboard")]
    pub struct Args {
        /// Name recorded on the leaderboard
        #[arg(default_value = "Demo")]
        pub name: String,
        /// Fixed RNG seed (random when omitted)
        #[arg(long)]
        pub seed: Option<u64>,
        /// Directory holding settings, high scores and the submission outbox
        #[arg(long, default_value = "parm-data")]
        pub data_dir: PathBuf,
        /// Pace frames against the wall clock instead of a manual 60 Hz clock
        #[arg(long)]
        pub realtime: bool,
    }

    pub fn run(args: Args) -> Result<(), GameError> {
        fs::create_dir_all(&args.data_dir)
            .map_err(|e| GameError::storage(&args.data_dir.display().to_string(), e))?;

        let mut storage = FileStorage::new(&args.data_dir);
        let settings = Settings::load(&storage);
        if storage.get_item(Settings::STORAGE_KEY)?.is_none() {
            settings.save(&mut storage)?;
        }

        let outbox_path = args.data_dir.join("submissions.jsonl");
        let outbox = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&outbox_path)
            .map_err(|e| GameError::storage("submissions.jsonl", e))?;
        let scores = ScoreKeeper::new(
            Box::new(FileStorage::new(&args.data_dir)),
            Box::new(JsonLinesOutbox::new(outbox)),
        );

        let field = Vec2::new(1280.0, 800.0);
        let mut session = match args.seed {
            Some(seed) => Session::with_seed(field, settings, scores, seed),
            None => Session::new(field, settings, scores),
        };
        let mut fonts = FontFiles::new([args.data_dir.join("fonts/Matemasie-Regular.ttf")]);
        session.start(&args.name, &mut fonts)?;

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut manual = ManualClock::new(ManualClock::FRAME_60HZ_MS);
        let system = SystemClock::new();
        let frame = std::time::Duration::from_secs_f64(ManualClock::FRAME_60HZ_MS / 1000.0);

        let mut frames = 0u64;
        while session.phase() != SessionPhase::Leaderboard {
            if frames >= MAX_FRAMES {
                log::warn!("Giving up after {} frames", frames);
                break;
            }
            let now = if args.realtime {
                std::thread::sleep(frame);
                system.now_ms()
            } else {
                manual.next_frame()
            };
            session.frame(now, &input);
            frames += 1;

            for event in session.drain_events() {
                match event {
                    GameEvent::PlayerHit { lives } => log::info!("Hit! {} lives left", lives),
                    GameEvent::PhaseChanged { phase } => log::debug!("Now {}", phase.as_str()),
                    GameEvent::SessionEnded { name, score } => {
                        println!("{} scored {} after {} frames", name, score, frames)
                    }
                    _ => {}
                }
            }
        }

        let snapshot = session.snapshot();
        if let Some(rank) = snapshot.rank {
            println!("New high score! Rank #{}", rank);
        }
        println!("\nHIGH SCORES");
        for (i, entry) in session.scores().board().entries.iter().enumerate() {
            println!("{:>2}. {:<16} {:>6}", i + 1, entry.name, entry.score);
        }
        log::info!("Submission written to {}", outbox_path.display());
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("PARM Blaster (native) starting...");

    let args = native::Args::parse();
    if let Err(e) = native::run(args) {
        log::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Session` directly; nothing to do here
}
