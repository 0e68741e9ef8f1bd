//! Orb Arena entry point
//!
//! Headless runner: plays one run with the autopilot at a fixed frame rate,
//! records the result on the leaderboard and prints a JSON summary.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use serde::Serialize;

    use orb_arena::audio::{AudioManager, LogSink};
    use orb_arena::consts::{MAX_SUBSTEPS, PLAYER_DATA_FILE, SIM_DT};
    use orb_arena::leaderboard::{self, Leaderboard};
    use orb_arena::persistence::PlayerData;
    use orb_arena::platform::keyboard::LocaleDetector;
    use orb_arena::platform::LayoutWatcher;
    use orb_arena::sim::{ArenaState, Autopilot, tick};
    use orb_arena::ui::{Hud, HudAction};
    use orb_arena::{Settings, Tuning};

    /// Host frame rate
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up on runs the autopilot survives for this long (simulated seconds)
    const DEFAULT_MAX_SECONDS: f32 = 600.0;
    /// Leaderboard rows included in the summary
    const BOARD_LINES: usize = 5;

    #[derive(Debug, Serialize)]
    struct RunSummary {
        seed: u64,
        score: u64,
        lives: u32,
        seconds: f32,
        game_over: bool,
        tiles_left: usize,
        orbs_left: usize,
        rank: Option<usize>,
        best: Option<u64>,
        sounds_played: usize,
        leaderboard: Vec<String>,
    }

    fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("ORB_ARENA_TUNING") else {
            return Tuning::default();
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Orb Arena (headless) starting...");

        let data_path =
            std::env::var("ORB_ARENA_DATA").unwrap_or_else(|_| PLAYER_DATA_FILE.to_string());
        let seed = env_or("ORB_ARENA_SEED", leaderboard::unix_now());
        let max_seconds = env_or("ORB_ARENA_MAX_SECONDS", DEFAULT_MAX_SECONDS);

        let mut data = PlayerData::open(data_path);
        let detector = LocaleDetector;
        let mut layout = LayoutWatcher::new(&detector);
        let mut settings = Settings::load(&mut data, layout.current());
        let mut board = Leaderboard::load(&mut data);

        let mut state = ArenaState::new(seed, load_tuning());
        let mut hud = Hud::new(state.lives, state.tuning.arena.max_lives);
        let mut audio = AudioManager::new(settings.mixer_levels(), seed.rotate_left(17));
        let mut sink = LogSink::default();
        let autopilot = Autopilot::new();

        let mut accumulator = 0.0;
        let mut elapsed = 0.0;
        let mut rank = None;
        let mut finished = false;

        while !finished && state.time < max_seconds {
            accumulator += FRAME_DT;
            elapsed += FRAME_DT;

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = autopilot.drive(&state);
                tick(&mut state, &input, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;

                let events = state.drain_events();
                audio.handle_events(&events, &mut sink);
                for event in &events {
                    if let Some(HudAction::FadeMusic(time)) = hud.handle_event(event) {
                        audio.fade_out_music(time);
                    }
                }
            }

            audio.update_falling(
                state.phase,
                state.player.is_grounded(),
                state.player.velocity.y,
                &mut sink,
            );
            audio.advance(FRAME_DT, &mut sink);

            match hud.advance(FRAME_DT) {
                Some(HudAction::ShowGameOver { final_score }) => {
                    rank = Some(board.add_score(final_score, leaderboard::unix_now()));
                    board.save(&mut data);
                    finished = true;
                }
                Some(HudAction::ExitToMenu) => finished = true,
                Some(HudAction::Pause) => state.pause(),
                Some(HudAction::Resume) => state.resume(),
                Some(HudAction::FadeMusic(time)) => audio.fade_out_music(time),
                None => {}
            }

            // Layout changes rebind movement keys, as the settings screen would
            if elapsed >= 0.5 {
                elapsed = 0.0;
                if let Some(new_layout) = layout.poll(&detector) {
                    settings.reload_keys(&mut data, new_layout);
                }
            }
        }

        if !finished {
            log::info!("Stopping after {:.0}s of play", state.time);
        }

        let latest = rank
            .and_then(|r| board.entries.get(r - 1))
            .map(|e| e.timestamp);
        let summary = RunSummary {
            seed,
            score: state.score,
            lives: state.lives,
            seconds: state.time,
            game_over: rank.is_some(),
            tiles_left: state.tiles.len(),
            orbs_left: state.orbs.len(),
            rank,
            best: board.top_score(),
            sounds_played: sink.played,
            leaderboard: board
                .lines(BOARD_LINES, latest)
                .into_iter()
                .map(|line| line.text)
                .collect(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize run summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}
