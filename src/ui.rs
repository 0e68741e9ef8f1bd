//! In-game HUD state
//!
//! Fed by simulation events and menu key presses. Holds no rendering; the
//! host reads bar widths, texts and the fade alpha every frame and reacts to
//! the [`HudAction`]s it returns.

use crate::effects::{Approach, EffectSlot, Fade};
use crate::sim::GameEvent;

/// Screen fade duration (seconds); game over uses half of it
pub const FADE_TIME: f32 = 0.5;
/// Health bar fill smoothing time
pub const STATUS_UPDATE_TIME: f32 = 0.5;
/// Score tick-up smoothing time
pub const SCORE_UPDATE_DELAY: f32 = 2.0;

/// Which menu layer is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Game,
    Pause,
    Settings,
    GameOver,
}

/// Requests for the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HudAction {
    /// Freeze the simulation
    Pause,
    /// Unfreeze the simulation
    Resume,
    /// Fade the music out over the given time
    FadeMusic(f32),
    /// The game over fade finished: record the score and show the board
    ShowGameOver { final_score: u64 },
    /// The menu fade finished: leave the arena
    ExitToMenu,
}

/// What to do once the screen is black
#[derive(Debug, Clone, Copy, PartialEq)]
enum FadeContinuation {
    GameOver { final_score: u64 },
    Menu,
}

/// Bar with a smoothed fill and a `value / max` label
#[derive(Debug, Clone)]
pub struct StatusBar {
    value: u32,
    max: u32,
    /// Full width in UI units
    width: f32,
    fill: f32,
    smoothing: EffectSlot<Approach>,
}

impl StatusBar {
    pub fn new(value: u32, max: u32, width: f32) -> Self {
        let mut bar = Self {
            value,
            max,
            width,
            fill: 0.0,
            smoothing: EffectSlot::new(),
        };
        bar.freeze();
        bar
    }

    pub fn update_value(&mut self, value: u32, max: u32) {
        self.value = value;
        self.max = max;
        self.smoothing.start(Approach::new(
            self.fill,
            self.target_fill(),
            STATUS_UPDATE_TIME,
            0.1,
        ));
    }

    pub fn text(&self) -> String {
        format!("{} / {}", self.value, self.max)
    }

    /// Current fill width
    pub fn fill(&self) -> f32 {
        self.fill
    }

    pub fn advance(&mut self, dt: f32) {
        if self.smoothing.poll(dt).is_some() {
            self.freeze();
        } else if let Some(smoothing) = self.smoothing.get() {
            self.fill = smoothing.value;
        }
    }

    /// Jump straight to the final width
    pub fn freeze(&mut self) {
        self.smoothing.cancel();
        self.fill = self.target_fill();
    }

    fn target_fill(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.width * (self.value as f32 / self.max as f32).min(1.0)
    }
}

/// Score label that counts up toward the real score
#[derive(Debug, Clone, Default)]
pub struct ScoreTicker {
    shown: u64,
    target: u64,
    pending: u64,
}

impl ScoreTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_points(&mut self, value: u32) {
        self.target += value as u64;
        self.pending += value as u64;
    }

    pub fn advance(&mut self, dt: f32) {
        if self.pending == 0 {
            return;
        }
        if self.target.abs_diff(self.shown) > 5 {
            let t = (dt / SCORE_UPDATE_DELAY).clamp(0.0, 1.0) as f64;
            let shown = self.shown as f64;
            self.shown = (shown + (self.target as f64 - shown) * t).ceil() as u64;
        } else {
            self.freeze();
        }
    }

    pub fn freeze(&mut self) {
        self.shown = self.target;
        self.pending = 0;
    }

    pub fn shown(&self) -> u64 {
        self.shown
    }

    pub fn score_text(&self) -> String {
        self.shown.to_string()
    }

    /// `+N` for points still being counted in
    pub fn update_text(&self) -> String {
        if self.pending == 0 {
            String::new()
        } else {
            format!("+{}", self.pending)
        }
    }
}

/// HUD and menu state for one run
#[derive(Debug, Clone)]
pub struct Hud {
    state: UiState,
    pub health: StatusBar,
    pub score: ScoreTicker,
    /// Hidden once the game over screen is up
    pub hud_visible: bool,
    /// Set while the settings screen captures a key for rebinding
    pub settings_locked: bool,
    fade: EffectSlot<Fade>,
    continuation: Option<FadeContinuation>,
    final_score: Option<u64>,
}

impl Hud {
    pub fn new(lives: u32, max_lives: u32) -> Self {
        Self {
            state: UiState::Game,
            health: StatusBar::new(lives, max_lives, 1.0),
            score: ScoreTicker::new(),
            hud_visible: true,
            settings_locked: false,
            fade: EffectSlot::new(),
            continuation: None,
            final_score: None,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    /// Final score shown on the game over screen
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Opacity of the black fade overlay, if one is running
    pub fn fade_alpha(&self) -> Option<f32> {
        self.fade.get().map(Fade::alpha)
    }

    pub fn handle_event(&mut self, event: &GameEvent) -> Option<HudAction> {
        match event {
            GameEvent::HealthChanged { lives, max_lives } => {
                self.health.update_value(*lives, *max_lives);
                None
            }
            GameEvent::ScoreChanged { added, .. } => {
                self.score.add_points(*added);
                None
            }
            GameEvent::GameOver { final_score } => {
                let time = FADE_TIME / 2.0;
                self.start_fade(time, FadeContinuation::GameOver {
                    final_score: *final_score,
                });
                Some(HudAction::FadeMusic(time))
            }
            _ => None,
        }
    }

    /// Menu and Cancel presses, per UI layer
    pub fn handle_menu_keys(&mut self, menu_pressed: bool, cancel_pressed: bool) -> Option<HudAction> {
        match self.state {
            UiState::Game if menu_pressed => {
                self.state = UiState::Pause;
                Some(HudAction::Pause)
            }
            UiState::Settings if !self.settings_locked && (menu_pressed || cancel_pressed) => {
                self.state = UiState::Pause;
                None
            }
            UiState::Pause if menu_pressed || cancel_pressed => self.resume(),
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<HudAction> {
        if self.state != UiState::Pause {
            return None;
        }
        self.state = UiState::Game;
        Some(HudAction::Resume)
    }

    pub fn open_settings(&mut self) {
        if self.state == UiState::Pause {
            self.state = UiState::Settings;
        }
    }

    pub fn close_settings(&mut self) {
        if self.state == UiState::Settings {
            self.state = UiState::Pause;
        }
    }

    /// Leave for the main menu: fades music and screen, then reports
    /// [`HudAction::ExitToMenu`] from [`Hud::advance`]
    pub fn exit_to_menu(&mut self) -> Option<HudAction> {
        match self.state {
            UiState::Pause | UiState::GameOver => {
                self.start_fade(FADE_TIME, FadeContinuation::Menu);
                (self.state == UiState::Pause).then_some(HudAction::FadeMusic(FADE_TIME))
            }
            _ => None,
        }
    }

    /// Per frame update (unscaled time, runs while paused)
    pub fn advance(&mut self, dt: f32) -> Option<HudAction> {
        self.health.advance(dt);
        self.score.advance(dt);

        self.fade.poll(dt)?;
        match self.continuation.take()? {
            FadeContinuation::GameOver { final_score } => {
                self.hud_visible = false;
                self.state = UiState::GameOver;
                self.final_score = Some(final_score);
                log::info!("Game over screen, final score {}", final_score);
                Some(HudAction::ShowGameOver { final_score })
            }
            FadeContinuation::Menu => Some(HudAction::ExitToMenu),
        }
    }

    fn start_fade(&mut self, time: f32, continuation: FadeContinuation) {
        self.fade.start(Fade::out(time));
        self.continuation = Some(continuation);
    }
}
