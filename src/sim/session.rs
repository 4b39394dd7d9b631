//! Game session lifecycle
//!
//! Idle → Countdown → Running → Ending → Leaderboard → (play again) → Idle.
//!
//! The host calls [`Session::frame`] once per display refresh with the
//! current wall-clock time. Due timers fire first, then the phase's
//! per-frame work runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::DifficultyRatchet;
use super::spawner;
use super::state::{
    Bullet, EnemyProjectile, EnemySprite, Explosion, ExplosionKind, GameEvent, GameState, Player,
    TimerEvent,
};
use super::tick::{self, TickInput};
use crate::GameError;
use crate::consts::*;
use crate::highscores::{HighScoreEntry, ScoreKeeper};
use crate::platform::Assets;
use crate::settings::Settings;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for a player name
    Idle,
    /// 3, 2, 1, GO! (no simulation)
    Countdown,
    /// Simulation active
    Running,
    /// Final explosion and game over text, no damage
    Ending,
    /// Score recorded, entries on screen
    Leaderboard,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Countdown => "counting down",
            SessionPhase::Running => "running",
            SessionPhase::Ending => "ending",
            SessionPhase::Leaderboard => "showing the leaderboard",
        }
    }
}

/// Steps of the ending sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndingStage {
    /// Final explosion growing over the player
    FinalExplosion,
    /// Blank pause after the explosion
    Pause,
    /// "GAME OVER" fading in
    GameOverFade,
    /// Text fully shown, waiting for the leaderboard
    Linger,
}

/// Read-only view of a session for renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub player_name: String,
    pub field: Vec2,
    pub player: Player,
    pub player_hitbox: Rect,
    pub bullets: Vec<Bullet>,
    pub sprites: Vec<EnemySprite>,
    pub projectiles: Vec<EnemyProjectile>,
    pub explosions: Vec<Explosion>,
    pub score: u64,
    pub lives: u32,
    pub difficulty: DifficultyRatchet,
    pub can_fire: bool,
    /// "3", "2", "1", "GO!" while counting down
    pub countdown: Option<String>,
    pub ending: Option<EndingStage>,
    /// Game over text opacity (0-1)
    pub game_over_opacity: f32,
    /// Fonts failed to load; render with fallbacks
    pub fallback_assets: bool,
    /// Entries, only in the leaderboard phase
    pub leaderboard: Option<Vec<HighScoreEntry>>,
    /// Rank of this session's score, once recorded
    pub rank: Option<usize>,
}

/// One game session: owns the play field, the counters, every timer and
/// the lifecycle phase
pub struct Session {
    state: GameState,
    phase: SessionPhase,
    player_name: String,
    countdown: i32,
    ending: EndingStage,
    game_over_opacity: f32,
    fallback_assets: bool,
    rank: Option<usize>,
    scores: ScoreKeeper,
}

impl Session {
    /// Create an idle session with a random seed
    pub fn new(field: Vec2, settings: Settings, scores: ScoreKeeper) -> Self {
        Self::with_seed(field, settings, scores, rand::random())
    }

    pub fn with_seed(field: Vec2, settings: Settings, scores: ScoreKeeper, seed: u64) -> Self {
        Self {
            state: GameState::new(field, settings, seed),
            phase: SessionPhase::Idle,
            player_name: String::new(),
            countdown: COUNTDOWN_START,
            ending: EndingStage::FinalExplosion,
            game_over_opacity: 0.0,
            fallback_assets: false,
            rank: None,
            scores,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn scores(&self) -> &ScoreKeeper {
        &self.scores
    }

    /// Validate the name and begin the countdown.
    ///
    /// A blank name is rejected with no state change. Asset preload
    /// failures are logged and play continues with fallbacks.
    pub fn start(&mut self, name: &str, assets: &mut dyn Assets) -> Result<(), GameError> {
        if self.phase != SessionPhase::Idle {
            return Err(GameError::InvalidTransition {
                phase: self.phase,
                action: "start",
            });
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }

        if let Err(e) = assets.preload() {
            log::warn!("{}; continuing with fallback assets", e);
            self.fallback_assets = true;
        }

        self.player_name = name.to_string();
        self.countdown = COUNTDOWN_START;
        self.state
            .timers
            .schedule(COUNTDOWN_TICK_MS, TimerEvent::CountdownTick);
        log::info!("{} is up, counting down", self.player_name);
        self.set_phase(SessionPhase::Countdown);
        Ok(())
    }

    /// Run one display frame at wall-clock time `now_ms`
    pub fn frame(&mut self, now_ms: f64, input: &TickInput) {
        self.state.timers.advance_to(now_ms);
        while let Some((_, event)) = self.state.timers.pop_due() {
            self.on_timer(event);
        }

        match self.phase {
            SessionPhase::Running => self.step_running(input),
            SessionPhase::Ending => self.step_ending(),
            SessionPhase::Idle | SessionPhase::Countdown | SessionPhase::Leaderboard => {}
        }
    }

    /// The field changed size; takes effect from the next frame
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(Vec2::new(width, height));
    }

    /// Leave the leaderboard for a fresh idle session
    pub fn play_again(&mut self) -> Result<(), GameError> {
        if self.phase != SessionPhase::Leaderboard {
            return Err(GameError::InvalidTransition {
                phase: self.phase,
                action: "play again",
            });
        }
        self.reset();
        Ok(())
    }

    /// Drop everything back to the initial idle state, cancelling every
    /// outstanding timer
    pub fn reset(&mut self) {
        self.state.reset();
        self.player_name.clear();
        self.countdown = COUNTDOWN_START;
        self.ending = EndingStage::FinalExplosion;
        self.game_over_opacity = 0.0;
        self.fallback_assets = false;
        self.rank = None;
        if self.phase != SessionPhase::Idle {
            self.set_phase(SessionPhase::Idle);
        }
        log::info!("Session reset");
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            phase: self.phase,
            player_name: self.player_name.clone(),
            field: state.field,
            player: state.player.clone(),
            player_hitbox: state.player.hitbox(),
            bullets: state.bullets.clone(),
            sprites: state.sprites.clone(),
            projectiles: state.projectiles.clone(),
            explosions: state.explosions.clone(),
            score: state.score,
            lives: state.lives,
            difficulty: state.difficulty,
            can_fire: state.can_fire,
            countdown: self.countdown_label(),
            ending: (self.phase == SessionPhase::Ending).then_some(self.ending),
            game_over_opacity: self.game_over_opacity,
            fallback_assets: self.fallback_assets,
            leaderboard: (self.phase == SessionPhase::Leaderboard)
                .then(|| self.scores.board().entries.clone()),
            rank: self.rank,
        }
    }

    fn countdown_label(&self) -> Option<String> {
        if self.phase != SessionPhase::Countdown {
            return None;
        }
        match self.countdown {
            n if n > 0 => Some(n.to_string()),
            0 => Some("GO!".to_string()),
            _ => None,
        }
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        log::info!("Phase {} -> {}", self.phase.as_str(), phase.as_str());
        self.phase = phase;
        self.state.events.push(GameEvent::PhaseChanged { phase });
    }

    fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::DropProjectile(id) => {
                // Scheduled asynchronously: the session may have moved on
                if self.phase == SessionPhase::Running {
                    spawner::drop_projectile(&mut self.state, id);
                }
            }
            TimerEvent::FireReady => self.state.can_fire = true,
            TimerEvent::CountdownTick => {
                if self.phase != SessionPhase::Countdown {
                    return;
                }
                self.countdown -= 1;
                if self.countdown < 0 {
                    self.begin_running();
                } else {
                    self.state
                        .timers
                        .schedule(COUNTDOWN_TICK_MS, TimerEvent::CountdownTick);
                }
            }
            TimerEvent::EndingPause => {
                if self.phase == SessionPhase::Ending && self.ending == EndingStage::Pause {
                    self.ending = EndingStage::GameOverFade;
                    self.game_over_opacity = 0.0;
                }
            }
            TimerEvent::LeaderboardDelay => {
                if self.phase == SessionPhase::Ending && self.ending == EndingStage::Linger {
                    self.set_phase(SessionPhase::Leaderboard);
                }
            }
        }
    }

    fn begin_running(&mut self) {
        let count = self.state.settings.sprite_count;
        spawner::spawn_initial(&mut self.state, count);
        self.state.can_fire = true;
        self.set_phase(SessionPhase::Running);
    }

    fn step_running(&mut self, input: &TickInput) {
        if input.fire || input.idle_mode {
            tick::fire(&mut self.state);
        }
        let outcome = tick::tick(&mut self.state, input);
        if outcome.lives_exhausted {
            self.begin_ending();
        }
    }

    fn begin_ending(&mut self) {
        spawner::cancel_drop_timers(&mut self.state);
        let center = self.state.player.center();
        self.state
            .explosions
            .push(Explosion::new(ExplosionKind::RadialFinal, center));
        self.ending = EndingStage::FinalExplosion;
        self.game_over_opacity = 0.0;

        let score = self.state.score;
        log::info!("Game over for {} with score {}", self.player_name, score);
        self.rank = self.scores.record(&self.player_name, score);
        self.state.events.push(GameEvent::SessionEnded {
            name: self.player_name.clone(),
            score,
        });
        self.set_phase(SessionPhase::Ending);
    }

    fn step_ending(&mut self) {
        match self.ending {
            EndingStage::FinalExplosion => {
                tick::advance_explosions(&mut self.state);
                let final_done = !self
                    .state
                    .explosions
                    .iter()
                    .any(|e| e.kind == ExplosionKind::RadialFinal);
                if final_done {
                    self.state.explosions.clear();
                    self.ending = EndingStage::Pause;
                    self.state
                        .timers
                        .schedule(ENDING_PAUSE_MS, TimerEvent::EndingPause);
                }
            }
            EndingStage::GameOverFade => {
                self.game_over_opacity += GAME_OVER_FADE_STEP;
                if self.game_over_opacity >= 1.0 {
                    self.game_over_opacity = 1.0;
                    self.ending = EndingStage::Linger;
                    self.state
                        .timers
                        .schedule(LEADERBOARD_DELAY_MS, TimerEvent::LeaderboardDelay);
                }
            }
            EndingStage::Pause | EndingStage::Linger => {}
        }
    }
}
