//! PARM Blaster - a cheese-versus-mice arcade shooter
//!
//! Core modules:
//! - `sim`: Real-time simulation (entities, spawning, collisions, session lifecycle)
//! - `platform`: Clock and asset abstractions supplied by the host
//! - `persistence`: Key/value storage and remote score submission
//! - `settings`: Display profiles and gameplay tuning
//! - `highscores`: Top-10 leaderboard

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use highscores::HighScores;
pub use settings::{DisplayProfile, Settings};

/// Game configuration constants
pub mod consts {
    /// Starting lives
    pub const INITIAL_LIVES: u32 = 5;
    /// Live sprite population during play
    pub const INITIAL_SPRITES: usize = 4;

    /// Player movement per frame (keyboard)
    pub const PLAYER_SPEED: f32 = 100.0;
    /// Touch drag multiplier
    pub const TOUCH_SENSITIVITY: f32 = 3.0;
    /// Player hit box edge as a fraction of the sprite edge (100 of 150)
    pub const PLAYER_HITBOX_SCALE: f32 = 2.0 / 3.0;

    /// Player bullet upward travel per frame
    pub const BULLET_SPEED: f32 = 10.0;
    /// Enemy projectile downward travel per frame
    pub const PROJECTILE_SPEED: f32 = 7.0;
    /// Minimum time between player shots (ms)
    pub const FIRE_COOLDOWN_MS: f64 = 500.0;

    /// Sprite horizontal speed range [min, max)
    pub const SPRITE_SPEED_MIN: f32 = 3.0;
    pub const SPRITE_SPEED_MAX: f32 = 9.5;
    /// Top of the band sprites spawn in
    pub const SPRITE_BAND_TOP: f32 = 100.0;
    /// Gap kept between the band bottom and the field middle
    pub const SPRITE_BAND_MARGIN: f32 = 75.0;
    /// Score awarded per sprite
    pub const SPRITE_SCORE_VALUE: u64 = 1;
    /// First projectile drop happens within [0, this) ms of spawning
    pub const FIRST_DROP_MAX_MS: f64 = 2000.0;

    /// Difficulty ratchet
    pub const BASE_DROP_INTERVAL_MS: f64 = 2000.0;
    pub const DROP_SCALING_FACTOR: f64 = 0.8;
    pub const SCORE_BAND: u64 = 5;
    /// Shortest delay a drop timer is scheduled with (ms)
    pub const MIN_DROP_DELAY_MS: f64 = 4.0;

    /// Countdown before play (ticks shown: 3, 2, 1, GO!)
    pub const COUNTDOWN_START: i32 = 3;
    pub const COUNTDOWN_TICK_MS: f64 = 1000.0;

    /// Pause after the final explosion, before the game over text
    pub const ENDING_PAUSE_MS: f64 = 500.0;
    /// Game over text fade-in per frame
    pub const GAME_OVER_FADE_STEP: f32 = 0.02;
    /// Delay between the faded-in text and the leaderboard
    pub const LEADERBOARD_DELAY_MS: f64 = 1000.0;

    /// Field widths at or below this use the mobile profile
    pub const MOBILE_BREAKPOINT: f32 = 768.0;
}
