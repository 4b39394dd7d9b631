//! Game settings and display profiles
//!
//! Persisted as JSON through a [`Storage`] backend, separate from the
//! leaderboard.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::consts::*;
use crate::persistence::Storage;

/// Entity sizing profile, picked by screen size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DisplayProfile {
    #[default]
    Desktop,
    Mobile,
}

/// Entity dimensions for one display profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySizes {
    /// Player sprite edge (square)
    pub player: f32,
    /// Enemy sprite edge (square)
    pub sprite: f32,
    pub bullet: Vec2,
    pub projectile: Vec2,
}

impl DisplayProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayProfile::Desktop => "Desktop",
            DisplayProfile::Mobile => "Mobile",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" => Some(DisplayProfile::Desktop),
            "mobile" | "phone" => Some(DisplayProfile::Mobile),
            _ => None,
        }
    }

    /// Profile for a field of the given width
    pub fn for_width(width: f32) -> Self {
        if width <= MOBILE_BREAKPOINT {
            DisplayProfile::Mobile
        } else {
            DisplayProfile::Desktop
        }
    }

    pub fn sizes(&self) -> EntitySizes {
        match self {
            DisplayProfile::Desktop => EntitySizes {
                player: 150.0,
                sprite: 100.0,
                bullet: Vec2::new(5.0, 20.0),
                projectile: Vec2::new(5.0, 20.0),
            },
            DisplayProfile::Mobile => EntitySizes {
                player: 100.0,
                sprite: 75.0,
                bullet: Vec2::new(3.0, 15.0),
                projectile: Vec2::new(3.0, 15.0),
            },
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Entity sizing profile
    pub profile: DisplayProfile,
    /// Pick the profile from the field width on every resize
    pub auto_profile: bool,

    // === Gameplay ===
    pub initial_lives: u32,
    /// Live sprite population during play
    pub sprite_count: usize,
    /// Player movement per frame while a direction is held
    pub player_speed: f32,
    /// Minimum time between shots (ms)
    pub fire_cooldown_ms: f64,
    /// Touch drag multiplier
    pub touch_sensitivity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: DisplayProfile::Desktop,
            auto_profile: true,

            initial_lives: INITIAL_LIVES,
            sprite_count: INITIAL_SPRITES,
            player_speed: PLAYER_SPEED,
            fire_cooldown_ms: FIRE_COOLDOWN_MS,
            touch_sensitivity: TOUCH_SENSITIVITY,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "parm_blaster_settings";

    /// Create settings pinned to a profile
    pub fn from_profile(profile: DisplayProfile) -> Self {
        Self {
            profile,
            auto_profile: false,
            ..Self::default()
        }
    }

    /// Profile to use for a field of the given width
    pub fn effective_profile(&self, field_width: f32) -> DisplayProfile {
        if self.auto_profile {
            DisplayProfile::for_width(field_width)
        } else {
            self.profile
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.initial_lives == 0 {
            return Err(GameError::InvalidSettings("initial_lives must be at least 1".into()));
        }
        if self.sprite_count == 0 {
            return Err(GameError::InvalidSettings("sprite_count must be at least 1".into()));
        }
        if !(self.player_speed > 0.0) {
            return Err(GameError::InvalidSettings(format!(
                "player_speed must be positive, got {}",
                self.player_speed
            )));
        }
        if !(self.fire_cooldown_ms >= 0.0) {
            return Err(GameError::InvalidSettings(format!(
                "fire_cooldown_ms must not be negative, got {}",
                self.fire_cooldown_ms
            )));
        }
        if !(self.touch_sensitivity > 0.0) {
            return Err(GameError::InvalidSettings(format!(
                "touch_sensitivity must be positive, got {}",
                self.touch_sensitivity
            )));
        }
        Ok(())
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(storage: &dyn Storage) -> Self {
        match Self::try_load(storage) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings ({} profile)", settings.profile.as_str());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    fn try_load(storage: &dyn Storage) -> Result<Option<Self>, GameError> {
        let Some(json) = storage.get_item(Self::STORAGE_KEY)? else {
            return Ok(None);
        };
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(Some(settings))
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), GameError> {
        let json = serde_json::to_string(self)?;
        storage.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
