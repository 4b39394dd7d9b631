//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (wall clock for real play, manual clock for headless runs)
//! - Asset preloading (fonts/images), which may fail without blocking play

use std::path::PathBuf;
use std::time::Instant;

use crate::GameError;

/// Millisecond clock driving frames and timers
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall-clock time since construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand, one frame at a time
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now_ms: f64,
    frame_ms: f64,
}

impl ManualClock {
    /// 60 Hz frame length
    pub const FRAME_60HZ_MS: f64 = 1000.0 / 60.0;

    pub fn new(frame_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            frame_ms,
        }
    }

    /// Step one frame forward, returning the new time
    pub fn next_frame(&mut self) -> f64 {
        self.now_ms += self.frame_ms;
        self.now_ms
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// Assets that must be ready before the countdown is drawn
pub trait Assets {
    fn preload(&mut self) -> Result<(), GameError>;
}

/// Nothing to load
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl Assets for NoAssets {
    fn preload(&mut self) -> Result<(), GameError> {
        Ok(())
    }
}

/// Font files that must exist on disk
#[derive(Debug, Clone, Default)]
pub struct FontFiles {
    pub paths: Vec<PathBuf>,
}

impl FontFiles {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl Assets for FontFiles {
    fn preload(&mut self) -> Result<(), GameError> {
        for path in &self.paths {
            if !path.is_file() {
                return Err(GameError::AssetLoad(format!(
                    "font not found: {}",
                    path.display()
                )));
            }
        }
        log::info!("{} font(s) ready", self.paths.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_steps() {
        let mut clock = ManualClock::new(16.0);
        assert_eq!(clock.now_ms(), 0.0);
        assert_eq!(clock.next_frame(), 16.0);
        assert_eq!(clock.next_frame(), 32.0);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[test]
    fn test_missing_font_fails() {
        let mut fonts = FontFiles::new(["/definitely/not/here/Matemasie.ttf"]);
        assert!(matches!(fonts.preload(), Err(GameError::AssetLoad(_))));
        assert!(NoAssets.preload().is_ok());
    }
}
