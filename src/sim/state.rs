//! Game state and core simulation types
//!
//! Entities are plain data. Behavior lives in `spawner`, `collision`,
//! `tick` and `session`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::DifficultyRatchet;
use super::timer::{TimerId, TimerQueue};
use crate::consts::PLAYER_HITBOX_SCALE;
use crate::settings::{EntitySizes, Settings};

/// Entity identifier, unique within a session
pub type EntityId = u32;

/// The player's shooter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Movement per frame while a direction is held
    pub speed: f32,
}

impl Player {
    /// Player centered along the bottom of the field
    pub fn new(field: Vec2, edge: f32, speed: f32) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            size: Vec2::splat(edge),
            speed,
        };
        player.reposition(field);
        player
    }

    /// Back to the starting spot
    pub fn reposition(&mut self, field: Vec2) {
        self.pos = Vec2::new(field.x / 2.0 - self.size.x / 2.0, field.y - self.size.y);
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Collision box: a centered square smaller than the drawn sprite
    pub fn hitbox(&self) -> Rect {
        let size = self.size * PLAYER_HITBOX_SCALE;
        Rect::new(self.pos + (self.size - size) / 2.0, size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Shift horizontally, clamped to [0, field_width - width]
    pub fn shift(&mut self, dx: f32, field_width: f32) {
        let max_x = (field_width - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + dx).clamp(0.0, max_x);
    }
}

/// A player-fired bullet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Bullet {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Which way a sprite's image faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn from_direction(direction: f32) -> Self {
        if direction > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

/// An enemy mouse patrolling the upper field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySprite {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    /// +1.0 moving right, -1.0 moving left
    pub direction: f32,
    pub speed: f32,
    pub score_value: u64,
    pub facing: Facing,
    /// Outstanding projectile-drop timer
    #[serde(skip)]
    pub drop_timer: Option<TimerId>,
}

impl EnemySprite {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Move one frame; bounce off either field edge.
    /// Returns true if the direction flipped.
    pub fn patrol(&mut self, field_width: f32) -> bool {
        self.pos.x += self.speed * self.direction;
        if self.pos.x <= 0.0 || self.pos.x + self.size.x >= field_width {
            self.direction = -self.direction;
            self.facing = Facing::from_direction(self.direction);
            return true;
        }
        false
    }

    /// Where a dropped projectile starts (centered under the sprite)
    pub fn drop_point(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }
}

/// A projectile dropped by a sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProjectile {
    pub pos: Vec2,
    pub size: Vec2,
}

impl EnemyProjectile {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Explosion shapes; all share the same grow-and-fade law
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    /// Filled circle where a sprite was destroyed
    Radial,
    /// Burst of rays where the player was hit
    RadialLine { rays: u32 },
    /// Large circle when the player runs out of lives
    RadialFinal,
}

impl ExplosionKind {
    /// Rays drawn for a player-hit burst
    pub const PLAYER_HIT_RAYS: u32 = 40;

    /// Radius (or ray length) added per frame
    pub fn growth(&self) -> f32 {
        match self {
            ExplosionKind::Radial | ExplosionKind::RadialLine { .. } => 4.0,
            ExplosionKind::RadialFinal => 6.0,
        }
    }

    /// Opacity lost per frame
    pub fn fade(&self) -> f32 {
        match self {
            ExplosionKind::Radial | ExplosionKind::RadialLine { .. } => 0.04,
            ExplosionKind::RadialFinal => 0.03,
        }
    }

    pub fn max_extent(&self) -> f32 {
        match self {
            ExplosionKind::Radial => 150.0,
            ExplosionKind::RadialLine { .. } => 200.0,
            ExplosionKind::RadialFinal => 400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    pub kind: ExplosionKind,
    /// Radius, or ray length for line bursts
    pub extent: f32,
    /// 1.0 opaque, 0.0 gone
    pub alpha: f32,
}

impl Explosion {
    pub fn new(kind: ExplosionKind, center: Vec2) -> Self {
        Self {
            center,
            kind,
            extent: 0.0,
            alpha: 1.0,
        }
    }

    /// Advance one frame
    pub fn advance(&mut self) {
        self.extent += self.kind.growth();
        self.alpha -= self.kind.fade();
    }

    pub fn is_finished(&self) -> bool {
        self.extent >= self.kind.max_extent() || self.alpha <= 0.0
    }

    /// Decay progress in [0, 1]
    pub fn progress(&self) -> f32 {
        let grown = self.extent / self.kind.max_extent();
        let faded = 1.0 - self.alpha;
        grown.max(faded).clamp(0.0, 1.0)
    }
}

/// Things that happened during a frame, for sound and UI hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired,
    ProjectileDropped { sprite: EntityId },
    SpriteDestroyed { sprite: EntityId, score: u64 },
    PlayerHit { lives: u32 },
    PhaseChanged { phase: super::SessionPhase },
    SessionEnded { name: String, score: u64 },
}

/// Timer payloads owned by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A sprite's next projectile drop
    DropProjectile(EntityId),
    /// Fire cooldown elapsed
    FireReady,
    /// One countdown second elapsed
    CountdownTick,
    /// Pause after the final explosion elapsed
    EndingPause,
    /// Game over text has lingered long enough
    LeaderboardDelay,
}

/// Everything on the play field plus the score/lives counters
#[derive(Debug, Clone)]
pub struct GameState {
    /// Field width/height
    pub field: Vec2,
    pub settings: Settings,
    /// Sizes for the active display profile
    pub sizes: EntitySizes,
    pub score: u64,
    pub lives: u32,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    /// Live sprites in spawn order; membership means alive
    pub sprites: Vec<EnemySprite>,
    pub projectiles: Vec<EnemyProjectile>,
    pub explosions: Vec<Explosion>,
    pub difficulty: DifficultyRatchet,
    /// Shots are dropped while false
    pub can_fire: bool,
    pub timers: TimerQueue<TimerEvent>,
    pub rng: Pcg32,
    /// Events queued this frame
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    pub fn new(field: Vec2, settings: Settings, seed: u64) -> Self {
        let sizes = settings.effective_profile(field.x).sizes();
        Self {
            field,
            player: Player::new(field, sizes.player, settings.player_speed),
            sizes,
            score: 0,
            lives: settings.initial_lives,
            bullets: Vec::new(),
            sprites: Vec::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            difficulty: DifficultyRatchet::new(),
            can_fire: true,
            timers: TimerQueue::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
            settings,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn sprite(&self, id: EntityId) -> Option<&EnemySprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    pub fn is_sprite_live(&self, id: EntityId) -> bool {
        self.sprites.iter().any(|s| s.id == id)
    }

    /// Return every counter and collection to its starting value.
    ///
    /// Cancels all outstanding timers explicitly; the RNG keeps running.
    pub fn reset(&mut self) {
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            log::debug!("Reset cancelled {} pending timers", cancelled);
        }
        let sizes = self.settings.effective_profile(self.field.x).sizes();
        self.sizes = sizes;
        self.score = 0;
        self.lives = self.settings.initial_lives;
        self.player = Player::new(self.field, sizes.player, self.settings.player_speed);
        self.bullets.clear();
        self.sprites.clear();
        self.projectiles.clear();
        self.explosions.clear();
        self.difficulty.reset();
        self.can_fire = true;
        self.events.clear();
    }

    /// Apply a new field size; switches the display profile when needed
    /// and resizes live entities to match.
    ///
    /// The player stays on the bottom edge and every sprite is pulled back
    /// inside the new width, so patrol and culling keep working.
    pub fn resize(&mut self, field: Vec2) {
        self.field = field;
        let sizes = self.settings.effective_profile(field.x).sizes();
        if sizes != self.sizes {
            log::info!("Display profile changed for width {}", field.x);
            self.sizes = sizes;
            self.player.size = Vec2::splat(sizes.player);
            for sprite in &mut self.sprites {
                sprite.size = Vec2::splat(sizes.sprite);
            }
            for bullet in &mut self.bullets {
                bullet.size = sizes.bullet;
            }
            for projectile in &mut self.projectiles {
                projectile.size = sizes.projectile;
            }
        }
        self.player.pos.y = field.y - self.player.size.y;
        let max_x = (field.x - self.player.size.x).max(0.0);
        self.player.pos.x = self.player.pos.x.clamp(0.0, max_x);
        for sprite in &mut self.sprites {
            let max_x = (field.x - sprite.size.x).max(0.0);
            sprite.pos.x = sprite.pos.x.clamp(0.0, max_x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DisplayProfile;
    use proptest::prelude::*;

    fn sprite_at(x: f32, direction: f32) -> EnemySprite {
        EnemySprite {
            id: 1,
            pos: Vec2::new(x, 150.0),
            size: Vec2::splat(100.0),
            direction,
            speed: 5.0,
            score_value: 1,
            facing: Facing::from_direction(direction),
            drop_timer: None,
        }
    }

    #[test]
    fn test_player_starts_bottom_center() {
        let player = Player::new(Vec2::new(1000.0, 800.0), 150.0, 100.0);
        assert_eq!(player.pos, Vec2::new(425.0, 650.0));
    }

    #[test]
    fn test_player_hitbox_is_centered_sub_box() {
        let player = Player {
            pos: Vec2::new(100.0, 500.0),
            size: Vec2::splat(150.0),
            speed: 100.0,
        };
        let hb = player.hitbox();
        assert!((hb.size.x - 100.0).abs() < 1e-4);
        assert!((hb.pos.x - 125.0).abs() < 1e-4);
        assert!((hb.pos.y - 525.0).abs() < 1e-4);
    }

    #[test]
    fn test_player_shift_clamps() {
        let mut player = Player::new(Vec2::new(1000.0, 800.0), 150.0, 100.0);
        player.shift(-10_000.0, 1000.0);
        assert_eq!(player.pos.x, 0.0);
        player.shift(10_000.0, 1000.0);
        assert_eq!(player.pos.x, 850.0);
    }

    #[test]
    fn test_sprite_at_left_edge_flips_right() {
        let mut sprite = sprite_at(0.0, -1.0);
        assert_eq!(sprite.facing, Facing::Left);
        assert!(sprite.patrol(1000.0));
        assert_eq!(sprite.direction, 1.0);
        assert_eq!(sprite.facing, Facing::Right);
    }

    #[test]
    fn test_sprite_at_right_edge_flips_left() {
        let mut sprite = sprite_at(898.0, 1.0);
        assert!(sprite.patrol(1000.0));
        assert_eq!(sprite.direction, -1.0);
        assert_eq!(sprite.facing, Facing::Left);
    }

    #[test]
    fn test_sprite_mid_field_keeps_direction() {
        let mut sprite = sprite_at(400.0, 1.0);
        assert!(!sprite.patrol(1000.0));
        assert_eq!(sprite.pos.x, 405.0);
        assert_eq!(sprite.direction, 1.0);
    }

    #[test]
    fn test_explosion_laws() {
        let mut radial = Explosion::new(ExplosionKind::Radial, Vec2::ZERO);
        let mut frames = 0;
        while !radial.is_finished() {
            radial.advance();
            frames += 1;
        }
        // Fades out (25-26 frames) long before reaching radius 150
        assert!((25..=26).contains(&frames), "frames = {frames}");
        assert!(radial.extent < 150.0);

        let mut fin = Explosion::new(ExplosionKind::RadialFinal, Vec2::ZERO);
        fin.advance();
        assert_eq!(fin.extent, 6.0);
        assert!((fin.alpha - 0.97).abs() < 1e-6);
        assert!(fin.progress() > 0.0 && fin.progress() < 1.0);
    }

    #[test]
    fn test_resize_switches_profile() {
        let mut state = GameState::new(Vec2::new(1200.0, 900.0), Settings::default(), 1);
        assert_eq!(state.player.size.x, 150.0);
        state.resize(Vec2::new(600.0, 900.0));
        assert_eq!(state.player.size.x, 100.0);
        assert_eq!(state.sizes.bullet, Vec2::new(3.0, 15.0));
        assert!(state.player.pos.x + state.player.size.x <= 600.0);
    }

    #[test]
    fn test_resize_height_only_keeps_player_on_bottom_edge() {
        let mut state = GameState::new(Vec2::new(1200.0, 900.0), Settings::default(), 1);
        state.resize(Vec2::new(1200.0, 600.0));
        assert_eq!(state.sizes, DisplayProfile::Desktop.sizes());
        assert_eq!(state.player.pos.y, 450.0);
        assert!(state.player.hitbox().bottom() < 600.0);

        state.resize(Vec2::new(1200.0, 1000.0));
        assert_eq!(state.player.pos.y, 850.0);
    }

    #[test]
    fn test_resize_pulls_sprites_back_inside() {
        let mut state = GameState::new(Vec2::new(1200.0, 900.0), Settings::default(), 1);
        let mut sprite = sprite_at(1050.0, 1.0);
        sprite.speed = 4.6;
        state.sprites.push(sprite);

        state.resize(Vec2::new(1000.0, 900.0));
        assert_eq!(state.sprites[0].pos.x, 900.0);

        // One bounce off the new edge, then it heads back across the field
        let sprite = &mut state.sprites[0];
        assert!(sprite.patrol(1000.0));
        for _ in 0..120 {
            assert!(!sprite.patrol(1000.0));
        }
        assert_eq!(sprite.direction, -1.0);
        assert!(sprite.pos.x < 900.0 - 100.0 * 4.0);
    }

    proptest! {
        #[test]
        fn prop_patrol_flips_exactly_at_edges(
            x in -20.0f32..920.0,
            right in any::<bool>(),
            speed in 3.0f32..9.5,
        ) {
            let direction = if right { 1.0 } else { -1.0 };
            let mut sprite = sprite_at(x, direction);
            sprite.speed = speed;
            let flipped = sprite.patrol(1000.0);
            let moved = x + speed * direction;
            prop_assert_eq!(sprite.pos.x, moved);
            prop_assert_eq!(flipped, moved <= 0.0 || moved + 100.0 >= 1000.0);
            let expected = if flipped { -direction } else { direction };
            prop_assert_eq!(sprite.direction, expected);
            prop_assert_eq!(sprite.facing, Facing::from_direction(expected));
        }

        #[test]
        fn prop_shift_stays_on_field(
            start in 0.0f32..850.0,
            dx in -5000.0f32..5000.0,
            width in 150.0f32..3000.0,
        ) {
            let mut player = Player::new(Vec2::new(1000.0, 800.0), 150.0, 100.0);
            player.pos.x = start;
            player.shift(dx, width);
            prop_assert!(player.pos.x >= 0.0);
            prop_assert!(player.pos.x + player.size.x <= width + 1e-3);
        }
    }
}
