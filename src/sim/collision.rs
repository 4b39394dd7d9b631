//! Collision detection and resolution
//!
//! One primitive, [`intersects`], serves both collision passes; each caller
//! chooses which rectangle stands in for an entity (the player uses its
//! reduced hit box, not its drawn bounds).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spawner;
use super::state::{Explosion, ExplosionKind, GameEvent, GameState};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Strict overlap test: rectangles sharing only an edge do not intersect
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.right() && a.right() > b.pos.x && a.pos.y < b.bottom() && a.bottom() > b.pos.y
}

/// Outcome of the bullets-vs-sprites pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulletHits {
    pub sprites_destroyed: usize,
    pub score_awarded: u64,
}

/// Outcome of the projectiles-vs-player pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerHits {
    pub hits: u32,
    /// Lives reached zero during this pass
    pub lives_exhausted: bool,
}

/// Match player bullets against live sprites.
///
/// Each bullet is consumed by at most one sprite and each sprite by at most
/// one bullet. Replacement sprites are spawned after matching, so a sprite
/// spawned this frame cannot be hit until the next one.
pub fn resolve_player_bullets(state: &mut GameState) -> BulletHits {
    let mut result = BulletHits::default();
    let mut bullet_idx = 0;

    while bullet_idx < state.bullets.len() {
        let bullet_box = state.bullets[bullet_idx].bounds();
        let hit = state
            .sprites
            .iter()
            .find(|s| intersects(&bullet_box, &s.bounds()))
            .map(|s| s.id);

        let Some(sprite_id) = hit else {
            bullet_idx += 1;
            continue;
        };

        state.bullets.remove(bullet_idx);
        if let Some(sprite) = spawner::retire(state, sprite_id) {
            state.score += sprite.score_value;
            state
                .explosions
                .push(Explosion::new(ExplosionKind::Radial, sprite.center()));
            state.events.push(GameEvent::SpriteDestroyed {
                sprite: sprite_id,
                score: sprite.score_value,
            });
            log::debug!("Sprite {} destroyed, score {}", sprite_id, state.score);
            result.sprites_destroyed += 1;
            result.score_awarded += sprite.score_value;
        }
    }

    for _ in 0..result.sprites_destroyed {
        spawner::spawn_replacement(state);
    }

    result
}

/// Match enemy projectiles against the player's hit box.
///
/// Every overlapping projectile costs one life, until lives run out.
pub fn resolve_enemy_hits_on_player(state: &mut GameState) -> PlayerHits {
    let mut result = PlayerHits::default();
    let hitbox = state.player.hitbox();
    let mut idx = 0;

    while idx < state.projectiles.len() && state.lives > 0 {
        if !intersects(&state.projectiles[idx].bounds(), &hitbox) {
            idx += 1;
            continue;
        }

        state.projectiles.remove(idx);
        state.lives -= 1;
        result.hits += 1;
        state.explosions.push(Explosion::new(
            ExplosionKind::RadialLine {
                rays: ExplosionKind::PLAYER_HIT_RAYS,
            },
            state.player.center(),
        ));
        state.events.push(GameEvent::PlayerHit { lives: state.lives });
        log::debug!("Player hit, {} lives left", state.lives);

        if state.lives == 0 {
            result.lives_exhausted = true;
        }
    }

    result
}
