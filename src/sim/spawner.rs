//! Sprite population management
//!
//! Every live sprite owns exactly one pending drop timer. Retiring a sprite
//! cancels that timer in the same call, so a removed sprite can never drop
//! another projectile.

use glam::Vec2;
use rand::Rng;

use super::state::{EnemyProjectile, EnemySprite, EntityId, Facing, GameEvent, GameState, TimerEvent};
use crate::consts::*;

/// Spawn `n` sprites at random positions
pub fn spawn_initial(state: &mut GameState, n: usize) {
    for _ in 0..n {
        spawn_sprite(state);
    }
    log::info!("Spawned {} sprites", n);
}

/// Spawn one sprite to stand in for a destroyed one
pub fn spawn_replacement(state: &mut GameState) -> EntityId {
    spawn_sprite(state)
}

fn spawn_sprite(state: &mut GameState) -> EntityId {
    let id = state.next_entity_id();
    let edge = state.sizes.sprite;

    let x_range = (state.field.x - edge).max(0.0);
    let band_bottom = state.field.y / 2.0 - SPRITE_BAND_MARGIN;
    let y_range = (band_bottom - SPRITE_BAND_TOP).max(0.0);

    let x = state.rng.random::<f32>() * x_range;
    let y = SPRITE_BAND_TOP + state.rng.random::<f32>() * y_range;
    let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let speed =
        SPRITE_SPEED_MIN + state.rng.random::<f32>() * (SPRITE_SPEED_MAX - SPRITE_SPEED_MIN);
    let first_drop = state.rng.random::<f64>() * FIRST_DROP_MAX_MS;

    let drop_timer = state
        .timers
        .schedule(first_drop, TimerEvent::DropProjectile(id));

    state.sprites.push(EnemySprite {
        id,
        pos: Vec2::new(x, y),
        size: Vec2::splat(edge),
        direction,
        speed,
        score_value: SPRITE_SCORE_VALUE,
        facing: Facing::from_direction(direction),
        drop_timer: Some(drop_timer),
    });
    log::debug!(
        "Sprite {} at ({:.0}, {:.0}) speed {:.1}, first drop in {:.0}ms",
        id,
        x,
        y,
        speed,
        first_drop
    );
    id
}

/// Remove a sprite and cancel its drop timer.
///
/// Safe to call more than once; later calls return `None`.
pub fn retire(state: &mut GameState, id: EntityId) -> Option<EnemySprite> {
    let idx = state.sprites.iter().position(|s| s.id == id)?;
    let mut sprite = state.sprites.remove(idx);
    if let Some(timer) = sprite.drop_timer.take() {
        state.timers.cancel(timer);
    }
    Some(sprite)
}

/// Handle a sprite's drop timer: release a projectile and schedule the next
/// drop using the current difficulty interval.
///
/// Returns false (and does nothing) if the sprite is no longer live.
pub fn drop_projectile(state: &mut GameState, id: EntityId) -> bool {
    let Some(idx) = state.sprites.iter().position(|s| s.id == id) else {
        log::debug!("Drop timer for retired sprite {} ignored", id);
        return false;
    };

    let origin = state.sprites[idx].drop_point();
    state.projectiles.push(EnemyProjectile {
        pos: origin,
        size: state.sizes.projectile,
    });

    // The ratchet keeps shrinking; the timer never goes below the floor
    let interval = state.difficulty.next_interval(state.score);
    let timer = state.timers.schedule(
        interval.max(MIN_DROP_DELAY_MS),
        TimerEvent::DropProjectile(id),
    );
    state.sprites[idx].drop_timer = Some(timer);
    state.events.push(GameEvent::ProjectileDropped { sprite: id });
    true
}

/// Cancel every sprite's drop timer (session is ending)
pub fn cancel_drop_timers(state: &mut GameState) {
    let mut cancelled = 0;
    for sprite in &mut state.sprites {
        if let Some(timer) = sprite.drop_timer.take() {
            if state.timers.cancel(timer) {
                cancelled += 1;
            }
        }
    }
    log::debug!("Cancelled {} sprite drop timers", cancelled);
}
