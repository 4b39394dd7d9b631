//! Per-frame simulation step
//!
//! Advances every entity one frame and runs both collision passes. Called
//! once per display frame while the session is running; it never waits on
//! anything.

use glam::Vec2;

use super::collision::{self, BulletHits};
use super::state::{Bullet, GameEvent, GameState, TimerEvent};
use crate::consts::{BULLET_SPEED, PROJECTILE_SPEED};

/// Input sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left arrow held
    pub move_left: bool,
    /// Right arrow held
    pub move_right: bool,
    /// Horizontal touch drag since last frame (screen pixels)
    pub drag_dx: f32,
    /// Fire pressed this frame (edge-triggered)
    pub fire: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub bullet_hits: BulletHits,
    pub player_hits: u32,
    /// Lives ran out this frame; the session must stop stepping
    pub lives_exhausted: bool,
}

/// Fire a bullet from the player's center, unless the cooldown is running.
/// Shots during the cooldown are dropped, not queued.
pub fn fire(state: &mut GameState) -> bool {
    if !state.can_fire {
        return false;
    }
    let size = state.sizes.bullet;
    state.bullets.push(Bullet {
        pos: Vec2::new(state.player.pos.x + state.player.size.x / 2.0, state.player.pos.y),
        size,
    });
    state.can_fire = false;
    let cooldown = state.settings.fire_cooldown_ms;
    state.timers.schedule(cooldown, TimerEvent::FireReady);
    state.events.push(GameEvent::ShotFired);
    true
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let field = state.field;

    // 1. Player movement, clamped to the current field width
    let mut dx = input.drag_dx * state.settings.touch_sensitivity;
    if input.move_left {
        dx -= state.player.speed;
    }
    if input.move_right {
        dx += state.player.speed;
    }
    if dx != 0.0 {
        state.player.shift(dx, field.x);
    }

    // 2. Bullets travel up; anything past the top edge is gone
    for bullet in &mut state.bullets {
        bullet.pos.y -= BULLET_SPEED;
    }
    state.bullets.retain(|b| b.pos.y > 0.0);

    // 3. Sprites patrol, bouncing off the side edges
    for sprite in &mut state.sprites {
        sprite.patrol(field.x);
    }

    // 4. Bullets vs sprites
    let bullet_hits = collision::resolve_player_bullets(state);

    // 5. Enemy projectiles fall; anything past the bottom edge is gone
    for projectile in &mut state.projectiles {
        projectile.pos.y += PROJECTILE_SPEED;
    }
    state.projectiles.retain(|p| p.pos.y < field.y);

    // 6. Projectiles vs player
    let player_hits = collision::resolve_enemy_hits_on_player(state);

    // 7. Explosions grow and fade
    advance_explosions(state);

    TickOutcome {
        bullet_hits,
        player_hits: player_hits.hits,
        lives_exhausted: player_hits.lives_exhausted,
    }
}

/// Grow and fade every explosion, dropping the finished ones
pub fn advance_explosions(state: &mut GameState) {
    for explosion in &mut state.explosions {
        explosion.advance();
    }
    state.explosions.retain(|e| !e.is_finished());
}

/// Demo-mode driver: dodge whatever is about to land, otherwise line up
/// under the closest sprite, and keep firing.
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player_center = state.player.center().x;
    let hitbox = state.player.hitbox();

    // Projectiles that will reach the player within ~40 frames
    let threat = state
        .projectiles
        .iter()
        .filter(|p| {
            let frames_out = (hitbox.pos.y - p.pos.y - p.size.y) / PROJECTILE_SPEED;
            (0.0..40.0).contains(&frames_out)
                && p.pos.x + p.size.x > hitbox.pos.x - state.player.speed
                && p.pos.x < hitbox.right() + state.player.speed
        })
        .min_by(|a, b| {
            b.pos
                .y
                .partial_cmp(&a.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    input.move_left = false;
    input.move_right = false;

    if let Some(threat) = threat {
        // Step away from the threat, toward the roomier side
        let threat_x = threat.pos.x + threat.size.x / 2.0;
        let room_left = state.player.pos.x;
        let room_right = state.field.x - state.player.bounds().right();
        if (threat_x >= player_center && room_left > 0.0) || room_right <= 0.0 {
            input.move_left = true;
        } else {
            input.move_right = true;
        }
    } else if let Some(target) = state.sprites.iter().min_by(|a, b| {
        let da = (a.center().x - player_center).abs();
        let db = (b.center().x - player_center).abs();
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    }) {
        // Lead the sprite slightly in its travel direction
        let aim = target.center().x + target.direction * target.speed * 10.0;
        let offset = aim - player_center;
        if offset.abs() > state.player.speed / 2.0 {
            if offset < 0.0 {
                input.move_left = true;
            } else {
                input.move_right = true;
            }
        }
    }

    input.fire = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::spawner;
    use crate::sim::state::{EnemyProjectile, EnemySprite, Explosion, ExplosionKind, Facing};

    fn state() -> GameState {
        GameState::new(Vec2::new(1200.0, 900.0), Settings::default(), 3)
    }

    fn sprite(state: &mut GameState, x: f32, direction: f32) -> u32 {
        let id = state.next_entity_id();
        state.sprites.push(EnemySprite {
            id,
            pos: Vec2::new(x, 150.0),
            size: Vec2::splat(100.0),
            direction,
            speed: 5.0,
            score_value: 1,
            facing: Facing::from_direction(direction),
            drop_timer: None,
        });
        id
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut state = state();
        let start = state.player.pos.x;
        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos.x, start - 100.0);

        for _ in 0..20 {
            tick(&mut state, &input);
        }
        assert_eq!(state.player.pos.x, 0.0);

        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &right);
        }
        assert_eq!(state.player.pos.x, 1050.0);
    }

    #[test]
    fn test_touch_drag_uses_sensitivity() {
        let mut state = state();
        let start = state.player.pos.x;
        let input = TickInput {
            drag_dx: 10.0,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos.x, start + 30.0);
    }

    #[test]
    fn test_clamp_uses_current_field_width() {
        let mut state = state();
        state.field.x = 1000.0;
        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..20 {
            tick(&mut state, &right);
        }
        assert_eq!(state.player.pos.x, 850.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = state();
        assert!(fire(&mut state));
        assert!(!fire(&mut state), "second shot dropped during cooldown");
        assert_eq!(state.bullets.len(), 1);
        let b = &state.bullets[0];
        assert_eq!(b.pos.x, state.player.pos.x + 75.0);
        assert_eq!(b.pos.y, state.player.pos.y);

        state.timers.advance_to(500.0);
        assert_eq!(
            state.timers.pop_due().map(|(_, e)| e),
            Some(TimerEvent::FireReady)
        );
    }

    #[test]
    fn test_bullets_leave_through_top() {
        let mut state = state();
        state.bullets.push(Bullet {
            pos: Vec2::new(10.0, 15.0),
            size: Vec2::new(5.0, 20.0),
        });
        state.bullets.push(Bullet {
            pos: Vec2::new(10.0, 5.0),
            size: Vec2::new(5.0, 20.0),
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos.y, 5.0);
    }

    #[test]
    fn test_projectiles_leave_through_bottom() {
        let mut state = state();
        state.player.pos.x = 0.0;
        state.projectiles.push(EnemyProjectile {
            pos: Vec2::new(1100.0, 895.0),
            size: Vec2::new(5.0, 20.0),
        });
        state.projectiles.push(EnemyProjectile {
            pos: Vec2::new(1100.0, 400.0),
            size: Vec2::new(5.0, 20.0),
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos.y, 407.0);
    }

    #[test]
    fn test_sprite_at_left_edge_flips_on_next_step() {
        let mut state = state();
        let id = sprite(&mut state, 0.0, -1.0);
        tick(&mut state, &TickInput::default());
        let s = state.sprite(id).unwrap();
        assert_eq!(s.direction, 1.0);
        assert_eq!(s.facing, Facing::Right);
        assert_eq!(s.pos.x, -5.0);
    }

    #[test]
    fn test_sprite_flips_once_then_heads_back_in() {
        let mut state = state();
        let id = sprite(&mut state, 2.0, -1.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.sprite(id).unwrap().direction, 1.0);

        tick(&mut state, &TickInput::default());
        let s = state.sprite(id).unwrap();
        assert_eq!(s.pos.x, 2.0);
        assert_eq!(s.direction, 1.0);
    }

    #[test]
    fn test_projectile_hits_player_after_height_shrinks() {
        let mut state = state();
        state.resize(Vec2::new(1200.0, 600.0));
        let column = state.player.center().x;
        state.projectiles.push(EnemyProjectile {
            pos: Vec2::new(column, 100.0),
            size: Vec2::new(5.0, 20.0),
        });
        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.lives, 4);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_sprite_outside_narrowed_field_returns() {
        let mut state = state();
        let id = sprite(&mut state, 1050.0, 1.0);
        state.resize(Vec2::new(1000.0, 900.0));
        let mut xs = Vec::new();
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
            xs.push(state.sprite(id).unwrap().pos.x);
        }
        // First step bounces off the new edge, then it stays inside heading left
        assert_eq!(state.sprite(id).unwrap().direction, -1.0);
        assert!(xs.iter().skip(1).all(|&x| x + 100.0 < 1000.0));
        assert!(xs.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_hit_during_tick_keeps_population() {
        let mut state = state();
        spawner::spawn_initial(&mut state, 4);
        let target = state.sprites[0].clone();
        state.bullets.push(Bullet {
            pos: target.center() + Vec2::new(target.direction * target.speed, 10.0),
            size: Vec2::new(5.0, 20.0),
        });

        let outcome = tick(&mut state, &TickInput::default());
        assert_eq!(outcome.bullet_hits.sprites_destroyed, 1);
        assert_eq!(state.score, 1);
        assert_eq!(state.sprites.len(), 4);
        assert!(!state.is_sprite_live(target.id));
        assert_eq!(state.timers.len(), 4);
    }

    #[test]
    fn test_last_life_reports_exhausted() {
        let mut state = state();
        state.lives = 1;
        let hb = state.player.hitbox();
        state.projectiles.push(EnemyProjectile {
            pos: Vec2::new(hb.pos.x + 40.0, hb.pos.y + 10.0),
            size: Vec2::new(5.0, 20.0),
        });
        let outcome = tick(&mut state, &TickInput::default());
        assert!(outcome.lives_exhausted);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_explosions_expire() {
        let mut state = state();
        state
            .explosions
            .push(Explosion::new(ExplosionKind::Radial, Vec2::new(100.0, 100.0)));
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_autopilot_dodges_incoming() {
        let mut state = state();
        let hb = state.player.hitbox();
        state.projectiles.push(EnemyProjectile {
            pos: Vec2::new(hb.pos.x + 60.0, hb.pos.y - 50.0),
            size: Vec2::new(5.0, 20.0),
        });
        let start = state.player.pos.x;
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_ne!(state.player.pos.x, start);
    }
}
