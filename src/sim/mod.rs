//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - One step per display frame, no delta time
//! - Seeded RNG only
//! - Host time enters only through the timer queue
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{BulletHits, PlayerHits, Rect, intersects};
pub use difficulty::DifficultyRatchet;
pub use session::{EndingStage, Session, SessionPhase, Snapshot};
pub use state::{
    Bullet, EnemyProjectile, EnemySprite, EntityId, Explosion, ExplosionKind, Facing, GameEvent,
    GameState, Player,
};
pub use tick::{TickInput, TickOutcome, fire, tick};
pub use timer::{TimerId, TimerQueue};
