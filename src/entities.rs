/// All game entity types — pure data, no logic.
///
/// Coordinates are arena pixels with the origin at the top-left corner and
/// `y` growing downward.  Every position is the entity's top-left corner.

use crate::config::GameplayConfig;

/// Stable identifier handed to the presentation layer.  The player is always 0.
pub type EntityId = u64;

pub const PLAYER_ID: EntityId = 0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualKind {
    Player,
    Projectile,
    Enemy,
    Explosion,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
}

/// A brief visual explosion left behind by a destroyed enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Wall-clock millisecond after which the effect is gone.
    pub expires_at_ms: u64,
}

// ── Presentation feed ─────────────────────────────────────────────────────────

/// What the presentation layer needs to draw one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    pub id: EntityId,
    pub kind: VisualKind,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FeedEvent {
    Created { visual: Visual },
    Removed { id: EntityId, kind: VisualKind },
}

/// Counters shown on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub game_over_visible: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    /// Live projectiles, oldest first.  Collision tie-breaks follow this order.
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub score: u32,
    pub lives: u32,
    pub status: GameStatus,
    /// Current gap between enemy spawns, in milliseconds.
    pub spawn_interval_ms: u64,
    /// When the last enemy spawned; `None` until the first spawn.
    pub last_spawn_ms: Option<u64>,
    /// Set once a shot has been fired for the current press of the fire key.
    pub fire_latched: bool,
    pub next_id: EntityId,
    /// Created/removed visuals not yet drained by the presentation layer.
    pub feed: Vec<FeedEvent>,
    pub width: f32,
    pub height: f32,
    pub rules: GameplayConfig,
}
