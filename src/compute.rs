/// Pure game-logic functions.
///
/// Every public transition takes an immutable reference to the current
/// `GameState` (and, where needed, the wall-clock time and an RNG handle) and
/// returns a brand-new `GameState`.  Side effects are limited to the injected
/// RNG and log output.  Transitions append the visuals they create and remove
/// to `feed`; the presentation layer drains it once per frame with
/// `take_feed`.

use log::{debug, info, trace};
use rand::Rng;

use crate::config::GameplayConfig;
use crate::entities::{
    EntityId, Enemy, Explosion, FeedEvent, GameState, GameStatus, Hud, Player, Projectile, Rect,
    Visual, VisualKind, PLAYER_ID,
};
use crate::input::{Action, InputState};

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned overlap test.  Two rectangles overlap unless one lies
/// strictly left of, right of, above or below the other, so touching edges
/// count as a hit.
pub fn check_collision(a: &Rect, b: &Rect) -> bool {
    !(a.right() < b.x || a.x > b.right() || a.bottom() < b.y || a.y > b.bottom())
}

pub fn player_rect(player: &Player, rules: &GameplayConfig) -> Rect {
    Rect::new(player.x, player.y, rules.player_size, rules.player_size)
}

pub fn projectile_rect(projectile: &Projectile, rules: &GameplayConfig) -> Rect {
    Rect::new(
        projectile.x,
        projectile.y,
        rules.projectile_width,
        rules.projectile_height,
    )
}

pub fn enemy_rect(enemy: &Enemy, rules: &GameplayConfig) -> Rect {
    Rect::new(enemy.x, enemy.y, rules.enemy_size, rules.enemy_size)
}

pub fn explosion_rect(explosion: &Explosion) -> Rect {
    Rect::new(explosion.x, explosion.y, explosion.size, explosion.size)
}

/// Keep the ship fully inside the arena.  An arena smaller than the ship
/// pins it to the top-left corner.
fn clamp_player(x: f32, y: f32, width: f32, height: f32, rules: &GameplayConfig) -> Player {
    let max_x = (width - rules.player_size).max(0.0);
    let max_y = (height - rules.player_size).max(0.0);
    Player {
        x: x.clamp(0.0, max_x),
        y: y.clamp(0.0, max_y),
    }
}

fn starting_player(width: f32, height: f32, rules: &GameplayConfig) -> Player {
    clamp_player(
        width / 2.0 - rules.player_size / 2.0,
        height - rules.player_bottom_margin - rules.player_size,
        width,
        height,
        rules,
    )
}

/// Lives a new game starts with.  A game never starts already lost.
fn starting_lives(rules: &GameplayConfig) -> u32 {
    rules.initial_lives.max(1)
}

// ── Difficulty ───────────────────────────────────────────────────────────────

/// Interval to use after a spawn: one step shorter, never below the floor
/// and never zero.
pub fn next_spawn_interval(current_ms: u64, rules: &GameplayConfig) -> u64 {
    let floor = rules.min_spawn_interval_ms.max(1);
    current_ms
        .saturating_sub(rules.spawn_interval_step_ms)
        .max(floor)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for the given rules and arena size.
pub fn init_state(rules: GameplayConfig, width: f32, height: f32) -> GameState {
    let player = starting_player(width, height, &rules);
    let feed = vec![FeedEvent::Created {
        visual: Visual {
            id: PLAYER_ID,
            kind: VisualKind::Player,
            rect: player_rect(&player, &rules),
        },
    }];
    GameState {
        player,
        projectiles: Vec::new(),
        enemies: Vec::new(),
        explosions: Vec::new(),
        score: 0,
        lives: starting_lives(&rules),
        status: GameStatus::Playing,
        spawn_interval_ms: rules.initial_spawn_interval_ms,
        last_spawn_ms: None,
        fire_latched: false,
        next_id: PLAYER_ID + 1,
        feed,
        width,
        height,
        rules,
    }
}

// ── Environment & lifecycle transitions (pure) ───────────────────────────────

/// Record new arena bounds.  Nothing is moved here; the next tick re-clamps
/// the player and prunes against the new edges.
pub fn resize(state: &GameState, width: f32, height: f32) -> GameState {
    debug!("arena resized to {}x{}", width, height);
    GameState {
        width,
        height,
        ..state.clone()
    }
}

/// React to a key-down edge.  Only the reset confirmation acts immediately;
/// movement and firing are sampled from the held set on the next tick.
pub fn handle_key_down(state: &GameState, action: Action) -> GameState {
    match action {
        Action::ResetConfirm => reset_game(state),
        _ => state.clone(),
    }
}

/// Start over after a game over.  A no-op while still playing.
///
/// Entity ids keep counting so the presentation layer never sees a stale id
/// reused.  The fire latch is set so the key press that confirmed the reset
/// does not also fire.
pub fn reset_game(state: &GameState) -> GameState {
    if state.status == GameStatus::Playing {
        return state.clone();
    }

    let mut feed = state.feed.clone();
    feed.extend(state.projectiles.iter().map(|p| FeedEvent::Removed {
        id: p.id,
        kind: VisualKind::Projectile,
    }));
    feed.extend(state.enemies.iter().map(|e| FeedEvent::Removed {
        id: e.id,
        kind: VisualKind::Enemy,
    }));
    feed.extend(state.explosions.iter().map(|x| FeedEvent::Removed {
        id: x.id,
        kind: VisualKind::Explosion,
    }));

    info!("game reset (final score was {})", state.score);

    let rules = &state.rules;
    GameState {
        player: starting_player(state.width, state.height, rules),
        projectiles: Vec::new(),
        enemies: Vec::new(),
        explosions: Vec::new(),
        score: 0,
        lives: starting_lives(rules),
        status: GameStatus::Playing,
        spawn_interval_ms: rules.initial_spawn_interval_ms,
        fire_latched: true,
        feed,
        ..state.clone()
    }
}

// ── Input-driven transitions (pure) ──────────────────────────────────────────

/// Fire one projectile from the ship's nose, ignoring the fire latch.
pub fn player_shoot(state: &GameState) -> GameState {
    let mut next = state.clone();
    push_projectile(&mut next);
    next
}

/// Spawn one enemy just above the top edge at a random column.
pub fn spawn_enemy(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    push_enemy(&mut next, rng);
    next
}

fn alloc_id(state: &mut GameState) -> EntityId {
    let id = state.next_id;
    state.next_id += 1;
    id
}

fn push_projectile(state: &mut GameState) {
    let id = alloc_id(state);
    let projectile = Projectile {
        id,
        x: state.player.x + state.rules.projectile_offset_x,
        y: state.player.y,
    };
    state.feed.push(FeedEvent::Created {
        visual: Visual {
            id,
            kind: VisualKind::Projectile,
            rect: projectile_rect(&projectile, &state.rules),
        },
    });
    state.projectiles.push(projectile);
}

fn push_enemy(state: &mut GameState, rng: &mut impl Rng) {
    let span = state.width - state.rules.enemy_size;
    let x = if span > 0.0 { rng.gen_range(0.0..span) } else { 0.0 };
    let id = alloc_id(state);
    let enemy = Enemy {
        id,
        x,
        y: -state.rules.enemy_size,
    };
    debug!("enemy {} spawned at x={:.1}", id, x);
    state.feed.push(FeedEvent::Created {
        visual: Visual {
            id,
            kind: VisualKind::Enemy,
            rect: enemy_rect(&enemy, &state.rules),
        },
    });
    state.enemies.push(enemy);
}

/// Explosion centred on the given top-left corner of a destroyed enemy.
fn push_explosion(state: &mut GameState, x: f32, y: f32, now_ms: u64) {
    let id = alloc_id(state);
    let size = state.rules.explosion_size;
    let explosion = Explosion {
        id,
        x: x - size / 2.0,
        y: y - size / 2.0,
        size,
        expires_at_ms: now_ms + state.rules.explosion_duration_ms,
    };
    state.feed.push(FeedEvent::Created {
        visual: Visual {
            id,
            kind: VisualKind::Explosion,
            rect: explosion_rect(&explosion),
        },
    });
    state.explosions.push(explosion);
}

/// Drop every explosion whose lifetime has elapsed.  Runs regardless of
/// game status.
fn expire_explosions(state: &mut GameState, now_ms: u64) {
    let (expired, live): (Vec<Explosion>, Vec<Explosion>) = std::mem::take(&mut state.explosions)
        .into_iter()
        .partition(|x| now_ms >= x.expires_at_ms);
    state.feed.extend(expired.into_iter().map(|x| FeedEvent::Removed {
        id: x.id,
        kind: VisualKind::Explosion,
    }));
    state.explosions = live;
}

// ── Per-frame tick (nearly pure — clock and RNG are injected) ────────────────

/// Advance the simulation by one frame.
///
/// `now_ms` is wall-clock milliseconds; spawn pacing and explosion expiry
/// compare against it.  All randomness comes through `rng` so callers
/// control determinism (tests use a seeded RNG).
///
/// The first tick of a fresh game spawns immediately.  While the game is
/// over only explosions are expired; nothing moves and nothing spawns.
pub fn tick(
    state: &GameState,
    input: &InputState,
    now_ms: u64,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = state.clone();

    expire_explosions(&mut next, now_ms);

    if next.status == GameStatus::GameOver {
        return next;
    }

    let rules = state.rules.clone();

    // ── 1. Move the player, re-clamping to the current bounds ────────────────
    let mut x = next.player.x;
    let mut y = next.player.y;
    if input.is_held(Action::Left) {
        x -= rules.player_step;
    }
    if input.is_held(Action::Right) {
        x += rules.player_step;
    }
    if input.is_held(Action::Up) {
        y -= rules.player_step;
    }
    if input.is_held(Action::Down) {
        y += rules.player_step;
    }
    next.player = clamp_player(x, y, next.width, next.height, &rules);

    // ── 2. Edge-triggered fire ───────────────────────────────────────────────
    if input.is_held(Action::Fire) {
        if !next.fire_latched {
            push_projectile(&mut next);
            next.fire_latched = true;
        }
    } else {
        next.fire_latched = false;
    }

    // ── 3. Spawn on the wall-clock interval ──────────────────────────────────
    let spawn_due = match next.last_spawn_ms {
        None => true,
        Some(last) => now_ms.saturating_sub(last) > next.spawn_interval_ms,
    };
    if spawn_due {
        push_enemy(&mut next, rng);
        next.last_spawn_ms = Some(now_ms);
        next.spawn_interval_ms = next_spawn_interval(next.spawn_interval_ms, &rules);
    }

    // ── 4. Move projectiles and enemies ──────────────────────────────────────
    for projectile in &mut next.projectiles {
        projectile.y -= rules.projectile_speed;
    }
    for enemy in &mut next.enemies {
        enemy.y += rules.enemy_speed;
    }

    // ── 5. Mark: bounds, player contact, projectile hits ─────────────────────
    let mut spent = vec![false; next.projectiles.len()];
    let mut dead = vec![false; next.enemies.len()];
    let mut blasts: Vec<(f32, f32)> = Vec::new();
    let mut lives_lost: u32 = 0;
    let mut kills: u32 = 0;

    for (pi, projectile) in next.projectiles.iter().enumerate() {
        if projectile.y < -rules.projectile_height {
            spent[pi] = true;
        }
    }

    let ship = player_rect(&next.player, &rules);
    for (ei, enemy) in next.enemies.iter().enumerate() {
        if enemy.y > next.height {
            dead[ei] = true;
            continue;
        }

        let body = enemy_rect(enemy, &rules);
        if check_collision(&ship, &body) {
            dead[ei] = true;
            blasts.push((enemy.x, enemy.y));
            lives_lost += 1;
            continue;
        }

        // First live projectile in list order wins; one enemy scores once.
        let hit = next
            .projectiles
            .iter()
            .enumerate()
            .find(|(pi, p)| !spent[*pi] && check_collision(&projectile_rect(p, &rules), &body))
            .map(|(pi, _)| pi);
        if let Some(pi) = hit {
            spent[pi] = true;
            dead[ei] = true;
            blasts.push((enemy.x, enemy.y));
            kills += 1;
        }
    }

    // ── 6. Compact ───────────────────────────────────────────────────────────
    let mut removed = Vec::new();
    let projectiles = std::mem::take(&mut next.projectiles);
    next.projectiles = projectiles
        .into_iter()
        .zip(spent)
        .filter_map(|(p, gone)| {
            if gone {
                removed.push(FeedEvent::Removed {
                    id: p.id,
                    kind: VisualKind::Projectile,
                });
                None
            } else {
                Some(p)
            }
        })
        .collect();
    let enemies = std::mem::take(&mut next.enemies);
    next.enemies = enemies
        .into_iter()
        .zip(dead)
        .filter_map(|(e, gone)| {
            if gone {
                removed.push(FeedEvent::Removed {
                    id: e.id,
                    kind: VisualKind::Enemy,
                });
                None
            } else {
                Some(e)
            }
        })
        .collect();
    trace!(
        "tick @{}ms: {} removed, {} projectiles, {} enemies live",
        now_ms,
        removed.len(),
        next.projectiles.len(),
        next.enemies.len()
    );
    next.feed.extend(removed);

    for (bx, by) in blasts {
        push_explosion(&mut next, bx, by, now_ms);
    }

    // ── 7. Score, lives & status ─────────────────────────────────────────────
    next.score = next
        .score
        .saturating_add(kills.saturating_mul(rules.points_per_kill));
    next.lives = next.lives.saturating_sub(lives_lost);
    if lives_lost > 0 && next.lives == 0 {
        next.status = GameStatus::GameOver;
        info!("game over with score {}", next.score);
    }

    next
}

// ── Presentation views ───────────────────────────────────────────────────────

/// Hand every pending created/removed event to the caller, oldest first,
/// and leave the feed empty.
pub fn take_feed(state: &mut GameState) -> Vec<FeedEvent> {
    std::mem::take(&mut state.feed)
}

/// Every entity the presentation layer should currently draw.
pub fn visuals(state: &GameState) -> Vec<Visual> {
    let rules = &state.rules;
    let mut out = Vec::with_capacity(
        1 + state.projectiles.len() + state.enemies.len() + state.explosions.len(),
    );
    out.push(Visual {
        id: PLAYER_ID,
        kind: VisualKind::Player,
        rect: player_rect(&state.player, rules),
    });
    out.extend(state.projectiles.iter().map(|p| Visual {
        id: p.id,
        kind: VisualKind::Projectile,
        rect: projectile_rect(p, rules),
    }));
    out.extend(state.enemies.iter().map(|e| Visual {
        id: e.id,
        kind: VisualKind::Enemy,
        rect: enemy_rect(e, rules),
    }));
    out.extend(state.explosions.iter().map(|x| Visual {
        id: x.id,
        kind: VisualKind::Explosion,
        rect: explosion_rect(x),
    }));
    out
}

pub fn hud(state: &GameState) -> Hud {
    Hud {
        score: state.score,
        lives: state.lives,
        game_over_visible: state.status == GameStatus::GameOver,
    }
}
