mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use sky_shooter::compute::{handle_key_down, init_state, resize, take_feed, tick};
use sky_shooter::config::{AppConfig, DebugConfig};
use sky_shooter::entities::{FeedEvent, GameState};
use sky_shooter::input::{InputState, KeyMap};

use display::Viewport;

// ── Key naming ────────────────────────────────────────────────────────────────

/// Translate a terminal key into the browser-style name the key map uses.
fn key_name(code: &KeyCode) -> Option<String> {
    match code {
        KeyCode::Left => Some("ArrowLeft".to_string()),
        KeyCode::Right => Some("ArrowRight".to_string()),
        KeyCode::Up => Some("ArrowUp".to_string()),
        KeyCode::Down => Some("ArrowDown".to_string()),
        KeyCode::Enter => Some("Enter".to_string()),
        KeyCode::Char(c) => Some(c.to_lowercase().to_string()),
        _ => None,
    }
}

/// Returns true if `key` was seen within the last `window` frames.
fn is_held(key_frame: &HashMap<String, u64>, key: &str, frame: u64, window: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= window)
        .unwrap_or(false)
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Stderr belongs to the alternate screen while playing, so logs go to a
/// file.  If the file cannot be created the game runs without logging; this
/// is reported on stderr before the terminal switches to raw mode.
fn init_logging(debug: &DebugConfig) {
    let file = match File::create(&debug.log_file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("file logging off: cannot create {}: {}", debug.log_file, e);
            return;
        }
    };
    let env = env_logger::Env::default().default_filter_or(debug.log_level.as_str());
    if let Err(e) = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
    {
        eprintln!("file logging off: {}", e);
    }
}

/// Drain the presentation feed.  The terminal redraws every visual each
/// frame, so events only need recording.
fn consume_feed(state: &mut GameState) {
    for event in take_feed(state) {
        match event {
            FeedEvent::Created { visual } => log::trace!(
                "created {:?} #{} at ({:.0}, {:.0})",
                visual.kind,
                visual.id,
                visual.rect.x,
                visual.rect.y
            ),
            FeedEvent::Removed { id, kind } => log::trace!("removed {:?} #{}", kind, id),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key name.  Each frame the keys still "fresh"
/// (within `hold_window_frames`) form the held set handed to `tick`, so
/// Space and the arrows can be held together.
///
/// Terminals with keyboard enhancement (kitty protocol) report releases and
/// keys are dropped immediately; on classic terminals keys expire after the
/// hold window of silence.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &AppConfig,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let keymap = KeyMap::from_config(&config.input);
    let frame_budget = Duration::from_millis(config.display.frame_ms);
    let window = config.display.hold_window_frames;

    let (cols, rows) = terminal::size()?;
    let mut view = Viewport::new(cols, rows, &config.display);
    let (width, height) = view.arena_size();
    let mut state = init_state(config.gameplay.clone(), width, height);
    log::info!("arena {}x{} px ({}x{} cells)", width, height, cols, rows);

    let clock = Instant::now();
    let mut key_frame: HashMap<String, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending events (non-blocking) ───────────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => {
                    if matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
                        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
                    {
                        return Ok(());
                    }
                    let Some(name) = key_name(&code) else {
                        continue;
                    };
                    match kind {
                        KeyEventKind::Press => {
                            // Only a fresh press is a key-down edge; OS repeats
                            // arrive as Press on classic terminals.
                            if !is_held(&key_frame, &name, frame, window) {
                                for &action in keymap.actions_for(&name) {
                                    state = handle_key_down(&state, action);
                                }
                            }
                            key_frame.insert(name, frame);
                        }
                        KeyEventKind::Repeat => {
                            key_frame.insert(name, frame);
                        }
                        KeyEventKind::Release => {
                            key_frame.remove(&name);
                        }
                    }
                }
                Event::Resize(cols, rows) => {
                    view = Viewport::new(cols, rows, &config.display);
                    let (width, height) = view.arena_size();
                    state = resize(&state, width, height);
                }
                _ => {}
            }
        }

        // ── Sample the held set and advance one tick ──────────────────────────
        let mut input = InputState::new();
        for name in key_frame.keys() {
            if is_held(&key_frame, name, frame, window) {
                input.key_down(&keymap, name);
            }
        }

        let now_ms = clock.elapsed().as_millis() as u64;
        state = tick(&state, &input, now_ms, &mut rng);

        display::render(out, &state, &view)?;
        consume_feed(&mut state);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    init_logging(&config.debug);
    if let Some(e) = load_error {
        log::warn!("{}. Using defaults.", e);
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    log::debug!("keyboard enhancement: {}", keyboard_enhanced);

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = game_loop(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::warn!("terminal error: {}", e);
    }
    result
}
