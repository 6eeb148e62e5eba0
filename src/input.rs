/// Keyboard model shared by every front-end.
///
/// Front-ends report key-down / key-up events by key name; `KeyMap` turns a
/// name into the game actions bound to it and `InputState` remembers which
/// actions are currently held.  Edge-triggered firing is handled by the
/// simulation itself (see `GameState::fire_latched`).

use std::collections::{HashMap, HashSet};

use crate::config::InputConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Fire,
    ResetConfirm,
}

/// Key name → bound actions.  One key may drive several actions
/// (space fires while playing and restarts on the game-over screen).
#[derive(Clone, Debug, Default)]
pub struct KeyMap {
    bindings: HashMap<String, Vec<Action>>,
}

impl KeyMap {
    pub fn from_config(config: &InputConfig) -> Self {
        let mut map = KeyMap::default();
        let groups: [(&Vec<String>, Action); 6] = [
            (&config.left, Action::Left),
            (&config.right, Action::Right),
            (&config.up, Action::Up),
            (&config.down, Action::Down),
            (&config.fire, Action::Fire),
            (&config.reset, Action::ResetConfirm),
        ];
        for (names, action) in groups {
            for name in names {
                map.bind(name, action);
            }
        }
        map
    }

    pub fn bind(&mut self, key: &str, action: Action) {
        let actions = self.bindings.entry(key.to_string()).or_default();
        if !actions.contains(&action) {
            actions.push(action);
        }
    }

    pub fn actions_for(&self, key: &str) -> &[Action] {
        self.bindings.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The set of actions whose keys are held right now.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    held: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn key_down(&mut self, keymap: &KeyMap, key: &str) {
        for &action in keymap.actions_for(key) {
            self.press(action);
        }
    }

    pub fn key_up(&mut self, keymap: &KeyMap, key: &str) {
        for &action in keymap.actions_for(key) {
            self.release(action);
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl FromIterator<Action> for InputState {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}
