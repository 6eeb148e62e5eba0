use sky_shooter::config::InputConfig;
use sky_shooter::input::*;

#[test]
fn default_keymap_binds_arrows() {
    let map = KeyMap::from_config(&InputConfig::default());
    assert_eq!(map.actions_for("ArrowLeft"), &[Action::Left]);
    assert_eq!(map.actions_for("ArrowRight"), &[Action::Right]);
    assert_eq!(map.actions_for("ArrowUp"), &[Action::Up]);
    assert_eq!(map.actions_for("ArrowDown"), &[Action::Down]);
    assert_eq!(map.actions_for("a"), &[Action::Left]);
}

#[test]
fn space_fires_and_confirms_reset() {
    let map = KeyMap::from_config(&InputConfig::default());
    let actions = map.actions_for(" ");
    assert!(actions.contains(&Action::Fire));
    assert!(actions.contains(&Action::ResetConfirm));
    assert_eq!(actions.len(), 2);
}

#[test]
fn unknown_key_has_no_actions() {
    let map = KeyMap::from_config(&InputConfig::default());
    assert!(map.actions_for("F12").is_empty());
}

#[test]
fn bind_does_not_duplicate() {
    let mut map = KeyMap::default();
    map.bind("x", Action::Fire);
    map.bind("x", Action::Fire);
    assert_eq!(map.actions_for("x"), &[Action::Fire]);
}

#[test]
fn key_down_and_up_track_held_actions() {
    let map = KeyMap::from_config(&InputConfig::default());
    let mut input = InputState::new();

    input.key_down(&map, "ArrowLeft");
    input.key_down(&map, " ");
    assert!(input.is_held(Action::Left));
    assert!(input.is_held(Action::Fire));
    assert!(!input.is_held(Action::Right));

    input.key_up(&map, "ArrowLeft");
    assert!(!input.is_held(Action::Left));
    assert!(input.is_held(Action::Fire));

    input.clear();
    assert!(!input.is_held(Action::Fire));
}

#[test]
fn input_state_from_actions() {
    let input: InputState = [Action::Up, Action::Fire].into_iter().collect();
    assert!(input.is_held(Action::Up));
    assert!(input.is_held(Action::Fire));
    assert!(!input.is_held(Action::Down));
}
