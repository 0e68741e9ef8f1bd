//! Input mapping
//!
//! Raw device state is collected into an [`InputFrame`] by the host. The
//! [`InputMapper`] turns it into per-tick intent using the player's key
//! bindings, or the analog axes when a joystick is in use.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use glam::Vec2;

use super::keyboard::KeyboardLayout;
use crate::persistence::PlayerData;
use crate::sim::TickInput;

/// Mouse deltas are in pixels; this brings them to look units
const MOUSE_SCALE: f32 = 0.01;

/// Bindable game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Sprint,
    Jump,
    Cancel,
    Menu,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Sprint,
        Action::Jump,
        Action::Cancel,
        Action::Menu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Forward => "Forward",
            Action::Backward => "Backward",
            Action::Left => "Left",
            Action::Right => "Right",
            Action::Sprint => "Sprint",
            Action::Jump => "Jump",
            Action::Cancel => "Cancel",
            Action::Menu => "Menu",
        }
    }

    /// Player data key holding a non-default binding
    pub fn storage_key(&self) -> String {
        format!("Key_{}", self.as_str())
    }

    pub fn default_key(&self, layout: KeyboardLayout) -> Key {
        match (self, layout) {
            (Action::Forward, KeyboardLayout::Azerty) => Key::Z,
            (Action::Left, KeyboardLayout::Azerty) => Key::Q,
            (Action::Forward, _) => Key::W,
            (Action::Backward, _) => Key::S,
            (Action::Left, _) => Key::A,
            (Action::Right, _) => Key::D,
            (Action::Sprint, _) => Key::LeftShift,
            (Action::Jump, _) => Key::Space,
            (Action::Cancel, _) | (Action::Menu, _) => Key::Escape,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

macro_rules! keys {
    ($($key:ident),* $(,)?) => {
        /// Keyboard and mouse buttons that can be bound to an action
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Key {
            $($key),*
        }

        impl Key {
            pub const ALL: &'static [Key] = &[$(Key::$key),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Key::$key => stringify!($key)),*
                }
            }
        }
    };
}

keys! {
    A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Alpha0, Alpha1, Alpha2, Alpha3, Alpha4, Alpha5, Alpha6, Alpha7, Alpha8, Alpha9,
    Space, Escape, Return, Tab, Backspace,
    LeftShift, RightShift, LeftControl, RightControl, LeftAlt, RightAlt,
    UpArrow, DownArrow, LeftArrow, RightArrow,
    Mouse0, Mouse1, Mouse2,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown key {:?}", s))
    }
}

/// Current action to key assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    layout: KeyboardLayout,
    keys: [Key; Action::ALL.len()],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::defaults(KeyboardLayout::Qwerty)
    }
}

impl KeyBindings {
    pub fn defaults(layout: KeyboardLayout) -> Self {
        Self {
            layout,
            keys: Action::ALL.map(|a| a.default_key(layout)),
        }
    }

    /// Stored overrides on top of the layout defaults
    pub fn load(data: &mut PlayerData, layout: KeyboardLayout) -> Self {
        let mut bindings = Self::defaults(layout);
        for action in Action::ALL {
            let key = data.get(&action.storage_key(), action.default_key(layout));
            bindings.keys[action.index()] = key;
        }
        bindings
    }

    pub fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    pub fn key(&self, action: Action) -> Key {
        self.keys[action.index()]
    }

    /// Rebind and persist. A binding equal to the layout default is
    /// removed from storage so a later layout change picks the new default.
    pub fn set(&mut self, action: Action, key: Key, data: &mut PlayerData) {
        self.keys[action.index()] = key;
        if key == action.default_key(self.layout) {
            data.reset(&action.storage_key());
        } else {
            data.set(&action.storage_key(), key);
        }
        data.save();
    }

    pub fn reset(&mut self, data: &mut PlayerData) {
        for action in Action::ALL {
            self.set(action, action.default_key(self.layout), data);
        }
    }
}

/// Raw device state for one frame
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    /// Keys and mouse buttons currently held
    pub held: HashSet<Key>,
    /// Mouse movement since last frame (pixels)
    pub mouse_delta: Vec2,
    /// Left stick (x = right, y = forward)
    pub joystick_move: Vec2,
    /// Right stick
    pub joystick_look: Vec2,
    /// Joystick buttons currently held, already mapped to actions
    pub joystick_buttons: HashSet<Action>,
}

/// Input for one frame: held state plus press edges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedInput {
    pub move_input: Vec2,
    pub look: Vec2,
    pub jump: bool,
    pub sprint: bool,
    pub menu_pressed: bool,
    pub cancel_pressed: bool,
}

impl MappedInput {
    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            move_input: self.move_input,
            look: self.look,
            jump: self.jump,
            sprint: self.sprint,
            pause: false,
        }
    }
}

/// Turns frames into intent, tracking held actions for press edges
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    previous: HashSet<Action>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(
        &mut self,
        frame: &InputFrame,
        bindings: &KeyBindings,
        use_joystick: bool,
        sensitivity: f32,
        dt: f32,
    ) -> MappedInput {
        let held: HashSet<Action> = if use_joystick {
            frame.joystick_buttons.clone()
        } else {
            Action::ALL
                .into_iter()
                .filter(|a| frame.held.contains(&bindings.key(*a)))
                .collect()
        };

        let (move_input, look) = if use_joystick {
            (frame.joystick_move, frame.joystick_look * dt)
        } else {
            let keys = Vec2::new(
                axis(&held, Action::Left, Action::Right),
                axis(&held, Action::Backward, Action::Forward),
            );
            (keys, frame.mouse_delta * MOUSE_SCALE)
        };
        let move_input = move_input.clamp_length_max(1.0);
        let look = look * sensitivity;

        let pressed = |action: Action| held.contains(&action) && !self.previous.contains(&action);
        let mapped = MappedInput {
            move_input,
            look,
            jump: held.contains(&Action::Jump),
            sprint: held.contains(&Action::Sprint),
            menu_pressed: pressed(Action::Menu),
            cancel_pressed: pressed(Action::Cancel),
        };
        self.previous = held;
        mapped
    }
}

/// -1, 0 or 1; none or both held gives 0
fn axis(held: &HashSet<Action>, negative: Action, positive: Action) -> f32 {
    match (held.contains(&negative), held.contains(&positive)) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(keys: &[Key]) -> InputFrame {
        InputFrame {
            held: keys.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_azerty_defaults() {
        let bindings = KeyBindings::defaults(KeyboardLayout::Azerty);
        assert_eq!(bindings.key(Action::Forward), Key::Z);
        assert_eq!(bindings.key(Action::Left), Key::Q);
        assert_eq!(bindings.key(Action::Backward), Key::S);
        assert_eq!(bindings.key(Action::Menu), Key::Escape);
    }

    #[test]
    fn test_default_bindings_are_not_stored() {
        let mut data = PlayerData::in_memory();
        let mut bindings = KeyBindings::defaults(KeyboardLayout::Qwerty);
        bindings.set(Action::Jump, Key::E, &mut data);
        assert_eq!(data.get_string("Key_Jump").as_deref(), Some("E"));
        bindings.set(Action::Jump, Key::Space, &mut data);
        assert!(!data.has_key("Key_Jump"));
    }

    #[test]
    fn test_layout_change_keeps_overrides() {
        let mut data = PlayerData::in_memory();
        let mut bindings = KeyBindings::defaults(KeyboardLayout::Qwerty);
        bindings.set(Action::Right, Key::RightArrow, &mut data);

        let azerty = KeyBindings::load(&mut data, KeyboardLayout::Azerty);
        assert_eq!(azerty.key(Action::Forward), Key::Z);
        assert_eq!(azerty.key(Action::Right), Key::RightArrow);
    }

    #[test]
    fn test_unparsable_binding_uses_default() {
        let mut data = PlayerData::in_memory();
        data.set_string("Key_Sprint", "Hyper");
        let bindings = KeyBindings::load(&mut data, KeyboardLayout::Qwerty);
        assert_eq!(bindings.key(Action::Sprint), Key::LeftShift);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let bindings = KeyBindings::default();
        let mut mapper = InputMapper::new();
        let input = mapper.map(&frame(&[Key::A, Key::D, Key::W]), &bindings, false, 1.0, 0.02);
        assert_eq!(input.move_input, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_diagonal_is_clamped() {
        let bindings = KeyBindings::default();
        let mut mapper = InputMapper::new();
        let input = mapper.map(&frame(&[Key::D, Key::W]), &bindings, false, 1.0, 0.02);
        assert!((input.move_input.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_menu_press_is_an_edge() {
        let bindings = KeyBindings::default();
        let mut mapper = InputMapper::new();
        let held = frame(&[Key::Escape]);
        let first = mapper.map(&held, &bindings, false, 1.0, 0.02);
        assert!(first.menu_pressed && first.cancel_pressed);
        let second = mapper.map(&held, &bindings, false, 1.0, 0.02);
        assert!(!second.menu_pressed);
    }

    #[test]
    fn test_look_scaling() {
        let bindings = KeyBindings::default();
        let mut mapper = InputMapper::new();
        let mouse = InputFrame {
            mouse_delta: Vec2::new(10.0, -5.0),
            ..Default::default()
        };
        let input = mapper.map(&mouse, &bindings, false, 2.0, 0.02);
        assert!((input.look - Vec2::new(0.2, -0.1)).length() < 1e-6);

        let stick = InputFrame {
            joystick_look: Vec2::new(1.0, 0.0),
            joystick_move: Vec2::new(3.0, 0.0),
            ..Default::default()
        };
        let input = mapper.map(&stick, &bindings, true, 2.0, 0.02);
        assert!((input.look.x - 0.04).abs() < 1e-6);
        assert_eq!(input.move_input, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_key_names() {
        assert_eq!("leftshift".parse::<Key>(), Ok(Key::LeftShift));
        assert_eq!(Key::Alpha3.to_string(), "Alpha3");
        assert!("Hyper".parse::<Key>().is_err());
    }
}
