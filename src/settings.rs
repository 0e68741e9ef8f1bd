//! Game settings and preferences
//!
//! Every setting is a named entry in the player data file. Entries load with
//! their default as fallback and are written back (and saved) whenever they
//! change.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::persistence::PlayerData;
use crate::platform::{KeyBindings, KeyboardLayout};

/// Window presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    ExclusiveFullScreen,
    #[default]
    FullScreenWindow,
    MaximizedWindow,
    Windowed,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::ExclusiveFullScreen => "ExclusiveFullScreen",
            DisplayMode::FullScreenWindow => "FullScreenWindow",
            DisplayMode::MaximizedWindow => "MaximizedWindow",
            DisplayMode::Windowed => "Windowed",
        }
    }
}

impl FromStr for DisplayMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exclusivefullscreen" => Ok(DisplayMode::ExclusiveFullScreen),
            "fullscreenwindow" | "fullscreen" => Ok(DisplayMode::FullScreenWindow),
            "maximizedwindow" => Ok(DisplayMode::MaximizedWindow),
            "windowed" => Ok(DisplayMode::Windowed),
            _ => Err(()),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which device drives movement and camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Joystick while one is connected, keyboard and mouse otherwise
    #[default]
    Auto,
    Keyboard,
    Joystick,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Auto => "Auto",
            InputMode::Keyboard => "Keyboard",
            InputMode::Joystick => "Joystick",
        }
    }
}

impl FromStr for InputMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(InputMode::Auto),
            "keyboard" => Ok(InputMode::Keyboard),
            "joystick" => Ok(InputMode::Joystick),
            _ => Err(()),
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("unknown setting {0:?}")]
    UnknownSetting(String),
    #[error("invalid value {value:?} for {id}")]
    InvalidValue { id: String, value: String },
}

/// A persisted value with its storage key and default
#[derive(Debug, Clone, PartialEq)]
pub struct Setting<T> {
    id: &'static str,
    default: T,
    value: T,
}

impl<T: Copy> Setting<T> {
    pub const fn new(id: &'static str, default: T) -> Self {
        Self {
            id,
            default,
            value: default,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn default_value(&self) -> T {
        self.default
    }
}

impl<T: Copy + FromStr + fmt::Display> Setting<T> {
    /// Change, write and save
    pub fn set(&mut self, value: T, data: &mut PlayerData) {
        self.value = value;
        data.set(self.id, self.value);
        data.save();
    }
}

/// Type-erased view used to walk every entry
trait SettingEntry {
    fn id(&self) -> &'static str;
    fn load(&mut self, data: &mut PlayerData);
    fn store(&self, data: &mut PlayerData);
    fn reset(&mut self);
    fn value_string(&self) -> String;
    fn parse_value(&mut self, text: &str) -> bool;
}

impl<T: Copy + FromStr + fmt::Display> SettingEntry for Setting<T> {
    fn id(&self) -> &'static str {
        self.id
    }

    fn load(&mut self, data: &mut PlayerData) {
        self.value = data.get(self.id, self.default);
    }

    fn store(&self, data: &mut PlayerData) {
        data.set(self.id, self.value);
    }

    fn reset(&mut self) {
        self.value = self.default;
    }

    fn value_string(&self) -> String {
        self.value.to_string()
    }

    fn parse_value(&mut self, text: &str) -> bool {
        match text.trim().parse() {
            Ok(value) => {
                self.value = value;
                true
            }
            Err(_) => false,
        }
    }
}

/// Mixer group attenuation in decibels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerLevels {
    pub master: f32,
    pub music: f32,
    pub sfx: f32,
    pub ui: f32,
}

/// Volume slider value (0-100) to mixer attenuation
pub fn volume_to_decibels(volume: i32) -> f32 {
    if volume <= 0 {
        return -80.0;
    }
    20.0 * (volume.min(100) as f32 / 100.0).log10()
}

/// Game settings/preferences
#[derive(Debug, Clone)]
pub struct Settings {
    // === Display ===
    pub display_mode: Setting<DisplayMode>,
    pub display_width: Setting<i32>,
    pub display_height: Setting<i32>,

    // === Sound (0 - 100) ===
    pub sound_global: Setting<i32>,
    pub sound_music: Setting<i32>,
    pub sound_sfx: Setting<i32>,
    pub sound_ui: Setting<i32>,

    // === Camera ===
    pub camera_sensitivity: Setting<f32>,
    pub camera_fov: Setting<i32>,

    // === Controls ===
    pub input_mode: Setting<InputMode>,
    pub key_bindings: KeyBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_mode: Setting::new("Display_Mode", DisplayMode::FullScreenWindow),
            display_width: Setting::new("Display_Width", 800),
            display_height: Setting::new("Display_Height", 600),

            sound_global: Setting::new("Sound_Global", 100),
            sound_music: Setting::new("Sound_Music", 100),
            sound_sfx: Setting::new("Sound_SFX", 100),
            sound_ui: Setting::new("Sound_UI", 100),

            camera_sensitivity: Setting::new("Camera_Sensitivity", 1.0),
            camera_fov: Setting::new("Camera_FOV", 60),

            input_mode: Setting::new("Input_Mode", InputMode::Auto),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Settings {
    /// Load every entry and the key bindings for `layout`
    pub fn load(data: &mut PlayerData, layout: KeyboardLayout) -> Self {
        let mut settings = Self::default();
        for entry in settings.entries_mut() {
            entry.load(data);
        }
        settings.key_bindings = KeyBindings::load(data, layout);
        log::info!("Settings loaded");
        settings
    }

    /// Write every entry and save the file
    pub fn save(&self, data: &mut PlayerData) {
        for entry in self.entries() {
            entry.store(data);
        }
        data.save();
        log::info!("Settings saved");
    }

    /// Restore defaults (including key bindings) and save
    pub fn reset(&mut self, data: &mut PlayerData) {
        for entry in self.entries_mut() {
            entry.reset();
        }
        self.key_bindings.reset(data);
        self.save(data);
    }

    /// Reload key bindings after a keyboard layout change
    pub fn reload_keys(&mut self, data: &mut PlayerData, layout: KeyboardLayout) {
        self.key_bindings = KeyBindings::load(data, layout);
    }

    /// Current value of an entry, by storage key
    pub fn get(&self, id: &str) -> Option<String> {
        self.entries()
            .into_iter()
            .find(|e| e.id() == id)
            .map(|e| e.value_string())
    }

    /// Parse and apply a value by storage key, then save
    pub fn set(&mut self, id: &str, value: &str, data: &mut PlayerData) -> Result<(), SettingsError> {
        let entry = self
            .entries_mut()
            .into_iter()
            .find(|e| e.id() == id)
            .ok_or_else(|| SettingsError::UnknownSetting(id.to_string()))?;
        if !entry.parse_value(value) {
            return Err(SettingsError::InvalidValue {
                id: id.to_string(),
                value: value.to_string(),
            });
        }
        entry.store(data);
        data.save();
        Ok(())
    }

    pub fn mixer_levels(&self) -> MixerLevels {
        MixerLevels {
            master: volume_to_decibels(self.sound_global.value()),
            music: volume_to_decibels(self.sound_music.value()),
            sfx: volume_to_decibels(self.sound_sfx.value()),
            ui: volume_to_decibels(self.sound_ui.value()),
        }
    }

    /// Output resolution: windowed mode uses the stored size, every other mode
    /// the screen's native resolution
    pub fn resolution(&self, screen: (u32, u32)) -> (u32, u32) {
        match self.display_mode.value() {
            DisplayMode::Windowed => (
                self.display_width.value().max(1) as u32,
                self.display_height.value().max(1) as u32,
            ),
            _ => screen,
        }
    }

    /// Whether the joystick drives input right now
    pub fn use_joystick(&self, joystick_connected: bool) -> bool {
        match self.input_mode.value() {
            InputMode::Joystick => true,
            InputMode::Auto => joystick_connected,
            InputMode::Keyboard => false,
        }
    }

    fn entries(&self) -> [&dyn SettingEntry; 10] {
        [
            &self.display_mode,
            &self.display_width,
            &self.display_height,
            &self.sound_global,
            &self.sound_music,
            &self.sound_sfx,
            &self.sound_ui,
            &self.camera_sensitivity,
            &self.camera_fov,
            &self.input_mode,
        ]
    }

    fn entries_mut(&mut self) -> [&mut dyn SettingEntry; 10] {
        [
            &mut self.display_mode,
            &mut self.display_width,
            &mut self.display_height,
            &mut self.sound_global,
            &mut self.sound_music,
            &mut self.sound_sfx,
            &mut self.sound_ui,
            &mut self.camera_sensitivity,
            &mut self.camera_fov,
            &mut self.input_mode,
        ]
    }
}
