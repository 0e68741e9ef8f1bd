//! Platform abstraction layer
//!
//! Handles device differences for:
//! - Key bindings and keyboard layouts (QWERTY / AZERTY defaults)
//! - Mapping raw keyboard, mouse and joystick state to simulation input

pub mod input;
pub mod keyboard;

pub use input::{Action, InputFrame, InputMapper, Key, KeyBindings, MappedInput};
pub use keyboard::{KeyboardLayout, LayoutDetector, LayoutWatcher};
