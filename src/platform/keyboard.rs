//! Keyboard layout detection

/// Physical layout family, used to pick default movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardLayout {
    #[default]
    Qwerty,
    Azerty,
}

/// Windows keyboard layout identifiers that are AZERTY
pub const AZERTY_LAYOUT_NAMES: [&str; 4] = [
    "0001080c", // Belgian (Comma)
    "00000813", // Belgian (Period)
    "0000080c", // Belgian French
    "0000040c", // French
];

pub trait LayoutDetector {
    fn detect(&self) -> KeyboardLayout;
}

/// Always reports the same layout
#[derive(Debug, Clone, Copy)]
pub struct FixedLayout(pub KeyboardLayout);

impl LayoutDetector for FixedLayout {
    fn detect(&self) -> KeyboardLayout {
        self.0
    }
}

/// Classifies a Windows keyboard layout name (`GetKeyboardLayoutName`)
#[derive(Debug, Clone)]
pub struct LayoutNameDetector {
    pub name: String,
}

impl LayoutDetector for LayoutNameDetector {
    fn detect(&self) -> KeyboardLayout {
        layout_from_name(&self.name)
    }
}

pub fn layout_from_name(name: &str) -> KeyboardLayout {
    let name = name.trim().to_lowercase();
    if AZERTY_LAYOUT_NAMES.contains(&name.as_str()) {
        KeyboardLayout::Azerty
    } else {
        KeyboardLayout::Qwerty
    }
}

/// French system language means AZERTY
#[derive(Debug, Clone, Default)]
pub struct LocaleDetector;

impl LocaleDetector {
    const VARS: [&'static str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];
}

impl LayoutDetector for LocaleDetector {
    fn detect(&self) -> KeyboardLayout {
        let locale = Self::VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty());
        match locale {
            Some(locale) => layout_from_locale(&locale),
            None => KeyboardLayout::Qwerty,
        }
    }
}

pub fn layout_from_locale(locale: &str) -> KeyboardLayout {
    let language = locale.split(['_', '-', '.']).next().unwrap_or_default();
    if language.eq_ignore_ascii_case("fr") {
        KeyboardLayout::Azerty
    } else {
        KeyboardLayout::Qwerty
    }
}

/// Remembers the last detected layout and reports changes
#[derive(Debug, Clone)]
pub struct LayoutWatcher {
    current: KeyboardLayout,
}

impl LayoutWatcher {
    pub fn new<D: LayoutDetector + ?Sized>(detector: &D) -> Self {
        Self {
            current: detector.detect(),
        }
    }

    pub fn current(&self) -> KeyboardLayout {
        self.current
    }

    /// Detect again; returns the new layout when it changed
    pub fn poll<D: LayoutDetector + ?Sized>(&mut self, detector: &D) -> Option<KeyboardLayout> {
        let detected = detector.detect();
        if detected == self.current {
            return None;
        }
        log::info!("Keyboard layout changed to {:?}", detected);
        self.current = detected;
        Some(detected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_layout_names() {
        assert_eq!(layout_from_name("0000040C"), KeyboardLayout::Azerty);
        assert_eq!(layout_from_name("00000813"), KeyboardLayout::Azerty);
        assert_eq!(layout_from_name("00000409"), KeyboardLayout::Qwerty);
    }

    #[test]
    fn test_locales() {
        assert_eq!(layout_from_locale("fr_FR.UTF-8"), KeyboardLayout::Azerty);
        assert_eq!(layout_from_locale("fr-BE"), KeyboardLayout::Azerty);
        assert_eq!(layout_from_locale("en_US.UTF-8"), KeyboardLayout::Qwerty);
        assert_eq!(layout_from_locale(""), KeyboardLayout::Qwerty);
    }

    #[test]
    fn test_watcher_reports_changes_once() {
        let mut watcher = LayoutWatcher::new(&FixedLayout(KeyboardLayout::Qwerty));
        assert_eq!(watcher.poll(&FixedLayout(KeyboardLayout::Qwerty)), None);
        assert_eq!(
            watcher.poll(&FixedLayout(KeyboardLayout::Azerty)),
            Some(KeyboardLayout::Azerty)
        );
        assert_eq!(watcher.poll(&FixedLayout(KeyboardLayout::Azerty)), None);
        assert_eq!(watcher.current(), KeyboardLayout::Azerty);
    }
}
