use strum::{Display, EnumString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0} is not available in this session")]
    Unavailable(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unrecognised stored theme '{0}'")]
    UnknownTheme(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Window capability offered by the desktop shell.
pub trait WindowHost {
    fn always_on_top(&self) -> Result<bool, HostError>;
    /// Flips the flag and returns the resulting state.
    fn toggle_always_on_top(&mut self) -> Result<bool, HostError>;
}

/// Persisted light/dark preference.
pub trait ThemeStore {
    fn load(&self) -> Result<Option<Theme>, HostError>;
    fn save(&self, theme: Theme) -> Result<(), HostError>;
}

/// State behind the pin and theme buttons. Host failures never escape: the
/// flags fall back to local-only changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostControls {
    pub pinned: bool,
    pub theme: Theme,
}

impl HostControls {
    pub fn init(host: &dyn WindowHost, store: &dyn ThemeStore, system_prefers_dark: bool) -> Self {
        let pinned = host.always_on_top().unwrap_or_else(|e| {
            log::warn!("Could not query always-on-top: {}", e);
            false
        });

        let fallback = if system_prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        };
        let theme = match store.load() {
            Ok(stored) => stored.unwrap_or(fallback),
            Err(e) => {
                log::warn!("Could not read theme preference: {}", e);
                fallback
            }
        };

        Self { pinned, theme }
    }

    pub fn toggle_pinned(&mut self, host: &mut dyn WindowHost) -> bool {
        self.pinned = host.toggle_always_on_top().unwrap_or_else(|e| {
            log::warn!("Always-on-top toggle failed, keeping local state: {}", e);
            !self.pinned
        });
        self.pinned
    }

    pub fn toggle_theme(&mut self, store: &dyn ThemeStore) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = store.save(self.theme) {
            log::warn!("Could not save theme preference: {}", e);
        }
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    struct Unavailable;

    impl WindowHost for Unavailable {
        fn always_on_top(&self) -> Result<bool, HostError> {
            Err(HostError::Unavailable("always-on-top"))
        }

        fn toggle_always_on_top(&mut self) -> Result<bool, HostError> {
            Err(HostError::Unavailable("always-on-top"))
        }
    }

    impl ThemeStore for Unavailable {
        fn load(&self) -> Result<Option<Theme>, HostError> {
            Err(HostError::Unavailable("theme store"))
        }

        fn save(&self, _theme: Theme) -> Result<(), HostError> {
            Err(HostError::Unavailable("theme store"))
        }
    }

    #[derive(Default)]
    struct Shell {
        on_top: Cell<bool>,
        stored: RefCell<Option<Theme>>,
    }

    impl WindowHost for Shell {
        fn always_on_top(&self) -> Result<bool, HostError> {
            Ok(self.on_top.get())
        }

        fn toggle_always_on_top(&mut self) -> Result<bool, HostError> {
            self.on_top.set(!self.on_top.get());
            Ok(self.on_top.get())
        }
    }

    impl ThemeStore for Shell {
        fn load(&self) -> Result<Option<Theme>, HostError> {
            Ok(*self.stored.borrow())
        }

        fn save(&self, theme: Theme) -> Result<(), HostError> {
            *self.stored.borrow_mut() = Some(theme);
            Ok(())
        }
    }

    #[test]
    fn test_falls_back_when_host_missing() {
        let mut controls = HostControls::init(&Unavailable, &Unavailable, true);
        assert!(!controls.pinned);
        assert_eq!(controls.theme, Theme::Dark);

        let mut host = Unavailable;
        assert!(controls.toggle_pinned(&mut host));
        assert!(!controls.toggle_pinned(&mut host));
        assert_eq!(controls.toggle_theme(&Unavailable), Theme::Light);
    }

    #[test]
    fn test_host_state_wins() {
        let mut shell = Shell::default();
        shell.on_top.set(true);
        *shell.stored.borrow_mut() = Some(Theme::Light);

        let mut controls = HostControls::init(&shell, &shell, true);
        assert!(controls.pinned);
        assert_eq!(controls.theme, Theme::Light);

        assert!(!controls.toggle_pinned(&mut shell));
        assert!(!shell.on_top.get());

        controls.toggle_theme(&shell);
        assert_eq!(*shell.stored.borrow(), Some(Theme::Dark));
    }

    #[test]
    fn test_theme_names() {
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.to_string(), "light");
        assert!("sepia".parse::<Theme>().is_err());
    }
}
