use dialkit::host::{HostError, Theme, ThemeStore};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Theme preference kept as a one-word file in the user data directory.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: Option<PathBuf>,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn default_location() -> Self {
        Self {
            path: crate::config::project_dirs().map(|dirs| dirs.data_dir().join("theme")),
        }
    }

    fn path(&self) -> Result<&PathBuf, HostError> {
        self.path
            .as_ref()
            .ok_or(HostError::Unavailable("user data directory"))
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>, HostError> {
        let contents = match fs_err::read_to_string(self.path()?) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let name = contents.trim();
        name.parse::<Theme>()
            .map(Some)
            .map_err(|_| HostError::UnknownTheme(name.to_string()))
    }

    fn save(&self, theme: Theme) -> Result<(), HostError> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        fs_err::write(path, theme.to_string())?;
        Ok(())
    }
}
