use std::path::{Path, PathBuf};

/// Directory conventions of the two supported platform families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Windows,
    Posix,
}

impl Layout {
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Interpreter location inside a managed installation directory.
    #[must_use]
    pub fn managed_executable(self, install_dir: &Path) -> PathBuf {
        match self {
            Self::Windows => install_dir.join("python.exe"),
            Self::Posix => install_dir.join("bin").join("python"),
        }
    }

    /// Activation script inside an environment directory.
    #[must_use]
    pub fn activation_script(self, env_dir: &Path) -> PathBuf {
        match self {
            Self::Windows => env_dir.join("Scripts").join("activate.bat"),
            Self::Posix => env_dir.join("bin").join("activate"),
        }
    }

    /// Program and arguments for an interactive shell preloaded with `script`.
    #[must_use]
    pub fn activation_shell(self, script: &Path) -> (String, Vec<String>) {
        let script = script.display().to_string();
        match self {
            Self::Windows => ("cmd.exe".to_string(), vec!["/k".to_string(), script]),
            Self::Posix => (
                "bash".to_string(),
                vec!["--rcfile".to_string(), script],
            ),
        }
    }
}
