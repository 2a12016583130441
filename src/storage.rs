use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const PREFERENCES_FILE: &str = "preferences.yml";

#[derive(thiserror::Error, Debug)]
pub enum PreferenceError {
    #[error("writing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serializing preferences: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("preference storage unavailable")]
    Unavailable,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
struct PreferenceFile {
    dark_mode: bool,
}

/// Where the single theme preference lives.
pub trait PreferenceBackend {
    /// `None` when nothing has been saved yet.
    fn read(&self) -> Option<String>;
    fn write(&mut self, contents: &str) -> Result<(), PreferenceError>;
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileBackend { path: path.into() }
    }
}

impl PreferenceBackend for FileBackend {
    fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Some(data),
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "No saved preference");
                None
            }
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, contents).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Session-only storage, used by `--no-persist` and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    contents: Option<String>,
    fail_writes: bool,
}

impl MemoryBackend {
    #[cfg(test)]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        MemoryBackend {
            contents: Some(contents.into()),
            fail_writes: false,
        }
    }

    #[cfg(test)]
    pub fn failing() -> Self {
        MemoryBackend {
            contents: None,
            fail_writes: true,
        }
    }
}

impl PreferenceBackend for MemoryBackend {
    fn read(&self) -> Option<String> {
        self.contents.clone()
    }

    fn write(&mut self, contents: &str) -> Result<(), PreferenceError> {
        if self.fail_writes {
            return Err(PreferenceError::Unavailable);
        }
        self.contents = Some(contents.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}

/// Dark-mode flag, read once at startup and written on every toggle.
pub struct PreferenceStore {
    backend: Box<dyn PreferenceBackend>,
    dark_mode: bool,
}

impl PreferenceStore {
    pub fn load(backend: Box<dyn PreferenceBackend>) -> Self {
        let dark_mode = match backend.read() {
            None => false,
            Some(raw) => decode(&raw).unwrap_or_else(|| {
                warn!(
                    location = %backend.describe(),
                    "Unreadable theme preference, using light mode"
                );
                false
            }),
        };
        PreferenceStore { backend, dark_mode }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Flips the flag and persists it. On a failed write the flip still
    /// holds for this session.
    pub fn toggle(&mut self) -> Result<bool, PreferenceError> {
        self.dark_mode = !self.dark_mode;
        let encoded = encode(self.dark_mode)?;
        self.backend.write(&encoded)?;
        Ok(self.dark_mode)
    }

    pub fn location(&self) -> String {
        self.backend.describe()
    }
}

fn encode(dark_mode: bool) -> Result<String, PreferenceError> {
    Ok(serde_yaml::to_string(&PreferenceFile { dark_mode })?)
}

fn decode(raw: &str) -> Option<bool> {
    if let Ok(file) = serde_yaml::from_str::<PreferenceFile>(raw) {
        return Some(file.dark_mode);
    }
    serde_yaml::from_str::<bool>(raw.trim()).ok()
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "carepanel").context("locating data directory")
}

pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn preferences_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(PREFERENCES_FILE))
}
