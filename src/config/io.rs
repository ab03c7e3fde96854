use std::env::current_exe;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use directories_next::ProjectDirs;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use serde_json;
use fd_lock::{RwLock, RwLockWriteGuard};
use log::{debug, info, warn};
use std::fs::OpenOptions;
use std::str;

use crate::config::types::Preferences;
use crate::error::ConfigError;

const PREFERENCES_FILE_NAME: &str = "social-battery.json";

// social-battery.json next to the executable, useful for usb sticks
fn get_portable_path() -> Option<PathBuf> {
    match current_exe() {
        Ok(path) => match path.parent() {
            Some(directory) => Some(directory.join(PREFERENCES_FILE_NAME)),
            None => {
                warn!("current exe has no parent directory: {}", path.to_string_lossy());
                None
            },
        },
        Err(err) => {
            warn!("failed to get current exe path: {:?}", err);
            None
        },
    }
}

// social-battery.json in an os dependent standard directory, such as %AppData% on windows.
fn get_local_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "social-battery", "social-battery").map(|dirs| {
        dirs.config_dir().join(PREFERENCES_FILE_NAME)
    })
}

fn get_preferences_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = get_portable_path() {
        match std::fs::metadata(&path) {
            Ok(attr) => {
                if attr.is_file() {
                    return Ok(path);
                }
            },
            Err(err) => {
                debug!("No portable preferences at {}; Using local path instead. ({:?})", path.to_string_lossy(), err);
            },
        }
    }

    match get_local_path() {
        None => Err(ConfigError::NoConfigPath),
        Some(path) => Ok(path),
    }
}

/// Holds the exclusive lock on the preferences file, one running instance at a time.
pub struct PreferencesLocker {
    rw_lock: RwLock<std::fs::File>,
}

impl PreferencesLocker {
    pub fn lock(&mut self) -> Result<RwLockWriteGuard<std::fs::File>, ConfigError> {
        match self.rw_lock.try_write() {
            Ok(guard) => Ok(guard),
            Err(source) => Err(ConfigError::CanNotLock { source }),
        }
    }
}

struct PreferencesIOInner {
    file: std::fs::File,
}

/// The persistent preference store.
#[derive(Clone)]
pub struct PreferencesIO {
    inner: Arc<Mutex<PreferencesIOInner>>,
}

impl PreferencesIO {
    pub fn new_sync() -> Result<Self, ConfigError> {
        let path = get_preferences_path()?;
        Self::open_sync(&path)
    }

    pub fn open_sync(path: &Path) -> Result<Self, ConfigError> {
        info!("Using preferences file {}", path.to_string_lossy());

        if let Some(directory) = path.parent() {
            std::fs::create_dir_all(directory)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .truncate(false)
            .append(false)
            .create(true)
            .open(path)?;

        let inner = PreferencesIOInner {
            file,
        };
        Ok(PreferencesIO { inner: Arc::new(Mutex::new(inner)) })
    }

    fn lock_inner(&self) -> MutexGuard<'_, PreferencesIOInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn locker(&mut self) -> Result<PreferencesLocker, ConfigError> {
        let inner = self.lock_inner();

        Ok(PreferencesLocker {
            rw_lock: RwLock::new(inner.file.try_clone()?),
        })
    }

    // The File returned from here should never be closed!
    fn get_file(&self) -> Result<File, ConfigError> {
        let inner = self.lock_inner();
        let file = inner.file.try_clone()?; // std File
        Ok(File::from_std(file)) // tokio File
    }

    pub async fn read(&self) -> Result<Preferences, ConfigError> {
        let mut file = self.get_file()?;
        debug!("Reading preferences file");

        let mut content = vec![];
        file.rewind().await?;
        file.read_to_end(&mut content).await?;

        if content.is_empty() {
            return Ok(Preferences::default());
        }

        let content = str::from_utf8(&content)?;
        Ok(serde_json::from_str(content)?)
    }

    pub async fn save(&self, preferences: Preferences) -> Result<(), ConfigError> {
        let mut file = self.get_file()?;
        debug!("Saving preferences");

        let content = serde_json::to_string_pretty(&preferences)?;
        file.rewind().await?;
        file.set_len(0).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
