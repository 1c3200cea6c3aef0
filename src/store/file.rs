//! Single-file session store for native clients.
//!
//! Both halves live in one JSON document, so atomicity comes from the
//! filesystem: writes go to a sibling temp file and are renamed into place,
//! and `clear` deletes the file.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{PersistedSession, SessionStore, StoreError};
use crate::types::UserProfile;

#[derive(Serialize, Deserialize)]
struct SessionFile {
    access_token: String,
    user_data: UserProfile,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl SessionStore for FileStore {
    fn get(&self) -> Option<PersistedSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable");
                return None;
            }
        };
        match serde_json::from_str::<SessionFile>(&raw) {
            Ok(file) if !file.access_token.is_empty() => {
                Some(PersistedSession { token: file.access_token, profile: file.user_data })
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file corrupt; ignoring");
                None
            }
        }
    }

    fn set(&self, token: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(&SessionFile {
            access_token: token.to_owned(),
            user_data: profile.clone(),
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        let mut file = open_private(&tmp)?;
        file.write_all(&body)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new().write(true).create(true).truncate(true).open(path)
}
