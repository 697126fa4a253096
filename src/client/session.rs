use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::ClientError;

/// What survives a restart: the logged-in flag and the display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_logged_in: bool,
    pub username: String,
}

// Both values are kept as plain strings on disk.
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(default)]
    is_logged_in: String,
    #[serde(default)]
    username: String,
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Session {
            is_logged_in: stored.is_logged_in == "true",
            username: stored.username,
        }
    }
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        StoredSession {
            is_logged_in: session.is_logged_in.to_string(),
            username: session.username.clone(),
        }
    }
}

/// Durable storage for the client session. No expiry.
pub trait SessionStorage {
    fn load(&self) -> Result<Session, ClientError>;

    fn save(&self, session: &Session) -> Result<(), ClientError>;
}

pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSessionStorage { path: path.into() }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Session, ClientError> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|err| ClientError::Session(format!("{}: {}", self.path.display(), err)))?;
        let stored: StoredSession = serde_json::from_str(&raw)
            .map_err(|err| ClientError::Session(format!("{}: {}", self.path.display(), err)))?;
        Ok(stored.into())
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| ClientError::Session(format!("{}: {}", parent.display(), err)))?;
        }
        let raw = serde_json::to_string_pretty(&StoredSession::from(session))
            .map_err(|err| ClientError::Session(err.to_string()))?;
        fs::write(&self.path, raw)
            .map_err(|err| ClientError::Session(format!("{}: {}", self.path.display(), err)))
    }
}

/// Process-local storage, used where nothing needs to outlive the process.
#[derive(Default)]
pub struct MemorySessionStorage {
    session: Mutex<Session>,
}

impl MemorySessionStorage {
    pub fn new(session: Session) -> Self {
        MemorySessionStorage {
            session: Mutex::new(session),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Session, ClientError> {
        self.session
            .lock()
            .map(|s| s.clone())
            .map_err(|err| ClientError::Session(err.to_string()))
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|err| ClientError::Session(err.to_string()))?;
        *guard = session.clone();
        Ok(())
    }
}
