//! Credential and profile storage.
//!
//! The session is a single slot: at most one credential and one cached
//! profile at a time. [`MemorySessionStore`] keeps it in process memory;
//! [`FileSessionStore`] mirrors it to a JSON file so a login survives
//! restarts.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use aprendices_core::{Credential, UserProfile};

use crate::error::{Result, SessionError};

/// Storage capability for the active session.
///
/// Reads never fail: implementations serve them from memory. Writes may fail
/// when the backing medium does.
pub trait SessionStore: Send + Sync {
    /// The current credential, if logged in.
    fn credential(&self) -> Option<Credential>;

    /// Replace the current credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn set_credential(&self, credential: Credential) -> Result<()>;

    /// Remove the current credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn clear_credential(&self) -> Result<()>;

    /// The cached user profile, if any.
    fn profile(&self) -> Option<UserProfile>;

    /// Replace the cached user profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn set_profile(&self, profile: UserProfile) -> Result<()>;

    /// Remove the cached user profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn clear_profile(&self) -> Result<()>;

    /// Replace the whole slot in one write.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn replace(&self, state: SessionState) -> Result<()>;

    /// Remove both the credential and the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn clear(&self) -> Result<()> {
        self.replace(SessionState::default())
    }
}

/// Snapshot of the session slot, also the on-disk format of [`FileSessionStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Bearer credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    /// Cached user profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: RwLock<SessionState>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `state`.
    #[must_use]
    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn credential(&self) -> Option<Credential> {
        self.state.read().credential.clone()
    }

    fn set_credential(&self, credential: Credential) -> Result<()> {
        self.state.write().credential = Some(credential);
        Ok(())
    }

    fn clear_credential(&self) -> Result<()> {
        self.state.write().credential = None;
        Ok(())
    }

    fn profile(&self) -> Option<UserProfile> {
        self.state.read().profile.clone()
    }

    fn set_profile(&self, profile: UserProfile) -> Result<()> {
        self.state.write().profile = Some(profile);
        Ok(())
    }

    fn clear_profile(&self) -> Result<()> {
        self.state.write().profile = None;
        Ok(())
    }

    fn replace(&self, state: SessionState) -> Result<()> {
        *self.state.write() = state;
        Ok(())
    }
}

/// Session store persisted as a JSON document.
///
/// The file is read once on open; afterwards every write updates the cached
/// state and rewrites the file. The cached state changes even when the file
/// cannot be written, so a cleared session never lingers in memory.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    state: RwLock<SessionState>,
}

impl FileSessionStore {
    /// Open the store at `path`. A missing file is an empty session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let state = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => SessionState::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => SessionState::default(),
            Err(source) => return Err(SessionError::Io { path, source }),
        };

        tracing::debug!(
            path = %path.display(),
            logged_in = state.credential.is_some(),
            "Opened session file"
        );

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, apply: impl FnOnce(&mut SessionState)) -> Result<()> {
        let mut state = self.state.write();
        apply(&mut *state);
        self.persist(&*state).inspect_err(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Session changed in memory but could not be saved"
            );
        })
    }

    fn persist(&self, state: &SessionState) -> Result<()> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let bytes = serde_json::to_vec_pretty(state)?;
        fs::write(&self.path, bytes).map_err(io_err)
    }
}

impl SessionStore for FileSessionStore {
    fn credential(&self) -> Option<Credential> {
        self.state.read().credential.clone()
    }

    fn set_credential(&self, credential: Credential) -> Result<()> {
        self.update(|s| s.credential = Some(credential))
    }

    fn clear_credential(&self) -> Result<()> {
        self.update(|s| s.credential = None)
    }

    fn profile(&self) -> Option<UserProfile> {
        self.state.read().profile.clone()
    }

    fn set_profile(&self, profile: UserProfile) -> Result<()> {
        self.update(|s| s.profile = Some(profile))
    }

    fn clear_profile(&self) -> Result<()> {
        self.update(|s| s.profile = None)
    }

    fn replace(&self, state: SessionState) -> Result<()> {
        self.update(|s| *s = state)
    }
}
