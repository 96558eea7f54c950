use super::{Checkpoint, SessionListing, SessionStore, StoreError, sort_listings};
use crate::config::constants::{env_vars, paths};
use crate::transcript::{SessionId, Transcript};
use std::env;
use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SESSION_FILE_PREFIX: &str = "session";
const SESSION_FILE_EXTENSION: &str = "json";

/// One pretty-printed JSON checkpoint per session inside a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the store at the resolved sessions directory.
    /// See [`resolve_sessions_dir`] for the lookup order.
    pub fn open(configured: Option<&Path>) -> Result<Self, StoreError> {
        Ok(Self::new(resolve_sessions_dir(configured)?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.{}",
            SESSION_FILE_PREFIX,
            encode_component(id.as_str()),
            SESSION_FILE_EXTENSION
        ))
    }

    fn read_checkpoint(path: &Path) -> Result<Checkpoint, StoreError> {
        let data = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|err| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }
}

impl SessionStore for FileSessionStore {
    fn load_checkpoint(&self, id: &SessionId) -> Result<Checkpoint, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.clone()));
        }

        let checkpoint = Self::read_checkpoint(&path)?;
        if checkpoint.session_id != *id {
            return Err(StoreError::Corrupt {
                path,
                reason: format!(
                    "checkpoint belongs to session '{}'",
                    checkpoint.session_id
                ),
            });
        }
        Ok(checkpoint)
    }

    fn save(&self, id: &SessionId, transcript: &Transcript) -> Result<Checkpoint, StoreError> {
        let checkpoint = Checkpoint::new(id.clone(), transcript.clone());
        let payload = serde_json::to_string_pretty(&checkpoint)?;
        let path = self.path_for(id);

        write_atomically(&path, payload.as_bytes()).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        info!(
            session = %id,
            turns = transcript.len(),
            path = %path.display(),
            "saved session checkpoint"
        );
        Ok(checkpoint)
    }

    fn list(&self) -> Result<Vec<SessionListing>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut listings = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !is_session_file(&path) {
                continue;
            }

            match Self::read_checkpoint(&path) {
                Ok(checkpoint) => listings.push(SessionListing::from(&checkpoint)),
                Err(err) => warn!(error = %err, "skipping unreadable checkpoint"),
            }
        }

        sort_listings(&mut listings);
        Ok(listings)
    }
}

/// Resolve the checkpoint directory, creating it if needed.
///
/// Order: `MEMCHAT_SESSION_DIR`, then `configured`, then
/// `~/.memchat/sessions` (falling back to `./.memchat/sessions` when no home
/// directory is known).
pub fn resolve_sessions_dir(configured: Option<&Path>) -> Result<PathBuf, StoreError> {
    let dir = if let Some(custom) = env::var_os(env_vars::SESSION_DIR) {
        PathBuf::from(custom)
    } else if let Some(configured) = configured {
        configured.to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::DOT_DIR)
            .join(paths::SESSIONS_DIR)
    };

    fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Keep ASCII alphanumerics, `-` and `_`; percent-encode every other byte so
/// that distinct session ids never share a file.
fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_') {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

fn is_session_file(path: &Path) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with(SESSION_FILE_PREFIX))
        .unwrap_or(false);
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(SESSION_FILE_EXTENSION))
        .unwrap_or(false);
    has_prefix && has_extension
}

/// temp file → fsync → rename, so a crash never leaves half a checkpoint
fn write_atomically(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "checkpoint path has no parent directory",
        )
    })?;
    fs::create_dir_all(parent)?;

    let temp_path = path.with_file_name(format!(
        ".{}.tmp.{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id()
    ));

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    #[cfg(unix)]
    {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}
