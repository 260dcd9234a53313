//! Session key persistence between CLI invocations.
//!
//! The derived key is kept in a user-only file under the runtime directory so
//! `seal`/`open` work without re-entering the password until `logout` or the
//! configured TTL elapses. The password itself is never written.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use notecrypt_core::{Result, SessionRecord, SessionStore};

use crate::config::NotecryptConfig;

#[derive(Serialize, Deserialize)]
struct StoredSession {
    account: String,
    key: String,
    stored_at: DateTime<Utc>,
}

impl Drop for StoredSession {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// [`SessionStore`] backed by a JSON file with `0600` permissions.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    ttl: Option<Duration>,
}

impl FileSessionStore {
    /// A `ttl_seconds` of zero, or one too large to represent, keeps the
    /// session until it is removed.
    pub fn new(path: impl Into<PathBuf>, ttl_seconds: u64) -> Self {
        let ttl = match ttl_seconds {
            0 => None,
            secs => i64::try_from(secs).ok().and_then(Duration::try_seconds),
        };
        Self {
            path: path.into(),
            ttl,
        }
    }

    pub fn from_config(config: &NotecryptConfig) -> Self {
        let path = config
            .session
            .path
            .as_ref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_session_path);
        Self::new(path, config.session.ttl_seconds)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// When the stored session stops being accepted, if it expires at all.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let ttl = self.ttl?;
        self.stored_at()?.checked_add_signed(ttl)
    }

    /// When the stored session was written, if one exists and parses.
    pub fn stored_at(&self) -> Option<DateTime<Utc>> {
        self.read_stored().map(|stored| stored.stored_at)
    }

    fn read_stored(&self) -> Option<StoredSession> {
        let contents = Zeroizing::new(std::fs::read_to_string(&self.path).ok()?);
        match serde_json::from_str::<StoredSession>(&contents) {
            Ok(stored) => Some(stored),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "discarding unreadable session file");
                self.discard_file();
                None
            }
        }
    }

    fn discard_file(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to remove session file");
            }
        }
    }

    fn is_expired(&self, stored_at: DateTime<Utc>) -> bool {
        match self.ttl {
            Some(ttl) => Utc::now().signed_duration_since(stored_at) > ttl,
            None => false,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let Some(stored) = self.read_stored() else {
            return Ok(None);
        };

        if self.is_expired(stored.stored_at) {
            tracing::info!(account = %stored.account, "session expired");
            std::fs::remove_file(&self.path)?;
            return Ok(None);
        }

        match STANDARD.decode(stored.key.as_bytes()) {
            Ok(key_material) => Ok(Some(SessionRecord::new(
                stored.account.clone(),
                key_material,
            ))),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "discarding session with invalid key encoding");
                self.discard_file();
                Ok(None)
            }
        }
    }

    fn save(&mut self, record: &SessionRecord) -> Result<()> {
        ensure_private_dir(&self.path)?;

        let stored = StoredSession {
            account: record.account_identifier().to_string(),
            key: STANDARD.encode(record.key_material()),
            stored_at: Utc::now(),
        };
        let json = Zeroizing::new(serde_json::to_vec(&stored)?);

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o600);
            }
            let mut file = options.open(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        set_file_permissions(&self.path)?;

        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "session removed");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// `$XDG_RUNTIME_DIR/notecrypt/session.json`, or a per-user directory in `/tmp`.
pub fn default_session_path() -> PathBuf {
    if let Ok(value) = std::env::var("XDG_RUNTIME_DIR") {
        if !value.trim().is_empty() {
            return PathBuf::from(value).join("notecrypt").join("session.json");
        }
    }
    fallback_runtime_dir().join("session.json")
}

#[cfg(unix)]
fn fallback_runtime_dir() -> PathBuf {
    let uid = unsafe { libc::geteuid() };
    PathBuf::from(format!("/tmp/notecrypt-{}", uid))
}

#[cfg(not(unix))]
fn fallback_runtime_dir() -> PathBuf {
    std::env::temp_dir().join("notecrypt")
}

fn ensure_private_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
            }
        }
    }
    Ok(())
}

fn set_file_permissions(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    Ok(())
}
