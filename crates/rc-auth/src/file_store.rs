use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::errors::{AuthError, Result};
use crate::session::AuthenticationToken;
use crate::store::TokenStore;

/// File-based token store
///
/// Keeps one JSON file per profile. Files are only readable by the owner on
/// Unix; the token pair is a bearer credential, so treat the directory like a
/// password file.
///
/// # Directory Structure
/// ```text
/// ~/.config/rauncher/rc-auth/
/// ├── lock                   # Advisory lock file
/// └── tokens/
///     ├── default.json       # Token pair for profile "default"
///     └── alt.json           # Token pair for profile "alt"
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    tokens_dir: PathBuf,
    lock_file: PathBuf,
}

impl FileTokenStore {
    /// Create a new file-based token store rooted at `storage_dir`
    pub fn new(storage_dir: impl AsRef<Path>) -> Result<Self> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        let tokens_dir = storage_dir.join("tokens");
        let lock_file = storage_dir.join("lock");

        fs::create_dir_all(&tokens_dir)?;

        // Set secure permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(&storage_dir, perms.clone())?;
            fs::set_permissions(&tokens_dir, perms)?;
        }

        Ok(Self {
            tokens_dir,
            lock_file,
        })
    }

    /// Get default storage directory for the current platform
    pub fn default_storage_dir() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("", "", "rauncher")
            .ok_or(AuthError::StoreUnavailable)?;

        Ok(project_dirs.config_dir().join("rc-auth"))
    }

    /// Get the path for a profile file
    fn token_path(&self, profile: &str) -> Result<PathBuf> {
        validate_profile(profile)?;
        Ok(self.tokens_dir.join(format!("{}.json", profile)))
    }

    /// Acquire an exclusive lock on the storage
    fn acquire_lock(&self) -> Result<fs::File> {
        let lock_file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_file)?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| AuthError::LockTimeout)?;

        Ok(lock_file)
    }
}

/// Profile names become file names: keep them to `[A-Za-z0-9_-]+`
fn validate_profile(profile: &str) -> Result<()> {
    let valid = !profile.is_empty()
        && profile
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidProfile(profile.to_string()))
    }
}

/// Write `contents` to a file that is owner-only from the moment it exists
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.create(true).truncate(true).write(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    // A stale temp file keeps its old mode; mode() only applies on creation
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(contents)?;
    file.sync_all()
}

impl TokenStore for FileTokenStore {
    fn load(&self, profile: &str) -> Result<Option<AuthenticationToken>> {
        let path = self.token_path(profile)?;

        if !path.exists() {
            debug!("No stored token for profile {}", profile);
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let token = serde_json::from_str(&content)
            .map_err(|e| AuthError::InvalidResponse(format!("Invalid token file: {}", e)))?;

        Ok(Some(token))
    }

    fn save(&self, profile: &str, token: &AuthenticationToken) -> Result<()> {
        let path = self.token_path(profile)?;
        let _lock = self.acquire_lock()?;

        let json = serde_json::to_string_pretty(token)?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        if let Err(e) = write_private(&temp_path, json.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &path))
        {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!("Saved token for profile {}", profile);
        Ok(())
    }

    fn remove(&self, profile: &str) -> Result<()> {
        let path = self.token_path(profile)?;
        let _lock = self.acquire_lock()?;

        if path.exists() {
            fs::remove_file(&path)?;
        }

        Ok(())
    }

    fn list_profiles(&self) -> Result<Vec<String>> {
        let mut profiles = Vec::new();

        for entry in fs::read_dir(&self.tokens_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                if validate_profile(stem).is_ok() {
                    profiles.push(stem.to_string());
                } else {
                    warn!("Ignoring unexpected file in token store: {}", path.display());
                }
            }
        }

        profiles.sort();
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileTokenStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    fn token() -> AuthenticationToken {
        AuthenticationToken::new(
            Some("9c771b61cef241808e129e33d51ea745".to_string()),
            Some("74076db55d8b4087a607fdeace60a94a".to_string()),
        )
    }

    #[test]
    fn test_save_and_load() {
        let (store, _temp) = create_test_store();

        store.save("default", &token()).unwrap();

        assert_eq!(store.load("default").unwrap(), Some(token()));
        assert!(store.load("missing").unwrap().is_none());
    }

    #[test]
    fn test_file_uses_wire_field_names() {
        let (store, temp) = create_test_store();

        store.save("default", &token()).unwrap();

        let raw = fs::read_to_string(temp.path().join("tokens").join("default.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["accessToken"], "9c771b61cef241808e129e33d51ea745");
        assert_eq!(json["clientToken"], "74076db55d8b4087a607fdeace60a94a");
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (store, temp) = create_test_store();
        store.save("default", &token()).unwrap();

        let meta = fs::metadata(temp.path().join("tokens").join("default.json")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let (store, temp) = create_test_store();
        let tokens_dir = temp.path().join("tokens");

        store.save("default", &token()).unwrap();
        store.save("default", &AuthenticationToken::default()).unwrap();

        let names: Vec<String> = fs::read_dir(&tokens_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["default.json"]);
    }

    #[test]
    fn test_failed_save_cleans_up_temp_file() {
        let (store, temp) = create_test_store();
        let tokens_dir = temp.path().join("tokens");

        // A directory in place of the target makes the rename fail
        fs::create_dir(tokens_dir.join("blocked.json")).unwrap();
        fs::write(tokens_dir.join("blocked.json").join("keep"), "x").unwrap();

        assert!(matches!(
            store.save("blocked", &token()),
            Err(AuthError::Io(_))
        ));
        assert!(!tokens_dir.join("blocked.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_temp_file_is_rewritten_private() {
        use std::os::unix::fs::PermissionsExt;

        let (store, temp) = create_test_store();
        let stale = temp.path().join("tokens").join("default.tmp");
        fs::write(&stale, "stale").unwrap();
        fs::set_permissions(&stale, fs::Permissions::from_mode(0o644)).unwrap();

        store.save("default", &token()).unwrap();

        let meta = fs::metadata(temp.path().join("tokens").join("default.json")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
        assert!(!stale.exists());
    }

    #[test]
    fn test_remove_and_list() {
        let (store, _temp) = create_test_store();

        store.save("default", &token()).unwrap();
        store.save("alt_1", &AuthenticationToken::default()).unwrap();
        assert_eq!(store.list_profiles().unwrap(), vec!["alt_1", "default"]);

        store.remove("default").unwrap();
        store.remove("never-saved").unwrap();
        assert_eq!(store.list_profiles().unwrap(), vec!["alt_1"]);
        assert!(store.load("default").unwrap().is_none());
    }

    #[test]
    fn test_rejects_unsafe_profile_names() {
        let (store, _temp) = create_test_store();

        for name in ["", "../escape", "with space", "dot.json"] {
            assert!(matches!(
                store.save(name, &token()),
                Err(AuthError::InvalidProfile(_))
            ));
        }
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (store, temp) = create_test_store();
        fs::write(temp.path().join("tokens").join("broken.json"), "not json").unwrap();

        assert!(matches!(
            store.load("broken"),
            Err(AuthError::InvalidResponse(_))
        ));
    }
}
