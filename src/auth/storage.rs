use std::{
    io,
    path::PathBuf,
    time::{Duration, SystemTime},
};

use tokio::fs::OpenOptions;

use super::jwt;

/// An access token held in memory, along with when it stops being useful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub access_token: String,
    /// `None` when the lifetime is unknown. Such tokens are trusted until
    /// the process drops them.
    pub expires_at: Option<SystemTime>,
}

impl CachedToken {
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// File-backed cache for the Sertiva access token.
///
/// The file holds the bare token as a JSON string. Reading and writing never
/// fail from the caller's point of view: problems with the file are logged
/// and show up as a cache miss, costing one extra authorization request.
#[derive(Debug)]
pub struct TokenCache {
    path: PathBuf,
    cached: Option<CachedToken>,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    /// Returns the cached access token, if any.
    ///
    /// A token already held in memory is returned without touching the file.
    #[tracing::instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub async fn read(&mut self) -> Option<String> {
        if let Some(cached) = &self.cached {
            if !cached.is_expired_at(SystemTime::now()) {
                return Some(cached.access_token.clone());
            }
            tracing::info!("cached access token has expired");
        }

        let access_token = self.read_file().await?;
        if self
            .cached
            .as_ref()
            .is_some_and(|stale| stale.access_token == access_token)
        {
            tracing::debug!("cache file still holds the expired token");
            return None;
        }

        let cached = CachedToken {
            expires_at: jwt::expiry(&access_token),
            access_token,
        };
        if cached.is_expired_at(SystemTime::now()) {
            tracing::info!("access token in cache file has expired");
            return None;
        }

        let access_token = cached.access_token.clone();
        self.cached = Some(cached);
        Some(access_token)
    }

    /// Persists a freshly issued token and mirrors it in memory.
    ///
    /// `lifetime` is how long the authority said the token is good for.
    #[tracing::instrument(level = "debug", skip(self, access_token), fields(path = %self.path.display()))]
    pub async fn write(&mut self, access_token: &str, lifetime: Option<Duration>) {
        tracing::info!("saving access token to cache");

        if let Err(error) = self.write_file(access_token).await {
            tracing::warn!(error = (&error as &dyn std::error::Error), "could not write token to cache");
        }

        let expires_at = lifetime
            .and_then(|lifetime| SystemTime::now().checked_add(lifetime))
            .or_else(|| jwt::expiry(access_token));
        self.cached = Some(CachedToken {
            access_token: access_token.to_owned(),
            expires_at,
        });
    }

    /// Forgets the in-memory token; the file is left alone.
    pub fn clear(&mut self) {
        self.cached = None;
    }

    async fn read_file(&self) -> Option<String> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("cache file does not exist");
                return None;
            }
            Err(error) => {
                tracing::warn!(error = (&error as &dyn std::error::Error), "could not read cache file");
                return None;
            }
        };

        if contents.trim().is_empty() {
            tracing::debug!("cache file is empty");
            return None;
        }

        match serde_json::from_str::<String>(&contents) {
            Ok(access_token) if !access_token.is_empty() => Some(access_token),
            Ok(_) => None,
            Err(error) => {
                tracing::warn!(error = (&error as &dyn std::error::Error), "cache file does not hold a token");
                None
            }
        }
    }

    async fn write_file(&self, access_token: &str) -> Result<(), io::Error> {
        use tokio::io::AsyncWriteExt;

        let mut file_opts = OpenOptions::new();
        file_opts.create(true).truncate(true).write(true);

        #[cfg(unix)]
        file_opts.mode(0o600);

        let mut file = file_opts.open(&self.path).await?;
        let data = serde_json::to_string(access_token)?;
        file.write_all(data.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TokenCache::new(dir.path().join(".cache"));

        assert_eq!(cache.read().await, None);
    }

    #[tokio::test]
    async fn written_token_is_read_back_from_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cache");
        let mut cache = TokenCache::new(&path);

        cache.write("ACCESS TOKEN", None).await;
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "\"ACCESS TOKEN\""
        );

        // Memory is authoritative once populated.
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cache.read().await.as_deref(), Some("ACCESS TOKEN"));
    }

    #[tokio::test]
    async fn reads_token_persisted_by_an_earlier_process() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cache");
        std::fs::write(&path, "\"FROM DISK\"").unwrap();

        let mut cache = TokenCache::new(&path);
        assert_eq!(cache.read().await.as_deref(), Some("FROM DISK"));

        // Mirrored in memory after the first read.
        std::fs::write(&path, "\"CHANGED\"").unwrap();
        assert_eq!(cache.read().await.as_deref(), Some("FROM DISK"));
    }

    #[tokio::test]
    async fn empty_or_garbled_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cache");

        std::fs::write(&path, "").unwrap();
        assert_eq!(TokenCache::new(&path).read().await, None);

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(TokenCache::new(&path).read().await, None);

        std::fs::write(&path, "\"\"").unwrap();
        assert_eq!(TokenCache::new(&path).read().await, None);
    }

    #[tokio::test]
    async fn unreadable_path_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();

        // A directory cannot be read as a file.
        let mut cache = TokenCache::new(dir.path());
        assert_eq!(cache.read().await, None);
    }

    #[tokio::test]
    async fn failed_write_still_updates_memory() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TokenCache::new(dir.path().join("missing").join(".cache"));

        cache.write("ACCESS TOKEN", None).await;

        assert_eq!(cache.read().await.as_deref(), Some("ACCESS TOKEN"));
    }

    #[tokio::test]
    async fn expired_token_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TokenCache::new(dir.path().join(".cache"));

        cache.write("ACCESS TOKEN", Some(Duration::ZERO)).await;

        assert_eq!(cache.read().await, None);
        // The file still holds the same token, which must not be revived.
        assert_eq!(cache.read().await, None);
    }

    #[tokio::test]
    async fn expired_token_is_replaced_by_a_newer_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cache");
        let mut cache = TokenCache::new(&path);

        cache.write("OLD", Some(Duration::ZERO)).await;
        std::fs::write(&path, "\"NEW\"").unwrap();

        assert_eq!(cache.read().await.as_deref(), Some("NEW"));
    }

    #[test]
    fn unknown_expiry_never_expires() {
        let token = CachedToken {
            access_token: "t".to_string(),
            expires_at: None,
        };

        assert!(!token.is_expired_at(SystemTime::now() + Duration::from_secs(u32::MAX.into())));
    }

    #[tokio::test]
    async fn clear_forces_a_file_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cache");
        let mut cache = TokenCache::new(&path);

        cache.write("FIRST", None).await;
        std::fs::write(&path, "\"SECOND\"").unwrap();
        cache.clear();

        assert_eq!(cache.read().await.as_deref(), Some("SECOND"));
    }

    fn jwt_expiring_at(exp: u64) -> String {
        jwt::unsigned(&format!(r#"{{"sub":"client","exp":{exp}}}"#))
    }

    fn secs_since_epoch(at: SystemTime) -> u64 {
        at.duration_since(std::time::UNIX_EPOCH).unwrap().as_secs()
    }

    #[tokio::test]
    async fn expired_jwt_in_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cache");
        let past = secs_since_epoch(SystemTime::now()) - 3600;
        std::fs::write(&path, serde_json::to_string(&jwt_expiring_at(past)).unwrap()).unwrap();

        assert_eq!(TokenCache::new(&path).read().await, None);
    }

    #[tokio::test]
    async fn live_jwt_in_file_is_returned_and_mirrored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cache");
        let future = secs_since_epoch(SystemTime::now()) + 3600;
        let token = jwt_expiring_at(future);
        std::fs::write(&path, serde_json::to_string(&token).unwrap()).unwrap();

        let mut cache = TokenCache::new(&path);
        assert_eq!(cache.read().await, Some(token.clone()));

        std::fs::remove_file(&path).unwrap();
        assert_eq!(cache.read().await, Some(token));
    }

    #[tokio::test]
    async fn jwt_with_unrepresentable_exp_is_trusted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cache");
        let token = jwt_expiring_at(u64::MAX);
        std::fs::write(&path, serde_json::to_string(&token).unwrap()).unwrap();

        let mut cache = TokenCache::new(&path);
        assert_eq!(cache.read().await, Some(token.clone()));

        cache.write(&token, None).await;
        assert_eq!(cache.read().await, Some(token));
    }

    #[tokio::test]
    async fn write_without_lifetime_uses_jwt_exp() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TokenCache::new(dir.path().join(".cache"));
        let past = secs_since_epoch(SystemTime::now()) - 60;

        cache.write(&jwt_expiring_at(past), None).await;

        assert_eq!(cache.read().await, None);
    }
}
