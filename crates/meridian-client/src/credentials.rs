// crates/meridian-client/src/credentials.rs
//
// Session-scoped credential holder. The secret is obtained interactively
// at most once per process and cached in memory only; it is never
// persisted and has no expiry beyond process exit.

use std::sync::Mutex;

use meridian_core::Error;

/// Source of the keystore passphrase.
///
/// The CLI implements this with a hidden terminal prompt; tests substitute
/// a scripted fake so no prompting happens under test.
pub trait CredentialSource: Send + Sync {
    /// Obtain the passphrase from the operator.
    fn passphrase(&self) -> Result<String, Error>;
}

/// Caches the passphrase for the remainder of the process.
pub struct CredentialCache {
    source: Box<dyn CredentialSource>,
    cached: Mutex<Option<String>>,
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("cached", &self.cached.lock().map(|c| c.is_some()).unwrap_or(false))
            .finish_non_exhaustive()
    }
}

impl CredentialCache {
    /// Create a cache backed by the given source.
    pub fn new(source: Box<dyn CredentialSource>) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }

    /// Return the cached secret, obtaining and caching one if absent.
    pub fn get(&self) -> Result<String, Error> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| Error::Auth("credential cache poisoned".to_string()))?;

        if let Some(secret) = cached.as_ref() {
            return Ok(secret.clone());
        }

        let secret = self.source.passphrase()?;
        *cached = Some(secret.clone());
        Ok(secret)
    }

    /// Seed the cache directly, e.g. right after account creation, so the
    /// operator is not re-prompted for a passphrase they just typed.
    pub fn store(&self, secret: &str) {
        if let Ok(mut cached) = self.cached.lock() {
            *cached = Some(secret.to_string());
        }
    }

    /// Drop the cached secret after the daemon rejected it.
    pub fn invalidate(&self) {
        if let Ok(mut cached) = self.cached.lock() {
            *cached = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        prompts: Arc<AtomicU32>,
    }

    impl CredentialSource for CountingSource {
        fn passphrase(&self) -> Result<String, Error> {
            let n = self.prompts.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("secret-{}", n))
        }
    }

    fn counting_cache() -> (CredentialCache, Arc<AtomicU32>) {
        let prompts = Arc::new(AtomicU32::new(0));
        let cache = CredentialCache::new(Box::new(CountingSource {
            prompts: prompts.clone(),
        }));
        (cache, prompts)
    }

    #[test]
    fn get_prompts_once_then_serves_from_cache() {
        let (cache, prompts) = counting_cache();
        assert_eq!(cache.get().unwrap(), "secret-1");
        assert_eq!(cache.get().unwrap(), "secret-1");
        assert_eq!(prompts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalidate_forces_a_new_prompt() {
        let (cache, prompts) = counting_cache();
        assert_eq!(cache.get().unwrap(), "secret-1");
        cache.invalidate();
        assert_eq!(cache.get().unwrap(), "secret-2");
        assert_eq!(prompts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn store_seeds_the_cache_without_prompting() {
        let (cache, prompts) = counting_cache();
        cache.store("typed-at-creation");
        assert_eq!(cache.get().unwrap(), "typed-at-creation");
        assert_eq!(prompts.load(Ordering::SeqCst), 0);
    }
}
