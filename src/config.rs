use crate::persistence::{PersistenceResult, WeekTable};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_CACHE_DIR: &str = ".food-tracker-cache";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
}

/// Where the week rows live and where the local cache is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub remote: Option<RemoteConfig>,
    pub sqlite_path: Option<PathBuf>,
    pub cache_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            remote: None,
            sqlite_path: None,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let url = read("SUPABASE_URL").or_else(|| read("NEXT_PUBLIC_SUPABASE_URL"));
        let anon_key = read("SUPABASE_ANON_KEY").or_else(|| read("NEXT_PUBLIC_SUPABASE_ANON_KEY"));
        let remote = match (url, anon_key) {
            (Some(url), Some(anon_key)) => Some(RemoteConfig { url, anon_key }),
            _ => None,
        };

        let timeout = read("FOOD_TRACKER_TIMEOUT_SECS")
            .and_then(|raw| match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    warn!(target: "food_tracker::config", value = %raw, "ignoring invalid timeout");
                    None
                }
            })
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            remote,
            sqlite_path: read("FOOD_TRACKER_SQLITE").map(PathBuf::from),
            cache_dir: read("FOOD_TRACKER_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            timeout: Duration::from_secs(timeout),
        }
    }

    /// Opens the configured table. A local SQLite path wins over the remote
    /// store; `Ok(None)` means nothing is configured.
    pub fn connect(&self) -> PersistenceResult<Option<Box<dyn WeekTable>>> {
        #[cfg(feature = "sqlite")]
        if let Some(path) = &self.sqlite_path {
            let table = crate::persistence::sqlite::SqliteTable::new(path)?;
            return Ok(Some(Box::new(table)));
        }
        #[cfg(not(feature = "sqlite"))]
        if self.sqlite_path.is_some() {
            warn!(target: "food_tracker::config", "FOOD_TRACKER_SQLITE set but the sqlite feature is disabled");
        }

        #[cfg(feature = "remote")]
        if let Some(remote) = &self.remote {
            let table = crate::persistence::rest::SupabaseTable::new(
                &remote.url,
                &remote.anon_key,
                self.timeout,
            )?;
            return Ok(Some(Box::new(table)));
        }
        #[cfg(not(feature = "remote"))]
        if self.remote.is_some() {
            warn!(target: "food_tracker::config", "remote credentials set but the remote feature is disabled");
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[]));
        assert_eq!(config, StoreConfig::default());
        assert!(config.connect().unwrap().is_none());
    }

    #[test]
    fn remote_needs_both_url_and_key() {
        let config = StoreConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://x.supabase.co")]));
        assert!(config.remote.is_none());

        let config = StoreConfig::from_lookup(lookup(&[
            ("NEXT_PUBLIC_SUPABASE_URL", "https://x.supabase.co"),
            ("NEXT_PUBLIC_SUPABASE_ANON_KEY", "anon"),
            ("SUPABASE_ANON_KEY", "   "),
        ]));
        assert_eq!(
            config.remote,
            Some(RemoteConfig {
                url: "https://x.supabase.co".into(),
                anon_key: "anon".into(),
            })
        );
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let config = StoreConfig::from_lookup(lookup(&[("FOOD_TRACKER_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let config = StoreConfig::from_lookup(lookup(&[("FOOD_TRACKER_TIMEOUT_SECS", "3")]));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
