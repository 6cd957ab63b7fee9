//! Response caching policy.
//!
//! Media files are immutable once written and can be cached for a long time.
//! Playlists may still be growing (live HLS), and the HTML pages reflect the
//! live index, so both must always be refetched.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::config::CacheConfig;

/// `Cache-Control` value for responses that must never be reused.
pub const NO_STORE: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Caching directive attached to a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDirective {
    /// Never cache; also sets the HTTP/1.0 `Pragma` and `Expires` fallbacks.
    NoStore,
    /// Shared caches may keep the response for `max_age` seconds.
    Public { max_age: u64 },
}

impl CacheDirective {
    pub fn apply(self, headers: &mut HeaderMap) {
        match self {
            CacheDirective::NoStore => {
                headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
                headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
                headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
            }
            CacheDirective::Public { max_age } => {
                headers.insert(
                    header::CACHE_CONTROL,
                    HeaderValue::from_str(&format!("public, max-age={max_age}"))
                        .unwrap_or_else(|_| HeaderValue::from_static(NO_STORE)),
                );
            }
        }
    }
}

/// Chooses a [`CacheDirective`] for a served file.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    max_age: u64,
    no_store_suffixes: Vec<String>,
}

impl CachePolicy {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            max_age: config.max_age_secs,
            no_store_suffixes: config.no_store_suffixes.clone(),
        }
    }

    pub fn for_path(&self, path: &str) -> CacheDirective {
        if self
            .no_store_suffixes
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()))
        {
            CacheDirective::NoStore
        } else {
            CacheDirective::Public {
                max_age: self.max_age,
            }
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
