//! # Location Resolution
//!
//! Finds the observer's coordinates for the widget. The ephemeris core
//! never does I/O; this module is the one place that talks to the network
//! and the file system.
//!
//! ## Strategy
//! 1. **Live**: ask a [`LocationLookup`] (IP geolocation or fixed config),
//!    racing it against a timeout (5 s by default)
//! 2. **Cache**: on timeout or failure, read the last known location from
//!    a small versioned JSON file
//! 3. **Retry**: if the cache is missing, stale or corrupt, run the lookup
//!    again without a timeout
//!
//! Every successful live lookup rewrites the cache.
//!
//! ## Cache Format
//! ```json
//! {"version":1,"cachedAt":"2024-06-21T12:00:00Z","latitude":51.5,"longitude":-0.12,"label":"London, England"}
//! ```
//! A different `version` is treated as a miss.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;

use crate::GeoCoordinate;

/// Current cache layout; anything else is ignored.
pub const CACHE_VERSION: u32 = 1;

/// Label used when the lookup has no place name.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Errors that can occur while resolving the observer's location.
#[derive(Error, Debug)]
pub enum LocationError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Live lookup didn't answer in time
    #[error("location lookup timed out after {0} ms")]
    Timeout(u64),

    /// Cache file operations failed
    #[error("cache IO: {0}")]
    Cache(#[from] io::Error),

    /// Cache file isn't valid JSON for this layout
    #[error("cache format: {0}")]
    CacheFormat(#[from] serde_json::Error),

    /// Cache written by a different layout version
    #[error("cached location version is {found}; expected {expected}")]
    StaleCacheVersion { found: u32, expected: u32 },

    /// Lookup answered but had no usable coordinates
    #[error("lookup returned no location")]
    NoResult,
}

/// A resolved place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub latitude: f64,
    pub longitude: f64,
    /// `"locality, region"` or `"Unknown"`
    pub label: String,
}

impl LocationInfo {
    pub fn coordinate(&self) -> crate::Result<GeoCoordinate> {
        GeoCoordinate::new(self.latitude, self.longitude)
    }
}

/// On-disk cache record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedLocation {
    pub version: u32,
    pub cached_at: DateTime<Utc>,
    #[serde(flatten)]
    pub info: LocationInfo,
}

#[derive(Deserialize)]
struct CacheHeader {
    version: u32,
}

/// Where a resolved location came from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Live,
    Cached { cached_at: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub info: LocationInfo,
    pub source: LocationSource,
}

/// A live source of the observer's location.
pub trait LocationLookup {
    fn lookup(&self) -> impl Future<Output = Result<LocationInfo, LocationError>> + Send;
}

/// ip-api.com style response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    region_name: Option<String>,
}

impl IpApiResponse {
    fn into_info(self) -> Result<LocationInfo, LocationError> {
        if self.status.as_deref().is_some_and(|s| s != "success") {
            return Err(LocationError::NoResult);
        }
        let (Some(latitude), Some(longitude)) = (self.lat, self.lon) else {
            return Err(LocationError::NoResult);
        };
        let label = match (self.city, self.region_name) {
            (Some(city), Some(region)) if !city.is_empty() => format!("{city}, {region}"),
            _ => UNKNOWN_LABEL.to_string(),
        };
        Ok(LocationInfo {
            latitude,
            longitude,
            label,
        })
    }
}

/// IP geolocation over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: reqwest::Client,
    url: String,
}

impl HttpLookup {
    pub fn new(url: impl Into<String>) -> Self {
        HttpLookup {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl LocationLookup for HttpLookup {
    fn lookup(&self) -> impl Future<Output = Result<LocationInfo, LocationError>> + Send {
        let request = self.client.get(&self.url);
        async move {
            let response: IpApiResponse = request.send().await?.error_for_status()?.json().await?;
            response.into_info()
        }
    }
}

/// Always answers with the configured place.
#[derive(Debug, Clone)]
pub struct FixedLookup(pub LocationInfo);

impl LocationLookup for FixedLookup {
    fn lookup(&self) -> impl Future<Output = Result<LocationInfo, LocationError>> + Send {
        let info = self.0.clone();
        async move { Ok(info) }
    }
}

/// Run one lookup, giving up after `timeout`.
pub async fn lookup_with_timeout<L: LocationLookup>(
    lookup: &L,
    timeout: Duration,
) -> Result<LocationInfo, LocationError> {
    match tokio::time::timeout(timeout, lookup.lookup()).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout(timeout.as_millis() as u64)),
    }
}

/// Write `info` as the last known location.
pub fn save_cache(
    path: &Path,
    info: &LocationInfo,
    cached_at: DateTime<Utc>,
) -> Result<(), LocationError> {
    let record = CachedLocation {
        version: CACHE_VERSION,
        cached_at,
        info: info.clone(),
    };
    fs::write(path, serde_json::to_vec(&record)?)?;
    Ok(())
}

/// Read the last known location.
///
/// # Errors
/// `Cache` if unreadable, `CacheFormat` if not valid JSON for this layout,
/// `StaleCacheVersion` if written by another version.
pub fn load_cache(path: &Path) -> Result<CachedLocation, LocationError> {
    let data = fs::read(path)?;
    let header: CacheHeader = serde_json::from_slice(&data)?;
    if header.version != CACHE_VERSION {
        return Err(LocationError::StaleCacheVersion {
            found: header.version,
            expected: CACHE_VERSION,
        });
    }
    let cached: CachedLocation = serde_json::from_slice(&data)?;
    debug!("Cached location: {:?}", cached);
    Ok(cached)
}

/// Live lookup with timeout, cache fallback and one retry.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    cache_path: PathBuf,
    timeout: Duration,
}

impl LocationResolver {
    pub fn new(cache_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        LocationResolver {
            cache_path: cache_path.into(),
            timeout,
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    fn remember(&self, info: &LocationInfo) {
        if let Err(e) = save_cache(&self.cache_path, info, Utc::now()) {
            warn!("Could not cache location: {}", e);
        }
    }

    /// Cached location only, no lookup.
    pub fn cached(&self) -> Option<ResolvedLocation> {
        match load_cache(&self.cache_path) {
            Ok(cached) => Some(ResolvedLocation {
                info: cached.info,
                source: LocationSource::Cached {
                    cached_at: cached.cached_at,
                },
            }),
            Err(e) => {
                warn!("Error reading cached location: {}", e);
                None
            }
        }
    }

    /// Resolve the observer's location.
    ///
    /// # Errors
    /// Only when the live lookup fails, the cache misses and the untimed
    /// retry fails as well; the retry's error is returned.
    pub async fn resolve<L: LocationLookup>(
        &self,
        lookup: &L,
    ) -> Result<ResolvedLocation, LocationError> {
        match lookup_with_timeout(lookup, self.timeout).await {
            Ok(info) => {
                self.remember(&info);
                return Ok(ResolvedLocation {
                    info,
                    source: LocationSource::Live,
                });
            }
            Err(LocationError::Timeout(ms)) => warn!("Fell back to cached location after {}ms", ms),
            Err(e) => warn!("Location lookup failed, trying cache: {}", e),
        }

        if let Some(cached) = self.cached() {
            return Ok(cached);
        }

        info!("Trying a lookup again");
        let info = lookup.lookup().await?;
        self.remember(&info);
        Ok(ResolvedLocation {
            info,
            source: LocationSource::Live,
        })
    }
}
