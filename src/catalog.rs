// src/catalog.rs

//! Remote catalog client
//!
//! Talks to the mod catalog API: a search endpoint returning package
//! summaries and a detail endpoint returning one mod's full record. The API
//! is loosely structured (array-or-object responses, synonymous field names,
//! unsorted release lists), so every response is normalized into canonical
//! [`RemoteEntry`] / [`Release`] values before any decision logic runs.

use crate::error::{Error, Result};
use crate::version;
use reqwest::blocking::Client;
use serde_json::Value;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Download stream chunk size
const CHUNK_SIZE: usize = 8 * 1024;

/// Field names under which a mod id may appear in catalog responses
const ID_FIELDS: &[&str] = &["modid", "modidstr"];

/// Field names under which a release list may appear, in probe order
const RELEASE_LIST_FIELDS: &[&str] = &["releases", "Releases", "versions"];

/// Field names under which a download reference may appear, in priority order
const DOWNLOAD_FIELDS: &[&str] = &["download", "file", "url", "mainfile", "filename"];

/// A mod record returned by the catalog, normalized from either the search
/// or the detail response shape
#[derive(Debug, Clone)]
pub struct RemoteEntry {
    pub id: Option<String>,
    pub version: Option<String>,
    /// Authoritative latest release, when the record carries one directly
    pub latest: Option<Release>,
    /// Release list, in whatever order the catalog returned it
    pub releases: Vec<Release>,
}

/// One downloadable version of a remote mod
#[derive(Debug, Clone)]
pub struct Release {
    pub version: Option<String>,
    /// Download reference: absolute URL, absolute path, or bare filename
    pub download: Option<String>,
}

/// HTTP client for the catalog API
pub struct CatalogClient {
    client: Client,
    api_base: String,
}

impl CatalogClient {
    /// Create a new catalog client for the given API base URL
    pub fn new(api_base: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Resolve a mod id to its remote catalog entry.
    ///
    /// Searches the catalog, then prefers an exact case-insensitive id match
    /// and follows it with a detail fetch for the full record (degrading to
    /// the search summary when the detail fetch fails). Without an exact
    /// match the first search result is returned as a best-effort guess,
    /// trusting the endpoint's own relevance ranking; this can attach the
    /// wrong remote mod to a local one and is a known correctness risk.
    pub fn find_mod(&self, id: &str) -> Result<Option<RemoteEntry>> {
        let search_url = format!("{}/api/mods", self.api_base);
        debug!("Searching catalog for {}", id);

        let response = self
            .client
            .get(&search_url)
            .query(&[("search", id)])
            .send()?;
        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "HTTP {} from {}",
                response.status(),
                search_url
            )));
        }
        let body: Value = response.json()?;

        let list = search_results(&body);
        let wanted = id.to_lowercase();
        let matched = list.iter().find(|candidate| {
            entry_id(candidate).is_some_and(|found| found.to_lowercase() == wanted)
        });

        if let Some(candidate) = matched {
            let matched_id = entry_id(candidate).unwrap_or_default();
            match self.fetch_detail(&matched_id) {
                Ok(detail) => return Ok(Some(normalize_entry(&detail))),
                Err(e) => {
                    warn!("Detail fetch for {} failed ({}), using search entry", id, e);
                    return Ok(Some(normalize_entry(candidate)));
                }
            }
        }

        match list.first() {
            Some(first) => {
                debug!("No exact match for {}, using first search result", id);
                Ok(Some(normalize_entry(first)))
            }
            None => Ok(None),
        }
    }

    /// Fetch one mod's full record from the detail endpoint
    fn fetch_detail(&self, id: &str) -> Result<Value> {
        let url = detail_url(&self.api_base, id)?;
        let response = self.client.get(url.clone()).send()?;
        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }
        Ok(response.json()?)
    }

    /// Stream a release to `dest`, reporting progress per chunk.
    ///
    /// `progress` receives bytes received so far and the total from
    /// Content-Length (0 when unknown). On failure the partially-written
    /// file is left for the caller to clean up.
    pub fn download(
        &self,
        url: &str,
        dest: &Path,
        mut progress: impl FnMut(u64, u64),
    ) -> Result<()> {
        info!("Downloading {} to {}", url, dest.display());

        let mut response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let total = response.content_length().unwrap_or(0);
        let mut file = File::create(dest)?;
        let mut received: u64 = 0;
        let mut buffer = [0u8; CHUNK_SIZE];
        loop {
            let n = response.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            file.write_all(&buffer[..n])?;
            received += n as u64;
            progress(received, total);
        }
        file.flush()?;

        debug!("Downloaded {} bytes to {}", received, dest.display());
        Ok(())
    }
}

/// Pick the newest release of a remote entry.
///
/// A direct latest-release field is authoritative. Otherwise the release
/// list is sorted ascending by version and the maximum wins. `None` when the
/// record carries no release data in any recognized shape.
pub fn pick_latest_release(entry: &RemoteEntry) -> Option<Release> {
    if let Some(latest) = &entry.latest {
        return Some(latest.clone());
    }
    if entry.releases.is_empty() {
        return None;
    }

    let mut sorted = entry.releases.clone();
    sorted.sort_by(|a, b| {
        version::compare(
            a.version.as_deref().unwrap_or("0"),
            b.version.as_deref().unwrap_or("0"),
        )
    });
    sorted.pop()
}

/// Resolve a release's download reference into a fetchable URL.
///
/// Absolute URLs pass through unchanged; absolute paths are appended to the
/// API base; bare filenames are joined with a separator. `None` when the
/// release carries no reference.
pub fn resolve_download_url(api_base: &str, release: &Release) -> Option<String> {
    let candidate = release.download.as_deref()?;
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        Some(candidate.to_string())
    } else if candidate.starts_with('/') {
        Some(format!("{}{}", api_base, candidate))
    } else {
        Some(format!("{}/{}", api_base, candidate))
    }
}

/// Build the detail endpoint URL, percent-encoding the id path segment
fn detail_url(api_base: &str, id: &str) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(api_base)
        .map_err(|e| Error::Parse(format!("Invalid API base {api_base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| Error::Parse(format!("Invalid API base {api_base}")))?
        .pop_if_empty()
        .extend(["api", "mod", id]);
    Ok(url)
}

/// Extract the result sequence from a search response.
///
/// The catalog returns either a bare array or an object with the array under
/// `mods` or `data`; anything else counts as an empty result.
fn search_results(body: &Value) -> Vec<Value> {
    for key in ["mods", "data"] {
        if let Some(list) = body.get(key).and_then(Value::as_array) {
            return list.clone();
        }
    }
    body.as_array().cloned().unwrap_or_default()
}

/// Read a mod id from a raw catalog record, under either known field name
fn entry_id(value: &Value) -> Option<String> {
    ID_FIELDS
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Normalize a raw catalog record into a [`RemoteEntry`]
fn normalize_entry(value: &Value) -> RemoteEntry {
    let latest = value.get("latestrelease").map(normalize_release);

    let releases = RELEASE_LIST_FIELDS
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_array))
        .map(|list| list.iter().map(normalize_release).collect())
        .unwrap_or_default();

    RemoteEntry {
        id: entry_id(value),
        version: value.get("version").and_then(scalar_string),
        latest,
        releases,
    }
}

/// Normalize a raw release record into a [`Release`]
fn normalize_release(value: &Value) -> Release {
    let version = ["version", "Version"]
        .iter()
        .find_map(|key| value.get(*key).and_then(scalar_string));

    let download = DOWNLOAD_FIELDS
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string);

    Release { version, download }
}

/// Stringify a scalar version value; the catalog sometimes emits numbers
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
