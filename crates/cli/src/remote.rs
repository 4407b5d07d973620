//! Remote sources, downloaded once into a local cache directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Context;
use chrono::DateTime;
use sha2::{Digest, Sha256};

use merger::{Fetch, LocalFiles, SourceError, SourceSpec};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// `Fetch` that serves URLs from a download cache and local paths as is.
///
/// Cached files carry the server's `Date` as their mtime, so formats
/// that read the year or start time from the file keep working.
#[derive(Debug, Clone)]
pub struct RemoteCache {
    dir: PathBuf,
}

impl RemoteCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn cache_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.dir.join(format!("{}.log", hex::encode(digest)))
    }

    fn download(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create cache directory {}", self.dir.display()))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        let mut response = client.get(url).send()?.error_for_status()?;

        let modified = response
            .headers()
            .get(reqwest::header::DATE)
            .and_then(|value| value.to_str().ok())
            .and_then(http_date);

        let partial = dest.with_extension("part");
        let mut file = File::create(&partial)?;
        response.copy_to(&mut file)?;
        if let Some(modified) = modified {
            file.set_modified(modified)?;
        }
        drop(file);
        fs::rename(&partial, dest).context("cannot move download into the cache")?;
        Ok(())
    }
}

impl Fetch for RemoteCache {
    fn local_path(&self, spec: &SourceSpec) -> Result<PathBuf, SourceError> {
        if !spec.is_remote {
            return LocalFiles.local_path(spec);
        }

        let path = self.cache_path(&spec.path);
        if path.exists() {
            tracing::info!("CACHED {} as {}", spec.path, path.display());
            return Ok(path);
        }

        tracing::info!("Downloading {} to {}", spec.path, path.display());
        self.download(&spec.path, &path).map_err(|e| SourceError::Fetch {
            url: spec.path.clone(),
            reason: format!("{:#}", e),
        })?;
        Ok(path)
    }
}

/// Parse an HTTP `Date` header (`Sun, 06 Nov 1994 08:49:37 GMT`).
fn http_date(value: &str) -> Option<SystemTime> {
    DateTime::parse_from_rfc2822(value).ok().map(SystemTime::from)
}
