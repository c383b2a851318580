//! On-disk copy of the project catalogue so the app can start offline.

use std::{
    fs,
    path::PathBuf,
    sync::OnceLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::Project;

const CACHE_FILENAME: &str = "projects_cache.json";

/// Catalogue entries older than this are refreshed on startup.
pub const PROJECTS_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsCache {
    /// Backend the catalogue came from; a different base URL invalidates it.
    pub base_url: String,
    /// Unix timestamp (seconds).
    pub cached_at: u64,
    pub projects: Vec<Project>,
}

impl ProjectsCache {
    pub fn new(base_url: impl Into<String>, projects: Vec<Project>) -> Self {
        Self {
            base_url: base_url.into(),
            cached_at: unix_now(),
            projects,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age() > PROJECTS_CACHE_TTL
    }

    pub fn age(&self) -> Duration {
        Duration::from_secs(unix_now().saturating_sub(self.cached_at))
    }

    pub fn fetched_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.cached_at)
    }

    pub fn age_string(&self) -> String {
        let secs = self.age().as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn cache_path() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("estate-compare");
        let _ = fs::create_dir_all(&base);
        base.join(CACHE_FILENAME)
    })
    .clone()
}

/// Loads the catalogue for `base_url`, expired or not. Callers decide
/// whether an expired copy is good enough.
pub fn load_projects_cache(base_url: &str) -> Option<ProjectsCache> {
    let path = cache_path();
    if !path.exists() {
        debug!(path = %path.display(), "no project cache on disk");
        return None;
    }

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            warn!(%err, "failed to read project cache");
            return None;
        }
    };
    match serde_json::from_str::<ProjectsCache>(&content) {
        Ok(cache) if cache.base_url == base_url => {
            info!(
                projects = cache.projects.len(),
                age = %cache.age_string(),
                "loaded project cache"
            );
            Some(cache)
        }
        Ok(cache) => {
            debug!(cached = %cache.base_url, current = base_url, "project cache belongs to another backend");
            None
        }
        Err(err) => {
            warn!(%err, "failed to parse project cache");
            None
        }
    }
}

pub fn save_projects_cache(cache: &ProjectsCache) -> Result<(), std::io::Error> {
    let path = cache_path();
    let content = serde_json::to_string(cache)?;
    fs::write(&path, content)?;
    info!(
        projects = cache.projects.len(),
        path = %path.display(),
        "saved project cache"
    );
    Ok(())
}

pub fn clear_projects_cache() -> Result<(), std::io::Error> {
    let path = cache_path();
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cache_is_fresh() {
        let cache = ProjectsCache::new("http://localhost/api/", Vec::new());
        assert!(!cache.is_expired());
        assert!(cache.age() < Duration::from_secs(5));
    }

    #[test]
    fn old_cache_expires_after_a_day() {
        let mut cache = ProjectsCache::new("http://localhost/api/", Vec::new());
        cache.cached_at = cache.cached_at.saturating_sub(25 * 60 * 60);
        assert!(cache.is_expired());
        assert_eq!(cache.age_string(), "1d");
    }

    #[test]
    fn age_string_uses_largest_unit() {
        let mut cache = ProjectsCache::new("x", Vec::new());
        cache.cached_at = cache.cached_at.saturating_sub(2 * 60 * 60 + 5);
        assert_eq!(cache.age_string(), "2h");
    }
}
