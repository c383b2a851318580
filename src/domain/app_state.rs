use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};

use super::{
    entities::{EntityId, Place, Project, PropertyType, User},
    selection::ComparisonSlots,
    statistics::MarketStatistics,
    store::EntityStore,
};

/// User preferences that survive restarts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Overrides the configured backend base URL when set.
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default = "default_highlight")]
    pub highlight_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            highlight_enabled: default_highlight(),
        }
    }
}

fn default_highlight() -> bool {
    true
}

/// Logged-in user, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub settings: Settings,
    pub session: Session,
    pub selection: ComparisonSlots,
    pub projects: EntityStore<Project>,
    pub places: EntityStore<Place>,
    pub property_types: EntityStore<PropertyType>,
    pub users: EntityStore<User>,
    pub statistics: Option<MarketStatistics>,
    /// Admin pages scope places and property types to this project.
    pub admin_project: Option<EntityId>,
    pub cache: CacheTimestamps,
}

impl AppState {
    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.cache.is_stale(resource, ttl)
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.settings = persisted.settings;
        self.session.token = persisted.token;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            settings: self.settings.clone(),
            token: self.session.token.clone(),
        }
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct CacheTimestamps {
    entries: HashMap<CacheResource, SystemTime>,
}

impl CacheTimestamps {
    pub fn record_fetch(&mut self, resource: CacheResource, fetched_at: SystemTime) {
        self.entries.insert(resource, fetched_at);
    }

    pub fn fetched_at(&self, resource: &CacheResource) -> Option<SystemTime> {
        self.entries.get(resource).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheResource, &SystemTime)> {
        self.entries.iter()
    }

    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.fetched_at(resource)
            .map(|time| time.elapsed().map(|elapsed| elapsed > ttl).unwrap_or(true))
            .unwrap_or(true)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheResource {
    Projects,
    ProjectDetail(EntityId),
    Statistics,
}

impl CacheResource {
    pub fn label(&self) -> String {
        match self {
            CacheResource::Projects => "Project catalogue".to_string(),
            CacheResource::ProjectDetail(id) => format!("Project details ({id})"),
            CacheResource::Statistics => "Market statistics".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_resources_are_stale() {
        let cache = CacheTimestamps::default();
        assert!(cache.is_stale(&CacheResource::Projects, Duration::from_secs(60)));
    }

    #[test]
    fn fresh_fetch_is_not_stale() {
        let mut cache = CacheTimestamps::default();
        cache.record_fetch(CacheResource::Statistics, SystemTime::now());
        assert!(!cache.is_stale(&CacheResource::Statistics, Duration::from_secs(60)));
        assert!(cache.is_stale(
            &CacheResource::ProjectDetail("p1".into()),
            Duration::from_secs(60)
        ));
    }

    #[test]
    fn persisted_state_round_trips_settings_and_token() {
        let mut state = AppState::default();
        state.settings.highlight_enabled = false;
        state.session.token = Some("abc".into());

        let mut restored = AppState::default();
        restored.apply_persisted(state.to_persisted());
        assert!(!restored.settings.highlight_enabled);
        assert!(restored.session.is_authenticated());
    }

    #[test]
    fn older_settings_files_default_to_highlighting() {
        let persisted: PersistedState = serde_json::from_str("{}").unwrap();
        assert!(persisted.settings.highlight_enabled);
        assert_eq!(persisted.token, None);
    }
}
