//! Asynchronous client for the estate backend REST API.
//!
//! - Every response arrives wrapped in a `{ meta, data }` envelope.
//! - Requests carry the bearer token when one is set.
//! - The project catalogue is cached in memory and on disk with stale
//!   fallbacks so the compare page keeps working offline.

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{
    forms::{PlaceDraft, ProjectDraft, PropertyTypeDraft, UserDraft},
    statistics::{merge_parking, AreaBucket, DistrictBucket, ParkingStatsResponse, PriceBucket},
    MarketStatistics, Place, Price, Project, ProjectDetails, PropertyType, User,
};
use crate::infra::cache::{load_projects_cache, save_projects_cache, ProjectsCache};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);
const USER_AGENT: &str = concat!("estate-compare/", env!("CARGO_PKG_VERSION"));

/// Page size used when the compare page pulls every place of a project.
pub const DETAIL_PLACES_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("api error: {0}")]
    Api(String),
    #[error("session expired, please log in again")]
    Unauthorized,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiMeta {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    meta: ApiMeta,
    data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    fn into_data(self) -> Result<Option<T>, ApiClientError> {
        if self.meta.status.eq_ignore_ascii_case("success") {
            Ok(self.data)
        } else {
            Err(ApiClientError::Api(
                self.meta.message.unwrap_or(self.meta.status),
            ))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Default)]
struct ApiCache {
    projects: Option<Cached<Vec<Project>>>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    cache: Arc<Mutex<ApiCache>>,
    ttl: Duration,
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url
            && self.token == other.token
            && Arc::ptr_eq(&self.cache, &other.cache)
    }
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<Self, ApiClientError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            token: None,
            cache: Arc::new(Mutex::new(ApiCache::default())),
            ttl: DEFAULT_TTL,
        })
    }

    /// Same client and cache, different credentials.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.projects = None;
    }

    // Auth & users

    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiClientError> {
        let url = self.url("auth/login")?;
        let body = LoginRequest { username, password };
        let response: LoginResponse = self.fetch_data(self.http.post(url).json(&body)).await?;
        info!(username, "logged in");
        Ok(response.token)
    }

    pub async fn current_user(&self) -> Result<User, ApiClientError> {
        let url = self.url("users/me")?;
        self.fetch_data(self.http.get(url)).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiClientError> {
        let url = self.url("users")?;
        self.fetch_data(self.http.get(url)).await
    }

    pub async fn create_user(&self, draft: &UserDraft) -> Result<User, ApiClientError> {
        let url = self.url("users")?;
        self.fetch_data(self.http.post(url).json(draft)).await
    }

    pub async fn update_user(&self, id: &str, draft: &UserDraft) -> Result<User, ApiClientError> {
        let url = self.url(&format!("users/{id}"))?;
        self.fetch_data(self.http.put(url).json(draft)).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiClientError> {
        let url = self.url(&format!("users/{id}"))?;
        self.fetch_empty(self.http.delete(url)).await
    }

    // Projects

    /// Project catalogue with in-memory and on-disk caching.
    ///
    /// `force` skips both caches but still falls back to them when the
    /// request fails.
    pub async fn get_projects(
        &self,
        force: bool,
    ) -> Result<CachedPayload<Vec<Project>>, ApiClientError> {
        if !force {
            if let Some(payload) = self.cached_projects().await {
                return Ok(payload);
            }
            if let Some(disk) = load_projects_cache(self.base_url.as_str()) {
                if !disk.is_expired() {
                    let fetched_at = disk.fetched_at();
                    self.cache.lock().await.projects =
                        Some(Cached::new(disk.projects.clone(), fetched_at));
                    return Ok(CachedPayload::new(disk.projects, fetched_at, CacheStatus::Cached));
                }
            }
        }

        let url = self.url("projects")?;
        match self.fetch_data::<Vec<Project>>(self.http.get(url)).await {
            Ok(projects) => {
                info!(count = projects.len(), "fetched project catalogue");
                let disk = ProjectsCache::new(self.base_url.as_str(), projects.clone());
                if let Err(err) = save_projects_cache(&disk) {
                    warn!(%err, "failed to save project cache");
                }
                Ok(self.store_projects(projects).await)
            }
            Err(ApiClientError::Unauthorized) => Err(ApiClientError::Unauthorized),
            Err(error) => {
                warn!(%error, "project catalogue request failed; trying caches");
                if let Some(stale) = self.cached_projects_stale().await {
                    return Ok(stale);
                }
                if let Some(disk) = load_projects_cache(self.base_url.as_str()) {
                    let fetched_at = disk.fetched_at();
                    return Ok(CachedPayload::new(disk.projects, fetched_at, CacheStatus::Stale));
                }
                Err(error)
            }
        }
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, ApiClientError> {
        let url = self.url(&format!("projects/{id}"))?;
        self.fetch_data(self.http.get(url)).await
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ApiClientError> {
        let url = self.url("projects")?;
        let project = self.fetch_data(self.http.post(url).json(draft)).await?;
        self.clear_cache().await;
        Ok(project)
    }

    pub async fn update_project(
        &self,
        id: &str,
        draft: &ProjectDraft,
    ) -> Result<Project, ApiClientError> {
        let url = self.url(&format!("projects/{id}"))?;
        let project = self.fetch_data(self.http.put(url).json(draft)).await?;
        self.clear_cache().await;
        Ok(project)
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ApiClientError> {
        let url = self.url(&format!("projects/{id}"))?;
        self.fetch_empty(self.http.delete(url)).await?;
        self.clear_cache().await;
        Ok(())
    }

    // Places

    pub async fn list_places(
        &self,
        project_id: &str,
        size: u32,
        page: u32,
    ) -> Result<Vec<Place>, ApiClientError> {
        let mut url = self.url(&format!("projects/{project_id}/places"))?;
        url.query_pairs_mut()
            .append_pair("size", &size.to_string())
            .append_pair("page", &page.to_string());
        let mut places: Vec<Place> = self.fetch_data(self.http.get(url)).await?;
        for place in &mut places {
            place.project_id.get_or_insert_with(|| project_id.to_string());
        }
        Ok(places)
    }

    pub async fn create_place(
        &self,
        project_id: &str,
        draft: &PlaceDraft,
    ) -> Result<Place, ApiClientError> {
        let url = self.url(&format!("projects/{project_id}/places"))?;
        let mut place: Place = self.fetch_data(self.http.post(url).json(draft)).await?;
        place.project_id = Some(project_id.to_string());
        Ok(place)
    }

    pub async fn update_place(&self, id: &str, draft: &PlaceDraft) -> Result<Place, ApiClientError> {
        let url = self.url(&format!("places/{id}"))?;
        self.fetch_data(self.http.put(url).json(draft)).await
    }

    pub async fn delete_place(&self, id: &str) -> Result<(), ApiClientError> {
        let url = self.url(&format!("places/{id}"))?;
        self.fetch_empty(self.http.delete(url)).await
    }

    // Property types

    pub async fn list_property_types(
        &self,
        project_id: &str,
    ) -> Result<Vec<PropertyType>, ApiClientError> {
        let url = self.url(&format!("projects/{project_id}/property-types"))?;
        self.fetch_data(self.http.get(url)).await
    }

    pub async fn create_property_type(
        &self,
        project_id: &str,
        draft: &PropertyTypeDraft,
    ) -> Result<PropertyType, ApiClientError> {
        let url = self.url(&format!("projects/{project_id}/property-types"))?;
        let mut property: PropertyType = self.fetch_data(self.http.post(url).json(draft)).await?;
        property.project_id = Some(project_id.to_string());
        Ok(property)
    }

    pub async fn update_property_type(
        &self,
        id: &str,
        draft: &PropertyTypeDraft,
    ) -> Result<PropertyType, ApiClientError> {
        let url = self.url(&format!("property-types/{id}"))?;
        self.fetch_data(self.http.put(url).json(draft)).await
    }

    pub async fn delete_property_type(&self, id: &str) -> Result<(), ApiClientError> {
        let url = self.url(&format!("property-types/{id}"))?;
        self.fetch_empty(self.http.delete(url)).await
    }

    // Prices & details

    pub async fn list_prices(&self, project_id: &str) -> Result<Vec<Price>, ApiClientError> {
        let url = self.url(&format!("projects/{project_id}/prices"))?;
        self.fetch_data(self.http.get(url)).await
    }

    /// Property types, places and prices of one project, fetched concurrently.
    pub async fn project_details(&self, project_id: &str) -> Result<ProjectDetails, ApiClientError> {
        debug!(project_id, "fetching project details");
        let (properties, places, prices) = tokio::try_join!(
            self.list_property_types(project_id),
            self.list_places(project_id, DETAIL_PLACES_PAGE_SIZE, 0),
            self.list_prices(project_id),
        )?;
        Ok(ProjectDetails {
            properties,
            places,
            prices,
        })
    }

    // Statistics

    pub async fn statistics(&self) -> Result<MarketStatistics, ApiClientError> {
        let prices_url = self.url("stats/prices")?;
        let parking_url = self.url("stats/parking")?;
        let districts_url = self.url("stats/districts")?;
        let areas_url = self.url("stats/areas")?;
        let (prices, parking, districts, areas) = tokio::try_join!(
            self.fetch_data::<Vec<PriceBucket>>(self.http.get(prices_url)),
            self.fetch_data::<ParkingStatsResponse>(self.http.get(parking_url)),
            self.fetch_data::<Vec<DistrictBucket>>(self.http.get(districts_url)),
            self.fetch_data::<Vec<AreaBucket>>(self.http.get(areas_url)),
        )?;
        info!(
            price_buckets = prices.len(),
            districts = districts.len(),
            "fetched market statistics"
        );
        Ok(MarketStatistics {
            prices,
            parking: merge_parking(&parking),
            districts,
            areas,
        })
    }

    async fn cached_projects(&self) -> Option<CachedPayload<Vec<Project>>> {
        let cache = self.cache.lock().await;
        cache
            .projects
            .as_ref()
            .and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_projects_stale(&self) -> Option<CachedPayload<Vec<Project>>> {
        let cache = self.cache.lock().await;
        cache.projects.as_ref().map(Cached::stale)
    }

    async fn store_projects(&self, data: Vec<Project>) -> CachedPayload<Vec<Project>> {
        let fetched_at = SystemTime::now();
        let payload = CachedPayload::new(data.clone(), fetched_at, CacheStatus::Fresh);
        self.cache.lock().await.projects = Some(Cached::new(data, fetched_at));
        payload
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch_envelope<T>(&self, builder: RequestBuilder) -> Result<Option<T>, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "request rejected as unauthorized");
            return Err(ApiClientError::Unauthorized);
        }
        let body = response.bytes().await?;
        decode_envelope(status, &body)
    }

    async fn fetch_data<T>(&self, builder: RequestBuilder) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        self.fetch_envelope(builder)
            .await?
            .ok_or_else(|| ApiClientError::Api("response missing data".into()))
    }

    async fn fetch_empty(&self, builder: RequestBuilder) -> Result<(), ApiClientError> {
        self.fetch_envelope::<serde_json::Value>(builder)
            .await
            .map(|_| ())
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

/// Error bodies use the same envelope, so the backend's message wins over
/// the bare status code when it can be read.
fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<Option<T>, ApiClientError> {
    match serde_json::from_slice::<ApiEnvelope<T>>(body) {
        Ok(envelope) => envelope.into_data(),
        Err(_) if !status.is_success() => {
            match serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(body) {
                Ok(envelope) => envelope.into_data().and(Err(ApiClientError::Api(format!(
                    "request failed with status {status}"
                )))),
                Err(_) => Err(ApiClientError::Api(format!(
                    "request failed with status {status}"
                ))),
            }
        }
        Err(err) => Err(ApiClientError::Decode(err)),
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_yields_data() {
        let body = br#"{"meta":{"status":"SUCCESS","message":"ok"},"data":{"token":"abc"}}"#;
        let data: Option<LoginResponse> = decode_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(data.map(|d| d.token).as_deref(), Some("abc"));
    }

    #[test]
    fn error_envelope_surfaces_backend_message() {
        let body = br#"{"meta":{"status":"ERROR","message":"Wrong password"},"data":null}"#;
        let err = decode_envelope::<LoginResponse>(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert!(matches!(err, ApiClientError::Api(ref msg) if msg == "Wrong password"));
    }

    #[test]
    fn unreadable_error_body_reports_status() {
        let err = decode_envelope::<Vec<Project>>(StatusCode::BAD_GATEWAY, b"<html>").unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn unreadable_success_body_is_a_decode_error() {
        let err = decode_envelope::<Vec<Project>>(StatusCode::OK, b"[]").unwrap_err();
        assert!(matches!(err, ApiClientError::Decode(_)));
    }

    #[test]
    fn delete_envelope_without_data_is_fine() {
        let body = br#"{"meta":{"status":"SUCCESS","message":"deleted"}}"#;
        let data = decode_envelope::<serde_json::Value>(StatusCode::OK, body).unwrap();
        assert!(data.is_none());
    }

    fn decode_any<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, ApiClientError> {
        decode_envelope::<T>(StatusCode::OK, body)
    }

    #[derive(Debug, Deserialize)]
    struct Receipt {
        id: String,
    }

    #[test]
    fn payloads_without_default_decode_with_or_without_data() {
        let body = br#"{"meta":{"status":"SUCCESS"},"data":{"id":"r-1"}}"#;
        let receipt = decode_any::<Receipt>(body).unwrap();
        assert_eq!(receipt.map(|r| r.id).as_deref(), Some("r-1"));

        let empty = br#"{"meta":{"status":"SUCCESS"}}"#;
        assert!(decode_any::<Receipt>(empty).unwrap().is_none());
    }

    #[test]
    fn urls_join_under_base_path() {
        let client = ApiClient::new(Url::parse("http://localhost:8080/api/").unwrap()).unwrap();
        assert_eq!(
            client.url("projects/p1/places").unwrap().as_str(),
            "http://localhost:8080/api/projects/p1/places"
        );
        assert!(!client.has_token());
        assert!(client.with_token(Some("t".into())).has_token());
    }

    #[test]
    fn fresh_cache_entries_expire() {
        let entry = Cached::new(vec![1], SystemTime::now());
        assert_eq!(
            entry.if_fresh(Duration::from_secs(60)).map(|p| p.status),
            Some(CacheStatus::Cached)
        );
        let old = Cached::new(vec![1], SystemTime::now() - Duration::from_secs(120));
        assert!(old.if_fresh(Duration::from_secs(60)).is_none());
        assert_eq!(old.stale().status, CacheStatus::Stale);
    }
}
