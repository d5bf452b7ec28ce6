pub mod head_hunter_service;
pub mod super_job_service;
pub mod vacancy_service;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::search::{SearchQuery, Site};
use crate::models::vacancy::Vacancy;

pub use head_hunter_service::HeadHunterService;
pub use super_job_service::SuperJobService;

/// Largest page either job board serves in one request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A job board that can be searched for vacancies.
#[allow(async_fn_in_trait)]
pub trait JobApi {
    fn site(&self) -> Site;

    /// Runs one search. A request that never gets an HTTP answer yields an
    /// empty list rather than an error.
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Vacancy>>;

    /// Turns a free-text city name into the value the board expects in
    /// [`SearchQuery::location`]. `None` when the board does not know it.
    async fn resolve_location(&self, city: &str) -> Result<Option<String>>;
}

#[derive(Clone)]
pub enum Provider {
    HeadHunter(HeadHunterService),
    SuperJob(SuperJobService),
}

impl JobApi for Provider {
    fn site(&self) -> Site {
        match self {
            Provider::HeadHunter(api) => api.site(),
            Provider::SuperJob(api) => api.site(),
        }
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Vacancy>> {
        match self {
            Provider::HeadHunter(api) => api.fetch(query).await,
            Provider::SuperJob(api) => api.fetch(query).await,
        }
    }

    async fn resolve_location(&self, city: &str) -> Result<Option<String>> {
        match self {
            Provider::HeadHunter(api) => api.resolve_location(city).await,
            Provider::SuperJob(api) => api.resolve_location(city).await,
        }
    }
}

/// Sends `request` and decodes a JSON body.
///
/// `Ok(None)` means the exchange broke down before a complete response
/// arrived (connect, timeout, reset); that is logged and swallowed. Status
/// codes are not: 404 is [`Error::NotFound`], any other failure status is
/// [`Error::Upstream`].
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    site: Site,
) -> Result<Option<T>> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            warn!(%site, error = %err, "Request failed before a response arrived");
            return Ok(None);
        }
    };

    let status = response.status();
    let url = response.url().to_string();
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound(format!("{} returned 404 for {}", site, url)));
    }
    if !status.is_success() {
        return Err(Error::Upstream(format!(
            "{} returned {} for {}",
            site, status, url
        )));
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => {
            warn!(%site, error = %err, "Response body could not be read");
            return Ok(None);
        }
    };

    Ok(Some(serde_json::from_slice(&body)?))
}

fn page_size(limit: Option<u32>) -> Option<u32> {
    limit.map(|limit| limit.clamp(1, MAX_PAGE_SIZE))
}
