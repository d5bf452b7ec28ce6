use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::dto::super_job_dto::{SjSearchResponse, SjTownsResponse, SjVacancy};
use crate::dto::vacancy_dto::VacancyDraft;
use crate::error::{Error, Result};
use crate::models::search::{Experience, SearchQuery, Site, SortOrder};
use crate::models::vacancy::Vacancy;
use crate::services::{fetch_json, page_size, JobApi};
use crate::utils::text::normalize_city_name;

const API_KEY_HEADER: &str = "X-Api-App-Id";

const EXPERIENCE: [(Experience, &str); 4] = [
    (Experience::None, "1"),
    (Experience::Between1And3, "2"),
    (Experience::Between3And6, "3"),
    (Experience::MoreThan6, "4"),
];

const ORDER_FIELD: [(SortOrder, &str); 2] = [
    (SortOrder::PublicationTime, "date"),
    (SortOrder::Salary, "payment"),
];

#[derive(Clone)]
pub struct SuperJobService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SuperJobService {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(
            client,
            &config.superjob_api_url,
            config.superjob_api_key.clone(),
        )
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => {
                warn!("SJ_API_KEY is not set, SuperJob will likely reject the request");
                request
            }
        }
    }

    fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![("keyword", query.text.clone())];
        if let Some(town) = &query.location {
            params.push(("town", town.clone()));
        }
        if let Some(experience) = query.experience {
            if let Some((_, value)) = EXPERIENCE.iter().find(|(e, _)| *e == experience) {
                params.push(("experience", (*value).to_string()));
            }
        }
        if let Some(count) = page_size(query.limit) {
            params.push(("count", count.to_string()));
        }
        if let Some(sort) = query.sort {
            if let Some((_, value)) = ORDER_FIELD.iter().find(|(s, _)| *s == sort) {
                params.push(("order_field", (*value).to_string()));
                params.push(("order_direction", "desc".to_string()));
            }
        }
        params
    }

    fn to_vacancy(item: SjVacancy) -> Result<Vacancy> {
        let id = match &item.id {
            JsonValue::Number(number) => number.as_i64(),
            JsonValue::String(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            Error::Validation(format!("SuperJob vacancy id {} is not an integer", item.id))
        })?;

        // SuperJob reports a missing bound as 0, which is already the sentinel.
        let mut draft = VacancyDraft::new(id);
        draft.title = item.profession;
        draft.company = item.firm_name;
        draft.description = item.candidat;
        draft.salary_from = item.payment_from.and_then(Decimal::from_f64);
        draft.salary_to = item.payment_to.and_then(Decimal::from_f64);
        draft.currency = item.currency;
        draft.area = item.town.map(|town| town.title);
        draft.url = item.link;
        Ok(draft.into())
    }
}

impl JobApi for SuperJobService {
    fn site(&self) -> Site {
        Site::SuperJob
    }

    #[instrument(skip(self), fields(site = "SuperJob"))]
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Vacancy>> {
        let request = self.get("/vacancies/").query(&Self::search_params(query));

        let Some(body) = fetch_json::<SjSearchResponse>(request, self.site()).await? else {
            return Ok(Vec::new());
        };
        if body.objects.is_empty() {
            info!("No vacancies found");
            return Ok(Vec::new());
        }

        let vacancies = body
            .objects
            .into_iter()
            .map(Self::to_vacancy)
            .collect::<Result<Vec<_>>>()?;
        info!(count = vacancies.len(), total = body.total, "Fetched vacancies");
        Ok(vacancies)
    }

    /// SuperJob filters by town name, so a known town resolves to its
    /// canonical title.
    #[instrument(skip(self), fields(site = "SuperJob"))]
    async fn resolve_location(&self, city: &str) -> Result<Option<String>> {
        let name = normalize_city_name(city);
        let request = self.get("/towns/").query(&[("keyword", name.as_str())]);

        let Some(body) = fetch_json::<SjTownsResponse>(request, self.site()).await? else {
            return Ok(None);
        };
        Ok(body
            .objects
            .into_iter()
            .find(|town| town.title.to_lowercase() == name.to_lowercase())
            .map(|town| town.title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(raw: JsonValue) -> SjVacancy {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_search_params() {
        let query = SearchQuery {
            location: Some("Moscow".to_string()),
            experience: Some(Experience::None),
            limit: Some(10),
            sort: Some(SortOrder::PublicationTime),
            ..SearchQuery::new("java")
        };
        let params = SuperJobService::search_params(&query);
        assert!(params.contains(&("keyword", "java".to_string())));
        assert!(params.contains(&("town", "Moscow".to_string())));
        assert!(params.contains(&("experience", "1".to_string())));
        assert!(params.contains(&("count", "10".to_string())));
        assert!(params.contains(&("order_field", "date".to_string())));
    }

    #[test]
    fn test_no_sort_omits_order_field() {
        let params = SuperJobService::search_params(&SearchQuery::new("java"));
        assert!(params.iter().all(|(name, _)| *name != "order_field"));
    }

    #[test]
    fn test_maps_vacancy() {
        let vacancy = SuperJobService::to_vacancy(item(json!({
            "id": 46121111,
            "profession": "Python developer",
            "firm_name": "Initech",
            "candidat": "Three years of Django",
            "payment_from": 0,
            "payment_to": 250000,
            "currency": "rub",
            "town": { "id": 4, "title": "Moscow" },
            "link": "https://www.superjob.ru/vakansii/46121111.html"
        })))
        .unwrap();

        assert_eq!(vacancy.id, 46121111);
        assert_eq!(vacancy.title, "Python developer");
        assert_eq!(vacancy.company, "Initech");
        assert_eq!(vacancy.salary_from, Decimal::ZERO);
        assert_eq!(vacancy.salary_to, Decimal::from(250000));
        assert_eq!(vacancy.area, "Moscow");
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let result = SuperJobService::to_vacancy(item(json!({ "id": "n/a" })));
        assert!(matches!(result, Err(Error::Validation(_))));
        let result = SuperJobService::to_vacancy(item(json!({ "id": "15" })));
        assert_eq!(result.unwrap().id, 15);
    }
}
