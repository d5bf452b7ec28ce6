use reqwest::header::USER_AGENT;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::config::Config;
use crate::dto::head_hunter_dto::{HhArea, HhSearchResponse, HhVacancy};
use crate::dto::vacancy_dto::VacancyDraft;
use crate::error::{Error, Result};
use crate::models::search::{Experience, SearchQuery, Site, SortOrder};
use crate::models::vacancy::Vacancy;
use crate::services::{fetch_json, page_size, JobApi};
use crate::utils::text::{normalize_city_name, strip_html};

const EXPERIENCE: [(Experience, &str); 4] = [
    (Experience::None, "noExperience"),
    (Experience::Between1And3, "between1And3"),
    (Experience::Between3And6, "between3And6"),
    (Experience::MoreThan6, "moreThan6"),
];

const ORDER_BY: [(SortOrder, &str); 2] = [
    (SortOrder::PublicationTime, "publication_time"),
    (SortOrder::Salary, "salary_desc"),
];

/// Client for the hh.ru public API. No key needed, but every request must
/// carry a `User-Agent`.
#[derive(Clone)]
pub struct HeadHunterService {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl HeadHunterService {
    pub fn new(client: Client, base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, &config.hh_api_url, &config.user_agent)
    }

    fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![("text", query.text.clone())];
        if let Some(area) = &query.location {
            params.push(("area", area.clone()));
        }
        if let Some(experience) = query.experience {
            if let Some((_, value)) = EXPERIENCE.iter().find(|(e, _)| *e == experience) {
                params.push(("experience", (*value).to_string()));
            }
        }
        if let Some(per_page) = page_size(query.limit) {
            params.push(("per_page", per_page.to_string()));
        }
        if let Some(sort) = query.sort {
            if let Some((_, value)) = ORDER_BY.iter().find(|(s, _)| *s == sort) {
                params.push(("order_by", (*value).to_string()));
            }
        }
        params
    }

    fn to_vacancy(item: HhVacancy) -> Result<Vacancy> {
        let id = item.id.trim().parse::<i64>().map_err(|_| {
            Error::Validation(format!("hh.ru vacancy id '{}' is not an integer", item.id))
        })?;

        let mut draft = VacancyDraft::new(id);
        draft.title = item.name;
        draft.company = item.employer.and_then(|employer| employer.name);
        draft.area = item.area.and_then(|area| area.name);
        draft.url = item.alternate_url.or(item.url);
        draft.description = item
            .snippet
            .and_then(|snippet| snippet.responsibility.or(snippet.requirement))
            .map(|text| strip_html(&text));

        if let Some(salary) = item.salary {
            draft.salary_from = salary.from.and_then(Decimal::from_f64);
            draft.salary_to = salary.to.and_then(Decimal::from_f64);
            draft.currency = salary.currency;
        }

        Ok(draft.into())
    }
}

impl JobApi for HeadHunterService {
    fn site(&self) -> Site {
        Site::HeadHunter
    }

    #[instrument(skip(self), fields(site = "hh.ru"))]
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Vacancy>> {
        let request = self
            .client
            .get(format!("{}/vacancies", self.base_url))
            .header(USER_AGENT, &self.user_agent)
            .query(&Self::search_params(query));

        let Some(body) = fetch_json::<HhSearchResponse>(request, self.site()).await? else {
            return Ok(Vec::new());
        };
        if body.found == 0 || body.items.is_empty() {
            info!("No vacancies found");
            return Ok(Vec::new());
        }

        let vacancies = body
            .items
            .into_iter()
            .map(Self::to_vacancy)
            .collect::<Result<Vec<_>>>()?;
        info!(count = vacancies.len(), found = body.found, "Fetched vacancies");
        Ok(vacancies)
    }

    #[instrument(skip(self), fields(site = "hh.ru"))]
    async fn resolve_location(&self, city: &str) -> Result<Option<String>> {
        let name = normalize_city_name(city);
        let request = self
            .client
            .get(format!("{}/areas", self.base_url))
            .header(USER_AGENT, &self.user_agent);

        let Some(areas) = fetch_json::<Vec<HhArea>>(request, self.site()).await? else {
            return Ok(None);
        };
        Ok(areas
            .iter()
            .find_map(|area| area.find(&name))
            .map(|area| area.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(raw: serde_json::Value) -> HhVacancy {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_search_params_full() {
        let query = SearchQuery {
            location: Some("1".to_string()),
            experience: Some(Experience::Between3And6),
            limit: Some(50),
            sort: Some(SortOrder::Salary),
            ..SearchQuery::new("rust")
        };
        let params = HeadHunterService::search_params(&query);
        assert_eq!(
            params,
            vec![
                ("text", "rust".to_string()),
                ("area", "1".to_string()),
                ("experience", "between3And6".to_string()),
                ("per_page", "50".to_string()),
                ("order_by", "salary_desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_params_without_filters() {
        let params = HeadHunterService::search_params(&SearchQuery::new("python"));
        assert_eq!(params, vec![("text", "python".to_string())]);
    }

    #[test]
    fn test_maps_vacancy_with_null_salary() {
        let vacancy = HeadHunterService::to_vacancy(item(json!({
            "id": "93451234",
            "name": "Rust developer",
            "salary": null,
            "snippet": { "responsibility": "Write <highlighttext>Rust</highlighttext>", "requirement": null },
            "employer": { "name": "Acme" },
            "area": { "name": "Moscow" },
            "url": "https://api.hh.ru/vacancies/93451234",
            "alternate_url": "https://hh.ru/vacancy/93451234"
        })))
        .unwrap();

        assert_eq!(vacancy.id, 93451234);
        assert_eq!(vacancy.salary_from, Decimal::ZERO);
        assert_eq!(vacancy.salary_to, Decimal::ZERO);
        assert_eq!(vacancy.currency, "no data");
        assert_eq!(vacancy.description, "Write Rust");
        assert_eq!(vacancy.company, "Acme");
        assert_eq!(vacancy.area, "Moscow");
        assert_eq!(vacancy.url, "https://hh.ru/vacancy/93451234");
    }

    #[test]
    fn test_maps_partial_salary() {
        let vacancy = HeadHunterService::to_vacancy(item(json!({
            "id": "7",
            "name": "QA",
            "salary": { "from": 80000, "to": null, "currency": "RUR" }
        })))
        .unwrap();
        assert_eq!(vacancy.salary_from, Decimal::from(80000));
        assert_eq!(vacancy.salary_to, Decimal::ZERO);
        assert_eq!(vacancy.currency, "RUR");
        assert_eq!(vacancy.company, "no data");
        assert_eq!(vacancy.description, "no data");
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let result = HeadHunterService::to_vacancy(item(json!({ "id": "abc" })));
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
