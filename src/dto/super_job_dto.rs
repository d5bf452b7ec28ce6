use serde::Deserialize;
use serde_json::Value as JsonValue;

/// `GET /vacancies/` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct SjSearchResponse {
    #[serde(default)]
    pub objects: Vec<SjVacancy>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SjVacancy {
    /// Normally a number; anything else is rejected while mapping.
    pub id: JsonValue,
    pub profession: Option<String>,
    pub firm_name: Option<String>,
    pub candidat: Option<String>,
    pub payment_from: Option<f64>,
    pub payment_to: Option<f64>,
    pub currency: Option<String>,
    pub town: Option<SjTown>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SjTown {
    pub id: Option<i64>,
    pub title: String,
}

/// `GET /towns/` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct SjTownsResponse {
    #[serde(default)]
    pub objects: Vec<SjTown>,
}
