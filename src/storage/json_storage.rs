use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::models::vacancy::Vacancy;
use crate::storage::file_storage::{FileFormat, FileStorage};

/// Pretty-printed JSON array of vacancy objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

pub type JsonStorage = FileStorage<JsonFormat>;

impl FileFormat for JsonFormat {
    const NAME: &'static str = "json";

    fn decode(bytes: &[u8]) -> Result<Vec<Vacancy>> {
        let items: Vec<JsonValue> =
            serde_json::from_slice(bytes).map_err(|e| Error::Corrupt(e.to_string()))?;
        items.into_iter().map(Vacancy::from_value).collect()
    }

    fn encode(vacancies: &[Vacancy]) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(vacancies)?)
    }
}
