use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::models::vacancy::Vacancy;
use crate::storage::file_storage::{FileFormat, FileStorage};
use crate::utils::text::single_line;

/// Display label and wire name for every field, in file order.
const FIELDS: [(&str, &str); 9] = [
    ("Id", "id"),
    ("Title", "title"),
    ("Company", "company"),
    ("Description", "description"),
    ("Salary From", "salary_from"),
    ("Salary To", "salary_to"),
    ("Currency", "currency"),
    ("Area", "area"),
    ("URL", "url"),
];

/// Human-readable blocks of `Label: value` lines separated by a blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

pub type TextStorage = FileStorage<TextFormat>;

impl FileFormat for TextFormat {
    const NAME: &'static str = "txt";

    fn decode(bytes: &[u8]) -> Result<Vec<Vacancy>> {
        let content = std::str::from_utf8(bytes).map_err(|e| Error::Corrupt(e.to_string()))?;

        let mut vacancies = Vec::new();
        let mut block = Map::new();

        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                if !block.is_empty() {
                    vacancies.push(Vacancy::from_value(JsonValue::Object(std::mem::take(
                        &mut block,
                    )))?);
                }
                continue;
            }

            let (label, value) = line.split_once(':').ok_or_else(|| {
                Error::Corrupt(format!("line {} is not a 'Label: value' pair", number + 1))
            })?;
            let Some((_, key)) = FIELDS.iter().find(|(name, _)| *name == label.trim()) else {
                continue;
            };
            block.insert((*key).to_string(), field_value(key, value.trim()));
        }

        if !block.is_empty() {
            vacancies.push(Vacancy::from_value(JsonValue::Object(block))?);
        }
        Ok(vacancies)
    }

    fn encode(vacancies: &[Vacancy]) -> Result<Vec<u8>> {
        let mut out = String::new();
        for vacancy in vacancies {
            let values = [
                vacancy.id.to_string(),
                single_line(&vacancy.title),
                single_line(&vacancy.company),
                single_line(&vacancy.description),
                vacancy.salary_from.normalize().to_string(),
                vacancy.salary_to.normalize().to_string(),
                single_line(&vacancy.currency),
                single_line(&vacancy.area),
                single_line(&vacancy.url),
            ];
            for ((label, _), value) in FIELDS.iter().zip(values) {
                out.push_str(&format!("{}: {}\n", label, value));
            }
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

/// Numbers are typed back where they parse; anything else stays a string so
/// record validation can reject it.
fn field_value(key: &str, raw: &str) -> JsonValue {
    match key {
        "id" => raw
            .parse::<i64>()
            .map(JsonValue::from)
            .unwrap_or_else(|_| JsonValue::from(raw)),
        "salary_from" | "salary_to" if raw.is_empty() => JsonValue::Null,
        "salary_from" | "salary_to" => raw
            .parse::<f64>()
            .map(JsonValue::from)
            .unwrap_or_else(|_| JsonValue::from(raw)),
        _ => JsonValue::from(raw),
    }
}
