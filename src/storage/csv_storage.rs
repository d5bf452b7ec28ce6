use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::dto::vacancy_dto::VacancyDraft;
use crate::error::{Error, Result};
use crate::models::vacancy::Vacancy;
use crate::storage::file_storage::{FileFormat, FileStorage};

pub const CSV_HEADER: [&str; 9] = [
    "id",
    "title",
    "company",
    "description",
    "salary_from",
    "salary_to",
    "currency",
    "area",
    "url",
];

/// One CSV row. Text cells are plain strings so an empty cell stays empty;
/// only an empty salary cell falls back to zero.
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: i64,
    title: String,
    company: String,
    description: String,
    salary_from: Option<f64>,
    salary_to: Option<f64>,
    currency: String,
    area: String,
    url: String,
}

impl TryFrom<CsvRow> for Vacancy {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let salary = |amount: Option<f64>| -> Result<Option<Decimal>> {
            amount
                .map(|value| {
                    Decimal::from_f64(value).ok_or_else(|| {
                        Error::Validation(format!("salary {} is out of range", value))
                    })
                })
                .transpose()
        };

        Ok(VacancyDraft {
            title: Some(row.title),
            company: Some(row.company),
            description: Some(row.description),
            salary_from: salary(row.salary_from)?,
            salary_to: salary(row.salary_to)?,
            currency: Some(row.currency),
            area: Some(row.area),
            url: Some(row.url),
            ..VacancyDraft::new(row.id)
        }
        .into())
    }
}

/// Comma-separated rows under a fixed header.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

pub type CsvStorage = FileStorage<CsvFormat>;

impl FileFormat for CsvFormat {
    const NAME: &'static str = "csv";

    fn decode(bytes: &[u8]) -> Result<Vec<Vacancy>> {
        let mut reader = csv::Reader::from_reader(bytes);
        reader
            .deserialize::<CsvRow>()
            .map(|row| {
                row.map_err(|err| match err.kind() {
                    csv::ErrorKind::Deserialize { .. } => Error::Validation(err.to_string()),
                    _ => Error::Corrupt(err.to_string()),
                })
                .and_then(Vacancy::try_from)
            })
            .collect()
    }

    fn encode(vacancies: &[Vacancy]) -> Result<Vec<u8>> {
        // Header is written by hand so an empty set still gets one.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for vacancy in vacancies {
            writer.serialize(vacancy)?;
        }
        writer.into_inner().map_err(|e| Error::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_still_has_header() {
        let encoded = String::from_utf8(CsvFormat::encode(&[]).unwrap()).unwrap();
        assert_eq!(
            encoded.trim_end(),
            "id,title,company,description,salary_from,salary_to,currency,area,url"
        );
        assert!(CsvFormat::decode(encoded.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_decode_keeps_empty_text_and_zeroes_empty_salary() {
        let raw = "id,title,company,description,salary_from,salary_to,currency,area,url\n\
                   5,Data engineer,,,,120000,RUR,Kazan,\n";
        let vacancies = CsvFormat::decode(raw.as_bytes()).unwrap();
        assert_eq!(vacancies.len(), 1);
        let vacancy = &vacancies[0];
        assert_eq!(vacancy.id, 5);
        assert_eq!(vacancy.company, "");
        assert_eq!(vacancy.description, "");
        assert_eq!(vacancy.salary_from, Decimal::ZERO);
        assert_eq!(vacancy.salary_to, Decimal::from(120000));
        assert_eq!(vacancy.url, "");
    }

    #[test]
    fn test_missing_column_is_validation_error() {
        let raw = "id,title\n1,Tester\n";
        assert!(matches!(
            CsvFormat::decode(raw.as_bytes()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_decode_non_integer_id_is_validation_error() {
        let raw = "id,title,company,description,salary_from,salary_to,currency,area,url\n\
                   abc,Title,Co,Desc,1,2,RUR,Area,http://x\n";
        assert!(matches!(
            CsvFormat::decode(raw.as_bytes()),
            Err(Error::Validation(_))
        ));
    }
}
