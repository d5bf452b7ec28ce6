use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

/// Placeholder stored in every text field the source did not provide.
pub const NO_DATA: &str = "no data";

/// A normalized job posting.
///
/// Equality and ordering only look at the salary terms, so two postings with
/// different ids or titles can compare equal. Ordering is asymmetric on
/// purpose: `<`/`<=` compare `salary_from` while `>`/`>=` compare
/// `salary_to`. Salary comparison downstream depends on exactly this.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vacancy {
    pub id: i64,
    #[serde(default = "no_data", deserialize_with = "text_or_sentinel")]
    pub title: String,
    #[serde(default = "no_data", deserialize_with = "text_or_sentinel")]
    pub company: String,
    #[serde(default = "no_data", deserialize_with = "text_or_sentinel")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "salary_or_zero",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub salary_from: Decimal,
    #[serde(
        default,
        deserialize_with = "salary_or_zero",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub salary_to: Decimal,
    #[serde(default = "no_data", deserialize_with = "text_or_sentinel")]
    pub currency: String,
    #[serde(default = "no_data", deserialize_with = "text_or_sentinel")]
    pub area: String,
    #[serde(default = "no_data", deserialize_with = "text_or_sentinel")]
    pub url: String,
}

fn no_data() -> String {
    NO_DATA.to_string()
}

fn text_or_sentinel<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(no_data))
}

fn salary_or_zero<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(Decimal::ZERO),
        Some(amount) => Decimal::from_f64(amount).ok_or_else(|| {
            serde::de::Error::custom(format!("salary {} is out of range", amount))
        }),
    }
}

impl Vacancy {
    /// Builds a vacancy from loosely typed key-value input.
    ///
    /// Missing or `null` fields become sentinels; a value of the wrong type
    /// fails the whole record.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::Validation(format!(
                "vacancy must be an object, got: {}",
                value
            )));
        }
        serde_json::from_value(value).map_err(|e| Error::Validation(e.to_string()))
    }

    pub fn has_salary(&self) -> bool {
        !self.salary_from.is_zero() || !self.salary_to.is_zero()
    }

    pub fn salary_range(&self) -> String {
        if !self.has_salary() {
            return "no salary info".to_string();
        }

        let mut parts = Vec::with_capacity(3);
        if !self.salary_from.is_zero() {
            parts.push(format!("from {}", self.salary_from.trunc()));
        }
        if !self.salary_to.is_zero() {
            parts.push(format!("to {}", self.salary_to.trunc()));
        }
        parts.push(self.currency.clone());
        parts.join(" ")
    }

    pub fn mentions(&self, term: &str) -> bool {
        self.title.contains(term) || self.description.contains(term)
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Company: {}", self.company)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Salary: {}", self.salary_range())?;
        writeln!(f, "Area: {}", self.area)?;
        write!(f, "URL: {}", self.url)
    }
}

impl PartialEq for Vacancy {
    fn eq(&self, other: &Self) -> bool {
        self.salary_from == other.salary_from
            && self.salary_to == other.salary_to
            && self.currency == other.currency
    }
}

impl PartialOrd for Vacancy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        self.salary_from.partial_cmp(&other.salary_from)
    }

    fn lt(&self, other: &Self) -> bool {
        self.salary_from < other.salary_from
    }

    fn le(&self, other: &Self) -> bool {
        self.salary_from <= other.salary_from
    }

    fn gt(&self, other: &Self) -> bool {
        self.salary_to > other.salary_to
    }

    fn ge(&self, other: &Self) -> bool {
        self.salary_to >= other.salary_to
    }
}
