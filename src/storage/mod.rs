//! Persistence backends for vacancies.
//!
//! Every backend keeps the current record set in memory and exposes an
//! explicit `load`/`save` pair around it. `add`, `remove` and `search` are
//! provided on top of those two: each one reloads from the medium first and
//! mutations are flushed before the call returns, so the medium is always
//! the source of truth. Nothing here locks; callers serialize access.

pub mod csv_storage;
pub mod excel_storage;
pub mod file_storage;
pub mod json_storage;
pub mod postgres_storage;
pub mod text_storage;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::stats::RemoveOutcome;
use crate::models::vacancy::Vacancy;

pub use csv_storage::CsvStorage;
pub use excel_storage::ExcelStorage;
pub use json_storage::JsonStorage;
pub use postgres_storage::PostgresStorage;
pub use text_storage::TextStorage;

#[allow(async_fn_in_trait)]
pub trait VacancyStorage {
    fn vacancies(&self) -> &[Vacancy];

    fn vacancies_mut(&mut self) -> &mut Vec<Vacancy>;

    /// Replaces the in-memory set without touching the medium.
    fn replace(&mut self, vacancies: Vec<Vacancy>) {
        *self.vacancies_mut() = vacancies;
    }

    async fn load(&mut self) -> Result<()>;

    /// Writes the whole in-memory set, overwriting what the medium held.
    async fn save(&self) -> Result<()>;

    async fn add(&mut self, vacancy: Vacancy) -> Result<()> {
        self.load().await?;
        self.vacancies_mut().push(vacancy);
        self.save().await
    }

    async fn remove(&mut self, id: i64) -> Result<RemoveOutcome> {
        self.load().await?;
        let before = self.vacancies().len();
        self.vacancies_mut().retain(|vacancy| vacancy.id != id);
        if self.vacancies().len() == before {
            return Ok(RemoveOutcome::NotFound);
        }
        self.save().await?;
        Ok(RemoveOutcome::Removed)
    }

    /// Case-sensitive substring match against title and description.
    async fn search(&mut self, term: &str) -> Result<Vec<Vacancy>> {
        self.load().await?;
        Ok(self
            .vacancies()
            .iter()
            .filter(|vacancy| vacancy.mentions(term))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Json,
    Csv,
    Excel,
    Text,
    Postgres,
}

impl StorageKind {
    /// File extension for file-backed kinds.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            StorageKind::Json => Some("json"),
            StorageKind::Csv => Some("csv"),
            StorageKind::Excel => Some("xlsx"),
            StorageKind::Text => Some("txt"),
            StorageKind::Postgres => None,
        }
    }

    pub fn default_path(&self, data_dir: &Path) -> Option<PathBuf> {
        self.extension()
            .map(|ext| data_dir.join(format!("vacancies.{}", ext)))
    }
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StorageKind::Json),
            "csv" => Ok(StorageKind::Csv),
            "xlsx" | "excel" => Ok(StorageKind::Excel),
            "txt" | "text" => Ok(StorageKind::Text),
            "postgres" | "db" | "sql" => Ok(StorageKind::Postgres),
            other => Err(Error::Validation(format!(
                "unknown storage format '{}', expected json, csv, xlsx, txt or postgres",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.extension() {
            Some(ext) => write!(f, "{}", ext),
            None => write!(f, "postgres"),
        }
    }
}

/// One of the supported backends.
pub enum Storage {
    Json(JsonStorage),
    Csv(CsvStorage),
    Excel(ExcelStorage),
    Text(TextStorage),
    Postgres(PostgresStorage),
}

impl Storage {
    /// Opens a file-backed storage of the given kind. The file is not read
    /// until [`VacancyStorage::load`].
    pub fn file(kind: StorageKind, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        Ok(match kind {
            StorageKind::Json => Storage::Json(JsonStorage::new(path)),
            StorageKind::Csv => Storage::Csv(CsvStorage::new(path)),
            StorageKind::Excel => Storage::Excel(ExcelStorage::new(path)),
            StorageKind::Text => Storage::Text(TextStorage::new(path)),
            StorageKind::Postgres => {
                return Err(Error::Config(
                    "postgres storage needs a database connection, not a file path".to_string(),
                ))
            }
        })
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            Storage::Json(_) => StorageKind::Json,
            Storage::Csv(_) => StorageKind::Csv,
            Storage::Excel(_) => StorageKind::Excel,
            Storage::Text(_) => StorageKind::Text,
            Storage::Postgres(_) => StorageKind::Postgres,
        }
    }

    pub fn as_postgres(&self) -> Option<&PostgresStorage> {
        match self {
            Storage::Postgres(storage) => Some(storage),
            _ => None,
        }
    }
}

impl VacancyStorage for Storage {
    fn vacancies(&self) -> &[Vacancy] {
        match self {
            Storage::Json(s) => s.vacancies(),
            Storage::Csv(s) => s.vacancies(),
            Storage::Excel(s) => s.vacancies(),
            Storage::Text(s) => s.vacancies(),
            Storage::Postgres(s) => s.vacancies(),
        }
    }

    fn vacancies_mut(&mut self) -> &mut Vec<Vacancy> {
        match self {
            Storage::Json(s) => s.vacancies_mut(),
            Storage::Csv(s) => s.vacancies_mut(),
            Storage::Excel(s) => s.vacancies_mut(),
            Storage::Text(s) => s.vacancies_mut(),
            Storage::Postgres(s) => s.vacancies_mut(),
        }
    }

    async fn load(&mut self) -> Result<()> {
        match self {
            Storage::Json(s) => s.load().await,
            Storage::Csv(s) => s.load().await,
            Storage::Excel(s) => s.load().await,
            Storage::Text(s) => s.load().await,
            Storage::Postgres(s) => s.load().await,
        }
    }

    async fn save(&self) -> Result<()> {
        match self {
            Storage::Json(s) => s.save().await,
            Storage::Csv(s) => s.save().await,
            Storage::Excel(s) => s.save().await,
            Storage::Text(s) => s.save().await,
            Storage::Postgres(s) => s.save().await,
        }
    }
}
