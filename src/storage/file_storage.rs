use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, instrument, warn};

use crate::error::{Error, Result};
use crate::models::vacancy::Vacancy;
use crate::storage::VacancyStorage;

/// Byte-level codec for one file format.
///
/// `decode` reports unreadable input as [`Error::Corrupt`], which the file
/// storage absorbs; any other error (notably [`Error::Validation`] for a
/// well-formed file holding a bad record) is propagated.
pub trait FileFormat {
    const NAME: &'static str;

    fn decode(bytes: &[u8]) -> Result<Vec<Vacancy>>;

    fn encode(vacancies: &[Vacancy]) -> Result<Vec<u8>>;
}

/// A vacancy set persisted as a single file.
///
/// A missing, empty or unreadable file loads as an empty set.
#[derive(Debug)]
pub struct FileStorage<F> {
    path: PathBuf,
    vacancies: Vec<Vacancy>,
    format: PhantomData<F>,
}

impl<F: FileFormat> FileStorage<F> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            vacancies: Vec::new(),
            format: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<F: FileFormat> VacancyStorage for FileStorage<F> {
    fn vacancies(&self) -> &[Vacancy] {
        &self.vacancies
    }

    fn vacancies_mut(&mut self) -> &mut Vec<Vacancy> {
        &mut self.vacancies
    }

    #[instrument(skip(self), fields(format = F::NAME, path = %self.path.display()))]
    async fn load(&mut self) -> Result<()> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("Storage file does not exist yet, starting empty");
                self.vacancies.clear();
                return Ok(());
            }
            Err(err) => return Err(Error::Io(err)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            info!("Storage file is empty");
            self.vacancies.clear();
            return Ok(());
        }

        match F::decode(&bytes) {
            Ok(vacancies) => {
                info!(count = vacancies.len(), "Loaded vacancies");
                self.vacancies = vacancies;
            }
            Err(Error::Corrupt(reason)) => {
                warn!(%reason, "Storage file is unreadable, treating it as empty");
                self.vacancies.clear();
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    #[instrument(skip(self), fields(format = F::NAME, path = %self.path.display()))]
    async fn save(&self) -> Result<()> {
        let bytes = F::encode(&self.vacancies)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, bytes).await?;

        info!(count = self.vacancies.len(), "Saved vacancies");
        Ok(())
    }
}
