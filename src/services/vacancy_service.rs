use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::error::Result;
use crate::models::stats::{CompanyVacancyCount, RemoveOutcome, SalaryComparison, SalaryStats};
use crate::models::vacancy::Vacancy;
use crate::storage::{Storage, VacancyStorage};

/// Query utilities over whichever backend holds the vacancies.
pub struct VacancyService {
    storage: Storage,
}

impl VacancyService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn into_storage(self) -> Storage {
        self.storage
    }

    pub async fn list(&mut self) -> Result<Vec<Vacancy>> {
        self.storage.load().await?;
        Ok(self.storage.vacancies().to_vec())
    }

    pub async fn search(&mut self, keyword: &str) -> Result<Vec<Vacancy>> {
        self.storage.search(keyword).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: i64) -> Result<RemoveOutcome> {
        let outcome = self.storage.remove(id).await?;
        info!(?outcome, "Delete finished");
        Ok(outcome)
    }

    pub async fn add(&mut self, vacancy: Vacancy) -> Result<()> {
        self.storage.add(vacancy).await
    }

    /// Replaces everything stored with `vacancies`.
    #[instrument(skip(self, vacancies), fields(count = vacancies.len()))]
    pub async fn import(&mut self, vacancies: Vec<Vacancy>) -> Result<()> {
        self.storage.replace(vacancies);
        self.storage.save().await
    }

    /// Compares the first stored vacancy with `first_id` against the first
    /// one with `second_id`.
    ///
    /// "Higher" follows the vacancy ordering: the first wins when its upper
    /// bound is larger, the second wins when its lower bound is larger.
    pub async fn compare_by_salary(
        &mut self,
        first_id: i64,
        second_id: i64,
    ) -> Result<SalaryComparison> {
        self.storage.load().await?;
        let vacancies = self.storage.vacancies();

        let Some(first) = vacancies.iter().find(|v| v.id == first_id) else {
            return Ok(SalaryComparison::FirstNotFound);
        };
        let Some(second) = vacancies.iter().find(|v| v.id == second_id) else {
            return Ok(SalaryComparison::SecondNotFound);
        };

        Ok(if first == second {
            SalaryComparison::Equal
        } else if first > second {
            SalaryComparison::FirstHigher
        } else if first < second {
            SalaryComparison::SecondHigher
        } else {
            SalaryComparison::Different
        })
    }

    /// Mean of `salary_from` over every stored vacancy, zeros included.
    pub async fn average_salary(&mut self) -> Result<Option<Decimal>> {
        self.storage.load().await?;
        Ok(average_salary_from(self.storage.vacancies()))
    }

    /// Vacancy counts per company, largest first, ties by name.
    pub async fn company_counts(&mut self) -> Result<Vec<CompanyVacancyCount>> {
        self.storage.load().await?;
        Ok(count_by_company(self.storage.vacancies()))
    }

    /// Vacancies whose `salary_from` is strictly above the average.
    pub async fn above_average(&mut self) -> Result<Vec<Vacancy>> {
        self.storage.load().await?;
        Ok(above_average_of(self.storage.vacancies()))
    }

    /// All salary figures at once, or `None` when nothing is stored.
    ///
    /// The database computes them itself; file backends are aggregated in
    /// memory from a single load.
    #[instrument(skip(self))]
    pub async fn stats(&mut self) -> Result<Option<SalaryStats>> {
        if let Some(db) = self.storage.as_postgres() {
            if db.is_empty().await? {
                info!("Vacancy table is empty");
                return Ok(None);
            }
            return Ok(Some(SalaryStats {
                average: db.avg_salary().await?,
                companies: db.companies_and_vacancies_count().await?,
                above_average: db.vacancies_with_higher_salary().await?,
            }));
        }

        self.storage.load().await?;
        let vacancies = self.storage.vacancies();
        if vacancies.is_empty() {
            info!("Storage is empty");
            return Ok(None);
        }
        Ok(Some(SalaryStats {
            average: average_salary_from(vacancies),
            companies: count_by_company(vacancies),
            above_average: above_average_of(vacancies),
        }))
    }
}

fn count_by_company(vacancies: &[Vacancy]) -> Vec<CompanyVacancyCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for vacancy in vacancies {
        *counts.entry(vacancy.company.as_str()).or_default() += 1;
    }

    let mut rows: Vec<CompanyVacancyCount> = counts
        .into_iter()
        .map(|(company, vacancy_count)| CompanyVacancyCount {
            company: company.to_string(),
            vacancy_count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.vacancy_count
            .cmp(&a.vacancy_count)
            .then_with(|| a.company.cmp(&b.company))
    });
    rows
}

fn above_average_of(vacancies: &[Vacancy]) -> Vec<Vacancy> {
    let Some(average) = average_salary_from(vacancies) else {
        return Vec::new();
    };
    vacancies
        .iter()
        .filter(|vacancy| vacancy.salary_from > average)
        .cloned()
        .collect()
}

fn average_salary_from(vacancies: &[Vacancy]) -> Option<Decimal> {
    if vacancies.is_empty() {
        return None;
    }
    let total: Decimal = vacancies.iter().map(|vacancy| vacancy.salary_from).sum();
    Some(total / Decimal::from(vacancies.len()))
}
