use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::vacancy::Vacancy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CompanyVacancyCount {
    pub company: String,
    pub vacancy_count: i64,
}

/// Salary figures over a non-empty store.
#[derive(Debug, Clone)]
pub struct SalaryStats {
    pub average: Option<Decimal>,
    pub companies: Vec<CompanyVacancyCount>,
    pub above_average: Vec<Vacancy>,
}

/// Outcome of comparing two stored vacancies by salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryComparison {
    FirstNotFound,
    SecondNotFound,
    Equal,
    FirstHigher,
    SecondHigher,
    /// Neither `>` nor `<` holds, e.g. same bounds in different currencies.
    Different,
}

impl SalaryComparison {
    pub fn message(&self) -> &'static str {
        match self {
            SalaryComparison::FirstNotFound => "Could not find the first vacancy",
            SalaryComparison::SecondNotFound => "Could not find the second vacancy",
            SalaryComparison::Equal => "Both vacancies have the same salary terms",
            SalaryComparison::FirstHigher => "The first vacancy has higher salary terms",
            SalaryComparison::SecondHigher => "The second vacancy has higher salary terms",
            SalaryComparison::Different => "The salary terms of the vacancies differ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}
