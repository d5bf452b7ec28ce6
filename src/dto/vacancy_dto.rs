use rust_decimal::Decimal;

use crate::models::vacancy::{Vacancy, NO_DATA};

/// Typed input for building a [`Vacancy`] from already-parsed data.
/// Anything left as `None` becomes the usual sentinel.
#[derive(Debug, Clone, Default)]
pub struct VacancyDraft {
    pub id: i64,
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub salary_from: Option<Decimal>,
    pub salary_to: Option<Decimal>,
    pub currency: Option<String>,
    pub area: Option<String>,
    pub url: Option<String>,
}

impl VacancyDraft {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

fn or_no_data(value: Option<String>) -> String {
    value.unwrap_or_else(|| NO_DATA.to_string())
}

impl From<VacancyDraft> for Vacancy {
    fn from(draft: VacancyDraft) -> Self {
        Vacancy {
            id: draft.id,
            title: or_no_data(draft.title),
            company: or_no_data(draft.company),
            description: or_no_data(draft.description),
            salary_from: draft.salary_from.unwrap_or(Decimal::ZERO),
            salary_to: draft.salary_to.unwrap_or(Decimal::ZERO),
            currency: or_no_data(draft.currency),
            area: or_no_data(draft.area),
            url: or_no_data(draft.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_applies_sentinels() {
        let vacancy: Vacancy = VacancyDraft {
            title: Some("Backend developer".to_string()),
            salary_to: Some(Decimal::from(300_000)),
            ..VacancyDraft::new(11)
        }
        .into();

        assert_eq!(vacancy.id, 11);
        assert_eq!(vacancy.title, "Backend developer");
        assert_eq!(vacancy.company, NO_DATA);
        assert_eq!(vacancy.salary_from, Decimal::ZERO);
        assert_eq!(vacancy.salary_to, Decimal::from(300_000));
        assert_eq!(vacancy.currency, NO_DATA);
    }
}
