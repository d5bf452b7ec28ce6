use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Work experience filter in the provider-neutral vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Experience {
    None,
    Between1And3,
    Between3And6,
    MoreThan6,
}

impl FromStr for Experience {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no" | "0" => Ok(Experience::None),
            "1-3" => Ok(Experience::Between1And3),
            "3-6" => Ok(Experience::Between3And6),
            "6+" | "6" => Ok(Experience::MoreThan6),
            other => Err(Error::Validation(format!(
                "unknown experience '{}', expected one of: none, 1-3, 3-6, 6+",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    PublicationTime,
    Salary,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "time" | "publication" => Ok(SortOrder::PublicationTime),
            "salary" => Ok(SortOrder::Salary),
            other => Err(Error::Validation(format!(
                "unknown sort order '{}', expected date or salary",
                other
            ))),
        }
    }
}

/// Upstream job board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    HeadHunter,
    SuperJob,
}

impl FromStr for Site {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hh" | "hh.ru" | "headhunter" => Ok(Site::HeadHunter),
            "sj" | "superjob" => Ok(Site::SuperJob),
            other => Err(Error::Validation(format!(
                "unknown site '{}', expected hh or superjob",
                other
            ))),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::HeadHunter => write!(f, "hh.ru"),
            Site::SuperJob => write!(f, "SuperJob"),
        }
    }
}

/// Filters for one upstream search.
///
/// `location` carries the provider's own location value (an area id for
/// HeadHunter, a town name for SuperJob); resolve free-text city names with
/// the provider before searching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub location: Option<String>,
    pub experience: Option<Experience>,
    pub limit: Option<u32>,
    pub sort: Option<SortOrder>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_experience() {
        assert_eq!("none".parse::<Experience>().unwrap(), Experience::None);
        assert_eq!("1-3".parse::<Experience>().unwrap(), Experience::Between1And3);
        assert_eq!(" 3-6 ".parse::<Experience>().unwrap(), Experience::Between3And6);
        assert_eq!("6+".parse::<Experience>().unwrap(), Experience::MoreThan6);
        assert!("ten years".parse::<Experience>().is_err());
    }

    #[test]
    fn test_parse_sort_and_site() {
        assert_eq!("Date".parse::<SortOrder>().unwrap(), SortOrder::PublicationTime);
        assert_eq!("salary".parse::<SortOrder>().unwrap(), SortOrder::Salary);
        assert_eq!("hh".parse::<Site>().unwrap(), Site::HeadHunter);
        assert_eq!("SuperJob".parse::<Site>().unwrap(), Site::SuperJob);
        assert!("linkedin".parse::<Site>().is_err());
    }

    #[test]
    fn test_new_query_has_no_filters() {
        let query = SearchQuery::new("Rust");
        assert_eq!(query.text, "Rust");
        assert!(query.location.is_none());
        assert!(query.experience.is_none());
        assert!(query.limit.is_none());
        assert!(query.sort.is_none());
    }
}
