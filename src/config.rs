use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

const DEFAULT_HH_API_URL: &str = "https://api.hh.ru";
const DEFAULT_SUPERJOB_API_URL: &str = "https://api.superjob.ru/2.0";
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub database_url: Option<String>,
    pub superjob_api_key: Option<String>,
    pub hh_api_url: String,
    pub superjob_api_url: String,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            data_dir: PathBuf::from(get_env_or("VACANCY_DATA_DIR", DEFAULT_DATA_DIR)),
            database_url: env::var("DATABASE_URL").ok(),
            superjob_api_key: env::var("SJ_API_KEY").ok(),
            hh_api_url: get_env_or("HH_API_URL", DEFAULT_HH_API_URL),
            superjob_api_url: get_env_or("SUPERJOB_API_URL", DEFAULT_SUPERJOB_API_URL),
            user_agent: get_env_or("HTTP_USER_AGENT", &default_user_agent()),
        })
    }

    /// Connection string for the relational backend, which is the only
    /// consumer that cannot run without it.
    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| Error::Config("Missing environment variable: DATABASE_URL".to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            database_url: None,
            superjob_api_key: None,
            hh_api_url: DEFAULT_HH_API_URL.to_string(),
            superjob_api_url: DEFAULT_SUPERJOB_API_URL.to_string(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("vacancy-aggregator/{}", env!("CARGO_PKG_VERSION"))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
