pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::models::search::Site;
use crate::services::{HeadHunterService, Provider, SuperJobService};
use crate::storage::{PostgresStorage, Storage, StorageKind};
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub head_hunter: HeadHunterService,
    pub super_job: SuperJobService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http_client = Client::builder().build()?;

        let head_hunter = HeadHunterService::from_config(http_client.clone(), &config);
        let super_job = SuperJobService::from_config(http_client, &config);

        Ok(Self {
            config,
            head_hunter,
            super_job,
        })
    }

    pub fn provider(&self, site: Site) -> Provider {
        match site {
            Site::HeadHunter => Provider::HeadHunter(self.head_hunter.clone()),
            Site::SuperJob => Provider::SuperJob(self.super_job.clone()),
        }
    }

    /// Opens the backend of the given kind: a file under the data directory
    /// or the configured database.
    pub async fn open_storage(&self, kind: StorageKind) -> Result<Storage> {
        match kind.default_path(&self.config.data_dir) {
            Some(path) => Storage::file(kind, path),
            None => {
                let database_url = self.config.require_database_url()?;
                Ok(Storage::Postgres(
                    PostgresStorage::connect(database_url).await?,
                ))
            }
        }
    }
}
