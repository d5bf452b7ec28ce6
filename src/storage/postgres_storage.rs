use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::database::pool::create_pool;
use crate::error::{Error, Result};
use crate::models::stats::CompanyVacancyCount;
use crate::models::vacancy::Vacancy;
use crate::storage::VacancyStorage;

pub const DEFAULT_TABLE: &str = "vacancies";

/// Vacancies kept in one PostgreSQL table.
///
/// `save` is a full refresh: the table is dropped and rebuilt inside one
/// transaction, so row ids restart on every write. The aggregate queries
/// read the table directly and ignore the in-memory set.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
    table: String,
    vacancies: Vec<Vacancy>,
}

impl PostgresStorage {
    /// Opens a pool and makes sure the default table exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Self::new(pool).await
    }

    pub async fn new(pool: PgPool) -> Result<Self> {
        Self::with_table(pool, DEFAULT_TABLE).await
    }

    /// Uses `table` instead of the default. The name is spliced into SQL, so
    /// only lowercase ASCII letters, digits and underscores are accepted.
    pub async fn with_table(pool: PgPool, table: &str) -> Result<Self> {
        let valid = !table.is_empty()
            && !table.starts_with(|c: char| c.is_ascii_digit())
            && table
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(Error::Config(format!("invalid table name '{}'", table)));
        }

        let storage = Self {
            pool,
            table: table.to_string(),
            vacancies: Vec::new(),
        };
        sqlx::query(&storage.create_table_sql())
            .execute(&storage.pool)
            .await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn create_table_sql(&self) -> String {
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                row_id SERIAL PRIMARY KEY,
                id BIGINT NOT NULL,
                title VARCHAR(255),
                company VARCHAR(255),
                description TEXT,
                salary_from NUMERIC,
                salary_to NUMERIC,
                currency VARCHAR(255),
                area VARCHAR(255),
                url VARCHAR(255)
            )
            "#,
            self.table
        )
    }

    fn select_sql(&self, filter: &str) -> String {
        format!(
            r#"
            SELECT
                id,
                COALESCE(title, 'no data') AS title,
                COALESCE(company, 'no data') AS company,
                COALESCE(description, 'no data') AS description,
                COALESCE(salary_from, 0) AS salary_from,
                COALESCE(salary_to, 0) AS salary_to,
                COALESCE(currency, 'no data') AS currency,
                COALESCE(area, 'no data') AS area,
                COALESCE(url, 'no data') AS url
            FROM {table}
            {filter}
            ORDER BY row_id
            "#,
            table = self.table,
            filter = filter
        )
    }

    pub async fn is_empty(&self) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", self.table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count == 0)
    }

    /// Vacancy counts per company, largest first.
    pub async fn companies_and_vacancies_count(&self) -> Result<Vec<CompanyVacancyCount>> {
        let rows = sqlx::query_as::<_, CompanyVacancyCount>(&format!(
            r#"
            SELECT COALESCE(company, 'no data') AS company, COUNT(*) AS vacancy_count
            FROM {}
            GROUP BY company
            ORDER BY vacancy_count DESC, company
            "#,
            self.table
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Mean of `salary_from`, `None` for an empty table.
    pub async fn avg_salary(&self) -> Result<Option<Decimal>> {
        let avg: Option<Decimal> =
            sqlx::query_scalar(&format!("SELECT AVG(salary_from) FROM {}", self.table))
                .fetch_one(&self.pool)
                .await?;
        Ok(avg)
    }

    pub async fn vacancies_with_higher_salary(&self) -> Result<Vec<Vacancy>> {
        let sql = self.select_sql(&format!(
            "WHERE salary_from > (SELECT AVG(salary_from) FROM {})",
            self.table
        ));
        Ok(sqlx::query_as::<_, Vacancy>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Case-sensitive substring match on the title.
    pub async fn vacancies_with_keyword(&self, keyword: &str) -> Result<Vec<Vacancy>> {
        let sql = self.select_sql("WHERE strpos(title, $1) > 0");
        Ok(sqlx::query_as::<_, Vacancy>(&sql)
            .bind(keyword)
            .fetch_all(&self.pool)
            .await?)
    }
}

impl VacancyStorage for PostgresStorage {
    fn vacancies(&self) -> &[Vacancy] {
        &self.vacancies
    }

    fn vacancies_mut(&mut self) -> &mut Vec<Vacancy> {
        &mut self.vacancies
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn load(&mut self) -> Result<()> {
        self.vacancies = sqlx::query_as::<_, Vacancy>(&self.select_sql(""))
            .fetch_all(&self.pool)
            .await?;
        info!(count = self.vacancies.len(), "Loaded vacancies");
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn save(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", self.table))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&self.create_table_sql())
            .execute(&mut *tx)
            .await?;

        let insert = format!(
            r#"
            INSERT INTO {} (id, title, company, description, salary_from, salary_to, currency, area, url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
            self.table
        );
        for vacancy in &self.vacancies {
            sqlx::query(&insert)
                .bind(vacancy.id)
                .bind(&vacancy.title)
                .bind(&vacancy.company)
                .bind(&vacancy.description)
                .bind(vacancy.salary_from)
                .bind(vacancy.salary_to)
                .bind(&vacancy.currency)
                .bind(&vacancy.area)
                .bind(&vacancy.url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!(count = self.vacancies.len(), "Saved vacancies");
        Ok(())
    }
}
