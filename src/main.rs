use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vacancy_aggregator::{
    config::Config,
    models::search::{Experience, SearchQuery, Site, SortOrder},
    models::stats::RemoveOutcome,
    models::vacancy::Vacancy,
    services::{vacancy_service::VacancyService, JobApi},
    storage::StorageKind,
    AppState,
};

#[derive(Parser)]
#[command(author, version, about = "Search hh.ru and SuperJob and keep the results", long_about = None)]
struct Cli {
    /// Backend to read and write: json, csv, xlsx, txt or postgres
    #[arg(long, global = true, default_value = "json", value_parser = parse_arg::<StorageKind>)]
    format: StorageKind,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Query a job board
    Search {
        /// hh or superjob
        #[arg(long, default_value = "hh", value_parser = parse_arg::<Site>)]
        site: Site,
        /// Search text
        text: String,
        /// City name, resolved through the job board
        #[arg(long)]
        city: Option<String>,
        /// none, 1-3, 3-6 or 6+
        #[arg(long, value_parser = parse_arg::<Experience>)]
        experience: Option<Experience>,
        #[arg(long)]
        limit: Option<u32>,
        /// date or salary
        #[arg(long, value_parser = parse_arg::<SortOrder>)]
        sort: Option<SortOrder>,
        /// Replace the stored vacancies with the results
        #[arg(long)]
        save: bool,
    },
    /// Print every stored vacancy
    List,
    /// Compare the salary terms of two stored vacancies
    Compare { first: i64, second: i64 },
    /// Delete a stored vacancy by id
    Remove { id: i64 },
    /// Stored vacancies mentioning a keyword in title or description
    Find { keyword: String },
    /// Average salary, vacancies per company, above-average vacancies
    Stats,
}

fn parse_arg<T>(value: &str) -> Result<T, String>
where
    T: std::str::FromStr<Err = vacancy_aggregator::error::Error>,
{
    value.parse::<T>().map_err(|e| e.to_string())
}

fn print_vacancies(vacancies: &[Vacancy]) {
    if vacancies.is_empty() {
        println!("No vacancies.");
        return;
    }
    for vacancy in vacancies {
        println!("{}\n", vacancy);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Search {
            site,
            text,
            city,
            experience,
            limit,
            sort,
            save,
        } => {
            let provider = state.provider(site);
            let location = match city {
                Some(city) => match provider.resolve_location(&city).await? {
                    Some(location) => Some(location),
                    None => anyhow::bail!("{} does not know the city '{}'", site, city),
                },
                None => None,
            };

            let query = SearchQuery {
                location,
                experience,
                limit,
                sort,
                ..SearchQuery::new(text)
            };
            let vacancies = provider.fetch(&query).await?;
            print_vacancies(&vacancies);

            if save {
                let count = vacancies.len();
                let mut service = VacancyService::new(state.open_storage(cli.format).await?);
                service.import(vacancies).await?;
                info!(count, format = %cli.format, "Stored search results");
            }
        }
        Commands::List => {
            let mut service = VacancyService::new(state.open_storage(cli.format).await?);
            print_vacancies(&service.list().await?);
        }
        Commands::Compare { first, second } => {
            let mut service = VacancyService::new(state.open_storage(cli.format).await?);
            let outcome = service.compare_by_salary(first, second).await?;
            println!("{}", outcome.message());
        }
        Commands::Remove { id } => {
            let mut service = VacancyService::new(state.open_storage(cli.format).await?);
            match service.delete(id).await? {
                RemoveOutcome::Removed => println!("Vacancy {} removed.", id),
                RemoveOutcome::NotFound => println!("Vacancy {} not found.", id),
            }
        }
        Commands::Find { keyword } => {
            let mut service = VacancyService::new(state.open_storage(cli.format).await?);
            print_vacancies(&service.search(&keyword).await?);
        }
        Commands::Stats => {
            let mut service = VacancyService::new(state.open_storage(cli.format).await?);
            let Some(stats) = service.stats().await? else {
                println!("No vacancies stored.");
                return Ok(());
            };

            match stats.average {
                Some(average) => println!("Average salary from: {}", average.round_dp(2)),
                None => println!("Average salary from: no vacancies"),
            }
            println!("\nVacancies per company:");
            for row in &stats.companies {
                println!("  {}: {}", row.company, row.vacancy_count);
            }
            println!("\nAbove the average:");
            print_vacancies(&stats.above_average);
        }
    }

    Ok(())
}
