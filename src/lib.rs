pub mod clients;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod extractors;
pub mod model;
pub mod persisters;

use clients::{movie_lookup::MovieLookup, omdb_client::OmdbClient, retrying_lookup::RetryingLookup};
use config::RunConfig;
use enrichment::{
    enrichment_pass::{apply_budgeted_pass, PassReport, StopReason},
    fallback_table::FallbackTable,
};
use error::EnrichError;
use persisters::json_catalog::JsonCatalog;

/// Enriches the catalog at `config.input` using OMDb and writes the result to `config.output`.
pub async fn run(config: RunConfig) -> Result<PassReport, EnrichError> {
    let omdb_client =
        OmdbClient::new(config.omdb.clone()).map_err(|e| EnrichError::Client(e.to_string()))?;

    if config.retries > 0 {
        let lookup = RetryingLookup::new(omdb_client, config.retries);
        run_with_lookup(&config, &lookup).await
    } else {
        run_with_lookup(&config, &omdb_client).await
    }
}

pub async fn run_with_lookup<L>(config: &RunConfig, lookup: &L) -> Result<PassReport, EnrichError>
where
    L: MovieLookup + ?Sized,
{
    JsonCatalog::check_output_path(&config.input, &config.output, config.in_place)?;

    let table = match &config.fallback_table {
        Some(path) => {
            let table = FallbackTable::from_json_file(path)?;
            log::info!("Loaded {} fallback casts from {}", table.len(), path.display());
            table
        }
        None => FallbackTable::default(),
    };

    let movies = JsonCatalog::load_catalog(&config.input)?;
    log::info!(
        "Loaded {} movies from {}",
        movies.len(),
        config.input.display()
    );
    match config.pass.max_lookups {
        Some(max) => log::info!("Will make up to {} {} lookups", max, lookup.name()),
        None => log::info!("No limit on {} lookups", lookup.name()),
    }

    let (movies, report) = apply_budgeted_pass(movies, lookup, &table, &config.pass).await;

    JsonCatalog::save_catalog(&config.output, &movies)?;
    log_summary(config, &report);

    Ok(report)
}

fn log_summary(config: &RunConfig, report: &PassReport) {
    log::info!("Updated movies data saved to {}", config.output.display());
    log::info!(
        "Enriched {} movies from the fallback table and {} from lookups ({} not found, {} failed)",
        report.enriched_from_table,
        report.enriched_from_lookup,
        report.not_found,
        report.failed
    );
    log::info!("Made {} lookups", report.lookups_used);

    match report.stop {
        StopReason::Completed => {}
        StopReason::BudgetExhausted => {
            log::info!("Lookup limit reached; run again to continue where this run stopped")
        }
        StopReason::RateLimited => {
            log::warn!("Stopped early because of rate limiting; run again later to continue")
        }
    }
}
