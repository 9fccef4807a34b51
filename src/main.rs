use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use movie_catalog_enricher::{
    clients::omdb_client::{OmdbConfig, DEFAULT_OMDB_BASE_URL},
    config::RunConfig,
    enrichment::enrichment_pass::{PassOptions, Prioritization, YearFilter},
};

mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "movie-catalog-enricher",
    version,
    about = "Fill in cast, director and poster for a JSON movie catalog from OMDb"
)]
struct Cli {
    /// JSON array of movies to enrich
    #[arg(short, long)]
    input: PathBuf,
    /// Where to write the result [default: <input>_with_cast.json]
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Overwrite the input file
    #[arg(long)]
    in_place: bool,
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    api_key: String,
    /// JSON object of "title": ["actor", ...] consulted before OMDb
    #[arg(long)]
    fallback_table: Option<PathBuf>,
    #[arg(long, default_value_t = 1000, conflicts_with = "unlimited")]
    max_lookups: usize,
    #[arg(long)]
    unlimited: bool,
    /// Pause between two OMDb requests
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
    #[arg(long, value_enum, default_value = "input")]
    prioritize: PrioritizeArg,
    /// Only look up movies from this year (fallback table still applies)
    #[arg(long, conflicts_with = "min_year")]
    year: Option<u32>,
    /// Only look up movies from this year onwards
    #[arg(long)]
    min_year: Option<u32>,
    /// Only consider the first N movies of the catalog
    #[arg(long)]
    sample_size: Option<usize>,
    /// Retries per request on network or server errors
    #[arg(long, default_value_t = 0)]
    retries: usize,
    /// Ask for larger poster images where the URL allows it
    #[arg(long)]
    upscale_posters: bool,
    /// Also match series and episodes, not just movies
    #[arg(long)]
    any_type: bool,
    #[arg(long, default_value = DEFAULT_OMDB_BASE_URL)]
    base_url: String,
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PrioritizeArg {
    /// Catalog order
    Input,
    /// Newest year first
    Year,
    /// Highest `index` field first
    Index,
}

impl From<PrioritizeArg> for Prioritization {
    fn from(arg: PrioritizeArg) -> Self {
        match arg {
            PrioritizeArg::Input => Prioritization::InputOrder,
            PrioritizeArg::Year => Prioritization::YearDescending,
            PrioritizeArg::Index => Prioritization::IndexDescending,
        }
    }
}

impl Cli {
    fn into_run_config(self) -> RunConfig {
        let omdb = OmdbConfig {
            base_url: self.base_url,
            movies_only: !self.any_type,
            upscale_posters: self.upscale_posters,
            timeout: Duration::from_secs(self.timeout_secs),
            ..OmdbConfig::new(self.api_key)
        };

        let year_filter = match (self.year, self.min_year) {
            (Some(year), _) => YearFilter::Exactly(year),
            (None, Some(year)) => YearFilter::AtLeast(year),
            (None, None) => YearFilter::Any,
        };

        let output = match (self.output, self.in_place) {
            (Some(output), _) => output,
            (None, true) => self.input.clone(),
            (None, false) => RunConfig::default_output_path(&self.input),
        };

        RunConfig {
            output,
            in_place: self.in_place,
            fallback_table: self.fallback_table,
            retries: self.retries,
            pass: PassOptions {
                max_lookups: (!self.unlimited).then_some(self.max_lookups),
                prioritization: self.prioritize.into(),
                year_filter,
                sample_size: self.sample_size,
                delay: Duration::from_millis(self.delay_ms),
            },
            ..RunConfig::new(self.input, omdb)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    let config = cli.into_run_config();
    let input = config.input.clone();
    movie_catalog_enricher::run(config)
        .await
        .with_context(|| format!("could not enrich {}", input.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RunConfig {
        let mut argv = vec!["movie-catalog-enricher", "--api-key", "key"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().into_run_config()
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_follow_the_free_omdb_tier() {
        let config = parse(&["-i", "movies.json"]);

        assert_eq!(config.output, PathBuf::from("movies_with_cast.json"));
        assert_eq!(config.pass.max_lookups, Some(1000));
        assert_eq!(config.pass.delay, Duration::from_secs(1));
        assert_eq!(config.pass.prioritization, Prioritization::InputOrder);
        assert!(config.omdb.movies_only);
    }

    #[test]
    fn in_place_without_output_targets_the_input() {
        let config = parse(&["-i", "movies.json", "--in-place"]);

        assert_eq!(config.output, PathBuf::from("movies.json"));
        assert!(config.in_place);
    }

    #[test]
    fn year_options_map_to_filters() {
        let exact = parse(&["-i", "m.json", "--year", "2025", "--prioritize", "index"]);
        let min = parse(&["-i", "m.json", "--min-year", "2010", "--unlimited"]);

        assert_eq!(exact.pass.year_filter, YearFilter::Exactly(2025));
        assert_eq!(exact.pass.prioritization, Prioritization::IndexDescending);
        assert_eq!(min.pass.year_filter, YearFilter::AtLeast(2010));
        assert_eq!(min.pass.max_lookups, None);
    }

    #[test]
    fn year_and_min_year_conflict() {
        let result = Cli::try_parse_from([
            "movie-catalog-enricher",
            "--api-key",
            "key",
            "-i",
            "m.json",
            "--year",
            "2025",
            "--min-year",
            "2010",
        ]);

        assert!(result.is_err());
    }
}
