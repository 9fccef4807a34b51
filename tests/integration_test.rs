#[cfg(test)]
mod tests {

    use std::{
        fs::{self, File},
        io::Read,
        path::{Path, PathBuf},
        sync::Mutex,
        time::Duration,
    };

    use async_trait::async_trait;
    use movie_catalog_enricher::{
        clients::{
            movie_lookup::{LookupError, LookupResponse, MovieLookup},
            omdb_client::OmdbConfig,
        },
        config::RunConfig,
        enrichment::{
            enrichment_pass::{PassOptions, Prioritization, StopReason},
            fallback_table::FallbackTable,
        },
        error::{CatalogError, EnrichError},
        model::enrichment::EnrichmentFields,
        run_with_lookup,
    };
    use tempfile::TempDir;

    /// Stands in for OMDb with a handful of known titles.
    #[derive(Default)]
    struct CannedLookup {
        asked: Mutex<Vec<String>>,
    }

    impl CannedLookup {
        fn asked(&self) -> Vec<String> {
            self.asked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MovieLookup for CannedLookup {
        fn name(&self) -> &str {
            "canned"
        }

        async fn lookup(
            &self,
            title: &str,
            _year: Option<&str>,
        ) -> Result<LookupResponse, LookupError> {
            self.asked.lock().unwrap().push(title.to_string());
            let fields = match title {
                "Jai Bhim" => EnrichmentFields {
                    cast: vec![
                        "Suriya".to_string(),
                        "Lijomol Jose".to_string(),
                        "Manikandan".to_string(),
                    ],
                    director: Some("T.J. Gnanavel".to_string()),
                    poster: Some("https://posters.example/jai-bhim.jpg".to_string()),
                },
                "Vada Chennai" => EnrichmentFields {
                    cast: vec!["Dhanush".to_string(), "Andrea Jeremiah".to_string()],
                    director: Some(String::new()),
                    poster: Some(String::new()),
                },
                _ => return Ok(LookupResponse::NotFound),
            };
            Ok(LookupResponse::Found(fields))
        }
    }

    fn workspace_with_catalog() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("movies.json");
        fs::copy("./tests/resources/catalog.json", &input).unwrap();
        (dir, input)
    }

    fn config_for(input: &Path, pass: PassOptions) -> RunConfig {
        RunConfig {
            fallback_table: Some(PathBuf::from("./tests/resources/fallback_table.json")),
            pass,
            ..RunConfig::new(input, OmdbConfig::new("unused"))
        }
    }

    #[tokio::test]
    async fn enriches_catalog_and_keeps_order() {
        let (_dir, input) = workspace_with_catalog();
        let config = config_for(
            &input,
            PassOptions {
                prioritization: Prioritization::YearDescending,
                ..PassOptions::default()
            },
        );
        let lookup = CannedLookup::default();

        let report = run_with_lookup(&config, &lookup).await.unwrap();

        assert_eq!(
            get_json_content(&config.output),
            get_json_content(Path::new("./tests/resources/expected_catalog.json"))
        );
        assert_eq!(lookup.asked(), vec!["Made Up Film", "Jai Bhim", "Vada Chennai"]);
        assert_eq!(report.lookups_used, 3);
        assert_eq!(report.enriched_from_table, 1);
        assert_eq!(report.enriched_from_lookup, 2);
        assert_eq!(report.not_found, 1);
        assert_eq!(report.stop, StopReason::Completed);
        assert_eq!(
            get_file_content(&input),
            get_file_content(Path::new("./tests/resources/catalog.json"))
        );
    }

    #[tokio::test]
    async fn rerunning_on_the_output_changes_nothing() {
        let (dir, input) = workspace_with_catalog();
        let lookup = CannedLookup::default();
        let first = config_for(&input, PassOptions::default());
        run_with_lookup(&first, &lookup).await.unwrap();

        let second = RunConfig {
            output: dir.path().join("second.json"),
            ..config_for(&first.output, PassOptions::default())
        };
        let report = run_with_lookup(&second, &lookup).await.unwrap();

        assert_eq!(get_json_content(&first.output), get_json_content(&second.output));
        // only the not-found title still has an empty cast
        assert_eq!(report.lookups_used, 1);
    }

    #[tokio::test]
    async fn budget_stops_the_run_early() {
        let (_dir, input) = workspace_with_catalog();
        let config = config_for(
            &input,
            PassOptions {
                max_lookups: Some(1),
                prioritization: Prioritization::YearDescending,
                delay: Duration::from_millis(5),
                ..PassOptions::default()
            },
        );
        let lookup = CannedLookup::default();

        let report = run_with_lookup(&config, &lookup).await.unwrap();

        let output = get_json_content(&config.output);
        let original = get_json_content(Path::new("./tests/resources/catalog.json"));
        assert_eq!(report.stop, StopReason::BudgetExhausted);
        assert_eq!(lookup.asked(), vec!["Made Up Film"]);
        assert_eq!(output[5]["cast"], serde_json::json!([]));
        // the fallback table still applies once lookups are used up
        assert_eq!(output[0]["cast"], serde_json::json!(["Karthi", "Narain"]));
        assert_eq!(report.enriched_from_table, 1);
        for position in 1..5 {
            assert_eq!(output[position], original[position]);
        }
    }

    #[tokio::test]
    async fn missing_input_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("absent.json"), PassOptions::default());

        let result = run_with_lookup(&config, &CannedLookup::default()).await;

        assert!(matches!(
            result,
            Err(EnrichError::Catalog(CatalogError::InputNotFound { .. }))
        ));
        assert!(!config.output.exists());
    }

    #[tokio::test]
    async fn refuses_to_overwrite_input_unless_asked() {
        let (_dir, input) = workspace_with_catalog();
        let config = RunConfig {
            output: input.clone(),
            ..config_for(&input, PassOptions::default())
        };
        let lookup = CannedLookup::default();

        let refused = run_with_lookup(&config, &lookup).await;
        assert!(matches!(
            refused,
            Err(EnrichError::Catalog(CatalogError::InPlaceNotRequested { .. }))
        ));
        assert!(lookup.asked().is_empty());

        let in_place = RunConfig {
            in_place: true,
            ..config
        };
        run_with_lookup(&in_place, &lookup).await.unwrap();
        assert_eq!(
            get_json_content(&input),
            get_json_content(Path::new("./tests/resources/expected_catalog.json"))
        );
    }

    #[test]
    fn sample_fallback_table_loads() {
        let table =
            FallbackTable::from_json_file(Path::new("./data/sample_fallback_table.json")).unwrap();

        assert_eq!(table.len(), 20);
        assert_eq!(
            table.cast_for("Kaithi").map(|cast| cast[0].as_str()),
            Some("Karthi")
        );
    }

    fn get_json_content(file_path: &Path) -> serde_json::Value {
        serde_json::from_str(&get_file_content(file_path)).unwrap()
    }

    fn get_file_content(file_path: &Path) -> String {
        let mut file = match File::open(file_path) {
            Ok(file) => file,
            Err(e) => panic!("Error opening {}: {}", file_path.display(), e),
        };

        let mut content = String::new();
        if let Err(e) = file.read_to_string(&mut content) {
            eprintln!("Error reading the file: {}", e);
            panic!("Failed to read file");
        }

        content
    }
}
