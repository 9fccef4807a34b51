pub fn setup_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    builder.filter(None, level);
    // request-level chatter from the HTTP stack drowns out per-movie progress
    builder.filter(Some("reqwest"), log::LevelFilter::Warn);
    builder.filter(Some("hyper"), log::LevelFilter::Warn);

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    builder.format_timestamp(None).init();
}
