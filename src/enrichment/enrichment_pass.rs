use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{
    clients::movie_lookup::{LookupError, LookupResponse, MovieLookup},
    enrichment::fallback_table::FallbackTable,
    model::{
        enrichment::{EnrichmentFields, FieldSource, Resolution},
        movie::MovieRecord,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Prioritization {
    #[default]
    InputOrder,
    YearDescending,
    // a missing index counts as 0
    IndexDescending,
}

impl Prioritization {
    // sort_by is stable, so equal keys keep their input order
    fn sort(self, view: &mut [(usize, MovieRecord)]) {
        match self {
            Prioritization::InputOrder => {}
            Prioritization::YearDescending => {
                view.sort_by(|(_, a), (_, b)| b.numeric_year().cmp(&a.numeric_year()))
            }
            Prioritization::IndexDescending => {
                view.sort_by(|(_, a), (_, b)| b.index.unwrap_or(0).cmp(&a.index.unwrap_or(0)))
            }
        }
    }
}

/// Restricts which records may spend an external lookup. Fallback-table
/// hits apply regardless of year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YearFilter {
    #[default]
    Any,
    Exactly(u32),
    AtLeast(u32),
}

impl YearFilter {
    fn accepts(self, record: &MovieRecord) -> bool {
        match self {
            YearFilter::Any => true,
            YearFilter::Exactly(year) => record.numeric_year() == Some(year),
            YearFilter::AtLeast(year) => record.numeric_year().is_some_and(|y| y >= year),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PassOptions {
    pub max_lookups: Option<usize>,
    pub prioritization: Prioritization,
    pub year_filter: YearFilter,
    pub sample_size: Option<usize>,
    pub delay: Duration,
}

impl PassOptions {
    fn in_sample(&self, position: usize) -> bool {
        self.sample_size.map_or(true, |n| position < n)
    }

    fn budget_exhausted(&self, lookups_used: usize) -> bool {
        self.max_lookups.is_some_and(|max| lookups_used >= max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopReason {
    #[default]
    Completed,
    BudgetExhausted,
    RateLimited,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub lookups_used: usize,
    pub enriched_from_table: usize,
    pub enriched_from_lookup: usize,
    pub not_found: usize,
    pub failed: usize,
    // already had a cast, or no title
    pub skipped: usize,
    pub stop: StopReason,
}

fn resolve_from_table(title: &str, table: &FallbackTable) -> Option<Resolution> {
    table.cast_for(title).map(|cast| Resolution::Found {
        fields: EnrichmentFields::cast_only(cast.to_vec()),
        source: FieldSource::FallbackTable,
    })
}

async fn resolve_from_lookup<L>(title: &str, year: Option<&str>, lookup: &L) -> Resolution
where
    L: MovieLookup + ?Sized,
{
    match lookup.lookup(title, year).await {
        Ok(LookupResponse::Found(fields)) => Resolution::Found {
            fields,
            source: FieldSource::Lookup,
        },
        Ok(LookupResponse::NotFound) => Resolution::NotFound,
        Err(LookupError::RateLimited) => Resolution::RateLimited,
        Err(e) => {
            log::warn!("{} lookup failed for {}: {}", lookup.name(), title, e);
            Resolution::LookupFailed(e)
        }
    }
}

/// An exact match in the fallback table wins and the lookup is never called;
/// otherwise exactly one lookup call is made.
pub async fn resolve_fields<L>(
    title: &str,
    year: Option<&str>,
    table: &FallbackTable,
    lookup: &L,
) -> Resolution
where
    L: MovieLookup + ?Sized,
{
    match resolve_from_table(title, table) {
        Some(resolution) => resolution,
        None => resolve_from_lookup(title, year, lookup).await,
    }
}

/// Enriches every record that still lacks a cast, spending at most
/// `options.max_lookups` external lookups.
///
/// Fallback-table hits are always applied. Once the budget is spent only
/// external lookups stop; a rate-limit answer halts the whole traversal and
/// leaves every record not yet reached untouched. Records come back in input
/// order.
pub async fn apply_budgeted_pass<L>(
    records: Vec<MovieRecord>,
    lookup: &L,
    table: &FallbackTable,
    options: &PassOptions,
) -> (Vec<MovieRecord>, PassReport)
where
    L: MovieLookup + ?Sized,
{
    let mut view: Vec<(usize, MovieRecord)> = records.into_iter().enumerate().collect();
    options.prioritization.sort(&mut view);

    let considered = view
        .iter()
        .filter(|(position, _)| options.in_sample(*position))
        .count();
    log::info!("Considering {} of {} movies", considered, view.len());

    let paced = PacedLookup::new(lookup, options.delay);
    let mut report = PassReport::default();
    let mut processed = 0;

    for (position, record) in view.iter_mut() {
        if !options.in_sample(*position) {
            continue;
        }
        processed += 1;

        if !record.needs_enrichment() {
            log::debug!("Skipping {}: no title or cast already present", record.display_title());
            report.skipped += 1;
            continue;
        }
        let title = record.display_title().to_string();

        if let Some(resolution) = resolve_from_table(&title, table) {
            log::info!("Processing {}/{}: {} (fallback table)", processed, considered, title);
            report.enriched_from_table += 1;
            apply_resolution(record, &title, resolution);
            continue;
        }

        if !options.year_filter.accepts(record) {
            log::debug!("{} is outside the year filter, no lookup", title);
            continue;
        }
        if options.budget_exhausted(report.lookups_used) {
            if report.stop != StopReason::BudgetExhausted {
                log::info!(
                    "Reached the limit of {} lookups, only the fallback table is used from here on",
                    report.lookups_used
                );
                report.stop = StopReason::BudgetExhausted;
            }
            continue;
        }

        log::info!(
            "Processing {}/{}: {} ({})",
            processed,
            considered,
            title,
            record.lookup_year().unwrap_or("unknown year")
        );

        let year = record.lookup_year().map(str::to_string);
        let resolution = resolve_from_lookup(&title, year.as_deref(), &paced).await;
        if resolution.consumed_lookup() {
            report.lookups_used += 1;
        }

        match &resolution {
            Resolution::Found { .. } => report.enriched_from_lookup += 1,
            Resolution::NotFound => report.not_found += 1,
            Resolution::LookupFailed(_) => report.failed += 1,
            Resolution::RateLimited => {
                log::warn!("Lookup source is rate limiting, saving progress and stopping");
                report.stop = StopReason::RateLimited;
                break;
            }
        }
        apply_resolution(record, &title, resolution);
    }

    view.sort_by_key(|(position, _)| *position);
    let records = view.into_iter().map(|(_, record)| record).collect();

    (records, report)
}

fn apply_resolution(record: &mut MovieRecord, title: &str, resolution: Resolution) {
    match &resolution {
        Resolution::Found { fields, .. } => log_found(title, fields),
        Resolution::NotFound => log::info!("  No information found for {}", title),
        Resolution::LookupFailed(_) | Resolution::RateLimited => {}
    }
    if let Some(fields) = resolution.into_fields() {
        record.apply_enrichment(fields);
    }
}

fn log_found(title: &str, fields: &EnrichmentFields) {
    if fields.cast.is_empty() {
        log::info!("  No cast information found for {}", title);
    } else {
        let preview = fields.cast.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
        let ellipsis = if fields.cast.len() > 3 { "..." } else { "" };
        log::info!(
            "  Found {} cast members: {}{}",
            fields.cast.len(),
            preview,
            ellipsis
        );
    }
    if let Some(director) = fields.director.as_deref().filter(|d| !d.is_empty()) {
        log::debug!("  Director: {}", director);
    }
    if let Some(poster) = fields.poster.as_deref().filter(|p| !p.is_empty()) {
        log::debug!("  Poster: {}", poster);
    }
}

// at least `delay` between the starts of two consecutive lookups
struct PacedLookup<'a, L: ?Sized> {
    inner: &'a L,
    delay: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl<'a, L: MovieLookup + ?Sized> PacedLookup<'a, L> {
    fn new(inner: &'a L, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            last_call: Mutex::new(None),
        }
    }

    fn next_slot(&self) -> Option<Instant> {
        let last_call = self.last_call.lock().map(|guard| *guard).unwrap_or(None);
        last_call.map(|last| last + self.delay)
    }

    fn mark_call(&self) {
        if let Ok(mut guard) = self.last_call.lock() {
            *guard = Some(Instant::now());
        }
    }
}

#[async_trait]
impl<'a, L: MovieLookup + ?Sized> MovieLookup for PacedLookup<'a, L> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn lookup(
        &self,
        title: &str,
        year: Option<&str>,
    ) -> Result<LookupResponse, LookupError> {
        if let Some(slot) = self.next_slot() {
            tokio::time::sleep_until(slot).await;
        }
        self.mark_call();
        self.inner.lookup(title, year).await
    }
}
