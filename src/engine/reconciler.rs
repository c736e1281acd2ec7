use std::collections::{BTreeMap, HashSet};

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{NewSource, ParsedEntry, Source, Upserted};

/// What a reconciliation changed.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub channels_created: usize,
    pub sources_inserted: usize,
    pub sources_refreshed: usize,
    pub sources_pruned: usize,
    pub duplicates_collapsed: usize,
    /// Extra active flags cleared on channels that had more than one.
    pub activations_repaired: usize,
    /// One `MalformedEntry` per rejected entry.
    pub skipped: Vec<AppError>,
}

impl ReconcileReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Merge freshly parsed entries into the store.
///
/// Channels are created on first sight and their `enabled` flag is never
/// touched. Sources are matched by `(channel_id, url)`: new ones are inserted
/// inactive, known ones get their name and header refreshed. Afterwards every
/// inactive source not seen in `entries` is pruned, duplicate rows collapse to
/// the lowest id, and each channel is left with at most one active source.
///
/// Malformed entries are skipped and reported; any store error aborts.
pub fn reconcile<S: Store + ?Sized>(store: &S, entries: &[ParsedEntry]) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for entry in entries {
        if let Err(e) = validate(entry) {
            tracing::warn!("Skipping playlist entry: {}", e);
            report.skipped.push(e);
            continue;
        }

        if store.upsert_channel(&entry.channel_id)? {
            report.channels_created += 1;
        }

        let upserted = store.upsert_source(&NewSource {
            channel_id: entry.channel_id.clone(),
            url: entry.url.clone(),
            display_name: entry.display_name.clone(),
            raw_header: entry.raw_header.clone(),
        })?;
        match upserted {
            Upserted::Inserted(_) => report.sources_inserted += 1,
            Upserted::Refreshed(_) => report.sources_refreshed += 1,
        }

        seen.insert((entry.channel_id.as_str(), entry.url.as_str()));
    }

    for channel in store.all_channels()? {
        let mut kept = Vec::new();
        for source in store.get_sources_for_channel(&channel.id)? {
            if !source.active && !seen.contains(&(source.channel_id.as_str(), source.url.as_str())) {
                tracing::debug!("Pruning stale source {} ({})", source.id, source.url);
                store.delete_source(source.id)?;
                report.sources_pruned += 1;
            } else {
                kept.push(source);
            }
        }

        let survivors = collapse_duplicates(store, kept, &mut report)?;
        repair_activation(store, &survivors, &mut report)?;
    }

    tracing::info!(
        "Reconciled {} entries: {} channels created, {} sources inserted, {} refreshed, {} pruned, {} duplicates collapsed, {} skipped",
        entries.len(),
        report.channels_created,
        report.sources_inserted,
        report.sources_refreshed,
        report.sources_pruned,
        report.duplicates_collapsed,
        report.skipped_count()
    );

    Ok(report)
}

fn validate(entry: &ParsedEntry) -> Result<()> {
    let reason = if entry.channel_id.is_empty() && entry.display_name.is_empty() {
        "no channel id or display name"
    } else if entry.channel_id.is_empty() {
        "no channel id"
    } else if entry.url.is_empty() {
        "no URL"
    } else {
        return Ok(());
    };

    Err(AppError::MalformedEntry {
        document: entry.document.clone(),
        line: entry.line,
        reason: reason.to_string(),
    })
}

/// Collapses rows sharing a URL into the lowest id, which inherits `active`
/// from any of the removed rows. `sources` must be ordered by id.
fn collapse_duplicates<S: Store + ?Sized>(
    store: &S,
    sources: Vec<Source>,
    report: &mut ReconcileReport,
) -> Result<Vec<Source>> {
    let mut by_url: BTreeMap<String, Vec<Source>> = BTreeMap::new();
    for source in sources {
        by_url.entry(source.url.clone()).or_default().push(source);
    }

    let mut survivors = Vec::with_capacity(by_url.len());
    for group in by_url.into_values() {
        let mut group = group.into_iter();
        let Some(mut survivor) = group.next() else {
            continue;
        };

        let mut inherit_active = false;
        for duplicate in group {
            tracing::debug!(
                "Collapsing duplicate source {} into {} ({})",
                duplicate.id,
                survivor.id,
                survivor.url
            );
            inherit_active |= duplicate.active;
            store.delete_source(duplicate.id)?;
            report.duplicates_collapsed += 1;
        }

        if inherit_active && !survivor.active {
            store.set_source_active(survivor.id, true)?;
            survivor.active = true;
        }
        survivors.push(survivor);
    }

    survivors.sort_by_key(|s| s.id);
    Ok(survivors)
}

/// Keeps only the lowest-id active source of a channel active.
fn repair_activation<S: Store + ?Sized>(
    store: &S,
    sources: &[Source],
    report: &mut ReconcileReport,
) -> Result<()> {
    for extra in sources.iter().filter(|s| s.active).skip(1) {
        tracing::warn!(
            "Channel {} had several active sources; deactivating {}",
            extra.channel_id,
            extra.id
        );
        store.set_source_active(extra.id, false)?;
        report.activations_repaired += 1;
    }
    Ok(())
}
