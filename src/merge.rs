use crate::plugin::Plugin;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Reconcile the curated catalog with a freshly scraped collection.
///
/// Names are matched case-insensitively. Entries present on only one side pass
/// through unchanged: a plugin the scrape discovered survives, and so does a
/// curated entry the scrape no longer reports. For entries on both sides the
/// scrape refreshes the volatile statistics while the curated side keeps
/// identity and hand-written data:
///
/// - `stars`, `open_issues`, `updated_at` take the incoming value whenever the
///   scrape supplied one
/// - `description` is replaced only by a non-empty incoming description
/// - `tags` become the set union of both sides
/// - `name` and `url` stay curated
///
/// The result is sorted ascending by lowercase name, so persisting it yields
/// stable diffs and re-running the merge against unchanged input reproduces
/// the output byte for byte.
pub fn merge(existing: &[Plugin], incoming: &[Plugin]) -> Vec<Plugin> {
    let existing_by_key = key_by_name(existing);
    let incoming_by_key = key_by_name(incoming);

    let keys: BTreeSet<&String> = existing_by_key.keys().chain(incoming_by_key.keys()).collect();

    let mut merged = Vec::with_capacity(keys.len());
    for key in keys {
        let plugin = match (
            existing_by_key.get(key.as_str()).copied(),
            incoming_by_key.get(key.as_str()).copied(),
        ) {
            (Some(cur), Some(inc)) => merge_record(cur, inc),
            (Some(cur), None) => cur.clone(),
            (None, Some(inc)) => inc.clone(),
            (None, None) => unreachable!("key came from one of the two maps"),
        };
        merged.push(plugin);
    }
    debug!(
        "merged {} existing + {} incoming into {} records",
        existing.len(),
        incoming.len(),
        merged.len()
    );
    merged
}

/// Key a collection by lowercase name. A later duplicate within one side wins,
/// which restores the case-insensitive uniqueness invariant even when the
/// input transiently violates it.
fn key_by_name(plugins: &[Plugin]) -> BTreeMap<String, &Plugin> {
    plugins.iter().map(|p| (p.key(), p)).collect()
}

fn merge_record(existing: &Plugin, incoming: &Plugin) -> Plugin {
    let mut merged = existing.clone();

    if incoming.stars.is_some() {
        merged.stars = incoming.stars;
    }
    if incoming.open_issues.is_some() {
        merged.open_issues = incoming.open_issues;
    }
    if incoming.updated_at.is_some() {
        merged.updated_at = incoming.updated_at;
    }
    if !incoming.description.is_empty() {
        merged.description = incoming.description.clone();
    }

    let tags: BTreeSet<String> = existing
        .tags
        .iter()
        .chain(incoming.tags.iter())
        .cloned()
        .collect();
    merged.tags = tags.into_iter().collect();

    merged
}
