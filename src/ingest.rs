use crate::catalog;
use crate::error::Result;
use crate::merge::merge;
use crate::plugin::{Plugin, NO_DESCRIPTION};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use std::path::Path;

lazy_static! {
    /// Positional upstream listing format: name, star count, open-issue
    /// count, update timestamp, then an optional free-text description.
    static ref LISTING_LINE: Regex = Regex::new(
        r"^(?P<name>\S+)\s+(?P<stars>\d+)\s+(?P<open_issues>\d+)\s+(?P<updated>\S+)(?:\s+(?P<description>.*))?$"
    )
    .expect("listing line pattern is valid");
}

/// Parse one data line of the upstream listing into a provisional record.
///
/// Returns `None` for anything that does not fit the positional pattern,
/// including unreadable numbers or timestamps. Dropping such lines silently
/// is a deliberate data-quality tradeoff: one mangled row must not abort a
/// whole ingestion run.
pub fn parse_line(line: &str) -> Option<Plugin> {
    let caps = LISTING_LINE.captures(line.trim())?;
    let name = caps.name("name")?.as_str().to_string();
    let stars: u64 = caps.name("stars")?.as_str().parse().ok()?;
    let open_issues: u64 = caps.name("open_issues")?.as_str().parse().ok()?;
    let updated_at = parse_timestamp(caps.name("updated")?.as_str())?;
    let description = caps
        .name("description")
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    Some(Plugin {
        url: format!("https://github.com/{name}"),
        name,
        // Left empty when the scrape had none, so the merge cannot clobber a
        // curated description with a placeholder.
        description,
        tags: vec![],
        stars: Some(stars),
        open_issues: Some(open_issues),
        updated_at: Some(updated_at),
    })
}

/// Parse the whole upstream listing. The first non-empty line is the column
/// header and is discarded; every remaining line either parses or is dropped.
pub fn parse_listing(text: &str) -> Vec<Plugin> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let header = lines.next();
    debug!("discarded listing header: {header:?}");

    let mut dropped = 0usize;
    let plugins: Vec<Plugin> = lines
        .filter_map(|line| {
            let parsed = parse_line(line);
            if parsed.is_none() {
                dropped += 1;
                debug!("dropped unparseable listing line: {line}");
            }
            parsed
        })
        .collect();
    info!(
        "parsed {} listing records ({dropped} lines dropped)",
        plugins.len()
    );
    plugins
}

/// Run the full ingestion pass: parse the listing, merge the provisional
/// records into the existing catalog, fill placeholder descriptions for
/// records that still have none, and persist with backup discipline.
///
/// Assumes exclusive access to the catalog file; concurrent runs are unsafe.
pub fn run_update(listing: &str, catalog_path: &Path) -> Result<usize> {
    let incoming = parse_listing(listing);
    let existing = catalog::load_or_empty(catalog_path)?;

    let mut merged = merge(&existing, &incoming);
    for plugin in &mut merged {
        if plugin.description.is_empty() {
            plugin.description = NO_DESCRIPTION.to_string();
        }
    }

    catalog::save(catalog_path, &merged)?;
    Ok(merged.len())
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LISTING: &str = "\
name                               stars  open_issues  updated
nvim-telescope/telescope.nvim      9000   120          2024-03-01T12:00:00Z   Find, Filter, Preview, Pick
tpope/vim-fugitive                 8000   40           2024-02-15
this line is not parseable at all
neovim/nvim-lspconfig              7500   abc          2024-01-01
folke/lazy.nvim                    6000   10           2024-03-02T08:30:00Z
";

    #[test]
    fn header_and_malformed_lines_are_dropped() {
        // 3 valid data lines, 2 malformed (free text, non-numeric count).
        let plugins = parse_listing(LISTING);
        assert_eq!(plugins.len(), 3);
        assert_eq!(plugins[0].name, "nvim-telescope/telescope.nvim");
    }

    #[test]
    fn parsed_line_carries_stats_and_derived_url() {
        let plugins = parse_listing(LISTING);
        let telescope = &plugins[0];
        assert_eq!(telescope.stars, Some(9000));
        assert_eq!(telescope.open_issues, Some(120));
        assert!(telescope.updated_at.is_some());
        assert_eq!(
            telescope.url,
            "https://github.com/nvim-telescope/telescope.nvim"
        );
        assert_eq!(telescope.description, "Find, Filter, Preview, Pick");
        assert!(telescope.tags.is_empty());
    }

    #[test]
    fn missing_description_stays_empty_until_merge() {
        let plugin = parse_line("tpope/vim-fugitive 8000 40 2024-02-15").unwrap();
        assert_eq!(plugin.description, "");
    }

    #[test]
    fn date_only_timestamps_accepted() {
        assert!(parse_timestamp("2024-02-15").is_some());
        assert!(parse_timestamp("2024-03-01T12:00:00Z").is_some());
        assert!(parse_timestamp("2024-03-01T12:00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn update_merges_into_existing_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plugins.json");
        let curated = Plugin {
            name: "tpope/vim-fugitive".to_string(),
            url: "https://github.com/tpope/vim-fugitive".to_string(),
            description: "A Git wrapper so awesome".to_string(),
            tags: vec!["git".to_string()],
            stars: Some(1),
            open_issues: None,
            updated_at: None,
        };
        catalog::save(&path, &[curated]).unwrap();

        let total = run_update(LISTING, &path).unwrap();
        assert_eq!(total, 3);

        let merged = catalog::load(&path).unwrap();
        let fugitive = merged
            .iter()
            .find(|p| p.name == "tpope/vim-fugitive")
            .unwrap();
        // Stats refreshed, curated description and tags kept.
        assert_eq!(fugitive.stars, Some(8000));
        assert_eq!(fugitive.open_issues, Some(40));
        assert_eq!(fugitive.description, "A Git wrapper so awesome");
        assert_eq!(fugitive.tags, vec!["git"]);
    }

    #[test]
    fn update_without_existing_catalog_bootstraps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plugins.json");
        let total = run_update(LISTING, &path).unwrap();
        assert_eq!(total, 3);

        let plugins = catalog::load(&path).unwrap();
        let fugitive = plugins
            .iter()
            .find(|p| p.name == "tpope/vim-fugitive")
            .unwrap();
        // No curated text existed, so the placeholder applies.
        assert_eq!(fugitive.description, NO_DESCRIPTION);
    }

    #[test]
    fn rerunning_update_is_idempotent_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plugins.json");
        run_update(LISTING, &path).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        run_update(LISTING, &path).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);
    }
}
