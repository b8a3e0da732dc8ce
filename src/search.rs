use crate::plugin::Plugin;
use log::debug;
use strsim::normalized_damerau_levenshtein;

/// Field weights mirroring the published ranking contract: matches on the
/// plugin name dominate, description next, tags last.
pub const WEIGHT_NAME: f64 = 3.0;
pub const WEIGHT_DESCRIPTION: f64 = 2.0;
pub const WEIGHT_TAGS: f64 = 1.0;
const WEIGHT_TOTAL: f64 = WEIGHT_NAME + WEIGHT_DESCRIPTION + WEIGHT_TAGS;

/// Maximum normalized distance a field match may have.
pub const DEFAULT_THRESHOLD: f64 = 0.5;
/// Result cap, applied after ranking.
pub const DEFAULT_LIMIT: usize = 50;

/// A ranked search hit. `score` is a distance: 0 is a perfect match and
/// 1 the worst admissible, so results sort ascending.
#[derive(Debug, Clone)]
pub struct Hit<'a> {
    pub plugin: &'a Plugin,
    pub score: f64,
}

/// Weighted fuzzy index over a catalog snapshot.
///
/// Built wholesale at load time; the snapshot is treated as immutable for the
/// lifetime of the index, so queries are pure and need no coordination.
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
    threshold: f64,
    limit: usize,
}

struct IndexEntry {
    plugin: Plugin,
    name: FieldText,
    description: FieldText,
    tags: Vec<String>,
}

/// A lowercased field with its token split, precomputed at build time so the
/// query path does no allocation per entry.
struct FieldText {
    full: String,
    tokens: Vec<String>,
}

impl FieldText {
    fn new(text: &str) -> Self {
        let full = text.to_lowercase();
        let tokens = full
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self { full, tokens }
    }

    /// Normalized distance of `query` to this field: best of the whole field
    /// and any single token.
    fn distance(&self, query: &str) -> f64 {
        if self.full == query {
            return 0.0;
        }
        let mut best = 1.0 - normalized_damerau_levenshtein(query, &self.full);
        for token in &self.tokens {
            let d = 1.0 - normalized_damerau_levenshtein(query, token);
            if d < best {
                best = d;
            }
        }
        best
    }
}

impl SearchIndex {
    pub fn new(plugins: Vec<Plugin>) -> Self {
        let entries = plugins
            .into_iter()
            .map(|plugin| IndexEntry {
                name: FieldText::new(&plugin.name),
                description: FieldText::new(&plugin.description),
                tags: plugin.tags.clone(),
                plugin,
            })
            .collect();
        Self {
            entries,
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank the catalog against `query`, optionally narrowed by a tag filter.
    ///
    /// Without a filter a plugin is a candidate when any weighted field
    /// matches within the threshold. With a filter the composition is
    /// conjunctive: the text query must match name or description AND the
    /// filter must match one of the plugin's tags. Ranking is ascending by
    /// combined score; equal scores fall back to name distance, so an exact
    /// name match always beats a same-scored description or tag match, and
    /// only then to catalog order (the sort is stable).
    pub fn search(&self, query: &str, tag_filter: Option<&str>) -> Vec<Hit<'_>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let filter = tag_filter.map(|t| t.trim().to_lowercase());

        let mut candidates: Vec<(f64, f64, &Plugin)> = Vec::new();
        for entry in &self.entries {
            let d_name = entry.name.distance(&query);
            let d_desc = entry.description.distance(&query);
            let d_tags = match &filter {
                Some(f) => tag_distance(&entry.tags, f),
                None => tag_distance(&entry.tags, &query),
            };

            let name_ok = d_name <= self.threshold;
            let desc_ok = d_desc <= self.threshold;
            let tags_ok = d_tags <= self.threshold;

            let candidate = match &filter {
                Some(_) => (name_ok || desc_ok) && tags_ok,
                None => name_ok || desc_ok || tags_ok,
            };
            if !candidate {
                continue;
            }

            // Unmatched fields count as maximally distant so higher-weighted
            // matches dominate the combined score.
            let eff_name = if name_ok { d_name } else { 1.0 };
            let eff_desc = if desc_ok { d_desc } else { 1.0 };
            let eff_tags = if tags_ok { d_tags } else { 1.0 };
            let score = (WEIGHT_NAME * eff_name
                + WEIGHT_DESCRIPTION * eff_desc
                + WEIGHT_TAGS * eff_tags)
                / WEIGHT_TOTAL;

            candidates.push((score, eff_name, &entry.plugin));
        }

        candidates.sort_by(|(a_score, a_name, _), (b_score, b_name, _)| {
            (a_score, a_name)
                .partial_cmp(&(b_score, b_name))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(self.limit);
        debug!("query '{query}' matched {} entries", candidates.len());
        candidates
            .into_iter()
            .map(|(score, _, plugin)| Hit { plugin, score })
            .collect()
    }
}

/// Best distance of `needle` to any tag; 1.0 when the plugin has no tags.
fn tag_distance(tags: &[String], needle: &str) -> f64 {
    tags.iter()
        .map(|tag| {
            if tag == needle {
                0.0
            } else {
                1.0 - normalized_damerau_levenshtein(needle, tag)
            }
        })
        .fold(1.0, f64::min)
}
