use crate::plugin::Plugin;
use std::collections::HashMap;

/// Occurrence count per tag: a tag carried by N plugins counts N, regardless
/// of how the tag got onto each plugin (tags are a set per record).
pub fn count_tags(plugins: &[Plugin]) -> HashMap<String, usize> {
    plugins.iter().fold(HashMap::new(), |mut counts, plugin| {
        for tag in &plugin.tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
        counts
    })
}

/// Tags ranked by descending popularity. Equal counts are ordered
/// alphabetically so the ranking is deterministic across runs.
pub fn ranked_tags(plugins: &[Plugin]) -> Vec<String> {
    let counts = count_tags(plugins);
    let mut tags: Vec<(String, usize)> = counts.into_iter().collect();
    tags.sort_by(|(a_tag, a_count), (b_tag, b_count)| {
        b_count.cmp(a_count).then_with(|| a_tag.cmp(b_tag))
    });
    tags.into_iter().map(|(tag, _)| tag).collect()
}
