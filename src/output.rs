use crate::plugin::Plugin;
use crate::search::Hit;
use colored::*;
use serde::Serialize;

/// Query response shape served at the boundary: the matched records with
/// their transient scores, plus the total match count.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredPlugin>,
    pub total: usize,
}

/// A plugin with its query-time relevance attached. The score never reaches
/// the persisted catalog; it exists only in responses, rounded to six decimal
/// digits.
#[derive(Debug, Serialize)]
pub struct ScoredPlugin {
    #[serde(flatten)]
    pub plugin: Plugin,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

impl SearchResponse {
    pub fn from_hits(hits: Vec<Hit<'_>>) -> Self {
        let results: Vec<ScoredPlugin> = hits
            .into_iter()
            .map(|hit| ScoredPlugin {
                plugin: hit.plugin.clone(),
                score: round_score(hit.score),
            })
            .collect();
        Self {
            total: results.len(),
            results,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        if self.results.is_empty() {
            return format!("{}", "No matching plugins found".yellow());
        }
        let noun = if self.total == 1 { "plugin:" } else { "plugins:" };
        let mut out = format!("{} {} {}\n", "Found".green(), self.total, noun.green());
        for entry in &self.results {
            out.push_str(&format!(
                "\n{}  {}\n  {}\n  {}",
                entry.plugin.name.bold(),
                format!("(score {:.6})", entry.score).dimmed(),
                entry.plugin.description,
                entry.plugin.url.blue().underline(),
            ));
            if let Some(stars) = entry.plugin.stars {
                out.push_str(&format!("  {}", format!("★ {stars}").yellow()));
            }
            if !entry.plugin.tags.is_empty() {
                out.push_str(&format!("\n  [{}]", entry.plugin.tags.join(", ").cyan()));
            }
            out.push('\n');
        }
        out
    }
}

impl TagsResponse {
    pub fn new(tags: Vec<String>) -> Self {
        Self { tags }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        if self.tags.is_empty() {
            return format!("{}", "No tags in catalog".yellow());
        }
        self.tags.join("\n")
    }
}

/// Round a distance score to 6 decimal digits for presentation.
pub fn round_score(score: f64) -> f64 {
    (score * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_plugin() -> Plugin {
        Plugin {
            name: "telescope.nvim".to_string(),
            url: "https://github.com/nvim-telescope/telescope.nvim".to_string(),
            description: "Find, Filter, Preview, Pick".to_string(),
            tags: vec!["fuzzy-finder".to_string()],
            stars: Some(9000),
            open_issues: Some(120),
            updated_at: None,
        }
    }

    #[test]
    fn json_response_flattens_score_into_record() {
        let response = SearchResponse {
            results: vec![ScoredPlugin {
                plugin: hit_plugin(),
                score: 0.123456789,
            }],
            total: 1,
        };
        let value: serde_json::Value =
            serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["results"][0]["name"], "telescope.nvim");
        assert_eq!(value["results"][0]["openIssues"], 120);
        assert!(value["results"][0]["score"].is_number());
    }

    #[test]
    fn score_rounds_to_six_decimals() {
        assert_eq!(round_score(0.123456789), 0.123457);
        assert_eq!(round_score(0.0), 0.0);
        assert_eq!(round_score(1.0), 1.0);
    }

    #[test]
    fn tags_response_serializes_ordered_list() {
        let response = TagsResponse::new(vec!["lsp".to_string(), "git".to_string()]);
        let value: serde_json::Value =
            serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(value["tags"][0], "lsp");
        assert_eq!(value["tags"][1], "git");
    }
}
