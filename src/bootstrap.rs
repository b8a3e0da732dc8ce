use crate::catalog;
use crate::error::Result;
use crate::plugin::{Plugin, NO_DESCRIPTION};
use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use std::path::Path;

lazy_static! {
    // Top-level `#` is the document title; sections start at `##`.
    static ref HEADING: Regex =
        Regex::new(r"^(#{2,})\s+(.*)$").expect("heading pattern is valid");
    static ref LIST_ITEM: Regex =
        Regex::new(r"^- \[(?P<name>[^\]]+)\]\((?P<url>[^)]+)\)\s+-\s+(?P<description>.*)$")
            .expect("list item pattern is valid");
}

/// Parse a hand-maintained "awesome list" markdown document into catalog
/// records.
///
/// Headings act as category labels: a deeper heading nests under the current
/// one, a heading at the same or a shallower depth starts a fresh label
/// stack. Each `- [name](url) - description` item becomes a plugin tagged
/// with the lowercased labels in effect at that point. Stars start at zero;
/// the first ingestion run fills in real statistics.
pub fn parse_markdown(text: &str) -> Vec<Plugin> {
    let mut labels: Vec<String> = Vec::new();
    let mut level = 0usize;
    let mut plugins = Vec::new();

    for line in text.lines().map(str::trim) {
        if let Some(caps) = HEADING.captures(line) {
            let depth = caps[1].len();
            let label = caps[2].trim().to_string();
            if depth > level {
                labels.push(label);
            } else {
                labels = vec![label];
            }
            level = depth;
            continue;
        }

        if let Some(caps) = LIST_ITEM.captures(line) {
            let description = caps["description"].trim().to_string();
            let mut tags: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
            tags.sort();
            tags.dedup();
            plugins.push(Plugin {
                name: caps["name"].to_string(),
                url: caps["url"].to_string(),
                description: if description.is_empty() {
                    NO_DESCRIPTION.to_string()
                } else {
                    description
                },
                tags,
                stars: Some(0),
                open_issues: None,
                updated_at: None,
            });
        }
    }
    plugins
}

/// Seed the catalog from an awesome-list document, through the same
/// validation and backup discipline as every other write.
pub fn run_bootstrap(markdown: &str, catalog_path: &Path) -> Result<usize> {
    let plugins = parse_markdown(markdown);
    info!("bootstrapped {} plugins from markdown", plugins.len());
    catalog::save(catalog_path, &plugins)?;
    Ok(plugins.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const AWESOME: &str = "\
# Awesome Neovim

Intro text that is not a plugin.

## LSP

- [neovim/nvim-lspconfig](https://github.com/neovim/nvim-lspconfig) - Quickstart configs for LSP
- not a list item

### Diagnostics

- [folke/trouble.nvim](https://github.com/folke/trouble.nvim) - Pretty diagnostics list

## Git

- [tpope/vim-fugitive](https://github.com/tpope/vim-fugitive) - A Git wrapper so awesome
";

    #[test]
    fn items_inherit_heading_labels_as_tags() {
        let plugins = parse_markdown(AWESOME);
        assert_eq!(plugins.len(), 3);

        assert_eq!(plugins[0].name, "neovim/nvim-lspconfig");
        assert_eq!(plugins[0].tags, vec!["lsp"]);

        // Deeper heading nests under the section above it.
        assert_eq!(plugins[1].name, "folke/trouble.nvim");
        assert_eq!(plugins[1].tags, vec!["diagnostics", "lsp"]);

        // Returning to the shallower depth resets the stack.
        assert_eq!(plugins[2].name, "tpope/vim-fugitive");
        assert_eq!(plugins[2].tags, vec!["git"]);
    }

    #[test]
    fn items_start_with_zero_stars_and_parsed_url() {
        let plugins = parse_markdown(AWESOME);
        assert_eq!(plugins[0].stars, Some(0));
        assert_eq!(plugins[0].url, "https://github.com/neovim/nvim-lspconfig");
        assert_eq!(plugins[0].description, "Quickstart configs for LSP");
    }

    #[test]
    fn prose_and_malformed_items_are_ignored() {
        let plugins = parse_markdown("just some text\n- [broken](missing dash)\n");
        assert!(plugins.is_empty());
    }

    #[test]
    fn bootstrapped_records_pass_schema_validation() {
        for plugin in parse_markdown(AWESOME) {
            assert_eq!(plugin.validate(), Ok(()));
        }
    }
}
