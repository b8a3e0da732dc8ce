use colored::*;
use env_logger::{Builder, Env, Target};
use log::info;
use plugseek::cli::{Cli, Commands, OutputFormat};
use plugseek::error::Result as PlugseekResult;
use plugseek::{bootstrap, catalog, ingest, output, search, tags, validate_query};
use plugseek::{Config, Parser};
use std::fs;
use std::io::Read;
use std::path::Path;

fn main() -> PlugseekResult<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    info!("Application started with command: {:?}", cli.command);

    let config =
        Config::load().map_err(|e| plugseek::PlugseekError::Config(format!("{e:#}")))?;
    let catalog_path = cli
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog.path.clone());

    match &cli.command {
        Commands::Search {
            query,
            tag,
            output_format,
        } => {
            // Boundary validation happens before any catalog or index work.
            validate_query(query)?;

            let plugins = catalog::load(&catalog_path)?;
            let index = search::SearchIndex::new(plugins)
                .with_threshold(config.search.threshold)
                .with_limit(config.search.limit);
            let hits = index.search(query, tag.as_deref());
            let response = output::SearchResponse::from_hits(hits);

            match output_format {
                OutputFormat::Json => println!("{}", response.to_json()?),
                OutputFormat::Text => println!("{}", response.to_text()),
            }
        }

        Commands::Tags { output_format } => {
            let plugins = catalog::load(&catalog_path)?;
            let response = output::TagsResponse::new(tags::ranked_tags(&plugins));

            match output_format {
                OutputFormat::Json => println!("{}", response.to_json()?),
                OutputFormat::Text => println!("{}", response.to_text()),
            }
        }

        Commands::Update { input } => {
            let listing = read_input(input)?;
            let total = ingest::run_update(&listing, &catalog_path)?;
            println!(
                "{} {} {} {}",
                "Catalog updated:".green(),
                total,
                "plugins in".green(),
                catalog_path.display()
            );
        }

        Commands::Bootstrap { markdown } => {
            let text = fs::read_to_string(markdown)?;
            let total = bootstrap::run_bootstrap(&text, &catalog_path)?;
            println!(
                "{} {} {} {}",
                "Catalog bootstrapped:".green(),
                total,
                "plugins in".green(),
                catalog_path.display()
            );
        }
    }

    Ok(())
}

/// Read the upstream listing dump; `-` means stdin, anything else is a file
/// produced by the external fetch step.
fn read_input(input: &Path) -> PlugseekResult<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn setup_logging(cli: &Cli) -> PlugseekResult<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.exists() && !parent_dir.as_os_str().is_empty() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        let log_file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    Ok(())
}
