use std::env;
use std::error::Error;
use std::path::Path;

use catalog_matcher::models::config::MatcherConfig;
use catalog_matcher::processing::Command;
use catalog_matcher::processing::normalize::normalize_catalog;
use catalog_matcher::processing::pipeline::{MergeOptions, run};
use catalog_matcher::repository::{
    CatalogReader, CatalogWriter, CategoryListReader, CategoryListWriter, JsonFileRepository,
    UnmatchedWriter, resolve_batch_paths,
};

fn merge(repo: &JsonFileRepository) -> Result<(), Box<dyn Error>> {
    let config = MatcherConfig::load()?;
    let batch_paths = resolve_batch_paths(&config.batch_paths);

    let outcome = run(
        repo,
        &config.catalog_path,
        &batch_paths,
        &MergeOptions::from(&config),
    )?;

    repo.save_catalog(&config.output_path, &outcome.catalog)?;
    log::info!(
        "Updated catalog saved to '{}' ({} of {} batch products matched)",
        config.output_path.display(),
        outcome.matched_count(),
        outcome.total_count()
    );

    if let Some(path) = &config.unmatched_path {
        repo.save_unmatched(path, &outcome.unmatched)?;
        log::info!(
            "{} unmatched products saved to '{}'",
            outcome.unmatched.len(),
            path.display()
        );
    }

    Ok(())
}

fn normalize(repo: &JsonFileRepository, input: &Path, output: &Path) -> Result<(), Box<dyn Error>> {
    let catalog = repo.load_catalog(input)?;
    let (catalog, _) = normalize_catalog(catalog);
    repo.save_catalog(output, &catalog)?;
    log::info!("Normalized catalog saved to '{}'", output.display());
    Ok(())
}

fn categories(repo: &JsonFileRepository, input: &Path, output: &Path) -> Result<(), Box<dyn Error>> {
    let categories = repo.load_category_dump(input)?;
    repo.save_categories(output, &categories)?;
    log::info!(
        "{} categories saved to '{}'",
        categories.len(),
        output.display()
    );
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let command = match Command::from_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    };

    let repo = JsonFileRepository::new();
    let result = match &command {
        Command::Merge => merge(&repo),
        Command::Normalize { input, output } => normalize(&repo, input, output),
        Command::Categories { input, output } => categories(&repo, input, output),
    };

    if let Err(e) = result {
        log::error!("{command:?} failed: {e}");
        std::process::exit(1);
    }
}
