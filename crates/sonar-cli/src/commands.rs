//! Subcommand implementations.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use comfy_table::Table;
use tracing::{info, warn};

use sonar_load::{EtlConfig, Loader};
use sonar_model::{Dataset, MappingRegistry};

use sonar_cli::pipeline::{run_pipeline, RunOptions, RunSummary};
use sonar_cli::summary::apply_table_style;

use crate::cli::RunArgs;

pub fn run_datasets() -> Result<()> {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec!["Order", "Dataset", "Key column(s)", "Source collection"]);
    for (position, dataset) in Dataset::LOAD_ORDER.iter().enumerate() {
        table.add_row(vec![
            (position + 1).to_string(),
            dataset.name().to_owned(),
            dataset.key_columns().join(", "),
            format!("{}.json", dataset.source_collection()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_etl(args: &RunArgs) -> Result<RunSummary> {
    let registry = MappingRegistry::load(&args.mappings)
        .with_context(|| format!("load mappings from {}", args.mappings.display()))?;
    let config = EtlConfig::load(&args.config)
        .with_context(|| format!("load config from {}", args.config.display()))?;
    let environment = config.environment(&args.env)?;

    let mut datasets = selected_datasets(&args.datasets)?;
    if !args.dry_run {
        let expanded = with_cascade_children(&datasets);
        if expanded.len() > datasets.len() {
            let added: Vec<&str> = expanded
                .iter()
                .filter(|d| !datasets.contains(d))
                .map(|d| d.name())
                .collect();
            warn!(
                added = added.join(", "),
                "reloading parents cascade-truncates their children; including them in the run"
            );
            datasets = expanded;
        }
    }
    let input_dir = args
        .input_dir
        .clone()
        .unwrap_or_else(|| environment.input_dir.clone());

    let mut loader = if args.dry_run {
        None
    } else {
        Some(Loader::connect(&environment.postgres).context("connect to destination")?)
    };

    info!(
        env = %args.env,
        input_dir = %input_dir.display(),
        datasets = datasets.len(),
        dry_run = args.dry_run,
        "starting pipeline run"
    );
    let options = RunOptions {
        datasets,
        input_dir,
        retries: args.retries,
        retry_delay: Duration::from_secs(args.retry_delay_secs),
        halt_on_failure: !args.dry_run,
    };
    Ok(run_pipeline(&registry, &options, loader.as_mut()))
}

/// Resolve `--dataset` filters against the closed enum; an unknown name is
/// a startup error, not a skipped entry.
fn selected_datasets(names: &[String]) -> Result<Vec<Dataset>> {
    if names.is_empty() {
        return Ok(Dataset::LOAD_ORDER.to_vec());
    }
    let mut selected = Vec::new();
    for name in names {
        match Dataset::from_name(name) {
            Some(dataset) => selected.push(dataset),
            None => bail!("unknown dataset '{name}'"),
        }
    }
    Ok(selected)
}

/// Close a selection over the FK topology: any dataset with a selected
/// (transitive) parent is pulled in, since truncating the parent cascades
/// into its table. Result is in load order.
fn with_cascade_children(selected: &[Dataset]) -> Vec<Dataset> {
    let mut included: Vec<Dataset> = selected.to_vec();
    loop {
        let before = included.len();
        for dataset in Dataset::LOAD_ORDER {
            if !included.contains(&dataset)
                && dataset.fk_parents().iter().any(|p| included.contains(p))
            {
                included.push(dataset);
            }
        }
        if included.len() == before {
            break;
        }
    }
    Dataset::LOAD_ORDER
        .into_iter()
        .filter(|d| included.contains(d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{selected_datasets, with_cascade_children};
    use sonar_model::Dataset;

    #[test]
    fn empty_filter_selects_everything() {
        let datasets = selected_datasets(&[]).expect("all datasets");
        assert_eq!(datasets, Dataset::LOAD_ORDER.to_vec());
    }

    #[test]
    fn unknown_dataset_name_fails_at_startup() {
        let err = selected_datasets(&["clientz".to_owned()]).unwrap_err();
        assert!(err.to_string().contains("clientz"));
    }

    #[test]
    fn reloading_a_parent_pulls_in_cascade_truncated_children() {
        // Truncating clients cascades into supplier_group and sonar_runs,
        // and through sonar_runs into sonar_results.
        assert_eq!(
            with_cascade_children(&[Dataset::Clients]),
            vec![
                Dataset::Clients,
                Dataset::SonarRuns,
                Dataset::SupplierGroup,
                Dataset::SonarResults,
            ]
        );
        assert_eq!(
            with_cascade_children(&[Dataset::Suppliers]),
            vec![Dataset::Suppliers, Dataset::SonarResults]
        );
    }

    #[test]
    fn leaf_selection_stays_as_is() {
        assert_eq!(
            with_cascade_children(&[Dataset::SonarResults]),
            vec![Dataset::SonarResults]
        );
    }
}
