mod registry;
mod settings;
mod store;

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use landreg_core::{ApplicationCategory, CatalogError, TypeCatalog, catalog_json_schema, type_slug};
use landreg_generate::{
    ApplicationSink, GenerateOptions, GenerationEngine, GenerationError, GenerationResult,
    TypeWeighting, format_application, write_batch_csv, write_batch_json,
};
use registry::{
    RunContext, RunOptions, RunPaths, init_console_logging, init_run_logging, start_run,
    write_applications, write_report,
};
use settings::{Settings, SettingsError, load_settings};
use store::FileStore;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "landreg",
    version,
    about = "Synthetic HM Land Registry application generator"
)]
struct Cli {
    /// Settings file (defaults to ./landreg.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a batch of applications.
    Generate(GenerateArgs),
    /// List the application types in the catalog.
    Types(TypesArgs),
    /// Print the JSON Schema for catalog documents.
    Schema,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of random applications when no --type is given.
    #[arg(long, conflicts_with = "types")]
    count: Option<usize>,
    /// Exact count for one type, by name or slug (e.g. chargesmortgages=3).
    #[arg(long = "type", value_name = "NAME=N", value_parser = parse_type_count)]
    types: Vec<(String, usize)>,
    /// Seed for reproducible batches.
    #[arg(long)]
    seed: Option<u64>,
    /// Anchor date for submission windows (YYYY-MM-DD).
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Catalog document to use instead of the embedded one.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long)]
    run_dir: Option<PathBuf>,
    /// Persist the batch into this application store.
    #[arg(long)]
    store: Option<PathBuf>,
    /// Clear the store before generating.
    #[arg(long, default_value_t = false)]
    reset: bool,
    /// Also write the batch as JSON here.
    #[arg(long)]
    json: Option<PathBuf>,
    /// Also write the batch as CSV here.
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Number of applications to print.
    #[arg(long)]
    print_samples: Option<usize>,
    /// How random runs choose application types.
    #[arg(long, value_enum)]
    weighting: Option<WeightingArg>,
}

#[derive(Args, Debug)]
struct TypesArgs {
    /// Only list one category.
    #[arg(long)]
    category: Option<ApplicationCategory>,
    /// Catalog document to use instead of the embedded one.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WeightingArg {
    Uniform,
    Category,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Generate(args) => run_generate(settings, args),
        Command::Types(args) => run_types(&settings, args),
        Command::Schema => run_schema(),
    }
}

fn run_generate(settings: Settings, args: GenerateArgs) -> Result<(), CliError> {
    let catalog_path = args.catalog.clone().or(settings.catalog.clone());
    let catalog = load_catalog(catalog_path.as_deref())?;

    let type_counts = resolve_type_counts(&catalog, &args.types)?;
    let store_dir = args.store.clone().or(settings.store_dir.clone());
    if args.reset && store_dir.is_none() {
        return Err(CliError::InvalidArgs(
            "--reset needs a store (--store or store_dir in settings)".to_string(),
        ));
    }

    let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let weighting = resolve_weighting(args.weighting, &settings.weighting);
    let random_count = args.count.unwrap_or(settings.random_count);
    let mode = if type_counts.is_empty() { "random" } else { "by_type" };

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir: args.run_dir.clone().unwrap_or(settings.run_dir.clone()),
        catalog_version: catalog.version().to_string(),
        catalog_source: catalog_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "embedded".to_string()),
        options: RunOptions {
            seed,
            today,
            mode: mode.to_string(),
            weighting: weighting.clone(),
            max_reference_attempts: settings.max_reference_attempts,
            type_counts: type_counts.clone(),
            random_count: type_counts.is_empty().then_some(random_count),
        },
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(event = "run_started", run_id = %run_id, seed, %today, mode);
    let timer = Instant::now();

    let options = GenerateOptions {
        seed: Some(seed),
        today: Some(today),
        weighting,
        max_reference_attempts: settings.max_reference_attempts,
    };
    let outcome = open_store(&catalog, store_dir.as_deref(), args.reset).and_then(|mut store| {
        let result = generate_into_run(&catalog, options, &type_counts, random_count, &run_paths)?;
        publish(&catalog, &result, &args, store.as_mut(), &settings)?;
        Ok(result)
    });

    let duration_ms = timer.elapsed().as_millis();
    match outcome {
        Ok(result) => {
            tracing::info!(
                event = "run_finished",
                status = "success",
                applications = result.applications.len(),
                duration_ms = duration_ms
            );
            println!(
                "generated {} applications (seed {seed}) in {}",
                result.applications.len(),
                run_paths.root.display()
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(event = "run_finished", status = "failure", error = %err, duration_ms = duration_ms);
            Err(err)
        }
    }
}

fn generate_into_run(
    catalog: &TypeCatalog,
    options: GenerateOptions,
    type_counts: &[(String, usize)],
    random_count: usize,
    run_paths: &RunPaths,
) -> Result<GenerationResult, CliError> {
    let engine = GenerationEngine::new(catalog, options)?;
    let result = if type_counts.is_empty() {
        engine.generate_random(random_count)?
    } else {
        engine.generate_by_type(type_counts)?
    };

    write_applications(run_paths, &result.applications)?;
    tracing::info!(event = "applications_written", path = %run_paths.applications_path.display());
    write_report(run_paths, &result.report)?;
    tracing::info!(event = "report_written", path = %run_paths.report_path.display());

    Ok(result)
}

/// Open the configured store, clearing it first when `reset` is set.
fn open_store(
    catalog: &TypeCatalog,
    store_dir: Option<&Path>,
    reset: bool,
) -> Result<Option<FileStore>, CliError> {
    let Some(dir) = store_dir else {
        return Ok(None);
    };
    let store = if reset {
        FileStore::open_fresh(dir, catalog.to_document())?
    } else {
        FileStore::open(dir, catalog.to_document())?
    };
    Ok(Some(store))
}

fn publish(
    catalog: &TypeCatalog,
    result: &GenerationResult,
    args: &GenerateArgs,
    store: Option<&mut FileStore>,
    settings: &Settings,
) -> Result<(), CliError> {
    if let Some(store) = store {
        store.store(&result.applications)?;
        tracing::info!(
            event = "store_updated",
            path = %store.root().display(),
            stored = store.stored()
        );
    }

    if let Some(path) = &args.json {
        write_batch_json(path, &result.applications)?;
        tracing::info!(event = "json_exported", path = %path.display());
    }
    if let Some(path) = &args.csv {
        let bytes = write_batch_csv(path, catalog, &result.applications)?;
        tracing::info!(event = "csv_exported", path = %path.display(), bytes);
    }

    let print_samples = args.print_samples.unwrap_or(settings.print_samples);
    let shown = print_samples.min(result.applications.len());
    if shown > 0 {
        println!("\n=== SAMPLE UK LAND REGISTRY APPLICATIONS ({shown}) ===\n");
        for application in &result.applications[..shown] {
            println!("{}\n", format_application(application, catalog));
        }
    }

    Ok(())
}

fn run_types(settings: &Settings, args: TypesArgs) -> Result<(), CliError> {
    init_console_logging()?;
    let catalog_path = args.catalog.or(settings.catalog.clone());
    let catalog = load_catalog(catalog_path.as_deref())?;

    let definitions: Vec<_> = match args.category {
        Some(category) => catalog.list_by_category(category),
        None => catalog.all().iter().collect(),
    };
    for definition in definitions {
        println!(
            "{:>3}  {:<10}  {:<40}  --type {}=N",
            definition.id,
            definition.category.as_str(),
            definition.name,
            type_slug(&definition.name)
        );
        println!("     forms: {}", definition.forms.join(", "));
        println!("     {}", definition.description);
    }
    Ok(())
}

fn run_schema() -> Result<(), CliError> {
    let schema = catalog_json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<TypeCatalog, CatalogError> {
    match path {
        Some(path) => TypeCatalog::from_path(path),
        None => TypeCatalog::embedded(),
    }
}

/// Map `--type` values (names or slugs) onto catalog names.
fn resolve_type_counts(
    catalog: &TypeCatalog,
    requested: &[(String, usize)],
) -> Result<Vec<(String, usize)>, CatalogError> {
    requested
        .iter()
        .map(|(value, count)| Ok((catalog.lookup_by_slug(value)?.name.clone(), *count)))
        .collect()
}

fn resolve_weighting(flag: Option<WeightingArg>, configured: &TypeWeighting) -> TypeWeighting {
    match (flag, configured) {
        (None, configured) => configured.clone(),
        (Some(WeightingArg::Uniform), _) => TypeWeighting::Uniform,
        (Some(WeightingArg::Category), TypeWeighting::Category { .. }) => configured.clone(),
        (Some(WeightingArg::Category), TypeWeighting::Uniform) => TypeWeighting::Category {
            core: 1.0,
            additional: 1.0,
        },
    }
}

fn parse_type_count(value: &str) -> Result<(String, usize), String> {
    let (name, count) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=N, got '{value}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing type name in '{value}'"));
    }
    let count = count
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("invalid count in '{value}': {err}"))?;
    Ok((name.to_string(), count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(catalog: &TypeCatalog, seed: u64) -> GenerationResult {
        let options = GenerateOptions {
            seed: Some(seed),
            today: NaiveDate::from_ymd_opt(2024, 6, 30),
            ..GenerateOptions::default()
        };
        GenerationEngine::new(catalog, options)
            .expect("engine")
            .generate_random(3)
            .expect("generate")
    }

    #[test]
    fn reset_happens_when_the_store_opens() {
        let catalog = TypeCatalog::embedded().expect("catalog");
        let dir = std::env::temp_dir().join(format!("landreg_cli_store_{}", Uuid::new_v4()));
        let mut store = open_store(&catalog, Some(&dir), false)
            .expect("open")
            .expect("store");
        store
            .store(&generated(&catalog, 9).applications)
            .expect("store");

        let reopened = open_store(&catalog, Some(&dir), false)
            .expect("reopen")
            .expect("store");
        assert_eq!(reopened.stored(), 3);

        let fresh = open_store(&catalog, Some(&dir), true)
            .expect("reset")
            .expect("store");
        assert_eq!(fresh.stored(), 0);
        assert!(open_store(&catalog, None, false).expect("no store").is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn parses_type_counts() {
        assert_eq!(
            parse_type_count("chargesmortgages=3"),
            Ok(("chargesmortgages".to_string(), 3))
        );
        assert_eq!(
            parse_type_count("Charges/Mortgages = 2"),
            Ok(("Charges/Mortgages".to_string(), 2))
        );
        assert!(parse_type_count("assents").is_err());
        assert!(parse_type_count("=4").is_err());
        assert!(parse_type_count("assents=-1").is_err());
    }

    #[test]
    fn resolves_slugs_to_catalog_names() {
        let catalog = TypeCatalog::embedded().expect("catalog");
        let resolved = resolve_type_counts(
            &catalog,
            &[
                ("first-registrations".to_string(), 2),
                ("Charges/Mortgages".to_string(), 1),
            ],
        )
        .expect("resolve");
        assert_eq!(
            resolved,
            vec![
                ("First Registrations".to_string(), 2),
                ("Charges/Mortgages".to_string(), 1),
            ]
        );

        let err = resolve_type_counts(&catalog, &[("boundary-disputes".to_string(), 1)])
            .expect_err("unknown type");
        assert!(matches!(err, CatalogError::UnknownType(_)));
    }

    #[test]
    fn weighting_flag_overrides_settings() {
        let configured = TypeWeighting::Category {
            core: 3.0,
            additional: 1.0,
        };
        assert_eq!(resolve_weighting(None, &configured), configured);
        assert_eq!(
            resolve_weighting(Some(WeightingArg::Uniform), &configured),
            TypeWeighting::Uniform
        );
        assert_eq!(
            resolve_weighting(Some(WeightingArg::Category), &configured),
            configured
        );
        assert_eq!(
            resolve_weighting(Some(WeightingArg::Category), &TypeWeighting::Uniform),
            TypeWeighting::Category {
                core: 1.0,
                additional: 1.0
            }
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
