mod infra;
mod render;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use org_inspector::config::{InspectorConfig, OutputFormat};
use org_inspector::error::AppError;
use org_inspector::telemetry;
use org_inspector::{EntityVariant, RecipeAlias, RecipeManager, RecipeParameters, RuleCatalog, RuleCategory};
use tracing::info;

use crate::infra::JsonDirectoryProvider;

#[derive(Parser, Debug)]
#[command(
    name = "org-inspector",
    about = "Score platform configuration metadata against best-practice rules",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the best-practice rule catalog (default command)
    Rules(RulesArgs),
    /// List entity variants and what they support
    Variants,
    /// Run one recipe against exported JSON datasets
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
struct RulesArgs {
    /// Only list rules of this category (e.g. hard_coded_url, security)
    #[arg(long, value_parser = parse_category)]
    category: Option<RuleCategory>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Recipe alias, e.g. custom-fields or role-hierarchy
    #[arg(value_parser = parse_recipe)]
    recipe: RecipeAlias,
    /// Recipe parameter as key=value; repeatable
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,
    /// Directory holding <cacheKey>.json files (overrides INSPECTOR_DATASET_DIR)
    #[arg(long)]
    datasets: Option<PathBuf>,
    /// Output format, json or csv (overrides INSPECTOR_OUTPUT)
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    RuleCatalog::builtin()?;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Rules(RulesArgs::default()));

    match command {
        Command::Rules(args) => {
            list_rules(args.category);
            Ok(())
        }
        Command::Variants => {
            list_variants();
            Ok(())
        }
        Command::Run(args) => run_recipe(args),
    }
}

fn parse_category(raw: &str) -> Result<RuleCategory, String> {
    RuleCategory::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = RuleCategory::ALL.iter().map(|category| category.key()).collect();
        format!("unknown category '{raw}' (expected one of {})", known.join(", "))
    })
}

fn parse_recipe(raw: &str) -> Result<RecipeAlias, String> {
    raw.parse::<RecipeAlias>().map_err(|err| err.to_string())
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("parameter '{raw}' must look like key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("parameter '{raw}' has an empty key"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_format(raw: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(raw).map_err(|err| err.to_string())
}

fn list_rules(category: Option<RuleCategory>) {
    let catalog = RuleCatalog::global();
    let rules = match category {
        Some(category) => catalog.by_category(category),
        None => catalog.rules().iter().collect(),
    };
    for rule in rules {
        println!("{:>3}  {:<16} {}", rule.id, rule.category.label(), rule.description);
    }
}

fn list_variants() {
    for variant in EntityVariant::ALL {
        println!(
            "{:<24} {:<40} scoring={:<5} dependencies={}",
            variant.name(),
            variant.label(),
            variant.has_scoring(),
            variant.has_dependencies()
        );
    }
}

fn run_recipe(args: RunArgs) -> Result<(), AppError> {
    let mut config = InspectorConfig::load()?;
    if let Some(directory) = args.datasets {
        config.datasets.directory = directory;
    }
    if let Some(format) = args.format {
        config.output = format;
    }

    telemetry::init(&config.telemetry)?;

    let mut parameters = RecipeParameters::new();
    for (key, value) in args.params {
        parameters.insert(key, value);
    }

    info!(
        ?config.environment,
        recipe = %args.recipe,
        datasets = %config.datasets.directory.display(),
        "running recipe"
    );
    let provider = Arc::new(JsonDirectoryProvider::new(&config.datasets.directory));
    let manager = RecipeManager::new(provider);
    let output = manager.run(args.recipe, &parameters)?;

    render::render(&output, config.output, io::stdout().lock())
}
