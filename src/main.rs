mod cli;

use treetracker::{
    config::{self, Config},
    images::{self, NormalizeOptions},
    records::{format_cartons, tree_age, Tracker},
    storage::KvStore,
};
use treetracker_common::{Error, PlotDraft, ProductionDraft, RecordId, TreeDraft};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, PlotAction, PlotArgs, ProductionAction, ProductionArgs, TreeAction, TreeArgs};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "treetracker=debug,treetracker_db=debug".to_string()
        } else {
            "treetracker=warn,treetracker_db=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Validate {
        config: config_path,
    } = &cli.command
    {
        let path = config_path.as_deref().or(cli.config.as_deref());
        return validate_config(path);
    }

    let config = config::load_config_or_default(cli.config.as_deref())?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli.command, config))
}

async fn run(command: Commands, config: Config) -> Result<()> {
    if let Commands::Photo {
        file,
        max_size_mb,
        output,
    } = &command
    {
        return normalize_photo(&config, file, *max_size_mb, output.as_deref()).await;
    }

    let store = KvStore::open(&config.storage);
    let mut tracker = Tracker::load(store).context("Failed to load records")?;

    let result = match command {
        Commands::Tree { action } => run_tree(&mut tracker, &config, action).await,
        Commands::Plot { action } => run_plot(&mut tracker, action),
        Commands::Production { action } => run_production(&mut tracker, action),
        Commands::Status { json } => print_status(&tracker, &config, json),
        Commands::Photo { .. } | Commands::Validate { .. } => Ok(()),
    };

    tracker.close();
    result
}

async fn run_tree(tracker: &mut Tracker, config: &Config, action: TreeAction) -> Result<()> {
    match action {
        TreeAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(tracker.trees())?);
                return Ok(());
            }
            if tracker.trees().is_empty() {
                println!("No trees yet");
                return Ok(());
            }
            let now = chrono::Utc::now().naive_utc();
            for tree in tracker.trees() {
                println!(
                    "{}  {} #{} ({}) plot={} size={} condition={} age={}{}",
                    tree.id,
                    tree.name,
                    tree.tree_number,
                    tree.species,
                    tree.plot_name,
                    tree.size.label(),
                    tree.condition.label(),
                    tree_age(tree.plant_date, now),
                    if tree.photo.is_empty() { "" } else { " [photo]" },
                );
            }
        }
        TreeAction::Add(args) => {
            let draft = tree_draft(config, args, String::new()).await?;
            warn_unknown_plot(tracker, &draft.plot_name);
            let tree = tracker.save_tree(None, draft)?;
            println!("{}", tree.id);
        }
        TreeAction::Edit {
            id,
            fields,
            clear_photo,
        } => {
            let id = RecordId::from(id);
            let Some(existing) = tracker.find_tree(&id) else {
                return Err(Error::not_found(format!("tree {}", id)).into());
            };
            let existing_photo = if clear_photo {
                String::new()
            } else {
                existing.photo.clone()
            };
            let draft = tree_draft(config, fields, existing_photo).await?;
            warn_unknown_plot(tracker, &draft.plot_name);
            let tree = tracker.save_tree(Some(&id), draft)?;
            println!("{}", tree.id);
        }
        TreeAction::Delete { id, yes } => {
            confirm_delete("tree", &id, yes)?;
            report_delete("tree", &id, tracker.delete_tree(&RecordId::from(id.as_str()))?);
        }
    }

    Ok(())
}

/// Build a tree draft, normalizing the photo argument if given.
async fn tree_draft(config: &Config, args: TreeArgs, existing_photo: String) -> Result<TreeDraft> {
    let photo = match &args.photo {
        Some(path) => {
            let options = NormalizeOptions::from(&config.images);
            images::normalize_file(path, &options)
                .await
                .with_context(|| format!("Failed to process photo {:?}", path))?
                .into_data_url()
        }
        None => existing_photo,
    };

    Ok(TreeDraft {
        name: args.name,
        species: args.species,
        plot_name: args.plot,
        tree_number: args.number,
        size: args.size,
        plant_date: args.planted,
        condition: args.condition,
        photo,
        notes: args.notes,
    })
}

fn run_plot(tracker: &mut Tracker, action: PlotAction) -> Result<()> {
    match action {
        PlotAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(tracker.plots())?);
                return Ok(());
            }
            if tracker.plots().is_empty() {
                println!("No plots yet");
                return Ok(());
            }
            for plot in tracker.plots() {
                println!(
                    "{}  {} ({} trees){}",
                    plot.id,
                    plot.name,
                    tracker.tree_count_for_plot(&plot.name),
                    if plot.description.is_empty() {
                        String::new()
                    } else {
                        format!(" - {}", plot.description)
                    },
                );
            }
        }
        PlotAction::Add(args) => {
            let plot = tracker.save_plot(None, plot_draft(args, String::new()))?;
            println!("{}", plot.id);
        }
        PlotAction::Edit { id, fields } => {
            let id = RecordId::from(id);
            let photo = tracker
                .find_plot(&id)
                .map(|plot| plot.photo.clone())
                .unwrap_or_default();
            let plot = tracker.save_plot(Some(&id), plot_draft(fields, photo))?;
            println!("{}", plot.id);
        }
        PlotAction::Delete { id, yes } => {
            confirm_delete("plot", &id, yes)?;
            report_delete("plot", &id, tracker.delete_plot(&RecordId::from(id.as_str()))?);
        }
    }

    Ok(())
}

fn plot_draft(args: PlotArgs, photo: String) -> PlotDraft {
    PlotDraft {
        name: args.name,
        description: args.description,
        photo,
    }
}

fn run_production(tracker: &mut Tracker, action: ProductionAction) -> Result<()> {
    match action {
        ProductionAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(tracker.productions())?);
                return Ok(());
            }
            if tracker.productions().is_empty() {
                println!("No production records");
                return Ok(());
            }
            println!("{:<36}  {:<10}  {:<20}  {:>7}  {:>8}  {:>8}", "ID", "Date", "Plot", "Cartons", "Quarters", "Total");
            for record in tracker.productions() {
                println!(
                    "{:<36}  {:<10}  {:<20}  {:>7}  {:>8}  {:>8}",
                    record.id,
                    record.date,
                    record.plot_name,
                    record.cartons,
                    record.quarters,
                    format_cartons(record.total),
                );
            }
        }
        ProductionAction::Add(args) => {
            warn_unknown_plot(tracker, &args.plot);
            let record = tracker.save_production(None, production_draft(args))?;
            println!("{} total={}", record.id, format_cartons(record.total));
        }
        ProductionAction::Edit { id, fields } => {
            warn_unknown_plot(tracker, &fields.plot);
            let record = tracker.save_production(Some(&RecordId::from(id)), production_draft(fields))?;
            println!("{} total={}", record.id, format_cartons(record.total));
        }
        ProductionAction::Delete { id, yes } => {
            confirm_delete("production record", &id, yes)?;
            report_delete(
                "production record",
                &id,
                tracker.delete_production(&RecordId::from(id.as_str()))?,
            );
        }
    }

    Ok(())
}

fn production_draft(args: ProductionArgs) -> ProductionDraft {
    ProductionDraft {
        date: args.date,
        plot_name: args.plot,
        cartons: args.cartons,
        quarters: args.quarters,
        notes: args.notes,
    }
}

fn warn_unknown_plot(tracker: &Tracker, plot_name: &str) {
    if !tracker.has_plot_named(plot_name) {
        tracing::warn!("No plot named {:?}; saving the reference anyway", plot_name);
    }
}

fn confirm_delete(kind: &str, id: &str, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("Refusing to delete {} {} without --yes", kind, id);
    }
    Ok(())
}

fn report_delete(kind: &str, id: &str, deleted: bool) {
    if deleted {
        println!("Deleted {} {}", kind, id);
    } else {
        println!("No {} with id {}", kind, id);
    }
}

async fn normalize_photo(
    config: &Config,
    file: &Path,
    max_size_mb: Option<f64>,
    output: Option<&Path>,
) -> Result<()> {
    let mut options = NormalizeOptions::from(&config.images);
    if let Some(max_size_mb) = max_size_mb {
        if max_size_mb.is_nan() || max_size_mb <= 0.0 {
            anyhow::bail!("--max-size-mb must be positive");
        }
        options = options.with_max_size_mb(max_size_mb);
    }

    let encoded = images::normalize_file(file, &options)
        .await
        .with_context(|| format!("Failed to process photo {:?}", file))?;

    println!("Dimensions: {}x{}", encoded.width, encoded.height);
    println!("Quality: {}", encoded.quality);
    println!("Attempts: {}", encoded.attempts);
    println!(
        "Encoded size: {} chars (budget {}{})",
        encoded.data_url.len(),
        options.budget(),
        if encoded.fits(options.budget()) { "" } else { ", exceeded at quality floor" },
    );

    if let Some(output) = output {
        std::fs::write(output, &encoded.data_url)
            .with_context(|| format!("Failed to write {:?}", output))?;
        println!("Wrote {:?}", output);
    }

    Ok(())
}

fn print_status(tracker: &Tracker, config: &Config, json: bool) -> Result<()> {
    let status = tracker.store().status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let tier = if status.primary_available { "primary (sqlite)" } else { "fallback (file)" };
    println!("Active tier: {}", tier);
    println!("Database: {}", config.storage.database_path().display());
    println!("Fallback file: {}", config.storage.fallback_path().display());
    println!(
        "Reads: primary={} fallback={}",
        status.primary_reads, status.fallback_reads
    );
    println!("Primary failures: {}", status.primary_failures);
    println!(
        "Records: {} trees, {} plots, {} production records",
        tracker.trees().len(),
        tracker.plots().len(),
        tracker.productions().len()
    );

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_config(&Config::default());
        }
    }

    Ok(())
}

fn print_config(config: &Config) {
    println!("  Data dir: {}", config.storage.data_dir.display());
    println!("  Primary enabled: {}", config.storage.primary_enabled);
    println!("  Max photo dimension: {}", config.images.max_dimension);
    println!("  Max photo size: {} MiB", config.images.max_size_mb);
}
