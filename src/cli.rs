use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use treetracker_common::{Quarters, TreeCondition, TreeSize};

#[derive(Parser)]
#[command(name = "treetracker")]
#[command(author, version, about = "Offline records for trees, plots, and harvests")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage trees
    Tree {
        #[command(subcommand)]
        action: TreeAction,
    },

    /// Manage plots
    Plot {
        #[command(subcommand)]
        action: PlotAction,
    },

    /// Manage harvest production records
    Production {
        #[command(subcommand)]
        action: ProductionAction,
    },

    /// Normalize a photo and report the result
    Photo {
        /// Image file to normalize
        #[arg(required = true)]
        file: PathBuf,

        /// Size budget in MiB (overrides config)
        #[arg(long)]
        max_size_mb: Option<f64>,

        /// Write the data URL to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which storage tier is in use
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum TreeAction {
    /// List all trees
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a tree
    Add(TreeArgs),
    /// Replace every field of an existing tree
    Edit {
        id: String,
        #[command(flatten)]
        fields: TreeArgs,
        /// Remove the stored photo
        #[arg(long, conflicts_with = "photo")]
        clear_photo: bool,
    },
    /// Delete a tree
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct TreeArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub species: String,

    /// Name of the plot the tree grows in
    #[arg(long)]
    pub plot: String,

    /// Tree number within the plot
    #[arg(long)]
    pub number: String,

    /// very-small, small, medium, or large
    #[arg(long, default_value = "medium")]
    pub size: TreeSize,

    /// Plant date (YYYY-MM-DD)
    #[arg(long)]
    pub planted: NaiveDate,

    /// good, medium, bad, or RIP
    #[arg(long, default_value = "good")]
    pub condition: TreeCondition,

    /// Photo to normalize and attach
    #[arg(long)]
    pub photo: Option<PathBuf>,

    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Subcommand)]
pub enum PlotAction {
    /// List all plots with their tree counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a plot
    Add(PlotArgs),
    /// Replace every field of an existing plot
    Edit {
        id: String,
        #[command(flatten)]
        fields: PlotArgs,
    },
    /// Delete a plot (trees naming it are kept)
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct PlotArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Subcommand)]
pub enum ProductionAction {
    /// List all production records
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a harvest
    Add(ProductionArgs),
    /// Replace every field of an existing record
    Edit {
        id: String,
        #[command(flatten)]
        fields: ProductionArgs,
    },
    /// Delete a production record
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct ProductionArgs {
    /// Harvest date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Name of the harvested plot
    #[arg(long)]
    pub plot: String,

    /// Whole cartons
    #[arg(long)]
    pub cartons: u32,

    /// Partial carton: 0, 0.25, 0.5, or 0.75
    #[arg(long, default_value = "0")]
    pub quarters: Quarters,

    #[arg(long, default_value = "")]
    pub notes: String,
}
