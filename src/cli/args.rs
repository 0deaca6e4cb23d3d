//! CLI argument definitions.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ailloy")]
#[command(about = "Package manager and template engine for AI instruction bundles")]
#[command(long_about = "ailloy installs, renders, and validates bundles (\"molds\") of AI \
instruction content against a project's own flux values, resolving remote \
references and reusable ingots along the way.")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (info -> debug -> trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure flux values interactively or non-interactively.
    #[command(alias = "an")]
    Anneal {
        /// Inline KEY=VALUE override, repeatable.
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Overlay flux file, repeatable.
        #[arg(short = 'f', long = "values", value_name = "FILE")]
        values: Vec<Utf8PathBuf>,
        /// Target the global (user-home) flux file instead of the project's.
        #[arg(short = 'g', long)]
        global: bool,
        /// List current flux values and exit.
        #[arg(long)]
        list: bool,
        /// Remove KEY from the persisted flux values.
        #[arg(long, value_name = "KEY")]
        delete: Option<String>,
    },

    /// Install a bundle into the project.
    #[command(alias = "ca")]
    Cast {
        reference: Option<String>,
        #[arg(short = 'f', long = "values", value_name = "FILE")]
        values: Vec<Utf8PathBuf>,
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Also render the `workflows` output category.
        #[arg(long)]
        with_workflows: bool,
        /// Install into the user's home instead of the current directory.
        #[arg(short = 'g', long)]
        global: bool,
    },

    /// Dry-run render to stdout or an output directory.
    #[command(alias = "fo")]
    Forge {
        reference: Option<String>,
        #[arg(short = 'o', long)]
        output: Option<Utf8PathBuf>,
        #[arg(short = 'f', long = "values", value_name = "FILE")]
        values: Vec<Utf8PathBuf>,
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Validate a bundle on disk.
    #[command(alias = "te")]
    Temper { path: Option<Utf8PathBuf> },

    /// Scaffold a new bundle.
    #[command(alias = "ne")]
    New {
        name: String,
        #[arg(short = 'o', long)]
        output: Option<Utf8PathBuf>,
        /// Omit the AGENTS.md scaffold.
        #[arg(long)]
        no_agents: bool,
    },

    /// Package the current bundle as a tarball.
    #[command(alias = "sm")]
    Smelt,

    /// Assert the lockfile is fully pinned; never mutates it.
    #[command(alias = "qu")]
    Quench,

    /// Re-resolve and update the lockfile (optionally one dependency).
    #[command(alias = "re")]
    Recast {
        name: Option<String>,
        /// Print the changes without writing the lockfile.
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage registered foundries (mold catalogs).
    #[command(alias = "fy")]
    Foundry {
        #[command(subcommand)]
        command: FoundryCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum FoundryCommands {
    /// Register a foundry index by URL.
    Add { url: String },
    /// List registered foundries.
    List,
    /// Unregister a foundry by name or URL.
    Remove { name_or_url: String },
    /// Re-fetch every registered foundry's index.
    Update,
    /// Search registered foundries (and optionally GitHub) for a mold.
    Search {
        query: String,
        #[arg(long)]
        index_only: bool,
        #[arg(long)]
        github_only: bool,
    },
}
